//! Engine configuration
//!
//! Stores gesture tuning in `~/.config/gesture-zoom/config.yaml`.
//! Every field has a serde default, so a partial file only overrides
//! the keys it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gesture engine tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether a double tap toggles between fit and `max_scale`
    pub double_tap_to_zoom: bool,
    /// Hold duration before the long-press callback fires
    pub delay_long_press_ms: f64,
    /// Ceiling for committed scale
    pub max_scale: f64,
    /// Maximum gap between two taps to count as a double tap
    pub double_tap_delay_ms: f64,
    /// Duration of the double-tap zoom animation
    pub double_tap_duration_ms: f64,
    /// Duration of the post-release settle animation
    pub settle_duration_ms: f64,
    /// Fraction of overshoot removed while dragging past a bound
    pub resistance: f64,
    /// Relative scale margin above the initial scale that still counts as "not zoomed"
    pub zoom_epsilon: f64,
    /// Movement, as a fraction of the smaller viewport side, that cancels a long press
    pub meaningful_shift_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            double_tap_to_zoom: true,
            delay_long_press_ms: 800.0,
            max_scale: 2.0,
            double_tap_delay_ms: 300.0,
            double_tap_duration_ms: 300.0,
            settle_duration_ms: 100.0,
            resistance: 0.75,
            zoom_epsilon: 0.01,
            meaningful_shift_ratio: 0.01,
        }
    }
}

impl EngineConfig {
    /// Load config from the user config dir, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
        config
            .validate()
            .map_err(|e| format!("Invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let durations = [
            ("delay_long_press_ms", self.delay_long_press_ms),
            ("double_tap_delay_ms", self.double_tap_delay_ms),
            ("double_tap_duration_ms", self.double_tap_duration_ms),
            ("settle_duration_ms", self.settle_duration_ms),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if !self.max_scale.is_finite() || self.max_scale < 1.0 {
            return Err(format!("max_scale must be at least 1.0, got {}", self.max_scale));
        }
        if !(0.0..=1.0).contains(&self.resistance) {
            return Err(format!("resistance must be within [0, 1], got {}", self.resistance));
        }
        if !self.zoom_epsilon.is_finite() || self.zoom_epsilon < 0.0 {
            return Err(format!("zoom_epsilon must be non-negative, got {}", self.zoom_epsilon));
        }
        if !(0.0..=1.0).contains(&self.meaningful_shift_ratio) {
            return Err(format!(
                "meaningful_shift_ratio must be within [0, 1], got {}",
                self.meaningful_shift_ratio
            ));
        }
        Ok(())
    }
}
