//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! gesture recognition and settle behaviour.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=gesture=trace,long_press=debug` - scoped filtering
//! - `RUST_LOG=gesture_zoom::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/gesture-zoom/logs/gesture-zoom.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{GestureModel, GesturePhase};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so
/// replay output on stdout stays machine-readable. Only the first call
/// installs a subscriber; later calls, or a host that already installed
/// one, leave the existing subscriber in place.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "gesture-zoom.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!(target: "gesture", error = %e, "global subscriber already installed, keeping it");
    }
}

/// Lightweight snapshot of the gesture state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSnapshot {
    pub phase: GesturePhase,
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub in_flight: bool,
    pub long_press_armed: bool,
}

impl TransformSnapshot {
    pub fn from_model(model: &GestureModel) -> Self {
        let session = &model.session;
        Self {
            phase: session.phase,
            scale: session.current_scale,
            x: session.current_translate.x,
            y: session.current_translate.y,
            in_flight: session.tmp_scale.is_some() || session.tmp_translate.is_some(),
            long_press_armed: session.long_press.is_some(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &TransformSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.phase != other.phase {
            changes.push(format!("phase: {:?} → {:?}", self.phase, other.phase));
        }
        if self.scale != other.scale {
            changes.push(format!("scale: {:.3} → {:.3}", self.scale, other.scale));
        }
        if self.x != other.x || self.y != other.y {
            changes.push(format!(
                "translate: ({:.1},{:.1}) → ({:.1},{:.1})",
                self.x, self.y, other.x, other.y
            ));
        }
        if self.in_flight != other.in_flight {
            changes.push(format!("in-flight: {}", other.in_flight));
        }
        if self.long_press_armed != other.long_press_armed {
            let status = if other.long_press_armed {
                "armed"
            } else {
                "disarmed"
            };
            changes.push(format!("long press {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TransformSnapshot {
        TransformSnapshot {
            phase: GesturePhase::Idle,
            scale: 1.0,
            x: 0.0,
            y: 200.0,
            in_flight: false,
            long_press_armed: false,
        }
    }

    #[test]
    fn test_identical_snapshots_have_no_diff() {
        assert_eq!(snapshot().diff(&snapshot()), None);
    }

    #[test]
    fn test_diff_lists_changes() {
        let after = TransformSnapshot {
            phase: GesturePhase::Pinch,
            scale: 1.5,
            long_press_armed: true,
            ..snapshot()
        };
        let diff = snapshot().diff(&after).unwrap();
        assert!(diff.contains("phase: Idle → Pinch"));
        assert!(diff.contains("scale: 1.000 → 1.500"));
        assert!(diff.contains("long press armed"));
        assert!(!diff.contains("translate"));
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init();
        init();
        tracing::debug!(target: "gesture", "still logging after second init");
    }
}
