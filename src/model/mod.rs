//! Gesture model - the complete state of one image viewer
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod inputs;
pub mod session;

pub use inputs::{ImageSource, ViewerInputs};
pub use session::{GesturePhase, GestureSession, PendingZoom, PinchAnchor};

use crate::animation::Transform;
use crate::config::EngineConfig;

/// The complete gesture engine model
#[derive(Debug, Clone)]
pub struct GestureModel {
    pub config: EngineConfig,
    pub inputs: ViewerInputs,
    pub session: GestureSession,
    /// Last zoom classification reported through `Cmd::NotifyZoom`
    pub reported_zoomed: bool,
    next_long_press: u64,
    next_animation: u64,
}

impl GestureModel {
    pub fn new(config: EngineConfig, inputs: ViewerInputs) -> Self {
        let session = GestureSession::new(inputs.initial_scale, inputs.initial_translate);
        Self {
            config,
            inputs,
            session,
            reported_zoomed: false,
            next_long_press: 0,
            next_animation: 0,
        }
    }

    /// Whether `scale` is meaningfully above the fit scale.
    ///
    /// The margin absorbs floating drift left over from pinch math.
    pub fn is_zoomed(&self, scale: f64) -> bool {
        let initial = self.inputs.initial_scale;
        scale - initial > initial.abs() * self.config.zoom_epsilon
    }

    /// Upper limit for committed scale, never below the fit scale
    pub fn max_scale(&self) -> f64 {
        self.config.max_scale.max(self.inputs.initial_scale)
    }

    pub fn initial_transform(&self) -> Transform {
        Transform::new(self.inputs.initial_scale, self.inputs.initial_translate)
    }

    pub fn committed_transform(&self) -> Transform {
        Transform::new(self.session.current_scale, self.session.current_translate)
    }

    /// In-flight values if a gesture is moving the image, committed otherwise
    pub fn live_transform(&self) -> Transform {
        Transform::new(self.session.live_scale(), self.session.live_translate())
    }

    pub fn meaningful_shift(&self) -> f64 {
        self.inputs
            .meaningful_shift(self.config.meaningful_shift_ratio)
    }

    pub(crate) fn next_long_press_generation(&mut self) -> u64 {
        self.next_long_press += 1;
        self.next_long_press
    }

    pub(crate) fn next_animation_generation(&mut self) -> u64 {
        self.next_animation += 1;
        self.next_animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Dimensions, Position};

    fn model() -> GestureModel {
        GestureModel::new(
            EngineConfig::default(),
            ViewerInputs::fit(
                Dimensions::new(800.0, 800.0),
                Dimensions::new(400.0, 800.0),
                "a.png".into(),
            ),
        )
    }

    #[test]
    fn test_is_zoomed_absorbs_drift() {
        let model = model();
        assert!(!model.is_zoomed(1.0));
        assert!(!model.is_zoomed(1.0 + 1e-9));
        assert!(!model.is_zoomed(1.005));
        assert!(model.is_zoomed(1.05));
        assert!(!model.is_zoomed(0.8));
    }

    #[test]
    fn test_new_model_starts_at_initial_transform() {
        let model = model();
        assert_eq!(model.committed_transform(), model.initial_transform());
        assert_eq!(model.live_transform().translate, Position::new(0.0, 200.0));
        assert!(!model.reported_zoomed);
    }
}
