//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use gesture_zoom::config::EngineConfig;
use gesture_zoom::geometry::{Dimensions, Position, TouchPoint};
use gesture_zoom::messages::GestureFrame;
use gesture_zoom::model::{GestureModel, ViewerInputs};
use gesture_zoom::runtime::{GestureViewer, RecordingHost};

/// 800×800 image in a 400×800 portrait viewport: fitted to 400×400 at y=200
pub fn portrait_inputs() -> ViewerInputs {
    ViewerInputs::fit(
        Dimensions::new(800.0, 800.0),
        Dimensions::new(400.0, 800.0),
        "dog.png".into(),
    )
}

pub fn test_model() -> GestureModel {
    GestureModel::new(EngineConfig::default(), portrait_inputs())
}

pub fn test_viewer() -> GestureViewer<RecordingHost> {
    test_viewer_with(EngineConfig::default())
}

pub fn test_viewer_with(config: EngineConfig) -> GestureViewer<RecordingHost> {
    GestureViewer::new(config, portrait_inputs(), RecordingHost::default())
}

pub fn touch(x: f64, y: f64) -> Vec<TouchPoint> {
    vec![TouchPoint::new(x, y)]
}

/// Two touches on a horizontal line, `distance` apart, centered on `(cx, cy)`
pub fn pair(cx: f64, cy: f64, distance: f64) -> Vec<TouchPoint> {
    vec![
        TouchPoint::new(cx - distance / 2.0, cy),
        TouchPoint::new(cx + distance / 2.0, cy),
    ]
}

pub fn frame(touches: Vec<TouchPoint>, dx: f64, dy: f64) -> GestureFrame {
    GestureFrame::new(touches, Position::new(dx, dy))
}

/// Full pinch through the viewer: grant, start, anchor, spread, release
pub fn pinch(viewer: &mut GestureViewer<RecordingHost>, at_ms: f64, from: f64, to: f64) {
    viewer.grant(pair(200.0, 400.0, from), at_ms);
    viewer.start(pair(200.0, 400.0, from), at_ms);
    viewer.move_touches(frame(pair(200.0, 400.0, from), 0.0, 0.0), at_ms + 16.0);
    viewer.move_touches(frame(pair(200.0, 400.0, to), 0.0, 0.0), at_ms + 32.0);
    viewer.release(at_ms + 48.0);
}

/// Single tap at `(x, y)`, released 50ms later
pub fn tap(viewer: &mut GestureViewer<RecordingHost>, at_ms: f64, x: f64, y: f64) {
    viewer.grant(touch(x, y), at_ms);
    viewer.start(touch(x, y), at_ms);
    viewer.release(at_ms + 50.0);
}
