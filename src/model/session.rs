//! Mutable gesture session state
//!
//! Owned exclusively by `GestureModel` and mutated only by the update
//! handlers. Recreated from scratch whenever the viewer inputs change.

use crate::geometry::{Position, TouchPoint};

/// What the current touch sequence has been recognised as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GesturePhase {
    /// No touches down
    #[default]
    Idle,
    /// Touches granted, nothing recognised yet
    Granted,
    /// Single-finger drag of a zoomed image
    Pan,
    /// Two-finger pinch
    Pinch,
    /// Double tap recognised; moves are ignored until release
    DoubleTap,
}

/// Reference frame captured once when a pinch begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchAnchor {
    pub scale: f64,
    pub translate: Position,
    pub touches: [TouchPoint; 2],
    pub distance: f64,
}

/// Target of a running double-tap animation, committed when it finishes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingZoom {
    pub generation: u64,
    pub scale: f64,
    pub translate: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    /// Committed scale; within `[initial, max]` at rest
    pub current_scale: f64,
    /// Committed translate
    pub current_translate: Position,
    /// In-flight scale of the active pinch
    pub tmp_scale: Option<f64>,
    /// In-flight translate of the active pinch or pan
    pub tmp_translate: Option<Position>,
    pub phase: GesturePhase,
    /// Touch count the session is classified by (promoted 1 -> 2 on a second finger)
    pub initial_touch_count: usize,
    pub pinch: Option<PinchAnchor>,
    /// Timestamp of the previous single tap, the double-tap window anchor
    pub last_tap_ms: Option<f64>,
    pub pending_zoom: Option<PendingZoom>,
    /// Generation of the armed long-press timer
    pub long_press: Option<u64>,
}

impl GestureSession {
    pub fn new(scale: f64, translate: Position) -> Self {
        Self {
            current_scale: scale,
            current_translate: translate,
            tmp_scale: None,
            tmp_translate: None,
            phase: GesturePhase::Idle,
            initial_touch_count: 0,
            pinch: None,
            last_tap_ms: None,
            pending_zoom: None,
            long_press: None,
        }
    }

    /// Start a new touch sequence
    pub fn begin(&mut self, touch_count: usize) {
        self.phase = GesturePhase::Granted;
        self.initial_touch_count = touch_count;
        self.tmp_scale = None;
        self.tmp_translate = None;
        self.pinch = None;
    }

    /// Clear everything transient; committed values are kept
    pub fn end(&mut self) {
        self.phase = GesturePhase::Idle;
        self.initial_touch_count = 0;
        self.tmp_scale = None;
        self.tmp_translate = None;
        self.pinch = None;
        self.long_press = None;
    }

    /// Values the renderer should be showing right now
    pub fn live_scale(&self) -> f64 {
        self.tmp_scale.unwrap_or(self.current_scale)
    }

    pub fn live_translate(&self) -> Position {
        self.tmp_translate.unwrap_or(self.current_translate)
    }

    pub fn is_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }
}
