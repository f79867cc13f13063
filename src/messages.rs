//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Timestamps travel
//! inside the messages so that `update` never reads a clock.

use crate::config::EngineConfig;
use crate::geometry::{Position, TouchPoint};
use crate::model::ViewerInputs;

/// Active touches plus the cumulative delta since the gesture began
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureFrame {
    pub touches: Vec<TouchPoint>,
    /// `{dx, dy}` since the grant
    pub delta: Position,
}

impl GestureFrame {
    pub fn new(touches: Vec<TouchPoint>, delta: Position) -> Self {
        Self { touches, delta }
    }
}

/// Gesture engine messages
#[derive(Debug, Clone, PartialEq)]
pub enum GestureMsg {
    // === Touch Lifecycle ===
    /// Responder granted; first contact(s) landed
    Grant { touches: Vec<TouchPoint> },
    /// First sample of a session (tap / double-tap detection)
    Start {
        touches: Vec<TouchPoint>,
        timestamp_ms: f64,
    },
    /// Touches moved
    Move(GestureFrame),
    /// All touches lifted
    Release,
    /// Host cancelled the gesture
    Terminate,

    // === Completions ===
    /// Long-press timer elapsed (stale generations are ignored)
    LongPressElapsed { generation: u64 },
    /// A notifying animation reached its end
    AnimationFinished { generation: u64 },

    // === Inputs ===
    /// Viewport or image changed: full session reset
    Reset(ViewerInputs),
    /// Configuration changed; session state is kept
    Configure(EngineConfig),
}

impl GestureMsg {
    /// Per-frame messages that would flood the logs
    pub fn is_noisy(&self) -> bool {
        matches!(self, GestureMsg::Move(_))
    }
}
