//! Runtime module - host integration
//!
//! This module drives the pure update loop against a host clock:
//! - `timers` - single-shot long-press and animation-end timers
//! - `viewer` - executes commands and delivers callbacks to the host

pub mod timers;
pub mod viewer;

pub use timers::{Timer, TimerKind, TimerQueue};
pub use viewer::{GestureViewer, HostEvent, RecordingHost, ViewerHost};
