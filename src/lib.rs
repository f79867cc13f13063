//! Gesture Zoom - Elm-style pinch/pan/double-tap engine for an image viewer
//!
//! Touch events become `GestureMsg`s, `update::update` turns them into
//! `Cmd`s, and `runtime::GestureViewer` executes those against an animated
//! transform output on a caller-supplied clock.

pub mod animation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod geometry;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod scenario;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use animation::{Transform, TransformOutput};
pub use commands::Cmd;
pub use config::EngineConfig;
pub use geometry::{Dimensions, Position, TouchPoint};
pub use messages::{GestureFrame, GestureMsg};
pub use model::{GestureModel, ImageSource, ViewerInputs};
pub use runtime::{GestureViewer, ViewerHost};
