//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update:
//! pushing the live transform, starting or halting animations, arming the
//! long-press timer and invoking host callbacks.

use crate::animation::{AnimationSpec, Transform};
use crate::model::ImageSource;

/// Side effects produced by `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Frame-synchronous transform update (cancels running animations)
    SetTransform(Transform),
    /// Start channel animations in parallel.
    /// With `notify`, the host sends `AnimationFinished` when it ends.
    Animate {
        spec: AnimationSpec,
        notify: Option<u64>,
    },
    /// Halt every running animation at its current value
    StopAnimations,
    /// Arm the long-press timer; after `delay_ms` the host sends `LongPressElapsed`
    ScheduleLongPress { generation: u64, delay_ms: f64 },
    /// Disarm the long-press timer
    CancelLongPress { generation: u64 },
    /// Settled zoom classification changed
    NotifyZoom(bool),
    /// Long press recognised on the current image
    NotifyLongPress(ImageSource),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands, dropping `None`s; returns `None` if nothing is left
    pub fn batch(cmds: Vec<Cmd>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Flatten nested batches into a list, in execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Check if this command changes what the renderer shows
    pub fn needs_frame(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::SetTransform(_) => true,
            Cmd::Animate { .. } => true,
            Cmd::StopAnimations => true,
            // Timers and callbacks don't touch the transform
            Cmd::ScheduleLongPress { .. } => false,
            Cmd::CancelLongPress { .. } => false,
            Cmd::NotifyZoom(_) => false,
            Cmd::NotifyLongPress(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_frame()),
        }
    }
}
