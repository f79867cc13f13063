//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod long_press;
mod settle;
mod touch;

use crate::commands::Cmd;
use crate::geometry::Position;
use crate::messages::GestureMsg;
use crate::model::GestureModel;

#[cfg(debug_assertions)]
use crate::tracing::TransformSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use long_press::{cancel_long_press, long_press_elapsed, schedule_long_press};
pub use settle::{animation_finished, release, reset, terminate};
pub use touch::{grant, move_touches, start};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut GestureModel, msg: GestureMsg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut GestureModel, msg: GestureMsg) -> Option<Cmd> {
    match msg {
        GestureMsg::Grant { touches } => touch::grant(model, &touches),
        GestureMsg::Start {
            touches,
            timestamp_ms,
        } => touch::start(model, &touches, timestamp_ms),
        GestureMsg::Move(frame) => touch::move_touches(model, &frame),
        GestureMsg::Release => settle::release(model),
        GestureMsg::Terminate => settle::terminate(model),
        GestureMsg::LongPressElapsed { generation } => {
            long_press::long_press_elapsed(model, generation)
        }
        GestureMsg::AnimationFinished { generation } => {
            settle::animation_finished(model, generation)
        }
        GestureMsg::Reset(inputs) => settle::reset(model, inputs),
        GestureMsg::Configure(config) => {
            model.config = config;
            None
        }
    }
}

/// Commit a settled transform, reporting a change of zoom classification
pub(crate) fn commit(model: &mut GestureModel, scale: f64, translate: Position) -> Option<Cmd> {
    model.session.current_scale = scale;
    model.session.current_translate = translate;

    let zoomed = model.is_zoomed(scale);
    if zoomed == model.reported_zoomed {
        return None;
    }
    model.reported_zoomed = zoomed;
    tracing::debug!(target: "settle", zoomed, scale, "zoom state changed");
    Some(Cmd::NotifyZoom(zoomed))
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after transform state and logs diffs for debugging.
/// Filters out per-frame move messages from logging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut GestureModel, msg: GestureMsg) -> Option<Cmd> {
    let is_noisy = msg.is_noisy();

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = TransformSnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    if !is_noisy {
        let after = TransformSnapshot::from_model(model);
        if let Some(diff) = before.diff(&after) {
            debug!(target: "gesture", %diff, "state changed");
        }
    }

    result
}

/// Get a display name for a message
#[cfg(debug_assertions)]
fn msg_type_name(msg: &GestureMsg) -> String {
    match msg {
        GestureMsg::Grant { touches } => format!("Grant({} touches)", touches.len()),
        GestureMsg::Start { touches, .. } => format!("Start({} touches)", touches.len()),
        GestureMsg::Move(frame) => format!("Move({} touches)", frame.touches.len()),
        GestureMsg::Release => "Release".to_string(),
        GestureMsg::Terminate => "Terminate".to_string(),
        GestureMsg::LongPressElapsed { generation } => format!("LongPressElapsed({})", generation),
        GestureMsg::AnimationFinished { generation } => {
            format!("AnimationFinished({})", generation)
        }
        GestureMsg::Reset(_) => "Reset".to_string(),
        GestureMsg::Configure(_) => "Configure".to_string(),
    }
}
