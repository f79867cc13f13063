//! Long-press timer handling
//!
//! The timer is armed with a generation number. Cancelling forgets the
//! generation, so a timer that still fires afterwards is recognised as
//! stale and dropped.

use crate::commands::Cmd;
use crate::model::GestureModel;

/// Arm a fresh long-press timer, replacing any armed one
pub fn schedule_long_press(model: &mut GestureModel) -> Option<Cmd> {
    let previous = cancel_long_press(model);
    let generation = model.next_long_press_generation();
    model.session.long_press = Some(generation);
    tracing::debug!(
        target: "long_press",
        generation,
        delay_ms = model.config.delay_long_press_ms,
        "armed"
    );
    Cmd::batch(vec![
        previous.unwrap_or_default(),
        Cmd::ScheduleLongPress {
            generation,
            delay_ms: model.config.delay_long_press_ms,
        },
    ])
}

/// Disarm the long-press timer if one is armed
pub fn cancel_long_press(model: &mut GestureModel) -> Option<Cmd> {
    let generation = model.session.long_press.take()?;
    tracing::debug!(target: "long_press", generation, "cancelled");
    Some(Cmd::CancelLongPress { generation })
}

/// Handle an elapsed timer; fires the callback at most once per arm
pub fn long_press_elapsed(model: &mut GestureModel, generation: u64) -> Option<Cmd> {
    if model.session.long_press != Some(generation) {
        tracing::debug!(
            target: "long_press",
            generation,
            armed = ?model.session.long_press,
            "skipping stale timer"
        );
        return None;
    }
    model.session.long_press = None;
    tracing::debug!(target: "long_press", generation, source = %model.inputs.source, "fired");
    Some(Cmd::NotifyLongPress(model.inputs.source.clone()))
}
