//! Settling: release, terminate, animation completion and session reset
//!
//! Release commits the in-flight values after hard-clamping them and
//! animates the live transform there. Scale snaps to exactly the fit scale
//! when it is not meaningfully above it, and at the fit scale the translate
//! always returns to the centering offset.

use crate::animation::{AnimationSpec, Easing};
use crate::commands::Cmd;
use crate::model::{GestureModel, GesturePhase, GestureSession, ViewerInputs};

use super::commit;
use super::long_press::cancel_long_press;

/// All touches lifted: clamp, commit and animate to the resting transform
pub fn release(model: &mut GestureModel) -> Option<Cmd> {
    let cancel = cancel_long_press(model);

    // The double-tap animation settles on its own
    if model.session.phase == GesturePhase::DoubleTap {
        model.session.end();
        return cancel;
    }

    let live_scale = model.session.live_scale();
    let live_translate = model.session.live_translate();
    let initial_scale = model.inputs.initial_scale;
    let initial_translate = model.inputs.initial_translate;

    let mut scale = live_scale.max(initial_scale).min(model.max_scale());
    if !model.is_zoomed(scale) {
        scale = initial_scale;
    }

    let translate = if model.is_zoomed(scale) {
        model
            .inputs
            .bounds(scale)
            .clamp(live_translate, initial_translate)
    } else {
        initial_translate
    };

    tracing::debug!(
        target: "settle",
        from_scale = live_scale,
        scale,
        x = translate.x,
        y = translate.y,
        "release"
    );

    let animate = Cmd::Animate {
        spec: AnimationSpec {
            scale: (scale != live_scale).then_some(scale),
            translate: Some(translate),
            duration_ms: model.config.settle_duration_ms,
            easing: Easing::EaseInOut,
        },
        notify: None,
    };
    let notify = commit(model, scale, translate);
    model.session.end();

    Cmd::batch(vec![
        cancel.unwrap_or_default(),
        animate,
        notify.unwrap_or_default(),
    ])
}

/// Host aborted the gesture: drop in-flight values without settling
pub fn terminate(model: &mut GestureModel) -> Option<Cmd> {
    let cancel = cancel_long_press(model);
    let had_in_flight =
        model.session.tmp_scale.is_some() || model.session.tmp_translate.is_some();

    tracing::debug!(target: "settle", had_in_flight, "terminate");
    model.session.end();

    // Jump the renderer back to the committed values, no animation
    let restore = if had_in_flight {
        Cmd::SetTransform(model.committed_transform())
    } else {
        Cmd::None
    };
    Cmd::batch(vec![cancel.unwrap_or_default(), restore])
}

/// A notifying animation finished: commit the double-tap target
pub fn animation_finished(model: &mut GestureModel, generation: u64) -> Option<Cmd> {
    match model.session.pending_zoom {
        Some(pending) if pending.generation == generation => {
            model.session.pending_zoom = None;
            tracing::debug!(
                target: "settle",
                generation,
                scale = pending.scale,
                "double tap settled"
            );
            commit(model, pending.scale, pending.translate)
        }
        _ => {
            tracing::debug!(target: "settle", generation, "skipping stale animation");
            None
        }
    }
}

/// Viewport or image changed: start over at the fit transform
pub fn reset(model: &mut GestureModel, inputs: ViewerInputs) -> Option<Cmd> {
    let cancel = cancel_long_press(model);

    tracing::debug!(
        target: "gesture",
        width = inputs.layout.width,
        height = inputs.layout.height,
        scale = inputs.initial_scale,
        "session reset"
    );
    model.session = GestureSession::new(inputs.initial_scale, inputs.initial_translate);
    model.inputs = inputs;

    let notify = if model.reported_zoomed {
        model.reported_zoomed = false;
        Cmd::NotifyZoom(false)
    } else {
        Cmd::None
    };

    Cmd::batch(vec![
        cancel.unwrap_or_default(),
        Cmd::StopAnimations,
        Cmd::SetTransform(model.initial_transform()),
        notify,
    ])
}
