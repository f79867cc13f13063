//! Touch lifecycle handlers: grant, start and move
//!
//! Moves push the in-flight transform to the renderer immediately; nothing
//! is committed until release (see `settle`).

use crate::animation::{AnimationSpec, Easing, Transform};
use crate::commands::Cmd;
use crate::geometry::{clamp_with_resistance, distance_between_touches, focal_point, TouchPoint};
use crate::messages::GestureFrame;
use crate::model::{GestureModel, GesturePhase, PendingZoom, PinchAnchor};

use super::commit;
use super::long_press::{cancel_long_press, schedule_long_press};

/// Touches landed: halt animations and arm the long-press timer.
///
/// A double-tap animation still running is committed at its target so the
/// new gesture starts from a settled transform.
pub fn grant(model: &mut GestureModel, touches: &[TouchPoint]) -> Option<Cmd> {
    let mut cmds = vec![Cmd::StopAnimations];

    if let Some(pending) = model.session.pending_zoom.take() {
        tracing::debug!(
            target: "gesture",
            generation = pending.generation,
            "double-tap animation interrupted, committing target"
        );
        cmds.push(commit(model, pending.scale, pending.translate).unwrap_or_default());
    }
    cmds.push(Cmd::SetTransform(model.committed_transform()));
    cmds.push(cancel_long_press(model).unwrap_or_default());

    model.session.begin(touches.len());
    if touches.len() == 1 {
        cmds.push(schedule_long_press(model).unwrap_or_default());
    }

    Cmd::batch(cmds)
}

/// First sample of a session: detect double taps
pub fn start(model: &mut GestureModel, touches: &[TouchPoint], timestamp_ms: f64) -> Option<Cmd> {
    if !model.session.is_active() {
        model.session.begin(touches.len());
    }
    model.session.initial_touch_count = touches.len();

    if touches.len() > 1 {
        return cancel_long_press(model);
    }
    let touch = *touches.first()?;

    let is_double_tap = model.session.last_tap_ms.is_some_and(|last| {
        let elapsed = timestamp_ms - last;
        (0.0..model.config.double_tap_delay_ms).contains(&elapsed)
    });

    if !(is_double_tap && model.config.double_tap_to_zoom) {
        model.session.last_tap_ms = Some(timestamp_ms);
        return None;
    }

    model.session.last_tap_ms = None;
    model.session.phase = GesturePhase::DoubleTap;
    let cancel = cancel_long_press(model);
    let target = double_tap_target(model, touch);
    let generation = model.next_animation_generation();
    model.session.pending_zoom = Some(PendingZoom {
        generation,
        scale: target.scale,
        translate: target.translate,
    });

    tracing::debug!(
        target: "gesture",
        scale = target.scale,
        x = target.translate.x,
        y = target.translate.y,
        "double tap"
    );

    Cmd::batch(vec![
        cancel.unwrap_or_default(),
        Cmd::Animate {
            spec: AnimationSpec {
                scale: Some(target.scale),
                translate: Some(target.translate),
                duration_ms: model.config.double_tap_duration_ms,
                easing: Easing::EaseInOut,
            },
            notify: Some(generation),
        },
    ])
}

/// Zoom out to fit if zoomed, otherwise zoom in on the tapped point
fn double_tap_target(model: &GestureModel, touch: TouchPoint) -> Transform {
    let session = &model.session;
    if model.is_zoomed(session.current_scale) {
        return model.initial_transform();
    }

    let target_scale = model.max_scale();
    let ratio = if session.current_scale > 0.0 {
        target_scale / session.current_scale
    } else {
        1.0
    };
    let initial = model.inputs.initial_translate;
    let raw = initial + (model.inputs.viewport_center() - touch.position()) * ratio;
    let translate = model.inputs.bounds(target_scale).clamp(raw, initial);
    Transform::new(target_scale, translate)
}

/// Touches moved: pinch with two, pan with one while zoomed
pub fn move_touches(model: &mut GestureModel, frame: &GestureFrame) -> Option<Cmd> {
    if !model.session.is_active() {
        tracing::trace!(target: "gesture", "move without grant, ignoring");
        return None;
    }

    let mut cmds = Vec::new();
    let shift = model.meaningful_shift();
    let moved = frame.delta.x.abs() >= shift || frame.delta.y.abs() >= shift;
    // Any extra finger ends the hold, whatever the gesture turns into
    if moved || frame.touches.len() > 1 {
        cmds.push(cancel_long_press(model).unwrap_or_default());
    }

    // The double tap owns the transform until release
    if model.session.phase == GesturePhase::DoubleTap {
        return Cmd::batch(cmds);
    }

    let active = frame.touches.len();
    if model.session.initial_touch_count == 1 && active == 2 {
        model.session.initial_touch_count = 2;
    }

    let is_pinch = model.session.initial_touch_count == 2 && active == 2;
    let is_pan = model.session.initial_touch_count == 1 && active == 1;

    if is_pinch {
        cmds.push(pinch(model, &frame.touches).unwrap_or_default());
    } else if is_pan {
        cmds.push(pan(model, frame).unwrap_or_default());
    }

    Cmd::batch(cmds)
}

/// Scale around the finger midpoint, relative to the pinch anchor
fn pinch(model: &mut GestureModel, touches: &[TouchPoint]) -> Option<Cmd> {
    let distance = distance_between_touches(touches)?;

    let anchor = match model.session.pinch {
        Some(anchor) => anchor,
        None => {
            let anchor = PinchAnchor {
                scale: model.session.current_scale,
                translate: model.session.current_translate,
                touches: [touches[0], touches[1]],
                distance,
            };
            tracing::debug!(
                target: "gesture",
                scale = anchor.scale,
                distance,
                "pinch anchored"
            );
            model.session.pinch = Some(anchor);
            model.session.phase = GesturePhase::Pinch;
            anchor
        }
    };

    if anchor.scale <= 0.0 {
        return None;
    }
    let focal = focal_point(touches)?;

    let resistance = model.config.resistance;
    let initial_scale = model.inputs.initial_scale;
    let max_scale = model.max_scale();

    let mut next_scale = (distance / anchor.distance) * anchor.scale;
    if next_scale < initial_scale {
        next_scale = clamp_with_resistance(next_scale, initial_scale, resistance);
    }
    if next_scale > max_scale {
        next_scale = clamp_with_resistance(next_scale, max_scale, resistance);
    }
    if !next_scale.is_finite() {
        return None;
    }

    let shift = (model.inputs.viewport_center() - focal) * (next_scale / anchor.scale - 1.0);
    let raw = anchor.translate + shift;
    let translate = model.inputs.bounds(next_scale).resist(
        raw,
        resistance,
        model.inputs.initial_translate,
    );
    if !translate.is_finite() {
        return None;
    }

    tracing::trace!(target: "gesture", next_scale, x = translate.x, y = translate.y, "pinch");
    model.session.tmp_scale = Some(next_scale);
    model.session.tmp_translate = Some(translate);
    Some(Cmd::SetTransform(Transform::new(next_scale, translate)))
}

/// Drag a zoomed image; at rest scale single-finger moves are ignored
fn pan(model: &mut GestureModel, frame: &GestureFrame) -> Option<Cmd> {
    let session = &model.session;
    if !model.is_zoomed(session.current_scale) {
        return None;
    }

    let scale = session.current_scale;
    let committed = session.current_translate;
    let raw = committed + frame.delta;
    let translate = model
        .inputs
        .bounds(scale)
        .resist(raw, model.config.resistance, committed);
    if !translate.is_finite() {
        return None;
    }

    tracing::trace!(target: "gesture", x = translate.x, y = translate.y, "pan");
    model.session.phase = GesturePhase::Pan;
    model.session.tmp_translate = Some(translate);
    Some(Cmd::SetTransform(Transform::new(scale, translate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::geometry::{Dimensions, Position};
    use crate::model::ViewerInputs;

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

    fn transform_of(cmd: Option<Cmd>) -> Option<Transform> {
        cmd?.flatten().into_iter().rev().find_map(|c| match c {
            Cmd::SetTransform(t) => Some(t),
            _ => None,
        })
    }

    fn two(a: (f64, f64), b: (f64, f64)) -> Vec<TouchPoint> {
        vec![TouchPoint::new(a.0, a.1), TouchPoint::new(b.0, b.1)]
    }

    #[test]
    fn test_grant_single_touch_arms_long_press() {
        let mut model = model();
        let cmds = grant(&mut model, &[TouchPoint::new(10.0, 10.0)])
            .unwrap()
            .flatten();
        assert!(cmds.contains(&Cmd::StopAnimations));
        assert!(cmds
            .iter()
            .any(|c| matches!(c, Cmd::ScheduleLongPress { delay_ms, .. } if *delay_ms == 800.0)));
        assert_eq!(model.session.phase, GesturePhase::Granted);
    }

    #[test]
    fn test_grant_two_touches_skips_long_press() {
        let mut model = model();
        let cmds = grant(&mut model, &two((0.0, 0.0), (10.0, 10.0)))
            .unwrap()
            .flatten();
        assert!(!cmds
            .iter()
            .any(|c| matches!(c, Cmd::ScheduleLongPress { .. })));
        assert_eq!(model.session.long_press, None);
    }

    #[test]
    fn test_pinch_scales_around_center() {
        let mut model = model();
        grant(&mut model, &two((150.0, 400.0), (250.0, 400.0)));
        move_touches(
            &mut model,
            &GestureFrame::new(two((150.0, 400.0), (250.0, 400.0)), Position::default()),
        );
        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(two((100.0, 400.0), (300.0, 400.0)), Position::default()),
        ))
        .unwrap();
        assert_eq!(t.scale, 2.0);
        // Focal point is the viewport center: no shift
        assert_eq!(t.translate, Position::new(0.0, 200.0));
        assert_eq!(model.session.phase, GesturePhase::Pinch);
    }

    #[test]
    fn test_pinch_constant_distance_has_no_drift() {
        let mut model = model();
        grant(&mut model, &two((100.0, 100.0), (173.0, 229.0)));
        for step in 0..50 {
            let dx = step as f64 * 3.7;
            let t = transform_of(move_touches(
                &mut model,
                &GestureFrame::new(
                    two((100.0 + dx, 100.0 + dx), (173.0 + dx, 229.0 + dx)),
                    Position::new(dx, dx),
                ),
            ))
            .unwrap();
            assert_eq!(t.scale, 1.0);
        }
    }

    #[test]
    fn test_pinch_below_initial_is_resisted() {
        let mut model = model();
        grant(&mut model, &two((100.0, 400.0), (300.0, 400.0)));
        move_touches(
            &mut model,
            &GestureFrame::new(two((100.0, 400.0), (300.0, 400.0)), Position::default()),
        );
        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(two((150.0, 400.0), (250.0, 400.0)), Position::default()),
        ))
        .unwrap();
        // Raw 0.5, pulled 75% of the way back toward 1.0
        assert_eq!(t.scale, 0.875);
        assert_eq!(t.translate, Position::new(0.0, 200.0));
    }

    #[test]
    fn test_pinch_above_max_is_resisted() {
        let mut model = model();
        grant(&mut model, &two((150.0, 400.0), (250.0, 400.0)));
        move_touches(
            &mut model,
            &GestureFrame::new(two((150.0, 400.0), (250.0, 400.0)), Position::default()),
        );
        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(two((0.0, 400.0), (400.0, 400.0)), Position::default()),
        ))
        .unwrap();
        // Raw 4.0, overshoot of 2.0 reduced to 0.5
        assert_eq!(t.scale, 2.5);
    }

    #[test]
    fn test_pinch_missing_touch_skips_frame() {
        let mut model = model();
        grant(&mut model, &two((150.0, 400.0), (250.0, 400.0)));
        move_touches(
            &mut model,
            &GestureFrame::new(two((150.0, 400.0), (250.0, 400.0)), Position::default()),
        );
        move_touches(
            &mut model,
            &GestureFrame::new(two((100.0, 400.0), (300.0, 400.0)), Position::default()),
        );
        let stacked = two((200.0, 400.0), (200.0, 400.0));
        let cmd = move_touches(&mut model, &GestureFrame::new(stacked, Position::default()));
        assert!(transform_of(cmd).is_none());
        assert_eq!(model.session.tmp_scale, Some(2.0));
    }

    #[test]
    fn test_single_touch_at_rest_is_ignored() {
        let mut model = model();
        grant(&mut model, &[TouchPoint::new(200.0, 400.0)]);
        start(&mut model, &[TouchPoint::new(200.0, 400.0)], 0.0);
        let cmd = move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(260.0, 400.0)], Position::new(60.0, 0.0)),
        );
        assert!(transform_of(cmd).is_none());
        assert_eq!(model.session.tmp_translate, None);
    }

    #[test]
    fn test_pan_when_zoomed_resists_past_bounds() {
        let mut model = model();
        model.session.current_scale = 2.0;
        model.session.current_translate = Position::new(0.0, 200.0);
        grant(&mut model, &[TouchPoint::new(200.0, 400.0)]);
        start(&mut model, &[TouchPoint::new(200.0, 400.0)], 0.0);

        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(300.0, 400.0)], Position::new(100.0, 0.0)),
        ))
        .unwrap();
        assert_eq!(t.translate, Position::new(100.0, 200.0));

        // Height fills the viewport exactly, so vertical drag is resisted at once
        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(300.0, 440.0)], Position::new(100.0, 40.0)),
        ))
        .unwrap();
        assert_eq!(t.translate, Position::new(100.0, 210.0));

        let t = transform_of(move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(500.0, 400.0)], Position::new(300.0, 0.0)),
        ))
        .unwrap();
        // Bound at 200, overshoot of 100 reduced to 25
        assert_eq!(t.translate.x, 225.0);
        assert_eq!(model.session.phase, GesturePhase::Pan);
    }

    #[test]
    fn test_small_movement_keeps_long_press() {
        let mut model = model();
        grant(&mut model, &[TouchPoint::new(200.0, 400.0)]);
        start(&mut model, &[TouchPoint::new(200.0, 400.0)], 0.0);
        // Meaningful shift is 4px for a 400px-wide viewport
        move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(203.0, 402.0)], Position::new(3.0, 2.0)),
        );
        assert!(model.session.long_press.is_some());

        let cmd = move_touches(
            &mut model,
            &GestureFrame::new(vec![TouchPoint::new(205.0, 400.0)], Position::new(5.0, 0.0)),
        );
        assert!(model.session.long_press.is_none());
        assert!(cmd
            .unwrap()
            .flatten()
            .iter()
            .any(|c| matches!(c, Cmd::CancelLongPress { .. })));
    }

    #[test]
    fn test_second_finger_cancels_long_press() {
        let mut model = model();
        grant(&mut model, &[TouchPoint::new(200.0, 400.0)]);
        start(&mut model, &[TouchPoint::new(200.0, 400.0)], 0.0);
        move_touches(
            &mut model,
            &GestureFrame::new(two((200.0, 400.0), (250.0, 400.0)), Position::default()),
        );
        assert!(model.session.long_press.is_none());
        assert_eq!(model.session.initial_touch_count, 2);
    }

    #[test]
    fn test_three_fingers_cancel_long_press() {
        let mut model = model();
        grant(&mut model, &[TouchPoint::new(200.0, 400.0)]);
        start(&mut model, &[TouchPoint::new(200.0, 400.0)], 0.0);
        let three = vec![
            TouchPoint::new(200.0, 400.0),
            TouchPoint::new(250.0, 400.0),
            TouchPoint::new(300.0, 400.0),
        ];
        let cmd = move_touches(&mut model, &GestureFrame::new(three, Position::default()));
        assert!(model.session.long_press.is_none());
        assert_eq!(
            cmd.unwrap().flatten(),
            vec![Cmd::CancelLongPress { generation: 1 }]
        );
    }

    #[test]
    fn test_double_tap_zooms_in_on_tapped_point() {
        let mut model = model();
        let tap = [TouchPoint::new(100.0, 400.0)];
        grant(&mut model, &tap);
        start(&mut model, &tap, 1000.0);
        super::super::release(&mut model);

        grant(&mut model, &tap);
        let cmds = start(&mut model, &tap, 1200.0).unwrap().flatten();
        let spec = cmds
            .iter()
            .find_map(|c| match c {
                Cmd::Animate { spec, notify } => {
                    assert!(notify.is_some());
                    Some(*spec)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(spec.scale, Some(2.0));
        assert_eq!(spec.translate, Some(Position::new(200.0, 200.0)));
        assert_eq!(spec.duration_ms, 300.0);
        assert_eq!(model.session.phase, GesturePhase::DoubleTap);
        assert_eq!(model.session.long_press, None);
    }

    #[test]
    fn test_slow_second_tap_is_not_double() {
        let mut model = model();
        let tap = [TouchPoint::new(100.0, 400.0)];
        grant(&mut model, &tap);
        start(&mut model, &tap, 1000.0);
        super::super::release(&mut model);

        grant(&mut model, &tap);
        assert!(start(&mut model, &tap, 1300.0).is_none());
        assert_eq!(model.session.last_tap_ms, Some(1300.0));
    }

    #[test]
    fn test_double_tap_disabled() {
        let mut model = model();
        model.config.double_tap_to_zoom = false;
        let tap = [TouchPoint::new(100.0, 400.0)];
        grant(&mut model, &tap);
        start(&mut model, &tap, 1000.0);
        super::super::release(&mut model);
        grant(&mut model, &tap);
        assert!(start(&mut model, &tap, 1100.0).is_none());
        assert_ne!(model.session.phase, GesturePhase::DoubleTap);
    }
}
