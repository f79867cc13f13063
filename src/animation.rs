//! Time-driven transform output
//!
//! The renderer samples three numeric channels (scale, translate x/y)
//! every frame. Each channel holds a resting value plus an optional
//! duration-based interpolation; sampling is a pure function of the
//! supplied clock, so nothing here owns a timer or a listener.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Newton iterations before falling back to bisection
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const SOLVE_EPSILON: f64 = 1e-7;

// ============================================================================
// Easing
// ============================================================================

/// Interpolation curve for a channel animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Symmetric in-out of `cubic-bezier(0.42, 0, 1, 1)`
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                let ease = CubicBezier::EASE_IN;
                if t < 0.5 {
                    ease.solve(t * 2.0) / 2.0
                } else {
                    1.0 - ease.solve((1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

/// Unit cubic bezier with fixed endpoints (0,0) and (1,1)
#[derive(Debug, Clone, Copy, PartialEq)]
struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    const EASE_IN: CubicBezier = CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };

    fn component(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Curve parameter whose x coordinate equals `x`
    fn parameter_for(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::component(t, self.x1, self.x2) - x;
            if err.abs() < SOLVE_EPSILON {
                return t;
            }
            let slope = Self::derivative(t, self.x1, self.x2);
            if slope.abs() < SOLVE_EPSILON {
                break;
            }
            t -= err / slope;
        }

        // x(t) is monotonic on [0, 1] for x1, x2 in [0, 1]
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = Self::component(t, self.x1, self.x2);
            if (value - x).abs() < SOLVE_EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::component(self.parameter_for(x), self.y1, self.y2)
    }
}

// ============================================================================
// Channels
// ============================================================================

/// An in-flight interpolation on one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Interpolation {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    fn value_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 || now_ms >= self.end_ms() {
            return self.to;
        }
        let progress = ((now_ms - self.start_ms) / self.duration_ms).max(0.0);
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }
}

/// One observable numeric channel
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    value: f64,
    animation: Option<Interpolation>,
}

impl AnimatedValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            animation: None,
        }
    }

    /// Value at `now_ms`; pure
    pub fn value_at(&self, now_ms: f64) -> f64 {
        match &self.animation {
            Some(anim) => anim.value_at(now_ms),
            None => self.value,
        }
    }

    /// Value the channel comes to rest at
    pub fn target(&self) -> f64 {
        self.animation.map_or(self.value, |anim| anim.to)
    }

    pub fn animation(&self) -> Option<&Interpolation> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.animation.is_some_and(|anim| now_ms < anim.end_ms())
    }

    /// Jump to `value`, dropping any interpolation
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.animation = None;
    }

    /// Start interpolating from the current sampled value to `to`.
    ///
    /// Supersedes any animation already running on this channel.
    pub fn animate_to(&mut self, to: f64, now_ms: f64, duration_ms: f64, easing: Easing) {
        let from = self.value_at(now_ms);
        if duration_ms <= 0.0 || from == to {
            self.set(to);
            return;
        }
        self.value = from;
        self.animation = Some(Interpolation {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
            easing,
        });
    }

    /// Freeze at the value sampled at `now_ms`
    pub fn stop(&mut self, now_ms: f64) {
        let value = self.value_at(now_ms);
        self.set(value);
    }

    /// Collapse a finished interpolation into the resting value
    pub fn settle(&mut self, now_ms: f64) {
        if let Some(anim) = self.animation {
            if now_ms >= anim.end_ms() {
                self.set(anim.to);
            }
        }
    }
}

// ============================================================================
// Transform Output
// ============================================================================

/// Scale + translate pair as sampled by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub translate: Position,
}

impl Transform {
    pub fn new(scale: f64, translate: Position) -> Self {
        Self { scale, translate }
    }
}

/// Target for a parallel animation; `None` channels are left alone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub scale: Option<f64>,
    pub translate: Option<Position>,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// The three channels a renderer binds to its image transform
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub scale: AnimatedValue,
    pub translate_x: AnimatedValue,
    pub translate_y: AnimatedValue,
}

impl TransformOutput {
    pub fn new(transform: Transform) -> Self {
        Self {
            scale: AnimatedValue::new(transform.scale),
            translate_x: AnimatedValue::new(transform.translate.x),
            translate_y: AnimatedValue::new(transform.translate.y),
        }
    }

    pub fn sample(&self, now_ms: f64) -> Transform {
        Transform::new(
            self.scale.value_at(now_ms),
            Position::new(
                self.translate_x.value_at(now_ms),
                self.translate_y.value_at(now_ms),
            ),
        )
    }

    /// Frame-synchronous update; cancels animations on every channel
    pub fn set(&mut self, transform: Transform) {
        self.scale.set(transform.scale);
        self.translate_x.set(transform.translate.x);
        self.translate_y.set(transform.translate.y);
    }

    /// Start the channels named in `spec` in parallel.
    ///
    /// Returns the time the last started channel finishes.
    pub fn animate(&mut self, spec: &AnimationSpec, now_ms: f64) -> f64 {
        if let Some(scale) = spec.scale {
            self.scale
                .animate_to(scale, now_ms, spec.duration_ms, spec.easing);
        }
        if let Some(translate) = spec.translate {
            self.translate_x
                .animate_to(translate.x, now_ms, spec.duration_ms, spec.easing);
            self.translate_y
                .animate_to(translate.y, now_ms, spec.duration_ms, spec.easing);
        }
        now_ms + spec.duration_ms.max(0.0)
    }

    /// Halt every channel at its current sampled value
    pub fn stop_all(&mut self, now_ms: f64) {
        self.scale.stop(now_ms);
        self.translate_x.stop(now_ms);
        self.translate_y.stop(now_ms);
    }

    pub fn settle(&mut self, now_ms: f64) {
        self.scale.settle(now_ms);
        self.translate_x.settle(now_ms);
        self.translate_y.settle(now_ms);
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.scale.is_animating(now_ms)
            || self.translate_x.is_animating(now_ms)
            || self.translate_y.is_animating(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_symmetry() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::EaseInOut.apply(0.25);
        let b = Easing::EaseInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        // Slow start
        assert!(a < 0.25);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let v = Easing::EaseInOut.apply(i as f64 / 100.0);
            assert!(v >= last, "easing went backwards at step {}", i);
            last = v;
        }
    }

    #[test]
    fn test_linear_interpolation_sampling() {
        let mut channel = AnimatedValue::new(0.0);
        channel.animate_to(100.0, 1000.0, 100.0, Easing::Linear);
        assert_eq!(channel.value_at(1000.0), 0.0);
        assert_eq!(channel.value_at(1050.0), 50.0);
        assert_eq!(channel.value_at(1100.0), 100.0);
        assert_eq!(channel.value_at(5000.0), 100.0);
        assert!(channel.is_animating(1099.0));
        assert!(!channel.is_animating(1100.0));
    }

    #[test]
    fn test_new_animation_supersedes_previous() {
        let mut channel = AnimatedValue::new(0.0);
        channel.animate_to(100.0, 0.0, 100.0, Easing::Linear);
        channel.animate_to(0.0, 50.0, 100.0, Easing::Linear);
        let anim = channel.animation().unwrap();
        assert_eq!(anim.from, 50.0);
        assert_eq!(anim.to, 0.0);
        assert_eq!(channel.value_at(100.0), 25.0);
    }

    #[test]
    fn test_set_cancels_animation() {
        let mut channel = AnimatedValue::new(0.0);
        channel.animate_to(100.0, 0.0, 100.0, Easing::Linear);
        channel.set(7.0);
        assert_eq!(channel.value_at(50.0), 7.0);
        assert!(channel.animation().is_none());
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut channel = AnimatedValue::new(1.0);
        channel.animate_to(2.0, 0.0, 0.0, Easing::EaseInOut);
        assert_eq!(channel.value_at(0.0), 2.0);
        assert!(channel.animation().is_none());
    }

    #[test]
    fn test_transform_output_parallel_and_stop() {
        let mut output = TransformOutput::new(Transform::new(1.0, Position::new(0.0, 200.0)));
        let end = output.animate(
            &AnimationSpec {
                scale: Some(2.0),
                translate: Some(Position::new(100.0, 200.0)),
                duration_ms: 300.0,
                easing: Easing::Linear,
            },
            0.0,
        );
        assert_eq!(end, 300.0);

        let mid = output.sample(150.0);
        assert_eq!(mid.scale, 1.5);
        assert_eq!(mid.translate, Position::new(50.0, 200.0));

        output.stop_all(150.0);
        assert!(!output.is_animating(151.0));
        assert_eq!(output.sample(1000.0), mid);
    }

    #[test]
    fn test_settle_collapses_finished_animation() {
        let mut output = TransformOutput::new(Transform::new(1.0, Position::default()));
        output.animate(
            &AnimationSpec {
                scale: Some(2.0),
                translate: None,
                duration_ms: 100.0,
                easing: Easing::EaseInOut,
            },
            0.0,
        );
        output.settle(50.0);
        assert!(output.scale.animation().is_some());
        output.settle(100.0);
        assert!(output.scale.animation().is_none());
        assert_eq!(output.scale.value_at(0.0), 2.0);
    }
}
