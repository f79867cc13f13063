//! Pure geometry helpers for fitting, centering and bounding the image
//!
//! The image is laid out at a fixed size, translated so that its box sits
//! at the translate offset, then scaled around the box center. A translate
//! of `centering_translate(size, viewport)` therefore centers the image at
//! every scale, and `bounds` describes how far the translate may move at a
//! given scale before an image edge would pull inside the viewport edge.
//!
//! All functions here are pure (no I/O, no side effects).

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Distances below this are treated as "fingers on top of each other"
pub const MIN_TOUCH_DISTANCE: f64 = 1e-6;

// ============================================================================
// Value Types
// ============================================================================

/// Width/height pair for a viewport or a laid-out image
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Translate offset in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise equality within `epsilon`
    pub fn approx_eq(&self, other: Position, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

/// One active contact in absolute screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    #[serde(alias = "x")]
    pub page_x: f64,
    #[serde(alias = "y")]
    pub page_y: f64,
}

impl TouchPoint {
    pub const fn new(page_x: f64, page_y: f64) -> Self {
        Self { page_x, page_y }
    }

    pub fn position(&self) -> Position {
        Position::new(self.page_x, self.page_y)
    }
}

// ============================================================================
// Fitting and Centering
// ============================================================================

/// Fit an image inside the viewport, preserving aspect ratio.
///
/// Returns the fitted size and the factor applied to the natural size to
/// reach it. The constraining axis is whichever ratio is smaller. Degenerate
/// input (zero or non-finite sides) yields the natural size at factor 1.0.
pub fn fit_dimensions(natural: Dimensions, viewport: Dimensions) -> (Dimensions, f64) {
    if !natural.is_valid() || !viewport.is_valid() {
        return (natural, 1.0);
    }
    let scale_x = viewport.width / natural.width;
    let scale_y = viewport.height / natural.height;
    let scale = scale_x.min(scale_y);
    (natural.scaled(scale), scale)
}

/// Offset that centers an image of `image` size inside the viewport.
///
/// Negative on an axis where the image is larger than the viewport.
pub fn centering_translate(image: Dimensions, viewport: Dimensions) -> Position {
    Position::new(
        (viewport.width - image.width) / 2.0,
        (viewport.height - image.height) / 2.0,
    )
}

/// Recover the laid-out image size from its centering translate
pub fn image_size_from_translate(initial_translate: Position, viewport: Dimensions) -> Dimensions {
    Dimensions::new(
        viewport.width - initial_translate.x * 2.0,
        viewport.height - initial_translate.y * 2.0,
    )
}

// ============================================================================
// Bounds
// ============================================================================

/// Legal translate range on one axis at a given scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisBounds {
    /// Translate may move within `[min, max]`
    Free { min: f64, max: f64 },
    /// Scaled image is smaller than the viewport: translate is held in place
    Pinned,
}

impl AxisBounds {
    fn from_edges(upper: f64, lower: f64, scaled_len: f64, viewport_len: f64) -> Self {
        if scaled_len < viewport_len {
            AxisBounds::Pinned
        } else {
            AxisBounds::Free {
                min: lower,
                max: upper,
            }
        }
    }

    /// Elastic correction while dragging; `pin` is used for pinned axes
    pub fn resist(&self, value: f64, factor: f64, pin: f64) -> f64 {
        match *self {
            AxisBounds::Pinned => pin,
            AxisBounds::Free { min, max } => {
                if value > max {
                    clamp_with_resistance(value, max, factor)
                } else if value < min {
                    clamp_with_resistance(value, min, factor)
                } else {
                    value
                }
            }
        }
    }

    /// Hard clamp used when settling; `pin` is used for pinned axes
    pub fn clamp(&self, value: f64, pin: f64) -> f64 {
        match *self {
            AxisBounds::Pinned => pin,
            AxisBounds::Free { min, max } => value.max(min).min(max),
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, AxisBounds::Pinned)
    }
}

/// The four translate limits at one scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    /// Scaled image size the limits were computed for
    pub scaled: Dimensions,
    pub viewport: Dimensions,
}

impl Bounds {
    pub fn x(&self) -> AxisBounds {
        AxisBounds::from_edges(self.left, self.right, self.scaled.width, self.viewport.width)
    }

    pub fn y(&self) -> AxisBounds {
        AxisBounds::from_edges(self.top, self.bottom, self.scaled.height, self.viewport.height)
    }

    /// Rubber-band `translate` toward the bounds, pinned axes take `pin`
    pub fn resist(&self, translate: Position, factor: f64, pin: Position) -> Position {
        Position::new(
            self.x().resist(translate.x, factor, pin.x),
            self.y().resist(translate.y, factor, pin.y),
        )
    }

    /// Hard clamp `translate` into the bounds, pinned axes take `pin`
    pub fn clamp(&self, translate: Position, pin: Position) -> Position {
        Position::new(
            self.x().clamp(translate.x, pin.x),
            self.y().clamp(translate.y, pin.y),
        )
    }
}

/// Translate limits at `scale` for an image laid out at `image` size.
///
/// `left`/`top` are the largest allowed translate (image edge flush with
/// the viewport's left/top edge), `right`/`bottom` the smallest.
pub fn bounds(
    scale: f64,
    image: Dimensions,
    initial_translate: Position,
    viewport: Dimensions,
) -> Bounds {
    let scaled = image.scaled(scale);
    let delta = centering_translate(scaled, viewport);
    let left = initial_translate.x - delta.x;
    let right = left - (scaled.width - viewport.width);
    let top = initial_translate.y - delta.y;
    let bottom = top - (scaled.height - viewport.height);
    Bounds {
        top,
        left,
        bottom,
        right,
        scaled,
        viewport,
    }
}

// ============================================================================
// Touch Helpers
// ============================================================================

/// Euclidean distance between the first two touches.
///
/// Returns `None` if either touch is missing or the distance is degenerate,
/// which callers treat as "skip this frame".
pub fn distance_between_touches(touches: &[TouchPoint]) -> Option<f64> {
    let a = touches.first()?;
    let b = touches.get(1)?;
    let distance = (a.page_x - b.page_x).hypot(a.page_y - b.page_y);
    (distance.is_finite() && distance > MIN_TOUCH_DISTANCE).then_some(distance)
}

/// Midpoint between the first two touches
pub fn focal_point(touches: &[TouchPoint]) -> Option<Position> {
    let a = touches.first()?;
    let b = touches.get(1)?;
    Some(Position::new(
        (a.page_x + b.page_x) / 2.0,
        (a.page_y + b.page_y) / 2.0,
    ))
}

/// Pull `value` back toward `bound` by `factor` of the overshoot.
///
/// `factor == 1.0` is a hard clamp, `0.0` leaves the value untouched.
#[inline]
pub fn clamp_with_resistance(value: f64, bound: f64, factor: f64) -> f64 {
    value - (value - bound) * factor
}
