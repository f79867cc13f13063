//! Viewer inputs supplied by the surrounding UI layer
//!
//! A change to any of these triggers a full session reset.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    bounds, centering_translate, fit_dimensions, image_size_from_translate, Bounds, Dimensions,
    Position,
};

/// Opaque identity of the displayed image, handed back on long press
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Remote or file URI
    Uri(String),
    /// Bundled asset reference
    Asset(u64),
}

impl From<&str> for ImageSource {
    fn from(uri: &str) -> Self {
        ImageSource::Uri(uri.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(uri: String) -> Self {
        ImageSource::Uri(uri)
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Uri(uri) => write!(f, "{}", uri),
            ImageSource::Asset(id) => write!(f, "asset:{}", id),
        }
    }
}

/// Layout and fit values for one image in one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerInputs {
    /// Current viewport size
    pub layout: Dimensions,
    /// Scale at which the image fits the viewport (floor for committed scale)
    pub initial_scale: f64,
    /// Translate that centers the image at rest
    pub initial_translate: Position,
    pub source: ImageSource,
}

impl ViewerInputs {
    pub fn new(
        layout: Dimensions,
        initial_scale: f64,
        initial_translate: Position,
        source: ImageSource,
    ) -> Self {
        Self {
            layout,
            initial_scale,
            initial_translate,
            source,
        }
    }

    /// Lay the image out at its fitted size, centered, at scale 1.0.
    ///
    /// Degenerate sizes (image not loaded yet, viewport not measured)
    /// fall back to scale 1.0 and a zero translate.
    pub fn fit(natural: Dimensions, layout: Dimensions, source: ImageSource) -> Self {
        if !natural.is_valid() || !layout.is_valid() {
            return Self::new(layout, 1.0, Position::default(), source);
        }
        let (fitted, _) = fit_dimensions(natural, layout);
        Self::new(layout, 1.0, centering_translate(fitted, layout), source)
    }

    /// Laid-out image size, recovered from the centering translate
    pub fn image_size(&self) -> Dimensions {
        image_size_from_translate(self.initial_translate, self.layout)
    }

    /// Translate limits at `scale`
    pub fn bounds(&self, scale: f64) -> Bounds {
        bounds(scale, self.image_size(), self.initial_translate, self.layout)
    }

    /// Movement that counts as a deliberate drag rather than touch jitter
    pub fn meaningful_shift(&self, ratio: f64) -> f64 {
        self.layout.min_side() * ratio
    }

    pub fn viewport_center(&self) -> Position {
        self.layout.center()
    }
}
