//! Scripted gesture scenarios for the replay tool
//!
//! A scenario names a viewport, an image and a list of timed touch events.
//! Replaying it drives a `GestureViewer` on a synthetic clock and collects
//! the sampled transform plus every host callback.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::{Dimensions, Position, TouchPoint};
use crate::messages::GestureFrame;
use crate::model::{ImageSource, ViewerInputs};
use crate::runtime::{GestureViewer, HostEvent, RecordingHost};

/// Keep sampling this long after the last event while animations run
const MAX_TAIL_MS: f64 = 5000.0;

/// Upper bound on sampled frames for one replay
const MAX_FRAMES: f64 = 1_000_000.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub viewport: Dimensions,
    /// Natural image size, fitted into the viewport
    pub image: Dimensions,
    #[serde(default)]
    pub source: SourceSpec,
    /// Replaces the engine configuration for this run
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub events: Vec<ScenarioEvent>,
}

/// Image source as written in a scenario: a bare URI or `{asset: N}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Uri(String),
    Asset { asset: u64 },
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Uri("scenario".to_string())
    }
}

impl From<SourceSpec> for ImageSource {
    fn from(spec: SourceSpec) -> Self {
        match spec {
            SourceSpec::Uri(uri) => ImageSource::Uri(uri),
            SourceSpec::Asset { asset } => ImageSource::Asset(asset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Grant,
    Start,
    Move,
    Release,
    Terminate,
    /// Advance the clock only
    Tick,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioEvent {
    pub at_ms: f64,
    pub kind: EventKind,
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
    /// Cumulative delta; derived from the first touch when omitted
    #[serde(default)]
    pub delta: Option<Position>,
}

/// One line of replay output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayLine {
    Frame {
        at_ms: f64,
        scale: f64,
        translate_x: f64,
        translate_y: f64,
    },
    Callback { at_ms: f64, event: HostEvent },
}

impl fmt::Display for ReplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayLine::Frame {
                at_ms,
                scale,
                translate_x,
                translate_y,
            } => write!(
                f,
                "{:>8.1}ms  scale {:.4}  translate ({:.2}, {:.2})",
                at_ms, scale, translate_x, translate_y
            ),
            ReplayLine::Callback { at_ms, event } => match event {
                HostEvent::Zoom { zoomed } => write!(f, "{:>8.1}ms  on_zoom({})", at_ms, zoomed),
                HostEvent::LongPress { source } => {
                    write!(f, "{:>8.1}ms  on_long_press({})", at_ms, source)
                }
            },
        }
    }
}

impl Scenario {
    /// Load a scenario; `.json` files are JSON, anything else YAML
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario at {}: {}", path.display(), e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scenario = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };
        scenario.map_err(|e| format!("Failed to parse scenario at {}: {}", path.display(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let scenario: Self = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let scenario: Self = serde_json::from_str(content).map_err(|e| e.to_string())?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.viewport.is_valid() {
            return Err("viewport must have positive width and height".to_string());
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        for pair in self.events.windows(2) {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(format!(
                    "events must be in time order ({} after {})",
                    pair[1].at_ms, pair[0].at_ms
                ));
            }
        }
        for event in &self.events {
            if !event.at_ms.is_finite() || event.at_ms < 0.0 {
                return Err(format!(
                    "{:?} event time must be a non-negative number, got {}",
                    event.kind, event.at_ms
                ));
            }
            let needs_touches = matches!(
                event.kind,
                EventKind::Grant | EventKind::Start | EventKind::Move
            );
            if needs_touches && event.touches.is_empty() {
                return Err(format!("{:?} at {}ms has no touches", event.kind, event.at_ms));
            }
        }
        Ok(())
    }

    pub fn inputs(&self) -> ViewerInputs {
        ViewerInputs::fit(self.image, self.viewport, self.source.clone().into())
    }

    /// Replay every event, sampling the transform each `frame_ms`.
    ///
    /// Frames are only emitted when the sampled transform changed. `config`
    /// is used unless the scenario carries its own.
    pub fn replay(&self, config: EngineConfig, frame_ms: f64) -> Result<Vec<ReplayLine>, String> {
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return Err(format!("frame interval must be positive, got {}", frame_ms));
        }
        self.validate()?;

        let last_event_ms = self.events.last().map_or(0.0, |e| e.at_ms);
        let frame_budget = ((last_event_ms + MAX_TAIL_MS) / frame_ms).ceil();
        if frame_budget > MAX_FRAMES {
            return Err(format!(
                "scenario spans {:.0} frames at {}ms, limit is {:.0}",
                frame_budget, frame_ms, MAX_FRAMES
            ));
        }
        let config = self.config.clone().unwrap_or(config);
        let mut replay = Replay::new(GestureViewer::new(
            config,
            self.inputs(),
            RecordingHost::default(),
        ));

        tracing::info!(
            target: "gesture",
            name = %self.name,
            events = self.events.len(),
            frame_ms,
            "replaying scenario"
        );

        let mut events = self.events.iter().peekable();
        let mut frame = 0u64;
        loop {
            let now_ms = frame as f64 * frame_ms;
            while let Some(event) = events.next_if(|e| e.at_ms <= now_ms) {
                replay.apply(event);
            }
            replay.viewer.advance(now_ms);
            replay.collect_callbacks();
            replay.sample(now_ms);

            let idle = !replay.viewer.is_animating() && replay.viewer.next_deadline().is_none();
            let done = events.peek().is_none() && now_ms >= last_event_ms;
            if (done && idle) || frame as f64 >= frame_budget {
                break;
            }
            frame += 1;
        }

        Ok(replay.lines)
    }
}

struct Replay {
    viewer: GestureViewer<RecordingHost>,
    lines: Vec<ReplayLine>,
    seen_callbacks: usize,
    last_frame: Option<(f64, Position)>,
    origin: Position,
}

impl Replay {
    fn new(viewer: GestureViewer<RecordingHost>) -> Self {
        Self {
            viewer,
            lines: Vec::new(),
            seen_callbacks: 0,
            last_frame: None,
            origin: Position::default(),
        }
    }

    fn apply(&mut self, event: &ScenarioEvent) {
        let at_ms = event.at_ms;
        let touches = event.touches.clone();
        match event.kind {
            EventKind::Grant => {
                if let Some(first) = touches.first() {
                    self.origin = first.position();
                }
                self.viewer.grant(touches, at_ms);
            }
            EventKind::Start => self.viewer.start(touches, at_ms),
            EventKind::Move => {
                let delta = event.delta.unwrap_or_else(|| {
                    touches
                        .first()
                        .map_or(Position::default(), |t| t.position() - self.origin)
                });
                self.viewer
                    .move_touches(GestureFrame::new(touches, delta), at_ms);
            }
            EventKind::Release => self.viewer.release(at_ms),
            EventKind::Terminate => self.viewer.terminate(at_ms),
            EventKind::Tick => self.viewer.advance(at_ms),
        }
        self.collect_callbacks();
    }

    fn collect_callbacks(&mut self) {
        let at_ms = self.viewer.now_ms();
        let events = &self.viewer.host().events;
        for event in &events[self.seen_callbacks..] {
            self.lines.push(ReplayLine::Callback {
                at_ms,
                event: event.clone(),
            });
        }
        self.seen_callbacks = events.len();
    }

    fn sample(&mut self, now_ms: f64) {
        let transform = self.viewer.sample(now_ms);
        let current = (transform.scale, transform.translate);
        if self.last_frame == Some(current) {
            return;
        }
        self.last_frame = Some(current);
        self.lines.push(ReplayLine::Frame {
            at_ms: now_ms,
            scale: transform.scale,
            translate_x: transform.translate.x,
            translate_y: transform.translate.y,
        });
    }
}
