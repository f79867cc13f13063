//! Host driver for one image viewer
//!
//! Owns the model and the transform output, executes commands, and turns
//! elapsed timers back into messages. The caller supplies the clock: every
//! entry point takes `now_ms`, and nothing here sleeps or spawns.

use std::collections::VecDeque;

use serde::Serialize;

use crate::animation::{Transform, TransformOutput};
use crate::commands::Cmd;
use crate::config::EngineConfig;
use crate::geometry::TouchPoint;
use crate::messages::{GestureFrame, GestureMsg};
use crate::model::{GestureModel, ImageSource, ViewerInputs};
use crate::update::update;

use super::timers::{TimerKind, TimerQueue};

/// Callbacks the surrounding UI layer receives
pub trait ViewerHost {
    /// Settled zoom classification changed
    fn on_zoom(&mut self, zoomed: bool);
    /// A single-touch hold outlasted the long-press delay
    fn on_long_press(&mut self, source: &ImageSource);
}

/// Callback recorded by `RecordingHost`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    Zoom { zoomed: bool },
    LongPress { source: ImageSource },
}

/// Host that records callbacks, for replay and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn zoom_events(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Zoom { zoomed } => Some(*zoomed),
                HostEvent::LongPress { .. } => None,
            })
            .collect()
    }

    pub fn long_presses(&self) -> Vec<&ImageSource> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::LongPress { source } => Some(source),
                HostEvent::Zoom { .. } => None,
            })
            .collect()
    }
}

impl ViewerHost for RecordingHost {
    fn on_zoom(&mut self, zoomed: bool) {
        self.events.push(HostEvent::Zoom { zoomed });
    }

    fn on_long_press(&mut self, source: &ImageSource) {
        self.events.push(HostEvent::LongPress {
            source: source.clone(),
        });
    }
}

pub struct GestureViewer<H: ViewerHost> {
    model: GestureModel,
    output: TransformOutput,
    timers: TimerQueue,
    pending: VecDeque<GestureMsg>,
    host: H,
    now_ms: f64,
}

impl<H: ViewerHost> GestureViewer<H> {
    pub fn new(config: EngineConfig, inputs: ViewerInputs, host: H) -> Self {
        let model = GestureModel::new(config, inputs);
        let output = TransformOutput::new(model.initial_transform());
        Self {
            model,
            output,
            timers: TimerQueue::new(),
            pending: VecDeque::new(),
            host,
            now_ms: 0.0,
        }
    }

    // === Touch Lifecycle ===

    pub fn grant(&mut self, touches: Vec<TouchPoint>, now_ms: f64) {
        self.dispatch(GestureMsg::Grant { touches }, now_ms);
    }

    pub fn start(&mut self, touches: Vec<TouchPoint>, now_ms: f64) {
        self.dispatch(
            GestureMsg::Start {
                touches,
                timestamp_ms: now_ms,
            },
            now_ms,
        );
    }

    pub fn move_touches(&mut self, frame: GestureFrame, now_ms: f64) {
        self.dispatch(GestureMsg::Move(frame), now_ms);
    }

    pub fn release(&mut self, now_ms: f64) {
        self.dispatch(GestureMsg::Release, now_ms);
    }

    pub fn terminate(&mut self, now_ms: f64) {
        self.dispatch(GestureMsg::Terminate, now_ms);
    }

    /// New viewport or image: full reset
    pub fn set_inputs(&mut self, inputs: ViewerInputs, now_ms: f64) {
        self.dispatch(GestureMsg::Reset(inputs), now_ms);
    }

    pub fn set_config(&mut self, config: EngineConfig, now_ms: f64) {
        self.dispatch(GestureMsg::Configure(config), now_ms);
    }

    /// Advance the clock to `now_ms`, then process `msg`
    pub fn dispatch(&mut self, msg: GestureMsg, now_ms: f64) {
        self.advance(now_ms);
        self.pending.push_back(msg);
        self.drain();
        // Zero-delay timers scheduled by this message fire now
        self.advance(now_ms);
    }

    /// Advance the clock, firing timers that came due in clock order
    pub fn advance(&mut self, now_ms: f64) {
        let now_ms = now_ms.max(self.now_ms);
        while let Some(timer) = self.timers.pop_due(now_ms) {
            self.now_ms = self.now_ms.max(timer.due_ms);
            self.output.settle(self.now_ms);
            self.pending.push_back(timer.kind.into_msg());
            self.drain();
        }
        self.now_ms = now_ms;
        self.output.settle(now_ms);
    }

    /// Transform the renderer should draw at `now_ms`
    pub fn sample(&self, now_ms: f64) -> Transform {
        self.output.sample(now_ms)
    }

    pub fn is_animating(&self) -> bool {
        self.output.is_animating(self.now_ms)
    }

    /// Earliest pending timer, for hosts that sleep between frames
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn model(&self) -> &GestureModel {
        &self.model
    }

    pub fn output(&self) -> &TransformOutput {
        &self.output
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn drain(&mut self) {
        while let Some(msg) = self.pending.pop_front() {
            if let Some(cmd) = update(&mut self.model, msg) {
                self.process_cmd(cmd);
            }
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        let now_ms = self.now_ms;
        match cmd {
            Cmd::None => {}
            Cmd::SetTransform(transform) => self.output.set(transform),
            Cmd::Animate { spec, notify } => {
                let end_ms = self.output.animate(&spec, now_ms);
                if let Some(generation) = notify {
                    self.timers
                        .schedule(end_ms, TimerKind::AnimationEnd(generation));
                }
            }
            Cmd::StopAnimations => {
                self.output.stop_all(now_ms);
                self.timers.cancel_animations();
            }
            Cmd::ScheduleLongPress {
                generation,
                delay_ms,
            } => {
                self.timers
                    .schedule(now_ms + delay_ms, TimerKind::LongPress(generation));
            }
            Cmd::CancelLongPress { generation } => {
                self.timers.cancel(TimerKind::LongPress(generation));
            }
            Cmd::NotifyZoom(zoomed) => self.host.on_zoom(zoomed),
            Cmd::NotifyLongPress(source) => self.host.on_long_press(&source),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }
}
