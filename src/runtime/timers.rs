//! Single-shot timers on the host's clock
//!
//! Timers are kept in insertion order; due timers pop earliest first so
//! that firing order follows the clock even when several are overdue.

use crate::messages::GestureMsg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    LongPress(u64),
    AnimationEnd(u64),
}

impl TimerKind {
    /// Message delivered to `update` when the timer fires
    pub fn into_msg(self) -> GestureMsg {
        match self {
            TimerKind::LongPress(generation) => GestureMsg::LongPressElapsed { generation },
            TimerKind::AnimationEnd(generation) => GestureMsg::AnimationFinished { generation },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub due_ms: f64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, kind: TimerKind) {
        self.timers.push(Timer { due_ms, kind });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    /// Drop every pending animation-end notification
    pub fn cancel_animations(&mut self) {
        self.timers
            .retain(|t| !matches!(t.kind, TimerKind::AnimationEnd(_)));
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Timer> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))?;
        Some(self.timers.remove(index))
    }

    /// Earliest pending deadline, for hosts that sleep until the next timer
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|t| t.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
