// SPDX-License-Identifier: GPL-3.0-only

//! Sequencer state

use crate::backends::camera::CameraFrame;
use crate::constants::timing;
use std::time::{Duration, Instant};

/// Coarse phase of the capture cycle at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the shutter button
    Idle,
    /// Countdown running, relays engaging
    CountingDown,
    /// Fire offset reached. The tick that observes this fires the shutter
    /// and resets to idle before returning, so it is only seen by queries
    /// made with a later `now` than the last tick.
    Firing,
}

/// Mutable core of the sequencer, owned by the tick loop
///
/// `focus_locked` and `lights_on` latch within one armed cycle and are
/// both false whenever the sequencer is idle.
#[derive(Debug, Clone, Default)]
pub struct SequencerState {
    armed_at: Option<Instant>,
    focus_locked: bool,
    lights_on: bool,
    last_frame: Option<CameraFrame>,
}

impl SequencerState {
    /// When the current countdown started; `None` while idle
    pub fn armed_at(&self) -> Option<Instant> {
        self.armed_at
    }

    pub fn focus_locked(&self) -> bool {
        self.focus_locked
    }

    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    /// Most recent non-empty camera frame
    pub fn last_frame(&self) -> Option<&CameraFrame> {
        self.last_frame.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Time since the countdown started
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.armed_at.map(|at| now.saturating_duration_since(at))
    }

    pub fn phase(&self, now: Instant) -> Phase {
        match self.elapsed(now) {
            None => Phase::Idle,
            Some(elapsed) if elapsed >= timing::FIRE_AT => Phase::Firing,
            Some(_) => Phase::CountingDown,
        }
    }

    /// Start a fresh countdown at `now`. Latches are cleared because the
    /// caller has just released every relay.
    pub(crate) fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
        self.focus_locked = false;
        self.lights_on = false;
    }

    pub(crate) fn lock_focus(&mut self) {
        self.focus_locked = true;
    }

    pub(crate) fn switch_lights_on(&mut self) {
        self.lights_on = true;
    }

    /// Back to idle at the end of a cycle. The last frame is kept; it is
    /// still the newest picture the camera produced.
    pub(crate) fn reset(&mut self) {
        self.armed_at = None;
        self.focus_locked = false;
        self.lights_on = false;
    }

    /// Remember `frame` unless it carries no pixels
    pub(crate) fn store_frame(&mut self, frame: CameraFrame) {
        if !frame.is_empty() {
            self.last_frame = Some(frame);
        }
    }
}
