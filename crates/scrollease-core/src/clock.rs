//! Frame clock seam
//!
//! The host schedules one callback per display refresh and hands it a
//! monotonic timestamp in milliseconds. [`ManualClock`] is a host-free clock
//! driven by explicit timestamps, for tests and simulation.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A callback waiting for its frame
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host scheduler that fires each callback once, on a later frame
pub trait FrameClock {
    fn schedule(&self, callback: FrameCallback);
}

/// Frame clock that fires only when told to
#[derive(Default)]
pub struct ManualClock {
    pending: RefCell<VecDeque<FrameCallback>>,
    scheduled: Cell<usize>,
    last_timestamp: Cell<Option<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one frame at `timestamp` to every callback pending right now
    ///
    /// Callbacks registered while the frame runs wait for the next tick.
    /// Returns how many callbacks fired.
    pub fn tick(&self, timestamp: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        self.last_timestamp.set(Some(timestamp));
        let fired = due.len();
        for callback in due {
            callback(timestamp);
        }
        fired
    }

    /// Tick every `interval` ms starting at `start` until nothing is pending
    ///
    /// Gives up after `max_frames` ticks and returns the number of ticks run.
    pub fn run_until_idle(&self, start: f64, interval: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        let mut timestamp = start;
        while self.pending() > 0 && frames < max_frames {
            self.tick(timestamp);
            timestamp += interval;
            frames += 1;
        }
        frames
    }

    /// Callbacks waiting for the next tick
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Total number of `schedule` calls so far
    pub fn scheduled(&self) -> usize {
        self.scheduled.get()
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp.get()
    }
}

impl FrameClock for ManualClock {
    fn schedule(&self, callback: FrameCallback) {
        self.scheduled.set(self.scheduled.get() + 1);
        self.pending.borrow_mut().push_back(callback);
    }
}
