//! L3 Molecular Layer: Animation driver
//!
//! An [`AnimationRun`] is the explicit state of one animation, advanced by
//! [`AnimationRun::advance`] once per frame. The [`Driver`] owns the wiring:
//! it takes the scroll lock, hands the run to the frame clock one frame at a
//! time, and finishes it.
//!
//! Each start against a target mints a new generation for that target. A run
//! whose generation is no longer current has been superseded: its remaining
//! frame does nothing, not even release the lock, which now belongs to the
//! newer run.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::clock::FrameClock;
use crate::easing::EasingFn;
use crate::lock::{Generation, ScrollLock};
use crate::target::{ScrollTarget, TargetKey};
use crate::timing::{is_complete, lerp, progress};
use crate::Result;

/// Called once when a run reaches its destination
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Everything needed to start one animation
pub struct AnimationRequest {
    pub target: ScrollTarget,
    pub destination_x: f64,
    pub destination_y: f64,
    pub duration_ms: f64,
    pub easing: EasingFn,
    pub on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("target", &self.target)
            .field("destination_x", &self.destination_x)
            .field("destination_y", &self.destination_y)
            .field("duration_ms", &self.duration_ms)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Start offsets captured, no frame seen yet
    Created,
    Running,
    Completed,
}

/// What one frame did to the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Interpolated offsets were written; another frame is needed
    Frame { x: f64, y: f64, elapsed: f64 },
    /// The exact destination was written; the run is over
    Finished { x: f64, y: f64 },
}

/// State of one in-flight animation
#[derive(Debug)]
pub struct AnimationRun {
    start_x: f64,
    start_y: f64,
    start_timestamp: Option<f64>,
    state: RunState,
    generation: Generation,
    request: AnimationRequest,
}

impl AnimationRun {
    /// Snapshot the target's current offsets as the start point
    pub fn new(request: AnimationRequest, generation: Generation) -> Self {
        Self {
            start_x: request.target.offset_x(),
            start_y: request.target.offset_y(),
            start_timestamp: None,
            state: RunState::Created,
            generation,
            request,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn start(&self) -> (f64, f64) {
        (self.start_x, self.start_y)
    }

    /// Timestamp of the first delivered frame, once one has arrived
    pub fn start_timestamp(&self) -> Option<f64> {
        self.start_timestamp
    }

    pub fn target(&self) -> &ScrollTarget {
        &self.request.target
    }

    /// Process the frame delivered at `timestamp`
    ///
    /// The first frame fixes the start timestamp, so its elapsed time is 0.
    /// Once elapsed strictly exceeds the duration, the exact destination is
    /// written and the run completes. Advancing a completed run writes
    /// nothing.
    pub fn advance(&mut self, timestamp: f64) -> Step {
        let destination = (self.request.destination_x, self.request.destination_y);
        if self.state == RunState::Completed {
            return Step::Finished {
                x: destination.0,
                y: destination.1,
            };
        }

        let started = *self.start_timestamp.get_or_insert(timestamp);
        self.state = RunState::Running;
        let elapsed = timestamp - started;

        if is_complete(elapsed, self.request.duration_ms) {
            self.request.target.set_offset(destination.0, destination.1);
            self.state = RunState::Completed;
            trace!(elapsed, x = destination.0, y = destination.1, "Final frame");
            return Step::Finished {
                x: destination.0,
                y: destination.1,
            };
        }

        let eased = (self.request.easing)(progress(elapsed, self.request.duration_ms));
        let x = lerp(self.start_x, destination.0, eased);
        let y = lerp(self.start_y, destination.1, eased);
        self.request.target.set_offset(x, y);
        trace!(elapsed, eased, x, y, "Frame");
        Step::Frame { x, y, elapsed }
    }

    /// Hand out the completion callback; yields it at most once
    pub fn take_on_complete(&mut self) -> Option<CompletionCallback> {
        self.request.on_complete.take()
    }
}

/// Runs animations on a frame clock
#[derive(Clone)]
pub struct Driver {
    clock: Rc<dyn FrameClock>,
    lock: Rc<ScrollLock>,
    next_generation: Rc<Cell<Generation>>,
    current: Rc<RefCell<HashMap<TargetKey, Generation>>>,
}

impl Driver {
    pub fn new(clock: Rc<dyn FrameClock>, lock: Rc<ScrollLock>) -> Self {
        Self {
            clock,
            lock,
            next_generation: Rc::new(Cell::new(1)),
            current: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn lock(&self) -> &ScrollLock {
        &self.lock
    }

    /// Start animating; returns before the first frame
    ///
    /// Fails if the scroll lock cannot be taken, in which case nothing is
    /// scheduled and any run already animating the target keeps going.
    pub fn start(&self, request: AnimationRequest) -> Result<()> {
        let key = request.target.key();
        let generation = self.next_generation.get();

        self.lock.acquire(&request.target, generation)?;
        self.next_generation.set(generation + 1);
        if let Some(previous) = self.current.borrow_mut().insert(key, generation) {
            debug!(?key, previous, generation, "Superseding running animation");
        }

        let run = AnimationRun::new(request, generation);
        debug!(
            ?key,
            generation,
            from_x = run.start_x,
            from_y = run.start_y,
            to_x = run.request.destination_x,
            to_y = run.request.destination_y,
            duration_ms = run.request.duration_ms,
            "Starting scroll animation"
        );
        self.schedule(run);
        Ok(())
    }

    /// Whether a run currently owns `target`
    pub fn is_animating(&self, target: &ScrollTarget) -> bool {
        self.current.borrow().contains_key(&target.key())
    }

    fn schedule(&self, run: AnimationRun) {
        let driver = self.clone();
        self.clock
            .schedule(Box::new(move |timestamp| driver.on_frame(run, timestamp)));
    }

    fn is_current(&self, run: &AnimationRun) -> bool {
        self.current.borrow().get(&run.target().key()) == Some(&run.generation)
    }

    fn on_frame(&self, mut run: AnimationRun, timestamp: f64) {
        if !self.is_current(&run) {
            debug!(generation = run.generation, "Dropping superseded animation");
            return;
        }

        match run.advance(timestamp) {
            Step::Frame { .. } => self.schedule(run),
            Step::Finished { .. } => self.finish(run),
        }
    }

    fn finish(&self, mut run: AnimationRun) {
        let key = run.target().key();
        self.current.borrow_mut().remove(&key);
        self.lock.release(run.target(), run.generation);
        debug!(?key, generation = run.generation, "Scroll animation complete");

        if let Some(on_complete) = run.take_on_complete() {
            on_complete();
        }
    }
}
