//! In-memory scroll surfaces
//!
//! Host-free [`Viewport`] and [`ScrollElement`] implementations that record
//! every offset write and every wheel listener attach/detach. Used by the CLI
//! simulator and by tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::environment::WheelEvent;
use crate::target::{ListenerId, ScrollElement, Viewport, WheelSource};
use crate::Result;

/// Wheel listener bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListenerLog {
    pub attached: usize,
    pub detached: usize,
    /// Event name of every attach and detach, in order
    pub events: Vec<WheelEvent>,
}

#[derive(Debug, Default)]
struct SimWheel {
    next_id: Cell<u64>,
    active: RefCell<HashSet<ListenerId>>,
    log: RefCell<ListenerLog>,
}

impl WheelSource for SimWheel {
    fn block_wheel(&self, event: WheelEvent) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.active.borrow_mut().insert(id);
        let mut log = self.log.borrow_mut();
        log.attached += 1;
        log.events.push(event);
        Ok(id)
    }

    fn unblock_wheel(&self, event: WheelEvent, listener: ListenerId) {
        if self.active.borrow_mut().remove(&listener) {
            let mut log = self.log.borrow_mut();
            log.detached += 1;
            log.events.push(event);
        }
    }
}

/// Simulated browser window
#[derive(Debug)]
pub struct SimViewport {
    offset: Cell<(f64, f64)>,
    inner_size: (f64, f64),
    document_size: Cell<(f64, f64)>,
    writes: RefCell<Vec<(f64, f64)>>,
    wheel: Option<SimWheel>,
}

impl SimViewport {
    pub fn new(inner_size: (f64, f64), document_size: (f64, f64)) -> Self {
        Self {
            offset: Cell::new((0.0, 0.0)),
            inner_size,
            document_size: Cell::new(document_size),
            writes: RefCell::new(Vec::new()),
            wheel: Some(SimWheel::default()),
        }
    }

    /// A viewport whose document cannot take event listeners
    pub fn without_listeners(mut self) -> Self {
        self.wheel = None;
        self
    }

    /// Move without recording a write
    pub fn set_offset(&self, x: f64, y: f64) {
        self.offset.set((x, y));
    }

    pub fn set_document_size(&self, size: (f64, f64)) {
        self.document_size.set(size);
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset.get()
    }

    /// Every `scroll_to` call, oldest first
    pub fn writes(&self) -> Vec<(f64, f64)> {
        self.writes.borrow().clone()
    }

    pub fn listener_log(&self) -> ListenerLog {
        self.wheel
            .as_ref()
            .map(|w| w.log.borrow().clone())
            .unwrap_or_default()
    }

    pub fn active_listeners(&self) -> usize {
        self.wheel.as_ref().map_or(0, |w| w.active.borrow().len())
    }

    /// Whether user wheel input would currently be swallowed
    pub fn is_wheel_blocked(&self) -> bool {
        self.active_listeners() > 0
    }
}

impl Viewport for SimViewport {
    fn scroll_x(&self) -> f64 {
        self.offset.get().0
    }

    fn scroll_y(&self) -> f64 {
        self.offset.get().1
    }

    fn scroll_to(&self, x: f64, y: f64) {
        self.offset.set((x, y));
        self.writes.borrow_mut().push((x, y));
    }

    fn inner_size(&self) -> (f64, f64) {
        self.inner_size
    }

    fn document_scroll_size(&self) -> (f64, f64) {
        self.document_size.get()
    }

    fn wheel_source(&self) -> Option<&dyn WheelSource> {
        self.wheel.as_ref().map(|w| w as &dyn WheelSource)
    }
}

/// Simulated scrollable element
#[derive(Debug)]
pub struct SimElement {
    offset: Option<Cell<(f64, f64)>>,
    scroll_size: (f64, f64),
    client_size: (f64, f64),
    writes: RefCell<Vec<(f64, f64)>>,
    wheel: Option<SimWheel>,
}

impl SimElement {
    pub fn new(scroll_size: (f64, f64), client_size: (f64, f64)) -> Self {
        Self {
            offset: Some(Cell::new((0.0, 0.0))),
            scroll_size,
            client_size,
            writes: RefCell::new(Vec::new()),
            wheel: Some(SimWheel::default()),
        }
    }

    /// An object with no scroll offsets at all
    pub fn without_scroll_offsets() -> Self {
        Self {
            offset: None,
            ..Self::new((0.0, 0.0), (0.0, 0.0))
        }
    }

    /// An element that cannot take event listeners
    pub fn without_listeners(mut self) -> Self {
        self.wheel = None;
        self
    }

    /// Move without recording a write
    pub fn set_offset(&self, x: f64, y: f64) {
        if let Some(offset) = &self.offset {
            offset.set((x, y));
        }
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset.as_ref().map_or((0.0, 0.0), Cell::get)
    }

    /// Offsets after every write to either axis, oldest first
    pub fn writes(&self) -> Vec<(f64, f64)> {
        self.writes.borrow().clone()
    }

    pub fn listener_log(&self) -> ListenerLog {
        self.wheel
            .as_ref()
            .map(|w| w.log.borrow().clone())
            .unwrap_or_default()
    }

    pub fn active_listeners(&self) -> usize {
        self.wheel.as_ref().map_or(0, |w| w.active.borrow().len())
    }

    pub fn is_wheel_blocked(&self) -> bool {
        self.active_listeners() > 0
    }

    fn write(&self, update: impl FnOnce(&mut (f64, f64))) {
        if let Some(offset) = &self.offset {
            let mut value = offset.get();
            update(&mut value);
            offset.set(value);
            self.writes.borrow_mut().push(value);
        }
    }
}

impl ScrollElement for SimElement {
    fn scroll_left(&self) -> Option<f64> {
        self.offset.as_ref().map(|o| o.get().0)
    }

    fn scroll_top(&self) -> Option<f64> {
        self.offset.as_ref().map(|o| o.get().1)
    }

    fn set_scroll_left(&self, value: f64) {
        self.write(|offset| offset.0 = value);
    }

    fn set_scroll_top(&self, value: f64) {
        self.write(|offset| offset.1 = value);
    }

    fn scroll_size(&self) -> (f64, f64) {
        self.scroll_size
    }

    fn client_size(&self) -> (f64, f64) {
        self.client_size
    }

    fn wheel_source(&self) -> Option<&dyn WheelSource> {
        self.wheel.as_ref().map(|w| w as &dyn WheelSource)
    }
}
