//! L4 Atomic Layer: Scroll surfaces
//!
//! [`ScrollTarget`] gives the driver one read/write/bounds interface over the
//! two kinds of surface a host can scroll: the viewport and an element. The
//! host implements [`Viewport`] and [`ScrollElement`]; nothing here clamps,
//! caches, or rounds.

use std::fmt;
use std::rc::Rc;

use crate::environment::WheelEvent;
use crate::{Error, Result};

/// Handle to a listener attached by a [`WheelSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Something that can swallow wheel input
pub trait WheelSource {
    /// Attach a listener on `event` that prevents its default handling
    fn block_wheel(&self, event: WheelEvent) -> Result<ListenerId>;

    /// Remove a listener previously returned by [`WheelSource::block_wheel`]
    fn unblock_wheel(&self, event: WheelEvent, listener: ListenerId);
}

/// The host's viewport (a browser window)
pub trait Viewport {
    fn scroll_x(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, x: f64, y: f64);
    /// Visible size as (width, height)
    fn inner_size(&self) -> (f64, f64);
    /// Full scrollable document size as (width, height)
    fn document_scroll_size(&self) -> (f64, f64);
    /// Where wheel suppression for the viewport is attached, if anywhere
    fn wheel_source(&self) -> Option<&dyn WheelSource>;
}

/// A scrollable element
///
/// Offsets are optional: a host object may lack them entirely, in which case
/// it cannot become a [`ScrollTarget`].
pub trait ScrollElement {
    fn scroll_left(&self) -> Option<f64>;
    fn scroll_top(&self) -> Option<f64>;
    fn set_scroll_left(&self, value: f64);
    fn set_scroll_top(&self, value: f64);
    /// Content size as (width, height)
    fn scroll_size(&self) -> (f64, f64);
    /// Visible size as (width, height)
    fn client_size(&self) -> (f64, f64);
    fn wheel_source(&self) -> Option<&dyn WheelSource>;
}

/// Identity of a target, used to key scroll locks and run tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Window,
    Element(usize),
}

/// A validated scroll surface
#[derive(Clone)]
pub enum ScrollTarget {
    Window(Rc<dyn Viewport>),
    Element(Rc<dyn ScrollElement>),
}

impl ScrollTarget {
    pub fn window(viewport: Rc<dyn Viewport>) -> Self {
        ScrollTarget::Window(viewport)
    }

    /// Wrap an element, failing if it has no readable scroll offsets
    pub fn element(element: Rc<dyn ScrollElement>) -> Result<Self> {
        if element.scroll_top().is_none() {
            return Err(Error::UnsupportedTarget(
                "element has no readable vertical scroll offset".to_string(),
            ));
        }
        if element.scroll_left().is_none() {
            return Err(Error::UnsupportedTarget(
                "element has no readable horizontal scroll offset".to_string(),
            ));
        }
        Ok(ScrollTarget::Element(element))
    }

    pub fn key(&self) -> TargetKey {
        match self {
            ScrollTarget::Window(_) => TargetKey::Window,
            ScrollTarget::Element(element) => {
                TargetKey::Element(Rc::as_ptr(element) as *const () as usize)
            }
        }
    }

    pub fn offset_x(&self) -> f64 {
        match self {
            ScrollTarget::Window(viewport) => viewport.scroll_x(),
            ScrollTarget::Element(element) => element.scroll_left().unwrap_or_default(),
        }
    }

    pub fn offset_y(&self) -> f64 {
        match self {
            ScrollTarget::Window(viewport) => viewport.scroll_y(),
            ScrollTarget::Element(element) => element.scroll_top().unwrap_or_default(),
        }
    }

    /// Write both offsets; out-of-range values go to the surface untouched
    pub fn set_offset(&self, x: f64, y: f64) {
        match self {
            ScrollTarget::Window(viewport) => viewport.scroll_to(x, y),
            ScrollTarget::Element(element) => {
                element.set_scroll_left(x);
                element.set_scroll_top(y);
            }
        }
    }

    /// Largest reachable horizontal offset, read from current layout
    pub fn max_scroll_x(&self) -> f64 {
        match self {
            ScrollTarget::Window(viewport) => {
                viewport.document_scroll_size().0 - viewport.inner_size().0
            }
            ScrollTarget::Element(element) => element.scroll_size().0 - element.client_size().0,
        }
    }

    /// Largest reachable vertical offset, read from current layout
    pub fn max_scroll_y(&self) -> f64 {
        match self {
            ScrollTarget::Window(viewport) => {
                viewport.document_scroll_size().1 - viewport.inner_size().1
            }
            ScrollTarget::Element(element) => element.scroll_size().1 - element.client_size().1,
        }
    }

    pub fn wheel_source(&self) -> Option<&dyn WheelSource> {
        match self {
            ScrollTarget::Window(viewport) => viewport.wheel_source(),
            ScrollTarget::Element(element) => element.wheel_source(),
        }
    }
}

impl fmt::Debug for ScrollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            TargetKey::Window => f.write_str("ScrollTarget::Window"),
            TargetKey::Element(addr) => write!(f, "ScrollTarget::Element({addr:#x})"),
        }
    }
}
