//! Smooth, frame-driven scrolling for viewports and scrollable elements
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves
//! - `timing` - Progress and interpolation helpers
//! - `target` - Scroll surface interface over windows and elements
//! - `lock` - Wheel input suppression while a run is in flight
//!
//! ## L3 Molecular Layer
//! - `driver` - The per-frame animation state machine
//!
//! ## L2 Organism Layer
//! - `api` - Convenience entry points (`Scroller`)
//!
//! Hosts plug in through [`FrameClock`], [`Viewport`], [`ScrollElement`] and
//! [`WheelSource`]. The `sim` module provides in-memory versions of each.
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use scrollease_core::{HostEnvironment, ManualClock, ScrollOptions, Scroller};
//! use scrollease_core::sim::SimViewport;
//!
//! let clock = Rc::new(ManualClock::new());
//! let viewport = Rc::new(SimViewport::new((1280.0, 800.0), (1280.0, 4000.0)));
//! let scroller = Scroller::new(clock.clone(), viewport, HostEnvironment::default());
//!
//! scroller.scroll_to_bottom(ScrollOptions::new().on_complete(|| println!("done")))?;
//! clock.run_until_idle(0.0, 16.0, 1000);
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod driver;
pub mod easing;
pub mod environment;
pub mod error;
pub mod lock;
pub mod sim;
pub mod target;
pub mod timing;

pub use api::{Edge, ScrollOptions, Scroller};
pub use clock::{FrameCallback, FrameClock, ManualClock};
pub use config::{AppConfig, ScrollConfig, SimulationConfig};
pub use driver::{AnimationRequest, AnimationRun, CompletionCallback, Driver, RunState, Step};
pub use easing::{EasingFn, EasingType};
pub use environment::{Browser, HostEnvironment, WheelEvent};
pub use error::{Error, Result};
pub use lock::ScrollLock;
pub use target::{ListenerId, ScrollElement, ScrollTarget, TargetKey, Viewport, WheelSource};
