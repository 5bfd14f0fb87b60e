//! L2 Organism Layer: Public scrolling API
//!
//! [`Scroller`] resolves the convenience forms (single axis, edges, omitted
//! duration and easing) into an [`AnimationRequest`] and hands it to the
//! [`Driver`]. Every call returns as soon as the animation is scheduled.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tracing::warn;

use crate::clock::FrameClock;
use crate::config::ScrollConfig;
use crate::driver::{AnimationRequest, CompletionCallback, Driver};
use crate::easing::{EasingFn, EasingType};
use crate::environment::HostEnvironment;
use crate::lock::ScrollLock;
use crate::target::{ScrollElement, ScrollTarget, Viewport};
use crate::{Error, Result};

/// Optional knobs for a scroll call
#[derive(Default)]
pub struct ScrollOptions {
    pub duration_ms: Option<f64>,
    pub easing: Option<EasingFn>,
    pub on_complete: Option<CompletionCallback>,
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn easing_type(self, easing: EasingType) -> Self {
        self.easing(easing.function())
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ScrollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOptions")
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// An edge of the scrollable area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            other => Err(Error::Config(format!("unknown edge: {other}"))),
        }
    }
}

/// Entry point for animated scrolling of a viewport and its elements
pub struct Scroller {
    driver: Driver,
    viewport: Rc<dyn Viewport>,
    defaults: ScrollConfig,
}

impl Scroller {
    /// Wire a scroller to a host
    ///
    /// `environment` is resolved once here and only picks the wheel event
    /// name used by the scroll lock.
    pub fn new(
        clock: Rc<dyn FrameClock>,
        viewport: Rc<dyn Viewport>,
        environment: HostEnvironment,
    ) -> Self {
        let lock = Rc::new(ScrollLock::new(environment));
        Self {
            driver: Driver::new(clock, lock),
            viewport,
            defaults: ScrollConfig::default(),
        }
    }

    /// Replace the duration and easing used when a call leaves them out
    pub fn with_defaults(mut self, defaults: ScrollConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &ScrollConfig {
        &self.defaults
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn window(&self) -> ScrollTarget {
        ScrollTarget::window(self.viewport.clone())
    }

    // Window

    pub fn scroll_to(&self, x: f64, y: f64, options: ScrollOptions) -> Result<()> {
        self.animate(self.window(), x, y, options)
    }

    pub fn scroll_x_to(&self, x: f64, options: ScrollOptions) -> Result<()> {
        self.animate_x(self.window(), x, options)
    }

    pub fn scroll_y_to(&self, y: f64, options: ScrollOptions) -> Result<()> {
        self.animate_y(self.window(), y, options)
    }

    pub fn scroll_to_edge(&self, edge: Edge, options: ScrollOptions) -> Result<()> {
        self.animate_edge(self.window(), edge, options)
    }

    pub fn scroll_to_top(&self, options: ScrollOptions) -> Result<()> {
        self.scroll_to_edge(Edge::Top, options)
    }

    pub fn scroll_to_bottom(&self, options: ScrollOptions) -> Result<()> {
        self.scroll_to_edge(Edge::Bottom, options)
    }

    pub fn scroll_to_left(&self, options: ScrollOptions) -> Result<()> {
        self.scroll_to_edge(Edge::Left, options)
    }

    pub fn scroll_to_right(&self, options: ScrollOptions) -> Result<()> {
        self.scroll_to_edge(Edge::Right, options)
    }

    // Elements

    pub fn element_scroll_to(
        &self,
        element: Rc<dyn ScrollElement>,
        x: f64,
        y: f64,
        options: ScrollOptions,
    ) -> Result<()> {
        self.animate(ScrollTarget::element(element)?, x, y, options)
    }

    pub fn element_scroll_x_to(
        &self,
        element: Rc<dyn ScrollElement>,
        x: f64,
        options: ScrollOptions,
    ) -> Result<()> {
        self.animate_x(ScrollTarget::element(element)?, x, options)
    }

    pub fn element_scroll_y_to(
        &self,
        element: Rc<dyn ScrollElement>,
        y: f64,
        options: ScrollOptions,
    ) -> Result<()> {
        self.animate_y(ScrollTarget::element(element)?, y, options)
    }

    pub fn element_scroll_to_edge(
        &self,
        element: Rc<dyn ScrollElement>,
        edge: Edge,
        options: ScrollOptions,
    ) -> Result<()> {
        self.animate_edge(ScrollTarget::element(element)?, edge, options)
    }

    pub fn element_scroll_to_top(
        &self,
        element: Rc<dyn ScrollElement>,
        options: ScrollOptions,
    ) -> Result<()> {
        self.element_scroll_to_edge(element, Edge::Top, options)
    }

    pub fn element_scroll_to_bottom(
        &self,
        element: Rc<dyn ScrollElement>,
        options: ScrollOptions,
    ) -> Result<()> {
        self.element_scroll_to_edge(element, Edge::Bottom, options)
    }

    pub fn element_scroll_to_left(
        &self,
        element: Rc<dyn ScrollElement>,
        options: ScrollOptions,
    ) -> Result<()> {
        self.element_scroll_to_edge(element, Edge::Left, options)
    }

    pub fn element_scroll_to_right(
        &self,
        element: Rc<dyn ScrollElement>,
        options: ScrollOptions,
    ) -> Result<()> {
        self.element_scroll_to_edge(element, Edge::Right, options)
    }

    // Shared resolution

    fn animate_x(&self, target: ScrollTarget, x: f64, options: ScrollOptions) -> Result<()> {
        let y = target.offset_y();
        self.animate(target, x, y, options)
    }

    fn animate_y(&self, target: ScrollTarget, y: f64, options: ScrollOptions) -> Result<()> {
        let x = target.offset_x();
        self.animate(target, x, y, options)
    }

    fn animate_edge(&self, target: ScrollTarget, edge: Edge, options: ScrollOptions) -> Result<()> {
        match edge {
            Edge::Top => self.animate_y(target, 0.0, options),
            Edge::Bottom => {
                let y = target.max_scroll_y();
                self.animate_y(target, y, options)
            }
            Edge::Left => self.animate_x(target, 0.0, options),
            Edge::Right => {
                let x = target.max_scroll_x();
                self.animate_x(target, x, options)
            }
        }
    }

    fn animate(&self, target: ScrollTarget, x: f64, y: f64, options: ScrollOptions) -> Result<()> {
        let mut duration_ms = options.duration_ms.unwrap_or(self.defaults.duration_ms);
        // Elapsed time never exceeds NaN or infinity
        if !duration_ms.is_finite() {
            warn!(duration_ms, "Non-finite duration, finishing immediately");
            duration_ms = 0.0;
        }
        self.driver.start(AnimationRequest {
            target,
            destination_x: x,
            destination_y: y,
            duration_ms,
            easing: options.easing.unwrap_or_else(|| self.defaults.easing_fn()),
            on_complete: options.on_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::clock::ManualClock;
    use crate::easing::linear;
    use crate::sim::{SimElement, SimViewport};

    struct Host {
        clock: Rc<ManualClock>,
        viewport: Rc<SimViewport>,
        scroller: Scroller,
    }

    fn host() -> Host {
        let clock = Rc::new(ManualClock::new());
        let viewport = Rc::new(SimViewport::new((1000.0, 800.0), (3000.0, 5000.0)));
        let scroller = Scroller::new(clock.clone(), viewport.clone(), HostEnvironment::default());
        Host {
            clock,
            viewport,
            scroller,
        }
    }

    fn linear_over(duration_ms: f64) -> ScrollOptions {
        ScrollOptions::new().duration(duration_ms).easing(linear)
    }

    #[test]
    fn test_scroll_to_completes_once() {
        let h = host();
        let calls = Rc::new(Cell::new(0));
        let inner = calls.clone();
        h.scroller
            .scroll_to(0.0, 500.0, linear_over(300.0).on_complete(move || inner.set(inner.get() + 1)))
            .unwrap();

        for t in [0.0, 100.0, 200.0, 300.0, 301.0, 400.0] {
            h.clock.tick(t);
        }
        assert_eq!(h.viewport.offset(), (0.0, 500.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_defaults_are_300ms_cubic_in_out() {
        let h = host();
        h.scroller.scroll_y_to(1000.0, ScrollOptions::new()).unwrap();
        h.clock.tick(0.0);
        h.clock.tick(150.0);
        // cubic-in-out passes through the midpoint at half time
        assert_eq!(h.viewport.offset(), (0.0, 500.0));
        h.clock.tick(300.0);
        assert_eq!(h.clock.pending(), 1);
        h.clock.tick(300.1);
        assert_eq!(h.clock.pending(), 0);
        assert_eq!(h.viewport.offset(), (0.0, 1000.0));
    }

    #[test]
    fn test_configured_defaults_apply() {
        let clock = Rc::new(ManualClock::new());
        let viewport = Rc::new(SimViewport::new((1000.0, 800.0), (3000.0, 5000.0)));
        let scroller = Scroller::new(clock.clone(), viewport.clone(), HostEnvironment::default())
            .with_defaults(ScrollConfig {
                duration_ms: 100.0,
                easing: EasingType::Linear,
            });
        scroller.scroll_y_to(200.0, ScrollOptions::new()).unwrap();
        clock.tick(0.0);
        clock.tick(25.0);
        assert_eq!(viewport.offset(), (0.0, 50.0));
    }

    #[test]
    fn test_single_axis_keeps_other_axis() {
        let h = host();
        h.viewport.set_offset(120.0, 340.0);
        h.scroller.scroll_x_to(600.0, linear_over(100.0)).unwrap();
        h.clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (600.0, 340.0));
        assert!(h.viewport.writes().iter().all(|&(_, y)| y == 340.0));

        h.scroller.scroll_y_to(10.0, linear_over(100.0)).unwrap();
        h.clock.run_until_idle(1000.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (600.0, 10.0));
    }

    #[test]
    fn test_window_edges() {
        let h = host();
        h.scroller.scroll_to_bottom(linear_over(50.0)).unwrap();
        h.clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (0.0, 4200.0));

        h.scroller.scroll_to_right(linear_over(50.0)).unwrap();
        h.clock.run_until_idle(100.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (2000.0, 4200.0));

        h.scroller.scroll_to_top(linear_over(50.0)).unwrap();
        h.clock.run_until_idle(200.0, 16.0, 50);
        h.scroller.scroll_to_left(linear_over(50.0)).unwrap();
        h.clock.run_until_idle(300.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_edge_reads_layout_at_call_time() {
        let h = host();
        h.viewport.set_document_size((3000.0, 10_800.0));
        h.scroller.scroll_to_bottom(linear_over(50.0)).unwrap();
        h.viewport.set_document_size((3000.0, 900.0));
        h.clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(h.viewport.offset(), (0.0, 10_000.0));
    }

    #[test]
    fn test_element_scroll_to_bottom() {
        let h = host();
        let element = Rc::new(SimElement::new((400.0, 1000.0), (400.0, 400.0)));
        h.scroller
            .element_scroll_to_bottom(element.clone(), linear_over(200.0))
            .unwrap();
        h.clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(element.offset(), (0.0, 600.0));
        assert!(h.viewport.writes().is_empty());
    }

    #[test]
    fn test_element_axes_and_edges() {
        let h = host();
        let element = Rc::new(SimElement::new((900.0, 1000.0), (300.0, 400.0)));
        element.set_offset(10.0, 20.0);

        h.scroller.element_scroll_x_to(element.clone(), 250.0, linear_over(40.0)).unwrap();
        h.clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(element.offset(), (250.0, 20.0));

        h.scroller.element_scroll_to_right(element.clone(), linear_over(40.0)).unwrap();
        h.clock.run_until_idle(100.0, 16.0, 50);
        assert_eq!(element.offset(), (600.0, 20.0));

        h.scroller.element_scroll_y_to(element.clone(), 90.0, linear_over(40.0)).unwrap();
        h.clock.run_until_idle(200.0, 16.0, 50);
        assert_eq!(element.offset(), (600.0, 90.0));

        h.scroller.element_scroll_to(element.clone(), 1.0, 2.0, linear_over(40.0)).unwrap();
        h.clock.run_until_idle(300.0, 16.0, 50);
        assert_eq!(element.offset(), (1.0, 2.0));

        h.scroller.element_scroll_to_top(element.clone(), linear_over(40.0)).unwrap();
        h.clock.run_until_idle(400.0, 16.0, 50);
        h.scroller.element_scroll_to_left(element.clone(), linear_over(40.0)).unwrap();
        h.clock.run_until_idle(500.0, 16.0, 50);
        assert_eq!(element.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_unsupported_element_fails_before_scheduling() {
        let h = host();
        let element = Rc::new(SimElement::without_scroll_offsets());
        let err = h
            .scroller
            .element_scroll_to(element.clone(), 0.0, 100.0, ScrollOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget(_)));
        assert_eq!(h.clock.scheduled(), 0);
        assert_eq!(element.listener_log().attached, 0);
    }

    #[test]
    fn test_element_without_listeners_fails_before_scheduling() {
        let h = host();
        let element = Rc::new(SimElement::new((10.0, 10.0), (10.0, 10.0)).without_listeners());
        let err = h
            .scroller
            .element_scroll_to_top(element.clone(), ScrollOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));
        assert_eq!(h.clock.scheduled(), 0);
        assert!(element.writes().is_empty());
    }

    #[test]
    fn test_noop_destination_still_runs_full_duration() {
        let h = host();
        h.viewport.set_offset(0.0, 250.0);
        let done = Rc::new(Cell::new(None));
        let inner = done.clone();
        let clock = h.clock.clone();
        h.scroller
            .scroll_to(
                0.0,
                250.0,
                linear_over(300.0).on_complete(move || inner.set(clock.last_timestamp())),
            )
            .unwrap();

        let frames = h.clock.run_until_idle(0.0, 16.0, 100);
        assert_eq!(frames, 20);
        assert_eq!(done.get(), Some(304.0));
        assert!(h.viewport.writes().iter().all(|&w| w == (0.0, 250.0)));
    }

    #[test]
    fn test_wheel_blocked_only_while_animating() {
        let h = host();
        assert!(!h.viewport.is_wheel_blocked());
        h.scroller.scroll_to(0.0, 100.0, linear_over(32.0)).unwrap();
        assert!(h.viewport.is_wheel_blocked());
        assert!(h.scroller.driver().lock().is_locked(&h.scroller.window()));
        h.clock.run_until_idle(0.0, 16.0, 10);
        assert!(!h.viewport.is_wheel_blocked());
        assert!(!h.scroller.driver().lock().is_locked(&h.scroller.window()));
    }

    #[test]
    fn test_callback_can_start_next_animation() {
        let clock = Rc::new(ManualClock::new());
        let viewport = Rc::new(SimViewport::new((1000.0, 800.0), (3000.0, 5000.0)));
        let scroller = Rc::new(Scroller::new(clock.clone(), viewport.clone(), HostEnvironment::default()));

        let chained = scroller.clone();
        scroller
            .scroll_y_to(
                100.0,
                linear_over(20.0).on_complete(move || {
                    chained.scroll_y_to(300.0, linear_over(20.0)).unwrap();
                }),
            )
            .unwrap();
        clock.run_until_idle(0.0, 16.0, 50);
        assert_eq!(viewport.offset(), (0.0, 300.0));
        assert_eq!(viewport.listener_log().attached, 2);
        assert_eq!(viewport.listener_log().detached, 2);
    }

    #[test]
    fn test_non_finite_duration_finishes_like_zero() {
        for duration_ms in [f64::NAN, f64::INFINITY] {
            let h = host();
            let done = Rc::new(Cell::new(false));
            let inner = done.clone();
            h.scroller
                .scroll_y_to(400.0, linear_over(duration_ms).on_complete(move || inner.set(true)))
                .unwrap();

            let frames = h.clock.run_until_idle(0.0, 16.0, 100);
            assert_eq!(frames, 2);
            assert_eq!(h.viewport.offset(), (0.0, 400.0));
            assert!(done.get());
            assert!(!h.viewport.is_wheel_blocked());
        }
    }

    #[test]
    fn test_parse_edge() {
        assert_eq!("Bottom".parse::<Edge>().unwrap(), Edge::Bottom);
        assert!("middle".parse::<Edge>().is_err());
    }
}
