//! Browser host: `web-sys` implementations of the scrollease seams and the
//! `WebScroller` class exported to JavaScript.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, Window};

use scrollease_core::{
    Error, FrameCallback, FrameClock, HostEnvironment, ListenerId, ScrollElement, ScrollOptions,
    Scroller, Viewport, WheelEvent, WheelSource,
};

use crate::options::scroll_options;

/// Where a [`DomWheel`] attaches its listeners
enum WheelHost {
    Node(EventTarget),
    /// Whatever `document.body` is at the time of the attach
    Body(Window),
}

impl WheelHost {
    fn resolve(&self) -> Option<EventTarget> {
        match self {
            WheelHost::Node(target) => Some(target.clone()),
            WheelHost::Body(window) => window
                .document()
                .and_then(|document| document.body())
                .map(|body| body.unchecked_into()),
        }
    }
}

/// Wheel suppression on a DOM event target
///
/// Each listener is detached from the node it was attached to, even if the
/// host has since resolved to a different node.
struct DomWheel {
    host: WheelHost,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, (EventTarget, Closure<dyn FnMut(Event)>)>>,
}

impl DomWheel {
    fn new(host: WheelHost) -> Self {
        Self {
            host,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        }
    }
}

impl WheelSource for DomWheel {
    fn block_wheel(&self, event: WheelEvent) -> scrollease_core::Result<ListenerId> {
        let target = self
            .host
            .resolve()
            .ok_or_else(|| Error::InvalidTarget("document has no body yet".to_string()))?;
        let listener = Closure::<dyn FnMut(Event)>::new(|event: Event| event.prevent_default());
        // Engines default wheel listeners on the body to passive, which would
        // make preventDefault a no-op
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event.event_name(),
                listener.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| Error::InvalidTarget(format!("addEventListener failed: {e:?}")))?;

        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, (target, listener));
        Ok(id)
    }

    fn unblock_wheel(&self, event: WheelEvent, listener: ListenerId) {
        let Some((target, closure)) = self.listeners.borrow_mut().remove(&listener) else {
            return;
        };
        if let Err(e) = target.remove_event_listener_with_callback(
            event.event_name(),
            closure.as_ref().unchecked_ref(),
        ) {
            warn!(error = ?e, "removeEventListener failed");
        }
    }
}

fn js_number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
}

/// The browser window, with wheel suppression attached to `document.body`
struct WebViewport {
    window: Window,
    wheel: DomWheel,
}

impl WebViewport {
    fn new(window: Window) -> Self {
        let wheel = DomWheel::new(WheelHost::Body(window.clone()));
        Self { window, wheel }
    }
}

impl Viewport for WebViewport {
    fn scroll_x(&self) -> f64 {
        self.window.scroll_x().unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn scroll_to(&self, x: f64, y: f64) {
        self.window.scroll_to_with_x_and_y(x, y);
    }

    fn inner_size(&self) -> (f64, f64) {
        (
            js_number(self.window.inner_width()),
            js_number(self.window.inner_height()),
        )
    }

    fn document_scroll_size(&self) -> (f64, f64) {
        self.window
            .document()
            .and_then(|document| document.body())
            .map(|body| (body.scroll_width() as f64, body.scroll_height() as f64))
            .unwrap_or_default()
    }

    fn wheel_source(&self) -> Option<&dyn WheelSource> {
        Some(&self.wheel)
    }
}

/// Any JS value a caller passes as a scroll container
///
/// Read through `Reflect` so that objects without scroll fields surface as an
/// unsupported target instead of a trap.
struct JsElement {
    value: JsValue,
    wheel: Option<DomWheel>,
}

impl JsElement {
    fn new(value: JsValue) -> Self {
        let wheel = value
            .dyn_ref::<EventTarget>()
            .map(|target| DomWheel::new(WheelHost::Node(target.clone())));
        Self { value, wheel }
    }

    fn number(&self, key: &str) -> Option<f64> {
        Reflect::get(&self.value, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    }

    fn set_number(&self, key: &str, value: f64) {
        if let Err(e) = Reflect::set(&self.value, &JsValue::from_str(key), &JsValue::from_f64(value)) {
            warn!(key, error = ?e, "Failed to write scroll offset");
        }
    }
}

impl ScrollElement for JsElement {
    fn scroll_left(&self) -> Option<f64> {
        self.number("scrollLeft")
    }

    fn scroll_top(&self) -> Option<f64> {
        self.number("scrollTop")
    }

    fn set_scroll_left(&self, value: f64) {
        self.set_number("scrollLeft", value);
    }

    fn set_scroll_top(&self, value: f64) {
        self.set_number("scrollTop", value);
    }

    fn scroll_size(&self) -> (f64, f64) {
        (
            self.number("scrollWidth").unwrap_or_default(),
            self.number("scrollHeight").unwrap_or_default(),
        )
    }

    fn client_size(&self) -> (f64, f64) {
        (
            self.number("clientWidth").unwrap_or_default(),
            self.number("clientHeight").unwrap_or_default(),
        )
    }

    fn wheel_source(&self) -> Option<&dyn WheelSource> {
        self.wheel.as_ref().map(|w| w as &dyn WheelSource)
    }
}

/// `requestAnimationFrame` as a frame clock
struct RafClock {
    window: Window,
}

impl FrameClock for RafClock {
    fn schedule(&self, callback: FrameCallback) {
        let frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(e) = self.window.request_animation_frame(frame.unchecked_ref()) {
            error!(error = ?e, "requestAnimationFrame failed");
        }
    }
}

fn to_js(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn options(
    duration: Option<f64>,
    easing: Option<String>,
    callback: Option<Function>,
) -> Result<ScrollOptions, JsValue> {
    let mut options = scroll_options(duration, easing.as_deref()).map_err(to_js)?;
    if let Some(callback) = callback {
        options = options.on_complete(move || {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                error!(error = ?e, "Scroll completion callback threw");
            }
        });
    }
    Ok(options)
}

/// Smooth scrolling for the current window and its elements
#[wasm_bindgen]
pub struct WebScroller {
    scroller: Scroller,
    elements: RefCell<Vec<Rc<JsElement>>>,
}

impl WebScroller {
    /// One wrapper per JS object, so locks and run tokens see a stable identity
    fn element(&self, value: JsValue) -> Rc<JsElement> {
        let mut elements = self.elements.borrow_mut();
        // Entries nothing else references have no run in flight
        elements.retain(|element| Rc::strong_count(element) > 1);
        if let Some(existing) = elements.iter().find(|e| Object::is(&e.value, &value)) {
            return existing.clone();
        }
        let element = Rc::new(JsElement::new(value));
        elements.push(element.clone());
        element
    }
}

#[wasm_bindgen]
impl WebScroller {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebScroller, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let environment = HostEnvironment::from_user_agent(&user_agent);

        let clock = Rc::new(RafClock {
            window: window.clone(),
        });
        let viewport = Rc::new(WebViewport::new(window));
        Ok(WebScroller {
            scroller: Scroller::new(clock, viewport, environment),
            elements: RefCell::new(Vec::new()),
        })
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .scroll_to(x.unwrap_or_default(), y.unwrap_or_default(), options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollXTo)]
    pub fn scroll_x_to(
        &self,
        x: f64,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_x_to(x, options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollYTo)]
    pub fn scroll_y_to(
        &self,
        y: f64,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_y_to(y, options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollToTop)]
    pub fn scroll_to_top(
        &self,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_to_top(options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollToBottom)]
    pub fn scroll_to_bottom(
        &self,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_to_bottom(options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollToLeft)]
    pub fn scroll_to_left(
        &self,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_to_left(options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = scrollToRight)]
    pub fn scroll_to_right(
        &self,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller.scroll_to_right(options).map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollTo)]
    pub fn element_scroll_to(
        &self,
        element: JsValue,
        x: Option<f64>,
        y: Option<f64>,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_to(
                self.element(element),
                x.unwrap_or_default(),
                y.unwrap_or_default(),
                options,
            )
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollXTo)]
    pub fn element_scroll_x_to(
        &self,
        element: JsValue,
        x: f64,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_x_to(self.element(element), x, options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollYTo)]
    pub fn element_scroll_y_to(
        &self,
        element: JsValue,
        y: f64,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_y_to(self.element(element), y, options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollToTop)]
    pub fn element_scroll_to_top(
        &self,
        element: JsValue,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_to_top(self.element(element), options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollToBottom)]
    pub fn element_scroll_to_bottom(
        &self,
        element: JsValue,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_to_bottom(self.element(element), options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollToLeft)]
    pub fn element_scroll_to_left(
        &self,
        element: JsValue,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_to_left(self.element(element), options)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = elementScrollToRight)]
    pub fn element_scroll_to_right(
        &self,
        element: JsValue,
        duration: Option<f64>,
        easing: Option<String>,
        callback: Option<Function>,
    ) -> Result<(), JsValue> {
        let options = options(duration, easing, callback)?;
        self.scroller
            .element_scroll_to_right(self.element(element), options)
            .map_err(to_js)
    }
}
