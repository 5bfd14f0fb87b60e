//! Host environment descriptor
//!
//! Resolved once by whoever wires up a [`crate::Scroller`] and handed to the
//! scroll lock, which only uses it to pick the wheel event name.

use std::fmt;

/// The "user is scrolling" event a host fires for wheel input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelEvent {
    /// `mousewheel`, used by every engine except Gecko
    MouseWheel,
    /// `DOMMouseScroll`, Gecko's legacy name
    DomMouseScroll,
}

impl WheelEvent {
    pub fn event_name(self) -> &'static str {
        match self {
            WheelEvent::MouseWheel => "mousewheel",
            WheelEvent::DomMouseScroll => "DOMMouseScroll",
        }
    }
}

impl fmt::Display for WheelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Browser families that matter for wheel suppression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Firefox,
    Other,
}

impl Browser {
    /// Identify the browser from a `navigator.userAgent` string
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("firefox/") {
            Browser::Firefox
        } else {
            Browser::Other
        }
    }
}

/// Everything the scroll lock needs to know about its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEnvironment {
    pub browser: Browser,
}

impl HostEnvironment {
    pub fn new(browser: Browser) -> Self {
        Self { browser }
    }

    pub fn from_user_agent(user_agent: &str) -> Self {
        Self::new(Browser::from_user_agent(user_agent))
    }

    pub fn wheel_event(&self) -> WheelEvent {
        match self.browser {
            Browser::Firefox => WheelEvent::DomMouseScroll,
            Browser::Other => WheelEvent::MouseWheel,
        }
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new(Browser::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const FIREFOX_IOS_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/127.0 Mobile/15E148 Safari/605.1.15";

    #[test]
    fn test_firefox_uses_dom_mouse_scroll() {
        let env = HostEnvironment::from_user_agent(FIREFOX_UA);
        assert_eq!(env.browser, Browser::Firefox);
        assert_eq!(env.wheel_event().event_name(), "DOMMouseScroll");
    }

    #[test]
    fn test_other_browsers_use_mousewheel() {
        let env = HostEnvironment::from_user_agent(CHROME_UA);
        assert_eq!(env.browser, Browser::Other);
        assert_eq!(env.wheel_event().event_name(), "mousewheel");
        assert_eq!(HostEnvironment::default().wheel_event(), WheelEvent::MouseWheel);
    }

    #[test]
    fn test_firefox_on_ios_is_webkit() {
        let env = HostEnvironment::from_user_agent(FIREFOX_IOS_UA);
        assert_eq!(env.browser, Browser::Other);
        assert_eq!(env.wheel_event(), WheelEvent::MouseWheel);
    }
}
