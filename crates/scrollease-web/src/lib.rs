//! Browser bindings for scrollease.
//!
//! On `wasm32` this exports a `WebScroller` class that drives
//! `window.requestAnimationFrame`, scrolls the window or any element, and
//! blocks wheel input while an animation runs:
//!
//! ```js
//! const scroller = new WebScroller();
//! scroller.scrollToBottom(400, "cubic-out", () => console.log("done"));
//! scroller.elementScrollYTo(document.querySelector("#log"), 1200);
//! ```

pub mod options;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebScroller;

pub use scrollease_core::{Browser, HostEnvironment};
