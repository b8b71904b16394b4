//! Browser window binding for viewport size changes.
//!
//! Registers one closure for `resize` and `orientationchange` on the global
//! window and removes it again on drop, so listeners never outlive the view
//! that installed them.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::Viewport;

const EVENTS: [&str; 2] = ["resize", "orientationchange"];

/// Sample the window's inner size.
pub fn window_viewport(window: &Window) -> Option<Viewport> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width, height))
}

/// Window listener forwarding size changes to a callback.
pub struct DomResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl DomResizeListener {
    /// Install the listener. Returns `None` outside a browser window.
    pub fn attach(mut on_resize: impl FnMut(Viewport) + 'static) -> Option<Self> {
        let window = web_sys::window()?;

        let source = window.clone();
        let callback = Closure::<dyn FnMut()>::new(move || match window_viewport(&source) {
            Some(viewport) => on_resize(viewport),
            None => warn!("viewport: could not read window size"),
        });

        for event in EVENTS {
            if window
                .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                .is_err()
            {
                warn!("viewport: failed to register {event} listener");
            }
        }
        debug!("viewport: window listeners attached");

        Some(Self { window, callback })
    }
}

impl Drop for DomResizeListener {
    fn drop(&mut self) {
        for event in EVENTS {
            let _ = self
                .window
                .remove_event_listener_with_callback(event, self.callback.as_ref().unchecked_ref());
        }
        debug!("viewport: window listeners detached");
    }
}

impl std::fmt::Debug for DomResizeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomResizeListener").finish_non_exhaustive()
    }
}
