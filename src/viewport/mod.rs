//! Viewport dimensions, their lifecycle, and pointer panning.
//!
//! Live dimensions come from a `ViewportService` with an explicit
//! attach/detach lifecycle instead of global window state, so tests can
//! drive resizes directly. The browser binding lives in `dom`.

mod dom;
mod pan;

pub use dom::{DomResizeListener, window_viewport};
pub use pan::{
    PRIMARY_BUTTON, PanController, PointerSample, ScrollContainer, ScrollOffset, ScrollState,
};

use log::warn;
use serde::{Deserialize, Serialize};

/// Viewport size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-finite or negative dimensions with zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }
}

/// Owner of the current viewport size.
///
/// Resizes are only accepted between `attach` and `detach`, so a window event
/// delivered after teardown cannot trigger a recompute.
#[derive(Debug, Clone, Default)]
pub struct ViewportService {
    current: Viewport,
    attached: bool,
}

impl ViewportService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting resizes, seeded with the size sampled on mount.
    pub fn attach(&mut self, initial: Viewport) {
        self.attached = true;
        self.current = initial.sanitized();
    }

    /// Stop accepting resizes.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The last accepted viewport size.
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Record a new size. Returns true when the size changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !self.attached {
            warn!("viewport: resize to {}x{} while detached", viewport.width, viewport.height);
            return false;
        }

        let viewport = viewport.sanitized();
        if viewport == self.current {
            return false;
        }
        self.current = viewport;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized() {
        let vp = Viewport::new(f64::NAN, -5.0).sanitized();
        assert_eq!(vp, Viewport::new(0.0, 0.0));
    }

    #[test]
    fn test_resize_ignored_while_detached() {
        let mut service = ViewportService::new();
        assert!(!service.resize(Viewport::new(800.0, 600.0)));
        assert_eq!(service.current(), Viewport::default());
    }

    #[test]
    fn test_resize_reports_changes_only() {
        let mut service = ViewportService::new();
        service.attach(Viewport::new(1200.0, 800.0));

        assert!(service.resize(Viewport::new(1000.0, 700.0)));
        assert!(!service.resize(Viewport::new(1000.0, 700.0)));
        assert_eq!(service.current(), Viewport::new(1000.0, 700.0));
    }

    #[test]
    fn test_detach_stops_resizes() {
        let mut service = ViewportService::new();
        service.attach(Viewport::new(100.0, 100.0));
        service.detach();
        assert!(!service.is_attached());
        assert!(!service.resize(Viewport::new(400.0, 100.0)));
        assert_eq!(service.current(), Viewport::new(100.0, 100.0));
    }
}
