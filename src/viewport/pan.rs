//! Drag-to-pan over a scrollable container.
//!
//! Idle → Dragging on a primary-button press that does not land on a node;
//! Dragging → Idle on release anywhere. While dragging, pointer movement is
//! scaled by the pan speed and written straight into the container's scroll
//! offsets.

use serde::Serialize;

/// `MouseEvent.button` value of the primary button.
pub const PRIMARY_BUTTON: i16 = 0;

/// Scroll position of a container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// One pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub page_x: f64,
    pub page_y: f64,
    pub button: i16,
    /// The event target is an interactive node.
    pub on_node: bool,
}

/// A scrollable element the controller can read and drive.
pub trait ScrollContainer {
    /// Page position of the container's top-left corner.
    fn origin(&self) -> (f64, f64);
    fn scroll_offset(&self) -> ScrollOffset;
    fn set_scroll_offset(&mut self, offset: ScrollOffset);
}

/// Plain in-memory container state, used when the DOM lives on the JS side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub origin_x: f64,
    pub origin_y: f64,
    pub offset: ScrollOffset,
}

impl ScrollContainer for ScrollState {
    fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: ScrollOffset) {
        self.offset = offset;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PanState {
    Idle,
    Dragging {
        start_x: f64,
        start_y: f64,
        scroll_start: ScrollOffset,
    },
}

/// The pan state machine.
#[derive(Debug, Clone)]
pub struct PanController {
    state: PanState,
    speed: f64,
}

impl PanController {
    /// Create an idle controller with the given drag multiplier.
    pub fn new(speed: f64) -> Self {
        Self {
            state: PanState::Idle,
            speed,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PanState::Dragging { .. })
    }

    /// Handle a pointer press. Returns true if a drag started.
    pub fn pointer_down(
        &mut self,
        container: &impl ScrollContainer,
        sample: PointerSample,
    ) -> bool {
        if sample.button != PRIMARY_BUTTON || sample.on_node {
            return false;
        }

        let (ox, oy) = container.origin();
        self.state = PanState::Dragging {
            start_x: sample.page_x - ox,
            start_y: sample.page_y - oy,
            scroll_start: container.scroll_offset(),
        };
        true
    }

    /// Handle pointer movement. Returns the new scroll offset when dragging.
    pub fn pointer_move(
        &self,
        container: &mut impl ScrollContainer,
        sample: PointerSample,
    ) -> Option<ScrollOffset> {
        let PanState::Dragging {
            start_x,
            start_y,
            scroll_start,
        } = self.state
        else {
            return None;
        };

        let (ox, oy) = container.origin();
        let walk_x = (sample.page_x - ox - start_x) * self.speed;
        let walk_y = (sample.page_y - oy - start_y) * self.speed;

        let offset = ScrollOffset::new(scroll_start.left - walk_x, scroll_start.top - walk_y);
        container.set_scroll_offset(offset);
        Some(offset)
    }

    /// Handle a pointer release anywhere. Returns true if a drag ended.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = PanState::Idle;
        was_dragging
    }
}

impl Default for PanController {
    fn default() -> Self {
        Self::new(1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f64, y: f64) -> PointerSample {
        PointerSample {
            page_x: x,
            page_y: y,
            button: PRIMARY_BUTTON,
            on_node: false,
        }
    }

    fn container() -> ScrollState {
        ScrollState {
            origin_x: 20.0,
            origin_y: 10.0,
            offset: ScrollOffset::new(100.0, 50.0),
        }
    }

    #[test]
    fn test_drag_scrolls_with_multiplier() {
        let mut scroll = container();
        let mut pan = PanController::default();

        assert!(pan.pointer_down(&scroll, press(200.0, 200.0)));
        assert!(pan.is_dragging());

        let offset = pan.pointer_move(&mut scroll, press(180.0, 210.0)).unwrap();
        // dx = -20, dy = +10, scaled by 1.5
        assert_eq!(offset, ScrollOffset::new(130.0, 35.0));
        assert_eq!(scroll.offset, offset);

        // Movement is measured from the press, not the previous move.
        let offset = pan.pointer_move(&mut scroll, press(200.0, 200.0)).unwrap();
        assert_eq!(offset, ScrollOffset::new(100.0, 50.0));
    }

    #[test]
    fn test_secondary_button_does_not_pan() {
        let scroll = container();
        let mut pan = PanController::default();
        let sample = PointerSample { button: 2, ..press(0.0, 0.0) };
        assert!(!pan.pointer_down(&scroll, sample));
        assert!(!pan.is_dragging());
    }

    #[test]
    fn test_press_on_node_does_not_pan() {
        let scroll = container();
        let mut pan = PanController::default();
        let sample = PointerSample { on_node: true, ..press(0.0, 0.0) };
        assert!(!pan.pointer_down(&scroll, sample));
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut scroll = container();
        let pan = PanController::default();
        assert_eq!(pan.pointer_move(&mut scroll, press(5.0, 5.0)), None);
        assert_eq!(scroll.offset, ScrollOffset::new(100.0, 50.0));
    }

    #[test]
    fn test_release_returns_to_idle() {
        let mut scroll = container();
        let mut pan = PanController::new(1.0);
        pan.pointer_down(&scroll, press(0.0, 0.0));
        assert!(pan.pointer_up());
        assert!(!pan.pointer_up());
        assert_eq!(pan.pointer_move(&mut scroll, press(50.0, 50.0)), None);
    }
}
