//! Scroll extent of the laid-out scene.

use serde::Serialize;

use crate::tree::NodeGroup;
use crate::viewport::Viewport;

/// Size of the scrollable canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBounds {
    pub width: f64,
    pub height: f64,
}

/// At least the viewport, grown to cover every laid-out node, plus padding
/// on the right and bottom.
pub fn scene_bounds(groups: &[NodeGroup], viewport: Viewport, padding: f64) -> SceneBounds {
    let (width, height) = groups
        .iter()
        .flat_map(|g| g.node_list.iter())
        .filter_map(|n| n.layout)
        .fold((viewport.width, viewport.height), |(w, h), layout| {
            (w.max(layout.right()), h.max(layout.bottom()))
        });

    SceneBounds {
        width: width + padding,
        height: height + padding,
    }
}
