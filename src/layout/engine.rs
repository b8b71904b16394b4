//! Level-wise layout engine.
//!
//! Each visible group is laid out as a single horizontal row centered in the
//! viewport, with node size, gap and vertical offset taken from the group's
//! layout family under the active display mode. The root is centered on its
//! own.
//!
//! The engine is a pure function of (groups, mode, viewport): recomputing
//! with the same inputs yields identical geometry.

use log::warn;

use super::display_mode::DisplayMode;
use super::ratios::{DisplayRatios, LayoutFamily};
use crate::tree::{NodeGroup, NodeLayout};
use crate::viewport::Viewport;

/// Stateless layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Attach layout to every node of every group.
    ///
    /// Groups that cannot be laid out (unknown level, level not visible in
    /// this mode, empty) are returned in place without layout and a warning
    /// is logged; downstream stages skip nodes whose layout is missing.
    pub fn calculate_layout(
        &self,
        groups: Vec<NodeGroup>,
        mode: DisplayMode,
        viewport: Viewport,
    ) -> Vec<NodeGroup> {
        groups
            .into_iter()
            .map(|group| self.layout_group(group, mode, viewport))
            .collect()
    }

    fn layout_group(
        &self,
        mut group: NodeGroup,
        mode: DisplayMode,
        viewport: Viewport,
    ) -> NodeGroup {
        for node in &mut group.node_list {
            node.layout = None;
        }

        if group.is_empty() {
            return group;
        }

        let Some(family) = LayoutFamily::for_level(group.level) else {
            warn!("layout: level {} has no layout family", group.level);
            return group;
        };

        let Some(ratios) = family.ratios(group.level, mode, viewport) else {
            warn!(
                "layout: {family:?} family has no sizing for level {} in mode {}",
                group.level,
                mode.as_u8()
            );
            return group;
        };

        if group.level == 0 {
            Self::place_root(&mut group, ratios, viewport);
        } else {
            Self::place_row(&mut group, ratios, viewport);
        }
        group
    }

    /// Center the root on its own; no clamping to the left edge.
    fn place_root(group: &mut NodeGroup, ratios: DisplayRatios, viewport: Viewport) {
        let left = viewport.width / 2.0 - ratios.node_width / 2.0;
        for node in &mut group.node_list {
            node.layout = Some(NodeLayout {
                left_space_x: left,
                top_space_y: ratios.top_space_y,
                node_width: ratios.node_width,
                node_height: ratios.node_height,
            });
        }
    }

    /// Lay the group out as one centered row. Rows wider than the viewport
    /// start at the left edge and overflow to the right.
    fn place_row(group: &mut NodeGroup, ratios: DisplayRatios, viewport: Viewport) {
        let n = group.len() as f64;
        let total_width = n * ratios.node_width + (n - 1.0) * ratios.gap;
        let start_x = ((viewport.width - total_width) / 2.0).max(0.0);
        let step = ratios.node_width + ratios.gap;

        for (i, node) in group.node_list.iter_mut().enumerate() {
            node.layout = Some(NodeLayout {
                left_space_x: start_x + i as f64 * step,
                top_space_y: ratios.top_space_y,
                node_width: ratios.node_width,
                node_height: ratios.node_height,
            });
        }
    }
}

/// Functional form of [`LayoutEngine::calculate_layout`].
pub fn calculate_layout(
    groups: Vec<NodeGroup>,
    mode: DisplayMode,
    viewport: Viewport,
) -> Vec<NodeGroup> {
    LayoutEngine::new().calculate_layout(groups, mode, viewport)
}
