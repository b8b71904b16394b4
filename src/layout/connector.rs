//! Parent→child connector paths.
//!
//! One cubic bezier per visible edge, from the parent's bottom-center to the
//! child's top-center. Both control points sit at the vertical midpoint, so
//! the curve is a straight drop when the two centers align and an S-curve
//! otherwise.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::tree::{NodeGroup, NodeId, TreeNode};

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// One rendered edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// SVG path data.
    pub path: String,
    pub child_id: NodeId,
    /// Position of the child within its group.
    pub child_index: usize,
    pub start: Anchor,
    pub end: Anchor,
}

/// Cubic bezier path with vertical control points.
pub fn bezier_path(start: Anchor, end: Anchor) -> String {
    let cy = (start.y + end.y) / 2.0;
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        start.x,
        start.y,
        start.x,
        cy,
        end.x,
        cy,
        end.x,
        end.y
    )
}

/// Emit one link per visible child whose parent is also visible.
///
/// Nodes hidden by the visibility stage are absent from `groups` and produce
/// no edge; nodes without layout are skipped silently. A repeated id yields
/// a single edge, for its first occurrence. Output follows group order, then
/// order within each group.
pub fn generate_connections(groups: &[NodeGroup]) -> Vec<Link> {
    let mut visible: HashMap<NodeId, &TreeNode> = HashMap::new();
    for group in groups {
        for node in &group.node_list {
            visible.entry(node.id).or_insert(node);
        }
    }

    let mut links = Vec::new();
    let mut emitted = HashSet::new();
    for group in groups {
        for (index, node) in group.node_list.iter().enumerate() {
            if !emitted.insert(node.id) {
                continue;
            }
            let Some(parent_id) = node.parent() else {
                continue;
            };
            let Some(parent) = visible.get(&parent_id) else {
                continue;
            };
            let (Some(child_layout), Some(parent_layout)) = (node.layout, parent.layout) else {
                continue;
            };

            let start = Anchor {
                x: parent_layout.center_x(),
                y: parent_layout.bottom(),
            };
            let end = Anchor {
                x: child_layout.center_x(),
                y: child_layout.top_space_y,
            };

            links.push(Link {
                path: bezier_path(start, end),
                child_id: node.id,
                child_index: index,
                start,
                end,
            });
        }
    }
    links
}
