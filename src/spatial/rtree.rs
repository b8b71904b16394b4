//! R-tree over laid-out node rectangles using the rstar crate.
//!
//! Answers "which node is under the pointer" in O(log n), used to tell a
//! press on a node (selection) from a press on the background (pan).

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::tree::{NodeGroup, NodeId};

/// A node's rectangle with its paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRect {
    /// The node identifier.
    pub id: NodeId,
    /// Paint order; higher values are drawn on top.
    pub order: usize,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl RTreeObject for NodeRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for NodeRect {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = (self.min[0] - point[0]).max(0.0).max(point[0] - self.max[0]);
        let dy = (self.min[1] - point[1]).max(0.0).max(point[1] - self.max[1]);
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

/// Hit-test index for the current scene.
#[derive(Debug)]
pub struct NodeHitIndex {
    tree: RTree<NodeRect>,
}

impl NodeHitIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load every laid-out node; nodes without layout are not hittable.
    pub fn from_groups(groups: &[NodeGroup]) -> Self {
        let rects: Vec<NodeRect> = groups
            .iter()
            .flat_map(|g| g.node_list.iter())
            .filter_map(|n| n.layout.map(|l| (n.id, l)))
            .enumerate()
            .map(|(order, (id, l))| NodeRect {
                id,
                order,
                min: [l.left_space_x, l.top_space_y],
                max: [l.right(), l.bottom()],
            })
            .collect();

        Self {
            tree: RTree::bulk_load(rects),
        }
    }

    /// Topmost node containing the point.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.tree
            .locate_all_at_point(&[x, y])
            .max_by_key(|rect| rect.order)
            .map(|rect| rect.id)
    }

    /// Get the number of nodes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for NodeHitIndex {
    fn default() -> Self {
        Self::new()
    }
}
