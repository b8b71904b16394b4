//! Node types for the genealogical tree.
//!
//! Every node carries:
//! - A stable unique identifier
//! - The identifier of its parent (`NodeId::NONE` for the root)
//! - Its depth level (0 = root, 6 = deepest supported generation)
//! - A display name
//! - Optional pixel geometry attached by the layout engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deepest supported generation.
pub const MAX_LEVEL: u8 = 6;

/// Stable node identifier.
///
/// Parent/child relationships are expressed purely through these ids, never
/// through embedded child objects. Id `0` is reserved as the "no parent"
/// sentinel used by the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Parent id carried by the root node.
    pub const NONE: NodeId = NodeId(0);

    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// True for the root's parent sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Pixel geometry of a laid-out node.
///
/// Ephemeral: recomputed on every viewport, selection or node-set change and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    pub left_space_x: f64,
    pub top_space_y: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl NodeLayout {
    /// Horizontal center of the node.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left_space_x + self.node_width / 2.0
    }

    /// Right edge of the node.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left_space_x + self.node_width
    }

    /// Bottom edge of the node.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top_space_y + self.node_height
    }

    /// Whether the point lies inside the node rectangle (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left_space_x && x <= self.right() && y >= self.top_space_y && y <= self.bottom()
    }
}

/// A member of the family tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,
    pub parent_id: NodeId,
    pub level: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<NodeLayout>,
}

impl TreeNode {
    /// Create a node without layout.
    pub fn new(
        id: impl Into<NodeId>,
        parent_id: impl Into<NodeId>,
        level: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            level,
            name: name.into(),
            layout: None,
        }
    }

    /// True when this node carries the root sentinel as its parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Parent id, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        if self.is_root() { None } else { Some(self.parent_id) }
    }
}

/// All visible nodes at one level that share a selection context: either
/// the single root or the children of one selected parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroup {
    pub level: u8,
    pub node_list: Vec<TreeNode>,
}

impl NodeGroup {
    /// Create a group from its members.
    pub fn new(level: u8, node_list: Vec<TreeNode>) -> Self {
        Self { level, node_list }
    }

    /// Number of nodes in the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.node_list.len()
    }

    /// Whether the group has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_list.is_empty()
    }

    /// Whether a node with this id is a member.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_list.iter().any(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.0, 42);
        assert_eq!(format!("{}", id), "Node(42)");
        assert!(!id.is_none());
        assert!(NodeId::NONE.is_none());
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_root_has_no_parent() {
        let root = TreeNode::new(1, 0, 0, "Gen1");
        let child = TreeNode::new(2, 1, 1, "Gen2");
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(child.parent(), Some(NodeId(1)));
    }

    #[test]
    fn test_layout_edges() {
        let layout = NodeLayout {
            left_space_x: 10.0,
            top_space_y: 20.0,
            node_width: 100.0,
            node_height: 50.0,
        };
        assert_eq!(layout.center_x(), 60.0);
        assert_eq!(layout.right(), 110.0);
        assert_eq!(layout.bottom(), 70.0);
        assert!(layout.contains(10.0, 20.0));
        assert!(layout.contains(110.0, 70.0));
        assert!(!layout.contains(111.0, 40.0));
    }

    #[test]
    fn test_node_wire_names() {
        let node: TreeNode =
            serde_json::from_str(r#"{"id":3,"parentId":1,"level":1,"name":"Ada"}"#).unwrap();
        assert_eq!(node.id, NodeId(3));
        assert_eq!(node.parent_id, NodeId(1));
        assert!(node.layout.is_none());

        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("layout"));
    }
}
