//! Read-only structure queries over a flat node collection.
//!
//! Both queries are a single linear scan. Neither verifies the tree
//! invariants: a collection with several roots yields the first one, and a
//! child group takes its level from its first member.

use super::node::{NodeGroup, NodeId, TreeNode};

/// Find the root (the node whose parent is the `NodeId::NONE` sentinel) and
/// return it as a singleton group at its own level.
///
/// Returns `None` when no root exists; callers treat that as "nothing to
/// render".
pub fn get_root(nodes: &[TreeNode]) -> Option<NodeGroup> {
    let root = nodes.iter().find(|n| n.is_root())?;
    Some(NodeGroup::new(root.level, vec![root.clone()]))
}

/// Collect the children of `parent_id` in collection order.
///
/// Returns `None` when the parent has no children. The group level is the
/// first child's level.
pub fn get_children(nodes: &[TreeNode], parent_id: NodeId) -> Option<NodeGroup> {
    if parent_id.is_none() {
        return None;
    }

    let children: Vec<TreeNode> = nodes
        .iter()
        .filter(|n| n.parent_id == parent_id)
        .cloned()
        .collect();

    let level = children.first()?.level;
    Some(NodeGroup::new(level, children))
}

/// Whether `parent_id` has at least one child.
pub fn has_children(nodes: &[TreeNode], parent_id: NodeId) -> bool {
    !parent_id.is_none() && nodes.iter().any(|n| n.parent_id == parent_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, 0, 0, "Gen1"),
            TreeNode::new(2, 1, 1, "A"),
            TreeNode::new(3, 1, 1, "B"),
            TreeNode::new(4, 2, 2, "A1"),
        ]
    }

    #[test]
    fn test_empty_collection_has_no_root() {
        assert!(get_root(&[]).is_none());
    }

    #[test]
    fn test_missing_root() {
        let nodes = vec![TreeNode::new(2, 1, 1, "orphan")];
        assert!(get_root(&nodes).is_none());
    }

    #[test]
    fn test_root_is_singleton_at_its_level() {
        let group = get_root(&sample()).unwrap();
        assert_eq!(group.level, 0);
        assert_eq!(group.len(), 1);
        assert_eq!(group.node_list[0].id, NodeId(1));
    }

    #[test]
    fn test_children_in_collection_order() {
        let group = get_children(&sample(), NodeId(1)).unwrap();
        assert_eq!(group.level, 1);
        let ids: Vec<_> = group.node_list.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_leaf_has_no_children() {
        assert!(get_children(&sample(), NodeId(3)).is_none());
        assert!(!has_children(&sample(), NodeId(3)));
        assert!(has_children(&sample(), NodeId(2)));
    }

    #[test]
    fn test_sentinel_parent_is_not_a_parent() {
        // The root references NONE but NONE is not a node.
        assert!(get_children(&sample(), NodeId::NONE).is_none());
    }

    #[test]
    fn test_group_level_taken_from_first_child() {
        let nodes = vec![
            TreeNode::new(1, 0, 0, "root"),
            TreeNode::new(2, 1, 1, "ok"),
            TreeNode::new(3, 1, 4, "wrong level"),
        ];
        let group = get_children(&nodes, NodeId(1)).unwrap();
        assert_eq!(group.level, 1);
        assert_eq!(group.len(), 2);
    }
}
