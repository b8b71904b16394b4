//! Progressive-disclosure visibility.
//!
//! The root and its children are always visible. Below that, the children of
//! the node selected at level L appear as the next group, one level at a
//! time, until the chain runs out.

use log::debug;

use crate::selection::SelectionState;
use crate::tree::{MAX_LEVEL, NodeGroup, TreeNode, get_children, get_root};

/// Compute the ordered list of visible level groups.
///
/// The chain stops at the first level with no selection, at a selection whose
/// node is not in the previous visible group (stale data from a selection
/// made under another ancestor), or at a selected node with no children.
/// Missing groups are omitted, never reported as errors.
pub fn get_visible_groups(nodes: &[TreeNode], selection: &SelectionState) -> Vec<NodeGroup> {
    let mut groups = Vec::new();

    let Some(root) = get_root(nodes) else {
        if !nodes.is_empty() {
            debug!("visibility: {} nodes but no root", nodes.len());
        }
        return groups;
    };
    let root_id = root.node_list[0].id;
    groups.push(root);

    let Some(first) = get_children(nodes, root_id) else {
        return groups;
    };
    groups.push(first);

    for level in 1..MAX_LEVEL {
        let Some(selected) = selection.get(level) else {
            break;
        };

        let shown = groups.last().is_some_and(|g| g.contains(selected));
        if !shown {
            debug!("visibility: selection {selected} at level {level} is not visible");
            break;
        }

        match get_children(nodes, selected) {
            Some(children) => groups.push(children),
            None => break,
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    /// Root 1; level 1: 2, 3; under 2: 4, 5; under 4: 6; under 6: 7.
    fn chain() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, 0, 0, "root"),
            TreeNode::new(2, 1, 1, "a"),
            TreeNode::new(3, 1, 1, "b"),
            TreeNode::new(4, 2, 2, "a1"),
            TreeNode::new(5, 2, 2, "a2"),
            TreeNode::new(6, 4, 3, "a1x"),
            TreeNode::new(7, 6, 4, "a1x1"),
        ]
    }

    fn levels(groups: &[NodeGroup]) -> Vec<u8> {
        groups.iter().map(|g| g.level).collect()
    }

    #[test]
    fn test_empty_collection() {
        assert!(get_visible_groups(&[], &SelectionState::new()).is_empty());
    }

    #[test]
    fn test_no_root() {
        let nodes = vec![TreeNode::new(2, 1, 1, "orphan")];
        assert!(get_visible_groups(&nodes, &SelectionState::new()).is_empty());
    }

    #[test]
    fn test_root_without_children() {
        let nodes = vec![TreeNode::new(1, 0, 0, "alone")];
        let groups = get_visible_groups(&nodes, &SelectionState::new());
        assert_eq!(levels(&groups), vec![0]);
    }

    #[test]
    fn test_levels_zero_and_one_always_visible() {
        let groups = get_visible_groups(&chain(), &SelectionState::new());
        assert_eq!(levels(&groups), vec![0, 1]);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_selection_chain_reveals_levels() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(2)).unwrap();
        selection.select(2, NodeId(4)).unwrap();
        selection.select(3, NodeId(6)).unwrap();

        let groups = get_visible_groups(&chain(), &selection);
        assert_eq!(levels(&groups), vec![0, 1, 2, 3, 4]);
        assert_eq!(groups[2].node_list.iter().map(|n| n.id.0).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_selected_leaf_adds_nothing() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(3)).unwrap();

        let groups = get_visible_groups(&chain(), &selection);
        assert_eq!(levels(&groups), vec![0, 1]);
    }

    #[test]
    fn test_stale_deeper_selection_is_ignored() {
        // Level 2 points at a node that is not a child of the level-1 selection.
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(3)).unwrap();
        selection.select(2, NodeId(4)).unwrap();

        let groups = get_visible_groups(&chain(), &selection);
        assert_eq!(levels(&groups), vec![0, 1]);
    }

    #[test]
    fn test_chain_stops_at_gap() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(2)).unwrap();
        selection.select(2, NodeId(4)).unwrap();
        selection.select(3, NodeId(6)).unwrap();
        // Reselecting level 1 drops deeper levels, so the chain ends at 2.
        selection.select(1, NodeId(2)).unwrap();

        let groups = get_visible_groups(&chain(), &selection);
        assert_eq!(levels(&groups), vec![0, 1, 2]);
    }

    #[test]
    fn test_selection_of_unknown_node() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(99)).unwrap();
        let groups = get_visible_groups(&chain(), &selection);
        assert_eq!(levels(&groups), vec![0, 1]);
    }
}
