//! Selection state: which node is selected at each level.
//!
//! Selecting at level L invalidates every selection below L, so the map
//! always describes a single chain from level 1 downwards.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::tree::{MAX_LEVEL, NodeId, TreeError, TreeNode, has_children};

/// Which nodes may be selected to reveal their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// Levels 1 through 5.
    #[default]
    LevelRange,
    /// Any non-root node that has at least one child.
    HasChildren,
}

impl SelectionPolicy {
    /// Whether `node` may be selected under this policy.
    pub fn allows(self, node: &TreeNode, nodes: &[TreeNode]) -> bool {
        match self {
            SelectionPolicy::LevelRange => is_selectable_level(node.level),
            SelectionPolicy::HasChildren => !node.is_root() && has_children(nodes, node.id),
        }
    }
}

/// Levels that can hold a selection. The root is always visible and the
/// deepest level has nothing below it to reveal.
#[inline]
pub fn is_selectable_level(level: u8) -> bool {
    (1..MAX_LEVEL).contains(&level)
}

/// Map from level to the id of the node selected at that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    selected: BTreeMap<u8, NodeId>,
}

impl SelectionState {
    /// Start with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` at `level` and drop every deeper selection.
    pub fn select(&mut self, level: u8, id: NodeId) -> Result<(), TreeError> {
        if level > MAX_LEVEL {
            warn!("selection: invalid level {level}, must be between 0 and {MAX_LEVEL}");
            return Err(TreeError::LevelOutOfRange(level));
        }
        if !is_selectable_level(level) {
            warn!("selection: level {level} is not selectable");
            return Err(TreeError::NotSelectable { id, level });
        }

        self.selected.insert(level, id);
        self.selected.retain(|&l, _| l <= level);
        Ok(())
    }

    /// Forget every selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// The node selected at `level`, if any.
    pub fn get(&self, level: u8) -> Option<NodeId> {
        self.selected.get(&level).copied()
    }

    /// Deepest level holding a selection.
    pub fn deepest_level(&self) -> Option<u8> {
        self.selected.keys().next_back().copied()
    }

    /// Whether `id` is selected at any level.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.values().any(|&v| v == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Drop the first selection whose node no longer exists, and everything
    /// below it. Returns true if anything was removed.
    pub fn prune(&mut self, exists: impl Fn(NodeId) -> bool) -> bool {
        let cut = self
            .selected
            .iter()
            .find(|&(_, &id)| !exists(id))
            .map(|(&level, _)| level);

        match cut {
            Some(level) => {
                self.selected.retain(|&l, _| l < level);
                true
            }
            None => false,
        }
    }

    /// Iterate `(level, id)` pairs from shallowest to deepest.
    pub fn iter(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.selected.iter().map(|(&l, &id)| (l, id))
    }
}
