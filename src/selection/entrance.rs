//! Entrance animation bookkeeping.
//!
//! A node plays its entrance animation the first time it becomes visible.
//! Once it leaves the visible set it is forgotten, so it animates again when
//! it comes back.

use std::collections::HashSet;

use crate::tree::{NodeGroup, NodeId};

/// Set of node ids whose entrance animation already finished.
#[derive(Debug, Clone, Default)]
pub struct EntranceTracker {
    animated: HashSet<NodeId>,
}

impl EntranceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the node should still play its entrance animation.
    pub fn is_new(&self, id: NodeId) -> bool {
        !self.animated.contains(&id)
    }

    /// Record that the node's animation finished.
    pub fn mark_animated(&mut self, id: NodeId) {
        self.animated.insert(id);
    }

    /// Forget nodes that are no longer visible. Returns true if any were
    /// dropped.
    pub fn sync(&mut self, groups: &[NodeGroup]) -> bool {
        let visible: HashSet<NodeId> = groups
            .iter()
            .flat_map(|g| g.node_list.iter().map(|n| n.id))
            .collect();

        let before = self.animated.len();
        self.animated.retain(|id| visible.contains(id));
        self.animated.len() != before
    }
}
