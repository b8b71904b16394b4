//! Tree persistence contracts.
//!
//! Loading and saving are capabilities injected into the session, not a
//! class hierarchy: any backend (in-memory mock, JSON over HTTP driven from
//! JS) implements `TreeSource` and/or `TreeSink`.

mod memory;
mod wire;

pub use memory::MemoryTreeStore;
pub use wire::{BackendNode, TreeResponse, decode_tree_response, encode_tree_request};

use log::warn;
use thiserror::Error;

use crate::tree::TreeNode;

/// Failure talking to a tree backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to decode tree payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("tree {0} not found")]
    NotFound(u32),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Something trees can be loaded from.
pub trait TreeSource {
    fn fetch_tree(&self, tree_id: u32) -> Result<Vec<TreeNode>, StoreError>;
}

/// Something trees can be saved to. The input is the full node collection.
pub trait TreeSink {
    fn save_tree(&mut self, nodes: &[TreeNode]) -> Result<(), StoreError>;
}

/// Load a tree, degrading to an empty collection on failure.
pub fn load_or_empty(source: &impl TreeSource, tree_id: u32) -> Vec<TreeNode> {
    match source.fetch_tree(tree_id) {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!("storage: failed to load tree {tree_id}: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_degrades_to_empty() {
        let mut store = MemoryTreeStore::with_tree(1, vec![TreeNode::new(1, 0, 0, "Gen1")]);
        assert_eq!(load_or_empty(&store, 1).len(), 1);
        assert!(load_or_empty(&store, 9).is_empty());

        store.fail_with("down");
        assert!(load_or_empty(&store, 1).is_empty());
    }
}
