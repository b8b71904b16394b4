//! In-memory tree store, the stand-in backend for demos and tests.

use std::collections::HashMap;

use log::info;

use super::{StoreError, TreeSink, TreeSource};
use crate::tree::TreeNode;

/// Trees keyed by id, with an optional injected failure.
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeStore {
    trees: HashMap<u32, Vec<TreeNode>>,
    /// Tree id that `save_tree` writes to.
    active: u32,
    failure: Option<String>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one tree, which also becomes the save target.
    pub fn with_tree(tree_id: u32, nodes: Vec<TreeNode>) -> Self {
        let mut store = Self::new();
        store.trees.insert(tree_id, nodes);
        store.active = tree_id;
        store
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl TreeSource for MemoryTreeStore {
    fn fetch_tree(&self, tree_id: u32) -> Result<Vec<TreeNode>, StoreError> {
        self.check()?;
        info!("storage: fetching in-memory tree {tree_id}");
        self.trees.get(&tree_id).cloned().ok_or(StoreError::NotFound(tree_id))
    }
}

impl TreeSink for MemoryTreeStore {
    fn save_tree(&mut self, nodes: &[TreeNode]) -> Result<(), StoreError> {
        self.check()?;
        let copy = nodes.iter().map(|n| TreeNode { layout: None, ..n.clone() }).collect();
        self.trees.insert(self.active, copy);
        Ok(())
    }
}
