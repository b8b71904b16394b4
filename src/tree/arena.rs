//! FamilyTree - editable node arena.
//!
//! Nodes live in a flat vector in collection order (which is also sibling
//! order). Parent→child relationships are mirrored into petgraph's
//! StableGraph so that subtree traversals stay cheap after removals; node
//! records themselves never embed children.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Dfs;
use petgraph::{Directed, Direction};
use std::collections::{HashMap, HashSet};

use super::error::TreeError;
use super::node::{MAX_LEVEL, NodeId, TreeNode};

/// The editable tree.
#[derive(Debug, Default)]
pub struct FamilyTree {
    /// Node records in collection order.
    nodes: Vec<TreeNode>,

    /// Map from NodeId to its position in `nodes` (first occurrence wins)
    slots: HashMap<NodeId, usize>,

    /// Parent→child edges, one graph node per distinct id
    graph: StableGraph<NodeId, (), Directed>,

    /// Map from NodeId to petgraph NodeIndex
    id_to_index: HashMap<NodeId, NodeIndex>,
}

impl FamilyTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a loaded node collection.
    ///
    /// Malformed input is kept as-is; use [`FamilyTree::validate`] to list
    /// the problems. Layout data carried by the input is dropped.
    pub fn from_nodes(nodes: Vec<TreeNode>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(nodes.len()),
            slots: HashMap::with_capacity(nodes.len()),
            graph: StableGraph::with_capacity(nodes.len(), nodes.len()),
            id_to_index: HashMap::with_capacity(nodes.len()),
        };

        for mut node in nodes {
            node.layout = None;
            tree.nodes.push(node);
        }
        tree.rebuild_indices();
        tree
    }

    fn rebuild_indices(&mut self) {
        self.slots.clear();
        self.id_to_index.clear();
        self.graph.clear();

        for (slot, node) in self.nodes.iter().enumerate() {
            if self.slots.contains_key(&node.id) {
                continue;
            }
            self.slots.insert(node.id, slot);
            let index = self.graph.add_node(node.id);
            self.id_to_index.insert(node.id, index);
        }

        for node in &self.nodes {
            let Some(parent) = node.parent() else {
                continue;
            };
            let (Some(&p), Some(&c)) =
                (self.id_to_index.get(&parent), self.id_to_index.get(&node.id))
            else {
                continue;
            };
            if p != c && self.graph.find_edge(p, c).is_none() {
                self.graph.add_edge(p, c, ());
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All nodes in collection order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of node records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of direct children of a node.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.id_to_index
            .get(&id)
            .map(|&index| self.graph.neighbors_directed(index, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    /// The node and every descendant, in depth-first order starting at `id`.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return Vec::new();
        };

        let mut dfs = Dfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(index) = dfs.next(&self.graph) {
            if let Some(&node_id) = self.graph.node_weight(index) {
                out.push(node_id);
            }
        }
        out
    }

    /// Next free id: one past the largest id in use (ids start at 1).
    fn next_id(&self) -> Result<NodeId, TreeError> {
        let max = self.nodes.iter().map(|n| n.id.0).max().unwrap_or(0);
        max.checked_add(1).map(NodeId).ok_or(TreeError::IdSpaceExhausted)
    }

    /// List every invariant violation in the collection.
    pub fn validate(&self) -> Vec<TreeError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        let roots = self.nodes.iter().filter(|n| n.is_root()).count();
        if roots == 0 && !self.nodes.is_empty() {
            problems.push(TreeError::Malformed("no root node".into()));
        } else if roots > 1 {
            problems.push(TreeError::Malformed(format!("{roots} root nodes")));
        }

        for node in &self.nodes {
            if !seen.insert(node.id) {
                problems.push(TreeError::Malformed(format!("duplicate id {}", node.id)));
            }
            if node.level > MAX_LEVEL {
                problems.push(TreeError::LevelOutOfRange(node.level));
            }
            match node.parent() {
                None if node.level != 0 => problems.push(TreeError::Malformed(format!(
                    "root {} at level {}",
                    node.id, node.level
                ))),
                None => {}
                Some(parent_id) => match self.get(parent_id) {
                    None => problems.push(TreeError::Malformed(format!(
                        "{} references missing parent {}",
                        node.id, parent_id
                    ))),
                    Some(parent) if parent.level.checked_add(1) != Some(node.level) => {
                        problems.push(TreeError::Malformed(format!(
                            "{} at level {} under {} at level {}",
                            node.id, node.level, parent.id, parent.level
                        )))
                    }
                    Some(_) => {}
                },
            }
        }

        problems
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Create the root of an empty tree.
    pub fn add_root(&mut self, name: impl Into<String>) -> Result<NodeId, TreeError> {
        if self.nodes.iter().any(|n| n.is_root()) {
            return Err(TreeError::RootExists);
        }

        let id = self.next_id()?;
        self.push(TreeNode::new(id, NodeId::NONE, 0, name));
        Ok(id)
    }

    /// Append a child under `parent`, one level deeper.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let parent_level = self.get(parent).ok_or(TreeError::UnknownNode(parent))?.level;
        if parent_level >= MAX_LEVEL {
            return Err(TreeError::DepthLimit { parent });
        }

        let id = self.next_id()?;
        self.push(TreeNode::new(id, parent, parent_level + 1, name));

        if let (Some(&p), Some(&c)) = (self.id_to_index.get(&parent), self.id_to_index.get(&id)) {
            self.graph.add_edge(p, c, ());
        }
        Ok(id)
    }

    fn push(&mut self, node: TreeNode) {
        let id = node.id;
        self.slots.insert(id, self.nodes.len());
        self.nodes.push(node);
        let index = self.graph.add_node(id);
        self.id_to_index.insert(id, index);
    }

    /// Change a node's display name.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        let slot = *self.slots.get(&id).ok_or(TreeError::UnknownNode(id))?;
        self.nodes[slot].name = name.into();
        Ok(())
    }

    /// Remove a node together with all of its descendants.
    ///
    /// Returns the removed ids, starting with `id`.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }

        let removed = self.subtree(id);
        let doomed: HashSet<NodeId> = removed.iter().copied().collect();
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.rebuild_indices();
        Ok(removed)
    }

    /// Deep copy of the collection with layout stripped, ready to persist.
    pub fn snapshot(&self) -> Vec<TreeNode> {
        self.nodes
            .iter()
            .map(|n| TreeNode { layout: None, ..n.clone() })
            .collect()
    }
}
