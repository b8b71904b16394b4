//! Tree data structures and structure queries.
//!
//! This module provides the node model shared by every other stage, the
//! read-only `get_root` / `get_children` queries over a flat collection, and
//! the editable `FamilyTree` arena backed by petgraph's StableGraph.

mod arena;
mod error;
mod node;
mod structure;

pub use arena::FamilyTree;
pub use error::TreeError;
pub use node::{MAX_LEVEL, NodeGroup, NodeId, NodeLayout, TreeNode};
pub use structure::{get_children, get_root, has_children};
