//! Errors raised by tree editing and selection requests.

use thiserror::Error;

use super::node::NodeId;

/// Rejected tree or selection operation. The tree is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("level {0} is outside 0..=6")]
    LevelOutOfRange(u8),

    #[error("{id} at level {level} is not selectable")]
    NotSelectable { id: NodeId, level: u8 },

    #[error("{0} is not in the current scene")]
    NotVisible(NodeId),

    #[error("{parent} is at the deepest supported level")]
    DepthLimit { parent: NodeId },

    #[error("tree already has a root")]
    RootExists,

    #[error("no node ids left")]
    IdSpaceExhausted,

    #[error("malformed tree: {0}")]
    Malformed(String),
}
