//! Backend wire format.
//!
//! The tree service speaks JSON shaped as
//! `{ treeId, treeName, nodeDTOS: [{ nodeId, parentId, nodeName, level }] }`.

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::tree::{NodeId, TreeNode};

/// One node as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendNode {
    pub node_id: u32,
    pub parent_id: u32,
    pub node_name: String,
    pub level: u8,
}

/// Full tree payload, used for both load responses and save requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResponse {
    pub tree_id: u32,
    #[serde(default)]
    pub tree_name: String,
    #[serde(rename = "nodeDTOS", default)]
    pub node_dtos: Vec<BackendNode>,
}

impl From<BackendNode> for TreeNode {
    fn from(node: BackendNode) -> Self {
        TreeNode::new(NodeId(node.node_id), NodeId(node.parent_id), node.level, node.node_name)
    }
}

impl From<&TreeNode> for BackendNode {
    fn from(node: &TreeNode) -> Self {
        BackendNode {
            node_id: node.id.0,
            parent_id: node.parent_id.0,
            node_name: node.name.clone(),
            level: node.level,
        }
    }
}

/// Decode a load response into nodes, preserving backend order.
pub fn decode_tree_response(json: &str) -> Result<Vec<TreeNode>, StoreError> {
    let response: TreeResponse = serde_json::from_str(json)?;
    Ok(response.node_dtos.into_iter().map(TreeNode::from).collect())
}

/// Encode a save request. Layout is never part of the payload.
pub fn encode_tree_request(
    tree_id: u32,
    tree_name: &str,
    nodes: &[TreeNode],
) -> Result<String, StoreError> {
    let request = TreeResponse {
        tree_id,
        tree_name: tree_name.to_string(),
        node_dtos: nodes.iter().map(BackendNode::from).collect(),
    };
    Ok(serde_json::to_string(&request)?)
}
