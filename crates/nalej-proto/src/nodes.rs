//! Nodes service.

use serde::{Deserialize, Serialize};

use crate::clusters::ClusterId;
use crate::{LabelMap, Rpc, Success};

/// List the nodes of a cluster.
pub const LIST: Rpc<ClusterId, NodeList> = Rpc::new("Nodes.List");
/// Add or remove node labels.
pub const UPDATE_LABELS: Rpc<UpdateNodeLabelsRequest, Success> = Rpc::new("Nodes.UpdateLabels");

/// A cluster node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster the node belongs to.
    pub cluster_id: String,
    /// Node identifier.
    pub node_id: String,
    /// Node IP address.
    #[serde(default)]
    pub ip: String,
    /// Node labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Connectivity status.
    pub status: String,
    /// Lifecycle state.
    pub state: String,
}

/// Nodes of a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeList {
    /// Nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Label change on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster the node belongs to.
    pub cluster_id: String,
    /// Node identifier.
    pub node_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}
