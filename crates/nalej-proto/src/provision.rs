//! Provisioning service: cloud clusters created and sized by the platform.

use serde::{Deserialize, Serialize};

use crate::{OperationResponse, Rpc, TargetPlatform};

/// Provision a new cluster.
pub const CLUSTER: Rpc<ProvisionClusterRequest, OperationResponse> =
    Rpc::new("Provision.Cluster");
/// Change the number of nodes of a provisioned cluster.
pub const SCALE: Rpc<ScaleClusterRequest, OperationResponse> = Rpc::new("Provision.Scale");
/// Tear a provisioned cluster down.
pub const DECOMMISSION: Rpc<DecommissionClusterRequest, OperationResponse> =
    Rpc::new("Provision.Decommission");

/// New cluster definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionClusterRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Kubernetes version, provider default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    /// Number of nodes.
    pub num_nodes: i64,
    /// Provider machine type.
    pub node_type: String,
    /// Provider zone.
    pub zone: String,
    /// Provider.
    pub target_platform: TargetPlatform,
}

/// Resize of a provisioned cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaleClusterRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// Desired number of nodes.
    pub num_nodes: i64,
    /// Provider.
    pub target_platform: TargetPlatform,
}

/// Teardown of a provisioned cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecommissionClusterRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// Provider.
    pub target_platform: TargetPlatform,
}
