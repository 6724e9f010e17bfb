//! Clusters service.

use serde::{Deserialize, Serialize};

use crate::{LabelMap, OperationResponse, OrganizationId, Rpc, Success, TargetPlatform};

/// Install the platform agents on an existing Kubernetes cluster.
pub const INSTALL: Rpc<InstallRequest, OperationResponse> = Rpc::new("Clusters.Install");
/// List the clusters of an organization.
pub const LIST: Rpc<OrganizationId, ClusterList> = Rpc::new("Clusters.List");
/// Retrieve a cluster.
pub const INFO: Rpc<ClusterId, Cluster> = Rpc::new("Clusters.Info");
/// Update cluster attributes.
pub const UPDATE: Rpc<UpdateClusterRequest, Success> = Rpc::new("Clusters.Update");
/// Add or remove cluster labels.
pub const UPDATE_LABELS: Rpc<UpdateClusterLabelsRequest, Success> =
    Rpc::new("Clusters.UpdateLabels");
/// Stop scheduling new applications on a cluster.
pub const CORDON: Rpc<ClusterId, Success> = Rpc::new("Clusters.Cordon");
/// Resume scheduling on a cordoned cluster.
pub const UNCORDON: Rpc<ClusterId, Success> = Rpc::new("Clusters.Uncordon");
/// Move the applications of a cordoned cluster elsewhere.
pub const DRAIN: Rpc<ClusterId, Success> = Rpc::new("Clusters.Drain");

/// A cluster managed by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// Display name.
    pub name: String,
    /// Hostname of the cluster ingress.
    #[serde(default)]
    pub hostname: String,
    /// Cluster labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Connectivity status (`ONLINE`, `OFFLINE`, ...).
    pub status: String,
    /// Lifecycle state (`INSTALLED`, `CORDONED`, ...).
    pub state: String,
    /// Number of nodes.
    #[serde(default)]
    pub total_nodes: i64,
    /// Number of nodes running.
    #[serde(default)]
    pub running_nodes: i64,
    /// Conversion factor applied to reported millicores.
    #[serde(default)]
    pub millicores_conversion_factor: f64,
    /// Last time the cluster reported, seconds since epoch.
    #[serde(default)]
    pub last_alive_timestamp: i64,
}

/// Clusters of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterList {
    /// Clusters.
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// Identifies a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterId {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
}

/// Installation of an existing cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Raw contents of the kubeconfig file.
    pub kube_config_raw: String,
    /// Hostname of the cluster ingress.
    pub hostname: String,
    /// Provider hosting the cluster.
    pub target_platform: TargetPlatform,
    /// Whether the ingress uses a static IP address.
    pub use_static_ip_addresses: bool,
    /// Static IP address of the ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_ip_address_ingress: Option<String>,
}

/// Partial update of cluster attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New millicores conversion factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub millicores_conversion_factor: Option<f64>,
}

/// Label change on a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}
