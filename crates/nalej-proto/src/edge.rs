//! Edge controllers service.

use serde::{Deserialize, Serialize};

use crate::{LabelMap, OrganizationId, Rpc, Success};

/// Issue a token an edge controller uses to join the platform.
pub const CREATE_JOIN_TOKEN: Rpc<OrganizationId, JoinToken> =
    Rpc::new("EdgeControllers.CreateJoinToken");
/// Detach an edge controller from the platform.
pub const UNLINK: Rpc<UnlinkRequest, Success> = Rpc::new("EdgeControllers.Unlink");
/// Install an edge controller on a remote host.
pub const INSTALL: Rpc<InstallEdgeControllerRequest, EdgeControllerOpResponse> =
    Rpc::new("EdgeControllers.Install");
/// Set the geolocation of an edge controller.
pub const UPDATE_GEOLOCATION: Rpc<UpdateGeolocationRequest, Success> =
    Rpc::new("EdgeControllers.UpdateGeolocation");
/// Add or remove edge controller labels.
pub const UPDATE_LABELS: Rpc<UpdateEdgeControllerLabelsRequest, Success> =
    Rpc::new("EdgeControllers.UpdateLabels");

/// Token and certificate authority needed to join the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinToken {
    /// Organization identifier.
    pub organization_id: String,
    /// One-time join token.
    pub token: String,
    /// PEM certificate of the platform CA.
    #[serde(default)]
    pub cacert: String,
    /// Expiration, seconds since epoch.
    pub expires: i64,
}

/// An edge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeController {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// Display name.
    pub name: String,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Geolocation.
    #[serde(default)]
    pub location: String,
    /// Connectivity status.
    pub status: String,
    /// Last time the controller reported, seconds since epoch.
    #[serde(default)]
    pub last_alive_timestamp: i64,
}

/// Unlink request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// Unlink even if the controller still manages agents.
    pub force: bool,
}

/// SSH credentials for a remote host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshCredentials {
    /// Login user.
    pub username: String,
    /// Password, when not using a key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// PEM private key, when not using a password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
}

/// Installation of an edge controller on a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallEdgeControllerRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// Host to install on.
    pub target_host: String,
    /// Credentials to reach the host.
    pub credentials: SshCredentials,
    /// Whether the user can escalate with sudo.
    pub sudoer: bool,
}

/// Acknowledgement of an operation delegated to an edge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeControllerOpResponse {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// Asset affected by the operation, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asset_id: String,
    /// Operation identifier.
    pub operation_id: String,
    /// Seconds since epoch at which the operation was queued.
    #[serde(default)]
    pub timestamp: i64,
    /// Operation status.
    pub status: String,
    /// Extra information.
    #[serde(default)]
    pub info: String,
}

/// Geolocation change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGeolocationRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// New geolocation.
    pub geolocation: String,
}

/// Label change on an edge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEdgeControllerLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}
