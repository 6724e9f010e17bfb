//! Agent service.
//!
//! Agents run on assets and are managed through an edge controller.

use serde::{Deserialize, Serialize};

use crate::edge::{EdgeControllerOpResponse, SshCredentials};
use crate::{LabelMap, Rpc, Success};

/// Issue a token an agent uses to join an edge controller.
pub const CREATE_JOIN_TOKEN: Rpc<EdgeControllerId, AgentJoinToken> =
    Rpc::new("Agent.CreateJoinToken");
/// Install an agent on a host through an edge controller.
pub const INSTALL: Rpc<InstallAgentRequest, EdgeControllerOpResponse> = Rpc::new("Agent.Install");
/// Remove an agent from an asset.
pub const UNINSTALL: Rpc<UninstallAgentRequest, EdgeControllerOpResponse> =
    Rpc::new("Agent.Uninstall");
/// Enable or disable monitoring on an asset.
pub const MONITORING: Rpc<AgentMonitoringRequest, Success> = Rpc::new("Agent.Monitoring");
/// Add or remove asset labels.
pub const UPDATE_LABELS: Rpc<UpdateAgentLabelsRequest, Success> = Rpc::new("Agent.UpdateLabels");

/// Kind of host an agent is installed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    /// 64-bit Linux.
    LinuxAmd64,
    /// 64-bit ARM Linux.
    LinuxArm64,
    /// 32-bit ARM Linux.
    LinuxArm,
    /// 64-bit Windows.
    WindowsAmd64,
    /// 64-bit macOS.
    DarwinAmd64,
}

/// Identifies an edge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeControllerId {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
}

/// Token an agent presents to its edge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentJoinToken {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller identifier.
    pub edge_controller_id: String,
    /// One-time join token.
    pub token: String,
    /// Expiration, seconds since epoch.
    pub expires: i64,
}

/// Installation of an agent on a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallAgentRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller performing the install.
    pub edge_controller_id: String,
    /// Kind of host.
    pub agent_type: AgentType,
    /// Host to install on.
    pub target_host: String,
    /// Credentials to reach the host.
    pub credentials: SshCredentials,
    /// Whether the user can escalate with sudo.
    pub sudoer: bool,
}

/// Removal of an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UninstallAgentRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Asset running the agent.
    pub asset_id: String,
    /// Drop the asset even if the agent cannot be reached.
    pub force: bool,
}

/// Monitoring toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentMonitoringRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller managing the asset.
    pub edge_controller_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// `true` to activate, `false` to deactivate.
    pub activate: bool,
}

/// Label change on an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Edge controller managing the asset.
    pub edge_controller_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}
