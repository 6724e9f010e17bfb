//! Application network service: connections between instance interfaces.

use serde::{Deserialize, Serialize};

use crate::applications::AppInstanceId;
use crate::{OrganizationId, Rpc, Success};

/// Connect an outbound interface to an inbound interface.
pub const ADD_CONNECTION: Rpc<ConnectionRequest, Success> =
    Rpc::new("ApplicationNetwork.AddConnection");
/// Remove a connection.
pub const REMOVE_CONNECTION: Rpc<RemoveConnectionRequest, Success> =
    Rpc::new("ApplicationNetwork.RemoveConnection");
/// List connections.
pub const LIST_CONNECTIONS: Rpc<OrganizationId, ConnectionList> =
    Rpc::new("ApplicationNetwork.ListConnections");
/// Inbound interfaces of an instance that accept connections.
pub const LIST_AVAILABLE_INBOUNDS: Rpc<AppInstanceId, InterfaceList> =
    Rpc::new("ApplicationNetwork.ListAvailableInbounds");
/// Outbound interfaces of an instance not yet connected.
pub const LIST_AVAILABLE_OUTBOUNDS: Rpc<AppInstanceId, InterfaceList> =
    Rpc::new("ApplicationNetwork.ListAvailableOutbounds");

/// New connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Instance owning the outbound interface.
    pub source_instance_id: String,
    /// Outbound interface name.
    pub outbound_name: String,
    /// Instance owning the inbound interface.
    pub target_instance_id: String,
    /// Inbound interface name.
    pub inbound_name: String,
}

/// Connection removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoveConnectionRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Instance owning the outbound interface.
    pub source_instance_id: String,
    /// Outbound interface name.
    pub outbound_name: String,
    /// Instance owning the inbound interface.
    pub target_instance_id: String,
    /// Inbound interface name.
    pub inbound_name: String,
    /// Confirms removal of a connection the source requires.
    pub user_confirmation: bool,
}

/// Established connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInstance {
    /// Organization identifier.
    pub organization_id: String,
    /// Connection identifier.
    pub connection_id: String,
    /// Source instance identifier.
    pub source_instance_id: String,
    /// Source instance name.
    #[serde(default)]
    pub source_instance_name: String,
    /// Target instance identifier.
    pub target_instance_id: String,
    /// Target instance name.
    #[serde(default)]
    pub target_instance_name: String,
    /// Inbound interface name.
    pub inbound_name: String,
    /// Outbound interface name.
    pub outbound_name: String,
    /// Whether the source cannot run without this connection.
    #[serde(default)]
    pub outbound_required: bool,
    /// Connection status.
    pub status: String,
}

/// Connections of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionList {
    /// Connections.
    #[serde(default)]
    pub connections: Vec<ConnectionInstance>,
}

/// Interface exposed by an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInterface {
    /// Instance identifier.
    pub app_instance_id: String,
    /// Instance name.
    pub instance_name: String,
    /// Interface name.
    pub interface_name: String,
}

/// Interfaces available for connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceList {
    /// Interfaces.
    #[serde(default)]
    pub interfaces: Vec<InstanceInterface>,
}
