//! Inventory service: everything the organization has deployed at the edge.

use serde::{Deserialize, Serialize};

use crate::edge::EdgeController;
use crate::{LabelMap, OrganizationId, Rpc, Success};

/// List devices, assets and edge controllers.
pub const LIST: Rpc<OrganizationId, InventoryList> = Rpc::new("Inventory.List");
/// Retrieve an asset.
pub const DETAILS: Rpc<AssetId, Asset> = Rpc::new("Inventory.Details");
/// Set the location of an asset.
pub const UPDATE_LOCATION: Rpc<UpdateLocationRequest, Success> =
    Rpc::new("Inventory.UpdateLocation");
/// Add or remove asset labels.
pub const UPDATE_LABELS: Rpc<UpdateAssetLabelsRequest, Success> =
    Rpc::new("Inventory.UpdateLabels");

/// Operating system of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingSystem {
    /// Distribution name.
    #[serde(default)]
    pub name: String,
    /// Version.
    #[serde(default)]
    pub version: String,
}

/// Host running an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Organization identifier.
    pub organization_id: String,
    /// Managing edge controller.
    pub edge_controller_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// Agent identifier.
    #[serde(default)]
    pub agent_id: String,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Operating system.
    #[serde(default)]
    pub os: OperatingSystem,
    /// IP seen by the edge controller.
    #[serde(default)]
    pub eic_net_ip: String,
    /// Last time the agent reported, seconds since epoch.
    #[serde(default)]
    pub last_alive_timestamp: i64,
    /// Connectivity status.
    pub status: String,
    /// Location.
    #[serde(default)]
    pub location: String,
}

/// Device as seen by the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Device identifier.
    pub device_id: String,
    /// Identifier of the device as an asset.
    #[serde(default)]
    pub asset_device_id: String,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Connectivity status.
    pub status: String,
    /// Location.
    #[serde(default)]
    pub location: String,
}

/// Inventory of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryList {
    /// Devices.
    #[serde(default)]
    pub devices: Vec<InventoryDevice>,
    /// Assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Edge controllers.
    #[serde(default)]
    pub controllers: Vec<EdgeController>,
}

/// Identifies an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetId {
    /// Organization identifier.
    pub organization_id: String,
    /// Asset identifier.
    pub asset_id: String,
}

/// Location change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// New location.
    pub location: String,
}

/// Label change on an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}
