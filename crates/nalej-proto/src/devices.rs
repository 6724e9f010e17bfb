//! Devices service.

use serde::{Deserialize, Serialize};

use crate::{LabelMap, OrganizationId, Rpc, Success};

/// Create a device group.
pub const ADD_GROUP: Rpc<AddDeviceGroupRequest, DeviceGroup> = Rpc::new("Devices.AddGroup");
/// List device groups.
pub const LIST_GROUPS: Rpc<OrganizationId, DeviceGroupList> = Rpc::new("Devices.ListGroups");
/// Remove a device group.
pub const REMOVE_GROUP: Rpc<DeviceGroupId, Success> = Rpc::new("Devices.RemoveGroup");
/// List the devices of a group.
pub const LIST: Rpc<DeviceGroupId, DeviceList> = Rpc::new("Devices.List");
/// Add or remove device labels.
pub const UPDATE_LABELS: Rpc<UpdateDeviceLabelsRequest, Success> = Rpc::new("Devices.UpdateLabels");
/// Enable or disable a device.
pub const UPDATE: Rpc<UpdateDeviceRequest, Device> = Rpc::new("Devices.Update");
/// Remove a device.
pub const REMOVE: Rpc<DeviceId, Success> = Rpc::new("Devices.Remove");

/// Group of devices sharing an API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroup {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Group name.
    pub name: String,
    /// Whether devices of the group may connect.
    pub enabled: bool,
    /// Whether new devices are enabled on registration.
    pub default_device_connectivity: bool,
    /// API key devices use to register.
    #[serde(default)]
    pub device_group_api_key: String,
}

/// Device groups of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceGroupList {
    /// Groups.
    #[serde(default)]
    pub groups: Vec<DeviceGroup>,
}

/// New group definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceGroupRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Group name.
    pub name: String,
    /// Whether devices of the group may connect.
    pub enabled: bool,
    /// Whether new devices are enabled on registration.
    pub default_device_connectivity: bool,
}

/// Identifies a device group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroupId {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
}

/// A registered device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Device identifier.
    pub device_id: String,
    /// Registration time, seconds since epoch.
    #[serde(default)]
    pub register_since: i64,
    /// Labels.
    #[serde(default)]
    pub labels: LabelMap,
    /// Whether the device may connect.
    pub enabled: bool,
    /// Connectivity status.
    #[serde(default)]
    pub device_status: String,
}

/// Devices of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceList {
    /// Devices.
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// Identifies a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceId {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Device identifier.
    pub device_id: String,
}

/// Label change on a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceLabelsRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Device identifier.
    pub device_id: String,
    /// `true` to add the labels, `false` to remove them.
    pub add: bool,
    /// Labels to add or remove.
    pub labels: LabelMap,
}

/// Connectivity change on a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Group identifier.
    pub device_group_id: String,
    /// Device identifier.
    pub device_id: String,
    /// Whether the device may connect.
    pub enabled: bool,
}
