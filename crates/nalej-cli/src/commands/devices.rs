//! Device groups and devices.

use std::io::Write;

use nalej_proto::OrganizationId;
use nalej_proto::devices::{
    self, AddDeviceGroupRequest, Device, DeviceGroup, DeviceGroupId, DeviceGroupList, DeviceId,
    DeviceList, UpdateDeviceLabelsRequest, UpdateDeviceRequest,
};

use super::{label_change, label_message};
use crate::cli::{DeviceGroupCommands, DevicesCommands};
use crate::client::Platform;
use crate::error::CliError;
use crate::labels;
use crate::output::{Message, TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::{require, toggle};

fn groups_table<W: Write>(writer: &mut W, groups: &[DeviceGroup]) -> Result<(), CliError> {
    let mut t = table(&["NAME", "ID", "ENABLED", "DEFAULT CONNECTIVITY", "API KEY"]);
    for g in groups {
        t.add_row(vec![
            g.name.clone(),
            g.device_group_id.clone(),
            g.enabled.to_string(),
            g.default_device_connectivity.to_string(),
            or_dash(&g.device_group_api_key),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for DeviceGroup {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        groups_table(writer, std::slice::from_ref(self))
    }
}

impl TableDisplay for DeviceGroupList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        groups_table(writer, &self.groups)
    }
}

fn devices_table<W: Write>(
    writer: &mut W,
    devices: &[Device],
    label_length: i64,
) -> Result<(), CliError> {
    let mut t = table(&["ID", "REGISTERED", "ENABLED", "STATUS", "LABELS"]);
    for d in devices {
        t.add_row(vec![
            d.device_id.clone(),
            timestamp(d.register_since),
            d.enabled.to_string(),
            or_dash(&d.device_status),
            labels::display(&d.labels, label_length),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for Device {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        devices_table(writer, std::slice::from_ref(self), label_length)
    }
}

impl TableDisplay for DeviceList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        devices_table(writer, &self.devices, label_length)
    }
}

/// Handler for the devices command.
pub struct DevicesCommand<'a> {
    settings: &'a Settings,
}

impl<'a> DevicesCommand<'a> {
    /// Creates a new devices command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a devices subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &DevicesCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            DevicesCommands::Group { command } => {
                self.group(platform, out, organization_id, command).await
            }
            DevicesCommands::List { device_group_id } => {
                let request = DeviceGroupId {
                    organization_id,
                    device_group_id: require("device group ID", device_group_id)?.to_string(),
                };
                let list = platform.call(&devices::LIST, &request).await?;
                format.write(out, &list)
            }
            DevicesCommands::Label {
                device_group_id,
                device_id,
                change,
            } => {
                let device_group_id = require("device group ID", device_group_id)?.to_string();
                let device_id = require("device ID", device_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateDeviceLabelsRequest {
                    organization_id,
                    device_group_id,
                    device_id,
                    add,
                    labels,
                };
                platform.call(&devices::UPDATE_LABELS, &request).await?;
                format.write(
                    out,
                    &Message::success(label_message(
                        add,
                        &format!("device {}", request.device_id),
                    )),
                )
            }
            DevicesCommands::Update {
                device_group_id,
                device_id,
                enabled,
                disabled,
            } => {
                let device_group_id = require("device group ID", device_group_id)?.to_string();
                let device_id = require("device ID", device_id)?.to_string();
                let enabled = toggle("--enabled", *enabled, "--disabled", *disabled)?;
                let request = UpdateDeviceRequest {
                    organization_id,
                    device_group_id,
                    device_id,
                    enabled,
                };
                let device = platform.call(&devices::UPDATE, &request).await?;
                format.write(out, &device)
            }
            DevicesCommands::Remove {
                device_group_id,
                device_id,
            } => {
                let request = DeviceId {
                    organization_id,
                    device_group_id: require("device group ID", device_group_id)?.to_string(),
                    device_id: require("device ID", device_id)?.to_string(),
                };
                platform.call(&devices::REMOVE, &request).await?;
                format.write(
                    out,
                    &Message::success(format!("Device {} removed", request.device_id)),
                )
            }
        }
    }

    async fn group<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        organization_id: String,
        command: &DeviceGroupCommands,
    ) -> Result<(), CliError> {
        let format = &self.settings.output;

        match command {
            DeviceGroupCommands::Add {
                name,
                enabled,
                disabled,
                default_connectivity,
                no_default_connectivity,
            } => {
                let name = require("name", name)?.to_string();
                let enabled = toggle("--enabled", *enabled, "--disabled", *disabled)?;
                if *default_connectivity && *no_default_connectivity {
                    return Err(CliError::usage(
                        "--default-connectivity and --no-default-connectivity are mutually exclusive",
                    ));
                }
                let request = AddDeviceGroupRequest {
                    organization_id,
                    name,
                    enabled,
                    default_device_connectivity: *default_connectivity,
                };
                let group = platform.call(&devices::ADD_GROUP, &request).await?;
                format.write(out, &group)
            }
            DeviceGroupCommands::List => {
                let list = platform
                    .call(&devices::LIST_GROUPS, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &list)
            }
            DeviceGroupCommands::Remove { device_group_id } => {
                let request = DeviceGroupId {
                    organization_id,
                    device_group_id: require("device group ID", device_group_id)?.to_string(),
                };
                platform.call(&devices::REMOVE_GROUP, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Device group {} removed",
                        request.device_group_id
                    )),
                )
            }
        }
    }
}
