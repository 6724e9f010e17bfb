//! Edge inventory: controllers, assets and devices.

use std::io::Write;

use nalej_proto::OrganizationId;
use nalej_proto::inventory::{
    self, Asset, AssetId, InventoryList, UpdateAssetLabelsRequest, UpdateLocationRequest,
};

use super::{label_change, label_message};
use crate::cli::InventoryCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::labels;
use crate::output::{Message, TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::require;

impl TableDisplay for InventoryList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["TYPE", "ID", "LOCATION", "LABELS", "STATUS"]);
        for c in &self.controllers {
            t.add_row(vec![
                "EC".to_string(),
                c.edge_controller_id.clone(),
                or_dash(&c.location),
                labels::display(&c.labels, label_length),
                c.status.clone(),
            ]);
        }
        for a in &self.assets {
            t.add_row(vec![
                "ASSET".to_string(),
                a.asset_id.clone(),
                or_dash(&a.location),
                labels::display(&a.labels, label_length),
                a.status.clone(),
            ]);
        }
        for d in &self.devices {
            t.add_row(vec![
                "DEVICE".to_string(),
                d.asset_device_id.clone(),
                or_dash(&d.location),
                labels::display(&d.labels, label_length),
                d.status.clone(),
            ]);
        }
        print_table(writer, &t)
    }
}

impl TableDisplay for Asset {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["ID", "EC", "AGENT", "IP", "STATUS", "LAST ALIVE"]);
        t.add_row(vec![
            self.asset_id.clone(),
            self.edge_controller_id.clone(),
            or_dash(&self.agent_id),
            or_dash(&self.eic_net_ip),
            self.status.clone(),
            timestamp(self.last_alive_timestamp),
        ]);
        print_table(writer, &t)?;

        let os = format!("{} {}", self.os.name, self.os.version);
        let mut t = table(&["OS", "LOCATION", "LABELS"]);
        t.add_row(vec![
            or_dash(os.trim()),
            or_dash(&self.location),
            labels::display(&self.labels, label_length),
        ]);
        print_table(writer, &t)
    }
}

/// Handler for the inventory command.
pub struct InventoryCommand<'a> {
    settings: &'a Settings,
}

impl<'a> InventoryCommand<'a> {
    /// Creates a new inventory command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an inventory subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &InventoryCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            InventoryCommands::List => {
                let list = platform
                    .call(&inventory::LIST, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &list)
            }
            InventoryCommands::Info { asset_id } => {
                let request = AssetId {
                    organization_id,
                    asset_id: require("asset ID", asset_id)?.to_string(),
                };
                let asset = platform.call(&inventory::DETAILS, &request).await?;
                format.write(out, &asset)
            }
            InventoryCommands::Location { asset_id, location } => {
                let request = UpdateLocationRequest {
                    organization_id,
                    asset_id: require("asset ID", asset_id)?.to_string(),
                    location: require("location", location)?.to_string(),
                };
                platform.call(&inventory::UPDATE_LOCATION, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Asset {} located at {}",
                        request.asset_id, request.location
                    )),
                )
            }
            InventoryCommands::Label { asset_id, change } => {
                let asset_id = require("asset ID", asset_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateAssetLabelsRequest {
                    organization_id,
                    asset_id,
                    add,
                    labels,
                };
                platform.call(&inventory::UPDATE_LABELS, &request).await?;
                format.write(
                    out,
                    &Message::success(label_message(
                        add,
                        &format!("asset {}", request.asset_id),
                    )),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LabelChange;
    use crate::client::FakePlatform;
    use serde_json::json;
    use tempfile::TempDir;

    async fn run(
        platform: &mut FakePlatform,
        command: InventoryCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut out = Vec::new();
        let result = InventoryCommand::new(&settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn list_shows_every_kind() {
        let mut platform = FakePlatform::new().respond(json!({
            "controllers": [{
                "organizationId": "org-1",
                "edgeControllerId": "ec-1",
                "name": "plant",
                "status": "ONLINE"
            }],
            "assets": [{
                "organizationId": "org-1",
                "edgeControllerId": "ec-1",
                "assetId": "a-1",
                "status": "OFFLINE"
            }],
            "devices": [{
                "organizationId": "org-1",
                "deviceGroupId": "g1",
                "deviceId": "d1",
                "assetDeviceId": "g1#d1",
                "status": "ONLINE"
            }]
        }));
        let (result, out) = run(&mut platform, InventoryCommands::List).await;
        result.unwrap();
        for needle in ["ec-1", "a-1", "g1#d1", "ASSET", "DEVICE"] {
            assert!(out.contains(needle), "missing {needle} in {out}");
        }
    }

    #[tokio::test]
    async fn info_renders_os() {
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "edgeControllerId": "ec-1",
            "assetId": "a-1",
            "os": {"name": "ubuntu", "version": "20.04"},
            "status": "ONLINE"
        }));
        let (result, out) = run(
            &mut platform,
            InventoryCommands::Info {
                asset_id: "a-1".into(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({"organizationId": "org-1", "assetId": "a-1"})
        );
        assert!(out.contains("ubuntu 20.04"));
    }

    #[tokio::test]
    async fn location_requires_value() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            InventoryCommands::Location {
                asset_id: "a-1".into(),
                location: " ".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn label_with_malformed_labels_never_calls() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            InventoryCommands::Label {
                asset_id: "a-1".into(),
                change: LabelChange {
                    labels: "a:b:c".into(),
                    add: true,
                    remove: false,
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Labels(_))));
        assert!(platform.calls().is_empty());
    }
}
