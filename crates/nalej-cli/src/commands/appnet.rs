//! Connections between application instances.

use std::io::Write;

use nalej_proto::OrganizationId;
use nalej_proto::appnet::{
    self, ConnectionList, ConnectionRequest, InterfaceList, RemoveConnectionRequest,
};

use super::apps::instance_ref;
use crate::cli::AppnetCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, or_dash, print_table, table};
use crate::settings::Settings;
use crate::validate::require;

impl TableDisplay for ConnectionList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["SOURCE", "OUTBOUND", "TARGET", "INBOUND", "REQUIRED", "STATUS"]);
        for c in &self.connections {
            t.add_row(vec![
                or_dash(&c.source_instance_name),
                c.outbound_name.clone(),
                or_dash(&c.target_instance_name),
                c.inbound_name.clone(),
                c.outbound_required.to_string(),
                c.status.clone(),
            ]);
        }
        print_table(writer, &t)
    }
}

impl TableDisplay for InterfaceList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["INSTANCE", "INSTANCE ID", "INTERFACE"]);
        for i in &self.interfaces {
            t.add_row(vec![
                i.instance_name.clone(),
                i.app_instance_id.clone(),
                i.interface_name.clone(),
            ]);
        }
        print_table(writer, &t)
    }
}

/// Handler for the appnet command.
pub struct AppnetCommand<'a> {
    settings: &'a Settings,
}

impl<'a> AppnetCommand<'a> {
    /// Creates a new appnet command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an appnet subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &AppnetCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            AppnetCommands::Add {
                source_instance_id,
                outbound,
                target_instance_id,
                inbound,
            } => {
                let request = ConnectionRequest {
                    organization_id,
                    source_instance_id: require("source instance ID", source_instance_id)?
                        .to_string(),
                    outbound_name: require("outbound", outbound)?.to_string(),
                    target_instance_id: require("target instance ID", target_instance_id)?
                        .to_string(),
                    inbound_name: require("inbound", inbound)?.to_string(),
                };
                platform.call(&appnet::ADD_CONNECTION, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Connection {}:{} -> {}:{} requested",
                        request.source_instance_id,
                        request.outbound_name,
                        request.target_instance_id,
                        request.inbound_name
                    )),
                )
            }
            AppnetCommands::Remove {
                source_instance_id,
                outbound,
                target_instance_id,
                inbound,
                force,
            } => {
                let request = RemoveConnectionRequest {
                    organization_id,
                    source_instance_id: require("source instance ID", source_instance_id)?
                        .to_string(),
                    outbound_name: require("outbound", outbound)?.to_string(),
                    target_instance_id: require("target instance ID", target_instance_id)?
                        .to_string(),
                    inbound_name: require("inbound", inbound)?.to_string(),
                    user_confirmation: *force,
                };
                platform.call(&appnet::REMOVE_CONNECTION, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Connection {}:{} -> {}:{} removal requested",
                        request.source_instance_id,
                        request.outbound_name,
                        request.target_instance_id,
                        request.inbound_name
                    )),
                )
            }
            AppnetCommands::List => {
                let list = platform
                    .call(
                        &appnet::LIST_CONNECTIONS,
                        &OrganizationId::new(organization_id),
                    )
                    .await?;
                format.write(out, &list)
            }
            AppnetCommands::Inbound { instance_id } => {
                let request = instance_ref(organization_id, instance_id)?;
                let list = platform
                    .call(&appnet::LIST_AVAILABLE_INBOUNDS, &request)
                    .await?;
                format.write(out, &list)
            }
            AppnetCommands::Outbound { instance_id } => {
                let request = instance_ref(organization_id, instance_id)?;
                let list = platform
                    .call(&appnet::LIST_AVAILABLE_OUTBOUNDS, &request)
                    .await?;
                format.write(out, &list)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakePlatform;
    use serde_json::json;
    use tempfile::TempDir;

    async fn run(
        platform: &mut FakePlatform,
        command: AppnetCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut out = Vec::new();
        let result = AppnetCommand::new(&settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn add_names_both_ends() {
        let mut platform = FakePlatform::new().respond(json!({}));
        let (result, out) = run(
            &mut platform,
            AppnetCommands::Add {
                source_instance_id: "i1".into(),
                outbound: "db".into(),
                target_instance_id: "i2".into(),
                inbound: "mysql".into(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({
                "organizationId": "org-1",
                "sourceInstanceId": "i1",
                "outboundName": "db",
                "targetInstanceId": "i2",
                "inboundName": "mysql"
            })
        );
        assert_eq!(out, "✓ Connection i1:db -> i2:mysql requested\n");
    }

    #[tokio::test]
    async fn remove_forwards_force_as_confirmation() {
        let mut platform = FakePlatform::new().respond(json!({}));
        let (result, _) = run(
            &mut platform,
            AppnetCommands::Remove {
                source_instance_id: "i1".into(),
                outbound: "db".into(),
                target_instance_id: "i2".into(),
                inbound: "mysql".into(),
                force: true,
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.single_params()["userConfirmation"], true);
    }

    #[tokio::test]
    async fn add_requires_inbound() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            AppnetCommands::Add {
                source_instance_id: "i1".into(),
                outbound: "db".into(),
                target_instance_id: "i2".into(),
                inbound: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(m)) if m == "inbound cannot be empty"));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn list_and_interfaces() {
        let mut platform = FakePlatform::new().respond(json!({"connections": [{
            "organizationId": "org-1",
            "connectionId": "c1",
            "sourceInstanceId": "i1",
            "sourceInstanceName": "blog",
            "targetInstanceId": "i2",
            "targetInstanceName": "db",
            "inboundName": "mysql",
            "outboundName": "db",
            "status": "ESTABLISHED"
        }]}));
        let (result, out) = run(&mut platform, AppnetCommands::List).await;
        result.unwrap();
        assert!(out.contains("ESTABLISHED"));

        let mut platform = FakePlatform::new().respond(json!({"interfaces": [
            {"appInstanceId": "i2", "instanceName": "db", "interfaceName": "mysql"}
        ]}));
        let (result, out) = run(
            &mut platform,
            AppnetCommands::Inbound {
                instance_id: "i2".into(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["ApplicationNetwork.ListAvailableInbounds"]);
        assert!(out.contains("mysql"));
    }
}
