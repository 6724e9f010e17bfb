//! Agents on edge assets.

use std::io::Write;

use nalej_proto::agent::{
    self, AgentJoinToken, AgentMonitoringRequest, EdgeControllerId, InstallAgentRequest,
    UninstallAgentRequest, UpdateAgentLabelsRequest,
};

use super::{label_change, label_message, ssh_credentials};
use crate::cli::AgentCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::{require, toggle};

impl TableDisplay for AgentJoinToken {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["EC", "TOKEN", "EXPIRES"]);
        t.add_row(vec![
            self.edge_controller_id.clone(),
            self.token.clone(),
            timestamp(self.expires),
        ]);
        print_table(writer, &t)
    }
}

/// Handler for the agent command.
pub struct AgentCommand<'a> {
    settings: &'a Settings,
}

impl<'a> AgentCommand<'a> {
    /// Creates a new agent command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an agent subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &AgentCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            AgentCommands::CreateJoinToken { edge_controller_id } => {
                let request = EdgeControllerId {
                    organization_id,
                    edge_controller_id: require("edge controller ID", edge_controller_id)?
                        .to_string(),
                };
                let token = platform.call(&agent::CREATE_JOIN_TOKEN, &request).await?;
                format.write(out, &token)
            }
            AgentCommands::Install {
                edge_controller_id,
                ssh,
                agent_type,
            } => {
                let edge_controller_id =
                    require("edge controller ID", edge_controller_id)?.to_string();
                let (target_host, credentials) = ssh_credentials(ssh)?;
                let request = InstallAgentRequest {
                    organization_id,
                    edge_controller_id,
                    agent_type: (*agent_type).into(),
                    target_host,
                    credentials,
                    sudoer: ssh.sudoer,
                };
                let response = platform.call(&agent::INSTALL, &request).await?;
                format.write(out, &response)
            }
            AgentCommands::Uninstall { asset_id, force } => {
                let request = UninstallAgentRequest {
                    organization_id,
                    asset_id: require("asset ID", asset_id)?.to_string(),
                    force: *force,
                };
                let response = platform.call(&agent::UNINSTALL, &request).await?;
                format.write(out, &response)
            }
            AgentCommands::Monitoring {
                edge_controller_id,
                asset_id,
                activate,
                deactivate,
            } => {
                let edge_controller_id =
                    require("edge controller ID", edge_controller_id)?.to_string();
                let asset_id = require("asset ID", asset_id)?.to_string();
                let activate = toggle("--activate", *activate, "--deactivate", *deactivate)?;
                let request = AgentMonitoringRequest {
                    organization_id,
                    edge_controller_id,
                    asset_id,
                    activate,
                };
                platform.call(&agent::MONITORING, &request).await?;
                let verb = if activate { "activated" } else { "deactivated" };
                format.write(
                    out,
                    &Message::success(format!(
                        "Monitoring {verb} on asset {}",
                        request.asset_id
                    )),
                )
            }
            AgentCommands::Label {
                edge_controller_id,
                asset_id,
                change,
            } => {
                let edge_controller_id =
                    require("edge controller ID", edge_controller_id)?.to_string();
                let asset_id = require("asset ID", asset_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateAgentLabelsRequest {
                    organization_id,
                    edge_controller_id,
                    asset_id,
                    add,
                    labels,
                };
                platform.call(&agent::UPDATE_LABELS, &request).await?;
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
