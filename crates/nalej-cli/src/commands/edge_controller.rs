//! Edge controllers.

use std::io::Write;
use std::path::Path;

use nalej_proto::OrganizationId;
use nalej_proto::edge::{
    self, EdgeControllerOpResponse, InstallEdgeControllerRequest, JoinToken, UnlinkRequest,
    UpdateEdgeControllerLabelsRequest, UpdateGeolocationRequest,
};
use tracing::info;

use super::{label_change, label_message, ssh_credentials};
use crate::cli::EdgeControllerCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::require;

impl TableDisplay for JoinToken {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["TOKEN", "EXPIRES"]);
        t.add_row(vec![self.token.clone(), timestamp(self.expires)]);
        print_table(writer, &t)
    }
}

impl TableDisplay for EdgeControllerOpResponse {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["EC", "ASSET", "OPERATION", "STATUS", "INFO"]);
        t.add_row(vec![
            self.edge_controller_id.clone(),
            or_dash(&self.asset_id),
            self.operation_id.clone(),
            self.status.clone(),
            or_dash(&self.info),
        ]);
        print_table(writer, &t)
    }
}

fn save_token(path: &Path, token: &JoinToken) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(token)
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| CliError::file(path, &e))?;
    info!(path = %path.display(), "join token saved");
    Ok(())
}

/// Handler for the ec command.
pub struct EdgeControllerCommand<'a> {
    settings: &'a Settings,
}

impl<'a> EdgeControllerCommand<'a> {
    /// Creates a new edge controller command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an ec subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, the call, or saving the token fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &EdgeControllerCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            EdgeControllerCommands::CreateJoinToken { output_path } => {
                let token = platform
                    .call(&edge::CREATE_JOIN_TOKEN, &OrganizationId::new(organization_id))
                    .await?;
                if let Some(path) = output_path {
                    save_token(path, &token)?;
                }
                format.write(out, &token)
            }
            EdgeControllerCommands::Unlink {
                edge_controller_id,
                force,
            } => {
                let request = UnlinkRequest {
                    organization_id,
                    edge_controller_id: require("edge controller ID", edge_controller_id)?
                        .to_string(),
                    force: *force,
                };
                platform.call(&edge::UNLINK, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Edge controller {} unlinked",
                        request.edge_controller_id
                    )),
                )
            }
            EdgeControllerCommands::Install {
                edge_controller_id,
                ssh,
            } => {
                let edge_controller_id =
                    require("edge controller ID", edge_controller_id)?.to_string();
                let (target_host, credentials) = ssh_credentials(ssh)?;
                let request = InstallEdgeControllerRequest {
                    organization_id,
                    edge_controller_id,
                    target_host,
                    credentials,
                    sudoer: ssh.sudoer,
                };
                let response = platform.call(&edge::INSTALL, &request).await?;
                format.write(out, &response)
            }
            EdgeControllerCommands::Location {
                edge_controller_id,
                geolocation,
            } => {
                let request = UpdateGeolocationRequest {
                    organization_id,
                    edge_controller_id: require("edge controller ID", edge_controller_id)?
                        .to_string(),
                    geolocation: require("geolocation", geolocation)?.to_string(),
                };
                platform.call(&edge::UPDATE_GEOLOCATION, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Edge controller {} located at {}",
                        request.edge_controller_id, request.geolocation
                    )),
                )
            }
            EdgeControllerCommands::Label {
                edge_controller_id,
                change,
            } => {
                let edge_controller_id =
                    require("edge controller ID", edge_controller_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateEdgeControllerLabelsRequest {
                    organization_id,
                    edge_controller_id,
                    add,
                    labels,
                };
                platform.call(&edge::UPDATE_LABELS, &request).await?;
                format.write(
                    out,
                    &Message::success(label_message(
                        add,
                        &format!("edge controller {}", request.edge_controller_id),
                    )),
                )
            }
        }
    }
}
