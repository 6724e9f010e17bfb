//! Provisioning of cloud clusters.

use std::io::Write;

use nalej_proto::provision::{
    self, DecommissionClusterRequest, ProvisionClusterRequest, ScaleClusterRequest,
};
use tracing::info;

use crate::cli::ProvisionCommands;
use crate::client::{LONG_CALL_TIMEOUT, Platform};
use crate::error::CliError;
use crate::settings::Settings;
use crate::validate::require;

fn node_count(num_nodes: i64) -> Result<i64, CliError> {
    if num_nodes <= 0 {
        return Err(CliError::usage("--num-nodes must be greater than zero"));
    }
    Ok(num_nodes)
}

/// Handler for the provision command.
pub struct ProvisionCommand<'a> {
    settings: &'a Settings,
}

impl<'a> ProvisionCommand<'a> {
    /// Creates a new provision command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a provision subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &ProvisionCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        let response = match command {
            ProvisionCommands::Cluster {
                cluster_name,
                num_nodes,
                node_type,
                zone,
                target_platform,
                kubernetes_version,
            } => {
                let request = ProvisionClusterRequest {
                    organization_id,
                    cluster_name: require("cluster name", cluster_name)?.to_string(),
                    kubernetes_version: kubernetes_version
                        .as_deref()
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string),
                    num_nodes: node_count(*num_nodes)?,
                    node_type: require("node type", node_type)?.to_string(),
                    zone: require("zone", zone)?.to_string(),
                    target_platform: *target_platform,
                };
                info!(
                    cluster = %request.cluster_name,
                    nodes = request.num_nodes,
                    platform = %request.target_platform,
                    "provisioning cluster"
                );
                platform
                    .call_with_timeout(&provision::CLUSTER, &request, LONG_CALL_TIMEOUT)
                    .await?
            }
            ProvisionCommands::Scale {
                cluster_id,
                num_nodes,
                target_platform,
            } => {
                let request = ScaleClusterRequest {
                    organization_id,
                    cluster_id: require("cluster ID", cluster_id)?.to_string(),
                    num_nodes: node_count(*num_nodes)?,
                    target_platform: *target_platform,
                };
                info!(
                    cluster_id = %request.cluster_id,
                    nodes = request.num_nodes,
                    "scaling cluster"
                );
                platform
                    .call_with_timeout(&provision::SCALE, &request, LONG_CALL_TIMEOUT)
                    .await?
            }
            ProvisionCommands::Decommission {
                cluster_id,
                target_platform,
            } => {
                let request = DecommissionClusterRequest {
                    organization_id,
                    cluster_id: require("cluster ID", cluster_id)?.to_string(),
                    target_platform: *target_platform,
                };
                info!(cluster_id = %request.cluster_id, "decommissioning cluster");
                platform
                    .call_with_timeout(&provision::DECOMMISSION, &request, LONG_CALL_TIMEOUT)
                    .await?
            }
        };
        format.write(out, &response)
    }
}
