//! Nodes of a cluster.

use std::io::Write;

use nalej_proto::clusters::ClusterId;
use nalej_proto::nodes::{self, NodeList, UpdateNodeLabelsRequest};

use super::{label_change, label_message};
use crate::cli::NodeCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::labels;
use crate::output::{Message, TableDisplay, or_dash, print_table, table};
use crate::settings::Settings;
use crate::validate::require;

impl TableDisplay for NodeList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["ID", "IP", "STATE", "LABELS", "STATUS"]);
        for n in &self.nodes {
            t.add_row(vec![
                n.node_id.clone(),
                or_dash(&n.ip),
                n.state.clone(),
                labels::display(&n.labels, label_length),
                n.status.clone(),
            ]);
        }
        print_table(writer, &t)
    }
}

/// Handler for the node command.
pub struct NodeCommand<'a> {
    settings: &'a Settings,
}

impl<'a> NodeCommand<'a> {
    /// Creates a new node command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a node subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &NodeCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            NodeCommands::List { cluster_id } => {
                let request = ClusterId {
                    organization_id,
                    cluster_id: require("cluster ID", cluster_id)?.to_string(),
                };
                let list = platform.call(&nodes::LIST, &request).await?;
                format.write(out, &list)
            }
            NodeCommands::Label {
                cluster_id,
                node_id,
                change,
            } => {
                let cluster_id = require("cluster ID", cluster_id)?.to_string();
                let node_id = require("node ID", node_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateNodeLabelsRequest {
                    organization_id,
                    cluster_id,
                    node_id,
                    add,
                    labels,
                };
                platform.call(&nodes::UPDATE_LABELS, &request).await?;
                format.write(
                    out,
                    &Message::success(label_message(add, &format!("node {}", request.node_id))),
                )
            }
        }
    }
}
