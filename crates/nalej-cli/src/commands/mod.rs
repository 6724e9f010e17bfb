//! CLI command implementations.
//!
//! Each submodule implements one resource:
//! - [`login`] - Login and logout
//! - [`options`] - Stored default values
//! - [`org`] - Organization profile and statistics
//! - [`users`] / [`roles`] - Accounts and permissions
//! - [`cluster`] / [`node`] / [`provision`] - Application clusters
//! - [`edge_controller`] / [`agent`] / [`devices`] / [`inventory`] - Edge
//! - [`apps`] / [`appnet`] - Applications and their connections
//! - [`monitoring`] / [`logs`] - Observability
//!
//! Handlers validate their arguments before the first call on the
//! [`Platform`], so invalid invocations never reach the network.

pub mod agent;
pub mod appnet;
pub mod apps;
pub mod cluster;
pub mod devices;
pub mod edge_controller;
pub mod inventory;
pub mod login;
pub mod logs;
pub mod monitoring;
pub mod node;
pub mod options;
pub mod org;
pub mod provision;
pub mod roles;
pub mod users;

pub use agent::AgentCommand;
pub use appnet::AppnetCommand;
pub use apps::AppCommand;
pub use cluster::ClusterCommand;
pub use devices::DevicesCommand;
pub use edge_controller::EdgeControllerCommand;
pub use inventory::InventoryCommand;
pub use login::LoginCommand;
pub use logs::LogCommand;
pub use monitoring::MonitoringCommand;
pub use node::NodeCommand;
pub use options::OptionsCommand;
pub use org::OrgCommand;
pub use provision::ProvisionCommand;
pub use roles::RolesCommand;
pub use users::UsersCommand;

use std::io::Write;

use nalej_proto::edge::SshCredentials;
use nalej_proto::{LabelMap, OperationResponse, Rpc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cli::{LabelChange, SshArgs};
use crate::client::Platform;
use crate::error::CliError;
use crate::labels::Labels;
use crate::output::{TableDisplay, or_dash, print_table, table};
use crate::validate::{read_file, require, toggle};
use crate::watch::{Source, Watched};

/// Validate a label change: exactly one of `--add`/`--remove` and a
/// well-formed label list. Returns `true` for additions.
pub(crate) fn label_change(change: &LabelChange) -> Result<(bool, LabelMap), CliError> {
    let add = toggle("--add", change.add, "--remove", change.remove)?;
    let labels = Labels::parse(&change.labels)?;
    Ok((add, labels.into_map()))
}

/// Validate SSH access: user and host plus exactly one of password or key.
pub(crate) fn ssh_credentials(ssh: &SshArgs) -> Result<(String, SshCredentials), CliError> {
    let host = require("target host", &ssh.target_host)?.to_string();
    let username = require("username", &ssh.username)?.to_string();
    let password = ssh.password.as_deref().filter(|p| !p.is_empty());
    toggle(
        "--password",
        password.is_some(),
        "--public-key-path",
        ssh.public_key_path.is_some(),
    )?;
    let client_certificate = match &ssh.public_key_path {
        Some(path) => Some(read_file(path)?),
        None => None,
    };
    Ok((
        host,
        SshCredentials {
            username,
            password: password.map(str::to_string),
            client_certificate,
        },
    ))
}

/// Message for label updates.
pub(crate) fn label_message(add: bool, target: &str) -> String {
    if add {
        format!("Labels added to {target}")
    } else {
        format!("Labels removed from {target}")
    }
}

impl TableDisplay for OperationResponse {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["REQUEST", "CLUSTER", "STATE", "INFO"]);
        t.add_row(vec![
            self.request_id.clone(),
            or_dash(self.cluster_id.as_deref().unwrap_or_default()),
            self.state.clone(),
            or_dash(self.info.as_deref().unwrap_or_default()),
        ]);
        print_table(writer, &t)
    }
}

/// A list call re-issued by the watch loop.
pub(crate) struct Poll<'a, P, Req, Resp, T> {
    platform: &'a mut P,
    rpc: &'a Rpc<Req, Resp>,
    request: Req,
    extract: fn(Resp) -> Vec<T>,
}

impl<'a, P, Req, Resp, T> Poll<'a, P, Req, Resp, T> {
    pub(crate) fn new(
        platform: &'a mut P,
        rpc: &'a Rpc<Req, Resp>,
        request: Req,
        extract: fn(Resp) -> Vec<T>,
    ) -> Self {
        Self {
            platform,
            rpc,
            request,
            extract,
        }
    }
}

impl<P, Req, Resp, T> Source for Poll<'_, P, Req, Resp, T>
where
    P: Platform,
    Req: Serialize,
    Resp: DeserializeOwned,
    T: Watched + Clone,
{
    type Item = T;

    async fn fetch(&mut self) -> Result<Vec<T>, CliError> {
        let response = self.platform.call(self.rpc, &self.request).await?;
        Ok((self.extract)(response))
    }
}
