//! # nalej-cli
//!
//! Command-line client for the Nalej public API.
//!
//! Provides commands for:
//! - Organizations, users and roles
//! - Clusters, nodes and provisioning
//! - Edge controllers, agents, devices and inventory
//! - Application descriptors, instances and their network connections
//! - Monitoring summaries and unified log search
//!
//! # Architecture
//!
//! Every command resolves its parameters (flag, then stored option, then
//! default), validates them, and issues typed calls through the
//! [`client::Platform`] trait. The production implementation is
//! [`session::Session`], which loads the stored bearer token and opens a
//! WebSocket connection on the first call.
//!
//! ```text
//! ┌─────────────┐   RequestFrame/ResponseFrame   ┌──────────────┐
//! │  nalej-cli  │◄──────────────────────────────►│  public API  │
//! └─────────────┘        (WebSocket, TLS)        └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod connection;
pub mod error;
pub mod labels;
pub mod output;
pub mod session;
pub mod settings;
pub mod validate;
pub mod watch;

pub use cli::{Cli, Commands, Format, GlobalArgs};
pub use client::{GatewayClient, Platform};
pub use error::CliError;
pub use labels::Labels;
pub use output::OutputFormat;
pub use session::Session;
pub use settings::Settings;
