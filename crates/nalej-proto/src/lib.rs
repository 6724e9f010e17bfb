//! # nalej-proto
//!
//! Request/response contract consumed by the Nalej public API client.
//!
//! Every remote operation is described by an [`Rpc`] descriptor that binds a
//! method name (`"Service.Operation"`) to its request and response types.
//! Calls travel inside a [`RequestFrame`] and come back as a
//! [`ResponseFrame`] carrying either a result or an [`ErrorShape`].
//!
//! ```text
//! ┌────────────────┐    RequestFrame     ┌──────────────────┐
//! │ public-api-cli │────────────────────►│  Nalej public API │
//! │                │◄────────────────────│                  │
//! └────────────────┘    ResponseFrame    └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod applications;
pub mod appnet;
pub mod clusters;
pub mod devices;
pub mod edge;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod login;
pub mod monitoring;
pub mod nodes;
pub mod organizations;
pub mod provision;
pub mod roles;
pub mod rpc;
pub mod types;
pub mod users;

pub use error::ProtoError;
pub use rpc::{AuthParams, ErrorCode, ErrorShape, RequestFrame, ResponseFrame, Rpc};
pub use types::{LabelMap, OperationResponse, OrganizationId, Success, TargetPlatform};
