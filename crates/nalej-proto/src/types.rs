//! Types shared across services.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Labels attached to an entity. Ordered so renderings are stable.
pub type LabelMap = BTreeMap<String, String>;

/// Request addressed to a whole organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationId {
    /// Organization identifier.
    pub organization_id: String,
}

impl OrganizationId {
    /// Wrap an organization identifier.
    #[must_use]
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
        }
    }
}

/// Empty acknowledgement returned by mutating calls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Success {}

/// Acknowledgement of a long-running operation the platform runs in the
/// background (installs, provisioning, agent operations).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    /// Organization identifier.
    pub organization_id: String,
    /// Identifier to track the operation with.
    pub request_id: String,
    /// Cluster affected by the operation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Current state of the operation.
    pub state: String,
    /// Extra information or error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Infrastructure provider hosting a cluster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetPlatform {
    /// Microsoft Azure.
    Azure,
    /// Self-managed hardware.
    BareMetal,
    /// A local minikube.
    Minikube,
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Azure => f.write_str("AZURE"),
            Self::BareMetal => f.write_str("BARE_METAL"),
            Self::Minikube => f.write_str("MINIKUBE"),
        }
    }
}

impl FromStr for TargetPlatform {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "AZURE" => Ok(Self::Azure),
            "BARE_METAL" | "BAREMETAL" => Ok(Self::BareMetal),
            "MINIKUBE" => Ok(Self::Minikube),
            _ => Err(ProtoError::InvalidValue {
                field: "target platform",
                value: s.to_string(),
            }),
        }
    }
}
