//! Organizations service.

use serde::{Deserialize, Serialize};

use crate::{OrganizationId, Rpc, Success};

/// Retrieve the organization profile.
pub const INFO: Rpc<OrganizationId, OrganizationInfo> = Rpc::new("Organizations.Info");
/// Update the organization profile.
pub const UPDATE: Rpc<UpdateOrganizationRequest, Success> = Rpc::new("Organizations.Update");
/// Per-application statistics for the organization.
pub const APP_STATS: Rpc<OrganizationId, ApplicationStatsList> =
    Rpc::new("Organizations.AppStats");

/// Organization profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    /// Organization identifier.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Street address.
    #[serde(default)]
    pub full_address: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// Country.
    #[serde(default)]
    pub country: String,
    /// Postal code.
    #[serde(default)]
    pub zip_code: String,
    /// Base64 encoded logo.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub photo_base64: String,
}

/// Partial update of the organization profile; absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    /// New city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// New country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// New postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// New base64 encoded logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
}

/// Runtime statistics of one application instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    /// Application instance identifier.
    pub app_instance_id: String,
    /// Instance name.
    pub name: String,
    /// Instance status.
    pub status: String,
    /// Number of services in the instance.
    pub total_services: i64,
    /// Number of services currently running.
    pub running_services: i64,
}

/// Statistics for every application of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationStatsList {
    /// One entry per application instance.
    #[serde(default)]
    pub stats: Vec<ApplicationStats>,
}
