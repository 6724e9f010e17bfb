//! Roles service.

use serde::{Deserialize, Serialize};

use crate::{OrganizationId, Rpc, Success};

/// List the roles of an organization.
pub const LIST: Rpc<OrganizationId, RoleList> = Rpc::new("Roles.List");
/// Assign a role to a user.
pub const ASSIGN: Rpc<AssignRoleRequest, Success> = Rpc::new("Roles.Assign");

/// A role and the primitives it grants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Organization identifier.
    pub organization_id: String,
    /// Role identifier.
    pub role_id: String,
    /// Role name.
    pub name: String,
    /// Human description.
    #[serde(default)]
    pub description: String,
    /// Internal roles cannot be assigned by users.
    #[serde(default)]
    pub internal: bool,
    /// Access primitives granted by the role.
    #[serde(default)]
    pub primitives: Vec<String>,
}

/// Roles of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleList {
    /// Roles.
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Role assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// User email.
    pub email: String,
    /// Role to assign.
    pub role_id: String,
}
