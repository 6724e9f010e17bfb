//! Users service.

use serde::{Deserialize, Serialize};

use crate::{OrganizationId, Rpc, Success};

/// Create a user.
pub const ADD: Rpc<AddUserRequest, User> = Rpc::new("Users.Add");
/// Retrieve a user.
pub const INFO: Rpc<UserId, User> = Rpc::new("Users.Info");
/// List the users of an organization.
pub const LIST: Rpc<OrganizationId, UserList> = Rpc::new("Users.List");
/// Delete a user.
pub const DELETE: Rpc<UserId, Success> = Rpc::new("Users.Delete");
/// Change a user's password.
pub const RESET_PASSWORD: Rpc<ResetPasswordRequest, Success> = Rpc::new("Users.ResetPassword");
/// Update a user's profile.
pub const UPDATE: Rpc<UpdateUserRequest, Success> = Rpc::new("Users.Update");

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Organization identifier.
    pub organization_id: String,
    /// Email, which doubles as the user identifier.
    pub email: String,
    /// First name.
    pub name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Job title.
    #[serde(default)]
    pub title: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Location.
    #[serde(default)]
    pub location: String,
    /// Seconds since epoch at which the user joined.
    #[serde(default)]
    pub member_since: i64,
    /// Role identifier.
    #[serde(default)]
    pub role_id: String,
    /// Role name.
    #[serde(default)]
    pub role_name: String,
}

/// Users of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserList {
    /// Users.
    #[serde(default)]
    pub users: Vec<User>,
}

/// Identifies a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserId {
    /// Organization identifier.
    pub organization_id: String,
    /// User email.
    pub email: String,
}

/// New user definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// User email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// First name.
    pub name: String,
    /// Role to grant.
    pub role_id: String,
}

/// Password change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// User email.
    pub email: String,
    /// Current password.
    pub password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Partial profile update; absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// User email.
    pub email: String,
    /// New first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl UpdateUserRequest {
    /// Whether the update would change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.last_name.is_none()
            && self.title.is_none()
            && self.phone.is_none()
            && self.location.is_none()
    }
}
