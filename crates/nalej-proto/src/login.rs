//! Login service.

use serde::{Deserialize, Serialize};

use crate::Rpc;

/// Exchange an email and password for a session token.
pub const LOGIN: Rpc<LoginRequest, LoginResponse> = Rpc::new("Login.Login");

/// Credentials presented at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Session issued by the login service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token attached to subsequent calls.
    pub token: String,
    /// Token used to renew the session.
    pub refresh_token: String,
    /// Organization the user belongs to.
    #[serde(default)]
    pub organization_id: String,
    /// Role granted to the user.
    #[serde(default)]
    pub role_name: String,
}
