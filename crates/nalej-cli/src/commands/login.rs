//! Login and logout.
//!
//! `login` is the only call made without a bearer token. On success both
//! tokens are stored under the base directory and the organization of the
//! account becomes the default `organizationID`.

use std::io::Write;

use nalej_config::keys;
use nalej_proto::login::{self, LoginRequest};
use tracing::info;

use crate::cli::LoginArgs;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::Message;
use crate::settings::Settings;
use crate::validate::require;

/// Handler for `login` and `logout`.
pub struct LoginCommand<'a> {
    settings: &'a Settings,
}

impl<'a> LoginCommand<'a> {
    /// Creates a new login command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Authenticate and store the credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, the call, or storing fails.
    pub async fn login<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        args: &LoginArgs,
    ) -> Result<(), CliError> {
        let email = require("email", &args.email)?;
        let password = require("password", &args.password)?;

        let response = platform
            .call(
                &login::LOGIN,
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        if response.token.trim().is_empty() || response.refresh_token.trim().is_empty() {
            return Err(CliError::Protocol(
                "login response carries no token or refresh token".into(),
            ));
        }
        self.settings
            .credentials()
            .store(&response.token, &response.refresh_token)?;
        if !response.organization_id.is_empty() {
            self.settings
                .options()
                .set(keys::ORGANIZATION_ID, &response.organization_id)?;
        }
        info!(email, role = %response.role_name, "logged in");

        let role = if response.role_name.is_empty() {
            String::new()
        } else {
            format!(" ({})", response.role_name)
        };
        self.settings
            .output
            .write(out, &Message::success(format!("Logged in as {email}{role}")))
    }

    /// Remove the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be removed.
    pub fn logout<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        self.settings.credentials().clear()?;
        self.settings.output.write(out, &Message::success("Logged out"))
    }
}
