//! Lazily connected, authenticated access to the platform.
//!
//! A [`Session`] does nothing until the first call. It then loads the
//! stored bearer token and opens the connection, so commands that fail
//! validation never touch the credential files or the network.

use std::time::Duration;

use nalej_config::Credentials;
use serde_json::Value;
use tracing::debug;

use crate::client::{CallContext, GatewayClient, Platform};
use crate::connection::Connection;
use crate::error::CliError;

/// Connection plus credentials, opened on first use.
#[derive(Debug)]
pub struct Session {
    connection: Connection,
    credentials: Option<Credentials>,
    token: Option<String>,
    client: Option<GatewayClient>,
}

impl Session {
    /// Session authenticated with the token stored in `credentials`.
    #[must_use]
    pub const fn new(connection: Connection, credentials: Credentials) -> Self {
        Self {
            connection,
            credentials: Some(credentials),
            token: None,
            client: None,
        }
    }

    /// Session without credentials, used by `login`.
    #[must_use]
    pub const fn anonymous(connection: Connection) -> Self {
        Self {
            connection,
            credentials: None,
            token: None,
            client: None,
        }
    }

    /// Whether the connection has been opened.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn context(&mut self, timeout: Duration) -> Result<CallContext, CliError> {
        if self.token.is_none() {
            self.token = self
                .credentials
                .as_ref()
                .map(Credentials::load)
                .transpose()
                .map_err(CliError::Credentials)?
                .map(|stored| stored.token);
        }
        Ok(CallContext::new(self.token.clone()).with_timeout(timeout))
    }

    /// Close the connection if it was opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake fails.
    pub async fn close(mut self) -> Result<(), CliError> {
        match self.client.take() {
            Some(client) => client.close().await,
            None => Ok(()),
        }
    }
}

impl Platform for Session {
    async fn invoke(
        &mut self,
        method: &'static str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, CliError> {
        let ctx = self.context(timeout)?;
        let client = match self.client.take() {
            Some(client) => client,
            None => {
                let client = self.connection.connect().await?;
                debug!(connection = ?self.connection, "session opened");
                client
            }
        };
        let client = self.client.insert(client);
        client.call(method, params, &ctx).await
    }
}
