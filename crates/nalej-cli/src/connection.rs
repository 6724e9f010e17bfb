//! Connection factory.
//!
//! Turns resolved connection settings into a WebSocket URL and an optional
//! TLS connector:
//!
//! - TLS with `insecure`: server certificates and hostnames are not checked.
//! - TLS without `insecure`: a CA bundle is mandatory and is the only trust root.
//! - No TLS: plaintext `ws://`, logged as a warning.

use std::path::PathBuf;
use std::time::Duration;

use native_tls::{Certificate, TlsConnector};
use tracing::{debug, warn};

use crate::client::GatewayClient;
use crate::error::CliError;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Host name or IP address.
    pub address: String,
    /// TCP port.
    pub port: u16,
    /// Use TLS.
    pub use_tls: bool,
    /// PEM bundle trusted when `use_tls` is set.
    pub ca_cert_path: Option<PathBuf>,
    /// Skip server certificate verification.
    pub insecure: bool,
}

impl Connection {
    /// Plaintext connection to `address:port`.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            use_tls: false,
            ca_cert_path: None,
            insecure: false,
        }
    }

    /// Enable TLS, trusting the given CA bundle if any.
    #[must_use]
    pub fn with_tls(mut self, ca_cert_path: Option<PathBuf>, insecure: bool) -> Self {
        self.use_tls = true;
        self.ca_cert_path = ca_cert_path;
        self.insecure = insecure;
        self
    }

    /// WebSocket URL of the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] when no address is configured.
    pub fn url(&self) -> Result<String, CliError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(CliError::usage(
                "platform address not set, use --nalej-address or 'options platform <address>'",
            ));
        }
        let scheme = if self.use_tls { "wss" } else { "ws" };
        Ok(format!("{scheme}://{address}:{}", self.port))
    }

    /// TLS connector matching the settings, `None` for plaintext.
    ///
    /// # Errors
    ///
    /// Fails when TLS is requested without `insecure` and without a CA
    /// bundle, or when the bundle cannot be read or parsed.
    pub fn tls_connector(&self) -> Result<Option<TlsConnector>, CliError> {
        if !self.use_tls {
            warn!(address = %self.address, port = self.port, "using a plaintext connection");
            return Ok(None);
        }

        let mut builder = TlsConnector::builder();
        if self.insecure {
            debug!("server certificate verification disabled");
            builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        } else {
            let path = self.ca_cert_path.as_ref().ok_or_else(|| {
                CliError::usage("a CA certificate (--ca-cert) is required for TLS unless --insecure is set")
            })?;
            let pem = std::fs::read(path).map_err(|e| CliError::file(path, &e))?;
            let ca = Certificate::from_pem(&pem).map_err(|e| {
                CliError::Connection(format!("invalid CA certificate {}: {e}", path.display()))
            })?;
            debug!(path = %path.display(), "trusting CA bundle");
            builder.add_root_certificate(ca);
        }

        builder
            .build()
            .map(Some)
            .map_err(|e| CliError::Connection(format!("cannot build TLS context: {e}")))
    }

    /// Open a client to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the connection fails.
    pub async fn connect(&self) -> Result<GatewayClient, CliError> {
        let url = self.url()?;
        let tls = self.tls_connector()?;
        GatewayClient::connect_with_timeout(&url, tls, DEFAULT_CONNECT_TIMEOUT).await
    }
}
