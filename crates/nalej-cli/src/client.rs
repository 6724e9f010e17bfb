//! Typed calls against the public API.
//!
//! [`Platform`] is the seam every command talks to: one method to invoke a
//! named remote method with JSON parameters, plus provided helpers that
//! serialize typed requests and decode typed responses. [`GatewayClient`]
//! is the WebSocket transport used by [`crate::session::Session`].
//!
//! # Example
//!
//! ```rust,no_run
//! use nalej_cli::client::{CallContext, GatewayClient};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), nalej_cli::CliError> {
//! let mut client = GatewayClient::connect("ws://localhost:443").await?;
//! let ctx = CallContext::new(Some("token".into()));
//! let clusters = client
//!     .call("Clusters.List", json!({"organizationId": "org-1"}), &ctx)
//!     .await?;
//! println!("{clusters}");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use nalej_proto::{RequestFrame, ResponseFrame, Rpc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
    tungstenite::Message,
};
use tracing::{debug, trace};

use crate::error::CliError;

/// Timeout applied to ordinary calls.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for calls that start long-running operations (installs, provisioning).
pub const LONG_CALL_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Per-call credentials and deadline.
#[derive(Clone)]
pub struct CallContext {
    token: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("authenticated", &self.token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CallContext {
    /// Context with the default timeout.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Replace the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bearer token, if the call is authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Deadline of the call.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Anything able to run remote methods.
#[allow(async_fn_in_trait)]
pub trait Platform {
    /// Invoke `method` with raw JSON parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the call cannot be made or the platform rejects it.
    async fn invoke(
        &mut self,
        method: &'static str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, CliError>;

    /// Typed call with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the call, or decoding fails.
    async fn call<Req, Resp>(&mut self, rpc: &Rpc<Req, Resp>, request: &Req) -> Result<Resp, CliError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        self.call_with_timeout(rpc, request, DEFAULT_CALL_TIMEOUT).await
    }

    /// Typed call with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the call, or decoding fails.
    async fn call_with_timeout<Req, Resp>(
        &mut self,
        rpc: &Rpc<Req, Resp>,
        request: &Req,
        timeout: Duration,
    ) -> Result<Resp, CliError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let params = serde_json::to_value(request)
            .map_err(|e| CliError::Protocol(format!("cannot encode {} request: {e}", rpc.name())))?;
        let result = self.invoke(rpc.name(), params, timeout).await?;
        serde_json::from_value(result)
            .map_err(|e| CliError::Protocol(format!("invalid {} response: {e}", rpc.name())))
    }
}

/// WebSocket client speaking the request/response envelope.
pub struct GatewayClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Connect without a custom TLS connector.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails.
    pub async fn connect(url: &str) -> Result<Self, CliError> {
        Self::connect_with_timeout(url, None, crate::connection::DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect with an optional TLS connector and a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails.
    pub async fn connect_with_timeout(
        url: &str,
        tls: Option<native_tls::TlsConnector>,
        connect_timeout: Duration,
    ) -> Result<Self, CliError> {
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(CliError::Connection(format!(
                "invalid URL: {url}, must start with ws:// or wss://"
            )));
        }

        debug!(url = %url, "connecting");
        let connector = tls.map(Connector::NativeTls);
        let (ws, _response) = timeout(
            connect_timeout,
            connect_async_tls_with_config(url, None, false, connector),
        )
        .await
        .map_err(|_| CliError::Timeout(format!("connecting to {url}")))?
        .map_err(|e| CliError::Connection(format!("{url}: {e}")))?;
        debug!(url = %url, "connected");

        Ok(Self {
            ws,
            url: url.to_string(),
        })
    }

    /// Run one remote method and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] when the platform reports a failure,
    /// [`CliError::Timeout`] past the context deadline, and connection or
    /// protocol errors otherwise.
    pub async fn call(&mut self, method: &str, params: Value, ctx: &CallContext) -> Result<Value, CliError> {
        let request = RequestFrame::new(method, params, ctx.token());
        let json = request.to_json()?;

        trace!(method, id = %request.id, "sending request");
        self.ws
            .send(Message::Text(json))
            .await
            .map_err(|e| CliError::Connection(e.to_string()))?;

        let response = timeout(ctx.timeout(), self.next_response())
            .await
            .map_err(|_| CliError::Timeout(format!("request '{method}' timed out")))??;

        if response.id != request.id {
            return Err(CliError::Protocol(format!(
                "response {} does not match request {}",
                response.id, request.id
            )));
        }
        trace!(method, id = %request.id, "received response");

        response.into_outcome()?.map_err(|e| CliError::Remote {
            code: e.code,
            message: e.message,
            details: e.details,
        })
    }

    async fn next_response(&mut self) -> Result<ResponseFrame, CliError> {
        loop {
            let message = self
                .ws
                .next()
                .await
                .ok_or_else(|| CliError::Connection("connection closed".into()))?
                .map_err(|e| CliError::Connection(e.to_string()))?;

            match message {
                Message::Text(text) => return Ok(ResponseFrame::from_json(&text)?),
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Binary(_) => {
                    return Err(CliError::Protocol("unexpected binary message".into()));
                }
                Message::Close(_) => {
                    return Err(CliError::Connection("connection closed by server".into()));
                }
                Message::Frame(_) => return Err(CliError::Protocol("unexpected raw frame".into())),
            }
        }
    }

    /// Close the connection gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake fails.
    pub async fn close(mut self) -> Result<(), CliError> {
        self.ws
            .close(None)
            .await
            .map_err(|e| CliError::Connection(e.to_string()))
    }
}

/// Scripted platform for tests.
///
/// Answers calls in order from a queue and records every call. Once the
/// queue is empty every call fails, which also ends watch loops.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakePlatform {
    responses: std::collections::VecDeque<Result<Value, CliError>>,
    calls: Vec<RecordedCall>,
}

/// A call seen by [`FakePlatform`].
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Method name.
    pub method: &'static str,
    /// Parameters.
    pub params: Value,
    /// Requested timeout.
    pub timeout: Duration,
}

#[cfg(test)]
impl FakePlatform {
    /// Platform with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    #[must_use]
    pub fn respond(mut self, result: Value) -> Self {
        self.responses.push_back(Ok(result));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(mut self, error: CliError) -> Self {
        self.responses.push_back(Err(error));
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Method names of every call made so far.
    pub fn methods(&self) -> Vec<&'static str> {
        self.calls.iter().map(|c| c.method).collect()
    }

    /// Parameters of the only call made.
    pub fn single_params(&self) -> &Value {
        assert_eq!(self.calls.len(), 1, "expected exactly one call: {:?}", self.methods());
        &self.calls[0].params
    }
}

#[cfg(test)]
impl Platform for FakePlatform {
    async fn invoke(
        &mut self,
        method: &'static str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, CliError> {
        self.calls.push(RecordedCall {
            method,
            params,
            timeout,
        });
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(CliError::Connection("no scripted response left".into())))
    }
}
