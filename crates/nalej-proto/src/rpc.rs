//! RPC envelope shared by every service.
//!
//! A call is a [`RequestFrame`] naming the remote method and carrying the
//! serialized request plus the caller's bearer token. The server answers with
//! a [`ResponseFrame`] echoing the request ID.
//!
//! # Example
//!
//! ```rust
//! use nalej_proto::rpc::{RequestFrame, ResponseFrame};
//! use serde_json::json;
//!
//! let request = RequestFrame::new("Clusters.List", json!({"organizationId": "org-1"}), Some("tok"));
//! let encoded = request.to_json().unwrap();
//! assert!(encoded.contains("Clusters.List"));
//!
//! let response = ResponseFrame::from_json(&format!(
//!     r#"{{"id": "{}", "result": {{"clusters": []}}}}"#,
//!     request.id
//! ))
//! .unwrap();
//! assert!(response.into_outcome().unwrap().is_ok());
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::ProtoError;

/// Typed descriptor of a remote method.
///
/// The descriptor carries no data; it only ties a method name to the shape
/// of its request and response so callers cannot mix them up.
pub struct Rpc<Req, Resp> {
    name: &'static str,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> Rpc<Req, Resp> {
    /// Declare a method.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Fully qualified method name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<Req, Resp> fmt::Debug for Rpc<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rpc").field(&self.name).finish()
    }
}

/// Per-call credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthParams {
    /// Bearer token issued by the login service.
    pub token: String,
}

/// Request sent from the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestFrame {
    /// Correlation ID echoed by the server.
    pub id: String,
    /// Remote method, `Service.Operation`.
    pub method: String,
    /// Serialized request message.
    pub params: Value,
    /// Credentials attached to this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthParams>,
}

impl RequestFrame {
    /// Build a frame with a fresh correlation ID.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value, token: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            params,
            auth: token.map(|t| AuthParams {
                token: t.to_string(),
            }),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// Response sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseFrame {
    /// Correlation ID of the originating request.
    pub id: String,
    /// Result payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl ResponseFrame {
    /// Successful response.
    #[must_use]
    pub fn ok(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    /// Failed response.
    #[must_use]
    pub fn err(id: impl Into<String>, error: ErrorShape) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }

    /// Split the frame into its result or remote error.
    ///
    /// An error payload wins over a result payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::EmptyResponse`] when the frame carries neither.
    pub fn into_outcome(self) -> Result<Result<Value, ErrorShape>, ProtoError> {
        match (self.error, self.result) {
            (Some(error), _) => Ok(Err(error)),
            (None, Some(result)) => Ok(Ok(result)),
            (None, None) => Err(ProtoError::EmptyResponse(self.id)),
        }
    }
}

/// Status codes reported by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The caller is not authenticated or the token expired.
    Unauthenticated,
    /// The caller lacks the required role.
    PermissionDenied,
    /// The referenced entity does not exist.
    NotFound,
    /// The entity already exists.
    AlreadyExists,
    /// The request failed validation.
    InvalidArgument,
    /// The operation is not possible in the current state.
    FailedPrecondition,
    /// The service is temporarily unavailable.
    Unavailable,
    /// The call ran out of time on the server.
    DeadlineExceeded,
    /// Unexpected server failure.
    Internal,
    /// Any code this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::AlreadyExists => "already exists",
            Self::InvalidArgument => "invalid argument",
            Self::FailedPrecondition => "failed precondition",
            Self::Unavailable => "unavailable",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Error payload of a failed call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorShape {
    /// Status code.
    pub code: ErrorCode,
    /// Short, user-facing message.
    pub message: String,
    /// Verbose trace, shown only in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
