//! Error types for the nalej-proto crate.

use thiserror::Error;

/// Errors that can occur while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Failed to encode a frame.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failed to decode a frame.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// A frame carried neither a result nor an error.
    #[error("empty response for request {0}")]
    EmptyResponse(String),

    /// Unknown enumeration value.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// Field being parsed.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
