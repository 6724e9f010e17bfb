//! CLI error types.

use std::path::Path;

use nalej_config::ConfigError;
use nalej_proto::{ErrorCode, ProtoError};
use thiserror::Error;

use crate::labels::LabelParseError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or inconsistent arguments, detected before any call.
    #[error("{0}")]
    Usage(String),

    /// Neither the positional argument nor its flag was supplied.
    #[error("{attribute} not found")]
    MissingArgument {
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options store failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Stored credentials are unusable.
    #[error("{0}")]
    Credentials(#[source] ConfigError),

    /// Connection failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A call ran out of time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Malformed frame or payload.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The platform rejected the call.
    #[error("{message} ({code})")]
    Remote {
        /// Status code.
        code: ErrorCode,
        /// Short message.
        message: String,
        /// Verbose trace, printed with `--debug`.
        details: Option<String>,
    },

    /// Malformed `--labels` value.
    #[error("invalid labels: {0}")]
    Labels(#[from] LabelParseError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),
}

impl CliError {
    /// Build a [`CliError::Usage`].
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Wrap a file system error with the path it concerns.
    #[must_use]
    pub fn file(path: &Path, source: &std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            source.kind(),
            format!("{}: {source}", path.display()),
        ))
    }

    /// Verbose detail worth printing in debug mode, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Remote { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    /// Whether the subcommand help should follow the message.
    #[must_use]
    pub const fn wants_help(&self) -> bool {
        matches!(self, Self::MissingArgument { .. })
    }
}

impl From<ProtoError> for CliError {
    fn from(err: ProtoError) -> Self {
        Self::Protocol(err.to_string())
    }
}
