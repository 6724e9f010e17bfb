//! Error types for the local stores.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the options and credential stores.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory of the current user is unknown.
    #[error("cannot determine the home directory; use --cred-path")]
    NoHomeDirectory,

    /// Attempt to store an option without a key.
    #[error("option key cannot be empty")]
    EmptyKey,

    /// Attempt to store an option without a value.
    #[error("value for option '{0}' cannot be empty")]
    EmptyValue(String),

    /// The option was never stored.
    #[error("option '{0}' not found")]
    NotFound(String),

    /// A stored or supplied value is not an integer.
    #[error("option '{key}' expects an integer, got '{value}'")]
    NotAnInteger {
        /// Option key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// Platform address rejected by [`crate::OptionsStore::update_platform_address`].
    #[error("invalid platform address '{0}': expected the bare domain, without api. or login. prefix")]
    InvalidPlatformAddress(String),

    /// No stored credentials.
    #[error("credentials not found at {}, try login first", .0.display())]
    MissingCredentials(PathBuf),

    /// Underlying file system failure.
    #[error("cannot {action} {}: {source}", path.display())]
    Io {
        /// What was attempted.
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_suggests_login() {
        let err = ConfigError::MissingCredentials(PathBuf::from("/tmp/.nalej"));
        assert_eq!(
            err.to_string(),
            "credentials not found at /tmp/.nalej, try login first"
        );
    }

    #[test]
    fn io_error_names_the_path() {
        let err = ConfigError::io(
            "read",
            "/tmp/.nalej/token",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot read /tmp/.nalej/token: denied");
    }
}
