//! # nalej-config
//!
//! Local state of the public API client:
//!
//! - [`OptionsStore`]: default parameter values remembered between
//!   invocations, one file per key under `<base>/options`.
//! - [`Credentials`]: bearer and refresh tokens written by `login`.
//!
//! Both stores live under a base directory, `~/.nalej` unless overridden
//! (see [`default_base_path`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credentials;
pub mod error;
pub mod options;

use std::path::PathBuf;

pub use credentials::{Credentials, StoredCredentials};
pub use error::ConfigError;
pub use options::{OptionsStore, keys, parse_bool};

/// Name of the directory created under the user's home.
pub const BASE_DIR_NAME: &str = ".nalej";

/// Default base directory, `~/.nalej`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when the home directory cannot
/// be determined.
pub fn default_base_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(BASE_DIR_NAME))
        .ok_or(ConfigError::NoHomeDirectory)
}
