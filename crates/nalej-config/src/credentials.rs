//! Bearer credentials obtained by `login`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ConfigError;

const TOKEN_FILE: &str = "token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";

/// Token pair as persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Bearer token attached to every call.
    pub token: String,
    /// Token used to obtain a new bearer token.
    pub refresh_token: String,
}

/// Credential store rooted at the client's base directory.
#[derive(Debug, Clone)]
pub struct Credentials {
    base: PathBuf,
}

impl Credentials {
    /// Open the store rooted at `base`.
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    /// Persist both tokens, creating the directory when needed.
    ///
    /// # Errors
    ///
    /// Fails when the directory or either file cannot be written.
    pub fn store(&self, token: &str, refresh_token: &str) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base).map_err(|e| ConfigError::io("create", &self.base, e))?;
        self.write(TOKEN_FILE, token)?;
        self.write(REFRESH_TOKEN_FILE, refresh_token)?;
        debug!(path = %self.base.display(), "credentials stored");
        Ok(())
    }

    /// Load the stored tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when either token is absent.
    pub fn load(&self) -> Result<StoredCredentials, ConfigError> {
        let token = self
            .read(TOKEN_FILE)?
            .ok_or_else(|| ConfigError::MissingCredentials(self.base.clone()))?;
        let refresh_token = self
            .read(REFRESH_TOKEN_FILE)?
            .ok_or_else(|| ConfigError::MissingCredentials(self.base.clone()))?;
        Ok(StoredCredentials {
            token,
            refresh_token,
        })
    }

    /// Remove both tokens. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Fails when an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), ConfigError> {
        for name in [TOKEN_FILE, REFRESH_TOKEN_FILE] {
            let path = self.base.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(ConfigError::io("delete", &path, e)),
            }
        }
        debug!(path = %self.base.display(), "credentials cleared");
        Ok(())
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), ConfigError> {
        let path = self.base.join(name);
        fs::write(&path, contents).map_err(|e| ConfigError::io("write", &path, e))
    }

    fn read(&self, name: &str) -> Result<Option<String>, ConfigError> {
        let path = self.base.join(name);
        match fs::read_to_string(&path) {
            Ok(value) => {
                let value = value.trim().to_string();
                Ok((!value.is_empty()).then_some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io("read", &path, e)),
        }
    }
}
