//! Persistent default values for command parameters.
//!
//! Each option is stored as a single file named after its key under
//! `<base>/options`. A value passed explicitly on the command line always
//! wins over the stored one.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::ConfigError;

/// Well-known option keys.
pub mod keys {
    /// Full address of the public API, usually `api.<domain>`.
    pub const NALEJ_ADDRESS: &str = "nalejAddress";
    /// Full address of the login service.
    pub const LOGIN_ADDRESS: &str = "loginAddress";
    /// Port of the public API.
    pub const PORT: &str = "port";
    /// Port of the login service.
    pub const LOGIN_PORT: &str = "loginPort";
    /// Organization used by every command.
    pub const ORGANIZATION_ID: &str = "organizationID";
    /// Output format: `table`, `json` or `raw`.
    pub const OUTPUT: &str = "output";
    /// Truncation length for label columns.
    pub const LABEL_LENGTH: &str = "labelLength";
    /// Whether connections use TLS.
    pub const USE_TLS: &str = "useTLS";
    /// Path of a PEM CA bundle.
    pub const CA_CERT_PATH: &str = "caCertPath";
    /// Skip server certificate verification.
    pub const INSECURE: &str = "insecure";
}

/// Prefix of the public API host.
pub const API_PREFIX: &str = "api.";
/// Prefix of the login host.
pub const LOGIN_PREFIX: &str = "login.";

const OPTIONS_DIR: &str = "options";

/// Parse a stored boolean: `true`/`false`, `1`/`0` or `yes`/`no`, any case.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// File-backed option store.
#[derive(Debug, Clone)]
pub struct OptionsStore {
    dir: PathBuf,
}

impl OptionsStore {
    /// Open the store rooted at `base`. Nothing is created until a value is set.
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join(OPTIONS_DIR),
        }
    }

    /// Directory holding the option files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Fails on an empty key or value, or when the file cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if value.is_empty() {
            return Err(ConfigError::EmptyValue(key.to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(|e| ConfigError::io("create", &self.dir, e))?;
        let path = self.dir.join(key);
        fs::write(&path, value).map_err(|e| ConfigError::io("write", &path, e))?;
        debug!(key, "option stored");
        Ok(())
    }

    /// Stored value for `key`, if any.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        if key.is_empty() {
            return Ok(None);
        }
        let path = self.dir.join(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value.trim_end_matches(['\n', '\r']).to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io("read", &path, e)),
        }
    }

    /// Remove the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when nothing was stored.
    pub fn delete(&self, key: &str) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        let path = self.dir.join(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "option deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::NotFound(key.to_string())),
            Err(e) => Err(ConfigError::io("delete", &path, e)),
        }
    }

    /// Every stored option, ordered by key.
    ///
    /// # Errors
    ///
    /// Fails when the directory or one of its files cannot be read.
    pub fn list(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(ConfigError::io("list", &self.dir, e)),
        };

        let mut options = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::io("list", &self.dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                trace!(path = %entry.path().display(), "skipping non UTF-8 option file");
                continue;
            };
            if let Some(value) = self.get(&key)? {
                options.insert(key, value);
            }
        }
        Ok(options)
    }

    /// Effective value of a parameter: the flag when non-empty, else the
    /// stored option, else an empty string.
    ///
    /// Read failures are treated as "not stored".
    #[must_use]
    pub fn resolve(&self, key: &str, flag: &str) -> String {
        if !flag.is_empty() {
            return flag.to_string();
        }
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => String::new(),
            Err(e) => {
                debug!(key, error = %e, "ignoring unreadable option");
                String::new()
            }
        }
    }

    /// Integer flavour of [`resolve`](Self::resolve): the flag when it is
    /// non-zero, else the stored option, else `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnInteger`] when the stored value does not parse.
    pub fn resolve_as_int(&self, key: &str, flag: i64, default: i64) -> Result<i64, ConfigError> {
        if flag != 0 {
            return Ok(flag);
        }
        match self.get(key)? {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::NotAnInteger {
                    key: key.to_string(),
                    value,
                }),
            None => Ok(default),
        }
    }

    /// Boolean flavour of [`resolve`](Self::resolve): the flag when given,
    /// else the stored option, else `default`.
    ///
    /// A stored value that is not a boolean is ignored.
    #[must_use]
    pub fn resolve_as_bool(&self, key: &str, flag: Option<bool>, default: bool) -> bool {
        if let Some(flag) = flag {
            return flag;
        }
        match self.get(key) {
            Ok(Some(value)) => parse_bool(&value).unwrap_or_else(|| {
                debug!(key, value = %value, "ignoring non-boolean option");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                debug!(key, error = %e, "ignoring unreadable option");
                default
            }
        }
    }

    /// Store the platform domain and derive both service hosts from it.
    ///
    /// Persists [`keys::NALEJ_ADDRESS`] as `api.<address>` and
    /// [`keys::LOGIN_ADDRESS`] as `login.<address>`, returning both.
    ///
    /// # Errors
    ///
    /// Rejects an empty address or one already carrying a service prefix.
    pub fn update_platform_address(&self, address: &str) -> Result<[String; 2], ConfigError> {
        let address = address.trim();
        if address.is_empty() || address.starts_with(API_PREFIX) || address.starts_with(LOGIN_PREFIX)
        {
            return Err(ConfigError::InvalidPlatformAddress(address.to_string()));
        }
        let api = format!("{API_PREFIX}{address}");
        let login = format!("{LOGIN_PREFIX}{address}");
        self.set(keys::NALEJ_ADDRESS, &api)?;
        self.set(keys::LOGIN_ADDRESS, &login)?;
        Ok([api, login])
    }
}
