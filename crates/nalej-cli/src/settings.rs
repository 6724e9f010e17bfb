//! Effective settings of one invocation.
//!
//! Every value follows the same precedence: command-line flag (or its
//! environment variable), then the stored option, then the built-in default.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use nalej_config::{Credentials, OptionsStore, keys};
use tracing::{debug, warn};

use crate::cli::{Format, GlobalArgs};
use crate::connection::Connection;
use crate::error::CliError;
use crate::output::{DEFAULT_LABEL_LENGTH, OutputFormat};

/// Port used by both services unless configured otherwise.
pub const DEFAULT_PORT: u16 = 443;

/// Resolved global settings, passed by reference to every command.
#[derive(Debug, Clone)]
pub struct Settings {
    base_path: PathBuf,
    /// Public API endpoint.
    pub api: Connection,
    /// Login service endpoint.
    pub login: Connection,
    /// Organization identifier, possibly empty.
    pub organization_id: String,
    /// Output formatter.
    pub output: OutputFormat,
    /// Debug mode.
    pub debug: bool,
}

impl Settings {
    /// Resolve the settings from the flags and the options stored under
    /// the base directory.
    ///
    /// # Errors
    ///
    /// Fails when the base directory cannot be determined or a stored
    /// option holds an invalid value.
    pub fn resolve(global: &GlobalArgs) -> Result<Self, CliError> {
        let base_path = Self::base_path_of(global)?;
        let options = OptionsStore::new(&base_path);
        Self::from_options(global, &options, base_path)
    }

    /// Settings for commands that only touch local state (`options`,
    /// `logout`). Invalid stored options fall back to the flags and the
    /// defaults, so those commands can still repair the store.
    ///
    /// # Errors
    ///
    /// Fails only when the base directory cannot be determined.
    pub fn local(global: &GlobalArgs) -> Result<Self, CliError> {
        let base_path = Self::base_path_of(global)?;
        let options = OptionsStore::new(&base_path);
        match Self::from_options(global, &options, base_path.clone()) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(error = %e, "ignoring invalid stored options");
                Ok(Self::from_flags(global, base_path))
            }
        }
    }

    fn base_path_of(global: &GlobalArgs) -> Result<PathBuf, CliError> {
        match &global.cred_path {
            Some(path) => Ok(path.clone()),
            None => Ok(nalej_config::default_base_path()?),
        }
    }

    fn from_flags(global: &GlobalArgs, base_path: PathBuf) -> Self {
        let endpoint = |address: Option<&String>, port: Option<u16>| {
            let connection =
                Connection::new(address.cloned().unwrap_or_default(), port.unwrap_or(DEFAULT_PORT));
            if global.use_tls.unwrap_or(true) {
                connection.with_tls(global.ca_cert.clone(), global.insecure.unwrap_or(false))
            } else {
                connection
            }
        };
        Self {
            api: endpoint(global.nalej_address.as_ref(), global.port),
            login: endpoint(global.login_address.as_ref(), global.login_port),
            organization_id: global.organization_id.clone().unwrap_or_default(),
            output: OutputFormat::new(global.output.unwrap_or_default())
                .with_label_length(global.label_length.unwrap_or(DEFAULT_LABEL_LENGTH)),
            debug: global.debug,
            base_path,
        }
    }

    fn from_options(
        global: &GlobalArgs,
        options: &OptionsStore,
        base_path: PathBuf,
    ) -> Result<Self, CliError> {
        let use_tls = options.resolve_as_bool(keys::USE_TLS, global.use_tls, true);
        let insecure = options.resolve_as_bool(keys::INSECURE, global.insecure, false);
        let ca_cert = global.ca_cert.clone().or_else(|| {
            let stored = options.resolve(keys::CA_CERT_PATH, "");
            (!stored.is_empty()).then(|| PathBuf::from(stored))
        });

        let endpoint = |address_key: &str,
                        address: Option<&str>,
                        port_key: &str,
                        port: Option<u16>|
         -> Result<Connection, CliError> {
            let address = options.resolve(address_key, address.unwrap_or(""));
            let port = match port {
                Some(port) => port,
                None => {
                    let stored = options.resolve_as_int(port_key, 0, i64::from(DEFAULT_PORT))?;
                    u16::try_from(stored).map_err(|_| {
                        CliError::usage(format!("stored {port_key} '{stored}' is not a valid port"))
                    })?
                }
            };
            let connection = Connection::new(address, port);
            Ok(if use_tls {
                connection.with_tls(ca_cert.clone(), insecure)
            } else {
                connection
            })
        };
        let api = endpoint(
            keys::NALEJ_ADDRESS,
            global.nalej_address.as_deref(),
            keys::PORT,
            global.port,
        )?;
        let login = endpoint(
            keys::LOGIN_ADDRESS,
            global.login_address.as_deref(),
            keys::LOGIN_PORT,
            global.login_port,
        )?;

        let format = match global.output {
            Some(format) => format,
            None => match options.resolve(keys::OUTPUT, "").as_str() {
                "" => Format::default(),
                stored => Format::from_str(stored, true).map_err(|_| {
                    CliError::usage(format!(
                        "stored output '{stored}' is not one of table, json or raw"
                    ))
                })?,
            },
        };
        let label_length = match global.label_length {
            Some(length) => length,
            None => options.resolve_as_int(keys::LABEL_LENGTH, 0, DEFAULT_LABEL_LENGTH)?,
        };

        let organization_id = options.resolve(
            keys::ORGANIZATION_ID,
            global.organization_id.as_deref().unwrap_or(""),
        );

        let settings = Self {
            base_path,
            api,
            login,
            organization_id,
            output: OutputFormat::new(format).with_label_length(label_length),
            debug: global.debug,
        };
        debug!(api = ?settings.api, login = ?settings.login, "settings resolved");
        Ok(settings)
    }

    /// Directory holding credentials and options.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Options store under the base directory.
    #[must_use]
    pub fn options(&self) -> OptionsStore {
        OptionsStore::new(&self.base_path)
    }

    /// Credential store under the base directory.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.base_path)
    }

    /// Organization identifier, required by every resource command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] when no organization is configured.
    pub fn organization_id(&self) -> Result<String, CliError> {
        let id = self.organization_id.trim();
        if id.is_empty() {
            return Err(CliError::usage(
                "organization ID not set, use --organization-id or 'options set organizationID <id>'",
            ));
        }
        Ok(id.to_string())
    }

    /// Settings for command tests: plaintext localhost, table output.
    #[cfg(test)]
    pub(crate) fn for_tests(base_path: &Path, organization_id: &str) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            api: Connection::new("localhost", DEFAULT_PORT),
            login: Connection::new("localhost", DEFAULT_PORT),
            organization_id: organization_id.to_string(),
            output: OutputFormat::default(),
            debug: false,
        }
    }

    /// Same settings with another output format.
    #[cfg(test)]
    pub(crate) fn with_format(mut self, format: Format) -> Self {
        self.output = OutputFormat::new(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolve(global: &GlobalArgs, dir: &TempDir) -> Settings {
        let options = OptionsStore::new(dir.path());
        Settings::from_options(global, &options, dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn defaults_without_options() {
        let dir = TempDir::new().unwrap();
        let settings = resolve(&GlobalArgs::default(), &dir);
        assert_eq!(settings.api.port, DEFAULT_PORT);
        assert!(settings.api.use_tls);
        assert!(!settings.api.insecure);
        assert_eq!(settings.output.format(), Format::Table);
        assert_eq!(settings.output.label_length(), DEFAULT_LABEL_LENGTH);
        assert!(settings.organization_id().is_err());
    }

    #[test]
    fn stored_options_fill_gaps() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.update_platform_address("example.com").unwrap();
        options.set(keys::ORGANIZATION_ID, "org-1").unwrap();
        options.set(keys::OUTPUT, "JSON").unwrap();
        options.set(keys::PORT, "8443").unwrap();
        options.set(keys::LABEL_LENGTH, "0").unwrap();
        options.set(keys::USE_TLS, "false").unwrap();

        let settings = resolve(&GlobalArgs::default(), &dir);
        assert_eq!(settings.api.address, "api.example.com");
        assert_eq!(settings.login.address, "login.example.com");
        assert_eq!(settings.api.port, 8443);
        assert_eq!(settings.login.port, DEFAULT_PORT);
        assert!(!settings.api.use_tls);
        assert_eq!(settings.organization_id().unwrap(), "org-1");
        assert_eq!(settings.output.format(), Format::Json);
        assert_eq!(settings.output.label_length(), 0);
    }

    #[test]
    fn flags_win_over_options() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::ORGANIZATION_ID, "org-1").unwrap();
        options.set(keys::NALEJ_ADDRESS, "api.stored.com").unwrap();
        options.set(keys::OUTPUT, "json").unwrap();

        let global = GlobalArgs {
            organization_id: Some("org-2".into()),
            nalej_address: Some("api.flag.com".into()),
            output: Some(Format::Table),
            use_tls: Some(true),
            insecure: Some(true),
            ..GlobalArgs::default()
        };
        let settings = resolve(&global, &dir);
        assert_eq!(settings.organization_id().unwrap(), "org-2");
        assert_eq!(settings.api.address, "api.flag.com");
        assert_eq!(settings.output.format(), Format::Table);
        assert!(settings.api.insecure);
    }

    #[test]
    fn invalid_stored_values_are_reported() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::OUTPUT, "yaml").unwrap();
        let err = Settings::from_options(&GlobalArgs::default(), &options, dir.path().into())
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));

        options.delete(keys::OUTPUT).unwrap();
        options.set(keys::PORT, "70000").unwrap();
        let err = Settings::from_options(&GlobalArgs::default(), &options, dir.path().into())
            .unwrap_err();
        assert!(err.to_string().contains("not a valid port"));
    }

    #[test]
    fn insecure_flag_overrides_stored_option() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::INSECURE, "true").unwrap();
        assert!(resolve(&GlobalArgs::default(), &dir).api.insecure);

        let global = GlobalArgs {
            insecure: Some(false),
            ..GlobalArgs::default()
        };
        assert!(!resolve(&global, &dir).api.insecure);
    }

    #[test]
    fn local_settings_survive_invalid_options() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::ORGANIZATION_ID, "org-1").unwrap();
        std::fs::write(options.dir().join(keys::PORT), "abc").unwrap();
        std::fs::write(options.dir().join(keys::OUTPUT), "yaml").unwrap();

        let global = GlobalArgs {
            cred_path: Some(dir.path().to_path_buf()),
            output: Some(Format::Json),
            ..GlobalArgs::default()
        };
        assert!(Settings::resolve(&global).is_err());
        let settings = Settings::local(&global).unwrap();
        assert_eq!(settings.base_path(), dir.path());
        assert_eq!(settings.api.port, DEFAULT_PORT);
        assert_eq!(settings.output.format(), Format::Json);
    }

    #[test]
    fn local_settings_match_resolve_when_options_are_valid() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::PORT, "8443").unwrap();
        let global = GlobalArgs {
            cred_path: Some(dir.path().to_path_buf()),
            ..GlobalArgs::default()
        };
        assert_eq!(Settings::local(&global).unwrap().api.port, 8443);
    }

    #[test]
    fn stored_ca_path_is_used() {
        let dir = TempDir::new().unwrap();
        let options = OptionsStore::new(dir.path());
        options.set(keys::CA_CERT_PATH, "/etc/nalej/ca.pem").unwrap();
        let settings = resolve(&GlobalArgs::default(), &dir);
        assert_eq!(
            settings.api.ca_cert_path.as_deref(),
            Some(Path::new("/etc/nalej/ca.pem"))
        );
    }
}
