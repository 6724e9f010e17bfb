//! Stored default values.

use std::collections::BTreeMap;
use std::io::Write;

use clap::ValueEnum;
use nalej_config::{keys, parse_bool};
use serde::Serialize;

use crate::cli::{Format, OptionsCommands};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, TableDisplay, print_table, table};
use crate::settings::Settings;

/// One stored option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionEntry {
    /// Option key.
    pub key: String,
    /// Stored value.
    pub value: String,
}

impl TableDisplay for OptionEntry {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["KEY", "VALUE"]);
        t.add_row(vec![self.key.clone(), self.value.clone()]);
        print_table(writer, &t)
    }
}

/// Every stored option, by key.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct OptionList(pub BTreeMap<String, String>);

impl TableDisplay for OptionList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["KEY", "VALUE"]);
        for (key, value) in &self.0 {
            t.add_row(vec![key.clone(), value.clone()]);
        }
        print_table(writer, &t)
    }
}

/// Addresses derived from a platform domain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAddresses {
    /// Public API address.
    pub nalej_address: String,
    /// Login service address.
    pub login_address: String,
}

impl TableDisplay for PlatformAddresses {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["API", "LOGIN"]);
        t.add_row(vec![self.nalej_address.clone(), self.login_address.clone()]);
        print_table(writer, &t)
    }
}

/// Reject values of well-known keys that later invocations could not use.
/// Empty values are left to the store, which rejects them.
fn check_value(key: &str, value: &str) -> Result<(), CliError> {
    if value.is_empty() {
        return Ok(());
    }
    let value = value.trim();
    let valid = match key {
        keys::PORT | keys::LOGIN_PORT => value.parse::<u16>().is_ok(),
        keys::LABEL_LENGTH => value.parse::<i64>().is_ok(),
        keys::OUTPUT => Format::from_str(value, true).is_ok(),
        keys::USE_TLS | keys::INSECURE => parse_bool(value).is_some(),
        _ => true,
    };
    if valid {
        return Ok(());
    }
    let expected = match key {
        keys::PORT | keys::LOGIN_PORT => "a port number",
        keys::LABEL_LENGTH => "an integer",
        keys::OUTPUT => "one of table, json or raw",
        _ => "true or false",
    };
    Err(CliError::usage(format!(
        "invalid value '{value}' for {key}, expected {expected}"
    )))
}

/// Handler for the options command.
pub struct OptionsCommand<'a> {
    settings: &'a Settings,
}

impl<'a> OptionsCommand<'a> {
    /// Creates a new options command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an options subcommand. Only local files are touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the operation.
    pub fn execute<W: Write>(&self, out: &mut W, command: &OptionsCommands) -> Result<(), CliError> {
        let options = self.settings.options();
        let format: &OutputFormat = &self.settings.output;

        match command {
            OptionsCommands::Set { key, value } => {
                check_value(key, value)?;
                options.set(key, value)?;
                format.write(out, &Message::success(format!("{key} set to {value}")))?;
            }
            OptionsCommands::Get { key } => {
                let value = options
                    .get(key)?
                    .ok_or_else(|| nalej_config::ConfigError::NotFound(key.clone()))?;
                format.write(
                    out,
                    &OptionEntry {
                        key: key.clone(),
                        value,
                    },
                )?;
            }
            OptionsCommands::Delete { key } => {
                options.delete(key)?;
                format.write(out, &Message::success(format!("{key} deleted")))?;
            }
            OptionsCommands::List => {
                format.write(out, &OptionList(options.list()?))?;
            }
            OptionsCommands::Platform { address } => {
                let [nalej_address, login_address] = options.update_platform_address(address)?;
                format.write(
                    out,
                    &PlatformAddresses {
                        nalej_address,
                        login_address,
                    },
                )?;
            }
        }
        Ok(())
    }
}
