//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats. `raw` is an
//! alias of JSON kept for compatibility with existing scripts.

use std::io::Write;

use chrono::DateTime;
use comfy_table::{Table, presets};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Label column width used when nothing else is configured.
pub const DEFAULT_LABEL_LENGTH: i64 = 20;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
    label_length: i64,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self {
            format,
            label_length: DEFAULT_LABEL_LENGTH,
        }
    }

    /// Set the truncation length of label columns; non-positive disables it.
    #[must_use]
    pub const fn with_label_length(mut self, label_length: i64) -> Self {
        self.label_length = label_length;
        self
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Truncation length of label columns.
    #[must_use]
    pub const fn label_length(&self) -> i64 {
        self.label_length
    }

    /// Check if a JSON flavour is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json | Format::Raw)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        if self.is_json() {
            serde_json::to_writer_pretty(&mut *writer, value)
                .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
            writeln!(writer)?;
        } else {
            value.write_table(writer, self.label_length)?;
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// `label_length` bounds label columns, see [`crate::labels::display`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError>;
}

/// Borderless, column-aligned table with the given header.
#[must_use]
pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(header.to_vec());
    table
}

/// Write a finished table followed by a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_table<W: Write>(writer: &mut W, table: &Table) -> Result<(), CliError> {
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Render a unix timestamp (seconds) as UTC; zero renders as `-`.
#[must_use]
pub fn timestamp(seconds: i64) -> String {
    if seconds == 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(seconds, 0).map_or_else(
        || seconds.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// `-` for empty cells.
#[must_use]
pub fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Confirmation of a command that returns no entity.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        writeln!(writer, "✓ {}", self.message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
        assert_eq!(fmt.label_length(), DEFAULT_LABEL_LENGTH);
    }

    fn render<T: Serialize + TableDisplay>(format: Format, value: &T) -> String {
        let mut buf = Vec::new();
        OutputFormat::new(format).write(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn raw_is_json() {
        assert!(OutputFormat::new(Format::Raw).is_json());
        let out = render(Format::Raw, &Message::success("done"));
        assert_eq!(out, "{\n  \"message\": \"done\"\n}\n");
    }

    #[test]
    fn message_table_output() {
        let out = render(Format::Table, &Message::success("Cluster cordoned"));
        assert_eq!(out, "✓ Cluster cordoned\n");
    }

    #[test]
    fn table_aligns_columns_without_borders() {
        let mut t = table(&["NAME", "ID"]);
        t.add_row(vec!["a".to_string(), "1".to_string()]);
        let rendered = t.to_string();
        assert!(rendered.contains("NAME"));
        assert!(!rendered.contains('|'));
        assert!(!rendered.contains('+'));
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(timestamp(0), "-");
        assert_eq!(timestamp(1_600_000_000), "2020-09-13 12:26:40");
    }
}
