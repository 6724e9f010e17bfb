//! Argument checks shared by every command.
//!
//! All of these run before a session is opened, so a rejected invocation
//! never touches the network.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::CliError;

/// Require a non-empty value.
///
/// # Errors
///
/// Returns [`CliError::Usage`] naming `name` when `value` is blank.
pub fn require<'a>(name: &str, value: &'a str) -> Result<&'a str, CliError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CliError::usage(format!("{name} cannot be empty")));
    }
    Ok(value)
}

/// Resolve an on/off flag pair to a single boolean (`true` for `on`).
///
/// # Errors
///
/// Returns [`CliError::Usage`] when both or neither flag is set.
pub fn toggle(on_name: &str, on: bool, off_name: &str, off: bool) -> Result<bool, CliError> {
    match (on, off) {
        (true, true) => Err(CliError::usage(format!(
            "{on_name} and {off_name} are mutually exclusive"
        ))),
        (false, false) => Err(CliError::usage(format!(
            "one of {on_name} or {off_name} is required"
        ))),
        (on, _) => Ok(on),
    }
}

/// Pick an identifier given either positionally or by flag.
///
/// The positional form wins when both are present.
///
/// # Errors
///
/// Returns [`CliError::MissingArgument`] when neither is present.
pub fn resolve_argument(
    attribute: &'static str,
    positional: Option<&str>,
    flag: Option<&str>,
) -> Result<String, CliError> {
    positional
        .filter(|v| !v.trim().is_empty())
        .or_else(|| flag.filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
        .ok_or(CliError::MissingArgument { attribute })
}

/// Parse a point in time given on the command line, interpreted as UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` and
/// `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for any other form.
pub fn parse_time(flag: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(t.and_utc());
        }
    }
    if let Some(t) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc());
    }
    Err(CliError::usage(format!(
        "cannot parse {flag} '{value}', expected a date like 2020-01-31 or 2020-01-31 12:00:00"
    )))
}

/// Check an averaging window given with `--range-minutes`.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for negative values.
pub fn window_minutes(value: i32) -> Result<i32, CliError> {
    if value < 0 {
        return Err(CliError::usage("--range-minutes cannot be negative"));
    }
    Ok(value)
}

/// Parse `--params name=value,name=value`.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for entries without `=` or with an empty name.
pub fn parse_params(raw: &str) -> Result<Vec<(String, String)>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(CliError::usage(format!(
                "malformed parameter '{entry}', expected name=value"
            ))),
        })
        .collect()
}

/// Read a text file named on the command line.
///
/// # Errors
///
/// Returns [`CliError::Io`] carrying the path when the file cannot be read.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::file(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test]
    fn require_rejects_blank() {
        assert_eq!(require("cluster ID", " c1 ").unwrap(), "c1");
        let err = require("cluster ID", "  ").unwrap_err();
        assert_eq!(err.to_string(), "cluster ID cannot be empty");
    }

    #[test]
    fn toggle_both_set() {
        let err = toggle("--add", true, "--remove", true).unwrap_err();
        assert_eq!(err.to_string(), "--add and --remove are mutually exclusive");
    }

    #[test]
    fn toggle_neither_set() {
        let err = toggle("--enabled", false, "--disabled", false).unwrap_err();
        assert_eq!(err.to_string(), "one of --enabled or --disabled is required");
    }

    #[test]
    fn toggle_picks_side() {
        assert!(toggle("--add", true, "--remove", false).unwrap());
        assert!(!toggle("--add", false, "--remove", true).unwrap());
    }

    #[test]
    fn resolve_argument_prefers_positional() {
        assert_eq!(resolve_argument("descriptorID", Some("a"), Some("b")).unwrap(), "a");
        assert_eq!(resolve_argument("descriptorID", None, Some("b")).unwrap(), "b");
        assert_eq!(resolve_argument("descriptorID", Some(""), Some("b")).unwrap(), "b");
    }

    #[test]
    fn resolve_argument_missing() {
        let err = resolve_argument("descriptorID", None, None).unwrap_err();
        assert!(matches!(err, CliError::MissingArgument { attribute: "descriptorID" }));
    }

    #[test_case("2021-03-04T05:06:07Z" ; "rfc3339")]
    #[test_case("2021-03-04T06:06:07+01:00" ; "rfc3339 offset")]
    #[test_case("2021-03-04 05:06:07" ; "space separated")]
    fn parse_time_full(input: &str) {
        let expected = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_time("--from", input).unwrap(), expected);
    }

    #[test]
    fn parse_time_partial() {
        assert_eq!(
            parse_time("--from", "2021-03-04 05:06").unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 0).unwrap()
        );
        assert_eq!(
            parse_time("--to", "2021-03-04").unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_time_rejects_garbage() {
        let err = parse_time("--from", "yesterday").unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert!(err.to_string().contains("--from"));
    }

    #[test]
    fn params_parse() {
        let params = parse_params("replicas=3, image = nginx").unwrap();
        assert_eq!(
            params,
            vec![
                ("replicas".to_string(), "3".to_string()),
                ("image".to_string(), "nginx".to_string())
            ]
        );
        assert!(parse_params("").unwrap().is_empty());
        assert!(parse_params("novalue").is_err());
        assert!(parse_params("=x").is_err());
    }

    #[test]
    fn window_minutes_rejects_negative() {
        assert_eq!(window_minutes(0).unwrap(), 0);
        assert_eq!(window_minutes(90).unwrap(), 90);
        assert!(matches!(window_minutes(-1), Err(CliError::Usage(_))));
    }
}
