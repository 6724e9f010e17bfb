//! Label parsing and rendering.
//!
//! Labels travel on the command line as `key:value` pairs separated by `;`
//! and are rendered as sorted `key:value` pairs joined by `,`.

use std::fmt;
use std::str::FromStr;

use nalej_proto::LabelMap;
use thiserror::Error;

/// Separator between label entries on the command line.
pub const ENTRY_SEPARATOR: char = ';';
/// Separator between key and value.
pub const KEY_VALUE_SEPARATOR: char = ':';

const ELLIPSIS: &str = "...";

/// Malformed label entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelParseError {
    /// No labels in the input.
    #[error("at least one key:value label is required")]
    Empty,
    /// An entry is not exactly `key:value`.
    #[error("malformed label '{0}', expected key:value")]
    Malformed(String),
}

/// Validated label set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(LabelMap);

impl Labels {
    /// Parse `k1:v1;k2:v2`. Empty entries between separators are skipped.
    ///
    /// # Errors
    ///
    /// Fails when an entry has no `:` or more than one, when the key is
    /// empty, or when no entry is present.
    pub fn parse(raw: &str) -> Result<Self, LabelParseError> {
        let mut labels = LabelMap::new();
        for entry in raw.split(ENTRY_SEPARATOR) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.split(KEY_VALUE_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) if !key.trim().is_empty() => {
                    labels.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => return Err(LabelParseError::Malformed(entry.to_string())),
            }
        }
        if labels.is_empty() {
            return Err(LabelParseError::Empty);
        }
        Ok(Self(labels))
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &LabelMap {
        &self.0
    }

    /// Take the underlying map.
    #[must_use]
    pub fn into_map(self) -> LabelMap {
        self.0
    }
}

impl FromStr for Labels {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.0))
    }
}

/// Render a label map as sorted `k:v` pairs joined by `,`.
#[must_use]
pub fn join(labels: &LabelMap) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{k}{KEY_VALUE_SEPARATOR}{v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render a label map for a table cell, truncated to `max` characters.
#[must_use]
pub fn display(labels: &LabelMap, max: i64) -> String {
    truncate_string(&join(labels), max)
}

/// Shorten `text` to at most `max` characters.
///
/// A non-positive `max` disables truncation. Above three characters the
/// result ends with `...`.
#[must_use]
pub fn truncate_string(text: &str, max: i64) -> String {
    let Ok(max) = usize::try_from(max) else {
        return text.to_string();
    };
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    if max <= ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn parses_pairs() {
        let labels = Labels::parse("k1:v1;k2:v2").unwrap();
        assert_eq!(labels.as_map().len(), 2);
        assert_eq!(labels.as_map()["k1"], "v1");
        assert_eq!(labels.to_string(), "k1:v1,k2:v2");
    }

    #[test]
    fn display_is_sorted() {
        let labels = Labels::parse("zone:eu;app:web;env:prod").unwrap();
        assert_eq!(labels.to_string(), "app:web,env:prod,zone:eu");
    }

    #[test_case("novalue" ; "missing separator")]
    #[test_case("a:b:c" ; "extra separator")]
    #[test_case("ok:1;bad" ; "one bad entry")]
    #[test_case(":value" ; "empty key")]
    fn rejects_malformed(input: &str) {
        assert!(matches!(
            Labels::parse(input),
            Err(LabelParseError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Labels::parse(" ; "), Err(LabelParseError::Empty));
    }

    #[test_case("abcdef", 0, "abcdef" ; "zero disables")]
    #[test_case("abcdef", -1, "abcdef" ; "negative disables")]
    #[test_case("abcdef", 6, "abcdef" ; "exact length")]
    #[test_case("abcdef", 5, "ab..." ; "ellipsis")]
    #[test_case("abcdef", 3, "abc" ; "short limit")]
    #[test_case("abcdef", 1, "a" ; "one char")]
    #[test_case("ñandúes", 5, "ña..." ; "counts characters")]
    fn truncates(text: &str, max: i64, expected: &str) {
        assert_eq!(truncate_string(text, max), expected);
    }

    proptest! {
        #[test]
        fn truncation_never_exceeds_limit(text in "\\PC{0,40}", max in 1i64..30) {
            let out = truncate_string(&text, max);
            prop_assert!(out.chars().count() <= usize::try_from(max).unwrap());
        }

        #[test]
        fn short_text_is_untouched(text in "\\PC{0,10}", max in 10i64..40) {
            prop_assert_eq!(truncate_string(&text, max), text);
        }

        #[test]
        fn rendering_is_stable(pairs in proptest::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 1..6)) {
            let raw = pairs
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(";");
            let labels = Labels::parse(&raw).unwrap();
            prop_assert_eq!(labels.as_map(), &pairs);
            let rendered = labels.to_string();
            prop_assert_eq!(Labels::parse(&rendered.replace(',', ";")).unwrap().to_string(), rendered);
        }
    }
}
