//! Shared utilities for operations across linkvault crates.
//!
//! Provides helpers for:
//! - Identity key normalization
//! - Platform-independent relative path strings
//! - Serialization with consistent error handling
//! - CSV building

use crate::{Error, Result};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Normalize a name or path into the case-insensitive identity namespace.
///
/// NFC, lowercase, forward slashes, no leading `./` or `/`, trimmed.
pub fn normalize_key(raw: &str) -> String {
    let folded: String = raw.nfc().collect::<String>().to_lowercase().replace('\\', "/");
    let mut key = folded.trim();
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    key.trim_start_matches('/').trim().to_string()
}

/// Render a relative path with `/` separators regardless of platform
pub fn relative_path_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Generic JSON serialization with consistent error handling
/// Works with any type that implements Serialize (including slices)
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::other(format!("Failed to serialize {} as JSON: {}", context, e)))
}

/// Generic CSV serialization builder
/// Use the CSVBuilder fluent API to construct and export CSV data
pub struct CSVBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CSVBuilder {
    /// Create a new CSV with headers
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row of data from owned strings
    pub fn add_row(mut self, values: Vec<String>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the CSV string, quoting fields that need it
    pub fn build(self) -> String {
        let mut csv = join_fields(&self.headers);
        csv.push('\n');
        for row in &self.rows {
            csv.push_str(&join_fields(row));
            csv.push('\n');
        }
        csv
    }
}

fn join_fields(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote a CSV field if it contains a separator, quote or line break
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Lipsum/Ne Fuit "), "lipsum/ne fuit");
        assert_eq!(normalize_key("./notes\\A"), "notes/a");
        assert_eq!(normalize_key("/Root"), "root");
    }

    #[test]
    fn test_normalize_key_unicode() {
        // "é" precomposed vs "e" + combining acute
        assert_eq!(normalize_key("Caf\u{e9}"), normalize_key("Cafe\u{301}"));
    }

    #[test]
    fn test_relative_path_string() {
        let path: PathBuf = ["lipsum", "Ne fuit.md"].iter().collect();
        assert_eq!(relative_path_string(&path), "lipsum/Ne fuit.md");
    }

    #[test]
    fn test_csv_builder_quotes() {
        let csv = CSVBuilder::new(&["name", "count"])
            .add_row(vec!["plain".to_string(), "1".to_string()])
            .add_row(vec!["with, comma".to_string(), "2".to_string()])
            .add_row(vec!["say \"hi\"".to_string(), String::new()])
            .build();
        assert_eq!(
            csv,
            "name,count\nplain,1\n\"with, comma\",2\n\"say \"\"hi\"\"\",\n"
        );
    }
}
