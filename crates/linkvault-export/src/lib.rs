//! # Export System
//!
//! Renders the vault metadata tables and query results as JSON or CSV for
//! downstream processing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_export::{ExportFormat, TableExporter};
//! use linkvault_vault::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let vault = Vault::connect(ConnectConfig::builder("/path/to/vault").build()?)?;
//!
//! let json = TableExporter::to_json(&vault.note_metadata())?;
//! let csv = TableExporter::export(&vault.media_metadata(), ExportFormat::Csv)?;
//! println!("{json}\n{csv}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Export Formats
//!
//! ### JSON Export
//! - Pretty-printed array of row objects
//! - Missing cells are `null`
//! - Timestamps in RFC 3339
//!
//! ### CSV Export
//! - Header row included, `identity` first
//! - Missing cells are empty fields
//! - Fields with commas, quotes or line breaks are quoted
//!
//! A missing cell and a zero are never confused: `wikilink_count` is empty
//! for a note that was never scanned and `0` for a scanned note without
//! links.

use linkvault_core::prelude::*;
use linkvault_core::{CSVBuilder, relative_path_string, to_json_string};
use linkvault_graph::{CanvasMetadata, GraphStats, MediaMetadata, NoteMetadata};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format (pretty-printed)
    #[default]
    Json,
    /// CSV format
    Csv,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(Error::config_error(format!(
                "Unknown export format '{}', expected json or csv",
                other
            ))),
        }
    }
}

/// A row of a metadata table, keyed by identity.
pub trait TableRecord: Serialize {
    /// Column names after `identity`
    const COLUMNS: &'static [&'static str];

    fn identity(&self) -> &str;

    /// Cell values in [`Self::COLUMNS`] order; `None` is a missing cell
    fn cells(&self) -> Vec<Option<String>>;
}

fn path_cell(path: &Option<std::path::PathBuf>) -> Option<String> {
    path.as_deref().map(relative_path_string)
}

fn absolute_cell(path: &Option<std::path::PathBuf>) -> Option<String> {
    path.as_deref().map(|p: &Path| p.display().to_string())
}

impl TableRecord for NoteMetadata {
    const COLUMNS: &'static [&'static str] = &[
        "relative_path",
        "absolute_path",
        "exists",
        "backlink_count",
        "wikilink_count",
        "tag_count",
        "embedded_file_count",
        "modified_time",
    ];

    fn identity(&self) -> &str {
        &self.identity
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            path_cell(&self.relative_path),
            absolute_cell(&self.absolute_path),
            Some(self.exists.to_string()),
            Some(self.backlink_count.to_string()),
            self.wikilink_count.map(|n| n.to_string()),
            self.tag_count.map(|n| n.to_string()),
            self.embedded_file_count.map(|n| n.to_string()),
            self.modified_time.map(|t| t.to_rfc3339()),
        ]
    }
}

impl TableRecord for MediaMetadata {
    const COLUMNS: &'static [&'static str] =
        &["relative_path", "absolute_path", "exists", "backlink_count"];

    fn identity(&self) -> &str {
        &self.identity
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            path_cell(&self.relative_path),
            absolute_cell(&self.absolute_path),
            Some(self.exists.to_string()),
            Some(self.backlink_count.to_string()),
        ]
    }
}

impl TableRecord for CanvasMetadata {
    const COLUMNS: &'static [&'static str] = &[
        "relative_path",
        "absolute_path",
        "exists",
        "backlink_count",
        "modified_time",
    ];

    fn identity(&self) -> &str {
        &self.identity
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            path_cell(&self.relative_path),
            absolute_cell(&self.absolute_path),
            Some(self.exists.to_string()),
            Some(self.backlink_count.to_string()),
            self.modified_time.map(|t| t.to_rfc3339()),
        ]
    }
}

/// Metadata table exporter
pub struct TableExporter;

impl TableExporter {
    /// Export rows as a JSON array
    pub fn to_json<R: TableRecord>(rows: &[R]) -> Result<String> {
        to_json_string(rows, "metadata table")
    }

    /// Export rows as CSV with an `identity` column first
    pub fn to_csv<R: TableRecord>(rows: &[R]) -> Result<String> {
        let headers: Vec<&str> = std::iter::once("identity")
            .chain(R::COLUMNS.iter().copied())
            .collect();

        let csv = rows.iter().fold(CSVBuilder::new(&headers), |csv, row| {
            let values = std::iter::once(row.identity().to_string())
                .chain(row.cells().into_iter().map(Option::unwrap_or_default))
                .collect();
            csv.add_row(values)
        });

        Ok(csv.build())
    }

    pub fn export<R: TableRecord>(rows: &[R], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(rows),
            ExportFormat::Csv => Self::to_csv(rows),
        }
    }
}

/// Exporter for identity lists (isolated notes, nonexistent targets)
pub struct ListExporter;

impl ListExporter {
    pub fn to_json(items: &[String]) -> Result<String> {
        to_json_string(items, "identity list")
    }

    /// One identity per row under `header`
    pub fn to_csv(header: &str, items: &[String]) -> Result<String> {
        let csv = items
            .iter()
            .fold(CSVBuilder::new(&[header]), |csv, item| {
                csv.add_row(vec![item.clone()])
            });
        Ok(csv.build())
    }

    pub fn export(header: &str, items: &[String], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(items),
            ExportFormat::Csv => Self::to_csv(header, items),
        }
    }
}

/// Exporter for backlink counts of one identity
pub struct BacklinkCountsExporter;

impl BacklinkCountsExporter {
    pub fn to_json(counts: &BTreeMap<String, usize>) -> Result<String> {
        to_json_string(counts, "backlink counts")
    }

    pub fn to_csv(counts: &BTreeMap<String, usize>) -> Result<String> {
        let csv = counts
            .iter()
            .fold(CSVBuilder::new(&["source", "count"]), |csv, (source, count)| {
                csv.add_row(vec![source.clone(), count.to_string()])
            });
        Ok(csv.build())
    }

    pub fn export(counts: &BTreeMap<String, usize>, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(counts),
            ExportFormat::Csv => Self::to_csv(counts),
        }
    }
}

/// Graph statistics exporter
pub struct GraphStatsExporter;

impl GraphStatsExporter {
    pub fn to_json(stats: &GraphStats) -> Result<String> {
        to_json_string(stats, "graph stats")
    }

    /// Export graph stats as CSV (single row)
    pub fn to_csv(stats: &GraphStats) -> Result<String> {
        let csv = CSVBuilder::new(&[
            "total_nodes",
            "total_links",
            "notes",
            "media_files",
            "canvas_files",
            "nonexistent",
            "isolated_notes",
        ])
        .add_row(vec![
            stats.total_nodes.to_string(),
            stats.total_links.to_string(),
            stats.notes.to_string(),
            stats.media_files.to_string(),
            stats.canvas_files.to_string(),
            stats.nonexistent.to_string(),
            stats.isolated_notes.to_string(),
        ]);
        Ok(csv.build())
    }

    pub fn export(stats: &GraphStats, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(stats),
            ExportFormat::Csv => Self::to_csv(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn scanned_note() -> NoteMetadata {
        NoteMetadata {
            identity: "Sussudio".to_string(),
            relative_path: Some(PathBuf::from("Sussudio.md")),
            absolute_path: Some(PathBuf::from("/vault/Sussudio.md")),
            exists: true,
            backlink_count: 1,
            wikilink_count: Some(0),
            tag_count: Some(3),
            embedded_file_count: Some(2),
            modified_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    fn missing_note() -> NoteMetadata {
        NoteMetadata {
            identity: "Phil Collins".to_string(),
            relative_path: None,
            absolute_path: None,
            exists: false,
            backlink_count: 1,
            wikilink_count: None,
            tag_count: None,
            embedded_file_count: None,
            modified_time: None,
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_cells_match_columns() {
        assert_eq!(scanned_note().cells().len(), NoteMetadata::COLUMNS.len());
        let media = MediaMetadata {
            identity: "a.png".to_string(),
            relative_path: None,
            absolute_path: None,
            exists: false,
            backlink_count: 0,
        };
        assert_eq!(media.cells().len(), MediaMetadata::COLUMNS.len());
    }

    #[test]
    fn test_missing_cells_are_null_in_json() {
        let json = TableExporter::to_json(&[missing_note()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["wikilink_count"], serde_json::Value::Null);
        assert_eq!(value[0]["exists"], serde_json::json!(false));
        assert_eq!(value[0]["backlink_count"], serde_json::json!(1));
    }

    #[test]
    fn test_zero_is_not_missing_in_csv() {
        let csv = TableExporter::to_csv(&[scanned_note(), missing_note()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].contains(",true,1,0,3,2,"));
        assert_eq!(lines[2], "Phil Collins,,,false,1,,,,");
    }

    #[test]
    fn test_list_export() {
        let items = vec!["Isolated note".to_string(), "a, b".to_string()];
        assert_eq!(
            ListExporter::to_csv("identity", &items).unwrap(),
            "identity\nIsolated note\n\"a, b\"\n"
        );
        let json = ListExporter::export("identity", &items, ExportFormat::Json).unwrap();
        assert!(json.contains("Isolated note"));
    }

    #[test]
    fn test_backlink_counts_export() {
        let counts = BTreeMap::from([("A".to_string(), 2), ("B".to_string(), 1)]);
        assert_eq!(
            BacklinkCountsExporter::to_csv(&counts).unwrap(),
            "source,count\nA,2\nB,1\n"
        );
    }
}
