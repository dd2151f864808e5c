//! Rendering of vault views for the command line.

use linkvault_export::{
    BacklinkCountsExporter, ExportFormat, GraphStatsExporter, ListExporter, TableExporter,
};
use linkvault_vault::prelude::*;

/// A view of a connected vault that can be printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Note metadata table
    Notes,
    /// Media metadata table
    Media,
    /// Canvas metadata table
    Canvas,
    /// Isolated notes
    Isolated,
    /// Isolated canvas files
    IsolatedCanvas,
    /// Nonexistent notes
    Nonexistent,
    /// Nonexistent media files
    NonexistentMedia,
    /// Nonexistent canvas files
    NonexistentCanvas,
    /// Backlink counts for one identity
    Backlinks(String),
    /// Graph statistics
    Stats,
}

/// Render `view` of `vault` in the requested format
pub fn render(vault: &Vault, view: &View, format: ExportFormat) -> Result<String> {
    match view {
        View::Notes => TableExporter::export(&vault.note_metadata(), format),
        View::Media => {
            if !vault.attachments() {
                log::warn!("Media table is empty: vault was connected without attachments");
            }
            TableExporter::export(&vault.media_metadata(), format)
        }
        View::Canvas => TableExporter::export(&vault.canvas_metadata(), format),
        View::Isolated => ListExporter::export("identity", &vault.isolated_notes(), format),
        View::IsolatedCanvas => {
            ListExporter::export("identity", &vault.isolated_canvas_files(), format)
        }
        View::Nonexistent => ListExporter::export("identity", &vault.nonexistent_notes(), format),
        View::NonexistentMedia => {
            ListExporter::export("identity", &vault.nonexistent_media_files(), format)
        }
        View::NonexistentCanvas => {
            ListExporter::export("identity", &vault.nonexistent_canvas_files(), format)
        }
        View::Backlinks(identity) => {
            BacklinkCountsExporter::export(&vault.backlink_counts(identity)?, format)
        }
        View::Stats => GraphStatsExporter::export(&vault.stats(), format),
    }
}
