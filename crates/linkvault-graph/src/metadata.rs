//! Per-node metadata tables derived from the link graph.
//!
//! Rows follow graph order: discovered files by relative path, then
//! nonexistent targets in the order they were first referenced.
//!
//! Scan-derived columns are `Option`: `Some(0)` means the note was scanned
//! and nothing was found, `None` means the node was never scanned.

use crate::graph::{LinkGraph, Node};
use chrono::{DateTime, Utc};
use linkvault_core::{FileEntry, NodeKind};
use serde::Serialize;
use std::path::PathBuf;

/// One row of the note table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteMetadata {
    pub identity: String,
    pub relative_path: Option<PathBuf>,
    pub absolute_path: Option<PathBuf>,
    pub exists: bool,
    pub backlink_count: usize,
    pub wikilink_count: Option<usize>,
    pub tag_count: Option<usize>,
    pub embedded_file_count: Option<usize>,
    pub modified_time: Option<DateTime<Utc>>,
}

/// One row of the media table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaMetadata {
    pub identity: String,
    pub relative_path: Option<PathBuf>,
    pub absolute_path: Option<PathBuf>,
    pub exists: bool,
    pub backlink_count: usize,
}

/// One row of the canvas table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasMetadata {
    pub identity: String,
    pub relative_path: Option<PathBuf>,
    pub absolute_path: Option<PathBuf>,
    pub exists: bool,
    pub backlink_count: usize,
    pub modified_time: Option<DateTime<Utc>>,
}

impl LinkGraph {
    fn file_entry(&self, node: &Node) -> Option<&FileEntry> {
        node.entry.map(|pos| self.universe().entry(pos))
    }

    /// Note table: every discovered note plus every nonexistent note target
    pub fn note_metadata(&self) -> Vec<NoteMetadata> {
        self.indexed_nodes()
            .filter(|(_, node)| node.kind == NodeKind::Note)
            .map(|(idx, node)| {
                let entry = self.file_entry(node);
                let scan = self.scan_of(idx);
                NoteMetadata {
                    identity: node.identity.clone(),
                    relative_path: entry.map(|e| e.relative_path.clone()),
                    absolute_path: entry.map(|e| e.absolute_path.clone()),
                    exists: node.exists,
                    backlink_count: self.in_degree(idx),
                    wikilink_count: scan.map(|s| s.wikilinks.len()),
                    tag_count: scan.map(|s| s.tags.len()),
                    embedded_file_count: scan.map(|s| s.embeds.len()),
                    modified_time: entry.map(|e| e.modified_time),
                }
            })
            .collect()
    }

    /// Media table; empty when the graph was built without attachments
    pub fn media_metadata(&self) -> Vec<MediaMetadata> {
        self.indexed_nodes()
            .filter(|(_, node)| node.kind == NodeKind::Media)
            .map(|(idx, node)| {
                let entry = self.file_entry(node);
                MediaMetadata {
                    identity: node.identity.clone(),
                    relative_path: entry.map(|e| e.relative_path.clone()),
                    absolute_path: entry.map(|e| e.absolute_path.clone()),
                    exists: node.exists,
                    backlink_count: self.in_degree(idx),
                }
            })
            .collect()
    }

    /// Canvas table
    pub fn canvas_metadata(&self) -> Vec<CanvasMetadata> {
        self.indexed_nodes()
            .filter(|(_, node)| node.kind == NodeKind::Canvas)
            .map(|(idx, node)| {
                let entry = self.file_entry(node);
                CanvasMetadata {
                    identity: node.identity.clone(),
                    relative_path: entry.map(|e| e.relative_path.clone()),
                    absolute_path: entry.map(|e| e.absolute_path.clone()),
                    exists: node.exists,
                    backlink_count: self.in_degree(idx),
                    modified_time: entry.map(|e| e.modified_time),
                }
            })
            .collect()
    }
}
