//! File collaborator: vault traversal and note reading.

use chrono::{DateTime, Utc};
use linkvault_core::prelude::*;
use linkvault_graph::ContentSource;
use std::collections::HashSet;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Walk the vault and collect every file the graph should know about.
///
/// Notes and canvas files are always collected; media files only when
/// `config.attachments` is set. Files with an unrecognised extension are
/// ignored. Names listed in `excluded_paths` are pruned
/// wherever they appear. Any traversal error aborts the scan.
pub fn discover_files(config: &ConnectConfig) -> Result<Vec<DiscoveredFile>> {
    let root = std::path::absolute(&config.root).map_err(|e| Error::io(&config.root, e))?;
    let extensions = config.extensions();
    let mut files = Vec::new();

    let walker = WalkDir::new(&root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, &config.excluded_paths));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(&root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        match extensions.classify_path(entry.path()) {
            None => continue,
            Some(NodeKind::Media) if !config.attachments => continue,
            Some(_) => {}
        }

        let relative_path = entry
            .path()
            .strip_prefix(&root)
            .map_err(|_| Error::traversal(entry.path(), "entry lies outside the vault root"))?
            .to_path_buf();
        let modified = entry
            .metadata()
            .map_err(|e| walk_error(&root, e))?
            .modified()
            .map_err(|e| Error::io(entry.path(), e))?;

        files.push(DiscoveredFile {
            relative_path,
            absolute_path: entry.path().to_path_buf(),
            modified_time: DateTime::<Utc>::from(modified),
        });
    }

    log::debug!("Discovered {} files under {}", files.len(), root.display());
    Ok(files)
}

fn is_excluded(entry: &DirEntry, excluded: &HashSet<String>) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| excluded.contains(name))
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let reason = err.to_string();
    match err.into_io_error() {
        Some(source) => Error::io(path, source),
        None => Error::traversal(path, reason),
    }
}

/// Reads note text straight from disk.
///
/// Invalid UTF-8 is replaced rather than rejected; only real I/O failures
/// abort a connect.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentSource;

impl ContentSource for FsContentSource {
    fn read_note(&self, entry: &FileEntry) -> Result<String> {
        let bytes =
            std::fs::read(&entry.absolute_path).map_err(|e| Error::io(&entry.absolute_path, e))?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!(
                    "{} is not valid UTF-8, replacing invalid bytes",
                    entry.relative_path.display()
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}
