//! Core data models representing vault elements.
//!
//! These types are designed to be:
//! - **Serializable**: All public data types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Type-Safe**: Enums replace magic strings
//!
//! The [`FileUniverse`] is the immutable set of files discovered under the
//! vault root. It owns identity naming for existing files; identities for
//! dangling references are minted later by the resolver.

use crate::utils::{normalize_key, relative_path_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Kind of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A text note that is scanned for references
    Note,
    /// An attachment (image, audio, pdf, ...); never scanned
    Media,
    /// A canvas board; tracked as a node but never scanned
    Canvas,
}

/// Type of a link edge in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// Wikilink: `[[Note]]`
    WikiLink,
    /// Embedded file or note: `![[image.png]]`
    Embed,
}

/// Attachment extensions Obsidian recognises out of the box
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "mp3", "wav", "m4a", "ogg", "3gp", "flac",
    "webm", "mp4", "ogv", "mov", "mkv", "pdf",
];

/// Extensions that decide the kind of a file or a reference target.
///
/// Extensions are stored lowercase and without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSet {
    pub notes: HashSet<String>,
    pub canvases: HashSet<String>,
    pub media: HashSet<String>,
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            notes: ["md".to_string()].into_iter().collect(),
            canvases: ["canvas".to_string()].into_iter().collect(),
            media: DEFAULT_MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ExtensionSet {
    /// Classify a file discovered on disk.
    ///
    /// Files whose extension is in none of the sets are not part of the vault.
    pub fn classify_path(&self, path: &Path) -> Option<NodeKind> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.classify_extension(ext))
    }

    /// Classify a reference target string.
    ///
    /// A reference without a known extension points at a note, so
    /// `[[Node.js]]` and `[[Chapter 3.5]]` are note references.
    pub fn classify_reference(&self, target: &str) -> NodeKind {
        reference_extension(target)
            .and_then(|ext| self.classify_extension(ext))
            .unwrap_or(NodeKind::Note)
    }

    /// Is `ext` (without dot, any case) a note extension?
    pub fn is_note_extension(&self, ext: &str) -> bool {
        self.notes.contains(&ext.to_lowercase())
    }

    fn classify_extension(&self, ext: &str) -> Option<NodeKind> {
        let ext = ext.to_lowercase();
        if self.notes.contains(&ext) {
            Some(NodeKind::Note)
        } else if self.canvases.contains(&ext) {
            Some(NodeKind::Canvas)
        } else if self.media.contains(&ext) {
            Some(NodeKind::Media)
        } else {
            None
        }
    }
}

/// Extension of the last path segment of a reference, if it has one.
///
/// `"Note"` has none, `"Sussudio.mp3"` has `"mp3"`, `"a.b/Note"` has none.
pub fn reference_extension(target: &str) -> Option<&str> {
    let name = target.rsplit('/').next().unwrap_or(target);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 < name.len() => {
            let ext = &name[idx + 1..];
            // "Note. With period" is a note title, not an extension
            if ext.chars().any(char::is_whitespace) {
                None
            } else {
                Some(ext)
            }
        }
        Some(_) => None,
    }
}

/// YAML front matter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub data: BTreeMap<String, serde_json::Value>,
}

impl FrontMatter {
    /// Extract tags from front matter
    pub fn tags(&self) -> Vec<String> {
        self.string_list("tags")
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.data.get(key) {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(arr)) => arr
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => vec![],
        }
    }
}

/// Everything the reference extractor finds in one note, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReferences {
    /// Raw wikilink targets (alias removed, section suffix kept)
    pub wikilinks: Vec<String>,
    /// Raw embed targets (alias removed, section suffix kept)
    pub embeds: Vec<String>,
    /// Tag names without the leading `#`
    pub tags: Vec<String>,
    /// Relative markdown link destinations; not graph edges
    pub markdown_links: Vec<String>,
    pub front_matter: Option<FrontMatter>,
}

/// A file yielded by traversal, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
    pub modified_time: DateTime<Utc>,
}

/// A file in the universe with its canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub identity: String,
    pub kind: NodeKind,
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
    pub modified_time: DateTime<Utc>,
}

impl FileEntry {
    /// Relative path with forward slashes, independent of platform
    pub fn relative_path_string(&self) -> String {
        relative_path_string(&self.relative_path)
    }
}

/// The set of files discovered under the vault root.
///
/// Built once per connect and immutable afterwards. Entries are ordered by
/// relative path so that identity naming is deterministic.
#[derive(Debug, Clone)]
pub struct FileUniverse {
    root: PathBuf,
    extensions: ExtensionSet,
    entries: Vec<FileEntry>,
    /// Normalized identity -> entry index
    by_identity: HashMap<String, usize>,
}

impl FileUniverse {
    /// Assign identities to discovered files.
    ///
    /// Notes are named by file stem, media and canvas files by file name.
    /// When several files of the same family share a name, one sitting at
    /// the vault root keeps the short name and the others are named by
    /// their relative path (without extension for notes).
    pub fn new(root: impl Into<PathBuf>, extensions: ExtensionSet, files: Vec<DiscoveredFile>) -> Self {
        let mut files = files;
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        let classified: Vec<(DiscoveredFile, NodeKind)> = files
            .into_iter()
            .filter_map(|f| match extensions.classify_path(&f.relative_path) {
                Some(kind) => Some((f, kind)),
                None => {
                    log::debug!("Skipping {}: unknown extension", f.relative_path.display());
                    None
                }
            })
            .collect();

        // Count how many files of each family share a short name
        let mut short_name_counts: HashMap<(bool, String), usize> = HashMap::new();
        for (file, kind) in &classified {
            let key = (*kind == NodeKind::Note, normalize_key(&short_name(&file.relative_path, *kind)));
            *short_name_counts.entry(key).or_insert(0) += 1;
        }

        let mut entries = Vec::with_capacity(classified.len());
        let mut by_identity = HashMap::with_capacity(classified.len());

        for (file, kind) in classified {
            let short = short_name(&file.relative_path, kind);
            let shared = short_name_counts
                .get(&(kind == NodeKind::Note, normalize_key(&short)))
                .copied()
                .unwrap_or(0)
                > 1;
            let at_root = file
                .relative_path
                .parent()
                .is_none_or(|p| p.as_os_str().is_empty());

            let mut identity = if !shared || at_root {
                short
            } else {
                long_name(&file.relative_path, kind)
            };

            // Last resort for names that still clash (e.g. `A.md` and `a.md`
            // side by side on a case-sensitive file system)
            if by_identity.contains_key(&normalize_key(&identity)) {
                identity = relative_path_string(&file.relative_path);
            }
            if by_identity.contains_key(&normalize_key(&identity)) {
                log::warn!(
                    "Skipping {}: identity {:?} already taken",
                    file.relative_path.display(),
                    identity
                );
                continue;
            }

            by_identity.insert(normalize_key(&identity), entries.len());
            entries.push(FileEntry {
                identity,
                kind,
                relative_path: file.relative_path,
                absolute_path: file.absolute_path,
                modified_time: file.modified_time,
            });
        }

        Self {
            root: root.into(),
            extensions,
            entries,
            by_identity,
        }
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extension classification in effect for this universe
    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// All entries, ordered by relative path
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Entry by position
    pub fn entry(&self, idx: usize) -> &FileEntry {
        &self.entries[idx]
    }

    /// Entries of a given kind
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Notes discovered by traversal; the only scannable sources
    pub fn notes(&self) -> impl Iterator<Item = &FileEntry> {
        self.of_kind(NodeKind::Note)
    }

    /// Look up an entry by identity (case-insensitive)
    pub fn get(&self, identity: &str) -> Option<&FileEntry> {
        self.position(identity).map(|idx| &self.entries[idx])
    }

    /// Position of an entry by identity (case-insensitive)
    pub fn position(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(&normalize_key(identity)).copied()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no files were discovered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn short_name(path: &Path, kind: NodeKind) -> String {
    let name = match kind {
        NodeKind::Note => path.file_stem(),
        NodeKind::Media | NodeKind::Canvas => path.file_name(),
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn long_name(path: &Path, kind: NodeKind) -> String {
    match kind {
        NodeKind::Note => relative_path_string(&path.with_extension("")),
        NodeKind::Media | NodeKind::Canvas => relative_path_string(path),
    }
}
