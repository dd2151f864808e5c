//! Identity resolution for raw wikilink and embed targets.
//!
//! [`PathIndex`] is built once per connect from the [`FileUniverse`] and
//! turns a raw target into either an existing file or a nonexistent
//! identity. Rules, in order:
//!
//! 1. Drop the alias and `#heading` / `#^block` suffix.
//! 2. Case-insensitive match against full relative paths (note extension
//!    optional, media/canvas extension required). `./` and `../` targets are
//!    joined to the referencing note's folder first.
//! 3. A bare file name matching exactly one file anywhere in the vault.
//! 4. Anything else is a nonexistent identity keyed by the normalized
//!    target, so every spelling of the same missing name meets at one node.
//!
//! Resolution never fails.

use linkvault_core::{
    ExtensionSet, FileUniverse, NodeKind, normalize_key, models::reference_extension,
};
use linkvault_parser::link_utils::{strip_alias, strip_section};
use std::collections::HashMap;
use std::path::{Component, Path};

/// Outcome of resolving one raw target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Index of an entry in the file universe
    Existing(usize),
    /// A target with no file behind it
    Missing {
        /// Normalized key shared by every spelling of this target
        key: String,
        /// First-seen spelling, used as the node identity
        display: String,
        kind: NodeKind,
    },
}

/// Case-insensitive lookup tables over the file universe.
#[derive(Debug, Clone)]
pub struct PathIndex {
    extensions: ExtensionSet,
    /// (family, normalized relative path) -> entries
    by_path: HashMap<(NodeKind, String), Vec<usize>>,
    /// (family, normalized file name) -> entries
    by_name: HashMap<(NodeKind, String), Vec<usize>>,
    /// (family, normalized identity) -> entry
    by_identity: HashMap<(NodeKind, String), usize>,
}

impl PathIndex {
    /// Build the index in one pass over the universe
    pub fn new(universe: &FileUniverse) -> Self {
        let extensions = universe.extensions().clone();
        let mut by_path: HashMap<(NodeKind, String), Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<(NodeKind, String), Vec<usize>> = HashMap::new();
        let mut by_identity = HashMap::with_capacity(universe.len());

        for (idx, entry) in universe.entries().iter().enumerate() {
            let rel = entry.relative_path_string();
            let (path_key, name_key) = match entry.kind {
                NodeKind::Note => {
                    let stem_path = strip_note_extension(&normalize_key(&rel), &extensions);
                    let name = stem_path.rsplit('/').next().unwrap_or(&stem_path).to_string();
                    (stem_path, name)
                }
                NodeKind::Media | NodeKind::Canvas => {
                    let path = normalize_key(&rel);
                    let name = path.rsplit('/').next().unwrap_or(&path).to_string();
                    (path, name)
                }
            };

            by_path.entry((entry.kind, path_key)).or_default().push(idx);
            by_name.entry((entry.kind, name_key)).or_default().push(idx);
            by_identity.insert((entry.kind, normalize_key(&entry.identity)), idx);
        }

        Self {
            extensions,
            by_path,
            by_name,
            by_identity,
        }
    }

    /// Resolve `raw` as written in the note at `source` (relative path).
    pub fn resolve(&self, raw: &str, source: &Path) -> Resolution {
        let cleaned = strip_section(strip_alias(raw)).trim();

        let (spelled, relative) = if cleaned.starts_with("./") || cleaned.starts_with("../") {
            match join_relative(source, cleaned) {
                Some(joined) => (joined, true),
                None => (cleaned.to_string(), true),
            }
        } else {
            (cleaned.to_string(), false)
        };

        let kind = self.extensions.classify_reference(&spelled);
        let key = match kind {
            NodeKind::Note => strip_note_extension(&normalize_key(&spelled), &self.extensions),
            NodeKind::Media | NodeKind::Canvas => normalize_key(&spelled),
        };

        // Rule 2: full relative path
        if let Some(idx) = single(self.by_path.get(&(kind, key.clone()))) {
            return Resolution::Existing(idx);
        }

        // Rule 3: bare file name anywhere in the vault
        if !relative && !key.contains('/') {
            match self.by_name.get(&(kind, key.clone())).map(Vec::as_slice) {
                Some([idx]) => return Resolution::Existing(*idx),
                Some(candidates) if candidates.len() > 1 => {
                    log::debug!(
                        "Ambiguous reference {:?}: {} candidates",
                        raw,
                        candidates.len()
                    );
                }
                _ => {}
            }
        }

        // A target spelled exactly like an existing identity of its family is that file
        if let Some(&idx) = self.by_identity.get(&(kind, key.clone())) {
            return Resolution::Existing(idx);
        }

        let display = match kind {
            NodeKind::Note => strip_note_extension(&spelled, &self.extensions),
            NodeKind::Media | NodeKind::Canvas => spelled.clone(),
        };

        // `x.png.md` must not borrow the name of the media file `x.png`
        if kind == NodeKind::Note && self.identity_taken(&key) {
            return Resolution::Missing {
                key: normalize_key(&spelled),
                display: spelled,
                kind,
            };
        }
        Resolution::Missing { key, display, kind }
    }

    fn identity_taken(&self, key: &str) -> bool {
        [NodeKind::Note, NodeKind::Media, NodeKind::Canvas]
            .into_iter()
            .any(|kind| self.by_identity.contains_key(&(kind, key.to_string())))
    }
}

fn single(candidates: Option<&Vec<usize>>) -> Option<usize> {
    match candidates.map(Vec::as_slice) {
        Some([idx]) => Some(*idx),
        _ => None,
    }
}

/// Remove a trailing note extension (`Note.md` -> `Note`), keeping case.
fn strip_note_extension(target: &str, extensions: &ExtensionSet) -> String {
    match reference_extension(target) {
        Some(ext) if extensions.is_note_extension(ext) => {
            target[..target.len() - ext.len() - 1].to_string()
        }
        _ => target.to_string(),
    }
}

/// Join a `./` or `../` target to the folder of the referencing note.
///
/// Returns `None` when the target climbs above the vault root.
fn join_relative(source: &Path, target: &str) -> Option<String> {
    let mut segments: Vec<String> = source
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    for part in target.split('/') {
        match part {
            ".." => {
                segments.pop()?;
            }
            "." | "" => {}
            other => segments.push(other.to_string()),
        }
    }

    Some(segments.join("/"))
}
