//! The connected vault: one owned graph built per connect.

use crate::scanner::{FsContentSource, discover_files};
use linkvault_core::prelude::*;
use linkvault_graph::{
    CanvasMetadata, GraphBuilder, GraphStats, LinkGraph, MediaMetadata, NoteMetadata,
};
use linkvault_parser::{OfmExtractor, ReferenceExtractor};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// A vault whose files have been traversed, scanned and linked.
///
/// All state is derived from disk at connect time. There is no incremental
/// update: [`Vault::reconnect`] rebuilds everything, and a failed reconnect
/// leaves an empty graph behind rather than the previous one.
#[derive(Debug, Clone)]
pub struct Vault {
    config: ConnectConfig,
    graph: LinkGraph,
    connected: bool,
}

impl Vault {
    /// Traverse, scan and link the vault described by `config`
    pub fn connect(config: ConnectConfig) -> Result<Self> {
        Self::connect_with(config, &OfmExtractor)
    }

    /// Connect with a custom reference extractor
    pub fn connect_with(config: ConnectConfig, extractor: &dyn ReferenceExtractor) -> Result<Self> {
        let graph = build_graph(&config, extractor)?;
        Ok(Self {
            config,
            graph,
            connected: true,
        })
    }

    /// Discard the current graph and rebuild it from disk.
    ///
    /// On failure the vault is left disconnected with an empty graph: lists
    /// and tables are empty and identity lookups fail with
    /// [`Error::UnknownIdentity`] until a later reconnect succeeds.
    pub fn reconnect(&mut self) -> Result<()> {
        self.reconnect_with(&OfmExtractor)
    }

    /// Rebuild with a custom reference extractor
    pub fn reconnect_with(&mut self, extractor: &dyn ReferenceExtractor) -> Result<()> {
        match build_graph(&self.config, extractor) {
            Ok(graph) => {
                self.graph = graph;
                self.connected = true;
                Ok(())
            }
            Err(e) => {
                log::warn!("Reconnect failed, discarding graph: {}", e);
                self.graph = LinkGraph::empty(
                    &self.config.root,
                    self.config.extensions(),
                    self.config.attachments,
                );
                self.connected = false;
                Err(e)
            }
        }
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Whether the graph reflects the most recent connect attempt
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether media files are graph nodes
    pub fn attachments(&self) -> bool {
        self.config.attachments
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// The underlying link graph
    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    /// Files discovered by the last connect
    pub fn file_universe(&self) -> &FileUniverse {
        self.graph.universe()
    }

    // ==================== Backlinks ====================

    /// Number of references to `identity`, grouped by referencing note
    pub fn backlink_counts(&self, identity: &str) -> Result<BTreeMap<String, usize>> {
        self.graph.backlink_counts(identity)
    }

    /// Referencing notes, one entry per reference
    pub fn backlinks(&self, identity: &str) -> Result<Vec<String>> {
        self.graph.backlinks(identity)
    }

    pub fn backlinks_index(&self) -> BTreeMap<String, Vec<String>> {
        self.graph.backlinks_index()
    }

    // ==================== Note contents ====================

    /// Raw wikilink targets of a note, in source order
    pub fn wikilinks(&self, identity: &str) -> Result<&[String]> {
        self.graph.wikilinks(identity)
    }

    pub fn wikilinks_index(&self) -> BTreeMap<String, Vec<String>> {
        self.graph.wikilinks_index()
    }

    /// Raw embed targets of a note, in source order
    pub fn embedded_files(&self, identity: &str) -> Result<&[String]> {
        self.graph.embedded_files(identity)
    }

    pub fn embedded_files_index(&self) -> BTreeMap<String, Vec<String>> {
        self.graph.embedded_files_index()
    }

    pub fn tags(&self, identity: &str) -> Result<&[String]> {
        self.graph.tags(identity)
    }

    pub fn tags_index(&self) -> BTreeMap<String, Vec<String>> {
        self.graph.tags_index()
    }

    pub fn markdown_links(&self, identity: &str) -> Result<&[String]> {
        self.graph.markdown_links(identity)
    }

    pub fn front_matter(&self, identity: &str) -> Result<Option<&FrontMatter>> {
        self.graph.front_matter(identity)
    }

    // ==================== Isolation and dangling targets ====================

    pub fn isolated_notes(&self) -> Vec<String> {
        self.graph.isolated_notes()
    }

    pub fn isolated_canvas_files(&self) -> Vec<String> {
        self.graph.isolated_canvas_files()
    }

    pub fn nonexistent_notes(&self) -> Vec<String> {
        self.graph.nonexistent_notes()
    }

    /// Missing media targets; always empty without attachments
    pub fn nonexistent_media_files(&self) -> Vec<String> {
        self.graph.nonexistent_media_files()
    }

    pub fn nonexistent_canvas_files(&self) -> Vec<String> {
        self.graph.nonexistent_canvas_files()
    }

    // ==================== Tables ====================

    pub fn note_metadata(&self) -> Vec<NoteMetadata> {
        self.graph.note_metadata()
    }

    pub fn media_metadata(&self) -> Vec<MediaMetadata> {
        self.graph.media_metadata()
    }

    pub fn canvas_metadata(&self) -> Vec<CanvasMetadata> {
        self.graph.canvas_metadata()
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }
}

#[instrument(skip(config, extractor), fields(root = ?config.root, attachments = config.attachments), name = "vault_connect")]
fn build_graph(config: &ConnectConfig, extractor: &dyn ReferenceExtractor) -> Result<LinkGraph> {
    config.validate()?;
    log::info!("Connecting to vault at {:?}", config.root);

    let files = discover_files(config)?;
    let universe = FileUniverse::new(&config.root, config.extensions(), files);
    log::info!(
        "Found {} notes, {} canvas files, {} media files",
        universe.notes().count(),
        universe.of_kind(NodeKind::Canvas).count(),
        universe.of_kind(NodeKind::Media).count()
    );

    let graph = GraphBuilder::new(extractor)
        .attachments(config.attachments)
        .build(universe, &FsContentSource)?;

    log::info!(
        "Vault connected. Graph has {} nodes, {} links",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_vault() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("A.md"), "[[B]] [[B]] [[Ghost]]").unwrap();
        fs::write(root.join("B.md"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_connect() {
        let temp_dir = create_test_vault();
        let config = ConnectConfig::builder(temp_dir.path()).build().unwrap();
        let vault = Vault::connect(config).unwrap();

        assert!(vault.is_connected());
        assert!(!vault.attachments());
        assert_eq!(vault.root(), temp_dir.path());
        assert_eq!(vault.backlink_counts("B").unwrap()["A"], 2);
        assert_eq!(vault.nonexistent_notes(), vec!["Ghost"]);
    }

    #[test]
    fn test_connect_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConnectConfig {
            root: temp_dir.path().join("nope"),
            ..Default::default()
        };
        assert!(matches!(
            Vault::connect(config),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_reconnect_picks_up_changes() {
        let temp_dir = create_test_vault();
        let config = ConnectConfig::builder(temp_dir.path()).build().unwrap();
        let mut vault = Vault::connect(config).unwrap();

        fs::write(temp_dir.path().join("Ghost.md"), "[[A]]").unwrap();
        vault.reconnect().unwrap();

        assert!(vault.nonexistent_notes().is_empty());
        assert_eq!(vault.backlinks("A").unwrap(), vec!["Ghost"]);
    }

    #[test]
    fn test_failed_reconnect_disconnects() {
        let temp_dir = create_test_vault();
        let config = ConnectConfig::builder(temp_dir.path()).build().unwrap();
        let mut vault = Vault::connect(config).unwrap();

        let root = temp_dir.path().to_path_buf();
        drop(temp_dir);
        assert!(vault.reconnect().is_err());
        assert!(!vault.is_connected());
        assert!(!root.exists());

        // Nothing from the previous connect survives
        assert!(matches!(
            vault.backlink_counts("B"),
            Err(Error::UnknownIdentity { .. })
        ));
        assert!(vault.note_metadata().is_empty());
        assert!(vault.nonexistent_notes().is_empty());
        assert!(vault.file_universe().is_empty());
        assert_eq!(vault.stats().total_nodes, 0);
    }

    #[test]
    fn test_custom_extractor() {
        let temp_dir = create_test_vault();
        let config = ConnectConfig::builder(temp_dir.path()).build().unwrap();
        let nothing = |_: &str| ExtractedReferences::default();
        let vault = Vault::connect_with(config, &nothing).unwrap();

        assert_eq!(vault.isolated_notes(), vec!["A", "B"]);
        assert_eq!(vault.stats().total_links, 0);
    }
}
