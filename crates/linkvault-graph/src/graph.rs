//! Link graph using petgraph for vault relationship analysis

use crate::resolver::{PathIndex, Resolution};
use linkvault_core::prelude::*;
use linkvault_core::normalize_key;
use linkvault_parser::ReferenceExtractor;
use petgraph::graph::EdgeReference;
use petgraph::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Node index type for graph
type NodeIndex = petgraph::graph::NodeIndex;

/// A node in the link graph: a discovered file or a dangling target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub identity: String,
    pub kind: NodeKind,
    /// False for targets that were referenced but never found on disk
    pub exists: bool,
    /// Position in the file universe, for existing files
    #[serde(skip)]
    pub entry: Option<usize>,
}

/// One reference occurrence from a note to a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub kind: LinkType,
    /// Target as written in the note (alias removed)
    pub raw_target: String,
}

/// Supplies the text of a note during graph construction.
///
/// A failed read aborts the whole build.
pub trait ContentSource {
    fn read_note(&self, entry: &FileEntry) -> Result<String>;
}

impl<F> ContentSource for F
where
    F: Fn(&FileEntry) -> Result<String>,
{
    fn read_note(&self, entry: &FileEntry) -> Result<String> {
        self(entry)
    }
}

/// Builds a [`LinkGraph`] from a file universe in one pass over its notes.
pub struct GraphBuilder<'a> {
    extractor: &'a dyn ReferenceExtractor,
    attachments: bool,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder; media files are left out of the graph by default
    pub fn new(extractor: &'a dyn ReferenceExtractor) -> Self {
        Self {
            extractor,
            attachments: false,
        }
    }

    /// Include media files (existing or referenced) as nodes
    pub fn attachments(mut self, attachments: bool) -> Self {
        self.attachments = attachments;
        self
    }

    /// Scan every note and link it to the identities it references.
    ///
    /// Only notes of the universe are read; media, canvas files and
    /// nonexistent targets are never scanned.
    pub fn build(&self, universe: FileUniverse, source: &dyn ContentSource) -> Result<LinkGraph> {
        let index = PathIndex::new(&universe);
        let mut graph: DiGraph<Node, Edge> = DiGraph::new();
        let mut node_index: HashMap<String, NodeIndex> = HashMap::with_capacity(universe.len());
        let mut by_entry: Vec<Option<NodeIndex>> = vec![None; universe.len()];

        for (pos, entry) in universe.entries().iter().enumerate() {
            if entry.kind == NodeKind::Media && !self.attachments {
                continue;
            }
            let idx = graph.add_node(Node {
                identity: entry.identity.clone(),
                kind: entry.kind,
                exists: true,
                entry: Some(pos),
            });
            node_index.insert(normalize_key(&entry.identity), idx);
            by_entry[pos] = Some(idx);
        }

        let mut scans: HashMap<NodeIndex, ExtractedReferences> = HashMap::new();

        for (pos, entry) in universe.entries().iter().enumerate() {
            if entry.kind != NodeKind::Note {
                continue;
            }
            let Some(source_idx) = by_entry[pos] else {
                continue;
            };

            log::debug!("Scanning note {}", entry.relative_path.display());
            let text = source.read_note(entry).inspect_err(|e| {
                log::error!("Aborting graph build at {}: {}", entry.relative_path.display(), e)
            })?;
            let refs = self.extractor.extract(&text);

            let references = refs
                .wikilinks
                .iter()
                .map(|raw| (raw, LinkType::WikiLink))
                .chain(refs.embeds.iter().map(|raw| (raw, LinkType::Embed)));

            for (raw, link_type) in references {
                let target = match index.resolve(raw, &entry.relative_path) {
                    Resolution::Existing(target_pos) => by_entry[target_pos],
                    Resolution::Missing { kind, .. }
                        if kind == NodeKind::Media && !self.attachments =>
                    {
                        None
                    }
                    Resolution::Missing { key, display, kind } => {
                        Some(*node_index.entry(key).or_insert_with(|| {
                            log::debug!(
                                "Unresolved reference {:?} in {}",
                                raw,
                                entry.relative_path.display()
                            );
                            graph.add_node(Node {
                                identity: display,
                                kind,
                                exists: false,
                                entry: None,
                            })
                        }))
                    }
                };

                if let Some(target_idx) = target {
                    graph.add_edge(
                        source_idx,
                        target_idx,
                        Edge {
                            kind: link_type,
                            raw_target: raw.clone(),
                        },
                    );
                }
            }

            scans.insert(source_idx, refs);
        }

        Ok(LinkGraph {
            universe,
            graph,
            node_index,
            scans,
            attachments: self.attachments,
        })
    }
}

/// Directed multigraph of notes, media, canvas files and dangling targets.
///
/// Every reference occurrence is its own edge, so counts reflect how often a
/// target is referenced rather than how many distinct targets there are.
#[derive(Debug, Clone)]
pub struct LinkGraph {
    universe: FileUniverse,
    /// Nodes are added in universe order, then dangling targets in encounter order
    graph: DiGraph<Node, Edge>,
    /// Normalized identity -> node
    node_index: HashMap<String, NodeIndex>,
    /// Extraction results for every scanned note
    scans: HashMap<NodeIndex, ExtractedReferences>,
    attachments: bool,
}

impl LinkGraph {
    /// A graph with no files and no nodes
    pub fn empty(root: impl Into<std::path::PathBuf>, extensions: ExtensionSet, attachments: bool) -> Self {
        Self {
            universe: FileUniverse::new(root, extensions, Vec::new()),
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            scans: HashMap::new(),
            attachments,
        }
    }

    /// The files this graph was built from
    pub fn universe(&self) -> &FileUniverse {
        &self.universe
    }

    /// Whether media files are part of the graph
    pub fn attachments(&self) -> bool {
        self.attachments
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Look up a node by identity (case-insensitive)
    pub fn node(&self, identity: &str) -> Option<&Node> {
        self.node_index
            .get(&normalize_key(identity))
            .map(|&idx| &self.graph[idx])
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn lookup(&self, identity: &str) -> Result<NodeIndex> {
        self.node_index
            .get(&normalize_key(identity))
            .copied()
            .ok_or_else(|| Error::unknown_identity(identity))
    }

    /// Incoming edges in the order they were added
    fn incoming(&self, idx: NodeIndex) -> Vec<EdgeReference<'_, Edge>> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Incoming).collect();
        edges.sort_by_key(|e| e.id());
        edges
    }

    pub(crate) fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Incoming).count()
    }

    pub(crate) fn scan_of(&self, idx: NodeIndex) -> Option<&ExtractedReferences> {
        self.scans.get(&idx)
    }

    pub(crate) fn indexed_nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Number of references to `identity`, grouped by referencing note
    pub fn backlink_counts(&self, identity: &str) -> Result<BTreeMap<String, usize>> {
        let idx = self.lookup(identity)?;
        let mut counts = BTreeMap::new();
        for edge in self.graph.edges_directed(idx, Incoming) {
            *counts
                .entry(self.graph[edge.source()].identity.clone())
                .or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Referencing notes, one entry per reference
    pub fn backlinks(&self, identity: &str) -> Result<Vec<String>> {
        let idx = self.lookup(identity)?;
        Ok(self
            .incoming(idx)
            .into_iter()
            .map(|edge| self.graph[edge.source()].identity.clone())
            .collect())
    }

    /// Backlinks for every note node, existing or not
    pub fn backlinks_index(&self) -> BTreeMap<String, Vec<String>> {
        self.indexed_nodes()
            .filter(|(_, node)| node.kind == NodeKind::Note)
            .map(|(idx, node)| {
                let sources = self
                    .incoming(idx)
                    .into_iter()
                    .map(|edge| self.graph[edge.source()].identity.clone())
                    .collect();
                (node.identity.clone(), sources)
            })
            .collect()
    }

    /// Extraction results of a scanned note
    pub fn references(&self, identity: &str) -> Result<&ExtractedReferences> {
        let idx = self.lookup(identity)?;
        self.scans
            .get(&idx)
            .ok_or_else(|| Error::not_a_note(self.graph[idx].identity.clone()))
    }

    /// Raw wikilink targets of a note, in source order
    pub fn wikilinks(&self, identity: &str) -> Result<&[String]> {
        Ok(&self.references(identity)?.wikilinks)
    }

    /// Raw embed targets of a note, in source order
    pub fn embedded_files(&self, identity: &str) -> Result<&[String]> {
        Ok(&self.references(identity)?.embeds)
    }

    /// Tags of a note: inline tags, then front matter tags
    pub fn tags(&self, identity: &str) -> Result<&[String]> {
        Ok(&self.references(identity)?.tags)
    }

    /// Relative markdown link destinations of a note
    pub fn markdown_links(&self, identity: &str) -> Result<&[String]> {
        Ok(&self.references(identity)?.markdown_links)
    }

    /// Front matter of a note, if it has any
    pub fn front_matter(&self, identity: &str) -> Result<Option<&FrontMatter>> {
        Ok(self.references(identity)?.front_matter.as_ref())
    }

    fn scan_index<F>(&self, select: F) -> BTreeMap<String, Vec<String>>
    where
        F: Fn(&ExtractedReferences) -> &Vec<String>,
    {
        self.indexed_nodes()
            .filter_map(|(idx, node)| {
                self.scans
                    .get(&idx)
                    .map(|refs| (node.identity.clone(), select(refs).clone()))
            })
            .collect()
    }

    /// Wikilink targets of every scanned note
    pub fn wikilinks_index(&self) -> BTreeMap<String, Vec<String>> {
        self.scan_index(|refs| &refs.wikilinks)
    }

    /// Embed targets of every scanned note, possibly empty
    pub fn embedded_files_index(&self) -> BTreeMap<String, Vec<String>> {
        self.scan_index(|refs| &refs.embeds)
    }

    /// Tags of every scanned note
    pub fn tags_index(&self) -> BTreeMap<String, Vec<String>> {
        self.scan_index(|refs| &refs.tags)
    }

    /// Existing notes with no backlinks and no wikilinks of their own.
    ///
    /// Embeds do not count: a note that only embeds files is still isolated.
    pub fn isolated_notes(&self) -> Vec<String> {
        self.indexed_nodes()
            .filter(|(idx, node)| {
                node.kind == NodeKind::Note
                    && node.exists
                    && self.in_degree(*idx) == 0
                    && self
                        .scans
                        .get(idx)
                        .is_none_or(|refs| refs.wikilinks.is_empty())
            })
            .map(|(_, node)| node.identity.clone())
            .collect()
    }

    /// Canvas files nothing references
    pub fn isolated_canvas_files(&self) -> Vec<String> {
        self.indexed_nodes()
            .filter(|(idx, node)| {
                node.kind == NodeKind::Canvas
                    && node.exists
                    && self.in_degree(*idx) == 0
                    && self.graph.edges(*idx).next().is_none()
            })
            .map(|(_, node)| node.identity.clone())
            .collect()
    }

    fn nonexistent(&self, kind: NodeKind) -> Vec<String> {
        self.nodes()
            .filter(|node| node.kind == kind && !node.exists)
            .map(|node| node.identity.clone())
            .collect()
    }

    /// Referenced notes that do not exist, in encounter order
    pub fn nonexistent_notes(&self) -> Vec<String> {
        self.nonexistent(NodeKind::Note)
    }

    /// Referenced media files that do not exist (empty without attachments)
    pub fn nonexistent_media_files(&self) -> Vec<String> {
        self.nonexistent(NodeKind::Media)
    }

    /// Referenced canvas files that do not exist
    pub fn nonexistent_canvas_files(&self) -> Vec<String> {
        self.nonexistent(NodeKind::Canvas)
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_nodes: self.graph.node_count(),
            total_links: self.graph.edge_count(),
            ..Default::default()
        };

        for node in self.nodes() {
            if !node.exists {
                stats.nonexistent += 1;
                continue;
            }
            match node.kind {
                NodeKind::Note => stats.notes += 1,
                NodeKind::Media => stats.media_files += 1,
                NodeKind::Canvas => stats.canvas_files += 1,
            }
        }
        stats.isolated_notes = self.isolated_notes().len();
        stats
    }
}

/// Statistics about the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_links: usize,
    pub notes: usize,
    pub media_files: usize,
    pub canvas_files: usize,
    pub nonexistent: usize,
    pub isolated_notes: usize,
}
