//! # Link Graph Analysis
//!
//! Identity resolution, link graph construction and metadata tables for a
//! vault, using petgraph.
//!
//! Provides:
//! - Case-insensitive, path-aware resolution of raw reference targets
//! - Directed multigraph of notes, media, canvas files and dangling targets
//! - Backlink queries and per-note reference lists
//! - Isolated note / canvas detection
//! - Nonexistent target listing
//! - Note, media and canvas metadata tables
//!
//! ## Quick Start
//!
//! ```
//! use linkvault_graph::prelude::*;
//! use linkvault_parser::OfmExtractor;
//! use std::path::PathBuf;
//!
//! let files = ["A.md", "B.md"]
//!     .iter()
//!     .map(|p| DiscoveredFile {
//!         relative_path: PathBuf::from(p),
//!         absolute_path: PathBuf::from("/vault").join(p),
//!         modified_time: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
//!     })
//!     .collect();
//! let universe = FileUniverse::new("/vault", ExtensionSet::default(), files);
//!
//! let source = |entry: &FileEntry| -> Result<String> {
//!     Ok(if entry.identity == "A" { "[[B]] [[B]] [[Ghost]]".into() } else { String::new() })
//! };
//! let graph = GraphBuilder::new(&OfmExtractor).build(universe, &source)?;
//!
//! assert_eq!(graph.backlink_counts("B")?["A"], 2);
//! assert_eq!(graph.nonexistent_notes(), vec!["Ghost"]);
//! # Ok::<(), linkvault_graph::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Nodes and Edges
//! - **Nodes**: discovered files plus every referenced-but-missing target
//! - **Edges**: one per wikilink or embed occurrence; tags never create edges
//! - **Directed**: links flow from the referencing note to the target
//!
//! ### Missing is data
//!
//! Nonexistent targets are nodes with `exists == false`. They are never
//! scanned, so their scan-derived metadata columns are `None` rather than
//! zero.
//!
//! ## Modules
//!
//! - [`resolver`] - Identity resolution over a precomputed path index
//! - [`graph`] - Graph builder and queries
//! - [`metadata`] - Metadata tables

pub mod graph;
pub mod metadata;
pub mod resolver;

pub use graph::{ContentSource, Edge, GraphBuilder, GraphStats, LinkGraph, Node};
pub use linkvault_core::prelude::*;
pub use metadata::{CanvasMetadata, MediaMetadata, NoteMetadata};
pub use resolver::{PathIndex, Resolution};

pub mod prelude {
    pub use crate::graph::{ContentSource, GraphBuilder, GraphStats, LinkGraph};
    pub use crate::metadata::{CanvasMetadata, MediaMetadata, NoteMetadata};
    pub use crate::resolver::{PathIndex, Resolution};
    pub use linkvault_core::prelude::*;
}
