//! # linkvault
//!
//! Index a folder of Markdown notes (an Obsidian-style vault) into a
//! directed link graph with per-note metadata tables.
//!
//! This crate re-exports the public API of the workspace:
//!
//! - [`linkvault_core`]: errors, configuration and the data model
//! - [`linkvault_parser`]: wikilink, embed, tag and front matter extraction
//! - [`linkvault_graph`]: identity resolution, the link graph and metadata tables
//! - [`linkvault_vault`]: traversal and the connected [`Vault`] session
//! - [`linkvault_export`]: JSON and CSV rendering
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let vault = Vault::connect(ConfigProfile::Attachments.create_config("/path/to/vault"))?;
//!
//!     println!("{:?}", vault.backlink_counts("Some note")?);
//!     println!("{}", TableExporter::to_csv(&vault.note_metadata())?);
//!     Ok(())
//! }
//! ```

pub mod views;

pub use linkvault_core;
pub use linkvault_export;
pub use linkvault_graph;
pub use linkvault_parser;
pub use linkvault_vault;

pub use linkvault_core::prelude::*;
pub use linkvault_vault::Vault;
pub use views::{View, render};

pub mod prelude {
    pub use crate::views::{View, render};
    pub use linkvault_core::prelude::*;
    pub use linkvault_export::{ExportFormat, TableExporter};
    pub use linkvault_graph::{CanvasMetadata, GraphStats, MediaMetadata, NoteMetadata};
    pub use linkvault_parser::{OfmExtractor, ReferenceExtractor};
    pub use linkvault_vault::Vault;
}
