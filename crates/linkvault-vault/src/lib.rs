//! # Vault
//!
//! The connected vault session and the file collaborator behind it.
//!
//! Connecting performs, in one synchronous pass:
//! - Traversal of the vault root (`walkdir`), honouring excluded names
//! - Reading and scanning every note
//! - Identity resolution and graph construction
//!
//! Any I/O failure aborts the connect and names the failing path; a
//! partially built vault is never returned.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_vault::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ConnectConfig::builder("/path/to/vault")
//!         .attachments(true)
//!         .build()?;
//!     let vault = Vault::connect(config)?;
//!
//!     for (source, count) in vault.backlink_counts("Some note")? {
//!         println!("{source}: {count}");
//!     }
//!     println!("Isolated: {:?}", vault.isolated_notes());
//!     println!("Missing media: {:?}", vault.nonexistent_media_files());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`scanner`] - Traversal and note reading
//! - [`session`] - The [`Vault`] session object

pub mod scanner;
pub mod session;

pub use linkvault_core::prelude::*;
pub use scanner::{FsContentSource, discover_files};
pub use session::Vault;

pub mod prelude {
    pub use crate::scanner::{FsContentSource, discover_files};
    pub use crate::session::Vault;
    pub use linkvault_core::prelude::*;
    pub use linkvault_graph::{CanvasMetadata, GraphStats, MediaMetadata, NoteMetadata};
}
