//! # Linkvault Core
//!
//! Core data models, error types, and configuration for the vault link indexer.
//! This crate defines the canonical types that all other crates depend on.
//!
//! ## Architecture Principles
//!
//! - **Type-Driven Design**: Strong types replace string-based APIs
//! - **Zero Panic in Libraries**: All errors are Result<T, Error>
//! - **Builder Pattern for Complex Types**: Configuration structs use builders
//! - **Immutable by Default**: A [`FileUniverse`] never changes after it is built
//!
//! ## Core Modules
//!
//! - [`models`] - File universe, node kinds, extracted references
//! - [`error`] - Error types and Result alias
//! - [`config`] - Connect configuration
//! - [`profiles`] - Configuration presets
//! - [`utils`] - Identity normalization, JSON and CSV helpers
//!
//! ## Usage Examples
//!
//! ### Identity keys
//!
//! ```
//! use linkvault_core::normalize_key;
//!
//! assert_eq!(normalize_key("Lipsum/Ne Fuit"), normalize_key("lipsum/ne fuit"));
//! ```
//!
//! ### Error Handling
//!
//! ```
//! use linkvault_core::prelude::*;
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(Error::unknown_identity(name))
//! }
//! assert!(lookup("Ghost").is_err());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod profiles;
pub mod utils;

pub use config::{ConnectConfig, ConnectConfigBuilder};
pub use error::{Error, Result};
pub use models::*;
pub use profiles::ConfigProfile;
pub use utils::{CSVBuilder, normalize_key, relative_path_string, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ConnectConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        DiscoveredFile, ExtensionSet, ExtractedReferences, FileEntry, FileUniverse, FrontMatter,
        LinkType, NodeKind,
    };
    pub use crate::profiles::ConfigProfile;
}
