//! Error types for linkvault.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.
//!
//! Dangling or ambiguous references are *not* errors: they become
//! nonexistent nodes in the graph. Errors are reserved for lookups of
//! identities the graph has never seen and for I/O failures that make a
//! connect unsound.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all linkvault operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error while reading or stat-ing a specific path
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed part way through the vault
    #[error("Failed to traverse {path}: {reason}")]
    Traversal { path: PathBuf, reason: String },

    /// Invalid vault root or file path
    #[error("Invalid file path: {reason}")]
    InvalidPath { reason: String },

    /// Query for an identity that is not a node in the graph
    #[error("Unknown identity: {query:?} is not a node in the vault graph")]
    UnknownIdentity { query: String },

    /// Note-only query issued for an identity that was never scanned
    #[error("Not a scanned note: {identity:?}")]
    NotANote { identity: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error tied to the path that failed
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a traversal error
    pub fn traversal(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Traversal {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create an unknown identity error
    pub fn unknown_identity(query: impl Into<String>) -> Self {
        Error::UnknownIdentity {
            query: query.into(),
        }
    }

    /// Create a not-a-note error
    pub fn not_a_note(identity: impl Into<String>) -> Self {
        Error::NotANote {
            identity: identity.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// The path an I/O or traversal error refers to, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::Io { path, .. } | Error::Traversal { path, .. } => Some(path),
            _ => None,
        }
    }
}
