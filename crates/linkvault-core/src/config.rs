//! Configuration for connecting to a vault.
//!
//! Follows a builder pattern for complex configuration with validation.

use crate::error::{Error, Result};
use crate::models::ExtensionSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Configuration for a single connect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Path to the vault directory
    pub root: PathBuf,
    /// Include media/attachment files as graph nodes
    pub attachments: bool,
    /// Note extensions, lowercase without dot
    pub note_extensions: HashSet<String>,
    /// Canvas extensions, lowercase without dot
    pub canvas_extensions: HashSet<String>,
    /// Attachment extensions, lowercase without dot; anything else is not a file of the vault
    pub media_extensions: HashSet<String>,
    /// File or directory names skipped during traversal
    pub excluded_paths: HashSet<String>,
    /// Follow symbolic links while walking the vault
    pub follow_links: bool,
    pub log_level: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        let extensions = ExtensionSet::default();
        Self {
            root: PathBuf::new(),
            attachments: false,
            note_extensions: extensions.notes,
            canvas_extensions: extensions.canvases,
            media_extensions: extensions.media,
            excluded_paths: [".obsidian", ".git", ".trash", ".DS_Store"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            follow_links: false,
            log_level: "INFO".to_string(),
        }
    }
}

impl ConnectConfig {
    /// Create a new connect config with builder
    pub fn builder(root: impl Into<PathBuf>) -> ConnectConfigBuilder {
        ConnectConfigBuilder::new(root)
    }

    /// Extension classification derived from this config
    pub fn extensions(&self) -> ExtensionSet {
        ExtensionSet {
            notes: self.note_extensions.iter().map(|e| normalize_ext(e)).collect(),
            canvases: self
                .canvas_extensions
                .iter()
                .map(|e| normalize_ext(e))
                .collect(),
            media: self.media_extensions.iter().map(|e| normalize_ext(e)).collect(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::config_error("Vault root cannot be empty"));
        }

        if !self.root.exists() {
            return Err(Error::invalid_path(format!(
                "Vault root does not exist: {}",
                self.root.display()
            )));
        }

        if !self.root.is_dir() {
            return Err(Error::invalid_path(format!(
                "Vault root is not a directory: {}",
                self.root.display()
            )));
        }

        if self.note_extensions.is_empty() {
            return Err(Error::config_error("At least one note extension is required"));
        }

        let extensions = self.extensions();
        if let Some(ext) = extensions.notes.intersection(&extensions.canvases).next() {
            return Err(Error::config_error(format!(
                "Extension '{}' cannot be both a note and a canvas extension",
                ext
            )));
        }

        if let Some(ext) = extensions
            .media
            .iter()
            .find(|ext| extensions.notes.contains(*ext) || extensions.canvases.contains(*ext))
        {
            return Err(Error::config_error(format!(
                "Extension '{}' cannot be both a media and a note or canvas extension",
                ext
            )));
        }

        Ok(())
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML text; missing keys take defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Builder for ConnectConfig
pub struct ConnectConfigBuilder {
    config: ConnectConfig,
}

impl ConnectConfigBuilder {
    /// Create a new builder
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: ConnectConfig {
                root: root.into(),
                ..ConnectConfig::default()
            },
        }
    }

    /// Include media files as nodes
    pub fn attachments(mut self, attachments: bool) -> Self {
        self.config.attachments = attachments;
        self
    }

    /// Skip a file or directory name during traversal
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_paths.insert(name.into());
        self
    }

    /// Treat files with this extension as notes
    pub fn note_extension(mut self, ext: &str) -> Self {
        self.config.note_extensions.insert(normalize_ext(ext));
        self
    }

    /// Treat files with this extension as media attachments
    pub fn media_extension(mut self, ext: &str) -> Self {
        self.config.media_extensions.insert(normalize_ext(ext));
        self
    }

    /// Set follow_links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.config.follow_links = follow;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<ConnectConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
