//! Pre-configured profiles for common ways of connecting to a vault
//!
//! - Default: notes and canvas files only, informational logging
//! - Attachments: also index media files as nodes
//! - Minimal: notes only, quiet logging, canvas files ignored

use crate::config::ConnectConfig;
use std::path::PathBuf;

/// Profile selector for pre-configured connects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigProfile {
    /// Notes and canvas files, `INFO` logging
    Default,
    /// Notes, canvas and media files
    Attachments,
    /// Notes only, `WARN` logging
    Minimal,
}

impl ConfigProfile {
    /// Create a ConnectConfig for `root` from this profile
    pub fn create_config(self, root: impl Into<PathBuf>) -> ConnectConfig {
        let mut config = ConnectConfig {
            root: root.into(),
            ..ConnectConfig::default()
        };

        match self {
            Self::Default => {}
            Self::Attachments => {
                config.attachments = true;
            }
            Self::Minimal => {
                config.log_level = "WARN".to_string();
                config.canvas_extensions.clear();
            }
        }

        config
    }

    /// Parse a profile name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "attachments" => Some(Self::Attachments),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let config = ConfigProfile::Attachments.create_config("/vault");
        assert!(config.attachments);

        let config = ConfigProfile::Minimal.create_config("/vault");
        assert!(!config.attachments);
        assert!(config.canvas_extensions.is_empty());
        assert_eq!(config.log_level, "WARN");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ConfigProfile::from_name("Attachments"), Some(ConfigProfile::Attachments));
        assert_eq!(ConfigProfile::from_name("nope"), None);
    }
}
