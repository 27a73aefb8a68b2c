//! Configuration for the tagger

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::TagError;
use crate::models::{ContainerFormat, Mode};

/// Album Artist value treated as correct for compilations
pub const DEFAULT_ALBUM_ARTIST: &str = "Various Artists";

/// Placeholder printed in scan mode when Album Artist is missing
pub const NOT_SET: &str = "(not set)";

/// Configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Root directory to walk
    pub root: PathBuf,

    /// What to do with each directory
    pub mode: Mode,

    /// File extensions treated as audio (lowercase, without dot)
    pub extensions: HashSet<String>,

    /// Whether to follow symbolic links while walking
    pub follow_links: bool,

    /// Walk entries in file name order so the first file of a directory is stable
    pub sort_entries: bool,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            mode: Mode::Scan,
            extensions: Self::default_extensions(),
            follow_links: false,
            sort_entries: true,
        }
    }
}

impl TaggerConfig {
    /// Create a new config for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Create a config builder
    pub fn builder() -> TaggerConfigBuilder {
        TaggerConfigBuilder::new()
    }

    /// Get the default audio extensions
    pub fn default_extensions() -> HashSet<String> {
        ContainerFormat::ALL
            .iter()
            .map(|f| f.extension().to_string())
            .collect()
    }

    /// Check if an extension should be included
    pub fn should_include_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&ext.to_lowercase())
    }

    /// Check if a path has an included audio extension
    pub fn is_audio_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.should_include_extension(e))
            .unwrap_or(false)
    }

    /// Ensure the root exists and is a directory
    pub fn validate(&self) -> Result<(), TagError> {
        if !self.root.exists() {
            return Err(TagError::not_found(&self.root));
        }
        if !self.root.is_dir() {
            return Err(TagError::not_a_directory(&self.root));
        }
        Ok(())
    }
}

/// Builder for TaggerConfig
#[derive(Debug, Default)]
pub struct TaggerConfigBuilder {
    config: TaggerConfig,
}

impl TaggerConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the extensions whitelist
    pub fn extensions(mut self, extensions: HashSet<String>) -> Self {
        self.config.extensions = extensions;
        self
    }

    /// Enable or disable following symbolic links
    pub fn follow_links(mut self, enabled: bool) -> Self {
        self.config.follow_links = enabled;
        self
    }

    /// Enable or disable sorted traversal
    pub fn sort_entries(mut self, enabled: bool) -> Self {
        self.config.sort_entries = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> TaggerConfig {
        self.config
    }
}
