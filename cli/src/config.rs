//! Runtime settings.
//!
//! Each setting has a default and, where numeric, an allowed range. The
//! binary fills these from command-line flags with environment-variable
//! fallbacks; library callers construct them directly.

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_GRAPH_DIR: &str = "graphs";

pub const DEFAULT_MAX_MEMORY_MB: u32 = 4096;
pub const MIN_MAX_MEMORY_MB: u32 = 64;
pub const MAX_MAX_MEMORY_MB: u32 = 131_072; // 128 GB

pub const ENV_GRAPH_DIR: &str = "GRAPH_QUERY_GRAPH_DIR";
pub const ENV_MAX_MEMORY_MB: &str = "GRAPH_QUERY_MAX_MEMORY_MB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the XML graph documents served by the store.
    pub graph_dir: PathBuf,
    /// Per-snapshot memory cap. Loading a larger graph is an error.
    pub max_memory_mb: u32,
}

impl Settings {
    pub fn new(graph_dir: impl Into<PathBuf>, max_memory_mb: u32) -> Result<Self> {
        let settings = Self {
            graph_dir: graph_dir.into(),
            max_memory_mb,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_MAX_MEMORY_MB..=MAX_MAX_MEMORY_MB).contains(&self.max_memory_mb) {
            return Err(Error::Config(format!(
                "max_memory_mb must be between {MIN_MAX_MEMORY_MB} and {MAX_MAX_MEMORY_MB}, got {}",
                self.max_memory_mb
            )));
        }
        if self.graph_dir.as_os_str().is_empty() {
            return Err(Error::Config("graph_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Memory cap in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_mb as usize * 1024 * 1024
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_dir: PathBuf::from(DEFAULT_GRAPH_DIR),
            max_memory_mb: DEFAULT_MAX_MEMORY_MB,
        }
    }
}
