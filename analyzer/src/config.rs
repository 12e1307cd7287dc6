//! Pipeline descriptions loaded from TOML files.

use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use crate::error::Error;

/// What to run: the queue capacity and the plugin chain.
///
/// Built either from the positional command-line arguments or from a
/// `--config` file.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfiguration {
    /// Maximum number of items in each plugin's queue
    pub queue_size: NonZeroUsize,
    /// The plugins to chain, in order
    pub plugins: Vec<String>,
}

impl PipelineConfiguration {
    /// Reads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
