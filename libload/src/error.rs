use std::error::Error as StdError;
use std::fmt::{self, Display};

use libplugin::PluginError;

/// Failures while resolving a plugin name to a runnable stage.
#[derive(Debug)]
pub enum LoadError {
    /// The name matches no plugin the resolver knows about.
    Unknown(String),
    /// The name is empty or contains a path separator.
    InvalidName(String),
    /// No candidate shared library could be opened; carries the last
    /// loader error, like the final `dlerror` of the resolution chain.
    Open {
        /// The plugin whose candidates all failed.
        name: String,
        /// The error from the last candidate path.
        source: libloading::Error,
    },
    /// The library opened but does not export a required capability.
    SymbolMissing {
        /// The plugin missing the capability.
        name: String,
        /// The symbol that could not be resolved.
        symbol: &'static str,
        /// The loader's resolution error.
        source: libloading::Error,
    },
    /// The stage context could not be constructed around the plugin.
    Plugin(PluginError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unknown(name) => write!(f, "unknown plugin '{name}'"),
            LoadError::InvalidName(name) => write!(f, "invalid plugin name '{name}'"),
            LoadError::Open { source, .. } => write!(f, "dlopen failed: {source}"),
            LoadError::SymbolMissing {
                name,
                symbol,
                source,
            } => write!(f, "dlsym('{symbol}') failed for plugin '{name}': {source}"),
            LoadError::Plugin(e) => write!(f, "{e}"),
        }
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            LoadError::Open { source, .. } => Some(source),
            LoadError::SymbolMissing { source, .. } => Some(source),
            LoadError::Plugin(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PluginError> for LoadError {
    fn from(value: PluginError) -> Self {
        Self::Plugin(value)
    }
}
