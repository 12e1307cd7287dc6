use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;

/// Failures reported by the plugin lifecycle operations.
#[derive(Debug)]
pub enum PluginError {
    /// The operation requires [`init`](crate::PluginContext::init) first.
    NotInitialized,
    /// `init` was called on an already-initialized plugin.
    AlreadyInitialized,
    /// The plugin was given an empty name.
    InvalidName,
    /// The input queue is closed; the item was not accepted.
    QueueClosed,
    /// The consumer thread could not be spawned.
    Spawn(io::Error),
    /// An error message reported by a foreign (dynamically loaded) plugin.
    Foreign(String),
}

impl Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::NotInitialized => write!(f, "plugin not initialized"),
            PluginError::AlreadyInitialized => write!(f, "already initialized"),
            PluginError::InvalidName => write!(f, "name is invalid"),
            PluginError::QueueClosed => write!(f, "queue finished"),
            PluginError::Spawn(e) => write!(f, "consumer thread spawn failed: {e}"),
            PluginError::Foreign(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for PluginError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PluginError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
