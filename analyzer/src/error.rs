use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;

use libload::LoadError;
use libplugin::PluginError;

#[derive(Debug)]
pub enum Error {
    DuplicatePlugin { first: String, second: String },
    Load(LoadError),
    Init { plugin: String, source: PluginError },
    Attach { from: String, to: String, source: PluginError },
    Config(toml::de::Error),
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicatePlugin { first, second } => {
                write!(f, "duplicate plugin name: '{first}' and '{second}'")
            }
            Error::Load(e) => write!(f, "{e}"),
            Error::Init { plugin, source } => {
                write!(f, "plugin '{plugin}' init failed: {source}")
            }
            Error::Attach { from, to, source } => {
                write!(f, "attach failed for '{from}' -> '{to}': {source}")
            }
            Error::Config(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Load(e) => Some(e),
            Error::Init { source, .. } => Some(source),
            Error::Attach { source, .. } => Some(source),
            Error::Config(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::DuplicatePlugin { .. } => None,
        }
    }
}

impl From<LoadError> for Error {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
