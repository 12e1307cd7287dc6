use std::sync::Arc;

use libloading::Library;
use libplugin::{builtin, PluginContext};

use crate::{DynamicResolver, LoadError};

/// A resolved stage: the context plus whatever must stay alive for the
/// stage's code to remain callable.
///
/// For dynamically loaded plugins that is the mapped [`Library`]; dropping
/// the `LoadedPlugin` after [`fini`](PluginContext::fini) releases it,
/// which is the unload of the module. Field order keeps the context ahead of the
/// library so the consumer thread is joined before its code is unmapped.
pub struct LoadedPlugin {
    context: Arc<PluginContext>,
    _library: Option<Library>,
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin").finish_non_exhaustive()
    }
}

impl LoadedPlugin {
    /// Wraps a statically linked stage.
    pub fn new(context: Arc<PluginContext>) -> Self {
        Self {
            context,
            _library: None,
        }
    }

    pub(crate) fn with_library(context: Arc<PluginContext>, library: Library) -> Self {
        Self {
            context,
            _library: Some(library),
        }
    }

    /// The stage context.
    pub fn context(&self) -> &Arc<PluginContext> {
        &self.context
    }

    /// The plugin's name.
    pub fn name(&self) -> &str {
        self.context.name()
    }
}

/// Resolves a plugin name to a runnable stage.
///
/// The orchestrator depends only on this trait, so tests may back a
/// pipeline with purpose-built in-process stages.
pub trait PluginResolver {
    /// Resolves `name`, producing a fresh, uninitialized stage.
    fn resolve(&self, name: &str) -> Result<LoadedPlugin, LoadError>;
}

/// Resolves the statically linked reference plugins by name.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl PluginResolver for BuiltinResolver {
    fn resolve(&self, name: &str) -> Result<LoadedPlugin, LoadError> {
        let transform =
            builtin::by_name(name).ok_or_else(|| LoadError::Unknown(name.to_owned()))?;
        let context = PluginContext::new(name, transform)?;
        Ok(LoadedPlugin::new(Arc::new(context)))
    }
}

/// The resolver the `analyzer` binary installs: built-in names first,
/// shared libraries as the fallback.
#[derive(Debug, Default)]
pub struct StandardResolver {
    builtin: BuiltinResolver,
    dynamic: DynamicResolver,
}

impl StandardResolver {
    /// Creates the standard builtin-then-dynamic chain.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PluginResolver for StandardResolver {
    fn resolve(&self, name: &str) -> Result<LoadedPlugin, LoadError> {
        match self.builtin.resolve(name) {
            Err(LoadError::Unknown(_)) => self.dynamic.resolve(name),
            resolved => resolved,
        }
    }
}
