//! The pipeline lifecycle: load, init, attach, feed, drain, teardown.
//!
//! Each phase rolls back exactly the work done so far on failure; the
//! caller maps the failed phase to its exit code.

use std::io::BufRead;
use std::num::NonZeroUsize;
use std::sync::Arc;

use libload::{LoadedPlugin, PluginResolver};
use libplugin::{WorkHook, END_OF_STREAM};

use crate::error::Error;
use crate::input;

/// An ordered chain of loaded plugins.
pub struct Pipeline {
    plugins: Vec<LoadedPlugin>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

impl Pipeline {
    /// Resolves every plugin name, in order.
    ///
    /// Duplicate names are rejected before anything is loaded; plugins
    /// resolved before a failure are released again by the early return.
    pub fn load(resolver: &dyn PluginResolver, names: &[String]) -> Result<Self, Error> {
        for (index, first) in names.iter().enumerate() {
            if let Some(second) = names[index + 1..].iter().find(|name| *name == first) {
                return Err(Error::DuplicatePlugin {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }

        let mut plugins = Vec::with_capacity(names.len());
        for name in names {
            plugins.push(resolver.resolve(name)?);
        }
        Ok(Self { plugins })
    }

    /// Initializes every stage in order 0..n.
    ///
    /// On a failure at stage k, stages 0..k are finalized again.
    pub fn init(&self, queue_size: NonZeroUsize) -> Result<(), Error> {
        for (index, plugin) in self.plugins.iter().enumerate() {
            if let Err(source) = plugin.context().init(queue_size) {
                for initialized in &self.plugins[..index] {
                    let _ = initialized.context().fini();
                }
                return Err(Error::Init {
                    plugin: plugin.name().to_owned(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// Wires each stage's downstream hook to its successor's `place_work`.
    ///
    /// On failure every initialized stage is finalized.
    pub fn attach_chain(&self) -> Result<(), Error> {
        for pair in self.plugins.windows(2) {
            let downstream = Arc::clone(pair[1].context());
            let hook: WorkHook = Arc::new(move |item: &str| downstream.place_work(item));
            if let Err(source) = pair[0].context().attach(hook) {
                self.fini_all();
                return Err(Error::Attach {
                    from: pair[0].name().to_owned(),
                    to: pair[1].name().to_owned(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// Feeds items from `reader` into the head stage.
    ///
    /// Stops at an explicit sentinel line or at end of input, which stands
    /// in for the sentinel. A full head queue blocks here; that is the
    /// pipeline's only back-pressure. Rejected items are logged and
    /// feeding continues.
    pub fn feed(&self, mut reader: impl BufRead) {
        let Some(head) = self.plugins.first() else {
            return;
        };
        let head = head.context();

        loop {
            match input::read_item(&mut reader) {
                Ok(Some(line)) => {
                    if line == END_OF_STREAM {
                        self.send_end(head);
                        break;
                    }
                    if let Err(e) = head.place_work(&line) {
                        eprintln!("error: place_work failed: {e}");
                    }
                }
                Ok(None) => {
                    self.send_end(head);
                    break;
                }
                Err(e) => {
                    eprintln!("error: stdin read failed: {e}");
                    self.send_end(head);
                    break;
                }
            }
        }
    }

    fn send_end(&self, head: &Arc<libplugin::PluginContext>) {
        if let Err(e) = head.place_work(END_OF_STREAM) {
            eprintln!("error: place_work(<END>) failed: {e}");
        }
    }

    /// Waits for every stage's consumer to finish, in order.
    pub fn drain(&self) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.context().wait_finished() {
                eprintln!("error: wait_finished('{}'): {e}", plugin.name());
            }
        }
    }

    /// Finalizes every stage and releases the loaded modules.
    pub fn teardown(self) {
        self.fini_all();
    }

    fn fini_all(&self) {
        for plugin in &self.plugins {
            let _ = plugin.context().fini();
        }
    }
}
