//! The per-plugin stage machinery: input queue, consumer thread, chain hook.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use libsync::{Monitor, WorkQueue};

use crate::log::log_error;
use crate::{PluginError, Transform, END_OF_STREAM};

/// The capability a plugin exposes to the stage upstream of it: its own
/// [`place_work`](PluginContext::place_work), installed by
/// [`attach`](PluginContext::attach).
pub type WorkHook = Arc<dyn Fn(&str) -> Result<(), PluginError> + Send + Sync>;

/// Chain state shared with the consumer thread, guarded by one lock.
#[derive(Default)]
struct Link {
    next: Option<WorkHook>,
    end_pushed: bool,
    finished: bool,
}

/// Everything the consumer thread needs, reference-counted so the thread
/// outlives any individual lifecycle call.
struct Shared {
    name: String,
    transform: Arc<dyn Transform>,
    queue: WorkQueue<String>,
    link: Mutex<Link>,
    done: Monitor,
}

impl Shared {
    fn lock_link(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One stage of the pipeline.
///
/// A context is created once with its name and transform, then cycles
/// through `init`, any number of `attach` and `place_work` calls,
/// `wait_finished`, and `fini`.
/// `init` builds the bounded input queue and starts the consumer thread;
/// `fini` closes the queue, joins the thread, and returns the context to
/// its created state, from which it may be initialized again.
pub struct PluginContext {
    name: String,
    transform: Arc<dyn Transform>,
    shared: Mutex<Option<Arc<Shared>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PluginContext {
    /// Creates a stage applying `transform`, not yet initialized.
    ///
    /// Fails with [`PluginError::InvalidName`] if `name` is empty.
    pub fn new(
        name: impl Into<String>,
        transform: Arc<dyn Transform>,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PluginError::InvalidName);
        }
        Ok(Self {
            name,
            transform,
            shared: Mutex::new(None),
            worker: Mutex::new(None),
        })
    }

    /// The plugin's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn shared(&self) -> Result<Arc<Shared>, PluginError> {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .cloned()
            .ok_or(PluginError::NotInitialized)
    }

    /// Builds the input queue and starts the consumer thread.
    pub fn init(&self, queue_size: NonZeroUsize) -> Result<(), PluginError> {
        let mut slot = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(PluginError::AlreadyInitialized);
        }

        let shared = Arc::new(Shared {
            name: self.name.clone(),
            transform: Arc::clone(&self.transform),
            queue: WorkQueue::with_capacity(queue_size),
            link: Mutex::new(Link::default()),
            done: Monitor::new(),
        });

        let handle = thread::Builder::new()
            .name(format!("plugin-{}", self.name))
            .spawn({
                let shared = Arc::clone(&shared);
                move || consume(&shared)
            })
            .map_err(PluginError::Spawn)?;

        *slot = Some(shared);
        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Copies `item` into the input queue, blocking while the queue is full.
    ///
    /// Ownership of the copy moves to the queue. Fails with
    /// [`PluginError::QueueClosed`] once the stage has seen the sentinel.
    pub fn place_work(&self, item: &str) -> Result<(), PluginError> {
        let shared = self.shared()?;
        shared
            .queue
            .put(item.to_owned())
            .map_err(|_| PluginError::QueueClosed)
    }

    /// Installs the downstream hook.
    ///
    /// The hook may be installed at most once; a second attach with the
    /// same target is a no-op, and a second attach with a different target
    /// is logged and ignored, keeping the existing wiring. Attaching after
    /// the stage has finished is likewise logged and ignored.
    pub fn attach(&self, next: WorkHook) -> Result<(), PluginError> {
        let shared = self.shared()?;
        let mut link = shared.lock_link();

        if link.finished || shared.queue.is_finished() {
            log_error(&shared.name, "attach after finish is not allowed");
            return Ok(());
        }

        if let Some(existing) = &link.next {
            if !Arc::ptr_eq(existing, &next) {
                log_error(
                    &shared.name,
                    "attach called twice with a different target; keeping existing wiring",
                );
            }
            return Ok(());
        }

        link.next = Some(next);
        Ok(())
    }

    /// Blocks until the consumer thread has left its loop.
    pub fn wait_finished(&self) -> Result<(), PluginError> {
        let shared = self.shared()?;
        shared.done.wait();
        Ok(())
    }

    /// Closes the queue, joins the consumer thread, and releases the
    /// stage's resources. The context may be initialized again afterwards.
    pub fn fini(&self) -> Result<(), PluginError> {
        let shared = {
            let mut slot = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
            slot.take().ok_or(PluginError::NotInitialized)?
        };

        shared.queue.signal_finished();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
        Ok(())
    }
}

impl Drop for PluginContext {
    fn drop(&mut self) {
        // Best-effort teardown so an abandoned context still joins its
        // consumer before the transform it references goes away.
        let _ = self.fini();
    }
}

/// The consumer loop: drain the queue, transform, forward, propagate the
/// sentinel exactly once.
fn consume(shared: &Shared) {
    while let Some(item) = shared.queue.get() {
        if item == END_OF_STREAM {
            let next = {
                let mut link = shared.lock_link();
                if link.end_pushed {
                    None
                } else {
                    link.end_pushed = true;
                    link.next.clone()
                }
            };
            if let Some(next) = next {
                let _ = next(END_OF_STREAM);
            }
            shared.queue.signal_finished();
            break;
        }

        match shared.transform.apply(&item) {
            Ok(output) => {
                // Taken under the lock: attach may race with the first items.
                let next = shared.lock_link().next.clone();
                if let Some(next) = next {
                    if let Err(e) = next(&output) {
                        log_error(&shared.name, e);
                    }
                }
            }
            Err(e) => log_error(&shared.name, e),
        }
    }

    shared.lock_link().finished = true;
    shared.done.signal();
}
