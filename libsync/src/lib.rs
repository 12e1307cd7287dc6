//! Blocking synchronization primitives for the pipeline runtime.
//!
//! The [`Monitor`] is a level-triggered signal with an explicit reset,
//! built from a mutex and a condition variable. It is the rendezvous
//! primitive everything else in the workspace is assembled from.
//!
//! The [`WorkQueue`] is a bounded FIFO with blocking `put`/`get` and a
//! terminal *finished* state, composed out of three monitors
//! (`not_full`, `not_empty`, `drained`). One queue feeds each pipeline
//! stage; the stage's worker drains it until the queue reports closure.

#![warn(missing_docs)]

mod monitor;
mod queue;

pub use monitor::Monitor;
pub use queue::{QueueClosed, WorkQueue};
