//! A bounded FIFO with blocking operations and a terminal closed state.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::Monitor;

/// The error returned by [`WorkQueue::put`] on a closed queue.
///
/// Ownership of the rejected item returns to the caller, in the manner of
/// [`std::sync::mpsc::SendError`].
pub struct QueueClosed<T>(
    /// The rejected item, unchanged.
    pub T,
);

impl<T> Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueueClosed(..)")
    }
}

impl<T> Display for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue finished")
    }
}

impl<T> Error for QueueClosed<T> {}

#[derive(Debug)]
struct Ring<T> {
    items: VecDeque<T>,
    finished: bool,
}

/// A bounded multi-producer, single-consumer queue of owned items.
///
/// `put` blocks while the queue is full; `get` blocks while it is empty and
/// not yet finished. [`signal_finished`](WorkQueue::signal_finished) closes
/// the queue: consumers drain the remaining items and then observe closure,
/// while producers, including producers already blocked on a full queue,
/// fail with [`QueueClosed`].
///
/// Once `finished` is set it is never cleared. When a finished queue runs
/// empty it is *drained*, which [`wait_drained`](WorkQueue::wait_drained)
/// rendezvouses on.
#[derive(Debug)]
pub struct WorkQueue<T> {
    ring: Mutex<Ring<T>>,
    capacity: NonZeroUsize,
    not_full: Monitor,
    not_empty: Monitor,
    drained: Monitor,
}

impl<T> WorkQueue<T> {
    /// Creates a queue holding at most `capacity` items.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            ring: Mutex::new(Ring {
                items: VecDeque::with_capacity(capacity.get()),
                finished: false,
            }),
            capacity,
            not_full: Monitor::new(),
            not_empty: Monitor::new(),
            drained: Monitor::new(),
        }
    }

    fn lock_ring(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The maximum number of items the queue may hold.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// The number of items currently held.
    pub fn len(&self) -> usize {
        self.lock_ring().items.len()
    }

    /// Whether the queue currently holds no items.
    pub fn is_empty(&self) -> bool {
        self.lock_ring().items.is_empty()
    }

    /// Whether the queue has been closed.
    pub fn is_finished(&self) -> bool {
        self.lock_ring().finished
    }

    /// Transfers `item` into the queue, blocking while the queue is full.
    ///
    /// Fails with [`QueueClosed`], returning the item, if the queue is
    /// closed at entry or becomes closed while this call is blocked
    /// waiting for space.
    pub fn put(&self, item: T) -> Result<(), QueueClosed<T>> {
        let mut ring = self.lock_ring();
        loop {
            if ring.finished {
                drop(ring);
                return Err(QueueClosed(item));
            }
            if ring.items.len() < self.capacity.get() {
                break;
            }
            drop(ring);
            self.not_full.wait();
            ring = self.lock_ring();
        }

        let was_empty = ring.items.is_empty();
        ring.items.push_back(item);

        if was_empty {
            self.not_empty.signal();
        }
        if ring.items.len() == self.capacity.get() {
            self.not_full.reset();
        }
        Ok(())
    }

    /// Removes the oldest item, blocking while the queue is empty and not
    /// yet finished.
    ///
    /// Returns `None` once the queue is finished and drained; every later
    /// call returns `None` as well.
    pub fn get(&self) -> Option<T> {
        let mut ring = self.lock_ring();
        while ring.items.is_empty() {
            if ring.finished {
                return None;
            }
            drop(ring);
            self.not_empty.wait();
            ring = self.lock_ring();
        }

        let was_full = ring.items.len() == self.capacity.get();
        let item = ring.items.pop_front();

        if was_full {
            self.not_full.signal();
        }
        if ring.items.is_empty() {
            self.not_empty.reset();
            if ring.finished {
                self.drained.signal();
            }
        }
        item
    }

    /// Closes the queue. Idempotent.
    ///
    /// Consumers blocked on an empty queue wake to observe closure;
    /// producers blocked on a full queue wake to fail with [`QueueClosed`].
    pub fn signal_finished(&self) {
        let mut ring = self.lock_ring();
        if !ring.finished {
            ring.finished = true;
            self.not_empty.signal();
            self.not_full.signal();
            if ring.items.is_empty() {
                self.drained.signal();
            }
        }
    }

    /// Blocks until the queue is finished and holds no items.
    pub fn wait_drained(&self) {
        self.drained.wait();
    }
}
