//! Live query subsystem: per-table observer registries.
//!
//! # Responsibility
//! - Hand out independent snapshot streams for a table's contents.
//! - Re-emit a fresh snapshot to every observer after each committed write.
//!
//! # Invariants
//! - Subscribing delivers the current snapshot before any later emission.
//! - Observers never interfere; each owns its own channel.
//! - A cancelled observer receives nothing further and is pruned from the
//!   registry on the next publish.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Observer registry for one table.
///
/// Publishing never blocks on a slow observer: channels are unbounded and
/// disconnected receivers are dropped from the registry.
pub struct TableWatch<T> {
    observers: Mutex<Vec<Sender<Vec<T>>>>,
}

impl<T: Clone> TableWatch<T> {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new observer and delivers `snapshot` as its first
    /// emission.
    pub fn subscribe(&self, snapshot: Vec<T>) -> LiveQuery<T> {
        let (tx, rx) = channel();
        // The receiver is alive in this scope, so the initial send cannot
        // fail.
        let _ = tx.send(snapshot);
        self.lock_observers().push(tx);
        LiveQuery { rx }
    }

    /// Emits `snapshot` to every live observer, pruning cancelled ones.
    pub fn publish(&self, snapshot: &[T]) {
        self.lock_observers()
            .retain(|observer| observer.send(snapshot.to_vec()).is_ok());
    }

    /// Number of registered observers, counting those cancelled since the
    /// last publish.
    pub fn observer_count(&self) -> usize {
        self.lock_observers().len()
    }

    fn lock_observers(&self) -> std::sync::MutexGuard<'_, Vec<Sender<Vec<T>>>> {
        // A poisoned registry only means a publisher panicked mid-send; the
        // sender list itself is still consistent.
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for TableWatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One observer's snapshot stream. Infinite while subscribed; dropping the
/// handle cancels the subscription.
pub struct LiveQuery<T> {
    rx: Receiver<Vec<T>>,
}

impl<T> LiveQuery<T> {
    /// Blocks until the next snapshot. Returns `None` only when the
    /// publishing store has been torn down.
    pub fn recv(&self) -> Option<Vec<T>> {
        self.rx.recv().ok()
    }

    /// Waits up to `timeout` for the next snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Returns an already-delivered snapshot without blocking.
    pub fn try_recv(&self) -> Option<Vec<T>> {
        match self.rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Cancels the subscription. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl<T> Iterator for LiveQuery<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
