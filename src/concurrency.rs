//! Snapshot cells for lock-free configuration reads
//!
//! Each configuration domain lives behind one `SnapshotCell`. Readers dereference the
//! current value without taking a lock; writers replace the whole value with a single
//! atomic pointer swap. A value stored by one thread is visible to every load that
//! starts after the store returns.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Atomically replaceable, immutable snapshot of a configuration value
pub struct SnapshotCell<T> {
    current: ArcSwap<T>,
}

impl<T> SnapshotCell<T> {
    /// Create a cell holding the initial value
    pub fn new(value: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(value),
        }
    }

    /// Current value
    ///
    /// The returned `Arc` stays valid after later replacements; callers holding it
    /// keep a consistent view until they load again.
    pub fn load(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Replace the current value
    pub fn store(&self, value: T) {
        self.current.store(Arc::new(value));
    }
}

impl<T: fmt::Debug> fmt::Debug for SnapshotCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SnapshotCell").field(&self.load()).finish()
    }
}
