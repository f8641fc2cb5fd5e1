//! Change listener registry
//!
//! Listeners are told *that* something changed, never *what* changed. Each listener
//! re-reads the repository accessors, so two racing updates can never deliver their
//! payloads out of order; at worst a listener observes the same latest state twice.

use parking_lot::RwLock;
use std::sync::Arc;

/// Party interested in configuration changes
pub trait ConfigListener: Send + Sync {
    /// Called after a change has been committed to the snapshot cache
    fn on_change(&self);
}

impl<F> ConfigListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_change(&self) {
        self()
    }
}

/// Set of registered listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn ConfigListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and synchronize it to the current state right away
    pub fn add(&self, listener: Arc<dyn ConfigListener>) {
        self.listeners.write().push(listener.clone());
        listener.on_change();
    }

    /// Notify every registered listener on the calling thread
    pub fn notify(&self) {
        // copy out so listeners may register further listeners without deadlocking
        let listeners: Vec<Arc<dyn ConfigListener>> = self.listeners.read().clone();
        for listener in listeners {
            listener.on_change();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}
