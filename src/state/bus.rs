//! Shared state bus.
//!
//! The host owns one shared-state map. Every publish replaces it and pushes
//! the new map to all subscribed plugins.

use crate::core::{InstanceId, Properties, SharedStates};
use crate::plugin::interface::Plugin;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Broadcasts shared-state replacements to plugins.
pub struct SharedStateBus {
    /// Current state
    current: RwLock<SharedStates>,
    /// Consumers in subscription order
    consumers: RwLock<Vec<(InstanceId, Arc<dyn Plugin>)>>,
}

impl SharedStateBus {
    /// Create a bus holding an empty state.
    pub fn new() -> Self {
        Self::with_initial(Properties::new())
    }

    /// Create a bus holding the given state.
    pub fn with_initial(initial: Properties) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            consumers: RwLock::new(Vec::new()),
        }
    }

    /// Current state snapshot.
    pub fn current(&self) -> SharedStates {
        Arc::clone(&*self.current.read())
    }

    /// Subscribe a plugin if it consumes shared state.
    ///
    /// The plugin receives the current state immediately. Returns whether
    /// the plugin was subscribed.
    pub fn subscribe(&self, id: InstanceId, plugin: Arc<dyn Plugin>) -> bool {
        let Some(consumer) = plugin.as_shared_state_consumer() else {
            return false;
        };
        consumer.receive_shared_states(self.current());
        self.consumers.write().push((id, Arc::clone(&plugin)));
        true
    }

    /// Replace the state and push it to every consumer.
    pub fn publish(&self, states: Properties) {
        let states = Arc::new(states);
        *self.current.write() = Arc::clone(&states);

        // Consumers may publish again; no lock is held while they run.
        let consumers = self.consumers.read().clone();
        debug!(
            keys = states.len(),
            consumers = consumers.len(),
            "Publishing shared states"
        );
        for (_, plugin) in consumers {
            // A nested publish already reached every consumer with a newer state.
            if !Arc::ptr_eq(&*self.current.read(), &states) {
                debug!("Shared states replaced during delivery, stopping stale broadcast");
                break;
            }
            if let Some(consumer) = plugin.as_shared_state_consumer() {
                consumer.receive_shared_states(Arc::clone(&states));
            }
        }
    }

    /// Number of subscribed consumers.
    pub fn consumer_count(&self) -> usize {
        self.consumers.read().len()
    }
}

impl Default for SharedStateBus {
    fn default() -> Self {
        Self::new()
    }
}
