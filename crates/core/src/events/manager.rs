//! Event bus - registration and synchronous dispatch

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use super::types::{EventArgs, EventCallback};

new_key_type! {
    /// Key for registered listeners, used for removal
    pub struct ListenerKey;
}

/// Storage for one listener
struct Listener {
    /// `None` for listeners receiving every event
    name: Option<String>,
    callback: EventCallback,
}

#[derive(Default)]
struct Registry {
    listeners: SlotMap<ListenerKey, Listener>,
    /// Subscription order per event name
    by_name: HashMap<String, Vec<ListenerKey>>,
    /// Subscription order of catch-all listeners
    wildcard: Vec<ListenerKey>,
}

/// Named event dispatcher
///
/// Callbacks are collected under the lock and invoked after it is released,
/// so a callback may subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub struct EventBus {
    registry: RwLock<Registry>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event name
    pub fn subscribe<F>(&self, name: &str, callback: F) -> ListenerKey
    where
        F: Fn(&EventArgs) + Send + Sync + 'static,
    {
        let mut registry = self.registry.write();
        let key = registry.listeners.insert(Listener {
            name: Some(name.to_string()),
            callback: Arc::new(callback),
        });
        let keys = registry.by_name.entry(name.to_string()).or_default();
        keys.push(key);

        tracing::trace!(
            "Added handler for event '{}' (total: {})",
            name,
            keys.len()
        );
        key
    }

    /// Register a handler for every event
    pub fn subscribe_all<F>(&self, callback: F) -> ListenerKey
    where
        F: Fn(&EventArgs) + Send + Sync + 'static,
    {
        let mut registry = self.registry.write();
        let key = registry.listeners.insert(Listener {
            name: None,
            callback: Arc::new(callback),
        });
        registry.wildcard.push(key);
        key
    }

    /// Remove a handler
    ///
    /// # Returns
    /// `true` if the handler was found and removed
    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        let mut registry = self.registry.write();
        let Some(listener) = registry.listeners.remove(key) else {
            return false;
        };

        match listener.name {
            Some(name) => {
                if let Some(keys) = registry.by_name.get_mut(&name) {
                    keys.retain(|k| *k != key);
                    if keys.is_empty() {
                        registry.by_name.remove(&name);
                    }
                }
                tracing::trace!("Removed handler for event '{}'", name);
            }
            None => registry.wildcard.retain(|k| *k != key),
        }
        true
    }

    /// Deliver an event to its handlers, then to catch-all handlers
    ///
    /// # Returns
    /// The number of handlers called
    pub fn fire(&self, args: &EventArgs) -> usize {
        let callbacks: Vec<EventCallback> = {
            let registry = self.registry.read();
            registry
                .by_name
                .get(&args.name)
                .into_iter()
                .flatten()
                .chain(registry.wildcard.iter())
                .filter_map(|key| registry.listeners.get(*key))
                .map(|listener| Arc::clone(&listener.callback))
                .collect()
        };

        for callback in &callbacks {
            callback(args);
        }
        callbacks.len()
    }

    /// Deliver a parameterless event by name
    pub fn fire_named(&self, name: &str) -> usize {
        self.fire(&EventArgs::new(name))
    }

    /// Number of registered handlers
    pub fn listener_count(&self) -> usize {
        self.registry.read().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_fire_reaches_named_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        bus.subscribe("CURSOR_UPDATE", move |args| log.lock().push(args.name.clone()));

        assert_eq!(bus.fire_named("CURSOR_UPDATE"), 1);
        assert_eq!(bus.fire_named("VARIABLES_LOADED"), 0);
        assert_eq!(*seen.lock(), vec!["CURSOR_UPDATE".to_string()]);
    }

    #[test]
    fn test_wildcard_after_named() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&order);
        bus.subscribe_all(move |_| log.lock().push("all"));
        let log = Arc::clone(&order);
        bus.subscribe("GOSSIP_SHOW", move |_| log.lock().push("named"));

        assert_eq!(bus.fire_named("GOSSIP_SHOW"), 2);
        assert_eq!(*order.lock(), vec!["named", "all"]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let key = bus.subscribe("VARIABLES_LOADED", |_| {});
        assert_eq!(bus.listener_count(), 1);

        assert!(bus.unsubscribe(key));
        assert!(!bus.unsubscribe(key));
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.fire_named("VARIABLES_LOADED"), 0);
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::new());
        let slot: Arc<Mutex<Option<ListenerKey>>> = Arc::new(Mutex::new(None));

        let inner_bus = Arc::clone(&bus);
        let inner_slot = Arc::clone(&slot);
        let key = bus.subscribe("ONCE", move |_| {
            if let Some(key) = inner_slot.lock().take() {
                inner_bus.unsubscribe(key);
            }
        });
        *slot.lock() = Some(key);

        assert_eq!(bus.fire_named("ONCE"), 1);
        assert_eq!(bus.fire_named("ONCE"), 0);
    }

    #[test]
    fn test_params() {
        let args = EventArgs::with_params("UNIT_HEALTH", vec!["player".to_string()]);
        assert_eq!(args.param(0), "player");
        assert_eq!(args.param(1), "");
    }
}
