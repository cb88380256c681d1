//! Observer registration and subscription lifecycle
//!
//! Resources notify subscribers through a registry of listeners.
//! Subscriptions are RAII handles: dropping one always deregisters its
//! listener, so a torn-down view cannot leak callbacks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use serde::Serialize;
use uuid::Uuid;

/// Status of the most recent fetch attempt on a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchState {
    /// No fetch has settled yet
    #[default]
    Loading,
    Success,
    Error,
}

/// Change notification emitted by an observable resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// A record's data changed in place, or the order changed
    Change,
    /// A record joined, by identifier
    Add(String),
    /// A record left, by identifier
    Remove(String),
    /// The full member set was replaced
    Reset,
    /// A fetch settled unsuccessfully; prior data is untouched
    FetchError,
}

/// Listener invoked for every event on the observed resource
pub type Listener = Arc<dyn Fn(&ResourceEvent) + Send + Sync>;

type ListenerMap = HashMap<Uuid, Listener>;

/// Registry of listeners for one observable resource
pub struct SubscriberRegistry {
    listeners: Arc<Mutex<ListenerMap>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a listener; the returned handle deregisters on drop
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let id = Uuid::new_v4();
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, listener);
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Notify every listener
    ///
    /// Listeners run outside the registry lock, so a listener may subscribe
    /// or unsubscribe re-entrantly.
    pub fn notify(&self, event: &ResourceEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle to a registered listener
pub struct Subscription {
    id: Uuid,
    listeners: Weak<Mutex<ListenerMap>>,
}

impl Subscription {
    /// Deregister explicitly; equivalent to dropping the handle
    pub fn dispose(self) {}

    /// Whether the listener is still registered on a live resource
    pub fn is_active(&self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains_key(&self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// An observable resource: a model store or a collection
pub trait Observable {
    /// Subscribe to change/add/remove/reset/fetch-error events
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// Number of live subscriptions, for lifecycle verification
    fn subscriber_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_drop_deregisters() {
        let registry = SubscriberRegistry::new();
        let sub = registry.subscribe(Arc::new(|_| {}));
        assert_eq!(registry.len(), 1);
        assert!(sub.is_active());
        drop(sub);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_notify_reaches_all_listeners() {
        let registry = SubscriberRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let first = hits.clone();
        let second = hits.clone();
        let _a = registry.subscribe(Arc::new(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        let _b = registry.subscribe(Arc::new(move |_| {
            second.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(&ResourceEvent::Reset);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispose_after_registry_dropped() {
        let registry = SubscriberRegistry::new();
        let sub = registry.subscribe(Arc::new(|_| {}));
        drop(registry);
        assert!(!sub.is_active());
        sub.dispose();
    }
}
