//! Observable single-record stores

use std::sync::RwLock;

use crate::errors::DashError;
use crate::store::observe::{
    FetchState, Listener, Observable, ResourceEvent, SubscriberRegistry, Subscription,
};
use crate::store::record::Record;

/// Observable store for one REST-backed record fetched individually
pub struct ModelStore<M: Record> {
    url: String,
    data: RwLock<Option<M>>,
    fetch_state: RwLock<FetchState>,
    subscribers: SubscriberRegistry,
}

impl<M: Record> ModelStore<M> {
    /// Create an empty store backed by the given REST resource
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            data: RwLock::new(None),
            fetch_state: RwLock::new(FetchState::default()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Backing REST resource path
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Owned copy of the record, when present
    pub fn get(&self) -> Option<M> {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the record
    pub fn set(&self, record: M) {
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = Some(record);
        self.subscribers.notify(&ResourceEvent::Change);
    }

    /// Drop the record
    pub fn clear(&self) {
        let removed = self.data.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(record) = removed {
            self.subscribers
                .notify(&ResourceEvent::Remove(record.id().to_string()));
        }
    }

    /// Status of the most recent fetch settled through `sync_from`
    pub fn fetch_state(&self) -> FetchState {
        *self.fetch_state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a settled fetch
    pub fn sync_from(&self, result: Result<M, DashError>) -> Result<(), DashError> {
        match result {
            Ok(record) => {
                *self.fetch_state.write().unwrap_or_else(|e| e.into_inner()) =
                    FetchState::Success;
                self.set(record);
                Ok(())
            }
            Err(e) => {
                *self.fetch_state.write().unwrap_or_else(|e| e.into_inner()) = FetchState::Error;
                self.subscribers.notify(&ResourceEvent::FetchError);
                Err(e)
            }
        }
    }
}

impl<M: Record> Observable for ModelStore<M> {
    fn subscribe(&self, listener: Listener) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
