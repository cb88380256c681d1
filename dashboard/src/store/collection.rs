//! Ordered, observable collections of records

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::DashError;
use crate::store::observe::{
    FetchState, Listener, Observable, ResourceEvent, SubscriberRegistry, Subscription,
};
use crate::store::record::{Comparator, Record};

/// Shared handle to one record of a collection
///
/// The attached flag is the stale-record sentinel: a handle whose record has
/// been dropped from its owning collection reports `is_attached() == false`,
/// and detail views render their error state for it.
pub struct ModelRef<M> {
    slot: Arc<ModelSlot<M>>,
}

struct ModelSlot<M> {
    data: RwLock<M>,
    attached: AtomicBool,
}

impl<M: Record> ModelRef<M> {
    fn new(data: M) -> Self {
        Self {
            slot: Arc::new(ModelSlot {
                data: RwLock::new(data),
                attached: AtomicBool::new(true),
            }),
        }
    }

    /// Build a handle that is not owned by any collection
    pub fn detached(data: M) -> Self {
        let model = Self::new(data);
        model.set_attached(false);
        model
    }

    /// Identifier of the underlying record
    pub fn id(&self) -> String {
        self.read().id().to_string()
    }

    /// Read access to the underlying record
    pub fn read(&self) -> RwLockReadGuard<'_, M> {
        self.slot.data.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Owned copy of the underlying record
    pub fn snapshot(&self) -> M {
        self.read().clone()
    }

    /// Whether the record still belongs to its owning collection
    pub fn is_attached(&self) -> bool {
        self.slot.attached.load(AtomicOrdering::SeqCst)
    }

    fn set_attached(&self, attached: bool) {
        self.slot.attached.store(attached, AtomicOrdering::SeqCst);
    }

    fn replace(&self, data: M) {
        *self.slot.data.write().unwrap_or_else(|e| e.into_inner()) = data;
    }
}

impl<M> Clone for ModelRef<M> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<M: Record> std::fmt::Debug for ModelRef<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRef")
            .field("id", &self.id())
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Ordered, observable collection of records, unique by identifier
///
/// Membership mutations re-apply the comparator eagerly and notify
/// subscribers after the member lock is released.
pub struct Collection<M: Record> {
    url: String,
    members: RwLock<Vec<ModelRef<M>>>,
    comparator: RwLock<Option<Comparator<M>>>,
    fetch_state: RwLock<FetchState>,
    subscribers: SubscriberRegistry,
}

impl<M: Record> Collection<M> {
    /// Create an empty collection backed by the given REST resource
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            members: RwLock::new(Vec::new()),
            comparator: RwLock::new(None),
            fetch_state: RwLock::new(FetchState::default()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Create a collection with a comparator applied from the start
    pub fn with_comparator(url: impl Into<String>, comparator: Comparator<M>) -> Self {
        let collection = Self::new(url);
        *collection
            .comparator
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(comparator);
        collection
    }

    /// Backing REST resource path
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn len(&self) -> usize {
        self.members_read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member handles in collection order
    pub fn members(&self) -> Vec<ModelRef<M>> {
        self.members_read().iter().cloned().collect()
    }

    /// Member identifiers in collection order
    pub fn ids(&self) -> Vec<String> {
        self.members_read().iter().map(|m| m.id()).collect()
    }

    /// Look up a member by identifier
    pub fn get(&self, id: &str) -> Option<ModelRef<M>> {
        self.members_read()
            .iter()
            .find(|m| m.read().id() == id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Status of the most recent fetch settled through `sync_from`
    pub fn fetch_state(&self) -> FetchState {
        *self.fetch_state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Install a comparator and re-sort immediately
    pub fn set_comparator(&self, comparator: Comparator<M>) {
        *self.comparator.write().unwrap_or_else(|e| e.into_inner()) = Some(comparator);
        self.sort();
    }

    /// Re-apply the comparator to the member order
    pub fn sort(&self) {
        {
            let mut members = self.members_write();
            self.sort_members(&mut members);
        }
        self.subscribers.notify(&ResourceEvent::Change);
    }

    /// Add a record
    ///
    /// An existing identifier replaces the record's data in place; a new
    /// identifier inserts in sorted position.
    pub fn add(&self, record: M) {
        let id = record.id().to_string();
        match self.get(&id) {
            Some(member) => {
                member.replace(record);
                self.subscribers.notify(&ResourceEvent::Change);
            }
            None => {
                {
                    let mut members = self.members_write();
                    members.push(ModelRef::new(record));
                    self.sort_members(&mut members);
                }
                self.subscribers.notify(&ResourceEvent::Add(id));
            }
        }
    }

    /// Remove a record by identifier, detaching the returned handle
    pub fn remove(&self, id: &str) -> Option<ModelRef<M>> {
        let removed = {
            let mut members = self.members_write();
            match members.iter().position(|m| m.read().id() == id) {
                Some(position) => Some(members.remove(position)),
                None => None,
            }
        };
        let member = removed?;
        member.set_attached(false);
        self.subscribers
            .notify(&ResourceEvent::Remove(id.to_string()));
        Some(member)
    }

    /// Replace the entire member set, detaching every previous member
    pub fn reset(&self, records: Vec<M>) {
        let mut incoming: Vec<ModelRef<M>> = Vec::with_capacity(records.len());
        for record in records {
            // later duplicates win, mirroring add's replace semantics
            let existing = incoming.iter().position(|m| m.read().id() == record.id());
            match existing {
                Some(index) => incoming[index].replace(record),
                None => incoming.push(ModelRef::new(record)),
            }
        }

        {
            let mut members = self.members_write();
            for member in members.iter() {
                member.set_attached(false);
            }
            *members = incoming;
            self.sort_members(&mut members);
        }
        self.subscribers.notify(&ResourceEvent::Reset);
    }

    /// Apply a settled fetch
    ///
    /// Success replaces the member set; failure leaves prior members
    /// untouched and surfaces a fetch-error event.
    pub fn sync_from(&self, result: Result<Vec<M>, DashError>) -> Result<(), DashError> {
        match result {
            Ok(records) => {
                self.set_fetch_state(FetchState::Success);
                self.reset(records);
                Ok(())
            }
            Err(e) => {
                self.set_fetch_state(FetchState::Error);
                self.subscribers.notify(&ResourceEvent::FetchError);
                Err(e)
            }
        }
    }

    fn set_fetch_state(&self, state: FetchState) {
        *self.fetch_state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn sort_members(&self, members: &mut Vec<ModelRef<M>>) {
        let comparator = self
            .comparator
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(comparator) = comparator {
            members.sort_by(|a, b| comparator.compare(&a.read(), &b.read()));
        }
    }

    fn members_read(&self) -> RwLockReadGuard<'_, Vec<ModelRef<M>>> {
        self.members.read().unwrap_or_else(|e| e.into_inner())
    }

    fn members_write(&self) -> RwLockWriteGuard<'_, Vec<ModelRef<M>>> {
        self.members.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<M: Record> Observable for Collection<M> {
    fn subscribe(&self, listener: Listener) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
