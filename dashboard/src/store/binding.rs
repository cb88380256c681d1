//! View-model binding lifecycle

use crate::store::observe::{Listener, Observable, Subscription};

/// Links a rendering component to exactly one observed resource
///
/// Invariant: at most one live subscription per binding, and none after
/// `detach` or drop, no matter how often the observed resource is swapped.
pub struct Binding {
    subscription: Option<Subscription>,
}

impl Binding {
    /// A binding not yet attached to any resource
    pub fn unbound() -> Self {
        Self { subscription: None }
    }

    /// Subscribe the listener to the resource's events
    pub fn bind(resource: &dyn Observable, listener: Listener) -> Self {
        Self {
            subscription: Some(resource.subscribe(listener)),
        }
    }

    /// Swap the observed resource
    ///
    /// The old subscription is released before the new one is created.
    pub fn rebind(&mut self, resource: &dyn Observable, listener: Listener) {
        self.subscription = None;
        self.subscription = Some(resource.subscribe(listener));
    }

    /// Release the subscription, if any
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Whether the binding currently holds a live subscription
    pub fn is_bound(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_active())
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::unbound()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("bound", &self.subscription.is_some())
            .finish()
    }
}
