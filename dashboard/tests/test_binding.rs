//! Binding lifecycle tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use taskdeck::models::deployment::Deployment;
use taskdeck::store::binding::Binding;
use taskdeck::store::collection::Collection;
use taskdeck::store::observe::{Observable, ResourceEvent};

fn deployment(id: &str) -> Deployment {
    Deployment {
        id: id.to_string(),
        affected_apps: Vec::new(),
        current_step: 0,
        total_steps: 0,
        version: String::new(),
    }
}

#[test]
fn test_mount_unmount_leaves_no_subscriptions() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    assert_eq!(collection.subscriber_count(), 0);

    let binding = Binding::bind(&collection, Arc::new(|_| {}));
    assert_eq!(collection.subscriber_count(), 1);

    drop(binding);
    assert_eq!(collection.subscriber_count(), 0);
}

#[test]
fn test_detach_releases_subscription() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    let mut binding = Binding::bind(&collection, Arc::new(|_| {}));
    assert!(binding.is_bound());

    binding.detach();
    assert!(!binding.is_bound());
    assert_eq!(collection.subscriber_count(), 0);
}

#[test]
fn test_rebind_swaps_resource_with_single_subscription() {
    let first: Collection<Deployment> = Collection::new("/v2/deployments");
    let second: Collection<Deployment> = Collection::new("/v2/deployments");

    let mut binding = Binding::bind(&first, Arc::new(|_| {}));
    assert_eq!(first.subscriber_count(), 1);
    assert_eq!(second.subscriber_count(), 0);

    binding.rebind(&second, Arc::new(|_| {}));
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(second.subscriber_count(), 1);
    assert_eq!(first.subscriber_count() + second.subscriber_count(), 1);
    assert!(binding.is_bound());
}

#[test]
fn test_events_trigger_listener() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    let hits = Arc::new(AtomicUsize::new(0));
    let sink = hits.clone();
    let _binding = Binding::bind(
        &collection,
        Arc::new(move |_: &ResourceEvent| {
            sink.fetch_add(1, Ordering::SeqCst);
        }),
    );

    collection.add(deployment("1"));
    collection.reset(vec![deployment("2")]);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_no_events_after_detach() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    let hits = Arc::new(AtomicUsize::new(0));
    let sink = hits.clone();
    let mut binding = Binding::bind(
        &collection,
        Arc::new(move |_: &ResourceEvent| {
            sink.fetch_add(1, Ordering::SeqCst);
        }),
    );

    binding.detach();
    collection.add(deployment("1"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unbound_binding_is_inert() {
    let mut binding = Binding::unbound();
    assert!(!binding.is_bound());
    binding.detach();
    assert!(!binding.is_bound());
}
