//! Collection unit tests

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use taskdeck::errors::DashError;
use taskdeck::models::deployment::{Deployment, DeploymentCollection};
use taskdeck::store::collection::Collection;
use taskdeck::store::observe::{FetchState, Observable, ResourceEvent};
use taskdeck::store::record::Comparator;

fn deployment(id: &str) -> Deployment {
    Deployment {
        id: id.to_string(),
        affected_apps: vec!["/webapp".to_string()],
        current_step: 1,
        total_steps: 2,
        version: "2015-09-30T09:09:17.614Z".to_string(),
    }
}

fn record_events(collection: &Collection<Deployment>) -> Arc<Mutex<Vec<ResourceEvent>>> {
    let events: Arc<Mutex<Vec<ResourceEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let subscription = collection.subscribe(Arc::new(move |event: &ResourceEvent| {
        sink.lock().unwrap().push(event.clone());
    }));
    // keep the subscription alive for the collection's lifetime
    std::mem::forget(subscription);
    events
}

#[test]
fn test_deployments_sort_descending_by_id() {
    let deployments = DeploymentCollection::new();
    deployments
        .collection()
        .reset(vec![deployment("3"), deployment("1"), deployment("2")]);
    assert_eq!(deployments.collection().ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_add_keeps_descending_order() {
    let deployments = DeploymentCollection::new();
    deployments.collection().add(deployment("1"));
    deployments.collection().add(deployment("3"));
    deployments.collection().add(deployment("2"));
    assert_eq!(deployments.collection().ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_add_existing_id_replaces() {
    let deployments = DeploymentCollection::new();
    deployments.collection().add(deployment("1"));

    let mut updated = deployment("1");
    updated.current_step = 2;
    deployments.collection().add(updated);

    assert_eq!(deployments.collection().len(), 1);
    let member = deployments.collection().get("1").unwrap();
    assert_eq!(member.read().current_step, 2);
}

#[test]
fn test_reset_dedupes_by_id() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    let mut updated = deployment("1");
    updated.total_steps = 9;
    collection.reset(vec![deployment("1"), updated]);

    assert_eq!(collection.len(), 1);
    // later duplicate wins
    assert_eq!(collection.get("1").unwrap().read().total_steps, 9);
}

#[test]
fn test_adjacent_pairs_satisfy_comparator() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    collection.reset(vec![
        deployment("5"),
        deployment("2"),
        deployment("9"),
        deployment("1"),
    ]);
    collection.set_comparator(Comparator::custom(|a: &Deployment, b: &Deployment| {
        a.id.cmp(&b.id)
    }));

    let check: Comparator<Deployment> =
        Comparator::custom(|a: &Deployment, b: &Deployment| a.id.cmp(&b.id));
    let members = collection.members();
    for pair in members.windows(2) {
        let ordering = check.compare(&pair[0].read(), &pair[1].read());
        assert_ne!(ordering, Ordering::Greater);
    }
}

#[test]
fn test_set_comparator_resorts_eagerly() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    collection.reset(vec![deployment("1"), deployment("3"), deployment("2")]);
    // no comparator yet: insertion order
    assert_eq!(collection.ids(), vec!["1", "3", "2"]);

    collection.set_comparator(Comparator::by_field("-id"));
    assert_eq!(collection.ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_remove_detaches_member() {
    let deployments = DeploymentCollection::new();
    deployments
        .collection()
        .reset(vec![deployment("1"), deployment("2")]);

    let member = deployments.collection().get("1").unwrap();
    assert!(member.is_attached());

    deployments.collection().remove("1");
    assert!(!member.is_attached());
    assert_eq!(deployments.collection().ids(), vec!["2"]);
}

#[test]
fn test_reset_detaches_previous_members() {
    let deployments = DeploymentCollection::new();
    deployments.collection().reset(vec![deployment("1")]);
    let member = deployments.collection().get("1").unwrap();

    deployments.collection().reset(vec![deployment("2")]);
    assert!(!member.is_attached());
    assert!(deployments.collection().get("2").unwrap().is_attached());
}

#[test]
fn test_failed_fetch_preserves_members_and_flags_error() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    collection.reset(vec![deployment("1")]);
    let events = record_events(&collection);

    let result = collection.sync_from(Err(DashError::FetchError("backend down".to_string())));
    assert!(result.is_err());
    assert_eq!(collection.fetch_state(), FetchState::Error);
    assert_eq!(collection.ids(), vec!["1"]);
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[ResourceEvent::FetchError]
    );
}

#[test]
fn test_successful_sync_resets_and_marks_success() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    assert_eq!(collection.fetch_state(), FetchState::Loading);

    collection
        .sync_from(Ok(vec![deployment("1"), deployment("2")]))
        .unwrap();
    assert_eq!(collection.fetch_state(), FetchState::Success);
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_events_emitted_for_membership_changes() {
    let collection: Collection<Deployment> = Collection::new("/v2/deployments");
    let events = record_events(&collection);

    collection.add(deployment("1"));
    collection.add(deployment("1")); // same id: replace
    collection.remove("1");
    collection.reset(vec![deployment("2")]);

    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[
            ResourceEvent::Add("1".to_string()),
            ResourceEvent::Change,
            ResourceEvent::Remove("1".to_string()),
            ResourceEvent::Reset,
        ]
    );
}
