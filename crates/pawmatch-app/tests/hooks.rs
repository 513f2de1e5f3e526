// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hook behavior against the in-memory store.

use std::sync::Arc;

use pawmatch_app::{ApplicationHook, ApplicationsHook, FavoritesHook, MessagesHook, PetHook, PetsHook};
use pawmatch_core::query::Table;
use pawmatch_core::types::{ApplicationStatus, PetStatus, Role};
use pawmatch_services::{ApplicationForm, PetFilter, Services};
use pawmatch_store::Gateway;
use pawmatch_test_utils::{pet_row, MemoryStore, OpKind};

const USER: &str = "user@example.com";

fn setup() -> (Services, Arc<MemoryStore>) {
    let store = Arc::new(
        MemoryStore::new()
            .with_rows(
                Table::Pets,
                vec![
                    pet_row("P001", "Luna", "British Shorthair"),
                    pet_row("P002", "Max", "Beagle"),
                    pet_row("P003", "Milo", "Shiba Inu"),
                ],
            )
            .with_unique(Table::Favorites, &["user_id", "pet_id"]),
    );
    (Services::new(Gateway::new(store.clone())), store)
}

fn form(pet_id: &str) -> ApplicationForm {
    ApplicationForm {
        pet_id: pet_id.into(),
        user_name: "Ada Lovelace".into(),
        user_email: USER.into(),
        ..Default::default()
    }
}

async fn wait_for_calls(store: &MemoryStore, table: Table, n: usize) {
    while store.call_count(table).await < n {
        tokio::task::yield_now().await;
    }
}

fn beagles() -> Option<PetFilter> {
    Some(PetFilter {
        breed: Some("beagle".into()),
        ..Default::default()
    })
}

#[tokio::test]
async fn pets_hook_mounts_and_refilters() {
    let (services, _) = setup();
    let hook = PetsHook::new(services.pets.clone(), None);
    assert!(hook.snapshot().data.is_empty());

    hook.mount().await;
    let state = hook.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.data.len(), 3);

    hook.set_filter(beagles()).await;
    let names: Vec<_> = hook.snapshot().data.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Max"]);
}

#[tokio::test]
async fn unchanged_filter_does_not_refetch() {
    let (services, store) = setup();
    let hook = PetsHook::new(services.pets.clone(), beagles());
    hook.mount().await;
    hook.set_filter(beagles()).await;
    assert_eq!(store.call_count(Table::Pets).await, 1);
}

#[tokio::test]
async fn stale_fetch_never_overwrites_newer_result() {
    let (services, store) = setup();
    let hook = Arc::new(PetsHook::new(services.pets.clone(), None));

    let gate = store.hold_next(Table::Pets).await;
    let first = tokio::spawn({
        let hook = hook.clone();
        async move { hook.mount().await }
    });
    wait_for_calls(&store, Table::Pets, 1).await;

    hook.set_filter(beagles()).await;
    assert_eq!(hook.snapshot().data.len(), 1);

    gate.send(()).unwrap();
    first.await.unwrap();

    let state = hook.snapshot();
    assert_eq!(state.data.len(), 1);
    assert_eq!(state.data[0].id, "P002");
    assert!(!state.loading);
}

#[tokio::test]
async fn unmounted_hook_ignores_late_completion() {
    let (services, store) = setup();
    let hook = Arc::new(PetsHook::new(services.pets.clone(), None));

    let gate = store.hold_next(Table::Pets).await;
    let fetch = tokio::spawn({
        let hook = hook.clone();
        async move { hook.mount().await }
    });
    wait_for_calls(&store, Table::Pets, 1).await;

    hook.unmount();
    gate.send(()).unwrap();
    fetch.await.unwrap();

    assert!(hook.snapshot().data.is_empty());
    hook.refetch().await;
    assert_eq!(store.call_count(Table::Pets).await, 1);
}

#[tokio::test]
async fn failed_refetch_keeps_previous_data() {
    let (services, store) = setup();
    let hook = PetsHook::new(services.pets.clone(), None);
    hook.mount().await;

    store.fail_next(Table::Pets, Some(OpKind::Select), "network down").await;
    hook.refetch().await;

    let state = hook.snapshot();
    assert_eq!(state.data.len(), 3);
    assert!(!state.loading);
    let err = state.error.expect("error recorded");
    assert_eq!(err.message, "failed to fetch pet list");

    hook.refetch().await;
    assert!(hook.snapshot().error.is_none());
}

#[tokio::test]
async fn pet_hook_skips_blank_id() {
    let (services, store) = setup();
    let hook = PetHook::new(services.pets.clone(), "  ");
    hook.mount().await;
    assert!(hook.snapshot().data.is_none());
    assert_eq!(store.call_count(Table::Pets).await, 0);

    hook.set_id("P003").await;
    let pet = hook.snapshot().data.expect("pet loaded");
    assert_eq!(pet.name, "Milo");
}

#[tokio::test]
async fn pet_hook_missing_pet_reports_no_rows() {
    let (services, _) = setup();
    let hook = PetHook::new(services.pets.clone(), "P404");
    hook.mount().await;
    let state = hook.snapshot();
    assert!(state.data.is_none());
    assert!(state.error.expect("error").is_no_rows());
}

#[tokio::test]
async fn pet_hook_drops_previous_pet_when_id_changes() {
    let (services, _) = setup();
    let hook = PetHook::new(services.pets.clone(), "P003");
    hook.mount().await;
    assert_eq!(hook.snapshot().data.map(|p| p.name), Some("Milo".into()));

    hook.set_id("P404").await;
    let state = hook.snapshot();
    assert!(state.data.is_none());
    assert!(state.error.expect("error").is_no_rows());

    hook.set_id("").await;
    let state = hook.snapshot();
    assert!(state.data.is_none());
    assert!(state.error.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn late_fetch_for_old_id_is_dropped() {
    let (services, store) = setup();
    let hook = Arc::new(PetHook::new(services.pets.clone(), "P001"));

    let gate = store.hold_next(Table::Pets).await;
    let fetch = tokio::spawn({
        let hook = hook.clone();
        async move { hook.mount().await }
    });
    wait_for_calls(&store, Table::Pets, 1).await;

    hook.set_id("  ").await;
    gate.send(()).unwrap();
    fetch.await.unwrap();

    assert!(hook.snapshot().data.is_none());
}

#[tokio::test]
async fn application_hook_clears_record_on_id_change() {
    let (services, _) = setup();
    let created = services
        .applications
        .create_application(form("P002"))
        .await
        .unwrap();

    let hook = ApplicationHook::new(services.applications.clone(), created.id());
    hook.mount().await;
    assert!(hook.snapshot().data.is_some());

    hook.set_id("missing-application").await;
    let state = hook.snapshot();
    assert!(state.data.is_none());
    assert!(state.error.is_some());
}

#[tokio::test]
async fn applications_hook_prepends_and_replaces() {
    let (services, _) = setup();
    let hook = ApplicationsHook::new(services.applications.clone(), Some(USER.into()));
    hook.mount().await;
    assert!(hook.snapshot().data.is_empty());

    let first = hook.create(form("P001")).await;
    assert!(first.success);
    let second = hook.create(form("P002")).await;
    let second = second.data.expect("created");

    let list = hook.snapshot().data;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id(), second.id());

    let outcome = hook
        .update_status(second.id(), ApplicationStatus::Approved)
        .await;
    assert!(outcome.success);
    let list = hook.snapshot().data;
    assert_eq!(list[0].status(), ApplicationStatus::Approved);
    assert_eq!(list[1].status(), ApplicationStatus::InReview);
}

#[tokio::test]
async fn applications_hook_filters_by_email() {
    let (services, _) = setup();
    services
        .applications
        .create_application(ApplicationForm {
            user_email: "someone@else.org".into(),
            ..form("P003")
        })
        .await
        .unwrap();

    let hook = ApplicationsHook::new(services.applications.clone(), Some(USER.into()));
    hook.mount().await;
    assert!(hook.snapshot().data.is_empty());

    hook.set_user_email(None).await;
    assert_eq!(hook.snapshot().data.len(), 1);
}

#[tokio::test]
async fn failed_create_leaves_list_untouched() {
    let (services, store) = setup();
    let hook = ApplicationsHook::new(services.applications.clone(), Some(USER.into()));
    hook.mount().await;

    store
        .fail_next(Table::Applications, Some(OpKind::Insert), "constraint")
        .await;
    let outcome = hook.create(form("P001")).await;
    assert!(!outcome.success);
    assert!(outcome.data.is_none());
    assert_eq!(
        outcome.error.map(|e| e.message).as_deref(),
        Some("failed to create application")
    );
    assert!(hook.snapshot().data.is_empty());
}

#[tokio::test]
async fn application_hook_updates_its_record() {
    let (services, _) = setup();
    let created = services
        .applications
        .create_application(form("P001"))
        .await
        .unwrap();

    let hook = ApplicationHook::new(services.applications.clone(), created.id());
    hook.mount().await;
    assert_eq!(
        hook.snapshot().data.map(|a| a.status()),
        Some(ApplicationStatus::InReview)
    );

    let outcome = hook.update_status(ApplicationStatus::Completed).await;
    assert!(outcome.success);
    let app = hook.snapshot().data.expect("loaded");
    assert_eq!(app.status(), ApplicationStatus::Completed);
    assert_eq!(app.progress(), 100);

    let pet = services.pets.get_pet_by_id("P001").await.unwrap();
    assert_eq!(pet.status, PetStatus::Approved);
}

#[tokio::test]
async fn toggling_p002_twice_through_hook() {
    let (services, store) = setup();
    let hook = FavoritesHook::new(services.favorites.clone(), USER);
    hook.mount().await;

    let added = hook.toggle("P002").await;
    assert_eq!(added.data, Some(true));
    assert!(hook.is_favorite("P002"));
    let list = hook.snapshot().data;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].pet.as_ref().map(|p| p.name.as_str()), Some("Max"));

    let removed = hook.toggle("P002").await;
    assert_eq!(removed.data, Some(false));
    assert!(!hook.is_favorite("P002"));
    assert!(hook.snapshot().data.is_empty());
    assert!(store.rows(Table::Favorites).await.is_empty());
}

#[tokio::test]
async fn favorites_follow_user_switch() {
    let (services, _) = setup();
    services
        .favorites
        .add_favorite("other@example.com", "P003")
        .await
        .unwrap();

    let hook = FavoritesHook::new(services.favorites.clone(), USER);
    hook.mount().await;
    assert!(hook.snapshot().data.is_empty());

    hook.set_user("other@example.com").await;
    assert!(hook.is_favorite("P003"));
}

#[tokio::test]
async fn messages_hook_appends_and_clears() {
    let (services, _) = setup();
    let hook = MessagesHook::new(services.messages.clone(), USER);
    hook.mount().await;

    assert!(hook.send_user("hello").await.success);
    assert!(hook.send_assistant("hi there").await.success);

    let roles: Vec<_> = hook.snapshot().data.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);

    assert!(hook.clear().await.success);
    assert!(hook.snapshot().data.is_empty());

    hook.refetch().await;
    assert!(hook.snapshot().data.is_empty());
}

#[tokio::test]
async fn subscribers_see_loading_then_data() {
    let (services, store) = setup();
    let hook = Arc::new(PetsHook::new(services.pets.clone(), None));
    let mut rx = hook.subscribe();

    let gate = store.hold_next(Table::Pets).await;
    let fetch = tokio::spawn({
        let hook = hook.clone();
        async move { hook.mount().await }
    });
    wait_for_calls(&store, Table::Pets, 1).await;
    assert!(rx.borrow_and_update().loading);

    gate.send(()).unwrap();
    fetch.await.unwrap();
    rx.changed().await.unwrap();
    let state = rx.borrow().clone();
    assert!(!state.loading);
    assert_eq!(state.data.len(), 3);
}
