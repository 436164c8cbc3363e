//! Tests for the step/connection store.
mod common;
use common::*;
use flowtable::prelude::*;
use std::time::{Duration, Instant};

#[test]
fn test_add_step_allocates_unique_ids() {
    let mut store = Store::new();
    let a = store.add_step(NewStep::named("A"));
    let b = store.add_step(NewStep::named("B"));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
    assert_eq!(store.step(&a).unwrap().name, "A");
    assert_eq!(store.step(&b).unwrap().kind, None);
}

#[test]
fn test_update_step_merges_fields() {
    let mut store = Store::new();
    let id = store.add_step(NewStep::named("Login").description("entry"));
    store
        .update_step(&id, StepPatch::rename("Sign in"))
        .expect("update should succeed");

    let step = store.step(&id).unwrap();
    assert_eq!(step.name, "Sign in");
    assert_eq!(step.description, "entry");
}

#[test]
fn test_update_unknown_step_is_a_reported_no_op() {
    let mut store = Store::new();
    store.add_step(NewStep::named("A"));
    let missing = StepId::from("nope");

    let result = store.update_step(&missing, StepPatch::rename("B"));
    assert_eq!(result, Err(StoreError::UnknownStep(missing)));
    assert_eq!(store.steps()[0].name, "A");
}

#[test]
fn test_reparenting_into_a_cycle_is_rejected() {
    let mut store = Store::new();
    let root = store.add_step(NewStep::named("Root"));
    let child = store.add_step(NewStep::named("Child").parent(root.clone()));
    let grandchild = store.add_step(NewStep::named("Grandchild").parent(child.clone()));

    let result = store.update_step(&root, StepPatch::reparent(Some(grandchild.clone())));
    assert!(matches!(result, Err(StoreError::ParentCycle { .. })));
    assert_eq!(store.step(&root).unwrap().parent, None);

    let result = store.update_step(&root, StepPatch::reparent(Some(root.clone())));
    assert!(matches!(result, Err(StoreError::ParentCycle { .. })));
}

#[test]
fn test_reparenting_to_missing_step_is_rejected() {
    let mut store = Store::new();
    let a = store.add_step(NewStep::named("A"));
    let result = store.update_step(&a, StepPatch::reparent(Some(StepId::from("ghost"))));
    assert!(matches!(result, Err(StoreError::UnknownParent { .. })));
}

#[test]
fn test_qualified_name_joins_ancestors() {
    let mut store = Store::new();
    let app = store.add_step(NewStep::named("App"));
    let auth = store.add_step(NewStep::named("Auth").parent(app.clone()));
    let login = store.add_step(NewStep::named("Login").parent(auth.clone()));

    assert_eq!(store.qualified_name(&app), "App");
    assert_eq!(store.qualified_name(&login), "App > Auth > Login");
    assert_eq!(store.qualified_name(&StepId::from("ghost")), "");
    assert_eq!(
        store.find_by_qualified_name("App > Auth").map(|s| &s.id),
        Some(&auth)
    );
}

#[test]
fn test_qualified_name_survives_parent_cycle_in_loaded_data() {
    let steps: Vec<Step> = serde_json::from_value(serde_json::json!([
        { "id": "a", "name": "A", "parentId": "b" },
        { "id": "b", "name": "B", "parentId": "a" },
    ]))
    .unwrap();
    let store = Store::from_parts(steps, vec![]).expect("load should repair the cycle");

    // The cycle is broken at the first step, so A becomes a root.
    assert_eq!(store.step(&StepId::from("a")).unwrap().parent, None);
    assert_eq!(store.qualified_name(&StepId::from("b")), "A > B");
}

#[test]
fn test_from_parts_rejects_duplicate_ids() {
    let steps: Vec<Step> = serde_json::from_value(serde_json::json!([
        { "id": "a", "name": "A" },
        { "id": "a", "name": "Again" },
    ]))
    .unwrap();
    let result = Store::from_parts(steps, vec![]);
    assert_eq!(result.unwrap_err(), StoreError::DuplicateStepId(StepId::from("a")));
}

#[test]
fn test_from_parts_drops_bad_connections() {
    let steps: Vec<Step> = serde_json::from_value(serde_json::json!([
        { "id": "a", "name": "A" },
        { "id": "b", "name": "B" },
    ]))
    .unwrap();
    let ab = Connection::new("a".into(), "b".into(), ConnectionKind::Success);
    let dangling = Connection::new("a".into(), "zzz".into(), ConnectionKind::Success);
    let store = Store::from_parts(steps, vec![ab.clone(), ab.clone(), dangling]).unwrap();
    assert_eq!(store.connections(), &[ab]);

    // Fresh ids never collide with loaded ones.
    let mut store = store;
    let c = store.add_step(NewStep::named("C"));
    assert!(c != StepId::from("a") && c != StepId::from("b"));
}

#[test]
fn test_duplicate_connection_is_rejected() {
    let flow = create_login_flow();
    let mut store = flow.store;
    let later = Instant::now() + Duration::from_secs(5);
    assert!(!store.add_connection_at(&flow.login, &flow.check, ConnectionKind::Success, later));
    assert_eq!(store.connections().len(), 2);

    // Same endpoints, different type is a distinct edge.
    assert!(store.add_connection(&flow.login, &flow.check, ConnectionKind::Failure));
    assert_eq!(store.connections().len(), 3);
}

#[test]
fn test_connection_to_missing_step_is_rejected() {
    let mut store = Store::new();
    let a = store.add_step(NewStep::named("A"));
    assert!(!store.add_connection(&a, &StepId::from("ghost"), ConnectionKind::Success));
    assert!(store.connections().is_empty());
}

#[test]
fn test_double_fired_connection_is_coalesced() {
    let mut store = Store::new();
    let login = add(&mut store, "Login", StepKind::State);
    let dashboard = add(&mut store, "Dashboard", StepKind::State);
    let t0 = Instant::now();

    assert!(store.add_connection_at(&login, &dashboard, ConnectionKind::Success, t0));
    // Removed and re-requested by the same double-fired event: still coalesced.
    assert!(store.remove_connection(&login, &dashboard, ConnectionKind::Success));
    assert!(!store.add_connection_at(
        &login,
        &dashboard,
        ConnectionKind::Success,
        t0 + Duration::from_millis(200)
    ));
    assert!(store.connections().is_empty());

    // Outside the window the request goes through.
    assert!(store.add_connection_at(
        &login,
        &dashboard,
        ConnectionKind::Success,
        t0 + Duration::from_millis(800)
    ));
    assert_eq!(store.connections().len(), 1);
}

#[test]
fn test_debounce_is_per_store() {
    let mut first = Store::new();
    let mut second = Store::new();
    let a1 = add(&mut first, "A", StepKind::State);
    let b1 = add(&mut first, "B", StepKind::State);
    let a2 = add(&mut second, "A", StepKind::State);
    let b2 = add(&mut second, "B", StepKind::State);
    assert_eq!(a1, a2);
    assert_eq!(b1, b2);

    let now = Instant::now();
    assert!(first.add_connection_at(&a1, &b1, ConnectionKind::Success, now));
    assert!(second.add_connection_at(&a2, &b2, ConnectionKind::Success, now));
}

#[test]
fn test_remove_step_cascades_connections_and_children() {
    let flow = create_login_flow();
    let mut store = flow.store;
    let nested = store.add_step(NewStep::named("Hint").parent(flow.check.clone()));

    assert!(store.remove_step(&flow.check));
    assert!(store.step(&flow.check).is_none());
    assert!(store.connections().iter().all(|c| !c.touches(&flow.check)));
    assert!(store.connections().is_empty());
    assert_eq!(store.step(&nested).unwrap().parent, None);

    // The arena index stays consistent after removal.
    assert_eq!(store.step(&flow.dashboard).unwrap().name, "Dashboard");
    assert!(!store.remove_step(&flow.check));
}

#[test]
fn test_remove_connection_matches_exact_triple() {
    let flow = create_login_flow();
    let mut store = flow.store;
    assert!(!store.remove_connection(&flow.login, &flow.check, ConnectionKind::Failure));
    assert!(!store.remove_connection(&flow.check, &flow.login, ConnectionKind::Success));
    assert_eq!(store.connections().len(), 2);
    assert!(store.remove_connection(&flow.login, &flow.check, ConnectionKind::Success));
    assert_eq!(store.connections().len(), 1);
}
