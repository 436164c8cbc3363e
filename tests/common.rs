//! Common test utilities for building step graphs.
use flowtable::prelude::*;

/// The login flow used throughout the tests.
///
/// `Login (state) -> "is valid?" (rule) -> Dashboard (state)`, success edges.
#[allow(dead_code)]
pub struct LoginFlow {
    pub store: Store,
    pub login: StepId,
    pub check: StepId,
    pub dashboard: StepId,
}

#[allow(dead_code)]
pub fn create_login_flow() -> LoginFlow {
    let mut store = Store::new();
    let login = store.add_step(NewStep::named("Login").kind(StepKind::State));
    let check = store.add_step(NewStep::named("is valid?").kind(StepKind::Rule));
    let dashboard = store.add_step(NewStep::named("Dashboard").kind(StepKind::State));
    assert!(store.add_connection(&login, &check, ConnectionKind::Success));
    assert!(store.add_connection(&check, &dashboard, ConnectionKind::Success));
    LoginFlow {
        store,
        login,
        check,
        dashboard,
    }
}

/// `{Login: LOGIN, Dashboard: DASH}` / `{"is valid?": IS_VALID}`.
#[allow(dead_code)]
pub fn create_login_dictionaries() -> Dictionaries {
    Dictionaries::new(
        [("Login", "LOGIN"), ("Dashboard", "DASH")]
            .into_iter()
            .collect(),
        [("is valid?", "IS_VALID")].into_iter().collect(),
    )
}

/// Classifies every step with the default keywords.
#[allow(dead_code)]
pub fn classify(store: &Store) -> Classifications {
    Classifier::default().classify_all(store)
}

/// Adds a step with an explicit kind.
#[allow(dead_code)]
pub fn add(store: &mut Store, name: &str, kind: StepKind) -> StepId {
    store.add_step(NewStep::named(name).kind(kind))
}

/// Adds a success edge.
#[allow(dead_code)]
pub fn connect(store: &mut Store, from: &StepId, to: &StepId) -> bool {
    store.add_connection(from, to, ConnectionKind::Success)
}
