//! Tests for rule chain resolution and row generation.
mod common;
use common::*;
use flowtable::compiler::{ChainOutcome, ChainResolver, DEFAULT_PRIORITY};
use flowtable::prelude::*;

fn first_connection(store: &Store, from: &StepId) -> Connection {
    store.outgoing(from).next().cloned().expect("step has an edge")
}

#[test]
fn test_direct_state_to_state_has_empty_rule_list() {
    let mut store = Store::new();
    let a = add(&mut store, "A", StepKind::State);
    let b = add(&mut store, "B", StepKind::State);
    connect(&mut store, &a, &b);

    let rows = generate_rows(
        &store,
        &classify(&store),
        &Dictionaries::generate_defaults(&store, &classify(&store)),
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].source_node, "A");
    assert_eq!(rows[0].destination_node, "B");
    assert_eq!(rows[0].rule_list, "");
    assert_eq!(rows[0].priority, DEFAULT_PRIORITY);
    assert_eq!(rows[0].operation, "");
    // B has no outgoing edge.
    assert_eq!(rows[1], TransitionRow::terminal("B".to_string(), 50));
}

#[test]
fn test_chain_collects_rules_and_skips_behaviors() {
    let mut store = Store::new();
    let start = add(&mut store, "Start", StepKind::State);
    let r1 = add(&mut store, "has account", StepKind::Rule);
    let b1 = add(&mut store, "click next", StepKind::Behavior);
    let r2 = add(&mut store, "is adult", StepKind::Rule);
    let end = add(&mut store, "End", StepKind::State);
    connect(&mut store, &start, &r1);
    connect(&mut store, &r1, &b1);
    connect(&mut store, &b1, &r2);
    connect(&mut store, &r2, &end);

    let classifications = classify(&store);
    let dictionaries = Dictionaries::generate_defaults(&store, &classifications);
    let resolver = ChainResolver::new(&store, &classifications, &dictionaries);
    let chain = resolver.resolve(&first_connection(&store, &start));

    assert_eq!(chain.rule_list, "has account + is adult");
    assert_eq!(chain.destination, "End");
    assert_eq!(chain.destination_step, Some(end));
    assert_eq!(chain.rule_steps, vec![r1, r2]);
    assert_eq!(chain.steps_walked, 3);
    assert_eq!(chain.outcome, ChainOutcome::Reached);
}

#[test]
fn test_dangling_chain_has_empty_destination() {
    let mut store = Store::new();
    let start = add(&mut store, "Start", StepKind::State);
    let rule = add(&mut store, "is ready", StepKind::Rule);
    connect(&mut store, &start, &rule);

    let classifications = classify(&store);
    let dictionaries = Dictionaries::generate_defaults(&store, &classifications);
    let chain = ChainResolver::new(&store, &classifications, &dictionaries)
        .resolve(&first_connection(&store, &start));

    assert_eq!(chain.destination, "");
    assert_eq!(chain.rule_list, "is ready");
    assert_eq!(chain.outcome, ChainOutcome::Dangling { last: rule });
}

#[test]
fn test_cyclic_chain_terminates() {
    let mut store = Store::new();
    let start = add(&mut store, "Start", StepKind::State);
    let r1 = add(&mut store, "is a", StepKind::Rule);
    let r2 = add(&mut store, "is b", StepKind::Rule);
    let r3 = add(&mut store, "is c", StepKind::Rule);
    connect(&mut store, &start, &r1);
    connect(&mut store, &r1, &r2);
    connect(&mut store, &r2, &r3);
    connect(&mut store, &r3, &r1);

    let classifications = classify(&store);
    let dictionaries = Dictionaries::generate_defaults(&store, &classifications);
    let chain = ChainResolver::new(&store, &classifications, &dictionaries)
        .resolve(&first_connection(&store, &start));

    assert_eq!(chain.destination, "");
    assert_eq!(chain.rule_list, "is a + is b + is c");
    assert_eq!(chain.outcome, ChainOutcome::Cycle { repeated: r1 });
    assert!(chain.steps_walked <= store.len());
}

#[test]
fn test_self_loop_rule_terminates() {
    let mut store = Store::new();
    let start = add(&mut store, "Start", StepKind::State);
    let rule = add(&mut store, "is looping", StepKind::Rule);
    connect(&mut store, &start, &rule);
    connect(&mut store, &rule, &rule);

    let table = Compiler::builder(&store).build().compile();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].destination_node, "");
    assert!(table.diagnostics.contains(&Diagnostic::CycleInChain {
        source: start,
        repeated: rule,
    }));
}

#[test]
fn test_branching_rule_follows_first_connection() {
    let mut store = Store::new();
    let start = add(&mut store, "Start", StepKind::State);
    let rule = add(&mut store, "is member", StepKind::Rule);
    let yes = add(&mut store, "Members", StepKind::State);
    let no = add(&mut store, "Signup", StepKind::State);
    connect(&mut store, &start, &rule);
    connect(&mut store, &rule, &yes);
    store.add_connection(&rule, &no, ConnectionKind::Failure);

    let table = Compiler::builder(&store).build().compile();
    assert_eq!(table.rows[0].destination_node, "Members");
    assert!(table.diagnostics.contains(&Diagnostic::BranchingChainStep {
        step: rule,
        out_degree: 2,
    }));
}

#[test]
fn test_rows_follow_store_order() {
    let mut store = Store::new();
    let b = add(&mut store, "B", StepKind::State);
    let a = add(&mut store, "A", StepKind::State);
    let c = add(&mut store, "C", StepKind::State);
    connect(&mut store, &b, &c);
    connect(&mut store, &b, &a);
    connect(&mut store, &a, &b);

    let table = Compiler::builder(&store).build().compile();
    let pairs: Vec<(&str, &str)> = table
        .rows
        .iter()
        .map(|r| (r.source_node.as_str(), r.destination_node.as_str()))
        .collect();
    assert_eq!(pairs, vec![("B", "C"), ("B", "A"), ("A", "B"), ("C", "")]);
}

#[test]
fn test_every_state_appears_at_least_once() {
    let mut store = Store::new();
    let states: Vec<StepId> = (0..5)
        .map(|i| add(&mut store, &format!("S{}", i), StepKind::State))
        .collect();
    let rule = add(&mut store, "is x", StepKind::Rule);
    connect(&mut store, &states[0], &rule);
    connect(&mut store, &rule, &states[1]);
    connect(&mut store, &states[0], &states[2]);
    store.add_connection(&states[0], &states[2], ConnectionKind::Failure);

    let classifications = classify(&store);
    let dictionaries = Dictionaries::generate_defaults(&store, &classifications);
    let rows = generate_rows(&store, &classifications, &dictionaries);

    for state in &states {
        let label = dictionaries.lookup_state_name(&store.qualified_name(state));
        let expected = store.outgoing(state).count().max(1);
        assert_eq!(
            rows.iter().filter(|r| r.source_node == label).count(),
            expected,
            "unexpected row count for {}",
            label
        );
    }
    assert_eq!(rows.len(), 3 + 4);
}

#[test]
fn test_generation_is_idempotent() {
    let flow = create_login_flow();
    let classifications = classify(&flow.store);
    let dictionaries = create_login_dictionaries();

    let first = generate_rows(&flow.store, &classifications, &dictionaries);
    let second = generate_rows(&flow.store, &classifications, &dictionaries);
    assert_eq!(first, second);
    assert_eq!(to_csv_string(&first), to_csv_string(&second));
}

#[test]
fn test_missing_mappings_become_sentinels_and_diagnostics() {
    let flow = create_login_flow();
    let dictionaries = Dictionaries::new(
        [("Login", "LOGIN")].into_iter().collect(),
        Dictionary::new(),
    );
    let table = Compiler::builder(&flow.store)
        .with_dictionaries(dictionaries)
        .build()
        .compile();

    assert_eq!(table.rows[0].source_node, "LOGIN");
    assert_eq!(table.rows[0].rule_list, "[UNKNOWN_RULE: is valid?]");
    assert_eq!(table.rows[0].destination_node, "[UNKNOWN_STATE: Dashboard]");
    assert_eq!(table.rows[1].source_node, "[UNKNOWN_STATE: Dashboard]");
    // Dashboard is reported once, not once per row.
    assert_eq!(
        table.diagnostics,
        vec![
            Diagnostic::UnknownStateMapping {
                qualified_name: "Dashboard".to_string()
            },
            Diagnostic::UnknownRuleMapping {
                qualified_name: "is valid?".to_string()
            },
        ]
    );
}

#[test]
fn test_builder_classifies_unlisted_steps() {
    let mut store = Store::new();
    let start = store.add_step(NewStep::named("Start"));
    let question = store.add_step(NewStep::named("Paid?"));
    let end = store.add_step(NewStep::named("End"));
    connect(&mut store, &start, &question);
    connect(&mut store, &question, &end);

    // Only Start is curated; the rest are classified from their names.
    let mut classifications = Classifications::new();
    classifications.set(start, StepKind::State);
    let compiler = Compiler::builder(&store)
        .with_classifications(classifications)
        .build();
    assert_eq!(compiler.classifications().kind_of(&question), StepKind::Rule);

    let table = compiler.compile();
    assert_eq!(table.rows[0].rule_list, "Paid?");
    assert_eq!(table.rows[0].destination_node, "End");
}

#[test]
fn test_custom_default_priority() {
    let flow = create_login_flow();
    let table = Compiler::builder(&flow.store)
        .with_default_priority(10)
        .build()
        .compile();
    assert!(table.rows.iter().all(|r| r.priority == 10));
}

#[test]
fn test_carry_edits_survive_recompilation() {
    let flow = create_login_flow();
    let mut store = flow.store;
    let mut previous = Compiler::builder(&store).build().compile();
    previous.rows[0].priority = 1;
    previous.rows[0].operation = "set session".to_string();

    let settings = add(&mut store, "Settings", StepKind::State);
    connect(&mut store, &flow.dashboard, &settings);
    let mut next = Compiler::builder(&store).build().compile();
    let carried = next.carry_edits(&previous);

    assert_eq!(next.rows[0].priority, 1);
    assert_eq!(next.rows[0].operation, "set session");
    // Only the login row existed before with the same key.
    assert_eq!(carried, 1);
    assert_eq!(next.rows[1].destination_node, "Settings");
    assert_eq!(next.rows[1].priority, DEFAULT_PRIORITY);
}
