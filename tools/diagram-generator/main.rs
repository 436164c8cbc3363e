use clap::Parser;
use flowtable::prelude::*;
use rand::rngs::ThreadRng;
use rand::{Rng, rng};
use std::fs;

const STATE_NAMES: &[&str] = &["Login", "Dashboard", "Profile", "Checkout", "Settings", "Inbox"];
const RULE_NAMES: &[&str] = &["is valid?", "has account", "can edit", "check quota", "verify email"];
const BEHAVIOR_NAMES: &[&str] = &["click save", "enter password", "submit form", "upload avatar"];

/// A CLI tool to generate random step diagrams for the flowtable compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_diagram.json")]
    output: String,

    /// Number of state steps to generate
    #[arg(long, default_value_t = 10)]
    states: usize,

    /// The minimum length of a rule chain between two states
    #[arg(long, default_value_t = 0)]
    min_chain: usize,

    /// The maximum length of a rule chain between two states
    #[arg(long, default_value_t = 3)]
    max_chain: usize,

    /// The maximum number of outgoing connections per state
    #[arg(long, default_value_t = 3)]
    max_fanout: usize,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if cli.min_chain > cli.max_chain {
        eprintln!(
            "Error: --min-chain ({}) cannot be greater than --max-chain ({})",
            cli.min_chain, cli.max_chain
        );
        std::process::exit(1);
    }
    if cli.states == 0 {
        eprintln!("Error: --states must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating diagram ({} states, chains of {} to {} steps)...",
        cli.states, cli.min_chain, cli.max_chain
    );

    let mut store = Store::new();
    let states = generate_states(&mut store, &mut rng, cli.states);
    generate_transitions(&mut store, &mut rng, &states, &cli);

    let diagram = serde_json::json!({
        "steps": store.steps(),
        "connections": store.connections(),
    });
    fs::write(&cli.output, serde_json::to_string_pretty(&diagram)?)?;

    println!(
        "Successfully generated {} steps and {} connections into '{}'",
        store.len(),
        store.connections().len(),
        cli.output
    );
    Ok(())
}

/// Creates the states, nesting roughly a third of them under an earlier one.
fn generate_states(store: &mut Store, rng: &mut ThreadRng, count: usize) -> Vec<StepId> {
    let mut states: Vec<StepId> = Vec::with_capacity(count);
    for i in 0..count {
        let base = STATE_NAMES[rng.random_range(0..STATE_NAMES.len())];
        let mut step = NewStep::named(format!("{} {}", base, i)).kind(StepKind::State);
        if !states.is_empty() && rng.random_bool(0.3) {
            step = step.parent(states[rng.random_range(0..states.len())].clone());
        }
        states.push(store.add_step(step));
    }
    println!("-> Generated {} states.", states.len());
    states
}

/// Connects states through random rule/behavior chains.
fn generate_transitions(store: &mut Store, rng: &mut ThreadRng, states: &[StepId], cli: &Cli) {
    let mut chain_steps = 0;
    for source in states {
        let fanout = rng.random_range(0..=cli.max_fanout);
        for _ in 0..fanout {
            let target = &states[rng.random_range(0..states.len())];
            let kind = if rng.random_bool(0.8) {
                ConnectionKind::Success
            } else {
                ConnectionKind::Failure
            };

            let mut previous = source.clone();
            for _ in 0..rng.random_range(cli.min_chain..=cli.max_chain) {
                let (names, step_kind) = if rng.random_bool(0.7) {
                    (RULE_NAMES, StepKind::Rule)
                } else {
                    (BEHAVIOR_NAMES, StepKind::Behavior)
                };
                let name = format!(
                    "{} {}",
                    names[rng.random_range(0..names.len())],
                    chain_steps
                );
                let step = store.add_step(NewStep::named(name).kind(step_kind));
                store.add_connection(&previous, &step, kind);
                previous = step;
                chain_steps += 1;
            }
            store.add_connection(&previous, target, kind);
        }
    }
    println!("-> Generated {} chain steps.", chain_steps);
}
