//! # flowtable - Step Graph to Transition Table Compiler
//!
//! **flowtable** turns a hierarchical graph of *steps* joined by typed
//! success/failure connections into a flat state-machine transition table, ready
//! for a downstream rule engine.
//!
//! ## Core Workflow
//!
//! 1.  **Build the graph**: add steps and connections to a [`store::Store`], or
//!     import a diagram through the [`project::IntoDiagram`] trait.
//! 2.  **Classify**: every step becomes a state, a rule or a behavior. An explicit
//!     type always wins; otherwise a fixed chain of name heuristics decides, driven
//!     by a [`classifier::KeywordConfig`].
//! 3.  **Name**: the [`dictionary::Dictionaries`] map each step's qualified name
//!     (`Parent > Child`) to the label written to the table. Missing entries turn into
//!     `[UNKNOWN_STATE: ..]` / `[UNKNOWN_RULE: ..]` sentinels, never errors.
//! 4.  **Compile**: for every outgoing connection of every state, the chain of rule
//!     and behavior steps behind it is collapsed into one row.
//! 5.  **Export**: [`export::to_csv_string`] writes the rows as CSV.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowtable::prelude::*;
//!
//! let mut store = Store::new();
//! let login = store.add_step(NewStep::named("Login").kind(StepKind::State));
//! let check = store.add_step(NewStep::named("is valid?").kind(StepKind::Rule));
//! let dashboard = store.add_step(NewStep::named("Dashboard").kind(StepKind::State));
//! store.add_connection(&login, &check, ConnectionKind::Success);
//! store.add_connection(&check, &dashboard, ConnectionKind::Success);
//!
//! let dictionaries = Dictionaries::new(
//!     [("Login", "LOGIN"), ("Dashboard", "DASH")].into_iter().collect(),
//!     [("is valid?", "IS_VALID")].into_iter().collect(),
//! );
//!
//! let table = Compiler::builder(&store)
//!     .with_dictionaries(dictionaries)
//!     .build()
//!     .compile();
//!
//! assert_eq!(table.rows[0].source_node, "LOGIN");
//! assert_eq!(table.rows[0].destination_node, "DASH");
//! assert_eq!(table.rows[0].rule_list, "IS_VALID");
//!
//! let csv = to_csv_string(&table.rows);
//! assert!(csv.starts_with("Source Node,Destination Node,Rule List,Priority,Operation / Edge Effect"));
//! ```

pub mod classifier;
pub mod compiler;
pub mod diagnostics;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod model;
pub mod prelude;
pub mod project;
pub mod store;
