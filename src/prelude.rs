//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build a graph, compile it and export the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowtable::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot_path = "path/to/project.json";
//! let mut project = Project::new();
//! project.load_from(&JsonFile::new(snapshot_path))?;
//!
//! let table = project.compile();
//! for diagnostic in &table.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! std::fs::write("transitions.csv", to_csv_string(&table.rows))?;
//! # Ok(())
//! # }
//! ```

// Graph model and store
pub use crate::model::{Connection, ConnectionKind, NewStep, Step, StepId, StepKind, StepPatch};
pub use crate::store::Store;

// Derived state
pub use crate::classifier::{Classifications, Classifier, KeywordConfig};
pub use crate::dictionary::{Dictionaries, Dictionary};

// Compilation and export
pub use crate::compiler::{Compiler, TransitionRow, TransitionTable, generate_rows};
pub use crate::diagnostics::Diagnostic;
pub use crate::export::{CsvWriter, to_csv_string};

// Project and collaborator boundaries
pub use crate::project::{
    BincodeFile, DiagramDefinition, IntoDiagram, JsonFile, Persistence, Project, ProjectSnapshot,
};

// Error types
pub use crate::error::{
    DictionaryError, ImportError, KeywordConfigError, PersistenceError, StoreError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
