use crate::model::StepId;
use thiserror::Error;

/// Errors reported by store mutations. None of them leave the store modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Step '{0}' does not exist")]
    UnknownStep(StepId),

    #[error("Step '{step_id}' cannot be parented to '{parent_id}', which does not exist")]
    UnknownParent { step_id: StepId, parent_id: StepId },

    #[error("Parenting step '{step_id}' to '{parent_id}' would create an ancestor cycle")]
    ParentCycle { step_id: StepId, parent_id: StepId },

    #[error("Step id '{0}' is used by more than one step")]
    DuplicateStepId(StepId),
}

/// Errors that can occur when importing or exporting a dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to parse dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading a classification keyword configuration.
#[derive(Error, Debug)]
pub enum KeywordConfigError {
    #[error("Failed to parse keyword configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The {list} keyword list contains an empty entry")]
    EmptyKeyword { list: &'static str },
}

/// Errors raised by a persistence backend. A failure never touches the live project.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot encoding failed: {0}")]
    Bincode(String),

    #[error("Snapshot describes an inconsistent graph: {0}")]
    Store(#[from] StoreError),
}

/// Errors that can occur when converting a custom user format into a `DiagramDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("Invalid diagram data: {0}")]
    Validation(String),

    #[error("Diagram describes an inconsistent graph: {0}")]
    Store(#[from] StoreError),
}
