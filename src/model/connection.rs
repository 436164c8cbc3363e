use super::StepId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Success,
    Failure,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::Success => f.write_str("success"),
            ConnectionKind::Failure => f.write_str("failure"),
        }
    }
}

/// A typed, directed edge between two steps. The `(from, to, kind)` triple is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "fromStepId")]
    pub from: StepId,
    #[serde(rename = "toStepId")]
    pub to: StepId,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn new(from: StepId, to: StepId, kind: ConnectionKind) -> Self {
        Self { from, to, kind }
    }

    /// Whether this edge touches `id` on either end.
    pub fn touches(&self, id: &StepId) -> bool {
        &self.from == id || &self.to == id
    }

    pub(crate) fn matches(&self, from: &StepId, to: &StepId, kind: ConnectionKind) -> bool {
        &self.from == from && &self.to == to && self.kind == kind
    }
}
