use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, immutable identifier of a step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The role a step plays once the graph is compiled into a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A node of the resulting state machine.
    #[default]
    State,
    /// A condition guarding a transition. Contributes to the rule list.
    Rule,
    /// A user action between states. Traversed, but never exported.
    Behavior,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::State => "state",
            StepKind::Rule => "rule",
            StepKind::Behavior => "behavior",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the flow graph.
///
/// `kind` is the explicit type chosen by the user. When it is `None`, the
/// classifier derives the role from the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: Option<StepKind>,
    #[serde(default, rename = "parentId")]
    pub parent: Option<StepId>,

    // Presentation-only fields, carried through but ignored by the compiler.
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// The data needed to create a step. The store allocates the id.
#[derive(Debug, Clone, Default)]
pub struct NewStep {
    pub name: String,
    pub alias: Option<String>,
    pub description: String,
    pub kind: Option<StepKind>,
    pub parent: Option<StepId>,
    pub assumptions: Vec<String>,
    pub questions: Vec<String>,
    pub images: Vec<String>,
}

impl NewStep {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: StepKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn parent(mut self, parent: StepId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub(crate) fn into_step(self, id: StepId) -> Step {
        Step {
            id,
            name: self.name,
            alias: self.alias,
            description: self.description,
            kind: self.kind,
            parent: self.parent,
            assumptions: self.assumptions,
            questions: self.questions,
            images: self.images,
        }
    }
}

/// A partial update of a step. `None` leaves the field untouched.
///
/// The doubly-wrapped fields distinguish "leave as is" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct StepPatch {
    pub name: Option<String>,
    pub alias: Option<Option<String>>,
    pub description: Option<String>,
    pub kind: Option<Option<StepKind>>,
    pub parent: Option<Option<StepId>>,
    pub assumptions: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl StepPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn reparent(parent: Option<StepId>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn retype(kind: Option<StepKind>) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Merges every present field into `step`. Parent validation is the store's job.
    pub(crate) fn apply_to(self, step: &mut Step) {
        if let Some(name) = self.name {
            step.name = name;
        }
        if let Some(alias) = self.alias {
            step.alias = alias;
        }
        if let Some(description) = self.description {
            step.description = description;
        }
        if let Some(kind) = self.kind {
            step.kind = kind;
        }
        if let Some(parent) = self.parent {
            step.parent = parent;
        }
        if let Some(assumptions) = self.assumptions {
            step.assumptions = assumptions;
        }
        if let Some(questions) = self.questions {
            step.questions = questions;
        }
        if let Some(images) = self.images {
            step.images = images;
        }
    }
}
