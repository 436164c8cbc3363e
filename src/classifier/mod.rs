use crate::diagnostics::Diagnostic;
use crate::model::{Step, StepId, StepKind};
use crate::store::Store;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

mod keywords;

pub use keywords::KeywordConfig;

/// A test on a step's name. Names are compared trimmed and, for keyword
/// tests, case-insensitively.
///
/// Keyword tests are not plain prefix tests: the keyword must be followed by
/// the end of the name or a non-alphanumeric character, so with the default
/// keywords "is valid" is a rule while "Island" and "Checkout" are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePredicate {
    EndsWithQuestionMark,
    StartsWithRuleKeyword,
    StartsWithAsk,
    AllCaps,
    StartsWithBehaviorKeyword,
}

impl NamePredicate {
    pub fn matches(&self, name: &str, keywords: &KeywordConfig) -> bool {
        let name = name.trim();
        match self {
            NamePredicate::EndsWithQuestionMark => name.ends_with('?'),
            NamePredicate::StartsWithRuleKeyword => {
                starts_with_any(name, keywords.rule_keywords())
            }
            NamePredicate::StartsWithAsk => starts_with_word(&name.to_lowercase(), "ask"),
            NamePredicate::AllCaps => {
                name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_lowercase)
            }
            NamePredicate::StartsWithBehaviorKeyword => {
                starts_with_any(name, keywords.behavior_keywords())
            }
        }
    }
}

/// The heuristic chain, evaluated top to bottom. The first match decides.
pub const CLASSIFICATION_ORDER: [(NamePredicate, StepKind); 5] = [
    (NamePredicate::EndsWithQuestionMark, StepKind::Rule),
    (NamePredicate::StartsWithRuleKeyword, StepKind::Rule),
    (NamePredicate::StartsWithAsk, StepKind::State),
    (NamePredicate::AllCaps, StepKind::State),
    (NamePredicate::StartsWithBehaviorKeyword, StepKind::Behavior),
];

/// Assigns each step a role.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: KeywordConfig,
}

impl Classifier {
    pub fn new(keywords: KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    /// The explicit type if set, otherwise the first matching heuristic, otherwise state.
    pub fn classify(&self, step: &Step) -> StepKind {
        step.kind.unwrap_or_else(|| self.classify_name(&step.name))
    }

    pub fn classify_name(&self, name: &str) -> StepKind {
        CLASSIFICATION_ORDER
            .iter()
            .find(|(predicate, _)| predicate.matches(name, &self.keywords))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }

    /// Seeds a classification for every step in the store.
    pub fn classify_all(&self, store: &Store) -> Classifications {
        Classifications(
            store
                .steps()
                .iter()
                .map(|s| (s.id.clone(), self.classify(s)))
                .collect(),
        )
    }

    /// Reports rule and behavior steps that branch. The chain walk only follows
    /// the first outgoing connection of such steps.
    pub fn validate(store: &Store, classifications: &Classifications) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for step in store.steps() {
            if classifications.kind_of(&step.id) == StepKind::State {
                continue;
            }
            let out_degree = store.outgoing(&step.id).count();
            if out_degree > 1 {
                warn!(step = %step.id, out_degree, "non-state step branches");
                diagnostics.push(Diagnostic::BranchingChainStep {
                    step: step.id.clone(),
                    out_degree,
                });
            }
        }
        diagnostics
    }
}

/// The role of every step, seeded by the classifier and editable afterwards.
///
/// Steps without an entry are treated as states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classifications(AHashMap<StepId, StepKind>);

impl Classifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind_of(&self, id: &StepId) -> StepKind {
        self.get(id).unwrap_or_default()
    }

    pub fn get(&self, id: &StepId) -> Option<StepKind> {
        self.0.get(id).copied()
    }

    /// Overrides the role of a step. A step with an explicit type gets that
    /// type back on the next [`Classifications::fill_missing`].
    pub fn set(&mut self, id: StepId, kind: StepKind) -> Option<StepKind> {
        self.0.insert(id, kind)
    }

    pub fn remove(&mut self, id: &StepId) -> Option<StepKind> {
        self.0.remove(id)
    }

    /// Classifies steps that have no entry yet and reapplies explicit types.
    /// Entries of steps without an explicit type are left alone.
    pub fn fill_missing(&mut self, store: &Store, classifier: &Classifier) {
        for step in store.steps() {
            match step.kind {
                Some(kind) => {
                    self.0.insert(step.id.clone(), kind);
                }
                None => {
                    self.0
                        .entry(step.id.clone())
                        .or_insert_with(|| classifier.classify(step));
                }
            }
        }
    }

    /// Drops entries for steps that are no longer in the store.
    pub fn retain_existing(&mut self, store: &Store) {
        self.0.retain(|id, _| store.contains(id));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn starts_with_any(name: &str, keywords: &[String]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| starts_with_word(&lower, k))
}

/// `keyword` is a prefix of `name` and is followed by the end of the name or a
/// non-alphanumeric character.
fn starts_with_word(name: &str, keyword: &str) -> bool {
    name.strip_prefix(keyword)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
}
