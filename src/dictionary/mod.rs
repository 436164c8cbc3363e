//! Qualified-name to export-label maps.
//!
//! Keys are qualified-name snapshots, not step ids. Renaming or reparenting a
//! step leaves its entry behind; [`Dictionaries::stale_keys`] reports such
//! entries and [`Dictionary::rename_key`] migrates one explicitly.

use crate::classifier::Classifications;
use crate::error::DictionaryError;
use crate::model::StepKind;
use crate::store::Store;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The cell emitted for a state without a dictionary entry.
pub fn unknown_state(qualified_name: &str) -> String {
    format!("[UNKNOWN_STATE: {}]", qualified_name)
}

/// The cell emitted for a rule without a dictionary entry.
pub fn unknown_rule(qualified_name: &str) -> String {
    format!("[UNKNOWN_RULE: {}]", qualified_name)
}

/// A user-curated map from qualified name to canonical label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(AHashMap<String, String>);

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat `{ "qualified name": "LABEL" }` object.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes a flat JSON object with keys in sorted order.
    pub fn to_json(&self) -> Result<String, DictionaryError> {
        let sorted: BTreeMap<&str, &str> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&sorted)?)
    }

    pub fn get(&self, qualified_name: &str) -> Option<&str> {
        self.0.get(qualified_name).map(String::as_str)
    }

    pub fn contains_key(&self, qualified_name: &str) -> bool {
        self.0.contains_key(qualified_name)
    }

    pub fn insert(
        &mut self,
        qualified_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(qualified_name.into(), label.into())
    }

    pub fn remove(&mut self, qualified_name: &str) -> Option<String> {
        self.0.remove(qualified_name)
    }

    /// Moves the label stored under `from` to `to`.
    ///
    /// Returns `false` without changes when `from` is absent or `to` is already taken.
    pub fn rename_key(&mut self, from: &str, to: impl Into<String>) -> bool {
        let to = to.into();
        if from == to {
            return self.contains_key(from);
        }
        if self.contains_key(&to) {
            return false;
        }
        match self.0.remove(from) {
            Some(label) => {
                self.0.insert(to, label);
                true
            }
            None => false,
        }
    }

    /// Entries sorted by qualified name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .sorted_by(|a, b| a.0.cmp(b.0))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The state and rule dictionaries. Behavior steps appear in neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionaries {
    #[serde(rename = "stateDictionary", alias = "state")]
    pub state: Dictionary,
    #[serde(rename = "ruleDictionary", alias = "rule")]
    pub rule: Dictionary,
}

/// Dictionary keys that no longer name any step of the matching role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaleKeys {
    pub state: Vec<String>,
    pub rule: Vec<String>,
}

impl StaleKeys {
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.rule.is_empty()
    }
}

impl Dictionaries {
    pub fn new(state: Dictionary, rule: Dictionary) -> Self {
        Self { state, rule }
    }

    /// Identity mappings for every state and rule step.
    pub fn generate_defaults(store: &Store, classifications: &Classifications) -> Self {
        let mut dictionaries = Self::default();
        dictionaries.merge_defaults(store, classifications);
        dictionaries
    }

    /// Adds identity mappings for steps that have no entry yet. Returns how many were added.
    pub fn merge_defaults(&mut self, store: &Store, classifications: &Classifications) -> usize {
        let mut added = 0;
        for step in store.steps() {
            let target = match classifications.kind_of(&step.id) {
                StepKind::State => &mut self.state,
                StepKind::Rule => &mut self.rule,
                StepKind::Behavior => continue,
            };
            let qualified_name = store.qualified_name(&step.id);
            if !target.contains_key(&qualified_name) {
                target.insert(qualified_name.clone(), qualified_name);
                added += 1;
            }
        }
        added
    }

    /// The state label for `qualified_name`, or the `[UNKNOWN_STATE: ..]` sentinel.
    pub fn lookup_state_name(&self, qualified_name: &str) -> String {
        self.state
            .get(qualified_name)
            .map(str::to_string)
            .unwrap_or_else(|| unknown_state(qualified_name))
    }

    /// The rule label for `qualified_name`, or the `[UNKNOWN_RULE: ..]` sentinel.
    pub fn lookup_rule_name(&self, qualified_name: &str) -> String {
        self.rule
            .get(qualified_name)
            .map(str::to_string)
            .unwrap_or_else(|| unknown_rule(qualified_name))
    }

    pub fn stale_keys(&self, store: &Store, classifications: &Classifications) -> StaleKeys {
        let mut live_states = AHashSet::new();
        let mut live_rules = AHashSet::new();
        for step in store.steps() {
            match classifications.kind_of(&step.id) {
                StepKind::State => live_states.insert(store.qualified_name(&step.id)),
                StepKind::Rule => live_rules.insert(store.qualified_name(&step.id)),
                StepKind::Behavior => false,
            };
        }
        StaleKeys {
            state: stale_in(&self.state, &live_states),
            rule: stale_in(&self.rule, &live_rules),
        }
    }
}

fn stale_in(dictionary: &Dictionary, live: &AHashSet<String>) -> Vec<String> {
    dictionary
        .iter()
        .filter(|(key, _)| !live.contains(*key))
        .map(|(key, _)| key.to_string())
        .collect()
}
