use super::chain::{ChainResolver, ResolvedChain};
use crate::classifier::Classifications;
use crate::dictionary::Dictionaries;
use crate::model::{StepId, StepKind};
use crate::store::Store;
use serde::{Deserialize, Serialize};

/// Priority given to every generated row.
pub const DEFAULT_PRIORITY: i32 = 50;

/// One line of the transition table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRow {
    pub source_node: String,
    pub destination_node: String,
    pub rule_list: String,
    pub priority: i32,
    /// Free-form edge effect. Always empty when generated.
    pub operation: String,
}

impl TransitionRow {
    /// The row a state without outgoing connections produces.
    pub fn terminal(source_node: String, priority: i32) -> Self {
        Self {
            source_node,
            destination_node: String::new(),
            rule_list: String::new(),
            priority,
            operation: String::new(),
        }
    }
}

/// A row together with the step and chain it came from.
#[derive(Debug, Clone)]
pub struct GeneratedRow {
    pub row: TransitionRow,
    pub source: StepId,
    /// `None` for the terminal row of a state without outgoing connections.
    pub chain: Option<ResolvedChain>,
}

/// Produces rows in store order: every state, then each of its outgoing
/// connections in store order.
pub struct RowGenerator<'a> {
    store: &'a Store,
    classifications: &'a Classifications,
    resolver: ChainResolver<'a>,
    default_priority: i32,
}

impl<'a> RowGenerator<'a> {
    pub fn new(
        store: &'a Store,
        classifications: &'a Classifications,
        dictionaries: &'a Dictionaries,
    ) -> Self {
        Self {
            store,
            classifications,
            resolver: ChainResolver::new(store, classifications, dictionaries),
            default_priority: DEFAULT_PRIORITY,
        }
    }

    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn generate(&self) -> Vec<GeneratedRow> {
        let mut rows = Vec::new();
        let states = self
            .store
            .steps()
            .iter()
            .filter(|s| self.classifications.kind_of(&s.id) == StepKind::State);

        for state in states {
            let source_node = self.resolver.state_label(&state.id);
            let mut has_outgoing = false;

            for connection in self.store.outgoing(&state.id) {
                has_outgoing = true;
                let chain = self.resolver.resolve(connection);
                rows.push(GeneratedRow {
                    row: TransitionRow {
                        source_node: source_node.clone(),
                        destination_node: chain.destination.clone(),
                        rule_list: chain.rule_list.clone(),
                        priority: self.default_priority,
                        operation: String::new(),
                    },
                    source: state.id.clone(),
                    chain: Some(chain),
                });
            }

            if !has_outgoing {
                rows.push(GeneratedRow {
                    row: TransitionRow::terminal(source_node, self.default_priority),
                    source: state.id.clone(),
                    chain: None,
                });
            }
        }
        rows
    }
}

/// Generates the transition table rows. Identical inputs give identical output.
pub fn generate_rows(
    store: &Store,
    classifications: &Classifications,
    dictionaries: &Dictionaries,
) -> Vec<TransitionRow> {
    RowGenerator::new(store, classifications, dictionaries)
        .generate()
        .into_iter()
        .map(|g| g.row)
        .collect()
}
