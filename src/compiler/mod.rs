use crate::classifier::{Classifications, Classifier, KeywordConfig};
use crate::diagnostics::Diagnostic;
use crate::dictionary::Dictionaries;
use crate::model::StepId;
use crate::store::Store;
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::VecDeque;
use tracing::{debug, warn};

pub mod chain;
pub mod rows;

pub use chain::{ChainOutcome, ChainResolver, ResolvedChain};
pub use rows::{DEFAULT_PRIORITY, GeneratedRow, RowGenerator, TransitionRow, generate_rows};

/// The output of a compilation: the rows plus everything worth warning about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    pub rows: Vec<TransitionRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransitionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies `priority` and `operation` from rows of `previous` that have the
    /// same source, destination and rule list.
    ///
    /// Rows sharing a key are matched in order. Returns how many rows were carried.
    pub fn carry_edits(&mut self, previous: &TransitionTable) -> usize {
        let mut edits: AHashMap<RowKey, VecDeque<(i32, &str)>> = AHashMap::new();
        for row in &previous.rows {
            edits
                .entry(RowKey::of(row))
                .or_default()
                .push_back((row.priority, row.operation.as_str()));
        }

        let mut carried = 0;
        for row in self.rows.iter_mut() {
            let Some((priority, operation)) = edits
                .get_mut(&RowKey::of(row))
                .and_then(VecDeque::pop_front)
            else {
                continue;
            };
            row.priority = priority;
            row.operation = operation.to_string();
            carried += 1;
        }
        carried
    }
}

/// Identifies a row across recompilations.
#[derive(PartialEq, Eq, Hash)]
struct RowKey {
    source: String,
    destination: String,
    rule_list: String,
}

impl RowKey {
    fn of(row: &TransitionRow) -> Self {
        Self {
            source: row.source_node.clone(),
            destination: row.destination_node.clone(),
            rule_list: row.rule_list.clone(),
        }
    }
}

pub struct Compiler<'a> {
    store: &'a Store,
    classifications: Classifications,
    dictionaries: Dictionaries,
    default_priority: i32,
}

pub struct CompilerBuilder<'a> {
    store: &'a Store,
    keywords: KeywordConfig,
    classifications: Option<Classifications>,
    dictionaries: Option<Dictionaries>,
    default_priority: i32,
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            keywords: KeywordConfig::default(),
            classifications: None,
            dictionaries: None,
            default_priority: DEFAULT_PRIORITY,
        }
    }

    /// Keywords used to classify steps that have no classification yet.
    pub fn with_keywords(mut self, keywords: KeywordConfig) -> Self {
        self.keywords = keywords;
        self
    }

    /// Curated classifications. Steps missing from them are classified on build.
    pub fn with_classifications(mut self, classifications: Classifications) -> Self {
        self.classifications = Some(classifications);
        self
    }

    /// Curated dictionaries. Without them, identity mappings are generated.
    pub fn with_dictionaries(mut self, dictionaries: Dictionaries) -> Self {
        self.dictionaries = Some(dictionaries);
        self
    }

    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn build(self) -> Compiler<'a> {
        let classifier = Classifier::new(self.keywords);
        let classifications = match self.classifications {
            Some(mut classifications) => {
                classifications.fill_missing(self.store, &classifier);
                classifications
            }
            None => classifier.classify_all(self.store),
        };
        let dictionaries = self
            .dictionaries
            .unwrap_or_else(|| Dictionaries::generate_defaults(self.store, &classifications));

        Compiler {
            store: self.store,
            classifications,
            dictionaries,
            default_priority: self.default_priority,
        }
    }
}

impl<'a> Compiler<'a> {
    pub fn builder(store: &'a Store) -> CompilerBuilder<'a> {
        CompilerBuilder::new(store)
    }

    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    /// Generates the table. Never fails: unknown names become sentinel cells and
    /// broken chains become empty destinations, each reported as a diagnostic.
    pub fn compile(&self) -> TransitionTable {
        let generated =
            RowGenerator::new(self.store, &self.classifications, &self.dictionaries)
                .with_default_priority(self.default_priority)
                .generate();

        let mut diagnostics = Classifier::validate(self.store, &self.classifications);
        for entry in &generated {
            self.check_state(&entry.source, &mut diagnostics);
            let Some(chain) = &entry.chain else {
                continue;
            };
            match &chain.outcome {
                ChainOutcome::Dangling { last } => diagnostics.push(Diagnostic::DanglingChain {
                    source: entry.source.clone(),
                    last: last.clone(),
                }),
                ChainOutcome::Cycle { repeated } => diagnostics.push(Diagnostic::CycleInChain {
                    source: entry.source.clone(),
                    repeated: repeated.clone(),
                }),
                ChainOutcome::Direct | ChainOutcome::Reached => {}
            }
            if let Some(destination) = &chain.destination_step {
                self.check_state(destination, &mut diagnostics);
            }
            for rule in &chain.rule_steps {
                let qualified_name = self.store.qualified_name(rule);
                if !self.dictionaries.rule.contains_key(&qualified_name) {
                    diagnostics.push(Diagnostic::UnknownRuleMapping { qualified_name });
                }
            }
        }

        let diagnostics: Vec<Diagnostic> = diagnostics.into_iter().unique().collect();
        for diagnostic in &diagnostics {
            warn!("{}", diagnostic);
        }
        debug!(
            rows = generated.len(),
            diagnostics = diagnostics.len(),
            "compiled transition table"
        );

        TransitionTable {
            rows: generated.into_iter().map(|g| g.row).collect(),
            diagnostics,
        }
    }

    fn check_state(&self, id: &StepId, diagnostics: &mut Vec<Diagnostic>) {
        let qualified_name = self.store.qualified_name(id);
        if !self.dictionaries.state.contains_key(&qualified_name) {
            diagnostics.push(Diagnostic::UnknownStateMapping { qualified_name });
        }
    }
}
