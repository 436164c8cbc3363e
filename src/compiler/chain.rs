use crate::classifier::Classifications;
use crate::dictionary::Dictionaries;
use crate::model::{Connection, StepId, StepKind};
use crate::store::Store;
use ahash::AHashSet;
use itertools::Itertools;

/// Separator between rule labels in a collapsed rule list.
pub const RULE_LIST_SEPARATOR: &str = " + ";

/// How a rule chain walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// The connection led straight to a state.
    Direct,
    /// The walk went through rule/behavior steps and reached a state.
    Reached,
    /// The walk stopped at `last`, which has no outgoing connection.
    Dangling { last: StepId },
    /// The walk was about to revisit `repeated`.
    Cycle { repeated: StepId },
}

/// The collapsed form of one outgoing connection of a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    /// Rule labels joined with `" + "`. Empty when no rule was walked.
    pub rule_list: String,
    /// The destination state label. Empty for dangling or cyclic chains.
    pub destination: String,
    /// The destination state step, when one was reached.
    pub destination_step: Option<StepId>,
    /// Rule steps in walk order.
    pub rule_steps: Vec<StepId>,
    /// Distinct rule/behavior steps visited.
    pub steps_walked: usize,
    pub outcome: ChainOutcome,
}

/// Walks the rule/behavior chain behind a state's outgoing connection.
pub struct ChainResolver<'a> {
    store: &'a Store,
    classifications: &'a Classifications,
    dictionaries: &'a Dictionaries,
}

impl<'a> ChainResolver<'a> {
    pub fn new(
        store: &'a Store,
        classifications: &'a Classifications,
        dictionaries: &'a Dictionaries,
    ) -> Self {
        Self {
            store,
            classifications,
            dictionaries,
        }
    }

    /// Resolves the connection into a rule list and destination.
    ///
    /// Rule and behavior steps follow their first outgoing connection only. The
    /// visited set bounds the walk by the number of steps in the store.
    pub fn resolve(&self, connection: &Connection) -> ResolvedChain {
        let target = &connection.to;
        if self.kind_of(target) == StepKind::State {
            return ResolvedChain {
                rule_list: String::new(),
                destination: self.state_label(target),
                destination_step: Some(target.clone()),
                rule_steps: Vec::new(),
                steps_walked: 0,
                outcome: ChainOutcome::Direct,
            };
        }

        let mut visited: AHashSet<&StepId> = AHashSet::new();
        visited.insert(target);
        let mut rule_steps = Vec::new();
        let mut current = target;

        let (destination_step, outcome) = loop {
            if self.kind_of(current) == StepKind::Rule {
                rule_steps.push(current.clone());
            }

            let Some(next) = self.store.outgoing(current).next().map(|c| &c.to) else {
                break (
                    None,
                    ChainOutcome::Dangling {
                        last: current.clone(),
                    },
                );
            };
            if visited.contains(next) {
                break (
                    None,
                    ChainOutcome::Cycle {
                        repeated: next.clone(),
                    },
                );
            }
            if self.kind_of(next) == StepKind::State {
                break (Some(next.clone()), ChainOutcome::Reached);
            }

            visited.insert(next);
            current = next;
        };

        let rule_list = rule_steps
            .iter()
            .map(|id| {
                self.dictionaries
                    .lookup_rule_name(&self.store.qualified_name(id))
            })
            .join(RULE_LIST_SEPARATOR);
        let destination = destination_step
            .as_ref()
            .map(|id| self.state_label(id))
            .unwrap_or_default();

        ResolvedChain {
            rule_list,
            destination,
            destination_step,
            rule_steps,
            steps_walked: visited.len(),
            outcome,
        }
    }

    /// The exported label of a state step.
    pub fn state_label(&self, id: &StepId) -> String {
        self.dictionaries
            .lookup_state_name(&self.store.qualified_name(id))
    }

    fn kind_of(&self, id: &StepId) -> StepKind {
        self.classifications.kind_of(id)
    }
}
