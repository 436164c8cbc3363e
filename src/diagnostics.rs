use crate::model::StepId;
use std::fmt;

/// A non-fatal finding about the graph. Diagnostics never change the generated rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// A state step whose qualified name has no state dictionary entry.
    UnknownStateMapping { qualified_name: String },
    /// A rule step whose qualified name has no rule dictionary entry.
    UnknownRuleMapping { qualified_name: String },
    /// A rule chain ended at a step without outgoing connections.
    DanglingChain { source: StepId, last: StepId },
    /// A rule chain returned to a step it had already walked through.
    CycleInChain { source: StepId, repeated: StepId },
    /// A rule or behavior step with more than one outgoing connection.
    /// Only the first one is followed.
    BranchingChainStep { step: StepId, out_degree: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownStateMapping { qualified_name } => {
                write!(f, "no state dictionary entry for '{}'", qualified_name)
            }
            Diagnostic::UnknownRuleMapping { qualified_name } => {
                write!(f, "no rule dictionary entry for '{}'", qualified_name)
            }
            Diagnostic::DanglingChain { source, last } => write!(
                f,
                "rule chain from '{}' stops at '{}' before reaching a state",
                source, last
            ),
            Diagnostic::CycleInChain { source, repeated } => write!(
                f,
                "rule chain from '{}' loops back to '{}'",
                source, repeated
            ),
            Diagnostic::BranchingChainStep { step, out_degree } => write!(
                f,
                "step '{}' has {} outgoing connections, only the first is followed",
                step, out_degree
            ),
        }
    }
}
