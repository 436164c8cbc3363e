use crate::classifier::KeywordConfig;
use crate::error::ImportError;
use crate::model::{Connection, Step};

/// A graph as handed over by an import adapter, before it is loaded into a store.
#[derive(Debug, Clone, Default)]
pub struct DiagramDefinition {
    pub steps: Vec<Step>,
    pub connections: Vec<Connection>,
    /// Keyword configuration shipped with the diagram, if any.
    pub keywords: Option<KeywordConfig>,
}

/// A trait for custom file formats that can be converted into a `DiagramDefinition`.
///
/// Parsing belongs to the implementor. The crate only consumes the result.
///
/// # Example
///
/// ```rust,no_run
/// use flowtable::prelude::*;
///
/// struct Outline {
///     titles: Vec<String>,
/// }
///
/// impl IntoDiagram for Outline {
///     fn into_diagram(self) -> std::result::Result<DiagramDefinition, ImportError> {
///         let mut steps = Vec::new();
///         let mut connections = Vec::new();
///         for (i, title) in self.titles.into_iter().enumerate() {
///             let step: Step = serde_json::from_value(serde_json::json!({
///                 "id": format!("s{}", i),
///                 "name": title,
///             }))
///             .map_err(|e| ImportError::Validation(e.to_string()))?;
///             if i > 0 {
///                 connections.push(Connection::new(
///                     StepId::new(format!("s{}", i - 1)),
///                     step.id.clone(),
///                     ConnectionKind::Success,
///                 ));
///             }
///             steps.push(step);
///         }
///         Ok(DiagramDefinition { steps, connections, keywords: None })
///     }
/// }
/// ```
pub trait IntoDiagram {
    /// Consumes the object and converts it into a diagram definition.
    fn into_diagram(self) -> Result<DiagramDefinition, ImportError>;
}

impl IntoDiagram for DiagramDefinition {
    fn into_diagram(self) -> Result<DiagramDefinition, ImportError> {
        Ok(self)
    }
}
