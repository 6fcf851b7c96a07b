//! Error types for graph construction, layout search and rendering.

use thiserror::Error;

/// Errors surfaced by every fallible operation in the crate.
///
/// Nothing here is recoverable mid-search: each variant is reported to the
/// caller as soon as it is detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A graph needs at least one node; the first one is the root.
    #[error("Graph has no nodes")]
    EmptyGraph,

    /// The same identity appeared twice in the node sequence.
    #[error("Duplicate node '{0}'")]
    DuplicateNode(String),

    /// The adjacency relation names a node missing from the node sequence.
    #[error("Unknown node '{node}' referenced by '{referenced_by}'")]
    UnknownNode { node: String, referenced_by: String },

    /// More survivors were requested than candidates exist.
    #[error("Cannot select {requested} survivors from {available} candidates")]
    SelectionTooLarge { requested: usize, available: usize },

    /// Two nodes share a position, so inverse-square repulsion is undefined.
    #[error("Nodes '{a}' and '{b}' are coincident; repulsion is undefined")]
    CoincidentNodes { a: String, b: String },

    /// The fitness total overflowed or otherwise stopped being finite.
    #[error("Fitness score is not finite: {0}")]
    NonFiniteScore(f64),

    /// A layout's key set does not line up with the graph it is used with.
    #[error("Layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),
}
