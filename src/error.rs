//! Error types for the diagram engine.
//!
//! Most engine operations absorb these locally (log and no-op); they are
//! surfaced to callers only where a document or config is parsed.

use crate::types::{Direction, LineId, NodeId};

/// Failures that can occur while looking up or loading diagram state.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// No node with the given id exists.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// No line with the given id exists.
    #[error("line {0} not found")]
    LineNotFound(LineId),
    /// A committed line is missing its destination node or dot.
    #[error("line {0} has no destination")]
    IncompleteLine(LineId),
    /// A line references a dot direction the node does not carry.
    #[error("node {node} has no '{dir}' dot")]
    MissingDot {
        /// Node that was asked for the dot
        node: NodeId,
        /// Requested direction
        dir: Direction,
    },
    /// A serialized document could not be parsed or written.
    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),
}
