//! Error types for the layout core.
//!
//! Load-time graph validation failures and simulation divergence are the
//! only error conditions the core surfaces; everything else (unknown ids in
//! interaction events) is treated as a caller contract violation and
//! ignored at the call site.

use thiserror::Error;

/// Errors raised while building a graph from its description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share the same name. Names are the primary key.
    #[error("duplicate node name: {name:?}")]
    DuplicateNode {
        /// The offending name.
        name: String,
    },

    /// A link references a node name that does not exist.
    #[error("link {index} references unknown node {name:?}")]
    UnknownNodeRef {
        /// Index of the link in the input description.
        index: usize,
        /// The unresolved node name.
        name: String,
    },
}

/// Errors raised by the force simulation.
///
/// Divergence is recovered in place (offending node reset, velocity zeroed)
/// before the error is returned, so the driver may keep ticking.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimulationError {
    /// A node position became non-finite during integration.
    #[error("node {node} diverged to a non-finite position")]
    NonFinite {
        /// Slot index of the first offending node.
        node: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::UnknownNodeRef {
            index: 3,
            name: "narnia".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("link 3"));
        assert!(msg.contains("narnia"));
    }

    #[test]
    fn test_duplicate_node_display() {
        let err = GraphError::DuplicateNode {
            name: "france".to_string(),
        };
        assert!(err.to_string().contains("france"));
    }

    #[test]
    fn test_simulation_error_display() {
        let err = SimulationError::NonFinite { node: 7 };
        assert!(err.to_string().contains("node 7"));
    }
}
