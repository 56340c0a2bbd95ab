//! Graph data structures and operations.
//!
//! This module provides the validated graph state: petgraph topology with
//! Structure of Arrays (SoA) buffers for positions, velocities, and pin
//! targets, the symmetric adjacency index used for hover highlighting, and
//! the serde types the external loader's JSON deserializes into.

mod adjacency;
mod engine;
mod link;
mod node;
mod types;

pub use adjacency::AdjacencyIndex;
pub use engine::GraphEngine;
pub use link::LinkId;
pub use node::{NodeId, NodeState};
pub use types::{GraphDescription, LinkDescription, NodeDescription};
