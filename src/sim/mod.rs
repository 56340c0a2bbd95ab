//! Force simulation: cooling schedule, forces, and the Barnes-Hut tree.
//!
//! One [`ForceSimulation`] drives one [`crate::graph::GraphEngine`]. Each
//! `step()` applies repulsion, link springs, centering, and collision in
//! that order, integrates with velocity damping, then cools alpha toward
//! its target.

mod forces;
mod quadtree;
mod simulation;

pub use quadtree::QuadTree;
pub use simulation::{ForceSimulation, SimulationConfig, SimulationState};
