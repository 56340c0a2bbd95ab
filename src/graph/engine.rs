//! GraphEngine - validated graph state for the force simulation.
//!
//! The engine is built once from a [`GraphDescription`] and owns everything
//! that mutates per tick:
//! - Graph topology via petgraph (immutable after load)
//! - Position/velocity buffers in SoA layout
//! - Pin targets for dragged nodes (NaN sentinel = unpinned)
//! - Node state flags (pinned, hovered, highlighted)
//! - Spatial index for pointer hit testing
//! - Name interning between the description's string keys and slot ids

use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f32::consts::PI;

use super::node::{NodeId, NodeState};
use super::types::GraphDescription;
use crate::error::GraphError;
use crate::spatial::SpatialIndex;

/// Radius of the first ring of the initial phyllotaxis spiral.
const INITIAL_RADIUS: f32 = 10.0;
/// Golden-angle increment between successive spiral placements.
const INITIAL_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// Collision radius for a node with no links.
const BASE_RADIUS: f32 = 8.0;
/// Collision radius gained per incident link.
const RADIUS_PER_LINK: f32 = 2.0;

/// Target separation for links with no border hint.
const DEFAULT_LINK_DISTANCE: f32 = 30.0;

/// The core graph engine.
///
/// Topology (nodes, links, names) never changes after `build`; only the
/// position, velocity, pin, and state buffers mutate, and only through the
/// force simulation and the interaction controller's pin mechanism.
#[derive(Debug)]
pub struct GraphEngine {
    /// The underlying undirected topology. Node weights are the stable ids,
    /// edge weights the resolved target separation.
    graph: StableGraph<NodeId, f32, Undirected>,

    /// Map from node name to stable id.
    name_to_id: HashMap<String, NodeId>,

    /// Node names in slot order.
    names: Vec<String>,

    /// Opaque category tags per node, surfaced to the renderer untouched.
    continents: Vec<Vec<String>>,

    /// Link endpoints in description order; `LinkId` indexes this.
    pub(crate) links: Vec<(NodeId, NodeId)>,

    /// Resolved target separation per link.
    pub(crate) link_distance: Vec<f32>,

    /// Spring strength per link, normalized by the smaller endpoint degree
    /// so heavily-linked hubs are not torn apart.
    pub(crate) link_strength: Vec<f32>,

    /// X positions (SoA layout)
    pub(crate) pos_x: Vec<f32>,

    /// Y positions (SoA layout)
    pub(crate) pos_y: Vec<f32>,

    /// X velocities (SoA layout)
    pub(crate) vel_x: Vec<f32>,

    /// Y velocities (SoA layout)
    pub(crate) vel_y: Vec<f32>,

    /// Pin target X per node; NaN when the node is free.
    pub(crate) pin_x: Vec<f32>,

    /// Pin target Y per node; NaN when the node is free.
    pub(crate) pin_y: Vec<f32>,

    /// Collision radius per node, derived from its link degree.
    pub(crate) radius: Vec<f32>,

    /// Node state flags.
    pub(crate) states: Vec<NodeState>,

    /// Spatial index over current positions, for pointer hit testing.
    spatial: SpatialIndex,
}

impl GraphEngine {
    /// Build an engine from a description, seeding initial positions on a
    /// phyllotaxis spiral around `(center_x, center_y)`.
    ///
    /// Fails fast on a duplicate node name or a link referencing an unknown
    /// name; a description that loads is structurally sound for the whole
    /// life of the simulation.
    pub fn build(
        desc: &GraphDescription,
        center_x: f32,
        center_y: f32,
    ) -> Result<Self, GraphError> {
        let n = desc.nodes.len();
        let mut graph = StableGraph::with_capacity(n, desc.links.len());
        let mut name_to_id = HashMap::with_capacity(n);
        let mut names = Vec::with_capacity(n);
        let mut continents = Vec::with_capacity(n);
        let mut pos_x = Vec::with_capacity(n);
        let mut pos_y = Vec::with_capacity(n);

        for (i, node) in desc.nodes.iter().enumerate() {
            let id = NodeId(i as u32);
            match name_to_id.entry(node.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(GraphError::DuplicateNode {
                        name: node.name.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            let index = graph.add_node(id);
            debug_assert_eq!(index.index(), id.slot());

            names.push(node.name.clone());
            continents.push(node.continents.clone());

            // Phyllotaxis spiral: deterministic, collision-free seeding.
            let r = INITIAL_RADIUS * (0.5 + i as f32).sqrt();
            let a = INITIAL_ANGLE * i as f32;
            pos_x.push(center_x + r * a.cos());
            pos_y.push(center_y + r * a.sin());
        }

        let mut links = Vec::with_capacity(desc.links.len());
        let mut link_distance = Vec::with_capacity(desc.links.len());
        for (index, link) in desc.links.iter().enumerate() {
            let resolve = |name: &str| {
                name_to_id
                    .get(name)
                    .copied()
                    .ok_or_else(|| GraphError::UnknownNodeRef {
                        index,
                        name: name.to_string(),
                    })
            };
            let source = resolve(&link.source)?;
            let target = resolve(&link.target)?;

            let dist = match link.border {
                // Longer shared borders get a little more separation, on a
                // log scale so the raw km values stay in layout range.
                Some(border) if border > 0.0 => {
                    DEFAULT_LINK_DISTANCE + border.ln_1p()
                }
                _ => DEFAULT_LINK_DISTANCE,
            };

            graph.add_edge(
                NodeIndex::new(source.slot()),
                NodeIndex::new(target.slot()),
                dist,
            );
            links.push((source, target));
            link_distance.push(dist);
        }

        let link_strength: Vec<f32> = links
            .iter()
            .map(|&(a, b)| {
                let da = graph.edges(NodeIndex::new(a.slot())).count();
                let db = graph.edges(NodeIndex::new(b.slot())).count();
                1.0 / da.min(db).max(1) as f32
            })
            .collect();

        // Collision radius: the precomputed neighbor_count hint when the
        // description carries one, otherwise the counted link degree.
        let mut radius = Vec::with_capacity(n);
        for (i, node) in desc.nodes.iter().enumerate() {
            let degree = match node.neighbor_count {
                Some(count) => count as f32,
                None => graph.edges(NodeIndex::new(i)).count() as f32,
            };
            radius.push(BASE_RADIUS + RADIUS_PER_LINK * degree);
        }

        let mut engine = Self {
            graph,
            name_to_id,
            names,
            continents,
            links,
            link_distance,
            link_strength,
            pos_x,
            pos_y,
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            pin_x: vec![f32::NAN; n],
            pin_y: vec![f32::NAN; n],
            radius,
            states: vec![NodeState::new(); n],
            spatial: SpatialIndex::new(),
        };
        engine.rebuild_spatial_index();
        Ok(engine)
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Look up a node id by name.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// A node's name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id.slot()).map(String::as_str)
    }

    /// A node's category tags. Empty for unknown ids.
    pub fn continents(&self, id: NodeId) -> &[String] {
        self.continents
            .get(id.slot())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if the id names a node in this graph.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.slot() < self.names.len()
    }

    /// Link endpoints in description order.
    pub fn link_pairs(&self) -> &[(NodeId, NodeId)] {
        &self.links
    }

    /// Target separation per link, in description order.
    pub fn link_distances(&self) -> &[f32] {
        &self.link_distance
    }

    /// Neighbors of a node via the topology graph.
    pub fn neighbors(&self, id: NodeId) -> Vec<u32> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.graph
            .neighbors(NodeIndex::new(id.slot()))
            .filter_map(|n| self.graph.node_weight(n).map(|id| id.0))
            .collect()
    }

    /// Link degree of a node.
    pub fn degree(&self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.graph.edges(NodeIndex::new(id.slot())).count()
    }

    // =========================================================================
    // Positions and pinning
    // =========================================================================

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.slot();
        if i < self.pos_x.len() {
            Some((self.pos_x[i], self.pos_y[i]))
        } else {
            None
        }
    }

    /// Set a node's position directly. No-op for unknown ids.
    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        let i = id.slot();
        if i < self.pos_x.len() {
            self.pos_x[i] = x;
            self.pos_y[i] = y;
        }
    }

    /// Pin a node at a target coordinate. The integrator snaps the node to
    /// its pin every tick until [`unpin`](Self::unpin). Returns false for
    /// unknown ids.
    pub fn pin(&mut self, id: NodeId, x: f32, y: f32) -> bool {
        let i = id.slot();
        if i >= self.pos_x.len() {
            return false;
        }
        self.pin_x[i] = x;
        self.pin_y[i] = y;
        self.pos_x[i] = x;
        self.pos_y[i] = y;
        self.states[i].set_pinned(true);
        true
    }

    /// Release a pinned node back to free physics. Returns false for
    /// unknown ids.
    pub fn unpin(&mut self, id: NodeId) -> bool {
        let i = id.slot();
        if i >= self.pos_x.len() {
            return false;
        }
        self.pin_x[i] = f32::NAN;
        self.pin_y[i] = f32::NAN;
        self.states[i].set_pinned(false);
        true
    }

    /// Check if a node is pinned.
    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.states
            .get(id.slot())
            .map(|s| s.is_pinned())
            .unwrap_or(false)
    }

    /// A node's collision radius.
    pub fn radius(&self, id: NodeId) -> Option<f32> {
        self.radius.get(id.slot()).copied()
    }

    /// Node state flags.
    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id.slot()).copied()
    }

    /// Mutable node state flags.
    pub(crate) fn state_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
        self.states.get_mut(id.slot())
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Get X positions slice.
    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    /// Get Y positions slice.
    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    /// Get X velocities slice.
    pub fn velocities_x(&self) -> &[f32] {
        &self.vel_x
    }

    /// Get Y velocities slice.
    pub fn velocities_y(&self) -> &[f32] {
        &self.vel_y
    }

    /// Collision radii slice.
    pub fn radii(&self) -> &[f32] {
        &self.radius
    }

    /// Link endpoint coordinates, flattened as
    /// `[x_src, y_src, x_tgt, y_tgt, ...]` in link order.
    pub fn link_endpoints(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.links.len() * 4);
        for &(a, b) in &self.links {
            out.push(self.pos_x[a.slot()]);
            out.push(self.pos_y[a.slot()]);
            out.push(self.pos_x[b.slot()]);
            out.push(self.pos_y[b.slot()]);
        }
        out
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the node whose Voronoi cell contains a point, i.e. the nearest
    /// node. Uses the index as of the last rebuild.
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        self.spatial.nearest(x, y)
    }

    /// Find the nearest node within a maximum distance.
    pub fn node_near(&self, x: f32, y: f32, max_distance: f32) -> Option<NodeId> {
        self.spatial.nearest_within(x, y, max_distance)
    }

    /// The spatial index over positions as of the last rebuild.
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Rebuild the spatial index from current positions. Called once per
    /// tick after integration, and after any direct position mutation.
    pub fn rebuild_spatial_index(&mut self) {
        let points: Vec<_> = (0..self.pos_x.len())
            .map(|i| (NodeId(i as u32), self.pos_x[i], self.pos_y[i]))
            .collect();
        self.spatial.rebuild(&points);
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Bounding box of all node positions as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.pos_x.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for i in 0..self.pos_x.len() {
            let (x, y) = (self.pos_x[i], self.pos_y[i]);
            if x < min_x {
                min_x = x;
            }
            if x > max_x {
                max_x = x;
            }
            if y < min_y {
                min_y = y;
            }
            if y > max_y {
                max_y = y;
            }
        }

        Some((min_x, min_y, max_x, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{LinkDescription, NodeDescription};

    fn node(name: &str) -> NodeDescription {
        NodeDescription {
            name: name.to_string(),
            continents: Vec::new(),
            neighbor_count: None,
        }
    }

    fn link(source: &str, target: &str) -> LinkDescription {
        LinkDescription {
            source: source.to_string(),
            target: target.to_string(),
            border: None,
        }
    }

    fn triangle() -> GraphDescription {
        GraphDescription {
            nodes: vec![node("a"), node("b"), node("c")],
            links: vec![link("a", "b"), link("b", "c"), link("c", "a")],
        }
    }

    #[test]
    fn test_build_triangle() {
        let engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        assert_eq!(engine.node_count(), 3);
        assert_eq!(engine.link_count(), 3);
        assert_eq!(engine.id_of("b"), Some(NodeId(1)));
        assert_eq!(engine.name(NodeId(2)), Some("c"));
        assert_eq!(engine.degree(NodeId(0)), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let desc = GraphDescription {
            nodes: vec![node("a"), node("a")],
            links: vec![],
        };
        let err = GraphEngine::build(&desc, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            crate::error::GraphError::DuplicateNode {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_link_ref_rejected() {
        let desc = GraphDescription {
            nodes: vec![node("a")],
            links: vec![link("a", "zz")],
        };
        let err = GraphEngine::build(&desc, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            crate::error::GraphError::UnknownNodeRef {
                index: 0,
                name: "zz".to_string()
            }
        );
    }

    #[test]
    fn test_initial_positions_distinct_and_near_center() {
        let engine = GraphEngine::build(&triangle(), 100.0, 50.0).unwrap();
        let xs = engine.positions_x();
        let ys = engine.positions_y();
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!(xs[i] != xs[j] || ys[i] != ys[j]);
            }
            assert!((xs[i] - 100.0).abs() < 50.0);
            assert!((ys[i] - 50.0).abs() < 50.0);
        }
    }

    #[test]
    fn test_pin_unpin() {
        let mut engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        let id = NodeId(0);
        assert!(!engine.is_pinned(id));

        assert!(engine.pin(id, 5.0, -3.0));
        assert!(engine.is_pinned(id));
        assert_eq!(engine.position(id), Some((5.0, -3.0)));

        assert!(engine.unpin(id));
        assert!(!engine.is_pinned(id));

        assert!(!engine.pin(NodeId(99), 0.0, 0.0));
        assert!(!engine.unpin(NodeId(99)));
    }

    #[test]
    fn test_radius_from_degree() {
        let engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        // Every triangle node has 2 links.
        assert_eq!(
            engine.radius(NodeId(0)),
            Some(BASE_RADIUS + 2.0 * RADIUS_PER_LINK)
        );
    }

    #[test]
    fn test_radius_prefers_neighbor_count_hint() {
        let mut desc = triangle();
        desc.nodes[0].neighbor_count = Some(7);
        let engine = GraphEngine::build(&desc, 0.0, 0.0).unwrap();
        assert_eq!(
            engine.radius(NodeId(0)),
            Some(BASE_RADIUS + 7.0 * RADIUS_PER_LINK)
        );
    }

    #[test]
    fn test_border_hint_lengthens_link() {
        let mut desc = triangle();
        desc.links[0].border = Some(600.0);
        let engine = GraphEngine::build(&desc, 0.0, 0.0).unwrap();
        assert!(engine.link_distances()[0] > DEFAULT_LINK_DISTANCE);
        assert_eq!(engine.link_distances()[1], DEFAULT_LINK_DISTANCE);
        // Hint stays within layout range.
        assert!(engine.link_distances()[0] < DEFAULT_LINK_DISTANCE * 2.0);
    }

    #[test]
    fn test_link_endpoints_resolved() {
        let engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        let flat = engine.link_endpoints();
        assert_eq!(flat.len(), 3 * 4);
        let (ax, ay) = engine.position(NodeId(0)).unwrap();
        assert_eq!(flat[0], ax);
        assert_eq!(flat[1], ay);
    }

    #[test]
    fn test_node_at_finds_nearest() {
        let mut engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        engine.set_position(NodeId(0), 0.0, 0.0);
        engine.set_position(NodeId(1), 100.0, 0.0);
        engine.set_position(NodeId(2), 0.0, 100.0);
        engine.rebuild_spatial_index();

        assert_eq!(engine.node_at(90.0, 10.0), Some(NodeId(1)));
        assert_eq!(engine.node_near(500.0, 500.0, 10.0), None);
    }

    #[test]
    fn test_empty_graph() {
        let engine = GraphEngine::build(&GraphDescription::default(), 0.0, 0.0).unwrap();
        assert_eq!(engine.node_count(), 0);
        assert_eq!(engine.bounds(), None);
        assert_eq!(engine.node_at(0.0, 0.0), None);
    }

    #[test]
    fn test_neighbors() {
        let engine = GraphEngine::build(&triangle(), 0.0, 0.0).unwrap();
        let mut neighbors = engine.neighbors(NodeId(0));
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 2]);
        assert!(engine.neighbors(NodeId(9)).is_empty());
    }
}
