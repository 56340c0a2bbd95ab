//! Symmetric adjacency lookup for neighbor highlighting.
//!
//! Built once from the link list after the graph is validated; read-only
//! afterwards. Backs the hover highlight sets: a node is "adjacent" to
//! itself and to every node it shares a link with, in either direction.

use std::collections::HashSet;

use super::link::LinkId;
use super::node::NodeId;

/// O(1) symmetric "are these two nodes directly linked" lookup,
/// plus the incident-link list per node.
pub struct AdjacencyIndex {
    /// Normalized (low, high) id pairs for every link.
    pairs: HashSet<(u32, u32)>,
    /// For each node slot, the links incident to it.
    incident: Vec<Vec<LinkId>>,
}

impl AdjacencyIndex {
    /// Build the index from the engine's link list in O(L).
    pub fn build(node_count: usize, links: &[(NodeId, NodeId)]) -> Self {
        let mut pairs = HashSet::with_capacity(links.len());
        let mut incident = vec![Vec::new(); node_count];

        for (i, &(a, b)) in links.iter().enumerate() {
            pairs.insert(Self::normalize(a, b));
            let id = LinkId(i as u32);
            if a.slot() < node_count {
                incident[a.slot()].push(id);
            }
            if b != a && b.slot() < node_count {
                incident[b.slot()].push(id);
            }
        }

        Self { pairs, incident }
    }

    /// True if `a == b` or a link exists between `a` and `b` in either
    /// direction. Unknown ids are simply not adjacent to anything but
    /// themselves... and an id can only equal itself if the caller passed
    /// the same unknown id twice, which still answers the question asked.
    #[inline]
    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.pairs.contains(&Self::normalize(a, b))
    }

    /// Links incident to a node. Empty for unknown ids.
    pub fn incident_links(&self, node: NodeId) -> &[LinkId] {
        self.incident
            .get(node.slot())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Degree of a node (number of incident links).
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident_links(node).len()
    }

    #[inline]
    fn normalize(a: NodeId, b: NodeId) -> (u32, u32) {
        if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) }
    }
}
