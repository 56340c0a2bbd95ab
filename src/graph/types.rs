//! Graph description types, as handed over by the external loader.
//!
//! The core performs no file or network I/O; the hosting page fetches and
//! parses the JSON and passes the resulting object across the wasm boundary,
//! where it is deserialized into these types.

use serde::Deserialize;

/// A node in the input description.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeDescription {
    /// Unique name for this node. Used to reference nodes in links.
    pub name: String,
    /// Opaque category tags (e.g. the continents a country belongs to).
    /// Stored and surfaced per node, never interpreted by the core.
    #[serde(default)]
    pub continents: Vec<String>,
    /// Precomputed neighbor count. When present it sizes the node's
    /// collision radius; otherwise the degree is counted from the links.
    #[serde(default)]
    pub neighbor_count: Option<u32>,
}

/// An undirected link between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct LinkDescription {
    /// Source node name.
    pub source: String,
    /// Target node name.
    pub target: String,
    /// Shared border length, used as a separation distance hint.
    #[serde(default)]
    pub border: Option<f32>,
}

/// Complete graph description: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphDescription {
    pub nodes: Vec<NodeDescription>,
    pub links: Vec<LinkDescription>,
}
