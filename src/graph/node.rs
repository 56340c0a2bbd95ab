//! Node identifiers and per-node presentation state.
//!
//! Nodes are created once when a graph description is loaded and live for
//! the lifetime of the engine, so a `NodeId` doubles as the node's slot
//! index into the engine's position/velocity buffers.

use std::fmt;

/// Stable node identifier.
///
/// Assigned in description order at load time; wraps a u32 for cheap
/// storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The node's slot index into the SoA buffers.
    #[inline]
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node state flags packed into a single byte.
///
/// PINNED is simulation state (the integrator holds the node at its pin
/// target); HOVERED and HIGHLIGHTED are presentation state maintained by the
/// interaction controller and only read by the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const PINNED: u8 = 0b0000_0001;
    const HOVERED: u8 = 0b0000_0010;
    const HIGHLIGHTED: u8 = 0b0000_0100;

    /// Create a new default node state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node is pinned (held in place by a drag).
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    /// Set the pinned state.
    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.flags |= Self::PINNED;
        } else {
            self.flags &= !Self::PINNED;
        }
    }

    /// Check if the node is the current hover target.
    #[inline]
    pub fn is_hovered(self) -> bool {
        self.flags & Self::HOVERED != 0
    }

    /// Set the hovered state.
    #[inline]
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered {
            self.flags |= Self::HOVERED;
        } else {
            self.flags &= !Self::HOVERED;
        }
    }

    /// Check if the node is in the active highlight set.
    #[inline]
    pub fn is_highlighted(self) -> bool {
        self.flags & Self::HIGHLIGHTED != 0
    }

    /// Set the highlighted state.
    #[inline]
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if highlighted {
            self.flags |= Self::HIGHLIGHTED;
        } else {
            self.flags &= !Self::HIGHLIGHTED;
        }
    }

    /// Clear the presentation flags (hovered, highlighted), leaving PINNED.
    #[inline]
    pub fn clear_presentation(&mut self) {
        self.flags &= Self::PINNED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.slot(), 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_node_state_default() {
        let state = NodeState::new();
        assert!(!state.is_pinned());
        assert!(!state.is_hovered());
        assert!(!state.is_highlighted());
    }

    #[test]
    fn test_node_state_pinned() {
        let mut state = NodeState::new();
        state.set_pinned(true);
        assert!(state.is_pinned());
        assert!(!state.is_hovered());

        state.set_pinned(false);
        assert!(!state.is_pinned());
    }

    #[test]
    fn test_clear_presentation_keeps_pin() {
        let mut state = NodeState::new();
        state.set_pinned(true);
        state.set_hovered(true);
        state.set_highlighted(true);

        state.clear_presentation();
        assert!(state.is_pinned());
        assert!(!state.is_hovered());
        assert!(!state.is_highlighted());
    }
}
