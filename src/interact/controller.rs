//! Interaction state machine: drag-to-pin, pan/zoom, hover highlighting.
//!
//! Discrete input events drive two independent pieces of state:
//! - the drag phase (`Idle` / `Dragging`), which pins nodes and reheats the
//!   simulation;
//! - the view transform and mode toggle, which never touch simulation
//!   coordinates.
//!
//! Hover highlighting is presentation state computed from the adjacency
//! index; leaving hover restores the defaults unconditionally.
//!
//! Events naming an unknown node id are contract violations by the caller
//! and are ignored without any state change.

use log::debug;

use crate::graph::{AdjacencyIndex, GraphEngine, NodeId};
use crate::sim::ForceSimulation;

use super::transform::ViewTransform;

/// Alpha target while a drag is in progress.
const REHEAT_TARGET: f32 = 0.3;

/// Gesture interpretation mode. Exactly one is active; a designated
/// trigger (e.g. a key press) toggles between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pointer gestures move the view transform; node hit regions are
    /// bypassed entirely.
    Pan,
    /// Pointer gestures hit-test node cells for dragging and hovering.
    Interact,
}

/// Drag phase of the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// No drag in progress.
    Idle,
    /// The node is pinned to the pointer.
    Dragging(NodeId),
}

/// Interaction controller over one engine/simulation pair.
pub struct InteractionController {
    mode: Mode,
    drag: DragPhase,
    transform: ViewTransform,
    transform_rev: u32,
    hovered: Option<NodeId>,
    highlight_nodes: Vec<u32>,
    highlight_links: Vec<u32>,
    highlight_rev: u32,
    /// Pan gesture in progress (Pan mode pointer held down).
    panning: bool,
    last_pointer: (f32, f32),
}

impl InteractionController {
    /// Create a controller in interact mode with an identity transform.
    pub fn new() -> Self {
        Self {
            mode: Mode::Interact,
            drag: DragPhase::Idle,
            transform: ViewTransform::default(),
            transform_rev: 0,
            hovered: None,
            highlight_nodes: Vec::new(),
            highlight_links: Vec::new(),
            highlight_rev: 0,
            panning: false,
            last_pointer: (0.0, 0.0),
        }
    }

    // =========================================================================
    // Drag state machine
    // =========================================================================

    /// `Idle -> Dragging(id)`: pin the node at its current position and
    /// reheat the simulation. Ignored mid-drag or for unknown ids.
    pub fn drag_start(
        &mut self,
        engine: &mut GraphEngine,
        sim: &mut ForceSimulation,
        id: NodeId,
    ) -> bool {
        if let DragPhase::Dragging(_) = self.drag {
            return false;
        }
        let Some((x, y)) = engine.position(id) else {
            debug!("drag_start on unknown {id}, ignored");
            return false;
        };

        engine.pin(id, x, y);
        sim.set_alpha_target(REHEAT_TARGET);
        self.drag = DragPhase::Dragging(id);
        true
    }

    /// `Dragging(id)` stays: move the pin target to the pointer's world
    /// coordinate. Ignored while idle.
    pub fn drag_move(&mut self, engine: &mut GraphEngine, wx: f32, wy: f32) -> bool {
        let DragPhase::Dragging(id) = self.drag else {
            return false;
        };
        engine.pin(id, wx, wy);
        true
    }

    /// `Dragging(id) -> Idle`: release the node to free physics and let the
    /// simulation cool back down.
    pub fn drag_end(&mut self, engine: &mut GraphEngine, sim: &mut ForceSimulation) -> bool {
        let DragPhase::Dragging(id) = self.drag else {
            return false;
        };
        engine.unpin(id);
        sim.set_alpha_target(0.0);
        self.drag = DragPhase::Idle;
        true
    }

    /// Current drag phase.
    pub fn drag(&self) -> DragPhase {
        self.drag
    }

    // =========================================================================
    // Mode and view transform
    // =========================================================================

    /// Toggle between pan and interact mode. Switching modes cancels any
    /// drag in progress and clears hover state, so the inactive mode holds
    /// no residual pointer state.
    pub fn toggle_mode(
        &mut self,
        engine: &mut GraphEngine,
        sim: &mut ForceSimulation,
    ) -> Mode {
        self.drag_end(engine, sim);
        self.hover_leave(engine);
        self.panning = false;
        self.mode = match self.mode {
            Mode::Pan => Mode::Interact,
            Mode::Interact => Mode::Pan,
        };
        self.mode
    }

    /// Current gesture mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform.pan_by(dx, dy);
        self.transform_rev = self.transform_rev.wrapping_add(1);
    }

    /// Zoom about a screen-space anchor.
    pub fn zoom_about(&mut self, factor: f32, ax: f32, ay: f32) {
        self.transform.zoom_about(factor, ax, ay);
        self.transform_rev = self.transform_rev.wrapping_add(1);
    }

    /// The current view transform.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Bumped on every transform change, for emit-on-change at the boundary.
    pub fn transform_revision(&self) -> u32 {
        self.transform_rev
    }

    // =========================================================================
    // Hover highlighting
    // =========================================================================

    /// Enter hover over a node: the highlight set is its adjacency closure
    /// (itself plus every directly linked node) and its incident links.
    /// Ignored for unknown ids.
    pub fn hover_enter(
        &mut self,
        engine: &mut GraphEngine,
        adjacency: &AdjacencyIndex,
        id: NodeId,
    ) {
        if !engine.contains(id) {
            debug!("hover_enter on unknown {id}, ignored");
            return;
        }
        if self.hovered == Some(id) {
            return;
        }
        self.clear_highlights(engine);

        self.hovered = Some(id);
        for j in 0..engine.node_count() as u32 {
            let other = NodeId(j);
            if adjacency.is_adjacent(id, other) {
                self.highlight_nodes.push(j);
                if let Some(state) = engine.state_mut(other) {
                    state.set_highlighted(true);
                }
            }
        }
        self.highlight_links = adjacency
            .incident_links(id)
            .iter()
            .map(|l| l.raw())
            .collect();
        if let Some(state) = engine.state_mut(id) {
            state.set_hovered(true);
        }
        self.highlight_rev = self.highlight_rev.wrapping_add(1);
    }

    /// Leave hover: all highlight and hover state returns to the default.
    pub fn hover_leave(&mut self, engine: &mut GraphEngine) {
        if self.hovered.is_none() {
            return;
        }
        self.clear_highlights(engine);
        self.highlight_rev = self.highlight_rev.wrapping_add(1);
    }

    fn clear_highlights(&mut self, engine: &mut GraphEngine) {
        for &j in &self.highlight_nodes {
            if let Some(state) = engine.state_mut(NodeId(j)) {
                state.clear_presentation();
            }
        }
        if let Some(id) = self.hovered.take() {
            if let Some(state) = engine.state_mut(id) {
                state.clear_presentation();
            }
        }
        self.highlight_nodes.clear();
        self.highlight_links.clear();
    }

    /// Currently hovered node.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Highlighted node ids (the hovered node's adjacency closure).
    pub fn highlight_nodes(&self) -> &[u32] {
        &self.highlight_nodes
    }

    /// Highlighted link ids (links incident to the hovered node).
    pub fn highlight_links(&self) -> &[u32] {
        &self.highlight_links
    }

    /// Bumped on every highlight change.
    pub fn highlight_revision(&self) -> u32 {
        self.highlight_rev
    }

    // =========================================================================
    // Pointer gestures (mode-dependent)
    // =========================================================================

    /// Pointer pressed at a screen coordinate. In pan mode this starts a
    /// pan gesture; in interact mode it hit-tests the node cells and starts
    /// a drag. Returns true if a drag began.
    pub fn pointer_down(
        &mut self,
        engine: &mut GraphEngine,
        sim: &mut ForceSimulation,
        sx: f32,
        sy: f32,
    ) -> bool {
        self.last_pointer = (sx, sy);
        match self.mode {
            Mode::Pan => {
                self.panning = true;
                false
            }
            Mode::Interact => {
                let (wx, wy) = self.transform.to_world(sx, sy);
                match engine.node_at(wx, wy) {
                    Some(id) => self.drag_start(engine, sim, id),
                    None => false,
                }
            }
        }
    }

    /// Pointer moved. Continues the active pan or drag; otherwise, in
    /// interact mode, updates hover to the cell under the pointer.
    pub fn pointer_move(
        &mut self,
        engine: &mut GraphEngine,
        adjacency: &AdjacencyIndex,
        sx: f32,
        sy: f32,
    ) {
        let (dx, dy) = (sx - self.last_pointer.0, sy - self.last_pointer.1);
        self.last_pointer = (sx, sy);

        if self.panning {
            self.pan_by(dx, dy);
            return;
        }

        let (wx, wy) = self.transform.to_world(sx, sy);
        if let DragPhase::Dragging(_) = self.drag {
            self.drag_move(engine, wx, wy);
            return;
        }

        if self.mode == Mode::Interact {
            match engine.node_at(wx, wy) {
                Some(id) => self.hover_enter(engine, adjacency, id),
                None => self.hover_leave(engine),
            }
        }
    }

    /// Pointer released: ends the active pan or drag.
    pub fn pointer_up(&mut self, engine: &mut GraphEngine, sim: &mut ForceSimulation) {
        self.panning = false;
        self.drag_end(engine, sim);
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
