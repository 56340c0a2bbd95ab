//! Atlas Graph - WASM Module
//!
//! Force-directed layout and interaction core for adjacency graphs (e.g.
//! country border networks). Compiled to WebAssembly and driven by a
//! JavaScript host that owns all rendering, file loading, and the
//! animation-frame loop; the core owns the physics, the Voronoi hit
//! regions, and the interaction state machine.
//!
//! # Architecture
//!
//! - `graph`: validated topology, SoA position/velocity buffers, adjacency
//! - `sim`: forces, Barnes-Hut quadtree, cooling schedule
//! - `spatial`: R-tree hit testing and the Voronoi tessellator
//! - `interact`: drag-to-pin, pan/zoom transform, hover highlighting
//!
//! Per frame the host calls [`AtlasGraphWasm::tick`], then reads positions,
//! link endpoints, cell polygons, transform, and highlight sets back out;
//! pointer and key events arrive between ticks through the event methods.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod interact;
pub mod sim;
pub mod spatial;

use error::GraphError;
use graph::{AdjacencyIndex, GraphDescription, GraphEngine, NodeId};
use interact::{DragPhase, InteractionController, Mode};
use sim::{ForceSimulation, SimulationConfig};
use spatial::{Extent, VoronoiTessellator};

/// Voronoi extent span, as a multiple of the viewport on each axis.
const EXTENT_MARGIN: f32 = 4.0;

/// Initialize the WASM module: panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Main entry point for the layout core.
///
/// Wraps the internal engine, simulation, tessellator, and interaction
/// controller behind the JavaScript-facing API.
#[wasm_bindgen]
pub struct AtlasGraphWasm {
    engine: GraphEngine,
    adjacency: AdjacencyIndex,
    sim: ForceSimulation,
    voronoi: VoronoiTessellator,
    controller: InteractionController,
    width: f32,
    height: f32,
}

#[wasm_bindgen]
impl AtlasGraphWasm {
    /// Create an empty core sized to a viewport. The layout center is the
    /// viewport center; the Voronoi extent is a large margin around it.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        let engine = GraphEngine::build(&GraphDescription::default(), width / 2.0, height / 2.0)
            .expect("empty description is always valid");
        Self {
            adjacency: AdjacencyIndex::build(0, &[]),
            sim: ForceSimulation::new(SimulationConfig {
                center: (width / 2.0, height / 2.0),
                ..SimulationConfig::default()
            }),
            voronoi: VoronoiTessellator::new(Extent::around_viewport(
                width,
                height,
                EXTENT_MARGIN,
            )),
            controller: InteractionController::new(),
            engine,
            width,
            height,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a graph description (the parsed `{nodes, links}` JSON object).
    ///
    /// Replaces any previously loaded graph and resets the simulation and
    /// interaction state. Fails fast on duplicate node names or links
    /// referencing unknown nodes.
    #[wasm_bindgen(js_name = loadGraph)]
    pub fn load_graph(&mut self, description: JsValue) -> Result<(), JsError> {
        let desc: GraphDescription = serde_wasm_bindgen::from_value(description)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.load(&desc)?;
        Ok(())
    }

    fn load(&mut self, desc: &GraphDescription) -> Result<(), GraphError> {
        let engine = GraphEngine::build(desc, self.width / 2.0, self.height / 2.0)?;
        self.adjacency = AdjacencyIndex::build(engine.node_count(), engine.link_pairs());
        self.engine = engine;
        self.sim = ForceSimulation::new(SimulationConfig {
            center: (self.width / 2.0, self.height / 2.0),
            ..SimulationConfig::default()
        });
        self.controller = InteractionController::new();
        self.voronoi.recompute(&self.engine);
        log::info!(
            "loaded graph: {} nodes, {} links",
            self.engine.node_count(),
            self.engine.link_count()
        );
        Ok(())
    }

    /// Resize the viewport: recenters the layout and widens the extent.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.sim.set_center(width / 2.0, height / 2.0);
        self.voronoi
            .set_extent(Extent::around_viewport(width, height, EXTENT_MARGIN));
    }

    // =========================================================================
    // Tick loop
    // =========================================================================

    /// Advance one simulation tick and refresh the derived geometry.
    ///
    /// Returns the current alpha. Divergence is recovered internally and
    /// surfaced as an error; the driver may log it and keep ticking.
    pub fn tick(&mut self) -> Result<f32, JsError> {
        let stepped = self.sim.step(&mut self.engine);
        self.engine.rebuild_spatial_index();

        // Cells only move while the layout is hot or a node is dragged;
        // skip the tessellation otherwise.
        let dragging = matches!(self.controller.drag(), DragPhase::Dragging(_));
        if !self.sim.is_settled() || dragging {
            self.voronoi.recompute(&self.engine);
        }

        Ok(stepped?)
    }

    /// Current alpha.
    pub fn alpha(&self) -> f32 {
        self.sim.alpha()
    }

    /// True once alpha fell below the settle threshold; the host may pause
    /// its frame loop until an interaction reheats the simulation.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> bool {
        self.sim.is_settled()
    }

    // =========================================================================
    // Graph queries
    // =========================================================================

    /// Number of nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.engine.node_count() as u32
    }

    /// Number of links.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.engine.link_count() as u32
    }

    /// Resolve a node name to its id.
    #[wasm_bindgen(js_name = nodeIdOf)]
    pub fn node_id_of(&self, name: &str) -> Option<u32> {
        self.engine.id_of(name).map(|id| id.raw())
    }

    /// A node's name.
    #[wasm_bindgen(js_name = getNodeName)]
    pub fn get_node_name(&self, node_id: u32) -> Option<String> {
        self.engine.name(NodeId(node_id)).map(str::to_string)
    }

    /// A node's category tags, exactly as loaded.
    #[wasm_bindgen(js_name = getNodeContinents)]
    pub fn get_node_continents(&self, node_id: u32) -> Vec<String> {
        self.engine.continents(NodeId(node_id)).to_vec()
    }

    /// A node's collision radius (degree-derived; the renderer reuses it
    /// for sizing).
    #[wasm_bindgen(js_name = getNodeRadius)]
    pub fn get_node_radius(&self, node_id: u32) -> Option<f32> {
        self.engine.radius(NodeId(node_id))
    }

    /// Neighbors of a node.
    #[wasm_bindgen(js_name = getNeighbors)]
    pub fn get_neighbors(&self, node_id: u32) -> Vec<u32> {
        self.engine.neighbors(NodeId(node_id))
    }

    /// Link degree of a node.
    #[wasm_bindgen(js_name = getNodeDegree)]
    pub fn get_node_degree(&self, node_id: u32) -> u32 {
        self.engine.degree(NodeId(node_id)) as u32
    }

    /// Symmetric adjacency: true for a node and itself and for directly
    /// linked pairs.
    #[wasm_bindgen(js_name = isAdjacent)]
    pub fn is_adjacent(&self, a: u32, b: u32) -> bool {
        self.adjacency.is_adjacent(NodeId(a), NodeId(b))
    }

    /// Check if a node is currently pinned by a drag.
    #[wasm_bindgen(js_name = isNodePinned)]
    pub fn is_node_pinned(&self, node_id: u32) -> bool {
        self.engine.is_pinned(NodeId(node_id))
    }

    // =========================================================================
    // Position Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of X positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Read immediately, do not store.
    #[wasm_bindgen(js_name = getPositionsXView)]
    pub fn get_positions_x_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.positions_x()) }
    }

    /// Get a zero-copy view of Y positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Read immediately, do not store.
    #[wasm_bindgen(js_name = getPositionsYView)]
    pub fn get_positions_y_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.positions_y()) }
    }

    /// Get a zero-copy view of X velocities.
    #[wasm_bindgen(js_name = getVelocitiesXView)]
    pub fn get_velocities_x_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.velocities_x()) }
    }

    /// Get a zero-copy view of Y velocities.
    #[wasm_bindgen(js_name = getVelocitiesYView)]
    pub fn get_velocities_y_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.velocities_y()) }
    }

    /// Get a zero-copy view of collision radii, for circle sizing.
    #[wasm_bindgen(js_name = getRadiiView)]
    pub fn get_radii_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.radii()) }
    }

    /// Bounding box of all node positions as `[min_x, min_y, max_x, max_y]`,
    /// or None for an empty graph. For fit-to-view framing.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.engine
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    /// The node whose cell contains a world coordinate (the nearest node),
    /// as of the last tick.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, world_x: f32, world_y: f32) -> Option<u32> {
        self.engine.node_at(world_x, world_y).map(|id| id.raw())
    }

    /// The nearest node within a maximum world-space distance, for hosts
    /// that prefer a bounded hit radius over the generous cells.
    #[wasm_bindgen(js_name = nodeWithin)]
    pub fn node_within(&self, world_x: f32, world_y: f32, max_distance: f32) -> Option<u32> {
        self.engine
            .node_near(world_x, world_y, max_distance)
            .map(|id| id.raw())
    }

    /// Link endpoint coordinates `[x_src, y_src, x_tgt, y_tgt, ...]` in
    /// link order, resolved from current node positions.
    #[wasm_bindgen(js_name = getLinkEndpoints)]
    pub fn get_link_endpoints(&self) -> Vec<f32> {
        self.engine.link_endpoints()
    }

    /// Link endpoint ids `[src0, tgt0, src1, tgt1, ...]` in link order.
    #[wasm_bindgen(js_name = getLinkPairs)]
    pub fn get_link_pairs(&self) -> Vec<u32> {
        self.engine
            .link_pairs()
            .iter()
            .flat_map(|&(a, b)| [a.raw(), b.raw()])
            .collect()
    }

    // =========================================================================
    // Voronoi cells
    // =========================================================================

    /// Cell polygon offsets: `node_count + 1` entries counting vertices,
    /// CSR-style. Cell `i` owns vertices `offsets[i]..offsets[i+1]` of
    /// [`getCellPoints`](Self::get_cell_points).
    #[wasm_bindgen(js_name = getCellOffsets)]
    pub fn get_cell_offsets(&self) -> Vec<u32> {
        let cells = self.voronoi.cells();
        let mut offsets = Vec::with_capacity(cells.len() + 1);
        let mut total = 0u32;
        offsets.push(0);
        for cell in cells {
            total += cell.len() as u32;
            offsets.push(total);
        }
        offsets
    }

    /// Flattened cell polygon vertices `[x, y, x, y, ...]`, all cells
    /// concatenated in node order.
    #[wasm_bindgen(js_name = getCellPoints)]
    pub fn get_cell_points(&self) -> Vec<f32> {
        let mut points = Vec::new();
        for cell in self.voronoi.cells() {
            for v in cell {
                points.push(v[0]);
                points.push(v[1]);
            }
        }
        points
    }

    /// Bumped whenever the tessellation is recomputed.
    #[wasm_bindgen(js_name = cellRevision)]
    pub fn cell_revision(&self) -> u32 {
        self.voronoi.revision()
    }

    // =========================================================================
    // View transform
    // =========================================================================

    /// Current view transform as `[k, x, y]`.
    #[wasm_bindgen(js_name = getTransform)]
    pub fn get_transform(&self) -> Vec<f32> {
        let t = self.controller.transform();
        vec![t.k, t.x, t.y]
    }

    /// Bumped on every pan/zoom change; poll to emit the transform only
    /// when it moved.
    #[wasm_bindgen(js_name = transformRevision)]
    pub fn transform_revision(&self) -> u32 {
        self.controller.transform_revision()
    }

    /// True when pan mode is active.
    #[wasm_bindgen(js_name = isPanMode)]
    pub fn is_pan_mode(&self) -> bool {
        self.controller.mode() == Mode::Pan
    }

    // =========================================================================
    // Highlight state
    // =========================================================================

    /// Currently hovered node, if any.
    #[wasm_bindgen(js_name = hoveredNode)]
    pub fn hovered_node(&self) -> Option<u32> {
        self.controller.hovered().map(|id| id.raw())
    }

    /// Highlighted node ids: the hovered node plus its direct neighbors.
    /// Everything else should be de-emphasized by the renderer.
    #[wasm_bindgen(js_name = getHighlightedNodes)]
    pub fn get_highlighted_nodes(&self) -> Vec<u32> {
        self.controller.highlight_nodes().to_vec()
    }

    /// Highlighted link ids: the links incident to the hovered node.
    #[wasm_bindgen(js_name = getHighlightedLinks)]
    pub fn get_highlighted_links(&self) -> Vec<u32> {
        self.controller.highlight_links().to_vec()
    }

    /// Bumped on every hover change.
    #[wasm_bindgen(js_name = highlightRevision)]
    pub fn highlight_revision(&self) -> u32 {
        self.controller.highlight_revision()
    }

    // =========================================================================
    // Input events
    // =========================================================================

    /// Pointer pressed at screen coordinates. Pans in pan mode; hit-tests
    /// and starts a drag in interact mode. Returns true if a drag began.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.controller
            .pointer_down(&mut self.engine, &mut self.sim, x, y)
    }

    /// Pointer moved: continues a pan or drag, or updates hover.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.controller
            .pointer_move(&mut self.engine, &self.adjacency, x, y);
    }

    /// Pointer released: ends the active pan or drag.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.controller.pointer_up(&mut self.engine, &mut self.sim);
    }

    /// Wheel gesture: zoom about the pointer anchor. Positive deltas zoom
    /// out, matching browser wheel conventions.
    pub fn wheel(&mut self, delta: f32, anchor_x: f32, anchor_y: f32) {
        let factor = 2.0_f32.powf(-delta / 500.0);
        self.controller.zoom_about(factor, anchor_x, anchor_y);
    }

    /// Mode-toggle trigger (designated key). Returns true when pan mode is
    /// now active.
    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&mut self) -> bool {
        self.controller.toggle_mode(&mut self.engine, &mut self.sim) == Mode::Pan
    }

    /// Drag-start on a known node (host did its own hit test): pins it at
    /// its current position and reheats. Unknown ids are ignored.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, node_id: u32) -> bool {
        self.controller
            .drag_start(&mut self.engine, &mut self.sim, NodeId(node_id))
    }

    /// Drag-move to a world coordinate.
    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, world_x: f32, world_y: f32) -> bool {
        self.controller.drag_move(&mut self.engine, world_x, world_y)
    }

    /// Drag-end: release the node and cool back down.
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> bool {
        self.controller.drag_end(&mut self.engine, &mut self.sim)
    }

    /// Hover-enter over a known node id.
    #[wasm_bindgen(js_name = hoverEnter)]
    pub fn hover_enter(&mut self, node_id: u32) {
        self.controller
            .hover_enter(&mut self.engine, &self.adjacency, NodeId(node_id));
    }

    /// Hover-leave: restore all highlight state to the default.
    #[wasm_bindgen(js_name = hoverLeave)]
    pub fn hover_leave(&mut self) {
        self.controller.hover_leave(&mut self.engine);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// The full pipeline without JS types: load -> tick -> read geometry.
    fn core_with(json: &str) -> AtlasGraphWasm {
        let mut core = AtlasGraphWasm::new(800.0, 600.0);
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        core.load(&desc).unwrap();
        core
    }

    const BORDERS: &str = r#"{
        "nodes": [
            { "name": "france", "continents": ["europe"], "neighbor_count": 3 },
            { "name": "spain", "continents": ["europe"] },
            { "name": "portugal", "continents": ["europe"] },
            { "name": "andorra", "continents": ["europe"] },
            { "name": "iceland", "continents": ["europe"] }
        ],
        "links": [
            { "source": "france", "target": "spain", "border": 623.0 },
            { "source": "spain", "target": "portugal", "border": 1214.0 },
            { "source": "france", "target": "andorra", "border": 57.0 },
            { "source": "spain", "target": "andorra", "border": 64.0 }
        ]
    }"#;

    #[test]
    fn test_load_and_settle() {
        let mut core = core_with(BORDERS);
        assert_eq!(core.node_count(), 5);
        assert_eq!(core.link_count(), 4);

        let mut ticks = 0;
        while !core.is_settled() {
            core.tick().unwrap();
            ticks += 1;
            assert!(ticks < 1000, "failed to settle");
        }

        // All positions finite after sustained ticking.
        for i in 0..5 {
            let (x, y) = position_of(&core, i);
            assert!(x.is_finite() && y.is_finite());
        }
    }

    fn position_of(core: &AtlasGraphWasm, id: u32) -> (f32, f32) {
        core.engine.position(NodeId(id)).unwrap()
    }

    #[test]
    fn test_load_rejects_unknown_link_ref() {
        let mut core = AtlasGraphWasm::new(800.0, 600.0);
        let desc: GraphDescription = serde_json::from_str(
            r#"{
                "nodes": [ { "name": "a" } ],
                "links": [ { "source": "a", "target": "missing" } ]
            }"#,
        )
        .unwrap();
        let err = core.load(&desc).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNodeRef { index: 0, .. }));
    }

    #[test]
    fn test_adjacency_scenario() {
        let core = core_with(BORDERS);
        let france = core.node_id_of("france").unwrap();
        let spain = core.node_id_of("spain").unwrap();
        let iceland = core.node_id_of("iceland").unwrap();

        assert!(core.is_adjacent(france, spain));
        assert!(core.is_adjacent(spain, france));
        assert!(core.is_adjacent(france, france));
        assert!(!core.is_adjacent(france, iceland));
        // Unrelated id not in the graph.
        assert!(!core.is_adjacent(france, 999));
    }

    #[test]
    fn test_drag_scenario() {
        let mut core = core_with(BORDERS);
        let france = core.node_id_of("france").unwrap();

        for _ in 0..20 {
            core.tick().unwrap();
        }

        assert!(core.drag_start(france));
        assert!(core.drag_move(100.0, 100.0));
        core.tick().unwrap();
        assert_eq!(position_of(&core, france), (100.0, 100.0));
        assert!(core.is_node_pinned(france));

        assert!(core.drag_end());
        assert!(!core.is_node_pinned(france));
        assert_eq!(core.sim.alpha_target(), 0.0);

        // Released: free physics moves it off the drop point.
        for _ in 0..30 {
            core.tick().unwrap();
        }
        assert_ne!(position_of(&core, france), (100.0, 100.0));
    }

    #[test]
    fn test_drag_unknown_id_ignored() {
        let mut core = core_with(BORDERS);
        assert!(!core.drag_start(12345));
        assert_eq!(core.sim.alpha_target(), 0.0);
    }

    #[test]
    fn test_hover_highlight_roundtrip() {
        let mut core = core_with(BORDERS);
        let spain = core.node_id_of("spain").unwrap();

        let rev = core.highlight_revision();
        core.hover_enter(spain);
        assert_eq!(core.hovered_node(), Some(spain));
        // spain + france + portugal + andorra.
        assert_eq!(core.get_highlighted_nodes().len(), 4);
        assert_eq!(core.get_highlighted_links().len(), 3);
        assert_ne!(core.highlight_revision(), rev);

        core.hover_leave();
        assert_eq!(core.hovered_node(), None);
        assert!(core.get_highlighted_nodes().is_empty());
        assert!(core.get_highlighted_links().is_empty());
        for i in 0..core.node_count() {
            let state = core.engine.state(NodeId(i)).unwrap();
            assert!(!state.is_hovered() && !state.is_highlighted());
        }
    }

    #[test]
    fn test_cells_cover_nodes_and_flatten_consistently() {
        let mut core = core_with(BORDERS);
        core.tick().unwrap();

        let offsets = core.get_cell_offsets();
        let points = core.get_cell_points();
        assert_eq!(offsets.len() as u32, core.node_count() + 1);
        assert_eq!(*offsets.last().unwrap() as usize * 2, points.len());

        // Every node has a nonempty convex cell around it.
        for i in 0..core.node_count() {
            let count = offsets[i as usize + 1] - offsets[i as usize];
            assert!(count >= 3, "cell {i} has only {count} vertices");
        }
    }

    #[test]
    fn test_tessellation_skipped_when_settled() {
        let mut core = core_with(BORDERS);
        while !core.is_settled() {
            core.tick().unwrap();
        }
        let rev = core.cell_revision();
        core.tick().unwrap();
        assert_eq!(core.cell_revision(), rev);

        // Dragging forces recomputation even while settled.
        core.drag_start(0);
        core.drag_move(10.0, 10.0);
        core.tick().unwrap();
        assert_ne!(core.cell_revision(), rev);
        core.drag_end();
    }

    #[test]
    fn test_transform_is_view_only() {
        let mut core = core_with(BORDERS);
        core.tick().unwrap();
        let before = position_of(&core, 0);

        let rev = core.transform_revision();
        core.toggle_mode(); // pan mode
        core.pointer_down(0.0, 0.0);
        core.pointer_move(40.0, 25.0);
        core.pointer_up();
        core.wheel(-250.0, 100.0, 100.0);

        assert_ne!(core.transform_revision(), rev);
        let t = core.get_transform();
        assert_eq!(t.len(), 3);
        assert!((t[1], t[2]) != (0.0, 0.0));
        // Simulation coordinates untouched by the view transform.
        assert_eq!(position_of(&core, 0), before);
    }

    #[test]
    fn test_mode_toggle_is_exclusive() {
        let mut core = core_with(BORDERS);
        assert!(!core.is_pan_mode());
        assert!(core.toggle_mode());
        assert!(core.is_pan_mode());
        assert!(!core.toggle_mode());
        assert!(!core.is_pan_mode());
    }

    #[test]
    fn test_reheat_on_drag_resumes_settled_layout() {
        let mut core = core_with(BORDERS);
        while !core.is_settled() {
            core.tick().unwrap();
        }

        core.drag_start(0);
        for _ in 0..20 {
            core.tick().unwrap();
        }
        assert!(!core.is_settled(), "drag must reheat the simulation");

        core.drag_end();
        let mut ticks = 0;
        while !core.is_settled() {
            core.tick().unwrap();
            ticks += 1;
            assert!(ticks < 1000);
        }
    }

    #[test]
    fn test_link_endpoints_track_positions() {
        let mut core = core_with(BORDERS);
        core.tick().unwrap();

        let flat = core.get_link_endpoints();
        assert_eq!(flat.len() as u32, core.link_count() * 4);

        let pairs = core.get_link_pairs();
        let (sx, sy) = position_of(&core, pairs[0]);
        assert_eq!(flat[0], sx);
        assert_eq!(flat[1], sy);
    }

    #[test]
    fn test_empty_core_ticks() {
        let mut core = AtlasGraphWasm::new(640.0, 480.0);
        for _ in 0..5 {
            core.tick().unwrap();
        }
        assert_eq!(core.node_count(), 0);
        assert!(core.get_cell_offsets().len() == 1);
    }

    #[test]
    fn test_node_attributes_surface() {
        let core = core_with(BORDERS);
        let france = core.node_id_of("france").unwrap();
        assert_eq!(core.get_node_name(france), Some("france".to_string()));
        assert_eq!(core.get_node_continents(france), vec!["europe"]);
        // neighbor_count hint of 3 drives the radius.
        assert_eq!(core.get_node_radius(france), Some(8.0 + 3.0 * 2.0));
        let mut neighbors = core.get_neighbors(france);
        neighbors.sort_unstable();
        assert_eq!(neighbors.len(), 2);
    }
}
