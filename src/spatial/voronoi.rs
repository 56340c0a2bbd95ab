//! Voronoi tessellation over current node positions.
//!
//! One convex cell polygon per node, computed by clipping a bounded extent
//! rectangle against the perpendicular bisector of the site and each nearby
//! neighbor. The cells are generous pointer hit regions handed to the
//! renderer, not drawing geometry.
//!
//! Neighbors are visited in ascending distance via the spatial index, so
//! clipping stops as soon as the remaining sites are provably too far to
//! cut the cell (bisector distance beyond the farthest cell vertex). For
//! layout-sized graphs this keeps recomputation comfortably inside a frame.

use crate::graph::{GraphEngine, NodeId};

/// Squared distance below which two sites count as coincident and no
/// bisector is generated. Overlapping cells for coincident nodes are
/// acceptable; a panic or non-finite vertex is not.
const COINCIDENT_2: f32 = 1e-12;

/// Bounding rectangle the tessellation is clipped to.
///
/// Conventionally far larger than the viewport so no finite cell is cut at
/// a visually relevant boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Extent {
    /// An extent covering `margin` times the viewport on each side of its
    /// center.
    pub fn around_viewport(width: f32, height: f32, margin: f32) -> Self {
        let (cx, cy) = (width / 2.0, height / 2.0);
        let (hw, hh) = (width * margin / 2.0, height * margin / 2.0);
        Self {
            min_x: cx - hw,
            min_y: cy - hh,
            max_x: cx + hw,
            max_y: cy + hh,
        }
    }

    /// Corner polygon, counter-clockwise.
    fn corners(&self) -> Vec<[f32; 2]> {
        vec![
            [self.min_x, self.min_y],
            [self.max_x, self.min_y],
            [self.max_x, self.max_y],
            [self.min_x, self.max_y],
        ]
    }

    /// Extent area.
    pub fn area(&self) -> f32 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// True if the point lies inside the extent.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Computes and caches one Voronoi cell polygon per node.
pub struct VoronoiTessellator {
    extent: Extent,
    cells: Vec<Vec<[f32; 2]>>,
    revision: u32,
}

impl VoronoiTessellator {
    /// Create a tessellator clipped to the given extent.
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            cells: Vec::new(),
            revision: 0,
        }
    }

    /// The clipping extent.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Replace the clipping extent (viewport resize).
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Recompute every cell from current positions.
    ///
    /// Assumes the engine's spatial index was rebuilt after the last
    /// position change; the tick loop does this immediately before calling.
    pub fn recompute(&mut self, engine: &GraphEngine) {
        self.cells.clear();
        self.cells.reserve(engine.node_count());

        for i in 0..engine.node_count() {
            let id = NodeId(i as u32);
            let (sx, sy) = engine.position(id).expect("slot in range");
            self.cells.push(self.cell_for(engine, id, sx, sy));
        }
        self.revision = self.revision.wrapping_add(1);
    }

    fn cell_for(&self, engine: &GraphEngine, id: NodeId, sx: f32, sy: f32) -> Vec<[f32; 2]> {
        let mut poly = self.extent.corners();

        for site in engine.spatial().ascending_from(sx, sy) {
            if site.id == id {
                continue;
            }
            if poly.is_empty() {
                break;
            }

            let dx = site.x - sx;
            let dy = site.y - sy;
            let d2 = dx * dx + dy * dy;
            if d2 < COINCIDENT_2 {
                continue;
            }

            // Farthest cell vertex from the site bounds every future cut:
            // a bisector at half-distance beyond it cannot intersect.
            let r2 = poly
                .iter()
                .map(|v| {
                    let (ex, ey) = (v[0] - sx, v[1] - sy);
                    ex * ex + ey * ey
                })
                .fold(0.0_f32, f32::max);
            if d2 > 4.0 * r2 {
                break;
            }

            poly = clip_half_plane(&poly, sx, sy, site.x, site.y);
        }

        poly
    }

    /// All cells, indexed by node slot. Empty until the first recompute.
    pub fn cells(&self) -> &[Vec<[f32; 2]>] {
        &self.cells
    }

    /// One node's cell from the last recompute.
    pub fn cell(&self, id: NodeId) -> Option<&[[f32; 2]]> {
        self.cells.get(id.slot()).map(Vec::as_slice)
    }

    /// Bumped on every recompute, for change detection at the boundary.
    pub fn revision(&self) -> u32 {
        self.revision
    }
}

/// Sutherland-Hodgman clip of a convex polygon against the half-plane of
/// points at least as close to site `(sx, sy)` as to `(ox, oy)`.
fn clip_half_plane(poly: &[[f32; 2]], sx: f32, sy: f32, ox: f32, oy: f32) -> Vec<[f32; 2]> {
    let mx = (sx + ox) / 2.0;
    let my = (sy + oy) / 2.0;
    let nx = ox - sx;
    let ny = oy - sy;
    // signed(p) <= 0 inside (closer to the site).
    let signed = |p: &[f32; 2]| (p[0] - mx) * nx + (p[1] - my) * ny;

    let mut out = Vec::with_capacity(poly.len() + 1);
    for (k, a) in poly.iter().enumerate() {
        let b = &poly[(k + 1) % poly.len()];
        let fa = signed(a);
        let fb = signed(b);

        if fa <= 0.0 {
            out.push(*a);
        }
        if (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0) {
            let t = fa / (fa - fb);
            out.push([a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]);
        }
    }
    out
}
