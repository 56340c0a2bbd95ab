//! Barnes-Hut quadtree for approximate many-body repulsion.
//!
//! Built fresh each tick over current node positions and used only to
//! accelerate the repulsion force: distant clusters of nodes are treated as
//! a single body at their center of mass when the cell-size/distance ratio
//! falls below theta. Exact pairwise evaluation remains the reference path
//! for small graphs and for correctness tests.

/// Cap on subdivision depth; coincident points merge into one leaf below it.
const MAX_DEPTH: u32 = 24;

/// No child / no point sentinel.
const NONE: i32 = -1;

#[derive(Clone, Copy)]
struct Cell {
    /// Cell center.
    cx: f32,
    cy: f32,
    /// Half extent of the square cell.
    half: f32,
    /// Accumulated mass (point count).
    mass: f32,
    /// Center of mass; accumulated during insertion, normalized after.
    com_x: f32,
    com_y: f32,
    /// Child cell indices (NW, NE, SW, SE); NONE when absent.
    children: [i32; 4],
    /// Point index for occupied leaves; NONE for internal/empty cells.
    point: i32,
}

impl Cell {
    fn new(cx: f32, cy: f32, half: f32) -> Self {
        Self {
            cx,
            cy,
            half,
            mass: 0.0,
            com_x: 0.0,
            com_y: 0.0,
            children: [NONE; 4],
            point: NONE,
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.children == [NONE; 4]
    }
}

/// Barnes-Hut quadtree over a set of 2D points.
pub struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    /// Build a tree over parallel x/y position slices.
    ///
    /// The root cell is the bounding square of all points; an empty input
    /// yields an empty tree that contributes zero force.
    pub fn build(xs: &[f32], ys: &[f32]) -> Self {
        let n = xs.len();
        debug_assert_eq!(n, ys.len());
        if n == 0 {
            return Self { cells: Vec::new() };
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for i in 0..n {
            min_x = min_x.min(xs[i]);
            max_x = max_x.max(xs[i]);
            min_y = min_y.min(ys[i]);
            max_y = max_y.max(ys[i]);
        }

        let half = ((max_x - min_x).max(max_y - min_y) / 2.0).max(1.0);
        let mut cells = Vec::with_capacity(n * 2);
        cells.push(Cell::new(
            (min_x + max_x) / 2.0,
            (min_y + max_y) / 2.0,
            half,
        ));

        let mut tree = Self { cells };
        for i in 0..n {
            tree.insert(i as i32, xs[i], ys[i]);
        }
        for cell in &mut tree.cells {
            if cell.mass > 0.0 {
                cell.com_x /= cell.mass;
                cell.com_y /= cell.mass;
            }
        }
        tree
    }

    fn insert(&mut self, point: i32, x: f32, y: f32) {
        let mut current = 0usize;
        let mut depth = 0u32;

        loop {
            self.cells[current].mass += 1.0;
            self.cells[current].com_x += x;
            self.cells[current].com_y += y;

            let cell = self.cells[current];
            if cell.is_leaf() {
                if cell.point == NONE && cell.mass <= 1.0 {
                    // Empty leaf: take it.
                    self.cells[current].point = point;
                    return;
                }
                if depth >= MAX_DEPTH {
                    // Coincident pile-up: merge into the existing leaf.
                    return;
                }
                // Occupied leaf: push the resident point down one level,
                // then continue descending with the new point.
                let resident = cell.point;
                self.cells[current].point = NONE;
                if resident != NONE {
                    let (rx, ry) = (cell.com_x - x, cell.com_y - y);
                    let child = self.child_for(current, rx, ry);
                    self.cells[child].mass += 1.0;
                    self.cells[child].com_x += rx;
                    self.cells[child].com_y += ry;
                    self.cells[child].point = resident;
                }
            }

            current = self.child_for(current, x, y);
            depth += 1;
        }
    }

    /// Index of the child quadrant of `parent` containing (x, y),
    /// creating it on first use.
    fn child_for(&mut self, parent: usize, x: f32, y: f32) -> usize {
        let p = self.cells[parent];
        let east = x >= p.cx;
        let south = y >= p.cy;
        let quadrant = match (south, east) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (true, true) => 3,
        };

        let existing = p.children[quadrant];
        if existing != NONE {
            return existing as usize;
        }

        let half = p.half / 2.0;
        let cx = if east { p.cx + half } else { p.cx - half };
        let cy = if south { p.cy + half } else { p.cy - half };
        let index = self.cells.len();
        self.cells.push(Cell::new(cx, cy, half));
        self.cells[parent].children[quadrant] = index as i32;
        index
    }

    /// Accumulated repulsion at point `i = (x, y)`.
    ///
    /// `strength` follows the d3 sign convention: negative repels. `theta`
    /// is the approximation threshold (cell size / distance); `min_dist2`
    /// floors the squared distance so coincident nodes cannot blow up.
    /// Returns the (fx, fy) velocity contribution, already alpha-scaled by
    /// the caller folding alpha into `strength`.
    pub fn force_at(
        &self,
        i: usize,
        x: f32,
        y: f32,
        strength: f32,
        theta: f32,
        min_dist2: f32,
    ) -> (f32, f32) {
        let mut fx = 0.0;
        let mut fy = 0.0;
        if self.cells.is_empty() {
            return (fx, fy);
        }

        let theta2 = theta * theta;
        let mut stack = vec![0usize];
        while let Some(ci) = stack.pop() {
            let cell = &self.cells[ci];
            if cell.mass <= 0.0 {
                continue;
            }

            let dx = cell.com_x - x;
            let dy = cell.com_y - y;
            let d2 = dx * dx + dy * dy;
            let size = cell.half * 2.0;

            if cell.is_leaf() {
                if cell.point == i as i32 {
                    continue;
                }
                let d2 = d2.max(min_dist2);
                let w = strength * cell.mass / d2;
                fx += dx * w;
                fy += dy * w;
            } else if size * size < theta2 * d2 {
                // Far enough: treat the whole cell as one body. The cell
                // may contain point i itself; that error stays within the
                // usual Barnes-Hut tolerance.
                let d2 = d2.max(min_dist2);
                let w = strength * cell.mass / d2;
                fx += dx * w;
                fy += dy * w;
            } else {
                for &child in &cell.children {
                    if child != NONE {
                        stack.push(child as usize);
                    }
                }
            }
        }

        (fx, fy)
    }
}
