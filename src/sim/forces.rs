//! Individual force implementations.
//!
//! Each force reads current positions and accumulates into the velocity
//! buffers (collision nudges positions directly); the integrator in
//! `simulation.rs` then damps velocities and advances positions. All force
//! magnitudes are scaled by the simulation's current alpha, folded into the
//! strength by the caller.

use crate::graph::GraphEngine;

use super::quadtree::QuadTree;
use super::simulation::SimulationConfig;

/// Deterministic sub-pixel jiggle for coincident nodes, so degenerate
/// geometry breaks symmetry without ever producing a non-finite value.
pub(crate) struct Jiggle {
    state: u32,
}

impl Jiggle {
    pub(crate) fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next jiggle offset in (-0.5e-6, 0.5e-6).
    pub(crate) fn next(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.state & 0xFFFF) as f32 / 65_536.0 - 0.5) * 1e-6
    }
}

/// Spring force along every link, pulling both endpoints toward the link's
/// target separation. Equal and opposite on source and target.
pub(crate) fn apply_link_force(engine: &mut GraphEngine, alpha: f32, rng: &mut Jiggle) {
    for i in 0..engine.links.len() {
        let (source, target) = engine.links[i];
        let (s, t) = (source.slot(), target.slot());
        let mut dx = engine.pos_x[t] - engine.pos_x[s];
        let mut dy = engine.pos_y[t] - engine.pos_y[s];
        if dx == 0.0 && dy == 0.0 {
            dx = rng.next();
            dy = rng.next();
        }

        let dist = (dx * dx + dy * dy).sqrt();
        let strength = engine.link_strength[i] * alpha;
        let force = (dist - engine.link_distance[i]) / dist * strength;
        let fx = dx * force;
        let fy = dy * force;

        engine.vel_x[t] -= fx;
        engine.vel_y[t] -= fy;
        engine.vel_x[s] += fx;
        engine.vel_y[s] += fy;
    }
}

/// Mutual repulsion between every pair of nodes, inverse-square with a
/// minimum-distance floor. Uses the Barnes-Hut tree above the exact
/// threshold, pairwise evaluation below it.
pub(crate) fn apply_many_body(
    engine: &mut GraphEngine,
    config: &SimulationConfig,
    alpha: f32,
    rng: &mut Jiggle,
) {
    let n = engine.node_count();
    let strength = config.charge_strength * alpha;
    let min_dist2 = config.min_distance * config.min_distance;

    if n <= config.exact_threshold {
        for i in 0..n {
            for j in (i + 1)..n {
                let mut dx = engine.pos_x[j] - engine.pos_x[i];
                let mut dy = engine.pos_y[j] - engine.pos_y[i];
                if dx == 0.0 && dy == 0.0 {
                    dx = rng.next();
                    dy = rng.next();
                }
                let d2 = (dx * dx + dy * dy).max(min_dist2);
                let w = strength / d2;
                engine.vel_x[i] += dx * w;
                engine.vel_y[i] += dy * w;
                engine.vel_x[j] -= dx * w;
                engine.vel_y[j] -= dy * w;
            }
        }
        return;
    }

    let tree = QuadTree::build(&engine.pos_x, &engine.pos_y);
    for i in 0..n {
        let (fx, fy) = tree.force_at(
            i,
            engine.pos_x[i],
            engine.pos_y[i],
            strength,
            config.theta,
            min_dist2,
        );
        engine.vel_x[i] += fx;
        engine.vel_y[i] += fy;
    }
}

/// Per-node pull toward the configured center, a fraction of the node's
/// offset so the layout drifts to the viewport middle without collapsing.
pub(crate) fn apply_center_force(engine: &mut GraphEngine, config: &SimulationConfig, alpha: f32) {
    let strength = config.center_strength * alpha;
    let (cx, cy) = config.center;
    for i in 0..engine.node_count() {
        engine.vel_x[i] += (cx - engine.pos_x[i]) * strength;
        engine.vel_y[i] += (cy - engine.pos_y[i]) * strength;
    }
}

/// Circle-overlap resolution: overlapping nodes are separated along the
/// line connecting their centers, half the penetration depth each, relaxed
/// over a few passes per tick. Convergence across ticks is enough; a single
/// tick need not fully resolve the overlaps.
pub(crate) fn apply_collision(engine: &mut GraphEngine, config: &SimulationConfig, rng: &mut Jiggle) {
    let n = engine.node_count();
    for _ in 0..config.collision_iterations {
        for i in 0..n {
            let ri = engine.radius[i];
            for j in (i + 1)..n {
                let min_dist = ri + engine.radius[j];
                let mut dx = engine.pos_x[j] - engine.pos_x[i];
                let mut dy = engine.pos_y[j] - engine.pos_y[i];
                if dx == 0.0 && dy == 0.0 {
                    dx = rng.next();
                    dy = rng.next();
                }
                let d2 = dx * dx + dy * dy;
                if d2 >= min_dist * min_dist {
                    continue;
                }

                let dist = d2.sqrt().max(config.min_distance);
                let push = (min_dist - dist) / dist * 0.5;
                let px = dx * push;
                let py = dy * push;

                engine.pos_x[i] -= px;
                engine.pos_y[i] -= py;
                engine.pos_x[j] += px;
                engine.pos_y[j] += py;
            }
        }
    }
}
