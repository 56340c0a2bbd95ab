//! Pan/zoom view transform.
//!
//! A uniform scale plus translation mapping world (simulation) coordinates
//! to screen coordinates. Purely a view concern: the simulation never sees
//! it, and pointer coordinates are inverse-mapped through it before any
//! hit test or drag update.

/// Minimum zoom factor.
const MIN_SCALE: f32 = 0.1;
/// Maximum zoom factor.
const MAX_SCALE: f32 = 10.0;

/// `screen = world * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Uniform scale.
    pub k: f32,
    /// Screen-space X translation.
    pub x: f32,
    /// Screen-space Y translation.
    pub y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Map a screen coordinate to world space.
    pub fn to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    /// Map a world coordinate to screen space.
    pub fn to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx * self.k + self.x, wy * self.k + self.y)
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Scale by `factor` keeping the screen-space anchor point fixed.
    pub fn zoom_about(&mut self, factor: f32, ax: f32, ay: f32) {
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let applied = k / self.k;
        self.x = ax - (ax - self.x) * applied;
        self.y = ay - (ay - self.y) * applied;
        self.k = k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_roundtrip() {
        let t = ViewTransform::default();
        assert_eq!(t.to_world(10.0, 20.0), (10.0, 20.0));
        assert_eq!(t.to_screen(10.0, 20.0), (10.0, 20.0));
    }

    #[test]
    fn test_world_screen_inverse() {
        let mut t = ViewTransform::default();
        t.pan_by(35.0, -12.0);
        t.zoom_about(2.5, 100.0, 50.0);

        let (wx, wy) = t.to_world(60.0, 80.0);
        let (sx, sy) = t.to_screen(wx, wy);
        assert!((sx - 60.0).abs() < 1e-3);
        assert!((sy - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut t = ViewTransform::default();
        t.pan_by(10.0, 10.0);
        let anchor_world = t.to_world(200.0, 150.0);

        t.zoom_about(1.8, 200.0, 150.0);
        let after = t.to_world(200.0, 150.0);
        assert!((after.0 - anchor_world.0).abs() < 1e-3);
        assert!((after.1 - anchor_world.1).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut t = ViewTransform::default();
        t.zoom_about(1000.0, 0.0, 0.0);
        assert_eq!(t.k, MAX_SCALE);
        t.zoom_about(1e-6, 0.0, 0.0);
        assert_eq!(t.k, MIN_SCALE);
    }

    #[test]
    fn test_pan_accumulates() {
        let mut t = ViewTransform::default();
        t.pan_by(5.0, 0.0);
        t.pan_by(-2.0, 3.0);
        assert_eq!((t.x, t.y), (3.0, 3.0));
    }
}
