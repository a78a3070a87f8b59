//! Barycentric mapping between compositions and an equilateral triangle in
//! screen space. Screen y grows downward; the apex is 100% clay, the bottom
//! left corner 100% sand, the bottom right corner 100% silt.

use serde::{Deserialize, Serialize};

use crate::composition::Composition;

/// A point in the rendering surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The three corners of the diagram triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triangle {
    pub top: ScreenPoint,
    pub bottom_left: ScreenPoint,
    pub bottom_right: ScreenPoint,
}

impl Triangle {
    /// Equilateral triangle with side `size` whose centroid sits at `center`.
    pub fn new(center: ScreenPoint, size: f64) -> Self {
        let h = size * 3f64.sqrt() / 2.0;
        Self {
            top: ScreenPoint::new(center.x, center.y - 2.0 * h / 3.0),
            bottom_left: ScreenPoint::new(center.x - size / 2.0, center.y + h / 3.0),
            bottom_right: ScreenPoint::new(center.x + size / 2.0, center.y + h / 3.0),
        }
    }

    /// Corners in drawing order: top, bottom left, bottom right.
    pub fn vertices(&self) -> [ScreenPoint; 3] {
        [self.top, self.bottom_left, self.bottom_right]
    }

    /// Weighted sum of the corners. Components need not sum to 1.
    pub fn forward(&self, c: Composition) -> ScreenPoint {
        ScreenPoint::new(
            c.clay * self.top.x + c.sand * self.bottom_left.x + c.silt * self.bottom_right.x,
            c.clay * self.top.y + c.sand * self.bottom_left.y + c.silt * self.bottom_right.y,
        )
    }

    /// Solve for the barycentric weights of `p`.
    ///
    /// With `p - BR = clay·(T - BR) + sand·(BL - BR)` the system is 2×2 and
    /// solved by Cramer's rule; silt takes the remainder. The result is
    /// unconstrained: points outside the triangle yield negative components.
    /// A degenerate (zero-area) triangle yields NaN components.
    pub fn inverse(&self, p: ScreenPoint) -> Composition {
        let u = self.top.sub(self.bottom_right);
        let v = self.bottom_left.sub(self.bottom_right);
        let d = p.sub(self.bottom_right);

        let det = u.x * v.y - u.y * v.x;
        if det.abs() < f64::EPSILON {
            return Composition::new(f64::NAN, f64::NAN, f64::NAN);
        }

        let clay = (d.x * v.y - d.y * v.x) / det;
        let sand = (u.x * d.y - u.y * d.x) / det;
        Composition::new(clay, 1.0 - clay - sand, sand)
    }
}

/// Project a composition into a triangle of side `size` centered at `center`.
pub fn forward(composition: Composition, center: ScreenPoint, size: f64) -> ScreenPoint {
    Triangle::new(center, size).forward(composition)
}

/// Recover the composition under `point` for a triangle of side `size`
/// centered at `center`.
pub fn inverse(point: ScreenPoint, center: ScreenPoint, size: f64) -> Composition {
    Triangle::new(center, size).inverse(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const CENTER: ScreenPoint = ScreenPoint::new(250.0, 240.0);
    const SIZE: f64 = 400.0;

    #[test]
    fn corners_map_to_pure_fractions() {
        let t = Triangle::new(CENTER, SIZE);
        assert_eq!(t.forward(Composition::new(1.0, 0.0, 0.0)), t.top);
        assert_eq!(t.forward(Composition::new(0.0, 0.0, 1.0)), t.bottom_left);
        assert_eq!(t.forward(Composition::new(0.0, 1.0, 0.0)), t.bottom_right);
    }

    #[test]
    fn triangle_is_equilateral_and_centered() {
        let t = Triangle::new(CENTER, SIZE);
        let side = |a: ScreenPoint, b: ScreenPoint| ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        assert_abs_diff_eq!(side(t.top, t.bottom_left), SIZE, epsilon = 1e-9);
        assert_abs_diff_eq!(side(t.bottom_left, t.bottom_right), SIZE, epsilon = 1e-9);
        assert_abs_diff_eq!(side(t.bottom_right, t.top), SIZE, epsilon = 1e-9);

        let third = Composition::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        let centroid = t.forward(third);
        assert_abs_diff_eq!(centroid.x, CENTER.x, epsilon = 1e-9);
        assert_abs_diff_eq!(centroid.y, CENTER.y, epsilon = 1e-9);
    }

    #[test]
    fn inverse_recovers_interior_compositions() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let mut a: f64 = rng.gen_range(0.001..0.999);
            let mut b: f64 = rng.gen_range(0.001..0.999);
            if a + b >= 0.999 {
                a = 1.0 - a;
                b = 1.0 - b;
            }
            let c = Composition::new(a, b, 1.0 - a - b);

            let back = inverse(forward(c, CENTER, SIZE), CENTER, SIZE);
            assert_abs_diff_eq!(back.clay, c.clay, epsilon = 1e-6);
            assert_abs_diff_eq!(back.silt, c.silt, epsilon = 1e-6);
            assert_abs_diff_eq!(back.sand, c.sand, epsilon = 1e-6);
        }
    }

    #[test]
    fn points_outside_yield_negative_components() {
        let t = Triangle::new(CENTER, SIZE);
        // Above the apex: beyond 100% clay.
        let above = t.inverse(ScreenPoint::new(t.top.x, t.top.y - 50.0));
        assert!(above.clay > 1.0);
        assert!(above.has_negative());

        // Below the base.
        let below = t.inverse(ScreenPoint::new(CENTER.x, t.bottom_left.y + 10.0));
        assert!(below.clay < 0.0);
    }

    #[test]
    fn degenerate_triangle_yields_nan() {
        let c = inverse(ScreenPoint::new(1.0, 1.0), CENTER, 0.0);
        assert!(!c.is_finite());
    }
}
