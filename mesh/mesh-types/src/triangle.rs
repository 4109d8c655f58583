//! Triangle type and the geometric predicates built on it.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Utility type for geometric calculations; stores positions rather than
/// indices. Winding is counter-clockwise when viewed from the front
/// (normal toward the viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle from coordinate arrays.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::new(v0[0], v0[1], v0[2]),
            v1: Point3::new(v1[0], v1[1], v1[2]),
            v2: Point3::new(v2[0], v2[1], v2[2]),
        }
    }

    /// Compute the unnormalized face normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding; the
    /// magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Compute the centroid.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Compute the lengths of the three edges.
    ///
    /// Returns `[len01, len12, len20]`.
    #[inline]
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Length of the shortest edge.
    #[inline]
    #[must_use]
    pub fn min_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.min(b).min(c)
    }

    /// Length of the longest edge.
    #[inline]
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.max(b).max(c)
    }

    /// Circumradius: the radius of the circle through all three vertices.
    ///
    /// `R = (a·b·c) / (4·A)`. Returns `f64::INFINITY` for degenerate
    /// triangles.
    #[must_use]
    pub fn circumradius(&self) -> f64 {
        let area = self.area();
        if area < 1e-300 {
            return f64::INFINITY;
        }
        let [a, b, c] = self.edge_lengths();
        (a * b * c) / (4.0 * area)
    }

    /// Inradius: the radius of the largest inscribed circle.
    ///
    /// `r = A / s` with `s` the semi-perimeter. Returns `0.0` for
    /// degenerate triangles.
    #[must_use]
    pub fn inradius(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        let s = (a + b + c) * 0.5;
        if s < 1e-300 {
            return 0.0;
        }
        self.area() / s
    }

    /// Shape quality measure `2·inradius / circumradius`, clamped to [0, 1].
    ///
    /// 1.0 for an equilateral triangle, 0.0 for a degenerate one.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let sqrt3 = 3.0_f64.sqrt();
    /// let equilateral = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(1.0, sqrt3, 0.0),
    /// );
    /// assert!((equilateral.quality() - 1.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn quality(&self) -> f64 {
        let circum = self.circumradius();
        if !circum.is_finite() || circum < 1e-300 {
            return 0.0;
        }
        (2.0 * self.inradius() / circum).clamp(0.0, 1.0)
    }

    /// Interior angle at vertex `index` (0, 1 or 2), in radians.
    ///
    /// Returns `0.0` when an adjacent edge has zero length.
    #[must_use]
    pub fn angle_at(&self, index: usize) -> f64 {
        let (apex, a, b) = match index {
            0 => (self.v0, self.v1, self.v2),
            1 => (self.v1, self.v2, self.v0),
            _ => (self.v2, self.v0, self.v1),
        };
        let u = a - apex;
        let w = b - apex;
        let lu = u.norm();
        let lw = w.norm();
        if lu < 1e-300 || lw < 1e-300 {
            return 0.0;
        }
        (u.dot(&w) / (lu * lw)).clamp(-1.0, 1.0).acos()
    }

    /// Cotangent of the interior angle at vertex `index`.
    ///
    /// `cot = dot / |cross|`. Returns `0.0` for degenerate corners where
    /// the cross product vanishes.
    #[must_use]
    pub fn cotangent_at(&self, index: usize) -> f64 {
        let (apex, a, b) = match index {
            0 => (self.v0, self.v1, self.v2),
            1 => (self.v1, self.v2, self.v0),
            _ => (self.v2, self.v0, self.v1),
        };
        let u = a - apex;
        let w = b - apex;
        let cross = u.cross(&w).norm();
        if cross < 1e-10 {
            return 0.0;
        }
        u.dot(&w) / cross
    }

    /// Closest point on the triangle to a query point.
    ///
    /// Walks the Voronoi regions of the triangle (vertices, edges, face)
    /// and returns the closest point in the region containing the query.
    #[must_use]
    pub fn closest_point(&self, point: Point3<f64>) -> Point3<f64> {
        let ab = self.v1 - self.v0;
        let ac = self.v2 - self.v0;
        let ap = point - self.v0;

        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        let bp = point - self.v1;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + ab * v;
        }

        let cp = point - self.v2;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + ab * v + ac * w
    }

    /// Distance from a query point to the triangle.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, point: Point3<f64>) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    /// Check whether a point lies inside the triangle.
    ///
    /// The point is projected onto the triangle's plane first; a point
    /// further than `epsilon` from the plane is rejected. Degenerate
    /// triangles contain nothing.
    #[must_use]
    pub fn contains_point(&self, point: Point3<f64>, epsilon: f64) -> bool {
        let Some(normal) = self.normal() else {
            return false;
        };
        let offset = (point - self.v0).dot(&normal);
        if offset.abs() > epsilon {
            return false;
        }
        let projected = point - normal * offset;

        // Same-side test against each edge in the triangle's plane.
        let edges = [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)];
        for (a, b) in edges {
            let side = (b - a).cross(&(projected - a)).dot(&normal);
            if side < -epsilon {
                return false;
            }
        }
        true
    }

    /// Aspect ratio: `longest_edge / shortest_altitude`.
    ///
    /// About 1.15 for an equilateral triangle, large for slivers,
    /// `f64::INFINITY` for degenerate ones.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let area = self.area();
        if area < f64::EPSILON {
            return f64::INFINITY;
        }
        let max_edge = self.max_edge_length();
        let shortest_altitude = 2.0 * area / max_edge;
        if shortest_altitude < f64::EPSILON {
            return f64::INFINITY;
        }
        max_edge / shortest_altitude
    }

    /// Check if the triangle is degenerate (area below `epsilon`).
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() < epsilon
    }

    /// Check if the vertices are nearly collinear.
    ///
    /// `epsilon` thresholds the sine of the angle between the two edges
    /// leaving `v0`.
    #[must_use]
    pub fn is_nearly_collinear(&self, epsilon: f64) -> bool {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let cross_magnitude = e1.cross(&e2).norm();
        let edge_product = e1.norm() * e2.norm();
        if edge_product < f64::EPSILON {
            return true;
        }
        cross_magnitude / edge_product < epsilon
    }

    /// Vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// The triangle with reversed winding (flipped normal).
    #[inline]
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            v0: self.v0,
            v1: self.v2,
            v2: self.v1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        )
    }

    fn equilateral() -> Triangle {
        let sqrt3 = 3.0_f64.sqrt();
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, sqrt3, 0.0),
        )
    }

    fn collinear() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        )
    }

    #[test]
    fn area_and_normal() {
        let tri = right_triangle();
        assert!((tri.area() - 6.0).abs() < 1e-10);
        let n = tri.normal().unwrap();
        assert!((n.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn degenerate_has_no_normal() {
        assert!(collinear().normal().is_none());
    }

    #[test]
    fn edge_lengths_3_4_5() {
        let lengths = right_triangle().edge_lengths();
        assert!((lengths[0] - 3.0).abs() < 1e-10);
        assert!((lengths[1] - 5.0).abs() < 1e-10);
        assert!((lengths[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn circumradius_of_right_triangle() {
        // Circumradius of a right triangle is half the hypotenuse.
        assert_relative_eq!(right_triangle().circumradius(), 2.5, epsilon = 1e-10);
    }

    #[test]
    fn inradius_of_right_triangle() {
        // r = (a + b - c) / 2 for a right triangle = (3 + 4 - 5) / 2 = 1.
        assert_relative_eq!(right_triangle().inradius(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn quality_equilateral_is_one() {
        assert_relative_eq!(equilateral().quality(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn quality_right_triangle() {
        // 2 * 1.0 / 2.5 = 0.8
        assert_relative_eq!(right_triangle().quality(), 0.8, epsilon = 1e-10);
    }

    #[test]
    fn quality_degenerate_is_zero() {
        assert!(collinear().quality().abs() < 1e-15);
    }

    #[test]
    fn angles_sum_to_pi() {
        let tri = right_triangle();
        let sum = tri.angle_at(0) + tri.angle_at(1) + tri.angle_at(2);
        assert!((sum - std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn cotangent_of_right_angle_is_zero() {
        let tri = right_triangle();
        // The angle at v0 is 90 degrees.
        assert!(tri.cotangent_at(0).abs() < 1e-10);
    }

    #[test]
    fn closest_point_regions() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        // Above the interior: projects straight down.
        let inside = tri.closest_point(Point3::new(0.25, 0.25, 1.0));
        assert!((inside - Point3::new(0.25, 0.25, 0.0)).norm() < 1e-10);

        // Beyond vertex v0.
        let corner = tri.closest_point(Point3::new(-1.0, -1.0, 0.0));
        assert!((corner - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-10);

        // Beside edge v0-v1.
        let edge = tri.closest_point(Point3::new(0.5, -1.0, 0.0));
        assert!((edge - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn contains_point_inside_and_out() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(tri.contains_point(Point3::new(0.25, 0.25, 0.0), 1e-9));
        assert!(!tri.contains_point(Point3::new(1.0, 1.0, 0.0), 1e-9));
        // Off the plane.
        assert!(!tri.contains_point(Point3::new(0.25, 0.25, 0.5), 1e-9));
    }

    #[test]
    fn aspect_ratio_degenerate() {
        assert!(collinear().aspect_ratio().is_infinite());
    }

    #[test]
    fn reversed_flips_normal() {
        let tri = right_triangle();
        let n1 = tri.normal().unwrap();
        let n2 = tri.reversed().normal().unwrap();
        assert!((n1 + n2).norm() < 1e-10);
    }
}
