//! A single skeleton segment with arc-length parameterization.

use mesh_topology::{EdgeId, VertexId};
use nalgebra::Point3;

/// Closest point on a segment, with its arc-length parameter.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// The closest point on the segment's polyline.
    pub point: Point3<f64>,
    /// Normalized arc-length parameter in [0, 1].
    pub t: f64,
    /// Distance from the query point.
    pub distance: f64,
}

/// An ordered run of vertices connected by skeleton edges.
///
/// Open segments run between two branching vertices; closed segments are
/// loops with no branching vertex (the first vertex is not repeated at
/// the end). Positions are snapshotted at extraction time so the cached
/// arc lengths stay consistent with the geometry being projected onto.
#[derive(Debug, Clone)]
pub struct SkeletonSegment {
    /// Vertices along the segment, in path order.
    pub vertices: Vec<VertexId>,
    /// The skeleton edges connecting consecutive vertices (for a closed
    /// segment, the last edge connects back to the first vertex).
    pub edges: Vec<EdgeId>,
    /// Vertex positions at extraction time, aligned with `vertices`.
    pub positions: Vec<Point3<f64>>,
    /// Cumulative arc length at each vertex; starts at 0.
    pub arc_lengths: Vec<f64>,
    /// Whether the segment is a closed loop.
    pub closed: bool,
}

impl SkeletonSegment {
    pub(crate) fn build(
        vertices: Vec<VertexId>,
        edges: Vec<EdgeId>,
        positions: Vec<Point3<f64>>,
        closed: bool,
    ) -> Self {
        let mut arc_lengths = Vec::with_capacity(positions.len());
        let mut running = 0.0;
        arc_lengths.push(0.0);
        for pair in positions.windows(2) {
            running += (pair[1] - pair[0]).norm();
            arc_lengths.push(running);
        }

        Self {
            vertices,
            edges,
            positions,
            arc_lengths,
            closed,
        }
    }

    /// Number of edges in the segment.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Total arc length, including the closing edge of a loop.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        let open_length = self.arc_lengths.last().copied().unwrap_or(0.0);
        if self.closed && self.positions.len() > 1 {
            let first = self.positions[0];
            let last = self.positions[self.positions.len() - 1];
            open_length + (first - last).norm()
        } else {
            open_length
        }
    }

    /// Project a point onto the segment's polyline.
    ///
    /// Returns the closest point across all segment edges together with
    /// its normalized arc-length parameter, or `None` for a segment with
    /// fewer than two vertices.
    #[must_use]
    pub fn project(&self, point: Point3<f64>) -> Option<SegmentProjection> {
        if self.positions.len() < 2 {
            return None;
        }
        let total = self.total_length();
        if total <= 0.0 {
            return Some(SegmentProjection {
                point: self.positions[0],
                t: 0.0,
                distance: (point - self.positions[0]).norm(),
            });
        }

        let mut best: Option<SegmentProjection> = None;
        let count = self.positions.len();
        let pair_count = if self.closed { count } else { count - 1 };

        for i in 0..pair_count {
            let a = self.positions[i];
            let b = self.positions[(i + 1) % count];
            let (candidate, local_t) = closest_on_segment(point, a, b);
            let arc = self.arc_lengths[i] + local_t * (b - a).norm();
            let distance = (point - candidate).norm();

            let better = best.as_ref().map_or(true, |b| distance < b.distance);
            if better {
                best = Some(SegmentProjection {
                    point: candidate,
                    t: (arc / total).clamp(0.0, 1.0),
                    distance,
                });
            }
        }
        best
    }
}

/// Closest point on the 3D segment `a`-`b`, with the local parameter.
fn closest_on_segment(p: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> (Point3<f64>, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-300 {
        return (a, 0.0);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}
