//! Tangential vertex relocation.

use nalgebra::Point3;

use crate::error::TopologyError;
use crate::id::VertexId;
use crate::mesh::TriMesh;
use crate::{TopologyResult, MIN_FACE_AREA};

impl TriMesh {
    /// The unconstrained tangential smoothing target for a vertex: the
    /// centroid of its 1-ring, projected onto the tangent plane whose
    /// normal is the area-weighted average of the incident face normals.
    ///
    /// Returns `None` for isolated vertices. When every incident face is
    /// degenerate there is no usable tangent plane and the plain centroid
    /// is returned.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tangential_target(&self, v: VertexId) -> Option<Point3<f64>> {
        let neighbors = self.vertex_neighbors(v);
        if neighbors.is_empty() {
            return None;
        }

        let mut centroid = Point3::origin();
        for &n in &neighbors {
            centroid += self.position(n).coords;
        }
        let centroid = Point3::from(centroid.coords / neighbors.len() as f64);

        let Some(normal) = self.vertex_normal(v) else {
            return Some(centroid);
        };

        let offset = (centroid - self.position(v)).dot(&normal);
        Some(centroid - normal * offset)
    }

    /// Move a vertex to `target` if no incident face collapses.
    ///
    /// Incident edge lengths are refreshed on success.
    ///
    /// # Errors
    ///
    /// [`TopologyError::RelocationInvalid`] when the target is not finite
    /// or any incident face would drop below the minimum area.
    pub fn relocate_vertex(&mut self, v: VertexId, target: Point3<f64>) -> TopologyResult<()> {
        if !(target.x.is_finite() && target.y.is_finite() && target.z.is_finite()) {
            return Err(TopologyError::RelocationInvalid { vertex: v });
        }

        for f in self.vertex_faces(v) {
            let mut tri = self.face_triangle(f);
            let [a, b, c] = self.face_vertices(f);
            if a == v {
                tri.v0 = target;
            }
            if b == v {
                tri.v1 = target;
            }
            if c == v {
                tri.v2 = target;
            }
            if tri.area() < MIN_FACE_AREA {
                return Err(TopologyError::RelocationInvalid { vertex: v });
            }
        }

        self.set_position(v, target);
        Ok(())
    }

    /// One damped tangential smoothing step for a vertex.
    ///
    /// Position-fixed vertices (branching and externally-marked kinds)
    /// and isolated vertices are left alone; the call reports whether the
    /// vertex moved. The step applies no skeleton constraint: callers
    /// smoothing open-book vertices project the damped target onto the
    /// vertex's skeleton segment first and then use
    /// [`TriMesh::relocate_vertex`] directly.
    ///
    /// # Errors
    ///
    /// [`TopologyError::RelocationInvalid`] when the damped target would
    /// degenerate an incident face.
    pub fn smooth_vertex(&mut self, v: VertexId, damping: f64) -> TopologyResult<bool> {
        if self.vertex(v).kind.is_position_fixed() {
            return Ok(false);
        }
        let Some(target) = self.tangential_target(v) else {
            return Ok(false);
        };

        let current = self.position(v);
        let damped = Point3::from(current.coords.lerp(&target.coords, damping.clamp(0.0, 1.0)));
        self.relocate_vertex(v, damped)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::IndexedMesh;

    /// A planar fan around a center vertex pulled off-center.
    fn fan() -> (TriMesh, VertexId) {
        let container = IndexedMesh::from_raw(
            &[
                0.3, 0.2, 0.0, // center, off the centroid of the ring
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                -1.0, 0.0, 0.0, //
                0.0, -1.0, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1],
        );
        let mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        (mesh, VertexId::new(0))
    }

    #[test]
    fn target_is_ring_centroid_in_plane() {
        let (mesh, center) = fan();
        let target = mesh.tangential_target(center).unwrap();
        // The ring centroid is the origin and the fan is planar.
        assert!(target.coords.norm() < 1e-12);
    }

    #[test]
    fn smoothing_moves_center_toward_centroid() {
        let (mut mesh, center) = fan();
        let before = mesh.position(center).coords.norm();

        let moved = mesh.smooth_vertex(center, 0.5).unwrap();
        assert!(moved);

        let after = mesh.position(center);
        // Half-way to the origin with damping 0.5.
        assert!((after.x - 0.15).abs() < 1e-12);
        assert!((after.y - 0.1).abs() < 1e-12);
        assert!(after.coords.norm() < before);
    }

    #[test]
    fn smoothing_stays_in_tangent_plane() {
        // A shallow pyramid: the apex target is projected back onto the
        // tangent plane, not dragged straight to the base centroid.
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.5, // apex
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                -1.0, 0.0, 0.0, //
                0.0, -1.0, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1],
        );
        let mut mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let apex = VertexId::new(0);
        let z_before = mesh.position(apex).z;

        mesh.smooth_vertex(apex, 1.0).unwrap();

        // By symmetry the apex normal is +Z and the ring centroid sits
        // directly below the apex, so the tangential move is zero.
        assert!((mesh.position(apex).z - z_before).abs() < 1e-12);
    }

    #[test]
    fn fixed_vertices_do_not_move() {
        // The seam's shared endpoints are branching and must stay put.
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.5, 1.0, 0.0, //
                0.5, -1.0, 0.0, //
                0.5, 0.5, 1.0,
            ],
            &[0, 1, 2, 0, 1, 3, 0, 1, 4],
        );
        let mut mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let v0 = VertexId::new(0);
        let before = mesh.position(v0);

        let moved = mesh.smooth_vertex(v0, 0.5).unwrap();
        assert!(!moved);
        assert!((mesh.position(v0) - before).norm() < 1e-15);
    }

    #[test]
    fn relocation_rejects_degenerating_moves() {
        let (mut mesh, center) = fan();
        // Moving the center onto a ring vertex flattens two fan faces.
        let onto_ring = mesh.position(VertexId::new(1));
        assert!(matches!(
            mesh.relocate_vertex(center, onto_ring),
            Err(TopologyError::RelocationInvalid { .. })
        ));
        // The vertex did not move.
        assert!((mesh.position(center).x - 0.3).abs() < 1e-12);
    }

    #[test]
    fn relocation_rejects_non_finite_target() {
        let (mut mesh, center) = fan();
        assert!(matches!(
            mesh.relocate_vertex(center, Point3::new(f64::NAN, 0.0, 0.0)),
            Err(TopologyError::RelocationInvalid { .. })
        ));
    }

    #[test]
    fn relocation_updates_edge_lengths() {
        let (mut mesh, center) = fan();
        mesh.relocate_vertex(center, Point3::origin()).unwrap();
        for &e in mesh.incident_edges(center) {
            assert!((mesh.edge_length(e) - 1.0).abs() < 1e-12);
        }
    }
}
