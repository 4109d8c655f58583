//! Edge flip and the Delaunay pass.

use nalgebra::Vector3;

use crate::elements::EdgeKind;
use crate::error::TopologyError;
use crate::id::EdgeId;
use crate::mesh::TriMesh;
use crate::TopologyResult;

/// Absolute epsilon for the sign tests of the convex-quad check. Signs
/// smaller than this are ambiguous and the flip is rejected rather than
/// committed.
const CONVEXITY_EPSILON: f64 = 1e-10;

impl TriMesh {
    /// Flip a manifold interior edge, replacing it by the opposite
    /// diagonal of the quadrilateral formed by its two faces.
    ///
    /// Preconditions: the edge is classified `Manifold` (two faces, no
    /// feature mark), both endpoints keep degree > 1, the diagonal does
    /// not already exist, and the quadrilateral is strictly convex when
    /// projected along the averaged face normal. Near-degenerate sign
    /// configurations are rejected rather than committed.
    ///
    /// Returns the id of the new diagonal edge.
    ///
    /// # Errors
    ///
    /// [`TopologyError::NotFlippable`] with the failed precondition, or
    /// [`TopologyError::MissingNeighbor`] when the two halfedges do not
    /// run in opposite directions (corrupted orientation).
    ///
    /// # Panics
    ///
    /// Panics when `e` is stale.
    pub fn flip_edge(&mut self, e: EdgeId) -> TopologyResult<EdgeId> {
        if self.edge(e).kind != EdgeKind::Manifold {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "only manifold interior edges can flip",
            });
        }

        let h0 = self.edge(e).halfedges[0];
        let h1 = self.edge(e).halfedges[1];
        if self.target(h0) == self.target(h1) {
            // Same direction on the same edge: the surrounding faces are
            // inconsistently oriented and there is no usable twin.
            return Err(TopologyError::MissingNeighbor { halfedge: h0 });
        }

        let a = self.source(h0);
        let b = self.target(h0);
        let c = self.target(self.next(h0));
        let d = self.target(self.next(h1));

        if c == d {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "opposite corners coincide",
            });
        }
        if self.edge_between(c, d).is_some() {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "diagonal already exists",
            });
        }
        if self.vertex_degree(a) <= 1 || self.vertex_degree(b) <= 1 {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "endpoint degree too low",
            });
        }

        let f0 = self.halfedge(h0).face;
        let f1 = self.halfedge(h1).face;
        let (Some(f0), Some(f1)) = (f0, f1) else {
            return Err(TopologyError::MissingNeighbor { halfedge: h0 });
        };

        let (Some(n0), Some(n1)) = (self.face_normal(f0), self.face_normal(f1)) else {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "degenerate incident face",
            });
        };
        let normal = n0 + n1;
        if normal.norm() < CONVEXITY_EPSILON {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "folded configuration",
            });
        }
        let normal = normal.normalize();

        if !self.quad_is_convex(a, b, c, d, &normal) {
            return Err(TopologyError::NotFlippable {
                edge: e,
                reason: "quad is not convex",
            });
        }

        // Rebuild on the other diagonal, preserving winding:
        // (a, b, c) + (b, a, d) becomes (a, d, c) + (d, b, c).
        let marks = self.snapshot_features(&[f0, f1]);
        self.remove_face(f0);
        self.remove_face(f1);
        self.add_face([a, d, c]);
        self.add_face([d, b, c]);
        self.restore_features(&marks, |v| v);

        self.edge_between(c, d)
            .ok_or(TopologyError::MissingNeighbor { halfedge: h0 })
    }

    /// Convexity of the quad `a-d-b-c` projected along `normal`: the two
    /// diagonals must strictly separate the opposite vertex pairs.
    fn quad_is_convex(
        &self,
        a: crate::VertexId,
        b: crate::VertexId,
        c: crate::VertexId,
        d: crate::VertexId,
        normal: &Vector3<f64>,
    ) -> bool {
        let pa = self.position(a);

        // Orthonormal basis of the projection plane.
        let e1 = self.position(b) - pa;
        let u = e1 - normal * e1.dot(normal);
        if u.norm() < CONVEXITY_EPSILON {
            return false;
        }
        let u = u.normalize();
        let w = normal.cross(&u);

        let project = |v: crate::VertexId| {
            let rel = self.position(v) - pa;
            (rel.dot(&u), rel.dot(&w))
        };
        let pa2 = (0.0, 0.0);
        let pb2 = project(b);
        let pc2 = project(c);
        let pd2 = project(d);

        let cross =
            |o: (f64, f64), p: (f64, f64), q: (f64, f64)| -> f64 {
                (p.0 - o.0) * (q.1 - o.1) - (p.1 - o.1) * (q.0 - o.0)
            };

        // c and d on opposite sides of a-b, a and b on opposite sides of
        // c-d, both strictly.
        let side_c = cross(pa2, pb2, pc2);
        let side_d = cross(pa2, pb2, pd2);
        if side_c.abs() < CONVEXITY_EPSILON || side_d.abs() < CONVEXITY_EPSILON {
            return false;
        }
        if side_c.signum() == side_d.signum() {
            return false;
        }

        let side_a = cross(pc2, pd2, pa2);
        let side_b = cross(pc2, pd2, pb2);
        if side_a.abs() < CONVEXITY_EPSILON || side_b.abs() < CONVEXITY_EPSILON {
            return false;
        }
        side_a.signum() != side_b.signum()
    }

    /// Whether an edge satisfies the local Delaunay condition: the two
    /// angles opposite it sum to at most pi. Edges without exactly two
    /// faces are vacuously Delaunay.
    #[must_use]
    pub fn is_delaunay(&self, e: EdgeId) -> bool {
        let edge = self.edge(e);
        if edge.halfedges.len() != 2 {
            return true;
        }
        let h0 = edge.halfedges[0];
        let h1 = edge.halfedges[1];
        let (v0, v1) = self.edge_endpoints(e);

        let c = self.target(self.next(h0));
        let d = self.target(self.next(h1));

        let angle = |apex: crate::VertexId| {
            let p = self.position(apex);
            let u = self.position(v0) - p;
            let w = self.position(v1) - p;
            let lu = u.norm();
            let lw = w.norm();
            if lu < 1e-300 || lw < 1e-300 {
                return 0.0;
            }
            (u.dot(&w) / (lu * lw)).clamp(-1.0, 1.0).acos()
        };

        angle(c) + angle(d) <= std::f64::consts::PI + 1e-10
    }

    /// Repeatedly scan all edges and flip the non-Delaunay flippable
    /// ones until a full pass changes nothing or the flip budget
    /// (10x the edge count) runs out. Returns the number of flips.
    pub fn delaunay_pass(&mut self) -> usize {
        let budget = self.edge_count().saturating_mul(10);
        let mut flips = 0;

        loop {
            let mut flipped_this_pass = 0;
            let edge_ids: Vec<EdgeId> = self.edge_ids().collect();
            for e in edge_ids {
                if flips + flipped_this_pass >= budget {
                    break;
                }
                if !self.contains_edge(e) || self.is_delaunay(e) {
                    continue;
                }
                if self.flip_edge(e).is_ok() {
                    flipped_this_pass += 1;
                }
            }

            flips += flipped_this_pass;
            if flipped_this_pass == 0 || flips >= budget {
                break;
            }
        }

        flips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::VertexId;
    use mesh_types::IndexedMesh;

    fn quad() -> TriMesh {
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        );
        TriMesh::from_indexed_mesh(&container).unwrap()
    }

    #[test]
    fn flip_replaces_diagonal() {
        let mut mesh = quad();
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();

        let (v, e, f) = (mesh.vertex_count(), mesh.edge_count(), mesh.face_count());
        let euler = mesh.euler_characteristic();

        let new_edge = mesh.flip_edge(diagonal).unwrap();

        assert_eq!(mesh.vertex_count(), v);
        assert_eq!(mesh.edge_count(), e);
        assert_eq!(mesh.face_count(), f);
        assert_eq!(mesh.euler_characteristic(), euler);

        let (a, b) = mesh.edge_endpoints(new_edge);
        let mut pair = [a, b];
        pair.sort();
        assert_eq!(pair, [VertexId::new(1), VertexId::new(3)]);
        assert!(mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .is_none());
    }

    #[test]
    fn flip_preserves_winding() {
        let mut mesh = quad();
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        mesh.flip_edge(diagonal).unwrap();

        // All faces keep the +Z normal of the original planar quad.
        for f in mesh.face_ids() {
            let n = mesh.face_normal(f).unwrap();
            assert!(n.z > 0.99);
        }
    }

    #[test]
    fn flip_rejects_boundary_edge() {
        let mut mesh = quad();
        let boundary = mesh
            .edge_between(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert!(matches!(
            mesh.flip_edge(boundary),
            Err(TopologyError::NotFlippable { .. })
        ));
    }

    #[test]
    fn flip_rejects_feature_edge() {
        let mut mesh = quad();
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        mesh.set_feature(diagonal, true);
        assert!(matches!(
            mesh.flip_edge(diagonal),
            Err(TopologyError::NotFlippable { .. })
        ));
    }

    #[test]
    fn flip_rejects_non_convex_quad() {
        // A chevron: vertex 3 pulled inside the triangle 0-1-2, so the
        // quad around the diagonal (0, 2) is not convex.
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.5, 1.0, 0.0, //
                0.45, 0.4, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        );
        let mut mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        assert!(matches!(
            mesh.flip_edge(diagonal),
            Err(TopologyError::NotFlippable {
                reason: "quad is not convex",
                ..
            })
        ));
    }

    #[test]
    fn delaunay_detects_bad_diagonal() {
        // A thin kite triangulated on its long diagonal: the opposite
        // angles exceed pi, so the diagonal is not Delaunay.
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, -0.05, 0.0, //
                2.0, 0.0, 0.0, //
                1.0, 0.05, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        );
        let mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let long_diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        assert!(!mesh.is_delaunay(long_diagonal));
    }

    #[test]
    fn delaunay_pass_fixes_bad_diagonal() {
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, -0.05, 0.0, //
                2.0, 0.0, 0.0, //
                1.0, 0.05, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        );
        let mut mesh = TriMesh::from_indexed_mesh(&container).unwrap();

        let flips = mesh.delaunay_pass();
        assert_eq!(flips, 1);

        // The short diagonal is now present and every edge is Delaunay.
        assert!(mesh
            .edge_between(VertexId::new(1), VertexId::new(3))
            .is_some());
        for e in mesh.edge_ids() {
            assert!(mesh.is_delaunay(e));
        }
    }

    #[test]
    fn delaunay_pass_is_idempotent() {
        let mut mesh = quad();
        let first = mesh.delaunay_pass();
        let second = mesh.delaunay_pass();
        let _ = first;
        assert_eq!(second, 0);
    }
}
