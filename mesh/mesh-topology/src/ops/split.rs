//! Edge split.

use nalgebra::Point3;

use crate::id::{EdgeId, FaceId, VertexId};
use crate::mesh::TriMesh;
use crate::TopologyResult;

impl TriMesh {
    /// Split an edge at parameter `t` in [0, 1], inserting a new vertex.
    ///
    /// Every face incident to the edge is subdivided into two triangles
    /// joining the new vertex to the face's opposite corner, so the split
    /// works identically for boundary, manifold and non-manifold edges.
    /// A user feature mark on the edge is inherited by both halves;
    /// affected vertices are reclassified.
    ///
    /// Returns the id of the inserted vertex.
    ///
    /// # Errors
    ///
    /// Infallible today; the `Result` reserves room for guards shared
    /// with the other operators.
    ///
    /// # Panics
    ///
    /// Panics when `e` is stale.
    pub fn split_edge(&mut self, e: EdgeId, t: f64) -> TopologyResult<VertexId> {
        let t = t.clamp(0.0, 1.0);
        let (v0, v1) = self.edge_endpoints(e);
        let was_feature = self.edge(e).feature;

        let p0 = self.position(v0);
        let p1 = self.position(v1);
        let midpoint = Point3::from(p0.coords.lerp(&p1.coords, t));

        // One (face, oriented triple) entry per incident face. The triple
        // is oriented so its first two corners run along the edge in the
        // face's own winding.
        let mut patch: Vec<(FaceId, [VertexId; 3])> = Vec::new();
        let members: Vec<_> = self.edge(e).halfedges.iter().copied().collect();
        for h in members {
            let Some(f) = self.halfedge(h).face else {
                continue;
            };
            if patch.iter().any(|&(face, _)| face == f) {
                continue;
            }
            let a = self.source(h);
            let b = self.target(h);
            let c = self.target(self.next(h));
            patch.push((f, [a, b, c]));
        }

        let faces: Vec<FaceId> = patch.iter().map(|&(f, _)| f).collect();
        let marks = self.snapshot_features(&faces);

        for &f in &faces {
            self.remove_face(f);
        }
        debug_assert!(!self.contains_edge(e), "split edge must die with its faces");

        let m = self.add_vertex(midpoint);
        for &(_, [a, b, c]) in &patch {
            self.add_face([a, m, c]);
            self.add_face([m, b, c]);
        }

        // Surviving perimeter edges that were rebuilt keep their marks,
        // and both halves inherit the split edge's mark.
        self.restore_features(&marks, |v| v);
        if was_feature {
            for half in [(v0, m), (m, v1)] {
                if let Some(half_edge) = self.edge_between(half.0, half.1) {
                    self.set_feature(half_edge, true);
                }
            }
        }

        self.classify_vertex(m);
        Ok(m)
    }
}
