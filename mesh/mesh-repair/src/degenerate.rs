//! Removal of degenerate faces.

use mesh_topology::{FaceId, TriMesh};
use rayon::prelude::*;
use tracing::debug;

use crate::operation::RepairOperation;

/// Removes faces with near-zero area or a repeated corner vertex.
///
/// Halfedges of removed faces are detached from their edges; edges left
/// without faces disappear with them.
#[derive(Debug, Clone, Copy)]
pub struct DegenerateFaceRemoval {
    /// Area below which a face counts as degenerate.
    pub area_threshold: f64,
}

impl Default for DegenerateFaceRemoval {
    fn default() -> Self {
        Self {
            area_threshold: 1e-10,
        }
    }
}

impl DegenerateFaceRemoval {
    /// With an explicit area threshold.
    #[must_use]
    pub const fn with_threshold(area_threshold: f64) -> Self {
        Self { area_threshold }
    }

    fn is_degenerate(&self, mesh: &TriMesh, f: FaceId) -> bool {
        let [a, b, c] = mesh.face_vertices(f);
        if a == b || b == c || a == c {
            return true;
        }
        mesh.face_area(f) < self.area_threshold
    }

    fn offenders(&self, mesh: &TriMesh) -> Vec<FaceId> {
        let faces: Vec<FaceId> = mesh.face_ids().collect();
        // Pure read-only scan over independent faces.
        faces
            .into_par_iter()
            .filter(|&f| self.is_degenerate(mesh, f))
            .collect()
    }
}

impl RepairOperation for DegenerateFaceRemoval {
    fn name(&self) -> &'static str {
        "degenerate-faces"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        self.offenders(mesh).len()
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        let offenders = self.offenders(mesh);
        let removed = offenders.len();
        let mut corners = Vec::with_capacity(removed * 3);
        for f in offenders {
            corners.extend_from_slice(&mesh.face_vertices(f));
            mesh.remove_face(f);
        }
        // Corners stranded by the removal go with their faces, so a
        // second pipeline pass finds nothing new.
        for v in corners {
            if mesh.contains_vertex(v) && mesh.is_isolated(v) {
                let _ = mesh.remove_vertex(v);
            }
        }
        if removed > 0 {
            debug!("removed {removed} degenerate faces");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_zero_area_face() {
        // A collapsed triangle (all corners at one point) next to a
        // valid one.
        let mut mesh = TriMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.5, 1.0, 0.0, //
                2.0, 2.0, 2.0, //
                2.0, 2.0, 2.0, //
                2.0, 2.0, 2.0,
            ],
            &[0, 1, 2, 3, 4, 5],
        )
        .unwrap();

        let op = DegenerateFaceRemoval::default();
        assert_eq!(op.detect(&mesh), 1);

        let stats = op.execute(&mut mesh);
        assert_eq!(stats.fixed, 1);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn removes_repeated_vertex_face() {
        let mut mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            &[0, 1, 2, 0, 0, 1],
        )
        .unwrap();

        let op = DegenerateFaceRemoval::default();
        assert_eq!(op.detect(&mesh), 1);
        assert_eq!(op.repair(&mut mesh), 1);
        assert_eq!(mesh.face_count(), 1);
        // The healthy face keeps its edges.
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn keeps_thin_but_valid_faces() {
        let mut mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 0.01, 0.0],
            &[0, 1, 2],
        )
        .unwrap();
        let stats = DegenerateFaceRemoval::default().execute(&mut mesh);
        assert_eq!(stats.found, 0);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn threshold_is_adjustable() {
        let mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 0.01, 0.0],
            &[0, 1, 2],
        )
        .unwrap();
        // Area is 0.05; a coarse threshold flags it.
        assert_eq!(DegenerateFaceRemoval::with_threshold(0.1).detect(&mesh), 1);
    }
}
