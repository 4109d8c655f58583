//! Removal of duplicate faces.

use hashbrown::HashSet;
use mesh_topology::{FaceId, TriMesh};
use tracing::debug;

use crate::operation::RepairOperation;

/// Removes all but the first of any set of faces sharing the same
/// vertex triple.
///
/// The triple is canonicalized by sorting, so rotated and
/// reverse-wound copies count as duplicates too.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateFaceRemoval;

fn canonical(mesh: &TriMesh, f: FaceId) -> [u32; 3] {
    let [a, b, c] = mesh.face_vertices(f);
    let mut key = [a.index() as u32, b.index() as u32, c.index() as u32];
    key.sort_unstable();
    key
}

fn duplicates(mesh: &TriMesh) -> Vec<FaceId> {
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(mesh.face_count());
    let mut extras = Vec::new();
    for f in mesh.face_ids() {
        if !seen.insert(canonical(mesh, f)) {
            extras.push(f);
        }
    }
    extras
}

impl RepairOperation for DuplicateFaceRemoval {
    fn name(&self) -> &'static str {
        "duplicate-faces"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        duplicates(mesh).len()
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        let extras = duplicates(mesh);
        let removed = extras.len();
        let mut corners = Vec::with_capacity(removed * 3);
        for f in extras {
            corners.extend_from_slice(&mesh.face_vertices(f));
            mesh.remove_face(f);
        }
        for v in corners {
            if mesh.contains_vertex(v) && mesh.is_isolated(v) {
                let _ = mesh.remove_vertex(v);
            }
        }
        if removed > 0 {
            debug!("removed {removed} duplicate faces");
        }
        removed
    }
}
