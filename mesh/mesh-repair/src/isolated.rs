//! Removal of vertices nothing references.

use mesh_topology::{TriMesh, VertexId};
use tracing::debug;

use crate::operation::RepairOperation;

/// Removes vertices with no incident edges.
///
/// Isolated vertices come from imports that carry unreferenced points
/// and from operations that strip all faces around a vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsolatedVertexRemoval;

impl RepairOperation for IsolatedVertexRemoval {
    fn name(&self) -> &'static str {
        "isolated-vertices"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        mesh.vertex_ids().filter(|&v| mesh.is_isolated(v)).count()
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        let isolated: Vec<VertexId> = mesh
            .vertex_ids()
            .filter(|&v| mesh.is_isolated(v))
            .collect();

        let mut removed = 0;
        for v in isolated {
            if mesh.remove_vertex(v).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("removed {removed} isolated vertices");
        }
        removed
    }
}
