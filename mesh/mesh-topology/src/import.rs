//! Construction of the connectivity store from the host container.

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::id::VertexId;
use crate::mesh::TriMesh;

impl TriMesh {
    /// Build connectivity from a host container.
    ///
    /// One vertex is allocated per container vertex; each triangle
    /// creates three halfedges wired into a loop and appended to their
    /// undirected edges, twins are paired per edge by direction, and
    /// edges and vertices are classified. Degenerate and duplicate
    /// triangles are accepted (they are defects for the repair pipeline,
    /// not import errors).
    ///
    /// # Errors
    ///
    /// [`TopologyError::MalformedInput`] when an index is out of range or
    /// a position is not finite.
    pub fn from_indexed_mesh(container: &IndexedMesh) -> TopologyResult<Self> {
        Self::from_indexed_mesh_with_features(container, &[])
    }

    /// Build connectivity and mark the listed vertex pairs as feature
    /// edges.
    ///
    /// Pairs that do not correspond to an edge of the imported surface
    /// are ignored. The feature mark dominates the manifold
    /// classification and survives remeshing splits of the edge.
    ///
    /// # Errors
    ///
    /// [`TopologyError::MalformedInput`] when an index is out of range or
    /// a position is not finite.
    pub fn from_indexed_mesh_with_features(
        container: &IndexedMesh,
        feature_edges: &[(u32, u32)],
    ) -> TopologyResult<Self> {
        let vertex_count = container.vertex_count();

        let mut mesh = Self::new();
        for (index, vertex) in container.vertices().enumerate() {
            if !vertex.is_finite() {
                return Err(TopologyError::MalformedInput {
                    reason: format!("vertex {index} has a non-finite position"),
                });
            }
            mesh.add_vertex(vertex.position);
        }

        for (face_index, face) in container.faces().enumerate() {
            for &corner in &face {
                if corner as usize >= vertex_count {
                    return Err(TopologyError::MalformedInput {
                        reason: format!(
                            "face {face_index} references vertex {corner} but only {vertex_count} vertices exist"
                        ),
                    });
                }
            }
            mesh.add_face([
                VertexId::new(face[0] as usize),
                VertexId::new(face[1] as usize),
                VertexId::new(face[2] as usize),
            ]);
        }

        let mut marked = 0usize;
        for &(a, b) in feature_edges {
            if (a as usize) < vertex_count && (b as usize) < vertex_count {
                let va = VertexId::new(a as usize);
                let vb = VertexId::new(b as usize);
                if mesh.mark_feature_edge(va, vb) {
                    marked += 1;
                }
            }
        }

        mesh.classify_all();

        debug!(
            "imported {} vertices, {} faces, {} edges ({} feature)",
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.edge_count(),
            marked,
        );

        Ok(mesh)
    }

    /// Build connectivity from flat position and index arrays.
    ///
    /// # Errors
    ///
    /// [`TopologyError::MalformedInput`] when either array's length is
    /// not divisible by 3, an index is out of range, or a position is not
    /// finite.
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> TopologyResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(TopologyError::MalformedInput {
                reason: format!(
                    "position array length {} is not divisible by 3",
                    positions.len()
                ),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(TopologyError::MalformedInput {
                reason: format!("index array length {} is not divisible by 3", indices.len()),
            });
        }
        Self::from_indexed_mesh(&IndexedMesh::from_raw(positions, indices))
    }
}
