//! Aggregate statistics over the connectivity store.

use crate::elements::{EdgeKind, VertexKind};
use crate::mesh::TriMesh;

/// Element counts and derived flags for a connectivity store.
#[derive(Debug, Clone, Default)]
pub struct MeshStatistics {
    /// Live vertices.
    pub vertex_count: usize,
    /// Live undirected edges.
    pub edge_count: usize,
    /// Live halfedges.
    pub halfedge_count: usize,
    /// Live faces.
    pub face_count: usize,

    /// Edges with exactly one face.
    pub boundary_edges: usize,
    /// Edges with exactly two faces and no feature mark.
    pub manifold_edges: usize,
    /// User-marked feature edges.
    pub feature_edges: usize,
    /// Edges with more than two faces.
    pub non_manifold_edges: usize,

    /// Open-book vertices (on exactly two skeleton edges).
    pub open_book_vertices: usize,
    /// Branching vertices (position-fixed).
    pub branching_vertices: usize,

    /// Euler characteristic `V - E + F`.
    pub euler_characteristic: i64,
    /// No edge has more than two faces.
    pub is_manifold: bool,
    /// Some edge has exactly one face.
    pub has_boundary: bool,
    /// Mean triangle quality (`2r/R`).
    pub mean_quality: f64,
}

impl std::fmt::Display for MeshStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Mesh: {} verts, {} edges, {} faces (chi = {})",
            self.vertex_count, self.edge_count, self.face_count, self.euler_characteristic
        )?;
        writeln!(
            f,
            "  edges: {} manifold, {} boundary, {} feature, {} non-manifold",
            self.manifold_edges, self.boundary_edges, self.feature_edges, self.non_manifold_edges
        )?;
        writeln!(
            f,
            "  vertices: {} open-book, {} branching",
            self.open_book_vertices, self.branching_vertices
        )?;
        write!(f, "  mean quality: {:.3}", self.mean_quality)
    }
}

impl TriMesh {
    /// Collect element counts, classification tallies and derived flags.
    #[must_use]
    pub fn statistics(&self) -> MeshStatistics {
        let mut stats = MeshStatistics {
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            halfedge_count: self.halfedge_count(),
            face_count: self.face_count(),
            euler_characteristic: self.euler_characteristic(),
            is_manifold: true,
            has_boundary: false,
            mean_quality: self.mean_quality(),
            ..Default::default()
        };

        for e in self.edge_ids() {
            match self.edge(e).kind {
                EdgeKind::Boundary => {
                    stats.boundary_edges += 1;
                    stats.has_boundary = true;
                }
                EdgeKind::Manifold => stats.manifold_edges += 1,
                EdgeKind::Feature => stats.feature_edges += 1,
                EdgeKind::NonManifold => {
                    stats.non_manifold_edges += 1;
                    stats.is_manifold = false;
                }
            }
        }

        for v in self.vertex_ids() {
            match self.vertex(v).kind {
                VertexKind::OpenBook => stats.open_book_vertices += 1,
                VertexKind::SkeletonBranching | VertexKind::NonManifoldOther => {
                    stats.branching_vertices += 1;
                }
                VertexKind::Manifold => {}
            }
        }

        stats
    }
}
