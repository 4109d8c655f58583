//! Repair of edges bounded by more than two faces.

use mesh_topology::{EdgeId, TriMesh};
use tracing::debug;

use crate::operation::RepairOperation;

/// How to resolve a non-manifold edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldStrategy {
    /// Duplicate a shared vertex for each extra incident face, detaching
    /// the extra fans from the edge. Keeps all geometry.
    Split,
    /// Delete the extra incident faces, keeping the first two.
    Collapse,
    /// Split long edges (above the mean edge length), collapse short
    /// ones.
    #[default]
    Auto,
}

/// Reduces every edge to at most two incident faces.
///
/// The first two faces around the edge stay attached. With the split
/// strategy, each further face is rebuilt onto a duplicate of the edge's
/// lower-indexed endpoint, which detaches its fan; with the collapse
/// strategy the extra faces are deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonManifoldEdgeRepair {
    /// Resolution strategy.
    pub strategy: NonManifoldStrategy,
}

impl NonManifoldEdgeRepair {
    /// With an explicit strategy.
    #[must_use]
    pub const fn with_strategy(strategy: NonManifoldStrategy) -> Self {
        Self { strategy }
    }

    fn offenders(mesh: &TriMesh) -> Vec<EdgeId> {
        mesh.edge_ids()
            .filter(|&e| mesh.edge(e).face_count() > 2)
            .collect()
    }

    fn resolve(&self, mesh: &TriMesh, e: EdgeId, mean_length: f64) -> NonManifoldStrategy {
        match self.strategy {
            NonManifoldStrategy::Auto => {
                if mesh.edge_length(e) > mean_length {
                    NonManifoldStrategy::Split
                } else {
                    NonManifoldStrategy::Collapse
                }
            }
            fixed => fixed,
        }
    }

    fn repair_edge(mesh: &mut TriMesh, e: EdgeId, strategy: NonManifoldStrategy) {
        let members: Vec<_> = mesh.edge(e).halfedges.iter().copied().collect();
        let (v0, v1) = mesh.edge_endpoints(e);
        let duplicate_source = if v0 <= v1 { v0 } else { v1 };

        // Everything beyond the first pair comes off the edge.
        for &h in members.iter().skip(2) {
            if !mesh.contains_halfedge(h) {
                continue;
            }
            let Some(f) = mesh.halfedge(h).face else {
                continue;
            };
            match strategy {
                NonManifoldStrategy::Split => {
                    let corners = mesh.face_vertices(f);
                    let fresh = mesh.add_vertex(mesh.position(duplicate_source));
                    let rebuilt =
                        corners.map(|v| if v == duplicate_source { fresh } else { v });
                    mesh.remove_face(f);
                    mesh.add_face(rebuilt);
                }
                NonManifoldStrategy::Collapse | NonManifoldStrategy::Auto => {
                    let corners = mesh.face_vertices(f);
                    mesh.remove_face(f);
                    for v in corners {
                        if mesh.contains_vertex(v) && mesh.is_isolated(v) {
                            let _ = mesh.remove_vertex(v);
                        }
                    }
                }
            }
        }
    }
}

impl RepairOperation for NonManifoldEdgeRepair {
    fn name(&self) -> &'static str {
        "non-manifold-edges"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        Self::offenders(mesh).len()
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        let offenders = Self::offenders(mesh);
        if offenders.is_empty() {
            return 0;
        }
        let mean_length = mesh.mean_edge_length();

        let mut fixed = 0;
        for e in offenders {
            if !mesh.contains_edge(e) || mesh.edge(e).face_count() <= 2 {
                continue;
            }
            let strategy = self.resolve(mesh, e, mean_length);
            Self::repair_edge(mesh, e, strategy);
            if !mesh.contains_edge(e) || mesh.edge(e).face_count() <= 2 {
                fixed += 1;
            }
        }
        if fixed > 0 {
            debug!("resolved {fixed} non-manifold edges");
        }
        fixed
    }
}
