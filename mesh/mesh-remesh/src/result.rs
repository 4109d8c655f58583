//! Result types for the remeshing loop.

#![allow(clippy::cast_precision_loss)]

use mesh_topology::TriMesh;
use mesh_types::IndexedMesh;

/// Edge length statistics over a mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeStatistics {
    /// Shortest edge.
    pub min_length: f64,
    /// Longest edge.
    pub max_length: f64,
    /// Mean edge length.
    pub avg_length: f64,
    /// Standard deviation of edge lengths.
    pub std_dev: f64,
    /// Number of edges measured.
    pub edge_count: usize,
}

impl EdgeStatistics {
    /// Measure the cached edge lengths of a connectivity store.
    #[must_use]
    pub fn measure(mesh: &TriMesh) -> Self {
        let lengths: Vec<f64> = mesh.edge_ids().map(|e| mesh.edge_length(e)).collect();
        if lengths.is_empty() {
            return Self::default();
        }

        let min_length = lengths.iter().copied().fold(f64::INFINITY, f64::min);
        let max_length = lengths.iter().copied().fold(0.0, f64::max);
        let avg_length = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance = lengths
            .iter()
            .map(|&l| (l - avg_length).powi(2))
            .sum::<f64>()
            / lengths.len() as f64;

        Self {
            min_length,
            max_length,
            avg_length,
            std_dev: variance.sqrt(),
            edge_count: lengths.len(),
        }
    }
}

/// Everything the loop counted, measured before and after.
#[derive(Debug, Clone, Default)]
pub struct RemeshReport {
    /// Vertices before remeshing.
    pub original_vertices: usize,
    /// Faces before remeshing.
    pub original_faces: usize,
    /// Vertices after remeshing.
    pub final_vertices: usize,
    /// Faces after remeshing.
    pub final_faces: usize,

    /// Iterations actually run (early exit on convergence).
    pub iterations_used: u32,
    /// Edge splits performed.
    pub splits: usize,
    /// Edge collapses performed.
    pub collapses: usize,
    /// Collapses rejected by the link condition or pinned endpoints.
    pub collapses_rejected: usize,
    /// Delaunay flips performed.
    pub flips: usize,
    /// Vertices moved by smoothing.
    pub smooth_moves: usize,

    /// The resolved target edge length the loop ran with.
    pub target_edge_length: f64,
    /// Mean triangle quality before.
    pub mean_quality_before: f64,
    /// Mean triangle quality after.
    pub mean_quality_after: f64,
    /// Faces below the quality threshold before.
    pub below_quality_before: usize,
    /// Faces below the quality threshold after.
    pub below_quality_after: usize,

    /// Edge statistics before.
    pub edge_stats_before: EdgeStatistics,
    /// Edge statistics after.
    pub edge_stats_after: EdgeStatistics,
}

impl RemeshReport {
    /// Whether any topological operation was performed.
    #[must_use]
    pub const fn was_remeshed(&self) -> bool {
        self.splits > 0 || self.collapses > 0 || self.flips > 0
    }

    /// Total operator applications.
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.splits + self.collapses + self.flips + self.smooth_moves
    }

    /// Face count ratio final/original.
    #[must_use]
    pub fn face_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }

    /// Relative reduction of the edge length spread (positive = more
    /// uniform).
    #[must_use]
    pub fn uniformity_improvement(&self) -> f64 {
        if self.edge_stats_before.std_dev > 0.0 {
            (self.edge_stats_before.std_dev - self.edge_stats_after.std_dev)
                / self.edge_stats_before.std_dev
        } else {
            0.0
        }
    }

    /// Mean quality change (positive = better).
    #[must_use]
    pub fn quality_improvement(&self) -> f64 {
        self.mean_quality_after - self.mean_quality_before
    }
}

impl std::fmt::Display for RemeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Remesh: {} -> {} faces in {} iterations ({} splits, {} collapses, {} flips), quality {:.3} -> {:.3}",
            self.original_faces,
            self.final_faces,
            self.iterations_used,
            self.splits,
            self.collapses,
            self.flips,
            self.mean_quality_before,
            self.mean_quality_after
        )
    }
}

/// A remeshed container together with its report.
#[derive(Debug, Clone)]
pub struct RemeshOutput {
    /// The remeshed geometry, exported back to the host container.
    pub mesh: IndexedMesh,
    /// Counters and quality measurements from the loop.
    pub report: RemeshReport,
}
