//! The common surface of all repair operations.

use std::time::{Duration, Instant};

use mesh_topology::TriMesh;

/// Timed outcome of one executed repair operation.
#[derive(Debug, Clone)]
pub struct RepairStats {
    /// Operation name.
    pub operation: &'static str,
    /// Defects detected.
    pub found: usize,
    /// Defects fixed.
    pub fixed: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Whether every detected defect was fixed.
    pub success: bool,
    /// Populated when the operation fell short.
    pub reason: Option<String>,
}

impl std::fmt::Display for RepairStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} fixed in {:.1?}",
            self.operation, self.fixed, self.found, self.elapsed
        )
    }
}

/// A repair with separate detection and repair phases.
///
/// `detect` must not mutate and reports the current defect count;
/// `repair` fixes what it can and reports how many it fixed. The
/// provided `execute` runs both and wraps the outcome in [`RepairStats`].
pub trait RepairOperation {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Count defects without mutating the mesh.
    fn detect(&self, mesh: &TriMesh) -> usize;

    /// Fix defects; returns the number fixed.
    fn repair(&self, mesh: &mut TriMesh) -> usize;

    /// Detect, repair and collect statistics.
    fn execute(&self, mesh: &mut TriMesh) -> RepairStats {
        let started = Instant::now();
        let found = self.detect(mesh);
        let fixed = if found > 0 { self.repair(mesh) } else { 0 };
        let success = fixed >= found;

        RepairStats {
            operation: self.name(),
            found,
            fixed,
            elapsed: started.elapsed(),
            success,
            reason: if success {
                None
            } else {
                Some(format!("fixed {fixed} of {found} defects"))
            },
        }
    }
}
