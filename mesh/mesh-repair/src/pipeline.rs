//! The composed repair pipeline.

use std::time::{Duration, Instant};

use mesh_topology::{validate, TriMesh};
use tracing::{info, warn};

use crate::degenerate::DegenerateFaceRemoval;
use crate::duplicate::DuplicateFaceRemoval;
use crate::holes::HoleFiller;
use crate::isolated::IsolatedVertexRemoval;
use crate::nonmanifold::NonManifoldStrategy;
use crate::normals::NormalUnifier;
use crate::operation::{RepairOperation, RepairStats};

/// Options for [`repair_all`].
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Strategy for standalone non-manifold edge repair (not part of the
    /// composed pipeline; see [`crate::NonManifoldEdgeRepair`]).
    pub non_manifold_strategy: NonManifoldStrategy,
    /// Holes with more boundary edges than this stay open.
    pub max_hole_size: usize,
    /// Area below which a face counts as degenerate.
    pub degenerate_area_threshold: f64,
    /// Run the topology validator after every step; a failure downgrades
    /// the report without aborting the pipeline.
    pub validate_steps: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            non_manifold_strategy: NonManifoldStrategy::Auto,
            max_hole_size: 100,
            degenerate_area_threshold: 1e-10,
            validate_steps: false,
        }
    }
}

impl RepairOptions {
    /// Set the non-manifold resolution strategy.
    #[must_use]
    pub const fn with_non_manifold_strategy(mut self, strategy: NonManifoldStrategy) -> Self {
        self.non_manifold_strategy = strategy;
        self
    }

    /// Set the hole size cap.
    #[must_use]
    pub const fn with_max_hole_size(mut self, max_hole_size: usize) -> Self {
        self.max_hole_size = max_hole_size;
        self
    }

    /// Set the degenerate area threshold.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Enable or disable per-step validation.
    #[must_use]
    pub const fn with_validate_steps(mut self, validate: bool) -> Self {
        self.validate_steps = validate;
        self
    }
}

/// Aggregated outcome of the composed pipeline.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Per-operation rows, in execution order.
    pub operations: Vec<RepairStats>,
    /// Whether every step succeeded (and, with per-step validation
    /// enabled, every validation passed).
    pub success: bool,
    /// The first failing step's reason.
    pub reason: Option<String>,
    /// Total wall-clock time.
    pub elapsed: Duration,
}

impl RepairReport {
    /// Total defects found across operations.
    #[must_use]
    pub fn total_found(&self) -> usize {
        self.operations.iter().map(|s| s.found).sum()
    }

    /// Total defects fixed across operations.
    #[must_use]
    pub fn total_fixed(&self) -> usize {
        self.operations.iter().map(|s| s.fixed).sum()
    }

    /// The row for a named operation.
    #[must_use]
    pub fn stats_for(&self, operation: &str) -> Option<&RepairStats> {
        self.operations.iter().find(|s| s.operation == operation)
    }
}

impl std::fmt::Display for RepairReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Repair {}: {}/{} defects fixed in {:.1?}",
            if self.success { "ok" } else { "FAILED" },
            self.total_fixed(),
            self.total_found(),
            self.elapsed
        )?;
        for row in &self.operations {
            writeln!(f, "  {row}")?;
        }
        if let Some(ref reason) = self.reason {
            writeln!(f, "  reason: {reason}")?;
        }
        Ok(())
    }
}

/// Run the full repair pipeline in fixed order: isolated vertices,
/// duplicate faces, degenerate faces, holes, normals.
///
/// No step aborts the pipeline; failures are recorded and the first one
/// populates the report's `reason`. Running the pipeline twice leaves
/// nothing to fix the second time.
#[must_use]
pub fn repair_all(mesh: &mut TriMesh, options: &RepairOptions) -> RepairReport {
    let started = Instant::now();
    let degenerate = DegenerateFaceRemoval::with_threshold(options.degenerate_area_threshold);
    let holes = HoleFiller::with_max_size(options.max_hole_size);
    let operations: [&dyn RepairOperation; 5] = [
        &IsolatedVertexRemoval,
        &DuplicateFaceRemoval,
        &degenerate,
        &holes,
        &NormalUnifier,
    ];

    let mut report = RepairReport {
        success: true,
        ..Default::default()
    };

    for operation in operations {
        let stats = operation.execute(mesh);
        if !stats.success && report.reason.is_none() {
            report.success = false;
            report.reason = Some(format!(
                "{}: {}",
                stats.operation,
                stats.reason.clone().unwrap_or_else(|| "failed".into())
            ));
        }

        if options.validate_steps {
            let validation = validate(mesh);
            if !validation.is_valid() {
                warn!(
                    "topology validation failed after {} with {} errors",
                    stats.operation,
                    validation.errors.len()
                );
                if report.reason.is_none() {
                    report.reason = Some(format!(
                        "validation after {}: {} errors",
                        stats.operation,
                        validation.errors.len()
                    ));
                }
                report.success = false;
            }
        }

        report.operations.push(stats);
    }

    report.elapsed = started.elapsed();
    info!("{report}");
    report
}
