//! The adaptive remeshing loop.

#![allow(clippy::cast_precision_loss)]

use mesh_skeleton::Skeleton;
use mesh_topology::{EdgeId, TriMesh, VertexKind};
use mesh_types::{IndexedMesh, MeshTopology};
use nalgebra::Point3;
use tracing::debug;

use crate::error::{RemeshError, RemeshResult};
use crate::params::RemeshParams;
use crate::result::{EdgeStatistics, RemeshOutput, RemeshReport};

/// Mean-quality change below which the loop is considered converged.
const CONVERGENCE_EPSILON: f64 = 1e-3;

/// Remesh a host container toward a uniform target edge length.
///
/// Imports the container (marking the parameter's feature edges), runs
/// [`remesh_mesh`] and exports the result.
///
/// # Errors
///
/// Parameter validation errors, or [`RemeshError::Topology`] when the
/// container fails connectivity import.
pub fn remesh(container: &IndexedMesh, params: &RemeshParams) -> RemeshResult<RemeshOutput> {
    if container.vertex_count() == 0 {
        return Err(RemeshError::EmptyMesh);
    }
    if container.face_count() == 0 {
        return Err(RemeshError::NoFaces);
    }

    let features: &[(u32, u32)] = if params.preserve_features {
        &params.feature_edges
    } else {
        &[]
    };
    let mut mesh = TriMesh::from_indexed_mesh_with_features(container, features)?;
    let report = remesh_mesh(&mut mesh, params)?;

    Ok(RemeshOutput {
        mesh: mesh.to_indexed_mesh(),
        report,
    })
}

/// Run the adaptive loop directly on a connectivity store.
///
/// One iteration splits every edge beyond the upper length bound at its
/// midpoint, collapses every edge below the lower bound that passes the
/// link condition, runs a Delaunay flip pass, rebuilds classification
/// and skeleton when topology changed, and applies one damped tangential
/// smoothing pass (manifold vertices move freely in their tangent
/// planes, open-book vertices slide along their skeleton segments,
/// branching vertices stay put). The loop stops early when the mean
/// triangle quality changes by less than `1e-3` between iterations.
///
/// # Errors
///
/// Parameter validation only; operator rejections are counted in the
/// report, never raised.
pub fn remesh_mesh(mesh: &mut TriMesh, params: &RemeshParams) -> RemeshResult<RemeshReport> {
    if mesh.vertex_count() == 0 {
        return Err(RemeshError::EmptyMesh);
    }
    if mesh.face_count() == 0 {
        return Err(RemeshError::NoFaces);
    }
    if params.iterations == 0 {
        return Err(RemeshError::InvalidIterations(0));
    }
    if !(0.0..=1.0).contains(&params.smoothing_damping) {
        return Err(RemeshError::InvalidDamping(params.smoothing_damping));
    }
    if params.min_edge_length_ratio <= 0.0
        || params.min_edge_length_ratio >= params.max_edge_length_ratio
    {
        return Err(RemeshError::InvalidRatios {
            min: params.min_edge_length_ratio,
            max: params.max_edge_length_ratio,
        });
    }

    let target = match params.target_edge_length {
        Some(t) => t,
        None => auto_target(mesh),
    };
    if !target.is_finite() || target <= 0.0 {
        return Err(RemeshError::InvalidEdgeLength(target));
    }
    let max_length = params.max_edge_length(target);
    let min_length = params.min_edge_length(target);

    let mut report = RemeshReport {
        original_vertices: mesh.vertex_count(),
        original_faces: mesh.face_count(),
        target_edge_length: target,
        mean_quality_before: mesh.mean_quality(),
        below_quality_before: below_quality(mesh, params.min_triangle_quality),
        edge_stats_before: EdgeStatistics::measure(mesh),
        ..Default::default()
    };

    let mut skeleton = Skeleton::extract(mesh);
    let mut previous_quality = report.mean_quality_before;

    for iteration in 0..params.iterations {
        let splits = split_pass(mesh, max_length);
        let (collapses, rejected) = collapse_pass(mesh, min_length);
        let flips = mesh.delaunay_pass();

        report.splits += splits;
        report.collapses += collapses;
        report.collapses_rejected += rejected;
        report.flips += flips;

        if splits > 0 || collapses > 0 {
            mesh.classify_all();
            skeleton = Skeleton::extract(mesh);
        }

        report.smooth_moves += smooth_pass(mesh, &skeleton, params.smoothing_damping);

        report.iterations_used = iteration + 1;
        let quality = mesh.mean_quality();
        debug!(
            "iteration {}: {} splits, {} collapses, {} flips, quality {:.4}",
            iteration + 1,
            splits,
            collapses,
            flips,
            quality
        );
        if (quality - previous_quality).abs() < CONVERGENCE_EPSILON {
            break;
        }
        previous_quality = quality;
    }

    mesh.classify_all();
    report.final_vertices = mesh.vertex_count();
    report.final_faces = mesh.face_count();
    report.mean_quality_after = mesh.mean_quality();
    report.below_quality_after = below_quality(mesh, params.min_triangle_quality);
    report.edge_stats_after = EdgeStatistics::measure(mesh);

    Ok(report)
}

/// Automatic target: bounding-box diagonal over the square root of the
/// vertex count.
fn auto_target(mesh: &TriMesh) -> f64 {
    let bounds = mesh_types::Aabb::from_points(
        mesh.vertex_ids()
            .map(|v| mesh.position(v))
            .collect::<Vec<_>>()
            .iter(),
    );
    bounds.diagonal() / (mesh.vertex_count() as f64).sqrt()
}

fn below_quality(mesh: &TriMesh, threshold: f64) -> usize {
    mesh.face_ids()
        .filter(|&f| mesh.face_triangle(f).quality() < threshold)
        .count()
}

/// Split every edge longer than `max_length` at its midpoint.
fn split_pass(mesh: &mut TriMesh, max_length: f64) -> usize {
    let long_edges: Vec<EdgeId> = mesh
        .edge_ids()
        .filter(|&e| mesh.edge_length(e) > max_length)
        .collect();

    let mut splits = 0;
    for e in long_edges {
        if !mesh.contains_edge(e) || mesh.edge_length(e) <= max_length {
            continue;
        }
        if mesh.split_edge(e, 0.5).is_ok() {
            splits += 1;
        }
    }
    splits
}

/// Collapse every edge shorter than `min_length` that the link condition
/// admits. Returns `(performed, rejected)`.
fn collapse_pass(mesh: &mut TriMesh, min_length: f64) -> (usize, usize) {
    let short_edges: Vec<EdgeId> = mesh
        .edge_ids()
        .filter(|&e| mesh.edge_length(e) < min_length)
        .collect();

    let mut collapses = 0;
    let mut rejected = 0;
    for e in short_edges {
        if !mesh.contains_edge(e) || mesh.edge_length(e) >= min_length {
            continue;
        }
        match mesh.collapse_edge(e) {
            Ok(_) => collapses += 1,
            Err(_) => rejected += 1,
        }
    }
    (collapses, rejected)
}

/// One damped tangential smoothing pass over manifold and open-book
/// vertices. Returns the number of vertices moved.
fn smooth_pass(mesh: &mut TriMesh, skeleton: &Skeleton, damping: f64) -> usize {
    let vertices: Vec<_> = mesh.vertex_ids().collect();
    let mut moved = 0;

    for v in vertices {
        let kind = mesh.vertex(v).kind;
        match kind {
            VertexKind::Manifold => {
                if mesh.smooth_vertex(v, damping).unwrap_or(false) {
                    moved += 1;
                }
            }
            VertexKind::OpenBook => {
                let Some(target) = mesh.tangential_target(v) else {
                    continue;
                };
                let current = mesh.position(v);
                let damped = Point3::from(current.coords.lerp(&target.coords, damping));

                // Slide along the vertex's own segment; fall back to the
                // nearest segment when the lookup has no entry (fresh
                // vertices between skeleton rebuilds).
                let constrained = match skeleton.segment_for_vertex(v) {
                    Some(index) => skeleton
                        .project_onto_segment(index, damped)
                        .map(|hit| hit.point)
                        .ok(),
                    None => skeleton.project_point(damped).map(|hit| hit.point),
                };
                let Some(constrained) = constrained else {
                    continue;
                };
                if mesh.relocate_vertex(v, constrained).is_ok() {
                    moved += 1;
                }
            }
            VertexKind::SkeletonBranching | VertexKind::NonManifoldOther => {}
        }
    }
    moved
}
