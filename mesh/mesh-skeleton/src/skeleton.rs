//! Skeleton extraction and point projection.

use hashbrown::{HashMap, HashSet};
use mesh_topology::{EdgeId, TriMesh, VertexId, VertexKind};
use nalgebra::Point3;
use tracing::{debug, warn};

use crate::error::{SkeletonError, SkeletonResult};
use crate::segment::{SegmentProjection, SkeletonSegment};

/// Hard cap on trace length, against corrupted connectivity.
const TRACE_CAP: usize = 10_000;

/// Closest point on the whole skeleton.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonProjection {
    /// The closest point.
    pub point: Point3<f64>,
    /// Index of the segment the point lies on.
    pub segment: usize,
    /// Normalized arc-length parameter along that segment, in [0, 1].
    pub t: f64,
    /// Distance from the query point.
    pub distance: f64,
}

/// The skeleton of a surface, partitioned into segments.
///
/// Derived data: rebuild with [`Skeleton::extract`] after any
/// topological change to the mesh.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    /// All extracted segments.
    pub segments: Vec<SkeletonSegment>,
    /// Interior open-book vertices mapped to their segment. Branching
    /// vertices terminate segments and are deliberately absent.
    vertex_segment: HashMap<VertexId, usize>,
}

impl Skeleton {
    /// Extract all skeleton segments from a mesh.
    ///
    /// Paths are first traced from every branching vertex along unused
    /// skeleton edges, continuing through open-book vertices until
    /// another branching vertex (or the start) is reached. Skeleton
    /// edges still unused afterwards belong to closed loops without any
    /// branching vertex; each is traced as a loop.
    #[must_use]
    pub fn extract(mesh: &TriMesh) -> Self {
        let mut visited: HashSet<EdgeId> = HashSet::new();
        let mut segments = Vec::new();

        // Branch-seeded paths.
        for v in mesh.vertex_ids() {
            if mesh.vertex(v).kind != VertexKind::SkeletonBranching {
                continue;
            }
            let incident: Vec<EdgeId> = mesh.incident_edges(v).to_vec();
            for e in incident {
                if !mesh.edge(e).kind.is_skeleton() || visited.contains(&e) {
                    continue;
                }
                segments.push(trace(mesh, v, e, &mut visited));
            }
        }

        // Leftover closed loops with no branching vertex.
        let leftover: Vec<EdgeId> = mesh
            .edge_ids()
            .filter(|&e| mesh.edge(e).kind.is_skeleton() && !visited.contains(&e))
            .collect();
        for e in leftover {
            if visited.contains(&e) {
                continue;
            }
            let (start, _) = mesh.edge_endpoints(e);
            segments.push(trace(mesh, start, e, &mut visited));
        }

        let mut vertex_segment = HashMap::new();
        for (index, segment) in segments.iter().enumerate() {
            let interior: &[VertexId] = if segment.closed {
                &segment.vertices
            } else if segment.vertices.len() > 2 {
                &segment.vertices[1..segment.vertices.len() - 1]
            } else {
                &[]
            };
            for &v in interior {
                vertex_segment.entry(v).or_insert(index);
            }
        }

        debug!(
            "extracted {} skeleton segments ({} closed)",
            segments.len(),
            segments.iter().filter(|s| s.closed).count()
        );

        Self {
            segments,
            vertex_segment,
        }
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether the mesh had no skeleton edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total number of skeleton edges across all segments.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.segments.iter().map(SkeletonSegment::edge_count).sum()
    }

    /// The segment an interior open-book vertex lies on.
    #[must_use]
    pub fn segment_for_vertex(&self, v: VertexId) -> Option<usize> {
        self.vertex_segment.get(&v).copied()
    }

    /// Project a point onto a specific segment.
    ///
    /// # Errors
    ///
    /// [`SkeletonError::SegmentOutOfRange`] for a bad index,
    /// [`SkeletonError::EmptySegment`] when the segment has no geometry.
    pub fn project_onto_segment(
        &self,
        index: usize,
        point: Point3<f64>,
    ) -> SkeletonResult<SegmentProjection> {
        let segment = self
            .segments
            .get(index)
            .ok_or(SkeletonError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            })?;
        segment
            .project(point)
            .ok_or(SkeletonError::EmptySegment { index })
    }

    /// Closest point on any segment, or `None` for an empty skeleton.
    #[must_use]
    pub fn project_point(&self, point: Point3<f64>) -> Option<SkeletonProjection> {
        let mut best: Option<SkeletonProjection> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            let Some(hit) = segment.project(point) else {
                continue;
            };
            let better = best.as_ref().map_or(true, |b| hit.distance < b.distance);
            if better {
                best = Some(SkeletonProjection {
                    point: hit.point,
                    segment: index,
                    t: hit.t,
                    distance: hit.distance,
                });
            }
        }
        best
    }
}

/// Trace one segment starting at `start` along `first_edge`, marking
/// edges used. Stops at a branching vertex, at the start vertex (closed
/// loop), or when no unused skeleton edge continues the path.
fn trace(
    mesh: &TriMesh,
    start: VertexId,
    first_edge: EdgeId,
    visited: &mut HashSet<EdgeId>,
) -> SkeletonSegment {
    let mut vertices = vec![start];
    let mut edges = Vec::new();
    let mut current = start;
    let mut edge = first_edge;

    for _ in 0..TRACE_CAP {
        visited.insert(edge);
        edges.push(edge);

        let (a, b) = mesh.edge_endpoints(edge);
        current = if a == current { b } else { a };
        vertices.push(current);

        if current == start {
            break;
        }
        if mesh.vertex(current).kind != VertexKind::OpenBook {
            break;
        }

        let next_edge = mesh.incident_edges(current).iter().copied().find(|&cand| {
            cand != edge && mesh.edge(cand).kind.is_skeleton() && !visited.contains(&cand)
        });
        match next_edge {
            Some(cand) => edge = cand,
            None => break,
        }
    }
    if edges.len() >= TRACE_CAP {
        warn!("skeleton trace hit the {TRACE_CAP}-edge cap; segment truncated");
    }

    let closed = vertices.len() > 1 && vertices.first() == vertices.last();
    if closed {
        vertices.pop();
    }

    let positions = vertices.iter().map(|&v| mesh.position(v)).collect();
    SkeletonSegment::build(vertices, edges, positions, closed)
}
