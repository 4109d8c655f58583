//! Hole detection and filling.
//!
//! A hole is a closed loop of boundary edges. Loops are traced by
//! walking boundary halfedges head-to-tail, then triangulated by ear
//! clipping against the averaged hole normal, with a fan fallback when
//! no ear can be found (strongly non-planar holes).

use hashbrown::HashSet;
use mesh_topology::{EdgeId, HalfedgeId, TriMesh, VertexId};
use mesh_types::{Point3, Triangle, Vector3};
use tracing::{debug, warn};

use crate::error::{RepairError, RepairResult};
use crate::operation::RepairOperation;

/// Iteration guard for loop walking and ear clipping.
const CLIP_CAP: usize = 10_000;

/// A traced run of boundary edges.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    /// Vertices along the loop, in boundary-halfedge direction.
    pub vertices: Vec<VertexId>,
    /// Whether the walk returned to its start. Open chains indicate
    /// corrupt boundaries and are never filled.
    pub closed: bool,
}

impl BoundaryLoop {
    /// Number of boundary edges in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len().saturating_sub(1)
        }
    }

    /// Whether this loop can be triangulated under the given size cap.
    #[must_use]
    pub fn is_fillable(&self, max_edges: usize) -> bool {
        self.closed && self.vertices.len() >= 3 && self.edge_count() <= max_edges
    }
}

/// Trace every boundary loop of the mesh.
///
/// Each boundary edge carries exactly one halfedge; walking from a
/// halfedge's head to the boundary halfedge leaving that vertex traces
/// the loop in a consistent direction. Vertices where the boundary
/// branches (more than two boundary edges) are traversed along the
/// first unvisited boundary edge, with a warning.
#[must_use]
pub fn detect_boundary_loops(mesh: &TriMesh) -> Vec<BoundaryLoop> {
    let mut visited: HashSet<EdgeId> = HashSet::new();
    let mut loops = Vec::new();

    let boundary_edges: Vec<EdgeId> = mesh
        .edge_ids()
        .filter(|&e| mesh.edge(e).face_count() == 1)
        .collect();

    for e in boundary_edges {
        if visited.contains(&e) {
            continue;
        }

        let mut h = mesh.edge(e).halfedge;
        let start = mesh.source(h);
        let mut vertices = Vec::new();
        let mut closed = false;

        for _ in 0..CLIP_CAP {
            visited.insert(mesh.halfedge(h).edge);
            vertices.push(mesh.source(h));

            let head = mesh.target(h);
            if head == start {
                closed = true;
                break;
            }

            match outgoing_boundary_halfedge(mesh, head, &visited) {
                Some(next) => h = next,
                None => {
                    warn!("boundary walk from vertex {start:?} dead-ends at {head:?}");
                    vertices.push(head);
                    break;
                }
            }
        }

        loops.push(BoundaryLoop { vertices, closed });
    }

    debug!(
        "traced {} boundary loops ({} closed)",
        loops.len(),
        loops.iter().filter(|l| l.closed).count()
    );
    loops
}

/// The unvisited boundary halfedge leaving `v`, if any.
fn outgoing_boundary_halfedge(
    mesh: &TriMesh,
    v: VertexId,
    visited: &HashSet<EdgeId>,
) -> Option<HalfedgeId> {
    for &e in mesh.incident_edges(v) {
        if visited.contains(&e) || mesh.edge(e).face_count() != 1 {
            continue;
        }
        let h = mesh.edge(e).halfedge;
        if mesh.source(h) == v {
            return Some(h);
        }
    }
    None
}

/// Fill every closed boundary loop of up to `max_hole_edges` edges.
///
/// Larger loops and open chains are skipped with a warning. Returns the
/// number of holes filled.
///
/// # Errors
///
/// [`RepairError::HoleFillFailed`] when a closed loop is too short to
/// triangulate (fewer than three vertices).
pub fn fill_holes(mesh: &mut TriMesh, max_hole_edges: usize) -> RepairResult<usize> {
    let loops = detect_boundary_loops(mesh);

    let mut filled = 0;
    for boundary in &loops {
        if !boundary.closed {
            warn!(
                "skipping open boundary chain with {} edges",
                boundary.edge_count()
            );
            continue;
        }
        if boundary.edge_count() > max_hole_edges {
            warn!(
                "skipping hole with {} edges (cap {})",
                boundary.edge_count(),
                max_hole_edges
            );
            continue;
        }
        let triangles = fill_loop(mesh, boundary)?;
        debug!(
            "filled a {}-edge hole with {} triangles",
            boundary.edge_count(),
            triangles
        );
        filled += 1;
    }
    Ok(filled)
}

/// Triangulate one closed loop and add the faces to the mesh.
///
/// New faces traverse the existing boundary edges opposite to their
/// lone halfedges, turning them manifold.
fn fill_loop(mesh: &mut TriMesh, boundary: &BoundaryLoop) -> RepairResult<usize> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Err(RepairError::HoleFillFailed {
            reason: format!("loop has only {n} vertices"),
        });
    }

    // Reversing the walk direction makes ear triangles wind against the
    // existing boundary halfedges.
    let ring: Vec<VertexId> = boundary.vertices.iter().rev().copied().collect();
    let positions: Vec<Point3<f64>> = ring.iter().map(|&v| mesh.position(v)).collect();
    let normal = loop_normal(&positions);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles: Vec<[VertexId; 3]> = Vec::new();

    let mut guard = 0;
    while remaining.len() > 3 && guard < CLIP_CAP {
        guard += 1;

        let mut clipped = false;
        for i in 0..remaining.len() {
            let prev = remaining[(i + remaining.len() - 1) % remaining.len()];
            let curr = remaining[i];
            let next = remaining[(i + 1) % remaining.len()];

            if is_ear(&positions, &remaining, prev, curr, next, &normal) {
                triangles.push([ring[prev], ring[curr], ring[next]]);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            warn!(
                "ear clipping stuck with {} vertices left, falling back to a fan",
                remaining.len()
            );
            break;
        }
    }

    if remaining.len() == 3 {
        triangles.push([
            ring[remaining[0]],
            ring[remaining[1]],
            ring[remaining[2]],
        ]);
    } else {
        // Fan fallback over whatever is left.
        let center = remaining[0];
        for pair in remaining[1..].windows(2) {
            triangles.push([ring[center], ring[pair[0]], ring[pair[1]]]);
        }
    }

    let count = triangles.len();
    for corners in triangles {
        mesh.add_face(corners);
    }
    Ok(count)
}

/// Averaged normal of the loop polygon, fanned around its centroid.
fn loop_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / positions.len() as f64;
    let mut centroid = Vector3::zeros();
    for p in positions {
        centroid += p.coords;
    }
    let centroid = Point3::from(centroid * inv);

    let mut normal = Vector3::zeros();
    let n = positions.len();
    for i in 0..n {
        let a = positions[i] - centroid;
        let b = positions[(i + 1) % n] - centroid;
        normal += a.cross(&b);
    }

    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::z()
    }
}

/// Ear test: the candidate triangle must have positive area toward the
/// hole normal and contain no other loop vertex.
fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    normal: &Vector3<f64>,
) -> bool {
    let tri = Triangle::new(positions[prev], positions[curr], positions[next]);
    let Some(tri_normal) = tri.normal() else {
        return false;
    };
    if tri_normal.dot(normal) <= 0.0 {
        return false;
    }

    for &other in remaining {
        if other == prev || other == curr || other == next {
            continue;
        }
        if point_in_triangle_projected(
            &positions[other],
            &positions[prev],
            &positions[curr],
            &positions[next],
            normal,
        ) {
            return false;
        }
    }
    true
}

/// 2D point-in-triangle after dropping the axis most aligned with the
/// hole normal.
fn point_in_triangle_projected(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let abs = Vector3::new(normal.x.abs(), normal.y.abs(), normal.z.abs());
    let (p2, a2, b2, c2) = if abs.z >= abs.x && abs.z >= abs.y {
        ((p.x, p.y), (a.x, a.y), (b.x, b.y), (c.x, c.y))
    } else if abs.y >= abs.x {
        ((p.x, p.z), (a.x, a.z), (b.x, b.z), (c.x, c.z))
    } else {
        ((p.y, p.z), (a.y, a.z), (b.y, b.z), (c.y, c.z))
    };

    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| -> f64 {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };

    let d1 = sign(p2, a2, b2);
    let d2 = sign(p2, b2, c2);
    let d3 = sign(p2, c2, a2);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Fills holes up to a maximum boundary size.
#[derive(Debug, Clone, Copy)]
pub struct HoleFiller {
    /// Loops with more boundary edges than this are left open.
    pub max_hole_size: usize,
}

impl Default for HoleFiller {
    fn default() -> Self {
        Self { max_hole_size: 100 }
    }
}

impl HoleFiller {
    /// With an explicit size cap.
    #[must_use]
    pub const fn with_max_size(max_hole_size: usize) -> Self {
        Self { max_hole_size }
    }
}

impl RepairOperation for HoleFiller {
    fn name(&self) -> &'static str {
        "holes"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        detect_boundary_loops(mesh)
            .iter()
            .filter(|l| l.is_fillable(self.max_hole_size))
            .count()
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        fill_holes(mesh, self.max_hole_size).unwrap_or(0)
    }
}
