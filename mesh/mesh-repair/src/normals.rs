//! Normal unification by flood fill.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use mesh_topology::{FaceId, HalfedgeId, TriMesh};
use tracing::debug;

use crate::operation::RepairOperation;

/// Makes face orientations consistent within each connected component.
///
/// Two faces sharing a manifold edge are consistently oriented when
/// their halfedges traverse the edge in opposite directions. A breadth
/// first flood from a seed face (the lowest-numbered face of each
/// component) reverses every face found traversing a shared edge the
/// same way as its already-oriented neighbor. Non-manifold edges have no
/// well-defined pairing and are not crossed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalUnifier;

/// The other halfedge of a 2-halfedge edge, when it belongs to a
/// different live face.
fn paired_neighbor(mesh: &TriMesh, h: HalfedgeId) -> Option<(HalfedgeId, FaceId)> {
    let e = mesh.halfedge(h).edge;
    let edge = mesh.edge(e);
    if edge.halfedges.len() != 2 {
        return None;
    }
    let other = if edge.halfedges[0] == h {
        edge.halfedges[1]
    } else {
        edge.halfedges[0]
    };
    let g = mesh.halfedge(other).face?;
    if Some(g) == mesh.halfedge(h).face {
        return None;
    }
    Some((other, g))
}

impl RepairOperation for NormalUnifier {
    fn name(&self) -> &'static str {
        "normals"
    }

    fn detect(&self, mesh: &TriMesh) -> usize {
        // Dry flood: track which faces *would* be reversed and compare
        // traversal directions through that virtual orientation.
        let mut visited: HashSet<FaceId> = HashSet::new();
        let mut virtually_flipped: HashMap<FaceId, bool> = HashMap::new();
        let mut queue: VecDeque<FaceId> = VecDeque::new();
        let mut count = 0;

        for seed in mesh.face_ids() {
            if visited.contains(&seed) {
                continue;
            }
            visited.insert(seed);
            virtually_flipped.insert(seed, false);
            queue.push_back(seed);

            while let Some(f) = queue.pop_front() {
                let f_flipped = virtually_flipped.get(&f).copied().unwrap_or(false);
                for h in mesh.face_halfedges(f) {
                    let Some((other, g)) = paired_neighbor(mesh, h) else {
                        continue;
                    };
                    if visited.contains(&g) {
                        continue;
                    }
                    let same_direction = mesh.target(h) == mesh.target(other);
                    let needs_flip = same_direction ^ f_flipped;
                    if needs_flip {
                        count += 1;
                    }
                    visited.insert(g);
                    virtually_flipped.insert(g, needs_flip);
                    queue.push_back(g);
                }
            }
        }
        count
    }

    fn repair(&self, mesh: &mut TriMesh) -> usize {
        let mut visited: HashSet<FaceId> = HashSet::new();
        let mut queue: VecDeque<FaceId> = VecDeque::new();
        let mut flipped = 0;

        let seeds: Vec<FaceId> = mesh.face_ids().collect();
        for seed in seeds {
            if visited.contains(&seed) {
                continue;
            }
            visited.insert(seed);
            queue.push_back(seed);

            while let Some(f) = queue.pop_front() {
                for h in mesh.face_halfedges(f) {
                    let Some((other, g)) = paired_neighbor(mesh, h) else {
                        continue;
                    };
                    if visited.contains(&g) {
                        continue;
                    }
                    // Faces already processed carry final orientation, so
                    // a same-direction traversal means `g` is wrong.
                    if mesh.target(h) == mesh.target(other) {
                        mesh.reverse_face(g);
                        flipped += 1;
                    }
                    visited.insert(g);
                    queue.push_back(g);
                }
            }
        }

        if flipped > 0 {
            debug!("reversed {flipped} inconsistently oriented faces");
        }
        flipped
    }
}
