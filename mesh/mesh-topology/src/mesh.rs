//! The connectivity store.
//!
//! Four arenas hold the elements; every cross-reference is an id, so
//! there is no shared ownership and deletion is O(1) per element. Two
//! lookup structures are maintained alongside the arenas: an
//! unordered-vertex-pair map for resolve-or-create edge access, and a
//! per-vertex incident-edge list. Ring queries go through the
//! incident-edge list, since a twin-walk circulator cannot enumerate
//! the full star of a non-manifold vertex.

use hashbrown::HashMap;
use mesh_types::Triangle;
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::arena::Arena;
use crate::elements::{Edge, EdgeKind, Face, Halfedge, Vertex, VertexKind};
use crate::error::{TopologyError, TopologyResult};
use crate::id::{EdgeId, FaceId, HalfedgeId, VertexId};

/// Triangle surface connectivity with non-manifold support.
///
/// Built from an [`mesh_types::IndexedMesh`] via
/// [`TriMesh::from_indexed_mesh`], mutated through the local operators,
/// exported back at the end. A single instance is not safe for
/// concurrent mutation; operators run to completion before returning.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub(crate) vertices: Arena<Vertex>,
    pub(crate) halfedges: Arena<Halfedge>,
    pub(crate) edges: Arena<Edge>,
    pub(crate) faces: Arena<Face>,

    /// Unordered vertex pair -> edge.
    pub(crate) edge_map: HashMap<(u32, u32), EdgeId>,
    /// Incident edges per vertex, indexed by vertex slot.
    pub(crate) vertex_edges: Vec<Vec<EdgeId>>,
}

#[inline]
pub(crate) fn pair_key(a: VertexId, b: VertexId) -> (u32, u32) {
    if a.0 <= b.0 {
        (a.0, b.0)
    } else {
        (b.0, a.0)
    }
}

impl TriMesh {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Counts and id iteration ====================

    /// Number of live vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live halfedges.
    #[inline]
    #[must_use]
    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of live edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of live faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over live vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.indexes().map(VertexId::new)
    }

    /// Iterate over live halfedge ids.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfedgeId> + '_ {
        self.halfedges.indexes().map(HalfedgeId::new)
    }

    /// Iterate over live edge ids.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.indexes().map(EdgeId::new)
    }

    /// Iterate over live face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.indexes().map(FaceId::new)
    }

    // ==================== Element access ====================

    /// Vertex by id. Panics on a stale id.
    #[inline]
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Halfedge by id. Panics on a stale id.
    #[inline]
    #[must_use]
    pub fn halfedge(&self, id: HalfedgeId) -> &Halfedge {
        &self.halfedges[id.index()]
    }

    /// Edge by id. Panics on a stale id.
    #[inline]
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Face by id. Panics on a stale id.
    #[inline]
    #[must_use]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Whether a vertex id is live.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(id.index())
    }

    /// Whether an edge id is live.
    #[inline]
    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id.index())
    }

    /// Whether a face id is live.
    #[inline]
    #[must_use]
    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains(id.index())
    }

    /// Whether a halfedge id is live.
    #[inline]
    #[must_use]
    pub fn contains_halfedge(&self, id: HalfedgeId) -> bool {
        self.halfedges.contains(id.index())
    }

    /// Position of a vertex.
    #[inline]
    #[must_use]
    pub fn position(&self, v: VertexId) -> Point3<f64> {
        self.vertex(v).position
    }

    // ==================== Halfedge navigation ====================

    /// Target vertex of a halfedge.
    #[inline]
    #[must_use]
    pub fn target(&self, h: HalfedgeId) -> VertexId {
        self.halfedge(h).target
    }

    /// Source vertex of a halfedge (the previous halfedge's target).
    #[inline]
    #[must_use]
    pub fn source(&self, h: HalfedgeId) -> VertexId {
        self.halfedge(self.halfedge(h).prev).target
    }

    /// Next halfedge in the face loop.
    #[inline]
    #[must_use]
    pub fn next(&self, h: HalfedgeId) -> HalfedgeId {
        self.halfedge(h).next
    }

    /// Previous halfedge in the face loop.
    #[inline]
    #[must_use]
    pub fn prev(&self, h: HalfedgeId) -> HalfedgeId {
        self.halfedge(h).prev
    }

    /// Twin of a halfedge, when paired.
    #[inline]
    #[must_use]
    pub fn twin(&self, h: HalfedgeId) -> Option<HalfedgeId> {
        self.halfedge(h).twin
    }

    // ==================== Edge and ring queries ====================

    /// Both endpoints of an edge.
    #[inline]
    #[must_use]
    pub fn edge_endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let edge = self.edge(e);
        (edge.v0, edge.v1)
    }

    /// Cached length of an edge.
    #[inline]
    #[must_use]
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        self.edge(e).length
    }

    /// The edge between two vertices, if one exists.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_map.get(&pair_key(a, b)).copied()
    }

    /// Edges incident to a vertex.
    #[inline]
    #[must_use]
    pub fn incident_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.vertex_edges[v.index()]
    }

    /// Number of edges incident to a vertex.
    #[inline]
    #[must_use]
    pub fn vertex_degree(&self, v: VertexId) -> usize {
        self.vertex_edges[v.index()].len()
    }

    /// Whether a vertex has no incident edges.
    #[inline]
    #[must_use]
    pub fn is_isolated(&self, v: VertexId) -> bool {
        self.vertex_edges[v.index()].is_empty()
    }

    /// Vertices connected to `v` by an edge.
    #[must_use]
    pub fn vertex_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let mut neighbors = Vec::with_capacity(self.vertex_degree(v));
        for &e in self.incident_edges(v) {
            let (a, b) = self.edge_endpoints(e);
            let other = if a == v { b } else { a };
            if other != v {
                neighbors.push(other);
            }
        }
        neighbors
    }

    /// Faces touching a vertex.
    ///
    /// Collected through the incident-edge lists so the full star is
    /// found even at non-manifold vertices.
    #[must_use]
    pub fn vertex_faces(&self, v: VertexId) -> Vec<FaceId> {
        let mut faces: Vec<FaceId> = Vec::new();
        for &e in self.incident_edges(v) {
            for &h in &self.edge(e).halfedges {
                if let Some(f) = self.halfedge(h).face {
                    if !faces.contains(&f) {
                        faces.push(f);
                    }
                }
            }
        }
        faces
    }

    /// Number of incident skeleton edges at a vertex.
    #[must_use]
    pub fn skeleton_degree(&self, v: VertexId) -> usize {
        self.incident_edges(v)
            .iter()
            .filter(|&&e| self.edge(e).kind.is_skeleton())
            .count()
    }

    // ==================== Face queries ====================

    /// The three halfedges of a face, starting at its representative.
    #[must_use]
    pub fn face_halfedges(&self, f: FaceId) -> [HalfedgeId; 3] {
        let h0 = self.face(f).halfedge;
        let h1 = self.next(h0);
        let h2 = self.next(h1);
        [h0, h1, h2]
    }

    /// The three corner vertices of a face, in winding order.
    #[must_use]
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        let [h0, h1, h2] = self.face_halfedges(f);
        [self.target(h2), self.target(h0), self.target(h1)]
    }

    /// The face's geometry as a concrete triangle.
    #[must_use]
    pub fn face_triangle(&self, f: FaceId) -> Triangle {
        let [a, b, c] = self.face_vertices(f);
        Triangle::new(self.position(a), self.position(b), self.position(c))
    }

    /// Area of a face.
    #[inline]
    #[must_use]
    pub fn face_area(&self, f: FaceId) -> f64 {
        self.face_triangle(f).area()
    }

    /// Unit normal of a face, `None` when degenerate.
    #[inline]
    #[must_use]
    pub fn face_normal(&self, f: FaceId) -> Option<Vector3<f64>> {
        self.face_triangle(f).normal()
    }

    /// Area-weighted normal at a vertex, `None` when every incident face
    /// is degenerate or the vertex is isolated.
    #[must_use]
    pub fn vertex_normal(&self, v: VertexId) -> Option<Vector3<f64>> {
        let mut normal = Vector3::zeros();
        for f in self.vertex_faces(v) {
            normal += self.face_triangle(f).normal_unnormalized();
        }
        let len = normal.norm();
        if len > 1e-12 {
            Some(normal / len)
        } else {
            None
        }
    }

    // ==================== Global predicates ====================

    /// Whether no edge has more than two incident faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edges
            .iter()
            .all(|(_, edge)| edge.halfedges.len() <= 2)
    }

    /// Whether any edge bounds exactly one face.
    #[must_use]
    pub fn has_boundary(&self) -> bool {
        self.edges.iter().any(|(_, edge)| edge.halfedges.len() == 1)
    }

    /// Euler characteristic `V - E + F` over live elements.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    // Element counts are far below i64::MAX.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Mean edge length over live edges, `0.0` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_edge_length(&self) -> f64 {
        if self.edge_count() == 0 {
            return 0.0;
        }
        let total: f64 = self.edges.iter().map(|(_, e)| e.length).sum();
        total / self.edge_count() as f64
    }

    /// Mean triangle quality (`2r/R`) over live faces, `0.0` when there
    /// are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_quality(&self) -> f64 {
        if self.face_count() == 0 {
            return 0.0;
        }
        let total: f64 = self
            .face_ids()
            .map(|f| self.face_triangle(f).quality())
            .sum();
        total / self.face_count() as f64
    }

    // ==================== Mutation primitives ====================

    /// Add an isolated vertex.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let index = self.vertices.insert(Vertex::new(position));
        debug_assert_eq!(index, self.vertex_edges.len());
        self.vertex_edges.push(Vec::new());
        VertexId::new(index)
    }

    /// Move a vertex without any validity checks.
    ///
    /// Callers that can invalidate incident faces should go through
    /// [`TriMesh::relocate_vertex`] instead. Incident edge lengths are
    /// refreshed.
    pub fn set_position(&mut self, v: VertexId, position: Point3<f64>) {
        self.vertices[v.index()].position = position;
        let incident: Vec<EdgeId> = self.incident_edges(v).to_vec();
        for e in incident {
            self.update_edge_length(e);
        }
    }

    /// Resolve the edge between two vertices, creating it if absent.
    fn resolve_edge(&mut self, a: VertexId, b: VertexId, representative: HalfedgeId) -> EdgeId {
        let key = pair_key(a, b);
        if let Some(&e) = self.edge_map.get(&key) {
            return e;
        }

        let length = (self.position(b) - self.position(a)).norm();
        let index = self.edges.insert(Edge {
            v0: a,
            v1: b,
            halfedges: SmallVec::new(),
            length,
            kind: EdgeKind::Boundary,
            halfedge: representative,
            feature: false,
        });
        let e = EdgeId::new(index);
        self.edge_map.insert(key, e);
        self.vertex_edges[a.index()].push(e);
        if a != b {
            self.vertex_edges[b.index()].push(e);
        }
        e
    }

    /// Add a triangular face over three existing vertices.
    ///
    /// Edges are resolved or created, three halfedges are wired into a
    /// loop, twins are re-paired on the touched edges, and the corner
    /// vertices are reclassified. Degenerate index triples (repeated
    /// vertices) are representable; the repair pipeline removes them.
    ///
    /// Panics if any vertex id is stale.
    pub fn add_face(&mut self, corners: [VertexId; 3]) -> FaceId {
        let [a, b, c] = corners;
        let face_index = self.faces.insert(Face {
            halfedge: HalfedgeId::new(0),
        });
        let f = FaceId::new(face_index);

        // Three halfedges a->b, b->c, c->a; next/prev patched below.
        let placeholder = HalfedgeId::new(0);
        let mut ids = [placeholder; 3];
        let targets = [b, c, a];
        for (slot, &t) in ids.iter_mut().zip(targets.iter()) {
            let index = self.halfedges.insert(Halfedge {
                target: t,
                edge: EdgeId::new(0), // patched below
                face: Some(f),
                next: placeholder,
                prev: placeholder,
                twin: None,
            });
            *slot = HalfedgeId::new(index);
        }
        let [h0, h1, h2] = ids;

        self.halfedges[h0.index()].next = h1;
        self.halfedges[h1.index()].next = h2;
        self.halfedges[h2.index()].next = h0;
        self.halfedges[h0.index()].prev = h2;
        self.halfedges[h1.index()].prev = h0;
        self.halfedges[h2.index()].prev = h1;

        let sides = [(a, b, h0), (b, c, h1), (c, a, h2)];
        let mut touched: SmallVec<[EdgeId; 3]> = SmallVec::new();
        for (src, dst, h) in sides {
            let e = self.resolve_edge(src, dst, h);
            self.halfedges[h.index()].edge = e;
            let edge = &mut self.edges[e.index()];
            edge.halfedges.push(h);
            // The representative is the most recently added halfedge.
            edge.halfedge = h;
            if !touched.contains(&e) {
                touched.push(e);
            }
        }

        for &e in &touched {
            self.pair_twins(e);
            self.classify_edge(e);
        }

        self.faces[face_index].halfedge = h0;

        for (v, h) in [(a, h0), (b, h1), (c, h2)] {
            if self.vertex(v).halfedge.is_none() {
                self.vertices[v.index()].halfedge = Some(h);
            }
        }
        for v in unique3(a, b, c) {
            self.classify_vertex(v);
        }

        f
    }

    /// Remove a face, detaching its halfedges from their edges.
    ///
    /// Edges left without any halfedge are removed as well. Touched edges
    /// are re-paired and reclassified; corner vertices are reclassified.
    pub fn remove_face(&mut self, f: FaceId) {
        let [h0, h1, h2] = self.face_halfedges(f);
        let corners = self.face_vertices(f);
        self.faces.remove(f.index());

        for h in [h0, h1, h2] {
            let e = self.halfedge(h).edge;
            self.detach_halfedge(h, e);
        }
        for h in [h0, h1, h2] {
            self.halfedges.remove(h.index());
        }

        let [a, b, c] = corners;
        for v in unique3(a, b, c) {
            self.fix_vertex_halfedge(v);
            self.classify_vertex(v);
        }
    }

    /// Detach a halfedge from its edge, removing the edge when it becomes
    /// empty.
    fn detach_halfedge(&mut self, h: HalfedgeId, e: EdgeId) {
        let (v0, v1) = self.edge_endpoints(e);
        let edge = &mut self.edges[e.index()];
        edge.halfedges.retain(|&mut member| member != h);

        if edge.halfedges.is_empty() {
            self.edges.remove(e.index());
            self.edge_map.remove(&pair_key(v0, v1));
            self.vertex_edges[v0.index()].retain(|&member| member != e);
            if v0 != v1 {
                self.vertex_edges[v1.index()].retain(|&member| member != e);
            }
        } else {
            if edge.halfedge == h {
                edge.halfedge = edge.halfedges[0];
            }
            self.pair_twins(e);
            self.classify_edge(e);
        }
    }

    /// Remove an isolated vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::VertexInUse`] when edges still reference
    /// the vertex.
    pub fn remove_vertex(&mut self, v: VertexId) -> TopologyResult<()> {
        if !self.is_isolated(v) {
            return Err(TopologyError::VertexInUse { vertex: v });
        }
        self.vertices.remove(v.index());
        self.vertex_edges[v.index()].clear();
        Ok(())
    }

    /// Reverse a face's winding in place.
    ///
    /// Each halfedge turns around on its own edge, next and prev swap,
    /// and twins on the three edges are re-paired. The face id is
    /// preserved, which is what the normal-unification flood relies on.
    pub fn reverse_face(&mut self, f: FaceId) {
        let [h0, h1, h2] = self.face_halfedges(f);
        let sources = [self.source(h0), self.source(h1), self.source(h2)];

        for (h, src) in [h0, h1, h2].into_iter().zip(sources) {
            let halfedge = &mut self.halfedges[h.index()];
            halfedge.target = src;
            std::mem::swap(&mut halfedge.next, &mut halfedge.prev);
        }

        let mut touched: SmallVec<[EdgeId; 3]> = SmallVec::new();
        for h in [h0, h1, h2] {
            let e = self.halfedge(h).edge;
            if !touched.contains(&e) {
                touched.push(e);
            }
        }
        for e in touched {
            self.pair_twins(e);
        }
        for v in unique3(sources[0], sources[1], sources[2]) {
            self.fix_vertex_halfedge(v);
        }
    }

    /// Recompute and cache an edge's length.
    pub fn update_edge_length(&mut self, e: EdgeId) {
        let (v0, v1) = self.edge_endpoints(e);
        let length = (self.position(v1) - self.position(v0)).norm();
        self.edges[e.index()].length = length;
    }

    /// Mark the edge between two vertices as a user feature.
    ///
    /// Returns `false` when no such edge exists. The mark drives the
    /// `Feature` classification whenever the edge is otherwise manifold
    /// and survives splits of the edge.
    pub fn mark_feature_edge(&mut self, a: VertexId, b: VertexId) -> bool {
        let Some(e) = self.edge_between(a, b) else {
            return false;
        };
        self.set_feature(e, true);
        true
    }

    /// Set or clear an edge's feature mark and reclassify it and its
    /// endpoints.
    pub fn set_feature(&mut self, e: EdgeId, feature: bool) {
        self.edges[e.index()].feature = feature;
        self.classify_edge(e);
        let (v0, v1) = self.edge_endpoints(e);
        self.classify_vertex(v0);
        if v0 != v1 {
            self.classify_vertex(v1);
        }
    }

    // ==================== Twin pairing and classification ====================

    /// Re-pair twins on an edge by direction bags.
    ///
    /// Halfedges pointing at `v1` go in one bag, those pointing at `v0`
    /// in the other; bags pair positionally and leftovers keep no twin.
    pub(crate) fn pair_twins(&mut self, e: EdgeId) {
        let edge = self.edge(e);
        let v1 = edge.v1;
        let members: SmallVec<[HalfedgeId; 4]> = edge.halfedges.iter().copied().collect();

        let mut forward: SmallVec<[HalfedgeId; 2]> = SmallVec::new();
        let mut backward: SmallVec<[HalfedgeId; 2]> = SmallVec::new();
        for &h in &members {
            if self.target(h) == v1 {
                forward.push(h);
            } else {
                backward.push(h);
            }
        }

        for &h in &members {
            self.halfedges[h.index()].twin = None;
        }
        for (&f, &b) in forward.iter().zip(backward.iter()) {
            self.halfedges[f.index()].twin = Some(b);
            self.halfedges[b.index()].twin = Some(f);
        }
    }

    /// Reclassify an edge from its face count and feature mark.
    pub fn classify_edge(&mut self, e: EdgeId) {
        let edge = &self.edges[e.index()];
        let kind = match edge.halfedges.len() {
            1 => EdgeKind::Boundary,
            2 => {
                if edge.feature {
                    EdgeKind::Feature
                } else {
                    EdgeKind::Manifold
                }
            }
            _ => EdgeKind::NonManifold,
        };
        self.edges[e.index()].kind = kind;
    }

    /// Reclassify a vertex from its incident skeleton edges.
    ///
    /// `k = 0` manifold, `k = 2` open-book, `k = 1` or `k > 2` branching.
    /// Isolated vertices classify manifold by convention.
    pub fn classify_vertex(&mut self, v: VertexId) {
        let k = self.skeleton_degree(v);
        let kind = match k {
            0 => VertexKind::Manifold,
            2 => VertexKind::OpenBook,
            _ => VertexKind::SkeletonBranching,
        };
        self.vertices[v.index()].kind = kind;
    }

    /// Reclassify every edge and vertex.
    pub fn classify_all(&mut self) {
        let edge_ids: Vec<EdgeId> = self.edge_ids().collect();
        for e in edge_ids {
            self.classify_edge(e);
        }
        let vertex_ids: Vec<VertexId> = self.vertex_ids().collect();
        for v in vertex_ids {
            self.classify_vertex(v);
        }
    }

    /// Point `vertex.halfedge` at a live outgoing halfedge, or clear it.
    pub(crate) fn fix_vertex_halfedge(&mut self, v: VertexId) {
        if !self.contains_vertex(v) {
            return;
        }
        if let Some(h) = self.vertex(v).halfedge {
            if self.contains_halfedge(h) && self.source(h) == v {
                return;
            }
        }
        let mut found = None;
        'search: for &e in &self.vertex_edges[v.index()] {
            for &h in &self.edges[e.index()].halfedges {
                if self.source(h) == v {
                    found = Some(h);
                    break 'search;
                }
            }
        }
        self.vertices[v.index()].halfedge = found;
    }

    /// Snapshot the feature marks of every edge of the given faces,
    /// keyed by normalized endpoint pair. Used by operators that tear a
    /// patch down and rebuild it.
    pub(crate) fn snapshot_features(&self, faces: &[FaceId]) -> Vec<((u32, u32), bool)> {
        let mut marks = Vec::new();
        for &f in faces {
            for h in self.face_halfedges(f) {
                let e = self.halfedge(h).edge;
                let edge = self.edge(e);
                let key = pair_key(edge.v0, edge.v1);
                if !marks.iter().any(|&(k, _)| k == key) {
                    marks.push((key, edge.feature));
                }
            }
        }
        marks
    }

    /// Re-apply snapshotted feature marks, mapping vertex indexes through
    /// `remap` (used by collapse to redirect the removed endpoint).
    pub(crate) fn restore_features(
        &mut self,
        marks: &[((u32, u32), bool)],
        remap: impl Fn(u32) -> u32,
    ) {
        for &((a, b), feature) in marks {
            if !feature {
                continue;
            }
            let (a, b) = (remap(a), remap(b));
            if a == b {
                continue;
            }
            let va = VertexId(a);
            let vb = VertexId(b);
            if !self.contains_vertex(va) || !self.contains_vertex(vb) {
                continue;
            }
            if let Some(e) = self.edge_between(va, vb) {
                self.set_feature(e, true);
            }
        }
    }
}

/// The distinct members of a vertex triple, preserving order.
fn unique3(a: VertexId, b: VertexId, c: VertexId) -> SmallVec<[VertexId; 3]> {
    let mut out: SmallVec<[VertexId; 3]> = SmallVec::new();
    for v in [a, b, c] {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::IndexedMesh;

    fn single_triangle() -> TriMesh {
        let container = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            &[0, 1, 2],
        );
        TriMesh::from_indexed_mesh(&container).unwrap()
    }

    fn quad() -> TriMesh {
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        );
        TriMesh::from_indexed_mesh(&container).unwrap()
    }

    fn seam() -> TriMesh {
        // Three triangles sharing the edge (0, 1).
        let container = IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.5, 1.0, 0.0, //
                0.5, -1.0, 0.0, //
                0.5, 0.5, 1.0,
            ],
            &[0, 1, 2, 0, 1, 3, 0, 1, 4],
        );
        TriMesh::from_indexed_mesh(&container).unwrap()
    }

    #[test]
    fn single_triangle_structure() {
        let mesh = single_triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.halfedge_count(), 3);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert!(mesh.is_manifold());
        assert!(mesh.has_boundary());

        for e in mesh.edge_ids() {
            assert_eq!(mesh.edge(e).kind, EdgeKind::Boundary);
        }
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.vertex(v).kind, VertexKind::OpenBook);
        }
    }

    #[test]
    fn quad_edge_classification() {
        let mesh = quad();
        let boundary = mesh
            .edge_ids()
            .filter(|&e| mesh.edge(e).kind == EdgeKind::Boundary)
            .count();
        let manifold = mesh
            .edge_ids()
            .filter(|&e| mesh.edge(e).kind == EdgeKind::Manifold)
            .count();
        assert_eq!(boundary, 4);
        assert_eq!(manifold, 1);
        assert!(mesh.is_manifold());
    }

    #[test]
    fn seam_is_non_manifold() {
        let mesh = seam();
        assert!(!mesh.is_manifold());

        let v0 = VertexId::new(0);
        let v1 = VertexId::new(1);
        let shared = mesh.edge_between(v0, v1).unwrap();
        assert_eq!(mesh.edge(shared).kind, EdgeKind::NonManifold);
        assert_eq!(mesh.edge(shared).face_count(), 3);

        // Shared endpoints see more than two skeleton edges.
        assert_eq!(mesh.vertex(v0).kind, VertexKind::SkeletonBranching);
        assert_eq!(mesh.vertex(v1).kind, VertexKind::SkeletonBranching);
    }

    #[test]
    fn seam_twins_are_partial() {
        let mesh = seam();
        let shared = mesh
            .edge_between(VertexId::new(0), VertexId::new(1))
            .unwrap();
        let twins: Vec<bool> = mesh
            .edge(shared)
            .halfedges
            .iter()
            .map(|&h| mesh.twin(h).is_some())
            .collect();
        // All three halfedges run 0 -> 1, so no opposite partner exists.
        assert!(twins.iter().all(|&has| !has));
    }

    #[test]
    fn twin_reciprocity_on_interior_edge() {
        let mesh = quad();
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        let edge = mesh.edge(diagonal);
        assert_eq!(edge.halfedges.len(), 2);
        let h = edge.halfedges[0];
        let t = mesh.twin(h).unwrap();
        assert_eq!(mesh.twin(t), Some(h));
        assert_ne!(mesh.target(h), mesh.target(t));
    }

    #[test]
    fn next_prev_cycles() {
        let mesh = quad();
        for h in mesh.halfedge_ids() {
            assert_eq!(mesh.prev(mesh.next(h)), h);
            assert_eq!(mesh.next(mesh.prev(h)), h);
            assert_eq!(mesh.next(mesh.next(mesh.next(h))), h);
        }
    }

    #[test]
    fn vertex_halfedge_points_outward() {
        let mesh = seam();
        for v in mesh.vertex_ids() {
            let h = mesh.vertex(v).halfedge.unwrap();
            assert_eq!(mesh.source(h), v);
        }
    }

    #[test]
    fn ring_queries() {
        let mesh = quad();
        let v0 = VertexId::new(0);
        let mut neighbors = mesh.vertex_neighbors(v0);
        neighbors.sort();
        assert_eq!(
            neighbors,
            vec![VertexId::new(1), VertexId::new(2), VertexId::new(3)]
        );
        assert_eq!(mesh.vertex_faces(v0).len(), 2);
    }

    #[test]
    fn remove_face_drops_orphan_edges() {
        let mut mesh = single_triangle();
        let f = mesh.face_ids().next().unwrap();
        mesh.remove_face(f);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.halfedge_count(), 0);
        for v in mesh.vertex_ids() {
            assert!(mesh.is_isolated(v));
            assert!(mesh.vertex(v).halfedge.is_none());
        }
    }

    #[test]
    fn remove_shared_face_keeps_edge_alive() {
        let mut mesh = quad();
        let f = mesh.face_ids().next().unwrap();
        mesh.remove_face(f);
        assert_eq!(mesh.face_count(), 1);
        // The former diagonal is now a boundary edge.
        let diagonal = mesh
            .edge_between(VertexId::new(0), VertexId::new(2))
            .unwrap();
        assert_eq!(mesh.edge(diagonal).kind, EdgeKind::Boundary);
    }

    #[test]
    fn remove_vertex_requires_isolation() {
        let mut mesh = single_triangle();
        let v = VertexId::new(0);
        assert!(matches!(
            mesh.remove_vertex(v),
            Err(TopologyError::VertexInUse { .. })
        ));
    }

    #[test]
    fn reverse_face_flips_normal_and_keeps_id() {
        let mut mesh = single_triangle();
        let f = mesh.face_ids().next().unwrap();
        let before = mesh.face_normal(f).unwrap();
        mesh.reverse_face(f);
        assert!(mesh.contains_face(f));
        let after = mesh.face_normal(f).unwrap();
        assert!((before + after).norm() < 1e-12);

        // Structure stays coherent.
        for h in mesh.halfedge_ids() {
            assert_eq!(mesh.prev(mesh.next(h)), h);
        }
        for v in mesh.vertex_ids() {
            let h = mesh.vertex(v).halfedge.unwrap();
            assert_eq!(mesh.source(h), v);
        }
    }

    #[test]
    fn feature_mark_changes_classification() {
        let mut mesh = quad();
        let v0 = VertexId::new(0);
        let v2 = VertexId::new(2);
        assert!(mesh.mark_feature_edge(v0, v2));

        let diagonal = mesh.edge_between(v0, v2).unwrap();
        assert_eq!(mesh.edge(diagonal).kind, EdgeKind::Feature);
        // Each endpoint now sees 3 skeleton edges (2 boundary + feature).
        assert_eq!(mesh.vertex(v0).kind, VertexKind::SkeletonBranching);
    }

    #[test]
    fn mean_quality_positive_for_real_faces() {
        let mesh = quad();
        let q = mesh.mean_quality();
        assert!(q > 0.5 && q <= 1.0);
    }

    #[test]
    fn edge_lengths_cached() {
        let mesh = single_triangle();
        let e = mesh
            .edge_between(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert!((mesh.edge_length(e) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn set_position_refreshes_lengths() {
        let mut mesh = single_triangle();
        let v1 = VertexId::new(1);
        mesh.set_position(v1, Point3::new(2.0, 0.0, 0.0));
        let e = mesh
            .edge_between(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert!((mesh.edge_length(e) - 2.0).abs() < 1e-12);
    }
}
