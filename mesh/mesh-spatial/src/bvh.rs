//! Bounding volume hierarchy over triangles.

use mesh_types::{Aabb, Point3, Triangle};
use rayon::join;
use smallvec::SmallVec;

/// Default maximum number of triangles per leaf.
const DEFAULT_LEAF_SIZE: usize = 4;

/// Triangle count above which subtree construction forks onto rayon.
const PARALLEL_THRESHOLD: usize = 4096;

/// Result of a closest-point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestHit {
    /// The closest point on the surface.
    pub point: Point3<f64>,
    /// Index of the triangle carrying the closest point.
    pub triangle: usize,
    /// Distance from the query point.
    pub distance: f64,
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// A static BVH over a triangle array.
///
/// Splits happen along the longest axis of the node's box at the median
/// triangle center. Queries return indexes into the array the tree was
/// built from; the caller keeps whatever payload those indexes mean.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
/// use mesh_spatial::Bvh;
///
/// let triangles = vec![Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// )];
/// let bvh = Bvh::build(&triangles);
///
/// let hit = bvh.closest_point(&Point3::new(0.25, 0.25, 2.0)).unwrap();
/// assert_eq!(hit.triangle, 0);
/// assert!((hit.distance - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
    triangles: Vec<Triangle>,
}

impl Bvh {
    /// Build with the default leaf size.
    #[must_use]
    pub fn build(triangles: &[Triangle]) -> Self {
        Self::build_with_leaf_size(triangles, DEFAULT_LEAF_SIZE)
    }

    /// Build with an explicit leaf size (clamped to at least 1).
    #[must_use]
    pub fn build_with_leaf_size(triangles: &[Triangle], leaf_size: usize) -> Self {
        if triangles.is_empty() {
            return Self {
                root: None,
                triangles: Vec::new(),
            };
        }

        let boxes: Vec<Aabb> = triangles
            .iter()
            .map(|t| Aabb::from_triangle(&t.v0, &t.v1, &t.v2))
            .collect();
        let indices: Vec<usize> = (0..triangles.len()).collect();
        let root = build_node(&boxes, indices, leaf_size.max(1));

        Self {
            root: Some(root),
            triangles: triangles.to_vec(),
        }
    }

    /// Number of triangles in the tree.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the tree holds no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The nearest surface point to `query`, or `None` when empty.
    #[must_use]
    pub fn closest_point(&self, query: &Point3<f64>) -> Option<ClosestHit> {
        let root = self.root.as_ref()?;
        let mut best: Option<ClosestHit> = None;
        self.closest_recursive(root, query, &mut best);
        best
    }

    fn closest_recursive(&self, node: &BvhNode, query: &Point3<f64>, best: &mut Option<ClosestHit>) {
        let bound = best.map_or(f64::INFINITY, |b| b.distance);
        if node.bbox().distance_squared(query) > bound * bound {
            return;
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &index in triangles {
                    let tri = &self.triangles[index as usize];
                    let candidate = tri.closest_point(*query);
                    let distance = (query - candidate).norm();
                    let better = best.map_or(true, |b| distance < b.distance);
                    if better {
                        *best = Some(ClosestHit {
                            point: candidate,
                            triangle: index as usize,
                            distance,
                        });
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                // Descend the nearer child first to shrink the bound early.
                let dl = left.bbox().distance_squared(query);
                let dr = right.bbox().distance_squared(query);
                if dl <= dr {
                    self.closest_recursive(left, query, best);
                    self.closest_recursive(right, query, best);
                } else {
                    self.closest_recursive(right, query, best);
                    self.closest_recursive(left, query, best);
                }
            }
        }
    }

    /// Indexes of triangles whose closest point to `query` lies within
    /// `radius`.
    #[must_use]
    pub fn query_radius(&self, query: &Point3<f64>, radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        if radius < 0.0 {
            return hits;
        }
        if let Some(ref root) = self.root {
            self.radius_recursive(root, query, radius, &mut hits);
        }
        hits
    }

    fn radius_recursive(
        &self,
        node: &BvhNode,
        query: &Point3<f64>,
        radius: f64,
        hits: &mut Vec<usize>,
    ) {
        if node.bbox().distance_squared(query) > radius * radius {
            return;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &index in triangles {
                    let tri = &self.triangles[index as usize];
                    if tri.distance_to(*query) <= radius {
                        hits.push(index as usize);
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                self.radius_recursive(left, query, radius, hits);
                self.radius_recursive(right, query, radius, hits);
            }
        }
    }

    /// Structural statistics, mostly for tests and tuning.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if let Some(ref root) = self.root {
            collect_stats(root, 0, &mut stats);
        }
        stats
    }
}

fn build_node(boxes: &[Aabb], indices: Vec<usize>, leaf_size: usize) -> BvhNode {
    let mut bbox = Aabb::empty();
    for &i in &indices {
        bbox.expand(&boxes[i]);
    }

    if indices.len() <= leaf_size {
        #[allow(clippy::cast_possible_truncation)]
        let triangles: SmallVec<[u32; 8]> = indices.iter().map(|&i| i as u32).collect();
        return BvhNode::Leaf { bbox, triangles };
    }

    // Median split along the longest axis of the node's box.
    let axis = bbox.longest_axis();
    let mut sorted = indices;
    sorted.sort_by(|&a, &b| {
        let ca = boxes[a].center()[axis];
        let cb = boxes[b].center()[axis];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = sorted.len() / 2;
    let right_indices = sorted.split_off(mid);
    let left_indices = sorted;

    let (left, right) = if left_indices.len() >= PARALLEL_THRESHOLD {
        join(
            || build_node(boxes, left_indices, leaf_size),
            || build_node(boxes, right_indices, leaf_size),
        )
    } else {
        (
            build_node(boxes, left_indices, leaf_size),
            build_node(boxes, right_indices, leaf_size),
        )
    };

    BvhNode::Internal {
        bbox,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn collect_stats(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
    stats.max_depth = stats.max_depth.max(depth);
    match node {
        BvhNode::Leaf { triangles, .. } => {
            stats.leaf_count += 1;
            stats.max_leaf_size = stats.max_leaf_size.max(triangles.len());
            stats.triangles_in_leaves += triangles.len();
        }
        BvhNode::Internal { left, right, .. } => {
            stats.internal_count += 1;
            collect_stats(left, depth + 1, stats);
            collect_stats(right, depth + 1, stats);
        }
    }
}

/// Structure counts for a built tree.
#[derive(Debug, Default, Clone)]
pub struct BvhStats {
    /// Internal (branch) nodes.
    pub internal_count: usize,
    /// Leaf nodes.
    pub leaf_count: usize,
    /// Deepest node.
    pub max_depth: usize,
    /// Largest leaf population.
    pub max_leaf_size: usize,
    /// Total triangles across leaves.
    pub triangles_in_leaves: usize,
}
