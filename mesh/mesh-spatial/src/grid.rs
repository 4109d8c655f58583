//! Uniform spatial hash grid for dynamic point sets.

use std::hash::Hash;

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::error::{SpatialError, SpatialResult};

/// A uniform grid over hashed cells.
///
/// Points live in cells of side `cell_size`; radius queries visit the
/// cell neighborhood covering the query ball. The item type `T` is a
/// caller-chosen key (typically an id); one entry exists per key, and
/// re-inserting a key moves it.
///
/// # Example
///
/// ```
/// use mesh_spatial::SpatialHashGrid;
/// use nalgebra::Point3;
///
/// let mut grid = SpatialHashGrid::new(0.5)?;
/// grid.insert("a", Point3::new(0.0, 0.0, 0.0));
/// grid.insert("b", Point3::new(0.3, 0.0, 0.0));
/// grid.insert("c", Point3::new(9.0, 0.0, 0.0));
///
/// let two_nearest = grid.query_k_nearest(&Point3::origin(), 2, None);
/// assert_eq!(two_nearest, vec!["a", "b"]);
/// # Ok::<(), mesh_spatial::SpatialError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpatialHashGrid<T> {
    cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<T>>,
    positions: HashMap<T, Point3<f64>>,
}

impl<T: Copy + Eq + Hash> SpatialHashGrid<T> {
    /// Create a grid with the given cell size.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidCellSize`] unless the size is positive and
    /// finite.
    pub fn new(cell_size: f64) -> SpatialResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            positions: HashMap::new(),
        })
    }

    /// The configured cell size.
    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of stored items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the grid stores nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn cell_of(&self, position: &Point3<f64>) -> (i64, i64, i64) {
        #[allow(clippy::cast_possible_truncation)]
        // Cell coordinates of any realistic position fit i64.
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
            (position.z / self.cell_size).floor() as i64,
        )
    }

    /// Insert an item, or move it when the key is already present.
    pub fn insert(&mut self, item: T, position: Point3<f64>) {
        if self.positions.contains_key(&item) {
            self.remove(&item);
        }
        let cell = self.cell_of(&position);
        self.cells.entry(cell).or_default().push(item);
        self.positions.insert(item, position);
    }

    /// Remove an item; returns whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(position) = self.positions.remove(item) else {
            return false;
        };
        let cell = self.cell_of(&position);
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.retain(|member| member != item);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
        true
    }

    /// Move an item to a new position (inserting it when absent).
    pub fn update(&mut self, item: T, position: Point3<f64>) {
        self.insert(item, position);
    }

    /// The stored position of an item.
    #[must_use]
    pub fn position(&self, item: &T) -> Option<Point3<f64>> {
        self.positions.get(item).copied()
    }

    /// All items within `radius` of `center`, sorted by distance.
    #[must_use]
    pub fn query_radius(&self, center: &Point3<f64>, radius: f64) -> Vec<T> {
        if radius < 0.0 || self.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(f64, T)> = Vec::new();
        self.for_cells_in_ball(center, radius, |item, distance| {
            hits.push((distance, item));
        });

        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        hits.into_iter().map(|(_, item)| item).collect()
    }

    /// Up to `k` items nearest to `center`, sorted by distance.
    ///
    /// With `max_radius` set, the search is bounded; otherwise the
    /// search ring grows until enough candidates are found or the whole
    /// grid has been visited.
    #[must_use]
    pub fn query_k_nearest(
        &self,
        center: &Point3<f64>,
        k: usize,
        max_radius: Option<f64>,
    ) -> Vec<T> {
        if k == 0 || self.is_empty() {
            return Vec::new();
        }

        if let Some(radius) = max_radius {
            let mut hits = self.query_radius(center, radius);
            hits.truncate(k);
            return hits;
        }

        // Grow the search radius until k items are inside the *inscribed*
        // ball of the visited cell block (anything that close is
        // guaranteed found), or everything has been collected.
        let mut radius = self.cell_size;
        loop {
            let hits = self.query_radius(center, radius);
            if hits.len() >= k {
                let mut hits = hits;
                hits.truncate(k);
                return hits;
            }
            if hits.len() == self.len() {
                return hits;
            }
            radius *= 2.0;
        }
    }

    fn for_cells_in_ball(
        &self,
        center: &Point3<f64>,
        radius: f64,
        mut visit: impl FnMut(T, f64),
    ) {
        let min = self.cell_of(&Point3::new(
            center.x - radius,
            center.y - radius,
            center.z - radius,
        ));
        let max = self.cell_of(&Point3::new(
            center.x + radius,
            center.y + radius,
            center.z + radius,
        ));

        // For a ball covering more cells than the map holds, scanning the
        // occupied buckets directly is cheaper and bounds the work.
        let span = |lo: i64, hi: i64| (i128::from(hi) - i128::from(lo) + 1) as u128;
        let block = span(min.0, max.0)
            .saturating_mul(span(min.1, max.1))
            .saturating_mul(span(min.2, max.2));
        if block > self.cells.len() as u128 {
            for (position, item) in self.positions.iter().map(|(item, p)| (p, *item)) {
                let distance = (position - center).norm();
                if distance <= radius {
                    visit(item, distance);
                }
            }
            return;
        }

        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                for cz in min.2..=max.2 {
                    let Some(bucket) = self.cells.get(&(cx, cy, cz)) else {
                        continue;
                    };
                    for &item in bucket {
                        if let Some(position) = self.positions.get(&item) {
                            let distance = (position - center).norm();
                            if distance <= radius {
                                visit(item, distance);
                            }
                        }
                    }
                }
            }
        }
    }
}
