//! Remeshing parameters.

/// Parameters for the adaptive remeshing loop.
///
/// All fields have workable defaults; the target edge length, when left
/// unset, is derived from the mesh as `bbox_diagonal / sqrt(V)`.
///
/// # Example
///
/// ```
/// use mesh_remesh::RemeshParams;
///
/// let params = RemeshParams::with_edge_length(0.5)
///     .with_iterations(3)
///     .with_damping(0.3);
/// assert_eq!(params.iterations, 3);
/// ```
#[derive(Debug, Clone)]
pub struct RemeshParams {
    /// Target edge length. `None` selects the automatic target.
    pub target_edge_length: Option<f64>,

    /// Fraction of the target below which an edge is collapsed.
    pub min_edge_length_ratio: f64,

    /// Fraction of the target above which an edge is split.
    pub max_edge_length_ratio: f64,

    /// Quality threshold used for the below-quality face counts in the
    /// report (quality is `2·inradius/circumradius`).
    pub min_triangle_quality: f64,

    /// Maximum number of iterations.
    pub iterations: u32,

    /// Smoothing blend factor in [0, 1]; 0 disables smoothing motion.
    pub smoothing_damping: f64,

    /// Keep user-marked feature edges through the loop.
    pub preserve_features: bool,

    /// Vertex pairs to mark as feature edges at import.
    pub feature_edges: Vec<(u32, u32)>,
}

impl Default for RemeshParams {
    fn default() -> Self {
        Self {
            target_edge_length: None,
            min_edge_length_ratio: 0.4,
            max_edge_length_ratio: 1.333,
            min_triangle_quality: 0.3,
            iterations: 5,
            smoothing_damping: 0.5,
            preserve_features: true,
            feature_edges: Vec::new(),
        }
    }
}

impl RemeshParams {
    /// Parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with an explicit target edge length.
    #[must_use]
    pub fn with_edge_length(target: f64) -> Self {
        Self {
            target_edge_length: Some(target),
            ..Self::default()
        }
    }

    /// A quick, coarse pass: two iterations.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            iterations: 2,
            ..Self::default()
        }
    }

    /// A patient, high-quality pass: more iterations and a tighter
    /// length band.
    #[must_use]
    pub fn high_quality() -> Self {
        Self {
            iterations: 10,
            min_edge_length_ratio: 0.5,
            max_edge_length_ratio: 1.25,
            ..Self::default()
        }
    }

    /// Set the target edge length.
    #[must_use]
    pub const fn with_target_length(mut self, target: f64) -> Self {
        self.target_edge_length = Some(target);
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the smoothing damping factor.
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.smoothing_damping = damping;
        self
    }

    /// Set the collapse/split ratio band.
    #[must_use]
    pub const fn with_length_ratios(mut self, min: f64, max: f64) -> Self {
        self.min_edge_length_ratio = min;
        self.max_edge_length_ratio = max;
        self
    }

    /// Set whether feature edges are preserved.
    #[must_use]
    pub const fn with_preserve_features(mut self, preserve: bool) -> Self {
        self.preserve_features = preserve;
        self
    }

    /// Set the feature-edge vertex pairs marked at import.
    #[must_use]
    pub fn with_feature_edges(mut self, pairs: Vec<(u32, u32)>) -> Self {
        self.feature_edges = pairs;
        self
    }

    /// The collapse threshold for a resolved target length.
    #[must_use]
    pub fn min_edge_length(&self, target: f64) -> f64 {
        target * self.min_edge_length_ratio
    }

    /// The split threshold for a resolved target length.
    #[must_use]
    pub fn max_edge_length(&self, target: f64) -> f64 {
        target * self.max_edge_length_ratio
    }
}
