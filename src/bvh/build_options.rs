//! Knobs for [`Bvh`] construction.
//!
//! [`Bvh`]: struct.Bvh.html

/// A split whose two sides both hold at least this many shapes builds the sides on the
/// rayon thread pool, if [`BvhBuildOptions::parallel`] is set.
pub const PARALLEL_THRESHOLD: usize = 64;

/// Options for building a [`Bvh`].
///
/// The default performs no early termination at all: recursion only stops once a split
/// fails to separate the shapes, which reproduces the plain midpoint-split tree. Large
/// scenes with clustered shapes usually want a `leaf_threshold` or `max_depth` to bound
/// the recursion.
///
/// # Examples
/// ```
/// use progression_bvh::bvh::BvhBuildOptions;
///
/// let options = BvhBuildOptions::new().with_leaf_threshold(4).with_max_depth(32);
/// assert_eq!(options.leaf_threshold, Some(4));
/// assert_eq!(options.max_depth, Some(32));
/// assert!(!options.parallel);
/// ```
///
/// [`Bvh`]: struct.Bvh.html
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BvhBuildOptions {
    /// Nodes holding at most this many shapes become leaves without being split.
    pub leaf_threshold: Option<usize>,

    /// Nodes at this depth become leaves without being split. The root has depth `0`.
    pub max_depth: Option<u32>,

    /// Build sibling subtrees in parallel. Only has an effect with the `rayon` feature.
    /// The resulting tree is identical to the sequentially built one.
    pub parallel: bool,
}

impl BvhBuildOptions {
    /// Creates the default options.
    pub fn new() -> BvhBuildOptions {
        BvhBuildOptions::default()
    }

    /// Sets [`BvhBuildOptions::leaf_threshold`].
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> BvhBuildOptions {
        self.leaf_threshold = Some(leaf_threshold);
        self
    }

    /// Sets [`BvhBuildOptions::max_depth`].
    pub fn with_max_depth(mut self, max_depth: u32) -> BvhBuildOptions {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets [`BvhBuildOptions::parallel`].
    pub fn with_parallel(mut self, parallel: bool) -> BvhBuildOptions {
        self.parallel = parallel;
        self
    }

    /// Whether a node with `shape_count` shapes at `depth` stops splitting regardless of
    /// where its shapes lie.
    pub(crate) fn stops_early(&self, shape_count: usize, depth: u32) -> bool {
        self.leaf_threshold
            .map_or(false, |threshold| shape_count <= threshold)
            || self.max_depth.map_or(false, |max_depth| depth >= max_depth)
    }

    /// Whether the two sides of a split are built in parallel.
    ///
    /// Both sides must be large, so nested forks halve the shape count each time and
    /// their nesting stays logarithmic even in very deep trees.
    pub(crate) fn forks(&self, left_count: usize, right_count: usize) -> bool {
        cfg!(feature = "rayon")
            && self.parallel
            && left_count.min(right_count) >= PARALLEL_THRESHOLD
    }
}
