use crate::aabb::Aabb;
use crate::axis::Axis;
use crate::bounding_hierarchy::BHValue;
use crate::bvh::BvhBuildOptions;
use crate::utils::{joint_aabb_of_shapes, midpoint, ShapeBounds};

use log::trace;

/// The [`BvhNode`] enum that describes a node in a [`Bvh`].
/// It's either a leaf node and references one or more shapes (by holding their indices)
/// or a regular node that owns exactly two child nodes.
/// Both kinds store the joint [`Aabb`] of every shape beneath them.
///
/// [`Aabb`]: ../aabb/struct.Aabb.html
/// [`Bvh`]: struct.Bvh.html
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvhNode<T: BHValue> {
    /// Leaf node.
    Leaf {
        /// The joint [`Aabb`] of the shapes in this leaf.
        bounds: Aabb<T>,

        /// Indices of the shapes contained in this leaf. Never empty.
        shape_indices: Vec<usize>,
    },
    /// Inner node.
    Node {
        /// The joint [`Aabb`] of both subtrees.
        bounds: Aabb<T>,

        /// The axis along which the shapes of this node were split.
        split_axis: Axis,

        /// The subtree holding the shapes with centers at or below the split plane.
        child_l: Box<BvhNode<T>>,

        /// The subtree holding the shapes with centers above the split plane.
        child_r: Box<BvhNode<T>>,
    },
}

/// Pending work of the iterative builder.
enum BuildStep<T: BHValue> {
    /// Build the subtree over these shapes.
    Split {
        shapes: Vec<ShapeBounds<T>>,
        depth: u32,
    },
    /// Combine the two most recently built subtrees into one node.
    Join { bounds: Aabb<T>, split_axis: Axis },
}

/// Intermediate result of splitting the shapes of one node.
enum Prepared<T: BHValue> {
    Leaf(BvhNode<T>),
    Split {
        bounds: Aabb<T>,
        split_axis: Axis,
        child_l: Vec<ShapeBounds<T>>,
        child_r: Vec<ShapeBounds<T>>,
    },
}

impl<T: BHValue> BvhNode<T> {
    /// Returns the joint [`Aabb`] of all shapes beneath this node.
    pub fn bounds(&self) -> &Aabb<T> {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Node { bounds, .. } => bounds,
        }
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Returns the indices of the shapes held by this node. Empty for inner nodes.
    pub fn shape_indices(&self) -> &[usize] {
        match self {
            BvhNode::Leaf { shape_indices, .. } => shape_indices,
            BvhNode::Node { .. } => &[],
        }
    }

    /// Returns the left and right child, or `None` for leaves.
    pub fn children(&self) -> Option<(&BvhNode<T>, &BvhNode<T>)> {
        match self {
            BvhNode::Node {
                child_l, child_r, ..
            } => Some((child_l, child_r)),
            BvhNode::Leaf { .. } => None,
        }
    }

    /// Returns the axis this node was split along, or `None` for leaves.
    pub fn split_axis(&self) -> Option<Axis> {
        match *self {
            BvhNode::Node { split_axis, .. } => Some(split_axis),
            BvhNode::Leaf { .. } => None,
        }
    }

    /// Returns the number of nodes in the subtree rooted at this node, including itself.
    pub fn count(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Returns the length of the longest path from this node down to a leaf.
    /// A leaf has depth `0`.
    pub fn depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((child_l, child_r)) = node.children() {
                stack.push((child_r, depth + 1));
                stack.push((child_l, depth + 1));
            }
        }
        max_depth
    }

    /// Returns the number of leaves in the subtree rooted at this node.
    pub fn leaf_count(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Returns the number of shape references in the leaves beneath this node.
    pub fn shape_count(&self) -> usize {
        self.iter_nodes()
            .map(|node| node.shape_indices().len())
            .sum()
    }

    /// Visits every node of the subtree, parents before children, left before right.
    pub(crate) fn iter_nodes(&self) -> impl Iterator<Item = &BvhNode<T>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some((child_l, child_r)) = node.children() {
                stack.push(child_r);
                stack.push(child_l);
            }
            Some(node)
        })
    }

    /// Builds a [`BvhNode`] by splitting the shapes at the midpoint of their centers along
    /// the axis of largest spread, until a split fails to separate them.
    ///
    /// Pending subtrees are kept on an explicit work stack, so arbitrarily deep trees do
    /// not exhaust the call stack. `shapes` must not be empty.
    ///
    /// [`BvhNode`]: enum.BvhNode.html
    ///
    pub(crate) fn build(
        shapes: Vec<ShapeBounds<T>>,
        depth: u32,
        options: &BvhBuildOptions,
    ) -> BvhNode<T> {
        let mut work = vec![BuildStep::Split { shapes, depth }];
        let mut built: Vec<BvhNode<T>> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                BuildStep::Split { shapes, depth } => {
                    match Self::prep_build(shapes, depth, options) {
                        Prepared::Leaf(leaf) => built.push(leaf),
                        Prepared::Split {
                            bounds,
                            split_axis,
                            child_l,
                            child_r,
                        } => {
                            if options.forks(child_l.len(), child_r.len()) {
                                let (child_l, child_r) =
                                    Self::build_forked(child_l, child_r, depth + 1, options);
                                built.push(BvhNode::Node {
                                    bounds,
                                    split_axis,
                                    child_l: Box::new(child_l),
                                    child_r: Box::new(child_r),
                                });
                            } else {
                                // The left side is popped first, so it is finished first.
                                work.push(BuildStep::Join { bounds, split_axis });
                                work.push(BuildStep::Split {
                                    shapes: child_r,
                                    depth: depth + 1,
                                });
                                work.push(BuildStep::Split {
                                    shapes: child_l,
                                    depth: depth + 1,
                                });
                            }
                        }
                    }
                }
                BuildStep::Join { bounds, split_axis } => {
                    // Both subtrees of this node are the last two finished nodes.
                    let child_r = built.pop();
                    let child_l = built.pop();
                    match (child_l, child_r) {
                        (Some(child_l), Some(child_r)) => built.push(BvhNode::Node {
                            bounds,
                            split_axis,
                            child_l: Box::new(child_l),
                            child_r: Box::new(child_r),
                        }),
                        _ => unreachable!("join without two finished subtrees"),
                    }
                }
            }
        }

        debug_assert_eq!(built.len(), 1);
        match built.pop() {
            Some(root) => root,
            None => unreachable!("the work stack always finishes with the root"),
        }
    }

    #[cfg(feature = "rayon")]
    fn build_forked(
        child_l: Vec<ShapeBounds<T>>,
        child_r: Vec<ShapeBounds<T>>,
        depth: u32,
        options: &BvhBuildOptions,
    ) -> (BvhNode<T>, BvhNode<T>) {
        rayon::join(
            || Self::build(child_l, depth, options),
            || Self::build(child_r, depth, options),
        )
    }

    #[cfg(not(feature = "rayon"))]
    fn build_forked(
        child_l: Vec<ShapeBounds<T>>,
        child_r: Vec<ShapeBounds<T>>,
        depth: u32,
        options: &BvhBuildOptions,
    ) -> (BvhNode<T>, BvhNode<T>) {
        (
            Self::build(child_l, depth, options),
            Self::build(child_r, depth, options),
        )
    }

    /// Computes the bounds of one node and decides whether it becomes a leaf, or how its
    /// shapes are divided among the two children.
    fn prep_build(
        shapes: Vec<ShapeBounds<T>>,
        depth: u32,
        options: &BvhBuildOptions,
    ) -> Prepared<T> {
        let (bounds, centroid_bounds) = joint_aabb_of_shapes(&shapes);

        if options.stops_early(shapes.len(), depth) {
            return Prepared::Leaf(Self::leaf(bounds, &shapes));
        }

        // Find the axis along which the shape centers are spread the most.
        let split_axis = centroid_bounds.largest_axis();
        let axis = split_axis.index();
        let mid = midpoint(centroid_bounds.min[axis], centroid_bounds.max[axis]);

        // Shapes centered on the plane belong to the left side. `partition` keeps the
        // input order on both sides.
        let (child_l, child_r): (Vec<_>, Vec<_>) = shapes
            .into_iter()
            .partition(|shape| mid >= shape.center[axis]);

        // All centers on one side of the plane: splitting further would not make
        // progress, so everything stays together in one leaf.
        if child_l.is_empty() || child_r.is_empty() {
            let shapes = if child_l.is_empty() { child_r } else { child_l };
            trace!(
                "degenerate split along {} at depth {}: {} shapes in leaf",
                split_axis,
                depth,
                shapes.len()
            );
            return Prepared::Leaf(Self::leaf(bounds, &shapes));
        }

        Prepared::Split {
            bounds,
            split_axis,
            child_l,
            child_r,
        }
    }

    fn leaf(bounds: Aabb<T>, shapes: &[ShapeBounds<T>]) -> BvhNode<T> {
        BvhNode::Leaf {
            bounds,
            shape_indices: shapes.iter().map(|shape| shape.index).collect(),
        }
    }
}
