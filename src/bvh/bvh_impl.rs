//! This module defines [`Bvh`] and its building and query functions.
//!
//! [`Bvh`]: struct.Bvh.html
//!

use std::fmt;

use crate::aabb::{Aabb, Bounded, IntersectsAabb};
use crate::bounding_hierarchy::{BHValue, BoundingHierarchy};
use crate::bvh::iter::{BvhTraverseIterator, LeafIterator};
use crate::bvh::{BvhBuildOptions, BvhNode};
use crate::error::BvhError;
use crate::ray::{IntersectsRay, Ray};
use crate::utils::ShapeBounds;

use log::debug;

/// The [`Bvh`] data structure. Owns the tree of [`BvhNode`]s. The shapes stay owned by
/// the caller and are referenced by their index in the slice the [`Bvh`] was built from.
///
/// [`Bvh`]: struct.Bvh.html
/// [`BvhNode`]: enum.BvhNode.html
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bvh<T: BHValue> {
    /// The root of the tree.
    pub root: BvhNode<T>,
}

/// The closest shape hit by a [`Ray`], as found by [`Bvh::intersect`].
#[derive(Debug, PartialEq)]
pub struct Hit<'a, S, T> {
    /// Index of the shape in the slice the [`Bvh`] was built from.
    pub shape_index: usize,
    /// The shape itself.
    pub shape: &'a S,
    /// Distance from the ray origin along the ray.
    pub distance: T,
}

impl<'a, S, T: Copy> Clone for Hit<'a, S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S, T: Copy> Copy for Hit<'a, S, T> {}

impl<T: BHValue> Bvh<T> {
    /// Creates a new [`Bvh`] from the `shapes` slice, splitting until no further split
    /// separates the shapes.
    ///
    /// # Errors
    ///
    /// Returns [`BvhError::EmptyPartition`] if `shapes` is empty and
    /// [`BvhError::InvalidBounds`] if a shape reports NaN or inverted bounds.
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn build<S: Bounded<T>>(shapes: &[S]) -> Result<Bvh<T>, BvhError> {
        Self::build_with_options(shapes, &BvhBuildOptions::default())
    }

    /// Creates a new [`Bvh`] from the `shapes` slice, using the given [`BvhBuildOptions`].
    ///
    /// # Errors
    ///
    /// Same as [`Bvh::build`].
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn build_with_options<S: Bounded<T>>(
        shapes: &[S],
        options: &BvhBuildOptions,
    ) -> Result<Bvh<T>, BvhError> {
        if shapes.is_empty() {
            return Err(BvhError::EmptyPartition);
        }

        let entries = ShapeBounds::collect(shapes)?;
        let bvh = Bvh {
            root: BvhNode::build(entries, 0, options),
        };

        debug!(
            "built bvh over {} shapes: {} nodes, {} leaves, depth {}",
            shapes.len(),
            bvh.count(),
            bvh.leaf_count(),
            bvh.depth()
        );
        Ok(bvh)
    }

    /// Creates a new [`Bvh`] from the `shapes` slice, building large sibling subtrees on
    /// the rayon thread pool. The result is identical to [`Bvh::build`].
    ///
    /// # Errors
    ///
    /// Same as [`Bvh::build`].
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    #[cfg(feature = "rayon")]
    pub fn build_par<S: Bounded<T>>(shapes: &[S]) -> Result<Bvh<T>, BvhError> {
        Self::build_with_options(shapes, &BvhBuildOptions::new().with_parallel(true))
    }

    /// Returns the root node.
    pub fn root(&self) -> &BvhNode<T> {
        &self.root
    }

    /// Returns the joint [`Aabb`] of all shapes.
    pub fn bounds(&self) -> &Aabb<T> {
        self.root.bounds()
    }

    /// Returns the total number of nodes, leaves included.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// Returns the length of the longest path from the root to a leaf.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Returns the number of shapes referenced by the leaves.
    pub fn shape_count(&self) -> usize {
        self.root.shape_count()
    }

    /// Iterates the leaves depth-first, left to right.
    pub fn leaves(&self) -> LeafIterator<'_, T> {
        LeafIterator::new(&self.root)
    }

    /// Traverses the [`Bvh`].
    /// Returns the shapes of every leaf whose [`Aabb`] is touched by `query`, in
    /// left-to-right order. This is a candidate set: shapes themselves are not tested.
    ///
    /// [`Bvh`]: struct.Bvh.html
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub fn traverse<'a, Q: IntersectsAabb<T>, S>(
        &'a self,
        query: &Q,
        shapes: &'a [S],
    ) -> Vec<&'a S> {
        let mut indices = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if !query.intersects_aabb(node.bounds()) {
                continue;
            }
            match node {
                BvhNode::Leaf { shape_indices, .. } => indices.extend_from_slice(shape_indices),
                BvhNode::Node {
                    child_l, child_r, ..
                } => {
                    stack.push(&**child_r);
                    stack.push(&**child_l);
                }
            }
        }
        indices.iter().map(|index| &shapes[*index]).collect()
    }

    /// Creates a [`BvhTraverseIterator`] to traverse the [`Bvh`].
    /// Yields the same shapes as [`Bvh::traverse`] without collecting them first.
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn traverse_iterator<'bvh, 'shape, Q: IntersectsAabb<T>, S: Bounded<T>>(
        &'bvh self,
        query: &'bvh Q,
        shapes: &'shape [S],
    ) -> BvhTraverseIterator<'bvh, 'shape, T, Q, S> {
        BvhTraverseIterator::new(self, query, shapes)
    }

    /// Finds the shape closest to the origin of `ray`.
    ///
    /// Children are visited nearest first, and a subtree is skipped once the ray enters
    /// its [`Aabb`] farther away than the best hit found so far. On equal distances the
    /// shape found first wins.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::bvh::Bvh;
    /// use progression_bvh::ray::Ray;
    /// use progression_bvh::shapes::Sphere;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let spheres = vec![
    ///     Sphere::new(Point3::new(0.0f64, 0.0, 10.0), 1.0),
    ///     Sphere::new(Point3::new(0.0, 0.0, 5.0), 1.0),
    ///     Sphere::new(Point3::new(5.0, 0.0, 5.0), 1.0),
    /// ];
    /// let bvh = Bvh::build(&spheres).unwrap();
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    /// let hit = bvh.intersect(&ray, &spheres).unwrap();
    /// assert_eq!(hit.shape_index, 1);
    /// assert!((hit.distance - 4.0).abs() < 1e-6);
    /// ```
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub fn intersect<'a, S: IntersectsRay<T>>(
        &self,
        ray: &Ray<T>,
        shapes: &'a [S],
    ) -> Option<Hit<'a, S, T>> {
        let entry = ray.intersection_slice_for_aabb(self.root.bounds())?.0;
        let mut best: Option<Hit<'a, S, T>> = None;
        let mut stack = vec![(&self.root, entry)];

        while let Some((node, entry)) = stack.pop() {
            if let Some(hit) = &best {
                if entry > hit.distance {
                    continue;
                }
            }

            match node {
                BvhNode::Leaf { shape_indices, .. } => {
                    for &shape_index in shape_indices {
                        let shape = &shapes[shape_index];
                        if let Some(distance) = shape.intersect_ray(ray) {
                            if best.as_ref().map_or(true, |hit| distance < hit.distance) {
                                best = Some(Hit {
                                    shape_index,
                                    shape,
                                    distance,
                                });
                            }
                        }
                    }
                }
                BvhNode::Node {
                    child_l, child_r, ..
                } => {
                    let hit_l = ray.intersection_slice_for_aabb(child_l.bounds());
                    let hit_r = ray.intersection_slice_for_aabb(child_r.bounds());
                    // The nearer child goes on top, the left one on equal entries.
                    match (hit_l, hit_r) {
                        (Some((entry_l, _)), Some((entry_r, _))) => {
                            if entry_r < entry_l {
                                stack.push((&**child_l, entry_l));
                                stack.push((&**child_r, entry_r));
                            } else {
                                stack.push((&**child_r, entry_r));
                                stack.push((&**child_l, entry_l));
                            }
                        }
                        (Some((entry_l, _)), None) => stack.push((&**child_l, entry_l)),
                        (None, Some((entry_r, _))) => stack.push((&**child_r, entry_r)),
                        (None, None) => {}
                    }
                }
            }
        }
        best
    }

    /// Prints the [`Bvh`] in a tree-like visualization.
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn pretty_print(&self) {
        println!("{}", self);
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(&self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            let padding = " ".repeat(depth);
            match node {
                BvhNode::Leaf {
                    bounds,
                    shape_indices,
                } => writeln!(f, "{}leaf {} shapes={:?}", padding, bounds, shape_indices)?,
                BvhNode::Node {
                    bounds,
                    split_axis,
                    child_l,
                    child_r,
                } => {
                    writeln!(f, "{}node axis={} {}", padding, split_axis, bounds)?;
                    stack.push((&**child_r, depth + 1));
                    stack.push((&**child_l, depth + 1));
                }
            }
        }
        Ok(())
    }

    /// Checks the structural invariants of the tree against the shapes it was built from:
    /// every leaf holds at least one shape, every node's [`Aabb`] is exactly the union of
    /// what lies beneath it, and every shape appears in exactly one leaf.
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub fn is_consistent<S: Bounded<T>>(&self, shapes: &[S]) -> bool {
        let mut seen = vec![false; shapes.len()];
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Leaf {
                    bounds,
                    shape_indices,
                } => {
                    if shape_indices.is_empty() {
                        return false;
                    }
                    let mut joint = Aabb::empty();
                    for &index in shape_indices {
                        match seen.get_mut(index) {
                            Some(seen) if !*seen => *seen = true,
                            _ => return false,
                        }
                        joint.join_mut(&shapes[index].aabb());
                    }
                    if joint != *bounds {
                        return false;
                    }
                }
                BvhNode::Node {
                    bounds,
                    child_l,
                    child_r,
                    ..
                } => {
                    if child_l.bounds().join(child_r.bounds()) != *bounds {
                        return false;
                    }
                    stack.push(&**child_r);
                    stack.push(&**child_l);
                }
            }
        }
        seen.iter().all(|&s| s)
    }

    /// Assert version of [`Bvh::is_consistent`].
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    pub fn assert_consistent<S: Bounded<T>>(&self, shapes: &[S]) {
        let mut seen = vec![false; shapes.len()];
        let mut stack = vec![(&self.root, 0u32)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                BvhNode::Leaf {
                    bounds,
                    shape_indices,
                } => {
                    assert!(!shape_indices.is_empty(), "Empty leaf at depth {}", depth);
                    let mut joint = Aabb::empty();
                    for &index in shape_indices {
                        assert!(
                            index < shapes.len(),
                            "Shape index {} out of range for {} shapes",
                            index,
                            shapes.len()
                        );
                        assert!(!seen[index], "Shape {} appears in more than one leaf", index);
                        seen[index] = true;
                        joint.join_mut(&shapes[index].aabb());
                    }
                    assert_eq!(
                        joint, *bounds,
                        "Leaf bounds differ from its shapes' bounds.\n\tDepth: {}\n\tShapes: {:?}",
                        depth, shape_indices
                    );
                }
                BvhNode::Node {
                    bounds,
                    child_l,
                    child_r,
                    ..
                } => {
                    let joint = child_l.bounds().join(child_r.bounds());
                    assert_eq!(
                        joint, *bounds,
                        "Node bounds differ from the union of its children.\n\tDepth: {}",
                        depth
                    );
                    stack.push((&**child_r, depth + 1));
                    stack.push((&**child_l, depth + 1));
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            panic!("Shape {} is not referenced by any leaf", missing);
        }
    }

    /// Check that the [`Aabb`]s in the [`Bvh`] are tight, which means that parent
    /// [`Aabb`]s are not larger than they should be, within `epsilon`. Unlike
    /// [`Bvh::assert_consistent`] this does not need the shapes.
    ///
    /// # Panics
    ///
    /// Panics if a node's [`Aabb`] differs from the union of its children's.
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn assert_tight(&self, epsilon: T) {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let BvhNode::Node {
                bounds,
                child_l,
                child_r,
                ..
            } = node
            {
                let joint = child_l.bounds().join(child_r.bounds());
                assert!(
                    joint.relative_eq(bounds, epsilon),
                    "real_aabb={} stored_aabb={}",
                    joint,
                    bounds
                );
                stack.push(&**child_r);
                stack.push(&**child_l);
            }
        }
    }
}

impl<T: BHValue> fmt::Display for Bvh<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f)
    }
}

impl<T: BHValue> BoundingHierarchy<T> for Bvh<T> {
    fn build<S: Bounded<T>>(shapes: &[S]) -> Result<Bvh<T>, BvhError> {
        Bvh::build(shapes)
    }

    fn traverse<'a, Q: IntersectsAabb<T>, S: Bounded<T>>(
        &'a self,
        query: &Q,
        shapes: &'a [S],
    ) -> Vec<&'a S> {
        self.traverse(query, shapes)
    }

    fn pretty_print(&self) {
        self.pretty_print();
    }
}
