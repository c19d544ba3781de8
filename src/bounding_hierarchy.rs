//! This module defines the [`BoundingHierarchy`] trait and the scalar bound [`BHValue`].

use crate::aabb::{Bounded, IntersectsAabb};
use crate::error::BvhError;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, Scalar};
use num_traits::Float;
use std::fmt::Display;

/// Encapsulates the required traits for the value type used in the [`BoundingHierarchy`]
/// and its building blocks. Implemented for every type which satisfies the bounds,
/// in practice `f32` and `f64`.
pub trait BHValue:
    Scalar
    + Copy
    + Float
    + ClosedAddAssign
    + ClosedSubAssign
    + ClosedMulAssign
    + ClosedDivAssign
    + Display
    + Send
    + Sync
{
}

impl<T> BHValue for T where
    T: Scalar
        + Copy
        + Float
        + ClosedAddAssign
        + ClosedSubAssign
        + ClosedMulAssign
        + ClosedDivAssign
        + Display
        + Send
        + Sync
{
}

/// This trait defines an acceleration structure with space partitioning.
/// This structure is used to efficiently compute ray-scene intersections.
pub trait BoundingHierarchy<T: BHValue>: Sized {
    /// Creates a new [`BoundingHierarchy`] from the `shapes` slice.
    ///
    /// # Errors
    ///
    /// Fails if `shapes` is empty or if any of the shapes reports malformed bounds.
    fn build<S: Bounded<T>>(shapes: &[S]) -> Result<Self, BvhError>;

    /// Traverses the [`BoundingHierarchy`].
    /// Returns a subset of `shapes`, in which the leaves holding the elements were touched
    /// by `query`.
    fn traverse<'a, Q: IntersectsAabb<T>, S: Bounded<T>>(
        &'a self,
        query: &Q,
        shapes: &'a [S],
    ) -> Vec<&'a S>;

    /// Prints the [`BoundingHierarchy`] in a tree-like visualization.
    fn pretty_print(&self);
}
