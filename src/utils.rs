//! Utilities module.

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::error::BvhError;
use crate::Point3;

/// Fast floating point minimum.  This function matches the semantics of
///
/// ```no_compile
/// if x < y { x } else { y }
/// ```
///
/// which has efficient instruction sequences on many platforms (1 instruction on x86).  For most
/// values, it matches the semantics of `x.min(y)`; the special cases are:
///
/// ```text
/// min(-0.0, +0.0); +0.0
/// min(+0.0, -0.0): -0.0
/// min( NaN,  1.0):  1.0
/// min( 1.0,  NaN):  NaN
/// ```
///
/// Note: This exists because [`std::cmp::min`] requires Ord which floating point types do not satisfy
#[inline(always)]
pub fn fast_min<T: Copy + PartialOrd>(x: T, y: T) -> T {
    if x < y {
        x
    } else {
        y
    }
}

/// Fast floating point maximum.  This function matches the semantics of
///
/// ```no_compile
/// if x > y { x } else { y }
/// ```
///
/// which has efficient instruction sequences on many platforms (1 instruction on x86).  For most
/// values, it matches the semantics of `x.max(y)`; the special cases are:
///
/// ```text
/// max(-0.0, +0.0); +0.0
/// max(+0.0, -0.0): -0.0
/// max( NaN,  1.0):  1.0
/// max( 1.0,  NaN):  NaN
/// ```
///
/// Note: This exists because [`std::cmp::max`] requires Ord which floating point types do not satisfy
#[inline(always)]
pub fn fast_max<T: Copy + PartialOrd>(x: T, y: T) -> T {
    if x > y {
        x
    } else {
        y
    }
}

/// The midpoint of `min` and `max`, without overflowing for large finite values.
pub(crate) fn midpoint<T: BHValue>(min: T, max: T) -> T {
    let two = T::one() + T::one();
    let sum = min + max;
    if sum.is_finite() {
        sum / two
    } else {
        min / two + max / two
    }
}

/// The bounds and center of one shape, queried once before building.
/// Shapes are immutable while a tree is built, so the cache is equivalent to querying
/// the shape at every level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShapeBounds<T: BHValue> {
    /// Index of the shape in the caller's slice.
    pub index: usize,
    pub aabb: Aabb<T>,
    pub center: Point3<T>,
}

impl<T: BHValue> ShapeBounds<T> {
    /// Queries and validates the bounds of every shape.
    ///
    /// Fails on the first shape with NaN coordinates or inverted bounds.
    pub fn collect<S: Bounded<T>>(shapes: &[S]) -> Result<Vec<ShapeBounds<T>>, BvhError> {
        shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| {
                let aabb = shape.aabb();
                let center = shape.center();
                if !aabb.is_valid() || (0..3).any(|i| center[i].is_nan()) {
                    return Err(BvhError::InvalidBounds {
                        shape_index: index,
                        min: aabb.min.to_string(),
                        max: aabb.max.to_string(),
                    });
                }
                Ok(ShapeBounds {
                    index,
                    aabb,
                    center,
                })
            })
            .collect()
    }
}

/// Returns the joint [`Aabb`] of the shapes' bounds, and the [`Aabb`] spanned by
/// their centers.
pub(crate) fn joint_aabb_of_shapes<T: BHValue>(entries: &[ShapeBounds<T>]) -> (Aabb<T>, Aabb<T>) {
    let mut aabb = Aabb::empty();
    let mut centroid = Aabb::empty();
    for entry in entries {
        aabb.join_mut(&entry.aabb);
        centroid.grow_mut(&entry.center);
    }
    (aabb, centroid)
}
