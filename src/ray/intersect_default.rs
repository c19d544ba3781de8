//! This file contains the generic slab test behind [`Ray`]/[`Aabb`] intersections.

use super::Ray;
use crate::{
    aabb::Aabb,
    bounding_hierarchy::BHValue,
    utils::{fast_max, fast_min},
};

/// The [`RayIntersection`] trait holds the slab test shared by the boolean and the
/// distance flavours of [`Ray`]/[`Aabb`] intersection.
pub(crate) trait RayIntersection<T: BHValue> {
    /// Returns the entry and exit distances of the ray's line with the [`Aabb`].
    /// The entry distance is not clamped to the ray origin.
    fn ray_slab(&self, aabb: &Aabb<T>) -> (T, T);

    /// Returns whether the ray enters the [`Aabb`] at a non-negative distance,
    /// or starts inside of it.
    fn ray_intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        let (tmin, tmax) = self.ray_slab(aabb);
        tmax >= fast_max(tmin, T::zero())
    }
}

impl<T: BHValue> RayIntersection<T> for Ray<T> {
    fn ray_slab(&self, aabb: &Aabb<T>) -> (T, T) {
        let mut tmin = T::neg_infinity();
        let mut tmax = T::infinity();

        for i in 0..3 {
            let t1 = (aabb.min[i] - self.origin[i]) * self.inv_direction[i];
            let t2 = (aabb.max[i] - self.origin[i]) * self.inv_direction[i];

            // NaN slabs (origin on a slab plane of a parallel ray) keep the current
            // interval, as the candidate is passed first.
            tmin = fast_max(fast_min(t1, t2), tmin);
            tmax = fast_min(fast_max(t1, t2), tmax);
        }

        (tmin, tmax)
    }
}
