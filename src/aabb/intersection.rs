use crate::aabb::Aabb;
use crate::bounding_hierarchy::BHValue;
use crate::Point3;

/// A trait implemented by things that may or may not intersect an [`Aabb`] and, by extension,
/// things that can be used to traverse a [`Bvh`].
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
pub trait IntersectsAabb<T: BHValue> {
    /// Returns whether this object intersects an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::{Aabb, IntersectsAabb};
    /// use nalgebra::Point3;
    ///
    /// struct XyPlane;
    ///
    /// impl IntersectsAabb<f32> for XyPlane {
    ///     fn intersects_aabb(&self, aabb: &Aabb<f32>) -> bool {
    ///         aabb.min.z <= 0.0 && aabb.max.z >= 0.0
    ///     }
    /// }
    ///
    /// let xy_plane = XyPlane;
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(xy_plane.intersects_aabb(&aabb));
    /// ```
    fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool;
}

impl<T: BHValue> IntersectsAabb<T> for Aabb<T> {
    fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        for i in 0..3 {
            if self.max[i] < aabb.min[i] || aabb.max[i] < self.min[i] {
                return false;
            }
        }
        true
    }
}

impl<T: BHValue> IntersectsAabb<T> for Point3<T> {
    fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        aabb.contains(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::IntersectsAabb;
    use crate::testbase::{TAabb3, TPoint3};

    #[test]
    fn test_touching_aabbs_intersect() {
        let a = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        let b = TAabb3::with_bounds(TPoint3::new(1.0, 0.0, 0.0), TPoint3::new(2.0, 1.0, 1.0));
        let c = TAabb3::with_bounds(TPoint3::new(1.5, 0.0, 0.0), TPoint3::new(2.0, 1.0, 1.0));
        assert!(a.intersects_aabb(&b));
        assert!(b.intersects_aabb(&a));
        assert!(!a.intersects_aabb(&c));
        assert!(b.intersects_aabb(&c));
    }

    #[test]
    fn test_point_intersects_containing_aabb() {
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        assert!(TPoint3::new(0.5, 1.0, 0.0).intersects_aabb(&aabb));
        assert!(!TPoint3::new(0.5, 1.5, 0.0).intersects_aabb(&aabb));
    }
}
