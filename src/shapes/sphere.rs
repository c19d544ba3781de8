//! This module defines a Sphere and its intersection algorithms

use crate::aabb::{Aabb, Bounded, IntersectsAabb};
use crate::bounding_hierarchy::BHValue;
use crate::ray::{IntersectsRay, Ray};
use crate::{Point3, Vector3};

/// A representation of a Sphere. Can be stored in a [`Bvh`] and also serves as a
/// query volume for [`Bvh::traverse`].
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
/// [`Bvh::traverse`]: ../bvh/struct.Bvh.html#method.traverse
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere<T: BHValue> {
    /// Center of the sphere
    pub center: Point3<T>,
    /// Radius of the sphere
    pub radius: T,
}

impl<T: BHValue> Sphere<T> {
    /// Creates a sphere centered on a given point with a radius.
    ///
    /// # Panics
    /// Panics, in debug mode, if the radius is negative.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::shapes::Sphere;
    /// use nalgebra::Point3;
    ///
    /// let sphere = Sphere::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// assert_eq!(sphere.center, Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(sphere.radius, 1.0)
    /// ```
    pub fn new(center: Point3<T>, radius: T) -> Sphere<T> {
        debug_assert!(radius >= T::zero());
        Sphere { center, radius }
    }

    /// Returns true if this [`Sphere`] contains the [`Point3`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::shapes::Sphere;
    /// use nalgebra::Point3;
    ///
    /// let sphere = Sphere::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// let point = Point3::new(1.25, 1.25, 1.25);
    ///
    /// assert!(sphere.contains(&point));
    /// ```
    pub fn contains(&self, point: &Point3<T>) -> bool {
        let offset = *point - self.center;
        // Squaring the RHS is faster than computing the square root of the LHS.
        offset.dot(&offset) <= self.radius * self.radius
    }
}

impl<T: BHValue> Bounded<T> for Sphere<T> {
    fn aabb(&self) -> Aabb<T> {
        let half_size = Vector3::new(self.radius, self.radius, self.radius);
        Aabb::with_bounds(self.center - half_size, self.center + half_size)
    }

    fn center(&self) -> Point3<T> {
        self.center
    }
}

impl<T: BHValue> IntersectsAabb<T> for Sphere<T> {
    fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        // https://gamemath.com/book/geomtests.html#intersection_sphere_aabb
        // Finding the point in/on the AABB that is closest to the sphere's center and
        // testing if that point is in/on the sphere.
        let mut distance_squared = T::zero();
        for i in 0..3 {
            let closest_on_aabb = self.center[i].max(aabb.min[i]).min(aabb.max[i]);
            let delta = closest_on_aabb - self.center[i];
            distance_squared += delta * delta;
        }
        distance_squared <= self.radius * self.radius
    }
}

impl<T: BHValue> IntersectsRay<T> for Sphere<T> {
    fn intersect_ray(&self, ray: &Ray<T>) -> Option<T> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let half_b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;

        if discriminant < T::zero() {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the near root, fall back to the far one when starting inside.
        let near = (-half_b - sqrtd) / a;
        if near >= T::zero() {
            return Some(near);
        }
        let far = (-half_b + sqrtd) / a;
        if far >= T::zero() {
            Some(far)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::{Bounded, IntersectsAabb};
    use crate::ray::IntersectsRay;
    use crate::shapes::Sphere;
    use crate::testbase::{TAabb3, TPoint3, TRay3, TVector3};

    use float_eq::assert_float_eq;

    #[test]
    fn sphere_contains() {
        let sphere = Sphere::new(TPoint3::new(3.0, 4.0, 5.0), 1.5);

        // Sphere should contain its own center.
        assert!(sphere.contains(&sphere.center));

        // Test some manually-selected points.
        let just_inside = TPoint3::new(3.04605, 3.23758, 3.81607);
        let just_outside = TPoint3::new(3.06066, 3.15813, 3.70917);
        assert!(sphere.contains(&just_inside));
        assert!(!sphere.contains(&just_outside));
    }

    #[test]
    fn sphere_bounds_and_center() {
        let sphere = Sphere::new(TPoint3::new(1.0, 2.0, 3.0), 2.0);
        let aabb = sphere.aabb();
        assert_eq!(aabb.min, TPoint3::new(-1.0, 0.0, 1.0));
        assert_eq!(aabb.max, TPoint3::new(3.0, 4.0, 5.0));
        assert_eq!(Bounded::center(&sphere), TPoint3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn sphere_intersects_aabb() {
        let sphere = Sphere::new(TPoint3::new(1.0, 1.0, 1.0), 1.0);
        let near = TAabb3::with_bounds(TPoint3::new(1.25, 1.25, 1.25), TPoint3::new(3.0, 3.0, 3.0));
        let far = TAabb3::with_bounds(TPoint3::new(2.5, 2.5, 2.5), TPoint3::new(3.0, 3.0, 3.0));
        assert!(sphere.intersects_aabb(&near));
        assert!(!sphere.intersects_aabb(&far));
    }

    #[test]
    fn ray_hits_sphere_in_front() {
        let sphere = Sphere::new(TPoint3::new(0.0, 0.0, 10.0), 2.0);
        let ray = TRay3::new(TPoint3::new(0.0, 0.0, 0.0), TVector3::new(0.0, 0.0, 1.0));
        assert_float_eq!(sphere.intersect_ray(&ray).unwrap(), 8.0, abs <= 1e-5);

        // From inside the far side is hit.
        let ray = TRay3::new(TPoint3::new(0.0, 0.0, 10.0), TVector3::new(0.0, 0.0, 1.0));
        assert_float_eq!(sphere.intersect_ray(&ray).unwrap(), 2.0, abs <= 1e-5);

        // Behind the origin nothing is hit.
        let ray = TRay3::new(TPoint3::new(0.0, 0.0, 20.0), TVector3::new(0.0, 0.0, 1.0));
        assert_eq!(sphere.intersect_ray(&ray), None);

        // Passing beside the sphere.
        let ray = TRay3::new(TPoint3::new(3.0, 0.0, 0.0), TVector3::new(0.0, 0.0, 1.0));
        assert_eq!(sphere.intersect_ray(&ray), None);
    }
}
