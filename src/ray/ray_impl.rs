//! This module defines a Ray structure and intersection algorithms
//! for axis aligned bounding boxes and triangles.

use crate::aabb::{Aabb, IntersectsAabb};
use crate::bounding_hierarchy::BHValue;
use crate::utils::fast_max;
use crate::{Point3, Vector3};

use super::intersect_default::RayIntersection;

/// A struct which defines a ray and some of its cached values.
#[derive(Debug, Clone, Copy)]
pub struct Ray<T: BHValue> {
    /// The ray origin.
    pub origin: Point3<T>,

    /// The ray direction.
    pub direction: Vector3<T>,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub inv_direction: Vector3<T>,
}

/// A struct which is returned by the [`Ray::intersects_triangle()`] method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<T> {
    /// Distance from the ray origin to the intersection point.
    pub distance: T,

    /// U coordinate of the intersection.
    pub u: T,

    /// V coordinate of the intersection.
    pub v: T,
}

impl<T> Intersection<T> {
    /// Constructs an [`Intersection`]. `distance` should be set to positive infinity,
    /// if the intersection does not occur.
    pub fn new(distance: T, u: T, v: T) -> Intersection<T> {
        Intersection { distance, u, v }
    }
}

/// A trait implemented by shapes which can report where a [`Ray`] hits them.
/// Needed by [`Bvh::intersect`] to find the nearest shape along a ray.
///
/// [`Bvh::intersect`]: ../bvh/struct.Bvh.html#method.intersect
pub trait IntersectsRay<T: BHValue> {
    /// Returns the distance from the ray origin to the nearest hit in front of the origin,
    /// or `None` if the ray misses.
    fn intersect_ray(&self, ray: &Ray<T>) -> Option<T>;
}

impl<T: BHValue> Ray<T> {
    /// Creates a new [`Ray`] from an `origin` and a `direction`.
    /// `direction` will be normalized.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0, 0.0, 0.0);
    /// let direction = Vector3::new(4.0, 0.0, 0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, Vector3::new(1.0, 0.0, 0.0));
    /// ```
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `direction` has no length, since it cannot be
    /// normalized.
    ///
    /// [`Ray`]: struct.Ray.html
    ///
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Ray<T> {
        let length = direction.dot(&direction).sqrt();
        debug_assert!(length > T::zero(), "ray direction {} has no length", direction);
        let direction = direction / length;
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| T::one() / x),
        }
    }

    /// Returns the point at distance `t` along the ray.
    pub fn at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }

    /// Tests the intersection of a [`Ray`] with an [`Aabb`] using the slab method.
    /// A ray which starts inside the [`Aabb`] intersects it.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use progression_bvh::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0, 0.0, 0.0);
    /// let direction = Vector3::new(1.0, 0.0, 0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// let point1 = Point3::new(99.9, -1.0, -1.0);
    /// let point2 = Point3::new(100.1, 1.0, 1.0);
    /// let aabb = Aabb::with_bounds(point1, point2);
    ///
    /// assert!(ray.intersects_aabb(&aabb));
    /// ```
    ///
    /// [`Ray`]: struct.Ray.html
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        self.ray_intersects_aabb(aabb)
    }

    /// Intersect [`Aabb`] by [`Ray`].
    /// Returns the distance from the ray origin to the entry point (zero when the origin
    /// lies inside the [`Aabb`]) and the distance to the exit point, or `None` on a miss.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use progression_bvh::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, 2.0), Point3::new(1.0, 1.0, 5.0));
    ///
    /// assert_eq!(ray.intersection_slice_for_aabb(&aabb), Some((2.0, 5.0)));
    /// ```
    pub fn intersection_slice_for_aabb(&self, aabb: &Aabb<T>) -> Option<(T, T)> {
        let (tmin, tmax) = self.ray_slab(aabb);
        let entry_distance = fast_max(tmin, T::zero());
        if tmax >= entry_distance {
            Some((entry_distance, tmax))
        } else {
            None
        }
    }

    /// Implementation of the
    /// [Möller-Trumbore triangle/ray intersection algorithm](https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm).
    /// Returns the distance to the intersection, as well as
    /// the u and v coordinates of the intersection.
    /// The distance is set to +INFINITY if the ray does not intersect the triangle, or hits
    /// it from behind.
    #[allow(clippy::many_single_char_names)]
    pub fn intersects_triangle(
        &self,
        a: &Point3<T>,
        b: &Point3<T>,
        c: &Point3<T>,
    ) -> Intersection<T> {
        let a_to_b = *b - *a;
        let a_to_c = *c - *a;

        // Begin calculating determinant - also used to calculate u parameter
        // u_vec lies in view plane
        // length of a_to_c in view_plane = |u_vec| = |a_to_c|*sin(a_to_c, dir)
        let u_vec = self.direction.cross(&a_to_c);

        // If determinant is near zero, ray lies in plane of triangle
        // The determinant corresponds to the parallelepiped volume:
        // det = 0 => [dir, a_to_b, a_to_c] not linearly independant
        let det = a_to_b.dot(&u_vec);

        // Only testing positive bound, thus enabling backface culling
        // If backface culling is not desired write:
        // det < EPSILON && det > -EPSILON
        if det < T::epsilon() {
            return Intersection::new(T::infinity(), T::zero(), T::zero());
        }

        let inv_det = T::one() / det;

        // Vector from point a to ray origin
        let a_to_origin = self.origin - *a;

        // Calculate u parameter
        let u = a_to_origin.dot(&u_vec) * inv_det;

        // Test bounds: u < 0 || u > 1 => outside of triangle
        if u < T::zero() || u > T::one() {
            return Intersection::new(T::infinity(), u, T::zero());
        }

        // Prepare to test v parameter
        let v_vec = a_to_origin.cross(&a_to_b);

        // Calculate v parameter and test bound
        let v = self.direction.dot(&v_vec) * inv_det;
        // The intersection lies outside of the triangle
        if v < T::zero() || u + v > T::one() {
            return Intersection::new(T::infinity(), u, v);
        }

        let dist = a_to_c.dot(&v_vec) * inv_det;

        if dist > T::epsilon() {
            Intersection::new(dist, u, v)
        } else {
            Intersection::new(T::infinity(), u, v)
        }
    }
}

impl<T: BHValue> IntersectsAabb<T> for Ray<T> {
    fn intersects_aabb(&self, aabb: &Aabb<T>) -> bool {
        self.ray_intersects_aabb(aabb)
    }
}
