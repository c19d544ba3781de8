//! This module defines a Triangle and its intersection algorithms

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::ray::{IntersectsRay, Ray};
use crate::Point3;

/// A triangle struct. Instance of a more complex [`Bounded`] primitive.
/// The [`Aabb`] is computed once on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle<T: BHValue> {
    /// First point on the triangle
    pub a: Point3<T>,
    /// Second point on the triangle
    pub b: Point3<T>,
    /// Third point on the triangle
    pub c: Point3<T>,
    aabb: Aabb<T>,
}

impl<T: BHValue> Triangle<T> {
    /// Creates a new triangle given a counter clockwise set of points.
    /// Rays only hit the side from which the points appear counter clockwise.
    pub fn new(a: Point3<T>, b: Point3<T>, c: Point3<T>) -> Triangle<T> {
        Triangle {
            a,
            b,
            c,
            aabb: Aabb::empty().grow(&a).grow(&b).grow(&c),
        }
    }
}

impl<T: BHValue> Bounded<T> for Triangle<T> {
    fn aabb(&self) -> Aabb<T> {
        self.aabb
    }
}

impl<T: BHValue> IntersectsRay<T> for Triangle<T> {
    fn intersect_ray(&self, ray: &Ray<T>) -> Option<T> {
        let intersection = ray.intersects_triangle(&self.a, &self.b, &self.c);
        if intersection.distance.is_finite() {
            Some(intersection.distance)
        } else {
            None
        }
    }
}
