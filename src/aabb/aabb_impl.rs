//! Axis Aligned Bounding Boxes.

use crate::axis::Axis;
use crate::bounding_hierarchy::BHValue;
use crate::utils::{fast_max, fast_min, midpoint};
use crate::{Point3, Vector3};

use std::fmt;
use std::ops::Index;

/// [`Aabb`] struct.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<T: BHValue> {
    /// Minimum coordinates
    pub min: Point3<T>,

    /// Maximum coordinates
    pub max: Point3<T>,
}

impl<T: BHValue> fmt::Display for Aabb<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

/// A trait implemented by things which can be bounded by an [`Aabb`].
///
/// This is the only capability a [`Bvh`] needs from its shapes. `center` defaults to the
/// center of the [`Aabb`], shapes with a more meaningful reference point may override it.
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
pub trait Bounded<T: BHValue> {
    /// Returns the geometric bounds of this object in the form of an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::{Aabb, Bounded};
    /// use nalgebra::Point3;
    ///
    /// struct Something;
    ///
    /// impl Bounded<f32> for Something {
    ///     fn aabb(&self) -> Aabb<f32> {
    ///         let point1 = Point3::new(0.0, 0.0, 0.0);
    ///         let point2 = Point3::new(1.0, 1.0, 1.0);
    ///         Aabb::with_bounds(point1, point2)
    ///     }
    /// }
    ///
    /// let something = Something;
    /// let aabb = something.aabb();
    ///
    /// assert!(aabb.contains(&Point3::new(0.0, 0.0, 0.0)));
    /// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
    /// assert_eq!(something.center(), Point3::new(0.5, 0.5, 0.5));
    /// ```
    fn aabb(&self) -> Aabb<T>;

    /// Returns the point which represents this object when the hierarchy is split.
    fn center(&self) -> Point3<T> {
        self.aabb().center()
    }
}

impl<T: BHValue, B: Bounded<T>> Bounded<T> for &B {
    fn aabb(&self) -> Aabb<T> {
        B::aabb(self)
    }

    fn center(&self) -> Point3<T> {
        B::center(self)
    }
}

impl<T: BHValue> Aabb<T> {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    pub fn with_bounds(min: Point3<T>, max: Point3<T>) -> Aabb<T> {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`].
    ///
    /// The empty box has its bounds inverted at infinity, which makes it the identity
    /// of [`Aabb::join`] and [`Aabb::grow`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    ///
    /// let aabb = Aabb::<f32>::empty();
    /// let min = &aabb.min;
    /// let max = &aabb.max;
    ///
    /// // For any point
    /// let x = rand_x();
    /// let y = rand_y();
    /// let z = rand_z();
    ///
    /// // An empty `Aabb` should not contain it
    /// assert!(x < min.x && y < min.y && z < min.z);
    /// assert!(max.x < x && max.y < y && max.z < z);
    /// # fn rand_x() -> f32 { 0.5 }
    /// # fn rand_y() -> f32 { -7.0 }
    /// # fn rand_z() -> f32 { 1e20 }
    /// ```
    pub fn empty() -> Aabb<T> {
        Aabb {
            min: Point3::new(T::infinity(), T::infinity(), T::infinity()),
            max: Point3::new(T::neg_infinity(), T::neg_infinity(), T::neg_infinity()),
        }
    }

    /// Creates a new infinite [`Aabb`] which contains every finite point.
    pub fn infinite() -> Aabb<T> {
        Aabb {
            min: Point3::new(T::neg_infinity(), T::neg_infinity(), T::neg_infinity()),
            max: Point3::new(T::infinity(), T::infinity(), T::infinity()),
        }
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let min = Point3::new(-1.0, -1.0, -1.0);
    /// let max = Point3::new(1.0, 1.0, 1.0);
    /// let aabb = Aabb::with_bounds(min, max);
    /// let point_inside = Point3::new(0.125, -0.25, 0.5);
    /// let point_outside = Point3::new(1.0, -2.0, 4.0);
    ///
    /// assert!(aabb.contains(&point_inside));
    /// assert!(!aabb.contains(&point_outside));
    /// ```
    pub fn contains(&self, p: &Point3<T>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if the [`Point3`] is approximately inside the [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_eps(&self, p: &Point3<T>, epsilon: T) -> bool {
        (p.x - self.min.x) > -epsilon
            && (p.x - self.max.x) < epsilon
            && (p.y - self.min.y) > -epsilon
            && (p.y - self.max.y) < epsilon
            && (p.z - self.min.z) > -epsilon
            && (p.z - self.max.z) < epsilon
    }

    /// Returns true if the `other` [`Aabb`] is approximately inside this [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_aabb_eps(&self, other: &Aabb<T>, epsilon: T) -> bool {
        self.approx_contains_eps(&other.min, epsilon)
            && self.approx_contains_eps(&other.max, epsilon)
    }

    /// Returns true if the `other` [`Aabb`] is approximately equal to this [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn relative_eq(&self, other: &Aabb<T>, epsilon: T) -> bool {
        (0..3).all(|i| {
            (self.min[i] - other.min[i]).abs() < epsilon
                && (self.max[i] - other.max[i]).abs() < epsilon
        })
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    /// The result is the convex hull of the both [`Aabb`]s.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb1 = Aabb::with_bounds(Point3::new(-101.0, 0.0, 0.0), Point3::new(-100.0, 1.0, 1.0));
    /// let aabb2 = Aabb::with_bounds(Point3::new(100.0, 0.0, 0.0), Point3::new(101.0, 1.0, 1.0));
    /// let joint = aabb1.join(&aabb2);
    ///
    /// assert_eq!(joint.min, Point3::new(-101.0, 0.0, 0.0));
    /// assert_eq!(joint.max, Point3::new(101.0, 1.0, 1.0));
    /// ```
    pub fn join(&self, other: &Aabb<T>) -> Aabb<T> {
        Aabb::with_bounds(
            Point3::new(
                fast_min(self.min.x, other.min.x),
                fast_min(self.min.y, other.min.y),
                fast_min(self.min.z, other.min.z),
            ),
            Point3::new(
                fast_max(self.max.x, other.max.x),
                fast_max(self.max.y, other.max.y),
                fast_max(self.max.z, other.max.z),
            ),
        )
    }

    /// Mutable version of [`Aabb::join`].
    pub fn join_mut(&mut self, other: &Aabb<T>) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both
    /// this [`Aabb`] and the [`Point3`] `other`.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let point1 = Point3::new(0.0, 0.0, 0.0);
    /// let point2 = Point3::new(1.0, 1.0, 1.0);
    /// let point3 = Point3::new(2.0, 2.0, 2.0);
    ///
    /// let aabb = Aabb::empty();
    /// assert!(!aabb.contains(&point1));
    ///
    /// let aabb1 = aabb.grow(&point1);
    /// assert!(aabb1.contains(&point1));
    ///
    /// let aabb2 = aabb.grow(&point2);
    /// assert!(aabb2.contains(&point2));
    /// assert!(!aabb2.contains(&point3));
    /// ```
    pub fn grow(&self, other: &Point3<T>) -> Aabb<T> {
        Aabb::with_bounds(
            Point3::new(
                fast_min(self.min.x, other.x),
                fast_min(self.min.y, other.y),
                fast_min(self.min.z, other.z),
            ),
            Point3::new(
                fast_max(self.max.x, other.x),
                fast_max(self.max.y, other.y),
                fast_max(self.max.z, other.z),
            ),
        )
    }

    /// Mutable version of [`Aabb::grow`].
    pub fn grow_mut(&mut self, other: &Point3<T>) {
        *self = self.grow(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the [`Bounded`]
    /// `other`.
    pub fn join_bounded<B: Bounded<T>>(&self, other: &B) -> Aabb<T> {
        self.join(&other.aabb())
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// let size = aabb.size();
    /// assert!(size.x == 2.0 && size.y == 2.0 && size.z == 2.0);
    /// ```
    pub fn size(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Returns half the size of this [`Aabb`] in all three dimensions.
    pub fn half_size(&self) -> Vector3<T> {
        self.size() / (T::one() + T::one())
    }

    /// Returns the center [`Point3`] of the [`Aabb`], computed as `(min + max) / 2`.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let min = Point3::new(41.0, 41.0, 41.0);
    /// let max = Point3::new(43.0, 43.0, 43.0);
    ///
    /// let aabb = Aabb::with_bounds(min, max);
    /// let center = aabb.center();
    ///
    /// assert!(center.x == 42.0 && center.y == 42.0 && center.z == 42.0);
    /// ```
    pub fn center(&self) -> Point3<T> {
        Point3::from(self.min.coords.zip_map(&self.max.coords, midpoint))
    }

    /// An empty [`Aabb`] is an [`Aabb`] where the lower bound is greater than
    /// the upper bound in at least one component.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let empty_aabb = Aabb::<f32>::empty();
    /// assert!(empty_aabb.is_empty());
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0));
    /// assert!(!aabb.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// A valid [`Aabb`] has no NaN coordinates and its lower bound does not exceed the
    /// upper bound in any component. Degenerate (flat or point-like) boxes are valid.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let point = Aabb::with_bounds(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(point.is_valid());
    ///
    /// let nan = Aabb::with_bounds(Point3::new(f32::NAN, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(!nan.is_valid());
    ///
    /// assert!(!Aabb::<f32>::empty().is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| {
            !self.min[i].is_nan() && !self.max[i].is_nan() && self.min[i] <= self.max[i]
        })
    }

    /// Returns the total surface area of this [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
    /// assert_eq!(aabb.surface_area(), 22.0);
    /// ```
    pub fn surface_area(&self) -> T {
        let size = self.size();
        (T::one() + T::one()) * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    /// Returns the volume of this [`Aabb`].
    pub fn volume(&self) -> T {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Returns the [`Axis`] along which the [`Aabb`] is stretched the most.
    /// Ties are resolved in favour of `X`, then `Y`.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::aabb::Aabb;
    /// use progression_bvh::axis::Axis;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-100.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0));
    /// assert_eq!(aabb.largest_axis(), Axis::X);
    ///
    /// let cube = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(cube.largest_axis(), Axis::X);
    /// ```
    pub fn largest_axis(&self) -> Axis {
        Axis::largest(&self.size())
    }
}

/// Default instance for [`Aabb`]s. Returns an [`Aabb`] which is [`empty()`].
///
/// [`empty()`]: #method.empty
impl<T: BHValue> Default for Aabb<T> {
    fn default() -> Aabb<T> {
        Aabb::empty()
    }
}

/// Make [`Aabb`]s indexable. `aabb[0]` gives a reference to the minimum bound.
/// All other indices return a reference to the maximum bound.
impl<T: BHValue> Index<usize> for Aabb<T> {
    type Output = Point3<T>;

    fn index(&self, index: usize) -> &Point3<T> {
        if index == 0 {
            &self.min
        } else {
            &self.max
        }
    }
}

/// Implementation of [`Bounded`] for [`Aabb`].
impl<T: BHValue> Bounded<T> for Aabb<T> {
    fn aabb(&self) -> Aabb<T> {
        *self
    }
}

/// Implementation of [`Bounded`] for [`Point3`].
impl<T: BHValue> Bounded<T> for Point3<T> {
    fn aabb(&self) -> Aabb<T> {
        Aabb::with_bounds(*self, *self)
    }

    fn center(&self) -> Point3<T> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::Bounded;
    use crate::testbase::{
        tuple_to_point, tuplevec_large_strategy, tuplevec_small_strategy, TAabb3, TPoint3,
        TVector3, TupleVec,
    };

    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    #[test]
    fn test_center_is_midpoint_of_bounds() {
        let aabb = TAabb3::with_bounds(TPoint3::new(-3.0, 1.0, 10.0), TPoint3::new(5.0, 2.0, 30.0));
        assert_eq!(aabb.center(), TPoint3::new(1.0, 1.5, 20.0));
        assert_eq!(aabb.half_size(), TVector3::new(4.0, 0.5, 10.0));
    }

    #[test]
    fn test_center_of_huge_bounds_is_finite() {
        let aabb = TAabb3::with_bounds(TPoint3::new(2e38, 0.0, 0.0), TPoint3::new(3e38, 0.0, 0.0));
        let center = aabb.center();
        assert!(center.x.is_finite());
        assert!(aabb.contains(&center));
    }

    #[test]
    fn test_point_is_its_own_center() {
        let point = TPoint3::new(1.0, -2.0, 3.0);
        assert_eq!(point.center(), point);
        assert!(point.aabb().is_valid());
        assert_float_eq!(point.aabb().volume(), 0.0, abs <= f32::EPSILON);
    }

    #[test]
    fn test_inverted_bounds_are_invalid() {
        let aabb = TAabb3::with_bounds(TPoint3::new(1.0, 0.0, 0.0), TPoint3::new(0.0, 1.0, 1.0));
        assert!(!aabb.is_valid());
        assert!(aabb.is_empty());
    }

    #[test]
    fn test_index_gives_bounds() {
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 1.0, 2.0), TPoint3::new(3.0, 4.0, 5.0));
        assert_eq!(aabb[0], aabb.min);
        assert_eq!(aabb[1], aabb.max);
    }

    proptest! {
        // Test whether an empty `Aabb` does not contains anything.
        #[test]
        fn test_empty_contains_nothing(tpl: TupleVec) {
            let p = tuple_to_point(&tpl);
            let aabb = TAabb3::empty();
            assert!(!aabb.contains(&p));
        }

        // Test whether a default `Aabb` is empty.
        #[test]
        fn test_default_is_empty(tpl: TupleVec) {
            let p = tuple_to_point(&tpl);
            let aabb: TAabb3 = Default::default();
            assert!(aabb.is_empty());
            assert!(!aabb.contains(&p));
        }

        // Test whether an `Aabb` always contains its center.
        #[test]
        fn test_aabb_contains_center(a in tuplevec_large_strategy(), b in tuplevec_large_strategy()) {
            let p1 = tuple_to_point(&a);
            let p2 = tuple_to_point(&b);
            let aabb = TAabb3::empty().grow(&p1).join_bounded(&p2);
            assert!(aabb.contains(&aabb.center()));
            assert!(aabb.is_valid());
        }

        // Test whether the joint of two point-sets contains all the points.
        #[test]
        fn test_join_two_aabbs(a in proptest::array::uniform5(tuplevec_large_strategy()),
                               b in proptest::array::uniform5(tuplevec_large_strategy())) {
            let points = a.iter().chain(b.iter()).map(tuple_to_point).collect::<Vec<TPoint3>>();

            let aabb1 = points.iter().take(5).fold(TAabb3::empty(), |aabb, point| aabb.grow(point));
            let aabb2 = points.iter().skip(5).fold(TAabb3::empty(), |aabb, point| aabb.grow(point));

            assert!(points.iter().take(5).all(|point| aabb1.contains(point)));
            assert!(points.iter().skip(5).all(|point| aabb2.contains(point)));

            let aabbu = aabb1.join(&aabb2);
            assert!(points.iter().all(|point| aabbu.contains(point)));
            assert!(aabbu.approx_contains_aabb_eps(&aabb1, f32::EPSILON));
            assert!(aabbu.approx_contains_aabb_eps(&aabb2, f32::EPSILON));
        }

        // Test whether the surface of a nonempty `Aabb` is always positive.
        #[test]
        fn test_surface_always_positive(a in tuplevec_small_strategy(), b in tuplevec_small_strategy()) {
            let aabb = TAabb3::empty()
                .grow(&tuple_to_point(&a))
                .grow(&tuple_to_point(&b));
            assert!(aabb.surface_area() >= 0.0);
        }

        // Test whether joining is commutative.
        #[test]
        fn test_join_is_commutative(a in tuplevec_small_strategy(), b in tuplevec_small_strategy(),
                                    c in tuplevec_small_strategy(), d in tuplevec_small_strategy()) {
            let aabb1 = TAabb3::empty().grow(&tuple_to_point(&a)).grow(&tuple_to_point(&b));
            let aabb2 = TAabb3::empty().grow(&tuple_to_point(&c)).grow(&tuple_to_point(&d));
            assert_eq!(aabb1.join(&aabb2), aabb2.join(&aabb1));
            assert!(aabb1.join(&aabb2).relative_eq(&aabb2.join(&aabb1), f32::EPSILON));
        }
    }
}
