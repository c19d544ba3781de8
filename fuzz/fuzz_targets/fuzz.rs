#![no_main]
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nalgebra::{Point3, SimdPartialOrd};
use ordered_float::NotNan;
use progression_bvh::aabb::{Aabb, Bounded};
use progression_bvh::bvh::{Bvh, BvhBuildOptions};
use progression_bvh::ray::{IntersectsRay, Ray};
use progression_bvh::BvhError;

type Float = f32;
const LIMIT: Float = 1_000_000.0;

fuzz_target!(|workload: Workload| {
    workload.fuzz();
});

#[derive(Arbitrary)]
struct ArbitraryPoint {
    coordinates: [NotNan<Float>; 3],
}

impl ArbitraryPoint {
    fn point(&self) -> Point3<Float> {
        Point3::from_slice(&self.coordinates).map(|f| f.into_inner().clamp(-LIMIT, LIMIT))
    }
}

#[derive(Arbitrary)]
struct ArbitraryShape {
    a: ArbitraryPoint,
    b: ArbitraryPoint,
}

impl Debug for ArbitraryShape {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.aabb(), f)
    }
}

impl Bounded<Float> for ArbitraryShape {
    fn aabb(&self) -> Aabb<Float> {
        let a = self.a.point();
        let b = self.b.point();
        Aabb::with_bounds(a.simd_min(b), a.simd_max(b))
    }
}

impl IntersectsRay<Float> for ArbitraryShape {
    fn intersect_ray(&self, ray: &Ray<Float>) -> Option<Float> {
        ray.intersection_slice_for_aabb(&self.aabb())
            .map(|(entry, _)| entry)
    }
}

#[derive(Arbitrary)]
struct ArbitraryRay {
    origin: ArbitraryPoint,
    destination: ArbitraryPoint,
}

impl Debug for ArbitraryRay {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.ray(), f)
    }
}

impl ArbitraryRay {
    fn ray(&self) -> Ray<Float> {
        // Double normalize helps when the first one encounters precision issues.
        let mut direction = (self.destination.point() - self.origin.point())
            .normalize()
            .normalize();
        // Ensure no degenerate direction.
        if direction.magnitude() < 0.5 || direction.iter().any(|f| f.is_nan() || f.abs() > 1.5) {
            direction.iter_mut().for_each(|f| *f = 1.0);
            direction = direction.normalize();
        }
        Ray::new(self.origin.point(), direction)
    }
}

#[derive(Debug, Arbitrary)]
struct Workload {
    shapes: Vec<ArbitraryShape>,
    ray: ArbitraryRay,
    leaf_threshold: Option<u8>,
    max_depth: Option<u8>,
    parallel: bool,
}

impl Workload {
    fn fuzz(self) {
        let mut options = BvhBuildOptions::new().with_parallel(self.parallel);
        options.leaf_threshold = self.leaf_threshold.map(usize::from);
        options.max_depth = self.max_depth.map(u32::from);

        let bvh = match Bvh::build_with_options(&self.shapes, &options) {
            Ok(bvh) => bvh,
            Err(BvhError::EmptyPartition) => {
                assert!(self.shapes.is_empty());
                return;
            }
            Err(err) => panic!("unexpected error: {}", err),
        };
        let ray = self.ray.ray();

        // Check that these don't panic.
        bvh.assert_consistent(&self.shapes);
        bvh.assert_tight(0.0);
        assert_eq!(bvh.shape_count(), self.shapes.len());
        assert_eq!(bvh.count(), 2 * bvh.leaf_count() - 1);

        // Building again gives the same tree.
        assert_eq!(
            bvh,
            Bvh::build_with_options(&self.shapes, &options).unwrap()
        );

        let traverse = bvh
            .traverse(&ray, &self.shapes)
            .into_iter()
            .map(ByPtr)
            .collect::<HashSet<_>>();
        let traverse_iterator = bvh
            .traverse_iterator(&ray, &self.shapes)
            .map(ByPtr)
            .collect::<HashSet<_>>();
        assert_eq!(traverse, traverse_iterator);

        // The nearest hit must be one of the traversal candidates.
        if let Some(hit) = bvh.intersect(&ray, &self.shapes) {
            assert!(traverse.contains(&ByPtr(hit.shape)));
            assert!(hit.distance >= 0.0);
        }
    }
}

#[derive(Debug)]
struct ByPtr<'a, T>(&'a T);

impl<'a, T> PartialEq for ByPtr<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a, T> Eq for ByPtr<'a, T> {}

impl<'a, T> Hash for ByPtr<'a, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as *const _ as usize);
    }
}
