use nalgebra::{Point3, Vector3};
use progression_bvh::aabb::{Aabb, Bounded};
use progression_bvh::bvh::{Bvh, BvhBuildOptions};
use progression_bvh::ray::{IntersectsRay, Ray};

#[derive(Debug)]
struct Sphere {
    position: Point3<f32>,
    radius: f32,
}

impl Bounded<f32> for Sphere {
    fn aabb(&self) -> Aabb<f32> {
        let half_size = Vector3::new(self.radius, self.radius, self.radius);
        let min = self.position - half_size;
        let max = self.position + half_size;
        Aabb::with_bounds(min, max)
    }

    fn center(&self) -> Point3<f32> {
        self.position
    }
}

impl IntersectsRay<f32> for Sphere {
    fn intersect_ray(&self, ray: &Ray<f32>) -> Option<f32> {
        let oc = ray.origin - self.position;
        let half_b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -half_b - discriminant.sqrt();
        (t >= 0.0).then_some(t)
    }
}

pub fn main() {
    let mut spheres = Vec::new();
    for i in 0..1000000u32 {
        let position = Point3::new(i as f32, i as f32, i as f32);
        let radius = (i % 10) as f32 + 1.0;
        spheres.push(Sphere { position, radius });
    }
    let options = BvhBuildOptions::new()
        .with_leaf_threshold(4)
        .with_parallel(true);
    let bvh = match Bvh::build_with_options(&spheres, &options) {
        Ok(bvh) => bvh,
        Err(err) => {
            eprintln!("failed to build bvh: {}", err);
            return;
        }
    };
    println!(
        "{} nodes, {} leaves, depth {}",
        bvh.count(),
        bvh.leaf_count(),
        bvh.depth()
    );

    let origin = Point3::new(-5.0, -5.0, -5.0);
    let direction = Vector3::new(1.0, 1.0, 1.0);
    let ray = Ray::new(origin, direction);
    let hit_sphere_aabbs = bvh.traverse(&ray, &spheres);
    println!("{} candidates", hit_sphere_aabbs.len());
    dbg!(bvh.intersect(&ray, &spheres));
}
