//! A crate which exports rays, axis-aligned bounding boxes, and a binary bounding
//! volume hierarchy built by recursive midpoint splitting.
//!
//! ## About
//!
//! A [`Bvh`] partitions a list of shapes into a binary tree of nested [`Aabb`]s. Each
//! level splits its shapes along the axis on which their centers are spread the most,
//! at the midpoint of that spread. Shapes whose centers cannot be separated by this rule
//! end up together in one leaf. Once built, the tree is immutable and can be queried
//! from many threads at once: for the nearest ray hit, for every shape whose bounds touch
//! some query volume, or for plain introspection such as node count and depth.
//!
//! The tree only stores indices into the caller's shape slice. The same slice has to be
//! passed to the query functions, and it must not change between building and querying.
//! Changed geometry requires a full rebuild.
//!
//! ## Example
//!
//! ```
//! use progression_bvh::bvh::Bvh;
//! use progression_bvh::ray::Ray;
//! use progression_bvh::shapes::Sphere;
//! use nalgebra::{Point3, Vector3};
//!
//! let spheres: Vec<Sphere<f32>> = (0..1000u32)
//!     .map(|i| Sphere::new(Point3::new(i as f32, i as f32, i as f32), (i % 10) as f32 + 1.0))
//!     .collect();
//!
//! let bvh = Bvh::build(&spheres).expect("spheres are non-empty and finite");
//!
//! let ray = Ray::new(Point3::new(-50.0, -50.0, -50.0), Vector3::new(1.0, 1.0, 1.0));
//! let hit = bvh.intersect(&ray, &spheres).expect("the ray points at the spheres");
//! assert_eq!(hit.shape_index, 0);
//!
//! let candidates = bvh.traverse(&ray, &spheres);
//! assert!(candidates.len() >= 1);
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - allows [`BvhBuildOptions::parallel`] to build sibling
//!   subtrees on the rayon thread pool
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations
//!   for the tree and its building blocks
//!
//! [`Bvh`]: bvh::Bvh
//! [`Aabb`]: aabb::Aabb
//! [`BvhBuildOptions::parallel`]: bvh::BvhBuildOptions::parallel

pub mod aabb;
pub mod axis;
pub mod bounding_hierarchy;
pub mod bvh;
pub mod error;
pub mod ray;
pub mod shapes;
mod utils;

#[cfg(test)]
mod testbase;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub use crate::error::BvhError;

/// Point type used by this crate. Type alias for [`nalgebra::Point3`].
pub type Point3<T> = nalgebra::Point3<T>;

/// Vector type used by this crate. Type alias for [`nalgebra::Vector3`].
pub type Vector3<T> = nalgebra::Vector3<T>;
