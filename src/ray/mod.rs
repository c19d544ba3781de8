//! This module holds the [`Ray`] definition, and `RayIntersection` functions.
mod intersect_default;
mod ray_impl;

pub use self::ray_impl::*;
