//! Ready-made shapes which can be stored in a [`Bvh`].
//!
//! [`Bvh`]: ../bvh/struct.Bvh.html

mod sphere;
mod triangle;

pub use self::sphere::*;
pub use self::triangle::*;
