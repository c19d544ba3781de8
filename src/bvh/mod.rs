//! This module defines a [`Bvh`].
//!
//! [`Bvh`]: struct.Bvh.html
//!

mod build_options;
mod bvh_impl;
mod bvh_node;
mod iter;

pub use self::build_options::*;
pub use self::bvh_impl::*;
pub use self::bvh_node::*;
pub use self::iter::*;
