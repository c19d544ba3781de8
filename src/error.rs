//! Errors reported while building a [`Bvh`].
//!
//! [`Bvh`]: ../bvh/struct.Bvh.html

use thiserror::Error;

/// The ways in which building a [`Bvh`] can fail.
///
/// A split that leaves all shapes on one side of the plane is not an error. It turns
/// the node into a leaf instead.
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    /// Partitioning was requested for zero shapes.
    #[error("cannot partition an empty list of shapes")]
    EmptyPartition,

    /// A shape reported bounds with NaN coordinates, or a minimum above its maximum.
    #[error("shape {shape_index} has invalid bounds (min: {min}, max: {max})")]
    InvalidBounds {
        /// Index of the offending shape in the slice passed to the builder.
        shape_index: usize,
        /// The reported lower bound, rendered as text.
        min: String,
        /// The reported upper bound, rendered as text.
        max: String,
    },
}

#[cfg(test)]
mod tests {
    use super::BvhError;

    #[test]
    fn test_messages() {
        assert_eq!(
            BvhError::EmptyPartition.to_string(),
            "cannot partition an empty list of shapes"
        );
        let err = BvhError::InvalidBounds {
            shape_index: 3,
            min: "a".to_owned(),
            max: "b".to_owned(),
        };
        assert_eq!(err.to_string(), "shape 3 has invalid bounds (min: a, max: b)");
    }
}
