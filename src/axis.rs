//! Axis enum for indexing three-dimensional structures.

use crate::bounding_hierarchy::BHValue;
use crate::Vector3;

use std::fmt::{Display, Formatter, Result};

/// An `Axis` in a three-dimensional coordinate system.
/// Used to access [`Vector3`]/[`Point3`] structs via index.
///
/// # Examples
/// ```
/// use progression_bvh::axis::Axis;
/// use nalgebra::Point3;
///
/// let mut position = Point3::new(1.0, 0.5, 42.0);
/// position[Axis::Y.index()] *= 4.0;
///
/// assert_eq!(position.y, 2.0);
/// ```
///
/// [`Point3`]: ../type.Point3.html
/// [`Vector3`]: ../type.Vector3.html
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Index of the X axis.
    X = 0,

    /// Index of the Y axis.
    Y = 1,

    /// Index of the Z axis.
    Z = 2,
}

impl Axis {
    /// Returns the component index of this [`Axis`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the [`Axis`] along which `extent` is largest.
    ///
    /// Ties are broken in a fixed order: `X` wins ties with `Y` and `Z`, `Y` wins ties
    /// with `Z`. The choice decides the shape of a [`Bvh`], so it must stay stable.
    ///
    /// # Examples
    /// ```
    /// use progression_bvh::axis::Axis;
    /// use nalgebra::Vector3;
    ///
    /// assert_eq!(Axis::largest(&Vector3::new(1.0, 3.0, 2.0)), Axis::Y);
    /// assert_eq!(Axis::largest(&Vector3::new(2.0, 2.0, 2.0)), Axis::X);
    /// assert_eq!(Axis::largest(&Vector3::new(0.0, 2.0, 2.0)), Axis::Y);
    /// ```
    ///
    /// [`Bvh`]: ../bvh/struct.Bvh.html
    pub fn largest<T: BHValue>(extent: &Vector3<T>) -> Axis {
        if extent.x >= extent.y && extent.x >= extent.z {
            Axis::X
        } else if extent.y >= extent.x && extent.y >= extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

/// Display implementation for [`Axis`].
impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match *self {
                Axis::X => "x",
                Axis::Y => "y",
                Axis::Z => "z",
            }
        )
    }
}
