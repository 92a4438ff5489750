//! Vector, quaternion, and half-space primitives for polyhedral twisty
//! puzzles.

pub use {approx, cgmath};

/// Floating-point type used for geometry.
pub type Float = f64;

/// Small floating-point value used for comparisons and tiny offsets.
pub const EPSILON: Float = 0.000001;

/// 3D vector, also used for points.
pub type Vec3 = cgmath::Vector3<Float>;
/// 2D vector, used for screen coordinates and sticker outlines.
pub type Vec2 = cgmath::Vector2<Float>;
/// Rotation quaternion.
pub type Quat = cgmath::Quaternion<Float>;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
    ($a:expr, $b:expr, $epsilon:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $epsilon)
    };
}

/// Panics in debug mode; logs an error in release mode.
#[macro_export]
macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => $crate::log::error!($($tok)*),
        }
    };
}

#[doc(hidden)]
pub use log;

pub mod approx_cmp;
pub mod centroid;
pub mod plane;
pub mod rotation;

/// Structs, traits, and constants.
pub mod prelude {
    pub use cgmath::{EuclideanSpace, InnerSpace, One, Rotation, Rotation3, Zero};

    pub use crate::approx_cmp::*;
    pub use crate::centroid::Centroid;
    pub use crate::plane::*;
    pub use crate::rotation::*;
    pub use crate::{EPSILON, Float, Quat, Vec2, Vec3};
}
pub use prelude::*;
