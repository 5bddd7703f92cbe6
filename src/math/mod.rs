//! Vector, matrix, quaternion and Euler-angle algebra.
//!
//! All types are `f32`, `Copy`, and follow a single convention: vectors are
//! row vectors, matrices are row-major, and a transform is applied as
//! `v' = v * M`. See [`matrix::Matrix4`] for the composition order.

/// Row-major 4×4 transform matrix and the look-at/perspective builders.
pub mod matrix;
/// Unit-quaternion rotations and interpolation.
pub mod quaternion;
/// Pitch/yaw/roll Euler angles in degrees.
pub mod rotator;
/// 3D vector.
pub mod vector;
/// Homogeneous 4D vector.
pub mod vector4;

pub use matrix::{Axis, Matrix4};
pub use quaternion::Quaternion;
pub use rotator::Rotator;
pub use vector::Vector3;
pub use vector4::Vector4;

/// Tolerance used by normalization guards (squared lengths).
pub const SMALL_NUMBER: f32 = 1.0e-8;
/// Tolerance used by approximate equality comparisons.
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;
/// Stand-in for "infinity" where a finite value is required.
pub const BIG_NUMBER: f32 = 3.4e+38;

/// Two points are the same if every component is within this distance.
pub const THRESH_POINTS_ARE_SAME: f32 = 0.00002;
/// Allowed error of a normalized vector, against its squared magnitude.
pub const THRESH_VECTOR_NORMALIZED: f32 = 0.01;
/// Allowed error of a normalized quaternion, against its squared magnitude.
pub const THRESH_QUAT_NORMALIZED: f32 = 0.01;

/// Branch-free style select: `value_ge_zero` when `comparand >= 0`,
/// `value_lt_zero` otherwise.
#[inline]
#[must_use]
pub fn float_select(
    comparand: f32,
    value_ge_zero: f32,
    value_lt_zero: f32,
) -> f32 {
    if comparand >= 0.0 {
        value_ge_zero
    } else {
        value_lt_zero
    }
}

/// `1 / sqrt(value)`.
#[inline]
#[must_use]
pub fn inv_sqrt(value: f32) -> f32 {
    1.0 / value.sqrt()
}

/// Snap `location` to the nearest multiple of `grid`. A zero grid is a
/// no-op.
#[inline]
#[must_use]
pub fn grid_snap(location: f32, grid: f32) -> f32 {
    if grid == 0.0 {
        location
    } else {
        ((location + 0.5 * grid) / grid).floor() * grid
    }
}

/// Round half up, the way the angle quantizers expect (`floor(x + 0.5)`).
#[inline]
#[must_use]
pub fn round_to_int(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Whether `a` and `b` differ by at most `tolerance`.
#[inline]
#[must_use]
pub fn is_nearly_equal(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_select_treats_zero_as_non_negative() {
        assert_eq!(float_select(0.0, 1.0, -1.0), 1.0);
        assert_eq!(float_select(-0.0, 1.0, -1.0), 1.0);
        assert_eq!(float_select(-1e-12, 1.0, -1.0), -1.0);
    }

    #[test]
    fn grid_snap_rounds_to_nearest_cell() {
        assert_eq!(grid_snap(7.4, 5.0), 5.0);
        assert_eq!(grid_snap(7.6, 5.0), 10.0);
        assert_eq!(grid_snap(-7.6, 5.0), -10.0);
        assert_eq!(grid_snap(3.3, 0.0), 3.3);
    }

    #[test]
    fn round_to_int_rounds_half_up() {
        assert_eq!(round_to_int(0.5), 1);
        assert_eq!(round_to_int(-0.5), 0);
        assert_eq!(round_to_int(-0.6), -1);
        assert_eq!(round_to_int(2.49), 2);
    }
}
