//! Euler angles in degrees.
//!
//! There is deliberately no conversion between [`Rotator`] and
//! [`Quaternion`](super::Quaternion) or [`Matrix4`](super::Matrix4); the
//! camera works with quaternions directly.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{grid_snap, round_to_int, Vector3};

/// Pitch / yaw / roll, each in degrees.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct Rotator {
    /// Rotation about the right axis.
    pub pitch: f32,
    /// Rotation about the up axis.
    pub yaw: f32,
    /// Rotation about the forward axis.
    pub roll: f32,
}

impl Rotator {
    /// No rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Rotator from its three angles.
    #[inline]
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Same angle on every axis.
    #[inline]
    #[must_use]
    pub const fn splat(angle: f32) -> Self {
        Self::new(angle, angle, angle)
    }

    /// Wrap an angle into `[0, 360)`.
    #[must_use]
    pub fn clamp_axis(angle: f32) -> f32 {
        let mut angle = angle % 360.0;
        if angle < 0.0 {
            angle += 360.0;
        }
        // A tiny negative input rounds up to exactly 360 in f32.
        if angle >= 360.0 {
            angle = 0.0;
        }
        angle
    }

    /// Wrap an angle into `(-180, 180]`.
    #[must_use]
    pub fn normalize_axis(angle: f32) -> f32 {
        let angle = Self::clamp_axis(angle);
        if angle > 180.0 {
            angle - 360.0
        } else {
            angle
        }
    }

    /// Quantize an angle to 8 bits, `[0, 360) → [0, 256)`, dropping whole
    /// turns.
    #[must_use]
    pub fn compress_axis_to_byte(angle: f32) -> u8 {
        (round_to_int(angle * 256.0 / 360.0) & 0xFF) as u8
    }

    /// Inverse of [`compress_axis_to_byte`](Self::compress_axis_to_byte).
    #[must_use]
    pub fn decompress_axis_from_byte(angle: u8) -> f32 {
        f32::from(angle) * 360.0 / 256.0
    }

    /// Quantize an angle to 16 bits, `[0, 360) → [0, 65536)`, dropping
    /// whole turns.
    #[must_use]
    pub fn compress_axis_to_short(angle: f32) -> u16 {
        (round_to_int(angle * 65536.0 / 360.0) & 0xFFFF) as u16
    }

    /// Inverse of [`compress_axis_to_short`](Self::compress_axis_to_short).
    #[must_use]
    pub fn decompress_axis_from_short(angle: u16) -> f32 {
        f32::from(angle) * 360.0 / 65536.0
    }

    /// Whether every axis, wrapped to `(-180, 180]`, is within `tolerance`
    /// of zero.
    #[must_use]
    pub fn is_nearly_zero(&self, tolerance: f32) -> bool {
        Self::normalize_axis(self.pitch).abs() < tolerance
            && Self::normalize_axis(self.yaw).abs() < tolerance
            && Self::normalize_axis(self.roll).abs() < tolerance
    }

    /// Whether every axis is a whole number of turns.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Self::clamp_axis(self.pitch) == 0.0
            && Self::clamp_axis(self.yaw) == 0.0
            && Self::clamp_axis(self.roll) == 0.0
    }

    /// Wrap-aware comparison: 359° equals -1°.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        Self::normalize_axis(self.pitch - other.pitch).abs() < tolerance
            && Self::normalize_axis(self.yaw - other.yaw).abs() < tolerance
            && Self::normalize_axis(self.roll - other.roll).abs() < tolerance
    }

    /// Add per-axis deltas in place.
    pub fn add_deltas(
        &mut self,
        delta_pitch: f32,
        delta_yaw: f32,
        delta_roll: f32,
    ) -> Self {
        self.pitch += delta_pitch;
        self.yaw += delta_yaw;
        self.roll += delta_roll;
        *self
    }

    /// Snap each axis to the matching grid in `grid`.
    #[must_use]
    pub fn grid_snap(&self, grid: &Self) -> Self {
        Self::new(
            grid_snap(self.pitch, grid.pitch),
            grid_snap(self.yaw, grid.yaw),
            grid_snap(self.roll, grid.roll),
        )
    }

    /// Every axis wrapped into `[0, 360)`.
    #[must_use]
    pub fn clamp(&self) -> Self {
        Self::new(
            Self::clamp_axis(self.pitch),
            Self::clamp_axis(self.yaw),
            Self::clamp_axis(self.roll),
        )
    }

    /// Wrap every axis into `(-180, 180]` in place.
    pub fn normalize(&mut self) {
        self.pitch = Self::normalize_axis(self.pitch);
        self.yaw = Self::normalize_axis(self.yaw);
        self.roll = Self::normalize_axis(self.roll);
    }

    /// Copy with every axis in `(-180, 180]`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut r = *self;
        r.normalize();
        r
    }

    /// Copy with every axis in `[0, 360)`.
    #[must_use]
    pub fn denormalized(&self) -> Self {
        self.clamp()
    }

    /// Whether any axis is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        [self.pitch, self.yaw, self.roll].iter().any(|v| !v.is_finite())
    }

    /// The angles as `(roll, pitch, yaw)`.
    #[must_use]
    pub fn euler(&self) -> Vector3 {
        Vector3::new(self.roll, self.pitch, self.yaw)
    }

    /// Rotator from a `(roll, pitch, yaw)` vector, the inverse of
    /// [`euler`](Self::euler).
    #[must_use]
    pub fn from_euler(euler: Vector3) -> Self {
        Self::new(euler.y, euler.z, euler.x)
    }
}

impl Add for Rotator {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.pitch + rhs.pitch,
            self.yaw + rhs.yaw,
            self.roll + rhs.roll,
        )
    }
}

impl AddAssign for Rotator {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Rotator {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.pitch - rhs.pitch,
            self.yaw - rhs.yaw,
            self.roll - rhs.roll,
        )
    }
}

impl SubAssign for Rotator {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Rotator {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::new(self.pitch * scale, self.yaw * scale, self.roll * scale)
    }
}

impl Mul<Rotator> for f32 {
    type Output = Rotator;

    fn mul(self, r: Rotator) -> Rotator {
        r * self
    }
}

impl MulAssign<f32> for Rotator {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl Neg for Rotator {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.pitch, -self.yaw, -self.roll)
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={:.3} Y={:.3} R={:.3}",
            self.pitch, self.yaw, self.roll
        )
    }
}
