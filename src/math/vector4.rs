use std::fmt;
use std::ops::{Add, AddAssign, BitXor, Div, Mul, MulAssign, Neg, Sub};

use super::{inv_sqrt, Vector3};

/// Homogeneous 4D vector consumed by [`Matrix4`](super::Matrix4)
/// transforms. `w = 1` marks a point, `w = 0` a direction.
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
pub struct Vector4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// Homogeneous component.
    pub w: f32,
}

impl Vector4 {
    /// `(0, 0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Vector from components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Extend a 3D vector with `w`.
    #[inline]
    #[must_use]
    pub const fn from_vector(v: Vector3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// A point (`w = 1`).
    #[inline]
    #[must_use]
    pub const fn point(v: Vector3) -> Self {
        Self::from_vector(v, 1.0)
    }

    /// A direction (`w = 0`).
    #[inline]
    #[must_use]
    pub const fn direction(v: Vector3) -> Self {
        Self::from_vector(v, 0.0)
    }

    /// The XYZ part.
    #[inline]
    #[must_use]
    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Component by index; `None` outside `0..=3`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.x),
            1 => Some(self.y),
            2 => Some(self.z),
            3 => Some(self.w),
            _ => None,
        }
    }

    /// Mutable component by index; `None` outside `0..=3`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut f32> {
        match index {
            0 => Some(&mut self.x),
            1 => Some(&mut self.y),
            2 => Some(&mut self.z),
            3 => Some(&mut self.w),
            _ => None,
        }
    }

    /// Dot product of the XYZ parts.
    #[inline]
    #[must_use]
    pub fn dot3(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Full 4-component dot product.
    #[inline]
    #[must_use]
    pub fn dot4(self, other: Self) -> f32 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// Component-wise comparison within `tolerance`.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
            && (self.w - other.w).abs() <= tolerance
    }

    /// Length of the XYZ part.
    #[must_use]
    pub fn size3(&self) -> f32 {
        self.size_squared3().sqrt()
    }

    /// Squared length of the XYZ part.
    #[must_use]
    pub fn size_squared3(&self) -> f32 {
        self.dot3(*self)
    }

    /// Whether the XYZ part has unit length within the tolerance.
    #[must_use]
    pub fn is_unit3(&self, length_squared_tolerance: f32) -> bool {
        (1.0 - self.size_squared3()).abs() < length_squared_tolerance
    }

    /// Whether the XYZ components are all within `tolerance` of zero.
    #[must_use]
    pub fn is_nearly_zero3(&self, tolerance: f32) -> bool {
        self.x.abs() < tolerance
            && self.y.abs() < tolerance
            && self.z.abs() < tolerance
    }

    /// Normalized XYZ direction (`w = 0`), or zero below `tolerance`.
    #[must_use]
    pub fn safe_normal(&self, tolerance: f32) -> Self {
        let square_sum = self.size_squared3();
        if square_sum > tolerance && square_sum.is_finite() {
            let scale = inv_sqrt(square_sum);
            return Self::new(
                self.x * scale,
                self.y * scale,
                self.z * scale,
                0.0,
            );
        }
        Self::ZERO
    }

    /// Normalized XYZ direction without any length check.
    #[must_use]
    pub fn unsafe_normal3(&self) -> Self {
        let scale = inv_sqrt(self.size_squared3());
        Self::new(self.x * scale, self.y * scale, self.z * scale, 0.0)
    }

    /// `2 (v·n) n − v`, over the XYZ part.
    #[must_use]
    pub fn reflect3(&self, normal: Self) -> Self {
        normal * (2.0 * self.dot3(normal)) - *self
    }

    /// Whether any component is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        [self.x, self.y, self.z, self.w].iter().any(|v| !v.is_finite())
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X={:.3} Y={:.3} Z={:.3} W={:.3}",
            self.x, self.y, self.z, self.w
        )
    }
}

impl From<Vector3> for Vector4 {
    fn from(v: Vector3) -> Self {
        Self::point(v)
    }
}

/// 3D cross product of the XYZ parts; the result has `w = 0`.
impl BitXor for Vector4 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
            0.0,
        )
    }
}

impl Add for Vector4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl AddAssign for Vector4 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul for Vector4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.x * rhs.x,
            self.y * rhs.y,
            self.z * rhs.z,
            self.w * rhs.w,
        )
    }
}

impl Mul<f32> for Vector4 {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::new(
            self.x * scale,
            self.y * scale,
            self.z * scale,
            self.w * scale,
        )
    }
}

impl Mul<Vector4> for f32 {
    type Output = Vector4;

    fn mul(self, v: Vector4) -> Vector4 {
        v * self
    }
}

impl MulAssign<f32> for Vector4 {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl Div<f32> for Vector4 {
    type Output = Self;

    fn div(self, scale: f32) -> Self {
        let r = 1.0 / scale;
        self * r
    }
}

impl Div for Vector4 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.x / rhs.x,
            self.y / rhs.y,
            self.z / rhs.z,
            self.w / rhs.w,
        )
    }
}

impl Neg for Vector4 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
