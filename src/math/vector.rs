use std::fmt;
use std::ops::{
    Add, AddAssign, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub,
    SubAssign,
};

use super::{
    float_select, inv_sqrt, BIG_NUMBER, KINDA_SMALL_NUMBER, SMALL_NUMBER,
    THRESH_POINTS_ARE_SAME, THRESH_VECTOR_NORMALIZED,
};

/// A 3D vector of `f32` components.
///
/// `|` is the dot product and `^` the cross product. There is no standing
/// invariant: any component may be non-finite, which
/// [`contains_nan`](Self::contains_nan) detects.
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
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// `(1, 1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// World up, `(0, 1, 0)`.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// `(1, 0, 0)`.
    pub const X_AXIS: Self = Self::new(1.0, 0.0, 0.0);
    /// `(0, 1, 0)`.
    pub const Y_AXIS: Self = Self::new(0.0, 1.0, 0.0);
    /// `(0, 0, 1)`.
    pub const Z_AXIS: Self = Self::new(0.0, 0.0, 1.0);

    /// Vector from components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector with every component set to `value`.
    #[inline]
    #[must_use]
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component by index; `None` outside `0..=2`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.x),
            1 => Some(self.y),
            2 => Some(self.z),
            _ => None,
        }
    }

    /// Mutable component by index; `None` outside `0..=2`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut f32> {
        match index {
            0 => Some(&mut self.x),
            1 => Some(&mut self.y),
            2 => Some(&mut self.z),
            _ => None,
        }
    }

    /// Set all three components.
    #[inline]
    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Component-wise comparison within `tolerance`.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    /// [`equals`](Self::equals) with [`KINDA_SMALL_NUMBER`].
    #[must_use]
    pub fn nearly_equals(&self, other: &Self) -> bool {
        self.equals(other, KINDA_SMALL_NUMBER)
    }

    /// Whether all components are equal within `tolerance`.
    #[must_use]
    pub fn all_components_equal(&self, tolerance: f32) -> bool {
        (self.x - self.y).abs() <= tolerance
            && (self.x - self.z).abs() <= tolerance
            && (self.y - self.z).abs() <= tolerance
    }

    /// Largest component.
    #[must_use]
    pub fn max_element(&self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    /// Largest absolute component.
    #[must_use]
    pub fn abs_max(&self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Smallest component.
    #[must_use]
    pub fn min_element(&self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    /// Smallest absolute component.
    #[must_use]
    pub fn abs_min(&self) -> f32 {
        self.x.abs().min(self.y.abs()).min(self.z.abs())
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn component_min(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn component_max(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size_squared().sqrt()
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn size_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length of the XY projection.
    #[must_use]
    pub fn size_2d(&self) -> f32 {
        self.size_squared_2d().sqrt()
    }

    /// Squared length of the XY projection.
    #[must_use]
    pub fn size_squared_2d(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Whether every component's magnitude is below `tolerance`.
    #[must_use]
    pub fn is_nearly_zero(&self, tolerance: f32) -> bool {
        self.x.abs() < tolerance
            && self.y.abs() < tolerance
            && self.z.abs() < tolerance
    }

    /// Exact zero test.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Normalize in place.
    ///
    /// If the squared length is at most `tolerance` (or not finite) the
    /// vector becomes [`ZERO`](Self::ZERO) and `false` is returned, so the
    /// result is never NaN.
    pub fn normalize(&mut self, tolerance: f32) -> bool {
        let square_sum = self.size_squared();
        if square_sum <= tolerance || !square_sum.is_finite() {
            *self = Self::ZERO;
            return false;
        }
        let scale = inv_sqrt(square_sum);
        self.x *= scale;
        self.y *= scale;
        self.z *= scale;
        true
    }

    /// Whether the length is 1 within [`THRESH_VECTOR_NORMALIZED`].
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (1.0 - self.size_squared()).abs() < THRESH_VECTOR_NORMALIZED
    }

    /// Whether the squared length is 1 within `length_squared_tolerance`.
    #[must_use]
    pub fn is_unit(&self, length_squared_tolerance: f32) -> bool {
        (1.0 - self.size_squared()).abs() < length_squared_tolerance
    }

    /// Split into a unit direction and a length. Lengths at or below
    /// [`SMALL_NUMBER`] give a zero direction.
    #[must_use]
    pub fn to_direction_and_length(&self) -> (Self, f32) {
        let length = self.size();
        if length > SMALL_NUMBER {
            (*self * (1.0 / length), length)
        } else {
            (Self::ZERO, length)
        }
    }

    /// `+1`/`-1` per component, by sign (zero counts as positive).
    #[must_use]
    pub fn sign_vector(&self) -> Self {
        Self::new(
            float_select(self.x, 1.0, -1.0),
            float_select(self.y, 1.0, -1.0),
            float_select(self.z, 1.0, -1.0),
        )
    }

    /// Project onto the `z = 1` plane (divide by z).
    #[must_use]
    pub fn projection(&self) -> Self {
        let rz = 1.0 / self.z;
        Self::new(self.x * rz, self.y * rz, 1.0)
    }

    /// Normalized copy without any length check.
    #[must_use]
    pub fn unsafe_normal(&self) -> Self {
        *self * inv_sqrt(self.size_squared())
    }

    /// Normalized copy, or [`ZERO`](Self::ZERO) when the squared length is
    /// at most `tolerance` or not finite.
    #[must_use]
    pub fn safe_normal(&self, tolerance: f32) -> Self {
        let square_sum = self.size_squared();
        if square_sum == 1.0 {
            return *self;
        }
        if square_sum <= tolerance || !square_sum.is_finite() {
            return Self::ZERO;
        }
        *self * inv_sqrt(square_sum)
    }

    /// XY-plane normal with `z = 0`, or zero below `tolerance`.
    #[must_use]
    pub fn safe_normal_2d(&self, tolerance: f32) -> Self {
        let square_sum = self.size_squared_2d();
        if square_sum == 1.0 {
            return Self::new(self.x, self.y, 0.0);
        }
        if square_sum <= tolerance || !square_sum.is_finite() {
            return Self::ZERO;
        }
        let scale = inv_sqrt(square_sum);
        Self::new(self.x * scale, self.y * scale, 0.0)
    }

    /// Component-wise reciprocal; zero components map to [`BIG_NUMBER`].
    #[must_use]
    pub fn reciprocal(&self) -> Self {
        let recip = |c: f32| if c == 0.0 { BIG_NUMBER } else { 1.0 / c };
        Self::new(recip(self.x), recip(self.y), recip(self.z))
    }

    /// Whether X == Y == Z within `tolerance`.
    #[must_use]
    pub fn is_uniform(&self, tolerance: f32) -> bool {
        (self.x - self.y).abs() < tolerance
            && (self.y - self.z).abs() < tolerance
    }

    /// Reflect about the plane with unit normal `mirror_normal`.
    #[must_use]
    pub fn mirror_by_vector(&self, mirror_normal: Self) -> Self {
        *self - mirror_normal * (2.0 * self.dot(mirror_normal))
    }

    /// Rotate by `angle_deg` degrees about `axis` (Rodrigues' formula).
    ///
    /// `axis` must be unit length; this is not checked.
    #[must_use]
    pub fn rotate_angle_axis(&self, angle_deg: f32, axis: Self) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();

        let xx = axis.x * axis.x;
        let yy = axis.y * axis.y;
        let zz = axis.z * axis.z;

        let xy = axis.x * axis.y;
        let yz = axis.y * axis.z;
        let zx = axis.z * axis.x;

        let xs = axis.x * s;
        let ys = axis.y * s;
        let zs = axis.z * s;

        let omc = 1.0 - c;

        Self::new(
            (omc * xx + c) * self.x
                + (omc * xy - zs) * self.y
                + (omc * zx + ys) * self.z,
            (omc * xy + zs) * self.x
                + (omc * yy + c) * self.y
                + (omc * yz - xs) * self.z,
            (omc * zx - ys) * self.x
                + (omc * yz + xs) * self.y
                + (omc * zz + c) * self.z,
        )
    }

    /// Projection of this vector onto `other` (any length, non-zero).
    #[must_use]
    pub fn project_onto(&self, other: Self) -> Self {
        other * (self.dot(other) / other.dot(other))
    }

    /// Projection of this vector onto a unit `normal`.
    #[must_use]
    pub fn project_onto_normal(&self, normal: Self) -> Self {
        normal * self.dot(normal)
    }

    /// Whether any component is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite())
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn dist(a: Self, b: Self) -> f32 {
        Self::dist_squared(a, b).sqrt()
    }

    /// Squared distance between two points.
    #[must_use]
    pub fn dist_squared(a: Self, b: Self) -> f32 {
        (b - a).size_squared()
    }

    /// Whether two points coincide within [`THRESH_POINTS_ARE_SAME`].
    #[must_use]
    pub fn points_are_same(p: Self, q: Self) -> bool {
        (p.x - q.x).abs() < THRESH_POINTS_ARE_SAME
            && (p.y - q.y).abs() < THRESH_POINTS_ARE_SAME
            && (p.z - q.z).abs() < THRESH_POINTS_ARE_SAME
    }

    /// Whether every component differs by less than `dist`.
    #[must_use]
    pub fn points_are_near(a: Self, b: Self, dist: f32) -> bool {
        (a.x - b.x).abs() < dist
            && (a.y - b.y).abs() < dist
            && (a.z - b.z).abs() < dist
    }

    /// Signed distance from `point` to the plane through `base` with unit
    /// `normal`.
    #[must_use]
    pub fn point_plane_dist(point: Self, base: Self, normal: Self) -> f32 {
        (point - base).dot(normal)
    }

    /// Closest point to `point` on the plane through `base` with unit
    /// `normal`.
    #[must_use]
    pub fn point_plane_project(point: Self, base: Self, normal: Self) -> Self {
        point - normal * Self::point_plane_dist(point, base, normal)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X={:.3} Y={:.3} Z={:.3}", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl BitOr for Vector3 {
    type Output = f32;

    #[inline]
    fn bitor(self, rhs: Self) -> f32 {
        self.dot(rhs)
    }
}

impl BitXor for Vector3 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.cross(rhs)
    }
}

impl Add for Vector3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vector3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Div for Vector3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    #[inline]
    fn mul(self, scale: f32) -> Self {
        Self::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;

    #[inline]
    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    #[inline]
    fn div(self, scale: f32) -> Self {
        let r = 1.0 / scale;
        Self::new(self.x * r, self.y * r, self.z * r)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    #[inline]
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl MulAssign for Vector3 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector3 {
    #[inline]
    fn div_assign(&mut self, scale: f32) {
        *self = *self / scale;
    }
}

impl DivAssign for Vector3 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}
