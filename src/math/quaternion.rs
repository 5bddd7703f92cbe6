//! Unit-quaternion rotations.
//!
//! Rotations compose like matrices: `(a * b).rotate_vector(v)` rotates by
//! `b` first and then by `a`. Interpolation helpers come in normalized and
//! `_not_normalized` flavours; the latter skip the final renormalization and
//! are meant to feed further interpolation.

use std::fmt;
use std::ops::{Add, AddAssign, BitOr, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{
    float_select, inv_sqrt, Axis, Matrix4, Vector3, KINDA_SMALL_NUMBER,
    SMALL_NUMBER,
    THRESH_QUAT_NORMALIZED,
};

/// Cyclic successor of each diagonal index.
const NEXT: [usize; 3] = [1, 2, 0];

/// Rotation quaternion `{x, y, z, w}`; `w` is the real part.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quaternion {
    /// Imaginary X.
    pub x: f32,
    /// Imaginary Y.
    pub y: f32,
    /// Imaginary Z.
    pub z: f32,
    /// Real part.
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Quaternion from raw components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_rad` about `axis`. The axis must be unit length.
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle_rad: f32) -> Self {
        let (s, c) = (0.5 * angle_rad).sin_cos();
        Self::new(s * axis.x, s * axis.y, s * axis.z, c)
    }

    /// Extract the rotation of an unscaled rotation matrix.
    ///
    /// Returns [`IDENTITY`](Self::IDENTITY) when any basis axis is nearly
    /// zero. Otherwise uses the trace when it is positive, and the largest
    /// diagonal element otherwise, so the square root never sees a small or
    /// negative argument.
    #[must_use]
    pub fn from_matrix(matrix: &Matrix4) -> Self {
        if matrix.scaled_axis(Axis::X).is_nearly_zero(KINDA_SMALL_NUMBER)
            || matrix.scaled_axis(Axis::Y).is_nearly_zero(KINDA_SMALL_NUMBER)
            || matrix.scaled_axis(Axis::Z).is_nearly_zero(KINDA_SMALL_NUMBER)
        {
            return Self::IDENTITY;
        }

        let m = &matrix.m;
        let trace = m[0][0] + m[1][1] + m[2][2];

        if trace > 0.0 {
            let inv_s = inv_sqrt(trace + 1.0);
            let w = 0.5 / inv_s;
            let s = 0.5 * inv_s;
            return Self::new(
                (m[1][2] - m[2][1]) * s,
                (m[2][0] - m[0][2]) * s,
                (m[0][1] - m[1][0]) * s,
                w,
            );
        }

        let mut i = 0;
        if m[1][1] > m[0][0] {
            i = 1;
        }
        if m[2][2] > m[i][i] {
            i = 2;
        }
        let j = NEXT[i];
        let k = NEXT[j];

        let s = m[i][i] - m[j][j] - m[k][k] + 1.0;
        let inv_s = inv_sqrt(s);
        let s = 0.5 * inv_s;

        let mut qt = [0.0_f32; 4];
        qt[i] = 0.5 / inv_s;
        qt[3] = (m[j][k] - m[k][j]) * s;
        qt[j] = (m[i][j] + m[j][i]) * s;
        qt[k] = (m[i][k] + m[k][i]) * s;

        Self::new(qt[0], qt[1], qt[2], qt[3])
    }

    /// Rotation taking direction `a` onto direction `b` along the shortest
    /// arc. Neither input needs to be normalized. Opposite directions pick an
    /// arbitrary perpendicular axis.
    #[must_use]
    pub fn find_between(a: Vector3, b: Vector3) -> Self {
        let norm_ab = (a.size_squared() * b.size_squared()).sqrt();
        let w = norm_ab + (a | b);

        let mut result = if w >= 1e-6 * norm_ab {
            Self::new(
                a.y * b.z - a.z * b.y,
                a.z * b.x - a.x * b.z,
                a.x * b.y - a.y * b.x,
                w,
            )
        } else if a.x.abs() > a.y.abs() {
            Self::new(-a.z, 0.0, a.x, 0.0)
        } else {
            Self::new(0.0, -a.z, a.y, 0.0)
        };
        result.normalize(SMALL_NUMBER);
        result
    }

    /// Rotation matrix (row-vector layout), the inverse of
    /// [`from_matrix`](Self::from_matrix).
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4 {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;
        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        Matrix4::from_rows([
            [1.0 - (yy + zz), xy + wz, xz - wy, 0.0],
            [xy - wz, 1.0 - (xx + zz), yz + wx, 0.0],
            [xz + wy, yz - wx, 1.0 - (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Four-component dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// Magnitude.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size_squared().sqrt()
    }

    /// Squared magnitude.
    #[must_use]
    pub fn size_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Whether the squared magnitude is within
    /// [`THRESH_QUAT_NORMALIZED`] of 1.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (1.0 - self.size_squared()).abs() < THRESH_QUAT_NORMALIZED
    }

    /// Normalize in place. Falls back to [`IDENTITY`](Self::IDENTITY) when
    /// the squared magnitude is at or below `tolerance`.
    pub fn normalize(&mut self, tolerance: f32) {
        let square_sum = self.size_squared();
        if square_sum > tolerance {
            let scale = inv_sqrt(square_sum);
            self.x *= scale;
            self.y *= scale;
            self.z *= scale;
            self.w *= scale;
        } else {
            *self = Self::IDENTITY;
        }
    }

    /// Normalized copy; see [`normalize`](Self::normalize).
    #[must_use]
    pub fn normalized(&self, tolerance: f32) -> Self {
        let mut result = *self;
        result.normalize(tolerance);
        result
    }

    /// Component-wise comparison that treats `q` and `-q` as equal.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        let same = (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
            && (self.w - other.w).abs() <= tolerance;
        let flipped = (self.x + other.x).abs() <= tolerance
            && (self.y + other.y).abs() <= tolerance
            && (self.z + other.z).abs() <= tolerance
            && (self.w + other.w).abs() <= tolerance;
        same || flipped
    }

    /// Rotate `v` by this quaternion.
    #[must_use]
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let q = Vector3::new(self.x, self.y, self.z);
        let t = (q ^ v) * 2.0;
        v + t * self.w + (q ^ t)
    }

    /// Rotate `v` by the inverse of this quaternion.
    #[must_use]
    pub fn unrotate_vector(&self, v: Vector3) -> Vector3 {
        let q = Vector3::new(-self.x, -self.y, -self.z);
        let t = (q ^ v) * 2.0;
        v + t * self.w + (q ^ t)
    }

    /// Inverse rotation.
    ///
    /// # Panics
    ///
    /// Debug builds assert the quaternion is normalized; the conjugate is
    /// only the inverse for unit quaternions.
    #[must_use]
    pub fn inverse(&self) -> Self {
        debug_assert!(
            self.is_normalized(),
            "Quaternion::inverse requires a unit quaternion, got |q|^2 = {}",
            self.size_squared()
        );
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Flip the sign if needed so this quaternion lies on the same
    /// hemisphere as `other`.
    pub fn enforce_shortest_arc_with(&mut self, other: &Self) {
        let bias = float_select(other.dot(*self), 1.0, -1.0);
        *self = *self * bias;
    }

    /// Rotation axis and angle (radians).
    #[must_use]
    pub fn to_axis_and_angle(&self) -> (Vector3, f32) {
        (self.rotation_axis(), 2.0 * self.w.clamp(-1.0, 1.0).acos())
    }

    /// Rotation axis; the X axis for a (near) identity rotation.
    #[must_use]
    pub fn rotation_axis(&self) -> Vector3 {
        let s = (1.0 - self.w * self.w).max(0.0).sqrt();
        if s >= 0.0001 {
            Vector3::new(self.x / s, self.y / s, self.z / s)
        } else {
            Vector3::X_AXIS
        }
    }

    /// Local X axis after rotation.
    #[must_use]
    pub fn axis_x(&self) -> Vector3 {
        self.rotate_vector(Vector3::X_AXIS)
    }

    /// Local Y axis after rotation.
    #[must_use]
    pub fn axis_y(&self) -> Vector3 {
        self.rotate_vector(Vector3::Y_AXIS)
    }

    /// Local Z axis after rotation.
    #[must_use]
    pub fn axis_z(&self) -> Vector3 {
        self.rotate_vector(Vector3::Z_AXIS)
    }

    /// Angle between two rotations in radians, in `[0, π]`.
    #[must_use]
    pub fn angular_distance(&self, other: &Self) -> f32 {
        let inner = self.dot(*other);
        (2.0 * inner * inner - 1.0).clamp(-1.0, 1.0).acos()
    }

    /// Angular error between two unit quaternions, scaled to `[0, 1]`.
    #[must_use]
    pub fn error(q1: &Self, q2: &Self) -> f32 {
        let cosom = q1.dot(*q2).abs();
        if cosom < 0.999_999_9 {
            cosom.acos() * std::f32::consts::FRAC_1_PI
        } else {
            0.0
        }
    }

    /// [`error`](Self::error) after normalizing both inputs.
    #[must_use]
    pub fn error_auto_normalize(a: &Self, b: &Self) -> f32 {
        Self::error(&a.normalized(SMALL_NUMBER), &b.normalized(SMALL_NUMBER))
    }

    /// Quaternion logarithm of a unit quaternion (`w = 0` in the result).
    #[must_use]
    pub fn log(&self) -> Self {
        if self.w.abs() < 1.0 {
            let angle = self.w.acos();
            let sin_angle = angle.sin();
            if sin_angle.abs() >= SMALL_NUMBER {
                let scale = angle / sin_angle;
                return Self::new(
                    self.x * scale,
                    self.y * scale,
                    self.z * scale,
                    0.0,
                );
            }
        }
        Self::new(self.x, self.y, self.z, 0.0)
    }

    /// Exponential of a pure quaternion (`w` is ignored).
    #[must_use]
    pub fn exp(&self) -> Self {
        let angle =
            (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let (sin_angle, cos_angle) = angle.sin_cos();
        if sin_angle.abs() >= SMALL_NUMBER {
            let scale = sin_angle / angle;
            Self::new(self.x * scale, self.y * scale, self.z * scale, cos_angle)
        } else {
            Self::new(self.x, self.y, self.z, cos_angle)
        }
    }

    /// Linear blend with shortest-arc correction. The result is not
    /// normalized.
    #[must_use]
    pub fn fast_lerp(a: &Self, b: &Self, alpha: f32) -> Self {
        let bias = float_select(a.dot(*b), 1.0, -1.0);
        (*b * alpha) + (*a * (bias * (1.0 - alpha)))
    }

    /// Bilinear [`fast_lerp`](Self::fast_lerp) across four corners.
    #[must_use]
    pub fn fast_bilerp(
        p00: &Self,
        p10: &Self,
        p01: &Self,
        p11: &Self,
        frac_x: f32,
        frac_y: f32,
    ) -> Self {
        Self::fast_lerp(
            &Self::fast_lerp(p00, p10, frac_x),
            &Self::fast_lerp(p01, p11, frac_x),
            frac_y,
        )
    }

    /// Shortest-arc spherical interpolation without renormalization. Nearly
    /// parallel inputs fall back to a linear blend.
    #[must_use]
    pub fn slerp_not_normalized(
        quat1: &Self,
        quat2: &Self,
        alpha: f32,
    ) -> Self {
        let raw_cosom = quat1.dot(*quat2);
        let cosom = float_select(raw_cosom, raw_cosom, -raw_cosom);

        let (scale0, scale1) = if cosom < 0.9999 {
            let omega = cosom.acos();
            let inv_sin = 1.0 / omega.sin();
            (
                ((1.0 - alpha) * omega).sin() * inv_sin,
                (alpha * omega).sin() * inv_sin,
            )
        } else {
            (1.0 - alpha, alpha)
        };
        let scale1 = float_select(raw_cosom, scale1, -scale1);

        *quat1 * scale0 + *quat2 * scale1
    }

    /// Shortest-arc spherical interpolation.
    #[must_use]
    pub fn slerp(quat1: &Self, quat2: &Self, alpha: f32) -> Self {
        Self::slerp_not_normalized(quat1, quat2, alpha).normalized(SMALL_NUMBER)
    }

    /// Spherical interpolation along the full path, without the shortest-arc
    /// check or renormalization. Used by [`squad`](Self::squad) so the nested
    /// interpolations agree on a direction.
    #[must_use]
    pub fn slerp_full_path_not_normalized(
        quat1: &Self,
        quat2: &Self,
        alpha: f32,
    ) -> Self {
        let cos_angle = quat1.dot(*quat2).clamp(-1.0, 1.0);
        let angle = cos_angle.acos();

        if angle.abs() < KINDA_SMALL_NUMBER {
            return *quat1;
        }

        let inv_sin_angle = 1.0 / angle.sin();
        let scale0 = ((1.0 - alpha) * angle).sin() * inv_sin_angle;
        let scale1 = (alpha * angle).sin() * inv_sin_angle;
        *quat1 * scale0 + *quat2 * scale1
    }

    /// Normalized [`Self::slerp_full_path_not_normalized`].
    #[must_use]
    pub fn slerp_full_path(quat1: &Self, quat2: &Self, alpha: f32) -> Self {
        Self::slerp_full_path_not_normalized(quat1, quat2, alpha)
            .normalized(SMALL_NUMBER)
    }

    /// Cubic spherical interpolation between `quat1` and `quat2` with the
    /// given tangents (see [`calc_tangents`](Self::calc_tangents)).
    #[must_use]
    pub fn squad(
        quat1: &Self,
        tang1: &Self,
        quat2: &Self,
        tang2: &Self,
        alpha: f32,
    ) -> Self {
        let q1 = Self::slerp_not_normalized(quat1, quat2, alpha);
        let q2 = Self::slerp_full_path_not_normalized(tang1, tang2, alpha);
        Self::slerp_full_path(&q1, &q2, 2.0 * alpha * (1.0 - alpha))
    }

    /// Squad tangent at `p` given its neighbours. `_tension` is accepted for
    /// call-site compatibility and currently has no effect.
    #[must_use]
    pub fn calc_tangents(
        prev_p: &Self,
        p: &Self,
        next_p: &Self,
        _tension: f32,
    ) -> Self {
        let inv_p = p.inverse();
        let part1 = (inv_p * *prev_p).log();
        let part2 = (inv_p * *next_p).log();
        let pre_exp = (part1 + part2) * -0.5;
        *p * pre_exp.exp()
    }

    /// Whether any component is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        [self.x, self.y, self.z, self.w].iter().any(|v| !v.is_finite())
    }
}

/// Hamilton product: the result rotates by `rhs` first, then by `self`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, r: Self) -> Self {
        Self::new(
            self.w * r.x + self.x * r.w + self.y * r.z - self.z * r.y,
            self.w * r.y - self.x * r.z + self.y * r.w + self.z * r.x,
            self.w * r.z + self.x * r.y - self.y * r.x + self.z * r.w,
            self.w * r.w - self.x * r.x - self.y * r.y - self.z * r.z,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.rotate_vector(v)
    }
}

impl Mul<f32> for Quaternion {
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

impl MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;

    fn div(self, scale: f32) -> Self {
        let recip = 1.0 / scale;
        self * recip
    }
}

impl Add for Quaternion {
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

impl AddAssign for Quaternion {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Quaternion {
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

impl SubAssign for Quaternion {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// Dot product.
impl BitOr for Quaternion {
    type Output = f32;

    fn bitor(self, rhs: Self) -> f32 {
        self.dot(rhs)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X={:.9} Y={:.9} Z={:.9} W={:.9}",
            self.x, self.y, self.z, self.w
        )
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        Self::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use rand::{Rng, SeedableRng};

    use super::*;

    const EPS: f32 = 1e-4;

    fn random_unit(rng: &mut impl Rng) -> Quaternion {
        loop {
            let q = Quaternion::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            if q.size_squared() > 0.01 {
                return q.normalized(SMALL_NUMBER);
            }
        }
    }

    #[test]
    fn identity_is_default_and_does_nothing() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
        assert_eq!(Quaternion::IDENTITY.rotate_vector(v), v);
    }

    #[test]
    fn axis_angle_quarter_turn_about_y() {
        let q = Quaternion::from_axis_angle(Vector3::UP, FRAC_PI_2);
        // Right-handed: +X goes to -Z.
        let v = q.rotate_vector(Vector3::X_AXIS);
        assert!(v.equals(&Vector3::new(0.0, 0.0, -1.0), EPS), "{v}");
        assert!(q.unrotate_vector(v).equals(&Vector3::X_AXIS, EPS));
    }

    #[test]
    fn rotate_vector_matches_glam() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let q = random_unit(&mut rng);
            let v = Vector3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            let ours = q * v;
            let theirs = glam::Quat::from(q) * glam::Vec3::from(v);
            assert!(ours.equals(&Vector3::from(theirs), 1e-3));
        }
    }

    #[test]
    fn product_applies_right_operand_first() {
        let a = Quaternion::from_axis_angle(Vector3::UP, 0.8);
        let b = Quaternion::from_axis_angle(Vector3::X_AXIS, -0.3);
        let v = Vector3::new(0.2, 0.4, 1.0);
        let composed = (a * b).rotate_vector(v);
        let stepwise = a.rotate_vector(b.rotate_vector(v));
        assert!(composed.equals(&stepwise, EPS));
    }

    #[test]
    fn times_inverse_is_identity() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let q = random_unit(&mut rng);
            assert!((q * q.inverse()).equals(&Quaternion::IDENTITY, EPS));
            assert!((q.inverse() * q).equals(&Quaternion::IDENTITY, EPS));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unit quaternion")]
    fn inverse_of_non_unit_asserts() {
        let _ = Quaternion::new(0.0, 0.0, 0.0, 2.0).inverse();
    }

    #[test]
    fn normalize_small_input_becomes_identity() {
        let mut q = Quaternion::new(1e-6, 0.0, 0.0, 0.0);
        q.normalize(SMALL_NUMBER);
        assert_eq!(q, Quaternion::IDENTITY);

        let q = Quaternion::new(0.0, 0.0, 3.0, 4.0).normalized(SMALL_NUMBER);
        assert!(q.equals(&Quaternion::new(0.0, 0.0, 0.6, 0.8), 1e-6));
        assert!(q.is_normalized());
    }

    #[test]
    fn equals_ignores_sign() {
        let q = Quaternion::from_axis_angle(Vector3::Z_AXIS, 1.0);
        assert!(q.equals(&-q, 1e-6));
        assert!(!q.equals(&Quaternion::IDENTITY, 1e-3));
    }

    fn assert_matrix_round_trip(q: Quaternion) {
        let m = q.to_matrix();
        let back = Quaternion::from_matrix(&m);
        assert!(back.equals(&q, 1e-3), "{q} -> {back}");
        let oracle = glam::Quat::from_mat4(&glam::Mat4::from(m));
        assert!(back.equals(&Quaternion::from(oracle), 1e-3), "glam: {oracle}");
    }

    #[test]
    fn from_matrix_positive_trace_branch() {
        assert_matrix_round_trip(Quaternion::from_axis_angle(Vector3::UP, 0.5));
    }

    #[test]
    fn from_matrix_largest_diagonal_x() {
        // 179 degrees about X: trace < 0, m[0][0] dominates.
        let angle = 179.0_f32.to_radians();
        let q = Quaternion::from_axis_angle(Vector3::X_AXIS, angle);
        let m = q.to_matrix();
        assert!(m.m[0][0] + m.m[1][1] + m.m[2][2] < 0.0);
        assert!(m.m[0][0] > m.m[1][1] && m.m[0][0] > m.m[2][2]);
        assert_matrix_round_trip(q);
    }

    #[test]
    fn from_matrix_largest_diagonal_y() {
        let angle = 179.0_f32.to_radians();
        let q = Quaternion::from_axis_angle(Vector3::Y_AXIS, angle);
        let m = q.to_matrix();
        assert!(m.m[1][1] > m.m[0][0] && m.m[1][1] > m.m[2][2]);
        assert_matrix_round_trip(q);
    }

    #[test]
    fn from_matrix_largest_diagonal_z() {
        let angle = 179.0_f32.to_radians();
        let q = Quaternion::from_axis_angle(Vector3::Z_AXIS, angle);
        let m = q.to_matrix();
        assert!(m.m[2][2] > m.m[0][0] && m.m[2][2] > m.m[1][1]);
        assert_matrix_round_trip(q);
    }

    #[test]
    fn from_matrix_random_rotations() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        for _ in 0..200 {
            assert_matrix_round_trip(random_unit(&mut rng));
        }
    }

    #[test]
    fn from_matrix_nil_axis_is_identity() {
        let mut m = Matrix4::IDENTITY;
        m.set_axis(Axis::Y, Vector3::ZERO);
        assert_eq!(Quaternion::from_matrix(&m), Quaternion::IDENTITY);
    }

    #[test]
    fn to_matrix_matches_rotate_vector() {
        let q = Quaternion::from_axis_angle(Vector3::new(0.0, 0.6, 0.8), 1.3);
        let v = Vector3::new(1.0, 2.0, -0.5);
        let via_matrix = q.to_matrix().transform_vector(v).xyz();
        assert!(via_matrix.equals(&q.rotate_vector(v), EPS));
    }

    #[test]
    fn axis_and_angle() {
        let axis = Vector3::new(0.0, 0.6, 0.8);
        let q = Quaternion::from_axis_angle(axis, 1.2);
        let (got_axis, angle) = q.to_axis_and_angle();
        assert!(got_axis.equals(&axis, EPS));
        assert!((angle - 1.2).abs() < EPS);
        assert_eq!(Quaternion::IDENTITY.rotation_axis(), Vector3::X_AXIS);
        assert!(q.axis_z().equals(&(q * Vector3::Z_AXIS), 1e-6));
    }

    #[test]
    fn shortest_arc_flips_sign() {
        let a = Quaternion::from_axis_angle(Vector3::UP, 0.1);
        let mut b = -Quaternion::from_axis_angle(Vector3::UP, 0.2);
        assert!(a.dot(b) < 0.0);
        b.enforce_shortest_arc_with(&a);
        assert!(a.dot(b) > 0.0);
    }

    #[test]
    fn fast_lerp_endpoints_and_sign() {
        let a = Quaternion::from_axis_angle(Vector3::UP, 0.0);
        let b = -Quaternion::from_axis_angle(Vector3::UP, 1.0);
        assert!(Quaternion::fast_lerp(&a, &b, 0.0).equals(&a, 1e-6));
        let mid = Quaternion::fast_lerp(&a, &b, 0.5);
        // Not renormalized.
        assert!(mid.size() < 1.0);
        let expected = Quaternion::from_axis_angle(Vector3::UP, 0.5);
        assert!(mid.normalized(SMALL_NUMBER).equals(&expected, 1e-4));
    }

    #[test]
    fn slerp_halfway_matches_glam() {
        let a = Quaternion::from_axis_angle(Vector3::X_AXIS, 0.3);
        let b = Quaternion::from_axis_angle(Vector3::UP, 2.0);
        let ours = Quaternion::slerp(&a, &b, 0.5);
        let theirs = glam::Quat::from(a).slerp(glam::Quat::from(b), 0.5);
        assert!(ours.equals(&Quaternion::from(theirs), 1e-4));
        assert!(ours.is_normalized());
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let a = Quaternion::IDENTITY;
        let b = -Quaternion::from_axis_angle(Vector3::Z_AXIS, 0.4);
        let mid = Quaternion::slerp(&a, &b, 0.5);
        let (_, angle) = mid.to_axis_and_angle();
        let angle = if angle > PI { 2.0 * PI - angle } else { angle };
        assert!((angle - 0.2).abs() < EPS, "{angle}");
    }

    #[test]
    fn slerp_full_path_nearly_equal_returns_first() {
        let a = Quaternion::from_axis_angle(Vector3::UP, 0.3);
        assert_eq!(Quaternion::slerp_full_path_not_normalized(&a, &a, 0.7), a);
    }

    #[test]
    fn squad_hits_endpoints() {
        let q0 = Quaternion::from_axis_angle(Vector3::UP, 0.0);
        let q1 = Quaternion::from_axis_angle(Vector3::UP, 0.5);
        let q2 = Quaternion::from_axis_angle(Vector3::UP, 1.0);
        let q3 = Quaternion::from_axis_angle(Vector3::UP, 1.5);
        let t1 = Quaternion::calc_tangents(&q0, &q1, &q2, 0.0);
        let t2 = Quaternion::calc_tangents(&q1, &q2, &q3, 0.0);
        assert!(Quaternion::squad(&q1, &t1, &q2, &t2, 0.0).equals(&q1, EPS));
        assert!(Quaternion::squad(&q1, &t1, &q2, &t2, 1.0).equals(&q2, EPS));
        // Evenly spaced rotations about one axis: squad is a plain slerp.
        let mid = Quaternion::squad(&q1, &t1, &q2, &t2, 0.5);
        let expected = Quaternion::from_axis_angle(Vector3::UP, 0.75);
        assert!(mid.equals(&expected, 1e-3));
    }

    #[test]
    fn log_exp_round_trip() {
        let q = Quaternion::from_axis_angle(Vector3::new(0.6, 0.0, 0.8), 1.1);
        let l = q.log();
        assert_eq!(l.w, 0.0);
        assert!(l.exp().equals(&q, EPS));
        assert_eq!(
            Quaternion::IDENTITY.log(),
            Quaternion::new(0.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn find_between_maps_directions() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 3.0, 0.0);
        let q = Quaternion::find_between(a, b);
        assert!(q.rotate_vector(a).equals(&Vector3::UP, EPS));

        // Opposite directions still produce a valid half turn.
        let q = Quaternion::find_between(a, -a);
        assert!(q.is_normalized());
        assert!(q.rotate_vector(a).equals(&-a, EPS));
    }

    #[test]
    fn angular_distance_and_error() {
        let a = Quaternion::from_axis_angle(Vector3::UP, 0.2);
        let b = Quaternion::from_axis_angle(Vector3::UP, 0.9);
        assert!((a.angular_distance(&b) - 0.7).abs() < 1e-3);
        assert_eq!(Quaternion::error(&a, &a), 0.0);
        let e = Quaternion::error(&a, &b);
        assert!((e - 0.35 / PI).abs() < 1e-3, "{e}");
        let scaled = Quaternion::error_auto_normalize(&(a * 3.0), &b);
        assert!((scaled - e).abs() < 1e-5);
    }

    #[test]
    fn nan_detection() {
        assert!(!Quaternion::IDENTITY.contains_nan());
        assert!(Quaternion::new(f32::NAN, 0.0, 0.0, 1.0).contains_nan());
    }
}
