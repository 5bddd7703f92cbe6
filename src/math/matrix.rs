//! 4×4 transform matrix.
//!
//! Storage is row-major (`m[row][col]`) and vectors are row vectors, so a
//! point transforms as `p' = p * M`. Rows 0–2 hold the basis axes and row 3
//! the translation. Products compose left to right: `(a * b)` applied to a
//! vector is `v * a * b`, i.e. `a` is applied first.
//!
//! The memory layout is identical to a column-major, column-vector matrix
//! (`glam::Mat4`) of the same transform, which is what the `From`
//! conversions and [`Matrix4::to_array_2d`] rely on when handing matrices to
//! a shader.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign};

use super::{Vector3, Vector4, KINDA_SMALL_NUMBER, SMALL_NUMBER};

/// One of the three basis axes stored in rows 0–2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Row 0.
    X,
    /// Row 1.
    Y,
    /// Row 2.
    Z,
}

impl Axis {
    const fn row(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Row-major 4×4 `f32` matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Matrix4 {
    /// Elements, `m[row][col]`.
    pub m: [[f32; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// All zeros.
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    /// Matrix from rows.
    #[must_use]
    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// Matrix whose rows are the three axes and the origin; the homogeneous
    /// column is `(0, 0, 0, 1)`.
    #[must_use]
    pub const fn from_axes(
        x: Vector3,
        y: Vector3,
        z: Vector3,
        origin: Vector3,
    ) -> Self {
        Self {
            m: [
                [x.x, x.y, x.z, 0.0],
                [y.x, y.y, y.z, 0.0],
                [z.x, z.y, z.z, 0.0],
                [origin.x, origin.y, origin.z, 1.0],
            ],
        }
    }

    /// Pure translation.
    #[must_use]
    pub const fn from_translation(t: Vector3) -> Self {
        Self::from_axes(Vector3::X_AXIS, Vector3::Y_AXIS, Vector3::Z_AXIS, t)
    }

    /// Per-axis scale.
    #[must_use]
    pub const fn from_scale(s: Vector3) -> Self {
        Self::from_axes(
            Vector3::new(s.x, 0.0, 0.0),
            Vector3::new(0.0, s.y, 0.0),
            Vector3::new(0.0, 0.0, s.z),
            Vector3::ZERO,
        )
    }

    /// The raw row-major element array, ready for a shader uniform.
    #[must_use]
    pub const fn to_array_2d(&self) -> [[f32; 4]; 4] {
        self.m
    }

    /// Element-wise comparison within `tolerance`.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// [`equals`](Self::equals) with [`KINDA_SMALL_NUMBER`].
    #[must_use]
    pub fn nearly_equals(&self, other: &Self) -> bool {
        self.equals(other, KINDA_SMALL_NUMBER)
    }

    /// `v * M` for a homogeneous row vector.
    #[must_use]
    pub fn transform_vector4(&self, v: Vector4) -> Vector4 {
        let m = &self.m;
        Vector4::new(
            v.x * m[0][0] + v.y * m[1][0] + v.z * m[2][0] + v.w * m[3][0],
            v.x * m[0][1] + v.y * m[1][1] + v.z * m[2][1] + v.w * m[3][1],
            v.x * m[0][2] + v.y * m[1][2] + v.z * m[2][2] + v.w * m[3][2],
            v.x * m[0][3] + v.y * m[1][3] + v.z * m[2][3] + v.w * m[3][3],
        )
    }

    /// Transform a point (`w = 1`, translation applies).
    #[must_use]
    pub fn transform_position(&self, p: Vector3) -> Vector4 {
        self.transform_vector4(Vector4::point(p))
    }

    /// Transform a direction (`w = 0`, translation ignored).
    #[must_use]
    pub fn transform_vector(&self, v: Vector3) -> Vector4 {
        self.transform_vector4(Vector4::direction(v))
    }

    /// Transform a point by the inverse of this matrix (unguarded).
    #[must_use]
    pub fn inverse_transform_position(&self, p: Vector3) -> Vector4 {
        self.inverse_fast().transform_position(p)
    }

    /// Transform a direction by the inverse of this matrix (unguarded).
    #[must_use]
    pub fn inverse_transform_vector(&self, v: Vector3) -> Vector4 {
        self.inverse_fast().transform_vector(v)
    }

    /// Transpose.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let m = &self.m;
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = m[j][i];
            }
        }
        Self { m: r }
    }

    /// Full 4×4 determinant (closed-form cofactor expansion).
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0]
            * (m[1][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
                - m[2][1] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
                + m[3][1] * (m[1][2] * m[2][3] - m[1][3] * m[2][2]))
            - m[1][0]
                * (m[0][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
                    - m[2][1] * (m[0][2] * m[3][3] - m[0][3] * m[3][2])
                    + m[3][1] * (m[0][2] * m[2][3] - m[0][3] * m[2][2]))
            + m[2][0]
                * (m[0][1] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
                    - m[1][1] * (m[0][2] * m[3][3] - m[0][3] * m[3][2])
                    + m[3][1] * (m[0][2] * m[1][3] - m[0][3] * m[1][2]))
            - m[3][0]
                * (m[0][1] * (m[1][2] * m[2][3] - m[1][3] * m[2][2])
                    - m[1][1] * (m[0][2] * m[2][3] - m[0][3] * m[2][2])
                    + m[2][1] * (m[0][2] * m[1][3] - m[0][3] * m[1][2]))
    }

    /// Determinant of the 3×3 rotation block.
    #[must_use]
    pub fn rot_determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[1][0] * (m[0][1] * m[2][2] - m[0][2] * m[2][1])
            + m[2][0] * (m[0][1] * m[1][2] - m[0][2] * m[1][1])
    }

    /// Whether all three basis axes are nearly zero.
    fn has_nil_basis(&self) -> bool {
        self.scaled_axis(Axis::X).is_nearly_zero(SMALL_NUMBER)
            && self.scaled_axis(Axis::Y).is_nearly_zero(SMALL_NUMBER)
            && self.scaled_axis(Axis::Z).is_nearly_zero(SMALL_NUMBER)
    }

    /// Adjugate inverse with no validity check.
    ///
    /// The caller guarantees the matrix is invertible; a singular input
    /// yields an undefined (non-finite) result. Debug builds log an error
    /// when asked to invert a nil basis. Use [`inverse`](Self::inverse) when
    /// the input is not known to be well formed.
    #[must_use]
    pub fn inverse_fast(&self) -> Self {
        if cfg!(debug_assertions) && self.has_nil_basis() {
            log::error!(
                "Matrix4::inverse_fast called on a nil matrix, \
                  the result is NaN; use inverse()"
            );
        }
        invert_4x4(self)
    }

    /// Guarded inverse.
    ///
    /// Returns [`IDENTITY`](Self::IDENTITY) instead of an unstable result
    /// when all basis axes are nearly zero or the determinant is exactly 0.
    /// Callers cannot tell the fallback from a true inverse without checking
    /// [`determinant`](Self::determinant) themselves.
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.has_nil_basis() {
            return Self::IDENTITY;
        }
        if self.determinant() == 0.0 {
            return Self::IDENTITY;
        }
        invert_4x4(self)
    }

    /// Transpose of the adjoint of the 3×3 block, for transforming normals
    /// under non-uniform scale. Translation is dropped.
    #[must_use]
    pub fn transpose_adjoint(&self) -> Self {
        let m = &self.m;
        Self {
            m: [
                [
                    m[1][1] * m[2][2] - m[1][2] * m[2][1],
                    m[1][2] * m[2][0] - m[1][0] * m[2][2],
                    m[1][0] * m[2][1] - m[1][1] * m[2][0],
                    0.0,
                ],
                [
                    m[2][1] * m[0][2] - m[2][2] * m[0][1],
                    m[2][2] * m[0][0] - m[2][0] * m[0][2],
                    m[2][0] * m[0][1] - m[2][1] * m[0][0],
                    0.0,
                ],
                [
                    m[0][1] * m[1][2] - m[0][2] * m[1][1],
                    m[0][2] * m[1][0] - m[0][0] * m[1][2],
                    m[0][0] * m[1][1] - m[0][1] * m[1][0],
                    0.0,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    fn row_square_sum(&self, row: usize) -> f32 {
        let r = &self.m[row];
        r[0] * r[0] + r[1] * r[1] + r[2] * r[2]
    }

    /// Rescale each basis row to unit length.
    ///
    /// Rows whose squared magnitude is at most `tolerance` are left as they
    /// are, so a degenerate basis stays degenerate.
    pub fn remove_scaling(&mut self, tolerance: f32) {
        let _ = self.extract_scaling(tolerance);
    }

    /// Copy with [`remove_scaling`](Self::remove_scaling) applied.
    #[must_use]
    pub fn without_scale(&self, tolerance: f32) -> Self {
        let mut result = *self;
        result.remove_scaling(tolerance);
        result
    }

    /// Remove the scaling like [`remove_scaling`](Self::remove_scaling) and
    /// return the per-row scale that was present. A row at or below
    /// `tolerance` reports a scale of 0 and is left untouched.
    pub fn extract_scaling(&mut self, tolerance: f32) -> Vector3 {
        let mut scale = Vector3::ZERO;
        for row in 0..3 {
            let square_sum = self.row_square_sum(row);
            let row_scale = if square_sum > tolerance {
                let s = square_sum.sqrt();
                let inv = 1.0 / s;
                for cell in &mut self.m[row][..3] {
                    *cell *= inv;
                }
                s
            } else {
                0.0
            };
            if let Some(c) = scale.get_mut(row) {
                *c = row_scale;
            }
        }
        scale
    }

    /// Per-row magnitude of the 3×3 block; rows at or below `tolerance`
    /// report 0.
    #[must_use]
    pub fn scale_vector(&self, tolerance: f32) -> Vector3 {
        let scale = |row: usize| {
            let square_sum = self.row_square_sum(row);
            if square_sum > tolerance {
                square_sum.sqrt()
            } else {
                0.0
            }
        };
        Vector3::new(scale(0), scale(1), scale(2))
    }

    /// Copy with the translation row zeroed.
    #[must_use]
    pub fn remove_translation(&self) -> Self {
        let mut result = *self;
        result.m[3][0] = 0.0;
        result.m[3][1] = 0.0;
        result.m[3][2] = 0.0;
        result
    }

    /// Copy with `translation` added to the translation row.
    #[must_use]
    pub fn concat_translation(&self, translation: Vector3) -> Self {
        let mut result = *self;
        result.m[3][0] += translation.x;
        result.m[3][1] += translation.y;
        result.m[3][2] += translation.z;
        result
    }

    /// Scale the translation row component-wise.
    pub fn scale_translation(&mut self, scale: Vector3) {
        self.m[3][0] *= scale.x;
        self.m[3][1] *= scale.y;
        self.m[3][2] *= scale.z;
    }

    /// Largest basis-row magnitude.
    #[must_use]
    pub fn maximum_axis_scale(&self) -> f32 {
        self.row_square_sum(0)
            .max(self.row_square_sum(1))
            .max(self.row_square_sum(2))
            .sqrt()
    }

    /// Translation row.
    #[must_use]
    pub fn origin(&self) -> Vector3 {
        Vector3::new(self.m[3][0], self.m[3][1], self.m[3][2])
    }

    /// Overwrite the translation row.
    pub fn set_origin(&mut self, origin: Vector3) {
        self.m[3][0] = origin.x;
        self.m[3][1] = origin.y;
        self.m[3][2] = origin.z;
    }

    /// Basis row, including any scale.
    #[must_use]
    pub fn scaled_axis(&self, axis: Axis) -> Vector3 {
        let r = &self.m[axis.row()];
        Vector3::new(r[0], r[1], r[2])
    }

    /// All three basis rows, including any scale.
    #[must_use]
    pub fn scaled_axes(&self) -> (Vector3, Vector3, Vector3) {
        (
            self.scaled_axis(Axis::X),
            self.scaled_axis(Axis::Y),
            self.scaled_axis(Axis::Z),
        )
    }

    /// Basis row normalized (zero when degenerate).
    #[must_use]
    pub fn unit_axis(&self, axis: Axis) -> Vector3 {
        self.scaled_axis(axis).safe_normal(SMALL_NUMBER)
    }

    /// All three basis rows normalized.
    #[must_use]
    pub fn unit_axes(&self) -> (Vector3, Vector3, Vector3) {
        (
            self.unit_axis(Axis::X),
            self.unit_axis(Axis::Y),
            self.unit_axis(Axis::Z),
        )
    }

    /// Overwrite one basis row.
    pub fn set_axis(&mut self, axis: Axis, value: Vector3) {
        let r = &mut self.m[axis.row()];
        r[0] = value.x;
        r[1] = value.y;
        r[2] = value.z;
    }

    /// Column `i` of the 3×3 block; `None` outside `0..=3`.
    #[must_use]
    pub fn column(&self, i: usize) -> Option<Vector3> {
        (i < 4).then(|| Vector3::new(self.m[0][i], self.m[1][i], self.m[2][i]))
    }

    /// Whether any element is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        self.m.iter().flatten().any(|v| !v.is_finite())
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    ///
    /// `z = normalize(eye − target)`, `x = normalize(up × z)`, `y = z × x`.
    /// The axes are written into the columns of the 3×3 block and the
    /// translation row is `(−eye·x, −eye·y, −eye·z)`, so `p * M` yields the
    /// point in camera space.
    ///
    /// Degenerate when `up` is parallel to the view direction: `x` collapses
    /// to the zero vector and the resulting matrix is singular. Callers that
    /// can hit this must choose a different `up`.
    #[must_use]
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let z_axis = (eye - target).safe_normal(SMALL_NUMBER);
        let x_axis = (up ^ z_axis).safe_normal(SMALL_NUMBER);
        let y_axis = z_axis ^ x_axis;
        Self::view_from_basis(x_axis, y_axis, z_axis, eye)
    }

    /// View matrix for an already orthonormal basis at `eye`, in the
    /// [`look_at`](Self::look_at) layout.
    #[must_use]
    pub fn view_from_basis(
        x: Vector3,
        y: Vector3,
        z: Vector3,
        eye: Vector3,
    ) -> Self {
        Self {
            m: [
                [x.x, y.x, z.x, 0.0],
                [x.y, y.y, z.y, 0.0],
                [x.z, y.z, z.z, 0.0],
                [-eye | x, -eye | y, -eye | z, 1.0],
            ],
        }
    }

    /// Right-handed perspective projection for row vectors.
    ///
    /// `fov_deg` is the vertical field of view in degrees and `ratio` is
    /// width / height. Depth maps to the OpenGL-style `[-1, 1]` clip range.
    #[must_use]
    pub fn perspective(ratio: f32, fov_deg: f32, near: f32, far: f32) -> Self {
        let range = far - near;
        let tan_half_fov = (fov_deg / 2.0).to_radians().tan();
        Self {
            m: [
                [1.0 / (tan_half_fov * ratio), 0.0, 0.0, 0.0],
                [0.0, 1.0 / tan_half_fov, 0.0, 0.0],
                [0.0, 0.0, (near + far) / range, -1.0],
                [0.0, 0.0, 2.0 * far * near / range, 0.0],
            ],
        }
    }
}

/// Adjugate / determinant inverse, evaluated in `f64`.
///
/// The cofactor layout works for either storage order since
/// `inverse(Mᵀ) = inverse(M)ᵀ`.
fn invert_4x4(matrix: &Matrix4) -> Matrix4 {
    let mut s = [0.0_f64; 16];
    for (dst, src) in s.iter_mut().zip(matrix.m.iter().flatten()) {
        *dst = f64::from(*src);
    }

    let mut inv = [0.0_f64; 16];
    inv[0] = s[5] * s[10] * s[15] - s[5] * s[11] * s[14] - s[9] * s[6] * s[15]
        + s[9] * s[7] * s[14]
        + s[13] * s[6] * s[11]
        - s[13] * s[7] * s[10];
    inv[1] = -s[1] * s[10] * s[15] + s[1] * s[11] * s[14] + s[9] * s[2] * s[15]
        - s[9] * s[3] * s[14]
        - s[13] * s[2] * s[11]
        + s[13] * s[3] * s[10];
    inv[2] = s[1] * s[6] * s[15] - s[1] * s[7] * s[14] - s[5] * s[2] * s[15]
        + s[5] * s[3] * s[14]
        + s[13] * s[2] * s[7]
        - s[13] * s[3] * s[6];
    inv[3] = -s[1] * s[6] * s[11] + s[1] * s[7] * s[10] + s[5] * s[2] * s[11]
        - s[5] * s[3] * s[10]
        - s[9] * s[2] * s[7]
        + s[9] * s[3] * s[6];
    inv[4] = -s[4] * s[10] * s[15] + s[4] * s[11] * s[14] + s[8] * s[6] * s[15]
        - s[8] * s[7] * s[14]
        - s[12] * s[6] * s[11]
        + s[12] * s[7] * s[10];
    inv[5] = s[0] * s[10] * s[15] - s[0] * s[11] * s[14] - s[8] * s[2] * s[15]
        + s[8] * s[3] * s[14]
        + s[12] * s[2] * s[11]
        - s[12] * s[3] * s[10];
    inv[6] = -s[0] * s[6] * s[15] + s[0] * s[7] * s[14] + s[4] * s[2] * s[15]
        - s[4] * s[3] * s[14]
        - s[12] * s[2] * s[7]
        + s[12] * s[3] * s[6];
    inv[7] = s[0] * s[6] * s[11] - s[0] * s[7] * s[10] - s[4] * s[2] * s[11]
        + s[4] * s[3] * s[10]
        + s[8] * s[2] * s[7]
        - s[8] * s[3] * s[6];
    inv[8] = s[4] * s[9] * s[15] - s[4] * s[11] * s[13] - s[8] * s[5] * s[15]
        + s[8] * s[7] * s[13]
        + s[12] * s[5] * s[11]
        - s[12] * s[7] * s[9];
    inv[9] = -s[0] * s[9] * s[15] + s[0] * s[11] * s[13] + s[8] * s[1] * s[15]
        - s[8] * s[3] * s[13]
        - s[12] * s[1] * s[11]
        + s[12] * s[3] * s[9];
    inv[10] = s[0] * s[5] * s[15] - s[0] * s[7] * s[13] - s[4] * s[1] * s[15]
        + s[4] * s[3] * s[13]
        + s[12] * s[1] * s[7]
        - s[12] * s[3] * s[5];
    inv[11] = -s[0] * s[5] * s[11] + s[0] * s[7] * s[9] + s[4] * s[1] * s[11]
        - s[4] * s[3] * s[9]
        - s[8] * s[1] * s[7]
        + s[8] * s[3] * s[5];
    inv[12] = -s[4] * s[9] * s[14] + s[4] * s[10] * s[13] + s[8] * s[5] * s[14]
        - s[8] * s[6] * s[13]
        - s[12] * s[5] * s[10]
        + s[12] * s[6] * s[9];
    inv[13] = s[0] * s[9] * s[14] - s[0] * s[10] * s[13] - s[8] * s[1] * s[14]
        + s[8] * s[2] * s[13]
        + s[12] * s[1] * s[10]
        - s[12] * s[2] * s[9];
    inv[14] = -s[0] * s[5] * s[14] + s[0] * s[6] * s[13] + s[4] * s[1] * s[14]
        - s[4] * s[2] * s[13]
        - s[12] * s[1] * s[6]
        + s[12] * s[2] * s[5];
    inv[15] = s[0] * s[5] * s[10] - s[0] * s[6] * s[9] - s[4] * s[1] * s[10]
        + s[4] * s[2] * s[9]
        + s[8] * s[1] * s[6]
        - s[8] * s[2] * s[5];

    let det = s[0] * inv[0] + s[1] * inv[4] + s[2] * inv[8] + s[3] * inv[12];
    let inv_det = 1.0 / det;

    let mut result = Matrix4::ZERO;
    for (dst, src) in result.m.iter_mut().flatten().zip(inv.iter()) {
        *dst = (src * inv_det) as f32;
    }
    result
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j]
                    + a[i][1] * b[1][j]
                    + a[i][2] * b[2][j]
                    + a[i][3] * b[3][j];
            }
        }
        Self { m: r }
    }
}

impl MulAssign for Matrix4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Matrix4 {
    type Output = Self;

    fn mul(mut self, scale: f32) -> Self {
        for cell in self.m.iter_mut().flatten() {
            *cell *= scale;
        }
        self
    }
}

impl MulAssign<f32> for Matrix4 {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl Add for Matrix4 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        for (a, b) in self.m.iter_mut().flatten().zip(rhs.m.iter().flatten()) {
            *a += *b;
        }
        self
    }
}

impl AddAssign for Matrix4 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            writeln!(
                f,
                "[{:.3} {:.3} {:.3} {:.3}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(matrix: Matrix4) -> Self {
        Self::from_cols_array_2d(&matrix.m)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(matrix: glam::Mat4) -> Self {
        Self {
            m: matrix.to_cols_array_2d(),
        }
    }
}
