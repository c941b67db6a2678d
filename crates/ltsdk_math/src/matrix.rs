//! # 3x4 Affine Matrix
//!
//! Three rows, four columns. The fourth row is implicitly `{0, 0, 0, 1}`,
//! which lets multiplication skip a quarter of the work of a full 4x4
//! product.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Mul, MulAssign};

use crate::rotation::Rotation;
use crate::vector::Vector3;

/// Affine matrix, `m[row][col]`. Column 3 holds the translation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix3x4 {
    /// Rows of the matrix.
    pub m: [[f32; 4]; 3],
}

impl Default for Matrix3x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3x4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Creates a matrix from rows.
    #[must_use]
    pub const fn from_rows(m: [[f32; 4]; 3]) -> Self {
        Self { m }
    }

    /// Pure translation.
    #[must_use]
    pub fn from_translation(t: Vector3) -> Self {
        let mut mat = Self::IDENTITY;
        mat.set_translation(t);
        mat
    }

    /// Per-axis scale.
    #[must_use]
    pub fn from_scale(scale: Vector3) -> Self {
        Self::from_rows([
            [scale.x, 0.0, 0.0, 0.0],
            [0.0, scale.y, 0.0, 0.0],
            [0.0, 0.0, scale.z, 0.0],
        ])
    }

    /// Pure rotation.
    #[must_use]
    pub fn from_rotation(rot: Rotation) -> Self {
        let b = rot.to_basis();
        Self::from_rows([
            [b[0][0], b[0][1], b[0][2], 0.0],
            [b[1][0], b[1][1], b[1][2], 0.0],
            [b[2][0], b[2][1], b[2][2], 0.0],
        ])
    }

    /// Translation * rotation * uniform scale.
    #[must_use]
    pub fn from_transform(pos: Vector3, rot: Rotation, scale: f32) -> Self {
        let b = rot.to_basis();
        Self::from_rows([
            [b[0][0] * scale, b[0][1] * scale, b[0][2] * scale, pos.x],
            [b[1][0] * scale, b[1][1] * scale, b[1][2] * scale, pos.y],
            [b[2][0] * scale, b[2][1] * scale, b[2][2] * scale, pos.z],
        ])
    }

    /// Extracts the rotation. The 3x3 part must be orthonormal.
    #[must_use]
    pub fn to_rotation(&self) -> Rotation {
        Rotation::from_basis(&self.basis3())
    }

    /// The upper-left 3x3 block.
    #[must_use]
    pub fn basis3(&self) -> [[f32; 3]; 3] {
        let m = &self.m;
        [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ]
    }

    /// Translation column.
    #[must_use]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Sets the translation column.
    pub fn set_translation(&mut self, t: Vector3) {
        self.m[0][3] = t.x;
        self.m[1][3] = t.y;
        self.m[2][3] = t.z;
    }

    /// Returns the right, up and forward basis columns.
    #[must_use]
    pub fn basis_vectors(&self) -> (Vector3, Vector3, Vector3) {
        let m = &self.m;
        (
            Vector3::new(m[0][0], m[1][0], m[2][0]),
            Vector3::new(m[0][1], m[1][1], m[2][1]),
            Vector3::new(m[0][2], m[1][2], m[2][2]),
        )
    }

    /// Sets the right, up and forward basis columns.
    pub fn set_basis_vectors(&mut self, right: Vector3, up: Vector3, forward: Vector3) {
        for (col, v) in [right, up, forward].into_iter().enumerate() {
            self.m[0][col] = v.x;
            self.m[1][col] = v.y;
            self.m[2][col] = v.z;
        }
    }

    /// Transforms a point (translation applied).
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Transforms a direction (translation ignored).
    #[inline]
    #[must_use]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Determinant of the 3x3 block.
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Transposes the 3x3 block, leaving translation alone.
    ///
    /// For a pure rotation this is the inverse rotation.
    #[must_use]
    pub fn transpose3x3(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0], m[0][3]],
            [m[0][1], m[1][1], m[2][1], m[1][3]],
            [m[0][2], m[1][2], m[2][2], m[2][3]],
        ])
    }

    /// General affine inverse.
    ///
    /// A singular matrix trips a debug assertion and yields non-finite
    /// values in release.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let m = &self.m;
        let det = self.determinant();
        debug_assert!(det != 0.0, "inverting a singular matrix");
        let inv_det = 1.0 / det;

        let mut r = [[0.0f32; 4]; 3];
        r[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        r[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        r[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        r[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        r[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        r[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        r[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        r[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        r[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;

        let t = self.translation();
        for row in &mut r {
            row[3] = -(row[0] * t.x + row[1] * t.y + row[2] * t.z);
        }
        Self::from_rows(r)
    }

    /// True if any element is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.m.iter().flatten().any(|v| v.is_nan())
    }

    /// True if every element is within `epsilon` of `other`.
    #[must_use]
    pub fn nearly_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Mul for Matrix3x4 {
    type Output = Self;

    /// 3x4 product. The implicit last rows contribute only the translation
    /// column of `self`, so each element is three multiply/adds.
    fn mul(self, rhs: Self) -> Self {
        debug_assert!(!self.is_nan() && !rhs.is_nan(), "NaN in matrix multiply");
        let a = &self.m;
        let b = &rhs.m;
        let mut r = [[0.0f32; 4]; 3];
        for row in 0..3 {
            for col in 0..3 {
                r[row][col] = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
            }
            r[row][3] = a[row][0] * b[0][3] + a[row][1] * b[1][3] + a[row][2] * b[2][3] + a[row][3];
        }
        Self::from_rows(r)
    }
}

impl MulAssign for Matrix3x4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Matrix3x4 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform_point(rhs)
    }
}
