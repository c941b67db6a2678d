//! # Quaternion Rotation
//!
//! Orientation stored as a unit quaternion `(x, y, z, w)`.
//!
//! Rotations are normalized by convention, not per operation. A magnitude
//! squared at or above [`ROTATION_MAX_MAG_SQR`] means the data is corrupt and
//! trips a debug assertion wherever a rotation is converted or applied.
//!
//! ## Conventions
//!
//! Left-handed basis: +X right, +Y up, +Z forward. A rotation matrix holds the
//! rotated right/up/forward axes in its columns.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Mul, MulAssign};

use crate::vector::Vector3;

/// Magnitude squared above which a quaternion is considered corrupt.
pub const ROTATION_MAX_MAG_SQR: f32 = 1.5;

/// Trace below which matrix conversion switches to the largest-diagonal branch.
pub const MATRIX_TRACE_THRESHOLD: f32 = -0.999;

/// Below this `1 - cos(angle)` slerp falls back to linear interpolation.
pub const SLERP_EPSILON: f32 = 0.0001;

/// Cosine above which forward and up are treated as parallel.
const PARALLEL_DOT: f32 = 0.99;

/// Row-major 3x3 rotation basis, `m[row][col]`.
pub type Basis3 = [[f32; 3]; 3];

/// Quaternion rotation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rotation {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotation {
    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Converts to `[x, y, z, w]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `angle` radians about a unit `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let half = angle * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Builds a rotation from Euler angles in radians.
    ///
    /// Composed as `yaw * pitch * roll` (yaw about Y, pitch about X, roll
    /// about Z), so roll happens in the object's local frame.
    #[must_use]
    pub fn from_euler_angles(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self::from_axis_angle(Vector3::Y, yaw)
            * Self::from_axis_angle(Vector3::X, pitch)
            * Self::from_axis_angle(Vector3::Z, roll)
    }

    /// Builds the rotation whose forward axis is `forward` and whose up axis
    /// is as close to `up` as possible.
    ///
    /// When the two are nearly parallel the up vector is swizzled to get a
    /// usable cross product.
    #[must_use]
    pub fn from_vectors(forward: Vector3, up: Vector3) -> Self {
        let forward = forward.get_unit();
        let mut up = up;
        if forward.dot(up.get_unit()).abs() > PARALLEL_DOT {
            up = Vector3::new(up.y, up.z, up.x);
        }

        let right = up.cross(forward).get_unit();
        let true_up = forward.cross(right);

        Self::from_basis(&[
            [right.x, true_up.x, forward.x],
            [right.y, true_up.y, forward.y],
            [right.z, true_up.z, forward.z],
        ])
    }

    /// Converts a rotation basis to a quaternion.
    ///
    /// Uses the trace formula unless the trace is below
    /// [`MATRIX_TRACE_THRESHOLD`] (rotations near 180 degrees), in which case
    /// the largest diagonal element drives the computation.
    #[must_use]
    pub fn from_basis(m: &Basis3) -> Self {
        let trace = m[0][0] + m[1][1] + m[2][2];

        if trace < MATRIX_TRACE_THRESHOLD {
            const NEXT: [usize; 3] = [1, 2, 0];

            let mut i = 0;
            if m[1][1] > m[0][0] {
                i = 1;
            }
            if m[2][2] > m[i][i] {
                i = 2;
            }
            let j = NEXT[i];
            let k = NEXT[j];

            let mut s = (m[i][i] - (m[j][j] + m[k][k]) + 1.0).sqrt();
            let mut q = [0.0f32; 4];
            q[i] = s * 0.5;
            s = 0.5 / s;
            q[3] = (m[k][j] - m[j][k]) * s;
            q[j] = (m[j][i] + m[i][j]) * s;
            q[k] = (m[k][i] + m[i][k]) * s;
            return Self::new(q[0], q[1], q[2], q[3]);
        }

        let mut s = (trace + 1.0).sqrt();
        let w = s * 0.5;
        s = 0.5 / s;
        Self::new(
            (m[2][1] - m[1][2]) * s,
            (m[0][2] - m[2][0]) * s,
            (m[1][0] - m[0][1]) * s,
            w,
        )
    }

    /// Converts to a row-major rotation basis.
    #[must_use]
    pub fn to_basis(self) -> Basis3 {
        debug_assert!(self.is_valid(), "corrupt rotation {self:?}");

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

        [
            [1.0 - (yy + zz), xy - wz, xz + wy],
            [xy + wz, 1.0 - (xx + zz), yz - wx],
            [xz - wy, yz + wx, 1.0 - (xx + yy)],
        ]
    }

    /// Four-component dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Squared magnitude.
    #[inline]
    #[must_use]
    pub fn mag_sqr(self) -> f32 {
        self.dot(self)
    }

    /// True if the magnitude is within the corruption bound and finite.
    #[must_use]
    pub fn is_valid(self) -> bool {
        let mag_sqr = self.mag_sqr();
        mag_sqr < ROTATION_MAX_MAG_SQR && !mag_sqr.is_nan()
    }

    /// Returns the normalized quaternion.
    #[must_use]
    pub fn get_unit(self) -> Self {
        let mag = self.mag_sqr().sqrt();
        debug_assert!(mag > 0.0, "normalizing a zero quaternion");
        let inv = 1.0 / mag;
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }

    /// Normalizes in place.
    pub fn normalize(&mut self) {
        *self = self.get_unit();
    }

    /// Conjugate. For unit quaternions this is the inverse.
    #[inline]
    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Inverse, valid for non-unit quaternions too.
    #[must_use]
    pub fn inverse(self) -> Self {
        let mag_sqr = self.mag_sqr();
        debug_assert!(mag_sqr > 0.0, "inverting a zero quaternion");
        let inv = 1.0 / mag_sqr;
        Self::new(-self.x * inv, -self.y * inv, -self.z * inv, self.w * inv)
    }

    /// Rotates a vector.
    #[must_use]
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        debug_assert!(self.is_valid(), "corrupt rotation {self:?}");
        let q = Vector3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Rotated +X axis.
    #[must_use]
    pub fn right(self) -> Vector3 {
        self.rotate_vector(Vector3::X)
    }

    /// Rotated +Y axis.
    #[must_use]
    pub fn up(self) -> Vector3 {
        self.rotate_vector(Vector3::Y)
    }

    /// Rotated +Z axis.
    #[must_use]
    pub fn forward(self) -> Vector3 {
        self.rotate_vector(Vector3::Z)
    }

    /// Spherical interpolation along the shortest arc.
    ///
    /// Falls back to linear weights when the rotations are nearly identical.
    #[must_use]
    pub fn slerp(self, other: Self, t: f32) -> Self {
        let mut cosom = self.dot(other);
        let mut to = other;
        if cosom < 0.0 {
            cosom = -cosom;
            to = Self::new(-to.x, -to.y, -to.z, -to.w);
        }

        let (scale0, scale1) = if (1.0 - cosom) > SLERP_EPSILON {
            let omega = cosom.min(1.0).acos();
            let sinom = omega.sin();
            (((1.0 - t) * omega).sin() / sinom, (t * omega).sin() / sinom)
        } else {
            (1.0 - t, t)
        };

        Self::new(
            scale0 * self.x + scale1 * to.x,
            scale0 * self.y + scale1 * to.y,
            scale0 * self.z + scale1 * to.z,
            scale0 * self.w + scale1 * to.w,
        )
    }

    /// Compares orientations, treating `q` and `-q` as equal.
    #[must_use]
    pub fn nearly_equals(self, other: Self, epsilon: f32) -> bool {
        let close = |a: Self, b: Self| {
            (a.x - b.x).abs() <= epsilon
                && (a.y - b.y).abs() <= epsilon
                && (a.z - b.z).abs() <= epsilon
                && (a.w - b.w).abs() <= epsilon
        };
        close(self, other) || close(self, Self::new(-other.x, -other.y, -other.z, -other.w))
    }

    /// True if any component is NaN.
    #[must_use]
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan() || self.w.is_nan()
    }
}

impl Mul for Rotation {
    type Output = Self;

    /// Composition: `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl MulAssign for Rotation {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Rotation {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.rotate_vector(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_axis_angle_rotates_vector() {
        let r = Rotation::from_axis_angle(Vector3::Y, FRAC_PI_2);
        // Yawing 90 degrees turns forward into right.
        assert!((r * Vector3::Z).nearly_equals(Vector3::X, 1e-6));
    }

    #[test]
    fn test_from_vectors_identity() {
        let r = Rotation::from_vectors(Vector3::Z, Vector3::Y);
        assert!(r.nearly_equals(Rotation::IDENTITY, 1e-6));
    }

    #[test]
    fn test_from_vectors_parallel_up() {
        let r = Rotation::from_vectors(Vector3::Y, Vector3::Y);
        assert!(!r.is_nan());
        assert!(r.forward().nearly_equals(Vector3::Y, 1e-5));
        assert!(r.right().dot(r.forward()).abs() < 1e-5);
    }

    #[test]
    fn test_basis_roundtrip_half_turn() {
        // 180 degrees about X: trace == -1, exercises the diagonal branch.
        let r = Rotation::from_axis_angle(Vector3::X, PI);
        let back = Rotation::from_basis(&r.to_basis());
        assert!(back.nearly_equals(r, 1e-5));
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = Rotation::IDENTITY;
        let b = Rotation::from_axis_angle(Vector3::Y, FRAC_PI_2);
        assert!(a.slerp(b, 0.0).nearly_equals(a, 1e-6));
        assert!(a.slerp(b, 1.0).nearly_equals(b, 1e-6));
        let mid = a.slerp(b, 0.5);
        assert!(mid.nearly_equals(Rotation::from_axis_angle(Vector3::Y, FRAC_PI_2 * 0.5), 1e-5));
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let a = Rotation::IDENTITY;
        let b = Rotation::from_axis_angle(Vector3::Y, 0.2);
        let neg_b = Rotation::new(-b.x, -b.y, -b.z, -b.w);
        assert!(a.slerp(neg_b, 0.5).nearly_equals(a.slerp(b, 0.5), 1e-6));
    }

    #[test]
    fn test_slerp_nearly_identical_is_linear() {
        let a = Rotation::IDENTITY;
        let b = Rotation::from_axis_angle(Vector3::Z, 1e-4);
        let mid = a.slerp(b, 0.5);
        assert!(!mid.is_nan());
        assert!((mid.z - b.z * 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let r = Rotation::from_euler_angles(0.3, 1.2, -0.4);
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!((r.conjugate() * (r * v)).nearly_equals(v, 1e-5));
        assert!((r * r.inverse()).nearly_equals(Rotation::IDENTITY, 1e-6));
    }

    #[test]
    fn test_corrupt_magnitude_detected() {
        assert!(Rotation::IDENTITY.is_valid());
        assert!(!Rotation::new(1.0, 1.0, 0.0, 0.0).is_valid());
    }
}
