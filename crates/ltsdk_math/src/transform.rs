//! Rigid (position + rotation) and scaled (position + rotation + uniform
//! scale) transforms.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::matrix::Matrix3x4;
use crate::rotation::Rotation;
use crate::vector::Vector3;

/// Position + rotation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Position
    pub pos: Vector3,
    /// Rotation
    pub rot: Rotation,
}

impl RigidTransform {
    /// Identity transform
    pub const IDENTITY: Self = Self::new(Vector3::ZERO, Rotation::IDENTITY);

    /// Creates a new rigid transform
    #[must_use]
    pub const fn new(pos: Vector3, rot: Rotation) -> Self {
        Self { pos, rot }
    }

    /// Inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rot = self.rot.conjugate();
        Self::new(-(rot * self.pos), rot)
    }

    /// Transform that maps `self` onto `other`: `self * diff == other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.inverse() * *other
    }

    /// Transforms a point.
    #[must_use]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.pos + self.rot * p
    }

    /// Transforms a direction.
    #[must_use]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.rot * v
    }

    /// Converts to an affine matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3x4 {
        Matrix3x4::from_transform(self.pos, self.rot, 1.0)
    }

    /// Compares position and orientation within `epsilon`.
    #[must_use]
    pub fn nearly_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.pos.nearly_equals(other.pos, epsilon) && self.rot.nearly_equals(other.rot, epsilon)
    }
}

impl Mul for RigidTransform {
    type Output = Self;

    /// `a * b` applies `b` in the space of `a`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.pos + self.rot * rhs.pos, self.rot * rhs.rot)
    }
}

/// Position + rotation + uniform scale.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    /// Position
    pub pos: Vector3,
    /// Rotation
    pub rot: Rotation,
    /// Scale (uniform)
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self::new(Vector3::ZERO, Rotation::IDENTITY, 1.0);

    /// Creates a new transform
    #[must_use]
    pub const fn new(pos: Vector3, rot: Rotation, scale: f32) -> Self {
        Self { pos, rot, scale }
    }

    /// Inverse transform. Zero scale trips a debug assertion.
    #[must_use]
    pub fn inverse(&self) -> Self {
        debug_assert!(self.scale != 0.0, "inverting a zero-scale transform");
        let inv_scale = 1.0 / self.scale;
        let rot = self.rot.conjugate();
        Self::new(-(rot * self.pos) * inv_scale, rot, inv_scale)
    }

    /// Transform that maps `self` onto `other`: `self * diff == other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.inverse() * *other
    }

    /// Transforms a point.
    #[must_use]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.pos + self.rot * (p * self.scale)
    }

    /// Transforms a direction (scale applied, translation ignored).
    #[must_use]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.rot * (v * self.scale)
    }

    /// Converts to an affine matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3x4 {
        Matrix3x4::from_transform(self.pos, self.rot, self.scale)
    }

    /// Drops the scale.
    #[must_use]
    pub fn to_rigid(&self) -> RigidTransform {
        RigidTransform::new(self.pos, self.rot)
    }

    /// Compares all components within `epsilon`.
    #[must_use]
    pub fn nearly_equals(&self, other: &Self, epsilon: f32) -> bool {
        self.pos.nearly_equals(other.pos, epsilon)
            && self.rot.nearly_equals(other.rot, epsilon)
            && (self.scale - other.scale).abs() <= epsilon
    }
}

impl From<RigidTransform> for Transform {
    fn from(t: RigidTransform) -> Self {
        Self::new(t.pos, t.rot, 1.0)
    }
}

impl Mul for Transform {
    type Output = Self;

    /// `a * b` applies `b` in the space of `a`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.pos + self.rot * (rhs.pos * self.scale),
            self.rot * rhs.rot,
            self.scale * rhs.scale,
        )
    }
}
