//! # Vectors
//!
//! Plain float tuples with componentwise arithmetic. These are the canonical
//! representations used by every spatial attribute and by the binary
//! database format.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// Componentwise operator impls shared by all vector widths.
macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;
            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f32) -> Self {
                debug_assert!(rhs != 0.0, "vector divided by zero");
                let inv = 1.0 / rhs;
                Self { $($field: self.$field * inv),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl MulAssign<f32> for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl DivAssign<f32> for $ty {
            #[inline]
            fn div_assign(&mut self, rhs: f32) {
                *self = *self / rhs;
            }
        }

        impl $ty {
            /// Dot product.
            #[inline]
            #[must_use]
            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            /// Squared magnitude (avoids sqrt).
            #[inline]
            #[must_use]
            pub fn mag_sqr(self) -> f32 {
                self.dot(self)
            }

            /// Magnitude.
            #[inline]
            #[must_use]
            pub fn mag(self) -> f32 {
                self.mag_sqr().sqrt()
            }

            /// Squared distance to another point.
            #[inline]
            #[must_use]
            pub fn dist_sqr(self, other: Self) -> f32 {
                (self - other).mag_sqr()
            }

            /// Distance to another point.
            #[inline]
            #[must_use]
            pub fn dist(self, other: Self) -> f32 {
                (self - other).mag()
            }

            /// Returns the unit-length vector pointing the same way.
            ///
            /// A zero vector trips a debug assertion and yields NaNs in release.
            #[must_use]
            pub fn get_unit(self) -> Self {
                let mag = self.mag();
                debug_assert!(mag > 0.0, "normalizing a zero-length vector");
                self / mag
            }

            /// Normalizes in place.
            pub fn normalize(&mut self) {
                *self = self.get_unit();
            }

            /// Componentwise multiply.
            #[inline]
            #[must_use]
            pub fn mul_components(self, other: Self) -> Self {
                Self { $($field: self.$field * other.$field),+ }
            }

            /// Componentwise minimum.
            #[inline]
            #[must_use]
            pub fn min(self, other: Self) -> Self {
                Self { $($field: self.$field.min(other.$field)),+ }
            }

            /// Componentwise maximum.
            #[inline]
            #[must_use]
            pub fn max(self, other: Self) -> Self {
                Self { $($field: self.$field.max(other.$field)),+ }
            }

            /// Linear interpolation, `t == 0` yields `self`.
            #[inline]
            #[must_use]
            pub fn lerp(self, other: Self, t: f32) -> Self {
                self + (other - self) * t
            }

            /// True if every component is within `epsilon` of `other`.
            #[must_use]
            pub fn nearly_equals(self, other: Self, epsilon: f32) -> bool {
                true $(&& (self.$field - other.$field).abs() <= epsilon)+
            }

            /// True if any component is NaN.
            #[must_use]
            pub fn is_nan(self) -> bool {
                false $(|| self.$field.is_nan())+
            }
        }
    };
}

/// 2D vector.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// Creates a new Vector2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }
}

impl_vector_ops!(Vector2 { x, y });

/// 3D vector - positions, directions, extents.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Creates a new Vector3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all three components set to `v`.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector (right)
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (up)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (forward)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
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

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    #[must_use]
    pub fn get_index(self, axis: usize) -> f32 {
        self[axis]
    }

    /// Sets a component by axis index.
    #[inline]
    pub fn set_index(&mut self, axis: usize, value: f32) {
        match axis {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => debug_assert!(false, "axis index {axis} out of range"),
        }
    }

    /// Componentwise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, axis: usize) -> &f32 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("axis index {axis} out of range"),
        }
    }
}

impl_vector_ops!(Vector3 { x, y, z });

/// 4D vector - homogeneous coordinates, colors.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Vector4 {
    /// Creates a new Vector4
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Drops the w component.
    #[must_use]
    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl_vector_ops!(Vector4 { x, y, z, w });
