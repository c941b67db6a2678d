//! # LTSDK Math
//!
//! Math primitives and the intersection library shared by the engine core,
//! the game database and tools.
//!
//! ## Error Policy
//!
//! Nothing in this crate returns errors or panics in release builds.
//! Degenerate input (normalizing a zero vector, inverting a singular matrix,
//! corrupt quaternions) trips a `debug_assert!` and produces undefined or NaN
//! results once assertions are compiled out. Use the `is_nan` helpers to check
//! results at trust boundaries.
//!
//! ## Example
//!
//! ```rust
//! use ltsdk_math::{intersect, Obb, Vector3};
//!
//! let obb = Obb::new(Vector3::ZERO, Vector3::splat(1.0), [Vector3::X, Vector3::Y, Vector3::Z]);
//! let t = intersect::obb_segment(&obb, Vector3::new(-5.0, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0));
//! assert!((t.unwrap() - 0.4).abs() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod aabb_utils;
pub mod bounds;
pub mod intersect;
pub mod matrix;
pub mod plane;
pub mod rotation;
pub mod transform;
pub mod vector;

pub use aabb_utils::{get_aabb_corner_point, get_aabb_plane_corner, AabbCorner, AabbPlane, PlaneSide};
pub use bounds::{Aabb, Obb, Rect2f, Rect2i, Rect3f, Sphere};
pub use matrix::Matrix3x4;
pub use plane::Plane;
pub use rotation::{Rotation, ROTATION_MAX_MAG_SQR};
pub use transform::{RigidTransform, Transform};
pub use vector::{Vector2, Vector3, Vector4};
