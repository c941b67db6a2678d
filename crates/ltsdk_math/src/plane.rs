//! Planes in `normal . p = dist` form.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::vector::Vector3;

/// A plane: every point `p` with `normal.dot(p) == dist`.
///
/// The positive half-space is the side the normal points into.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3,
    /// Distance from the origin along the normal.
    pub dist: f32,
}

impl Plane {
    /// Creates a plane from a normal and distance.
    #[must_use]
    pub const fn new(normal: Vector3, dist: f32) -> Self {
        Self { normal, dist }
    }

    /// Plane through `point` with the given unit normal.
    #[must_use]
    pub fn from_point(normal: Vector3, point: Vector3) -> Self {
        Self::new(normal, normal.dot(point))
    }

    /// Plane through three points, normal following `(b - a) x (c - a)`.
    #[must_use]
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Self {
        let normal = (b - a).cross(c - a).get_unit();
        Self::from_point(normal, a)
    }

    /// Signed distance from the plane; positive in front.
    #[inline]
    #[must_use]
    pub fn dist_to(&self, p: Vector3) -> f32 {
        self.normal.dot(p) - self.dist
    }

    /// The same plane facing the other way.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self::new(-self.normal, -self.dist)
    }

    /// Projects a point onto the plane.
    #[must_use]
    pub fn project(&self, p: Vector3) -> Vector3 {
        p - self.normal * self.dist_to(p)
    }

    /// Parametric time at which the line `start + t * (end - start)` crosses
    /// the plane, or `None` if the line is parallel to it.
    #[must_use]
    pub fn ray_intersect(&self, start: Vector3, end: Vector3) -> Option<f32> {
        let d0 = self.dist_to(start);
        let d1 = self.dist_to(end);
        let denom = d0 - d1;
        if denom == 0.0 {
            return None;
        }
        Some(d0 / denom)
    }
}
