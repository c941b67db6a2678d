//! # Bounding Volumes
//!
//! Spheres, oriented boxes, axis-aligned boxes and integer/float rectangles.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;
use crate::transform::Transform;
use crate::vector::{Vector2, Vector3};

/// Bounding sphere. Radius is non-negative.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Sphere {
    /// Center point.
    pub center: Vector3,
    /// Radius.
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere.
    #[must_use]
    pub fn new(center: Vector3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative sphere radius {radius}");
        Self { center, radius }
    }
}

/// Oriented bounding box. The axes are assumed orthonormal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Obb {
    /// Center point.
    pub center: Vector3,
    /// Half extents along each axis.
    pub half_dims: Vector3,
    /// Right, up and forward axes.
    pub axes: [Vector3; 3],
}

impl Obb {
    /// Creates a box from its center, half extents and axes.
    #[must_use]
    pub const fn new(center: Vector3, half_dims: Vector3, axes: [Vector3; 3]) -> Self {
        Self { center, half_dims, axes }
    }

    /// Box with the given orientation.
    #[must_use]
    pub fn from_rotation(center: Vector3, half_dims: Vector3, rot: Rotation) -> Self {
        Self::new(center, half_dims, [rot.right(), rot.up(), rot.forward()])
    }

    /// The same volume as an axis-aligned box.
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.half_dims(), [Vector3::X, Vector3::Y, Vector3::Z])
    }

    /// Transforms the box. Scale applies to the extents.
    #[must_use]
    pub fn transformed(&self, t: &Transform) -> Self {
        Self::new(
            t.transform_point(self.center),
            self.half_dims * t.scale,
            [t.rot * self.axes[0], t.rot * self.axes[1], t.rot * self.axes[2]],
        )
    }

    /// Expresses a world-space point in box coordinates (center at origin).
    #[must_use]
    pub fn to_local(&self, p: Vector3) -> Vector3 {
        let d = p - self.center;
        Vector3::new(d.dot(self.axes[0]), d.dot(self.axes[1]), d.dot(self.axes[2]))
    }

    /// Maps a box-local point back into world space.
    #[must_use]
    pub fn to_world(&self, local: Vector3) -> Vector3 {
        self.center + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
    }
}

/// Axis-aligned bounding box, also used as a float rectangle in 3D.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vector3,
    /// Maximum corner.
    pub max: Vector3,
}

/// Float rectangle in 3D; the same type as [`Aabb`].
pub type Rect3f = Aabb;

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from a center and half extents.
    #[must_use]
    pub fn from_center_extents(center: Vector3, half_dims: Vector3) -> Self {
        Self::new(center - half_dims, center + half_dims)
    }

    /// A degenerate box containing a single point.
    #[must_use]
    pub const fn from_point(p: Vector3) -> Self {
        Self::new(p, p)
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the AABB.
    #[must_use]
    pub fn half_dims(&self) -> Vector3 {
        (self.max - self.min) * 0.5
    }

    /// Full extents.
    #[must_use]
    pub fn dims(&self) -> Vector3 {
        self.max - self.min
    }

    /// Grows the box to include `p`.
    pub fn merge_point(&mut self, p: Vector3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grows the box to include `other`.
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grows every face outwards by `amount`.
    #[must_use]
    pub fn expanded(&self, amount: f32) -> Self {
        let grow = Vector3::splat(amount);
        Self::new(self.min - grow, self.max + grow)
    }

    /// True if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: Vector3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// True if the boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// True if min <= max on every axis.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

/// Integer rectangle, e.g. a screen-space region. `right`/`bottom` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect2i {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect2i {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Width.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True if the point lies inside.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Overlapping region, or `None` if the rectangles are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let r = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (r.left < r.right && r.top < r.bottom).then_some(r)
    }
}

/// Float rectangle in 2D.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rect2f {
    /// Minimum corner.
    pub min: Vector2,
    /// Maximum corner.
    pub max: Vector2,
}

impl Rect2f {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// True if the point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x <= self.max.x && p.y <= self.max.y
    }
}
