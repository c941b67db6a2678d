//! # AABB Plane Corners
//!
//! Picks the box corner that lies furthest into a plane's positive
//! half-space from the sign bits of the plane normal alone. Culling tests
//! only need that corner and its opposite, never all eight.
//!
//! Corner indices are a bit field that other code depends on:
//!
//! ```text
//! bit 0 (+1): normal.x >= 0 -> right  (max x), else left   (min x)
//! bit 1 (+2): normal.y <  0 -> bottom (min y), else top    (max y)
//! bit 2 (+4): normal.z >= 0 -> far    (max z), else near   (min z)
//! ```

use crate::bounds::Aabb;
use crate::plane::Plane;
use crate::vector::Vector3;

/// One of the eight box corners, indexed per the module-level bit layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AabbCorner {
    /// min x, max y, min z
    NearTopLeft = 0,
    /// max x, max y, min z
    NearTopRight = 1,
    /// min x, min y, min z
    NearBottomLeft = 2,
    /// max x, min y, min z
    NearBottomRight = 3,
    /// min x, max y, max z
    FarTopLeft = 4,
    /// max x, max y, max z
    FarTopRight = 5,
    /// min x, min y, max z
    FarBottomLeft = 6,
    /// max x, min y, max z
    FarBottomRight = 7,
    /// No corner.
    None = 8,
}

impl AabbCorner {
    const TABLE: [Self; 8] = [
        Self::NearTopLeft,
        Self::NearTopRight,
        Self::NearBottomLeft,
        Self::NearBottomRight,
        Self::FarTopLeft,
        Self::FarTopRight,
        Self::FarBottomLeft,
        Self::FarBottomRight,
    ];

    /// Converts from a corner index, `None` for anything above 7.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::TABLE.get(index).copied().unwrap_or(Self::None)
    }

    /// The corner index (8 for [`AabbCorner::None`]).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The diagonally opposite corner.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::None => Self::None,
            corner => Self::from_index(corner.index() ^ 7),
        }
    }
}

/// Which side of a plane a volume lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    /// Entirely in the positive half-space.
    Front,
    /// Entirely in the negative half-space.
    Back,
    /// Straddling or touching the plane.
    Intersect,
}

/// The corner of any box that is furthest along `normal`.
#[inline]
#[must_use]
pub fn get_aabb_plane_corner(normal: Vector3) -> AabbCorner {
    let mut index = 0;
    if normal.x >= 0.0 {
        index += 1;
    }
    if normal.y < 0.0 {
        index += 2;
    }
    if normal.z >= 0.0 {
        index += 4;
    }
    AabbCorner::from_index(index)
}

/// World position of a corner of the box.
#[must_use]
pub fn get_aabb_corner_point(aabb: &Aabb, corner: AabbCorner) -> Vector3 {
    debug_assert!(corner != AabbCorner::None, "no point for AabbCorner::None");
    let index = corner.index();
    Vector3::new(
        if index & 1 != 0 { aabb.max.x } else { aabb.min.x },
        if index & 2 != 0 { aabb.min.y } else { aabb.max.y },
        if index & 4 != 0 { aabb.max.z } else { aabb.min.z },
    )
}

/// A plane with its box corners resolved once, for testing many boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbPlane {
    /// The plane.
    pub plane: Plane,
    /// Corner furthest into the positive half-space.
    pub front_corner: AabbCorner,
    /// Corner furthest into the negative half-space.
    pub back_corner: AabbCorner,
}

impl AabbPlane {
    /// Resolves the corners for `plane`.
    #[must_use]
    pub fn new(plane: Plane) -> Self {
        let front_corner = get_aabb_plane_corner(plane.normal);
        Self {
            plane,
            front_corner,
            back_corner: front_corner.opposite(),
        }
    }

    /// Classifies a box against the plane. Touching counts as intersecting.
    #[must_use]
    pub fn classify_aabb(&self, aabb: &Aabb) -> PlaneSide {
        if self.plane.dist_to(get_aabb_corner_point(aabb, self.front_corner)) < 0.0 {
            return PlaneSide::Back;
        }
        if self.plane.dist_to(get_aabb_corner_point(aabb, self.back_corner)) > 0.0 {
            return PlaneSide::Front;
        }
        PlaneSide::Intersect
    }
}
