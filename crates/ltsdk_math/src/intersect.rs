//! # Intersection Library
//!
//! Boolean "intersects or touches" tests between points, segments, spheres,
//! boxes, planes and convex hulls. Touching at a single point counts as an
//! intersection everywhere.
//!
//! Segment queries are parameterized as `start + t * (end - start)` and
//! report collision times in that parameter.

use crate::aabb_utils::{AabbPlane, PlaneSide};
use crate::bounds::{Aabb, Obb, Sphere};
use crate::plane::Plane;
use crate::vector::Vector3;

/// Below this the segment/segment solver treats the segments as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// Length squared below which a segment is treated as a point.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Closest points between two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentClosest {
    /// Parameter along the first segment.
    pub s: f32,
    /// Parameter along the second segment.
    pub t: f32,
    /// Closest point on the first segment.
    pub point_a: Vector3,
    /// Closest point on the second segment.
    pub point_b: Vector3,
    /// Squared distance between the two points.
    pub dist_sqr: f32,
}

/// Projection parameter of `pt` onto the line through `start` and `end`.
fn line_param(pt: Vector3, start: Vector3, end: Vector3) -> f32 {
    let dir = end - start;
    let len_sqr = dir.mag_sqr();
    if len_sqr <= DEGENERATE_EPSILON {
        return 0.0;
    }
    (pt - start).dot(dir) / len_sqr
}

/// Squared distance from `pt` to the segment, and the clamped parameter of
/// the closest point.
#[must_use]
pub fn point_segment_dist_sqr(pt: Vector3, start: Vector3, end: Vector3) -> (f32, f32) {
    let t = line_param(pt, start, end).clamp(0.0, 1.0);
    (pt.dist_sqr(start.lerp(end, t)), t)
}

/// Squared distance from `pt` to the infinite line, and the unclamped
/// parameter of the closest point.
#[must_use]
pub fn point_line_dist_sqr(pt: Vector3, start: Vector3, end: Vector3) -> (f32, f32) {
    let t = line_param(pt, start, end);
    (pt.dist_sqr(start.lerp(end, t)), t)
}

/// Closest points between segments `a0-a1` and `b0-b1`.
#[must_use]
pub fn segment_segment_closest(a0: Vector3, a1: Vector3, b0: Vector3, b1: Vector3) -> SegmentClosest {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;
    let a = d1.mag_sqr();
    let e = d2.mag_sqr();
    let f = d2.dot(r);

    let (s, t) = if a <= DEGENERATE_EPSILON && e <= DEGENERATE_EPSILON {
        (0.0, 0.0)
    } else if a <= DEGENERATE_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= DEGENERATE_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom < PARALLEL_EPSILON {
                0.0
            } else {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let point_a = a0 + d1 * s;
    let point_b = b0 + d2 * t;
    SegmentClosest {
        s,
        t,
        point_a,
        point_b,
        dist_sqr: point_a.dist_sqr(point_b),
    }
}

/// True if the point is inside or on the sphere.
#[must_use]
pub fn point_in_sphere(pt: Vector3, sphere: &Sphere) -> bool {
    pt.dist_sqr(sphere.center) <= sphere.radius * sphere.radius
}

/// True if the point is inside or on the box.
#[must_use]
pub fn point_in_aabb(pt: Vector3, aabb: &Aabb) -> bool {
    aabb.contains_point(pt)
}

/// True if the point is inside or on the oriented box.
#[must_use]
pub fn point_in_obb(pt: Vector3, obb: &Obb) -> bool {
    let local = obb.to_local(pt).abs();
    local.x <= obb.half_dims.x && local.y <= obb.half_dims.y && local.z <= obb.half_dims.z
}

/// True if the spheres overlap or touch.
#[must_use]
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let radii = a.radius + b.radius;
    a.center.dist_sqr(b.center) <= radii * radii
}

/// True if the segment passes through or touches the sphere.
#[must_use]
pub fn sphere_segment(sphere: &Sphere, start: Vector3, end: Vector3) -> bool {
    let (dist_sqr, _) = point_segment_dist_sqr(sphere.center, start, end);
    dist_sqr <= sphere.radius * sphere.radius
}

/// First time the segment enters the sphere, `Some(0.0)` if it starts inside.
#[must_use]
pub fn segment_sphere_time(sphere: &Sphere, start: Vector3, end: Vector3) -> Option<f32> {
    let dir = end - start;
    let m = start - sphere.center;
    let c = m.mag_sqr() - sphere.radius * sphere.radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = dir.mag_sqr();
    if a <= DEGENERATE_EPSILON {
        return None;
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (t <= 1.0).then_some(t)
}

/// Sweeps a sphere of `radius` from `start` to `end` against a static sphere.
///
/// Returns the contact time, backed off from the closest approach by the
/// penetration depth. A sweep that starts overlapping reports a negative
/// time.
#[must_use]
pub fn swept_sphere_sphere(start: Vector3, end: Vector3, radius: f32, other: &Sphere) -> Option<f32> {
    let (dist_sqr, t) = point_segment_dist_sqr(other.center, start, end);
    let radii = radius + other.radius;
    let radii_sqr = radii * radii;
    if dist_sqr > radii_sqr {
        return None;
    }

    let len = (end - start).mag();
    if len <= 0.0 {
        return Some(0.0);
    }
    Some(t - (radii_sqr - dist_sqr).sqrt() / len)
}

/// Slab test of the segment against box extents `min`..`max`.
fn slab_segment(min: Vector3, max: Vector3, start: Vector3, end: Vector3) -> Option<f32> {
    let dir = end - start;
    let mut time_start = 0.0f32;
    let mut time_end = 1.0f32;

    for axis in 0..3 {
        let s = start[axis];
        let d = dir[axis];
        if d == 0.0 {
            if s < min[axis] || s > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - s) * inv;
        let mut t1 = (max[axis] - s) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        time_start = time_start.max(t0);
        time_end = time_end.min(t1);
        if time_start > time_end {
            return None;
        }
    }

    Some(time_start)
}

/// Segment against an axis-aligned box. Returns the entry time, `0.0` when
/// the segment starts inside.
#[must_use]
pub fn aabb_segment(aabb: &Aabb, start: Vector3, end: Vector3) -> Option<f32> {
    slab_segment(aabb.min, aabb.max, start, end)
}

/// Segment against an oriented box. Returns the entry time, `0.0` when the
/// segment starts inside.
#[must_use]
pub fn obb_segment(obb: &Obb, start: Vector3, end: Vector3) -> Option<f32> {
    slab_segment(-obb.half_dims, obb.half_dims, obb.to_local(start), obb.to_local(end))
}

/// Squared distance from `center` to box extents, abandoning the sum once it
/// passes `radius_sqr`.
fn box_sphere(min: Vector3, max: Vector3, center: Vector3, radius_sqr: f32) -> bool {
    let mut dist_sqr = 0.0;
    for axis in 0..3 {
        let c = center[axis];
        let e = if c < min[axis] {
            c - min[axis]
        } else if c > max[axis] {
            c - max[axis]
        } else {
            continue;
        };
        dist_sqr += e * e;
        if dist_sqr > radius_sqr {
            return false;
        }
    }
    true
}

/// True if the sphere overlaps or touches the box.
#[must_use]
pub fn aabb_sphere(aabb: &Aabb, sphere: &Sphere) -> bool {
    box_sphere(aabb.min, aabb.max, sphere.center, sphere.radius * sphere.radius)
}

/// True if the sphere overlaps or touches the oriented box.
#[must_use]
pub fn obb_sphere(obb: &Obb, sphere: &Sphere) -> bool {
    box_sphere(
        -obb.half_dims,
        obb.half_dims,
        obb.to_local(sphere.center),
        sphere.radius * sphere.radius,
    )
}

/// True if the boxes overlap or touch.
#[must_use]
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Separating-axis test between two oriented boxes.
#[must_use]
pub fn obb_obb(a: &Obb, b: &Obb) -> bool {
    const EPSILON: f32 = 1e-6;

    let ea = a.half_dims.to_array();
    let eb = b.half_dims.to_array();

    // b's axes expressed in a's frame
    let mut r = [[0.0f32; 3]; 3];
    let mut abs_r = [[0.0f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = a.axes[i].dot(b.axes[j]);
            abs_r[i][j] = r[i][j].abs() + EPSILON;
        }
    }

    let d = b.center - a.center;
    let t = [d.dot(a.axes[0]), d.dot(a.axes[1]), d.dot(a.axes[2])];

    for i in 0..3 {
        let ra = ea[i];
        let rb = eb[0] * abs_r[i][0] + eb[1] * abs_r[i][1] + eb[2] * abs_r[i][2];
        if t[i].abs() > ra + rb {
            return false;
        }
    }

    for j in 0..3 {
        let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
        let rb = eb[j];
        let proj = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
        if proj.abs() > ra + rb {
            return false;
        }
    }

    for i in 0..3 {
        let i1 = (i + 1) % 3;
        let i2 = (i + 2) % 3;
        for j in 0..3 {
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;
            let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
            let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
            let proj = t[i2] * r[i1][j] - t[i1] * r[i2][j];
            if proj.abs() > ra + rb {
                return false;
            }
        }
    }

    true
}

/// Classifies a sphere against a plane.
#[must_use]
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> PlaneSide {
    let dist = plane.dist_to(sphere.center);
    if dist > sphere.radius {
        PlaneSide::Front
    } else if dist < -sphere.radius {
        PlaneSide::Back
    } else {
        PlaneSide::Intersect
    }
}

/// Classifies a box against a plane using its plane corners.
#[must_use]
pub fn aabb_plane(aabb: &Aabb, plane: &Plane) -> PlaneSide {
    AabbPlane::new(*plane).classify_aabb(aabb)
}

/// Time at which the segment crosses or touches the plane.
#[must_use]
pub fn segment_plane(plane: &Plane, start: Vector3, end: Vector3) -> Option<f32> {
    let d0 = plane.dist_to(start);
    let d1 = plane.dist_to(end);
    if (d0 > 0.0 && d1 > 0.0) || (d0 < 0.0 && d1 < 0.0) {
        return None;
    }
    if d0 == d1 {
        // Lies in the plane.
        return Some(0.0);
    }
    Some(d0 / (d0 - d1))
}

/// True if the point is inside or on a convex hull given by outward-facing
/// planes.
#[must_use]
pub fn point_in_convex_hull(planes: &[Plane], pt: Vector3) -> bool {
    planes.iter().all(|plane| plane.dist_to(pt) <= 0.0)
}

/// Clips the segment against a convex hull of outward-facing planes.
/// Returns the entry time, `0.0` when the segment starts inside.
#[must_use]
pub fn segment_convex_hull(planes: &[Plane], start: Vector3, end: Vector3) -> Option<f32> {
    let mut time_start = 0.0f32;
    let mut time_end = 1.0f32;

    for plane in planes {
        let d0 = plane.dist_to(start);
        let d1 = plane.dist_to(end);
        if d0 > 0.0 && d1 > 0.0 {
            return None;
        }
        if d0 <= 0.0 && d1 <= 0.0 {
            continue;
        }

        let t = d0 / (d0 - d1);
        if d0 > 0.0 {
            time_start = time_start.max(t);
        } else {
            time_end = time_end.min(t);
        }
        if time_start > time_end {
            return None;
        }
    }

    Some(time_start)
}

/// Closest point on or in the box.
#[must_use]
pub fn closest_point_on_aabb(aabb: &Aabb, pt: Vector3) -> Vector3 {
    pt.max(aabb.min).min(aabb.max)
}

/// Closest point on or in the oriented box.
#[must_use]
pub fn closest_point_on_obb(obb: &Obb, pt: Vector3) -> Vector3 {
    let local = obb.to_local(pt).max(-obb.half_dims).min(obb.half_dims);
    obb.to_world(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rotation;

    fn unit_obb() -> Obb {
        Obb::new(Vector3::ZERO, Vector3::splat(1.0), [Vector3::X, Vector3::Y, Vector3::Z])
    }

    #[test]
    fn test_point_segment_clamps() {
        let (d, t) = point_segment_dist_sqr(Vector3::new(-2.0, 1.0, 0.0), Vector3::ZERO, Vector3::X);
        assert_eq!(t, 0.0);
        assert_eq!(d, 5.0);

        let (d, t) = point_line_dist_sqr(Vector3::new(-2.0, 1.0, 0.0), Vector3::ZERO, Vector3::X);
        assert_eq!(t, -2.0);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_segment_segment_crossing() {
        let c = segment_segment_closest(
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        );
        assert!((c.s - 0.5).abs() < 1e-6);
        assert!((c.t - 0.5).abs() < 1e-6);
        assert!((c.dist_sqr - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_segment_parallel_forces_zero() {
        let c = segment_segment_closest(
            Vector3::ZERO,
            Vector3::X,
            Vector3::new(-0.5, 1.0, 0.0),
            Vector3::new(0.5, 1.0, 0.0),
        );
        assert_eq!(c.s, 0.0);
        assert_eq!(c.t, 0.5);
        assert!((c.dist_sqr - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_sphere_symmetric_and_closed() {
        let a = Sphere::new(Vector3::ZERO, 1.0);
        let b = Sphere::new(Vector3::new(2.0, 0.0, 0.0), 1.0);
        assert!(sphere_sphere(&a, &b));
        assert_eq!(sphere_sphere(&a, &b), sphere_sphere(&b, &a));
        let c = Sphere::new(Vector3::new(2.5, 0.0, 0.0), 1.0);
        assert!(!sphere_sphere(&a, &c));
    }

    #[test]
    fn test_swept_sphere_contact_time() {
        let target = Sphere::new(Vector3::new(5.0, 0.0, 0.0), 1.0);
        let t = swept_sphere_sphere(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0), 1.0, &target).unwrap();
        // Contact when centers are 2 apart: x == 3.
        assert!((t - 0.3).abs() < 1e-6);
        assert!(swept_sphere_sphere(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0), 1.0, &Sphere::new(Vector3::new(5.0, 3.0, 0.0), 1.0)).is_none());
    }

    #[test]
    fn test_swept_sphere_starting_overlap_is_negative() {
        let target = Sphere::new(Vector3::new(-0.5, 0.0, 0.0), 1.0);
        let t = swept_sphere_sphere(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0), 1.0, &target).unwrap();
        assert!(t < 0.0);
    }

    #[test]
    fn test_aabb_segment_inside_is_zero() {
        let aabb = Aabb::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        assert_eq!(aabb_segment(&aabb, Vector3::splat(-0.5), Vector3::splat(0.5)), Some(0.0));
    }

    #[test]
    fn test_aabb_segment_miss_and_parallel() {
        let aabb = Aabb::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        assert_eq!(aabb_segment(&aabb, Vector3::new(-5.0, 2.0, 0.0), Vector3::new(5.0, 2.0, 0.0)), None);
        assert_eq!(aabb_segment(&aabb, Vector3::new(-5.0, 0.0, 0.0), Vector3::new(-3.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_obb_segment_scenario() {
        let t = obb_segment(&unit_obb(), Vector3::new(-5.0, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_obb_segment_rotated() {
        let obb = Obb::from_rotation(Vector3::ZERO, Vector3::new(2.0, 1.0, 1.0), Rotation::from_axis_angle(Vector3::Y, std::f32::consts::FRAC_PI_2));
        // Long axis now runs along world Z.
        let t = obb_segment(&obb, Vector3::new(0.0, 0.0, -10.0), Vector3::new(0.0, 0.0, 10.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_box_sphere() {
        let aabb = Aabb::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        assert!(aabb_sphere(&aabb, &Sphere::new(Vector3::new(2.0, 0.0, 0.0), 1.0)));
        assert!(!aabb_sphere(&aabb, &Sphere::new(Vector3::new(2.0, 2.0, 0.0), 1.0)));
        assert!(obb_sphere(&unit_obb(), &Sphere::new(Vector3::new(0.0, 0.0, 1.5), 0.5)));
    }

    #[test]
    fn test_obb_obb() {
        let a = unit_obb();
        let rotated = Obb::from_rotation(Vector3::new(2.3, 0.0, 0.0), Vector3::splat(1.0), Rotation::from_axis_angle(Vector3::Z, std::f32::consts::FRAC_PI_4));
        // Rotated corner reaches x = 2.3 - sqrt(2) < 1.
        assert!(obb_obb(&a, &rotated));
        let far = Obb::from_rotation(Vector3::new(2.5, 0.0, 0.0), Vector3::splat(1.0), Rotation::from_axis_angle(Vector3::Z, std::f32::consts::FRAC_PI_4));
        assert!(!obb_obb(&a, &far));
    }

    #[test]
    fn test_convex_hull() {
        // Unit cube as outward-facing planes.
        let planes = [
            Plane::new(Vector3::X, 1.0),
            Plane::new(-Vector3::X, 1.0),
            Plane::new(Vector3::Y, 1.0),
            Plane::new(-Vector3::Y, 1.0),
            Plane::new(Vector3::Z, 1.0),
            Plane::new(-Vector3::Z, 1.0),
        ];
        assert!(point_in_convex_hull(&planes, Vector3::splat(0.5)));
        assert!(!point_in_convex_hull(&planes, Vector3::new(0.0, 2.0, 0.0)));
        let t = segment_convex_hull(&planes, Vector3::new(-5.0, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-6);
        assert!(segment_convex_hull(&planes, Vector3::new(-5.0, 3.0, 0.0), Vector3::new(5.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn test_segment_plane_and_sphere_plane() {
        let plane = Plane::new(Vector3::Y, 1.0);
        assert_eq!(segment_plane(&plane, Vector3::ZERO, Vector3::new(0.0, 4.0, 0.0)), Some(0.25));
        assert_eq!(segment_plane(&plane, Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 3.0, 0.0)), None);
        assert_eq!(sphere_plane(&Sphere::new(Vector3::new(0.0, 2.0, 0.0), 1.0), &plane), PlaneSide::Intersect);
        assert_eq!(sphere_plane(&Sphere::new(Vector3::new(0.0, 5.0, 0.0), 1.0), &plane), PlaneSide::Front);
    }

    #[test]
    fn test_segment_sphere_time() {
        let sphere = Sphere::new(Vector3::new(5.0, 0.0, 0.0), 1.0);
        let t = segment_sphere_time(&sphere, Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-6);
        assert_eq!(segment_sphere_time(&sphere, Vector3::new(5.0, 0.0, 0.0), Vector3::ZERO), Some(0.0));
    }

    #[test]
    fn test_closest_points_on_boxes() {
        let aabb = Aabb::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        assert_eq!(closest_point_on_aabb(&aabb, Vector3::new(3.0, 0.5, -4.0)), Vector3::new(1.0, 0.5, -1.0));
        let p = closest_point_on_obb(&unit_obb(), Vector3::new(0.0, 5.0, 0.0));
        assert!(p.nearly_equals(Vector3::Y, 1e-6));
    }
}
