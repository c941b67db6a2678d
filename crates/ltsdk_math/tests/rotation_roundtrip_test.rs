//! # Rotation Conversion Integration Test
//!
//! Matrix -> quaternion -> matrix must reproduce the input for arbitrary
//! orientations, including the near-180-degree rotations that take the
//! largest-diagonal branch.

use ltsdk_math::{Matrix3x4, Rotation, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

const EPSILON: f32 = 1e-4;

fn random_axis(rng: &mut StdRng) -> Vector3 {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
        );
        if v.mag_sqr() > 0.01 && v.mag_sqr() <= 1.0 {
            return v.get_unit();
        }
    }
}

fn assert_roundtrip(rot: Rotation) {
    let matrix = Matrix3x4::from_rotation(rot);
    let back = Matrix3x4::from_rotation(matrix.to_rotation());

    assert!(
        back.nearly_equals(&matrix, EPSILON),
        "roundtrip drifted for {rot:?}: {matrix:?} vs {back:?}"
    );
    assert!((back.determinant() - 1.0).abs() < EPSILON, "handedness flipped for {rot:?}");
    assert!(matrix.to_rotation().nearly_equals(rot, EPSILON));
}

#[test]
fn test_random_rotations_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x17_7EC4);
    for _ in 0..1000 {
        let axis = random_axis(&mut rng);
        let angle = rng.gen_range(-PI..PI);
        assert_roundtrip(Rotation::from_axis_angle(axis, angle));
    }
}

#[test]
fn test_near_half_turns_roundtrip() {
    let mut rng = StdRng::seed_from_u64(180);
    let mut diagonal_branch = 0;
    for _ in 0..1000 {
        let axis = random_axis(&mut rng);
        // trace = 1 + 2cos(angle) < -0.999 once angle is within ~0.03 of pi
        let angle = PI - rng.gen_range(0.0f32..0.02);
        let rot = Rotation::from_axis_angle(axis, angle);
        let basis = rot.to_basis();
        if basis[0][0] + basis[1][1] + basis[2][2] < -0.999 {
            diagonal_branch += 1;
        }
        assert_roundtrip(rot);
    }
    assert!(diagonal_branch > 900, "only {diagonal_branch} samples hit the diagonal branch");
}

#[test]
fn test_cardinal_half_turns() {
    for axis in [Vector3::X, Vector3::Y, Vector3::Z] {
        assert_roundtrip(Rotation::from_axis_angle(axis, PI));
    }
}

#[test]
fn test_from_vectors_is_orthonormal() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let forward = random_axis(&mut rng);
        let up = random_axis(&mut rng);
        let rot = Rotation::from_vectors(forward, up);
        assert!(rot.is_valid());
        assert!(rot.forward().nearly_equals(forward, 1e-3));
        assert!(rot.right().dot(rot.up()).abs() < 1e-3);
    }
}
