// rotation.rs - Hinge rotation about an arbitrary axis through a pivot

use glam::{Quat, Vec3};

/// Rotation for a hinge. `axis` must be unit length (right-hand rule).
#[inline]
pub fn hinge(axis: Vec3, angle: f32) -> Quat {
    Quat::from_axis_angle(axis, angle)
}

/// Translate by -pivot, rotate, translate back
#[inline(always)]
pub fn rotate_about(point: Vec3, pivot: Vec3, rotation: Quat) -> Vec3 {
    pivot + rotation * (point - pivot)
}
