// shadow.rs - Point-light projection onto a horizontal plane

use glam::Vec3;

/// Below this |dy| the light ray is treated as parallel to the plane
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Where the ray from `light` through `vertex` meets `y = plane_y`.
/// Returns None when there is no finite intersection.
#[inline]
pub fn project_to_plane(vertex: Vec3, light: Vec3, plane_y: f32) -> Option<Vec3> {
    let dir = vertex - light;
    if dir.y.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_y - light.y) / dir.y;
    let hit = Vec3::new(light.x + t * dir.x, plane_y, light.z + t * dir.z);
    hit.is_finite().then_some(hit)
}
