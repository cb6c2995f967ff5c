// ground.rs - Shadow receiver

use glam::Vec3;

pub struct GroundPlane {
    pub positions: [Vec3; 6],
    pub normals: [Vec3; 6],
}

impl GroundPlane {
    pub fn build(height: f32, half_extent: f32) -> Self {
        let (y, e) = (height, half_extent);
        Self {
            positions: [
                Vec3::new(-e, y, -e),
                Vec3::new(e, y, -e),
                Vec3::new(e, y, e),
                Vec3::new(-e, y, -e),
                Vec3::new(e, y, e),
                Vec3::new(-e, y, e),
            ],
            normals: [Vec3::Y; 6],
        }
    }
}
