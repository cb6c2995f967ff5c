// paper.rs - The flat sheet before any fold is applied

use glam::Vec3;
use log::info;

use super::VERTS_PER_CELL;
use crate::error::{ConfigError, Result};

pub struct PaperMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub subdivisions: u32,
    pub scale: f32,
}

impl PaperMesh {
    /// Square of side `scale` centred on the origin at y = 0, split into
    /// `subdivisions` x `subdivisions` cells of two triangles each.
    pub fn build(subdivisions: u32, scale: f32) -> Result<Self> {
        if subdivisions == 0 {
            return Err(ConfigError::InvalidSubdivisions(subdivisions));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::invalid("mesh.scale", format!("must be positive, got {scale}")));
        }

        let n = subdivisions as usize;
        let count = n
            .checked_mul(n)
            .and_then(|c| c.checked_mul(VERTS_PER_CELL))
            .filter(|&c| u32::try_from(c).is_ok())
            .ok_or(ConfigError::InvalidSubdivisions(subdivisions))?;
        let mut positions = Vec::with_capacity(count);

        let coord = |k: usize| (k as f32 / n as f32 - 0.5) * scale;

        for i in 0..n {
            let (x0, x1) = (coord(i), coord(i + 1));
            for j in 0..n {
                let (z0, z1) = (coord(j), coord(j + 1));
                positions.extend_from_slice(&[
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x1, 0.0, z0),
                    Vec3::new(x1, 0.0, z1),
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x1, 0.0, z1),
                    Vec3::new(x0, 0.0, z1),
                ]);
            }
        }

        info!("paper mesh: {} vertices, {scale} x {scale} units", positions.len());

        Ok(Self {
            normals: vec![Vec3::Y; positions.len()],
            positions,
            subdivisions,
            scale,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
