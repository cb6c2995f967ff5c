// render.rs - Per-frame output buffers for the host renderer
//
// Every buffer is rebuilt from scratch each tick and exposed as flat f32:
//   mesh      deformed paper, 3 floats per vertex
//   shadow    mesh flattened onto the shadow plane, same vertex order
//   quads     6 vertices per particle, one draw call for the whole pool
//   opacity   1 float per quad vertex
//   sizes     1 float per quad vertex

use glam::{Mat4, Vec3};

use crate::config::SceneConfig;
use crate::sim::{FoldGroups, FoldSequence, Particles};
use crate::world::{project_to_plane, rotate_about};

/// Unit quad corners, two triangles
const QUAD: [(f32, f32); 6] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

pub struct Encoder {
    mesh: Vec<Vec3>,
    shadow: Vec<Vec3>,
    quads: Vec<Vec3>,
    opacity: Vec<f32>,
    sizes: Vec<f32>,
    /// Shadow vertices that fell back to a vertical drop last frame
    degenerate: usize,
}

impl Encoder {
    pub fn new(vertices: usize, particles: usize) -> Self {
        Self {
            mesh: Vec::with_capacity(vertices),
            shadow: Vec::with_capacity(vertices),
            quads: Vec::with_capacity(particles * QUAD.len()),
            opacity: Vec::with_capacity(particles * QUAD.len()),
            sizes: Vec::with_capacity(particles * QUAD.len()),
            degenerate: 0,
        }
    }

    /// Rebuild the deformed mesh from the reference pose. Folds compose in
    /// sequence order on the accumulated positions; membership comes from
    /// `groups`, which was decided on the reference pose.
    pub fn encode_mesh(&mut self, original: &[Vec3], folds: &FoldSequence, groups: &FoldGroups) {
        self.mesh.clear();
        self.mesh.extend_from_slice(original);

        for (fold, members) in folds.iter().zip(groups.iter()) {
            if !fold.in_effect() {
                continue;
            }
            let q = fold.rotation();
            for &i in members {
                let v = &mut self.mesh[i as usize];
                *v = rotate_about(*v, fold.pivot, q);
            }
        }
    }

    /// Project the current mesh away from `light` onto `y = plane_y`
    pub fn encode_shadow(&mut self, light: Vec3, plane_y: f32) {
        self.shadow.clear();
        let mut degenerate = 0;

        for &v in &self.mesh {
            let p = project_to_plane(v, light, plane_y).unwrap_or_else(|| {
                degenerate += 1;
                Vec3::new(v.x, plane_y, v.z)
            });
            self.shadow.push(p);
        }

        if degenerate != self.degenerate && degenerate > 0 {
            log::warn!("shadow: {degenerate} vertices parallel to the plane, dropped vertically");
        }
        self.degenerate = degenerate;
    }

    /// Billboard quads in the XY plane, rotated by each particle's spin
    pub fn encode_particles(&mut self, particles: &Particles) {
        self.quads.clear();
        self.opacity.clear();
        self.sizes.clear();

        for i in 0..particles.len() {
            let center = particles.position(i);
            let size = particles.size[i];
            let alpha = particles.opacity[i];
            let (sin_r, cos_r) = particles.rotation[i].sin_cos();

            for &(qx, qy) in &QUAD {
                let (lx, ly) = (qx * size, qy * size);
                let rx = lx * cos_r - ly * sin_r;
                let ry = lx * sin_r + ly * cos_r;
                self.quads.push(center + Vec3::new(rx, ry, 0.0));
                self.opacity.push(alpha);
                self.sizes.push(size);
            }
        }
    }

    pub fn mesh(&self) -> &[Vec3] {
        &self.mesh
    }

    pub fn shadow(&self) -> &[Vec3] {
        &self.shadow
    }

    pub fn quads(&self) -> &[Vec3] {
        &self.quads
    }

    pub fn opacity(&self) -> &[f32] {
        &self.opacity
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn degenerate_shadow_vertices(&self) -> usize {
        self.degenerate
    }
}

/// Scalars, vectors and matrices the host uploads as shader uniforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub model_view: Mat4,
    /// Inverse-transpose of model_view
    pub normal_matrix: Mat4,
    pub light_world: Vec3,
    /// Light in view space
    pub light_view: Vec3,
    /// Camera sits at the view-space origin
    pub view_position: Vec3,
    pub light_color: Vec3,
    pub light_intensity: f32,
    pub shininess: f32,
    pub ground_color: Vec3,
    pub particle_color: Vec3,
}

impl FrameUniforms {
    /// `time` in seconds drives the turntable
    pub fn compute(config: &SceneConfig, time: f64, aspect: f32) -> Self {
        let cam = &config.camera;
        let projection = Mat4::perspective_rh_gl(cam.fov_y, aspect, cam.near, cam.far);
        let model_view = Mat4::from_translation(cam.offset) * Mat4::from_rotation_y((time * cam.turn_rate as f64) as f32);
        let light_world = config.light.position;

        Self {
            projection,
            model_view,
            normal_matrix: model_view.inverse().transpose(),
            light_world,
            light_view: model_view.transform_point3(light_world),
            view_position: Vec3::ZERO,
            light_color: config.light.color,
            light_intensity: config.light.intensity,
            shininess: config.material.shininess,
            ground_color: config.material.ground_color,
            particle_color: config.material.particle_color,
        }
    }
}

/// Everything the host needs to draw one frame
pub struct Frame<'a> {
    pub mesh: &'a [Vec3],
    pub normals: &'a [Vec3],
    pub ground: &'a [Vec3],
    pub ground_normals: &'a [Vec3],
    pub shadow: &'a [Vec3],
    pub particles: &'a [Vec3],
    pub opacity: &'a [f32],
    pub sizes: &'a [f32],
    pub uniforms: &'a FrameUniforms,
}

/// Flat float view of a vertex buffer
#[inline]
pub fn flat(v: &[Vec3]) -> &[f32] {
    bytemuck::cast_slice(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FoldSpec;
    use crate::world::Region;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f32::consts::FRAC_PI_2;

    fn single_fold(region: Region) -> FoldSequence {
        FoldSequence::new(&[FoldSpec {
            axis: Vec3::Z,
            pivot: Vec3::new(0.5, 0.0, 0.0),
            target_angle: FRAC_PI_2,
            speed: 1.0,
            region,
        }])
        .unwrap()
    }

    #[test]
    fn untouched_when_no_fold_in_effect() {
        let original = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)];
        let folds = single_fold(Region::All);
        let groups = FoldGroups::build(&original, &folds);
        let mut enc = Encoder::new(2, 0);
        enc.encode_mesh(&original, &folds, &groups);
        assert_eq!(enc.mesh(), &original);
    }

    #[test]
    fn flat_view_is_xyz_interleaved() {
        let v = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        assert_eq!(flat(&v), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn shadow_matches_mesh_length() {
        let mut enc = Encoder::new(3, 0);
        enc.mesh = vec![Vec3::ZERO, Vec3::new(0.1, 0.2, 0.0), Vec3::new(0.0, 2.0, 0.0)];
        enc.encode_shadow(Vec3::new(2.0, 2.0, 1.0), -0.49);
        assert_eq!(enc.shadow().len(), 3);
        assert_eq!(enc.degenerate_shadow_vertices(), 1);
        assert!(enc.shadow().iter().all(|p| p.is_finite() && p.y == -0.49));
    }

    #[test]
    fn particle_quads_surround_center() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = crate::config::ParticleConfig { count: 4, ..Default::default() };
        let particles = Particles::new(&params, &mut rng);
        let mut enc = Encoder::new(0, 4);
        enc.encode_particles(&particles);

        assert_eq!(enc.quads().len(), 24);
        assert_eq!(enc.opacity().len(), 24);
        for (i, quad) in enc.quads().chunks(6).enumerate() {
            let c = particles.position(i);
            let half_diag = particles.size[i] * std::f32::consts::SQRT_2;
            for v in quad {
                assert_eq!(v.z, c.z);
                assert!(((*v - c).length() - half_diag).abs() < 1e-5);
            }
            assert!(enc.opacity()[i * 6..i * 6 + 6].iter().all(|&a| a == particles.opacity[i]));
        }
    }

    #[test]
    fn uniforms_follow_turntable() {
        let config = SceneConfig::default();
        let u0 = FrameUniforms::compute(&config, 0.0, 1.5);
        assert_eq!(u0.light_world, Vec3::new(2.0, 2.0, 1.0));
        // no rotation at t = 0: light only shifts by the model offset
        assert!((u0.light_view - Vec3::new(2.0, 1.9, 0.2)).length() < 1e-5);
        assert_eq!(u0.shininess, 32.0);

        let u1 = FrameUniforms::compute(&config, 5.0, 1.5);
        assert_ne!(u0.model_view, u1.model_view);
        assert_eq!(u0.projection, u1.projection);
    }
}
