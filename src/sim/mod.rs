// sim/ - Origami simulation
//
// One Simulation owns all mutable state and is advanced once per frame:
//   clock -> fold animator -> mesh deform -> shadow -> particles
// Nothing here blocks and nothing is shared across threads.

mod animator;
mod clock;
mod fold;
mod particle;

pub use animator::{FoldAnimator, FoldEvent, FoldPhase};
pub use clock::AnimationClock;
pub use fold::{Fold, FoldGroups, FoldSequence};
pub use particle::Particles;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SceneConfig;
use crate::error::Result;
use crate::render::{Encoder, Frame, FrameUniforms};
use crate::scene::{GroundPlane, PaperMesh};

pub struct Simulation {
    config: SceneConfig,
    clock: AnimationClock,
    animator: FoldAnimator,

    // Reference geometry, never modified after construction
    paper: PaperMesh,
    groups: FoldGroups,
    ground: GroundPlane,

    particles: Particles,

    // Output
    encoder: Encoder,
    uniforms: FrameUniforms,
    aspect: f32,

    rng: StdRng,
}

impl Simulation {
    /// Validate the scene and build everything. A Simulation that exists
    /// has well-formed folds and geometry.
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;

        let folds = FoldSequence::new(&config.folds)?;
        let paper = PaperMesh::build(config.mesh.subdivisions, config.mesh.scale)?;
        let groups = FoldGroups::build(&paper.positions, &folds);
        let ground = GroundPlane::build(config.ground.height, config.ground.half_extent);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let particles = Particles::new(&config.particles, &mut rng);
        info!("particle pool: {} particles", particles.len());
        info!("fold sequence: {} folds", folds.len());

        let aspect = 1.0;
        let mut sim = Self {
            animator: FoldAnimator::new(folds, &config.folding),
            clock: AnimationClock::new(),
            encoder: Encoder::new(paper.vertex_count(), particles.len()),
            uniforms: FrameUniforms::compute(&config, 0.0, aspect),
            paper,
            groups,
            ground,
            particles,
            aspect,
            rng,
            config,
        };
        sim.encode();
        Ok(sim)
    }

    /// Begin (or restart) the fold sequence
    pub fn start_folding(&mut self) {
        self.animator.start();
    }

    /// Host frame callback with a timestamp in milliseconds
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<FoldEvent> {
        let dt = self.clock.advance_to(timestamp_ms);
        self.advance(dt)
    }

    /// Advance by a synthetic `dt` in seconds
    pub fn step(&mut self, dt: f64) -> Option<FoldEvent> {
        let dt = self.clock.advance_by(dt);
        self.advance(dt)
    }

    fn advance(&mut self, dt: f32) -> Option<FoldEvent> {
        let event = self.animator.update(self.clock.now(), dt);
        self.particles.update(dt, &mut self.rng);
        self.encode();
        event
    }

    /// Rebuild every output buffer from current state
    fn encode(&mut self) {
        self.encoder.encode_mesh(&self.paper.positions, self.animator.folds(), &self.groups);
        self.encoder.encode_shadow(self.config.light.position, self.config.shadow.plane_y);
        self.encoder.encode_particles(&self.particles);
        self.uniforms = FrameUniforms::compute(&self.config, self.clock.now(), self.aspect);
    }

    /// Viewport changed
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
            self.uniforms = FrameUniforms::compute(&self.config, self.clock.now(), self.aspect);
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            mesh: self.encoder.mesh(),
            normals: &self.paper.normals,
            ground: &self.ground.positions,
            ground_normals: &self.ground.normals,
            shadow: self.encoder.shadow(),
            particles: self.encoder.quads(),
            opacity: self.encoder.opacity(),
            sizes: self.encoder.sizes(),
            uniforms: &self.uniforms,
        }
    }

    pub fn phase(&self) -> FoldPhase {
        self.animator.phase()
    }

    pub fn folds(&self) -> &FoldSequence {
        self.animator.folds()
    }

    pub fn animator(&self) -> &FoldAnimator {
        &self.animator
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn groups(&self) -> &FoldGroups {
        &self.groups
    }

    pub fn original_positions(&self) -> &[glam::Vec3] {
        &self.paper.positions
    }

    pub fn uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    /// Rebuild the deformed mesh into a scratch encoder without touching
    /// simulation state
    pub fn recompute_mesh(&self) -> Vec<glam::Vec3> {
        let mut scratch = Encoder::new(self.paper.vertex_count(), 0);
        scratch.encode_mesh(&self.paper.positions, self.animator.folds(), &self.groups);
        scratch.mesh().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.mesh.subdivisions = 10;
        config.particles.count = 8;
        config
    }

    #[test]
    fn buffers_sized_on_construction() {
        let sim = Simulation::new(small()).unwrap();
        let frame = sim.frame();
        assert_eq!(frame.mesh.len(), 10 * 10 * 6);
        assert_eq!(frame.shadow.len(), frame.mesh.len());
        assert_eq!(frame.normals.len(), frame.mesh.len());
        assert_eq!(frame.particles.len(), 8 * 6);
        assert_eq!(frame.opacity.len(), 8 * 6);
        assert_eq!(frame.ground.len(), 6);
        assert_eq!(sim.phase(), FoldPhase::Idle);
    }

    #[test]
    fn refuses_malformed_scene() {
        let mut config = small();
        config.folds[2].axis = glam::Vec3::ZERO;
        assert!(matches!(Simulation::new(config), Err(ConfigError::InvalidFoldAxis { index: 2, .. })));

        let mut config = small();
        config.folds.clear();
        assert!(matches!(Simulation::new(config), Err(ConfigError::EmptySequence)));
    }

    #[test]
    fn idle_mesh_stays_flat() {
        let mut sim = Simulation::new(small()).unwrap();
        for _ in 0..10 {
            sim.step(0.1);
        }
        assert_eq!(sim.frame().mesh, sim.original_positions());
    }

    #[test]
    fn resize_updates_projection() {
        let mut sim = Simulation::new(small()).unwrap();
        let before = sim.uniforms().projection;
        sim.resize(1920, 1080);
        assert_ne!(sim.uniforms().projection, before);
        sim.resize(0, 1080);
        assert_eq!(sim.aspect, 1920.0 / 1080.0);
    }
}
