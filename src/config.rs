// config.rs - Scene parameters
//
// Loaded once at startup, either from defaults (the flower scene) or from a
// TOML document. Every section carries #[serde(default)] so a file only has
// to name what it changes.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::world::{Axis, Region, Side};

/// Upper bounds keep every buffer addressable with u32 indices
pub const MAX_SUBDIVISIONS: u32 = 1024;
pub const MAX_PARTICLES: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for particle placement and sway
    pub seed: u64,
    pub mesh: MeshConfig,
    pub ground: GroundConfig,
    pub shadow: ShadowConfig,
    pub light: LightConfig,
    pub folding: FoldingConfig,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    pub material: MaterialConfig,
    /// Fold sequence, in activation order
    #[serde(rename = "fold")]
    pub folds: Vec<FoldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub subdivisions: u32,
    /// Side length of the paper square
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub height: f32,
    pub half_extent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Height the shadow is flattened onto. Sits just above the ground
    /// plane so the two don't z-fight.
    pub plane_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldingConfig {
    /// Pause between a step settling and the next fold starting
    pub settle_delay_ms: f64,
    /// Angular tolerance (radians) for "settled"
    pub epsilon: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Spawn x and z are drawn from [-spread, spread)
    pub spread: f32,
    /// Initial altitude range [min, max)
    pub start_height: [f32; 2],
    /// Particles above this altitude respawn
    pub ceiling: f32,
    /// Altitude particles respawn at
    pub respawn_height: f32,
    /// Initial horizontal velocity is drawn from [-initial_drift, initial_drift)
    pub initial_drift: f32,
    /// Vertical velocity range [min, max), per frame
    pub rise: [f32; 2],
    /// Horizontal velocity is clamped to [-max_drift, max_drift]
    pub max_drift: f32,
    /// Width of the per-frame random velocity nudge
    pub sway: f32,
    /// Quad half-width range [min, max)
    pub size: [f32; 2],
    pub life_speed: [f32; 2],
    /// Spin is drawn from [-spin, spin) radians per second
    pub spin: f32,
    /// opacity = (sin(life) + 1) * pulse_scale + pulse_floor
    pub pulse_scale: f32,
    pub pulse_floor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view, radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Model translation in view space
    pub offset: Vec3,
    /// Turntable rate about +Y, radians per second
    pub turn_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub shininess: f32,
    pub ground_color: Vec3,
    pub particle_color: Vec3,
}

/// One hinge of the fold sequence as written in the scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldSpec {
    pub axis: Vec3,
    pub pivot: Vec3,
    pub target_angle: f32,
    /// Radians per second
    pub speed: f32,
    #[serde(default)]
    pub region: Region,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0xDEADBEEF,
            mesh: MeshConfig::default(),
            ground: GroundConfig::default(),
            shadow: ShadowConfig::default(),
            light: LightConfig::default(),
            folding: FoldingConfig::default(),
            particles: ParticleConfig::default(),
            camera: CameraConfig::default(),
            material: MaterialConfig::default(),
            folds: flower_folds(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { subdivisions: 20, scale: 0.5 }
    }
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self { height: -0.5, half_extent: 2.0 }
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self { plane_y: -0.49 }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 2.0, 1.0),
            color: Vec3::ONE,
            intensity: 1.2,
        }
    }
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self { settle_delay_ms: 1000.0, epsilon: 0.01 }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 60,
            spread: 2.0,
            start_height: [0.5, 2.5],
            ceiling: 3.0,
            respawn_height: -0.5,
            initial_drift: 0.01,
            rise: [0.005, 0.015],
            max_drift: 0.03,
            sway: 0.0001,
            size: [0.002, 0.007],
            life_speed: [0.5, 1.0],
            spin: 1.0,
            pulse_scale: 0.3,
            pulse_floor: 0.2,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_3,
            near: 0.1,
            far: 100.0,
            offset: Vec3::new(0.0, -0.1, -0.8),
            turn_rate: 0.2,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            shininess: 32.0,
            ground_color: Vec3::new(0.7, 1.0, 0.7),
            particle_color: Vec3::new(1.0, 0.9, 0.3),
        }
    }
}

/// Four corners fold in towards the centre, then four petals lift.
pub fn flower_folds() -> Vec<FoldSpec> {
    use Side::{Negative as Neg, Positive as Pos};

    let corner = |axis: [f32; 3], pivot: [f32; 3], x: Side, z: Side| FoldSpec {
        axis: Vec3::from(axis),
        pivot: Vec3::from(pivot),
        target_angle: FRAC_PI_2,
        speed: 1.0,
        region: Region::Corner { x, z, beyond: 0.08 },
    };
    let petal = |axis: [f32; 3], pivot: [f32; 3], along: Axis, side: Side| FoldSpec {
        axis: Vec3::from(axis),
        pivot: Vec3::from(pivot),
        target_angle: FRAC_PI_3,
        speed: 1.2,
        region: Region::Strip { along, side, beyond: 0.05, half_width: 0.05 },
    };

    vec![
        corner([-0.707, 0.0, -0.707], [-0.05, 0.0, 0.05], Neg, Pos),
        corner([-0.707, 0.0, 0.707], [0.05, 0.0, 0.05], Pos, Pos),
        corner([0.707, 0.0, -0.707], [-0.05, 0.0, -0.05], Neg, Neg),
        corner([0.707, 0.0, 0.707], [0.05, 0.0, -0.05], Pos, Neg),
        petal([0.0, 0.0, -1.0], [-0.12, 0.0, 0.0], Axis::X, Neg),
        petal([0.0, 0.0, 1.0], [0.12, 0.0, 0.0], Axis::X, Pos),
        petal([-1.0, 0.0, 0.0], [0.0, 0.0, 0.12], Axis::Z, Pos),
        petal([1.0, 0.0, 0.0], [0.0, 0.0, -0.12], Axis::Z, Neg),
    ]
}

impl SceneConfig {
    /// Parse and validate a scene file
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything except the fold list, which FoldSequence::new
    /// validates when it is built.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SUBDIVISIONS).contains(&self.mesh.subdivisions) {
            return Err(ConfigError::InvalidSubdivisions(self.mesh.subdivisions));
        }
        positive("mesh.scale", self.mesh.scale)?;

        finite("ground.height", self.ground.height)?;
        positive("ground.half_extent", self.ground.half_extent)?;
        finite("shadow.plane_y", self.shadow.plane_y)?;

        finite_vec("light.position", self.light.position)?;
        finite_vec("light.color", self.light.color)?;
        finite("light.intensity", self.light.intensity)?;

        let f = &self.folding;
        if !f.settle_delay_ms.is_finite() || f.settle_delay_ms < 0.0 {
            return Err(ConfigError::invalid("folding.settle_delay_ms", "must be a non-negative duration"));
        }
        positive("folding.epsilon", f.epsilon)?;

        self.particles.validate()?;

        let c = &self.camera;
        positive("camera.fov_y", c.fov_y)?;
        positive("camera.near", c.near)?;
        finite("camera.far", c.far)?;
        if c.far <= c.near {
            return Err(ConfigError::invalid("camera.far", "must be beyond camera.near"));
        }
        finite_vec("camera.offset", c.offset)?;
        finite("camera.turn_rate", c.turn_rate)?;

        finite("material.shininess", self.material.shininess)?;
        finite_vec("material.ground_color", self.material.ground_color)?;
        finite_vec("material.particle_color", self.material.particle_color)?;

        if self.folds.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        Ok(())
    }
}

impl ParticleConfig {
    fn validate(&self) -> Result<()> {
        if self.count > MAX_PARTICLES {
            return Err(ConfigError::invalid(
                "particles.count",
                format!("at most {MAX_PARTICLES} particles, got {}", self.count),
            ));
        }
        non_negative("particles.spread", self.spread)?;
        range("particles.start_height", self.start_height)?;
        range("particles.rise", self.rise)?;
        range("particles.size", self.size)?;
        range("particles.life_speed", self.life_speed)?;
        if self.size[0] <= 0.0 {
            return Err(ConfigError::invalid("particles.size", "quads need a positive size"));
        }
        finite("particles.ceiling", self.ceiling)?;
        finite("particles.respawn_height", self.respawn_height)?;
        if self.ceiling <= self.respawn_height {
            return Err(ConfigError::invalid("particles.ceiling", "must be above particles.respawn_height"));
        }
        non_negative("particles.initial_drift", self.initial_drift)?;
        non_negative("particles.max_drift", self.max_drift)?;
        if self.initial_drift > self.max_drift {
            return Err(ConfigError::invalid("particles.initial_drift", "exceeds particles.max_drift"));
        }
        non_negative("particles.sway", self.sway)?;
        non_negative("particles.spin", self.spin)?;
        finite("particles.pulse_scale", self.pulse_scale)?;
        finite("particles.pulse_floor", self.pulse_floor)?;
        Ok(())
    }
}

fn finite(field: &str, v: f32) -> Result<()> {
    if v.is_finite() { Ok(()) } else { Err(ConfigError::non_finite(field)) }
}

fn finite_vec(field: &str, v: Vec3) -> Result<()> {
    if v.is_finite() { Ok(()) } else { Err(ConfigError::non_finite(field)) }
}

fn positive(field: &str, v: f32) -> Result<()> {
    finite(field, v)?;
    if v > 0.0 { Ok(()) } else { Err(ConfigError::invalid(field, format!("must be positive, got {v}"))) }
}

fn non_negative(field: &str, v: f32) -> Result<()> {
    finite(field, v)?;
    if v >= 0.0 { Ok(()) } else { Err(ConfigError::invalid(field, format!("must not be negative, got {v}"))) }
}

fn range(field: &str, [lo, hi]: [f32; 2]) -> Result<()> {
    finite(field, lo)?;
    finite(field, hi)?;
    if lo <= hi { Ok(()) } else { Err(ConfigError::invalid(field, format!("min {lo} exceeds max {hi}"))) }
}
