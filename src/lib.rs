use wasm_bindgen::prelude::*;

use js_sys::Float32Array;

pub mod config;
pub mod error;
pub mod render;
pub mod scene;
pub mod sim;
pub mod world;

#[cfg(target_arch = "wasm32")]
mod logging;

pub use config::SceneConfig;
pub use error::ConfigError;
pub use sim::{FoldEvent, FoldPhase, Simulation};

use render::flat;

// ============================================================================
// ORIGAMI WORLD - Paper folding, projected shadow and floating pollen
// ============================================================================
//
// The host owns the WebGL context and shader program. Each frame it calls
// tick(timestamp) and re-uploads the dynamic buffers through the *_ptr /
// *_len pairs (lengths are in f32 elements). Static buffers (normals,
// ground) never move once the world is built.

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    logging::init(log::LevelFilter::Info);
}

#[wasm_bindgen]
pub struct OrigamiWorld {
    sim: Simulation,
}

#[wasm_bindgen]
impl OrigamiWorld {
    /// Default flower scene
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<OrigamiWorld, JsError> {
        let config = SceneConfig { seed: seed as u64, ..SceneConfig::default() };
        Ok(Self { sim: Simulation::new(config)? })
    }

    /// Scene from a TOML document; unspecified fields keep their defaults
    pub fn from_toml(src: &str) -> Result<OrigamiWorld, JsError> {
        let config = SceneConfig::from_toml_str(src)?;
        Ok(Self { sim: Simulation::new(config)? })
    }

    /// Start signal. Safe to call at any time; restarts from the first fold.
    pub fn start_folding(&mut self) {
        self.sim.start_folding();
    }

    pub fn tick(&mut self, timestamp_ms: f64) {
        self.sim.tick(timestamp_ms);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.sim.resize(w, h);
    }

    // Fold state

    pub fn is_folding(&self) -> bool {
        self.sim.animator().is_running()
    }

    pub fn is_complete(&self) -> bool {
        self.sim.phase() == FoldPhase::Complete
    }

    /// Active step index, -1 when idle or complete
    pub fn current_step(&self) -> i32 {
        match self.sim.phase() {
            FoldPhase::Running(i) => i as i32,
            _ => -1,
        }
    }

    pub fn fold_count(&self) -> usize {
        self.sim.folds().len()
    }

    // Dynamic buffers (rebuilt every tick)

    pub fn mesh_ptr(&self) -> *const f32 { flat(self.sim.frame().mesh).as_ptr() }
    pub fn mesh_len(&self) -> usize { flat(self.sim.frame().mesh).len() }
    pub fn shadow_ptr(&self) -> *const f32 { flat(self.sim.frame().shadow).as_ptr() }
    pub fn shadow_len(&self) -> usize { flat(self.sim.frame().shadow).len() }
    pub fn particle_ptr(&self) -> *const f32 { flat(self.sim.frame().particles).as_ptr() }
    pub fn particle_len(&self) -> usize { flat(self.sim.frame().particles).len() }
    pub fn opacity_ptr(&self) -> *const f32 { self.sim.frame().opacity.as_ptr() }
    pub fn opacity_len(&self) -> usize { self.sim.frame().opacity.len() }
    pub fn size_ptr(&self) -> *const f32 { self.sim.frame().sizes.as_ptr() }
    pub fn size_len(&self) -> usize { self.sim.frame().sizes.len() }

    // Static buffers

    pub fn normals_ptr(&self) -> *const f32 { flat(self.sim.frame().normals).as_ptr() }
    pub fn normals_len(&self) -> usize { flat(self.sim.frame().normals).len() }
    pub fn ground_ptr(&self) -> *const f32 { flat(self.sim.frame().ground).as_ptr() }
    pub fn ground_len(&self) -> usize { flat(self.sim.frame().ground).len() }
    pub fn ground_normals_ptr(&self) -> *const f32 { flat(self.sim.frame().ground_normals).as_ptr() }
    pub fn ground_normals_len(&self) -> usize { flat(self.sim.frame().ground_normals).len() }

    /// Vertices per draw call
    pub fn mesh_vertices(&self) -> usize { self.sim.frame().mesh.len() }
    pub fn particle_vertices(&self) -> usize { self.sim.frame().particles.len() }

    // Uniforms (copied out, recomputed every tick)

    pub fn projection(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().projection.to_cols_array()[..])
    }

    pub fn model_view(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().model_view.to_cols_array()[..])
    }

    pub fn normal_matrix(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().normal_matrix.to_cols_array()[..])
    }

    /// Light in view space, as the lighting shader expects it
    pub fn light_position(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().light_view.to_array()[..])
    }

    pub fn light_world_position(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().light_world.to_array()[..])
    }

    pub fn view_position(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().view_position.to_array()[..])
    }

    pub fn light_color(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().light_color.to_array()[..])
    }

    pub fn light_intensity(&self) -> f32 { self.sim.uniforms().light_intensity }
    pub fn shininess(&self) -> f32 { self.sim.uniforms().shininess }

    pub fn ground_color(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().ground_color.to_array()[..])
    }

    pub fn particle_color(&self) -> Float32Array {
        Float32Array::from(&self.sim.uniforms().particle_color.to_array()[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(src: &str) -> OrigamiWorld {
        let Ok(world) = OrigamiWorld::from_toml(src) else {
            panic!("scene should build");
        };
        world
    }

    #[test]
    fn buffer_lengths_count_floats() {
        let Ok(w) = OrigamiWorld::new(42) else {
            panic!("default scene should build");
        };
        assert_eq!(w.mesh_vertices(), 20 * 20 * 6);
        assert_eq!(w.mesh_len(), 3 * w.mesh_vertices());
        assert_eq!(w.shadow_len(), w.mesh_len());
        assert_eq!(w.normals_len(), w.mesh_len());
        assert_eq!(w.ground_len(), 3 * 6);
        assert_eq!(w.ground_normals_len(), w.ground_len());
        assert_eq!(w.particle_vertices(), 60 * 6);
        assert_eq!(w.particle_len(), 3 * w.particle_vertices());
        assert_eq!(w.opacity_len(), w.particle_vertices());
        assert_eq!(w.size_len(), w.particle_vertices());
        assert_eq!(w.fold_count(), 8);
        assert!(!w.mesh_ptr().is_null());
    }

    #[test]
    fn step_index_tracks_phase() {
        let mut w = world(
            "[folding]\nsettle_delay_ms = 100.0\n\n\
             [[fold]]\naxis = [0.0, 0.0, 1.0]\npivot = [0.0, 0.0, 0.0]\ntarget_angle = 0.5\nspeed = 10.0\n",
        );
        assert_eq!(w.current_step(), -1);
        assert!(!w.is_folding() && !w.is_complete());

        w.start_folding();
        assert_eq!(w.current_step(), 0);
        assert!(w.is_folding());

        let mut t = 0.0;
        while !w.is_complete() && t < 10_000.0 {
            w.tick(t);
            t += 16.0;
        }
        assert!(w.is_complete());
        assert!(!w.is_folding());
        assert_eq!(w.current_step(), -1);
    }
}
