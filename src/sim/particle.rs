// particle.rs - Floating pollen
//
// Structure-of-Arrays layout for cache-friendly iteration. The pool size
// is fixed at startup; particles are recycled in place, never removed.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rand::distributions::Standard;
use rand::rngs::StdRng;

use crate::config::ParticleConfig;

pub struct Particles {
    // Position
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,

    // Velocity, world units per frame
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub vz: Vec<f32>,

    // Quad half-width
    pub size: Vec<f32>,

    // Pulse phase, radians in [0, 2pi]
    pub life: Vec<f32>,
    pub life_speed: Vec<f32>,

    // In-plane rotation
    pub rotation: Vec<f32>,
    pub spin: Vec<f32>,

    // Derived each update from life
    pub opacity: Vec<f32>,

    params: ParticleConfig,
}

impl Particles {
    pub fn new(params: &ParticleConfig, rng: &mut StdRng) -> Self {
        let n = params.count;
        let mut p = Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
            vx: Vec::with_capacity(n),
            vy: Vec::with_capacity(n),
            vz: Vec::with_capacity(n),
            size: Vec::with_capacity(n),
            life: Vec::with_capacity(n),
            life_speed: Vec::with_capacity(n),
            rotation: Vec::with_capacity(n),
            spin: Vec::with_capacity(n),
            opacity: Vec::with_capacity(n),
            params: params.clone(),
        };

        let c = params;
        for _ in 0..n {
            p.x.push(rand_in(rng, -c.spread, c.spread));
            p.y.push(rand_in(rng, c.start_height[0], c.start_height[1]));
            p.z.push(rand_in(rng, -c.spread, c.spread));
            p.vx.push(rand_in(rng, -c.initial_drift, c.initial_drift));
            p.vy.push(rand_in(rng, c.rise[0], c.rise[1]));
            p.vz.push(rand_in(rng, -c.initial_drift, c.initial_drift));
            p.size.push(rand_in(rng, c.size[0], c.size[1]));
            p.life.push(rand_in(rng, 0.0, 1.0));
            p.life_speed.push(rand_in(rng, c.life_speed[0], c.life_speed[1]));
            p.spin.push(rand_in(rng, -c.spin, c.spin));
            p.rotation.push(rand_in(rng, 0.0, TAU));
        }
        p.opacity = p.life.iter().map(|&l| p.pulse(l)).collect();
        p
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.x[i], self.y[i], self.z[i])
    }

    #[inline]
    fn pulse(&self, life: f32) -> f32 {
        (life.sin() + 1.0) * self.params.pulse_scale + self.params.pulse_floor
    }

    /// One simulation tick. Position moves a whole velocity step per call;
    /// life and rotation scale with `dt` seconds.
    pub fn update(&mut self, dt: f32, rng: &mut StdRng) {
        let c = &self.params;
        let (spread, ceiling, floor) = (c.spread, c.ceiling, c.respawn_height);
        let (sway, max_drift) = (c.sway, c.max_drift);

        for i in 0..self.len() {
            self.x[i] += self.vx[i];
            self.y[i] += self.vy[i];
            self.z[i] += self.vz[i];

            self.life[i] += self.life_speed[i] * dt;
            if self.life[i] > TAU {
                self.life[i] = 0.0;
            }

            self.rotation[i] = (self.rotation[i] + self.spin[i] * dt).rem_euclid(TAU);

            // Drifted out the top - back to the ground, same velocity
            if self.y[i] > ceiling {
                self.y[i] = floor;
                self.x[i] = rand_in(rng, -spread, spread);
                self.z[i] = rand_in(rng, -spread, spread);
            }

            // Sway
            self.vx[i] += (unit(rng) - 0.5) * sway;
            self.vz[i] += (unit(rng) - 0.5) * sway;
            self.vx[i] = self.vx[i].clamp(-max_drift, max_drift);
            self.vz[i] = self.vz[i].clamp(-max_drift, max_drift);

            self.opacity[i] = self.pulse(self.life[i]);
        }
    }
}

#[inline]
fn unit(rng: &mut StdRng) -> f32 {
    rng.sample(Standard)
}

/// Uniform in [lo, hi)
#[inline]
fn rand_in(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * unit(rng)
}
