//! Point-particle simulation.
//!
//! Particles live directly in the vertex format so a frame's step can run on
//! a mapped vertex buffer without an intermediate copy.

use ember_engine::coords::Vec2;
use ember_engine::gl::Vertex;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// One particle, laid out as the vertex the particle shader consumes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until respawn.
    pub life: f32,
}

impl Vertex for Particle {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // vel
        2 => Float32x2  // age, life
    ];
}

/// Tunables for [`Simulation`].
///
/// `speed` and `life` are `(min, max)` pairs with finite bounds. A pair may
/// be equal, for a fixed value, or given in either order.
#[derive(Debug, Clone)]
pub struct SimParams {
    pub gravity: Vec2,
    /// Fraction of speed kept after hitting a wall.
    pub restitution: f32,
    pub emitter: Vec2,
    pub speed: (f32, f32),
    pub life: (f32, f32),
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -1.5),
            restitution: 0.7,
            emitter: Vec2::new(0.0, -0.25),
            speed: (0.8, 1.8),
            life: (2.0, 5.0),
        }
    }
}

/// Steps particles under gravity inside the box `[-aspect, aspect] x [-1, 1]`.
pub struct Simulation {
    params: SimParams,
    aspect: f32,
    rng: StdRng,
}

impl Simulation {
    pub fn new(params: SimParams, seed: u64) -> Self {
        Self {
            params,
            aspect: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Resizes the walls to match a surface of the given aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Fills `particles` with fresh spawns at staggered ages.
    pub fn seed(&mut self, particles: &mut [Particle]) {
        for p in particles.iter_mut() {
            *p = self.spawn();
            // Stagger so the whole population does not respawn on one frame.
            p.age = sample(&mut self.rng, (0.0, p.life));
        }
    }

    /// Advances every particle by `dt` seconds.
    pub fn step(&mut self, particles: &mut [Particle], dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let bounds = Vec2::new(self.aspect, 1.0);
        for p in particles.iter_mut() {
            p.age += dt;
            if p.age >= p.life {
                *p = self.spawn();
                continue;
            }

            p.vel += self.params.gravity * dt;
            p.pos += p.vel * dt;
            bounce(&mut p.pos.x, &mut p.vel.x, bounds.x, self.params.restitution);
            bounce(&mut p.pos.y, &mut p.vel.y, bounds.y, self.params.restitution);
        }
    }

    fn spawn(&mut self) -> Particle {
        // Upward cone, 45° either side of vertical.
        let angle = self
            .rng
            .random_range(std::f32::consts::FRAC_PI_4..3.0 * std::f32::consts::FRAC_PI_4);
        let speed = sample(&mut self.rng, self.params.speed);
        let jitter = Vec2::new(
            self.rng.random_range(-0.02..0.02),
            self.rng.random_range(-0.02..0.02),
        );

        Particle {
            pos: self.params.emitter + jitter,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            age: 0.0,
            life: sample(&mut self.rng, self.params.life),
        }
    }
}

/// Uniform value from the closed interval between the two bounds.
fn sample(rng: &mut StdRng, (a, b): (f32, f32)) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

/// Reflects a coordinate off the walls at `±limit`, damping its velocity.
fn bounce(pos: &mut f32, vel: &mut f32, limit: f32, restitution: f32) {
    if *pos < -limit {
        *pos = -limit;
        *vel = vel.abs() * restitution;
    } else if *pos > limit {
        *pos = limit;
        *vel = -vel.abs() * restitution;
    }
}
