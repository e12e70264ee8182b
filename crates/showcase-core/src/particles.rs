//! Ambient drifting particles. Advanced by elapsed time only; scroll never
//! touches them.

use crate::clock::AnimationClock;
use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleInstance {
    pub base_position: Vec3,
    pub scale: f32,
    pub phase_offset: f32,
    pub speed: f32,
}

impl ParticleInstance {
    /// Position after `t` seconds. Both wrap points lie outside the view of
    /// every shot preset. Phases are reduced in
    /// `f64` so the drift stays smooth however long the scene runs.
    pub fn position_at(&self, t: f64) -> Vec3 {
        let rise = (f64::from(self.base_position.y) + t * f64::from(self.speed))
            .rem_euclid(f64::from(PARTICLE_LOOP_LENGTH)) as f32;
        let sway = (t * 0.5 + f64::from(self.phase_offset)).rem_euclid(std::f64::consts::TAU) as f32;
        Vec3::new(
            self.base_position.x + sway.sin() * PARTICLE_SWAY,
            PARTICLE_FLOOR_Y + rise,
            self.base_position.z,
        )
    }
}

/// Size multiplier for a particle at height `y`: 1 inside the loop, falling
/// to 0 at both wrap points so a wrap never swaps a visible disc.
pub fn edge_fade(y: f32) -> f32 {
    let from_floor = y - PARTICLE_FLOOR_Y;
    let from_top = PARTICLE_FLOOR_Y + PARTICLE_LOOP_LENGTH - y;
    let edge = from_floor.min(from_top);
    if !edge.is_finite() {
        return 0.0;
    }
    let t = (edge / PARTICLE_EDGE_FADE).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub struct ParticleField {
    particles: Vec<ParticleInstance>,
    positions: Vec<Vec3>,
    clock: AnimationClock,
}

impl ParticleField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| ParticleInstance {
                base_position: Vec3::new(
                    rng.gen_range(-PARTICLE_SPREAD_X..PARTICLE_SPREAD_X),
                    rng.gen_range(0.0..PARTICLE_LOOP_LENGTH),
                    rng.gen_range(PARTICLE_Z_RANGE[0]..PARTICLE_Z_RANGE[1]),
                ),
                scale: rng.gen_range(PARTICLE_SCALE_RANGE[0]..PARTICLE_SCALE_RANGE[1]),
                phase_offset: rng.gen_range(0.0..std::f32::consts::TAU),
                speed: rng.gen_range(PARTICLE_SPEED_RANGE[0]..PARTICLE_SPEED_RANGE[1]),
            })
            .collect::<Vec<_>>();
        let positions = particles.iter().map(|p| p.position_at(0.0)).collect();
        Self {
            particles,
            positions,
            clock: AnimationClock::default(),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
        let t = self.clock.seconds();
        for (pos, p) in self.positions.iter_mut().zip(&self.particles) {
            *pos = p.position_at(t);
        }
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.particles
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.clock.seconds()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
