//! Three-light rig whose intensities are explicit functions of offset.
//!
//! Rim decays across the sequence, fill ramps in past `FILL_RAMP_START`, key
//! orbits on wall-clock time so the surface keeps a moving highlight while the
//! scroll is idle. No light reads another.

use crate::constants::*;
use crate::damping::{damp, damp_vec3};
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Rim,
    Fill,
    Key,
}

impl LightKind {
    /// Index used in the packed uniform layout.
    pub fn index(self) -> u32 {
        match self {
            LightKind::Rim => 0,
            LightKind::Fill => 1,
            LightKind::Key => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

pub type LightSet = SmallVec<[Light; 3]>;

#[inline]
fn clamp_offset(offset: f32) -> f32 {
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(0.0, 1.0)
    }
}

pub fn rim_intensity(offset: f32) -> f32 {
    let o = clamp_offset(offset);
    RIM_INTENSITY_START + (RIM_INTENSITY_END - RIM_INTENSITY_START) * o
}

pub fn fill_intensity(offset: f32) -> f32 {
    let o = clamp_offset(offset);
    let ramp = ((o - FILL_RAMP_START) / (1.0 - FILL_RAMP_START)).clamp(0.0, 1.0);
    FILL_INTENSITY_MIN + (FILL_INTENSITY_MAX - FILL_INTENSITY_MIN) * ramp
}

pub fn key_position(elapsed: f32) -> Vec3 {
    let t = if elapsed.is_finite() { elapsed } else { 0.0 };
    let a = t * KEY_ORBIT_SPEED;
    Vec3::new(
        a.sin() * KEY_ORBIT_RADIUS,
        KEY_ORBIT_HEIGHT,
        a.cos() * KEY_ORBIT_RADIUS,
    )
}

pub fn compute_lights(offset: f32, elapsed: f32) -> LightSet {
    let mut lights = LightSet::new();
    lights.push(Light {
        position: Vec3::from(RIM_POSITION),
        color: Vec3::from(RIM_COLOR),
        intensity: rim_intensity(offset),
        kind: LightKind::Rim,
    });
    lights.push(Light {
        position: Vec3::from(FILL_POSITION),
        color: Vec3::from(FILL_COLOR),
        intensity: fill_intensity(offset),
        kind: LightKind::Fill,
    });
    lights.push(Light {
        position: key_position(elapsed),
        color: Vec3::from(KEY_COLOR),
        intensity: KEY_INTENSITY,
        kind: LightKind::Key,
    });
    lights
}

/// Damped copy of the light set actually used for rendering.
pub struct LightingRig {
    lights: LightSet,
    rate: f32,
}

impl LightingRig {
    pub fn new(rate: f32) -> Self {
        Self {
            lights: LightSet::new(),
            rate,
        }
    }

    pub fn update(&mut self, targets: &[Light], dt: f32) -> &[Light] {
        if self.lights.len() != targets.len() {
            self.lights = targets.iter().copied().collect();
            return &self.lights;
        }
        for (cur, tgt) in self.lights.iter_mut().zip(targets) {
            cur.position = damp_vec3(cur.position, tgt.position, self.rate, dt);
            cur.intensity = damp(cur.intensity, tgt.intensity, self.rate, dt);
            cur.color = tgt.color;
            cur.kind = tgt.kind;
        }
        &self.lights
    }

    #[inline]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
