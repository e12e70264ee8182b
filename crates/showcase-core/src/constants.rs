use glam::Vec3;
use std::f32::consts::TAU;

// Shared choreography/material tuning constants used by both web and native frontends.

// Animation clock. Every time-driven term (noise drift, ripple, key orbit)
// completes a whole number of cycles per period, so wrapping is seamless.
pub const TIME_WRAP_PERIOD: f64 = 1024.0;

// Scroll tracking
pub const SCROLL_DAMPING_RATE: f32 = 1.0 / 0.2; // per second; time constant 0.2s

// Phase thresholds (closed-open intervals, later phase wins on the boundary)
pub const INGREDIENTS_THRESHOLD: f32 = 0.33;
pub const BENEFIT_THRESHOLD: f32 = 0.66;
pub const OFFER_THRESHOLD: f32 = 0.95;

// Camera
pub const CAMERA_DAMPING: f32 = 4.0; // k in 1 - exp(-k*dt)
pub const CAMERA_FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4 * 1.2;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const REFERENCE_EYE: [f32; 3] = [0.0, 0.0, 5.0]; // opening desktop shot

// Lighting
pub const LIGHT_DAMPING: f32 = 3.0;
pub const RIM_INTENSITY_START: f32 = 2.4; // rim decays across the sequence
pub const RIM_INTENSITY_END: f32 = 0.4;
pub const FILL_INTENSITY_MIN: f32 = 0.15;
pub const FILL_INTENSITY_MAX: f32 = 1.6;
pub const FILL_RAMP_START: f32 = 0.5; // fill only starts rising past this offset
pub const KEY_INTENSITY: f32 = 1.2;
pub const KEY_ORBIT_RADIUS: f32 = 4.0;
pub const KEY_ORBIT_HEIGHT: f32 = 2.5;
pub const KEY_ORBIT_SPEED: f32 = TAU * 57.0 / TIME_WRAP_PERIOD as f32; // ~0.35 rad/s

pub const RIM_POSITION: [f32; 3] = [-3.0, 2.0, -2.5];
pub const FILL_POSITION: [f32; 3] = [3.5, -1.0, 3.0];

pub const RIM_COLOR: [f32; 3] = [0.75, 0.85, 1.0]; // cool
pub const FILL_COLOR: [f32; 3] = [1.0, 0.92, 0.8]; // warm
pub const KEY_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Procedural material
pub const NOISE_FREQ_1: f32 = 3.0;
pub const NOISE_FREQ_2: f32 = 7.0;
pub const NOISE_SPEED_1: f32 = 0.15625; // lattice units per second
pub const NOISE_SPEED_2: f32 = 0.3125;
pub const NOISE_LATTICE_PERIOD: f32 = 16.0; // hash repeats every 16 cells
pub const NOISE_PHASE_2: [f32; 2] = [17.3, -4.1]; // decorrelates the second layer
pub const DISPLACEMENT_AMPLITUDE: f32 = 0.35;
pub const MAX_DISPLACEMENT: f32 = 1.5; // hard clamp applied before use

pub const RIPPLE_STRENGTH: f32 = 0.25;
pub const RIPPLE_FREQUENCY: f32 = 40.0; // k
pub const RIPPLE_SPEED: f32 = TAU * 978.0 / TIME_WRAP_PERIOD as f32; // omega, ~6 rad/s
pub const RIPPLE_FALLOFF: f32 = 6.0;

pub const NORMAL_EPSILON: f32 = 1.0e-3; // uv step for analytic normals
pub const FRESNEL_POWER: f32 = 3.0;
pub const SPECULAR_POWER: f32 = 10.0;
pub const SPECULAR_STRENGTH: f32 = 0.8;
pub const TINT_RATE: f32 = 0.5; // tint convergence rate per second

pub const SURFACE_DARK: [f32; 3] = [0.04, 0.045, 0.05];
pub const SURFACE_RIM: [f32; 3] = [0.95, 0.97, 1.0];
pub const CHROME_TINT: [f32; 3] = [0.72, 0.73, 0.75]; // material always converges here
pub const FLAT_SURFACE_COLOR: [f32; 3] = [0.18, 0.18, 0.2];
pub const NEUTRAL_THEME: [f32; 3] = [0.5, 0.5, 0.5];

// Scene layout
pub const BACKDROP_Z: f32 = -3.0;
pub const BACKDROP_SIZE: [f32; 2] = [14.0, 9.0];
pub const SURFACE_GRID_RES: u32 = 64; // quads per side
pub const IMAGE_PLANE_SIZE: [f32; 2] = [1.6, 2.2];

// Particles
pub const PARTICLE_COUNT: usize = 120;
pub const PARTICLE_SEED: u64 = 7;
// Both loop ends sit outside the tallest view of any shot preset.
pub const PARTICLE_LOOP_LENGTH: f32 = 14.0;
pub const PARTICLE_FLOOR_Y: f32 = -7.0;
pub const PARTICLE_EDGE_FADE: f32 = 1.0; // particles shrink to nothing over this band at each end
pub const PARTICLE_SPREAD_X: f32 = 6.0;
pub const PARTICLE_Z_RANGE: [f32; 2] = [-2.5, 1.5];
pub const PARTICLE_SCALE_RANGE: [f32; 2] = [0.015, 0.06];
pub const PARTICLE_SPEED_RANGE: [f32; 2] = [0.15, 0.45];
pub const PARTICLE_SWAY: f32 = 0.12;

// Resources
pub const MAX_TEXTURE_ATTEMPTS: u8 = 2; // initial request plus one retry
pub const COMPACT_BREAKPOINT_PX: u32 = 768;

pub const CLEAR_COLOR: [f64; 3] = [0.015, 0.015, 0.02];

#[inline]
pub fn chrome_tint_vec3() -> Vec3 {
    Vec3::from(CHROME_TINT)
}
