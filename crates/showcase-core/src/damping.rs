//! Frame-rate independent smoothing helpers.
//!
//! All damped quantities in the engine follow the same recurrence:
//! `x' = x + (target - x) * (1 - exp(-k * dt))`, so two frames of `dt/2`
//! land on the same value as one frame of `dt`.

use glam::Vec3;

/// Blend factor for one step of exponential smoothing at `rate` per second.
///
/// Non-finite or negative `dt` yields 0 (no movement).
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    (1.0 - (-rate * dt).exp()).clamp(0.0, 1.0)
}

#[inline]
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

#[inline]
pub fn damp_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, smoothing_factor(rate, dt))
}
