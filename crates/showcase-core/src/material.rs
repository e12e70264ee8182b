//! Procedural backdrop material.
//!
//! CPU reference of the WGSL surface program: layered gradient noise plus a
//! pointer-centred ripple displace a plane, normals come from re-sampling the
//! same field at `uv + ε`, and shading is a Fresnel mix with a sharp specular
//! lobe per scene light. Everything except the smoothed tint is a pure
//! function of `(uv, time, mouse)` and the eye/lights it is shaded against.

use crate::constants::*;
use crate::clock::AnimationClock;
use crate::damping::damp_vec3;
use crate::lighting::{compute_lights, Light};
use crate::noise::gradient_noise;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    /// Position in the backdrop's local frame (plane centred on the origin, z = displacement).
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub displacement: f32,
    /// The raw displacement was non-finite or out of range and got clamped.
    pub clamped: bool,
}

/// Pointer in \[-1, 1\]² to surface uv in \[0, 1\]².
#[inline]
pub fn pointer_to_uv(pointer: Vec2) -> Vec2 {
    pointer * 0.5 + Vec2::splat(0.5)
}

/// Two layered noise samples, the second at half weight.
pub fn noise_field(uv: Vec2, time: f32) -> f32 {
    let l1 = gradient_noise(uv * NOISE_FREQ_1 + Vec2::splat(time * NOISE_SPEED_1));
    let drift = Vec2::new(time * NOISE_SPEED_2, -time * NOISE_SPEED_2 * 0.5);
    let l2 = gradient_noise(uv * NOISE_FREQ_2 + Vec2::from(NOISE_PHASE_2) - drift);
    l1 + 0.5 * l2
}

#[inline]
pub fn ripple_envelope(distance: f32) -> f32 {
    RIPPLE_STRENGTH * (-distance * RIPPLE_FALLOFF).exp()
}

pub fn ripple(uv: Vec2, mouse_uv: Vec2, time: f32) -> f32 {
    let d = uv.distance(mouse_uv);
    (d * RIPPLE_FREQUENCY - time * RIPPLE_SPEED).sin() * ripple_envelope(d)
}

/// Clamp to `±MAX_DISPLACEMENT`, mapping NaN to 0. Returns whether the value changed.
#[inline]
pub fn sanitize_displacement(d: f32) -> (f32, bool) {
    if d.is_nan() {
        (0.0, true)
    } else if d.abs() > MAX_DISPLACEMENT {
        (d.clamp(-MAX_DISPLACEMENT, MAX_DISPLACEMENT), true)
    } else {
        (d, false)
    }
}

pub fn displacement(uv: Vec2, time: f32, mouse: Vec2) -> (f32, bool) {
    let raw = noise_field(uv, time) * DISPLACEMENT_AMPLITUDE + ripple(uv, pointer_to_uv(mouse), time);
    sanitize_displacement(raw)
}

#[inline]
fn plane_point(uv: Vec2, d: f32) -> Vec3 {
    Vec3::new(
        (uv.x - 0.5) * BACKDROP_SIZE[0],
        (uv.y - 0.5) * BACKDROP_SIZE[1],
        d,
    )
}

#[inline]
fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}

pub fn surface_normal(uv: Vec2, time: f32, mouse: Vec2) -> Vec3 {
    let (d0, _) = displacement(uv, time, mouse);
    let ux = uv + Vec2::new(NORMAL_EPSILON, 0.0);
    let uy = uv + Vec2::new(0.0, NORMAL_EPSILON);
    let (dx, _) = displacement(ux, time, mouse);
    let (dy, _) = displacement(uy, time, mouse);
    let p0 = plane_point(uv, d0);
    let tangent = plane_point(ux, dx) - p0;
    let bitangent = plane_point(uy, dy) - p0;
    let n = tangent.cross(bitangent).normalize_or_zero();
    if n == Vec3::ZERO || !n.is_finite() {
        Vec3::Z
    } else {
        n
    }
}

/// Eye and lights the surface is shaded against, in world space.
#[derive(Clone, Copy, Debug)]
pub struct Shading<'a> {
    pub eye: Vec3,
    pub lights: &'a [Light],
}

/// Same lighting model as the surface fragment stage: Fresnel mix toward the
/// rim colour plus one specular lobe per light.
pub fn shade_surface(
    uv: Vec2,
    time: f32,
    mouse: Vec2,
    tint: Vec3,
    shading: &Shading<'_>,
) -> SurfaceSample {
    let (d, clamped) = displacement(uv, time, mouse);
    let normal = surface_normal(uv, time, mouse);
    let position = plane_point(uv, d);
    let world = position + Vec3::new(0.0, 0.0, BACKDROP_Z);
    let mut view = (shading.eye - world).normalize_or_zero();
    if view == Vec3::ZERO {
        view = Vec3::Z;
    }
    let ndv = normal.dot(view).max(0.0);
    let fresnel = (1.0 - ndv).powf(FRESNEL_POWER);
    let base = Vec3::from(SURFACE_DARK).lerp(Vec3::from(SURFACE_RIM), fresnel);
    let reflected = reflect(-view, normal);
    let specular = shading.lights.iter().fold(Vec3::ZERO, |acc, light| {
        let l = (light.position - world).normalize_or_zero();
        let lobe = reflected.dot(l).max(0.0).powf(SPECULAR_POWER);
        // the uniform block always carries three light slots
        acc + light.color * (lobe * SPECULAR_STRENGTH * light.intensity / 3.0)
    });
    let color = ((base + specular) * tint).clamp(Vec3::ZERO, Vec3::splat(4.0));
    SurfaceSample {
        position,
        normal,
        color,
        displacement: d,
        clamped,
    }
}

/// Surface at the converged chrome tint, seen from the opening camera and lit
/// by the opening light rig.
pub fn compute_surface(uv: Vec2, time: f32, mouse: Vec2) -> SurfaceSample {
    let lights = compute_lights(0.0, 0.0);
    let shading = Shading {
        eye: Vec3::from(REFERENCE_EYE),
        lights: &lights,
    };
    shade_surface(uv, time, mouse, chrome_tint_vec3(), &shading)
}

fn flat_surface(uv: Vec2, tint: Vec3) -> SurfaceSample {
    SurfaceSample {
        position: plane_point(uv, 0.0),
        normal: Vec3::Z,
        color: Vec3::from(FLAT_SURFACE_COLOR) * tint,
        displacement: 0.0,
        clamped: false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialMode {
    Procedural,
    /// Unlit fallback used when the surface program is unavailable.
    Flat,
}

/// Uniform bundle owned by the material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    /// Material clock wrapped to `TIME_WRAP_PERIOD`.
    pub time: f32,
    pub mouse: Vec2,
    pub env_color: Vec3,
}

pub struct ProceduralMaterial {
    state: MaterialState,
    clock: AnimationClock,
    mode: MaterialMode,
    tint_rate: f32,
    faults: u32,
}

impl ProceduralMaterial {
    pub fn new(theme_color: Vec3, tint_rate: f32, mode: MaterialMode) -> Self {
        Self {
            state: MaterialState {
                time: 0.0,
                mouse: Vec2::ZERO,
                env_color: theme_color,
            },
            clock: AnimationClock::default(),
            mode,
            tint_rate,
            faults: 0,
        }
    }

    pub fn update(&mut self, dt: f32, pointer: Vec2) -> MaterialState {
        self.clock.advance(dt);
        self.state.time = self.clock.wrapped();
        if pointer.is_finite() {
            self.state.mouse = pointer;
        }
        self.state.env_color = damp_vec3(
            self.state.env_color,
            chrome_tint_vec3(),
            self.tint_rate,
            dt,
        );
        self.state
    }

    /// Restart the tint from a new theme colour; it converges back to chrome.
    pub fn set_theme_color(&mut self, color: Vec3) {
        if color.is_finite() {
            self.state.env_color = color;
        }
    }

    pub fn sample(&mut self, uv: Vec2, shading: &Shading<'_>) -> SurfaceSample {
        let s = match self.mode {
            MaterialMode::Flat => flat_surface(uv, self.state.env_color),
            MaterialMode::Procedural => shade_surface(
                uv,
                self.state.time,
                self.state.mouse,
                self.state.env_color,
                shading,
            ),
        };
        if s.clamped {
            if self.faults == 0 {
                log::debug!("[material] displacement clamped at uv=({:.3},{:.3})", uv.x, uv.y);
            }
            self.faults = self.faults.saturating_add(1);
        }
        s
    }

    #[inline]
    pub fn state(&self) -> MaterialState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> MaterialMode {
        self.mode
    }

    #[inline]
    pub fn faults(&self) -> u32 {
        self.faults
    }
}
