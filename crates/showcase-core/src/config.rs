use crate::constants::*;
use crate::error::ConfigError;
use crate::phase::PhaseThresholds;
use crate::shots::Viewport;

/// Runtime knobs for one scene. `Default` gives the reference tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowcaseParams {
    pub thresholds: PhaseThresholds,
    pub viewport: Viewport,
    pub scroll_damping_rate: f32,
    pub camera_damping: f32,
    pub light_damping: f32,
    pub tint_rate: f32,
    pub particle_count: usize,
    pub particle_seed: u64,
    pub surface_grid_res: u32,
}

impl Default for ShowcaseParams {
    fn default() -> Self {
        Self {
            thresholds: PhaseThresholds::default(),
            viewport: Viewport::Desktop,
            scroll_damping_rate: SCROLL_DAMPING_RATE,
            camera_damping: CAMERA_DAMPING,
            light_damping: LIGHT_DAMPING,
            tint_rate: TINT_RATE,
            particle_count: PARTICLE_COUNT,
            particle_seed: PARTICLE_SEED,
            surface_grid_res: SURFACE_GRID_RES,
        }
    }
}

impl ShowcaseParams {
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("scroll", self.scroll_damping_rate),
            ("camera", self.camera_damping),
            ("light", self.light_damping),
            ("tint", self.tint_rate),
        ];
        for (what, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::DampingRate { what, value });
            }
        }
        Ok(())
    }
}
