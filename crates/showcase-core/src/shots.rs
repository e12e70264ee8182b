//! Choreographed shot list.
//!
//! The camera stays close to the optical axis and the showcased object moves
//! between shots; only the dolly distance changes on the camera side.

use crate::constants::COMPACT_BREAKPOINT_PX;
use crate::error::ShotListError;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub object_position: Vec3,
}

impl Shot {
    pub const fn new(camera_position: Vec3, camera_look_at: Vec3, object_position: Vec3) -> Self {
        Self {
            camera_position,
            camera_look_at,
            object_position,
        }
    }

    fn is_finite(&self) -> bool {
        self.camera_position.is_finite()
            && self.camera_look_at.is_finite()
            && self.object_position.is_finite()
    }
}

/// Layout class the shot magnitudes are tuned for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Viewport {
    #[default]
    Desktop,
    Compact,
}

impl Viewport {
    pub fn classify(width_px: u32) -> Self {
        if width_px < COMPACT_BREAKPOINT_PX {
            Viewport::Compact
        } else {
            Viewport::Desktop
        }
    }
}

/// Immutable, validated sequence of at least two shots.
#[derive(Clone, Debug, PartialEq)]
pub struct ShotList {
    shots: Vec<Shot>,
}

impl ShotList {
    pub fn new(shots: Vec<Shot>) -> Result<Self, ShotListError> {
        if shots.len() < 2 {
            return Err(ShotListError::TooFewShots { found: shots.len() });
        }
        if let Some(index) = shots.iter().position(|s| !s.is_finite()) {
            return Err(ShotListError::NonFinite { index });
        }
        Ok(Self { shots })
    }

    /// Reveal, Ingredients, Benefit, Offer.
    pub fn preset(viewport: Viewport) -> Self {
        let shots = match viewport {
            Viewport::Desktop => vec![
                Shot::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::ZERO),
                Shot::new(
                    Vec3::new(0.0, 0.1, 4.6),
                    Vec3::new(0.0, 0.05, 0.0),
                    Vec3::new(-1.6, 0.1, 0.0),
                ),
                Shot::new(
                    Vec3::new(0.0, -0.1, 4.6),
                    Vec3::new(0.0, -0.05, 0.0),
                    Vec3::new(1.6, -0.1, 0.0),
                ),
                Shot::new(
                    Vec3::new(0.0, 0.0, 4.2),
                    Vec3::ZERO,
                    Vec3::new(0.0, -0.2, 1.0),
                ),
            ],
            // Narrow screens: object moves vertically and the camera sits further back.
            Viewport::Compact => vec![
                Shot::new(Vec3::new(0.0, 0.0, 6.5), Vec3::ZERO, Vec3::ZERO),
                Shot::new(
                    Vec3::new(0.0, 0.0, 6.2),
                    Vec3::ZERO,
                    Vec3::new(-0.35, 0.7, 0.0),
                ),
                Shot::new(
                    Vec3::new(0.0, 0.0, 6.2),
                    Vec3::ZERO,
                    Vec3::new(0.35, -0.7, 0.0),
                ),
                Shot::new(
                    Vec3::new(0.0, 0.0, 5.8),
                    Vec3::ZERO,
                    Vec3::new(0.0, -0.1, 0.6),
                ),
            ],
        };
        Self { shots }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shots.len()
    }

    /// Always false; kept alongside `len` for the usual pairing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.shots.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Shot> {
        self.shots.get(index)
    }

    #[inline]
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    #[inline]
    pub fn first(&self) -> &Shot {
        &self.shots[0]
    }

    #[inline]
    pub fn last(&self) -> &Shot {
        &self.shots[self.shots.len() - 1]
    }
}
