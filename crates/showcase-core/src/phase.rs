//! Offset → phase and offset → segment mapping.
//!
//! Both functions are pure: no state survives between calls. Intervals are
//! closed-open so the later phase wins exactly on a threshold, and the last
//! interval is closed at 1.0.

use crate::constants::{BENEFIT_THRESHOLD, INGREDIENTS_THRESHOLD, OFFER_THRESHOLD};
use crate::error::ConfigError;
use crate::shots::{Shot, ShotList};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Reveal,
    Ingredients,
    Benefit,
    Offer,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Reveal,
        Phase::Ingredients,
        Phase::Benefit,
        Phase::Offer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Reveal => "reveal",
            Phase::Ingredients => "ingredients",
            Phase::Benefit => "benefit",
            Phase::Offer => "offer",
        }
    }
}

/// Phase breakpoints. The first two also bound the three shot segments of
/// the reference four-shot sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseThresholds {
    ingredients: f32,
    benefit: f32,
    offer: f32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            ingredients: INGREDIENTS_THRESHOLD,
            benefit: BENEFIT_THRESHOLD,
            offer: OFFER_THRESHOLD,
        }
    }
}

impl PhaseThresholds {
    pub fn new(ingredients: f32, benefit: f32, offer: f32) -> Result<Self, ConfigError> {
        let ok = [ingredients, benefit, offer].iter().all(|v| v.is_finite())
            && 0.0 < ingredients
            && ingredients < benefit
            && benefit < offer
            && offer <= 1.0;
        if !ok {
            return Err(ConfigError::Thresholds([ingredients, benefit, offer]));
        }
        Ok(Self {
            ingredients,
            benefit,
            offer,
        })
    }

    #[inline]
    pub fn values(&self) -> [f32; 3] {
        [self.ingredients, self.benefit, self.offer]
    }

    /// Interior segment boundaries for a list of `shot_count` shots.
    ///
    /// Four shots use the Ingredients/Benefit thresholds; any other count is
    /// split evenly.
    pub fn segment_bounds(&self, shot_count: usize) -> SmallVec<[f32; 8]> {
        let segments = shot_count.saturating_sub(1).max(1);
        let mut bounds = SmallVec::new();
        bounds.push(0.0);
        if segments == 3 {
            bounds.push(self.ingredients);
            bounds.push(self.benefit);
        } else {
            for i in 1..segments {
                bounds.push(i as f32 / segments as f32);
            }
        }
        bounds.push(1.0);
        bounds
    }
}

#[inline]
fn sanitize(offset: f32) -> f32 {
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(0.0, 1.0)
    }
}

pub fn phase_for(offset: f32, thresholds: &PhaseThresholds) -> Phase {
    let o = sanitize(offset);
    if o >= thresholds.offer {
        Phase::Offer
    } else if o >= thresholds.benefit {
        Phase::Benefit
    } else if o >= thresholds.ingredients {
        Phase::Ingredients
    } else {
        Phase::Reveal
    }
}

/// Active pair of shots plus the local interpolation fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<'a> {
    pub index: usize,
    pub a: &'a Shot,
    pub b: &'a Shot,
    pub t: f32,
}

pub fn segment_for<'a>(
    offset: f32,
    shots: &'a ShotList,
    thresholds: &PhaseThresholds,
) -> Segment<'a> {
    let o = sanitize(offset);
    let bounds = thresholds.segment_bounds(shots.len());
    let last = shots.segment_count() - 1;
    // Closed-open: a boundary belongs to the later segment.
    let index = bounds[1..=last]
        .iter()
        .take_while(|b| o >= **b)
        .count()
        .min(last);
    let start = bounds[index];
    let width = (bounds[index + 1] - start).max(f32::EPSILON);
    let t = ((o - start) / width).clamp(0.0, 1.0);
    Segment {
        index,
        a: &shots.shots()[index],
        b: &shots.shots()[index + 1],
        t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_for_reference_sequence_use_thresholds() {
        let th = PhaseThresholds::default();
        assert_eq!(th.segment_bounds(4).as_slice(), &[0.0, 0.33, 0.66, 1.0]);
    }

    #[test]
    fn bounds_for_other_counts_are_even() {
        let th = PhaseThresholds::default();
        assert_eq!(th.segment_bounds(2).as_slice(), &[0.0, 1.0]);
        assert_eq!(th.segment_bounds(3).as_slice(), &[0.0, 0.5, 1.0]);
    }
}
