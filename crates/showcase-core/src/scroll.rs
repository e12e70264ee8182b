//! Scroll progress tracking.
//!
//! The host hands in a normalized raw offset (already mapped from its scroll
//! container to \[0, 1\]) and a pointer position in \[-1, 1\]². The tracker
//! produces the damped offset every other component reads for the frame.

use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub raw_offset: f32,
    pub damped_offset: f32,
    pub pointer: Vec2,
}

#[derive(Clone, Debug)]
pub struct ScrollTracker {
    state: ScrollState,
    damping_rate: f32,
    max_step: f32,
}

impl ScrollTracker {
    /// `max_step` bounds how far the damped offset may move in a single
    /// update; the scene passes the narrowest segment width so a long frame
    /// (backgrounded tab) cannot skip past a whole shot.
    pub fn new(damping_rate: f32, max_step: f32) -> Self {
        Self {
            state: ScrollState::default(),
            damping_rate,
            max_step: max_step.clamp(f32::EPSILON, 1.0),
        }
    }

    pub fn update(&mut self, raw_offset: f32, dt: f32) -> f32 {
        if raw_offset.is_finite() {
            self.state.raw_offset = raw_offset.clamp(0.0, 1.0);
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let alpha = (self.damping_rate * dt).min(1.0);
        let step = ((self.state.raw_offset - self.state.damped_offset) * alpha)
            .clamp(-self.max_step, self.max_step);
        self.state.damped_offset = (self.state.damped_offset + step).clamp(0.0, 1.0);
        self.state.damped_offset
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        if pointer.is_finite() {
            self.state.pointer = pointer.clamp(Vec2::splat(-1.0), Vec2::ONE);
        }
    }

    /// Jump both offsets to `offset` without smoothing.
    pub fn reset(&mut self, offset: f32) {
        let o = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state.raw_offset = o;
        self.state.damped_offset = o;
    }

    #[inline]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.state.damped_offset
    }

    #[inline]
    pub fn damping_rate(&self) -> f32 {
        self.damping_rate
    }
}
