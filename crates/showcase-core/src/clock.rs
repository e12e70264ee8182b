use crate::constants::TIME_WRAP_PERIOD;

/// Seconds since scene start.
///
/// Accumulated in `f64` so a display left running for days keeps its frame
/// steps exact; the `f32` view handed to shaders and periodic terms is
/// wrapped to [`TIME_WRAP_PERIOD`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationClock {
    seconds: f64,
}

impl AnimationClock {
    /// Non-finite and negative steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.seconds += f64::from(dt);
        }
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    #[inline]
    pub fn wrapped(&self) -> f32 {
        wrap_time(self.seconds)
    }
}

#[inline]
pub fn wrap_time(seconds: f64) -> f32 {
    seconds.rem_euclid(TIME_WRAP_PERIOD) as f32
}
