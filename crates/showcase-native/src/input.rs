//! Desktop stand-ins for the page scroll container: the mouse wheel moves a
//! virtual scroll position, the cursor maps to the pointer.

use glam::Vec2;

/// Virtual page height, in wheel lines, of the whole sequence.
pub const SCROLL_LINES: f32 = 60.0;
/// Pixel deltas (touchpads) per wheel line.
pub const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualScroll {
    progress: f32,
}

impl VirtualScroll {
    /// Positive `lines` scrolls down the page, i.e. forward in the sequence.
    pub fn scroll_lines(&mut self, lines: f32) {
        if lines.is_finite() {
            self.progress = (self.progress + lines / SCROLL_LINES).clamp(0.0, 1.0);
        }
    }

    pub fn scroll_pixels(&mut self, pixels: f64) {
        self.scroll_lines(pixels as f32 / PIXELS_PER_LINE);
    }

    pub fn jump_to(&mut self, progress: f32) {
        if progress.is_finite() {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

/// Window-space cursor to \[-1, 1\]² with +y up.
pub fn cursor_ndc(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::ZERO;
    }
    let u = (x / width as f64).clamp(0.0, 1.0) as f32;
    let v = (y / height as f64).clamp(0.0, 1.0) as f32;
    Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_walks_through_the_sequence() {
        let mut s = VirtualScroll::default();
        s.scroll_lines(SCROLL_LINES / 2.0);
        assert_eq!(s.progress(), 0.5);
        s.scroll_lines(SCROLL_LINES);
        assert_eq!(s.progress(), 1.0);
        s.scroll_lines(-2.0 * SCROLL_LINES);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn pixel_deltas_convert_to_lines() {
        let mut s = VirtualScroll::default();
        s.scroll_pixels((PIXELS_PER_LINE * SCROLL_LINES / 4.0) as f64);
        assert!((s.progress() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn cursor_maps_to_unit_square() {
        assert_eq!(cursor_ndc(400.0, 300.0, 800, 600), Vec2::ZERO);
        assert_eq!(cursor_ndc(0.0, 0.0, 800, 600), Vec2::new(-1.0, 1.0));
        assert_eq!(cursor_ndc(900.0, -5.0, 800, 600), Vec2::new(1.0, 1.0));
        assert_eq!(cursor_ndc(10.0, 10.0, 0, 600), Vec2::ZERO);
    }
}
