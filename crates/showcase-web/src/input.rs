use glam::Vec2;

/// Scroll container position to normalized progress in \[0, 1\].
///
/// Each shot segment gets an equal share of the scrollable height, so this is
/// just `scrollTop / (scrollHeight - clientHeight)`. A container that cannot
/// scroll reports 0.
#[inline]
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f32 {
    let range = scroll_height - client_height;
    if !range.is_finite() || range <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0) as f32
}

/// Client position relative to a rect, as \[-1, 1\]² with +y up.
#[inline]
pub fn pointer_ndc(x_css: f32, y_css: f32, width: f32, height: f32) -> Vec2 {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    let u = (x_css / width).clamp(0.0, 1.0);
    let v = (y_css / height).clamp(0.0, 1.0);
    Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0)
}

/// Frame delta in seconds; a hidden tab can hand us very long gaps, which the
/// tracker clamps itself, but negative or NaN deltas are dropped here.
#[inline]
pub fn frame_dt(seconds: f32) -> f32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
