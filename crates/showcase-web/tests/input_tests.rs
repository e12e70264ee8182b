// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn scroll_progress_maps_container_range() {
    assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 0.5);
    assert_eq!(scroll_progress(2000.0, 3000.0, 1000.0), 1.0);
}

#[test]
fn scroll_progress_clamps_overscroll() {
    // rubber-band scrolling reports negative or past-the-end offsets
    assert_eq!(scroll_progress(-40.0, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(2100.0, 3000.0, 1000.0), 1.0);
}

#[test]
fn unscrollable_container_reports_zero() {
    assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(10.0, 500.0, 800.0), 0.0);
    assert_eq!(scroll_progress(f64::NAN, 3000.0, 1000.0), 0.0);
}

#[test]
fn pointer_ndc_centre_and_corners() {
    assert_eq!(pointer_ndc(50.0, 25.0, 100.0, 50.0), Vec2::ZERO);
    assert_eq!(pointer_ndc(0.0, 0.0, 100.0, 50.0), Vec2::new(-1.0, 1.0));
    assert_eq!(pointer_ndc(100.0, 50.0, 100.0, 50.0), Vec2::new(1.0, -1.0));
}

#[test]
fn pointer_ndc_clamps_outside_rect() {
    assert_eq!(pointer_ndc(-20.0, 80.0, 100.0, 50.0), Vec2::new(-1.0, -1.0));
    assert_eq!(pointer_ndc(10.0, 10.0, 0.0, 50.0), Vec2::ZERO);
}

#[test]
fn frame_dt_drops_bad_deltas() {
    assert_eq!(frame_dt(0.016), 0.016);
    assert_eq!(frame_dt(-1.0), 0.0);
    assert_eq!(frame_dt(f32::NAN), 0.0);
}
