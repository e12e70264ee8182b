// Light intensities as functions of offset, and the damped lighting rig.

use showcase_core::damping::smoothing_factor;
use showcase_core::*;

#[test]
fn rim_decays_monotonically() {
    let mut prev = f32::INFINITY;
    for i in 0..=100 {
        let v = rim_intensity(i as f32 / 100.0);
        assert!(v <= prev);
        prev = v;
    }
    assert_eq!(rim_intensity(0.0), RIM_INTENSITY_START);
    assert!((rim_intensity(1.0) - RIM_INTENSITY_END).abs() < 1e-6);
}

#[test]
fn fill_holds_until_ramp_start_then_rises() {
    assert_eq!(fill_intensity(0.0), FILL_INTENSITY_MIN);
    assert_eq!(fill_intensity(FILL_RAMP_START), FILL_INTENSITY_MIN);
    assert!(fill_intensity(0.75) > FILL_INTENSITY_MIN);
    assert!((fill_intensity(1.0) - FILL_INTENSITY_MAX).abs() < 1e-6);
    let mut prev = 0.0;
    for i in 0..=100 {
        let v = fill_intensity(i as f32 / 100.0);
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn key_orbits_at_fixed_radius_and_height() {
    for i in 0..50 {
        let p = key_position(i as f32 * 0.7);
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!((r - KEY_ORBIT_RADIUS).abs() < 1e-4);
        assert_eq!(p.y, KEY_ORBIT_HEIGHT);
    }
    assert!(key_position(f32::NAN).is_finite());
}

#[test]
fn compute_lights_is_pure_and_ordered() {
    let a = compute_lights(0.4, 3.0);
    let b = compute_lights(0.4, 3.0);
    assert_eq!(a, b);
    let kinds: Vec<LightKind> = a.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LightKind::Rim, LightKind::Fill, LightKind::Key]);
}

#[test]
fn rig_copies_first_then_damps() {
    let mut rig = LightingRig::new(LIGHT_DAMPING);
    let start = compute_lights(0.0, 0.0);
    let target = compute_lights(1.0, 0.0);
    assert_eq!(rig.update(&start, 0.1), start.as_slice());

    let dt = 1.0 / 60.0;
    let alpha = smoothing_factor(LIGHT_DAMPING, dt);
    let lights = rig.update(&target, dt);
    let expected = start[0].intensity + (target[0].intensity - start[0].intensity) * alpha;
    assert!((lights[0].intensity - expected).abs() < 1e-5);
    // damped value sits strictly between start and target
    assert!(lights[0].intensity < start[0].intensity);
    assert!(lights[0].intensity > target[0].intensity);
}
