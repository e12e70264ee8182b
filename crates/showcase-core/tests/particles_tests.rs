// Ambient particle field: seeded placement and time-only motion.

use glam::Vec4;
use showcase_core::*;

#[test]
fn same_seed_same_field() {
    let a = ParticleField::new(PARTICLE_COUNT, 42);
    let b = ParticleField::new(PARTICLE_COUNT, 42);
    assert_eq!(a.instances(), b.instances());
    assert_eq!(a.len(), PARTICLE_COUNT);

    let c = ParticleField::new(PARTICLE_COUNT, 43);
    assert_ne!(a.instances(), c.instances());
}

#[test]
fn particles_stay_inside_the_loop() {
    let mut f = ParticleField::new(64, PARTICLE_SEED);
    for _ in 0..2000 {
        f.advance(0.05);
        for p in f.positions() {
            assert!(p.y >= PARTICLE_FLOOR_Y);
            assert!(p.y < PARTICLE_FLOOR_Y + PARTICLE_LOOP_LENGTH + 1e-3);
            assert!(p.is_finite());
        }
    }
}

#[test]
fn advance_ignores_bad_dt() {
    let mut f = ParticleField::new(8, 1);
    f.advance(0.5);
    let before = f.positions().to_vec();
    f.advance(f32::NAN);
    f.advance(-2.0);
    assert_eq!(f.elapsed(), 0.5);
    assert_eq!(f.positions(), before.as_slice());
}

#[test]
fn position_matches_instance_formula() {
    let mut f = ParticleField::new(4, 9);
    f.advance(1.5);
    for (p, inst) in f.positions().iter().zip(f.instances()) {
        assert_eq!(*p, inst.position_at(1.5));
    }
}

#[test]
fn empty_field_is_fine() {
    let mut f = ParticleField::new(0, 1);
    f.advance(1.0);
    assert!(f.is_empty());
}

fn viewports() -> [(Viewport, f32); 2] {
    [(Viewport::Desktop, 16.0 / 9.0), (Viewport::Compact, 390.0 / 844.0)]
}

#[test]
fn wrap_band_is_never_on_screen() {
    let th = PhaseThresholds::default();
    let top = PARTICLE_FLOOR_Y + PARTICLE_LOOP_LENGTH;
    // everything from the fade band outward must be off screen
    let heights = [
        PARTICLE_FLOOR_Y,
        PARTICLE_FLOOR_Y + PARTICLE_EDGE_FADE,
        top - PARTICLE_EDGE_FADE,
        top,
    ];
    let reach_x = PARTICLE_SPREAD_X + PARTICLE_SWAY;
    let radius = PARTICLE_SCALE_RANGE[1];
    for (viewport, aspect) in viewports() {
        let shots = ShotList::preset(viewport);
        for i in 0..=20 {
            let offset = i as f32 / 20.0;
            let pose = compute_camera(offset, &shots, &th);
            let mut rig = CameraRig::new(aspect, CAMERA_DAMPING);
            rig.snap(&pose, offset);
            let vp = rig.camera().view_projection();
            for y in heights {
                let y = if y > 0.0 { y - radius } else { y + radius };
                for x in [-reach_x, 0.0, reach_x] {
                    for z in PARTICLE_Z_RANGE {
                        let clip = vp * Vec4::new(x, y, z, 1.0);
                        assert!(clip.w > 0.0);
                        let ndc_y = clip.y / clip.w;
                        assert!(
                            ndc_y.abs() > 1.0,
                            "{:?} offset {}: ({}, {}, {}) lands at ndc y {}",
                            viewport,
                            offset,
                            x,
                            y,
                            z,
                            ndc_y
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn edge_fade_closes_at_both_wrap_points() {
    let top = PARTICLE_FLOOR_Y + PARTICLE_LOOP_LENGTH;
    assert_eq!(edge_fade(PARTICLE_FLOOR_Y), 0.0);
    assert_eq!(edge_fade(top), 0.0);
    assert_eq!(edge_fade(0.0), 1.0);
    assert_eq!(edge_fade(f32::NAN), 0.0);
    let mut prev = 0.0;
    for i in 0..=10 {
        let f = edge_fade(PARTICLE_FLOOR_Y + PARTICLE_EDGE_FADE * i as f32 / 10.0);
        assert!(f >= prev);
        prev = f;
    }
    assert!((prev - 1.0).abs() < 1e-6);
}

#[test]
fn drift_stays_smooth_after_days() {
    let f = ParticleField::new(32, PARTICLE_SEED);
    let t = 10.0 * 24.0 * 3600.0;
    let step = 1.0 / 60.0;
    for inst in f.instances() {
        let a = inst.position_at(t);
        let b = inst.position_at(t + step);
        assert!((b.x - a.x).abs() < 0.01);
        let dy = b.y - a.y;
        let wrapped = dy < -(PARTICLE_LOOP_LENGTH - 1.0);
        assert!(wrapped || (dy - inst.speed * step as f32).abs() < 1e-3, "dy {}", dy);
    }
}
