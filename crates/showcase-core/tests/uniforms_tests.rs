// GPU layout checks for the packed uniform structs and generated geometry.

use glam::Vec2;
use showcase_core::uniforms::*;
use showcase_core::*;

#[test]
fn uniform_structs_are_16_byte_aligned() {
    assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    assert_eq!(std::mem::size_of::<SceneUniforms>(), 368);
    assert_eq!(std::mem::size_of::<LightPacked>(), 32);
    assert_eq!(std::mem::size_of::<ParticlePacked>(), 16);
    assert_eq!(std::mem::size_of::<UvVertex>(), 8);
}

#[test]
fn grid_covers_unit_square() {
    let g = uv_grid(4);
    assert_eq!(g.len(), 4 * 4 * 6);
    assert!(g
        .iter()
        .all(|v| (0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1])));
    assert_eq!(unit_quad().len(), 6);
    assert_eq!(uv_grid(0).len(), 6);
}

#[test]
fn pack_carries_frame_values() {
    let shots = ShotList::preset(Viewport::Desktop);
    let th = PhaseThresholds::default();
    let mut rig = CameraRig::new(1.0, CAMERA_DAMPING);
    rig.update(&compute_camera(0.0, &shots, &th), 0.0, 0.0);
    let lights = compute_lights(0.0, 0.0);
    let material = MaterialState {
        time: 2.0,
        mouse: Vec2::ZERO,
        env_color: chrome_tint_vec3(),
    };
    let u = SceneUniforms::pack(&UniformInputs {
        rig: &rig,
        lights: &lights,
        material,
        mode: MaterialMode::Flat,
        offset: 0.25,
        elapsed: 3.0,
        image_aspect: 0.5,
    });
    assert_eq!(u.mouse_time, [0.5, 0.5, 2.0, 1.0]);
    assert_eq!(u.env_color[3], 0.25);
    assert_eq!(u.camera_pos[3], 3.0);
    assert_eq!(u.image[2], 0.5);
    assert_eq!(u.lights[0].position_intensity[3], RIM_INTENSITY_START);
    assert_eq!(u.lights[2].color_kind[3], 2.0);
}
