// Scene lifecycle against a counting GPU double.

mod common;

use common::*;
use glam::{Vec2, Vec3};
use showcase_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn build(backend: &SharedBackend, source: &ManualImageSource) -> Scene {
    SceneBuilder::new(product())
        .build(backend.clone(), Box::new(source.clone()))
        .unwrap()
}

fn scroll_to(scene: &mut Scene, target: f32, frames: usize) -> FrameState {
    let mut last = None;
    for _ in 0..frames {
        last = Some(
            scene
                .tick(
                    DT,
                    SceneInputs {
                        scroll: target,
                        pointer: Vec2::ZERO,
                    },
                )
                .unwrap(),
        );
    }
    last.unwrap()
}

#[test]
fn renders_while_loading_then_becomes_ready() {
    let (counts, backend) = counting_backend();
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);
    assert_eq!(scene.lifecycle(), Lifecycle::Loading);
    assert_eq!(source.pending(), 1);

    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert_eq!(f.lifecycle, Lifecycle::Loading);
    // backdrop and particles, no image plane yet
    assert_eq!(counts.borrow().submitted.last().unwrap().calls.len(), 2);

    let req = source.take().unwrap();
    assert_eq!(req.attempt(), 1);
    assert!(req.complete(Ok(test_image())));

    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert_eq!(f.lifecycle, Lifecycle::Ready);
    assert!(!f.texture_failed);
    assert_eq!(counts.borrow().outstanding_of(ResourceKind::Texture), 1);
    let last = counts.borrow().submitted.last().unwrap().clone();
    assert_eq!(last.calls.len(), 3);
    assert!(last.calls[1].texture.is_some());
}

#[test]
fn failed_fetch_retries_once_then_renders_without_image() {
    let (counts, backend) = counting_backend();
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);

    source
        .take()
        .unwrap()
        .complete(Err(TextureLoadError::Fetch("404".into())));
    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert!(!f.texture_failed);
    let retry = source.take().unwrap();
    assert_eq!(retry.attempt(), 2);

    retry.complete(Err(TextureLoadError::Decode("truncated".into())));
    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert!(f.texture_failed);
    assert_eq!(f.lifecycle, Lifecycle::Loading);
    assert_eq!(source.pending(), 0);

    // keeps rendering
    scene.tick(DT, SceneInputs::default()).unwrap();
    assert_eq!(counts.borrow().outstanding_of(ResourceKind::Texture), 0);
}

#[test]
fn upload_failure_is_not_refetched() {
    let (counts, backend) = counting_backend();
    counts.borrow_mut().fail_textures = true;
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);
    source.take().unwrap().complete(Ok(test_image()));
    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert!(f.texture_failed);
    assert_eq!(source.pending(), 0);
}

#[test]
fn no_image_source_gives_up_after_two_attempts() {
    let (_counts, backend) = counting_backend();
    let mut scene = SceneBuilder::new(product())
        .build(backend, Box::new(NoImageSource))
        .unwrap();
    scene.tick(DT, SceneInputs::default()).unwrap();
    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert!(f.texture_failed);
}

#[test]
fn empty_url_skips_the_request() {
    let (_counts, backend) = counting_backend();
    let source = ManualImageSource::default();
    let p = ProductDescriptor::new("Blank", "", "#fff", "");
    let scene = SceneBuilder::new(p)
        .build(backend, Box::new(source.clone()))
        .unwrap();
    assert!(scene.texture_failed());
    assert_eq!(source.pending(), 0);
}

#[test]
fn late_completion_after_dispose_is_a_no_op() {
    let (counts, backend) = counting_backend();
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);
    let req = source.take().unwrap();
    assert!(req.is_alive());

    scene.dispose();
    assert!(!req.is_alive());
    assert!(!req.complete(Ok(test_image())));
    assert_eq!(counts.borrow().outstanding(), 0);
}

#[test]
fn repeated_construct_and_dispose_leaks_nothing() {
    let (counts, backend) = counting_backend();
    for i in 0..8 {
        let source = ManualImageSource::default();
        let mut scene = build(&backend, &source);
        assert!(counts.borrow().outstanding() > 0);
        scroll_to(&mut scene, 0.5, 3);
        if i % 2 == 0 {
            source.take().unwrap().complete(Ok(test_image()));
            scroll_to(&mut scene, 0.5, 1);
            assert_eq!(scene.lifecycle(), Lifecycle::Ready);
        }
        if i % 3 == 0 {
            scene.dispose();
            scene.dispose();
        }
        // the rest are released by Drop
    }
    assert_eq!(counts.borrow().outstanding(), 0);
}

#[test]
fn surface_program_failure_falls_back_to_flat() {
    let (counts, backend) = counting_backend();
    counts
        .borrow_mut()
        .fail_programs
        .insert(ProgramKind::ProceduralSurface);
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);
    assert_eq!(scene.material_mode(), MaterialMode::Flat);
    assert!(counts.borrow().created_programs.contains(&ProgramKind::Flat));

    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert!(f.material_fallback);
    assert_eq!(f.pointer_sample.displacement, 0.0);
}

#[test]
fn optional_programs_may_be_missing() {
    let (counts, backend) = counting_backend();
    {
        let mut c = counts.borrow_mut();
        c.fail_programs.insert(ProgramKind::ImagePlane);
        c.fail_programs.insert(ProgramKind::Particles);
    }
    let source = ManualImageSource::default();
    let mut scene = build(&backend, &source);
    source.take().unwrap().complete(Ok(test_image()));
    let f = scene.tick(DT, SceneInputs::default()).unwrap();
    assert_eq!(f.lifecycle, Lifecycle::Ready);
    assert_eq!(counts.borrow().submitted.last().unwrap().calls.len(), 1);
}

#[test]
fn construction_failures_release_what_was_acquired() {
    let (counts, backend) = counting_backend();
    counts.borrow_mut().fail_buffers = true;
    let source = ManualImageSource::default();
    let res = SceneBuilder::new(product()).build(backend.clone(), Box::new(source.clone()));
    assert!(matches!(res.err(), Some(SceneError::Gpu(GpuError::Allocation { .. }))));
    assert_eq!(counts.borrow().outstanding(), 0);
    assert_eq!(source.pending(), 0);

    let (counts, backend) = counting_backend();
    {
        let mut c = counts.borrow_mut();
        c.fail_programs.insert(ProgramKind::ProceduralSurface);
        c.fail_programs.insert(ProgramKind::Flat);
    }
    let res = SceneBuilder::new(product()).build(backend, Box::new(NoImageSource));
    assert_eq!(
        res.err(),
        Some(SceneError::Gpu(GpuError::ShaderCompile {
            program: ProgramKind::Flat
        }))
    );
    assert_eq!(counts.borrow().outstanding(), 0);
}

#[test]
fn too_few_shots_refuses_construction() {
    let (counts, backend) = counting_backend();
    let res = SceneBuilder::new(product())
        .shots(vec![Shot::new(Vec3::Z, Vec3::ZERO, Vec3::ZERO)])
        .build(backend, Box::new(NoImageSource));
    assert_eq!(
        res.err(),
        Some(SceneError::Config(ConfigError::ShotList(
            ShotListError::TooFewShots { found: 1 }
        )))
    );
    assert_eq!(counts.borrow().outstanding(), 0);
}

#[test]
fn invalid_params_refuse_construction() {
    let (_counts, backend) = counting_backend();
    let params = ShowcaseParams {
        camera_damping: 0.0,
        ..ShowcaseParams::default()
    };
    let res = SceneBuilder::new(product())
        .params(params)
        .build(backend, Box::new(NoImageSource));
    assert!(matches!(
        res.err(),
        Some(SceneError::Config(ConfigError::DampingRate { what: "camera", .. }))
    ));
}

#[test]
fn phase_callback_fires_once_per_transition() {
    let (_counts, backend) = counting_backend();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut scene = SceneBuilder::new(product())
        .on_phase_change(move |p| sink.borrow_mut().push(p))
        .build(backend, Box::new(NoImageSource))
        .unwrap();

    scroll_to(&mut scene, 0.0, 10);
    assert_eq!(*seen.borrow(), vec![Phase::Reveal]);

    let f = scroll_to(&mut scene, 1.0, 600);
    assert_eq!(f.phase, Phase::Offer);
    assert_eq!(*seen.borrow(), Phase::ALL.to_vec());
}

#[test]
fn camera_and_lights_share_the_frame_offset() {
    let (_counts, backend) = counting_backend();
    let mut scene = build(&backend, &ManualImageSource::default());
    let th = PhaseThresholds::default();
    for _ in 0..30 {
        let f = scene
            .tick(
                DT,
                SceneInputs {
                    scroll: 0.8,
                    pointer: Vec2::new(0.3, -0.2),
                },
            )
            .unwrap();
        let o = f.scroll.damped_offset;
        assert_eq!(f.target_pose, compute_camera(o, scene.shots(), &th));
        assert_eq!(f.phase, phase_for(o, &th));
        assert_eq!(f.object_rotation_y, object_rotation_y(o));
    }
}

#[test]
fn store_locator_only_fires_in_offer() {
    let (_counts, backend) = counting_backend();
    let fired = Rc::new(Cell::new(0));
    let hits = fired.clone();
    let mut scene = SceneBuilder::new(product())
        .on_store_locator(move || hits.set(hits.get() + 1))
        .build(backend, Box::new(NoImageSource))
        .unwrap();

    assert!(!scene.activate_offer());
    scroll_to(&mut scene, 0.5, 120);
    assert!(!scene.activate_offer());
    scroll_to(&mut scene, 1.0, 600);
    assert!(scene.activate_offer());
    assert_eq!(fired.get(), 1);

    scene.dispose();
    assert!(!scene.activate_offer());
    assert_eq!(fired.get(), 1);
}

#[test]
fn tick_after_dispose_is_an_error() {
    let (_counts, backend) = counting_backend();
    let mut scene = build(&backend, &ManualImageSource::default());
    scene.dispose();
    assert_eq!(scene.lifecycle(), Lifecycle::Disposed);
    assert_eq!(
        scene.tick(DT, SceneInputs::default()).err(),
        Some(SceneError::Disposed)
    );
}

#[test]
fn resize_reports_viewport_class_changes() {
    let (_counts, backend) = counting_backend();
    let mut scene = build(&backend, &ManualImageSource::default());
    assert!(!scene.resize(1280, 720));
    assert!((scene.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    assert!(scene.resize(390, 844));
    assert!(!scene.resize(0, 844));
}

#[test]
fn compact_params_use_the_compact_preset() {
    let (_counts, backend) = counting_backend();
    let scene = SceneBuilder::new(product())
        .params(ShowcaseParams::for_viewport(Viewport::Compact))
        .build(backend, Box::new(NoImageSource))
        .unwrap();
    assert_eq!(scene.shots(), &ShotList::preset(Viewport::Compact));
}

#[test]
fn theme_colour_restarts_the_tint() {
    let (_counts, backend) = counting_backend();
    let mut scene = build(&backend, &ManualImageSource::default());
    scroll_to(&mut scene, 0.0, 5);
    scene.set_theme_color(Vec3::new(0.9, 0.1, 0.1));
    assert_eq!(scene.product().theme_color, Vec3::new(0.9, 0.1, 0.1));
    let f = scroll_to(&mut scene, 0.0, 1);
    assert!(f.material.env_color.x > 0.85);
}
