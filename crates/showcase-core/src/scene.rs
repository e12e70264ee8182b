//! One showcase sequence: owns every component, the GPU resources and the
//! product image request, and advances them in a fixed order per frame.
//!
//! Lifecycle: `Uninitialized → Loading → Ready → Disposed`. The scene renders
//! while `Loading` (backdrop, lights and particles, no product image) and only
//! becomes `Ready` once the image is decoded and uploaded.

use crate::camera::{compute_camera, Camera, CameraPose, CameraRig};
use crate::clock::AnimationClock;
use crate::config::ShowcaseParams;
use crate::constants::{CLEAR_COLOR, MAX_TEXTURE_ATTEMPTS};
use crate::error::{GpuError, SceneError};
use crate::gpu::{BufferKind, DrawCall, DrawList, GpuResource, ProgramKind, SharedBackend};
use crate::lighting::{compute_lights, LightSet, LightingRig};
use crate::material::{
    pointer_to_uv, MaterialMode, MaterialState, ProceduralMaterial, Shading, SurfaceSample,
};
use crate::particles::{edge_fade, ParticleField};
use crate::phase::{phase_for, Phase};
use crate::product::ProductDescriptor;
use crate::scroll::{ScrollState, ScrollTracker};
use crate::shots::{Shot, ShotList, Viewport};
use crate::texture::{ImageSource, PendingTexture};
use crate::uniforms::{uv_grid, unit_quad, ParticlePacked, SceneUniforms, UniformInputs, UvVertex};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Loading,
    Ready,
    Disposed,
}

/// Input snapshot sampled by the host at the top of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneInputs {
    /// Normalized scroll progress in \[0, 1\].
    pub scroll: f32,
    /// Pointer in \[-1, 1\]².
    pub pointer: Vec2,
}

/// Everything computed for one frame, all from the same sampled offset.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub frame_index: u64,
    /// Seconds since construction.
    pub elapsed: f64,
    pub scroll: ScrollState,
    pub phase: Phase,
    pub phase_changed: bool,
    /// Undamped choreography target for this offset.
    pub target_pose: CameraPose,
    /// Pose actually applied to the render camera.
    pub pose: CameraPose,
    pub object_rotation_y: f32,
    pub lights: LightSet,
    pub material: MaterialState,
    pub pointer_sample: SurfaceSample,
    pub lifecycle: Lifecycle,
    pub texture_failed: bool,
    pub material_fallback: bool,
    pub numeric_faults: u32,
}

type PhaseCallback = Box<dyn FnMut(Phase)>;
type StoreLocatorCallback = Box<dyn FnMut()>;

struct SceneGpu {
    surface_program: GpuResource,
    image_program: Option<GpuResource>,
    particle_program: Option<GpuResource>,
    grid: GpuResource,
    grid_vertices: u32,
    quad: GpuResource,
    quad_vertices: u32,
    particle_instances: GpuResource,
    uniforms: GpuResource,
    texture: Option<GpuResource>,
    fallback: bool,
}

fn optional_program(backend: &SharedBackend, kind: ProgramKind) -> Option<GpuResource> {
    match GpuResource::program(backend, kind) {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("[scene] {:?} program unavailable: {}", kind, e);
            None
        }
    }
}

fn vertex_buffer(backend: &SharedBackend, vertices: &[UvVertex]) -> Result<(GpuResource, u32), GpuError> {
    let bytes: &[u8] = bytemuck::cast_slice(vertices);
    let buf = GpuResource::buffer(backend, BufferKind::Vertex, bytes.len() as u64)?;
    buf.write(0, bytes)?;
    Ok((buf, vertices.len() as u32))
}

impl SceneGpu {
    // Any early return drops what was already acquired, releasing it.
    fn acquire(backend: &SharedBackend, params: &ShowcaseParams) -> Result<Self, GpuError> {
        let (surface_program, fallback) =
            match GpuResource::program(backend, ProgramKind::ProceduralSurface) {
                Ok(p) => (p, false),
                Err(e) => {
                    log::warn!("[scene] surface program failed ({}), substituting flat material", e);
                    (GpuResource::program(backend, ProgramKind::Flat)?, true)
                }
            };
        let image_program = optional_program(backend, ProgramKind::ImagePlane);
        let particle_program = optional_program(backend, ProgramKind::Particles);
        let (grid, grid_vertices) = vertex_buffer(backend, &uv_grid(params.surface_grid_res))?;
        let (quad, quad_vertices) = vertex_buffer(backend, &unit_quad())?;
        let instance_bytes =
            (params.particle_count.max(1) * std::mem::size_of::<ParticlePacked>()) as u64;
        let particle_instances = GpuResource::buffer(backend, BufferKind::Instance, instance_bytes)?;
        let uniforms = GpuResource::buffer(
            backend,
            BufferKind::Uniform,
            std::mem::size_of::<SceneUniforms>() as u64,
        )?;
        Ok(Self {
            surface_program,
            image_program,
            particle_program,
            grid,
            grid_vertices,
            quad,
            quad_vertices,
            particle_instances,
            uniforms,
            texture: None,
            fallback,
        })
    }

    fn resource_count(&self) -> usize {
        6 + usize::from(self.image_program.is_some())
            + usize::from(self.particle_program.is_some())
            + usize::from(self.texture.is_some())
    }
}

/// Collects construction inputs; callbacks are registered here and nowhere else.
pub struct SceneBuilder {
    product: ProductDescriptor,
    params: ShowcaseParams,
    shots: Option<Vec<Shot>>,
    aspect: f32,
    on_phase_change: Option<PhaseCallback>,
    on_store_locator: Option<StoreLocatorCallback>,
}

impl SceneBuilder {
    pub fn new(product: ProductDescriptor) -> Self {
        Self {
            product,
            params: ShowcaseParams::default(),
            shots: None,
            aspect: 16.0 / 9.0,
            on_phase_change: None,
            on_store_locator: None,
        }
    }

    pub fn params(mut self, params: ShowcaseParams) -> Self {
        self.params = params;
        self
    }

    /// Custom choreography instead of the viewport preset.
    pub fn shots(mut self, shots: Vec<Shot>) -> Self {
        self.shots = Some(shots);
        self
    }

    pub fn aspect(mut self, aspect: f32) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self
    }

    pub fn on_phase_change(mut self, f: impl FnMut(Phase) + 'static) -> Self {
        self.on_phase_change = Some(Box::new(f));
        self
    }

    pub fn on_store_locator(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_store_locator = Some(Box::new(f));
        self
    }

    pub fn build(
        self,
        backend: SharedBackend,
        source: Box<dyn ImageSource>,
    ) -> Result<Scene, SceneError> {
        let params = self.params;
        params.validate()?;
        let shots = match self.shots {
            Some(v) => ShotList::new(v)?,
            None => ShotList::preset(params.viewport),
        };
        log::info!(
            "[scene] building '{}' ({:?}, {} shots)",
            self.product.name,
            params.viewport,
            shots.len()
        );

        let gpu = SceneGpu::acquire(&backend, &params)?;
        let mode = if gpu.fallback {
            MaterialMode::Flat
        } else {
            MaterialMode::Procedural
        };
        let bounds = params.thresholds.segment_bounds(shots.len());
        let narrowest = bounds
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(1.0_f32, f32::min);

        let mut scene = Scene {
            tracker: ScrollTracker::new(params.scroll_damping_rate, narrowest),
            rig: CameraRig::new(self.aspect, params.camera_damping),
            lighting: LightingRig::new(params.light_damping),
            material: ProceduralMaterial::new(self.product.theme_color, params.tint_rate, mode),
            particles: ParticleField::new(params.particle_count, params.particle_seed),
            product: self.product,
            params,
            shots,
            backend,
            source,
            gpu: Some(gpu),
            pending: None,
            image_aspect: 1.0,
            texture_failed: false,
            lifecycle: Lifecycle::Uninitialized,
            last_phase: None,
            clock: AnimationClock::default(),
            frame_index: 0,
            on_phase_change: self.on_phase_change,
            on_store_locator: self.on_store_locator,
        };
        scene.request_texture(1);
        Ok(scene)
    }
}

pub struct Scene {
    product: ProductDescriptor,
    params: ShowcaseParams,
    shots: ShotList,
    tracker: ScrollTracker,
    rig: CameraRig,
    lighting: LightingRig,
    material: ProceduralMaterial,
    particles: ParticleField,
    backend: SharedBackend,
    source: Box<dyn ImageSource>,
    gpu: Option<SceneGpu>,
    pending: Option<PendingTexture>,
    image_aspect: f32,
    texture_failed: bool,
    lifecycle: Lifecycle,
    last_phase: Option<Phase>,
    clock: AnimationClock,
    frame_index: u64,
    on_phase_change: Option<PhaseCallback>,
    on_store_locator: Option<StoreLocatorCallback>,
}

impl Scene {
    fn request_texture(&mut self, attempt: u8) {
        self.lifecycle = Lifecycle::Loading;
        if self.product.image_url.is_empty() {
            log::warn!("[texture] '{}' has no image url", self.product.name);
            self.texture_failed = true;
            return;
        }
        let (pending, request) = PendingTexture::start(&self.product.image_url, attempt);
        self.pending = Some(pending);
        log::info!("[texture] requesting {} (attempt {})", self.product.image_url, attempt);
        self.source.request(request);
    }

    fn poll_texture(&mut self) {
        let Some(result) = self.pending.as_ref().and_then(|p| p.poll()) else {
            return;
        };
        let attempt = self.pending.take().map(|p| p.attempt).unwrap_or(1);
        match result {
            Ok(image) => match GpuResource::texture(&self.backend, &image) {
                Ok(tex) => {
                    if let Some(gpu) = self.gpu.as_mut() {
                        gpu.texture = Some(tex);
                    }
                    self.image_aspect = image.aspect();
                    self.lifecycle = Lifecycle::Ready;
                    log::info!("[texture] ready {}x{}", image.width, image.height);
                }
                Err(e) => {
                    log::error!("[texture] upload failed: {}", e);
                    self.texture_failed = true;
                }
            },
            Err(e) if attempt < MAX_TEXTURE_ATTEMPTS => {
                log::warn!("[texture] attempt {} failed: {}; retrying", attempt, e);
                self.request_texture(attempt + 1);
            }
            Err(e) => {
                log::error!("[texture] giving up on {}: {}", self.product.image_url, e);
                self.texture_failed = true;
            }
        }
    }

    /// Advance one frame and submit it.
    ///
    /// Order: scroll tracker, phase, camera, lights, material, particles,
    /// draw. Camera and lights read the same offset.
    pub fn tick(&mut self, dt: f32, inputs: SceneInputs) -> Result<FrameState, SceneError> {
        if self.lifecycle == Lifecycle::Disposed {
            return Err(SceneError::Disposed);
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.source.poll();
        self.poll_texture();

        let offset = self.tracker.update(inputs.scroll, dt);
        self.tracker.set_pointer(inputs.pointer);
        let scroll = self.tracker.state();

        let phase = phase_for(offset, &self.params.thresholds);
        let phase_changed = self.last_phase != Some(phase);
        if phase_changed {
            log::debug!("[phase] {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = Some(phase);
            if let Some(cb) = self.on_phase_change.as_mut() {
                cb(phase);
            }
        }

        let target_pose = compute_camera(offset, &self.shots, &self.params.thresholds);
        self.rig.update(&target_pose, offset, dt);

        self.clock.advance(dt);
        let targets = compute_lights(offset, self.clock.wrapped());
        let lights: LightSet = self.lighting.update(&targets, dt).iter().copied().collect();

        let material = self.material.update(dt, scroll.pointer);
        let shading = Shading {
            eye: self.rig.camera().eye,
            lights: &lights,
        };
        let pointer_sample = self.material.sample(pointer_to_uv(scroll.pointer), &shading);

        self.particles.advance(dt);

        self.submit(offset, &lights, material)?;
        self.frame_index += 1;

        Ok(FrameState {
            frame_index: self.frame_index,
            elapsed: self.clock.seconds(),
            scroll,
            phase,
            phase_changed,
            target_pose,
            pose: self.rig.pose(),
            object_rotation_y: self.rig.object_rotation_y(),
            lights,
            material,
            pointer_sample,
            lifecycle: self.lifecycle,
            texture_failed: self.texture_failed,
            material_fallback: self.material.mode() == MaterialMode::Flat,
            numeric_faults: self.material.faults(),
        })
    }

    fn submit(
        &mut self,
        offset: f32,
        lights: &[crate::lighting::Light],
        material: MaterialState,
    ) -> Result<(), SceneError> {
        let Some(gpu) = self.gpu.as_ref() else {
            return Ok(());
        };
        let uniforms = SceneUniforms::pack(&UniformInputs {
            rig: &self.rig,
            lights,
            material,
            mode: self.material.mode(),
            offset,
            elapsed: self.clock.wrapped(),
            image_aspect: self.image_aspect,
        });
        gpu.uniforms.write(0, bytemuck::bytes_of(&uniforms))?;

        let mut calls: SmallVec<[DrawCall; 4]> = SmallVec::new();
        calls.push(DrawCall {
            program: gpu.surface_program.handle(),
            uniforms: gpu.uniforms.handle(),
            vertices: gpu.grid.handle(),
            vertex_count: gpu.grid_vertices,
            instances: None,
            texture: None,
        });
        if let (Some(program), Some(texture)) = (&gpu.image_program, &gpu.texture) {
            calls.push(DrawCall {
                program: program.handle(),
                uniforms: gpu.uniforms.handle(),
                vertices: gpu.quad.handle(),
                vertex_count: gpu.quad_vertices,
                instances: None,
                texture: Some(texture.handle()),
            });
        }
        if let Some(program) = &gpu.particle_program {
            let packed: Vec<ParticlePacked> = self
                .particles
                .positions()
                .iter()
                .zip(self.particles.instances())
                .map(|(p, inst)| ParticlePacked {
                    position_scale: p.extend(inst.scale * edge_fade(p.y)).to_array(),
                })
                .collect();
            if !packed.is_empty() {
                gpu.particle_instances
                    .write(0, bytemuck::cast_slice(&packed))?;
                calls.push(DrawCall {
                    program: program.handle(),
                    uniforms: gpu.uniforms.handle(),
                    vertices: gpu.quad.handle(),
                    vertex_count: gpu.quad_vertices,
                    instances: Some((gpu.particle_instances.handle(), packed.len() as u32)),
                    texture: None,
                });
            }
        }

        let list = DrawList {
            clear_color: CLEAR_COLOR,
            calls,
        };
        self.backend.borrow_mut().submit(&list).map_err(|e| {
            log::error!("[gpu] submit failed: {}", e);
            SceneError::Gpu(e)
        })
    }

    /// Fire the store-locator callback if the Offer call-to-action is live.
    pub fn activate_offer(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Disposed || self.last_phase != Some(Phase::Offer) {
            return false;
        }
        log::info!("[scene] store locator requested for '{}'", self.product.name);
        if let Some(cb) = self.on_store_locator.as_mut() {
            cb();
        }
        true
    }

    pub fn set_theme_color(&mut self, color: Vec3) {
        self.product.theme_color = color;
        self.material.set_theme_color(color);
    }

    /// Update the aspect ratio. Returns true when the viewport class changed
    /// and the host should rebuild the scene with the other shot preset.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.rig.set_aspect(width as f32 / height as f32);
        Viewport::classify(width) != self.params.viewport
    }

    /// Release every GPU resource and drop callbacks. Idempotent.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        let released = self.gpu.take().map(|g| g.resource_count()).unwrap_or(0);
        // dropping the pending slot turns any in-flight completion into a no-op
        self.pending = None;
        self.on_phase_change = None;
        self.on_store_locator = None;
        self.lifecycle = Lifecycle::Disposed;
        log::info!(
            "[scene] disposed '{}' after {} frames, released {} gpu resources",
            self.product.name,
            self.frame_index,
            released
        );
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn phase(&self) -> Option<Phase> {
        self.last_phase
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.tracker.offset()
    }

    #[inline]
    pub fn product(&self) -> &ProductDescriptor {
        &self.product
    }

    #[inline]
    pub fn params(&self) -> &ShowcaseParams {
        &self.params
    }

    #[inline]
    pub fn shots(&self) -> &ShotList {
        &self.shots
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        self.rig.camera()
    }

    #[inline]
    pub fn material_mode(&self) -> MaterialMode {
        self.material.mode()
    }

    #[inline]
    pub fn texture_failed(&self) -> bool {
        self.texture_failed
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.dispose();
    }
}
