//! GPU-side layouts. Field order and 16-byte packing mirror the WGSL structs
//! in `shaders/`.

use crate::camera::CameraRig;
use crate::constants::{BACKDROP_SIZE, BACKDROP_Z, DISPLACEMENT_AMPLITUDE, IMAGE_PLANE_SIZE, RIPPLE_STRENGTH};
use crate::lighting::Light;
use crate::material::{pointer_to_uv, MaterialMode, MaterialState};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightPacked {
    pub position_intensity: [f32; 4],
    pub color_kind: [f32; 4],
}

impl From<&Light> for LightPacked {
    fn from(l: &Light) -> Self {
        Self {
            position_intensity: l.position.extend(l.intensity).to_array(),
            color_kind: l.color.extend(l.kind.index() as f32).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Product object transform (image plane).
    pub model: [[f32; 4]; 4],
    /// Backdrop transform.
    pub backdrop: [[f32; 4]; 4],
    /// xyz eye, w wrapped clock seconds.
    pub camera_pos: [f32; 4],
    /// xy mouse uv, z material time, w flat-fallback flag.
    pub mouse_time: [f32; 4],
    /// rgb smoothed tint, w damped offset.
    pub env_color: [f32; 4],
    /// displacement amplitude, ripple strength, backdrop width, backdrop height.
    pub surface: [f32; 4],
    /// image plane width, height, texture aspect, unused.
    pub image: [f32; 4],
    pub lights: [LightPacked; 3],
}

pub struct UniformInputs<'a> {
    pub rig: &'a CameraRig,
    pub lights: &'a [Light],
    pub material: MaterialState,
    pub mode: MaterialMode,
    pub offset: f32,
    pub elapsed: f32,
    pub image_aspect: f32,
}

impl SceneUniforms {
    pub fn pack(inputs: &UniformInputs<'_>) -> Self {
        let cam = inputs.rig.camera();
        let mut lights = [LightPacked::default(); 3];
        for (dst, src) in lights.iter_mut().zip(inputs.lights) {
            *dst = LightPacked::from(src);
        }
        let mouse_uv = pointer_to_uv(inputs.material.mouse);
        let flat = match inputs.mode {
            MaterialMode::Flat => 1.0,
            MaterialMode::Procedural => 0.0,
        };
        Self {
            view_proj: cam.view_projection().to_cols_array_2d(),
            model: inputs.rig.object_transform().to_cols_array_2d(),
            backdrop: Mat4::from_translation(Vec3::new(0.0, 0.0, BACKDROP_Z)).to_cols_array_2d(),
            camera_pos: cam.eye.extend(inputs.elapsed).to_array(),
            mouse_time: [mouse_uv.x, mouse_uv.y, inputs.material.time, flat],
            env_color: inputs.material.env_color.extend(inputs.offset).to_array(),
            surface: [
                DISPLACEMENT_AMPLITUDE,
                RIPPLE_STRENGTH,
                BACKDROP_SIZE[0],
                BACKDROP_SIZE[1],
            ],
            image: [
                IMAGE_PLANE_SIZE[0],
                IMAGE_PLANE_SIZE[1],
                inputs.image_aspect,
                0.0,
            ],
            lights,
        }
    }
}

/// One particle instance: xyz position, w scale.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticlePacked {
    pub position_scale: [f32; 4],
}

/// Grid/quad vertex: uv only, positions are derived in the vertex stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UvVertex {
    pub uv: [f32; 2],
}

/// Triangle-list grid of `res × res` quads over \[0, 1\]².
pub fn uv_grid(res: u32) -> Vec<UvVertex> {
    let res = res.max(1);
    let step = 1.0 / res as f32;
    let mut out = Vec::with_capacity((res * res * 6) as usize);
    for j in 0..res {
        for i in 0..res {
            let (u0, v0) = (i as f32 * step, j as f32 * step);
            let (u1, v1) = (u0 + step, v0 + step);
            for uv in [[u0, v0], [u1, v0], [u1, v1], [u0, v0], [u1, v1], [u0, v1]] {
                out.push(UvVertex { uv });
            }
        }
    }
    out
}

pub fn unit_quad() -> Vec<UvVertex> {
    uv_grid(1)
}
