//! Camera choreography.
//!
//! `compute_camera` is the pure target pose for an offset; `CameraRig` owns the
//! render camera and chases that target with exponential damping so a fling
//! never teleports the view.

use crate::constants::{CAMERA_FOVY_RADIANS, CAMERA_ZFAR, CAMERA_ZNEAR, REFERENCE_EYE};
use crate::damping::{damp_vec3, smoothing_factor};
use crate::phase::{segment_for, PhaseThresholds};
use crate::shots::ShotList;
use glam::{Mat4, Quat, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from(REFERENCE_EYE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect.max(1e-3), self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera and object placement for one offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    pub object_position: Vec3,
}

impl CameraPose {
    /// Largest per-component distance to `other`, used by continuity checks.
    pub fn max_delta(&self, other: &CameraPose) -> f32 {
        let d = [
            (self.position - other.position).abs().max_element(),
            (self.look_at - other.look_at).abs().max_element(),
            (self.object_position - other.object_position).abs().max_element(),
        ];
        d.into_iter().fold(0.0, f32::max)
    }
}

// Weighted form so t = 0 and t = 1 reproduce the endpoints bit for bit.
#[inline]
fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

pub fn compute_camera(offset: f32, shots: &ShotList, thresholds: &PhaseThresholds) -> CameraPose {
    let seg = segment_for(offset, shots, thresholds);
    CameraPose {
        position: mix(seg.a.camera_position, seg.b.camera_position, seg.t),
        look_at: mix(seg.a.camera_look_at, seg.b.camera_look_at, seg.t),
        object_position: mix(seg.a.object_position, seg.b.object_position, seg.t),
    }
}

/// Continuous spin across the whole sequence, independent of shots.
#[inline]
pub fn object_rotation_y(offset: f32) -> f32 {
    offset * std::f32::consts::TAU
}

pub struct CameraRig {
    camera: Camera,
    object_position: Vec3,
    object_rotation_y: f32,
    damping: f32,
    initialized: bool,
}

impl CameraRig {
    pub fn new(aspect: f32, damping: f32) -> Self {
        Self {
            camera: Camera::new(aspect),
            object_position: Vec3::ZERO,
            object_rotation_y: 0.0,
            damping,
            initialized: false,
        }
    }

    /// Place the rig exactly on `pose`, skipping damping.
    pub fn snap(&mut self, pose: &CameraPose, offset: f32) {
        self.camera.eye = pose.position;
        self.camera.target = pose.look_at;
        self.object_position = pose.object_position;
        self.object_rotation_y = object_rotation_y(offset);
        self.initialized = true;
    }

    /// One damped step toward `target`. The first call snaps.
    pub fn update(&mut self, target: &CameraPose, offset: f32, dt: f32) {
        if !self.initialized {
            self.snap(target, offset);
            return;
        }
        self.camera.eye = damp_vec3(self.camera.eye, target.position, self.damping, dt);
        self.camera.target = damp_vec3(self.camera.target, target.look_at, self.damping, dt);
        self.object_position =
            damp_vec3(self.object_position, target.object_position, self.damping, dt);
        // offset is already damped upstream; rotation follows it directly
        self.object_rotation_y = object_rotation_y(offset);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.camera.eye,
            look_at: self.camera.target,
            object_position: self.object_position,
        }
    }

    #[inline]
    pub fn object_rotation_y(&self) -> f32 {
        self.object_rotation_y
    }

    pub fn object_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_rotation_y(self.object_rotation_y),
            self.object_position,
        )
    }

    /// Blend factor the rig applies for a frame of `dt`, exposed for tests of
    /// the recurrence.
    #[inline]
    pub fn blend_for(&self, dt: f32) -> f32 {
        smoothing_factor(self.damping, dt)
    }
}
