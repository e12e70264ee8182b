//! GPU resource boundary.
//!
//! The scene talks to the device only through [`GpuBackend`]. Every handle it
//! acquires is wrapped in a [`GpuResource`] which releases it on drop, so a
//! scene that is disposed (or fails half way through construction) gives
//! everything back without relying on anyone remembering to.

use crate::error::GpuError;
use crate::texture::ImageData;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Program,
    Buffer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GpuHandle {
    pub kind: ResourceKind,
    pub id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    ProceduralSurface,
    /// Unlit substitute for `ProceduralSurface`.
    Flat,
    ImagePlane,
    Particles,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex geometry.
    Vertex,
    /// Per-instance data.
    Instance,
    Uniform,
}

/// One draw: a program, its geometry and the resources bound to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub program: GpuHandle,
    pub uniforms: GpuHandle,
    pub vertices: GpuHandle,
    pub vertex_count: u32,
    pub instances: Option<(GpuHandle, u32)>,
    pub texture: Option<GpuHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    pub clear_color: [f64; 3],
    pub calls: SmallVec<[DrawCall; 4]>,
}

pub trait GpuBackend {
    fn create_texture(&mut self, image: &ImageData) -> Result<GpuHandle, GpuError>;
    fn create_program(&mut self, kind: ProgramKind) -> Result<GpuHandle, GpuError>;
    fn create_buffer(&mut self, kind: BufferKind, size: u64) -> Result<GpuHandle, GpuError>;
    fn write_buffer(&mut self, buffer: GpuHandle, offset: u64, data: &[u8]) -> Result<(), GpuError>;
    fn release(&mut self, handle: GpuHandle);
    /// Submit the frame's draw calls in order.
    fn submit(&mut self, draws: &DrawList) -> Result<(), GpuError>;
}

pub type SharedBackend = Rc<RefCell<dyn GpuBackend>>;

/// Scope-bound ownership of one backend handle.
pub struct GpuResource {
    handle: GpuHandle,
    backend: SharedBackend,
}

impl GpuResource {
    fn wrap(
        backend: &SharedBackend,
        create: impl FnOnce(&mut dyn GpuBackend) -> Result<GpuHandle, GpuError>,
    ) -> Result<Self, GpuError> {
        let handle = create(&mut *backend.borrow_mut())?;
        Ok(Self {
            handle,
            backend: backend.clone(),
        })
    }

    pub fn texture(backend: &SharedBackend, image: &ImageData) -> Result<Self, GpuError> {
        Self::wrap(backend, |b| b.create_texture(image))
    }

    pub fn program(backend: &SharedBackend, kind: ProgramKind) -> Result<Self, GpuError> {
        Self::wrap(backend, |b| b.create_program(kind))
    }

    pub fn buffer(backend: &SharedBackend, kind: BufferKind, size: u64) -> Result<Self, GpuError> {
        Self::wrap(backend, |b| b.create_buffer(kind, size))
    }

    pub fn write(&self, offset: u64, data: &[u8]) -> Result<(), GpuError> {
        self.backend
            .borrow_mut()
            .write_buffer(self.handle, offset, data)
    }

    #[inline]
    pub fn handle(&self) -> GpuHandle {
        self.handle
    }
}

impl Drop for GpuResource {
    fn drop(&mut self) {
        match self.backend.try_borrow_mut() {
            Ok(mut b) => b.release(self.handle),
            Err(_) => log::error!(
                "[gpu] backend busy, leaking {:?} {}",
                self.handle.kind,
                self.handle.id
            ),
        }
    }
}

impl std::fmt::Debug for GpuResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GpuResource").field(&self.handle).finish()
    }
}
