// Shared test doubles: a GPU backend that only counts handles and an image
// source that parks requests until the test completes them by hand.

#![allow(dead_code)]

use fnv::{FnvHashMap, FnvHashSet};
use showcase_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
pub struct CountingBackend {
    live: FnvHashMap<u64, ResourceKind>,
    next_id: u64,
    pub fail_programs: FnvHashSet<ProgramKind>,
    pub fail_textures: bool,
    pub fail_buffers: bool,
    pub created_programs: Vec<ProgramKind>,
    pub submitted: Vec<DrawList>,
    pub bytes_written: u64,
}

impl CountingBackend {
    pub fn outstanding(&self) -> usize {
        self.live.len()
    }

    pub fn outstanding_of(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    fn alloc(&mut self, kind: ResourceKind) -> GpuHandle {
        self.next_id += 1;
        self.live.insert(self.next_id, kind);
        GpuHandle {
            kind,
            id: self.next_id,
        }
    }
}

impl GpuBackend for CountingBackend {
    fn create_texture(&mut self, _image: &ImageData) -> Result<GpuHandle, GpuError> {
        if self.fail_textures {
            return Err(GpuError::Allocation {
                what: "texture".into(),
            });
        }
        Ok(self.alloc(ResourceKind::Texture))
    }

    fn create_program(&mut self, kind: ProgramKind) -> Result<GpuHandle, GpuError> {
        if self.fail_programs.contains(&kind) {
            return Err(GpuError::ShaderCompile { program: kind });
        }
        self.created_programs.push(kind);
        Ok(self.alloc(ResourceKind::Program))
    }

    fn create_buffer(&mut self, kind: BufferKind, _size: u64) -> Result<GpuHandle, GpuError> {
        if self.fail_buffers {
            return Err(GpuError::Allocation {
                what: format!("{:?} buffer", kind),
            });
        }
        Ok(self.alloc(ResourceKind::Buffer))
    }

    fn write_buffer(&mut self, buffer: GpuHandle, _offset: u64, data: &[u8]) -> Result<(), GpuError> {
        if !self.live.contains_key(&buffer.id) {
            return Err(GpuError::UnknownHandle(buffer.id));
        }
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    fn release(&mut self, handle: GpuHandle) {
        assert!(
            self.live.remove(&handle.id).is_some(),
            "double release of {:?}",
            handle
        );
    }

    fn submit(&mut self, draws: &DrawList) -> Result<(), GpuError> {
        for call in &draws.calls {
            assert!(self.live.contains_key(&call.program.id));
            assert!(self.live.contains_key(&call.vertices.id));
        }
        self.submitted.push(draws.clone());
        Ok(())
    }
}

pub fn counting_backend() -> (Rc<RefCell<CountingBackend>>, SharedBackend) {
    let concrete = Rc::new(RefCell::new(CountingBackend::default()));
    let shared: SharedBackend = concrete.clone();
    (concrete, shared)
}

/// Parks requests; tests pull them out and complete them.
#[derive(Clone, Default)]
pub struct ManualImageSource {
    pub requests: Rc<RefCell<Vec<TextureRequest>>>,
}

impl ImageSource for ManualImageSource {
    fn request(&mut self, request: TextureRequest) {
        self.requests.borrow_mut().push(request);
    }
}

impl ManualImageSource {
    pub fn take(&self) -> Option<TextureRequest> {
        let mut q = self.requests.borrow_mut();
        if q.is_empty() {
            None
        } else {
            Some(q.remove(0))
        }
    }

    pub fn pending(&self) -> usize {
        self.requests.borrow().len()
    }
}

pub fn test_image() -> ImageData {
    ImageData::new(2, 4, vec![255; 2 * 4 * 4]).unwrap()
}

pub fn product() -> ProductDescriptor {
    ProductDescriptor::new(
        "Night Serum",
        "https://cdn.example.test/serum.png",
        "#3a2f6b",
        "Overnight repair serum",
    )
}

pub const DT: f32 = 1.0 / 60.0;
