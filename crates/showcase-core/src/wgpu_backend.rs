//! wgpu implementation of [`GpuBackend`], shared by the web and native frontends.
//!
//! All four programs are compiled up front inside validation error scopes;
//! a program whose scope reports an error is simply absent, and
//! `create_program` for it fails so the scene can fall back.

use crate::error::GpuError;
use crate::gpu::{BufferKind, DrawList, GpuBackend, GpuHandle, ProgramKind, ResourceKind};
use crate::texture::ImageData;
use fnv::FnvHashMap;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

struct TextureEntry {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct BufferEntry {
    buffer: wgpu::Buffer,
    // only uniform buffers get a bind group
    bind_group: Option<wgpu::BindGroup>,
}

pub struct WgpuBackend<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    uniform_bgl: wgpu::BindGroupLayout,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    depth_view: wgpu::TextureView,
    pipelines: FnvHashMap<ProgramKind, wgpu::RenderPipeline>,
    programs: FnvHashMap<u64, ProgramKind>,
    buffers: FnvHashMap<u64, BufferEntry>,
    textures: FnvHashMap<u64, TextureEntry>,
    next_id: u64,
}

fn shader_source(kind: ProgramKind) -> &'static str {
    match kind {
        ProgramKind::ProceduralSurface => crate::SURFACE_WGSL,
        ProgramKind::Flat => crate::FLAT_WGSL,
        ProgramKind::ImagePlane => crate::IMAGE_WGSL,
        ProgramKind::Particles => crate::PARTICLES_WGSL,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_tex"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn make_pipeline(
    device: &wgpu::Device,
    kind: ProgramKind,
    color_format: wgpu::TextureFormat,
    uniform_bgl: &wgpu::BindGroupLayout,
    texture_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("showcase_shader"),
        source: wgpu::ShaderSource::Wgsl(shader_source(kind).into()),
    });
    let layouts: &[&wgpu::BindGroupLayout] = match kind {
        ProgramKind::ImagePlane => &[uniform_bgl, texture_bgl],
        _ => &[uniform_bgl],
    };
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("showcase_pl"),
        bind_group_layouts: layouts,
        push_constant_ranges: &[],
    });
    let uv_layout = wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 2) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 4) as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: 1,
        }],
    };
    let with_instances = [uv_layout.clone(), instance_layout];
    let uv_only = [uv_layout];
    let buffers: &[wgpu::VertexBufferLayout] = match kind {
        ProgramKind::Particles => &with_instances,
        _ => &uv_only,
    };
    let translucent = matches!(kind, ProgramKind::ImagePlane | ProgramKind::Particles);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("showcase_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            // particles are blended over everything without occluding each other
            depth_write_enabled: kind != ProgramKind::Particles,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: translucent.then_some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

impl<'a> WgpuBackend<'a> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'a>>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(|e| GpuError::Surface(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| GpuError::Surface("no GPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| GpuError::Surface(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GpuError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_uniform_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("product_texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut pipelines = FnvHashMap::default();
        for kind in [
            ProgramKind::ProceduralSurface,
            ProgramKind::Flat,
            ProgramKind::ImagePlane,
            ProgramKind::Particles,
        ] {
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let pipeline = make_pipeline(&device, kind, format, &uniform_bgl, &texture_bgl);
            match device.pop_error_scope().await {
                None => {
                    pipelines.insert(kind, pipeline);
                }
                Some(e) => log::error!("[gpu] {:?} program failed to compile: {}", kind, e),
            }
        }
        log::info!(
            "[gpu] ready: {:?} {}x{}, {} programs",
            format,
            config.width,
            config.height,
            pipelines.len()
        );

        let depth_view = create_depth_view(&device, config.width, config.height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniform_bgl,
            texture_bgl,
            sampler,
            depth_view,
            pipelines,
            programs: FnvHashMap::default(),
            buffers: FnvHashMap::default(),
            textures: FnvHashMap::default(),
            next_id: 1,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.config.width && height == self.config.height)
        {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Live handles, for leak diagnostics.
    pub fn live_resources(&self) -> usize {
        self.programs.len() + self.buffers.len() + self.textures.len()
    }

    fn alloc(&mut self, kind: ResourceKind) -> GpuHandle {
        let id = self.next_id;
        self.next_id += 1;
        GpuHandle { kind, id }
    }
}

impl<'a> GpuBackend for WgpuBackend<'a> {
    fn create_texture(&mut self, image: &ImageData) -> Result<GpuHandle, GpuError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(GpuError::Allocation {
                what: format!("{}x{} texture (max {})", image.width, image.height, max),
            });
        }
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("product_tex"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("product_tex_bg"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        let handle = self.alloc(ResourceKind::Texture);
        self.textures.insert(
            handle.id,
            TextureEntry {
                texture,
                bind_group,
            },
        );
        Ok(handle)
    }

    fn create_program(&mut self, kind: ProgramKind) -> Result<GpuHandle, GpuError> {
        if !self.pipelines.contains_key(&kind) {
            return Err(GpuError::ShaderCompile { program: kind });
        }
        let handle = self.alloc(ResourceKind::Program);
        self.programs.insert(handle.id, kind);
        Ok(handle)
    }

    fn create_buffer(&mut self, kind: BufferKind, size: u64) -> Result<GpuHandle, GpuError> {
        let usage = match kind {
            BufferKind::Vertex | BufferKind::Instance => wgpu::BufferUsages::VERTEX,
            BufferKind::Uniform => wgpu::BufferUsages::UNIFORM,
        } | wgpu::BufferUsages::COPY_DST;
        // keep COPY_DST writes 4-byte aligned
        let size = size.max(16).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        if size > self.device.limits().max_buffer_size {
            return Err(GpuError::Allocation {
                what: format!("{:?} buffer of {} bytes", kind, size),
            });
        }
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(match kind {
                BufferKind::Vertex => "vertex_buffer",
                BufferKind::Instance => "instance_buffer",
                BufferKind::Uniform => "scene_uniforms",
            }),
            size,
            usage,
            mapped_at_creation: false,
        });
        let bind_group = (kind == BufferKind::Uniform).then(|| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("scene_uniform_bg"),
                layout: &self.uniform_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        });
        let handle = self.alloc(ResourceKind::Buffer);
        self.buffers
            .insert(handle.id, BufferEntry { buffer, bind_group });
        Ok(handle)
    }

    fn write_buffer(&mut self, buffer: GpuHandle, offset: u64, data: &[u8]) -> Result<(), GpuError> {
        let entry = self
            .buffers
            .get(&buffer.id)
            .ok_or(GpuError::UnknownHandle(buffer.id))?;
        if data.is_empty() {
            return Ok(());
        }
        if offset + data.len() as u64 > entry.buffer.size() {
            return Err(GpuError::Allocation {
                what: format!("write of {} bytes past buffer end", data.len()),
            });
        }
        self.queue.write_buffer(&entry.buffer, offset, data);
        Ok(())
    }

    fn release(&mut self, handle: GpuHandle) {
        match handle.kind {
            ResourceKind::Program => {
                self.programs.remove(&handle.id);
            }
            ResourceKind::Buffer => {
                if let Some(entry) = self.buffers.remove(&handle.id) {
                    entry.buffer.destroy();
                }
            }
            ResourceKind::Texture => {
                if let Some(entry) = self.textures.remove(&handle.id) {
                    entry.texture.destroy();
                }
            }
        }
    }

    fn submit(&mut self, draws: &DrawList) -> Result<(), GpuError> {
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(GpuError::Lost);
            }
            Err(e) => return Err(GpuError::Surface(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("showcase_encoder"),
            });
        {
            let [r, g, b] = draws.clear_color;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("showcase_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for call in &draws.calls {
                let pipeline = self
                    .programs
                    .get(&call.program.id)
                    .and_then(|k| self.pipelines.get(k));
                let uniforms = self
                    .buffers
                    .get(&call.uniforms.id)
                    .and_then(|e| e.bind_group.as_ref());
                let vertices = self.buffers.get(&call.vertices.id);
                let (Some(pipeline), Some(uniforms), Some(vertices)) = (pipeline, uniforms, vertices)
                else {
                    log::warn!("[gpu] skipping draw with released resources");
                    continue;
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, uniforms, &[]);
                if let Some(tex) = call.texture {
                    match self.textures.get(&tex.id) {
                        Some(t) => rpass.set_bind_group(1, &t.bind_group, &[]),
                        None => continue,
                    }
                }
                rpass.set_vertex_buffer(0, vertices.buffer.slice(..));
                let mut instance_count = 1;
                if let Some((inst, n)) = call.instances {
                    match self.buffers.get(&inst.id) {
                        Some(e) => rpass.set_vertex_buffer(1, e.buffer.slice(..)),
                        None => continue,
                    }
                    instance_count = n;
                }
                rpass.draw(0..call.vertex_count, 0..instance_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
