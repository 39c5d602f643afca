use glam::{Mat4, Vec3};
use grove_core::PhotoSlot;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SlotUniforms {
    pub(crate) mvp: [[f32; 4]; 4],
    // x: opacity
    pub(crate) params: [f32; 4],
}

/// Decoded RGBA image handed over by the embedding page.
pub struct PhotoImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub(crate) struct PhotoSlotGpu {
    _texture: wgpu::Texture,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    aspect: f32,
}

/// Photo billboard pipeline plus the per-slot GPU resources. Replacing the
/// photo set drops every prior texture and bind group before building the
/// new ones.
pub(crate) struct BillboardResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pub(crate) slots: Vec<PhotoSlotGpu>,
}

pub(crate) fn create_billboard_resources(
    device: &wgpu::Device,
    pass_bgl: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
) -> BillboardResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("billboard_shader"),
        source: wgpu::ShaderSource::Wgsl(grove_core::BILLBOARD_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("billboard_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("billboard_pl"),
        bind_group_layouts: &[&bgl, pass_bgl],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("billboard_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_billboard"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_billboard"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("billboard_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    BillboardResources {
        pipeline,
        bgl,
        sampler,
        slots: Vec::new(),
    }
}

impl BillboardResources {
    /// Dispose the prior slot set and build GPU resources for a new one.
    pub(crate) fn replace_slots(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &[PhotoImage],
    ) {
        self.slots.clear();
        for (i, image) in images.iter().enumerate() {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("photo_tex"),
                size: wgpu::Extent3d {
                    width: image.width.max(1),
                    height: image.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &image.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * image.width.max(1)),
                    rows_per_image: Some(image.height.max(1)),
                },
                wgpu::Extent3d {
                    width: image.width.max(1),
                    height: image.height.max(1),
                    depth_or_array_layers: 1,
                },
            );
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("photo_slot_uniforms"),
                size: std::mem::size_of::<SlotUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("photo_slot_bg"),
                layout: &self.bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            self.slots.push(PhotoSlotGpu {
                _texture: texture,
                uniform_buffer,
                bind_group,
                aspect: image.width.max(1) as f32 / image.height.max(1) as f32,
            });
            log::info!("[photos] uploaded slot {} ({}x{})", i, image.width, image.height);
        }
    }

    /// Write per-slot MVPs from the current photo system state.
    pub(crate) fn write_slot_uniforms(
        &self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        slots: &[PhotoSlot],
    ) {
        for slot in slots {
            let Some(gpu) = self.slots.get(slot.id as usize) else {
                continue;
            };
            let model = Mat4::from_scale_rotation_translation(
                Vec3::new(slot.scale * gpu.aspect, slot.scale, 1.0),
                slot.rotation,
                slot.position,
            );
            let uniforms = SlotUniforms {
                mvp: (view_proj * model).to_cols_array_2d(),
                params: [1.0, 0.0, 0.0, 0.0],
            };
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }
}
