use glam::{Mat4, Vec3};
use grove_core::constants::BLOOM_THRESHOLD;
use grove_core::particles::PointAttr;
use grove_core::{
    DarkenNonBloom, InstanceTransform, Material, NodeKind, PhotoSlot, Scene, SceneNode,
};
use web_sys as web;
use wgpu::util::DeviceExt;

mod billboard;
mod markers;
mod points;
mod post;
mod targets;

pub use billboard::PhotoImage;
use post::{blit, PostUniforms};
use targets::{RenderTargets, HDR_FORMAT};

/// Everything the renderer needs from one tick.
pub struct FrameInputs<'a> {
    pub view_proj: Mat4,
    pub cam_right: Vec3,
    pub cam_up: Vec3,
    pub time: f32,
    pub morph_value: f32,
    pub bloom_strength: f32,
    pub photo_slots: &'a [PhotoSlot],
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: post::PostResources,
    // Bind groups for the post chain's different sources
    bg_scene: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup, // group1 for composite, sampling bloom A

    // Pass-wide material selector: lit vs flat black (bloom isolation)
    _pass_lit_buffer: wgpu::Buffer,
    _pass_black_buffer: wgpu::Buffer,
    pass_lit_bg: wgpu::BindGroup,
    pass_black_bg: wgpu::BindGroup,

    quad_vb: wgpu::Buffer,
    points: points::PointsResources,
    markers: markers::MarkersResources,
    photos: billboard::BillboardResources,

    scene: Scene,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        marker_capacity: usize,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
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
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, HDR_FORMAT, format);

        // Two constant selector buffers: the scene pipelines read group(1)
        // to decide lit vs flat-black output.
        let pass_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pass_bgl"),
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
        let pass_lit_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pass_lit"),
            contents: bytemuck::cast_slice(&[1.0f32, 0.0, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let pass_black_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pass_black"),
            contents: bytemuck::cast_slice(&[0.0f32, 0.0, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let pass_lit_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pass_lit_bg"),
            layout: &pass_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: pass_lit_buffer.as_entire_binding(),
            }],
        });
        let pass_black_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pass_black_bg"),
            layout: &pass_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: pass_black_buffer.as_entire_binding(),
            }],
        });

        // Shared quad for points, markers, and billboards (two triangles)
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let points = points::create_points_resources(&device, &pass_bgl, HDR_FORMAT);
        let markers =
            markers::create_markers_resources(&device, &pass_bgl, HDR_FORMAT, marker_capacity);
        let photos = billboard::create_billboard_resources(&device, &pass_bgl, HDR_FORMAT);

        let (bg_scene, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only) =
            build_post_bind_groups(&device, &post, &targets, &linear_sampler);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            linear_sampler,
            post,
            bg_scene,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
            _pass_lit_buffer: pass_lit_buffer,
            _pass_black_buffer: pass_black_buffer,
            pass_lit_bg,
            pass_black_bg,
            quad_vb,
            points,
            markers,
            photos,
            scene: Scene::new(vec![
                SceneNode::new(NodeKind::Particles, true),
                SceneNode::new(NodeKind::Markers, true),
            ]),
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.015,
                g: 0.02,
                b: 0.05,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
            let (bg_scene, bg_a, bg_b, bg_a_only) = build_post_bind_groups(
                &self.device,
                &self.post,
                &self.targets,
                &self.linear_sampler,
            );
            self.bg_scene = bg_scene;
            self.bg_from_bloom_a = bg_a;
            self.bg_from_bloom_b = bg_b;
            self.bg_bloom_a_only = bg_a_only;
        }
    }

    /// Upload a freshly (re)built particle population; the prior attribute
    /// buffer is dropped.
    pub fn set_particles(&mut self, attrs: &[PointAttr]) {
        self.points.set_attrs(&self.device, attrs);
    }

    pub fn upload_instances(&mut self, transforms: &[InstanceTransform], seeds: &[f32]) {
        self.markers.upload_transforms(&self.queue, transforms, seeds);
    }

    /// Replace the photo set: dispose prior slot textures, upload the new
    /// ones, and rebuild the draw list (photos render outside the bloom
    /// layer).
    pub fn set_photos(&mut self, images: &[PhotoImage]) {
        self.photos.replace_slots(&self.device, &self.queue, images);
        let mut nodes = vec![
            SceneNode::new(NodeKind::Particles, true),
            SceneNode::new(NodeKind::Markers, true),
        ];
        for i in 0..images.len() as u32 {
            nodes.push(SceneNode::new(NodeKind::Photo(i), false));
        }
        self.scene = Scene::new(nodes);
    }

    pub fn render(&mut self, inputs: &FrameInputs) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame uniforms shared by both scene passes
        self.queue.write_buffer(
            &self.points.uniform_buffer,
            0,
            bytemuck::bytes_of(&points::PointUniforms {
                view_proj: inputs.view_proj.to_cols_array_2d(),
                cam_right: inputs.cam_right.to_array(),
                time: inputs.time,
                cam_up: inputs.cam_up.to_array(),
                morph_value: inputs.morph_value,
                size_scale: 0.07,
                opacity: 0.85,
                _pad: [0.0; 2],
            }),
        );
        self.queue.write_buffer(
            &self.markers.uniform_buffer,
            0,
            bytemuck::bytes_of(&markers::MarkerUniforms {
                view_proj: inputs.view_proj.to_cols_array_2d(),
                color: [1.0, 0.84, 0.5, 1.0],
                time: inputs.time,
                _pad: [0.0; 3],
            }),
        );
        self.photos
            .write_slot_uniforms(&self.queue, inputs.view_proj, inputs.photo_slots);

        let post_uniforms = PostUniforms {
            resolution: [self.width as f32 / 2.0, self.height as f32 / 2.0],
            time: inputs.time,
            bloom_strength: inputs.bloom_strength,
            blur_dir: [0.0, 0.0],
            threshold: BLOOM_THRESHOLD,
            _pad: 0.0,
        };
        self.queue.write_buffer(
            &self.post.main_uniforms,
            0,
            bytemuck::bytes_of(&post_uniforms),
        );
        self.queue.write_buffer(
            &self.post.blur_h_uniforms,
            0,
            bytemuck::bytes_of(&PostUniforms {
                blur_dir: [1.0, 0.0],
                ..post_uniforms
            }),
        );
        self.queue.write_buffer(
            &self.post.blur_v_uniforms,
            0,
            bytemuck::bytes_of(&PostUniforms {
                blur_dir: [0.0, 1.0],
                ..post_uniforms
            }),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: bloom isolation. Non-bloom nodes render flat black; the
        // guard restores their materials on every exit path.
        let mut scene = std::mem::take(&mut self.scene);
        {
            let guard = DarkenNonBloom::new(&mut scene);
            self.encode_scene_pass(
                &mut encoder,
                guard.scene(),
                "bloom_isolation_pass",
                wgpu::Color::BLACK,
            );
        }
        self.scene = scene;

        // Pass 2: bright pass into bloom_a
        blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.bg_scene,
            None,
        );

        // Pass 3 + 4: separable gaussian blur, ping-pong a -> b -> a
        blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bg_from_bloom_a,
            None,
        );
        blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bg_from_bloom_b,
            None,
        );

        // Pass 5: the full scene with original materials
        self.encode_scene_pass(&mut encoder, &self.scene, "scene_pass", self.clear_color);

        // Pass 6: additive composite to the swapchain
        blit(
            &mut encoder,
            "composite",
            &swap_view,
            self.clear_color,
            &self.post.composite_pipeline,
            &self.bg_scene,
            Some(&self.bg_bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode_scene_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        label: &str,
        clear: wgpu::Color,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.scene_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        for node in &scene.nodes {
            let pass_bg = match node.material {
                Material::Lit => &self.pass_lit_bg,
                Material::UnlitBlack => &self.pass_black_bg,
            };
            match node.kind {
                NodeKind::Particles => {
                    let Some(attr_vb) = &self.points.attr_vb else {
                        continue;
                    };
                    rpass.set_pipeline(&self.points.pipeline);
                    rpass.set_bind_group(0, &self.points.bind_group, &[]);
                    rpass.set_bind_group(1, pass_bg, &[]);
                    rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                    rpass.set_vertex_buffer(1, attr_vb.slice(..));
                    rpass.draw(0..6, 0..self.points.count);
                }
                NodeKind::Markers => {
                    if self.markers.count == 0 {
                        continue;
                    }
                    rpass.set_pipeline(&self.markers.pipeline);
                    rpass.set_bind_group(0, &self.markers.bind_group, &[]);
                    rpass.set_bind_group(1, pass_bg, &[]);
                    rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                    rpass.set_vertex_buffer(1, self.markers.instance_vb.slice(..));
                    rpass.draw(0..6, 0..self.markers.count);
                }
                NodeKind::Photo(id) => {
                    let Some(slot) = self.photos.slots.get(id as usize) else {
                        continue;
                    };
                    rpass.set_pipeline(&self.photos.pipeline);
                    rpass.set_bind_group(0, &slot.bind_group, &[]);
                    rpass.set_bind_group(1, pass_bg, &[]);
                    rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                    rpass.draw(0..6, 0..1);
                }
            }
        }
    }
}

fn build_post_bind_groups(
    device: &wgpu::Device,
    post: &post::PostResources,
    targets: &RenderTargets,
    sampler: &wgpu::Sampler,
) -> (
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
) {
    let bg0 = |label: &str, view: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &post.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    };
    let bg_scene = bg0("bg_scene", &targets.scene_view, &post.main_uniforms);
    let bg_from_bloom_a = bg0(
        "bg_from_bloom_a",
        &targets.bloom_a_view,
        &post.blur_h_uniforms,
    );
    let bg_from_bloom_b = bg0(
        "bg_from_bloom_b",
        &targets.bloom_b_view,
        &post.blur_v_uniforms,
    );
    let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout: &post.bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    (bg_scene, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only)
}
