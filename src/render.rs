use crate::constants::{MAX_POINT_PX, MIN_DRAW_ALPHA, MIN_POINT_PX};
use glam::Mat4;
use pointscroll_core::{Camera, CloudView, FrameView, RenderSurface, Sprite, Upload, UploadCache};
use web_sys as web;
use wgpu::util::DeviceExt;

static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CloudUniforms {
    mvp: [[f32; 4]; 4],
    tint_opacity: [f32; 4],
    sizing: [f32; 4],
    limits: [f32; 4],
}

/// GPU side of one cloud. Colours are static; positions are rewritten when
/// the cloud's version moves.
struct CloudBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
}

/// WebGPU backend: every cloud is an instanced quad per point, stamped with
/// the shared particle sprite.
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    canvas: web::HtmlCanvasElement,
    pipeline: wgpu::RenderPipeline,
    cloud_layout: wgpu::BindGroupLayout,
    sprite_layout: wgpu::BindGroupLayout,
    sprite: Option<wgpu::BindGroup>,
    clouds: UploadCache<CloudBuffers>,
    camera: Camera,
}

impl GpuSurface {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

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
                    wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // the page shows through wherever no particle is drawn
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let cloud_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cloud_bgl"),
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
        let sprite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        let pipeline = create_points_pipeline(&device, &cloud_layout, &sprite_layout, format);

        log::info!("WebGPU surface ready: {width}x{height} {format:?}");
        Ok(Self {
            surface,
            device,
            queue,
            config,
            canvas,
            pipeline,
            cloud_layout,
            sprite_layout,
            sprite: None,
            clouds: UploadCache::default(),
            camera: Camera::new(width as f32 / height as f32),
        })
    }

    fn resize_if_needed(&mut self) {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
        self.camera.set_viewport(width as f32, height as f32);
    }

    fn upload_sprite(&self, sprite: &Sprite) -> wgpu::BindGroup {
        let size = sprite.size as u32;
        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_tex"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
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
            &sprite.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            extent,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bg"),
            layout: &self.sprite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }

    /// Drop every GPU buffer. The surface draws nothing until new clouds arrive.
    pub fn release(&mut self) {
        log::debug!("releasing {} cloud buffers", self.clouds.len());
        self.clouds.clear();
        self.sprite = None;
    }
}

impl RenderSurface for GpuSurface {
    fn render(&mut self, frame: &FrameView<'_>) {
        let Some(sprite) = frame.sprite else {
            return;
        };
        if self.sprite.is_none() {
            self.sprite = Some(self.upload_sprite(sprite));
        }
        self.resize_if_needed();

        let clouds: Vec<&CloudView<'_>> = frame
            .clouds
            .iter()
            .filter(|c| c.opacity >= MIN_DRAW_ALPHA)
            .collect();
        let view_projection = self.camera.view_projection();
        let px_per_unit = self.camera.pixel_size(1.0, 1.0, self.config.height as f32);
        let viewport = [self.config.width as f32, self.config.height as f32];

        let (device, queue, layout) = (&self.device, &self.queue, &self.cloud_layout);
        for cloud in &clouds {
            let upload = self.clouds.sync(
                cloud,
                |c| create_cloud_buffers(device, layout, c),
                |buffers, c| queue.write_buffer(&buffers.positions, 0, c.positions.as_bytes()),
            );
            if upload == Upload::Created {
                log::debug!("{:?}/{}: {} points uploaded", cloud.role, cloud.layer, cloud.positions.len());
            }
            if let Some(buffers) = self.clouds.get(&cloud.key()) {
                let u = cloud_uniforms(cloud, view_projection, px_per_unit, viewport);
                queue.write_buffer(&buffers.uniforms, 0, bytemuck::bytes_of(&u));
            }
        }

        let target = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e:?}");
                return;
            }
        };
        let view = target
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("points_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(sprite) = &self.sprite {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(1, sprite, &[]);
                for cloud in &clouds {
                    let Some(buffers) = self.clouds.get(&cloud.key()) else {
                        continue;
                    };
                    rpass.set_bind_group(0, &buffers.bind_group, &[]);
                    rpass.set_vertex_buffer(0, buffers.positions.slice(..));
                    rpass.set_vertex_buffer(1, buffers.colors.slice(..));
                    rpass.draw(0..6, 0..buffers.count);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        target.present();
    }
}

fn cloud_uniforms(
    cloud: &CloudView<'_>,
    view_projection: Mat4,
    px_per_unit: f32,
    viewport: [f32; 2],
) -> CloudUniforms {
    let mvp = view_projection * cloud.transform.matrix();
    let [r, g, b] = cloud.tint;
    CloudUniforms {
        mvp: mvp.to_cols_array_2d(),
        tint_opacity: [r, g, b, cloud.opacity.min(1.0)],
        sizing: [
            cloud.point_size * cloud.transform.scale,
            px_per_unit,
            viewport[0],
            viewport[1],
        ],
        limits: [MIN_POINT_PX, MAX_POINT_PX, 0.0, 0.0],
    }
}

fn create_cloud_buffers(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    cloud: &CloudView<'_>,
) -> CloudBuffers {
    let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("cloud_positions"),
        contents: cloud.positions.as_bytes(),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    let colors = cloud.point_colors();
    let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("cloud_colors"),
        contents: bytemuck::cast_slice::<f32, u8>(colors.as_ref()),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cloud_uniforms"),
        size: std::mem::size_of::<CloudUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cloud_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.as_entire_binding(),
        }],
    });
    CloudBuffers {
        positions,
        colors,
        uniforms,
        bind_group,
        count: cloud.positions.len() as u32,
    }
}

fn create_points_pipeline(
    device: &wgpu::Device,
    cloud_layout: &wgpu::BindGroupLayout,
    sprite_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("points_shader"),
        source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("points_pl"),
        bind_group_layouts: &[cloud_layout, sprite_layout],
        push_constant_ranges: &[],
    });
    let xyz = |location| wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: match location {
            0 => &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
            _ => &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 1,
            }],
        },
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("points_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_point"),
            buffers: &[xyz(0), xyz(1)],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_point"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// Stand-in when WebGPU is unavailable: the scene still runs (scroll
/// indicator, loads, teardown) but nothing is drawn.
pub struct Headless;

impl RenderSurface for Headless {
    fn render(&mut self, _frame: &FrameView<'_>) {}
}
