//! wgpu substrate: device init, pipelines, offscreen targets, frame passes.
//!
//! The render order inside one frame is fixed: upload the patch vertices,
//! render whatever offscreen targets the frame asked for, then the main pass
//! that samples them. Offscreen passes run under an `OffscreenGuard` so the
//! water plane never stays hidden past a pass, whatever the exit path.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::CameraPose;
use crate::environment::Capabilities;
use crate::error::WaterError;
use crate::params::RenderConfig;
use crate::patch::WaterVertex;
use crate::reflection::OffscreenGuard;
use crate::water::{FrameUpdate, WaterSystem};

/// Uniform block for the water and bottom materials.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub reflection_vp: [[f32; 4]; 4],
    pub refraction_vp: [[f32; 4]; 4],
    pub model_offset: [f32; 4],
    pub camera_pos: [f32; 4],
    pub fade_color: [f32; 4],
    /// x = baseline h0, y = time, z = submerged flag, w = padding
    pub surface: [f32; 4],
}

/// Uniform block for the sky pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub params: [f32; 4],
}

/// Device, queue, and surface, created once up front so capability flags are
/// available before the water subsystem is constructed.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    surface_config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    pub async fn new(window: std::sync::Arc<winit::window::Window>) -> Result<Self, WaterError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(WaterError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            device,
            queue,
            surface_format,
            surface_config,
        })
    }

    /// Program support as seen by the water capability gate. Reaching this
    /// point means the adapter accepted a device with programmable stages;
    /// hosts embedding the water core on fixed-function renderers build
    /// `Capabilities` themselves.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            vertex_programs: true,
            fragment_programs: true,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }
}

const RTT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Offscreen color targets for the mirror cameras.
struct ReflectionTargets {
    reflection_view: wgpu::TextureView,
    refraction_view: wgpu::TextureView,
}

impl ReflectionTargets {
    fn new(device: &wgpu::Device, size: u32) -> Self {
        let make = |label: &str| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: RTT_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            texture.create_view(&wgpu::TextureViewDescriptor::default())
        };

        Self {
            reflection_view: make("Reflection Target"),
            refraction_view: make("Refraction Target"),
        }
    }
}

/// Per-pass uniform buffers and bind groups.
struct PassResources {
    water_uniforms: wgpu::Buffer,
    water_bind_group: wgpu::BindGroup,
    sky_uniforms: wgpu::Buffer,
    sky_bind_group: wgpu::BindGroup,
}

#[derive(Clone, Copy)]
enum Pass {
    Main = 0,
    Reflection = 1,
    Refraction = 2,
}

/// Pipelines, mesh buffers, and the per-frame pass recording.
pub struct RenderSystem {
    gpu: GpuContext,
    water_pipelines: Vec<(&'static str, wgpu::RenderPipeline)>,
    bottom_pipeline_main: wgpu::RenderPipeline,
    bottom_pipeline_rtt: wgpu::RenderPipeline,
    sky_pipeline_main: wgpu::RenderPipeline,
    sky_pipeline_rtt: wgpu::RenderPipeline,
    water_vertex_buffer: wgpu::Buffer,
    water_index_buffer: wgpu::Buffer,
    water_index_count: u32,
    bottom_vertex_buffer: wgpu::Buffer,
    bottom_index_buffer: wgpu::Buffer,
    targets: ReflectionTargets,
    texture_bind_group: wgpu::BindGroup,
    passes: [PassResources; 3],
}

impl RenderSystem {
    pub fn new(gpu: GpuContext, water: &WaterSystem, config: &RenderConfig) -> Self {
        let device = &gpu.device;

        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("water.wgsl").into()),
        });
        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Water Texture Layout"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let vertex_attributes = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<WaterVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &vertex_attributes,
        };

        let water_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Water Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let plain_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plain Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let make_mesh_pipeline = |label: &str,
                                  layout: &wgpu::PipelineLayout,
                                  entry: &'static str,
                                  format: wgpu::TextureFormat,
                                  blend: Option<wgpu::BlendState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &water_shader,
                    entry_point: Some("vs_main"),
                    buffers: std::slice::from_ref(&vertex_layout),
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &water_shader,
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // the surface is seen from both sides
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let water_pipelines = ["fs_basic", "fs_reflect", "fs_reflect_refract", "fs_underside"]
            .into_iter()
            .map(|entry| {
                (
                    entry,
                    make_mesh_pipeline(
                        "Water Pipeline",
                        &water_layout,
                        entry,
                        gpu.surface_format,
                        Some(wgpu::BlendState::ALPHA_BLENDING),
                    ),
                )
            })
            .collect();

        let bottom_pipeline_main = make_mesh_pipeline(
            "Bottom Pipeline",
            &plain_layout,
            "fs_bottom",
            gpu.surface_format,
            None,
        );
        let bottom_pipeline_rtt = make_mesh_pipeline(
            "Bottom RTT Pipeline",
            &plain_layout,
            "fs_bottom",
            RTT_FORMAT,
            None,
        );

        let make_sky_pipeline = |label: &str, format: wgpu::TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&plain_layout),
                vertex: wgpu::VertexState {
                    module: &sky_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &sky_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };
        let sky_pipeline_main = make_sky_pipeline("Sky Pipeline", gpu.surface_format);
        let sky_pipeline_rtt = make_sky_pipeline("Sky RTT Pipeline", RTT_FORMAT);

        let water_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Vertex Buffer"),
            contents: bytemuck::cast_slice(&water.patch.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let water_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Index Buffer"),
            contents: bytemuck::cast_slice(&water.patch.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let bottom_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bottom Vertex Buffer"),
            contents: bytemuck::cast_slice(&water.patch.bottom_vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let bottom_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bottom Index Buffer"),
            contents: bytemuck::cast_slice(&water.patch.bottom_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let targets = ReflectionTargets::new(device, config.rtt_size);
        let rtt_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("RTT Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Texture Bind Group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.reflection_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&rtt_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&targets.refraction_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&rtt_sampler),
                },
            ],
        });

        let make_pass = |label: &str| {
            let water_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[WaterUniforms::zeroed()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let water_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: water_uniforms.as_entire_binding(),
                }],
            });
            let sky_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[SkyUniforms::zeroed()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let sky_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: sky_uniforms.as_entire_binding(),
                }],
            });
            PassResources {
                water_uniforms,
                water_bind_group,
                sky_uniforms,
                sky_bind_group,
            }
        };
        let passes = [
            make_pass("Main Pass"),
            make_pass("Reflection Pass"),
            make_pass("Refraction Pass"),
        ];

        let water_index_count = water.patch.indices.len() as u32;

        Self {
            gpu,
            water_pipelines,
            bottom_pipeline_main,
            bottom_pipeline_rtt,
            sky_pipeline_main,
            sky_pipeline_rtt,
            water_vertex_buffer,
            water_index_buffer,
            water_index_count,
            bottom_vertex_buffer,
            bottom_index_buffer,
            targets,
            texture_bind_group,
            passes,
        }
    }

    pub fn gpu_mut(&mut self) -> &mut GpuContext {
        &mut self.gpu
    }

    fn water_pipeline(&self, entry: &str) -> &wgpu::RenderPipeline {
        self.water_pipelines
            .iter()
            .find(|(name, _)| *name == entry)
            .map(|(_, pipeline)| pipeline)
            .unwrap_or(&self.water_pipelines[0].1)
    }

    fn write_pass_uniforms(
        &self,
        water: &WaterSystem,
        pass: Pass,
        view_proj: Mat4,
        sky_camera: &CameraPose,
        submerged: bool,
    ) {
        let origin = water.patch.origin();
        let camera = water.camera();

        let uniforms = WaterUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            reflection_vp: water.reflection_view_proj().to_cols_array_2d(),
            refraction_vp: water.refraction_view_proj().to_cols_array_2d(),
            model_offset: [origin.x, 0.0, origin.z, 0.0],
            camera_pos: [camera.eye.x, camera.eye.y, camera.eye.z, 1.0],
            fade_color: water.fade_color(),
            surface: [
                water.get_height(),
                water.time(),
                submerged as u32 as f32,
                0.0,
            ],
        };
        let resources = &self.passes[pass as usize];
        self.gpu.queue.write_buffer(
            &resources.water_uniforms,
            0,
            bytemuck::cast_slice(&[uniforms]),
        );

        let sky = SkyUniforms {
            inv_view_proj: sky_camera.view_proj().inverse().to_cols_array_2d(),
            params: [water.time(), 0.0, 0.0, 0.0],
        };
        self.gpu
            .queue
            .write_buffer(&resources.sky_uniforms, 0, bytemuck::cast_slice(&[sky]));
    }

    fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
        wgpu::Color {
            r: rgba[0] as f64,
            g: rgba[1] as f64,
            b: rgba[2] as f64,
            a: rgba[3] as f64,
        }
    }

    /// Record one offscreen pass: sky and bottom plane from the mirror's
    /// point of view, with the water itself hidden by the guard.
    fn render_offscreen(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        water: &mut WaterSystem,
        target: &wgpu::TextureView,
        pass: Pass,
    ) {
        let clear = Self::clear_color(water.fade_color());
        // set_visible(false) hides the whole water node, bottom included
        let draw_bottom = water.patch.is_visible();
        let _guard = OffscreenGuard::begin(&mut water.scene);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Offscreen Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
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

        let resources = &self.passes[pass as usize];

        render_pass.set_pipeline(&self.sky_pipeline_rtt);
        render_pass.set_bind_group(0, &resources.sky_bind_group, &[]);
        render_pass.draw(0..3, 0..1);

        if draw_bottom {
            render_pass.set_pipeline(&self.bottom_pipeline_rtt);
            render_pass.set_bind_group(0, &resources.water_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.bottom_vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.bottom_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..6, 0, 0..1);
        }
    }

    /// Render one frame in the coordinator's order: upload, offscreen
    /// targets, then the main pass that samples them.
    pub fn render(
        &self,
        water: &mut WaterSystem,
        frame: &FrameUpdate,
    ) -> Result<(), wgpu::SurfaceError> {
        // a buffer whose size stopped matching the grid disables wave
        // updates; whatever the buffer last held keeps drawing
        let shape_ok = water
            .patch
            .check_buffer_shape(self.water_vertex_buffer.size());
        if frame.upload_patch && shape_ok {
            self.gpu.queue.write_buffer(
                &self.water_vertex_buffer,
                0,
                bytemuck::cast_slice(&water.patch.vertices),
            );
            self.gpu.queue.write_buffer(
                &self.bottom_vertex_buffer,
                0,
                bytemuck::cast_slice(&water.patch.bottom_vertices),
            );
        }

        let main_camera = *water.camera();
        let reflection_camera = *water.reflection_camera();
        self.write_pass_uniforms(
            water,
            Pass::Main,
            main_camera.view_proj(),
            &main_camera,
            frame.submerged,
        );
        self.write_pass_uniforms(
            water,
            Pass::Reflection,
            water.reflection_view_proj(),
            &reflection_camera,
            frame.submerged,
        );
        self.write_pass_uniforms(
            water,
            Pass::Refraction,
            water.refraction_view_proj(),
            &main_camera,
            frame.submerged,
        );

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // offscreen targets first; the main pass samples them
        if frame.render_reflection {
            self.render_offscreen(
                &mut encoder,
                water,
                &self.targets.reflection_view,
                Pass::Reflection,
            );
        }
        if frame.render_refraction {
            self.render_offscreen(
                &mut encoder,
                water,
                &self.targets.refraction_view,
                Pass::Refraction,
            );
        }

        {
            let resources = &self.passes[Pass::Main as usize];
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Self::clear_color(water.fade_color())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.sky_pipeline_main);
            render_pass.set_bind_group(0, &resources.sky_bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            if water.patch.is_visible() {
                render_pass.set_pipeline(&self.bottom_pipeline_main);
                render_pass.set_bind_group(0, &resources.water_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.bottom_vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.bottom_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..6, 0, 0..1);
            }

            if water.patch.is_visible() && water.scene.water_visible {
                render_pass.set_pipeline(self.water_pipeline(frame.fragment_entry));
                render_pass.set_bind_group(0, &resources.water_bind_group, &[]);
                render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.water_vertex_buffer.slice(..));
                render_pass.set_index_buffer(
                    self.water_index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..self.water_index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
