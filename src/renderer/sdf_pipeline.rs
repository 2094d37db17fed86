//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in the fragment shader using signed distance
//! fields: background gradient, nebulas, twinkling starfield, falling
//! stars, the rocket, missiles, and hit particles.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Maximum number of stars supported
const MAX_STARS: usize = 64;
/// Maximum number of missiles
const MAX_MISSILES: usize = 32;
/// Maximum number of particles
const MAX_PARTICLES: usize = 256;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],    // offset 0
    time: f32,               // offset 8
    starfield_density: f32,  // offset 12
    field_size: [f32; 2],    // offset 16 (8-byte aligned for WGSL vec2)
    star_count: u32,         // offset 24
    missile_count: u32,      // offset 28
    particle_count: u32,     // offset 32
    nebula_enabled: u32,     // offset 36
    twinkle_enabled: u32,    // offset 40
    playing: u32,            // offset 44 - 1 while simulating, dims the scene otherwise
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct RocketUniform {
    pos: [f32; 2],
    half_width: f32,
    height: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StarData {
    pos: [f32; 2],
    radius: f32,
    /// Remaining lifetime 0-1, for fade-out
    ttl_ratio: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MissileData {
    pos: [f32; 2],
    radius: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleData {
    pos: [f32; 2],
    size: f32,
    life: f32,
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    rocket_buffer: wgpu::Buffer,
    stars_buffer: wgpu::Buffer,
    missiles_buffer: wgpu::Buffer,
    particles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("star_shader.wgsl").into()),
        });

        // Create buffers
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                time: 0.0,
                starfield_density: 1.0,
                field_size: [width as f32, height as f32],
                star_count: 0,
                missile_count: 0,
                particle_count: 0,
                nebula_enabled: 1,
                twinkle_enabled: 1,
                playing: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let rocket_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("rocket"),
            contents: bytemuck::bytes_of(&RocketUniform {
                pos: [0.0, 0.0],
                half_width: ROCKET_HALF_WIDTH,
                height: ROCKET_HEIGHT,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let stars_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stars"),
            size: (std::mem::size_of::<StarData>() * MAX_STARS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let missiles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("missiles"),
            size: (std::mem::size_of::<MissileData>() * MAX_MISSILES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let particles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particles"),
            size: (std::mem::size_of::<ParticleData>() * MAX_PARTICLES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bind group layout
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
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
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: rocket_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: stars_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: missiles_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: particles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            rocket_buffer,
            stars_buffer,
            missiles_buffer,
            particles_buffer,
            bind_group,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame
        let elapsed = (time / 1000.0) as f32;

        let star_count = state.stars.len().min(MAX_STARS) as u32;
        let missile_count = state.missiles.len().min(MAX_MISSILES) as u32;
        let max_particles = settings.max_particles().min(MAX_PARTICLES);
        let particle_count = state.particles.len().min(max_particles) as u32;

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            time: elapsed,
            starfield_density: settings.quality.starfield_density(),
            field_size: [state.field.x, state.field.y],
            star_count,
            missile_count,
            particle_count,
            nebula_enabled: if settings.quality.nebula_enabled() { 1 } else { 0 },
            twinkle_enabled: if settings.twinkle_enabled() { 1 } else { 0 },
            playing: if state.phase == GamePhase::Playing { 1 } else { 0 },
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let rocket_pos = state.rocket.pos(state.field);
        let rocket = RocketUniform {
            pos: [rocket_pos.x, rocket_pos.y],
            half_width: ROCKET_HALF_WIDTH,
            height: ROCKET_HEIGHT,
        };
        self.queue
            .write_buffer(&self.rocket_buffer, 0, bytemuck::bytes_of(&rocket));

        let mut stars_data = [StarData {
            pos: [0.0; 2],
            radius: 0.0,
            ttl_ratio: 0.0,
        }; MAX_STARS];
        for (i, star) in state.stars.iter().take(MAX_STARS).enumerate() {
            stars_data[i] = StarData {
                pos: [star.pos.x, star.pos.y],
                radius: star.radius,
                ttl_ratio: star.ttl_ticks as f32 / STAR_TTL_TICKS as f32,
            };
        }
        self.queue
            .write_buffer(&self.stars_buffer, 0, bytemuck::cast_slice(&stars_data));

        let mut missiles_data = [MissileData {
            pos: [0.0; 2],
            radius: 0.0,
            _pad: 0.0,
        }; MAX_MISSILES];
        for (i, missile) in state.missiles.iter().take(MAX_MISSILES).enumerate() {
            missiles_data[i] = MissileData {
                pos: [missile.pos.x, missile.pos.y],
                radius: MISSILE_RADIUS,
                _pad: 0.0,
            };
        }
        self.queue.write_buffer(
            &self.missiles_buffer,
            0,
            bytemuck::cast_slice(&missiles_data),
        );

        let mut particles_data = [ParticleData {
            pos: [0.0; 2],
            size: 0.0,
            life: 0.0,
        }; MAX_PARTICLES];
        for (i, particle) in state.particles.iter().take(max_particles).enumerate() {
            particles_data[i] = ParticleData {
                pos: [particle.pos.x, particle.pos.y],
                size: particle.size,
                life: particle.life,
            };
        }
        self.queue.write_buffer(
            &self.particles_buffer,
            0,
            bytemuck::cast_slice(&particles_data),
        );

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
