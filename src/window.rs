//! Windowed backend: a winit event loop driving the engine every frame,
//! rendering glow instances through wgpu.
//!
//! [`run`] owns the whole playback: it creates the window, initializes the
//! GPU layer, starts the engine, and feeds real frame deltas into
//! [`Engine::advance`]. If the GPU layer cannot be created, the runner logs
//! a warning and degrades to an immediate reveal; content is never left
//! hidden behind a failed animation.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::engine::Engine;
use crate::error::{GpuError, RevealError};
use crate::shader::{GlowInstance, Uniforms, GLOW_SHADER};
use crate::stage::Stage;
use crate::surface::Surface;
use crate::time::Time;

/// Base clear color before backdrop dimming.
const CLEAR_COLOR: (f64, f64, f64) = (0.015, 0.02, 0.05);

/// GPU state and the per-frame glow batch.
pub struct GlowLayer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    capacity: u32,
    instances: Vec<GlowInstance>,
    dim: f32,
}

impl GlowLayer {
    /// Initialize the GPU layer for `window`, with room for `capacity`
    /// glow instances per frame.
    pub async fn new(window: Arc<Window>, capacity: u32) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
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
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            }, None)
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let capacity = capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glow Instance Buffer"),
            size: (capacity as usize * std::mem::size_of::<GlowInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniforms = Uniforms {
            viewport: [config.width as f32, config.height as f32],
            _pad: [0.0; 2],
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Glow Shader"),
            source: wgpu::ShaderSource::Wgsl(GLOW_SHADER.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Glow Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Glow Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GlowInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32,
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32,
                        },
                        wgpu::VertexAttribute {
                            offset: 16,
                            shader_location: 3,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            instance_buffer,
            uniform_buffer,
            uniform_bind_group,
            capacity,
            instances: Vec::new(),
            dim: 0.0,
        })
    }

    /// Reconfigure for a new physical size.
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Submit the batched glow instances for this frame.
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.instances.len() > self.capacity as usize {
            self.instances.truncate(self.capacity as usize);
        }

        let uniforms = Uniforms {
            viewport: [self.config.width as f32, self.config.height as f32],
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        if !self.instances.is_empty() {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glow Encoder"),
            });

        {
            let k = 1.0 - 0.85 * self.dim as f64;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glow Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR.0 * k,
                            g: CLEAR_COLOR.1 * k,
                            b: CLEAR_COLOR.2 * k,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.instances.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..self.instances.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Surface for GlowLayer {
    fn size(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    fn resize(&mut self, size: Vec2) {
        self.resize_viewport(size.x as u32, size.y as u32);
    }

    fn clear(&mut self, dim: f32) {
        self.instances.clear();
        self.dim = dim;
    }

    fn draw_glow(&mut self, position: Vec2, radius: f32, color: Vec3, alpha: f32) {
        self.instances.push(GlowInstance {
            position: position.to_array(),
            radius,
            alpha,
            color: color.to_array(),
            _pad: 0.0,
        });
    }
}

struct App<S: Stage> {
    window: Option<Arc<Window>>,
    layer: Option<GlowLayer>,
    engine: Engine,
    stage: S,
    time: Time,
    title: String,
}

impl<S: Stage> Drop for App<S> {
    fn drop(&mut self) {
        // teardown must never leave a pending transition behind
        self.engine.stop();
    }
}

impl<S: Stage> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::warn!("window creation failed ({e}); revealing without animation");
                self.engine.force_reveal(&mut self.stage);
                event_loop.exit();
                return;
            }
        };

        let capacity = self.engine.instance_capacity();
        match pollster::block_on(GlowLayer::new(window.clone(), capacity)) {
            Ok(layer) => {
                let size = window.inner_size();
                self.engine
                    .set_bounds(Vec2::new(size.width as f32, size.height as f32));
                self.layer = Some(layer);
                self.window = Some(window);
                self.time.reset();
                self.engine.start(&mut self.stage);
            }
            Err(e) => {
                log::warn!("gpu init failed ({e}); revealing without animation");
                self.engine.force_reveal(&mut self.stage);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.engine.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(layer) = &mut self.layer {
                    layer.resize_viewport(physical_size.width, physical_size.height);
                }
                self.engine.set_bounds(Vec2::new(
                    physical_size.width as f32,
                    physical_size.height as f32,
                ));
            }
            WindowEvent::RedrawRequested => {
                let (_, dt) = self.time.update();
                self.engine.advance(&mut self.stage, dt);
                if let Some(layer) = &mut self.layer {
                    self.engine.render(layer);
                    match layer.frame() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let (w, h) = (layer.config.width, layer.config.height);
                            layer.resize_viewport(w, h);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Run a windowed playback of `engine` against `stage`.
///
/// Blocks until the window is closed. GPU or window failures degrade to an
/// immediate reveal and return `Ok`.
pub fn run<S: Stage + 'static>(mut engine: Engine, mut stage: S, title: &str) -> Result<(), RevealError> {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::warn!("event loop unavailable ({e}); revealing without animation");
            engine.force_reveal(&mut stage);
            return Ok(());
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        layer: None,
        engine,
        stage,
        time: Time::new(),
        title: title.to_string(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
