//! wgpu renderer for recorded [`DrawList`]s.
//!
//! Each frame is painted into a persistent [`TrailTarget`] in the order the
//! simulation recorded it (optional clear, fade overlay, circles, lines) and
//! the trail is then copied to the window surface. Extra passes such as the
//! egui panel can be recorded into the [`Frame`] before it is presented.

#[cfg(feature = "egui")]
pub mod egui_integration;
mod shaders;
mod trail;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::canvas::{CircleInstance, DrawList, LineInstance};
use crate::error::GpuError;
use trail::{TrailTarget, TRAIL_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct OverlayUniform {
    color: [f32; 4],
}

/// A vertex buffer of instances that grows when a frame needs more room.
struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    stride: usize,
    len: u32,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str, stride: usize, capacity: usize) -> Self {
        Self {
            label,
            buffer: create_instance_buffer(device, label, stride, capacity),
            capacity,
            stride,
            len: 0,
        }
    }

    fn upload<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[T]) {
        self.len = instances.len() as u32;
        if instances.is_empty() {
            return;
        }
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.buffer = create_instance_buffer(device, self.label, self.stride, self.capacity);
            tracing::debug!("Grew {} to {} instances", self.label, self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, stride: usize, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (stride * capacity.max(1)) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// A surface texture being recorded into.
pub struct Frame {
    output: wgpu::SurfaceTexture,
    /// View of the surface texture.
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    trail: TrailTarget,
    viewport_buffer: wgpu::Buffer,
    overlay_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    fade_pipeline: wgpu::RenderPipeline,
    circle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    circles: InstanceBuffer,
    lines: InstanceBuffer,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!("Using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Prefer a linear surface so the copied trail keeps canvas-like colors.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let trail = TrailTarget::new(&device, config.width, config.height, surface_format);

        let viewport_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Buffer"),
            size: std::mem::size_of::<ViewportUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let overlay_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Buffer"),
            size: std::mem::size_of::<OverlayUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[uniform_entry(0), uniform_entry(1)],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: overlay_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trail Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let fade_pipeline = create_trail_pipeline(
            &device,
            &pipeline_layout,
            "Fade",
            &shaders::fade_shader(),
            None,
        );

        // The padding slot after the radius keeps the color 16-byte aligned.
        let circle_attributes = [
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
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];
        let circle_pipeline = create_trail_pipeline(
            &device,
            &pipeline_layout,
            "Circle",
            &shaders::circle_shader(),
            Some(wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &circle_attributes,
            }),
        );

        let line_attributes = wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32x4,
            3 => Float32,
        ];
        let line_pipeline = create_trail_pipeline(
            &device,
            &pipeline_layout,
            "Line",
            &shaders::line_shader(),
            Some(wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &line_attributes,
            }),
        );

        let circles = InstanceBuffer::new(
            &device,
            "Circle Instance Buffer",
            std::mem::size_of::<CircleInstance>(),
            4096,
        );
        let lines = InstanceBuffer::new(
            &device,
            "Line Instance Buffer",
            std::mem::size_of::<LineInstance>(),
            1024,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            trail,
            viewport_buffer,
            overlay_buffer,
            uniform_bind_group,
            fade_pipeline,
            circle_pipeline,
            line_pipeline,
            circles,
            lines,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.trail.resize(&self.device, new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn begin_frame(&mut self) -> Result<Frame, wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        Ok(Frame {
            output,
            view,
            encoder,
        })
    }

    /// Paint `list` into the trail and copy the trail to the frame.
    ///
    /// `logical_size` is the canvas size the list was recorded for. An empty
    /// list leaves the trail as it is, which is how a paused loop looks.
    pub fn draw(&mut self, frame: &mut Frame, list: &DrawList, logical_size: [f32; 2]) {
        if !list.is_empty() {
            self.paint_trail(&mut frame.encoder, list, logical_size);
        }
        self.trail.present(&mut frame.encoder, &frame.view);
    }

    pub fn finish(&self, frame: Frame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.output.present();
    }

    fn paint_trail(&mut self, encoder: &mut wgpu::CommandEncoder, list: &DrawList, logical_size: [f32; 2]) {
        let viewport = ViewportUniform {
            size: [logical_size[0].max(1.0), logical_size[1].max(1.0)],
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::bytes_of(&viewport));
        if let Some(color) = list.fade {
            self.queue
                .write_buffer(&self.overlay_buffer, 0, bytemuck::bytes_of(&OverlayUniform { color }));
        }
        self.circles.upload(&self.device, &self.queue, &list.circles);
        self.lines.upload(&self.device, &self.queue, &list.lines);

        let load = match list.clear {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Trail Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.trail.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        if list.fade.is_some() {
            pass.set_pipeline(&self.fade_pipeline);
            pass.draw(0..3, 0..1);
        }
        if self.circles.len > 0 {
            pass.set_pipeline(&self.circle_pipeline);
            pass.set_vertex_buffer(0, self.circles.buffer.slice(..));
            pass.draw(0..6, 0..self.circles.len);
        }
        if self.lines.len > 0 {
            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
            pass.draw(0..6, 0..self.lines.len);
        }
    }
}

fn create_trail_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    name: &str,
    source: &str,
    instances: Option<wgpu::VertexBufferLayout<'_>>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let buffers: Vec<wgpu::VertexBufferLayout<'_>> = instances.into_iter().collect();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name} Pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TRAIL_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        multiview: None,
        cache: None,
    })
}
