// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use log::debug;
use wgpu::util::DeviceExt;

use super::painter::{collect_faces, Lighting};
use super::vertex::FaceVertex;
use crate::config::RenderConfig;
use crate::engine_lib::camera::Camera;
use crate::engine_lib::scene_types::Scene;
use crate::engine_lib::transform::Transform;

const INITIAL_VERTEX_CAPACITY: usize = 4 * 6 * 64;
const INITIAL_INDEX_CAPACITY: usize = 6 * 6 * 64;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    width: f32,
    height: f32,
    _pad0: f32,
    _pad1: f32,
    fog_color: [f32; 4],
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_buffer(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Draws every mesh node as flat-shaded, fogged boxes.
pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    depth_view: wgpu::TextureView,

    frame_vertices: Vec<FaceVertex>,
    frame_indices: Vec<u16>,

    frame_uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    lighting: Lighting,
    clear_color: [f32; 4],
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        render: &RenderConfig,
        width: u32,
        height: u32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Box Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let frame_uniform = FrameUniform {
            width: width as f32,
            height: height as f32,
            _pad0: 0.0,
            _pad1: 0.0,
            fog_color: render.clear_color,
        };
        let frame_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&frame_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("frame_bind_group_layout"),
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: frame_uniform_buffer.as_entire_binding() }],
            label: Some("frame_bind_group"),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Box Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Box Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[FaceVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Faces are culled on the CPU; screen winding varies.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
        });

        Self {
            render_pipeline,
            vertex_buffer: create_buffer(
                device,
                "Box Vertex Buffer",
                (INITIAL_VERTEX_CAPACITY * std::mem::size_of::<FaceVertex>()) as u64,
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: create_buffer(
                device,
                "Box Index Buffer",
                (INITIAL_INDEX_CAPACITY * std::mem::size_of::<u16>()) as u64,
                wgpu::BufferUsages::INDEX,
            ),
            depth_view: create_depth_view(device, width, height),
            frame_vertices: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            frame_indices: Vec::with_capacity(INITIAL_INDEX_CAPACITY),
            frame_uniform_buffer,
            frame_bind_group,
            lighting: Lighting::from_config(render),
            clear_color: render.clear_color,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_view(device, width, height);
    }

    fn add_polygon_to_frame(&mut self, points: &[glam::Vec3], color: [f32; 4], fog: f32) {
        if points.len() < 3 {
            return;
        }
        let start = self.frame_vertices.len();
        if start + points.len() > u16::MAX as usize {
            return;
        }
        let start = start as u16;
        self.frame_vertices.extend(points.iter().map(|p| FaceVertex::new(p.to_array(), color, fog)));
        for i in 1..(points.len() as u16 - 1) {
            self.frame_indices.extend_from_slice(&[start, start + i, start + i + 1]);
        }
    }

    /// Makes sure `buffer` holds at least `needed` bytes, doubling when it doesn't.
    fn ensure_capacity(device: &wgpu::Device, buffer: &mut wgpu::Buffer, needed: u64, label: &str, usage: wgpu::BufferUsages) {
        if needed <= buffer.size() {
            return;
        }
        let size = needed.next_power_of_two();
        debug!("growing {label} to {size} bytes");
        *buffer = create_buffer(device, label, size, usage);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
        camera_host: &Transform,
        screen_width: f32,
        screen_height: f32,
    ) {
        let frame_uniform = FrameUniform {
            width: screen_width,
            height: screen_height,
            _pad0: 0.0,
            _pad1: 0.0,
            fog_color: self.clear_color,
        };
        queue.write_buffer(&self.frame_uniform_buffer, 0, bytemuck::bytes_of(&frame_uniform));

        self.frame_vertices.clear();
        self.frame_indices.clear();
        for face in collect_faces(scene, camera, camera_host, &self.lighting, screen_width, screen_height) {
            self.add_polygon_to_frame(&face.points, face.color, face.fog);
        }

        // u16 indices are padded to an even count for 4-byte copy alignment.
        if self.frame_indices.len() % 2 == 1 {
            self.frame_indices.push(0);
        }
        let index_count = self.frame_indices.len() as u32;

        if !self.frame_indices.is_empty() {
            let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.frame_vertices);
            let index_bytes: &[u8] = bytemuck::cast_slice(&self.frame_indices);
            Self::ensure_capacity(device, &mut self.vertex_buffer, vertex_bytes.len() as u64, "Box Vertex Buffer", wgpu::BufferUsages::VERTEX);
            Self::ensure_capacity(device, &mut self.index_buffer, index_bytes.len() as u64, "Box Index Buffer", wgpu::BufferUsages::INDEX);
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
        }

        let [r, g, b, a] = self.clear_color.map(f64::from);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Box Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if index_count > 0 {
            let vertex_bytes = (self.frame_vertices.len() * std::mem::size_of::<FaceVertex>()) as u64;
            let index_bytes = (self.frame_indices.len() * std::mem::size_of::<u16>()) as u64;
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
            render_pass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..index_count, 0, 0..1);
        }
    }
}
