// src/rendering_lib/vertex.rs

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex of a shaded box face.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FaceVertex {
    /// Pixels (origin top-left) plus depth in [0, 1].
    pub position: [f32; 3],
    pub color: [f32; 4],
    /// 0 = no fog, 1 = fully fogged.
    pub fog: f32,
}

impl FaceVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4, 2 => Float32];

    pub fn new(position: [f32; 3], color: [f32; 4], fog: f32) -> Self {
        Self { position, color, fog }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
