// src/rendering_lib/mod.rs

pub mod painter;
pub mod renderer;
pub mod shader;
pub mod vertex;

pub use painter::{collect_faces, Lighting, ScreenFace};
pub use renderer::Renderer;
pub use shader::WGSL_SHADER_SOURCE;
pub use vertex::FaceVertex;
