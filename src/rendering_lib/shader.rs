// src/rendering_lib/shader.rs

pub const WGSL_SHADER_SOURCE: &str = r#"
struct FrameUniform {
    width: f32,
    height: f32,
    _pad0: f32,
    _pad1: f32,
    fog_color: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) fog: f32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) fog: f32,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.color = in.color;
    out.fog = in.fog;

    // Pixels (y down) to NDC (y up).
    let x = in.position.x / (frame.width * 0.5) - 1.0;
    let y = 1.0 - in.position.y / (frame.height * 0.5);
    out.clip_position = vec4<f32>(x, y, in.position.z, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let rgb = mix(in.color.rgb, frame.fog_color.rgb, clamp(in.fog, 0.0, 1.0));
    return vec4<f32>(rgb, in.color.a);
}
"#;
