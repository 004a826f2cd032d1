//! GPU-side types and WGSL for the glow pipeline.
//!
//! One instanced quad per glow: the vertex stage expands a unit quad around
//! the instance center in pixel space, the fragment stage shades a radial
//! falloff so each instance reads as a soft circular glow.

use bytemuck::{Pod, Zeroable};

/// Per-instance glow data. Layout must match the vertex attributes declared
/// in [`crate::window`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlowInstance {
    /// Center in surface pixels.
    pub position: [f32; 2],
    /// Radius in pixels.
    pub radius: f32,
    /// Peak alpha at the center.
    pub alpha: f32,
    /// Linear RGB.
    pub color: [f32; 3],
    pub _pad: f32,
}

/// Frame uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    /// Viewport size in pixels.
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

/// Render shader for glow instances.
pub const GLOW_SHADER: &str = r#"struct Uniforms {
    viewport: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) alpha: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) alpha: f32,
    @location(3) color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let world = center + quad_pos * radius;
    let ndc = vec2<f32>(
        world.x / uniforms.viewport.x * 2.0 - 1.0,
        1.0 - world.y / uniforms.viewport.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = color;
    out.uv = quad_pos;
    out.alpha = alpha;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let falloff = 1.0 - smoothstep(0.0, 1.0, dist);
    return vec4<f32>(in.color, in.alpha * falloff * falloff);
}
"#;
