//! Shared GPU types used by every draw.

use bytemuck::{Pod, Zeroable};

use crate::coords::Vector2f;
use crate::paint::Rgba;
use crate::transform::Transform;

/// Format of every engine-created texture, render textures included.
pub(crate) const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub(crate) const PRELUDE_WGSL: &str = include_str!("shaders/prelude.wgsl");
pub(crate) const NOOP_FRAGMENT_WGSL: &str = include_str!("shaders/noop.wgsl");

/// Number of `vec4` parameter slots a shader can read from `draw.params`.
pub const SHADER_PARAM_SLOTS: usize = 2;

// ── blend ─────────────────────────────────────────────────────────────────

/// Colours are straight alpha.
pub(crate) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

// ── vertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2  // tex_coords
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    #[inline]
    pub(crate) fn new(position: Vector2f, color: Rgba, tex_coords: Vector2f) -> Self {
        Self {
            position: [position.x, position.y],
            color: color.to_linear().to_array(),
            tex_coords: [tex_coords.x, tex_coords.y],
        }
    }
}

// ── per-draw uniform ──────────────────────────────────────────────────────

/// Uniform layout (112 bytes):
///
///  offset  0  transform  mat4x4<f32>  (column-major)
///  offset 64  params     array<vec4<f32>, 2>
///  offset 96  tint       vec4<f32>    (linear, multiplies vertex colour)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct DrawUniform {
    pub transform: [[f32; 4]; 4],
    pub params: [[f32; 4]; SHADER_PARAM_SLOTS],
    pub tint: [f32; 4],
}

impl DrawUniform {
    pub(crate) fn new(transform: &Transform, params: [[f32; 4]; SHADER_PARAM_SLOTS], tint: Rgba) -> Self {
        Self {
            transform: transform.to_cols_array(),
            params,
            tint: tint.to_linear().to_array(),
        }
    }
}

pub(crate) fn draw_uniform_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64)
}

// ── topology ──────────────────────────────────────────────────────────────

/// How a shape's index buffer is assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
    LineList,
}

impl Topology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
        }
    }

    pub(crate) fn strip_index_format(self) -> Option<wgpu::IndexFormat> {
        match self {
            Topology::TriangleStrip => Some(wgpu::IndexFormat::Uint32),
            _ => None,
        }
    }
}
