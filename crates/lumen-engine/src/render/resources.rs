//! GPU objects shared by every draw of one [`GraphicsContext`](crate::context::GraphicsContext).

use std::collections::HashMap;

use crate::paint::Rgba;

use super::common::{draw_uniform_min_binding_size, DrawUniform};
use super::shader::Program;
use super::texture::{FilterMode, Texture, WrapMode};
use super::RenderCtx;

/// Texture bindings unused for this many frames are dropped.
const BINDING_TTL_FRAMES: u64 = 120;

/// Minimum number of per-draw uniform slots allocated at once.
const MIN_UNIFORM_SLOTS: u64 = 64;

#[inline]
pub(crate) fn align_up(value: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        value
    } else {
        value.div_ceil(alignment) * alignment
    }
}

#[inline]
fn is_stale(last_used: u64, frame: u64) -> bool {
    frame.saturating_sub(last_used) > BINDING_TTL_FRAMES
}

// ── uniform arena ─────────────────────────────────────────────────────────

/// One dynamic-offset uniform buffer, filled front to back during a frame.
///
/// Every draw gets its own slot so uploads never overwrite data an earlier
/// pass of the same frame still reads. When full, a larger buffer replaces
/// it; passes already recorded keep the old one alive.
#[derive(Default)]
struct UniformArena {
    buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    stride: u64,
    capacity: u64,
    cursor: u64,
}

impl UniformArena {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn push(
        &mut self,
        ctx: &RenderCtx<'_>,
        layout: &wgpu::BindGroupLayout,
        data: &DrawUniform,
    ) -> Option<(wgpu::BindGroup, u32)> {
        if self.stride == 0 {
            let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
            self.stride = align_up(std::mem::size_of::<DrawUniform>() as u64, alignment);
        }

        if self.buffer.is_none() || self.cursor >= self.capacity {
            self.grow(ctx, layout);
        }

        let buffer = self.buffer.as_ref()?;
        let bind_group = self.bind_group.as_ref()?;

        let offset = self.cursor * self.stride;
        ctx.queue.write_buffer(buffer, offset, bytemuck::bytes_of(data));
        self.cursor += 1;

        Some((bind_group.clone(), u32::try_from(offset).ok()?))
    }

    fn grow(&mut self, ctx: &RenderCtx<'_>, layout: &wgpu::BindGroupLayout) {
        let capacity = (self.capacity * 2).max(MIN_UNIFORM_SLOTS);
        log::debug!("uniform arena: {} -> {capacity} slots", self.capacity);

        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen draw uniforms"),
            size: capacity * self.stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen draw uniforms bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: draw_uniform_min_binding_size(),
                }),
            }],
        });

        self.buffer = Some(buffer);
        self.bind_group = Some(bind_group);
        self.capacity = capacity;
        self.cursor = 0;
    }
}

// ── resources ─────────────────────────────────────────────────────────────

struct TextureBinding {
    generation: u64,
    bind_group: wgpu::BindGroup,
    last_used: u64,
}

/// Bind-group layouts, the noop program, the fallback white texture,
/// samplers and per-texture bindings.
///
/// Everything is created on first use; nothing here exists before a
/// device does.
#[derive(Default)]
pub(crate) struct GpuResources {
    draw_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,

    noop: Option<Program>,
    white: Option<Texture>,

    samplers: HashMap<(WrapMode, FilterMode), wgpu::Sampler>,
    bindings: HashMap<u64, TextureBinding>,
    uniforms: UniformArena,

    frame: u64,
}

impl GpuResources {
    pub(crate) fn ensure(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_layouts(ctx);

        if self.noop.is_none() {
            self.noop = Some(Program::noop(ctx.device));
        }

        if self.white.is_none() {
            self.white = Some(Texture::create(ctx, 1, 1, Rgba::WHITE));
        }
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_layout.is_some() {
            return;
        }

        let draw_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen draw bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: draw_uniform_min_binding_size(),
                },
                count: None,
            }],
        });

        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen pipeline layout"),
            bind_group_layouts: &[&draw_layout, &texture_layout],
            immediate_size: 0,
        });

        self.draw_layout = Some(draw_layout);
        self.texture_layout = Some(texture_layout);
        self.pipeline_layout = Some(pipeline_layout);
    }

    /// Starts a new frame: recycles uniform slots and drops stale bindings.
    pub(crate) fn begin_frame(&mut self) {
        self.frame += 1;
        self.uniforms.reset();

        let frame = self.frame;
        self.bindings.retain(|_, b| !is_stale(b.last_used, frame));
    }

    #[inline]
    pub(crate) fn pipeline_layout(&self) -> Option<&wgpu::PipelineLayout> {
        self.pipeline_layout.as_ref()
    }

    #[inline]
    pub(crate) fn noop(&self) -> Option<&Program> {
        self.noop.as_ref()
    }

    pub(crate) fn push_uniform(
        &mut self,
        ctx: &RenderCtx<'_>,
        data: &DrawUniform,
    ) -> Option<(wgpu::BindGroup, u32)> {
        let layout = self.draw_layout.as_ref()?;
        self.uniforms.push(ctx, layout, data)
    }

    /// Bind group for `texture`, or for the 1x1 white texture when there is
    /// none or it is invalid.
    pub(crate) fn texture_bind_group(
        &mut self,
        ctx: &RenderCtx<'_>,
        texture: Option<&Texture>,
    ) -> Option<wgpu::BindGroup> {
        let texture = match texture {
            Some(t) if t.valid() => t,
            _ => self.white.as_ref()?,
        };

        if let Some(b) = self.bindings.get_mut(&texture.id()) {
            if b.generation == texture.generation() {
                b.last_used = self.frame;
                return Some(b.bind_group.clone());
            }
        }

        let (wrap, filter) = (texture.wrap_mode(), texture.filter_mode());
        let sampler = self
            .samplers
            .entry((wrap, filter))
            .or_insert_with(|| create_sampler(ctx.device, wrap, filter))
            .clone();

        let view = texture.view()?;
        let layout = self.texture_layout.as_ref()?;

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.bindings.insert(
            texture.id(),
            TextureBinding {
                generation: texture.generation(),
                bind_group: bind_group.clone(),
                last_used: self.frame,
            },
        );
        Some(bind_group)
    }
}

fn create_sampler(device: &wgpu::Device, wrap: WrapMode, filter: FilterMode) -> wgpu::Sampler {
    let address = wrap.to_wgpu();
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("lumen sampler"),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter.to_wgpu(),
        min_filter: filter.to_wgpu(),
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(96, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(96, 0), 96);
    }

    #[test]
    fn bindings_expire_after_ttl() {
        assert!(!is_stale(10, 10 + BINDING_TTL_FRAMES));
        assert!(is_stale(10, 11 + BINDING_TTL_FRAMES));
        assert!(!is_stale(50, 10));
    }

    #[test]
    fn begin_frame_recycles_uniform_slots() {
        let mut res = GpuResources::default();
        res.uniforms.cursor = 7;
        res.begin_frame();
        assert_eq!(res.uniforms.cursor, 0);
        assert_eq!(res.frame, 1);
    }
}
