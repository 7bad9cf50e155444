use crate::context::GraphicsContext;
use crate::coords::{Vector2f, Viewport};
use crate::paint::Rgba;
use crate::transform::Transform;

use super::common::{DrawUniform, Topology};
use super::shader::Shader;
use super::texture::Texture;
use super::RenderCtx;

/// Something that can be drawn onto a render target.
pub trait Renderable {
    /// Draws with `transform` already composed with the target's transform.
    fn render(&mut self, canvas: &mut Canvas<'_>, transform: &Transform, shader: Option<&Shader>);
}

/// Capability interface of anything that can be drawn onto.
///
/// Implemented by [`Canvas`], which backs both window frames and
/// render-texture passes.
pub trait RenderTarget {
    /// Transform applied to everything drawn on this target.
    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    /// Target size in pixels.
    fn size(&self) -> Vector2f;

    /// The underlying GPU context.
    fn canvas(&mut self) -> Canvas<'_>;

    /// Draws `renderable` with `target transform * transform`.
    /// `shader = None` uses the shared passthrough program.
    fn render(
        &mut self,
        renderable: &mut dyn Renderable,
        transform: Option<&Transform>,
        shader: Option<&Shader>,
    ) {
        let base = self.transform();
        let combined = match transform {
            Some(t) => base.combine_with(t),
            None => base,
        };
        let mut canvas = self.canvas();
        renderable.render(&mut canvas, &combined, shader);
    }
}

/// One draw: geometry, how to assemble it, and what to shade it with.
pub(crate) struct DrawCall<'d> {
    pub vertices: &'d wgpu::Buffer,
    pub indices: &'d wgpu::Buffer,
    pub index_count: u32,
    pub topology: Topology,
    pub transform: &'d Transform,
    pub shader: Option<&'d Shader>,
    pub texture: Option<&'d Texture>,
    /// Multiplies every vertex colour; white leaves them as they are.
    pub tint: Rgba,
}

/// A colour attachment being drawn to during one frame.
///
/// Every draw records its own render pass that loads the existing
/// contents, so draws land in call order.
pub struct Canvas<'a> {
    ctx: RenderCtx<'a>,
    graphics: &'a mut GraphicsContext,
    encoder: &'a mut wgpu::CommandEncoder,
    view: &'a wgpu::TextureView,
    transform: Transform,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(
        ctx: RenderCtx<'a>,
        graphics: &'a mut GraphicsContext,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            ctx,
            graphics,
            encoder,
            view,
            transform: Transform::identity(),
        }
    }

    /// A shorter-lived handle to the same target.
    pub fn reborrow(&mut self) -> Canvas<'_> {
        Canvas {
            ctx: self.ctx,
            graphics: &mut *self.graphics,
            encoder: &mut *self.encoder,
            view: self.view,
            transform: self.transform,
        }
    }

    /// A canvas drawing into `view` instead, sharing this frame's encoder.
    pub(crate) fn redirect<'s>(
        &'s mut self,
        view: &'s wgpu::TextureView,
        format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Canvas<'s> {
        Canvas {
            ctx: RenderCtx { surface_format: format, viewport, ..self.ctx },
            graphics: &mut *self.graphics,
            encoder: &mut *self.encoder,
            view,
            transform: Transform::identity(),
        }
    }

    #[inline]
    pub fn ctx(&self) -> RenderCtx<'a> {
        self.ctx
    }

    #[inline]
    pub fn graphics(&mut self) -> &mut GraphicsContext {
        self.graphics
    }

    /// Fills the whole target with `color`.
    pub fn clear(&mut self, color: Rgba) {
        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    pub(crate) fn draw(&mut self, call: DrawCall<'_>) {
        if call.index_count == 0 {
            return;
        }

        let ctx = self.ctx;
        let res = self.graphics.gpu_mut();
        res.ensure(&ctx);

        let pipeline = {
            let (Some(noop), Some(layout)) = (res.noop(), res.pipeline_layout()) else {
                return;
            };
            let program = match call.shader {
                Some(shader) => match shader.resolve(noop) {
                    Some(p) => p,
                    None => return,
                },
                None => noop,
            };
            program.pipeline(ctx.device, layout, ctx.surface_format, call.topology)
        };

        let params = call.shader.map(Shader::params).unwrap_or_default();
        let Some((uniforms, offset)) =
            res.push_uniform(&ctx, &DrawUniform::new(call.transform, params, call.tint))
        else {
            return;
        };
        let Some(texture_group) = res.texture_bind_group(&ctx, call.texture) else {
            return;
        };

        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline);
        rpass.set_bind_group(0, &uniforms, &[offset]);
        rpass.set_bind_group(1, &texture_group, &[]);
        rpass.set_vertex_buffer(0, call.vertices.slice(..));
        rpass.set_index_buffer(call.indices.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..call.index_count, 0, 0..1);
    }
}

impl RenderTarget for Canvas<'_> {
    #[inline]
    fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    #[inline]
    fn size(&self) -> Vector2f {
        Vector2f::new(self.ctx.viewport.width, self.ctx.viewport.height)
    }

    #[inline]
    fn canvas(&mut self) -> Canvas<'_> {
        self.reborrow()
    }
}
