use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::paint::Rgba;

use super::common::TEXTURE_FORMAT;
use super::image::Image;
use super::RenderCtx;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

impl WrapMode {
    pub(crate) fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::Mirror => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Sampling filter for minification and magnification.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

impl FilterMode {
    pub(crate) fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// GPU texture plus its sampling settings.
///
/// Not `Clone`: share it with `Rc<Texture>`. A failed load yields an
/// invalid texture (zero-sized, nothing bound) instead of an error; check
/// [`valid`](Self::valid).
///
/// Every texture has a process-unique `id`; `generation` changes whenever
/// its pixels or sampler settings change, which invalidates cached bindings.
pub struct Texture {
    id: u64,
    generation: u64,
    gpu: Option<GpuTexture>,
    size: (u32, u32),
    wrap: WrapMode,
    filter: FilterMode,
    image: Option<Image>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("size", &self.size)
            .field("valid", &self.valid())
            .field("wrap", &self.wrap)
            .field("filter", &self.filter)
            .finish()
    }
}

impl Texture {
    /// A texture with nothing bound.
    pub fn invalid() -> Self {
        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            gpu: None,
            size: (0, 0),
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
            image: None,
        }
    }

    /// A `width x height` texture filled with `color`.
    pub fn create(ctx: &RenderCtx<'_>, width: u32, height: u32, color: Rgba) -> Self {
        Self::create_from(ctx, &Image::create(width, height, color))
    }

    /// Uploads `image`; the texture keeps a CPU copy (see [`image`](Self::image)).
    pub fn create_from(ctx: &RenderCtx<'_>, image: &Image) -> Self {
        let mut texture = Self::invalid();
        texture.update(ctx, image);
        texture
    }

    /// Loads an image file. On failure logs a warning and returns an invalid texture.
    pub fn load(ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> Self {
        match Image::load(path) {
            Ok(image) => Self::create_from(ctx, &image),
            Err(e) => {
                log::warn!("{e}");
                Self::invalid()
            }
        }
    }

    /// A texture usable both as a render attachment and for sampling.
    pub(crate) fn render_attachment(ctx: &RenderCtx<'_>, width: u32, height: u32) -> Self {
        let mut texture = Self::invalid();
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST;
        texture.gpu = Some(allocate(ctx, width, height, usage, "lumen render texture"));
        texture.size = (width, height);
        texture
    }

    /// Replaces the pixels. A size change reallocates the GPU texture.
    ///
    /// An empty or oversized image leaves the texture invalid.
    pub fn update(&mut self, ctx: &RenderCtx<'_>, image: &Image) {
        let (w, h) = image.size();
        let max = ctx.max_texture_dimension();
        if w == 0 || h == 0 || w > max || h > max {
            log::warn!("texture {}: cannot upload {w}x{h} image (limit {max})", self.id);
            self.gpu = None;
            self.size = (0, 0);
            self.image = None;
            self.generation += 1;
            return;
        }

        if self.size != (w, h) || self.gpu.is_none() {
            let usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
            self.gpu = Some(allocate(ctx, w, h, usage, "lumen texture"));
            self.size = (w, h);
        }

        if let Some(gpu) = &self.gpu {
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &gpu.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                image.as_bytes(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            );
        }

        self.image = Some(image.clone());
        self.generation += 1;
    }

    #[inline]
    pub fn valid(&self) -> bool {
        self.gpu.is_some()
    }

    /// `(width, height)` in pixels; `(0, 0)` when invalid.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_wrap_mode(&mut self, wrap: WrapMode) {
        if self.wrap != wrap {
            self.wrap = wrap;
            self.generation += 1;
        }
    }

    #[inline]
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn set_filter_mode(&mut self, filter: FilterMode) {
        if self.filter != filter {
            self.filter = filter;
            self.generation += 1;
        }
    }

    #[inline]
    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    /// The pixels this texture was last uploaded from, if any.
    #[inline]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    #[inline]
    pub(crate) fn view(&self) -> Option<&wgpu::TextureView> {
        self.gpu.as_ref().map(|g| &g.view)
    }
}

fn allocate(
    ctx: &RenderCtx<'_>,
    width: u32,
    height: u32,
    usage: wgpu::TextureUsages,
    label: &str,
) -> GpuTexture {
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture, view }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_texture_is_zero_sized() {
        let t = Texture::invalid();
        assert!(!t.valid());
        assert_eq!(t.size(), (0, 0));
        assert!(t.image().is_none());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Texture::invalid().id(), Texture::invalid().id());
    }

    #[test]
    fn sampler_changes_bump_generation() {
        let mut t = Texture::invalid();
        let g0 = t.generation();
        t.set_wrap_mode(WrapMode::Repeat);
        assert_eq!(t.generation(), g0 + 1);
        t.set_wrap_mode(WrapMode::Repeat);
        assert_eq!(t.generation(), g0 + 1);
        t.set_filter_mode(FilterMode::Nearest);
        assert_eq!(t.generation(), g0 + 2);
        assert_eq!(t.wrap_mode(), WrapMode::Repeat);
        assert_eq!(t.filter_mode(), FilterMode::Nearest);
    }

    #[test]
    fn wrap_modes_map_to_address_modes() {
        assert_eq!(WrapMode::Clamp.to_wgpu(), wgpu::AddressMode::ClampToEdge);
        assert_eq!(WrapMode::Mirror.to_wgpu(), wgpu::AddressMode::MirrorRepeat);
    }
}
