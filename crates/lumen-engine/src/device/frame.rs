/// An acquired swapchain image and the encoder recording into it.
///
/// Holding it blocks the next acquisition; hand it to
/// [`Gpu::submit`](super::Gpu::submit) promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
