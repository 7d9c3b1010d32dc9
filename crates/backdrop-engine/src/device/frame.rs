/// One frame being recorded.
///
/// `surface_texture` is `Some` only for swapchain frames; the offscreen
/// target renders into a texture it owns and has nothing to present.
pub struct GpuFrame {
    pub surface_texture: Option<wgpu::SurfaceTexture>,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
