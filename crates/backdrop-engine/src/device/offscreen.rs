use anyhow::{Context, Result};

use super::{ContextLoss, GpuFrame, GpuInit};

/// Format of the offscreen colour target.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// wgpu device rendering into a texture it owns instead of a window.
///
/// This is the embedded display context: no native window exists, so the
/// colour target is an offscreen texture of the configured size.
pub struct OffscreenGpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: wgpu::Texture,
    size: (u32, u32),
    loss: ContextLoss,
}

impl OffscreenGpu {
    pub async fn new(init: &GpuInit, width: u32, height: u32) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no GPU adapter for backends {:?}", init.backends))?;

        let info = adapter.get_info();
        log::info!("using {} ({:?}) offscreen", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("backdrop offscreen device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let loss = ContextLoss::watch(&device);

        let max = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max && height <= max,
            "offscreen target {width}x{height} exceeds device limit {max}"
        );

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("backdrop offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Ok(Self {
            device,
            queue,
            target,
            size: (width, height),
            loss,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        OFFSCREEN_FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn context_loss(&self) -> &ContextLoss {
        &self.loss
    }

    pub fn begin_frame(&self) -> GpuFrame {
        let view = self
            .target
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("backdrop offscreen encoder"),
            });

        GpuFrame {
            surface_texture: None,
            view,
            encoder,
        }
    }

    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
    }

    /// Checks in with the device without blocking.
    ///
    /// An error here means the device can no longer make progress.
    pub fn wait_client(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Poll)
            .context("device poll failed")?;
        Ok(())
    }
}

impl Drop for OffscreenGpu {
    fn drop(&mut self) {
        self.target.destroy();
        log::debug!("offscreen context released");
    }
}
