use std::ops::ControlFlow;

use anyhow::Result;

use super::{GpuPlatform, Platform};
use crate::core::LoopExit;
use crate::device::{ContextLoss, GpuFrame, GpuInit, OffscreenGpu};
use crate::render::RenderCtx;

/// Embedded display settings.
#[derive(Debug, Clone)]
pub struct EmbeddedConfig {
    pub width: u32,
    pub height: u32,
    /// Stop after this many frames. `None` runs until the context is lost.
    pub max_frames: Option<u64>,
}

impl Default for EmbeddedConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            max_frames: None,
        }
    }
}

/// Renders into an offscreen target on a device with no native window.
///
/// The loop ends when the device reports loss, when a non-blocking device
/// poll fails, or when the optional frame budget is spent.
pub struct EmbeddedPlatform {
    gpu: OffscreenGpu,
    frames_left: Option<u64>,
}

impl EmbeddedPlatform {
    /// Acquires the device and the offscreen target. Every step is checked.
    pub fn new(config: &EmbeddedConfig, init: &GpuInit) -> Result<Self> {
        let gpu = pollster::block_on(OffscreenGpu::new(init, config.width, config.height))?;
        log::info!(
            "embedded context ready ({}x{} offscreen)",
            config.width,
            config.height
        );

        Ok(Self {
            gpu,
            frames_left: config.max_frames,
        })
    }

    /// Handle for observing or simulating context loss.
    pub fn context_loss(&self) -> ContextLoss {
        self.gpu.context_loss().clone()
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }
}

impl Platform for EmbeddedPlatform {
    type Frame = GpuFrame;

    fn name(&self) -> &'static str {
        "embedded"
    }

    fn poll(&mut self) -> ControlFlow<LoopExit> {
        if self.gpu.context_loss().is_lost() {
            log::info!("context lost");
            return ControlFlow::Break(LoopExit::ContextLost);
        }

        if let Err(err) = self.gpu.wait_client() {
            log::warn!("{err:#}");
            return ControlFlow::Break(LoopExit::WaitFailed);
        }

        if self.frames_left == Some(0) {
            return ControlFlow::Break(LoopExit::CloseRequested);
        }

        ControlFlow::Continue(())
    }

    fn begin_frame(&mut self) -> Option<GpuFrame> {
        Some(self.gpu.begin_frame())
    }

    fn present(&mut self, frame: GpuFrame) {
        self.gpu.submit(frame);
        if let Some(left) = self.frames_left.as_mut() {
            *left = left.saturating_sub(1);
        }
    }
}

impl GpuPlatform for EmbeddedPlatform {
    fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.format())
    }
}
