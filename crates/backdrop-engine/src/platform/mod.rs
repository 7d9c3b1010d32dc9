//! Platform contexts the render loop can run on.
//!
//! A platform owns the rendering context and its drawable: it reports
//! whether the loop should continue, hands out frames and presents them.
//! Dropping a platform releases its context, surface and display.
//!
//! - [`WindowedPlatform`]: winit window + swapchain (desktop)
//! - [`EmbeddedPlatform`]: GL device + offscreen target, no native window

use std::ops::ControlFlow;

use crate::core::LoopExit;
use crate::device::GpuFrame;
use crate::render::RenderCtx;

mod embedded;
mod windowed;

pub use embedded::{EmbeddedConfig, EmbeddedPlatform};
pub use windowed::{WindowConfig, WindowedPlatform};

/// Capability set the render loop needs from a platform.
pub trait Platform {
    type Frame;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Processes pending platform events and checks context liveness.
    ///
    /// Must not block.
    fn poll(&mut self) -> ControlFlow<LoopExit>;

    /// Starts a frame, or `None` when this iteration should be skipped.
    fn begin_frame(&mut self) -> Option<Self::Frame>;

    fn present(&mut self, frame: Self::Frame);
}

/// A platform backed by a wgpu device.
pub trait GpuPlatform: Platform<Frame = GpuFrame> {
    fn render_ctx(&self) -> RenderCtx<'_>;
}
