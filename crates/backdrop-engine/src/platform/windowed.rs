use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::{GpuPlatform, Platform};
use crate::core::LoopExit;
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::render::RenderCtx;

/// Upper bound on event pumps while waiting for the first `resumed`.
const STARTUP_PUMPS: u32 = 200;

/// Desktop window settings. Fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Background Image".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// A winit window with a wgpu swapchain, driven by non-blocking event pumps.
pub struct WindowedPlatform {
    // Declared first so the surface and window go before the event loop.
    entry: WindowEntry,
    event_loop: EventLoop<()>,
    close_requested: bool,
    surface_fatal: bool,
}

impl WindowedPlatform {
    /// Opens the window and creates its GPU context.
    ///
    /// The event loop is pumped until the application is resumed, which is
    /// when winit allows windows to be created.
    pub fn new(config: &WindowConfig, init: &GpuInit) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit event loop")?;

        let mut startup = Startup {
            config,
            init,
            entry: None,
            error: None,
        };

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(5)), &mut startup);

            if let Some(err) = startup.error.take() {
                return Err(err);
            }
            if startup.entry.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with status {code} before the window opened");
            }
        }

        let entry = startup
            .entry
            .context("windowing system never resumed the application")?;

        log::info!(
            "window \"{}\" opened ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(Self {
            entry,
            event_loop,
            close_requested: false,
            surface_fatal: false,
        })
    }
}

impl Platform for WindowedPlatform {
    type Frame = GpuFrame;

    fn name(&self) -> &'static str {
        "windowed"
    }

    fn poll(&mut self) -> ControlFlow<LoopExit> {
        let mut pump = Pump {
            entry: &mut self.entry,
            close_requested: false,
        };
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);
        self.close_requested |= pump.close_requested;

        if self.close_requested || matches!(status, PumpStatus::Exit(_)) {
            return ControlFlow::Break(LoopExit::CloseRequested);
        }

        let lost = self.entry.with_gpu(|gpu| gpu.context_loss().is_lost());
        if lost || self.surface_fatal {
            log::info!("context lost");
            return ControlFlow::Break(LoopExit::ContextLost);
        }

        ControlFlow::Continue(())
    }

    fn begin_frame(&mut self) -> Option<GpuFrame> {
        let acquired = self.entry.with_gpu(|gpu| gpu.begin_frame());
        match acquired {
            Ok(frame) => Some(frame),
            Err(err) => {
                let action = self
                    .entry
                    .with_gpu_mut(|gpu| gpu.handle_surface_error(err));
                if action == SurfaceErrorAction::Fatal {
                    log::error!("swapchain is no longer usable");
                    self.surface_fatal = true;
                }
                None
            }
        }
    }

    fn present(&mut self, frame: GpuFrame) {
        self.entry.with_window(|w| w.pre_present_notify());
        self.entry.with_gpu(|gpu| gpu.submit(frame));
    }
}

impl GpuPlatform for WindowedPlatform {
    fn render_ctx(&self) -> RenderCtx<'_> {
        let gpu = self.entry.borrow_gpu();
        RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }
}

impl Drop for WindowedPlatform {
    fn drop(&mut self) {
        log::debug!("releasing window and surface");
    }
}

/// Handler used until the window exists.
struct Startup<'a> {
    config: &'a WindowConfig,
    init: &'a GpuInit,
    entry: Option<WindowEntry>,
    error: Option<anyhow::Error>,
}

impl Startup<'_> {
    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let init = self.init.clone();
        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, init)),
        }
        .try_build()
    }
}

impl ApplicationHandler for Startup<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.error.is_some() {
            return;
        }
        match self.create_entry(event_loop) {
            Ok(entry) => self.entry = Some(entry),
            Err(err) => self.error = Some(err),
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Handler for one non-blocking pump of the render loop.
struct Pump<'a> {
    entry: &'a mut WindowEntry,
    close_requested: bool,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => {
                self.entry.with_gpu_mut(|gpu| gpu.resize(size));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.entry.with_window(|w| w.inner_size());
                self.entry.with_gpu_mut(|gpu| gpu.resize(size));
            }
            _ => {}
        }
    }
}
