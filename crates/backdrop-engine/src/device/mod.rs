//! GPU device management.
//!
//! Two rendering contexts share the same frame type:
//! - [`Gpu`]: device + swapchain bound to a window (desktop path)
//! - [`OffscreenGpu`]: device + owned colour target (embedded path)

mod frame;
mod gpu;
mod init;
mod lost;
mod offscreen;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use lost::ContextLoss;
pub use offscreen::{OffscreenGpu, OFFSCREEN_FORMAT};
pub use surface::SurfaceErrorAction;
