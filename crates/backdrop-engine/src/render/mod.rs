//! GPU rendering of the background quad.
//!
//! Each piece owns its wgpu objects:
//! - [`texture`]: image decoding, texture + mip chain + sampler
//! - [`shader`]: stage compilation and program linking
//! - [`geometry`]: quad vertex/index buffers and attribute layout
//! - [`Background`]: ties them together and records the per-frame draw

mod background;
mod ctx;
pub mod geometry;
pub mod shader;
pub mod texture;

pub use background::{Background, ResourceKind};
pub use ctx::{RenderCtx, RenderTarget};
pub use geometry::{GeometryBuffers, QuadVertex};
pub use shader::{LinkedProgram, ShaderSources};
pub use texture::BackgroundTexture;
