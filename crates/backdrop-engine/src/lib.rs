//! Backdrop engine crate.
//!
//! Shows one image as a full-screen textured quad, either in a desktop
//! window or on a windowless GL device.

pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod platform;
pub mod render;
pub mod time;

pub use config::BackdropConfig;
pub use crate::core::{launch_embedded, launch_windowed, LoopExit, RunSummary};
pub use error::{BootError, ShaderStage, BOOT_FAILURE_EXIT_CODE};
pub use render::ResourceKind;
