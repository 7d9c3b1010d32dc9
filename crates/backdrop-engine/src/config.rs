use std::path::PathBuf;

use crate::device::GpuInit;
use crate::platform::{EmbeddedConfig, WindowConfig};
use crate::render::ShaderSources;

/// Default location of the background image, relative to the working directory.
pub const DEFAULT_IMAGE_PATH: &str = "background.png";

/// Everything the demo needs to start. There is no config file; the
/// defaults are the product.
#[derive(Debug, Clone)]
pub struct BackdropConfig {
    pub image_path: PathBuf,
    pub window: WindowConfig,
    pub embedded: EmbeddedConfig,
    pub gpu: GpuInit,
    pub shaders: ShaderSources,
    /// Colour the target is cleared to before the quad is drawn.
    pub clear_color: wgpu::Color,
}

impl BackdropConfig {
    /// Defaults for the embedded display path (GL backend).
    pub fn embedded() -> Self {
        Self {
            gpu: GpuInit::embedded(),
            ..Self::default()
        }
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            window: WindowConfig::default(),
            embedded: EmbeddedConfig::default(),
            gpu: GpuInit::default(),
            shaders: ShaderSources::default(),
            clear_color: wgpu::Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let config = BackdropConfig::default();
        assert_eq!(config.image_path, PathBuf::from("background.png"));
        assert_eq!(config.window.title, "Background Image");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.embedded.max_frames, None);
    }

    #[test]
    fn embedded_defaults_use_gl() {
        let config = BackdropConfig::embedded();
        assert_eq!(config.gpu.backends, wgpu::Backends::GL);
        assert_eq!((config.embedded.width, config.embedded.height), (800, 600));
    }
}
