use std::fmt;
use std::path::PathBuf;

/// Process status reported for every boot failure.
///
/// `-1` truncated to an unsigned process status.
pub const BOOT_FAILURE_EXIT_CODE: u8 = 255;

/// Shader stage a compile diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal failures raised before the render loop starts.
///
/// None of these are recoverable: the caller prints the message, releases
/// whatever platform state it already holds, and exits.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("failed to initialize {platform} platform: {reason}")]
    Platform {
        platform: &'static str,
        reason: String,
    },

    #[error("failed to load background image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("background image is empty ({width}x{height})")]
    ImageEmpty { width: u32, height: u32 },

    #[error("background image is {width}x{height}, device supports at most {max}x{max}")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {log}")]
    Link { log: String },
}

impl BootError {
    /// Wraps a platform setup error, keeping the whole context chain.
    pub fn platform(platform: &'static str, err: anyhow::Error) -> Self {
        BootError::Platform {
            platform,
            reason: format!("{err:#}"),
        }
    }

    pub fn exit_code(&self) -> u8 {
        BOOT_FAILURE_EXIT_CODE
    }
}
