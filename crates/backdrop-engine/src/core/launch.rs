use crate::config::BackdropConfig;
use crate::error::BootError;
use crate::platform::{EmbeddedPlatform, GpuPlatform, WindowedPlatform};
use crate::render::{texture, Background, ResourceKind};

use super::app::{run_frames, LoopExit};

/// Outcome of a run that reached teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub exit: LoopExit,
    pub frames: u64,
    pub texture_size: (u32, u32),
    /// GPU objects released at teardown, in release order.
    pub released: Vec<ResourceKind>,
}

/// Opens a desktop window and runs the demo in it.
pub fn launch_windowed(config: &BackdropConfig) -> Result<RunSummary, BootError> {
    let platform = WindowedPlatform::new(&config.window, &config.gpu)
        .map_err(|err| BootError::platform("windowed", err))?;
    run(platform, config)
}

/// Runs the demo on the embedded display path.
pub fn launch_embedded(config: &BackdropConfig) -> Result<RunSummary, BootError> {
    let platform = EmbeddedPlatform::new(&config.embedded, &config.gpu)
        .map_err(|err| BootError::platform("embedded", err))?;
    run(platform, config)
}

/// Loads the background on an acquired platform, renders until the loop
/// ends, then tears everything down.
///
/// The image is decoded before any GPU object exists. On error the platform
/// is dropped (releasing its context) before returning.
pub fn run<P: GpuPlatform>(
    mut platform: P,
    config: &BackdropConfig,
) -> Result<RunSummary, BootError> {
    let image = texture::decode_image(&config.image_path)?;

    let mut background = {
        let ctx = platform.render_ctx();
        Background::new(&ctx, image, &config.shaders, config.clear_color)?
    };
    let texture_size = background.texture_size();

    let summary = run_frames(&mut platform, &mut background);

    let released = background.release();
    drop(platform);
    log::info!("{} GPU objects released", released.len());

    Ok(RunSummary {
        exit: summary.exit,
        frames: summary.frames,
        texture_size,
        released,
    })
}
