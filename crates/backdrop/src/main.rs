use std::process::ExitCode;

use backdrop_engine::logging::{init_logging, LoggingConfig};
use backdrop_engine::BackdropConfig;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    #[cfg(feature = "embedded")]
    let result = backdrop_engine::launch_embedded(&BackdropConfig::embedded());
    #[cfg(not(feature = "embedded"))]
    let result = backdrop_engine::launch_windowed(&BackdropConfig::default());

    match result {
        Ok(summary) => {
            log::info!(
                "exited ({:?}) after {} frames",
                summary.exit,
                summary.frames
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
