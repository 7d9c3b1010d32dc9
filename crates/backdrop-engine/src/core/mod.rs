//! Render loop and launch sequence.
//!
//! [`run_frames`] drives any [`Platform`](crate::platform::Platform) against
//! any [`Scene`]; [`run`] adds the setup and teardown around it for the GPU
//! platforms.

mod app;
mod launch;

pub use app::{run_frames, LoopExit, LoopSummary, Scene};
pub use launch::{launch_embedded, launch_windowed, run, RunSummary};
