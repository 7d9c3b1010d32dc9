use std::time::{Duration, Instant};

/// Timing of one presented frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds.
    pub dt: f32,

    /// Zero-based index of the frame.
    pub frame_index: u64,
}

/// Counts presented frames and measures their pacing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
            frames: 0,
        }
    }

    /// Records a presented frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frames,
        };
        self.frames += 1;
        ft
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.last.saturating_duration_since(self.started)
    }

    /// Average frame rate over the clock's lifetime; zero before two frames.
    pub fn average_fps(&self) -> f32 {
        let secs = self.elapsed().as_secs_f32();
        if self.frames < 2 || secs <= 0.0 {
            return 0.0;
        }
        self.frames as f32 / secs
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
