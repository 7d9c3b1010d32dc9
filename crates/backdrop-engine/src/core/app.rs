use std::ops::ControlFlow;

use crate::platform::Platform;
use crate::time::FrameClock;

/// Something that records draw commands into a platform frame.
pub trait Scene<F> {
    fn draw(&mut self, frame: &mut F);
}

/// Why the render loop stopped. Every variant is a normal shutdown.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopExit {
    /// The window was closed (or the frame budget ran out).
    CloseRequested,
    /// The platform reported the rendering context as lost.
    ContextLost,
    /// Waiting on the device failed.
    WaitFailed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LoopSummary {
    pub exit: LoopExit,
    /// Frames drawn and presented.
    pub frames: u64,
}

/// Polls, draws and presents until the platform asks to stop.
///
/// A frame the platform cannot provide is skipped; the loop keeps polling.
pub fn run_frames<P, S>(platform: &mut P, scene: &mut S) -> LoopSummary
where
    P: Platform,
    S: Scene<P::Frame>,
{
    let mut clock = FrameClock::new();

    let exit = loop {
        if let ControlFlow::Break(exit) = platform.poll() {
            break exit;
        }

        let Some(mut frame) = platform.begin_frame() else {
            continue;
        };

        scene.draw(&mut frame);
        platform.present(frame);

        let ft = clock.tick();
        if ft.frame_index == 0 {
            log::debug!(
                "first frame presented on {} platform ({:.1} ms after start)",
                platform.name(),
                ft.dt * 1000.0
            );
        }
    };

    log::info!(
        "render loop ended ({exit:?}) after {} frames, {:.1} fps",
        clock.frames(),
        clock.average_fps()
    );

    LoopSummary {
        exit,
        frames: clock.frames(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted platform: each poll consumes one entry of `script`.
    struct FakePlatform {
        script: Vec<ControlFlow<LoopExit>>,
        skip_frames: Vec<bool>,
        presented: Vec<u32>,
        next_frame: u32,
    }

    impl FakePlatform {
        fn new(script: Vec<ControlFlow<LoopExit>>) -> Self {
            Self {
                script,
                skip_frames: Vec::new(),
                presented: Vec::new(),
                next_frame: 0,
            }
        }
    }

    impl Platform for FakePlatform {
        type Frame = u32;

        fn name(&self) -> &'static str {
            "fake"
        }

        fn poll(&mut self) -> ControlFlow<LoopExit> {
            if self.script.is_empty() {
                return ControlFlow::Break(LoopExit::CloseRequested);
            }
            self.script.remove(0)
        }

        fn begin_frame(&mut self) -> Option<u32> {
            let id = self.next_frame;
            self.next_frame += 1;
            if self.skip_frames.get(id as usize).copied().unwrap_or(false) {
                return None;
            }
            Some(id)
        }

        fn present(&mut self, frame: u32) {
            self.presented.push(frame);
        }
    }

    #[derive(Default)]
    struct CountingScene {
        drawn: Vec<u32>,
    }

    impl Scene<u32> for CountingScene {
        fn draw(&mut self, frame: &mut u32) {
            self.drawn.push(*frame);
        }
    }

    fn keep_going(n: usize) -> Vec<ControlFlow<LoopExit>> {
        vec![ControlFlow::Continue(()); n]
    }

    #[test]
    fn close_request_stops_after_drawn_frames() {
        let mut script = keep_going(3);
        script.push(ControlFlow::Break(LoopExit::CloseRequested));
        let mut platform = FakePlatform::new(script);
        let mut scene = CountingScene::default();

        let summary = run_frames(&mut platform, &mut scene);

        assert_eq!(summary, LoopSummary { exit: LoopExit::CloseRequested, frames: 3 });
        assert_eq!(scene.drawn, vec![0, 1, 2]);
        assert_eq!(platform.presented, vec![0, 1, 2]);
    }

    #[test]
    fn context_loss_before_first_frame_draws_nothing() {
        let mut platform = FakePlatform::new(vec![ControlFlow::Break(LoopExit::ContextLost)]);
        let mut scene = CountingScene::default();

        let summary = run_frames(&mut platform, &mut scene);

        assert_eq!(summary.exit, LoopExit::ContextLost);
        assert_eq!(summary.frames, 0);
        assert!(scene.drawn.is_empty());
        assert!(platform.presented.is_empty());
    }

    #[test]
    fn wait_failure_ends_the_loop() {
        let mut script = keep_going(1);
        script.push(ControlFlow::Break(LoopExit::WaitFailed));
        script.extend(keep_going(5));
        let mut platform = FakePlatform::new(script);

        let summary = run_frames(&mut platform, &mut CountingScene::default());

        assert_eq!(summary, LoopSummary { exit: LoopExit::WaitFailed, frames: 1 });
    }

    #[test]
    fn skipped_frames_are_neither_drawn_nor_presented() {
        let mut script = keep_going(4);
        script.push(ControlFlow::Break(LoopExit::CloseRequested));
        let mut platform = FakePlatform::new(script);
        platform.skip_frames = vec![false, true, true, false];
        let mut scene = CountingScene::default();

        let summary = run_frames(&mut platform, &mut scene);

        assert_eq!(summary.frames, 2);
        assert_eq!(scene.drawn, vec![0, 3]);
        assert_eq!(platform.presented, scene.drawn);
    }
}
