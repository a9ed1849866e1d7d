//! Frame pacing for the match runner.
//!
//! The fight always steps at a fixed frame length. In realtime mode the
//! clock measures wall time, feeds it into an accumulator and sleeps out the
//! rest of each frame; otherwise frames run back to back.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Most fixed steps run for one measured frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Longest wall-clock delta accepted in one frame.
const MAX_DELTA: f32 = 0.25;

/// Frame pacing and fixed-step accumulation.
#[derive(Debug)]
pub struct FrameClock {
    /// Length of one fixed step in seconds
    fixed_dt: f32,
    /// Wall-clock budget per frame
    frame_budget: Duration,
    /// Start of the current frame
    last_frame: Instant,
    /// Unconsumed wall time
    accumulator: f32,
    /// Sleep out each frame
    realtime: bool,
    /// Recent measured deltas
    frame_times: VecDeque<f32>,
}

impl FrameClock {
    /// Number of measured deltas kept for averaging.
    const SAMPLES: usize = 120;

    /// Creates a clock stepping at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            fixed_dt: 1.0 / target_fps as f32,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            realtime: false,
            frame_times: VecDeque::with_capacity(Self::SAMPLES),
        }
    }

    /// Enables or disables wall-clock pacing.
    #[must_use]
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Length of one fixed step in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Whether frames are paced in wall time.
    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Starts a frame and returns how many fixed steps to run.
    ///
    /// Outside realtime mode this is always one.
    pub fn begin_frame(&mut self) -> u32 {
        if !self.realtime {
            return 1;
        }
        let dt = self.measure();
        self.accumulate(dt)
    }

    /// Sleeps for whatever is left of the frame budget in realtime mode.
    pub fn end_frame(&self) {
        if !self.realtime {
            return;
        }
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    fn measure(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_DELTA);
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > Self::SAMPLES {
            self.frame_times.pop_front();
        }
        dt
    }

    /// Adds wall time and returns the number of fixed steps it covers.
    ///
    /// Capped per frame; a backlog left after the cap is dropped.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }
        steps
    }

    /// Frames per second averaged over recent measured frames.
    #[must_use]
    pub fn average_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }
}
