use std::time::{Duration, Instant};

/// Frame metadata - frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the first frame
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

#[derive(Debug)]
enum Timebase {
    /// Wall clock
    Realtime { start: Instant, last: Instant },
    /// Fixed step per frame, for reproducible headless runs
    Fixed { step: Duration },
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in FrameClock::realtime().take(n) { ... }`
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    elapsed: f32,
    timebase: Timebase,
}

impl FrameClock {
    /// Clock driven by the wall clock
    pub fn realtime() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            elapsed: 0.0,
            timebase: Timebase::Realtime {
                start: now,
                last: now,
            },
        }
    }

    /// Clock that advances by `step` every frame regardless of real time
    pub fn fixed(step: Duration) -> Self {
        Self {
            frame_number: 0,
            elapsed: 0.0,
            timebase: Timebase::Fixed { step },
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let (time, delta) = match &mut self.timebase {
            Timebase::Realtime { start, last } => {
                let now = Instant::now();
                let delta = now.duration_since(*last).as_secs_f32();
                *last = now;
                (now.duration_since(*start).as_secs_f32(), delta)
            }
            Timebase::Fixed { step } => {
                let delta = if self.frame_number == 0 {
                    0.0
                } else {
                    step.as_secs_f32()
                };
                (self.elapsed + delta, delta)
            }
        };

        let info = FrameInfo::new(self.frame_number, time, delta);
        self.frame_number += 1;
        self.elapsed = time;
        Some(info)
    }
}
