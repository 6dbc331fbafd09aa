use std::time::{Duration, Instant};

/// Run `f` and return its result with the wall time it took
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Per-frame compute / colorize timings for the display loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub compute: Duration,
    pub colorize: Duration,
}

impl FrameTiming {
    pub fn total(&self) -> Duration {
        self.compute + self.colorize
    }

    /// Frames per second this frame time would sustain
    pub fn fps(&self) -> f64 {
        let secs = self.total().as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            f64::INFINITY
        }
    }
}

/// Minimal frame clock - delta time between ticks plus a running average
#[derive(Debug)]
pub struct FrameTimer {
    last_tick: Instant,
    frames: u64,
    elapsed: Duration,
}

impl FrameTimer {
    /// Create new timer starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Get delta time since last tick and advance the timer
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.frames += 1;
        self.elapsed += delta;
        delta
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame time over every tick so far
    pub fn average(&self) -> Option<Duration> {
        u32::try_from(self.frames)
            .ok()
            .filter(|&n| n > 0)
            .map(|n| self.elapsed / n)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
