//! Frame clock: wall-clock elapsed milliseconds between frames

use std::time::Instant;

/// A monotonic millisecond time source
pub trait TimeSource {
    fn now_ms(&mut self) -> f64;
}

/// Real time, measured from construction
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Simulated time that advances by `step_ms` on every read.
/// Used for deterministic headless renders and replay tests.
pub struct FixedStepClock {
    now: f64,
    step_ms: f64,
}

impl FixedStepClock {
    pub fn new(step_ms: f64) -> Self {
        Self { now: 0.0, step_ms }
    }
}

impl TimeSource for FixedStepClock {
    fn now_ms(&mut self) -> f64 {
        let t = self.now;
        self.now += self.step_ms;
        t
    }
}

/// Tracks the time of the previous frame and reports elapsed time per frame
pub struct FrameClock {
    source: Box<dyn TimeSource>,
    /// Time of the previous frame in milliseconds
    last_frame_ms: f64,
    /// Total elapsed time reported so far
    total_ms: f64,
    frame_count: u64,
    /// Optional clamp on a single frame's elapsed time
    max_delta_ms: Option<f64>,
}

impl FrameClock {
    /// Create a clock; the first `tick` reports time since construction
    pub fn new(mut source: Box<dyn TimeSource>) -> Self {
        let last_frame_ms = source.now_ms();
        Self {
            source,
            last_frame_ms,
            total_ms: 0.0,
            frame_count: 0,
            max_delta_ms: None,
        }
    }

    pub fn wall() -> Self {
        Self::new(Box::new(WallClock::new()))
    }

    pub fn fixed_step(step_ms: f64) -> Self {
        Self::new(Box::new(FixedStepClock::new(step_ms)))
    }

    /// Clamp each frame's elapsed time (e.g. after the host was suspended)
    pub fn with_max_delta(mut self, max_delta_ms: f64) -> Self {
        self.max_delta_ms = Some(max_delta_ms);
        self
    }

    /// Advance the clock. Call once per frame; returns elapsed milliseconds.
    pub fn tick(&mut self) -> f64 {
        let now = self.source.now_ms();
        let mut elapsed = (now - self.last_frame_ms).max(0.0);
        self.last_frame_ms = now;
        if let Some(max) = self.max_delta_ms {
            elapsed = elapsed.min(max);
        }
        self.total_ms += elapsed;
        self.frame_count += 1;
        elapsed
    }

    /// Forget time that passed while no frames ran (e.g. while paused)
    pub fn resync(&mut self) {
        self.last_frame_ms = self.source.now_ms();
    }

    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
