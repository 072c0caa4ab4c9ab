//! Host frame scheduling: "call me before the next repaint"

use std::thread;
use std::time::{Duration, Instant};

/// Default fallback interval, roughly 60Hz
pub const FALLBACK_INTERVAL: Duration = Duration::from_millis(17);

/// Decides when the next frame runs.
pub trait FrameScheduler {
    /// Wait until the next frame is due. Returns `false` when the host will
    /// not deliver any further frames.
    fn request_frame(&mut self) -> bool;
}

/// Fixed-interval timer, for hosts without a repaint callback
pub struct IntervalScheduler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(FALLBACK_INTERVAL)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self) -> bool {
        let now = Instant::now();
        let due = self.next_due.unwrap_or(now + self.interval);
        if due > now {
            thread::sleep(due - now);
        }
        // Re-anchor when we fell behind so missed frames are not replayed in a burst
        let behind = Instant::now().checked_sub(self.interval).unwrap_or(due);
        let anchor = due.max(behind);
        self.next_due = Some(anchor + self.interval);
        true
    }
}

/// Fires immediately, optionally up to a fixed number of frames
pub struct ImmediateScheduler {
    remaining: Option<u64>,
}

impl ImmediateScheduler {
    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    pub fn with_limit(frames: u64) -> Self {
        Self {
            remaining: Some(frames),
        }
    }
}

impl FrameScheduler for ImmediateScheduler {
    fn request_frame(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}
