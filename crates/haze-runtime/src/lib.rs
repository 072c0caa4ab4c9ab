//! Haze Runtime - Frame loop infrastructure
//!
//! Provides the per-frame building blocks:
//! - `FrameClock`: elapsed milliseconds between frames (wall or fixed-step time)
//! - `WindField`: shared wind velocity, a bounded random walk
//! - `SimContext`: simulation state owned by the loop and passed to systems
//! - `FrameScheduler`: host repaint callback or fixed-interval fallback
//! - `RuntimeSystem`: trait for systems ticked by the loop
//! - `RenderLoop`: dirty-region tracking, authoritative pause, lifecycle

mod clock;
mod context;
mod render_loop;
mod scheduler;
mod system;
mod wind;

pub use clock::{FixedStepClock, FrameClock, TimeSource, WallClock};
pub use context::SimContext;
pub use render_loop::{FrameStats, LoopState, PauseHandle, RenderLoop};
pub use scheduler::{FrameScheduler, ImmediateScheduler, IntervalScheduler, FALLBACK_INTERVAL};
pub use system::{Frame, RuntimeSystem, SystemStats};
pub use wind::WindField;
