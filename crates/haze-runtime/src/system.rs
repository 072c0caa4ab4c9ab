//! Runtime system trait

use crate::context::SimContext;
use haze_core::{Rect, Result};
use haze_render::DrawSurface;

/// Everything a system may touch during one frame
pub struct Frame<'a> {
    /// Milliseconds since the previous frame
    pub elapsed_ms: f64,
    pub sim: &'a mut SimContext,
    pub surface: &'a mut dyn DrawSurface,
    /// Dirty-region accumulator; systems grow it to cover what they draw
    pub dirty: &'a mut Rect,
    /// Sprites drawn so far by this system during the frame
    pub draws: usize,
}

/// A system that can be ticked by the render loop
///
/// Systems run in registration order, once per frame. Each system both
/// advances its simulation and draws it during `frame`.
pub trait RuntimeSystem {
    /// Called once before the first frame
    fn initialize(&mut self, sim: &mut SimContext) -> Result<()>;

    /// Update by `frame.elapsed_ms`, then draw onto `frame.surface`
    fn frame(&mut self, frame: &mut Frame<'_>) -> Result<()>;

    /// Called when the loop is torn down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;

    /// Population counters for status output
    fn stats(&self) -> SystemStats {
        SystemStats::default()
    }
}

/// Population counters reported by a system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStats {
    /// Items owned by the system (e.g. pooled particles)
    pub total: usize,
    /// Items currently alive and drawn
    pub active: usize,
}
