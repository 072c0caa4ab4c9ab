//! Render loop: per-frame update/draw with dirty-region tracking.
//!
//! Each frame runs, in order:
//! 1. measure elapsed time
//! 2. clear the previous frame's dirty rectangle on the surface
//! 3. reset the dirty accumulator to empty
//! 4. let every system update and draw (growing the accumulator)
//! 5. advance the wind random walk
//!
//! Pausing is authoritative: once paused, `run` returns without requesting
//! another frame. Only `start` clears the pause.

use crate::clock::FrameClock;
use crate::context::SimContext;
use crate::scheduler::FrameScheduler;
use crate::system::{Frame, RuntimeSystem, SystemStats};
use haze_core::{HazeError, Rect, Result};
use haze_render::DrawSurface;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of a render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, systems not yet initialized
    Idle,
    Running,
    /// Stopped scheduling; `start` resumes
    Paused,
    /// Torn down; no further frames
    Stopped,
}

/// Thread-safe pause flag shared with whoever controls the loop
#[derive(Clone, Debug, Default)]
pub struct PauseHandle(Arc<AtomicBool>);

impl PauseHandle {
    pub fn pause(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// 1-based frame number
    pub frame: u64,
    pub elapsed_ms: f64,
    /// Region cleared at the start of the frame (previous frame's dirty region)
    pub cleared: Rect,
    /// Region drawn during this frame
    pub dirty: Rect,
    /// Sprites drawn by all systems this frame
    pub draws: usize,
    /// Wind velocity after this frame's random-walk step
    pub wind: f64,
}

pub struct RenderLoop<S: DrawSurface> {
    surface: S,
    sim: SimContext,
    clock: FrameClock,
    systems: Vec<Box<dyn RuntimeSystem>>,
    dirty: Rect,
    pause: PauseHandle,
    state: LoopState,
    frames: u64,
}

impl<S: DrawSurface> RenderLoop<S> {
    /// Create a loop drawing onto `surface`. The surface's dimensions are
    /// authoritative for the simulation canvas.
    pub fn new(surface: S, mut sim: SimContext, clock: FrameClock) -> Result<Self> {
        let size = surface.size();
        if size.width == 0 || size.height == 0 {
            return Err(HazeError::SurfaceUnavailable(format!(
                "surface is {}x{}",
                size.width, size.height
            )));
        }
        if sim.canvas != size {
            log::warn!(
                "Canvas {}x{} does not match surface {}x{}; using the surface size",
                sim.canvas.width,
                sim.canvas.height,
                size.width,
                size.height
            );
            sim.canvas = size;
        }
        Ok(Self {
            surface,
            sim,
            clock,
            systems: Vec::new(),
            // Nothing is known about the surface yet, so the first clear covers all of it
            dirty: size.bounds(),
            pause: PauseHandle::default(),
            state: LoopState::Idle,
            frames: 0,
        })
    }

    /// Register a system. Systems added after `start` are initialized immediately.
    pub fn add_system(&mut self, mut system: Box<dyn RuntimeSystem>) -> Result<()> {
        if self.state == LoopState::Stopped {
            return Err(HazeError::InvalidState(
                "cannot add a system to a stopped render loop".to_string(),
            ));
        }
        if self.state != LoopState::Idle {
            system.initialize(&mut self.sim)?;
        }
        log::debug!("Registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    /// Initialize systems on first call, clear the pause flag and mark the loop running
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            LoopState::Stopped => {
                return Err(HazeError::InvalidState(
                    "render loop has been shut down".to_string(),
                ))
            }
            LoopState::Idle => {
                for system in &mut self.systems {
                    system.initialize(&mut self.sim)?;
                }
                log::info!("Render loop started with {} system(s)", self.systems.len());
            }
            LoopState::Paused => {
                self.clock.resync();
                log::info!("Render loop resumed");
            }
            LoopState::Running => {}
        }
        self.pause.clear();
        self.state = LoopState::Running;
        Ok(())
    }

    /// Request a pause; takes effect before the next frame is scheduled
    pub fn pause(&self) {
        self.pause.pause();
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    /// Start (or resume) and keep running frames until paused or the
    /// scheduler stops delivering. Returns the number of frames run.
    ///
    /// An already running loop is entered as is, so a pause requested
    /// after `start` still holds.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) -> Result<u64> {
        if self.state != LoopState::Running {
            self.start()?;
        }
        let mut frames = 0;
        loop {
            if self.pause.is_paused() {
                break;
            }
            if !scheduler.request_frame() {
                log::debug!("Scheduler stopped delivering frames");
                break;
            }
            // The pause may have been requested while waiting for the frame
            if self.pause.is_paused() {
                break;
            }
            self.run_frame()?;
            frames += 1;
        }
        if self.pause.is_paused() {
            self.state = LoopState::Paused;
            log::info!("Render loop paused after {} frame(s)", self.frames);
        }
        Ok(frames)
    }

    /// Run one frame using the loop's clock
    pub fn run_frame(&mut self) -> Result<FrameStats> {
        self.ensure_running()?;
        let elapsed = self.clock.tick();
        self.step(elapsed)
    }

    /// Run one frame with an explicit elapsed time, bypassing the clock
    pub fn step(&mut self, elapsed_ms: f64) -> Result<FrameStats> {
        self.ensure_running()?;

        let cleared = self.dirty;
        if !cleared.is_empty() {
            self.surface.clear_rect(&cleared);
        }
        self.dirty = Rect::EMPTY;

        let mut draws = 0;
        for system in &mut self.systems {
            let mut frame = Frame {
                elapsed_ms,
                sim: &mut self.sim,
                surface: &mut self.surface,
                dirty: &mut self.dirty,
                draws: 0,
            };
            system.frame(&mut frame)?;
            draws += frame.draws;
        }

        self.sim.wind.advance(&mut self.sim.rng);
        self.frames += 1;

        let stats = FrameStats {
            frame: self.frames,
            elapsed_ms,
            cleared,
            dirty: self.dirty,
            draws,
            wind: self.sim.wind.velocity(),
        };
        log::trace!(
            "frame {} elapsed={:.1}ms draws={} dirty={:.0}px wind={:.4}",
            stats.frame,
            elapsed_ms,
            stats.draws,
            stats.dirty.area(),
            stats.wind
        );
        Ok(stats)
    }

    /// Tear down every system; the loop cannot be restarted afterwards
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }
        for system in &mut self.systems {
            system.shutdown()?;
        }
        self.state = LoopState::Stopped;
        log::info!("Render loop shut down after {} frame(s)", self.frames);
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        match self.state {
            LoopState::Running | LoopState::Paused => Ok(()),
            LoopState::Idle => Err(HazeError::InvalidState(
                "render loop has not been started".to_string(),
            )),
            LoopState::Stopped => Err(HazeError::InvalidState(
                "render loop has been shut down".to_string(),
            )),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Region drawn during the most recent frame
    pub fn dirty(&self) -> Rect {
        self.dirty
    }

    pub fn sim(&self) -> &SimContext {
        &self.sim
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Combined population counters across all systems
    pub fn stats(&self) -> SystemStats {
        self.systems
            .iter()
            .map(|s| s.stats())
            .fold(SystemStats::default(), |acc, s| SystemStats {
                total: acc.total + s.total,
                active: acc.active + s.active,
            })
    }
}
