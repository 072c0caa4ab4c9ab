//! Starfield benchmark: many dots tweening out from the field centre at once

use crate::dot::Dot;
use crate::strategy::{Properties, StrategyTable, TweenScene, TweenStrategy};
use haze_core::{HazeError, Result, SimRng};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Parameters for one benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub engine: String,
    pub properties: Properties,
    pub dots: usize,
    pub field_width: f64,
    pub field_height: f64,
    /// PRNG seed; a time-derived seed is used when absent
    pub seed: Option<u32>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            engine: "ticker".to_string(),
            properties: Properties::Normal,
            dots: 500,
            field_width: 940.0,
            field_height: 300.0,
            seed: None,
        }
    }
}

/// Drives every dot with one resolved strategy.
///
/// The strategy is resolved once in `start`; `step` never looks anything up.
pub struct BenchHarness {
    strategy: Arc<dyn TweenStrategy>,
    scene: TweenScene,
    dots: Vec<Dot>,
    rng: SimRng,
    frames: u64,
    completed: u64,
    simulated_ms: f64,
    started: Instant,
    stopped: bool,
}

impl BenchHarness {
    /// Resolve the strategy, create the dots and start every dot's first tween
    pub fn start(table: &StrategyTable, config: &BenchConfig) -> Result<Self> {
        let properties = table.calibrate(&config.engine, config.properties);
        if properties != config.properties {
            log::warn!(
                "Engine '{}' cannot animate {}; using {}",
                config.engine,
                config.properties,
                properties
            );
        }
        let strategy = table.resolve(&config.engine, properties)?;
        let scene = TweenScene::new(config.field_width, config.field_height, strategy.as_ref());
        let mut rng = match config.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_time(),
        };

        let mut dots: Vec<Dot> = (0..config.dots)
            .map(|id| strategy.wrap_dot(id, scene.starting_style()))
            .collect();
        for dot in dots.iter_mut().rev() {
            strategy.tween(dot, &scene, &mut rng)?;
        }

        log::info!(
            "[bench] {} with {} dot(s), radius {:.1}, duration {}",
            strategy.key(),
            dots.len(),
            scene.radius,
            scene.duration
        );
        Ok(Self {
            strategy,
            scene,
            dots,
            rng,
            frames: 0,
            completed: 0,
            simulated_ms: 0.0,
            started: Instant::now(),
            stopped: false,
        })
    }

    /// Advance every dot by `dt_ms` milliseconds. Dots whose tween finished
    /// are immediately tweened again. Returns the number of completions.
    pub fn step(&mut self, dt_ms: f64) -> Result<usize> {
        if self.stopped {
            return Err(HazeError::InvalidState(
                "benchmark already stopped".to_string(),
            ));
        }
        let dt = if self.strategy.uses_millisecond_duration() {
            dt_ms
        } else {
            dt_ms / 1000.0
        };

        let mut finished = 0;
        for dot in &mut self.dots {
            if dot.advance(dt) {
                self.strategy.tween(dot, &self.scene, &mut self.rng)?;
                finished += 1;
            }
        }

        self.frames += 1;
        self.completed += finished as u64;
        self.simulated_ms += dt_ms;
        Ok(finished)
    }

    /// Kill every dot's tweens and report
    pub fn stop(&mut self) -> BenchReport {
        for dot in &mut self.dots {
            self.strategy.stop(dot);
        }
        self.stopped = true;
        let report = self.report();
        log::info!("[bench] {report}");
        report
    }

    pub fn report(&self) -> BenchReport {
        BenchReport {
            key: self.strategy.key(),
            dots: self.dots.len(),
            frames: self.frames,
            completed: self.completed,
            simulated_ms: self.simulated_ms,
            wall: self.started.elapsed(),
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn scene(&self) -> &TweenScene {
        &self.scene
    }

    pub fn strategy(&self) -> &dyn TweenStrategy {
        self.strategy.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub key: String,
    pub dots: usize,
    pub frames: u64,
    /// Tweens that ran to completion
    pub completed: u64,
    pub simulated_ms: f64,
    pub wall: Duration,
}

impl BenchReport {
    pub fn frames_per_second(&self) -> f64 {
        per_second(self.frames as f64, self.wall)
    }

    pub fn tweens_per_second(&self) -> f64 {
        per_second(self.completed as f64, self.wall)
    }
}

fn per_second(count: f64, wall: Duration) -> f64 {
    let secs = wall.as_secs_f64();
    if secs > 0.0 {
        count / secs
    } else {
        0.0
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} dots, {} frames, {} tweens in {:.0}ms simulated / {:.1}ms wall ({:.0} frames/s, {:.0} tweens/s)",
            self.key,
            self.dots,
            self.frames,
            self.completed,
            self.simulated_ms,
            self.wall.as_secs_f64() * 1000.0,
            self.frames_per_second(),
            self.tweens_per_second()
        )
    }
}
