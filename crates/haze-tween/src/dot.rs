//! Benchmark dots and their per-engine scheduling state

use crate::tween::{DotStyle, Tween};
use std::collections::VecDeque;

/// One step in a queue-style engine's per-dot effect queue
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedStep {
    Delay(f64),
    Animate(Tween),
}

/// Engine-specific wrapper state, created by `TweenStrategy::wrap_dot`
#[derive(Debug, Clone, PartialEq)]
pub enum DotState {
    /// No wrapper; the tween carries its own delay
    Plain,
    /// A separate delay timer that starts the tween unless the dot was killed
    Timer {
        pending: Option<(f64, Tween)>,
        killed: bool,
    },
    /// Delay and animation steps run one after another
    Queue { steps: VecDeque<QueuedStep> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub id: usize,
    pub style: DotStyle,
    pub tween: Option<Tween>,
    pub state: DotState,
}

impl Dot {
    pub fn new(id: usize, style: DotStyle, state: DotState) -> Self {
        Self {
            id,
            style,
            tween: None,
            state,
        }
    }

    /// Advance by `dt` in the engine's time unit. Returns `true` when a
    /// tween finished during this call.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.tween.is_none() && !self.start_next(dt) {
            return false;
        }

        let Some(tween) = &mut self.tween else {
            return false;
        };
        tween.advance(dt);
        self.style = tween.sample();
        if tween.is_complete() {
            self.tween = None;
            return true;
        }
        false
    }

    /// Run the wrapper's gate. Returns `true` when a tween is ready to animate
    /// in this same call.
    fn start_next(&mut self, dt: f64) -> bool {
        match &mut self.state {
            DotState::Plain => false,
            DotState::Timer { pending, killed } => {
                let Some((remaining, _)) = pending else {
                    return false;
                };
                *remaining -= dt;
                if *remaining > 0.0 {
                    return false;
                }
                let fired = pending.take().map(|(_, tween)| tween);
                if !*killed {
                    self.tween = fired;
                }
                false
            }
            DotState::Queue { steps } => {
                if let Some(QueuedStep::Delay(remaining)) = steps.front_mut() {
                    *remaining -= dt;
                    if *remaining > 0.0 {
                        return false;
                    }
                    steps.pop_front();
                    return false;
                }
                if let Some(QueuedStep::Animate(tween)) = steps.pop_front() {
                    self.tween = Some(tween);
                    return true;
                }
                false
            }
        }
    }

    /// Nothing is running or waiting to run
    pub fn is_idle(&self) -> bool {
        if self.tween.is_some() {
            return false;
        }
        match &self.state {
            DotState::Plain => true,
            DotState::Timer { pending, killed } => pending.is_none() || *killed,
            DotState::Queue { steps } => steps.is_empty(),
        }
    }
}
