//! Haze Tween - Animation engine benchmark
//!
//! Many dots tween outward from the centre of a field at random angles and
//! random delays, re-tweening as soon as they land. The same harness drives
//! every engine; only the registered `TweenStrategy` differs:
//! - `ticker`: seconds-based, delay built into the tween
//! - `timer`: milliseconds, separate delay timer with a kill flag
//! - `queue`: milliseconds, per-dot delay/animate queue, layout properties only

pub mod dot;
pub mod harness;
pub mod strategy;
pub mod tween;

pub use dot::{Dot, DotState, QueuedStep};
pub use harness::{BenchConfig, BenchHarness, BenchReport};
pub use strategy::{
    Properties, QueueStrategy, StrategyTable, TickerStrategy, TimerStrategy, TweenScene,
    TweenStrategy,
};
pub use tween::{cubic_in, DotStyle, Tween};
