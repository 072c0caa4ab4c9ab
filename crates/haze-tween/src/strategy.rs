//! Tween engines and the registered strategy table
//!
//! Each engine drives the same starfield animation with a different
//! scheduling style. A strategy is looked up once per run by
//! `"<engine>_<properties>"` and then used directly.

use crate::dot::{Dot, DotState, QueuedStep};
use crate::tween::{DotStyle, Tween};
use haze_core::{HazeError, Result, SimRng, Vec2};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Tween length in seconds; millisecond engines use `DURATION_SECS * 1000`
pub const DURATION_SECS: f64 = 0.75;
/// Final edge length of a dot animated through layout properties
pub const END_SIZE: f64 = 32.0;
/// Starting edge length when the engine animates the sprite at native size
pub const NATIVE_START_SIZE: f64 = 16.0;
pub const MIN_START_SIZE: f64 = 1.0;
pub const TRANSFORM_START_SCALE: f64 = 0.06;
pub const TRANSFORM_END_SCALE: f64 = 2.0;

/// Which dot properties a strategy animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Properties {
    /// left/top/width/height
    Normal,
    /// translate/scale
    Transforms,
}

impl Properties {
    pub fn as_str(&self) -> &'static str {
        match self {
            Properties::Normal => "normal",
            Properties::Transforms => "transforms",
        }
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Properties {
    type Err = HazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Properties::Normal),
            "transforms" => Ok(Properties::Transforms),
            other => Err(HazeError::UnknownStrategy(format!(
                "properties '{other}' (expected normal or transforms)"
            ))),
        }
    }
}

/// Field geometry shared by every dot in a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenScene {
    pub center: Vec2,
    /// Distance from the centre to a field corner
    pub radius: f64,
    /// Tween duration in the strategy's time unit
    pub duration: f64,
    /// Edge length of a dot at the start of each tween
    pub start_size: f64,
}

impl TweenScene {
    pub fn new(field_width: f64, field_height: f64, strategy: &dyn TweenStrategy) -> Self {
        let center = Vec2::new(field_width / 2.0, field_height / 2.0);
        Self {
            center,
            radius: center.length(),
            duration: if strategy.uses_millisecond_duration() {
                DURATION_SECS * 1000.0
            } else {
                DURATION_SECS
            },
            start_size: if strategy.use_native_sprite_size() {
                NATIVE_START_SIZE
            } else {
                MIN_START_SIZE
            },
        }
    }

    /// Resting style every dot starts from
    pub fn starting_style(&self) -> DotStyle {
        DotStyle::square(self.center.x, self.center.y, self.start_size)
    }

    /// Start and end styles for a dot flying out at `angle`
    pub fn endpoints(&self, properties: Properties, angle: f64) -> (DotStyle, DotStyle) {
        let offset = Vec2::new(angle.cos(), angle.sin()) * self.radius;
        match properties {
            Properties::Normal => (
                self.starting_style(),
                DotStyle::square(
                    offset.x + self.center.x,
                    offset.y + self.center.y,
                    END_SIZE,
                ),
            ),
            Properties::Transforms => (
                DotStyle::Transform {
                    x: 0.0,
                    y: 0.0,
                    scale: TRANSFORM_START_SCALE,
                },
                DotStyle::Transform {
                    x: offset.x,
                    y: offset.y,
                    scale: TRANSFORM_END_SCALE,
                },
            ),
        }
    }
}

/// Capability set of one tween engine
pub trait TweenStrategy {
    fn engine(&self) -> &'static str;

    fn properties(&self) -> Properties;

    /// Table key, `"<engine>_<properties>"`
    fn key(&self) -> String {
        format!("{}_{}", self.engine(), self.properties())
    }

    /// Durations and delays are in milliseconds rather than seconds
    fn uses_millisecond_duration(&self) -> bool;

    /// Dots start at the sprite's native size instead of 1px
    fn use_native_sprite_size(&self) -> bool;

    /// Wrap a freshly created dot in whatever per-dot state the engine keeps
    fn wrap_dot(&self, id: usize, style: DotStyle) -> Dot;

    /// Reset the dot to its start style and schedule one tween after a random delay
    fn tween(&self, dot: &mut Dot, scene: &TweenScene, rng: &mut SimRng) -> Result<()>;

    /// Kill whatever is running or scheduled on the dot
    fn stop(&self, dot: &mut Dot);
}

fn random_angle(rng: &mut SimRng) -> f64 {
    rng.next_f64() * TAU
}

fn wrong_wrapper(engine: &str, id: usize) -> HazeError {
    HazeError::InvalidState(format!("dot {id} was not wrapped by the {engine} engine"))
}

/// Seconds-based engine; the delay lives inside the tween itself
#[derive(Debug, Clone, Copy)]
pub struct TickerStrategy {
    pub properties: Properties,
}

impl TweenStrategy for TickerStrategy {
    fn engine(&self) -> &'static str {
        "ticker"
    }

    fn properties(&self) -> Properties {
        self.properties
    }

    fn uses_millisecond_duration(&self) -> bool {
        false
    }

    fn use_native_sprite_size(&self) -> bool {
        self.properties == Properties::Transforms
    }

    fn wrap_dot(&self, id: usize, style: DotStyle) -> Dot {
        Dot::new(id, style, DotState::Plain)
    }

    fn tween(&self, dot: &mut Dot, scene: &TweenScene, rng: &mut SimRng) -> Result<()> {
        let angle = random_angle(rng);
        let (from, to) = scene.endpoints(self.properties, angle);
        dot.style = from;
        let delay = rng.next_f64() * scene.duration;
        dot.tween = Some(Tween::new(from, to, delay, scene.duration)?);
        Ok(())
    }

    fn stop(&self, dot: &mut Dot) {
        dot.tween = None;
    }
}

/// Millisecond engine without its own delay: a separate timer starts each
/// tween, and a kill flag stops the chain.
#[derive(Debug, Clone, Copy)]
pub struct TimerStrategy {
    pub properties: Properties,
}

impl TweenStrategy for TimerStrategy {
    fn engine(&self) -> &'static str {
        "timer"
    }

    fn properties(&self) -> Properties {
        self.properties
    }

    fn uses_millisecond_duration(&self) -> bool {
        true
    }

    fn use_native_sprite_size(&self) -> bool {
        self.properties == Properties::Transforms
    }

    fn wrap_dot(&self, id: usize, style: DotStyle) -> Dot {
        Dot::new(
            id,
            style,
            DotState::Timer {
                pending: None,
                killed: false,
            },
        )
    }

    fn tween(&self, dot: &mut Dot, scene: &TweenScene, rng: &mut SimRng) -> Result<()> {
        let id = dot.id;
        let DotState::Timer { pending, killed } = &mut dot.state else {
            return Err(wrong_wrapper(self.engine(), id));
        };
        if *killed {
            return Ok(());
        }
        let (from, to, wait, delay) = match self.properties {
            Properties::Normal => {
                let angle = random_angle(rng);
                let (from, to) = scene.endpoints(self.properties, angle);
                (from, to, scene.duration * rng.next_f64(), 0.0)
            }
            // Transforms wait twice: once on the timer, once inside the tween
            Properties::Transforms => {
                let wait = scene.duration * rng.next_f64();
                let angle = random_angle(rng);
                let (from, to) = scene.endpoints(self.properties, angle);
                (from, to, wait, scene.duration * rng.next_f64())
            }
        };
        *pending = Some((wait, Tween::new(from, to, delay, scene.duration)?));
        dot.style = from;
        Ok(())
    }

    fn stop(&self, dot: &mut Dot) {
        if let DotState::Timer { killed, .. } = &mut dot.state {
            *killed = true;
        }
    }
}

/// Millisecond engine with a per-dot effect queue. Cannot animate transforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueStrategy;

impl TweenStrategy for QueueStrategy {
    fn engine(&self) -> &'static str {
        "queue"
    }

    fn properties(&self) -> Properties {
        Properties::Normal
    }

    fn uses_millisecond_duration(&self) -> bool {
        true
    }

    fn use_native_sprite_size(&self) -> bool {
        false
    }

    fn wrap_dot(&self, id: usize, style: DotStyle) -> Dot {
        Dot::new(
            id,
            style,
            DotState::Queue {
                steps: VecDeque::with_capacity(2),
            },
        )
    }

    fn tween(&self, dot: &mut Dot, scene: &TweenScene, rng: &mut SimRng) -> Result<()> {
        let angle = random_angle(rng);
        let (from, to) = scene.endpoints(Properties::Normal, angle);
        let id = dot.id;
        let DotState::Queue { steps } = &mut dot.state else {
            return Err(wrong_wrapper(self.engine(), id));
        };
        steps.push_back(QueuedStep::Delay(rng.next_f64() * scene.duration));
        steps.push_back(QueuedStep::Animate(Tween::new(from, to, 0.0, scene.duration)?));
        dot.style = from;
        Ok(())
    }

    fn stop(&self, dot: &mut Dot) {
        if let DotState::Queue { steps } = &mut dot.state {
            steps.clear();
        }
        dot.tween = None;
    }
}

/// Registered strategies by key
pub struct StrategyTable {
    strategies: BTreeMap<String, Arc<dyn TweenStrategy>>,
}

impl StrategyTable {
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Every built-in engine/properties combination
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for properties in [Properties::Normal, Properties::Transforms] {
            table.register(Arc::new(TickerStrategy { properties }));
            table.register(Arc::new(TimerStrategy { properties }));
        }
        table.register(Arc::new(QueueStrategy));
        table
    }

    /// Register a strategy. Overwrites any existing strategy with the same key.
    pub fn register(&mut self, strategy: Arc<dyn TweenStrategy>) {
        self.strategies.insert(strategy.key(), strategy);
    }

    pub fn resolve(&self, engine: &str, properties: Properties) -> Result<Arc<dyn TweenStrategy>> {
        let key = format!("{engine}_{properties}");
        self.strategies
            .get(&key)
            .cloned()
            .ok_or(HazeError::UnknownStrategy(key))
    }

    /// Fall back to `Normal` for engines that cannot animate transforms
    pub fn calibrate(&self, engine: &str, properties: Properties) -> Properties {
        let key = format!("{engine}_{properties}");
        if self.strategies.contains_key(&key) {
            properties
        } else {
            Properties::Normal
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Distinct engine names, sorted
    pub fn engines(&self) -> Vec<&'static str> {
        let engines: BTreeSet<&'static str> =
            self.strategies.values().map(|s| s.engine()).collect();
        engines.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
