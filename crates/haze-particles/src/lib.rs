//! Haze Particles - Smoke emitters
//!
//! Provides pooled per-emitter smoke simulation with:
//! - Fixed-size pools, staggered at start so a plume is visible immediately
//! - Fade-in/fade-out lifetime curve with continuous growth
//! - Probabilistic rebirth; particles that lose the roll freeze for good
//! - Dirty-region accumulation while drawing
//! - `SmokeEffect`, the `RuntimeSystem` that ties emitters to the render loop

pub mod config;
pub mod effect;
pub mod emitter;
pub mod particle;

pub use config::{EffectConfig, SpriteConfig, WindConfig};
pub use effect::SmokeEffect;
pub use emitter::{Emitter, EmitterConfig, EmitterParams, EmitterTick};
pub use particle::{Particle, ParticleEvent};
