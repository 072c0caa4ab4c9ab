//! Haze Core - Foundational types for the haze smoke effect
//!
//! This crate provides the core types that all other haze crates depend on:
//! - `Vec2`, `Rect`, `CanvasSize` - Canvas-space geometry and the dirty region
//! - `SimRng` - Seeded PRNG for replayable simulations
//! - Error types and Result alias

mod error;
mod rand;
mod types;

pub use error::{HazeError, Result};
pub use rand::SimRng;
pub use types::{CanvasSize, Rect, Vec2};
