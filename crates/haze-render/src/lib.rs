//! Haze Render - 2D drawing for the smoke effect
//!
//! This crate provides the host-facing drawing pieces: shared sprite images
//! (with background loading), the `DrawSurface` contract, a software
//! `CanvasSurface` that rasterises into an RGBA buffer and writes PNGs, and a
//! `RecordingSurface` for headless runs.

mod canvas;
mod recording;
mod sprite;
mod surface;

pub use canvas::CanvasSurface;
pub use recording::{RecordingSurface, SurfaceOp};
pub use sprite::{AssetState, Sprite, SpriteLoader};
pub use surface::DrawSurface;
