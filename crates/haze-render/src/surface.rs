//! The drawing surface contract the effect renders through

use crate::sprite::Sprite;
use haze_core::{CanvasSize, Rect};

/// A 2D drawing target with canvas-like semantics.
///
/// `draw_image` composites with the opacity most recently passed to
/// `set_global_alpha`.
pub trait DrawSurface {
    /// Surface dimensions in pixels
    fn size(&self) -> CanvasSize;

    /// Reset the pixels inside `rect` to fully transparent
    fn clear_rect(&mut self, rect: &Rect);

    /// Opacity applied to subsequent draws, in [0, 1]
    fn set_global_alpha(&mut self, alpha: f64);

    /// Draw `sprite` scaled into the `width` x `height` box at (`x`, `y`)
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64, width: f64, height: f64);
}
