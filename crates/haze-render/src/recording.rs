//! Surface that records operations instead of drawing them

use crate::sprite::Sprite;
use crate::surface::DrawSurface;
use haze_core::{CanvasSize, Rect};

/// One recorded surface operation
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear(Rect),
    Draw {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        alpha: f64,
    },
}

impl SurfaceOp {
    /// Bounds covered by a draw; `None` for clears
    pub fn draw_bounds(&self) -> Option<Rect> {
        match *self {
            SurfaceOp::Draw {
                x, y, width, height, ..
            } => Some(Rect::from_xywh(x, y, width, height)),
            SurfaceOp::Clear(_) => None,
        }
    }
}

/// Headless surface used by `haze simulate` and by tests.
pub struct RecordingSurface {
    size: CanvasSize,
    global_alpha: f64,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            global_alpha: 1.0,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take every recorded operation, leaving the log empty
    pub fn drain(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Draw { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn clear_rect(&mut self, rect: &Rect) {
        self.ops.push(SurfaceOp::Clear(*rect));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha;
    }

    fn draw_image(&mut self, _sprite: &Sprite, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::Draw {
            x,
            y,
            width,
            height,
            alpha: self.global_alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_alpha_in_effect() {
        let mut surface = RecordingSurface::new(CanvasSize::default());
        let sprite = Sprite::solid(4, 4, [0, 0, 0, 255]);
        surface.set_global_alpha(0.25);
        surface.draw_image(&sprite, 1.0, 2.0, 3.0, 4.0);
        surface.clear_rect(&Rect::new(0.0, 0.0, 1.0, 1.0));

        assert_eq!(surface.draw_count(), 1);
        match &surface.ops()[0] {
            SurfaceOp::Draw { alpha, .. } => assert_eq!(*alpha, 0.25),
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(
            surface.ops()[0].draw_bounds(),
            Some(Rect::new(1.0, 2.0, 4.0, 6.0))
        );

        let drained = surface.drain();
        assert_eq!(drained.len(), 2);
        assert!(surface.ops().is_empty());
    }
}
