//! Software raster surface backed by an RGBA image buffer

use crate::sprite::Sprite;
use crate::surface::DrawSurface;
use haze_core::{CanvasSize, HazeError, Rect, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// CPU canvas: nearest-neighbour sprite scaling with source-over blending.
pub struct CanvasSurface {
    pixels: RgbaImage,
    global_alpha: f64,
}

impl CanvasSurface {
    /// Create a transparent canvas. Zero-sized canvases cannot host the effect.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HazeError::SurfaceUnavailable(format!(
                "cannot create a {width}x{height} canvas"
            )));
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            global_alpha: 1.0,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.pixels.width() && y < self.pixels.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Fill the whole canvas, e.g. with a backdrop colour before a render
    pub fn fill(&mut self, color: [u8; 4]) {
        for p in self.pixels.pixels_mut() {
            *p = Rgba(color);
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| {
                HazeError::RenderError(format!("failed to write {}: {e}", path.display()))
            })
    }

    /// Pixel-aligned span of `rect` clipped to the canvas, as (x0, y0, x1, y1)
    fn pixel_span(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = rect.intersect(&self.size().bounds());
        if clipped.is_empty() {
            return None;
        }
        let x0 = clipped.left.floor().max(0.0) as u32;
        let y0 = clipped.top.floor().max(0.0) as u32;
        let x1 = (clipped.right.ceil() as u32).min(self.pixels.width());
        let y1 = (clipped.bottom.ceil() as u32).min(self.pixels.height());
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(self.pixels.width(), self.pixels.height())
    }

    fn clear_rect(&mut self, rect: &Rect) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64, width: f64, height: f64) {
        if self.global_alpha <= 0.0 || !(width > 0.0 && height > 0.0) {
            return;
        }
        let dest = Rect::from_xywh(x, y, width, height);
        let Some((x0, y0, x1, y1)) = self.pixel_span(&dest) else {
            return;
        };
        let src = sprite.image();
        let (sw, sh) = (src.width(), src.height());
        for py in y0..y1 {
            // Sample at the destination pixel centre
            let v = ((py as f64 + 0.5 - y) / height * sh as f64).floor();
            if v < 0.0 || v >= sh as f64 {
                continue;
            }
            for px in x0..x1 {
                let u = ((px as f64 + 0.5 - x) / width * sw as f64).floor();
                if u < 0.0 || u >= sw as f64 {
                    continue;
                }
                let s = src.get_pixel(u as u32, v as u32).0;
                let d = self.pixels.get_pixel_mut(px, py);
                d.0 = blend_over(s, d.0, self.global_alpha);
            }
        }
    }
}

/// Source-over composite of straight-alpha RGBA, source weighted by `opacity`
fn blend_over(src: [u8; 4], dst: [u8; 4], opacity: f64) -> [u8; 4] {
    let sa = src[3] as f64 / 255.0 * opacity;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f64 * sa + dst[i] as f64 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}
