//! Sprite images and asynchronous sprite loading

use haze_core::{HazeError, Result};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// A shared, read-only RGBA image drawn by every particle of an emitter.
///
/// Cloning is cheap: the pixels are reference-counted.
#[derive(Clone, Debug)]
pub struct Sprite {
    pixels: Arc<RgbaImage>,
}

impl Sprite {
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    /// Decode an image file into a sprite
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| HazeError::AssetLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(HazeError::AssetLoad {
                path: path.display().to_string(),
                reason: "image has no pixels".to_string(),
            });
        }
        log::debug!(
            "Loaded sprite '{}' ({}x{})",
            path.display(),
            rgba.width(),
            rgba.height()
        );
        Ok(Self::from_image(rgba))
    }

    /// Single-colour sprite
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Procedural soft grey puff, used when no smoke image is configured.
    /// Opacity falls off quadratically from the centre to the edge.
    pub fn puff(size: u32) -> Self {
        let size = size.max(1);
        let c = (size as f64 - 1.0) / 2.0;
        let radius = (size as f64 / 2.0).max(0.5);
        let img = RgbaImage::from_fn(size, size, |x, y| {
            let dx = x as f64 - c;
            let dy = y as f64 - c;
            let d = (dx * dx + dy * dy).sqrt() / radius;
            let falloff = (1.0 - d).clamp(0.0, 1.0);
            let a = (falloff * falloff * 255.0).round() as u8;
            Rgba([40, 40, 40, a])
        });
        Self::from_image(img)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Load progress of an asynchronously loaded sprite
#[derive(Clone, Debug)]
pub enum AssetState {
    Pending,
    Ready(Sprite),
    Failed(String),
}

impl AssetState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }
}

/// Loads a sprite on a background thread. The effect must not start until
/// `poll` reports `Ready`; a `Failed` state is terminal.
pub struct SpriteLoader {
    path: PathBuf,
    state: AssetState,
    rx: Option<Receiver<Result<Sprite>>>,
}

impl SpriteLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            // The receiver may already be gone if the loader was dropped
            let _ = tx.send(Sprite::load(&worker_path));
        });
        Self {
            path,
            state: AssetState::Pending,
            rx: Some(rx),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for load completion
    pub fn poll(&mut self) -> &AssetState {
        let received = match &self.rx {
            Some(rx) => rx.try_recv(),
            None => return &self.state,
        };
        match received {
            Ok(result) => self.finish(result),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                let path = self.path.display().to_string();
                self.finish(Err(HazeError::AssetLoad {
                    path,
                    reason: "loader thread exited without a result".to_string(),
                }));
            }
        }
        &self.state
    }

    /// Block until the load completes
    pub fn wait(mut self) -> Result<Sprite> {
        if let Some(rx) = self.rx.take() {
            let result = rx.recv().map_err(|_| HazeError::AssetLoad {
                path: self.path.display().to_string(),
                reason: "loader thread exited without a result".to_string(),
            })?;
            self.finish(result);
        }
        match self.state {
            AssetState::Ready(sprite) => Ok(sprite),
            AssetState::Failed(reason) => Err(HazeError::AssetLoad {
                path: self.path.display().to_string(),
                reason,
            }),
            AssetState::Pending => Err(HazeError::InvalidState(
                "sprite loader finished without a state".to_string(),
            )),
        }
    }

    fn finish(&mut self, result: Result<Sprite>) {
        self.rx = None;
        self.state = match result {
            Ok(sprite) => AssetState::Ready(sprite),
            Err(HazeError::AssetLoad { reason, .. }) => {
                log::warn!("Sprite '{}' failed to load: {}", self.path.display(), reason);
                AssetState::Failed(reason)
            }
            Err(other) => {
                log::warn!("Sprite '{}' failed to load: {}", self.path.display(), other);
                AssetState::Failed(other.to_string())
            }
        };
    }
}
