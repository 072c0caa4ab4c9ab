//! Effect configuration file (`effect.toml`)

use crate::emitter::EmitterConfig;
use haze_core::{CanvasSize, HazeError, Result, SimRng};
use haze_render::Sprite;
use haze_runtime::{SimContext, WindField};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest canvas edge accepted from a config file
pub const MAX_CANVAS_EDGE: u32 = 16_384;

/// Whole-effect configuration: canvas, wind, sprite and every emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// PRNG seed; a time-derived seed is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    pub canvas: CanvasSize,
    pub wind: WindConfig,
    pub sprite: SpriteConfig,
    #[serde(rename = "emitter")]
    pub emitters: Vec<EmitterConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Starting wind velocity in pixels per millisecond
    pub initial: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            initial: WindField::INITIAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Image file to draw; a procedural puff is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Edge length of the procedural puff
    pub puff_size: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            path: None,
            puff_size: 64,
        }
    }
}

impl SpriteConfig {
    /// Load the configured image, or build the procedural puff
    pub fn load(&self) -> Result<Sprite> {
        match &self.path {
            Some(path) => Sprite::load(path),
            None => Ok(Sprite::puff(self.puff_size)),
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl EffectConfig {
    /// The stock deployment: three overlapping plumes along the left edge
    pub fn reference() -> Self {
        let emitters = [0.0, 0.10, 0.15]
            .into_iter()
            .map(|x_scale| EmitterConfig {
                alpha: 0.3,
                ..EmitterConfig::at(x_scale, 0.7)
            })
            .collect();
        Self {
            seed: None,
            canvas: CanvasSize::default(),
            wind: WindConfig::default(),
            sprite: SpriteConfig::default(),
            emitters,
        }
    }

    /// Parse and validate a config document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EffectConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A relative sprite path is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| HazeError::ConfigError(format!("{}: {}", path.display(), e)))?;
        if let Some(dir) = path.parent() {
            config.sprite.path = config
                .sprite
                .path
                .take()
                .map(|sprite| if sprite.is_relative() { dir.join(sprite) } else { sprite });
        }
        log::debug!(
            "Loaded {} emitter(s) from {}",
            config.emitters.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let max_edge = MAX_CANVAS_EDGE as f64;
        HazeError::check_range("canvas.width", self.canvas.width as f64, 1.0, max_edge)?;
        HazeError::check_range("canvas.height", self.canvas.height as f64, 1.0, max_edge)?;
        HazeError::check_range(
            "wind.initial",
            self.wind.initial,
            WindField::MIN,
            WindField::MAX,
        )?;
        if self.sprite.path.is_none() {
            HazeError::check_range(
                "sprite.puff_size",
                self.sprite.puff_size as f64,
                1.0,
                4096.0,
            )?;
        }
        for emitter in &self.emitters {
            emitter.validate()?;
        }
        Ok(())
    }

    /// Seeded generator for this run
    pub fn rng(&self) -> SimRng {
        match self.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_time(),
        }
    }

    /// Fresh simulation state for this config
    pub fn sim_context(&self) -> SimContext {
        SimContext::new(self.canvas, self.rng())
            .with_wind(WindField::with_velocity(self.wind.initial))
    }

    pub fn particle_total(&self) -> usize {
        self.emitters.iter().map(|e| e.particles).sum()
    }
}
