//! CLI command implementations

pub mod bench;
pub mod init;
pub mod render;
pub mod run;
pub mod simulate;

use anyhow::{Context, Result};
use clap::Args;
use haze_particles::{EffectConfig, SmokeEffect};
use haze_render::{DrawSurface, Sprite, SpriteLoader};
use haze_runtime::{FrameClock, RenderLoop};
use std::path::PathBuf;

/// Options shared by every command that runs the smoke effect
#[derive(Args, Debug, Clone, Default)]
pub struct EffectArgs {
    /// Effect configuration file (reference effect when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// PRNG seed, overriding the config file
    #[arg(long)]
    pub seed: Option<u32>,

    /// Simulated milliseconds per frame
    #[arg(long, default_value = "16")]
    pub step: f64,
}

impl EffectArgs {
    /// Load the config file (or the reference config) and apply flag overrides
    pub fn load_config(&self) -> Result<EffectConfig> {
        let mut config = match &self.config {
            Some(path) => EffectConfig::load(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => EffectConfig::reference(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            anyhow::bail!("--step must be positive and finite, got {}", self.step);
        }
        Ok(config)
    }
}

/// Load the sprite, blocking until the background load finishes.
/// The effect does not start if the load fails.
pub fn load_sprite(config: &EffectConfig) -> Result<Sprite> {
    match &config.sprite.path {
        Some(path) => SpriteLoader::spawn(path.clone())
            .wait()
            .with_context(|| format!("Failed to load sprite '{}'", path.display())),
        None => Ok(config.sprite.load()?),
    }
}

/// Build a started render loop running the smoke effect on `surface`
pub fn build_loop<S: DrawSurface>(
    surface: S,
    config: &EffectConfig,
    clock: FrameClock,
) -> Result<RenderLoop<S>> {
    let sprite = load_sprite(config)?;
    let mut render_loop = RenderLoop::new(surface, config.sim_context(), clock)
        .context("Failed to create render loop")?;
    render_loop.add_system(Box::new(SmokeEffect::from_config(config, sprite)))?;
    render_loop.start()?;
    Ok(render_loop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_flag_overrides_config() {
        let args = EffectArgs {
            seed: Some(5),
            step: 16.0,
            ..EffectArgs::default()
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.emitters.len(), 3);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let args = EffectArgs {
            step: 0.0,
            ..EffectArgs::default()
        };
        assert!(args.load_config().is_err());

        let args = EffectArgs {
            step: f64::INFINITY,
            ..EffectArgs::default()
        };
        assert!(args.load_config().is_err());
    }

    #[test]
    fn missing_sprite_file_stops_startup() {
        let mut config = EffectConfig::reference();
        config.sprite.path = Some(PathBuf::from("does/not/exist.png"));
        assert!(load_sprite(&config).is_err());
    }
}
