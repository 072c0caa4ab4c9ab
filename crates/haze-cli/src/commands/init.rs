//! Write the reference effect configuration

use anyhow::{Context, Result};
use haze_particles::EffectConfig;
use std::path::Path;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = EffectConfig::reference();
    config
        .save(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;

    println!(
        "Created {} ({} emitters, {} particles, {}x{} canvas)",
        path.display(),
        config.emitters.len(),
        config.particle_total(),
        config.canvas.width,
        config.canvas.height
    );
    Ok(())
}
