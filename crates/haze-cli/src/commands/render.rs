//! Simulate headless and write the final canvas to a PNG

use super::{build_loop, EffectArgs};
use anyhow::{Context, Result};
use haze_render::CanvasSurface;
use haze_runtime::{FrameClock, ImmediateScheduler};
use std::path::Path;

pub fn run(args: &EffectArgs, frames: u64, output: &Path) -> Result<()> {
    let config = args.load_config()?;
    let surface = CanvasSurface::new(config.canvas.width, config.canvas.height)
        .context("Failed to create canvas")?;
    let mut render_loop = build_loop(surface, &config, FrameClock::fixed_step(args.step))?;

    let ran = render_loop.run(&mut ImmediateScheduler::with_limit(frames))?;
    let population = render_loop.stats();
    render_loop.shutdown()?;

    let canvas = render_loop.into_surface();
    canvas
        .save_png(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!(
        "Rendered {} frame(s), {} of {} particles alive -> {}",
        ran,
        population.active,
        population.total,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_of_canvas_size() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("smoke.png");
        let args = EffectArgs {
            seed: Some(4),
            step: 16.0,
            ..EffectArgs::default()
        };
        run(&args, 60, &output).unwrap();
        let dims = image_dims(&output);
        assert_eq!(dims, (940, 300));
    }

    fn image_dims(path: &Path) -> (u32, u32) {
        let bytes = std::fs::read(path).unwrap();
        // PNG IHDR: width and height are big-endian u32s at offsets 16 and 20
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        (width, height)
    }
}
