//! Real-time loop on the wall clock, paused after a time limit

use super::{build_loop, EffectArgs};
use anyhow::{Context, Result};
use haze_render::CanvasSurface;
use haze_runtime::{FrameClock, IntervalScheduler};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Longest frame delta fed to the simulation, so a stalled host does not
/// teleport every particle
const MAX_FRAME_DELTA_MS: f64 = 250.0;

pub fn run(args: &EffectArgs, seconds: f64, output: Option<&Path>) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        anyhow::bail!("--seconds must be positive and finite, got {seconds}");
    }
    let config = args.load_config()?;
    let surface = CanvasSurface::new(config.canvas.width, config.canvas.height)
        .context("Failed to create canvas")?;
    let clock = FrameClock::wall().with_max_delta(MAX_FRAME_DELTA_MS);
    let mut render_loop = build_loop(surface, &config, clock)?;

    let pause = render_loop.pause_handle();
    let limit = Duration::from_secs_f64(seconds);
    thread::spawn(move || {
        thread::sleep(limit);
        pause.pause();
    });

    let started = Instant::now();
    let frames = render_loop.run(&mut IntervalScheduler::default())?;
    let wall = started.elapsed().as_secs_f64();
    let population = render_loop.stats();
    log::info!(
        "Paused after {} frame(s), wind {:.4}",
        frames,
        render_loop.sim().wind.velocity()
    );
    render_loop.shutdown()?;

    println!(
        "Ran {} frame(s) in {:.2}s ({:.1} fps), {} of {} particles alive",
        frames,
        wall,
        if wall > 0.0 { frames as f64 / wall } else { 0.0 },
        population.active,
        population.total
    );

    if let Some(output) = output {
        render_loop
            .into_surface()
            .save_png(output)
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
        println!("Saved last frame to {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pauses_after_the_time_limit() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("last.png");
        let args = EffectArgs {
            seed: Some(6),
            step: 16.0,
            ..EffectArgs::default()
        };
        let started = Instant::now();
        run(&args, 0.2, Some(&output)).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(output.exists());
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(run(&EffectArgs::default(), 0.0, None).is_err());
        assert!(run(&EffectArgs::default(), f64::INFINITY, None).is_err());
    }

    #[test]
    fn very_short_limit_still_stops() {
        let args = EffectArgs {
            seed: Some(8),
            step: 16.0,
            ..EffectArgs::default()
        };
        run(&args, 0.000_001, None).unwrap();
    }
}
