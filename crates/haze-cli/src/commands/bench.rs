//! Tween engine benchmark

use anyhow::{Context, Result};
use haze_tween::{BenchConfig, BenchHarness, BenchReport, Properties, StrategyTable};

pub struct BenchArgs {
    pub engine: String,
    pub properties: String,
    pub dots: usize,
    pub frames: u64,
    pub step: f64,
    pub width: u32,
    pub height: u32,
    pub seed: Option<u32>,
}

pub fn bench(args: &BenchArgs) -> Result<BenchReport> {
    if !args.step.is_finite() || args.step <= 0.0 {
        anyhow::bail!("--step must be positive and finite, got {}", args.step);
    }
    let properties: Properties = args.properties.parse()?;
    let table = StrategyTable::builtin();
    let config = BenchConfig {
        engine: args.engine.clone(),
        properties,
        dots: args.dots,
        field_width: args.width as f64,
        field_height: args.height as f64,
        seed: args.seed,
    };

    let mut harness = BenchHarness::start(&table, &config).with_context(|| {
        let known: Vec<&str> = table.keys().collect();
        format!("Available strategies: {}", known.join(", "))
    })?;
    for _ in 0..args.frames {
        harness.step(args.step)?;
    }
    Ok(harness.stop())
}

pub fn run(args: BenchArgs) -> Result<()> {
    let report = bench(&args)?;
    println!("Strategy:   {}", report.key);
    println!("Dots:       {}", report.dots);
    println!("Frames:     {}", report.frames);
    println!("Tweens:     {}", report.completed);
    println!("Simulated:  {:.0}ms", report.simulated_ms);
    println!("Wall time:  {:.1}ms", report.wall.as_secs_f64() * 1000.0);
    println!("Frames/s:   {:.0}", report.frames_per_second());
    println!("Tweens/s:   {:.0}", report.tweens_per_second());
    Ok(())
}
