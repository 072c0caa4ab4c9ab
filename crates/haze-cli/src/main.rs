//! Haze CLI - Command-line driver for the smoke effect and the tween bench

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bench, init, render, run, simulate, EffectArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "haze")]
#[command(about = "Drifting smoke particles on a 2D canvas, plus a tween engine bench", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the reference effect configuration
    Init {
        /// Output path
        #[arg(default_value = "effect.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the effect headless and print frame statistics
    Simulate {
        #[command(flatten)]
        effect: EffectArgs,

        /// Number of frames to simulate
        #[arg(long, default_value = "600")]
        frames: u64,
    },

    /// Simulate a number of frames and write the final canvas to a PNG
    Render {
        #[command(flatten)]
        effect: EffectArgs,

        /// Number of frames to simulate before capturing
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Output image path
        #[arg(short, long, default_value = "smoke.png")]
        output: PathBuf,
    },

    /// Run the effect in real time until the time limit pauses it
    Run {
        #[command(flatten)]
        effect: EffectArgs,

        /// Seconds before the loop is paused
        #[arg(long, default_value = "5.0")]
        seconds: f64,

        /// Write the last frame to this PNG
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Benchmark a tween engine with many dots at once
    Bench {
        /// Engine name (ticker, timer or queue)
        #[arg(long, default_value = "ticker")]
        engine: String,

        /// Animated properties (normal or transforms)
        #[arg(long, default_value = "normal")]
        properties: String,

        /// Number of dots
        #[arg(long, default_value = "500")]
        dots: usize,

        /// Frames to run
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Milliseconds per frame
        #[arg(long, default_value = "16")]
        step: f64,

        /// Field width in pixels
        #[arg(long, default_value = "940")]
        width: u32,

        /// Field height in pixels
        #[arg(long, default_value = "300")]
        height: u32,

        /// PRNG seed
        #[arg(long)]
        seed: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),
        Commands::Simulate { effect, frames } => simulate::run(&effect, frames),
        Commands::Render {
            effect,
            frames,
            output,
        } => render::run(&effect, frames, &output),
        Commands::Run {
            effect,
            seconds,
            output,
        } => run::run(&effect, seconds, output.as_deref()),
        Commands::Bench {
            engine,
            properties,
            dots,
            frames,
            step,
            width,
            height,
            seed,
        } => bench::run(bench::BenchArgs {
            engine,
            properties,
            dots,
            frames,
            step,
            width,
            height,
            seed,
        }),
    }
}
