use gravsim::{bench_interpolate, ConservationState, HeadlessAssets, Scenario};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

/// Run a scenario headless, ticking it like a render loop would
#[derive(Parser, Debug)]
struct Args {
    /// Scenario file; bare names are looked up in the crate's `scenarios/` directory
    #[arg(short, default_value = "sun_earth.yaml")]
    file_name: String,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 20.0)]
    seconds: f64,

    /// Wall-clock seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame: f64,

    /// Multiplier on the elapsed time handed to the system each frame
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Log body positions every this many frames
    #[arg(long, default_value_t = 60)]
    report_every: usize,

    /// Print interpolate timings for growing body counts and exit
    #[arg(long)]
    bench: bool,
}

impl Args {
    /// Frame timing must describe a finite run.
    fn validate(&self) -> Result<()> {
        ensure!(
            self.frame.is_finite() && self.frame > 0.0,
            "--frame must be a positive number of seconds, got {}",
            self.frame
        );
        ensure!(
            self.seconds.is_finite() && self.seconds > 0.0,
            "--seconds must be a positive number of seconds, got {}",
            self.seconds
        );
        Ok(())
    }
}

// resolve here to keep main clean
fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_interpolate()?;
        return Ok(());
    }

    args.validate()?;

    let path = scenario_path(&args.file_name);
    let mut assets = HeadlessAssets::new();
    let Scenario { mut system, scale } = Scenario::load(&path, &mut assets)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;

    info!(bodies = system.len(), scale, g = system.g(), "running {}", path.display());

    let baseline = ConservationState::new(system.bodies(), system.gravity());

    let frames = (args.seconds / args.frame).ceil() as usize;
    let mut dropped = 0.0;
    for frame in 1..=frames {
        let report = system.interpolate(args.speed * args.frame);
        dropped += report.dropped;

        if args.report_every > 0 && frame % args.report_every == 0 {
            for body in system.bodies() {
                info!(t = system.t(), body = body.name(), x = ?body.x.as_slice(), "position");
            }
        }
    }

    let drift = baseline.check(system.bodies(), system.gravity());
    info!(
        t = system.t(),
        energy_error = drift.energy_error,
        momentum_error = drift.momentum_error.norm(),
        dropped,
        "finished"
    );

    println!("{:<12} {:>14} {:>14} {:>14}", "body", "x", "y", "z");
    for body in system.bodies() {
        let p = body.pose_translation();
        println!("{:<12} {:>14.6} {:>14.6} {:>14.6}", body.name(), p.x, p.y, p.z);
    }

    system.clean_up(&mut assets);
    Ok(())
}
