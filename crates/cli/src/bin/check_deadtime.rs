use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gls_planner::deadtime::{self, DeadtimeConfig};
use gls_planner::export;

/// Probability of detecting every photon for different pixel counts, given a detector dead time and signal rate.
#[derive(Parser, Debug)]
#[command(author, version, about = "Detector dead-time / pixel-count trade-off")]
struct Cli {
    /// Number of expected signal photons
    #[arg(long, default_value_t = 205)]
    n_photons: u32,

    /// Measurement window in metres, e.g. tree height
    #[arg(long, default_value_t = 20.0)]
    window: f64,

    /// Pixel dead time in ns
    #[arg(long, default_value_t = 2.0)]
    deadtime: f64,

    /// Largest pixel count to tabulate
    #[arg(long, default_value_t = 99)]
    max_pixels: u32,

    /// Report the smallest pixel count whose all-detected probability reaches this value
    #[arg(long)]
    target: Option<f64>,

    /// Write the table as JSON to this path ('-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = DeadtimeConfig {
        n_photons: cli.n_photons,
        window_m: cli.window,
        deadtime_ns: cli.deadtime,
        max_pixels: cli.max_pixels,
    };
    let report = deadtime::evaluate(&config)?;
    log::debug!(
        "pile-up probability {:.6} for {} photons",
        report.pileup_probability,
        config.n_photons
    );

    let pixels_needed = match cli.target {
        Some(target) => Some((
            target,
            deadtime::pixels_for_probability(config.n_photons, report.pileup_probability, target)?,
        )),
        None => None,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    export::text::write_deadtime(&mut out, &report, pixels_needed)?;
    out.flush()?;
    drop(out);

    if let Some(path) = cli.json {
        export::report::write_deadtime(&path, &report)
            .with_context(|| format!("writing JSON table to {}", path.display()))?;
    }
    Ok(())
}
