use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gls_planner::config::{MissionFile, load_mission_file, load_technologies};
use gls_planner::export::{self, report::MissionReport};
use gls_planner::mission::{
    self, MissionConfig, NoiseModel, SweepParameter, catalog, compute_mission, estimate_noise,
};
use gls_planner::range::SweepRange;

/// Size a spaceborne lidar constellation from orbital mechanics and the sensor budget.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Lidar constellation planner (swath, pulse energy, satellite count)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one mission and print the derived metrics
    Plan {
        #[command(flatten)]
        mission: MissionArgs,

        /// Also print the background noise budget
        #[arg(long, default_value_t = false)]
        noise: bool,

        /// Write a JSON report to this path ('-' for stdout)
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Compare laser technologies on the same mission
    Compare {
        #[command(flatten)]
        mission: MissionArgs,

        /// Technology catalog (YAML list, TOML record, or directory of TOML records)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only evaluate this technology (case-insensitive)
        #[arg(long)]
        technology: Option<String>,
    },
    /// Sweep one parameter and write the results as CSV
    Sweep {
        #[command(flatten)]
        mission: MissionArgs,

        /// Parameter to vary
        #[arg(long, value_enum)]
        parameter: SweepParam,

        /// Inclusive range as start:stop:step
        #[arg(long, allow_hyphen_values = true)]
        range: SweepRange,

        /// Output CSV file (use '-' for stdout)
        #[arg(long, default_value = "-")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum SweepParam {
    Altitude,
    Resolution,
    MirrorArea,
    PayloadPower,
    PointingError,
    Latitude,
    RevisitYears,
    CloudFraction,
    ObservationProbability,
    DutyCycle,
}

impl From<SweepParam> for SweepParameter {
    fn from(value: SweepParam) -> Self {
        match value {
            SweepParam::Altitude => SweepParameter::Altitude,
            SweepParam::Resolution => SweepParameter::GroundResolution,
            SweepParam::MirrorArea => SweepParameter::MirrorArea,
            SweepParam::PayloadPower => SweepParameter::PayloadPower,
            SweepParam::PointingError => SweepParameter::PointingError,
            SweepParam::Latitude => SweepParameter::Latitude,
            SweepParam::RevisitYears => SweepParameter::RevisitYears,
            SweepParam::CloudFraction => SweepParameter::CloudFraction,
            SweepParam::ObservationProbability => SweepParameter::ObservationProbability,
            SweepParam::DutyCycle => SweepParameter::DutyCycle,
        }
    }
}

/// Mission parameters. Flags override the mission file, which overrides the built-in defaults.
#[derive(Args, Debug)]
struct MissionArgs {
    /// Mission file (.toml, .yaml, or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mirror area in m²
    #[arg(long, conflicts_with = "mirror_diameter")]
    mirror_area: Option<f64>,

    /// Telescope diameter in metres (alternative to --mirror-area)
    #[arg(long)]
    mirror_diameter: Option<f64>,

    /// Satellite altitude in metres
    #[arg(long)]
    altitude: Option<f64>,

    /// Ground resolution in metres
    #[arg(long)]
    resolution: Option<f64>,

    /// Laser wall-plug efficiency (0-1]
    #[arg(long)]
    laser_efficiency: Option<f64>,

    /// Detector quantum efficiency (0-1]
    #[arg(long)]
    detector_efficiency: Option<f64>,

    /// Energy needed at the detector per pixel in joules
    #[arg(long, conflicts_with = "detected_photons")]
    detected_energy: Option<f64>,

    /// Photons needed at the detector per pixel (alternative to --detected-energy)
    #[arg(long)]
    detected_photons: Option<f64>,

    /// Laser wavelength in nm, used with --detected-photons
    #[arg(long)]
    wavelength_nm: Option<f64>,

    /// Payload power in watts
    #[arg(long)]
    payload_power: Option<f64>,

    /// Fraction of the swath sampled (0-1]
    #[arg(long)]
    sampling_fraction: Option<f64>,

    /// Spatial pulse width in metres
    #[arg(long)]
    pulse_width: Option<f64>,

    /// Optical efficiency (0-1]
    #[arg(long)]
    optical_efficiency: Option<f64>,

    /// Pointing error in degrees
    #[arg(long)]
    pointing_error: Option<f64>,

    /// Fraction of the orbit spent lasing (0-1]
    #[arg(long)]
    duty_cycle: Option<f64>,

    /// Unambiguous range in metres
    #[arg(long)]
    unambiguous_range: Option<f64>,

    /// One-way atmospheric transmission (0-1]
    #[arg(long)]
    atmospheric_transmission: Option<f64>,

    /// Mean cloud fraction (0-1)
    #[arg(long)]
    cloud_fraction: Option<f64>,

    /// Target probability of a cloud-free look (0-1)
    #[arg(long)]
    observation_probability: Option<f64>,

    /// Years allowed for full coverage
    #[arg(long)]
    revisit_years: Option<f64>,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,
}

impl MissionArgs {
    fn overrides(&self) -> MissionFile {
        MissionFile {
            name: None,
            mirror_area_m2: self.mirror_area,
            mirror_diameter_m: self.mirror_diameter,
            altitude_m: self.altitude,
            ground_resolution_m: self.resolution,
            laser_efficiency: self.laser_efficiency,
            detector_efficiency: self.detector_efficiency,
            detected_energy_j: self.detected_energy,
            detected_photons: self.detected_photons,
            wavelength_nm: self.wavelength_nm,
            payload_power_w: self.payload_power,
            sampling_fraction: self.sampling_fraction,
            pulse_width_m: self.pulse_width,
            optical_efficiency: self.optical_efficiency,
            pointing_error_deg: self.pointing_error,
            duty_cycle: self.duty_cycle,
            unambiguous_range_m: self.unambiguous_range,
            atmospheric_transmission: self.atmospheric_transmission,
            cloud_fraction: self.cloud_fraction,
            observation_probability: self.observation_probability,
            revisit_years: self.revisit_years,
            latitude_deg: self.latitude,
        }
    }

    /// Layer defaults, the mission file, and flags into one configuration.
    fn resolve(&self) -> anyhow::Result<(Option<String>, MissionConfig)> {
        let base = match &self.config {
            Some(path) => load_mission_file(path)
                .with_context(|| format!("loading mission file {}", path.display()))?,
            None => MissionFile::default(),
        };
        let merged = base.merge(self.overrides());
        let config = mission::config::from_file(&merged)?;
        log::debug!("resolved mission configuration: {config:?}");
        Ok((merged.name, config))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            mission,
            noise,
            json,
        } => run_plan(&mission, noise, json),
        Command::Compare {
            mission,
            catalog,
            technology,
        } => run_compare(&mission, catalog, technology),
        Command::Sweep {
            mission,
            parameter,
            range,
            output,
        } => run_sweep(&mission, parameter.into(), &range, &output),
    }
}

fn run_plan(args: &MissionArgs, show_noise: bool, json: Option<PathBuf>) -> anyhow::Result<()> {
    let (name, config) = args.resolve()?;
    let metrics = compute_mission(&config)?;
    let noise = estimate_noise(&config, &metrics, &NoiseModel::default());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(name) = &name {
        writeln!(out, "Mission        : {name}")?;
    }
    export::text::write_mission(&mut out, &config, &metrics)?;
    if show_noise {
        export::text::write_noise(&mut out, &noise)?;
    }
    out.flush()?;
    drop(out);

    if let Some(path) = json {
        let report = MissionReport {
            name: name.as_deref(),
            noise: show_noise.then_some(&noise),
            ..MissionReport::new(&config, &metrics)
        };
        export::report::write_mission(&path, &report)
            .with_context(|| format!("writing JSON report to {}", path.display()))?;
    }

    metrics.require_coverage()?;
    Ok(())
}

fn run_compare(
    args: &MissionArgs,
    catalog_path: Option<PathBuf>,
    technology: Option<String>,
) -> anyhow::Result<()> {
    let (_, config) = args.resolve()?;
    let technologies = match (&catalog_path, &technology) {
        (Some(path), Some(name)) => vec![catalog::select(&load_technologies(path)?, Some(name.as_str()))?],
        (Some(path), None) => catalog::from_catalog(&load_technologies(path)?)?,
        (None, Some(name)) => vec![
            mission::technology::find_builtin(name)
                .ok_or_else(|| catalog::TechnologyError::NotFound(name.clone()))?,
        ],
        (None, None) => mission::technology::builtin(),
    };

    let rows = mission::compare(&config, &technologies);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    export::text::write_comparison(&mut out, &rows)?;
    out.flush()?;
    Ok(())
}

fn run_sweep(
    args: &MissionArgs,
    parameter: SweepParameter,
    range: &SweepRange,
    output: &Path,
) -> anyhow::Result<()> {
    let (_, config) = args.resolve()?;
    let points = mission::sweep(&config, parameter, range);
    let mut writer = export::writer_for_path(output)
        .with_context(|| format!("opening {}", output.display()))?;
    export::sweep::write_all(&mut writer, parameter, &points)?;

    let invalid = points.iter().filter(|p| p.outcome.is_err()).count();
    if invalid > 0 {
        log::warn!("{invalid} of {} sweep samples were invalid", points.len());
    }
    Ok(())
}
