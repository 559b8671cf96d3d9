//! Export helpers for console, CSV, and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod sweep {
    use std::io::{self, Write};

    use gls_mission::{Coverage, DerivedMetrics, SweepParameter, SweepPoint};

    const METRIC_COLUMNS: &str = "status,geolocation_error_m,dwell_time_s,pixel_energy_j,pulse_count,peak_power_w,swath_width_m,effective_swath_m,cloud_repeat_count,orbits_per_year,ground_tracks,satellites,satellites_required,error";

    /// Write the sweep CSV header; the first column is named after the swept parameter.
    pub fn write_header(writer: &mut dyn Write, parameter: SweepParameter) -> io::Result<()> {
        writeln!(writer, "{},{}", parameter.label(), METRIC_COLUMNS)
    }

    /// Serialize one sweep sample. Invalid samples carry the error text and empty metric cells.
    pub fn write_point(writer: &mut dyn Write, point: &SweepPoint) -> io::Result<()> {
        match &point.outcome {
            Ok(metrics) => write_metrics(writer, point.value, metrics),
            Err(err) => writeln!(
                writer,
                "{},invalid,,,,,,,,,,,,,\"{}\"",
                point.value,
                err.to_string().replace('"', "'")
            ),
        }
    }

    fn write_metrics(writer: &mut dyn Write, value: f64, m: &DerivedMetrics) -> io::Result<()> {
        let (status, tracks, satellites, required) = match &m.coverage {
            Coverage::Attainable(c) => (
                "ok",
                format!("{:.3}", c.ground_tracks),
                format!("{:.6}", c.satellites),
                c.satellites_required().to_string(),
            ),
            Coverage::Unattainable { .. } => {
                ("unattainable", String::new(), String::new(), String::new())
            }
        };
        writeln!(
            writer,
            "{},{},{:.6},{:.6e},{:.6e},{:.3},{:.6},{:.6},{:.6},{:.6},{:.3},{},{},{},",
            value,
            status,
            m.geolocation_error_m,
            m.dwell_time_s,
            m.pixel_energy_j,
            m.pulse_count,
            m.peak_power_w,
            m.swath_width_m,
            m.effective_swath_m,
            m.cloud_repeat_count,
            m.orbits_per_year,
            tracks,
            satellites,
            required,
        )
    }

    /// Header plus every point.
    pub fn write_all(
        writer: &mut dyn Write,
        parameter: SweepParameter,
        points: &[SweepPoint],
    ) -> io::Result<()> {
        write_header(writer, parameter)?;
        for point in points {
            write_point(writer, point)?;
        }
        writer.flush()
    }
}

pub mod report {
    use std::io::{self, Write};
    use std::path::Path;

    use gls_deadtime::DeadtimeReport;
    use gls_mission::{DerivedMetrics, MissionConfig, NoiseBudget};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::writer_for_path;

    /// JSON envelope for a single mission evaluation.
    #[derive(Debug, Serialize)]
    pub struct MissionReport<'a> {
        pub name: Option<&'a str>,
        pub config: &'a MissionConfig,
        pub metrics: &'a DerivedMetrics,
        pub satellites_required: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub noise: Option<&'a NoiseBudget>,
    }

    impl<'a> MissionReport<'a> {
        pub fn new(config: &'a MissionConfig, metrics: &'a DerivedMetrics) -> Self {
            Self {
                name: None,
                config,
                metrics,
                satellites_required: metrics.constellation().map(|c| c.satellites_required()),
                noise: None,
            }
        }
    }

    /// Write a mission report as pretty JSON (`-` for stdout).
    pub fn write_mission(path: &Path, report: &MissionReport<'_>) -> io::Result<()> {
        write_json(path, report)
    }

    /// Write a dead-time table as pretty JSON (`-` for stdout).
    pub fn write_deadtime(path: &Path, report: &DeadtimeReport) -> io::Result<()> {
        write_json(path, report)
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}

pub mod text {
    use std::io::{self, Write};

    use gls_core::rounding::round3;
    use gls_core::units::{j_to_mj, m_to_km, s_to_ms};
    use gls_deadtime::DeadtimeReport;
    use gls_mission::{Comparison, Coverage, DerivedMetrics, MissionConfig, NoiseBudget};

    /// Human-readable mission summary.
    pub fn write_mission(
        writer: &mut dyn Write,
        config: &MissionConfig,
        metrics: &DerivedMetrics,
    ) -> io::Result<()> {
        writeln!(writer, "=== Lidar Mission ===")?;
        writeln!(
            writer,
            "Orbit          : altitude {} km, period {} min, {} orbits/year",
            round3(m_to_km(config.altitude_m)),
            round3(metrics.orbital_period_s / 60.0),
            round3(metrics.orbits_per_year)
        )?;
        writeln!(
            writer,
            "Geolocation    : error {} m at {} deg pointing",
            round3(metrics.geolocation_error_m),
            config.pointing_error_deg
        )?;
        writeln!(
            writer,
            "Dwell          : {} ms per {} m pixel, {} pulses",
            round3(s_to_ms(metrics.dwell_time_s)),
            config.ground_resolution_m,
            round3(metrics.pulse_count)
        )?;
        writeln!(
            writer,
            "Energy         : {} mJ per pixel, peak power {} W",
            round3(j_to_mj(metrics.pixel_energy_j)),
            round3(metrics.peak_power_w)
        )?;
        writeln!(
            writer,
            "Swath          : {} m ({} m after geolocation margin)",
            round3(metrics.swath_width_m),
            round3(metrics.effective_swath_m)
        )?;
        writeln!(
            writer,
            "Cloud repeats  : {} looks for p = {} at {} cloud cover",
            round3(metrics.cloud_repeat_count),
            config.observation_probability,
            config.cloud_fraction
        )?;
        match &metrics.coverage {
            Coverage::Attainable(constellation) => {
                writeln!(
                    writer,
                    "Ground tracks  : {}",
                    round3(constellation.ground_tracks)
                )?;
                writeln!(
                    writer,
                    "Satellites     : {} ({} needed for {} year revisit)",
                    round3(constellation.satellites),
                    constellation.satellites_required(),
                    config.revisit_years
                )?;
            }
            Coverage::Unattainable { effective_swath_m } => {
                writeln!(
                    writer,
                    "Satellites     : coverage unattainable (effective swath {} m)",
                    round3(*effective_swath_m)
                )?;
            }
        }
        Ok(())
    }

    pub fn write_noise(writer: &mut dyn Write, noise: &NoiseBudget) -> io::Result<()> {
        writeln!(
            writer,
            "Noise          : {} counts/us, {} with {} repeats",
            round3(noise.rate_per_us),
            round3(noise.accumulated_per_us),
            round3(noise.pulse_repeats)
        )
    }

    /// One line per technology.
    pub fn write_comparison(writer: &mut dyn Write, rows: &[Comparison]) -> io::Result<()> {
        writeln!(writer, "=== Laser Technologies ===")?;
        for row in rows {
            let tech = &row.technology;
            match &row.outcome {
                Ok(metrics) => {
                    let satellites = match metrics.constellation() {
                        Some(c) => c.satellites_required().to_string(),
                        None => "unattainable".to_string(),
                    };
                    writeln!(
                        writer,
                        "{:<14} peakPower {} W  Eshot {} mJ  Edet {} J  Le/Edet {}  swath {} m  satellites {}",
                        tech.name,
                        round3(metrics.peak_power_w),
                        round3(j_to_mj(metrics.pixel_energy_j)),
                        round3(tech.detected_energy_j),
                        round3(tech.figure_of_merit()),
                        round3(metrics.swath_width_m),
                        satellites
                    )?;
                }
                Err(err) => writeln!(writer, "{:<14} error: {}", tech.name, err)?,
            }
        }
        Ok(())
    }

    /// Pixel-count table from the dead-time calculator.
    pub fn write_deadtime(
        writer: &mut dyn Write,
        report: &DeadtimeReport,
        pixels_needed: Option<(f64, u32)>,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "window {} ns, mean separation {} ns, dead time {} ns",
            round3(report.window_s * 1.0e9),
            round3(report.mean_separation_s * 1.0e9),
            round3(report.deadtime_s * 1.0e9)
        )?;
        for row in &report.rows {
            writeln!(
                writer,
                "{} ProbArrive {:.4} probAll {:.2}",
                row.pixels, report.pileup_probability, row.prob_all_detected
            )?;
        }
        if let Some((target, pixels)) = pixels_needed {
            writeln!(writer, "{pixels} pixels reach probAll >= {target}")?;
        }
        Ok(())
    }
}
