//! Lidar mission model: a single pass from mission parameters to dwell time,
//! energy budget, swath width, and constellation size.
//!
//! Every stage consumes only the configuration and the outputs of earlier
//! stages. Inputs are validated up front so none of the logarithms, roots, or
//! divisions below can see an out-of-domain argument.

use std::f64::consts::PI;
use std::fmt;

use gls_core::constants::{
    EARTH_MASS_KG, EARTH_RADIUS_M, GRAVITATIONAL_CONSTANT, SECONDS_PER_YEAR,
    SPEED_OF_LIGHT_M_S, SURFACE_REFLECTANCE,
};
use gls_core::units::two_way_time;
use log::{debug, warn};
use serde::Serialize;

/// Physical constants fed into the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalConstants {
    pub speed_of_light_m_s: f64,
    pub gravitational_constant: f64,
    pub earth_mass_kg: f64,
    pub earth_radius_m: f64,
    /// Ground reflectance assumed by the energy and swath budgets.
    pub surface_reflectance: f64,
    pub seconds_per_year: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            speed_of_light_m_s: SPEED_OF_LIGHT_M_S,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            earth_mass_kg: EARTH_MASS_KG,
            earth_radius_m: EARTH_RADIUS_M,
            surface_reflectance: SURFACE_REFLECTANCE,
            seconds_per_year: SECONDS_PER_YEAR,
        }
    }
}

impl PhysicalConstants {
    /// sqrt(G·M) for the Earth (m^1.5 s⁻¹).
    #[inline]
    pub fn sqrt_gm(&self) -> f64 {
        (self.gravitational_constant * self.earth_mass_kg).sqrt()
    }

    /// Time the sub-satellite point takes to cross one metre of ground at `altitude_m` (s/m).
    #[inline]
    pub fn ground_time_per_metre(&self, altitude_m: f64) -> f64 {
        (self.earth_radius_m + altitude_m).powf(1.5) / (self.earth_radius_m * self.sqrt_gm())
    }
}

/// Physical and engineering parameters of a lidar mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionConfig {
    /// Telescope collecting area (m²).
    pub mirror_area_m2: f64,
    /// Orbital altitude (m).
    pub altitude_m: f64,
    /// Ground pixel footprint (m).
    pub ground_resolution_m: f64,
    pub laser_efficiency: f64,
    pub detector_efficiency: f64,
    /// Energy that must reach the detector per pixel (J).
    pub detected_energy_j: f64,
    /// Electrical power available to the payload (W).
    pub payload_power_w: f64,
    /// Fraction of the swath actually sampled.
    pub sampling_fraction: f64,
    /// Spatial pulse width (m).
    pub pulse_width_m: f64,
    pub optical_efficiency: f64,
    /// Pointing error (degrees).
    pub pointing_error_deg: f64,
    /// Fraction of the orbit spent lasing.
    pub duty_cycle: f64,
    /// Range beyond which pulse returns become ambiguous (m).
    pub unambiguous_range_m: f64,
    /// Two-way atmospheric transmission is `atmospheric_transmission²`.
    pub atmospheric_transmission: f64,
    pub cloud_fraction: f64,
    /// Target probability of at least one cloud-free look.
    pub observation_probability: f64,
    /// Time allowed to reach full coverage (years).
    pub revisit_years: f64,
    /// Latitude at which coverage is evaluated (degrees).
    pub latitude_deg: f64,
}

impl Default for MissionConfig {
    /// Reference 400 km mission with a 0.8 m telescope and a solid-state laser.
    fn default() -> Self {
        Self {
            mirror_area_m2: 0.4 * 0.4 * PI,
            altitude_m: 400_000.0,
            ground_resolution_m: 30.0,
            laser_efficiency: 0.08,
            detector_efficiency: 0.45,
            detected_energy_j: 0.562e-15,
            payload_power_w: 240.0,
            sampling_fraction: 1.0,
            pulse_width_m: 5.0,
            optical_efficiency: 1.0,
            pointing_error_deg: 0.0,
            duty_cycle: 1.0,
            unambiguous_range_m: 150.0,
            atmospheric_transmission: 0.8,
            cloud_fraction: 0.55,
            observation_probability: 0.8,
            revisit_years: 5.0,
            latitude_deg: 0.0,
        }
    }
}

/// Admissible range for a mission parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Finite and > 0.
    Positive,
    /// In (0, 1].
    Fraction,
    /// In (0, 1).
    OpenFraction,
    /// In [-90, 90].
    Latitude,
    /// In [0, 90).
    PointingAngle,
}

impl Constraint {
    /// Whether `value` satisfies the constraint. NaN never does.
    pub fn admits(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Constraint::Positive => value > 0.0,
            Constraint::Fraction => value > 0.0 && value <= 1.0,
            Constraint::OpenFraction => value > 0.0 && value < 1.0,
            Constraint::Latitude => (-90.0..=90.0).contains(&value),
            Constraint::PointingAngle => (0.0..90.0).contains(&value),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Constraint::Positive => "finite and > 0",
            Constraint::Fraction => "in (0, 1]",
            Constraint::OpenFraction => "in (0, 1)",
            Constraint::Latitude => "in [-90, 90] degrees",
            Constraint::PointingAngle => "in [0, 90) degrees",
        };
        f.write_str(text)
    }
}

/// Errors raised by the mission model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MissionError {
    #[error("invalid parameter {name} = {value}: must be {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        constraint: Constraint,
    },
    #[error("{quantity} = {value} is not finite; the inputs exceed the model's numeric range")]
    NonFinite { quantity: &'static str, value: f64 },
    #[error(
        "coverage unattainable: swath {swath_width_m:.3} m minus twice the {geolocation_error_m:.3} m geolocation error leaves {effective_swath_m:.3} m"
    )]
    UnattainableCoverage {
        swath_width_m: f64,
        geolocation_error_m: f64,
        effective_swath_m: f64,
    },
}

/// Constellation needed to reach the coverage target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constellation {
    /// Parallel ground tracks needed to tile the latitude circle once.
    pub ground_tracks: f64,
    /// Fractional satellite count.
    pub satellites: f64,
}

impl Constellation {
    /// Whole satellites needed (the fractional count rounded up).
    pub fn satellites_required(&self) -> u64 {
        self.satellites.ceil().max(0.0) as u64
    }
}

/// Outcome of the constellation sizing stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Coverage {
    Attainable(Constellation),
    /// The geolocation margin consumes the whole swath.
    Unattainable { effective_swath_m: f64 },
}

/// Quantities derived from a [`MissionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub geolocation_error_m: f64,
    pub dwell_time_s: f64,
    pub unambiguous_window_s: f64,
    pub pulse_time_width_s: f64,
    /// Laser energy needed per ground pixel (J).
    pub pixel_energy_j: f64,
    pub pulse_count: f64,
    pub peak_power_w: f64,
    pub swath_width_m: f64,
    /// Swath left after removing the geolocation margin on both edges.
    pub effective_swath_m: f64,
    pub cloud_repeat_count: f64,
    pub orbital_period_s: f64,
    pub orbits_per_year: f64,
    /// Circumference of the latitude circle being covered (m).
    pub circumference_m: f64,
    pub coverage: Coverage,
}

impl DerivedMetrics {
    pub fn constellation(&self) -> Option<&Constellation> {
        match &self.coverage {
            Coverage::Attainable(constellation) => Some(constellation),
            Coverage::Unattainable { .. } => None,
        }
    }

    pub fn satellite_count(&self) -> Option<f64> {
        self.constellation().map(|c| c.satellites)
    }

    pub fn ground_track_count(&self) -> Option<f64> {
        self.constellation().map(|c| c.ground_tracks)
    }

    /// The constellation, or [`MissionError::UnattainableCoverage`] when the swath is used up.
    pub fn require_coverage(&self) -> Result<Constellation, MissionError> {
        match self.coverage {
            Coverage::Attainable(constellation) => Ok(constellation),
            Coverage::Unattainable { effective_swath_m } => {
                Err(MissionError::UnattainableCoverage {
                    swath_width_m: self.swath_width_m,
                    geolocation_error_m: self.geolocation_error_m,
                    effective_swath_m,
                })
            }
        }
    }
}

/// Check every parameter against its admissible range.
pub fn validate(config: &MissionConfig) -> Result<(), MissionError> {
    let checks = [
        ("mirror_area_m2", config.mirror_area_m2, Constraint::Positive),
        ("altitude_m", config.altitude_m, Constraint::Positive),
        ("ground_resolution_m", config.ground_resolution_m, Constraint::Positive),
        ("laser_efficiency", config.laser_efficiency, Constraint::Fraction),
        ("detector_efficiency", config.detector_efficiency, Constraint::Fraction),
        ("detected_energy_j", config.detected_energy_j, Constraint::Positive),
        ("payload_power_w", config.payload_power_w, Constraint::Positive),
        ("sampling_fraction", config.sampling_fraction, Constraint::Fraction),
        ("pulse_width_m", config.pulse_width_m, Constraint::Positive),
        ("optical_efficiency", config.optical_efficiency, Constraint::Fraction),
        ("pointing_error_deg", config.pointing_error_deg, Constraint::PointingAngle),
        ("duty_cycle", config.duty_cycle, Constraint::Fraction),
        ("unambiguous_range_m", config.unambiguous_range_m, Constraint::Positive),
        (
            "atmospheric_transmission",
            config.atmospheric_transmission,
            Constraint::Fraction,
        ),
        ("cloud_fraction", config.cloud_fraction, Constraint::OpenFraction),
        (
            "observation_probability",
            config.observation_probability,
            Constraint::OpenFraction,
        ),
        ("revisit_years", config.revisit_years, Constraint::Positive),
        ("latitude_deg", config.latitude_deg, Constraint::Latitude),
    ];

    for (name, value, constraint) in checks {
        if !constraint.admits(value) {
            return Err(MissionError::InvalidParameter {
                name,
                value,
                constraint,
            });
        }
    }
    Ok(())
}

/// Ground displacement caused by a pointing error at the given altitude (m).
pub fn geolocation_error(altitude_m: f64, pointing_error_deg: f64) -> f64 {
    altitude_m * pointing_error_deg.to_radians().tan()
}

/// Time the footprint spends over one ground pixel (s).
pub fn dwell_time(ground_resolution_m: f64, altitude_m: f64, constants: &PhysicalConstants) -> f64 {
    ground_resolution_m * constants.ground_time_per_metre(altitude_m)
}

/// Laser energy that must be emitted per pixel to deliver the detected energy (J).
pub fn pixel_energy(config: &MissionConfig, constants: &PhysicalConstants) -> f64 {
    let spreading = PI * config.altitude_m.powi(2) / config.mirror_area_m2;
    let ground_return = constants.surface_reflectance * config.atmospheric_transmission.powi(2);
    (config.detected_energy_j / config.detector_efficiency) * spreading
        / ground_return
        / config.optical_efficiency
}

/// Pulses that fit in one dwell without range ambiguity; a single pulse when no window applies.
pub fn pulse_count_per_dwell(dwell_time_s: f64, unambiguous_window_s: f64) -> f64 {
    if unambiguous_window_s > 0.0 {
        dwell_time_s / unambiguous_window_s
    } else {
        1.0
    }
}

/// Peak optical power of each pulse (W).
pub fn peak_power(pixel_energy_j: f64, pulse_count: f64, pulse_time_width_s: f64) -> f64 {
    (pixel_energy_j / pulse_count) / pulse_time_width_s
}

/// Cross-track width the payload power can sample at the configured resolution (m).
pub fn swath_width(config: &MissionConfig, constants: &PhysicalConstants) -> f64 {
    let pixel_rate = config.payload_power_w * config.laser_efficiency / config.detected_energy_j;
    let collection = config.mirror_area_m2 / (PI * config.altitude_m.powi(2));
    let link = config.optical_efficiency
        * collection
        * config.detector_efficiency
        * constants.surface_reflectance
        * config.atmospheric_transmission.powi(2);
    pixel_rate
        * link
        * config.ground_resolution_m.powi(2)
        * constants.ground_time_per_metre(config.altitude_m)
        / config.sampling_fraction
}

/// Independent looks needed for at least one cloud-free observation with the target probability.
pub fn cloud_repeat_count(observation_probability: f64, cloud_fraction: f64) -> f64 {
    (1.0 - observation_probability).ln() / cloud_fraction.ln()
}

/// Circular orbital period at `altitude_m` (s).
pub fn orbital_period(altitude_m: f64, constants: &PhysicalConstants) -> f64 {
    let radius = constants.earth_radius_m + altitude_m;
    2.0 * PI * radius.powf(1.5) / constants.sqrt_gm()
}

/// Length of the latitude circle at `latitude_deg` (m).
pub fn circumference_at_latitude(latitude_deg: f64, constants: &PhysicalConstants) -> f64 {
    2.0 * PI * constants.earth_radius_m * latitude_deg.to_radians().cos()
}

/// Size the constellation for an effective swath; a non-positive swath cannot tile the ground.
pub fn size_constellation(
    config: &MissionConfig,
    effective_swath_m: f64,
    circumference_m: f64,
    orbits_per_year: f64,
    cloud_repeat_count: f64,
) -> Coverage {
    if effective_swath_m > 0.0 {
        let ground_tracks = circumference_m / effective_swath_m;
        let satellites = ground_tracks / (orbits_per_year * config.revisit_years)
            * cloud_repeat_count
            / config.duty_cycle;
        Coverage::Attainable(Constellation {
            ground_tracks,
            satellites,
        })
    } else {
        Coverage::Unattainable { effective_swath_m }
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, MissionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MissionError::NonFinite { quantity, value })
    }
}

/// Evaluate the mission model with the reference physical constants.
pub fn compute_mission(config: &MissionConfig) -> Result<DerivedMetrics, MissionError> {
    compute_mission_with(config, &PhysicalConstants::default())
}

/// Evaluate the mission model with explicit physical constants.
pub fn compute_mission_with(
    config: &MissionConfig,
    constants: &PhysicalConstants,
) -> Result<DerivedMetrics, MissionError> {
    validate(config)?;

    let geolocation_error_m = finite(
        "geolocation_error_m",
        geolocation_error(config.altitude_m, config.pointing_error_deg),
    )?;
    let dwell_time_s = finite(
        "dwell_time_s",
        dwell_time(config.ground_resolution_m, config.altitude_m, constants),
    )?;
    debug!("geolocation error {geolocation_error_m:.3} m, dwell time {dwell_time_s:.6e} s");

    let unambiguous_window_s = two_way_time(config.unambiguous_range_m, constants.speed_of_light_m_s);
    let pulse_time_width_s = two_way_time(config.pulse_width_m, constants.speed_of_light_m_s);
    let pixel_energy_j = finite("pixel_energy_j", pixel_energy(config, constants))?;
    let pulse_count = finite(
        "pulse_count",
        pulse_count_per_dwell(dwell_time_s, unambiguous_window_s),
    )?;
    let peak_power_w = finite(
        "peak_power_w",
        peak_power(pixel_energy_j, pulse_count, pulse_time_width_s),
    )?;
    debug!(
        "pixel energy {pixel_energy_j:.6e} J over {pulse_count:.1} pulses, peak power {peak_power_w:.3} W"
    );

    let swath_width_m = finite("swath_width_m", swath_width(config, constants))?;
    let effective_swath_m = swath_width_m - 2.0 * geolocation_error_m;
    debug!("swath {swath_width_m:.3} m, effective {effective_swath_m:.3} m");

    let cloud_repeat_count = finite(
        "cloud_repeat_count",
        cloud_repeat_count(config.observation_probability, config.cloud_fraction),
    )?;
    let orbital_period_s = orbital_period(config.altitude_m, constants);
    let orbits_per_year = finite("orbits_per_year", constants.seconds_per_year / orbital_period_s)?;
    let circumference_m = circumference_at_latitude(config.latitude_deg, constants);
    debug!(
        "cloud repeats {cloud_repeat_count:.3}, period {orbital_period_s:.1} s, {orbits_per_year:.1} orbits/year"
    );

    let coverage = size_constellation(
        config,
        effective_swath_m,
        circumference_m,
        orbits_per_year,
        cloud_repeat_count,
    );
    match &coverage {
        Coverage::Attainable(constellation) => {
            finite("satellites", constellation.satellites)?;
            debug!(
                "{:.1} ground tracks, {:.3} satellites",
                constellation.ground_tracks, constellation.satellites
            );
        }
        Coverage::Unattainable { .. } => warn!(
            "coverage unattainable: geolocation error {geolocation_error_m:.3} m leaves effective swath {effective_swath_m:.3} m"
        ),
    }

    Ok(DerivedMetrics {
        geolocation_error_m,
        dwell_time_s,
        unambiguous_window_s,
        pulse_time_width_s,
        pixel_energy_j,
        pulse_count,
        peak_power_w,
        swath_width_m,
        effective_swath_m,
        cloud_repeat_count,
        orbital_period_s,
        orbits_per_year,
        circumference_m,
        coverage,
    })
}
