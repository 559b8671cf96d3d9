//! One-dimensional parameter sweeps over the mission model.

use std::fmt;

use gls_core::range::SweepRange;
use log::info;

use crate::model::{DerivedMetrics, MissionConfig, MissionError, compute_mission};

/// Mission parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    Altitude,
    GroundResolution,
    MirrorArea,
    PayloadPower,
    PointingError,
    Latitude,
    RevisitYears,
    CloudFraction,
    ObservationProbability,
    DutyCycle,
}

impl SweepParameter {
    pub const ALL: [SweepParameter; 10] = [
        SweepParameter::Altitude,
        SweepParameter::GroundResolution,
        SweepParameter::MirrorArea,
        SweepParameter::PayloadPower,
        SweepParameter::PointingError,
        SweepParameter::Latitude,
        SweepParameter::RevisitYears,
        SweepParameter::CloudFraction,
        SweepParameter::ObservationProbability,
        SweepParameter::DutyCycle,
    ];

    /// Column label including the unit, matching the [`MissionConfig`] field name.
    pub fn label(&self) -> &'static str {
        match self {
            SweepParameter::Altitude => "altitude_m",
            SweepParameter::GroundResolution => "ground_resolution_m",
            SweepParameter::MirrorArea => "mirror_area_m2",
            SweepParameter::PayloadPower => "payload_power_w",
            SweepParameter::PointingError => "pointing_error_deg",
            SweepParameter::Latitude => "latitude_deg",
            SweepParameter::RevisitYears => "revisit_years",
            SweepParameter::CloudFraction => "cloud_fraction",
            SweepParameter::ObservationProbability => "observation_probability",
            SweepParameter::DutyCycle => "duty_cycle",
        }
    }

    /// Copy of `base` with this parameter set to `value`.
    pub fn apply(&self, base: &MissionConfig, value: f64) -> MissionConfig {
        let mut config = *base;
        let field = match self {
            SweepParameter::Altitude => &mut config.altitude_m,
            SweepParameter::GroundResolution => &mut config.ground_resolution_m,
            SweepParameter::MirrorArea => &mut config.mirror_area_m2,
            SweepParameter::PayloadPower => &mut config.payload_power_w,
            SweepParameter::PointingError => &mut config.pointing_error_deg,
            SweepParameter::Latitude => &mut config.latitude_deg,
            SweepParameter::RevisitYears => &mut config.revisit_years,
            SweepParameter::CloudFraction => &mut config.cloud_fraction,
            SweepParameter::ObservationProbability => &mut config.observation_probability,
            SweepParameter::DutyCycle => &mut config.duty_cycle,
        };
        *field = value;
        config
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model outcome at one sample of the sweep.
#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub value: f64,
    pub outcome: Result<DerivedMetrics, MissionError>,
}

/// Evaluate `base` at every value of `range` for `parameter`. Invalid samples
/// are recorded with their error rather than stopping the sweep.
pub fn sweep(base: &MissionConfig, parameter: SweepParameter, range: &SweepRange) -> Vec<SweepPoint> {
    let values = range.values();
    info!("sweeping {parameter} over {range} ({} samples)", values.len());
    values
        .into_iter()
        .map(|value| SweepPoint {
            value,
            outcome: compute_mission(&parameter.apply(base, value)),
        })
        .collect()
}
