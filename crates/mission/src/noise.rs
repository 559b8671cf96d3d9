//! Background noise budget for a photon-counting receiver.
//!
//! Rates are scaled from a reference 80 cm telescope observing the night sky
//! and accumulated over the pulses fired within one dwell.

use serde::Serialize;

use crate::model::{DerivedMetrics, MissionConfig};

const DARK_COUNT_PER_US: f64 = 400.0e-6;

/// Reference noise environment. Rates are counts per microsecond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseModel {
    pub dark_count_per_us: f64,
    /// Night background seen by the reference telescope, dark counts excluded.
    pub night_background_per_us: f64,
    pub reference_area_m2: f64,
    pub background_scale: f64,
    pub reference_detector_efficiency: f64,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            dark_count_per_us: DARK_COUNT_PER_US,
            night_background_per_us: 0.012 - DARK_COUNT_PER_US,
            reference_area_m2: 0.4 * 0.4 * std::f64::consts::PI,
            background_scale: 1.0 / 0.03,
            reference_detector_efficiency: 0.15,
        }
    }
}

/// Noise expected for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseBudget {
    /// Background plus dark count rate for a single pulse window (counts/µs).
    pub rate_per_us: f64,
    /// Pulses accumulated within one dwell.
    pub pulse_repeats: f64,
    /// Rate accumulated over all repeats (counts/µs).
    pub accumulated_per_us: f64,
}

/// Scale the reference background to the mission's telescope and detector.
pub fn estimate_noise(
    config: &MissionConfig,
    metrics: &DerivedMetrics,
    model: &NoiseModel,
) -> NoiseBudget {
    let area_ratio = config.mirror_area_m2 / model.reference_area_m2;
    let efficiency_ratio = config.detector_efficiency / model.reference_detector_efficiency;
    let rate_per_us = area_ratio
        * model.night_background_per_us
        * model.background_scale
        * efficiency_ratio
        + model.dark_count_per_us;
    let pulse_repeats = metrics.pulse_count;

    NoiseBudget {
        rate_per_us,
        pulse_repeats,
        accumulated_per_us: rate_per_us * pulse_repeats,
    }
}
