//! Detector dead-time versus pixel-count trade-off.
//!
//! Signal photons arriving within a measurement window are modelled with a
//! mean separation `window / n`. A photon is lost when it lands within the dead
//! time of the previous photon on the same pixel; spreading the return over
//! more pixels reduces that chance with the square of the pixel count.

use std::f64::consts::SQRT_2;

use gls_core::constants::SPEED_OF_LIGHT_EXACT_M_S;
use gls_core::units::{ns_to_s, two_way_time};
use scilib::math::basic::erf;
use serde::Serialize;
use thiserror::Error;

/// Inputs to the dead-time calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadtimeConfig {
    /// Expected signal photons per measurement.
    pub n_photons: u32,
    /// Measurement window, e.g. canopy height (m).
    pub window_m: f64,
    /// Pixel dead time (ns).
    pub deadtime_ns: f64,
    /// Largest pixel count tabulated.
    pub max_pixels: u32,
}

impl Default for DeadtimeConfig {
    fn default() -> Self {
        Self {
            n_photons: 205,
            window_m: 20.0,
            deadtime_ns: 2.0,
            max_pixels: 99,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeadtimeError {
    #[error("invalid parameter {name} = {value}: must be {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

/// Detection probability for one array size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRow {
    pub pixels: u32,
    pub prob_all_detected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadtimeReport {
    /// Two-way time spanned by the window (s).
    pub window_s: f64,
    /// Mean time between signal photons (s).
    pub mean_separation_s: f64,
    pub deadtime_s: f64,
    /// Probability that a photon falls within the dead time of its predecessor.
    pub pileup_probability: f64,
    pub rows: Vec<PixelRow>,
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Probability that a photon arrives within `deadtime_s` of the previous one.
///
/// The arrival gap is treated as normal with mean and standard deviation both
/// equal to the mean separation.
pub fn pileup_probability(deadtime_s: f64, mean_separation_s: f64) -> f64 {
    normal_cdf((deadtime_s - mean_separation_s) / mean_separation_s)
}

/// Probability that no two photons share a pixel within the dead time, floored at zero.
pub fn prob_all_detected(n_photons: u32, pileup_probability: f64, pixels: u32) -> f64 {
    let pixels = pixels as f64;
    (1.0 - n_photons as f64 * pileup_probability / (pixels * pixels)).max(0.0)
}

/// Smallest pixel count whose all-detected probability reaches `target`.
pub fn pixels_for_probability(
    n_photons: u32,
    pileup_probability: f64,
    target: f64,
) -> Result<u32, DeadtimeError> {
    if !(target > 0.0 && target < 1.0) {
        return Err(DeadtimeError::InvalidParameter {
            name: "target",
            value: target,
            constraint: "in (0, 1)",
        });
    }
    let unreachable = DeadtimeError::InvalidParameter {
        name: "target",
        value: target,
        constraint: "reachable with at most u32::MAX pixels",
    };
    let exact = (n_photons as f64 * pileup_probability / (1.0 - target)).sqrt();
    if !(exact.ceil() < u32::MAX as f64) {
        return Err(unreachable);
    }
    let mut pixels = (exact.ceil() as u32).max(1);
    // the square root can land a hair either side of an integer
    while prob_all_detected(n_photons, pileup_probability, pixels) < target {
        pixels = pixels.checked_add(1).ok_or_else(|| unreachable.clone())?;
    }
    while pixels > 1 && prob_all_detected(n_photons, pileup_probability, pixels - 1) >= target {
        pixels -= 1;
    }
    Ok(pixels)
}

fn check(name: &'static str, value: f64, ok: bool, constraint: &'static str) -> Result<(), DeadtimeError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(DeadtimeError::InvalidParameter {
            name,
            value,
            constraint,
        })
    }
}

/// Tabulate the all-detected probability for 1..=`max_pixels` pixels.
pub fn evaluate(config: &DeadtimeConfig) -> Result<DeadtimeReport, DeadtimeError> {
    check("n_photons", config.n_photons as f64, config.n_photons > 0, "> 0")?;
    check("window_m", config.window_m, config.window_m > 0.0, "> 0")?;
    check("deadtime_ns", config.deadtime_ns, config.deadtime_ns >= 0.0, ">= 0")?;
    check("max_pixels", config.max_pixels as f64, config.max_pixels > 0, ">= 1")?;

    let window_s = two_way_time(config.window_m, SPEED_OF_LIGHT_EXACT_M_S);
    let mean_separation_s = window_s / config.n_photons as f64;
    let deadtime_s = ns_to_s(config.deadtime_ns);
    let pileup = pileup_probability(deadtime_s, mean_separation_s);

    let rows = (1..=config.max_pixels)
        .map(|pixels| PixelRow {
            pixels,
            prob_all_detected: prob_all_detected(config.n_photons, pileup, pixels),
        })
        .collect();

    Ok(DeadtimeReport {
        window_s,
        mean_separation_s,
        deadtime_s,
        pileup_probability: pileup,
        rows,
    })
}
