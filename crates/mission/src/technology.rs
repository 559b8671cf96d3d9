//! Laser technology trade study: substitute each technology's wall-plug
//! efficiency and detected energy into a base mission and compare outcomes.

use gls_core::constants::DEFAULT_WAVELENGTH_M;
use gls_core::photons::photons_to_energy;
use log::info;
use serde::Serialize;

use crate::model::{DerivedMetrics, MissionConfig, MissionError, compute_mission};

/// A laser/detector pairing characterised by efficiency and detected energy per pixel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaserTechnology {
    pub name: String,
    pub laser_efficiency: f64,
    pub detected_energy_j: f64,
}

impl LaserTechnology {
    pub fn new(name: impl Into<String>, laser_efficiency: f64, detected_energy_j: f64) -> Self {
        Self {
            name: name.into(),
            laser_efficiency,
            detected_energy_j,
        }
    }

    /// Laser efficiency per unit detected energy (J⁻¹); higher is better.
    pub fn figure_of_merit(&self) -> f64 {
        self.laser_efficiency / self.detected_energy_j
    }

    /// Copy of `base` flying this technology.
    pub fn apply(&self, base: &MissionConfig) -> MissionConfig {
        MissionConfig {
            laser_efficiency: self.laser_efficiency,
            detected_energy_j: self.detected_energy_j,
            ..*base
        }
    }
}

/// Built-in technologies: a solid-state laser and two diode variants at 850 nm.
pub fn builtin() -> Vec<LaserTechnology> {
    vec![
        LaserTechnology::new("solid-state", 0.08, 2.81e-16),
        LaserTechnology::new(
            "diode-pcl",
            0.25,
            photons_to_energy(2_000.0, DEFAULT_WAVELENGTH_M),
        ),
        LaserTechnology::new(
            "diode-train",
            0.25,
            photons_to_energy(3_000.0, DEFAULT_WAVELENGTH_M),
        ),
    ]
}

/// Case-insensitive technology name match.
pub fn name_matches(candidate: &str, requested: &str) -> bool {
    candidate.to_uppercase() == requested.to_uppercase()
}

/// Look up a built-in technology by name, ignoring case.
pub fn find_builtin(name: &str) -> Option<LaserTechnology> {
    builtin()
        .into_iter()
        .find(|technology| name_matches(&technology.name, name))
}

/// One row of a technology comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub technology: LaserTechnology,
    pub outcome: Result<DerivedMetrics, MissionError>,
}

/// Evaluate `base` once per technology.
pub fn compare(base: &MissionConfig, technologies: &[LaserTechnology]) -> Vec<Comparison> {
    info!("comparing {} laser technologies", technologies.len());
    technologies
        .iter()
        .map(|technology| Comparison {
            technology: technology.clone(),
            outcome: compute_mission(&technology.apply(base)),
        })
        .collect()
}
