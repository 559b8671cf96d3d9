//! Re-exported APIs for consumers of the mission crate.

pub use crate::model::{
    Constellation, Constraint, Coverage, DerivedMetrics, MissionConfig, MissionError,
    PhysicalConstants, compute_mission, compute_mission_with, validate,
};
pub use crate::noise::{NoiseBudget, NoiseModel, estimate_noise};
pub use crate::sweep::{SweepParameter, SweepPoint, sweep};
pub use crate::technology::{Comparison, LaserTechnology, compare};

pub mod config {
    use gls_config::{ConfigError, MissionFile};
    use gls_core::constants::DEFAULT_WAVELENGTH_M;
    use gls_core::optics::circular_area;
    use gls_core::photons::photons_to_energy;
    use gls_core::units::nm_to_m;

    use crate::model::MissionConfig;

    /// Build a [`MissionConfig`] from a mission file, taking unset fields from the defaults.
    pub fn from_file(file: &MissionFile) -> Result<MissionConfig, ConfigError> {
        file.check_conflicts()?;
        let defaults = MissionConfig::default();
        let wavelength_m = file.wavelength_nm.map(nm_to_m).unwrap_or(DEFAULT_WAVELENGTH_M);

        let mirror_area_m2 = match (file.mirror_area_m2, file.mirror_diameter_m) {
            (Some(area), _) => area,
            (None, Some(diameter)) => circular_area(diameter),
            (None, None) => defaults.mirror_area_m2,
        };
        let detected_energy_j = match (file.detected_energy_j, file.detected_photons) {
            (Some(energy), _) => energy,
            (None, Some(photons)) => photons_to_energy(photons, wavelength_m),
            (None, None) => defaults.detected_energy_j,
        };

        Ok(MissionConfig {
            mirror_area_m2,
            altitude_m: file.altitude_m.unwrap_or(defaults.altitude_m),
            ground_resolution_m: file
                .ground_resolution_m
                .unwrap_or(defaults.ground_resolution_m),
            laser_efficiency: file.laser_efficiency.unwrap_or(defaults.laser_efficiency),
            detector_efficiency: file
                .detector_efficiency
                .unwrap_or(defaults.detector_efficiency),
            detected_energy_j,
            payload_power_w: file.payload_power_w.unwrap_or(defaults.payload_power_w),
            sampling_fraction: file.sampling_fraction.unwrap_or(defaults.sampling_fraction),
            pulse_width_m: file.pulse_width_m.unwrap_or(defaults.pulse_width_m),
            optical_efficiency: file
                .optical_efficiency
                .unwrap_or(defaults.optical_efficiency),
            pointing_error_deg: file
                .pointing_error_deg
                .unwrap_or(defaults.pointing_error_deg),
            duty_cycle: file.duty_cycle.unwrap_or(defaults.duty_cycle),
            unambiguous_range_m: file
                .unambiguous_range_m
                .unwrap_or(defaults.unambiguous_range_m),
            atmospheric_transmission: file
                .atmospheric_transmission
                .unwrap_or(defaults.atmospheric_transmission),
            cloud_fraction: file.cloud_fraction.unwrap_or(defaults.cloud_fraction),
            observation_probability: file
                .observation_probability
                .unwrap_or(defaults.observation_probability),
            revisit_years: file.revisit_years.unwrap_or(defaults.revisit_years),
            latitude_deg: file.latitude_deg.unwrap_or(defaults.latitude_deg),
        })
    }
}

pub mod catalog {
    use gls_config::TechnologyConfig;
    use gls_core::constants::DEFAULT_WAVELENGTH_M;
    use gls_core::photons::photons_to_energy;
    use gls_core::units::nm_to_m;
    use thiserror::Error;

    use crate::technology::{LaserTechnology, name_matches};

    /// Errors surfaced when selecting or converting laser technologies.
    #[derive(Debug, Error)]
    pub enum TechnologyError {
        #[error("technology '{0}' not found in catalog")]
        NotFound(String),
        #[error("technology catalog is empty")]
        EmptyCatalog,
        #[error("technology '{0}' needs either detected_energy_j or detected_photons")]
        MissingEnergy(String),
        #[error("technology '{0}' gives both detected_energy_j and detected_photons")]
        ConflictingEnergy(String),
    }

    /// Convert a `TechnologyConfig` into a runtime `LaserTechnology`.
    pub fn from_config(config: &TechnologyConfig) -> Result<LaserTechnology, TechnologyError> {
        let wavelength_m = config
            .wavelength_nm
            .map(nm_to_m)
            .unwrap_or(DEFAULT_WAVELENGTH_M);
        let detected_energy_j = match (config.detected_energy_j, config.detected_photons) {
            (Some(_), Some(_)) => {
                return Err(TechnologyError::ConflictingEnergy(config.name.clone()));
            }
            (Some(energy), None) => energy,
            (None, Some(photons)) => photons_to_energy(photons, wavelength_m),
            (None, None) => return Err(TechnologyError::MissingEnergy(config.name.clone())),
        };

        Ok(LaserTechnology::new(
            config.name.clone(),
            config.laser_efficiency,
            detected_energy_j,
        ))
    }

    /// Convert a whole catalog, failing on the first bad record.
    pub fn from_catalog(configs: &[TechnologyConfig]) -> Result<Vec<LaserTechnology>, TechnologyError> {
        if configs.is_empty() {
            return Err(TechnologyError::EmptyCatalog);
        }
        configs.iter().map(from_config).collect()
    }

    /// Select a technology from the catalog by optional name, defaulting to the first entry.
    pub fn select(
        configs: &[TechnologyConfig],
        requested: Option<&str>,
    ) -> Result<LaserTechnology, TechnologyError> {
        if configs.is_empty() {
            return Err(TechnologyError::EmptyCatalog);
        }

        let chosen = if let Some(name) = requested {
            configs
                .iter()
                .find(|cfg| name_matches(&cfg.name, name))
                .ok_or_else(|| TechnologyError::NotFound(name.to_string()))?
        } else {
            &configs[0]
        };

        from_config(chosen)
    }
}
