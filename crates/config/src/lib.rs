//! Configuration models and loaders for the lidar mission planner.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Mission parameters parsed from a mission file. Every field is optional;
/// missing values fall back to the built-in defaults when merged.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MissionFile {
    pub name: Option<String>,
    pub mirror_area_m2: Option<f64>,
    pub mirror_diameter_m: Option<f64>,
    pub altitude_m: Option<f64>,
    pub ground_resolution_m: Option<f64>,
    pub laser_efficiency: Option<f64>,
    pub detector_efficiency: Option<f64>,
    pub detected_energy_j: Option<f64>,
    pub detected_photons: Option<f64>,
    pub wavelength_nm: Option<f64>,
    pub payload_power_w: Option<f64>,
    pub sampling_fraction: Option<f64>,
    pub pulse_width_m: Option<f64>,
    pub optical_efficiency: Option<f64>,
    pub pointing_error_deg: Option<f64>,
    pub duty_cycle: Option<f64>,
    pub unambiguous_range_m: Option<f64>,
    pub atmospheric_transmission: Option<f64>,
    pub cloud_fraction: Option<f64>,
    pub observation_probability: Option<f64>,
    pub revisit_years: Option<f64>,
    pub latitude_deg: Option<f64>,
}

impl MissionFile {
    /// Overlay `other` on top of `self`: any field set in `other` wins. Setting
    /// either form of the mirror size or detected energy in `other` replaces
    /// both forms from `self`.
    pub fn merge(self, other: MissionFile) -> MissionFile {
        let mirror_overridden = other.mirror_area_m2.is_some() || other.mirror_diameter_m.is_some();
        let energy_overridden = other.detected_energy_j.is_some() || other.detected_photons.is_some();
        let (mirror_area_m2, mirror_diameter_m) = if mirror_overridden {
            (other.mirror_area_m2, other.mirror_diameter_m)
        } else {
            (self.mirror_area_m2, self.mirror_diameter_m)
        };
        let (detected_energy_j, detected_photons) = if energy_overridden {
            (other.detected_energy_j, other.detected_photons)
        } else {
            (self.detected_energy_j, self.detected_photons)
        };
        MissionFile {
            name: other.name.or(self.name),
            mirror_area_m2,
            mirror_diameter_m,
            altitude_m: other.altitude_m.or(self.altitude_m),
            ground_resolution_m: other.ground_resolution_m.or(self.ground_resolution_m),
            laser_efficiency: other.laser_efficiency.or(self.laser_efficiency),
            detector_efficiency: other.detector_efficiency.or(self.detector_efficiency),
            detected_energy_j,
            detected_photons,
            wavelength_nm: other.wavelength_nm.or(self.wavelength_nm),
            payload_power_w: other.payload_power_w.or(self.payload_power_w),
            sampling_fraction: other.sampling_fraction.or(self.sampling_fraction),
            pulse_width_m: other.pulse_width_m.or(self.pulse_width_m),
            optical_efficiency: other.optical_efficiency.or(self.optical_efficiency),
            pointing_error_deg: other.pointing_error_deg.or(self.pointing_error_deg),
            duty_cycle: other.duty_cycle.or(self.duty_cycle),
            unambiguous_range_m: other.unambiguous_range_m.or(self.unambiguous_range_m),
            atmospheric_transmission: other
                .atmospheric_transmission
                .or(self.atmospheric_transmission),
            cloud_fraction: other.cloud_fraction.or(self.cloud_fraction),
            observation_probability: other
                .observation_probability
                .or(self.observation_probability),
            revisit_years: other.revisit_years.or(self.revisit_years),
            latitude_deg: other.latitude_deg.or(self.latitude_deg),
        }
    }

    /// Reject files that give the same quantity in two forms.
    pub fn check_conflicts(&self) -> Result<(), ConfigError> {
        if self.mirror_area_m2.is_some() && self.mirror_diameter_m.is_some() {
            return Err(ConfigError::Conflict {
                first: "mirror_area_m2",
                second: "mirror_diameter_m",
            });
        }
        if self.detected_energy_j.is_some() && self.detected_photons.is_some() {
            return Err(ConfigError::Conflict {
                first: "detected_energy_j",
                second: "detected_photons",
            });
        }
        Ok(())
    }
}

/// Laser technology record from a technology catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TechnologyConfig {
    pub name: String,
    pub laser_efficiency: f64,
    #[serde(default)]
    pub detected_energy_j: Option<f64>,
    #[serde(default)]
    pub detected_photons: Option<f64>,
    #[serde(default)]
    pub wavelength_nm: Option<f64>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("`{first}` and `{second}` describe the same quantity; give only one")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },
    #[error("no mission record found in {0}")]
    Empty(PathBuf),
}

/// Load a single mission file (`.toml`, `.yaml`, or `.yml`).
pub fn load_mission_file<P: AsRef<Path>>(path: P) -> Result<MissionFile, ConfigError> {
    let path = path.as_ref();
    let mission: MissionFile = if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    mission.check_conflicts()?;
    Ok(mission)
}

/// Load every mission file in a directory of TOML records, sorted by path.
pub fn load_mission_dir<P: AsRef<Path>>(path: P) -> Result<Vec<MissionFile>, ConfigError> {
    let path = path.as_ref();
    let missions: Vec<MissionFile> = read_dir_records(path)?;
    if missions.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    for mission in &missions {
        mission.check_conflicts()?;
    }
    Ok(missions)
}

/// Load laser technology configurations from a YAML list, a TOML record, or a directory of TOML records.
pub fn load_technologies<P: AsRef<Path>>(path: P) -> Result<Vec<TechnologyConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
