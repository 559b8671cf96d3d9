use std::fs;

use approx::assert_relative_eq;
use gls_planner::config::{
    ConfigError, MissionFile, load_mission_dir, load_mission_file, load_technologies,
};
use gls_planner::mission::catalog::{self, TechnologyError};
use gls_planner::mission::{MissionConfig, compute_mission, config as mission_config};
use gls_planner::photons::photons_to_energy;

#[test]
fn reference_mission_file_matches_defaults() {
    let file = load_mission_file("configs/missions/reference.toml").expect("reference mission");
    assert_eq!(file.name.as_deref(), Some("reference-400km"));
    let config = mission_config::from_file(&file).expect("conversion");
    let defaults = MissionConfig::default();
    assert_relative_eq!(config.mirror_area_m2, defaults.mirror_area_m2, max_relative = 1e-12);
    assert_eq!(config.altitude_m, defaults.altitude_m);
    assert_eq!(config.detected_energy_j, defaults.detected_energy_j);
    assert_eq!(config.cloud_fraction, defaults.cloud_fraction);
}

#[test]
fn mission_directory_loads_every_record_sorted() {
    let missions = load_mission_dir("configs/missions").expect("mission directory");
    let names: Vec<_> = missions.iter().filter_map(|m| m.name.clone()).collect();
    assert_eq!(
        names,
        vec!["high-latitude-photon-counting", "reference-400km"]
    );
    for mission in &missions {
        let config = mission_config::from_file(mission).unwrap();
        assert!(compute_mission(&config).is_ok());
    }
}

#[test]
fn photon_count_and_wavelength_set_detected_energy() {
    let file = load_mission_file("configs/missions/high_latitude.toml").unwrap();
    let config = mission_config::from_file(&file).unwrap();
    assert_relative_eq!(
        config.detected_energy_j,
        photons_to_energy(2400.0, 1064.0e-9),
        max_relative = 1e-12
    );
    assert_eq!(config.latitude_deg, 60.0);
    // unset fields come from the defaults
    assert_eq!(config.unambiguous_range_m, MissionConfig::default().unambiguous_range_m);
}

#[test]
fn yaml_mission_files_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mission.yaml");
    fs::write(&path, "name: yaml-mission\naltitude_m: 600000.0\nmirror_diameter_m: 1.0\n").unwrap();
    let file = load_mission_file(&path).unwrap();
    let config = mission_config::from_file(&file).unwrap();
    assert_eq!(config.altitude_m, 600_000.0);
    assert_relative_eq!(config.mirror_area_m2, std::f64::consts::PI / 4.0, max_relative = 1e-12);
}

#[test]
fn duplicate_quantities_are_a_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "mirror_area_m2 = 0.5\nmirror_diameter_m = 0.8\n").unwrap();
    match load_mission_file(&path) {
        Err(ConfigError::Conflict { first, second }) => {
            assert_eq!(first, "mirror_area_m2");
            assert_eq!(second, "mirror_diameter_m");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.toml");
    fs::write(&path, "altitude = 400000.0\n").unwrap();
    assert!(matches!(load_mission_file(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn later_layers_replace_both_forms_of_a_quantity() {
    let file = MissionFile {
        mirror_diameter_m: Some(0.8),
        detected_photons: Some(100.0),
        altitude_m: Some(500_000.0),
        ..MissionFile::default()
    };
    let flags = MissionFile {
        mirror_area_m2: Some(1.0),
        ..MissionFile::default()
    };
    let merged = file.merge(flags);
    assert_eq!(merged.mirror_area_m2, Some(1.0));
    assert_eq!(merged.mirror_diameter_m, None);
    assert_eq!(merged.detected_photons, Some(100.0));
    assert_eq!(merged.altitude_m, Some(500_000.0));
    assert!(merged.check_conflicts().is_ok());
}

#[test]
fn technology_catalog_converts() {
    let configs = load_technologies("configs/technologies.yaml").expect("technology catalog");
    assert_eq!(configs.len(), 3);
    let technologies = catalog::from_catalog(&configs).unwrap();
    assert_eq!(technologies[0].name, "solid-state");
    assert_relative_eq!(technologies[0].detected_energy_j, 2.81e-16);
    assert_relative_eq!(
        technologies[1].detected_energy_j,
        photons_to_energy(2000.0, 850.0e-9),
        max_relative = 1e-12
    );

    let picked = catalog::select(&configs, Some("DIODE-TRAIN")).unwrap();
    assert_eq!(picked.name, "diode-train");
    let first = catalog::select(&configs, None).unwrap();
    assert_eq!(first.name, "solid-state");
    assert!(matches!(
        catalog::select(&configs, Some("fibre")),
        Err(TechnologyError::NotFound(_))
    ));
    assert!(matches!(
        catalog::from_catalog(&[]),
        Err(TechnologyError::EmptyCatalog)
    ));
}

#[test]
fn technology_without_energy_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tech.toml");
    fs::write(&path, "name = \"bare\"\nlaser_efficiency = 0.2\n").unwrap();
    let configs = load_technologies(&path).unwrap();
    assert!(matches!(
        catalog::from_config(&configs[0]),
        Err(TechnologyError::MissingEnergy(_))
    ));
}
