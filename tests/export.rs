use std::fs;

use csv::Reader;
use gls_planner::deadtime::{DeadtimeConfig, evaluate};
use gls_planner::export::{self, report::MissionReport};
use gls_planner::mission::{
    MissionConfig, NoiseModel, SweepParameter, compute_mission, estimate_noise, sweep,
};
use gls_planner::range::SweepRange;

#[test]
fn sweep_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("sweep.csv");
    let range: SweepRange = "0:0.2:0.1".parse().unwrap();
    let points = sweep(&MissionConfig::default(), SweepParameter::PointingError, &range);

    let mut writer = export::writer_for_path(&path).unwrap();
    export::sweep::write_all(&mut writer, SweepParameter::PointingError, &points).unwrap();
    drop(writer);

    let mut reader = Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "pointing_error_deg");
    assert_eq!(headers.len(), 15);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.len(), 15);
    }
    assert_eq!(&rows[0][1], "ok");
    assert_eq!(&rows[0][13], "8");
    assert_eq!(&rows[2][1], "unattainable");
    assert_eq!(&rows[2][13], "");
}

#[test]
fn invalid_sweep_rows_carry_the_error() {
    let mut buffer: Vec<u8> = Vec::new();
    let range = SweepRange::new(0.8, 1.0, 0.2).unwrap();
    let points = sweep(&MissionConfig::default(), SweepParameter::ObservationProbability, &range);
    export::sweep::write_all(&mut buffer, SweepParameter::ObservationProbability, &points).unwrap();

    let mut reader = Reader::from_reader(buffer.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][1], "invalid");
    assert!(rows[1][14].contains("observation_probability"));
}

#[test]
fn mission_report_json_has_coverage_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let config = MissionConfig::default();
    let metrics = compute_mission(&config).unwrap();
    let noise = estimate_noise(&config, &metrics, &NoiseModel::default());
    let report = MissionReport {
        name: Some("baseline"),
        noise: Some(&noise),
        ..MissionReport::new(&config, &metrics)
    };
    export::report::write_mission(&path, &report).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["name"], "baseline");
    assert_eq!(value["satellites_required"], 8);
    assert_eq!(value["metrics"]["coverage"]["state"], "attainable");
    assert!(value["metrics"]["coverage"]["satellites"].as_f64().unwrap() > 7.0);
    assert_eq!(value["config"]["altitude_m"], 400_000.0);
    assert!(value["noise"]["rate_per_us"].as_f64().unwrap() > 0.0);
}

#[test]
fn unattainable_report_omits_satellites() {
    let config = MissionConfig {
        pointing_error_deg: 0.1,
        ..MissionConfig::default()
    };
    let metrics = compute_mission(&config).unwrap();
    let mut text = Vec::new();
    export::text::write_mission(&mut text, &config, &metrics).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("coverage unattainable"), "{text}");

    let report = MissionReport::new(&config, &metrics);
    let value = serde_json::to_value(&report).unwrap();
    assert!(value["satellites_required"].is_null());
    assert_eq!(value["metrics"]["coverage"]["state"], "unattainable");
    assert!(value.get("noise").is_none());
}

#[test]
fn text_report_uses_presentation_units() {
    let config = MissionConfig::default();
    let metrics = compute_mission(&config).unwrap();
    let mut text = Vec::new();
    export::text::write_mission(&mut text, &config, &metrics).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("4.15 ms"), "{text}");
    assert!(text.contains("4.88 mJ"), "{text}");
    assert!(text.contains("(8 needed"), "{text}");
}

#[test]
fn deadtime_json_lists_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deadtime.json");
    let report = evaluate(&DeadtimeConfig {
        max_pixels: 10,
        ..DeadtimeConfig::default()
    })
    .unwrap();
    export::report::write_deadtime(&path, &report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["rows"].as_array().unwrap().len(), 10);
    assert_eq!(value["rows"][9]["pixels"], 10);
}
