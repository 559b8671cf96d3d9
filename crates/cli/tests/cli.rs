use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use csv::Reader;
use predicates::prelude::*;

fn workspace_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

#[test]
fn plan_reports_default_constellation() {
    Command::cargo_bin("gls_planner")
        .expect("gls_planner bin")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dwell          : 4.15 ms"))
        .stdout(predicate::str::contains("(8 needed for 5 year revisit)"));
}

#[test]
fn plan_reads_mission_file_and_flags_override_it() {
    let config = workspace_file("configs/missions/reference.toml");
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args(["plan", "--config", config.to_str().unwrap(), "--duty-cycle", "0.5", "--noise"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mission        : reference-400km"))
        .stdout(predicate::str::contains("(16 needed"))
        .stdout(predicate::str::contains("Noise"));
}

#[test]
fn plan_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("out").join("report.json");
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args([
            "plan",
            "--mirror-diameter",
            "0.8",
            "--latitude",
            "-30",
            "--json",
            json.to_str().unwrap(),
        ])
        .assert()
        .success();
    let text = fs::read_to_string(json).unwrap();
    assert!(text.contains("\"latitude_deg\": -30.0"), "{text}");
    assert!(text.contains("\"state\": \"attainable\""), "{text}");
}

#[test]
fn unattainable_coverage_fails_with_explanation() {
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args(["plan", "--pointing-error", "0.1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("coverage unattainable"))
        .stderr(predicate::str::contains("coverage unattainable"));
}

#[test]
fn invalid_parameter_is_rejected_before_computing() {
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args(["plan", "--cloud-fraction", "1.0"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cloud_fraction"));
}

#[test]
fn conflicting_flags_are_refused() {
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args(["plan", "--mirror-area", "0.5", "--mirror-diameter", "0.8"])
        .assert()
        .failure();
}

#[test]
fn compare_lists_builtin_technologies() {
    Command::cargo_bin("gls_planner")
        .unwrap()
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains("solid-state"))
        .stdout(predicate::str::contains("diode-pcl"))
        .stdout(predicate::str::contains("diode-train"));
}

#[test]
fn compare_selects_from_catalog() {
    let catalog = workspace_file("configs/technologies.yaml");
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args([
            "compare",
            "--catalog",
            catalog.to_str().unwrap(),
            "--technology",
            "diode-train",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("diode-train"))
        .stdout(predicate::str::contains("solid-state").not());
}

#[test]
fn sweep_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sweep.csv");
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args([
            "sweep",
            "--parameter",
            "latitude",
            "--range",
            "-60:60:30",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let mut reader = Reader::from_path(&output).unwrap();
    assert_eq!(&reader.headers().unwrap()[0], "latitude_deg");
    let statuses: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[1].to_string())
        .collect();
    assert_eq!(statuses, vec!["ok"; 5]);
}

#[test]
fn sweep_rejects_malformed_range() {
    Command::cargo_bin("gls_planner")
        .unwrap()
        .args(["sweep", "--parameter", "altitude", "--range", "1:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start:stop:step"));
}

#[test]
fn check_deadtime_prints_pixel_table() {
    Command::cargo_bin("check_deadtime")
        .expect("check_deadtime bin")
        .args(["--max-pixels", "50", "--target", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 ProbArrive 0.9809 probAll 0.00"))
        .stdout(predicate::str::contains("45 pixels reach probAll >= 0.9"));
}

#[test]
fn check_deadtime_rejects_zero_photons() {
    Command::cargo_bin("check_deadtime")
        .unwrap()
        .args(["--n-photons", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("n_photons"));
}
