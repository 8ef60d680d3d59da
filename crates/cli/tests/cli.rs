use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use slingshot_cli::epoch::{format_mjd2000, parse_epoch};
use slingshot_cli::resolve_body;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
}

#[test]
fn epochs_parse_as_days_or_calendar_dates() {
    assert!((parse_epoch("1234.5").unwrap() - 1234.5).abs() < 1e-12);
    assert!(parse_epoch("2000-01-01").unwrap().abs() < 1e-12);
    assert!((parse_epoch("2000-01-02T12:00:00").unwrap() - 1.5).abs() < 1e-9);
    assert!((parse_epoch("2001-01-01").unwrap() - 366.0).abs() < 1e-9);
    assert!(parse_epoch("next tuesday").is_err());
    assert_eq!(format_mjd2000(366.0), "2001-01-01T00:00:00");
}

#[test]
fn bodies_resolve_with_and_without_catalog() {
    let builtin = resolve_body(None, "mars").expect("builtin mars");
    assert_eq!(builtin.body.id(), 4);
    assert!((builtin.safe_radius_km - builtin.body.radius_km()).abs() < 1e-9);

    let catalog = slingshot::config::load_bodies(repo_path("configs/bodies")).expect("catalog");
    let mars = resolve_body(Some(&catalog), "Mars").expect("catalog mars");
    assert!(mars.safe_radius_km > mars.radius_km);
    assert!((mars.min_radius_km(Some(50.0), true) - (mars.radius_km + 50.0)).abs() < 1e-9);
    assert_eq!(mars.min_radius_km(None, true), mars.safe_radius_km);
    assert_eq!(builtin.min_radius_km(None, false), 0.0);

    let mut shrunk = catalog.clone();
    let entry = shrunk.iter_mut().find(|b| b.name == "Mars").expect("mars entry");
    entry.radius_km = 3_000.0;
    let mars = resolve_body(Some(&shrunk), "mars").expect("edited mars");
    assert_eq!(mars.radius_km, 3_000.0);
    assert!((mars.min_radius_km(Some(100.0), true) - 3_100.0).abs() < 1e-9);

    assert!(resolve_body(None, "Vulcan").is_err());
}

#[test]
fn evaluate_prints_a_breakdown_or_infeasible() {
    Command::cargo_bin("evaluate")
        .expect("evaluate bin")
        .args([
            "--from", "earth", "--via", "mars", "--to", "jupiter", "--depart", "2003-06-01",
            "--flyby", "2004-02-01", "--arrive", "2006-06-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("EARTH -> MARS -> JUPITER"));
}

#[test]
fn evaluate_reports_reversed_epochs_as_infeasible() {
    Command::cargo_bin("evaluate")
        .expect("evaluate bin")
        .args([
            "--from", "earth", "--via", "mars", "--to", "jupiter", "--depart", "1500",
            "--flyby", "1400", "--arrive", "2000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("infeasible"));
}

#[test]
fn infeasible_evaluation_still_writes_the_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("report.json");

    Command::cargo_bin("evaluate")
        .expect("evaluate bin")
        .args([
            "--from", "earth", "--via", "mars", "--to", "jupiter", "--depart", "1500",
            "--flyby", "1400", "--arrive", "2000", "--json",
        ])
        .arg(&json_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("infeasible"));

    let text = std::fs::read_to_string(&json_path).expect("json report");
    let document: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(document["feasible"], serde_json::Value::Bool(false));
    assert!(document["report"]["total_delta_v_km_s"].is_null());
    assert_eq!(document["request"]["flyby_epoch_mjd2000"].as_f64(), Some(1400.0));
}

#[test]
fn evaluate_rejects_unknown_bodies() {
    Command::cargo_bin("evaluate")
        .expect("evaluate bin")
        .args([
            "--from", "earth", "--via", "vulcan", "--to", "jupiter", "--depart", "0", "--flyby",
            "200", "--arrive", "900",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vulcan"));
}

#[test]
fn porkchop_writes_one_row_per_cell() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("grid.csv");

    Command::cargo_bin("porkchop")
        .expect("porkchop bin")
        .args([
            "--from", "earth", "--via", "mars", "--to", "jupiter", "--depart-start", "1200",
            "--depart-end", "1240", "--step-days", "20", "--tof1-min", "200", "--tof1-max", "250",
            "--tof1-step", "50", "--tof2-min", "800", "--tof2-max", "800", "--tof2-step", "100",
            "--catalog",
        ])
        .arg(repo_path("configs/bodies"))
        .arg("--solver-config")
        .arg(repo_path("configs/solver.toml"))
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("cells feasible"));

    let mut reader = csv::Reader::from_path(&csv_path).expect("csv reader");
    let headers = reader.headers().expect("headers").clone();
    assert!(headers.iter().any(|h| h == "dv_total_km_s"));
    assert!(headers.iter().any(|h| h == "feasible"));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 3 * 2);
    let flyby_col = headers.iter().position(|h| h == "flyby_body").expect("flyby column");
    assert!(rows.iter().all(|row| &row[flyby_col] == "MARS"));
}
