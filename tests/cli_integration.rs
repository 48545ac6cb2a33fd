use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hazard-twin"))
        .args(args)
        .output()
        .expect("hazard-twin process should run")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hazard-twin-{}-{name}", std::process::id()))
}

#[test]
fn demo_run_prints_steps_and_report() {
    let output = run_cli(&["--preset", "baseline"]);
    assert!(
        output.status.success(),
        "demo run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    // baseline preset runs every step
    assert_eq!(stdout.lines().filter(|l| l.starts_with("step=")).count(), 30);
    assert!(stdout.contains("--- Recovery Report (baseline) ---"));
    assert!(stdout.contains("Full restoration:      day"));
}

#[test]
fn csv_and_scenario_run_exports_telemetry() {
    let out = temp_path("telemetry.csv");
    let out_str = out.to_string_lossy().to_string();
    let output = run_cli(&[
        "--buildings",
        "data/sample_buildings.csv",
        "--scenario",
        "scenarios/equity.toml",
        "--telemetry-out",
        &out_str,
    ]);
    assert!(
        output.status.success(),
        "scenario run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("--- Recovery Report (equity) ---"));

    let csv = fs::read_to_string(&out).expect("telemetry file should exist");
    let _ = fs::remove_file(&out);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(
            "step,time_days,repaired,energized_buildings,total_buildings,\
             energized_pct,operational_assets,total_assets,customer_outage_days"
        )
    );
    // substation + 3 feeders, stopping once restored
    assert_eq!(lines.count(), 4);
}

#[test]
fn baseline_scenario_file_stops_when_restored() {
    let output = run_cli(&[
        "--buildings",
        "data/sample_buildings.csv",
        "--scenario",
        "scenarios/baseline.toml",
    ]);
    assert!(
        output.status.success(),
        "scenario run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("--- Recovery Report (baseline) ---"));
    // substation + 3 feeders at half-day steps
    assert_eq!(stdout.lines().filter(|l| l.starts_with("step=")).count(), 4);
    assert!(stdout.contains("Full restoration:      day 2.0"));
}

#[test]
fn reserved_building_id_fails() {
    let path = temp_path("reserved_id.csv");
    fs::write(&path, "id,lat,lon\nfeeder:0,29.0,-85.0\nB2,26.0,-82.0\n")
        .expect("temp file should be writable");
    let path_str = path.to_string_lossy().to_string();
    let output = run_cli(&["--buildings", &path_str]);
    let _ = fs::remove_file(&path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reserved"), "stderr={stderr}");
}

#[test]
fn policy_flag_overrides_scenario() {
    let output = run_cli(&["--scenario", "scenarios/equity.toml", "--policy", "baseline"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Recovery Report (baseline)"));
}

#[test]
fn missing_building_file_fails() {
    let output = run_cli(&["--buildings", "data/does_not_exist.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr={stderr}");
}

#[test]
fn table_without_coordinates_fails() {
    let path = temp_path("no_coords.csv");
    fs::write(&path, "id,x,y\nB1,1.0,2.0\n").expect("temp file should be writable");
    let path_str = path.to_string_lossy().to_string();
    let output = run_cli(&["--buildings", &path_str]);
    let _ = fs::remove_file(&path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lat"), "stderr={stderr}");
}

#[test]
fn invalid_arguments_fail() {
    assert!(!run_cli(&["--policy", "random"]).status.success());
    assert!(!run_cli(&["--feeders", "0"]).status.success());
    assert!(!run_cli(&["--preset", "nonexistent"]).status.success());
    assert!(!run_cli(&["--bogus"]).status.success());
}
