//! End-to-end tests for the `weather-analyzer` binary.

use std::{io::Write, process::Command};

fn analyzer() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_weather-analyzer"));
    command.env_remove("RUST_LOG");
    command
}

fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn default_report_on_bundled_data() {
    let output = analyzer().output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Weather Data Analysis"));
    assert!(stdout.contains("Average Temperature (August 2023): 28.6"));
    assert!(stdout
        .contains("Hot Days (>30.0°C): [2023-08-01, 2023-08-02, 2023-08-08, 2023-08-09]"));
    assert!(stdout.contains("Rainy Days: 7"));
}

#[test]
fn report_on_file_with_custom_parameters() {
    let file = csv_file(
        "date,temperature,humidity,precipitation\n\
         2024-01-01,-3.0,80,0.0\n\
         2024-01-02,1.0,85,0.4\n\
         2024-02-01,5.0,60,0.0\n",
    );

    let output = analyzer()
        .arg(file.path())
        .args(["--month", "2024-01", "--threshold", "0"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Average Temperature (January 2024): -1.0"));
    assert!(stdout.contains("Hot Days (>0.0°C): [2024-01-02, 2024-02-01]"));
    assert!(stdout.contains("Rainy Days: 1"));
}

#[test]
fn json_report() {
    let output = analyzer()
        .args(["--month", "1990-01", "--format", "json", "--categories"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["average_temperature"].is_null());
    assert_eq!(json["rainy_days"], 7);
    assert_eq!(json["categories"][0]["date"], "2023-07-30");
    assert_eq!(json["categories"][0]["category"], "Warm");
}

#[test]
fn missing_file_fails_and_names_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    let output = analyzer().arg(&path).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.csv"));
}

#[test]
fn malformed_row_fails_without_partial_report() {
    let file = csv_file(
        "date,temperature,humidity,precipitation\n\
         2023-08-01,20.0,50,0.0\n\
         2023-08-02,20.0,50\n",
    );

    let output = analyzer().arg(file.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 3"));
}
