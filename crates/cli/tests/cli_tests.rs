//! CLI integration tests

use predictor_lib::{
    knn::{KnnRegressor, Weighting},
    loader::ModelArtifact,
};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Write a small fitted artifact and return its path
fn write_fixture_model(dir: &TempDir) -> PathBuf {
    let artifact = ModelArtifact {
        version: "v1.0.0".to_string(),
        created_at: 1_700_000_000,
        model: KnnRegressor {
            reference_points: vec![
                vec![2013.0, 1.0, 1.0, 25.0, 103665.0],
                vec![2013.0, 1.0, 2.0, 25.0, 103665.0],
                vec![2013.0, 2.0, 1.0, 25.0, 103665.0],
            ],
            targets: vec![10.0, 12.0, 20.0],
            k: 2,
            weighting: Weighting::Uniform,
        },
    };
    let path = dir.path().join("model.json");
    std::fs::write(&path, artifact.to_bytes(1).unwrap()).unwrap();
    path
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "demand-cli", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Demand Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(
        stdout.contains("interactive"),
        "Should show interactive command"
    );
    assert!(stdout.contains("inspect"), "Should show inspect command");
    assert!(stdout.contains("--model"), "Should show model option");
    assert!(stdout.contains("DEMAND_MODEL"), "Should show env var");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("demand"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = run_cli(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("YEAR"), "Should show year argument");
    assert!(stdout.contains("STORE_ID"), "Should show store-id argument");
    assert!(stdout.contains("ITEM_ID"), "Should show item-id argument");
}

/// Test format option
#[test]
fn test_format_option() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
}

/// One-shot prediction against a fixture model
#[test]
fn test_predict_with_fixture_model() {
    let dir = TempDir::new().unwrap();
    let model = write_fixture_model(&dir);

    let output = run_cli(&[
        "--model",
        model.to_str().unwrap(),
        "--format",
        "json",
        "predict",
        "2013",
        "1",
        "1",
        "25",
        "103665",
    ]);

    assert!(output.status.success(), "Predict should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["prediction"].is_number());
    assert_eq!(parsed["model_version"], "v1.0.0");
}

/// Bare invocation evaluates the default query
#[test]
fn test_bare_invocation_uses_default_query() {
    let dir = TempDir::new().unwrap();
    let model = write_fixture_model(&dir);

    let output = run_cli(&["--model", model.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success(), "Bare invocation should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["query"]["year"], 2013);
    assert_eq!(parsed["query"]["store_id"], 25);
    assert_eq!(parsed["query"]["item_id"], 103665);
    assert!(parsed["prediction"].is_number());
}

/// Repeated invocations return the same prediction
#[test]
fn test_prediction_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    let model = write_fixture_model(&dir);
    let args = [
        "--model",
        model.to_str().unwrap(),
        "--format",
        "json",
        "predict",
        "2013",
        "1",
        "1",
        "25",
        "103665",
    ];

    let first = run_cli(&args);
    let second = run_cli(&args);
    assert!(first.status.success() && second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

/// Out-of-range field fails with a diagnostic and non-zero exit
#[test]
fn test_predict_out_of_range_month() {
    let dir = TempDir::new().unwrap();
    let model = write_fixture_model(&dir);

    let output = run_cli(&[
        "--model",
        model.to_str().unwrap(),
        "predict",
        "2013",
        "13",
        "1",
        "25",
        "103665",
    ]);

    assert!(!output.status.success(), "Out-of-range month should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("month"), "Should name the bad field");
}

/// Missing model artifact fails with a diagnostic and non-zero exit
#[test]
fn test_missing_model_fails() {
    let output = run_cli(&["--model", "/nonexistent/model.json", "predict", "2013", "1", "1", "25", "103665"]);

    assert!(!output.status.success(), "Missing model should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found") || stderr.contains("failed to load"),
        "Should show load error"
    );
}

/// Inspect prints artifact metadata
#[test]
fn test_inspect_fixture_model() {
    let dir = TempDir::new().unwrap();
    let model = write_fixture_model(&dir);

    let output = run_cli(&[
        "--model",
        model.to_str().unwrap(),
        "--format",
        "json",
        "inspect",
    ]);

    assert!(output.status.success(), "Inspect should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["version"], "v1.0.0");
    assert_eq!(parsed["samples"], 3);
    assert_eq!(parsed["features"], 5);
    assert_eq!(parsed["k"], 2);
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = run_cli(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = run_cli(&["predict", "2013", "1"]);

    assert!(!output.status.success(), "Missing arguments should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
