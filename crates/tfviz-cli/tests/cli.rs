//! CLI command integration tests.
//! Each test points TFVIZ_CONFIG at a temp file or clears it for isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tfviz_cmd() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tfviz").unwrap();
    cmd.env_remove("TFVIZ_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("tfviz.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn step_snapshot(args: &[&str]) -> serde_json::Value {
    let output = tfviz_cmd().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn config_prints_defaults() {
    tfviz_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[simulation]"))
        .stdout(predicate::str::contains("warmup_ticks = 60"))
        .stdout(predicate::str::contains("[reading]"))
        .stdout(predicate::str::contains("generation_dwell = 100"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation]\nlayers = 2\n");
    tfviz_cmd()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("layers = 2"))
        .stdout(predicate::str::contains("heads_per_layer = 4"));
}

#[test]
fn config_from_env_var() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation]\nheads_per_layer = 7\n");
    tfviz_cmd()
        .env("TFVIZ_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("heads_per_layer = 7"));
}

#[test]
fn step_sixty_ticks_processes_every_layer() {
    let snap = step_snapshot(&["step", "--ticks", "60", "--seed", "1"]);
    assert_eq!(snap["version"], "1");
    assert_eq!(snap["tick"], 60);
    let layers = snap["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 3);
    assert!(layers.iter().all(|l| l["processed"] == true));
}

#[test]
fn step_fifty_nine_ticks_still_warming() {
    let snap = step_snapshot(&["step", "--ticks", "59", "--seed", "1"]);
    let layers = snap["layers"].as_array().unwrap();
    assert!(layers.iter().all(|l| l["processed"] == false));
    assert!(layers.iter().all(|l| l["pulses"].as_array().unwrap().is_empty()));
}

#[test]
fn step_matrices_are_row_stochastic() {
    let snap = step_snapshot(&["step", "--ticks", "300", "--seed", "9"]);
    for layer in snap["layers"].as_array().unwrap() {
        for head in layer["heads"].as_array().unwrap() {
            for row in head["matrix"].as_array().unwrap() {
                let sum: f64 = row.as_array().unwrap().iter().map(|c| c.as_f64().unwrap()).sum();
                assert!((sum - 1.0).abs() < 1e-6, "row sums to {sum}");
            }
        }
    }
}

#[test]
fn same_seed_same_snapshot() {
    let a = step_snapshot(&["step", "--ticks", "120", "--seed", "5"]);
    let b = step_snapshot(&["step", "--ticks", "120", "--seed", "5"]);
    assert_eq!(a, b);
}

#[test]
fn step_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("snap.json");
    tfviz_cmd()
        .args(["step", "--ticks", "10", "--seed", "2", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote snapshot at tick 10"));
    let content = std::fs::read_to_string(&out).unwrap();
    let snap = tfviz_core::import_json(&content).unwrap();
    assert_eq!(snap.tick, 10);
}

#[test]
fn zero_layers_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation]\nlayers = 0\n");
    tfviz_cmd()
        .args(["step", "--ticks", "1", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build simulation"))
        .stderr(predicate::str::contains("layer count must be at least 1"));
}

#[test]
fn empty_tokens_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation]\ntokens = []\n");
    tfviz_cmd()
        .args(["step", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("token label list is empty"));
}

#[test]
fn malformed_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation\nlayers = ");
    tfviz_cmd()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn missing_config_file_rejected() {
    let dir = TempDir::new().unwrap();
    tfviz_cmd()
        .args(["config", "--config"])
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn read_demo_emits_vocabulary() {
    tfviz_cmd()
        .args(["read", "--ticks", "1600", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tick 600: generation started"))
        .stdout(predicate::str::contains("tick 700: emitted 'a'"))
        .stdout(predicate::str::contains(
            "tick 1600: sentence complete: a smart computer learns to write text using attention .",
        ))
        .stdout(predicate::str::contains("done. tick=1600, phase=reading"));
}

#[test]
fn run_with_tick_budget_finishes() {
    tfviz_cmd()
        .args(["run", "--ticks", "30", "--rate", "1000", "--report-every", "10", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tick 10: processed 0/3 layers"))
        .stdout(predicate::str::contains("tick 30:"))
        .stdout(predicate::str::contains("done. ticks=30"));
}

#[test]
fn run_rejects_zero_rate() {
    tfviz_cmd()
        .args(["run", "--ticks", "1", "--rate", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tick_rate_hz must be positive"));
}

#[test]
fn run_rejects_rate_above_ceiling() {
    tfviz_cmd()
        .args(["run", "--ticks", "2", "--rate", "1e10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build simulation"))
        .stderr(predicate::str::contains("tick_rate_hz must be at most"));
}

#[test]
fn run_json_lines_carry_version() {
    let output = tfviz_cmd()
        .args(["run", "--ticks", "4", "--rate", "1000", "--report-every", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.lines().count(), 2);
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["version"], "1");
    }
}

#[test]
fn seed_beyond_toml_range_rejected() {
    tfviz_cmd()
        .args(["config", "--seed", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn largest_toml_seed_prints() {
    tfviz_cmd()
        .args(["config", "--seed", "9223372036854775807"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed = 9223372036854775807"));
}
