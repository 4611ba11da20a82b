//! E2E CLI tests covering:
//! - `listdiff run` with seeds, multiple runs and both candidates
//! - seeds at the top of the `u64` range
//! - the abort notice on interrupt
//! - config file loading and validation errors
//! - `listdiff operations` and `listdiff completions`
//!
//! Each test runs the `listdiff` binary as a subprocess with an isolated
//! config home so a developer's own config never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn listdiff_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("listdiff"));
    cmd.env("LISTDIFF_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", home);
    cmd.env("HOME", home);
    cmd.env_remove("FORMAT");
    cmd
}

fn run_json(home: &Path, args: &[&str]) -> Value {
    let output = listdiff_cmd(home)
        .arg("run")
        .args(args)
        .arg("--json")
        .output()
        .expect("run should not crash");
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("run --json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn single_seed_passes() {
    let home = TempDir::new().expect("temp dir");
    let json = run_json(home.path(), &["--seed", "42", "--max-initial-len", "100"]);

    assert_eq!(json["all_passed"], true);
    assert_eq!(json["seeds_run"], 1);
    assert_eq!(json["seeds_failed"], 0);
    assert_eq!(json["first_seed"], 42);
    assert_eq!(json["candidate"], "array");
    assert!(json["first_failure"].is_null());
}

#[test]
fn runs_consecutive_seeds() {
    let home = TempDir::new().expect("temp dir");
    let json = run_json(
        home.path(),
        &["--seed", "7", "--runs", "3", "--max-initial-len", "50"],
    );

    assert_eq!(json["seeds_run"], 3);
    assert_eq!(json["seeds_passed"], 3);
}

#[test]
fn max_seed_runs() {
    let home = TempDir::new().expect("temp dir");
    let json = run_json(
        home.path(),
        &["--seed", "18446744073709551615", "--max-initial-len", "50"],
    );

    assert_eq!(json["seeds_run"], 1);
    assert_eq!(json["seeds_requested"], 1);
    assert_eq!(json["all_passed"], true);
    assert_eq!(json["first_seed"], u64::MAX);
}

#[test]
fn seed_range_is_clamped_at_max() {
    let home = TempDir::new().expect("temp dir");
    let json = run_json(
        home.path(),
        &[
            "--seed",
            "18446744073709551614",
            "--runs",
            "3",
            "--max-initial-len",
            "50",
        ],
    );

    assert_eq!(json["seeds_requested"], 3);
    assert_eq!(json["seeds_run"], 2);
    assert_eq!(json["seeds_passed"], 2);
}

#[cfg(unix)]
#[test]
fn interrupt_prints_abort_notice() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::Stdio;

    let home = TempDir::new().expect("temp dir");
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin!("listdiff"))
        .env("LISTDIFF_LOG", "error")
        .env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("FORMAT")
        .args(["run", "--seed", "7", "--runs", "100000", "--keep-going"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn listdiff");

    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));
    let mut first = String::new();
    stdout.read_line(&mut first).expect("read first line");
    assert_eq!(first.trim_end(), "Seed: 7");

    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(status.success());

    // Keep draining stdout so the child never blocks on a full pipe.
    let drain = std::thread::spawn(move || std::io::copy(&mut stdout, &mut std::io::sink()));
    let mut stderr = String::new();
    child
        .stderr
        .take()
        .expect("stderr")
        .read_to_string(&mut stderr)
        .expect("read stderr");
    let exit = child.wait().expect("wait");
    let _ = drain.join();

    assert!(!exit.success());
    assert_eq!(exit.code(), Some(130));
    assert!(stderr.contains("Aborting test "), "stderr: {stderr}");
}

#[test]
fn vec_candidate_passes() {
    let home = TempDir::new().expect("temp dir");
    let json = run_json(
        home.path(),
        &["--seed", "3", "--candidate", "vec", "--max-initial-len", "50"],
    );

    assert_eq!(json["candidate"], "vec");
    assert_eq!(json["all_passed"], true);
}

#[test]
fn user_config_sets_runs() {
    let home = TempDir::new().expect("temp dir");
    let dir = home.path().join("listdiff");
    std::fs::create_dir_all(&dir).expect("config dir");
    std::fs::write(dir.join("config.toml"), "runs = 2\nmax_initial_len = 30\n")
        .expect("write config");

    let json = run_json(home.path(), &["--seed", "1"]);
    assert_eq!(json["seeds_run"], 2);
}

#[test]
fn explicit_config_flag() {
    let home = TempDir::new().expect("temp dir");
    let path = home.path().join("harness.toml");
    std::fs::write(&path, "runs = 4\nmax_initial_len = 20\n").expect("write config");

    let json = run_json(
        home.path(),
        &["--seed", "9", "--config", path.to_str().expect("utf8 path")],
    );
    assert_eq!(json["seeds_run"], 4);
}

#[test]
fn invalid_config_is_rejected() {
    let home = TempDir::new().expect("temp dir");
    let path = home.path().join("bad.toml");
    std::fs::write(&path, "max_initial_len = 0\n").expect("write config");

    listdiff_cmd(home.path())
        .args(["run", "--seed", "1", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_initial_len"));
}

#[test]
fn text_output_shows_progress() {
    let home = TempDir::new().expect("temp dir");
    listdiff_cmd(home.path())
        .args(["run", "--seed", "5", "--max-initial-len", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed: 5"))
        .stdout(predicate::str::contains("size()..ok"))
        .stdout(predicate::str::contains("all_passed=true"));
}

#[test]
fn quiet_drops_progress() {
    let home = TempDir::new().expect("temp dir");
    listdiff_cmd(home.path())
        .args(["run", "--seed", "5", "--max-initial-len", "40", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("size()..").not())
        .stdout(predicate::str::contains("results first_seed=5"));
}

// ---------------------------------------------------------------------------
// operations / completions
// ---------------------------------------------------------------------------

#[test]
fn operations_json_lists_registry() {
    let home = TempDir::new().expect("temp dir");
    let output = listdiff_cmd(home.path())
        .args(["operations", "--json"])
        .output()
        .expect("operations should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 28);
    assert_eq!(rows[0]["name"], "size");
    assert_eq!(rows[0]["signature"], "size()");
}

#[test]
fn completions_bash() {
    let home = TempDir::new().expect("temp dir");
    listdiff_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("listdiff"));
}
