use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const PLAYSYNC_VARS: &[&str] = &[
    "PLAYSYNC_CONFIG",
    "PLAYSYNC_SOURCE_DIR",
    "PLAYSYNC_REPO_DIR",
    "PLAYSYNC_FILES",
    "PLAYSYNC_INTERVAL_SECS",
    "PLAYSYNC_REMOTE",
    "PLAYSYNC_BRANCH",
    "PLAYSYNC_LOG_FORMAT",
];

fn playsync_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("playsync"));
    cmd.env("HOME", home).env("USERPROFILE", home).env("NO_COLOR", "1");
    for var in PLAYSYNC_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("spawn git");
    assert!(status.success(), "`git {args:?}` failed");
}

fn init_config(home: &Path, source: &Path, repo: &Path, files: &[&str]) {
    let mut cmd = playsync_cmd(home);
    cmd.args(["config", "init", "--source"])
        .arg(source)
        .arg("--repo")
        .arg(repo);
    for file in files {
        cmd.args(["--file", file]);
    }
    cmd.assert().success().stdout(contains("config.yaml"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_init_then_show_round_trips_through_yaml() {
    let home = TempDir::new().expect("home");
    let source = TempDir::new().expect("source");
    let repo = TempDir::new().expect("repo");

    init_config(
        home.path(),
        source.path(),
        repo.path(),
        &["playout_log_rolling.json", "now_playing.json"],
    );
    assert!(home.path().join(".playsync/config.yaml").is_file());

    playsync_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("playout_log_rolling.json"))
        .stdout(contains("now_playing.json"))
        .stdout(contains("interval_secs: 60"))
        .stdout(contains("message_prefix: Auto-update files"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let home = TempDir::new().expect("home");
    let source = TempDir::new().expect("source");
    let repo = TempDir::new().expect("repo");
    init_config(home.path(), source.path(), repo.path(), &["now.json"]);

    playsync_cmd(home.path())
        .args(["config", "init", "--file", "other.json", "--source"])
        .arg(source.path())
        .arg("--repo")
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(contains("already exists"));

    playsync_cmd(home.path())
        .args(["config", "init", "--force", "--file", "other.json", "--source"])
        .arg(source.path())
        .arg("--repo")
        .arg(repo.path())
        .assert()
        .success();

    let written = fs::read_to_string(home.path().join(".playsync/config.yaml")).expect("read");
    assert!(written.contains("other.json"));
    assert!(!written.contains("now.json"));
}

#[test]
fn config_init_rejects_escaping_filename() {
    let home = TempDir::new().expect("home");

    playsync_cmd(home.path())
        .args([
            "config", "init", "--source", "/srv/a", "--repo", "/srv/b", "--file", "../now.json",
        ])
        .assert()
        .failure()
        .stderr(contains("files"));

    assert!(!home.path().join(".playsync/config.yaml").exists());
}

#[test]
fn config_path_points_into_home() {
    let home = TempDir::new().expect("home");
    let expected = home.path().join(".playsync").join("config.yaml");

    playsync_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(contains(expected.display().to_string()));
}

#[test]
fn bad_interval_override_is_reported() {
    let home = TempDir::new().expect("home");
    init_config(home.path(), Path::new("/srv/a"), Path::new("/srv/b"), &["now.json"]);

    playsync_cmd(home.path())
        .env("PLAYSYNC_INTERVAL_SECS", "soon")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(contains("PLAYSYNC_INTERVAL_SECS"));
}

#[test]
fn environment_alone_is_enough_config() {
    let home = TempDir::new().expect("home");

    playsync_cmd(home.path())
        .env("PLAYSYNC_SOURCE_DIR", "/srv/a")
        .env("PLAYSYNC_REPO_DIR", "/srv/b")
        .env("PLAYSYNC_FILES", "a.json, b.json")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("a.json"))
        .stdout(contains("b.json"));
}

// ---------------------------------------------------------------------------
// once / run
// ---------------------------------------------------------------------------

#[test]
fn once_without_config_fails() {
    let home = TempDir::new().expect("home");

    playsync_cmd(home.path())
        .arg("once")
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

#[test]
fn once_with_missing_source_file_logs_and_exits_zero() {
    let home = TempDir::new().expect("home");
    let source = TempDir::new().expect("source");
    let repo = TempDir::new().expect("repo");
    init_config(home.path(), source.path(), repo.path(), &["missing.json"]);

    playsync_cmd(home.path())
        .args(["once", "--json"])
        .assert()
        .success()
        .stdout(contains(r#""status": "failed""#))
        .stderr(contains("sync attempt failed"));
}

#[test]
fn once_publishes_and_reports_push_failure_without_remote() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let home = TempDir::new().expect("home");
    let source = TempDir::new().expect("source");
    let repo = TempDir::new().expect("repo");

    git(repo.path(), &["init", "-q"]);
    git(repo.path(), &["config", "user.email", "playsync@example.com"]);
    git(repo.path(), &["config", "user.name", "playsync"]);
    git(repo.path(), &["config", "commit.gpgsign", "false"]);
    fs::write(source.path().join("a.json"), r#"{"x":1}"#).expect("write a");
    fs::write(source.path().join("b.json"), r#"{"y":2}"#).expect("write b");
    init_config(home.path(), source.path(), repo.path(), &["a.json", "b.json"]);

    let output = playsync_cmd(home.path())
        .args(["once", "--json"])
        .output()
        .expect("run playsync once");
    assert!(
        output.status.success(),
        "once must exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["changed"], serde_json::json!(["a.json", "b.json"]));
    assert_eq!(report["outcome"]["status"], "published_with_errors");
    assert_eq!(report["outcome"]["failed_steps"], serde_json::json!(["git push"]));
    assert!(repo.path().join("a.json").is_file());
}

#[test]
fn run_rejects_zero_interval_before_starting() {
    let home = TempDir::new().expect("home");
    init_config(home.path(), Path::new("/srv/a"), Path::new("/srv/b"), &["now.json"]);

    playsync_cmd(home.path())
        .args(["run", "--interval", "0"])
        .assert()
        .failure()
        .stderr(contains("interval_secs"));
}
