//! Config load error messages, save safety, and validation integration tests.

use assert_fs::prelude::*;
use playsync_core::{config, ConfigError, SyncConfig};
use predicates::prelude::predicate;
use rstest::rstest;
use std::fs;

fn valid() -> SyncConfig {
    SyncConfig::new(
        "/srv/playout",
        "/srv/player",
        vec!["playout_log_rolling.json".into(), "now_playing.json".into()],
        60,
    )
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn missing_default_config_mentions_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = config::resolve(None, Some(home.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::ConfigNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".playsync/config.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::resolve(None, Some(home.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn wrong_shape_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".playsync/config.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = config::resolve(None, Some(home.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn invalid_values_in_file_are_rejected_on_load() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".playsync/config.yaml")
        .write_str("source_dir: /a\nrepo_dir: /b\nfiles: []\n")
        .expect("write");

    let err = config::resolve(None, Some(home.path()), no_env).unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { field: "files", .. }),
        "got: {err}"
    );
}

// ---------------------------------------------------------------------------
// 2. Save
// ---------------------------------------------------------------------------

#[test]
fn save_creates_config_under_home() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &valid(), false).expect("save");
    home.child(".playsync/config.yaml")
        .assert(predicate::path::exists());
    home.child(".playsync/config.yaml")
        .assert(predicate::str::contains("playout_log_rolling.json"));
    home.child(".playsync/config.yaml.tmp")
        .assert(predicate::path::missing());
}

#[test]
fn save_rejects_invalid_config_and_writes_nothing() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut cfg = valid();
    cfg.interval_secs = 0;
    let err = config::save_at(home.path(), &cfg, false).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }), "got: {err}");
    home.child(".playsync").assert(predicate::path::missing());
}

#[test]
fn load_from_reads_without_env() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("custom.yaml");
    config::save_to(&path, &valid(), false).expect("save");
    let loaded = config::load_from(&path).expect("load");
    assert_eq!(loaded, valid());
    assert!(fs::metadata(&path).expect("meta").len() > 0);
}

// ---------------------------------------------------------------------------
// 3. Validation table
// ---------------------------------------------------------------------------

#[rstest]
#[case::no_files(|c: &mut SyncConfig| c.files.clear(), "files")]
#[case::blank_file(|c: &mut SyncConfig| c.files.push("  ".into()), "files")]
#[case::absolute_file(|c: &mut SyncConfig| c.files.push("/etc/passwd".into()), "files")]
#[case::parent_escape(|c: &mut SyncConfig| c.files.push("../secrets.json".into()), "files")]
#[case::dot_prefixed(|c: &mut SyncConfig| c.files.push("./now.json".into()), "files")]
#[case::duplicate(|c: &mut SyncConfig| c.files.push("now_playing.json".into()), "files")]
#[case::zero_interval(|c: &mut SyncConfig| c.interval_secs = 0, "interval_secs")]
#[case::blank_remote(|c: &mut SyncConfig| c.remote = Some(" ".into()), "remote")]
#[case::branch_without_remote(|c: &mut SyncConfig| c.branch = Some("main".into()), "branch")]
#[case::empty_source(|c: &mut SyncConfig| c.source_dir = "".into(), "source_dir")]
fn validation_rejects(#[case] mutate: fn(&mut SyncConfig), #[case] expected: &str) {
    let mut cfg = valid();
    mutate(&mut cfg);
    match cfg.validate() {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected invalid `{expected}`, got {other:?}"),
    }
}

#[test]
fn validation_accepts_nested_relative_names() {
    let mut cfg = valid();
    cfg.files.push("logs/playout.json".to_string());
    cfg.validate().expect("nested filename should be accepted");
}

#[test]
fn remote_and_branch_together_are_valid() {
    let mut cfg = valid();
    cfg.remote = Some("origin".into());
    cfg.branch = Some("main".into());
    cfg.validate().expect("valid");
}
