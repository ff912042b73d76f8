mod common;

use assert_cmd::Command;
use catalyst_wp::cli::{Action, Args};
use catalyst_wp::constants::MARKER_FILE;
use catalyst_wp::vvv::VvvConfig;
use clap::Parser;
use predicates::prelude::*;
use std::ffi::OsString;
use std::fs;
use tempfile::TempDir;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("catalyst-wp")];
    res.extend(args.iter().map(OsString::from));
    res
}

fn catalyst(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("catalyst-wp").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env("CATALYST_VAGRANT_DIR", temp_dir.path().join("vagrants"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_create_args() {
    let parsed = Args::try_parse_from(make_args(&["-c", "my-site"])).unwrap();
    assert_eq!(parsed.action(), Some(Action::Create("my-site".to_string())));
    assert!(!parsed.verbose);

    let parsed = Args::try_parse_from(make_args(&["--create", "my-site", "-v"])).unwrap();
    assert_eq!(parsed.create.as_deref(), Some("my-site"));
    assert!(parsed.verbose);
}

#[test]
fn test_delete_args() {
    let parsed = Args::try_parse_from(make_args(&["-D", "my-site"])).unwrap();
    assert_eq!(parsed.action(), Some(Action::Delete("my-site".to_string())));
}

#[test]
fn test_domain_args() {
    let parsed =
        Args::try_parse_from(make_args(&["-d", "www.my-site.test", "-p", "my-site"])).unwrap();
    assert_eq!(
        parsed.action(),
        Some(Action::AddDomain {
            host: "www.my-site.test".to_string(),
            project_name: Some("my-site".to_string()),
        })
    );

    let parsed = Args::try_parse_from(make_args(&["--domain_name", "www.my-site.test"])).unwrap();
    assert_eq!(
        parsed.action(),
        Some(Action::AddDomain { host: "www.my-site.test".to_string(), project_name: None })
    );
}

#[test]
fn test_generate_args() {
    let parsed = Args::try_parse_from(make_args(&["--generate", "CarModel"])).unwrap();
    assert_eq!(parsed.action(), Some(Action::Generate("CarModel".to_string())));
}

#[test]
fn test_missing_action() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
    assert!(Args::try_parse_from(make_args(&["-v"])).is_err());
}

#[test]
fn test_conflicting_actions() {
    assert!(Args::try_parse_from(make_args(&["-c", "one", "-D", "two"])).is_err());
    assert!(Args::try_parse_from(make_args(&["-g", "Car", "-d", "x.test"])).is_err());
}

#[test]
fn test_project_name_requires_domain() {
    assert!(Args::try_parse_from(make_args(&["-c", "one", "-p", "two"])).is_err());
}

#[test]
fn test_binary_without_action_fails() {
    let temp_dir = TempDir::new().unwrap();
    catalyst(&temp_dir).assert().code(1).stderr(predicate::str::contains("No command specified"));
}

#[test]
fn test_binary_rejects_invalid_project_name() {
    let temp_dir = TempDir::new().unwrap();
    catalyst(&temp_dir)
        .args(["-c", "My_App"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name 'My_App'"));
    assert!(!temp_dir.path().join("vagrants").exists());
}

#[test]
fn test_binary_create_ignores_malformed_marker() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(MARKER_FILE), "{ not json").unwrap();

    catalyst(&temp_dir)
        .args(["-c", "My_App"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name 'My_App'"));
}

#[test]
fn test_binary_generate_outside_project() {
    let temp_dir = TempDir::new().unwrap();
    catalyst(&temp_dir)
        .args(["-g", "CarModel"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Catalyst WP project directory"));
}

#[test]
fn test_binary_generate_inside_project() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(MARKER_FILE), r#"{"project_name": "my-site"}"#).unwrap();

    catalyst(&temp_dir)
        .args(["-g", "Car"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CarController.php"));

    let theme = temp_dir.path().join("wp-content/themes/atom-child");
    assert!(theme.join("models/Car.php").exists());
    assert!(theme.join("views/CarView.php").exists());
    assert!(theme.join("controllers/CarController.php").exists());
}

#[test]
fn test_binary_add_domain_from_marker() {
    let temp_dir = TempDir::new().unwrap();
    common::vvv_env(&temp_dir.path().join("vagrants"));
    fs::write(temp_dir.path().join(MARKER_FILE), r#"{"project_name": "wordpress-one"}"#)
        .unwrap();

    catalyst(&temp_dir).args(["-d", "alias.wordpress.test"]).assert().success();

    let config =
        VvvConfig::load(temp_dir.path().join("vagrants/config/config.yml")).unwrap();
    assert_eq!(
        config.sites["wordpress-one"].hosts.last().map(String::as_str),
        Some("alias.wordpress.test")
    );
}

#[test]
fn test_binary_add_domain_needs_project() {
    let temp_dir = TempDir::new().unwrap();
    catalyst(&temp_dir)
        .args(["-d", "alias.wordpress.test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("specify a project name with -p"));
}
