//! End-to-end runs of the `deepmerge` binary

use deepmerge_core::{Type, Value};
use deepmerge_test_fixtures::{layered_expected, FixtureType, TestFixtures};
use pretty_assertions::assert_eq;
use std::fs;
use std::process::{Command, Output};

fn deepmerge(args: &[&str], files: &[std::path::PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deepmerge"))
        .args(args)
        .args(files)
        .env_remove("RUST_LOG")
        .env_remove("DEEPMERGE_CONFIG")
        .env_remove("DEEPMERGE_LOG_FORMAT")
        .output()
        .expect("failed to run deepmerge")
}

#[test]
fn test_merge_layered_config() {
    let mut fixtures = TestFixtures::new();
    let files = fixtures.setup(FixtureType::LayeredConfig);

    let output = deepmerge(&["call"], &files);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let merged: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(merged, layered_expected());
}

#[test]
fn test_typed_unknowns() {
    let mut fixtures = TestFixtures::new();
    let files = fixtures.setup(FixtureType::TypedUnknowns);

    let output = deepmerge(&["call", "--typed", "--output", "typed"], &files);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let merged = Value::from_typed_json(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(
        merged,
        Value::record([
            ("id", Value::unknown(Type::String)),
            ("nested", Value::dynamic()),
        ])
    );
}

#[test]
fn test_unknowns_have_no_plain_json() {
    let mut fixtures = TestFixtures::new();
    let files = fixtures.setup(FixtureType::TypedUnknowns);

    let output = deepmerge(&["call", "--typed"], &files);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("use --output typed"));
}

#[test]
fn test_no_arguments() {
    let output = deepmerge(&["call"], &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must pass at least one argument"));
}

#[test]
fn test_stdin_given_twice() {
    let output = deepmerge(&["call", "-", "-"], &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("can only be read once"));
}

#[test]
fn test_depth_limit_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let shallow = dir.path().join("shallow.json");
    let deep = dir.path().join("deep.json");
    fs::write(&shallow, r#"{"a": 1}"#).unwrap();
    fs::write(&deep, r#"{"a": {"b": {"c": 1}}}"#).unwrap();

    let config = dir.path().join("deepmerge.toml");
    fs::write(&config, "[server]\nmax_nesting_depth = 2\n").unwrap();

    let output = deepmerge(
        &["call", "--config", config.to_str().unwrap()],
        &[shallow, deep],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("deep.json"), "{}", stderr);
    assert!(stderr.contains("the limit is 2"), "{}", stderr);
}

#[test]
fn test_functions_lists_merge_objects() {
    let output = deepmerge(&["functions"], &[]);
    assert!(output.status.success());

    let signatures: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(signatures[0]["name"], "merge_objects");
}
