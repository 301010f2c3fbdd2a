//! Unit tests for configuration and graceful degradation
//!
//! Covers:
//! - Root folder priority order (CLI > env > TOML > current directory)
//! - Missing/partial TOML files fall back to defaults
//! - Explicit config paths must exist
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MCG_ROOT_FOLDER are marked with #[serial].

use mcg_common::config::{resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_current_dir() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, &TomlConfig::default());
    assert_eq!(root, PathBuf::from("."));
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mcg-test-env-folder");

    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, &TomlConfig::default());
    assert_eq!(root, PathBuf::from("/tmp/mcg-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_beats_env_and_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..TomlConfig::default()
    };

    let root = resolve_root_folder(Some(Path::new("/tmp/from-cli")), ROOT_FOLDER_ENV, &config);
    assert_eq!(root, PathBuf::from("/tmp/from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..TomlConfig::default()
    };

    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, &config);
    assert_eq!(root, PathBuf::from("/tmp/from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..TomlConfig::default()
    };

    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, &config);
    assert_eq!(root, PathBuf::from("/tmp/from-toml"));
}

#[test]
fn test_load_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/mcgalaxy"
database = "data/server.db"

[logging]
level = "debug"

[upgrade]
default_assigner = "(console)"
skip_steps = ["upgrade_bots"]
"#,
    )
    .unwrap();

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/mcgalaxy")));
    assert_eq!(config.database, Some(PathBuf::from("data/server.db")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.upgrade.default_assigner, "(console)");
    assert_eq!(config.upgrade.skip_steps, vec!["upgrade_bots".to_string()]);
}

#[test]
fn test_load_missing_explicit_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");
    assert!(TomlConfig::load(Some(&path)).is_err());
}

#[test]
fn test_load_malformed_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = [unterminated").unwrap();

    assert!(matches!(
        TomlConfig::load(Some(&path)),
        Err(mcg_common::Error::Toml(_))
    ));
}
