//! Configuration loading tests

use upspin_access::config::{LogFormat, load_config, load_config_from_str};

const FULL_CONFIG: &str = r#"
[store]
root = "/srv/upspin"
max_retries = 7

[logging]
level = "info"
format = "json"
"#;

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    assert_eq!(config.store.root, "/srv/upspin");
    assert_eq!(config.store.max_retries, 7);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_defaults() {
    let config = load_config_from_str("").unwrap();

    assert_eq!(config.store.root, ".");
    assert_eq!(config.store.max_retries, 3);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_unknown_log_format_rejected() {
    let config_str = r#"
[logging]
format = "xml"
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
#[serial_test::serial]
fn test_env_overrides_file() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("upspin-access.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::remove_var("UPSPIN_ROOT");
        env::set_var("UPSPIN_ACCESS__STORE__MAX_RETRIES", "1");
        env::set_var("UPSPIN_ACCESS__LOGGING__LEVEL", "debug");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(config.store.root, "/srv/upspin");
    assert_eq!(config.store.max_retries, 1);
    assert_eq!(config.logging.level, "debug");

    unsafe {
        env::remove_var("UPSPIN_ACCESS__STORE__MAX_RETRIES");
        env::remove_var("UPSPIN_ACCESS__LOGGING__LEVEL");
    }
}

#[test]
#[serial_test::serial]
fn test_upspin_root_takes_precedence() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("upspin-access.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("UPSPIN_ACCESS__STORE__ROOT", "/from/prefixed/env");
        env::set_var("UPSPIN_ROOT", "/from/upspin/root");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.store.root, "/from/upspin/root");

    unsafe {
        env::remove_var("UPSPIN_ACCESS__STORE__ROOT");
        env::remove_var("UPSPIN_ROOT");
    }
}
