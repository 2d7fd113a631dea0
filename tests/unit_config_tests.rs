//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module contains unit tests for parsing the matrix declaration:
//! full and minimal documents, defaults and malformed input.
//!
//! 此模块包含解析矩阵声明的单元测试：
//! 完整和最小的文档、默认值以及格式错误的输入。

use matrix_gate::core::config::{self, MatrixConfig};
use std::fs;
use tempfile::TempDir;

const FULL_DECLARATION: &str = r#"
language = "zh-CN"
platforms = ["ubuntu", "windows", "macos"]
toolchains = ["stable", "beta", "nightly"]
setup = "rustup toolchain install {toolchain}"
max_concurrency = 4
retry_unavailable = true
step_timeout_secs = 600

[[steps]]
name = "test"
command = "cargo +{toolchain} test"

[[steps]]
name = "format"
command = "cargo +{toolchain} fmt --all -- --check"
timeout_secs = 60

[[steps]]
name = "check"
command = "cargo +{toolchain} clippy --all-targets -- -D warnings"
"#;

const MINIMAL_DECLARATION: &str = r#"
platforms = ["local"]
toolchains = ["stable"]

[[steps]]
name = "test"
command = "cargo test"
"#;

#[test]
fn parses_a_full_declaration() {
    let config: MatrixConfig = toml::from_str(FULL_DECLARATION).unwrap();

    assert_eq!(config.language, "zh-CN");
    assert_eq!(config.platforms, vec!["ubuntu", "windows", "macos"]);
    assert_eq!(config.toolchains, vec!["stable", "beta", "nightly"]);
    assert_eq!(
        config.setup.as_deref(),
        Some("rustup toolchain install {toolchain}")
    );
    assert_eq!(config.max_concurrency, Some(4));
    assert!(config.retry_unavailable);
    assert_eq!(config.step_timeout_secs, Some(600));

    let names: Vec<&str> = config.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["test", "format", "check"]);

    // Only the format step declares its own timeout.
    assert_eq!(config.steps[0].timeout_secs, None);
    assert_eq!(config.steps[1].timeout_secs, Some(60));
}

#[test]
fn minimal_declaration_gets_the_defaults() {
    let config: MatrixConfig = toml::from_str(MINIMAL_DECLARATION).unwrap();

    assert_eq!(config.language, "en");
    assert_eq!(config.setup, None);
    assert_eq!(config.max_concurrency, None);
    assert!(!config.retry_unavailable);
    assert_eq!(config.step_timeout_secs, None);
}

#[test]
fn malformed_toml_is_rejected() {
    let broken = r#"
platforms = ["local"
toolchains = ["stable"]
"#;

    assert!(toml::from_str::<MatrixConfig>(broken).is_err());
}

#[test]
fn missing_required_keys_are_rejected() {
    let incomplete = r#"
platforms = ["local"]
"#;

    assert!(toml::from_str::<MatrixConfig>(incomplete).is_err());
}

#[test]
fn steps_require_a_name_and_a_command() {
    let missing_command = r#"
platforms = ["local"]
toolchains = ["stable"]

[[steps]]
name = "test"
"#;

    assert!(toml::from_str::<MatrixConfig>(missing_command).is_err());
}

#[test]
fn declarations_round_trip_through_serialization() {
    let config: MatrixConfig = toml::from_str(FULL_DECLARATION).unwrap();

    let rendered = toml::to_string_pretty(&config).unwrap();
    let reparsed: MatrixConfig = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed.platforms, config.platforms);
    assert_eq!(reparsed.toolchains, config.toolchains);
    assert_eq!(reparsed.steps, config.steps);
    assert_eq!(reparsed.max_concurrency, config.max_concurrency);
}

#[test]
fn load_config_reads_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Matrix.toml");
    fs::write(&path, MINIMAL_DECLARATION).unwrap();

    let (config, canonical) = config::load_config(&path).unwrap();

    assert_eq!(config.platforms, vec!["local"]);
    assert!(canonical.is_absolute());
}

#[test]
fn load_config_fails_for_a_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    assert!(config::load_config(&path).is_err());
}
