//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command for the Matrix Gate CLI,
//! which scaffolds a new matrix declaration file, either through an
//! interactive wizard or from a commented default template.
//!
//! 此模块实现了 Matrix Gate CLI 的 `init` 命令，
//! 通过交互式向导或带注释的默认模板生成新的矩阵声明文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::{fs, path::PathBuf};

use crate::core::config::{MatrixConfig, StepSpec};
use crate::infra::t;

const DEFAULT_CONFIG: &str = r#"# Matrix declaration / 矩阵声明
# Documentation: https://github.com/ShaoG-R/matrix-gate

# Language for runner messages / 运行器消息的语言
language = "en"

# The two matrix axes / 矩阵的两个轴
platforms = ["ubuntu", "windows", "macos"]
toolchains = ["stable", "beta", "nightly"]

# Optional provisioning command, run once per cell before its first step.
# A failing setup marks the cell unavailable instead of failed.
# 可选的环境准备命令，在每个单元的第一个步骤之前运行一次。
# 准备失败会将单元标记为不可用而不是失败。
# setup = "rustup toolchain install {toolchain}"

# Maximum number of cells running at once; defaults to the cell count.
# 同时运行的单元数量上限；默认为单元总数。
# max_concurrency = 4

# Re-dispatch a cell once when its environment could not be provisioned.
# 当单元环境无法准备时重新调度一次。
# retry_unavailable = true

# Run-level default timeout per step, in seconds.
# 每个步骤的运行级默认超时时间（秒）。
# step_timeout_secs = 600

# The checks every cell runs, strictly in this order.
# 每个单元运行的检查，严格按此顺序。
[[steps]]
name = "test"
command = "cargo +{toolchain} test"

[[steps]]
name = "format"
command = "cargo +{toolchain} fmt --all -- --check"

[[steps]]
name = "check"
command = "cargo +{toolchain} clippy --all-targets -- -D warnings"
"#;

/// Executes the init command with the provided arguments.
///
/// # Arguments
/// * `output` - Path for the new declaration file
/// * `force` - Whether to overwrite an existing file
/// * `non_interactive` - Write the default template without the wizard
/// * `lang` - Language for the wizard prompts
pub fn execute(output: PathBuf, force: bool, non_interactive: bool, lang: &str) -> Result<()> {
    rust_i18n::set_locale(lang);

    // Check if file already exists
    if output.exists() && !force {
        println!("{}", t!("init.file_exists", path = output.display()).red());
        println!("{}", t!("init.use_force").yellow());
        return Ok(());
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("{}", t!("init.create_parent_dir_failed", path = parent.display()))
            })?;
        }
    }

    let content = if non_interactive {
        DEFAULT_CONFIG.to_string()
    } else {
        let config = run_wizard(lang)?;
        toml::to_string_pretty(&config).context("Failed to serialize matrix declaration")?
    };

    fs::write(&output, content)
        .with_context(|| format!("{}", t!("init.write_failed", path = output.display())))?;

    println!("{}", t!("init.success", path = output.display()).green());
    println!("{}", t!("init.next_steps"));

    Ok(())
}

/// Asks for the matrix axes and checks interactively and assembles the
/// declaration. Defaults mirror the common OS x Rust-channel CI matrix.
/// 交互式地询问矩阵的轴和检查并组装声明。
/// 默认值对应常见的操作系统 x Rust 渠道 CI 矩阵。
fn run_wizard(lang: &str) -> Result<MatrixConfig> {
    let theme = ColorfulTheme::default();
    println!("{}", t!("init.wizard_intro").bold());

    let platforms: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_platforms").to_string())
        .default("ubuntu,windows,macos".to_string())
        .interact_text()?;

    let toolchains: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_toolchains").to_string())
        .default("stable,beta,nightly".to_string())
        .interact_text()?;

    let test_command: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_test_command").to_string())
        .default("cargo +{toolchain} test".to_string())
        .interact_text()?;

    let mut steps = vec![StepSpec {
        name: "test".to_string(),
        command: test_command,
        timeout_secs: None,
    }];

    if Confirm::with_theme(&theme)
        .with_prompt(t!("init.prompt_add_format").to_string())
        .default(true)
        .interact()?
    {
        steps.push(StepSpec {
            name: "format".to_string(),
            command: "cargo +{toolchain} fmt --all -- --check".to_string(),
            timeout_secs: None,
        });
    }

    if Confirm::with_theme(&theme)
        .with_prompt(t!("init.prompt_add_check").to_string())
        .default(true)
        .interact()?
    {
        steps.push(StepSpec {
            name: "check".to_string(),
            command: "cargo +{toolchain} clippy --all-targets -- -D warnings".to_string(),
            timeout_secs: None,
        });
    }

    let setup: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_setup").to_string())
        .allow_empty(true)
        .default(String::new())
        .interact_text()?;

    Ok(MatrixConfig {
        language: lang.to_string(),
        platforms: split_list(&platforms),
        toolchains: split_list(&toolchains),
        steps,
        setup: if setup.trim().is_empty() {
            None
        } else {
            Some(setup)
        },
        max_concurrency: None,
        retry_unavailable: false,
        step_timeout_secs: None,
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
