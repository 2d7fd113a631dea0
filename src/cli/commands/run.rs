//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command for the Matrix Gate CLI,
//! which executes the declared checks across the whole platform ×
//! toolchain matrix and gates the process exit code on the aggregate
//! verdict.
//!
//! 此模块实现了 Matrix Gate CLI 的 `run` 命令，
//! 在整个平台 × 工具链矩阵上执行声明的检查，
//! 并根据聚合结论决定进程退出码。

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::{fs, path::PathBuf, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config,
        execution::ExecutionContext,
        models::RunSummary,
        planner,
        scheduler::{self, SchedulerOptions},
    },
    infra::t,
    reporting::{console, json},
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `jobs` - Optional override of the maximum number of concurrent cells
/// * `config` - Path to the matrix declaration file
/// * `project_dir` - Directory external commands run in
/// * `json` - Optional path for the structured JSON report
///
/// # Returns
/// `Ok(())` iff every cell of the matrix passed; an error otherwise, which
/// the binary maps to a non-zero exit code.
pub async fn execute(
    jobs: Option<usize>,
    config: PathBuf,
    project_dir: PathBuf,
    json: Option<PathBuf>,
) -> Result<()> {
    let (matrix, config_path) = config::load_config(&config)?;
    let locale = matrix.language.clone();
    rust_i18n::set_locale(&locale);

    let project_root = fs::canonicalize(&project_dir)
        .with_context(|| t!("run.project_dir_not_found", locale = locale, path = project_dir.display()))?;

    println!(
        "{}",
        t!("run.loading_matrix", locale = locale, path = config_path.display())
    );
    println!(
        "{}",
        t!("run.project_root", locale = locale, path = project_root.display())
    );

    // Configuration errors abort here, before any cell is dispatched.
    // 配置错误在这里中止，早于任何单元被调度。
    let plan = planner::expand(&matrix)?;

    println!(
        "{}",
        t!(
            "run.matrix_size",
            locale = locale,
            cells = plan.cells.len(),
            platforms = matrix.platforms.len(),
            toolchains = matrix.toolchains.len()
        )
        .bold()
    );

    let cancel = setup_signal_handler(&locale);

    let ctx = ExecutionContext {
        working_dir: project_root,
        setup: matrix.setup.clone(),
        default_timeout: matrix.step_timeout_secs.map(Duration::from_secs),
    };
    let options = SchedulerOptions {
        max_concurrency: jobs.or(matrix.max_concurrency),
        retry_unavailable: matrix.retry_unavailable,
    };

    let started_at = Utc::now();
    let results = scheduler::run_matrix(plan, options, &ctx, cancel).await;
    let summary = RunSummary::from_results(&results, started_at, Utc::now());

    console::print_summary(&results, &summary, &locale);

    if let Some(report_path) = &json {
        println!(
            "\n{}",
            t!("run.writing_json", locale = locale, path = report_path.display())
        );
        if let Err(e) = json::write_report(&summary, &results, report_path) {
            eprintln!("{} {}", t!("report.json_failed", locale = locale).red(), e);
        }
    }

    if summary.is_passed() {
        println!(
            "\n{}",
            t!("run.matrix_passed", locale = locale).green().bold()
        );
        Ok(())
    } else {
        let failures: Vec<_> = results
            .iter()
            .filter(|r| r.is_failure() || r.is_unavailable())
            .collect();
        console::print_failure_details(&failures, &locale);
        println!("\n{}", t!("run.matrix_failed", locale = locale).red().bold());
        anyhow::bail!("The verification matrix did not pass.");
    }
}

/// Sets up a signal handler for graceful shutdown.
/// A Ctrl-C cancels every in-flight cell and marks the pending ones
/// `Cancelled`; the run then reports and exits non-zero.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
