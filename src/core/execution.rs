//! # Cell Execution Engine Module / 单元执行引擎模块
//!
//! This module provides the core functionality for executing a single
//! matrix cell. It runs the optional provisioning command and then the
//! cell's steps strictly in declaration order, failing fast on the first
//! failing step while capturing every attempted step's output.
//!
//! 此模块为执行单个矩阵单元提供核心功能。
//! 它运行可选的环境准备命令，然后严格按声明顺序运行单元的步骤，
//! 在第一个失败的步骤处快速失败，同时捕获每个已尝试步骤的输出。

use colored::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::models::{Cell, CellResult, FailureReason, StepRecord},
    infra::{command, t},
};

/// The runtime context shared by every cell of a run: where the external
/// commands execute, how the environment is provisioned and the run-level
/// default step timeout.
///
/// 一次运行中每个单元共享的运行时上下文：外部命令在哪里执行、
/// 环境如何准备以及运行级的默认步骤超时。
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The directory external commands run in.
    /// 外部命令运行的目录。
    pub working_dir: PathBuf,
    /// The optional provisioning command template.
    /// 可选的环境准备命令模板。
    pub setup: Option<String>,
    /// The default timeout applied to steps without their own.
    /// 应用于未声明自身超时的步骤的默认超时。
    pub default_timeout: Option<Duration>,
}

/// What happened to one external command invocation.
enum CommandOutcome {
    /// The command ran to completion with the given exit status.
    Finished {
        success: bool,
        exit_code: Option<i32>,
        output: String,
        duration: Duration,
    },
    /// The command exceeded its timeout and was killed.
    TimedOut { duration: Duration },
    /// The command could not be rendered or spawned.
    SpawnError { error: String },
    /// The run was cancelled while the command was in flight.
    Cancelled,
}

/// Renders and runs one external command for a cell, racing it against the
/// run's cancellation token and an optional timeout. The child process is
/// killed when the future is dropped, so neither a timeout nor a
/// cancellation leaves a stray process behind.
async fn run_command(
    template: &str,
    cell: &Cell,
    ctx: &ExecutionContext,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> (String, CommandOutcome) {
    let (rendered, argv) = match command::render_command(template, cell) {
        Ok(v) => v,
        Err(e) => {
            return (
                template.to_string(),
                CommandOutcome::SpawnError {
                    error: e.to_string(),
                },
            );
        }
    };

    let mut cmd = tokio::process::Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .env(command::PLATFORM_ENV, &cell.platform)
        .env(command::TOOLCHAIN_ENV, &cell.toolchain)
        .current_dir(&ctx.working_dir)
        .kill_on_drop(true);

    let started = Instant::now();
    let capture = async {
        if let Some(limit) = timeout {
            match tokio::time::timeout(limit, command::spawn_and_capture(cmd)).await {
                Ok(res) => Some(res),
                Err(_) => None,
            }
        } else {
            Some(command::spawn_and_capture(cmd).await)
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => CommandOutcome::Cancelled,
        res = capture => match res {
            None => CommandOutcome::TimedOut { duration: started.elapsed() },
            Some((Ok(status), output)) => {
                let command_log = format!("{} {}\n", t!("run.command_prefix").blue(), rendered);
                CommandOutcome::Finished {
                    success: status.success(),
                    exit_code: status.code(),
                    output: format!("{command_log}{output}"),
                    duration: started.elapsed(),
                }
            }
            Some((Err(e), _)) => CommandOutcome::SpawnError { error: e.to_string() },
        },
    };

    (rendered, outcome)
}

/// The main entry point for running a single cell.
///
/// The optional provisioning command runs first; if it does not succeed the
/// cell is `Unavailable` and no step runs. The steps then execute strictly
/// in declaration order; the first failing step ends the cell (fail-fast
/// within the cell) with the outputs of every attempted step recorded.
/// Sibling cells are never affected by this cell's outcome.
///
/// 运行单个单元的主入口。
///
/// 可选的环境准备命令首先运行；如果它未成功，该单元为 `Unavailable`，
/// 且不运行任何步骤。然后步骤严格按声明顺序执行；第一个失败的步骤
/// 结束该单元（单元内快速失败），并记录每个已尝试步骤的输出。
/// 同级单元永远不受此单元结果的影响。
///
/// # Arguments
/// * `cell` - The cell to execute
/// * `ctx` - The shared runtime context
/// * `cancel` - The run-level cancellation token
/// * `attempt` - The dispatch attempt number (starts at 1)
pub async fn run_cell(
    cell: Cell,
    ctx: &ExecutionContext,
    cancel: CancellationToken,
    attempt: u8,
) -> CellResult {
    if cancel.is_cancelled() {
        return CellResult::Cancelled { cell };
    }

    let cell_start = Instant::now();
    println!("{}", t!("run.cell_started", cell = cell.label()).blue());

    // Provision the environment first. Its failure is not a step failure:
    // no step ran at all.
    // 首先准备环境。它的失败不是步骤失败：根本没有步骤运行。
    if let Some(setup) = ctx.setup.clone() {
        let (_, outcome) = run_command(&setup, &cell, ctx, ctx.default_timeout, &cancel).await;
        match outcome {
            CommandOutcome::Finished { success: true, .. } => {}
            CommandOutcome::Cancelled => {
                println!("{}", t!("run.cell_cancelled", cell = cell.label()).yellow());
                return CellResult::Cancelled { cell };
            }
            CommandOutcome::Finished {
                success: false,
                output,
                ..
            } => {
                println!("{}", t!("run.cell_unavailable", cell = cell.label()).yellow());
                return CellResult::Unavailable {
                    cell,
                    output,
                    attempts: attempt,
                };
            }
            CommandOutcome::TimedOut { .. } => {
                println!("{}", t!("run.cell_unavailable", cell = cell.label()).yellow());
                return CellResult::Unavailable {
                    cell,
                    output: t!("run.step_timeout_message").to_string(),
                    attempts: attempt,
                };
            }
            CommandOutcome::SpawnError { error } => {
                println!("{}", t!("run.cell_unavailable", cell = cell.label()).yellow());
                return CellResult::Unavailable {
                    cell,
                    output: error,
                    attempts: attempt,
                };
            }
        }
    }

    let steps = cell.steps.clone();
    let mut records: Vec<StepRecord> = Vec::with_capacity(steps.len());

    for step in steps {
        // Cancellation is observed at step boundaries as well as in flight.
        // 取消在步骤边界和执行过程中都会被观察到。
        if cancel.is_cancelled() {
            println!("{}", t!("run.cell_cancelled", cell = cell.label()).yellow());
            return CellResult::Cancelled { cell };
        }

        let timeout = step
            .timeout_secs
            .map(Duration::from_secs)
            .or(ctx.default_timeout);

        let (rendered, outcome) = run_command(&step.command, &cell, ctx, timeout, &cancel).await;

        match outcome {
            CommandOutcome::Cancelled => {
                println!("{}", t!("run.cell_cancelled", cell = cell.label()).yellow());
                return CellResult::Cancelled { cell };
            }
            CommandOutcome::Finished {
                success,
                exit_code,
                output,
                duration,
            } => {
                records.push(StepRecord {
                    name: step.name.clone(),
                    command: rendered,
                    output,
                    duration,
                    passed: success,
                    exit_code,
                });

                if success {
                    println!(
                        "{}",
                        t!(
                            "run.step_passed",
                            name = step.name,
                            cell = cell.label(),
                            duration = format!("{:.2?}", duration)
                        )
                        .green()
                    );
                } else {
                    println!(
                        "{}",
                        t!(
                            "run.step_failed",
                            name = step.name,
                            cell = cell.label(),
                            duration = format!("{:.2?}", duration)
                        )
                        .red()
                    );
                    // Fail fast: the remaining steps of this cell are skipped.
                    // 快速失败：跳过此单元的其余步骤。
                    return CellResult::Failed {
                        cell,
                        steps: records,
                        failed_step: step.name,
                        reason: FailureReason::StepFailed,
                        duration: cell_start.elapsed(),
                    };
                }
            }
            CommandOutcome::TimedOut { duration } => {
                println!(
                    "{}",
                    t!(
                        "run.step_timeout",
                        name = step.name,
                        cell = cell.label(),
                        timeout = timeout.map(|d| d.as_secs()).unwrap_or_default()
                    )
                    .red()
                );
                records.push(StepRecord {
                    name: step.name.clone(),
                    command: rendered,
                    output: t!("run.step_timeout_message").to_string(),
                    duration,
                    passed: false,
                    exit_code: None,
                });
                return CellResult::Failed {
                    cell,
                    steps: records,
                    failed_step: step.name,
                    reason: FailureReason::Timeout,
                    duration: cell_start.elapsed(),
                };
            }
            CommandOutcome::SpawnError { error } => {
                println!(
                    "{}",
                    t!("run.step_spawn_failed", name = step.name, cell = cell.label()).red()
                );
                records.push(StepRecord {
                    name: step.name.clone(),
                    command: rendered,
                    output: error,
                    duration: Duration::ZERO,
                    passed: false,
                    exit_code: None,
                });
                return CellResult::Failed {
                    cell,
                    steps: records,
                    failed_step: step.name,
                    reason: FailureReason::Spawn,
                    duration: cell_start.elapsed(),
                };
            }
        }
    }

    println!(
        "{}",
        t!(
            "run.cell_passed",
            cell = cell.label(),
            duration = format!("{:.2?}", cell_start.elapsed())
        )
        .green()
    );
    CellResult::Passed {
        cell,
        steps: records,
        duration: cell_start.elapsed(),
        attempts: attempt,
    }
}
