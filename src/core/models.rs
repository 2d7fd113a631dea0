//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout Matrix Gate.
//! It includes models for matrix cells, per-step records, terminal cell
//! results and the aggregate run summary.
//!
//! 此模块定义了整个 Matrix Gate 中使用的核心数据结构。
//! 它包括矩阵单元、每步骤记录、单元最终结果和聚合运行摘要的模型。

use crate::core::config::StepSpec;
use crate::infra::t;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One (platform, toolchain) execution unit of the matrix, bound to the
/// shared ordered step sequence. Cells never share mutable state.
/// 矩阵中的一个（平台，工具链）执行单元，绑定到共享的有序步骤序列。
/// 单元之间从不共享可变状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The opaque identifier of the execution environment.
    /// 执行环境的不透明标识符。
    pub platform: String,
    /// The opaque identifier of the compiler/runtime variant.
    /// 编译器/运行时变体的不透明标识符。
    pub toolchain: String,
    /// The ordered steps this cell executes. Shared by declaration across
    /// the whole matrix; owned per cell.
    /// 此单元执行的有序步骤。整个矩阵按声明共享；每个单元各自持有。
    pub steps: Vec<StepSpec>,
}

impl Cell {
    /// The display label of the cell, `"platform/toolchain"`.
    /// 单元的显示标签，格式为 `"platform/toolchain"`。
    pub fn label(&self) -> String {
        format!("{}/{}", self.platform, self.toolchain)
    }
}

/// Enumerates the possible reasons for a cell failure.
/// This helps in categorizing errors for reporting and handling.
/// 枚举单元失败的可能原因。
/// 这有助于对错误进行分类，以便报告和处理。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// A step command ran and exited with a non-zero status.
    /// 某个步骤命令运行后以非零状态退出。
    StepFailed,
    /// A step exceeded its configured timeout.
    /// 某个步骤超出了其配置的超时时间。
    Timeout,
    /// A step command could not be parsed or spawned at all.
    /// 某个步骤命令完全无法解析或启动。
    Spawn,
}

/// The record of one attempted step within a cell: what ran, what it
/// printed, how long it took and whether it passed.
/// 单元内一次已尝试步骤的记录：运行了什么、打印了什么、
/// 花费了多长时间以及是否通过。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The declared step name / 声明的步骤名称
    pub name: String,
    /// The rendered command after placeholder substitution / 占位符替换后的实际命令
    pub command: String,
    /// The combined captured stdout and stderr / 合并捕获的 stdout 和 stderr
    pub output: String,
    /// How long the step ran / 步骤运行的时长
    pub duration: Duration,
    /// Whether the step exited successfully / 步骤是否成功退出
    pub passed: bool,
    /// The process exit code, absent when the step was killed or never
    /// spawned / 进程退出码，步骤被终止或从未启动时为空
    pub exit_code: Option<i32>,
}

/// Represents the terminal result of a single cell.
/// This enum captures all possible outcomes of running a cell,
/// including success, the various failures, an unavailable environment
/// and cancellation of the run.
///
/// 表示单个单元的最终结果。
/// 此枚举捕获运行单元的所有可能结果，
/// 包括成功、各种失败、环境不可用以及运行被取消。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellResult {
    /// Every step of the cell passed.
    /// 单元的每个步骤都通过了。
    Passed {
        /// The cell that was executed / 被执行的单元
        cell: Cell,
        /// The records of all executed steps / 所有已执行步骤的记录
        steps: Vec<StepRecord>,
        /// The total time taken by the cell / 单元花费的总时间
        duration: Duration,
        /// The number of dispatch attempts (1 unless the environment was
        /// retried). / 调度尝试次数（除非环境被重试，否则为 1）。
        attempts: u8,
    },
    /// A step of the cell failed; the remaining steps were not attempted.
    /// 单元的某个步骤失败了；其余步骤未被尝试。
    Failed {
        /// The cell that failed / 失败的单元
        cell: Cell,
        /// The records of all attempted steps, including the failing one
        /// / 所有已尝试步骤的记录，包括失败的那个
        steps: Vec<StepRecord>,
        /// The name of the first step that failed / 第一个失败的步骤的名称
        failed_step: String,
        /// The specific reason for the failure / 失败的具体原因
        reason: FailureReason,
        /// The time taken before the failure occurred / 失败发生前所花费的时间
        duration: Duration,
    },
    /// The cell's environment could not be provisioned; no step ran.
    /// 单元的环境无法准备；没有运行任何步骤。
    Unavailable {
        /// The cell whose environment was unavailable / 环境不可用的单元
        cell: Cell,
        /// The captured output of the provisioning command / 环境准备命令的捕获输出
        output: String,
        /// The number of provisioning attempts made / 已进行的环境准备尝试次数
        attempts: u8,
    },
    /// The run was cancelled before this cell finished.
    /// 运行在此单元完成之前被取消。
    Cancelled {
        /// The cell that never reached a verdict / 未得出结论的单元
        cell: Cell,
    },
}

impl CellResult {
    /// Returns the cell this result belongs to.
    pub fn cell(&self) -> &Cell {
        match self {
            CellResult::Passed { cell, .. } => cell,
            CellResult::Failed { cell, .. } => cell,
            CellResult::Unavailable { cell, .. } => cell,
            CellResult::Cancelled { cell } => cell,
        }
    }

    /// The display label of the underlying cell.
    pub fn label(&self) -> String {
        self.cell().label()
    }

    /// Checks if every step of the cell passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, CellResult::Passed { .. })
    }

    /// Checks if the cell failed on one of its steps.
    pub fn is_failure(&self) -> bool {
        matches!(self, CellResult::Failed { .. })
    }

    /// Checks if the cell's environment could not be provisioned.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CellResult::Unavailable { .. })
    }

    /// Checks if the run was cancelled before the cell finished.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CellResult::Cancelled { .. })
    }

    /// Checks if the cell failed because a step timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CellResult::Failed { reason, .. } if *reason == FailureReason::Timeout)
    }

    /// Gets the name of the first failing step, if any.
    /// 获取第一个失败步骤的名称（如果有）。
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            CellResult::Failed { failed_step, .. } => Some(failed_step),
            _ => None,
        }
    }

    /// Gets the status of the cell result as a string for display.
    /// 以字符串形式获取单元结果的状态以供显示。
    pub fn status_str(&self, locale: &str) -> String {
        match self {
            CellResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            CellResult::Failed { reason, .. } => {
                if *reason == FailureReason::Timeout {
                    t!("report.status_timeout", locale = locale).to_string()
                } else {
                    t!("report.status_failed", locale = locale).to_string()
                }
            }
            CellResult::Unavailable { .. } => {
                t!("report.status_unavailable", locale = locale).to_string()
            }
            CellResult::Cancelled { .. } => {
                t!("report.status_cancelled", locale = locale).to_string()
            }
        }
    }

    /// Gets the combined captured output of all attempted steps.
    /// Returns an empty string if nothing ran.
    /// 获取所有已尝试步骤的合并捕获输出。如果什么都没运行则返回空字符串。
    pub fn output(&self) -> String {
        match self {
            CellResult::Passed { steps, .. } | CellResult::Failed { steps, .. } => steps
                .iter()
                .map(|s| s.output.as_str())
                .collect::<Vec<_>>()
                .join(""),
            CellResult::Unavailable { output, .. } => output.clone(),
            CellResult::Cancelled { .. } => String::new(),
        }
    }

    /// Gets the duration of the cell. Returns None if not applicable.
    /// 获取单元的持续时间。如果不适用，则返回 None。
    pub fn duration(&self) -> Option<Duration> {
        match self {
            CellResult::Passed { duration, .. } => Some(*duration),
            CellResult::Failed { duration, .. } => Some(*duration),
            CellResult::Unavailable { .. } => None,
            CellResult::Cancelled { .. } => None,
        }
    }

    /// Gets the number of dispatch attempts. Returns 1 for results that
    /// cannot be retried.
    pub fn attempts(&self) -> u8 {
        match self {
            CellResult::Passed { attempts, .. } => *attempts,
            CellResult::Unavailable { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}

/// The overall verdict of a run.
/// 一次运行的总体结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every cell of the matrix passed / 矩阵的每个单元都通过了
    Passed,
    /// At least one cell did not pass / 至少一个单元未通过
    Failed,
}

/// The aggregate over all cell results, produced once every cell has
/// reached a terminal state. The run passes iff every cell passed.
/// 所有单元结果的聚合，在每个单元都达到最终状态后生成一次。
/// 当且仅当每个单元都通过时，运行才算通过。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started / 运行开始的时间
    pub started_at: DateTime<Utc>,
    /// When the run finished / 运行结束的时间
    pub finished_at: DateTime<Utc>,
    /// The total number of cells in the matrix / 矩阵中的单元总数
    pub total: usize,
    /// The number of cells that passed / 通过的单元数量
    pub passed: usize,
    /// The number of cells that failed a step / 步骤失败的单元数量
    pub failed: usize,
    /// The number of cells whose environment was unavailable / 环境不可用的单元数量
    pub unavailable: usize,
    /// The number of cells cancelled before completion / 完成前被取消的单元数量
    pub cancelled: usize,
    /// The overall verdict / 总体结论
    pub status: RunStatus,
}

impl RunSummary {
    /// Folds all terminal cell results into the aggregate verdict.
    /// 将所有单元的最终结果折叠为聚合结论。
    pub fn from_results(
        results: &[CellResult],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.is_passed()).count();
        let failed = results.iter().filter(|r| r.is_failure()).count();
        let unavailable = results.iter().filter(|r| r.is_unavailable()).count();
        let cancelled = results.iter().filter(|r| r.is_cancelled()).count();

        let status = if passed == results.len() {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        };

        Self {
            started_at,
            finished_at,
            total: results.len(),
            passed,
            failed,
            unavailable,
            cancelled,
            status,
        }
    }

    /// Checks if the whole matrix passed.
    pub fn is_passed(&self) -> bool {
        self.status == RunStatus::Passed
    }
}
