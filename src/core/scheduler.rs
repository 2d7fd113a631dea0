//! # Scheduler Module / 调度器模块
//!
//! This module dispatches the expanded cells for concurrent execution under
//! a configurable concurrency bound. Cells are independent failure domains:
//! one cell's outcome never cancels, blocks or reorders another cell.
//! Results are collected in completion order.
//!
//! 此模块在可配置的并发上限下调度展开后的单元并发执行。
//! 单元是相互独立的故障域：一个单元的结果永远不会取消、阻塞
//! 或重排另一个单元。结果按完成顺序收集。

use colored::*;
use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        execution::{run_cell, ExecutionContext},
        models::CellResult,
        planner::MatrixPlan,
    },
    infra::t,
};

/// Scheduling options resolved from the configuration and the CLI.
/// 从配置和 CLI 解析出的调度选项。
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerOptions {
    /// The maximum number of cells running at the same time.
    /// `None` means one slot per cell, i.e. unbounded within the matrix.
    /// 同时运行的单元数量上限。`None` 表示每个单元一个槽位，
    /// 即在矩阵范围内不设上限。
    pub max_concurrency: Option<usize>,
    /// Whether to re-dispatch a cell exactly once after its environment
    /// could not be provisioned.
    /// 是否在单元环境无法准备后恰好重新调度一次。
    pub retry_unavailable: bool,
}

/// Dispatches every cell of the plan through a bounded worker pool and
/// collects all terminal results in completion order.
///
/// Cells that have not started when the cancellation token fires are marked
/// `Cancelled` without running; in-flight cells observe the token themselves
/// and terminate their external commands. The full matrix always reaches a
/// terminal state: no cell is skipped because a sibling failed.
///
/// 通过有界工作池调度计划中的每个单元，并按完成顺序收集所有最终结果。
///
/// 取消令牌触发时尚未开始的单元被标记为 `Cancelled` 而不运行；
/// 进行中的单元自行观察令牌并终止其外部命令。整个矩阵总是达到
/// 最终状态：不会因为同级单元失败而跳过任何单元。
pub async fn run_matrix(
    plan: MatrixPlan,
    options: SchedulerOptions,
    ctx: &ExecutionContext,
    cancel: CancellationToken,
) -> Vec<CellResult> {
    let limit = options.max_concurrency.unwrap_or(plan.cells.len()).max(1);

    stream::iter(plan.cells.into_iter().map(|cell| {
        let cancel = cancel.clone();
        let ctx = ctx.clone();
        async move {
            // A cell that was still pending when the run was cancelled
            // terminates as Cancelled, never as pending.
            // 运行被取消时仍处于等待状态的单元以 Cancelled 结束，
            // 而不是停留在等待状态。
            if cancel.is_cancelled() {
                return CellResult::Cancelled { cell };
            }

            let mut result = run_cell(cell, &ctx, cancel.clone(), 1).await;

            // The only retry policy: one re-dispatch after an unavailable
            // environment, then terminal. Step failures are never retried.
            // 唯一的重试策略：环境不可用后重新调度一次，然后为最终状态。
            // 步骤失败永远不会重试。
            if options.retry_unavailable && !cancel.is_cancelled() {
                if let CellResult::Unavailable { cell, .. } = &result {
                    let retry_cell = cell.clone();
                    println!(
                        "{}",
                        t!("run.retry_unavailable", cell = retry_cell.label()).yellow()
                    );
                    result = run_cell(retry_cell, &ctx, cancel, 2).await;
                }
            }

            result
        }
    }))
    .buffer_unordered(limit)
    .collect()
    .await
}
