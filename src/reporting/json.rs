//! # JSON Reporting Module / JSON 报告模块
//!
//! This module writes the structured run report: the aggregate summary plus
//! one flat entry per cell with its per-step records. The report is sorted
//! by cell label so identical runs produce identical documents.
//!
//! 此模块写出结构化运行报告：聚合摘要加上每个单元的扁平条目
//! 及其每步骤记录。报告按单元标签排序，因此相同的运行产生相同的文档。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{CellResult, RunSummary, StepRecord};

/// One cell of the matrix, flattened for the report.
#[derive(Debug, Serialize)]
struct CellEntry<'a> {
    platform: &'a str,
    toolchain: &'a str,
    status: String,
    /// The name of the first failing step, absent for passing cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_step: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    attempts: u8,
    steps: &'a [StepRecord],
}

/// The complete report document.
#[derive(Debug, Serialize)]
struct Report<'a> {
    summary: &'a RunSummary,
    cells: Vec<CellEntry<'a>>,
}

fn status_tag(result: &CellResult) -> String {
    match result {
        CellResult::Passed { .. } => "passed",
        CellResult::Failed { .. } => "failed",
        CellResult::Unavailable { .. } => "unavailable",
        CellResult::Cancelled { .. } => "cancelled",
    }
    .to_string()
}

/// Writes the structured run report to the given path.
/// 将结构化运行报告写入给定路径。
pub fn write_report(summary: &RunSummary, results: &[CellResult], path: &Path) -> Result<()> {
    let mut sorted: Vec<&CellResult> = results.iter().collect();
    sorted.sort_by_key(|r| r.label());

    let cells = sorted
        .iter()
        .map(|result| {
            let cell = result.cell();
            let steps: &[StepRecord] = match result {
                CellResult::Passed { steps, .. } | CellResult::Failed { steps, .. } => steps,
                _ => &[],
            };
            CellEntry {
                platform: &cell.platform,
                toolchain: &cell.toolchain,
                status: status_tag(result),
                failed_step: result.failed_step(),
                duration_secs: result.duration().map(|d| d.as_secs_f64()),
                attempts: result.attempts(),
                steps,
            }
        })
        .collect();

    let report = Report { summary, cells };
    let document = serde_json::to_string_pretty(&report)?;
    fs::write(path, document)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;

    Ok(())
}
