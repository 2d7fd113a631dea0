//! # Console Reporting Module / 控制台报告模块
//!
//! This module handles the generation and display of run reports in the
//! console. It prints a deterministic per-cell summary table and detailed
//! failure blocks, with colorful, internationalized output.
//!
//! 此模块处理控制台中运行报告的生成和显示。
//! 它打印确定性的每单元摘要表格和详细的失败块，
//! 输出带颜色且支持国际化。

use colored::*;

use crate::core::models::{CellResult, RunSummary};
use crate::infra::t;

/// Orders results by cell label so the report is deterministic regardless
/// of the completion order the scheduler observed.
/// 按单元标签排序结果，使报告不受调度器观察到的完成顺序影响。
fn ordered<'a>(results: &'a [CellResult]) -> Vec<&'a CellResult> {
    let mut sorted: Vec<&CellResult> = results.iter().collect();
    sorted.sort_by_key(|r| r.label());
    sorted
}

/// Prints a formatted summary of all cell results to the console.
/// Displays a table with cell status, label, failing step and duration,
/// followed by the totals and the overall verdict banner.
///
/// 在控制台打印所有单元结果的格式化摘要。
/// 显示一个包含单元状态、标签、失败步骤和持续时间的表格，
/// 随后是合计数字和总体结论横幅。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   - Passed       | ubuntu/stable       |             |      1.23s
///   - Failed       | ubuntu/nightly      | format      |      0.45s
///   - Unavailable  | windows/beta        |             |        N/A
/// ```
pub fn print_summary(results: &[CellResult], summary: &RunSummary, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in ordered(results) {
        let status_str = result.status_str(locale);
        let duration_str = result
            .duration()
            .map(|d| format!("{:.2?}", d))
            .unwrap_or_else(|| "N/A".to_string());
        let failed_step = result.failed_step().unwrap_or("");

        let status_colored = match result {
            CellResult::Passed { .. } => status_str.green(),
            CellResult::Failed { .. } => status_str.red(),
            CellResult::Unavailable { .. } => status_str.yellow(),
            CellResult::Cancelled { .. } => status_str.dimmed(),
        };

        println!(
            "  - {:<14} | {:<30} | {:<16} | {:>10}",
            status_colored,
            result.label(),
            failed_step,
            duration_str
        );
    }

    println!(
        "\n{}",
        t!(
            "report.totals",
            locale = locale,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            unavailable = summary.unavailable,
            cancelled = summary.cancelled
        )
    );

    if summary.is_passed() {
        println!(
            "{}",
            t!("report.verdict_passed", locale = locale).green().bold()
        );
    } else {
        println!(
            "{}",
            t!("report.verdict_failed", locale = locale).red().bold()
        );
    }
}

/// Prints detailed information about every cell that did not pass.
/// Shows the full captured output of all attempted steps of each failed or
/// unavailable cell, helping developers find out what broke where.
///
/// 打印每个未通过单元的详细信息。
/// 显示每个失败或不可用单元所有已尝试步骤的完整捕获输出，
/// 帮助开发者找出哪里出了问题。
pub fn print_failure_details(failures: &[&CellResult], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!(
        "\n{}",
        t!("report.failure_banner", locale = locale).red().bold()
    );
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            t!("report.failure_details_for", locale = locale).red(),
            result.label().cyan()
        );

        if let Some(step) = result.failed_step() {
            println!(
                "{}",
                t!("report.failed_step", locale = locale, name = step).yellow()
            );
        }

        let output = result.output();
        if !output.trim().is_empty() {
            println!(
                "\n--- {} ---\n",
                t!("report.output_header", locale = locale).yellow()
            );
            println!("{}", output);
        }
        println!("{}", "-".repeat(80));
    }
}
