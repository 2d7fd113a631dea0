//! # Models Module Unit Tests / Models 模块单元测试
//!
//! This module contains unit tests for the `models.rs` module,
//! testing the cell result variants, their helper methods and the
//! aggregate run summary.
//!
//! 此模块包含 `models.rs` 模块的单元测试，
//! 测试单元结果的各个变体、它们的辅助方法和聚合运行摘要。

use chrono::Utc;
use matrix_gate::core::config::StepSpec;
use matrix_gate::core::models::{
    Cell, CellResult, FailureReason, RunStatus, RunSummary, StepRecord,
};
use std::time::Duration;

/// Helper function to create a cell / 创建单元的辅助函数
fn make_cell(platform: &str, toolchain: &str) -> Cell {
    Cell {
        platform: platform.to_string(),
        toolchain: toolchain.to_string(),
        steps: vec![StepSpec {
            name: "test".to_string(),
            command: "true".to_string(),
            timeout_secs: None,
        }],
    }
}

fn record(name: &str, output: &str, passed: bool) -> StepRecord {
    StepRecord {
        name: name.to_string(),
        command: name.to_string(),
        output: output.to_string(),
        duration: Duration::from_millis(10),
        passed,
        exit_code: Some(if passed { 0 } else { 1 }),
    }
}

fn passed(platform: &str, toolchain: &str) -> CellResult {
    CellResult::Passed {
        cell: make_cell(platform, toolchain),
        steps: vec![record("test", "ok\n", true)],
        duration: Duration::from_secs(1),
        attempts: 1,
    }
}

fn failed(platform: &str, toolchain: &str, step: &str) -> CellResult {
    CellResult::Failed {
        cell: make_cell(platform, toolchain),
        steps: vec![record("test", "ok\n", true), record(step, "boom\n", false)],
        failed_step: step.to_string(),
        reason: FailureReason::StepFailed,
        duration: Duration::from_secs(1),
    }
}

#[cfg(test)]
mod cell_tests {
    use super::*;

    #[test]
    fn test_cell_label() {
        assert_eq!(make_cell("ubuntu", "stable").label(), "ubuntu/stable");
    }
}

#[cfg(test)]
mod cell_result_tests {
    use super::*;

    #[test]
    fn test_passed_result() {
        let result = passed("ubuntu", "stable");

        assert!(result.is_passed());
        assert!(!result.is_failure());
        assert!(!result.is_timeout());
        assert_eq!(result.label(), "ubuntu/stable");
        assert_eq!(result.failed_step(), None);
        assert_eq!(result.duration(), Some(Duration::from_secs(1)));
        assert_eq!(result.attempts(), 1);
    }

    #[test]
    fn test_failed_result_names_the_first_failing_step() {
        let result = failed("ubuntu", "nightly", "format");

        assert!(result.is_failure());
        assert!(!result.is_passed());
        assert_eq!(result.failed_step(), Some("format"));
        // Output concatenates every attempted step, including the failing one.
        assert_eq!(result.output(), "ok\nboom\n");
    }

    #[test]
    fn test_timeout_is_a_failure_with_its_own_reason() {
        let result = CellResult::Failed {
            cell: make_cell("windows", "beta"),
            steps: vec![record("test", "", false)],
            failed_step: "test".to_string(),
            reason: FailureReason::Timeout,
            duration: Duration::from_secs(60),
        };

        assert!(result.is_failure());
        assert!(result.is_timeout());
    }

    #[test]
    fn test_unavailable_result() {
        let result = CellResult::Unavailable {
            cell: make_cell("macos", "nightly"),
            output: "no such toolchain\n".to_string(),
            attempts: 2,
        };

        assert!(result.is_unavailable());
        assert!(!result.is_failure());
        assert_eq!(result.attempts(), 2);
        assert_eq!(result.duration(), None);
        assert_eq!(result.output(), "no such toolchain\n");
    }

    #[test]
    fn test_cancelled_result() {
        let result = CellResult::Cancelled {
            cell: make_cell("ubuntu", "beta"),
        };

        assert!(result.is_cancelled());
        assert!(!result.is_passed());
        assert_eq!(result.output(), "");
        assert_eq!(result.duration(), None);
    }

    #[test]
    fn test_status_strings_in_english() {
        assert_eq!(passed("a", "x").status_str("en"), "Passed");
        assert_eq!(failed("a", "x", "test").status_str("en"), "Failed");
    }
}

#[cfg(test)]
mod run_summary_tests {
    use super::*;

    #[test]
    fn test_summary_passes_only_when_every_cell_passed() {
        let started = Utc::now();
        let results = vec![passed("a", "x"), passed("a", "y"), passed("b", "x")];

        let summary = RunSummary::from_results(&results, started, Utc::now());

        assert_eq!(summary.status, RunStatus::Passed);
        assert!(summary.is_passed());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_one_failure_fails_the_whole_run() {
        let started = Utc::now();
        let results = vec![passed("a", "x"), passed("a", "y"), failed("b", "y", "format")];

        let summary = RunSummary::from_results(&results, started, Utc::now());

        assert_eq!(summary.status, RunStatus::Failed);
        assert!(!summary.is_passed());
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);

        // The failing cell stays identifiable by its (platform, toolchain) pair.
        let failing: Vec<String> = results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.label())
            .collect();
        assert_eq!(failing, vec!["b/y"]);
    }

    #[test]
    fn test_unavailable_and_cancelled_cells_fail_the_run() {
        let started = Utc::now();
        let results = vec![
            passed("a", "x"),
            CellResult::Unavailable {
                cell: make_cell("a", "y"),
                output: String::new(),
                attempts: 1,
            },
            CellResult::Cancelled {
                cell: make_cell("b", "x"),
            },
        ];

        let summary = RunSummary::from_results(&results, started, Utc::now());

        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.cancelled, 1);
    }
}
