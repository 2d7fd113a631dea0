//! # Reporting Module / 报告模块
//!
//! This module contains run result reporting:
//! a colorized console summary and an optional structured JSON report.
//!
//! 此模块包含运行结果报告：
//! 彩色控制台摘要和可选的结构化 JSON 报告。

pub mod console;
pub mod json;
