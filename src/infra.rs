//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Matrix Gate,
//! including command rendering, process execution and i18n support.
//!
//! 此模块为 Matrix Gate 提供基础设施服务，
//! 包括命令渲染、进程执行和国际化支持。

pub mod command;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
