//! # Matrix Gate Library / Matrix Gate 库
//!
//! This library provides the core functionality for the Matrix Gate tool,
//! a configuration-driven build verification orchestrator that runs a fixed
//! sequence of checks across a platform × toolchain matrix.
//!
//! 此库为 Matrix Gate 工具提供核心功能，
//! 这是一个配置驱动的构建验证编排器，
//! 在平台 × 工具链矩阵上运行固定的检查序列。
//!
//! ## Modules / 模块
//!
//! - `core` - Core data models, matrix expansion, scheduling and cell execution
//! - `infra` - Infrastructure services like command rendering and output capture
//! - `reporting` - Run result reporting (console and JSON)
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 核心数据模型、矩阵展开、调度和单元执行
//! - `infra` - 基础设施服务，如命令渲染和输出捕获
//! - `reporting` - 运行结果报告（控制台和 JSON）
//! - `cli` - 命令行接口和命令

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use crate::core::models;
pub use crate::core::config;
pub use crate::core::planner;
pub use crate::core::scheduler;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    // Detect system locale and set it for i18n.
    // Fallback to "en" if detection fails.
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Try to match the full locale first (e.g., "zh-CN")
    // Then try to match the language part only (e.g., "en" from "en-US")
    // Finally, fall back to "en"
    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
