//! # Matrix Expansion Module / 矩阵展开模块
//!
//! This module turns a matrix declaration into the ordered cross-product
//! of executable cells, validating the configuration before any cell runs.
//!
//! 此模块将矩阵声明转换为可执行单元的有序笛卡尔积，
//! 并在任何单元运行之前验证配置。

use crate::core::config::MatrixConfig;
use crate::core::models::Cell;
use crate::infra::t;
use anyhow::{bail, Result};
use std::collections::HashSet;

/// The expanded execution plan for a matrix run.
/// 矩阵运行的展开执行计划。
#[derive(Debug, Clone)]
pub struct MatrixPlan {
    /// The cells to execute, in deterministic matrix order.
    /// 要执行的单元，按确定的矩阵顺序排列。
    pub cells: Vec<Cell>,
}

/// Expands a matrix declaration into the ordered cross-product of cells.
///
/// The order is fixed: platforms form the outer loop and toolchains the
/// inner loop, each in declaration order, so identical inputs always yield
/// an identical cell sequence. Every cell is bound to the shared step
/// sequence.
///
/// 将矩阵声明展开为单元的有序笛卡尔积。
///
/// 顺序是固定的：平台为外层循环，工具链为内层循环，各按声明顺序排列，
/// 因此相同的输入总是产生相同的单元序列。每个单元都绑定到共享的步骤序列。
///
/// # Errors
/// Fails before any cell runs if either matrix axis or the step list is
/// empty, if an axis contains duplicate identifiers, or if the declared
/// concurrency limit is zero.
pub fn expand(config: &MatrixConfig) -> Result<MatrixPlan> {
    if config.platforms.is_empty() {
        bail!(t!("planner.empty_platforms"));
    }
    if config.toolchains.is_empty() {
        bail!(t!("planner.empty_toolchains"));
    }
    if config.steps.is_empty() {
        bail!(t!("planner.empty_steps"));
    }
    if config.max_concurrency == Some(0) {
        bail!(t!("planner.zero_concurrency"));
    }

    // Duplicate identifiers would produce indistinguishable cells.
    // 重复的标识符会产生无法区分的单元。
    let mut seen = HashSet::new();
    for platform in &config.platforms {
        if !seen.insert(platform.as_str()) {
            bail!(t!("planner.duplicate_platform", name = platform));
        }
    }
    seen.clear();
    for toolchain in &config.toolchains {
        if !seen.insert(toolchain.as_str()) {
            bail!(t!("planner.duplicate_toolchain", name = toolchain));
        }
    }

    let mut cells = Vec::with_capacity(config.platforms.len() * config.toolchains.len());
    for platform in &config.platforms {
        for toolchain in &config.toolchains {
            cells.push(Cell {
                platform: platform.clone(),
                toolchain: toolchain.clone(),
                steps: config.steps.clone(),
            });
        }
    }

    Ok(MatrixPlan { cells })
}
