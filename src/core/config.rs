use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// A single named check command shared by every cell of the matrix.
/// The command is an opaque external invocation; only its exit status
/// and captured output are interpreted.
/// 矩阵中每个单元共享的单个命名检查命令。
/// 该命令是一个不透明的外部调用；只解释其退出状态和捕获的输出。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepSpec {
    /// The name of the step, used for identification in logs and reports.
    /// 步骤的名称，用于在日志和报告中进行识别。
    pub name: String,
    /// The command template to run. `{platform}` and `{toolchain}` are
    /// substituted with the cell's identifiers before execution.
    /// 要运行的命令模板。执行前 `{platform}` 和 `{toolchain}`
    /// 会被替换为单元的标识符。
    pub command: String,
    /// An optional timeout in seconds for this step. If the step runs longer
    /// than this, it is marked as a timeout failure. Falls back to the
    /// run-level `step_timeout_secs` when absent.
    /// 此步骤的可选超时时间（秒）。如果步骤运行时间超过此值，
    /// 它将被标记为超时失败。未设置时回退到运行级的 `step_timeout_secs`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Represents the entire matrix declaration, loaded from a TOML file.
/// It contains the platform and toolchain axes, the shared step sequence
/// and the scheduling options.
/// 代表从 TOML 文件加载的整个矩阵声明。
/// 它包含平台和工具链两个轴、共享的步骤序列以及调度选项。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// The ordered set of platform identifiers forming the outer matrix axis.
    /// 构成矩阵外层轴的平台标识符有序集合。
    pub platforms: Vec<String>,

    /// The ordered set of toolchain identifiers forming the inner matrix axis.
    /// 构成矩阵内层轴的工具链标识符有序集合。
    pub toolchains: Vec<String>,

    /// The ordered sequence of check steps executed by every cell.
    /// 每个单元执行的检查步骤有序序列。
    pub steps: Vec<StepSpec>,

    /// An optional provisioning command run before a cell's first step
    /// (e.g. `rustup toolchain install {toolchain}`). If it fails, the cell
    /// is recorded as unavailable and no step runs.
    /// 可选的环境准备命令，在单元的第一个步骤之前运行
    /// （例如 `rustup toolchain install {toolchain}`）。
    /// 如果失败，该单元被记录为不可用，且不运行任何步骤。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,

    /// The maximum number of cells executing at the same time.
    /// Defaults to the number of cells, i.e. unbounded within the matrix.
    /// 同时执行的单元数量上限。
    /// 默认为单元总数，即在矩阵范围内不设上限。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    /// Whether to re-dispatch a cell once when its environment could not be
    /// provisioned. Step failures are never retried.
    /// 当单元的环境无法准备时是否重新调度一次。
    /// 步骤失败永远不会重试。
    #[serde(default)]
    pub retry_unavailable: bool,

    /// An optional run-level default timeout in seconds applied to every
    /// step that does not declare its own.
    /// 可选的运行级默认超时时间（秒），应用于未声明自身超时的每个步骤。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Loads and parses a matrix declaration from the given path.
/// Returns the parsed configuration together with the canonicalized path
/// for display purposes.
pub fn load_config(path: &Path) -> Result<(MatrixConfig, PathBuf)> {
    let config_path = fs::canonicalize(path)
        .with_context(|| t!("config.read_failed", path = path.display()))?;

    let content = fs::read_to_string(&config_path)
        .with_context(|| t!("config.read_failed", path = config_path.display()))?;

    let config: MatrixConfig =
        toml::from_str(&content).with_context(|| t!("config.parse_failed"))?;

    Ok((config, config_path))
}
