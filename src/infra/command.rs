use anyhow::{anyhow, Context, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::core::models::Cell;

/// Environment variable carrying the cell's platform identifier into
/// every external command.
pub const PLATFORM_ENV: &str = "MATRIX_PLATFORM";
/// Environment variable carrying the cell's toolchain identifier into
/// every external command.
pub const TOOLCHAIN_ENV: &str = "MATRIX_TOOLCHAIN";

/// Renders a command template for a cell and tokenizes it into an argv.
///
/// `{platform}` and `{toolchain}` placeholders are substituted first, then
/// the string is expanded shell-style (environment variables, `~`) and split
/// into words.
///
/// 为单元渲染命令模板并将其标记化为 argv。
/// 首先替换 `{platform}` 和 `{toolchain}` 占位符，然后按 shell 风格
/// 展开字符串（环境变量、`~`）并拆分为词。
///
/// # Returns
/// The fully rendered command string (for logs) and the argv to spawn.
pub fn render_command(template: &str, cell: &Cell) -> Result<(String, Vec<String>)> {
    let substituted = template
        .replace("{platform}", &cell.platform)
        .replace("{toolchain}", &cell.toolchain);

    let rendered = shellexpand::full(&substituted)
        .with_context(|| format!("Failed to expand command: {substituted}"))?
        .to_string();

    let argv = shlex::split(&rendered)
        .ok_or_else(|| anyhow!("Failed to parse command: {rendered}"))?;

    if argv.is_empty() {
        return Err(anyhow!("Empty command after parsing."));
    }

    Ok((rendered, argv))
}

/// Reads a captured stream to its end, line by line.
/// 逐行读取捕获的流直到结束。
async fn drain(stream: Option<impl AsyncRead + Unpin>) -> String {
    let mut collected = String::new();
    if let Some(stream) = stream {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            collected.push_str(&line);
            collected.push('\n');
        }
    }
    collected
}

/// Spawns a command and captures its stdout and stderr.
/// Both streams are read concurrently with the child's exit so a full pipe
/// buffer can never stall the process; the captured output is returned as
/// stdout followed by stderr.
///
/// 派生一个命令并捕获其 stdout 和 stderr。
/// 两个流与子进程的退出并发读取，因此写满的管道缓冲区不会阻塞进程；
/// 捕获的输出按 stdout 在前、stderr 在后返回。
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined captured output as a `String`.
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            // If spawning fails there is nothing to capture.
            // 如果派生失败，则没有可捕获的内容。
            return (Err(e), String::new());
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, out, err) = tokio::join!(child.wait(), drain(stdout), drain(stderr));

    let mut output = out;
    output.push_str(&err);
    (status, output)
}
