// Shared test helpers for integration tests
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use lazy_static::lazy_static;

lazy_static! {
    /// A 2 platforms x 3 toolchains x 3 steps matrix where only cell b/y
    /// fails its `format` step. The `check` step logs which cells reached
    /// it, so tests can verify fail-fast behavior.
    pub static ref SCENARIO_MATRIX: String = r#"
language = "en"
platforms = ["a", "b"]
toolchains = ["x", "y", "z"]

[[steps]]
name = "test"
command = "true"

[[steps]]
name = "format"
command = "test {platform}/{toolchain} != b/y"

[[steps]]
name = "check"
command = "sh -c 'echo check ran for {platform}/{toolchain} >> checks.log'"
"#
    .to_string();
}

/// Writes a matrix declaration into the temporary directory and returns its path.
pub fn write_matrix(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write matrix declaration");
    path
}

/// A 2x2 matrix where every step of every cell passes.
pub fn passing_matrix() -> String {
    r#"
language = "en"
platforms = ["alpha", "beta"]
toolchains = ["one", "two"]

[[steps]]
name = "test"
command = "echo testing {platform} with {toolchain}"

[[steps]]
name = "check"
command = "true"
"#
    .to_string()
}

/// A 2x2 matrix whose provisioning command always fails, so every cell is
/// unavailable and no step ever runs.
pub fn unavailable_matrix() -> String {
    r#"
language = "en"
platforms = ["alpha", "beta"]
toolchains = ["one", "two"]
setup = "false"

[[steps]]
name = "test"
command = "echo never reached"
"#
    .to_string()
}

/// A matrix declaring an empty platform axis, which must abort before any
/// cell is dispatched.
pub fn empty_axis_matrix() -> String {
    r#"
language = "en"
platforms = []
toolchains = ["stable"]

[[steps]]
name = "test"
command = "true"
"#
    .to_string()
}
