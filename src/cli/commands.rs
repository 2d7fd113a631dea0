//! CLI subcommand implementations / CLI 子命令实现

pub mod run;
pub mod init;
