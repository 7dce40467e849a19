pub mod commands;
pub mod core;
pub mod display;
mod help;
pub mod output;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
