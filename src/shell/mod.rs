//! External command execution and platform details.

pub mod command;
pub mod platform;

pub use command::{
    execute, spawn_error, CommandResult, CommandRunner, CommandSpec, SystemRunner,
};
pub use platform::{
    is_ci, is_elevated, is_executable, needs_privilege, parse_system_path, resolve_tool_path,
    Platform,
};
