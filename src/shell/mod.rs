//! Process execution, PATH handling and shell environment.

pub mod command;
pub mod path;
pub mod platform;
pub mod refresh;

pub use command::{
    execute, split_command_line, CommandLine, ProbeOptions, ProbeOutput, ProcessProbe,
    SystemProbe,
};
pub use path::{
    executable_extensions, find_in_dir, is_executable, parse_system_path, path_contains,
    resolve_tool_path, split_path_value,
};
pub use platform::{detect_shell, is_ci, is_elevated, Platform, ShellInfo, ShellType};
pub use refresh::PathFixPlan;
