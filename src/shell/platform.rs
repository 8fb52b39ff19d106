//! Platform and shell detection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Operating system family a tool definition can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    /// Anything else Rust can target; never satisfies preconditions.
    Other,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// Whether toolsmith supports running on this platform.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Other)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other => std::env::consts::OS,
        };
        write!(f, "{}", name)
    }
}

/// Information about the current shell environment.
#[derive(Debug, Clone)]
pub struct ShellInfo {
    /// Shell executable path.
    pub executable: PathBuf,

    /// Shell name (bash, zsh, fish, powershell, cmd).
    pub name: ShellType,

    /// Config files that affect this shell, most specific first.
    pub config_files: Vec<PathBuf>,
}

impl ShellInfo {
    /// The rc file PATH exports should be appended to.
    pub fn primary_config_file(&self) -> Option<&Path> {
        self.config_files.first().map(|p| p.as_path())
    }
}

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = std::path::Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Unknown,
        }
    }

    /// Line that prepends `dir` to PATH in this shell's syntax.
    pub fn path_export_line(&self, dir: &Path) -> String {
        let dir = dir.display();
        match self {
            ShellType::Fish => format!("fish_add_path \"{}\"", dir),
            ShellType::PowerShell => format!("$env:Path = \"{};\" + $env:Path", dir),
            ShellType::Cmd => format!("setx PATH \"{};%PATH%\"", dir),
            ShellType::Bash | ShellType::Zsh | ShellType::Unknown => {
                format!("export PATH=\"{}:$PATH\"", dir)
            }
        }
    }
}

/// Detect the current shell environment.
pub fn detect_shell() -> ShellInfo {
    let executable = get_shell_executable();
    let shell_type = ShellType::from_executable(&executable.to_string_lossy());

    ShellInfo {
        executable,
        name: shell_type,
        config_files: get_config_files(shell_type),
    }
}

fn get_shell_executable() -> PathBuf {
    if cfg!(target_os = "windows") {
        // PowerShell sets PSModulePath; prefer it over cmd when present.
        if std::env::var_os("PSModulePath").is_some() {
            PathBuf::from("powershell.exe")
        } else {
            std::env::var("COMSPEC")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
        }
    } else {
        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}

fn get_config_files(shell_type: ShellType) -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_default();

    match shell_type {
        ShellType::Bash => vec![
            home.join(".bashrc"),
            home.join(".bash_profile"),
            home.join(".profile"),
        ],
        ShellType::Zsh => vec![
            home.join(".zshrc"),
            home.join(".zprofile"),
            home.join(".zshenv"),
        ],
        ShellType::Fish => vec![home.join(".config/fish/config.fish")],
        ShellType::PowerShell => {
            if let Some(docs) = dirs::document_dir() {
                vec![
                    docs.join("PowerShell/Microsoft.PowerShell_profile.ps1"),
                    docs.join("WindowsPowerShell/Microsoft.PowerShell_profile.ps1"),
                ]
            } else {
                vec![]
            }
        }
        ShellType::Cmd | ShellType::Unknown => vec![home.join(".profile")],
    }
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive output in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        // `net session` only succeeds from an elevated prompt.
        std::process::Command::new("net")
            .arg("session")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}
