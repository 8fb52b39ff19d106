//! Structured process execution.
//!
//! Commands are always spawned from an argv vector ([`CommandLine`]); no
//! shell is involved, so tool definitions cannot smuggle pipes, redirects or
//! substitutions into a probe. A definition that needs a shell has to say so
//! explicitly (`["sh", "-c", "..."]`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How often a child with a deadline is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for pipe readers once the child is gone.
const READER_GRACE: Duration = Duration::from_secs(2);

/// How long to wait for pipe readers after a child was killed.
const KILLED_READER_GRACE: Duration = Duration::from_millis(200);

/// A program plus its arguments.
///
/// Deserializes from either a YAML sequence (`["git", "--version"]`) or a
/// string (`"git --version"`). Strings are split on whitespace with support
/// for single and double quotes; backslashes are literal outside double
/// quotes so Windows paths survive unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCommandLine", into = "Vec<String>")]
pub struct CommandLine {
    argv: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommandLine {
    Line(String),
    Argv(Vec<String>),
}

impl TryFrom<RawCommandLine> for CommandLine {
    type Error = String;

    fn try_from(raw: RawCommandLine) -> Result<Self, Self::Error> {
        match raw {
            RawCommandLine::Line(line) => CommandLine::parse(&line),
            RawCommandLine::Argv(argv) => CommandLine::from_argv(argv),
        }
    }
}

impl From<CommandLine> for Vec<String> {
    fn from(command: CommandLine) -> Self {
        command.argv
    }
}

impl CommandLine {
    /// Parse a command string into argv.
    pub fn parse(line: &str) -> Result<Self, String> {
        Self::from_argv(split_command_line(line)?)
    }

    /// Build from an explicit argv vector.
    pub fn from_argv(argv: Vec<String>) -> Result<Self, String> {
        match argv.first() {
            Some(program) if !program.is_empty() => Ok(Self { argv }),
            _ => Err("command line is empty".to_string()),
        }
    }

    /// Build from a program and arguments.
    pub fn new(program: &str, args: &[&str]) -> Self {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(|a| a.to_string()));
        Self { argv }
    }

    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Full argv.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Return a copy with the program replaced by `path` when the program is
    /// one of `names`.
    ///
    /// Used to invoke the exact binary detection resolved rather than
    /// whatever the child's PATH finds first.
    pub fn with_resolved_program(&self, names: &[String], path: &Path) -> Self {
        if names.iter().any(|n| n == self.program()) {
            let mut argv = self.argv.clone();
            argv[0] = path.to_string_lossy().into_owned();
            Self { argv }
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .argv
            .iter()
            .map(|a| {
                if a.is_empty() || a.contains(char::is_whitespace) {
                    format!("\"{}\"", a.replace('"', "\\\""))
                } else {
                    a.clone()
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Split a command string into argv without any shell expansion.
pub fn split_command_line(line: &str) -> Result<Vec<String>, String> {
    let mut argv = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(format!("unterminated single quote in: {}", line)),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') if matches!(chars.peek(), Some('"') | Some('\\')) => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        Some(ch) => current.push(ch),
                        None => return Err(format!("unterminated double quote in: {}", line)),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    argv.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        argv.push(current);
    }

    Ok(argv)
}

/// Options for a single probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Deadline after which the child is killed (None = wait forever).
    pub timeout: Option<Duration>,

    /// Extra environment variables (merged with the inherited env).
    pub env: HashMap<String, String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Replacement PATH for the child, also used for program lookup.
    pub search_path: Option<Vec<PathBuf>>,
}

impl ProbeOptions {
    /// Options with only a deadline set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }
}

/// Outcome of running one command.
#[derive(Debug, Clone, Default)]
pub struct ProbeOutput {
    /// Exit code (None if killed, signalled, or never spawned).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Whether the deadline expired and the child was killed.
    pub timed_out: bool,

    /// Set when the program could not be started at all.
    pub spawn_error: Option<String>,

    /// Wall-clock duration.
    pub duration: Duration,
}

impl ProbeOutput {
    /// An outcome for a program that never started.
    pub fn spawn_failed(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            spawn_error: Some(message.into()),
            duration,
            ..Default::default()
        }
    }

    /// Whether the process was started.
    pub fn spawned(&self) -> bool {
        self.spawn_error.is_none()
    }

    /// Whether the process started and ran to completion before its deadline.
    pub fn completed(&self) -> bool {
        self.spawned() && !self.timed_out
    }

    /// Whether the process completed with exit code 0.
    pub fn success(&self) -> bool {
        self.completed() && self.exit_code == Some(0)
    }

    /// Stdout if it has content, otherwise stderr.
    ///
    /// Several tools (java, older pythons) print their version on stderr.
    pub fn primary_output(&self) -> &str {
        if self.stdout.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }

    /// Stdout followed by stderr.
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    /// Short human-readable reason for a non-successful outcome.
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(err) = &self.spawn_error {
            return Some(err.clone());
        }
        if self.timed_out {
            return Some(format!(
                "timed out after {:.1}s",
                self.duration.as_secs_f64()
            ));
        }
        match self.exit_code {
            Some(0) => None,
            Some(code) => Some(format!("exited with code {}", code)),
            None => Some("terminated by signal".to_string()),
        }
    }
}

/// Runs external commands and reports what happened.
///
/// Implementations never fail: a missing binary, nonzero exit or timeout is
/// reported in [`ProbeOutput`].
pub trait ProcessProbe: Send + Sync {
    /// Run `command` to completion or until its deadline.
    fn execute(&self, command: &CommandLine, options: &ProbeOptions) -> ProbeOutput;
}

/// [`ProcessProbe`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl ProcessProbe for SystemProbe {
    fn execute(&self, command: &CommandLine, options: &ProbeOptions) -> ProbeOutput {
        execute(command, options)
    }
}

/// Execute a command with captured output and an optional deadline.
pub fn execute(command: &CommandLine, options: &ProbeOptions) -> ProbeOutput {
    let start = Instant::now();

    let mut cmd = Command::new(command.program());
    cmd.args(command.args());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if let Some(entries) = &options.search_path {
        if let Ok(joined) = std::env::join_paths(entries) {
            cmd.env("PATH", joined);
        }
    }

    // Own process group, so a deadline kill also reaches grandchildren.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!("Failed to spawn '{}': {}", command, e);
            return ProbeOutput::spawn_failed(
                format!("failed to start '{}': {}", command.program(), e),
                start.elapsed(),
            );
        }
    };

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let (status, timed_out) = match wait_with_deadline(&mut child, options.timeout) {
        Ok(result) => result,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return ProbeOutput::spawn_failed(
                format!("failed waiting for '{}': {}", command.program(), e),
                start.elapsed(),
            );
        }
    };

    let grace = if timed_out {
        KILLED_READER_GRACE
    } else {
        READER_GRACE
    };
    let stdout = stdout_reader
        .map(|r| collect(r, grace))
        .unwrap_or_default();
    let stderr = stderr_reader
        .map(|r| collect(r, grace))
        .unwrap_or_default();

    let duration = start.elapsed();
    tracing::debug!(
        "Probe '{}' finished in {:?} (exit={:?}, timed_out={})",
        command,
        duration,
        status.and_then(|s| s.code()),
        timed_out
    );

    ProbeOutput {
        exit_code: status.and_then(|s| s.code()),
        stdout,
        stderr,
        timed_out,
        spawn_error: None,
        duration,
    }
}

/// Output drained from one pipe so far.
struct PipeReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<()>,
}

/// Drain `pipe` on its own thread, appending each chunk as it arrives.
///
/// A background grandchild can hold the pipe open long after the child
/// exits, so readers never wait for EOF before exposing bytes.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> PipeReader {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let (tx, done) = mpsc::channel();
    let sink = Arc::clone(&buffer);
    thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => match sink.lock() {
                    Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                    Err(poisoned) => poisoned.into_inner().extend_from_slice(&chunk[..n]),
                },
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        let _ = tx.send(());
    });
    PipeReader { buffer, done }
}

/// Wait up to `grace` for EOF, then return whatever was read.
fn collect(reader: PipeReader, grace: Duration) -> String {
    if reader.done.recv_timeout(grace).is_err() {
        tracing::debug!("Pipe still open after {:?}; keeping partial output", grace);
    }
    let bytes = match reader.buffer.lock() {
        Ok(buf) => buf.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Wait for the child, killing it once `timeout` elapses.
///
/// Returns the exit status (None when killed) and whether the deadline hit.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<(Option<ExitStatus>, bool)> {
    let Some(timeout) = timeout else {
        return child.wait().map(|status| (Some(status), false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((Some(status), false));
        }

        let now = Instant::now();
        if now >= deadline {
            kill_process_group(child);
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, true));
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: signalling a process group we created; no memory is shared.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
