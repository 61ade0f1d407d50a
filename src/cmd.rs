use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{DeployError, DeployResult};

/// One external tool call: program, arguments, and the
/// directory to run it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Arguments as string slices, handy for matching.
    #[must_use]
    pub fn arg_strs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes external tools. Every step of the sequencer goes
/// through this seam so it can be swapped out in tests.
pub trait Runner {
    /// Run a command and capture its trimmed stdout. Fails if
    /// the command returns a non-zero exit code.
    fn output(&self, invocation: &Invocation) -> DeployResult<String>;

    /// Run a command with stdin/stdout/stderr inherited.
    fn status(&self, invocation: &Invocation) -> DeployResult<()>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Runner for SystemRunner {
    fn output(&self, invocation: &Invocation) -> DeployResult<String> {
        tracing::info!(command = %invocation, "running");

        let output = command(invocation)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| spawn_error(&invocation.program, e))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            tracing::debug!(command = %invocation, %stdout, "captured output");
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(command = %invocation, %stderr, "command failed");
            Err(failed(invocation, output.status))
        }
    }

    fn status(&self, invocation: &Invocation) -> DeployResult<()> {
        tracing::info!(command = %invocation, "running");

        let status = command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(&invocation.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(failed(invocation, status))
        }
    }
}

fn command(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    if let Some(dir) = &invocation.cwd {
        cmd.current_dir(dir);
    }
    cmd
}

fn spawn_error(program: &str, e: io::Error) -> DeployError {
    if e.kind() == io::ErrorKind::NotFound {
        DeployError::CommandNotFound(program.to_string())
    } else {
        DeployError::Io(e)
    }
}

fn failed(invocation: &Invocation, status: ExitStatus) -> DeployError {
    DeployError::CommandFailed {
        command: invocation.to_string(),
        code: status.code(),
    }
}
