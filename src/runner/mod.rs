// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! External command execution
//!
//! Every program the setup flow launches (the Python interpreter, pip, the
//! container build tool) goes through a [`CommandRunner`]. Production code
//! uses [`SystemRunner`]; tests use [`RecordingRunner`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SetupError};

pub mod recording;
mod system;

pub use recording::RecordingRunner;
pub use system::SystemRunner;

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name of the setup step that owns this command
    pub step: String,
    /// Program to launch (looked up on PATH when not a path)
    pub program: String,
    /// Arguments, passed without shell interpretation
    pub args: Vec<String>,
    /// Working directory for the child
    pub current_dir: Option<PathBuf>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// Capture stdout instead of streaming it to the terminal
    pub capture_stdout: bool,
    /// Kill the child after this long
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(step: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
            capture_stdout: false,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty unless capture was requested)
    pub stdout: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            stdout: String::new(),
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external programs
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion. A non-zero exit is not an error at
    /// this level; see [`run_checked`].
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Run a command and turn a non-zero exit into [`SetupError::CommandFailed`].
pub async fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput> {
    tracing::info!(step = %spec.step, "running: {}", spec);
    let output = runner.run(spec).await?;
    if output.is_success() {
        Ok(output)
    } else {
        tracing::warn!(step = %spec.step, code = ?output.code, "command failed: {}", spec);
        Err(SetupError::CommandFailed {
            step: spec.step.clone(),
            program: spec.program.clone(),
            code: output.code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("create-environment", "python3")
            .args(["-m", "venv"])
            .path_arg(Path::new(".venv"))
            .env("PIP_NO_INPUT", "1")
            .timeout(Some(Duration::from_secs(5)));

        assert_eq!(spec.step, "create-environment");
        assert_eq!(spec.args, vec!["-m", "venv", ".venv"]);
        assert_eq!(spec.env, vec![("PIP_NO_INPUT".to_string(), "1".to_string())]);
        assert_eq!(spec.timeout, Some(Duration::from_secs(5)));
        assert!(!spec.capture_stdout);
    }

    #[test]
    fn test_command_spec_display_quotes_whitespace() {
        let spec = CommandSpec::new("build-image", "docker")
            .args(["build", "-t", "bot:latest"])
            .arg("/path with space");
        assert_eq!(
            spec.to_string(),
            "docker build -t bot:latest \"/path with space\""
        );
    }

    #[test]
    fn test_command_output_success() {
        assert!(CommandOutput::success().is_success());
        assert!(!CommandOutput::failure(1).is_success());
        assert!(!CommandOutput::default().is_success());
    }

    #[test]
    fn test_run_checked_maps_failure() {
        let runner = RecordingRunner::new().fail_step("install-dependencies", 1);
        let spec = CommandSpec::new("install-dependencies", "pip");

        let err = tokio_test::block_on(run_checked(&runner, &spec)).unwrap_err();
        match err {
            SetupError::CommandFailed { step, program, code } => {
                assert_eq!(step, "install-dependencies");
                assert_eq!(program, "pip");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_checked_passes_success() {
        let runner = RecordingRunner::new();
        let spec = CommandSpec::new("noop", "true");
        let output = tokio_test::block_on(run_checked(&runner, &spec)).unwrap();
        assert!(output.is_success());
        assert_eq!(runner.invocations().len(), 1);
    }
}
