// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{Result, SetupError};

/// Runs commands as real child processes.
///
/// stderr always goes straight to the operator's terminal, as does stdout
/// unless the `CommandSpec` asks for it to be captured. With
/// [`stdout_to_stderr`](Self::stdout_to_stderr) uncaptured stdout joins
/// stderr, leaving our own stdout to the JSON report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if spec.capture_stdout {
            command.stdout(Stdio::piped());
        } else if self.stdout_to_stderr {
            command.stdout(std::io::stderr());
        } else {
            command.stdout(Stdio::inherit());
        }
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &spec.env {
            command.env(key, value);
        }

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SetupError::CommandNotFound(spec.program.clone())
            } else {
                SetupError::Io(e)
            }
        })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match spec.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SetupError::Timeout {
                        program: spec.program.clone(),
                        secs: limit.as_secs(),
                    })
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
