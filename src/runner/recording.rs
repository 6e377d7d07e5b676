// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Recording command runner for testing
//!
//! Records every invocation instead of launching processes. Individual steps
//! can be scripted to fail or to return captured output.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::Result;

/// A fake runner that never spawns anything
#[derive(Clone, Default)]
pub struct RecordingRunner {
    /// Every spec passed to `run`, in order
    invocations: Arc<Mutex<Vec<CommandSpec>>>,
    /// Scripted results keyed by step name
    responses: Arc<Mutex<HashMap<String, CommandOutput>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Recording runner lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command of `step` exit with `code`.
    pub fn fail_step(self, step: impl Into<String>, code: i32) -> Self {
        lock(&self.responses).insert(step.into(), CommandOutput::failure(code));
        self
    }

    /// Make every command of `step` succeed with the given stdout.
    pub fn with_stdout(self, step: impl Into<String>, stdout: impl Into<String>) -> Self {
        lock(&self.responses).insert(
            step.into(),
            CommandOutput {
                code: Some(0),
                stdout: stdout.into(),
            },
        );
        self
    }

    /// Snapshot of recorded invocations
    pub fn invocations(&self) -> Vec<CommandSpec> {
        lock(&self.invocations).clone()
    }

    /// Step names of recorded invocations, in order
    pub fn steps(&self) -> Vec<String> {
        lock(&self.invocations)
            .iter()
            .map(|spec| spec.step.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        lock(&self.invocations).push(spec.clone());
        let output = lock(&self.responses)
            .get(&spec.step)
            .cloned()
            .unwrap_or_else(CommandOutput::success);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_runner_defaults_to_success() {
        let runner = RecordingRunner::new();
        let output = runner.run(&CommandSpec::new("a", "true")).await.unwrap();
        assert!(output.is_success());
        assert_eq!(runner.steps(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_recording_runner_scripted_stdout() {
        let runner = RecordingRunner::new().with_stdout("inspect", "{}");
        let output = runner
            .run(&CommandSpec::new("inspect", "docker"))
            .await
            .unwrap();
        assert_eq!(output.stdout, "{}");
    }

    #[tokio::test]
    async fn test_recording_runner_clone_shares_log() {
        let runner = RecordingRunner::new();
        let clone = runner.clone();
        clone.run(&CommandSpec::new("x", "true")).await.unwrap();
        assert_eq!(runner.invocations().len(), 1);
    }
}
