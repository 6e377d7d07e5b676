// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Bare-metal environment bootstrapper
//!
//! Runs the install steps strictly in order:
//!
//! 1. create the Python virtualenv (skipped when one already exists)
//! 2. install requirements into it
//! 3. scaffold `downloads/`, `temp/`, `config/`
//! 4. seed `config/config.json`
//!
//! The first failure aborts the run. Nothing is retried or rolled back.

use serde::Serialize;

use crate::config::{seed_config, EnvironmentConfig, SeedOutcome};
use crate::error::{Result, SetupError};
use crate::layout::{Layout, LayoutDir};
use crate::runner::{run_checked, CommandRunner, CommandSpec};

mod venv;

pub use venv::Venv;

pub const STEP_CREATE_ENVIRONMENT: &str = "create-environment";
pub const STEP_INSTALL_DEPENDENCIES: &str = "install-dependencies";
pub const STEP_SCAFFOLD_DIRECTORIES: &str = "scaffold-directories";
pub const STEP_SEED_CONFIGURATION: &str = "seed-configuration";

/// Which install steps to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub create_environment: bool,
    pub install_dependencies: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            create_environment: true,
            install_dependencies: true,
        }
    }
}

/// How a single step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: &'static str,
    pub status: StepStatus,
    pub detail: String,
}

/// Summary of a successful install
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub steps: Vec<StepReport>,
    pub created_dirs: Vec<LayoutDir>,
    pub seed: SeedOutcome,
}

impl InstallReport {
    /// Operator notice to print once the run finishes
    pub fn notice(&self) -> Option<String> {
        self.seed.notice()
    }
}

/// Prepares a working directory for running the bot without containers
pub struct Bootstrapper<'a> {
    layout: &'a Layout,
    env: &'a EnvironmentConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(layout: &'a Layout, env: &'a EnvironmentConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            layout,
            env,
            runner,
        }
    }

    fn venv(&self) -> Venv {
        Venv::new(self.layout.resolve(&self.env.venv_dir))
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn install(&self, options: InstallOptions) -> Result<InstallReport> {
        let mut steps = Vec::with_capacity(4);

        steps.push(if options.create_environment {
            self.create_environment().await?
        } else {
            skipped(STEP_CREATE_ENVIRONMENT, "disabled by flag")
        });

        steps.push(if options.install_dependencies {
            self.install_dependencies().await?
        } else {
            skipped(STEP_INSTALL_DEPENDENCIES, "disabled by flag")
        });

        let created_dirs = self.scaffold_directories()?;
        steps.push(StepReport {
            step: STEP_SCAFFOLD_DIRECTORIES,
            status: if created_dirs.is_empty() {
                StepStatus::Skipped
            } else {
                StepStatus::Done
            },
            detail: describe_dirs(&created_dirs),
        });

        let seed = seed_config(self.layout)?;
        steps.push(StepReport {
            step: STEP_SEED_CONFIGURATION,
            status: if seed.created() {
                StepStatus::Done
            } else {
                StepStatus::Skipped
            },
            detail: match &seed {
                SeedOutcome::Created { path } => format!("created {}", path.display()),
                SeedOutcome::AlreadyPresent { path } => {
                    format!("{} already present", path.display())
                }
            },
        });

        tracing::info!("install finished in {}", self.layout.root().display());
        Ok(InstallReport {
            steps,
            created_dirs,
            seed,
        })
    }

    /// Create the virtualenv unless one is already there.
    pub async fn create_environment(&self) -> Result<StepReport> {
        let venv = self.venv();
        if venv.exists() {
            return Ok(skipped(
                STEP_CREATE_ENVIRONMENT,
                format!("{} already exists", venv.root().display()),
            ));
        }

        let spec = CommandSpec::new(STEP_CREATE_ENVIRONMENT, &self.env.python)
            .args(["-m", "venv"])
            .path_arg(venv.root())
            .current_dir(self.layout.root())
            .timeout(self.env.command_timeout());
        run_checked(self.runner, &spec).await?;

        Ok(StepReport {
            step: STEP_CREATE_ENVIRONMENT,
            status: StepStatus::Done,
            detail: format!("created {}", venv.root().display()),
        })
    }

    /// Install the requirements file with the virtualenv's pip.
    pub async fn install_dependencies(&self) -> Result<StepReport> {
        let requirements = self.layout.resolve(&self.env.requirements);
        if !requirements.is_file() {
            return Err(SetupError::Config(format!(
                "requirements file not found: {}",
                requirements.display()
            )));
        }

        let python = self.venv().python();
        let program = python.to_string_lossy().into_owned();

        if self.env.upgrade_pip {
            let spec = self
                .pip_command(&program)
                .args(["install", "--upgrade", "pip"]);
            run_checked(self.runner, &spec).await?;
        }

        let spec = self
            .pip_command(&program)
            .args(["install", "-r"])
            .path_arg(&requirements);
        run_checked(self.runner, &spec).await?;

        Ok(StepReport {
            step: STEP_INSTALL_DEPENDENCIES,
            status: StepStatus::Done,
            detail: format!("installed {}", requirements.display()),
        })
    }

    fn pip_command(&self, python: &str) -> CommandSpec {
        CommandSpec::new(STEP_INSTALL_DEPENDENCIES, python)
            .args(["-m", "pip"])
            .current_dir(self.layout.root())
            .env("PIP_DISABLE_PIP_VERSION_CHECK", "1")
            .timeout(self.env.command_timeout())
    }

    /// Create the bootstrap directories that are missing.
    pub fn scaffold_directories(&self) -> Result<Vec<LayoutDir>> {
        self.layout.ensure_dirs(&LayoutDir::BOOTSTRAP)
    }
}

fn skipped(step: &'static str, detail: impl Into<String>) -> StepReport {
    StepReport {
        step,
        status: StepStatus::Skipped,
        detail: detail.into(),
    }
}

fn describe_dirs(dirs: &[LayoutDir]) -> String {
    if dirs.is_empty() {
        return "all directories present".to_string();
    }
    let names: Vec<String> = dirs.iter().map(|d| d.to_string()).collect();
    format!("created {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn checkout() -> (TempDir, Layout) {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        std::fs::create_dir_all(layout.config_dir()).unwrap();
        std::fs::write(layout.template_path(), "{\"regions\": {}}").unwrap();
        std::fs::write(layout.root().join("requirements.txt"), "gamdl\n").unwrap();
        (temp_dir, layout)
    }

    #[tokio::test]
    async fn test_create_environment_runs_venv() {
        let (_temp, layout) = checkout();
        let env = EnvironmentConfig::default();
        let runner = RecordingRunner::new();

        let report = Bootstrapper::new(&layout, &env, &runner)
            .create_environment()
            .await
            .unwrap();

        assert_eq!(report.status, StepStatus::Done);
        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, env.python);
        assert_eq!(calls[0].args[..2], ["-m".to_string(), "venv".to_string()]);
    }

    #[tokio::test]
    async fn test_create_environment_skips_existing_venv() {
        let (_temp, layout) = checkout();
        let env = EnvironmentConfig::default();
        let venv_root = layout.resolve(&env.venv_dir);
        std::fs::create_dir_all(&venv_root).unwrap();
        std::fs::write(venv_root.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        let runner = RecordingRunner::new();

        let report = Bootstrapper::new(&layout, &env, &runner)
            .create_environment()
            .await
            .unwrap();

        assert_eq!(report.status, StepStatus::Skipped);
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_install_dependencies_without_pip_upgrade() {
        let (_temp, layout) = checkout();
        let env = EnvironmentConfig {
            upgrade_pip: false,
            ..Default::default()
        };
        let runner = RecordingRunner::new();

        Bootstrapper::new(&layout, &env, &runner)
            .install_dependencies()
            .await
            .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.contains(&"-r".to_string()));
        assert_eq!(
            PathBuf::from(&calls[0].program),
            Venv::new(layout.resolve(&env.venv_dir)).python()
        );
    }

    #[tokio::test]
    async fn test_install_dependencies_missing_requirements() {
        let (_temp, layout) = checkout();
        std::fs::remove_file(layout.root().join("requirements.txt")).unwrap();
        let env = EnvironmentConfig::default();
        let runner = RecordingRunner::new();

        let err = Bootstrapper::new(&layout, &env, &runner)
            .install_dependencies()
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::Config(_)));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_describe_dirs() {
        assert_eq!(describe_dirs(&[]), "all directories present");
        assert_eq!(
            describe_dirs(&[LayoutDir::Downloads, LayoutDir::Temp]),
            "created downloads/, temp/"
        );
    }
}
