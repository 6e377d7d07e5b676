// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Preflight checks for a deployment
//!
//! Looks for the external tools the bot and the setup flow need, and for
//! the directory layout and configuration files. Docker and the local
//! virtualenv are advisory since only one deployment path needs each.

use std::path::PathBuf;

use serde::Serialize;

use crate::bootstrap::Venv;
use crate::config::{BotConfig, Settings};
use crate::layout::{Layout, LayoutDir};

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub passed: bool,
    /// A failed advisory check does not fail the report
    pub required: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_command: Option<String>,
}

impl CheckItem {
    fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            required: true,
            message: message.into(),
            fix_command: None,
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            required: true,
            message: message.into(),
            fix_command: Some(fix.into()),
        }
    }

    fn advisory(mut self) -> Self {
        self.required = false;
        self
    }
}

/// All checks of a doctor run
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub passed: bool,
    pub checks: Vec<CheckItem>,
}

impl DoctorReport {
    fn new(checks: Vec<CheckItem>) -> Self {
        let passed = checks.iter().all(|c| c.passed || !c.required);
        Self { passed, checks }
    }

    /// Checks that failed, required or not
    pub fn failures(&self) -> impl Iterator<Item = &CheckItem> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Run every check against the current `PATH`.
pub fn run_checks(layout: &Layout, settings: &Settings) -> DoctorReport {
    run_checks_with(layout, settings, crate::utils::find_program)
}

/// Run every check, resolving programs with `find`.
pub fn run_checks_with<F>(layout: &Layout, settings: &Settings, find: F) -> DoctorReport
where
    F: Fn(&str) -> Option<PathBuf>,
{
    let mut checks = vec![
        check_program(&find, &settings.environment.python, "install Python 3 and put it on PATH"),
        check_program(&find, "ffmpeg", "apt-get install ffmpeg"),
        check_program(&find, "MP4Box", "apt-get install gpac"),
        check_program(&find, &settings.image.docker, "install Docker (container deployments only)")
            .advisory(),
        check_venv(layout, settings),
    ];
    checks.extend(LayoutDir::BOOTSTRAP.iter().map(|&dir| check_dir(layout, dir)));
    checks.push(check_config_files(layout));

    let report = DoctorReport::new(checks);
    tracing::debug!(
        "doctor: {} checks, {} failed",
        report.checks.len(),
        report.failures().count()
    );
    report
}

fn check_program<F>(find: &F, program: &str, fix: &str) -> CheckItem
where
    F: Fn(&str) -> Option<PathBuf>,
{
    match find(program) {
        Some(path) => CheckItem::pass(program, format!("found at {}", path.display())),
        None => CheckItem::fail(program, "not found on PATH", fix),
    }
}

fn check_venv(layout: &Layout, settings: &Settings) -> CheckItem {
    let venv = Venv::new(layout.resolve(&settings.environment.venv_dir));
    let item = if venv.exists() {
        CheckItem::pass("virtualenv", venv.root().display().to_string())
    } else {
        CheckItem::fail(
            "virtualenv",
            format!("{} not created", venv.root().display()),
            "amdl-setup install",
        )
    };
    item.advisory()
}

fn check_dir(layout: &Layout, dir: LayoutDir) -> CheckItem {
    let name = dir.to_string();
    if layout.dir(dir).is_dir() {
        CheckItem::pass(name, "present")
    } else {
        CheckItem::fail(name, "missing", "amdl-setup install").advisory()
    }
}

fn check_config_files(layout: &Layout) -> CheckItem {
    let config = layout.config_path();
    if config.is_file() {
        return match BotConfig::load(&config) {
            Ok(_) => CheckItem::pass("config.json", "present and parseable"),
            Err(e) => CheckItem::fail("config.json", e.to_string(), "amdl-setup check"),
        };
    }

    if layout.template_path().is_file() {
        CheckItem::fail("config.json", "not seeded yet", "amdl-setup seed").advisory()
    } else {
        CheckItem::fail(
            "config.json",
            "neither config.json nor config.example.json exists",
            "amdl-setup template && amdl-setup seed",
        )
    }
}
