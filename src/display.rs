// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Coloured text output for the setup commands
//!
//! Every printer writes to a caller-supplied writer; `main` passes stdout.
//! Colour is on by default; `main` turns it off when stdout is not a
//! terminal or `NO_COLOR` is set.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use crate::bootstrap::{InstallReport, StepStatus};
use crate::config::{SeedOutcome, Severity, ValidationReport};
use crate::container::{DockerfileWrite, VolumeReport};
use crate::doctor::DoctorReport;
use crate::error::Result;
use crate::maintenance::CleanReport;
use crate::utils::format_size;

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Enable or disable ANSI colour for every printer.
pub fn set_color(enabled: bool) {
    COLOR_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Colour only when stdout is a terminal and `NO_COLOR` is unset.
pub fn color_for_stdout() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn colored<W: Write>(out: &mut W, color: Color, text: &str) -> Result<()> {
    if !COLOR_ENABLED.load(Ordering::Relaxed) {
        write!(out, "{}", text)?;
        return Ok(());
    }
    out.execute(SetForegroundColor(color))?;
    write!(out, "{}", text)?;
    out.execute(ResetColor)?;
    Ok(())
}

fn mark<W: Write>(out: &mut W, ok: bool) -> Result<()> {
    if ok {
        colored(out, Color::Green, "  ✓ ")
    } else {
        colored(out, Color::Red, "  ✗ ")
    }
}

fn skip_mark<W: Write>(out: &mut W) -> Result<()> {
    colored(out, Color::DarkGrey, "  - ")
}

/// Highlighted follow-up for the operator
pub fn print_notice<W: Write>(out: &mut W, notice: &str) -> Result<()> {
    writeln!(out)?;
    colored(out, Color::Yellow, notice)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_install_report<W: Write>(out: &mut W, report: &InstallReport) -> Result<()> {
    for step in &report.steps {
        match step.status {
            StepStatus::Done => mark(out, true)?,
            StepStatus::Skipped => skip_mark(out)?,
        }
        write!(out, "{:<22}", step.step)?;
        colored(out, Color::DarkGrey, &step.detail)?;
        writeln!(out)?;
    }
    if let Some(notice) = report.notice() {
        print_notice(out, &notice)?;
    }
    Ok(())
}

pub fn print_seed_outcome<W: Write>(out: &mut W, outcome: &SeedOutcome) -> Result<()> {
    match outcome {
        SeedOutcome::Created { path } => {
            mark(out, true)?;
            writeln!(out, "created {}", path.display())?;
        }
        SeedOutcome::AlreadyPresent { path } => {
            skip_mark(out)?;
            writeln!(out, "{} already present, left unchanged", path.display())?;
        }
    }
    if let Some(notice) = outcome.notice() {
        print_notice(out, &notice)?;
    }
    Ok(())
}

pub fn print_validation<W: Write>(out: &mut W, report: &ValidationReport) -> Result<()> {
    if report.is_clean() {
        mark(out, true)?;
        writeln!(out, "config looks good")?;
        return Ok(());
    }

    for issue in &report.issues {
        let color = match issue.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };
        colored(out, color, &format!("  {:<8}", issue.severity.to_string()))?;
        writeln!(out, "{}: {}", issue.field, issue.message)?;
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    writeln!(out, "\n{} error(s), {} warning(s)", errors, warnings)?;
    Ok(())
}

pub fn print_doctor<W: Write>(out: &mut W, report: &DoctorReport) -> Result<()> {
    for check in &report.checks {
        if check.passed {
            mark(out, true)?;
        } else if check.required {
            mark(out, false)?;
        } else {
            colored(out, Color::Yellow, "  ! ")?;
        }
        write!(out, "{:<14}", check.name)?;
        colored(out, Color::DarkGrey, &check.message)?;
        writeln!(out)?;
        if !check.passed {
            if let Some(fix) = &check.fix_command {
                writeln!(out, "      Fix: {}", fix)?;
            }
        }
    }

    writeln!(out)?;
    if report.passed {
        colored(out, Color::Green, "Ready.")?;
    } else {
        colored(out, Color::Red, "Required checks failed.")?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn print_dockerfile_write<W: Write>(
    out: &mut W,
    path: &std::path::Path,
    outcome: DockerfileWrite,
) -> Result<()> {
    match outcome {
        DockerfileWrite::Written => {
            mark(out, true)?;
            writeln!(out, "wrote {}", path.display())?;
        }
        DockerfileWrite::Unchanged => {
            skip_mark(out)?;
            writeln!(out, "{} is up to date", path.display())?;
        }
    }
    Ok(())
}

pub fn print_volume_report<W: Write>(out: &mut W, report: &VolumeReport) -> Result<()> {
    for volume in &report.declared {
        mark(out, true)?;
        writeln!(out, "volume {}", volume)?;
    }
    for volume in &report.missing {
        mark(out, false)?;
        writeln!(out, "volume {} not declared by {}", volume, report.image)?;
    }
    Ok(())
}

pub fn print_clean_report<W: Write>(out: &mut W, report: &CleanReport) -> Result<()> {
    if let Some(temp) = &report.temp {
        mark(out, true)?;
        writeln!(
            out,
            "temp/: removed {} file(s), {}",
            temp.files_removed,
            format_size(temp.bytes_freed)
        )?;
    }
    if let Some(cache) = &report.cache {
        mark(out, true)?;
        writeln!(
            out,
            "cache/: removed {} expired and {} corrupt of {}, kept {}, {}",
            cache.removed_expired,
            cache.removed_corrupt,
            cache.examined,
            cache.kept,
            format_size(cache.bytes_freed)
        )?;
    }
    writeln!(out, "Freed {}", format_size(report.bytes_freed()))?;
    Ok(())
}
