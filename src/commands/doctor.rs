// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::io::Write;

use super::{emit_json, CommandContext};
use crate::display;
use crate::doctor::{run_checks, DoctorReport};
use crate::error::{Result, SetupError};

pub fn execute<W: Write>(ctx: &CommandContext<'_>, out: &mut W) -> Result<DoctorReport> {
    let report = run_checks(&ctx.layout, &ctx.settings);

    if ctx.json() {
        emit_json(out, &report)?;
    } else {
        display::print_doctor(out, &report)?;
    }

    if !report.passed {
        let failed: Vec<&str> = report
            .failures()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect();
        return Err(SetupError::Validation(format!(
            "required checks failed: {}",
            failed.join(", ")
        )));
    }
    Ok(report)
}
