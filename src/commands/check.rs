// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `check`: validate the live bot config

use std::io::Write;

use super::{emit_json, CommandContext};
use crate::cli::CheckArgs;
use crate::config::{validate, BotConfig, ValidationReport};
use crate::display;
use crate::error::{Result, SetupError};

pub fn execute<W: Write>(
    ctx: &CommandContext<'_>,
    args: &CheckArgs,
    out: &mut W,
) -> Result<ValidationReport> {
    let path = match &args.path {
        Some(path) => ctx.layout.resolve(path),
        None => ctx.layout.config_path(),
    };
    let config = BotConfig::load(&path)?;
    let report = validate(&config, &ctx.layout, ctx.env_bot_token.as_deref());

    if ctx.json() {
        emit_json(out, &report)?;
    } else {
        display::print_validation(out, &report)?;
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if errors > 0 || (args.strict && warnings > 0) {
        return Err(SetupError::Validation(format!(
            "{}: {} error(s), {} warning(s)",
            path.display(),
            errors,
            warnings
        )));
    }
    Ok(report)
}
