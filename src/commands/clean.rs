// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `clean`: empty `temp/` and prune `cache/`

use std::io::Write;
use std::time::Duration;

use chrono::Utc;

use super::{emit_json, CommandContext};
use crate::cli::CleanArgs;
use crate::display;
use crate::error::Result;
use crate::maintenance::{clean, CleanOptions, CleanReport};

pub fn execute<W: Write>(
    ctx: &CommandContext<'_>,
    args: &CleanArgs,
    out: &mut W,
) -> Result<CleanReport> {
    let options = CleanOptions {
        temp: !args.cache_only,
        cache: !args.temp_only,
        all: args.all,
    };
    let max_age = args
        .max_age
        .map(Duration::from_secs)
        .unwrap_or_else(|| ctx.settings.maintenance.cache_max_age());

    let report = clean(&ctx.layout, options, max_age, Utc::now())?;

    if ctx.json() {
        emit_json(out, &report)?;
    } else {
        display::print_clean_report(out, &report)?;
    }
    Ok(report)
}
