// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `install`: bare-metal setup

use std::io::Write;

use super::{emit_json, CommandContext};
use crate::bootstrap::{Bootstrapper, InstallOptions, InstallReport};
use crate::cli::InstallArgs;
use crate::display;
use crate::error::Result;

pub async fn execute<W: Write>(
    ctx: &CommandContext<'_>,
    args: &InstallArgs,
    out: &mut W,
) -> Result<InstallReport> {
    let mut env = ctx.settings.environment.clone();
    if let Some(python) = &args.python {
        env.python = python.clone();
    }

    let options = InstallOptions {
        create_environment: !args.skip_environment,
        install_dependencies: !args.skip_dependencies,
    };

    let report = Bootstrapper::new(&ctx.layout, &env, ctx.runner)
        .install(options)
        .await?;

    if ctx.json() {
        emit_json(out, &report)?;
    } else {
        display::print_install_report(out, &report)?;
    }
    Ok(report)
}
