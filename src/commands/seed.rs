// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `seed` and `template`

use std::io::Write;

use serde::Serialize;

use super::{emit_json, CommandContext};
use crate::config::template::write_builtin_template;
use crate::config::{seed_config, SeedOutcome};
use crate::display;
use crate::error::Result;

pub fn execute<W: Write>(ctx: &CommandContext<'_>, out: &mut W) -> Result<SeedOutcome> {
    let outcome = seed_config(&ctx.layout)?;
    if ctx.json() {
        emit_json(out, &outcome)?;
    } else {
        display::print_seed_outcome(out, &outcome)?;
    }
    Ok(outcome)
}

#[derive(Serialize)]
struct TemplateResult {
    path: String,
    written: bool,
}

/// Write the built-in template if the checkout lacks one.
pub fn execute_template<W: Write>(ctx: &CommandContext<'_>, out: &mut W) -> Result<bool> {
    let written = write_builtin_template(&ctx.layout)?;
    let path = ctx.layout.template_path();

    if ctx.json() {
        emit_json(
            out,
            &TemplateResult {
                path: path.display().to_string(),
                written,
            },
        )?;
    } else if written {
        writeln!(out, "  wrote {}", path.display())?;
    } else {
        writeln!(out, "  {} already present, left unchanged", path.display())?;
    }
    Ok(written)
}
