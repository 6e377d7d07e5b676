// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations
//!
//! Each submodule exposes an `execute` that takes the shared
//! [`CommandContext`] and writes its report to `out`, either as coloured
//! text or as a single JSON document.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::error::Result;
use crate::layout::Layout;
use crate::runner::CommandRunner;

pub mod check;
pub mod clean;
pub mod doctor;
pub mod image;
pub mod install;
pub mod seed;

/// State shared by every subcommand
pub struct CommandContext<'a> {
    pub layout: Layout,
    pub settings: Settings,
    pub format: OutputFormat,
    pub runner: &'a dyn CommandRunner,
    /// Value of `TELEGRAM_BOT_TOKEN`, read once at startup
    pub env_bot_token: Option<String>,
}

impl<'a> CommandContext<'a> {
    pub fn new(layout: Layout, settings: Settings, runner: &'a dyn CommandRunner) -> Self {
        Self {
            layout,
            settings,
            format: OutputFormat::Text,
            runner,
            env_bot_token: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_env_bot_token(mut self, token: Option<String>) -> Self {
        self.env_bot_token = token;
        self
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub(crate) fn emit_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
