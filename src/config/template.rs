// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Built-in configuration template
//!
//! For checkouts that lost `config/config.example.json`. Writing it never
//! replaces an existing template.

use std::io::Write;

use crate::error::Result;
use crate::layout::{Layout, LayoutDir};
use crate::utils;

/// The template shipped with this tool
pub const BUILTIN_TEMPLATE: &str = include_str!("../../config/config.example.json");

/// Write the built-in template unless one exists. Returns `true` when written.
pub fn write_builtin_template(layout: &Layout) -> Result<bool> {
    layout.ensure_dirs(&[LayoutDir::Config])?;
    let path = layout.template_path();
    let written = utils::write_new_file(&path, |file| {
        file.write_all(BUILTIN_TEMPLATE.as_bytes())?;
        Ok(())
    })?;
    if written {
        tracing::info!("wrote built-in template to {}", path.display());
    }
    Ok(written)
}
