// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Dockerfile rendering
//!
//! The template is compiled into the binary and rendered with Tera, so the
//! output depends only on the [`ImageSpec`].

use std::path::Path;

use tera::{Context, Tera};

use super::ImageSpec;
use crate::error::{Result, SetupError};

const TEMPLATE_NAME: &str = "Dockerfile";
const TEMPLATE: &str = include_str!("../../templates/Dockerfile.tera");

/// Render the Dockerfile for `spec`.
pub fn render_dockerfile(spec: &ImageSpec) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let mut context = Context::new();
    context.insert("base_image", &spec.base_image);
    context.insert("config_path", &spec.config_path());
    context.insert("system_packages", &spec.system_packages);
    context.insert("app_dir", &spec.app_dir);
    context.insert("requirements", &spec.requirements);
    context.insert("directories", &spec.directory_names());
    context.insert("volumes", &spec.volume_names());
    context.insert("entry_point", &serde_json::to_string(&spec.entry_point)?);

    let rendered = tera.render(TEMPLATE_NAME, &context)?;
    tracing::debug!("rendered Dockerfile ({} bytes)", rendered.len());
    Ok(rendered)
}

/// What happened when writing the Dockerfile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockerfileWrite {
    Written,
    Unchanged,
}

/// Write `content` to `path`.
///
/// An identical file is left alone. A different file is only replaced when
/// `force` is set, so hand-maintained Dockerfiles are not lost.
pub fn write_rendered(path: &Path, content: &str, force: bool) -> Result<DockerfileWrite> {
    if path.exists() {
        let existing = std::fs::read_to_string(path)?;
        if existing == content {
            return Ok(DockerfileWrite::Unchanged);
        }
        if !force {
            return Err(SetupError::InvalidInput(format!(
                "{} exists and differs from the generated one; pass --force to replace it",
                path.display()
            )));
        }
        tracing::warn!("replacing existing {}", path.display());
    }

    std::fs::write(path, content)?;
    tracing::info!("wrote {}", path.display());
    Ok(DockerfileWrite::Written)
}
