// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ImageSpec;
use crate::error::{Result, SetupError};
use crate::layout::Layout;
use crate::runner::{run_checked, CommandRunner, CommandSpec};

pub const STEP_BUILD_IMAGE: &str = "build-image";
pub const STEP_VERIFY_IMAGE: &str = "verify-image";

const VOLUMES_FORMAT: &str = "{{json .Config.Volumes}}";

/// Build the image from the Dockerfile at its configured path.
///
/// Build output streams to the terminal. A non-zero exit aborts.
pub async fn build_image(
    runner: &dyn CommandRunner,
    layout: &Layout,
    spec: &ImageSpec,
) -> Result<()> {
    let dockerfile = spec.dockerfile_path(layout);
    if !dockerfile.is_file() {
        return Err(SetupError::Config(format!(
            "Dockerfile not found: {} (run 'amdl-setup dockerfile' first)",
            dockerfile.display()
        )));
    }

    let command = CommandSpec::new(STEP_BUILD_IMAGE, &spec.docker)
        .args(["build", "-t", spec.tag.as_str(), "-f"])
        .path_arg(&dockerfile)
        .path_arg(layout.root())
        .current_dir(layout.root());
    run_checked(runner, &command).await?;

    tracing::info!("built image {}", spec.tag);
    Ok(())
}

/// Volumes an image declares compared with the ones it must declare
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeReport {
    pub image: String,
    pub declared: Vec<String>,
    pub missing: Vec<String>,
}

impl VolumeReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Inspect a built image and check its declared volumes.
pub async fn verify_image(runner: &dyn CommandRunner, spec: &ImageSpec) -> Result<VolumeReport> {
    let command = CommandSpec::new(STEP_VERIFY_IMAGE, &spec.docker)
        .args(["image", "inspect", "--format", VOLUMES_FORMAT, spec.tag.as_str()])
        .capture_stdout();
    let output = run_checked(runner, &command).await?;

    let declared = parse_volumes(&output.stdout)?;
    let missing: Vec<String> = spec
        .volume_paths()
        .into_iter()
        .filter(|path| !declared.contains(path))
        .collect();

    if !missing.is_empty() {
        tracing::warn!("image {} lacks volumes: {}", spec.tag, missing.join(", "));
    }

    Ok(VolumeReport {
        image: spec.tag.clone(),
        declared,
        missing,
    })
}

// `docker image inspect` prints `null` for an image without volumes and an
// object keyed by path otherwise.
fn parse_volumes(stdout: &str) -> Result<Vec<String>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(SetupError::InvalidInput(
            "image inspect produced no output".to_string(),
        ));
    }

    let volumes: Option<BTreeMap<String, serde_json::Value>> = serde_json::from_str(trimmed)?;
    Ok(volumes.map(|v| v.into_keys().collect()).unwrap_or_default())
}
