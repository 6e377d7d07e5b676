// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Container image builder
//!
//! Renders a Dockerfile from [`ImageSpec`], writes it next to the bot
//! sources and drives the container build tool through a
//! [`CommandRunner`](crate::runner::CommandRunner).

use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::{Result, SetupError};
use crate::layout::{Layout, LayoutDir, CONFIG_DIR, CONFIG_FILE};

mod build;
mod dockerfile;

pub use build::{build_image, verify_image, VolumeReport, STEP_BUILD_IMAGE, STEP_VERIFY_IMAGE};
pub use dockerfile::{render_dockerfile, write_rendered, DockerfileWrite};

/// Application directory inside the image
pub const APP_DIR: &str = "/app";

/// Everything needed to render and build the bot image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub tag: String,
    pub base_image: String,
    pub system_packages: Vec<String>,
    pub entry_point: Vec<String>,
    /// Requirements file relative to the build context, `/`-separated
    pub requirements: String,
    /// Dockerfile location, relative to the root unless absolute
    pub dockerfile: PathBuf,
    pub docker: String,
    pub app_dir: String,
    pub directories: Vec<LayoutDir>,
    pub volumes: Vec<LayoutDir>,
}

impl ImageSpec {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let image = &settings.image;

        if image.tag.trim().is_empty() {
            return Err(SetupError::Config("image tag must not be empty".to_string()));
        }
        if image.entry_point.is_empty() {
            return Err(SetupError::Config(
                "image entry_point must name a command".to_string(),
            ));
        }

        Ok(Self {
            tag: image.tag.clone(),
            base_image: image.base_image.clone(),
            system_packages: image.system_packages.clone(),
            entry_point: image.entry_point.clone(),
            requirements: context_path(&settings.environment.requirements)?,
            dockerfile: image.dockerfile.clone(),
            docker: image.docker.clone(),
            app_dir: APP_DIR.to_string(),
            directories: LayoutDir::CONTAINER.to_vec(),
            volumes: LayoutDir::VOLUMES.to_vec(),
        })
    }

    /// Value of `CONFIG_PATH` inside the container
    pub fn config_path(&self) -> String {
        format!("{}/{}/{}", self.app_dir, CONFIG_DIR, CONFIG_FILE)
    }

    pub fn directory_names(&self) -> Vec<&'static str> {
        self.directories.iter().map(|d| d.name()).collect()
    }

    pub fn volume_names(&self) -> Vec<&'static str> {
        self.volumes.iter().map(|d| d.name()).collect()
    }

    /// Absolute in-container paths of the declared volumes
    pub fn volume_paths(&self) -> Vec<String> {
        self.volumes
            .iter()
            .map(|d| format!("{}/{}", self.app_dir, d.name()))
            .collect()
    }

    pub fn dockerfile_path(&self, layout: &Layout) -> PathBuf {
        layout.resolve(&self.dockerfile)
    }
}

/// Render the Dockerfile and write it to its configured location.
pub fn write_dockerfile(
    layout: &Layout,
    spec: &ImageSpec,
    force: bool,
) -> Result<(PathBuf, DockerfileWrite)> {
    let content = render_dockerfile(spec)?;
    let path = spec.dockerfile_path(layout);
    let outcome = write_rendered(&path, &content, force)?;
    Ok((path, outcome))
}

// COPY sources must stay inside the build context.
fn context_path(path: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(SetupError::Config(format!(
                    "requirements file must be inside the build context: {}",
                    path.display()
                )))
            }
        }
    }
    if parts.is_empty() {
        return Err(SetupError::Config(
            "requirements file path is empty".to_string(),
        ));
    }
    Ok(parts.join("/"))
}
