// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

use super::merge;
use super::Settings;

/// Project-local settings file, looked up in the deployment root
pub const PROJECT_SETTINGS_FILE: &str = "amdl-setup.toml";

/// Overrides the user-global settings directory
pub const ENV_SETUP_HOME: &str = "AMDL_SETUP_HOME";
/// Overrides `environment.python`
pub const ENV_PYTHON: &str = "AMDL_PYTHON";
/// Overrides `image.tag`
pub const ENV_IMAGE_TAG: &str = "AMDL_IMAGE_TAG";
/// Overrides `image.docker`
pub const ENV_DOCKER: &str = "AMDL_DOCKER";

impl Settings {
    /// User-global settings directory (`$AMDL_SETUP_HOME` or the platform
    /// config dir).
    pub fn setup_home() -> PathBuf {
        if let Ok(home) = std::env::var(ENV_SETUP_HOME) {
            return PathBuf::from(home);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("amdl-setup")
    }

    /// User-global settings file.
    pub fn user_path() -> PathBuf {
        Self::setup_home().join("setup.toml")
    }

    /// Project settings file under `root`.
    pub fn project_path(root: &Path) -> PathBuf {
        root.join(PROJECT_SETTINGS_FILE)
    }

    /// Load all layers for a deployment rooted at `root`.
    ///
    /// `explicit` replaces the project file and must exist.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut layers = vec![Self::user_path()];
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(SetupError::Config(format!(
                        "settings file not found: {}",
                        path.display()
                    )));
                }
                layers.push(path.to_path_buf());
            }
            None => layers.push(Self::project_path(root)),
        }

        let mut settings = Self::load_layers(&layers)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load settings from a single file; missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_layers(&[path.to_path_buf()])
    }

    /// Merge each existing file over the defaults, later paths winning.
    pub fn load_layers(paths: &[PathBuf]) -> Result<Self> {
        let mut value = serde_json::to_value(Self::default())?;

        for path in paths {
            if !path.is_file() {
                tracing::debug!("settings layer absent: {}", path.display());
                continue;
            }
            let content = std::fs::read_to_string(path)?;
            let layer: toml::Value = toml::from_str(&content).map_err(|e| {
                SetupError::Toml(format!("{}: {}", path.display(), e))
            })?;
            tracing::debug!("applying settings layer: {}", path.display());
            value = merge::deep_merge(value, serde_json::to_value(layer)?);
        }

        let settings: Settings = serde_json::from_value(value)?;
        Ok(settings)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(python) = non_empty(ENV_PYTHON) {
            self.environment.python = python;
        }
        if let Some(tag) = non_empty(ENV_IMAGE_TAG) {
            self.image.tag = tag;
        }
        if let Some(docker) = non_empty(ENV_DOCKER) {
            self.image.docker = docker;
        }
    }
}
