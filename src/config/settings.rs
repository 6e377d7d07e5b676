// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings for amdl-setup itself
//!
//! Layered from built-in defaults, the user-global `setup.toml`, the
//! project's `amdl-setup.toml`, environment variables and finally CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod io;
mod merge;

pub use io::{ENV_DOCKER, ENV_IMAGE_TAG, ENV_PYTHON, ENV_SETUP_HOME, PROJECT_SETTINGS_FILE};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Bare-metal environment settings
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Container image settings
    #[serde(default)]
    pub image: ImageConfig,

    /// Cleanup settings
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Python environment used by the bare-metal bootstrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    /// Interpreter used to create the virtualenv
    #[serde(default = "default_python")]
    pub python: String,

    /// Virtualenv directory, relative to the root
    #[serde(default = "default_venv_dir")]
    pub venv_dir: PathBuf,

    /// Requirements file, relative to the root
    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,

    /// Upgrade pip before installing requirements
    #[serde(default = "default_true")]
    pub upgrade_pip: bool,

    /// Per-command timeout; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
}

/// Container image definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageConfig {
    /// Tag applied to the built image
    #[serde(default = "default_image_tag")]
    pub tag: String,

    /// Python base image
    #[serde(default = "default_base_image")]
    pub base_image: String,

    /// System packages providing the media tools
    #[serde(default = "default_system_packages")]
    pub system_packages: Vec<String>,

    /// Default container command
    #[serde(default = "default_entry_point")]
    pub entry_point: Vec<String>,

    /// Where the rendered Dockerfile is written, relative to the root
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,

    /// Container build tool
    #[serde(default = "default_docker")]
    pub docker: String,
}

/// Cache and temp cleanup settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceConfig {
    /// Cache entries older than this are pruned
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
}

fn default_python() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

fn default_venv_dir() -> PathBuf {
    PathBuf::from(".venv")
}

fn default_requirements() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_true() -> bool {
    true
}

fn default_image_tag() -> String {
    "apple-music-bot:latest".to_string()
}

fn default_base_image() -> String {
    "python:3.11-slim".to_string()
}

fn default_system_packages() -> Vec<String> {
    vec!["ffmpeg".to_string(), "gpac".to_string()]
}

fn default_entry_point() -> Vec<String> {
    vec!["python".to_string(), "main.py".to_string()]
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

fn default_docker() -> String {
    "docker".to_string()
}

fn default_cache_max_age_secs() -> u64 {
    3600
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            venv_dir: default_venv_dir(),
            requirements: default_requirements(),
            upgrade_pip: true,
            command_timeout_secs: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            tag: default_image_tag(),
            base_image: default_base_image(),
            system_packages: default_system_packages(),
            entry_point: default_entry_point(),
            dockerfile: default_dockerfile(),
            docker: default_docker(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            cache_max_age_secs: default_cache_max_age_secs(),
        }
    }
}

impl MaintenanceConfig {
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.environment.venv_dir, PathBuf::from(".venv"));
        assert!(settings.environment.upgrade_pip);
        assert!(settings.environment.command_timeout().is_none());
        assert_eq!(settings.image.system_packages, vec!["ffmpeg", "gpac"]);
        assert_eq!(settings.image.entry_point, vec!["python", "main.py"]);
        assert_eq!(settings.maintenance.cache_max_age(), Duration::from_secs(3600));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [image]
            tag = "bot:dev"
            "#,
        )
        .unwrap();
        assert_eq!(settings.image.tag, "bot:dev");
        assert_eq!(settings.image.base_image, "python:3.11-slim");
        assert_eq!(settings.environment, EnvironmentConfig::default());
    }

    #[test]
    fn test_command_timeout_conversion() {
        let env = EnvironmentConfig {
            command_timeout_secs: Some(90),
            ..Default::default()
        };
        assert_eq!(env.command_timeout(), Some(Duration::from_secs(90)));
    }
}
