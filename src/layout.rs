// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! On-disk layout of a bot deployment
//!
//! Both deployment paths converge on the same tree under the working
//! directory:
//!
//! ```text
//! <root>/
//!   downloads/    finished media
//!   temp/         in-flight downloads
//!   cache/        API response cache (container path creates it up front)
//!   config/
//!     config.example.json   template shipped with the checkout
//!     config.json           live config, seeded once
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Directory name for finished downloads
pub const DOWNLOADS_DIR: &str = "downloads";
/// Directory name for in-flight downloads
pub const TEMP_DIR: &str = "temp";
/// Directory name for configuration files
pub const CONFIG_DIR: &str = "config";
/// Directory name for the response cache
pub const CACHE_DIR: &str = "cache";
/// Live configuration file name
pub const CONFIG_FILE: &str = "config.json";
/// Template configuration file name
pub const TEMPLATE_FILE: &str = "config.example.json";

/// One of the well-known directories of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDir {
    Downloads,
    Temp,
    Config,
    Cache,
}

impl LayoutDir {
    /// Directories scaffolded by the bare-metal bootstrapper
    pub const BOOTSTRAP: [LayoutDir; 3] = [LayoutDir::Downloads, LayoutDir::Temp, LayoutDir::Config];

    /// Directories created inside the container image
    pub const CONTAINER: [LayoutDir; 4] = [
        LayoutDir::Downloads,
        LayoutDir::Temp,
        LayoutDir::Config,
        LayoutDir::Cache,
    ];

    /// Directories declared as persistent container volumes
    pub const VOLUMES: [LayoutDir; 3] = [LayoutDir::Downloads, LayoutDir::Config, LayoutDir::Cache];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutDir::Downloads => DOWNLOADS_DIR,
            LayoutDir::Temp => TEMP_DIR,
            LayoutDir::Config => CONFIG_DIR,
            LayoutDir::Cache => CACHE_DIR,
        }
    }
}

impl fmt::Display for LayoutDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/", self.name())
    }
}

/// Paths of a deployment rooted at a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, dir: LayoutDir) -> PathBuf {
        self.root.join(dir.name())
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.dir(LayoutDir::Downloads)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.dir(LayoutDir::Temp)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir(LayoutDir::Config)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir(LayoutDir::Cache)
    }

    /// Live configuration file (`config/config.json`)
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILE)
    }

    /// Configuration template (`config/config.example.json`)
    pub fn template_path(&self) -> PathBuf {
        self.config_dir().join(TEMPLATE_FILE)
    }

    /// Resolve a path from the config file against the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Create any of `dirs` that are missing. Existing directories and their
    /// contents are left untouched. Returns the directories that were created.
    pub fn ensure_dirs(&self, dirs: &[LayoutDir]) -> Result<Vec<LayoutDir>> {
        let mut created = Vec::new();
        for &dir in dirs {
            let path = self.dir(dir);
            if path.is_dir() {
                tracing::debug!("directory already present: {}", path.display());
                continue;
            }
            std::fs::create_dir_all(&path)?;
            tracing::info!("created directory {}", path.display());
            created.push(dir);
        }
        Ok(created)
    }

    /// Directories from `dirs` that do not exist yet.
    pub fn missing_dirs(&self, dirs: &[LayoutDir]) -> Vec<LayoutDir> {
        dirs.iter()
            .copied()
            .filter(|dir| !self.dir(*dir).is_dir())
            .collect()
    }
}
