// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! First-run configuration seeding
//!
//! Copies `config/config.example.json` to `config/config.json` exactly once.
//! An existing live config is never touched, whatever it contains.

use std::fs::File;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Result, SetupError};
use crate::layout::Layout;
use crate::utils;

/// What seeding did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    /// The live config was created from the template
    Created { path: PathBuf },
    /// A live config already existed and was left alone
    AlreadyPresent { path: PathBuf },
}

impl SeedOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            SeedOutcome::Created { path } | SeedOutcome::AlreadyPresent { path } => path,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }

    /// One-line operator notice, only when the config was just created.
    pub fn notice(&self) -> Option<String> {
        match self {
            SeedOutcome::Created { path } => Some(format!(
                "Please edit {} with your bot token, admin users and region cookies.",
                path.display()
            )),
            SeedOutcome::AlreadyPresent { .. } => None,
        }
    }
}

/// Seed the live config from the template if it does not exist yet.
///
/// The template is copied byte for byte; neither file is parsed.
pub fn seed_config(layout: &Layout) -> Result<SeedOutcome> {
    let target = layout.config_path();
    if target.exists() {
        tracing::debug!("config already present: {}", target.display());
        return Ok(SeedOutcome::AlreadyPresent { path: target });
    }

    let template = layout.template_path();
    if !template.is_file() {
        return Err(SetupError::TemplateMissing(template));
    }

    let mut source = File::open(&template)?;
    let created = utils::write_new_file(&target, |dest| {
        std::io::copy(&mut source, dest)?;
        Ok(())
    })?;

    if created {
        tracing::info!(
            "seeded {} from {}",
            target.display(),
            template.display()
        );
        Ok(SeedOutcome::Created { path: target })
    } else {
        // Lost a race with another writer; theirs stays.
        Ok(SeedOutcome::AlreadyPresent { path: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout_with_template(contents: &str) -> (TempDir, Layout) {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        std::fs::create_dir_all(layout.config_dir()).unwrap();
        std::fs::write(layout.template_path(), contents).unwrap();
        (temp_dir, layout)
    }

    #[test]
    fn test_seed_creates_copy() {
        let (_temp, layout) = layout_with_template("{\"regions\": {}}\n");

        let outcome = seed_config(&layout).unwrap();

        assert!(outcome.created());
        assert_eq!(outcome.path(), &layout.config_path());
        assert_eq!(
            std::fs::read(layout.config_path()).unwrap(),
            std::fs::read(layout.template_path()).unwrap()
        );
    }

    #[test]
    fn test_seed_does_not_parse_template() {
        let (_temp, layout) = layout_with_template("this is not json");
        assert!(seed_config(&layout).unwrap().created());
    }

    #[test]
    fn test_seed_keeps_existing() {
        let (_temp, layout) = layout_with_template("{}");
        std::fs::write(layout.config_path(), "custom").unwrap();

        let outcome = seed_config(&layout).unwrap();

        assert!(!outcome.created());
        assert!(outcome.notice().is_none());
        assert_eq!(std::fs::read_to_string(layout.config_path()).unwrap(), "custom");
    }

    #[test]
    fn test_seed_without_template_fails() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        std::fs::create_dir_all(layout.config_dir()).unwrap();

        let err = seed_config(&layout).unwrap_err();
        assert!(matches!(err, SetupError::TemplateMissing(_)));
        assert!(!layout.config_path().exists());
    }

    #[test]
    fn test_notice_mentions_path() {
        let outcome = SeedOutcome::Created {
            path: PathBuf::from("config/config.json"),
        };
        assert!(outcome.notice().unwrap().contains("config/config.json"));
    }
}
