// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use serde::Serialize;

use crate::error::Result;
use crate::layout::{Layout, LayoutDir};
use crate::utils::calculate_dir_size;

/// Outcome of emptying `temp/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TempReport {
    pub files_removed: usize,
    pub bytes_freed: u64,
}

/// Remove everything under `temp/` and leave an empty directory behind.
///
/// Leftovers there are partial downloads; nothing in `temp/` survives a
/// finished job. `temp/` itself is kept, so a symlink to a scratch disk
/// stays a symlink and its target is emptied.
pub fn clean_temp(layout: &Layout) -> Result<TempReport> {
    let temp_dir = layout.temp_dir();
    if !temp_dir.exists() {
        layout.ensure_dirs(&[LayoutDir::Temp])?;
        return Ok(TempReport::default());
    }

    let mut report = TempReport::default();
    for entry in std::fs::read_dir(&temp_dir)? {
        let entry = entry?;
        let path = entry.path();
        // does not follow symlinks inside temp/
        if entry.file_type()?.is_dir() {
            report.files_removed += walkdir::WalkDir::new(&path)
                .min_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| !e.file_type().is_dir())
                .count();
            report.bytes_freed += calculate_dir_size(&path);
            std::fs::remove_dir_all(&path)?;
        } else {
            report.files_removed += 1;
            report.bytes_freed += std::fs::symlink_metadata(&path)?.len();
            std::fs::remove_file(&path)?;
        }
    }

    tracing::info!(
        "emptied {} ({} files, {} bytes)",
        temp_dir.display(),
        report.files_removed,
        report.bytes_freed
    );
    Ok(report)
}
