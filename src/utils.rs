// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Small filesystem and formatting helpers shared by the commands.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

/// Format a size in bytes to human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Total size of all files below `path`; 0 when it does not exist
pub fn calculate_dir_size(path: &Path) -> u64 {
    if !path.exists() {
        return 0;
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Create `path` only if nothing exists there, filling it with `write`.
///
/// Returns `false` without touching anything when the path already exists.
/// A partially written file is removed on failure.
pub fn write_new_file<F>(path: &Path, write: F) -> Result<bool>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let result = write(&mut file).and_then(|_| file.sync_all().map_err(SetupError::from));
    if let Err(e) = result {
        drop(file);
        if let Err(cleanup) = std::fs::remove_file(path) {
            tracing::warn!(
                "could not remove partial file {}: {}",
                path.display(),
                cleanup
            );
        }
        return Err(e);
    }
    Ok(true)
}

/// Locate `program` the way a shell would.
///
/// Anything containing a path separator is checked as-is.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    find_in_dirs(program, std::env::split_paths(&path_var))
}

fn find_in_dirs(program: &str, dirs: impl Iterator<Item = PathBuf>) -> Option<PathBuf> {
    let names: Vec<String> = if cfg!(windows) {
        let mut names = vec![program.to_string()];
        for ext in ["exe", "bat", "cmd"] {
            names.push(format!("{}.{}", program, ext));
        }
        names
    } else {
        vec![program.to_string()]
    };

    for dir in dirs {
        for name in &names {
            let path = dir.join(name);
            if is_executable(&path) {
                return Some(path);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Format an error for the operator, with a follow-up hint where one helps
pub fn format_error(error: &SetupError) -> String {
    match error {
        SetupError::TemplateMissing(path) => format!(
            "Error: {}\nRestore it from the repository or run 'amdl-setup template'.",
            path.display()
        ),
        SetupError::CommandNotFound(program) => format!(
            "Error: {} is not installed or not on PATH.\nRun 'amdl-setup doctor' to see what is missing.",
            program
        ),
        _ => format!("Error: {}", error),
    }
}
