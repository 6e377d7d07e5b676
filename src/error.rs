// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for amdl-setup
//!
//! Every deployment step reports failures through [`SetupError`]. Nothing is
//! retried or rolled back; the first error ends the run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for setup operations
#[derive(Error, Debug)]
pub enum SetupError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration template is absent, so nothing can be seeded
    #[error("Configuration template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// An external program could not be located or launched
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// An external program exited unsuccessfully
    #[error("Step '{step}' failed: {program} exited with {}", describe_code(.code))]
    CommandFailed {
        step: String,
        program: String,
        code: Option<i32>,
    },

    /// An external program ran past its deadline and was killed
    #[error("Command timed out after {secs} seconds: {program}")]
    Timeout { program: String, secs: u64 },

    /// Template rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Config validation found blocking problems
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl From<toml::de::Error> for SetupError {
    fn from(err: toml::de::Error) -> Self {
        SetupError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for SetupError {
    fn from(err: toml::ser::Error) -> Self {
        SetupError::Toml(err.to_string())
    }
}

impl From<tera::Error> for SetupError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful detail in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        SetupError::Render(message)
    }
}
