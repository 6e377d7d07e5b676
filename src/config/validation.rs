// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sanity checks for the bot configuration
//!
//! Errors are settings the bot cannot start with; warnings are settings
//! that start fine but will surprise the operator later.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::bot::{
    BotConfig, COVER_FORMATS, DEFAULT_REGION, DOWNLOAD_MODES, POST_QUALITIES, REMUX_MODES,
    SONG_CODECS, VIDEO_CODECS,
};
use crate::layout::Layout;

static STOREFRONT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}$").expect("valid storefront regex"));

static LANGUAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid language regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One finding against a config field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Dotted path of the offending key
    pub field: String,
    pub message: String,
}

impl Issue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// All findings for one config file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate `config`. Relative cookie paths are resolved against `layout`.
/// `env_token` is the value of `TELEGRAM_BOT_TOKEN`, if set.
pub fn validate(config: &BotConfig, layout: &Layout, env_token: Option<&str>) -> ValidationReport {
    let mut issues = Vec::new();

    if config.effective_bot_token(env_token).is_none() {
        issues.push(Issue::warning(
            "bot_token",
            "no bot token in config or TELEGRAM_BOT_TOKEN; the bot will refuse to start",
        ));
    }

    if config.admin_users.is_empty() {
        issues.push(Issue::warning(
            "admin_users",
            "no admin users; nobody will be authorized to download",
        ));
    }

    if config.regions.is_empty() {
        issues.push(Issue::error("regions", "at least one region is required"));
    } else if !config.regions.contains_key(DEFAULT_REGION) {
        issues.push(Issue::warning(
            "regions",
            format!(
                "no '{}' region; users who never pick a region will fail",
                DEFAULT_REGION
            ),
        ));
    }

    for (name, region) in &config.regions {
        let prefix = format!("regions.{}", name);

        if name != &name.to_lowercase() {
            issues.push(Issue::warning(
                prefix.clone(),
                "region names are matched lowercased; this entry is unreachable",
            ));
        }

        if !STOREFRONT_PATTERN.is_match(&region.storefront) {
            issues.push(Issue::error(
                format!("{}.storefront", prefix),
                format!(
                    "'{}' is not a two-letter lowercase storefront code",
                    region.storefront
                ),
            ));
        }

        if region.language.trim().is_empty() {
            issues.push(Issue::error(
                format!("{}.language", prefix),
                "language is required",
            ));
        } else if !LANGUAGE_PATTERN.is_match(&region.language) {
            issues.push(Issue::warning(
                format!("{}.language", prefix),
                format!("'{}' does not look like a language tag", region.language),
            ));
        }

        let cookies = layout.resolve(&region.cookies_file);
        if !cookies.is_file() {
            issues.push(Issue::warning(
                format!("{}.cookies_file", prefix),
                format!("cookies file not found: {}", cookies.display()),
            ));
        }
    }

    let settings = &config.download_settings;
    for (field, value) in [
        ("output_path", &settings.output_path),
        ("temp_path", &settings.temp_path),
    ] {
        if value.as_os_str().is_empty() {
            issues.push(Issue::error(
                format!("download_settings.{}", field),
                "path must not be empty",
            ));
        }
    }

    let choices: [(&str, &str, &[&str]); 6] = [
        ("download_mode", settings.download_mode.as_str(), DOWNLOAD_MODES),
        ("remux_mode", settings.remux_mode.as_str(), REMUX_MODES),
        ("cover_format", settings.cover_format.as_str(), COVER_FORMATS),
        ("song_codec", settings.song_codec.as_str(), SONG_CODECS),
        ("video_codec", settings.video_codec.as_str(), VIDEO_CODECS),
        ("post_quality", settings.post_quality.as_str(), POST_QUALITIES),
    ];
    for (field, value, allowed) in choices {
        if !allowed.contains(&value) {
            issues.push(Issue::error(
                format!("download_settings.{}", field),
                format!("'{}' is not one of: {}", value, allowed.join(", ")),
            ));
        }
    }

    if settings.auto_delete && settings.delete_delay == 0 {
        issues.push(Issue::warning(
            "download_settings.delete_delay",
            "files are deleted immediately after delivery",
        ));
    }

    tracing::debug!("validation produced {} issue(s)", issues.len());
    ValidationReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(json: &str) -> BotConfig {
        BotConfig::parse(json).unwrap()
    }

    fn fields(report: &ValidationReport, severity: Severity) -> Vec<String> {
        report
            .issues
            .iter()
            .filter(|i| i.severity == severity)
            .map(|i| i.field.clone())
            .collect()
    }

    #[test]
    fn test_complete_config_is_clean() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("cookies")).unwrap();
        std::fs::write(temp_dir.path().join("cookies/us.txt"), "# cookies").unwrap();
        let layout = Layout::new(temp_dir.path());

        let config = config(
            r#"{
                "bot_token": "123:abc",
                "admin_users": [1],
                "regions": {"us": {"cookies_file": "cookies/us.txt",
                                   "language": "en-US", "storefront": "us"}}
            }"#,
        );

        let report = validate(&config, &layout, None);
        assert!(report.is_clean(), "{:?}", report.issues);
    }

    #[test]
    fn test_missing_regions_is_error() {
        let layout = Layout::new("/nonexistent");
        let report = validate(&config("{}"), &layout, Some("token"));
        assert!(report.has_errors());
        assert!(fields(&report, Severity::Error).contains(&"regions".to_string()));
    }

    #[test]
    fn test_bad_storefront_and_empty_language() {
        let layout = Layout::new("/nonexistent");
        let report = validate(
            &config(
                r#"{"regions": {"us": {"cookies_file": "c.txt",
                                      "language": "", "storefront": "USA"}}}"#,
            ),
            &layout,
            None,
        );
        let errors = fields(&report, Severity::Error);
        assert!(errors.contains(&"regions.us.storefront".to_string()));
        assert!(errors.contains(&"regions.us.language".to_string()));
        assert!(fields(&report, Severity::Warning).contains(&"regions.us.cookies_file".to_string()));
    }

    #[test]
    fn test_unknown_codec_is_error() {
        let layout = Layout::new("/nonexistent");
        let report = validate(
            &config(
                r#"{"regions": {"us": {"cookies_file": "c", "language": "en-US",
                                      "storefront": "us"}},
                    "download_settings": {"song_codec": "mp3", "remux_mode": "MP4Box"}}"#,
            ),
            &layout,
            Some("token"),
        );
        let errors = fields(&report, Severity::Error);
        assert_eq!(
            errors,
            vec![
                "download_settings.remux_mode".to_string(),
                "download_settings.song_codec".to_string(),
            ]
        );
    }

    #[test]
    fn test_uppercase_region_and_missing_default_warn() {
        let layout = Layout::new("/nonexistent");
        let report = validate(
            &config(
                r#"{"admin_users": [1], "regions": {"JP": {"cookies_file": "c",
                    "language": "ja-JP", "storefront": "jp"}}}"#,
            ),
            &layout,
            Some("token"),
        );
        assert!(!report.has_errors());
        let warnings = fields(&report, Severity::Warning);
        assert!(warnings.contains(&"regions".to_string()));
        assert!(warnings.contains(&"regions.JP".to_string()));
    }

    #[test]
    fn test_env_token_silences_token_warning() {
        let layout = Layout::new("/nonexistent");
        let report = validate(&config("{}"), &layout, Some("123:abc"));
        assert!(!fields(&report, Severity::Warning).contains(&"bot_token".to_string()));

        let report = validate(&config("{}"), &layout, None);
        assert!(fields(&report, Severity::Warning).contains(&"bot_token".to_string()));
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::error("regions", "at least one region is required");
        assert_eq!(
            issue.to_string(),
            "error: regions: at least one region is required"
        );
    }
}
