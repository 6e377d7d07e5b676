// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::collections::HashMap;
use std::path::PathBuf;

use amdl_setup::config::{
    validate, BotConfig, Settings, Severity, ENV_DOCKER, ENV_IMAGE_TAG, PROJECT_SETTINGS_FILE,
};
use amdl_setup::layout::Layout;
use tempfile::TempDir;

const VALID_CONFIG: &str = r#"{
    "bot_token": "123:abc",
    "admin_users": [42],
    "regions": {
        "us": {"cookies_file": "cookies/us_cookies.txt", "language": "en-US", "storefront": "us"}
    },
    "download_settings": {"output_path": "downloads", "temp_path": "temp"}
}"#;

fn layout_with_cookies() -> (TempDir, Layout) {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new(temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("cookies")).unwrap();
    std::fs::write(temp_dir.path().join("cookies/us_cookies.txt"), "# Netscape").unwrap();
    (temp_dir, layout)
}

// ==================== Tool settings ====================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();
    assert_eq!(settings.image.tag, "apple-music-bot:latest");
    assert_eq!(settings.image.base_image, "python:3.11-slim");
    assert_eq!(settings.image.docker, "docker");
    assert_eq!(settings.image.dockerfile, PathBuf::from("Dockerfile"));
    assert_eq!(settings.environment.requirements, PathBuf::from("requirements.txt"));
    assert_eq!(settings.maintenance.cache_max_age_secs, 3600);
}

#[test]
fn test_settings_project_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(PROJECT_SETTINGS_FILE),
        r#"
        [environment]
        venv_dir = "venv"
        upgrade_pip = false

        [image]
        system_packages = ["ffmpeg"]
        "#,
    )
    .unwrap();

    let settings = Settings::load_layers(&[Settings::project_path(temp_dir.path())]).unwrap();

    assert_eq!(settings.environment.venv_dir, PathBuf::from("venv"));
    assert!(!settings.environment.upgrade_pip);
    assert_eq!(settings.image.system_packages, vec!["ffmpeg"]);
    assert_eq!(settings.image.tag, "apple-music-bot:latest");
}

#[test]
fn test_settings_invalid_toml_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(PROJECT_SETTINGS_FILE);
    std::fs::write(&path, "[image\ntag = 1").unwrap();

    let err = Settings::load_layers(&[path]).unwrap_err();
    assert!(err.to_string().contains(PROJECT_SETTINGS_FILE));
}

#[test]
fn test_settings_explicit_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    assert!(Settings::load(temp_dir.path(), Some(&missing)).is_err());
}

#[test]
fn test_settings_env_overrides() {
    let vars: HashMap<&str, &str> = [(ENV_IMAGE_TAG, "bot:ci"), (ENV_DOCKER, "  ")]
        .into_iter()
        .collect();
    let mut settings = Settings::default();

    settings.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.image.tag, "bot:ci");
    // blank values are ignored
    assert_eq!(settings.image.docker, "docker");
}

// ==================== Bot config ====================

#[test]
fn test_bot_config_keeps_unknown_keys() {
    let config = BotConfig::parse(
        r#"{"regions": {}, "feature_flags": {"beta": true}, "download_settings": {"lyrics": true}}"#,
    )
    .unwrap();
    assert!(config.extra.contains_key("feature_flags"));
    assert!(config.download_settings.extra.contains_key("lyrics"));
}

#[test]
fn test_bot_config_channel_id_or_name() {
    let config =
        BotConfig::parse(r#"{"log_channel_id": -100123, "auth_channel_id": "@bot_auth"}"#).unwrap();
    assert!(config.log_channel_id.is_some());
    assert!(config.auth_channel_id.is_some());
}

#[test]
fn test_bot_token_env_wins() {
    let config = BotConfig::parse(r#"{"bot_token": "from-file"}"#).unwrap();
    assert_eq!(
        config.effective_bot_token(Some("from-env")).as_deref(),
        Some("from-env")
    );
    assert_eq!(config.effective_bot_token(Some("")).as_deref(), Some("from-file"));
}

// ==================== Validation ====================

#[test]
fn test_validate_clean_config() {
    let (_temp, layout) = layout_with_cookies();
    let config = BotConfig::parse(VALID_CONFIG).unwrap();

    let report = validate(&config, &layout, None);

    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn test_validate_flags_bad_storefront_and_codec() {
    let (_temp, layout) = layout_with_cookies();
    let mut config = BotConfig::parse(VALID_CONFIG).unwrap();
    config.regions.get_mut("us").unwrap().storefront = "USA".to_string();
    config.download_settings.song_codec = "mp3".to_string();

    let report = validate(&config, &layout, None);

    assert!(report.has_errors());
    let fields: Vec<&str> = report.errors().map(|i| i.field.as_str()).collect();
    assert!(fields.contains(&"regions.us.storefront"));
    assert!(fields.contains(&"download_settings.song_codec"));
}

#[test]
fn test_validate_missing_cookies_is_warning() {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new(temp_dir.path());
    let config = BotConfig::parse(VALID_CONFIG).unwrap();

    let report = validate(&config, &layout, None);

    assert!(!report.has_errors());
    assert!(report
        .warnings()
        .any(|i| i.field.starts_with("regions.us.cookies_file")));
}

#[test]
fn test_validate_empty_regions_is_error() {
    let (_temp, layout) = layout_with_cookies();
    let config = BotConfig::parse(r#"{"bot_token": "t", "admin_users": [1]}"#).unwrap();

    let report = validate(&config, &layout, None);

    assert!(report
        .issues
        .iter()
        .any(|i| i.severity == Severity::Error && i.field == "regions"));
}

#[test]
fn test_validate_token_from_env_suppresses_warning() {
    let (_temp, layout) = layout_with_cookies();
    let mut config = BotConfig::parse(VALID_CONFIG).unwrap();
    config.bot_token = None;

    assert!(!validate(&config, &layout, None).is_clean());
    assert!(validate(&config, &layout, Some("123:env")).is_clean());
}
