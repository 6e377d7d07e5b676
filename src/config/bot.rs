// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Schema of the bot's `config/config.json`
//!
//! Only read by `check` and `doctor`; seeding copies the file verbatim.
//! Keys this schema does not know are kept in `extra`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SetupError};

/// Environment variable that takes priority over `bot_token`
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Region the bot falls back to when a user has not picked one
pub const DEFAULT_REGION: &str = "us";

pub const DOWNLOAD_MODES: &[&str] = &["ytdlp", "nm3u8dlre"];
pub const REMUX_MODES: &[&str] = &["ffmpeg", "mp4box"];
pub const COVER_FORMATS: &[&str] = &["jpg", "png", "raw"];
pub const SONG_CODECS: &[&str] = &[
    "aac-legacy",
    "aac-he-legacy",
    "aac",
    "aac-he",
    "aac-binaural",
    "aac-downmix",
    "aac-he-binaural",
    "aac-he-downmix",
    "atmos",
    "ac3",
    "alac",
    "ask",
];
pub const VIDEO_CODECS: &[&str] = &["h264", "h265", "ask"];
pub const POST_QUALITIES: &[&str] = &["best", "ask"];

/// Top-level bot configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Users allowed to use the bot
    #[serde(default)]
    pub admin_users: Vec<i64>,

    #[serde(default)]
    pub registered_users: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<ChannelRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_channel_id: Option<ChannelRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_channel_link: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Seconds between download retries
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    #[serde(default)]
    pub regions: BTreeMap<String, RegionConfig>,

    #[serde(default)]
    pub download_settings: DownloadSettings,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Telegram chat, by numeric id or `@username`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChannelRef {
    Id(i64),
    Name(String),
}

/// Apple Music account bound to a storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    /// Netscape cookie export for the account
    pub cookies_file: PathBuf,

    /// e.g. `en-US`
    #[serde(default)]
    pub language: String,

    /// Two-letter storefront code
    #[serde(default)]
    pub storefront: String,
}

/// Download pipeline settings handed to the downloader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadSettings {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default = "default_temp_path")]
    pub temp_path: PathBuf,

    #[serde(default = "default_download_mode")]
    pub download_mode: String,

    #[serde(default = "default_remux_mode")]
    pub remux_mode: String,

    #[serde(default = "default_cover_format")]
    pub cover_format: String,

    #[serde(default = "default_song_codec")]
    pub song_codec: String,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_post_quality")]
    pub post_quality: String,

    /// Delete delivered files after `delete_delay` seconds
    #[serde(default)]
    pub auto_delete: bool,

    #[serde(default = "default_delete_delay")]
    pub delete_delay: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5
}

fn default_output_path() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_temp_path() -> PathBuf {
    PathBuf::from("temp")
}

fn default_download_mode() -> String {
    "ytdlp".to_string()
}

fn default_remux_mode() -> String {
    "ffmpeg".to_string()
}

fn default_cover_format() -> String {
    "jpg".to_string()
}

fn default_song_codec() -> String {
    "aac-legacy".to_string()
}

fn default_video_codec() -> String {
    "h264".to_string()
}

fn default_post_quality() -> String {
    "best".to_string()
}

fn default_delete_delay() -> u64 {
    300
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            temp_path: default_temp_path(),
            download_mode: default_download_mode(),
            remux_mode: default_remux_mode(),
            cover_format: default_cover_format(),
            song_codec: default_song_codec(),
            video_codec: default_video_codec(),
            post_quality: default_post_quality(),
            auto_delete: false,
            delete_delay: default_delete_delay(),
            extra: Map::new(),
        }
    }
}

impl BotConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SetupError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Token the bot would start with: the environment wins over the file.
    pub fn effective_bot_token(&self, env_token: Option<&str>) -> Option<String> {
        env_token
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.bot_token
                    .clone()
                    .filter(|token| !token.trim().is_empty())
            })
    }

    /// Region lookup is case-insensitive on the caller's side.
    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        self.regions.get(&name.to_lowercase())
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_users.contains(&user_id)
    }
}
