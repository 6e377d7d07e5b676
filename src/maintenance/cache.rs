// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Response cache pruning
//!
//! The bot stores one JSON file per key under `cache/`:
//!
//! ```json
//! {"timestamp": 1718000000.25, "value": {...}}
//! ```
//!
//! where `timestamp` is the write time in fractional Unix seconds.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::Layout;

// The bot reads both keys; an entry missing either is unusable.
#[derive(Deserialize)]
struct CacheEntry {
    timestamp: f64,
    #[allow(dead_code)]
    value: serde_json::Value,
}

/// Freshness of one cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    Expired,
    Corrupt,
}

/// Classify a cache file's contents.
pub fn entry_state(content: &str, max_age: Duration, now: DateTime<Utc>) -> EntryState {
    let entry: CacheEntry = match serde_json::from_str(content) {
        Ok(entry) => entry,
        Err(_) => return EntryState::Corrupt,
    };
    if !entry.timestamp.is_finite() {
        return EntryState::Corrupt;
    }

    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    if now_secs - entry.timestamp > max_age.as_secs_f64() {
        EntryState::Expired
    } else {
        EntryState::Fresh
    }
}

/// Outcome of a prune run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub examined: usize,
    pub removed_expired: usize,
    pub removed_corrupt: usize,
    pub kept: usize,
    pub bytes_freed: u64,
}

impl PruneReport {
    pub fn removed(&self) -> usize {
        self.removed_expired + self.removed_corrupt
    }
}

/// Delete expired and unreadable `*.json` entries from `cache/`.
///
/// With `all`, every entry goes regardless of age. Other files and
/// subdirectories are never touched.
pub fn prune_cache(
    layout: &Layout,
    max_age: Duration,
    now: DateTime<Utc>,
    all: bool,
) -> Result<PruneReport> {
    let cache_dir = layout.cache_dir();
    let mut report = PruneReport::default();
    if !cache_dir.is_dir() {
        tracing::debug!("no cache directory at {}", cache_dir.display());
        return Ok(report);
    }

    for entry in std::fs::read_dir(&cache_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_json(&path) {
            continue;
        }
        report.examined += 1;

        let state = if all {
            EntryState::Expired
        } else {
            match std::fs::read_to_string(&path) {
                Ok(content) => entry_state(&content, max_age, now),
                // not UTF-8
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => EntryState::Corrupt,
                Err(e) => return Err(e.into()),
            }
        };

        match state {
            EntryState::Fresh => report.kept += 1,
            EntryState::Expired | EntryState::Corrupt => {
                let size = entry.metadata()?.len();
                std::fs::remove_file(&path)?;
                report.bytes_freed += size;
                if state == EntryState::Corrupt {
                    tracing::info!("removed corrupt cache entry {}", path.display());
                    report.removed_corrupt += 1;
                } else {
                    tracing::debug!("removed cache entry {}", path.display());
                    report.removed_expired += 1;
                }
            }
        }
    }

    tracing::info!(
        "cache: {} examined, {} removed, {} kept",
        report.examined,
        report.removed(),
        report.kept
    );
    Ok(report)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}
