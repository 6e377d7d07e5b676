// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Housekeeping for a running deployment: partial downloads in `temp/` and
//! stale entries in `cache/`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::layout::Layout;

mod cache;
mod temp;

pub use cache::{entry_state, prune_cache, EntryState, PruneReport};
pub use temp::{clean_temp, TempReport};

/// What a clean run should touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub temp: bool,
    pub cache: bool,
    /// Drop every cache entry, not just expired ones
    pub all: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            temp: true,
            cache: true,
            all: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<TempReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<PruneReport>,
}

impl CleanReport {
    pub fn bytes_freed(&self) -> u64 {
        self.temp.as_ref().map_or(0, |t| t.bytes_freed)
            + self.cache.as_ref().map_or(0, |c| c.bytes_freed)
    }
}

/// Run the selected cleanups.
pub fn clean(
    layout: &Layout,
    options: CleanOptions,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<CleanReport> {
    let mut report = CleanReport::default();
    if options.temp {
        report.temp = Some(clean_temp(layout)?);
    }
    if options.cache {
        report.cache = Some(prune_cache(layout, max_age, now, options.all)?);
    }
    Ok(report)
}
