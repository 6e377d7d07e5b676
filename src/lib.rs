// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! amdl-setup - deployment bootstrapper for the Apple Music downloader bot.
//!
//! This crate exposes the setup flow used by the `amdl-setup` CLI
//! (`src/main.rs`). It takes a bot checkout to a runnable state along one of
//! two paths:
//! - bare metal: virtualenv, requirements, directory layout, seeded config
//! - container: rendered Dockerfile, image build, volume verification
//!
//! Architecture highlights:
//! - `bootstrap`: the ordered install steps
//! - `config`: tool settings, the bot's `config.json`, seeding and validation
//! - `container`: Dockerfile rendering and the image build
//! - `runner`: the seam every external program goes through
//! - `doctor`, `maintenance`: preflight checks and housekeeping

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod display;
pub mod doctor;
pub mod error;
pub mod layout;
pub mod maintenance;
pub mod runner;
pub mod utils;

pub use error::{Result, SetupError};
