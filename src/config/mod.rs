// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module
//!
//! Two files live here: the tool's own layered [`Settings`] and the bot's
//! `config.json` ([`BotConfig`]), which this crate seeds and validates.

pub mod bot;
pub mod seeder;
pub mod settings;
pub mod template;
pub mod validation;

pub use bot::BotConfig;
pub use seeder::{seed_config, SeedOutcome};
pub use settings::*;
pub use validation::{validate, Issue, Severity, ValidationReport};
