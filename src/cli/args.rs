// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for amdl-setup.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// amdl-setup - deployment bootstrapper for the Apple Music downloader bot
#[derive(Parser, Debug)]
#[command(name = "amdl-setup")]
#[command(
    version,
    about = "Prepare a working directory or container image for the Apple Music downloader bot"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Bot checkout to operate on (defaults to current)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Settings file to use instead of the project's amdl-setup.toml
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the virtualenv, install requirements, scaffold directories and seed the config
    Install(InstallArgs),

    /// Copy config/config.example.json to config/config.json if it is missing
    Seed,

    /// Write the built-in config/config.example.json if it is missing
    Template,

    /// Render the Dockerfile
    Dockerfile(DockerfileArgs),

    /// Build the container image
    #[command(name = "docker-build", alias = "build")]
    DockerBuild(DockerBuildArgs),

    /// Validate config/config.json
    #[command(alias = "validate")]
    Check(CheckArgs),

    /// Check for required tools and files
    Doctor,

    /// Empty temp/ and prune expired cache entries
    Clean(CleanArgs),
}

/// Arguments for the install subcommand
#[derive(clap::Args, Debug, Default)]
pub struct InstallArgs {
    /// Do not create the virtualenv
    #[arg(long)]
    pub skip_environment: bool,

    /// Do not install requirements
    #[arg(long)]
    pub skip_dependencies: bool,

    /// Interpreter used to create the virtualenv
    #[arg(long)]
    pub python: Option<String>,
}

/// Arguments for the dockerfile subcommand
#[derive(clap::Args, Debug, Default)]
pub struct DockerfileArgs {
    /// Print the Dockerfile instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// Write to this path instead of the configured one
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace an existing Dockerfile that differs
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the docker-build subcommand
#[derive(clap::Args, Debug, Default)]
pub struct DockerBuildArgs {
    /// Image tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Build from the Dockerfile already on disk without regenerating it
    #[arg(long)]
    pub use_existing: bool,

    /// Replace an existing Dockerfile that differs
    #[arg(short, long)]
    pub force: bool,

    /// Skip checking the built image's volumes
    #[arg(long)]
    pub no_verify: bool,
}

/// Arguments for the check subcommand
#[derive(clap::Args, Debug, Default)]
pub struct CheckArgs {
    /// Config file to check (defaults to config/config.json)
    pub path: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the clean subcommand
#[derive(clap::Args, Debug, Default)]
pub struct CleanArgs {
    /// Remove every cache entry, not only expired ones
    #[arg(long)]
    pub all: bool,

    /// Only empty temp/
    #[arg(long, conflicts_with = "cache_only")]
    pub temp_only: bool,

    /// Only prune cache/
    #[arg(long)]
    pub cache_only: bool,

    /// Maximum cache entry age in seconds
    #[arg(long)]
    pub max_age: Option<u64>,
}

/// Output format for reports
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
