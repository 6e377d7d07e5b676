// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! amdl-setup - deployment bootstrapper for the Apple Music downloader bot
//!
//! Entry point for the amdl-setup CLI application.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use amdl_setup::cli::{Cli, Commands, OutputFormat};
use amdl_setup::commands::{self, CommandContext};
use amdl_setup::config::bot::ENV_BOT_TOKEN;
use amdl_setup::config::Settings;
use amdl_setup::layout::Layout;
use amdl_setup::runner::SystemRunner;
use amdl_setup::{display, utils};
use amdl_setup::SetupError;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    display::set_color(display::color_for_stdout());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<SetupError>() {
                Some(setup_err) => eprintln!("{}", utils::format_error(setup_err)),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--format json` output stays parseable. `RUST_LOG`
/// still takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    let directive = match verbose {
        0 => None,
        1 => Some("amdl_setup=info"),
        _ => Some("amdl_setup=debug"),
    };
    if let Some(directive) = directive {
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_root(directory: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let root = match directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }
    Ok(root)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let root = resolve_root(cli.directory)?;
    let layout = Layout::new(root);

    // Load settings
    let settings = Settings::load(layout.root(), cli.settings.as_deref())?;
    tracing::debug!("settings: {:?}", settings);

    // Child output must not end up in front of the JSON report.
    let runner = SystemRunner::new().stdout_to_stderr(cli.format == OutputFormat::Json);
    let ctx = CommandContext::new(layout, settings, &runner)
        .with_format(cli.format)
        .with_env_bot_token(std::env::var(ENV_BOT_TOKEN).ok());

    let mut out = io::stdout();
    match cli.command {
        Commands::Install(args) => {
            commands::install::execute(&ctx, &args, &mut out).await?;
        }
        Commands::Seed => {
            commands::seed::execute(&ctx, &mut out)?;
        }
        Commands::Template => {
            commands::seed::execute_template(&ctx, &mut out)?;
        }
        Commands::Dockerfile(args) => {
            commands::image::execute_dockerfile(&ctx, &args, &mut out)?;
        }
        Commands::DockerBuild(args) => {
            commands::image::execute_build(&ctx, &args, &mut out).await?;
        }
        Commands::Check(args) => {
            commands::check::execute(&ctx, &args, &mut out)?;
        }
        Commands::Doctor => {
            commands::doctor::execute(&ctx, &mut out)?;
        }
        Commands::Clean(args) => {
            commands::clean::execute(&ctx, &args, &mut out)?;
        }
    }

    Ok(())
}
