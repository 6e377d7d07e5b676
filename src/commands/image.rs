// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `dockerfile` and `docker-build`

use std::io::Write;

use serde::Serialize;

use super::{emit_json, CommandContext};
use crate::cli::{DockerBuildArgs, DockerfileArgs};
use crate::container::{
    build_image, render_dockerfile, verify_image, write_dockerfile, write_rendered,
    DockerfileWrite, ImageSpec, VolumeReport,
};
use crate::display;
use crate::error::{Result, SetupError};

#[derive(Serialize)]
struct DockerfileResult<'a> {
    path: Option<String>,
    written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

pub fn execute_dockerfile<W: Write>(
    ctx: &CommandContext<'_>,
    args: &DockerfileArgs,
    out: &mut W,
) -> Result<()> {
    let spec = ImageSpec::from_settings(&ctx.settings)?;
    let content = render_dockerfile(&spec)?;

    if args.stdout {
        if ctx.json() {
            emit_json(
                out,
                &DockerfileResult {
                    path: None,
                    written: false,
                    content: Some(&content),
                },
            )?;
        } else {
            write!(out, "{}", content)?;
        }
        return Ok(());
    }

    let path = match &args.output {
        Some(path) => ctx.layout.resolve(path),
        None => spec.dockerfile_path(&ctx.layout),
    };
    let outcome = write_rendered(&path, &content, args.force)?;

    if ctx.json() {
        emit_json(
            out,
            &DockerfileResult {
                path: Some(path.display().to_string()),
                written: outcome == DockerfileWrite::Written,
                content: None,
            },
        )?;
    } else {
        display::print_dockerfile_write(out, &path, outcome)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct BuildResult {
    image: String,
    dockerfile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    volumes: Option<VolumeReport>,
}

pub async fn execute_build<W: Write>(
    ctx: &CommandContext<'_>,
    args: &DockerBuildArgs,
    out: &mut W,
) -> Result<()> {
    let mut spec = ImageSpec::from_settings(&ctx.settings)?;
    if let Some(tag) = &args.tag {
        spec.tag = tag.clone();
    }

    if !args.use_existing {
        let (path, outcome) = write_dockerfile(&ctx.layout, &spec, args.force)?;
        if !ctx.json() {
            display::print_dockerfile_write(out, &path, outcome)?;
        }
    }

    build_image(ctx.runner, &ctx.layout, &spec).await?;

    let volumes = if args.no_verify {
        None
    } else {
        Some(verify_image(ctx.runner, &spec).await?)
    };

    if ctx.json() {
        emit_json(
            out,
            &BuildResult {
                image: spec.tag.clone(),
                dockerfile: spec.dockerfile_path(&ctx.layout).display().to_string(),
                volumes: volumes.clone(),
            },
        )?;
    } else {
        writeln!(out, "  built {}", spec.tag)?;
        if let Some(report) = &volumes {
            display::print_volume_report(out, report)?;
        }
    }

    match volumes {
        Some(report) if !report.is_complete() => Err(SetupError::Validation(format!(
            "image {} does not declare {}",
            report.image,
            report.missing.join(", ")
        ))),
        _ => Ok(()),
    }
}
