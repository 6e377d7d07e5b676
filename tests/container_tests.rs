// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use amdl_setup::config::Settings;
use amdl_setup::container::{
    build_image, render_dockerfile, verify_image, write_dockerfile, DockerfileWrite, ImageSpec,
    STEP_BUILD_IMAGE, STEP_VERIFY_IMAGE,
};
use amdl_setup::layout::Layout;
use amdl_setup::runner::RecordingRunner;
use amdl_setup::SetupError;
use tempfile::TempDir;

fn default_spec() -> ImageSpec {
    ImageSpec::from_settings(&Settings::default()).unwrap()
}

fn line_starting<'a>(dockerfile: &'a str, prefix: &str) -> &'a str {
    dockerfile
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {prefix}"))
}

#[test]
fn test_image_creates_and_declares_volumes() {
    let dockerfile = render_dockerfile(&default_spec()).unwrap();

    let mkdir = line_starting(&dockerfile, "RUN mkdir");
    let volume = line_starting(&dockerfile, "VOLUME");
    for dir in ["downloads", "config", "cache"] {
        let path = format!("/app/{dir}");
        assert!(mkdir.contains(&path), "{path} not created");
        assert!(volume.contains(&format!("\"{path}\"")), "{path} not a volume");
    }
    assert!(mkdir.contains("/app/temp"));
    assert!(!volume.contains("/app/temp"));
}

#[test]
fn test_image_environment_and_entry_point() {
    let dockerfile = render_dockerfile(&default_spec()).unwrap();

    assert!(dockerfile.starts_with("# Generated by amdl-setup"));
    assert!(dockerfile.contains("FROM python:3.11-slim"));
    assert!(dockerfile.contains("PYTHONUNBUFFERED=1"));
    assert!(dockerfile.contains("CONFIG_PATH=/app/config/config.json"));
    assert!(dockerfile.contains("WORKDIR /app"));
    assert!(dockerfile.contains("COPY . ."));
    assert_eq!(line_starting(&dockerfile, "CMD"), r#"CMD ["python","main.py"]"#);
}

#[test]
fn test_image_follows_settings() {
    let mut settings = Settings::default();
    settings.image.base_image = "python:3.12-slim".to_string();
    settings.image.entry_point = vec!["python".into(), "-m".into(), "bot".into()];
    settings.environment.requirements = "deps/requirements.txt".into();
    let spec = ImageSpec::from_settings(&settings).unwrap();

    let dockerfile = render_dockerfile(&spec).unwrap();

    assert!(dockerfile.contains("FROM python:3.12-slim"));
    assert!(dockerfile.contains("COPY deps/requirements.txt ./requirements.txt"));
    assert!(dockerfile.contains(r#"CMD ["python","-m","bot"]"#));
}

#[test]
fn test_write_dockerfile_refuses_to_clobber() {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new(temp_dir.path());
    let hand_written = "FROM alpine\n";
    std::fs::write(temp_dir.path().join("Dockerfile"), hand_written).unwrap();

    let err = write_dockerfile(&layout, &default_spec(), false).unwrap_err();
    assert!(matches!(err, SetupError::InvalidInput(_)));
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("Dockerfile")).unwrap(),
        hand_written
    );

    let (_, outcome) = write_dockerfile(&layout, &default_spec(), true).unwrap();
    assert_eq!(outcome, DockerfileWrite::Written);
}

#[tokio::test]
async fn test_build_then_verify() {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new(temp_dir.path());
    let spec = default_spec();
    write_dockerfile(&layout, &spec, false).unwrap();
    let runner = RecordingRunner::new().with_stdout(
        STEP_VERIFY_IMAGE,
        "{\"/app/cache\":{},\"/app/config\":{},\"/app/downloads\":{}}\n",
    );

    build_image(&runner, &layout, &spec).await.unwrap();
    let report = verify_image(&runner, &spec).await.unwrap();

    assert_eq!(runner.steps(), vec![STEP_BUILD_IMAGE, STEP_VERIFY_IMAGE]);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_verify_flags_image_without_volumes() {
    let runner = RecordingRunner::new().with_stdout(STEP_VERIFY_IMAGE, "null\n");

    let report = verify_image(&runner, &default_spec()).await.unwrap();

    assert!(report.declared.is_empty());
    assert_eq!(
        report.missing,
        vec!["/app/downloads", "/app/config", "/app/cache"]
    );
}

#[tokio::test]
async fn test_verify_missing_image_fails() {
    let runner = RecordingRunner::new().fail_step(STEP_VERIFY_IMAGE, 1);
    let err = verify_image(&runner, &default_spec()).await.unwrap_err();
    assert!(matches!(err, SetupError::CommandFailed { .. }));
}
