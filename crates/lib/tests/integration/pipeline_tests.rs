//! Step ordering, fail-fast and early-exit behavior of the pipeline.

use std::fs;

use sdkpack_lib::error::Error;
use sdkpack_lib::layout::Layout;
use sdkpack_lib::pipeline::{Pipeline, PipelineState, Step};
use sdkpack_lib::request::{BuildConfig, resolve};
use tempfile::TempDir;

use super::common::{FakeRunner, raw, request};

fn artifact_path(layout: &Layout, config: &str, file: &str) -> std::path::PathBuf {
  layout.build_dir.join(config).join(file)
}

#[test]
fn unsupported_platform_never_starts_a_process() {
  let temp = TempDir::new().unwrap();
  let runner = FakeRunner::default();
  let pipeline = Pipeline::new(runner, Layout::new(temp.path()));

  let mut input = raw("playstation");
  input.build = true;
  let err = resolve(&input).unwrap_err();

  assert!(matches!(err, Error::InvalidArgument { field: "platform", .. }));
  assert_eq!(err.exit_code(), 2);
  assert_eq!(pipeline.state(), PipelineState::Idle);
  assert!(pipeline.runner().commands.is_empty());
  assert!(!temp.path().join("build").exists());
}

#[test]
fn full_run_follows_fixed_order() {
  let temp = TempDir::new().unwrap();
  let layout = Layout::new(temp.path());
  let artifact = artifact_path(&layout, "Release", "libGameAnalytics.a");
  let mut pipeline = Pipeline::new(FakeRunner::producing(artifact), layout);

  let report = pipeline
    .run(&request("linux_x64", |r| {
      r.config = Some("Release".to_string());
      r.clean = true;
      r.build = true;
      r.test = true;
      r.package = true;
    }))
    .unwrap();

  assert_eq!(
    report.visited,
    [
      PipelineState::Idle,
      PipelineState::Cleaning,
      PipelineState::Configuring,
      PipelineState::Building,
      PipelineState::Testing,
      PipelineState::Packaging,
      PipelineState::Done,
    ]
  );
  assert_eq!(
    report.steps,
    [Step::Clean, Step::Configure, Step::Build, Step::Test, Step::Package, Step::Inspect]
  );
  assert_eq!(pipeline.runner().steps(), ["configure", "build", "test", "inspect"]);
  assert!(report.package.is_some());
}

#[test]
fn clean_removes_stale_output_before_configure() {
  let temp = TempDir::new().unwrap();
  let layout = Layout::new(temp.path());
  let stale = artifact_path(&layout, "Debug", "libGameAnalytics.a");
  fs::create_dir_all(stale.parent().unwrap()).unwrap();
  fs::write(&stale, "stale").unwrap();

  let mut pipeline = Pipeline::new(FakeRunner::default(), layout);
  let err = pipeline
    .run(&request("linux_x64", |r| {
      r.clean = true;
      r.build = true;
      r.package = true;
    }))
    .unwrap_err();

  // The stale artifact is gone, so packaging can't pick it up.
  assert!(matches!(err, Error::ArtifactNotFound { .. }));
  assert!(!stale.exists());
}

#[test]
fn clean_without_build_dir_is_a_no_op() {
  let temp = TempDir::new().unwrap();
  let layout = Layout::new(temp.path());
  assert!(!layout.build_dir.exists());

  let mut pipeline = Pipeline::new(FakeRunner::default(), layout);
  let report = pipeline.run(&request("win64", |r| r.clean = true)).unwrap();

  assert_eq!(
    report.visited,
    [
      PipelineState::Idle,
      PipelineState::Cleaning,
      PipelineState::Configuring,
      PipelineState::Done,
    ]
  );
  assert_eq!(pipeline.runner().steps(), ["configure"]);
}

#[test]
#[cfg(unix)]
fn clean_failure_aborts_before_configure() {
  let temp = TempDir::new().unwrap();
  let layout = Layout::new(temp.path());
  // A regular file cannot be removed as a directory tree.
  fs::write(&layout.build_dir, "not a directory").unwrap();
  let build_dir = layout.build_dir.clone();

  let mut pipeline = Pipeline::new(FakeRunner::default(), layout);
  let err = pipeline
    .run(&request("linux_x64", |r| {
      r.clean = true;
      r.build = true;
    }))
    .unwrap_err();

  match &err {
    Error::FileSystem { path, .. } => assert_eq!(path, &build_dir),
    other => panic!("unexpected error: {other}"),
  }
  assert_eq!(err.exit_code(), 4);
  assert_eq!(pipeline.state(), PipelineState::Aborted(4));
  assert_eq!(
    pipeline.visited(),
    [PipelineState::Idle, PipelineState::Cleaning, PipelineState::Aborted(4)]
  );
  assert!(pipeline.runner().commands.is_empty());
}

#[test]
fn configure_failure_stops_everything() {
  let temp = TempDir::new().unwrap();
  let mut pipeline = Pipeline::new(FakeRunner::failing("configure", 17), Layout::new(temp.path()));

  let err = pipeline
    .run(&request("osx", |r| {
      r.build = true;
      r.test = true;
      r.package = true;
    }))
    .unwrap_err();

  assert_eq!(err.exit_code(), 17);
  assert!(matches!(err, Error::ExternalCommandFailure { exit_code: 17, .. }));
  assert_eq!(pipeline.state(), PipelineState::Aborted(17));
  assert_eq!(pipeline.runner().steps(), ["configure"]);
  assert!(!pipeline.visited().contains(&PipelineState::Building));
}

#[test]
fn build_failure_skips_test_and_package() {
  let temp = TempDir::new().unwrap();
  let mut pipeline = Pipeline::new(FakeRunner::failing("build", 2), Layout::new(temp.path()));

  let err = pipeline
    .run(&request("win32", |r| {
      r.build = true;
      r.test = true;
      r.package = true;
    }))
    .unwrap_err();

  assert_eq!(err.exit_code(), 2);
  assert_eq!(pipeline.state(), PipelineState::Aborted(2));
  assert_eq!(pipeline.runner().steps(), ["configure", "build"]);
  assert!(!pipeline.layout().package_dir.exists());
}

#[test]
fn test_failure_skips_package() {
  let temp = TempDir::new().unwrap();
  let layout = Layout::new(temp.path());
  let mut runner = FakeRunner::producing(artifact_path(&layout, "Debug", "libGameAnalytics.a"));
  runner.failures.push(("test", 8));
  let mut pipeline = Pipeline::new(runner, layout);

  let err = pipeline
    .run(&request("linux_x86", |r| {
      r.build = true;
      r.test = true;
      r.package = true;
    }))
    .unwrap_err();

  assert_eq!(err.exit_code(), 8);
  assert_eq!(
    pipeline.visited(),
    [
      PipelineState::Idle,
      PipelineState::Configuring,
      PipelineState::Building,
      PipelineState::Testing,
      PipelineState::Aborted(8),
    ]
  );
  assert!(!pipeline.layout().package_dir.exists());
}

#[test]
fn build_only_release_scenario() {
  let temp = TempDir::new().unwrap();
  let mut pipeline = Pipeline::new(FakeRunner::default(), Layout::new(temp.path()));

  let request = request("linux_x64", |r| {
    r.config = Some("Release".to_string());
    r.build = true;
  });
  assert_eq!(request.config(), BuildConfig::Release);

  let report = pipeline.run(&request).unwrap();

  assert_eq!(report.final_state, PipelineState::Done);
  assert_eq!(pipeline.state(), PipelineState::Done);
  assert_eq!(pipeline.runner().steps(), ["configure", "build"]);
  assert!(report.package.is_none());
  assert!(!report.visited.contains(&PipelineState::Testing));
  assert!(!report.visited.contains(&PipelineState::Packaging));
}

#[test]
fn no_build_requested_ignores_test_and_package() {
  let temp = TempDir::new().unwrap();
  let mut pipeline = Pipeline::new(FakeRunner::default(), Layout::new(temp.path()));

  let report = pipeline
    .run(&request("uwp", |r| {
      r.test = true;
      r.package = true;
    }))
    .unwrap();

  assert_eq!(report.final_state, PipelineState::Done);
  assert_eq!(report.steps, [Step::Configure]);
  assert_eq!(pipeline.runner().steps(), ["configure"]);
}

#[test]
fn configure_receives_request_values() {
  let temp = TempDir::new().unwrap();
  let mut pipeline = Pipeline::new(FakeRunner::default(), Layout::new(temp.path()));

  pipeline
    .run(&request("win64", |r| {
      r.config = Some("Release".to_string());
      r.build = true;
      r.target = Some("GameAnalytics".to_string());
      r.toolchain_flags = Some("-DUSE_OPENSSL=ON -A x64".to_string());
    }))
    .unwrap();

  let commands = &pipeline.runner().commands;
  let configure = &commands[0].args;
  assert!(configure.contains(&"-DPLATFORM:STRING=win64".to_string()));
  assert!(configure.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
  assert_eq!(&configure[configure.len() - 3..], ["-DUSE_OPENSSL=ON", "-A", "x64"]);

  let build = &commands[1].args;
  assert_eq!(&build[build.len() - 2..], ["--target", "GameAnalytics"]);
}
