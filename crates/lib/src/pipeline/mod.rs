//! Pipeline orchestration.
//!
//! A run walks `Idle → Cleaning → Configuring → Building → Testing →
//! Packaging → Done`, skipping the states whose flag is off. Any failing
//! step moves the pipeline to `Aborted(code)` and nothing after it runs.
//!
//! Configure always runs. When no build is requested the run stops right
//! after configure and is reported as a success. Packaging ends with an
//! inspection of the packaged library's architecture, run through the same
//! runner as every other external step.

pub mod toolchain;

use std::fmt;
use std::fs;
use std::io;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactLocator, PackageReport};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::request::BuildRequest;
use crate::runner::{CommandRunner, CommandSpec, StepOutcome};

pub use toolchain::Toolchain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
  Idle,
  Cleaning,
  Configuring,
  Building,
  Testing,
  Packaging,
  Done,
  Aborted(i32),
}

/// A discrete phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Clean,
  Configure,
  Build,
  Test,
  Package,
  Inspect,
}

impl Step {
  pub fn as_str(&self) -> &'static str {
    match self {
      Step::Clean => "clean",
      Step::Configure => "configure",
      Step::Build => "build",
      Step::Test => "test",
      Step::Package => "package",
      Step::Inspect => "inspect",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
  pub final_state: PipelineState,
  /// Every state entered, starting with `Idle`.
  pub visited: Vec<PipelineState>,
  /// Steps that ran to completion, in order.
  pub steps: Vec<Step>,
  pub package: Option<PackageReport>,
}

/// Drives one [`BuildRequest`] through the external toolchain.
pub struct Pipeline<R> {
  runner: R,
  layout: Layout,
  toolchain: Toolchain,
  state: PipelineState,
  visited: Vec<PipelineState>,
  steps: Vec<Step>,
}

impl<R: CommandRunner> Pipeline<R> {
  pub fn new(runner: R, layout: Layout) -> Self {
    Self {
      runner,
      layout,
      toolchain: Toolchain::default(),
      state: PipelineState::Idle,
      visited: vec![PipelineState::Idle],
      steps: Vec::new(),
    }
  }

  pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
    self.toolchain = toolchain;
    self
  }

  pub fn state(&self) -> PipelineState {
    self.state
  }

  /// States entered by the last run, starting with `Idle`.
  pub fn visited(&self) -> &[PipelineState] {
    &self.visited
  }

  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Execute every requested step in order, stopping at the first failure.
  pub fn run(&mut self, request: &BuildRequest) -> Result<PipelineReport> {
    self.reset();
    info!(
      platform = %request.platform(),
      config = %request.config(),
      build = request.do_build(),
      test = request.do_test(),
      package = request.do_package(),
      "starting pipeline"
    );

    if request.do_clean() {
      self.enter(PipelineState::Cleaning);
      self.clean()?;
      self.steps.push(Step::Clean);
    }

    self.enter(PipelineState::Configuring);
    let build_dir = self.layout.build_dir.clone();
    if let Err(e) = fs::create_dir_all(&build_dir) {
      return Err(self.abort(Error::fs(build_dir, e)));
    }
    let configure = self.toolchain.configure(request, &self.layout);
    self.exec(Step::Configure, &configure)?;

    if !request.do_build() {
      debug!("no build requested, stopping after configure");
      return Ok(self.finish(None));
    }

    self.enter(PipelineState::Building);
    let build = self.toolchain.build(request, &self.layout);
    self.exec(Step::Build, &build)?;

    if request.do_test() {
      self.enter(PipelineState::Testing);
      let test = self.toolchain.test(request, &self.layout);
      self.exec(Step::Test, &test)?;
    }

    let mut package = None;
    if request.do_package() {
      self.enter(PipelineState::Packaging);
      let result = ArtifactLocator::new(&self.layout).package(request.platform(), request.config());
      let report = match result {
        Ok(report) => report,
        Err(e) => return Err(self.abort(e.into())),
      };
      for file in &report.files {
        info!(file = %file.display(), "packaged");
      }
      self.steps.push(Step::Package);

      let library = report.destination.join("lib").join(&report.profile.library_file_name);
      let inspect = self.toolchain.inspect(report.profile.os, &library);
      self.exec(Step::Inspect, &inspect)?;
      package = Some(report);
    }

    Ok(self.finish(package))
  }

  fn reset(&mut self) {
    self.state = PipelineState::Idle;
    self.visited = vec![PipelineState::Idle];
    self.steps.clear();
  }

  fn enter(&mut self, next: PipelineState) {
    info!(from = ?self.state, to = ?next, "pipeline transition");
    self.state = next;
    self.visited.push(next);
  }

  fn abort(&mut self, err: Error) -> Error {
    warn!(error = %err, "pipeline aborted");
    self.enter(PipelineState::Aborted(err.exit_code()));
    err
  }

  fn finish(&mut self, package: Option<PackageReport>) -> PipelineReport {
    self.enter(PipelineState::Done);
    PipelineReport {
      final_state: self.state,
      visited: self.visited.clone(),
      steps: self.steps.clone(),
      package,
    }
  }

  /// Remove the build-output directory. A missing directory is not an error.
  fn clean(&mut self) -> Result<()> {
    let dir = self.layout.build_dir.clone();
    match fs::remove_dir_all(&dir) {
      Ok(()) => {
        info!(path = ?dir, "removed build directory");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = ?dir, "build directory absent, nothing to clean");
        Ok(())
      }
      Err(e) => Err(self.abort(Error::fs(dir, e))),
    }
  }

  fn exec(&mut self, step: Step, command: &CommandSpec) -> Result<()> {
    info!(step = %step, command = %command, "running step");
    match self.runner.run(command) {
      StepOutcome::Success => {
        self.steps.push(step);
        Ok(())
      }
      StepOutcome::Failure { exit_code } => Err(self.abort(Error::ExternalCommandFailure {
        step: step.to_string(),
        exit_code,
      })),
    }
  }
}
