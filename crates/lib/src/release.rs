//! Release triggering.
//!
//! A release is started by dispatching a workflow through the GitHub CLI.
//! The tag is validated before any process is spawned.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, CommandSpec, StepOutcome};

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+$").expect("valid tag regex"));

/// A version tag of the form `v<major>.<minor>.<patch>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag(String);

impl ReleaseTag {
  pub fn parse(value: &str) -> Result<Self> {
    if TAG_PATTERN.is_match(value) {
      Ok(Self(value.to_string()))
    } else {
      Err(Error::invalid(
        "tag",
        format!("'{}' does not match the format v<major>.<minor>.<patch> (e.g. v1.0.0)", value),
      ))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ReleaseTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Where and how the release workflow is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTrigger {
  /// `owner/name` of the repository hosting the workflow.
  pub repo: String,
  pub git_ref: String,
  pub workflow: String,
  pub gh: String,
}

impl ReleaseTrigger {
  pub fn new(repo: impl Into<String>) -> Self {
    Self {
      repo: repo.into(),
      git_ref: "main".to_string(),
      workflow: "Create Release".to_string(),
      gh: "gh".to_string(),
    }
  }

  fn validate(&self) -> Result<()> {
    let mut parts = self.repo.split('/');
    let valid = matches!(
      (parts.next(), parts.next(), parts.next()),
      (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if !valid {
      return Err(Error::invalid(
        "repo",
        format!("'{}' must have the form owner/name", self.repo),
      ));
    }
    if self.git_ref.trim().is_empty() {
      return Err(Error::invalid("ref", "ref must not be empty"));
    }
    Ok(())
  }

  pub fn version_check_command(&self) -> CommandSpec {
    CommandSpec::new(&self.gh).arg("--version")
  }

  pub fn dispatch_command(&self, tag: &ReleaseTag) -> CommandSpec {
    CommandSpec::new(&self.gh)
      .args(["workflow", "run"])
      .arg(&self.workflow)
      .arg("--repo")
      .arg(&self.repo)
      .arg("--ref")
      .arg(&self.git_ref)
      .arg("-f")
      .arg(format!("tag_name={}", tag))
  }

  /// Check the GitHub CLI is available, then dispatch the release workflow.
  pub fn trigger<R: CommandRunner>(&self, runner: &mut R, tag: &ReleaseTag) -> Result<()> {
    self.validate()?;

    if let StepOutcome::Failure { exit_code } = runner.run(&self.version_check_command()) {
      return Err(Error::ExternalCommandFailure {
        step: "gh availability check".to_string(),
        exit_code,
      });
    }

    info!(tag = %tag, repo = %self.repo, git_ref = %self.git_ref, "triggering release workflow");
    match runner.run(&self.dispatch_command(tag)) {
      StepOutcome::Success => {
        info!(tag = %tag, "release workflow triggered");
        Ok(())
      }
      StepOutcome::Failure { exit_code } => Err(Error::ExternalCommandFailure {
        step: "release".to_string(),
        exit_code,
      }),
    }
  }
}
