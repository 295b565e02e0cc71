//! Request resolution.
//!
//! Turns raw invocation parameters into an immutable [`BuildRequest`]. This
//! module performs no I/O; a request that fails here never reaches the
//! pipeline.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::platform::Platform;

/// Build configuration passed to the toolchain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum BuildConfig {
  #[default]
  Debug,
  Release,
}

impl BuildConfig {
  /// Parse a configuration name. Only the exact spellings `Debug` and
  /// `Release` are accepted.
  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "Debug" => Some(Self::Debug),
      "Release" => Some(Self::Release),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
    }
  }
}

impl fmt::Display for BuildConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Unvalidated invocation parameters, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
  pub platform: Option<String>,
  pub config: Option<String>,
  pub build: bool,
  pub test: bool,
  pub coverage: bool,
  pub clean: bool,
  pub package: bool,
  /// Whitespace separated pass-through flags for the configure step.
  pub toolchain_flags: Option<String>,
  pub target: Option<String>,
}

/// Normalized, immutable description of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
  platform: Platform,
  config: BuildConfig,
  build: bool,
  test: bool,
  coverage: bool,
  clean: bool,
  package: bool,
  toolchain_flags: Vec<String>,
  target: Option<String>,
}

impl BuildRequest {
  pub fn platform(&self) -> Platform {
    self.platform
  }

  pub fn config(&self) -> BuildConfig {
    self.config
  }

  pub fn do_build(&self) -> bool {
    self.build
  }

  pub fn do_test(&self) -> bool {
    self.test
  }

  pub fn do_coverage(&self) -> bool {
    self.coverage
  }

  pub fn do_clean(&self) -> bool {
    self.clean
  }

  pub fn do_package(&self) -> bool {
    self.package
  }

  pub fn toolchain_flags(&self) -> &[String] {
    &self.toolchain_flags
  }

  pub fn target(&self) -> Option<&str> {
    self.target.as_deref()
  }
}

/// Split pass-through flags on whitespace, keeping their order.
///
/// Quotes and escapes are not interpreted: every token reaches the
/// toolchain exactly as written.
pub fn tokenize_flags(flags: &str) -> Vec<String> {
  flags.split_whitespace().map(str::to_string).collect()
}

/// Validate raw parameters into a [`BuildRequest`].
pub fn resolve(raw: &RawRequest) -> Result<BuildRequest> {
  let platform = match raw.platform.as_deref() {
    None => return Err(Error::invalid("platform", "a platform is required")),
    Some(value) => Platform::parse(value).ok_or_else(|| {
      Error::invalid(
        "platform",
        format!("unsupported platform '{}' (expected one of: {})", value, Platform::supported_list()),
      )
    })?,
  };

  let config = match raw.config.as_deref() {
    None => BuildConfig::default(),
    Some(value) => BuildConfig::parse(value)
      .ok_or_else(|| Error::invalid("config", format!("unsupported config '{}' (expected Debug or Release)", value)))?,
  };

  let target = match raw.target.as_deref() {
    None => None,
    Some(value) if value.trim().is_empty() => {
      return Err(Error::invalid("target", "build target must not be empty"));
    }
    Some(value) => Some(value.trim().to_string()),
  };

  let toolchain_flags = raw.toolchain_flags.as_deref().map(tokenize_flags).unwrap_or_default();

  Ok(BuildRequest {
    platform,
    config,
    build: raw.build,
    test: raw.test,
    coverage: raw.coverage,
    clean: raw.clean,
    package: raw.package,
    toolchain_flags,
    target,
  })
}
