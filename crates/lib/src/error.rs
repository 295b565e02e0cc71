//! Error taxonomy shared by every component.
//!
//! Every error is fatal to the current invocation. [`Error::exit_code`] is the
//! only place that turns an error into the process exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::ArtifactError;

/// Exit code for a rejected request field.
pub const EXIT_INVALID_ARGUMENT: i32 = 2;
/// Exit code when the expected build output is missing.
pub const EXIT_ARTIFACT_NOT_FOUND: i32 = 3;
/// Exit code for environmental filesystem failures.
pub const EXIT_FILESYSTEM: i32 = 4;

#[derive(Debug, Error)]
pub enum Error {
  /// A request field is malformed or unsupported. Raised before any side effect.
  #[error("invalid argument `{field}`: {reason}")]
  InvalidArgument { field: &'static str, reason: String },

  /// An external step exited non-zero.
  #[error("{step} step failed with exit code {exit_code}")]
  ExternalCommandFailure { step: String, exit_code: i32 },

  /// The packaging step could not find the build output.
  #[error("artifact not found: expected {}", expected_path.display())]
  ArtifactNotFound { expected_path: PathBuf },

  /// Directory creation, removal or copy failed.
  #[error("filesystem error at {}: {source}", path.display())]
  FileSystem {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
  pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Error::InvalidArgument {
      field,
      reason: reason.into(),
    }
  }

  pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Error::FileSystem {
      path: path.into(),
      source,
    }
  }

  /// Process exit code for this error. Never zero.
  pub fn exit_code(&self) -> i32 {
    match self {
      Error::InvalidArgument { .. } => EXIT_INVALID_ARGUMENT,
      Error::ExternalCommandFailure { exit_code, .. } => {
        if *exit_code == 0 {
          1
        } else {
          *exit_code
        }
      }
      Error::ArtifactNotFound { .. } => EXIT_ARTIFACT_NOT_FOUND,
      Error::FileSystem { .. } => EXIT_FILESYSTEM,
    }
  }
}

impl From<ArtifactError> for Error {
  fn from(err: ArtifactError) -> Self {
    match err {
      ArtifactError::NotFound { expected_path } => Error::ArtifactNotFound { expected_path },
      err @ ArtifactError::DestinationInsideHeaders { .. } => Error::invalid("package_dir", err.to_string()),
      ArtifactError::Io { path, source } => Error::FileSystem { path, source },
    }
  }
}
