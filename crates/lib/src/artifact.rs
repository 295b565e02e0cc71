//! Artifact discovery and relocation.
//!
//! The packaging layout is `<package>/<os>/<arch>/<config>/` with the library
//! under `lib/` and the header files under `include/`. Downstream packaging
//! reads this layout, so it must not change for a given platform/config.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::layout::Layout;
use crate::platform::{Platform, PlatformProfile};
use crate::request::BuildConfig;

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("artifact not found: expected {}", expected_path.display())]
  NotFound { expected_path: PathBuf },

  /// The destination lies inside the header tree, which would copy the
  /// package into itself.
  #[error(
    "package destination {} is inside the header directory {}",
    destination.display(),
    include_dir.display()
  )]
  DestinationInsideHeaders { destination: PathBuf, include_dir: PathBuf },

  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl ArtifactError {
  fn io(path: &Path, source: io::Error) -> Self {
    ArtifactError::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Extensions of the files copied from the header directory.
pub const HEADER_EXTENSIONS: [&str; 4] = ["h", "hh", "hpp", "hxx"];

/// Files written by one packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
  pub profile: PlatformProfile,
  pub config: BuildConfig,
  /// Canonical destination directory.
  pub destination: PathBuf,
  /// Copied files, relative to `destination`, in copy order.
  pub files: Vec<PathBuf>,
}

/// Maps a platform to its artifact and moves the artifact into the packaging layout.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactLocator<'a> {
  layout: &'a Layout,
}

impl<'a> ArtifactLocator<'a> {
  pub fn new(layout: &'a Layout) -> Self {
    Self { layout }
  }

  pub fn profile(&self, platform: Platform) -> PlatformProfile {
    platform.profile(&self.layout.library_name)
  }

  /// Where the toolchain leaves the library: `<build>/<config>/<file>`.
  pub fn expected_path(&self, profile: &PlatformProfile, config: BuildConfig) -> PathBuf {
    self
      .layout
      .build_dir
      .join(config.as_str())
      .join(&profile.library_file_name)
  }

  /// Canonical destination for a platform/config pair.
  pub fn destination(&self, profile: &PlatformProfile, config: BuildConfig) -> PathBuf {
    self
      .layout
      .package_dir
      .join(profile.os.as_str())
      .join(profile.arch.as_str())
      .join(config.as_str())
  }

  /// Find the built library, failing if it is not where the toolchain should have put it.
  pub fn locate(&self, platform: Platform, config: BuildConfig) -> Result<PathBuf, ArtifactError> {
    let profile = self.profile(platform);
    let expected_path = self.expected_path(&profile, config);
    if !expected_path.is_file() {
      return Err(ArtifactError::NotFound { expected_path });
    }
    debug!(path = ?expected_path, "located artifact");
    Ok(expected_path)
  }

  /// Copy the library and header files into the canonical destination.
  ///
  /// Nothing is written unless the library exists and the destination is
  /// outside the header directory. Existing files at the destination are
  /// overwritten.
  pub fn package(&self, platform: Platform, config: BuildConfig) -> Result<PackageReport, ArtifactError> {
    let artifact = self.locate(platform, config)?;
    let profile = self.profile(platform);
    let destination = self.destination(&profile, config);
    let headers = self.layout.include_dir.is_dir();

    if headers && resolve_lenient(&destination).starts_with(resolve_lenient(&self.layout.include_dir)) {
      return Err(ArtifactError::DestinationInsideHeaders {
        destination,
        include_dir: self.layout.include_dir.clone(),
      });
    }

    let mut files = Vec::new();

    let lib_dir = destination.join("lib");
    fs::create_dir_all(&lib_dir).map_err(|e| ArtifactError::io(&lib_dir, e))?;
    let lib_target = lib_dir.join(&profile.library_file_name);
    fs::copy(&artifact, &lib_target).map_err(|e| ArtifactError::io(&lib_target, e))?;
    files.push(PathBuf::from("lib").join(&profile.library_file_name));

    if headers {
      let copied = copy_headers(&self.layout.include_dir, &destination.join("include"))?;
      files.extend(copied.into_iter().map(|rel| PathBuf::from("include").join(rel)));
    } else {
      debug!(path = ?self.layout.include_dir, "no header directory, skipping");
    }

    info!(
      platform = %platform,
      config = %config,
      destination = ?destination,
      files = files.len(),
      "packaged artifact"
    );
    Ok(PackageReport {
      profile,
      config,
      destination,
      files,
    })
  }
}

/// Canonical form of `path`, resolved through its deepest existing ancestor
/// so that paths which do not exist yet still compare correctly.
fn resolve_lenient(path: &Path) -> PathBuf {
  let mut existing = path;
  let mut missing = Vec::new();
  while !existing.exists() {
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        missing.push(name.to_os_string());
        existing = parent;
      }
      _ => return path.to_path_buf(),
    }
  }

  let mut resolved = dunce::canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
  resolved.extend(missing.iter().rev());
  resolved
}

fn is_header(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
}

/// Copy every header under `src` into `dst`, keeping relative paths.
/// Returns the copied files relative to `dst`.
fn copy_headers(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, ArtifactError> {
  let mut copied = Vec::new();

  for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(src).to_path_buf();
      ArtifactError::Io {
        source: e.into_io_error().unwrap_or_else(|| io::Error::other("filesystem loop")),
        path,
      }
    })?;

    if !entry.file_type().is_file() || !is_header(entry.path()) {
      continue;
    }
    let rel = match entry.path().strip_prefix(src) {
      Ok(rel) => rel.to_path_buf(),
      Err(_) => continue,
    };
    let target = dst.join(&rel);

    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
    }
    fs::copy(entry.path(), &target).map_err(|e| ArtifactError::io(&target, e))?;
    copied.push(rel);
  }

  Ok(copied)
}
