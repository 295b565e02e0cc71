//! Directory layout for one run.
//!
//! Each directory is taken from an explicit override, then from its
//! environment variable, then from the default derived from the source
//! directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{
  DEFAULT_LIBRARY_NAME, ENV_BUILD_DIR, ENV_INCLUDE_DIR, ENV_LIBRARY_NAME, ENV_PACKAGE_DIR, ENV_SOURCE_DIR,
};
use crate::error::{Error, Result};

/// Resolved directories and artifact name used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  /// Project root handed to the configure step.
  pub source_dir: PathBuf,
  /// Build-output directory. Removed by the clean step.
  pub build_dir: PathBuf,
  /// Root of the canonical packaging layout.
  pub package_dir: PathBuf,
  /// Header tree copied next to the packaged library, when it exists.
  pub include_dir: PathBuf,
  /// Base name of the compiled library.
  pub library_name: String,
}

impl Layout {
  /// Default layout rooted at `source_dir`.
  pub fn new(source_dir: impl Into<PathBuf>) -> Self {
    let source_dir = source_dir.into();
    let build_dir = source_dir.join("build");
    Self {
      package_dir: build_dir.join("package"),
      include_dir: source_dir.join("include"),
      build_dir,
      source_dir,
      library_name: DEFAULT_LIBRARY_NAME.to_string(),
    }
  }

  /// Resolve the layout from overrides, the environment and the current directory.
  pub fn resolve(overrides: &LayoutOverrides) -> Result<Self> {
    let cwd = std::env::current_dir().map_err(|e| Error::fs(".", e))?;

    let source = pick(overrides.source_dir.as_deref(), ENV_SOURCE_DIR).unwrap_or_else(|| cwd.clone());
    let source = absolute(&cwd, &source);
    if !source.is_dir() {
      return Err(Error::invalid(
        "source_dir",
        format!("{} is not a directory", source.display()),
      ));
    }
    let source = dunce::canonicalize(&source).map_err(|e| Error::fs(&source, e))?;

    let mut layout = Layout::new(source);
    if let Some(dir) = pick(overrides.build_dir.as_deref(), ENV_BUILD_DIR) {
      layout.build_dir = absolute(&cwd, &dir);
      layout.package_dir = layout.build_dir.join("package");
    }
    if let Some(dir) = pick(overrides.package_dir.as_deref(), ENV_PACKAGE_DIR) {
      layout.package_dir = absolute(&cwd, &dir);
    }
    if let Some(dir) = pick(overrides.include_dir.as_deref(), ENV_INCLUDE_DIR) {
      layout.include_dir = absolute(&cwd, &dir);
    }

    let name = overrides
      .library_name
      .clone()
      .or_else(|| std::env::var(ENV_LIBRARY_NAME).ok())
      .unwrap_or_else(|| DEFAULT_LIBRARY_NAME.to_string());
    layout.library_name = validate_library_name(&name)?;

    if layout.package_dir.starts_with(&layout.include_dir) {
      return Err(Error::invalid(
        "package_dir",
        format!(
          "{} is inside the header directory {}",
          layout.package_dir.display(),
          layout.include_dir.display()
        ),
      ));
    }

    debug!(
      source = ?layout.source_dir,
      build = ?layout.build_dir,
      package = ?layout.package_dir,
      include = ?layout.include_dir,
      library = %layout.library_name,
      "resolved layout"
    );
    Ok(layout)
  }
}

/// Explicit directory choices, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
  pub source_dir: Option<PathBuf>,
  pub build_dir: Option<PathBuf>,
  pub package_dir: Option<PathBuf>,
  pub include_dir: Option<PathBuf>,
  pub library_name: Option<String>,
}

fn pick(explicit: Option<&Path>, var: &str) -> Option<PathBuf> {
  explicit
    .map(Path::to_path_buf)
    .or_else(|| std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from))
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    cwd.join(path)
  }
}

fn validate_library_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::invalid("library_name", "library name must not be empty"));
  }
  if name.contains(['/', '\\']) {
    return Err(Error::invalid(
      "library_name",
      format!("'{}' must be a bare name, not a path", name),
    ));
  }
  Ok(name.to_string())
}
