//! CMake/CTest invocations for the configure, build and test steps, and the
//! per-OS tool that reports the architecture of a packaged library.

use std::path::Path;

use crate::consts::{ENV_CMAKE, ENV_CTEST};
use crate::layout::Layout;
use crate::platform::os::Os;
use crate::request::BuildRequest;
use crate::runner::CommandSpec;

/// Programs used for the external steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub cmake: String,
  pub ctest: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cmake: "cmake".to_string(),
      ctest: "ctest".to_string(),
    }
  }
}

/// C and C++ compiler names for an OS family.
pub fn compilers(os: Os) -> (&'static str, &'static str) {
  match os {
    Os::Windows => ("cl", "cl"),
    Os::Linux => ("gcc", "g++"),
    Os::Macos => ("clang", "clang++"),
  }
}

/// Program, and its flag if any, that prints the architecture of a static library.
pub fn inspector(os: Os) -> (&'static str, Option<&'static str>) {
  match os {
    Os::Windows => ("dumpbin", Some("/headers")),
    Os::Linux => ("file", None),
    Os::Macos => ("lipo", Some("-info")),
  }
}

impl Toolchain {
  /// Default programs, overridable through `SDKPACK_CMAKE` and `SDKPACK_CTEST`.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      cmake: std::env::var(ENV_CMAKE).ok().filter(|v| !v.is_empty()).unwrap_or(defaults.cmake),
      ctest: std::env::var(ENV_CTEST).ok().filter(|v| !v.is_empty()).unwrap_or(defaults.ctest),
    }
  }

  pub fn configure(&self, request: &BuildRequest, layout: &Layout) -> CommandSpec {
    let os = request.platform().os();
    let (cc, cxx) = compilers(os);

    let mut command = CommandSpec::new(&self.cmake)
      .arg("-B")
      .arg_path(&layout.build_dir)
      .arg("-S")
      .arg_path(&layout.source_dir)
      .arg(format!("-DCMAKE_BUILD_TYPE={}", request.config()))
      .arg(format!("-DCMAKE_C_COMPILER={}", cc))
      .arg(format!("-DCMAKE_CXX_COMPILER={}", cxx))
      .arg(format!("-DPLATFORM:STRING={}", request.platform()));

    if os == Os::Macos {
      command = command.arg("-G").arg("Xcode");
    }
    if request.do_coverage() {
      command = command.arg("-DENABLE_COVERAGE:BOOL=ON");
    }

    command.args(request.toolchain_flags().iter().cloned())
  }

  pub fn build(&self, request: &BuildRequest, layout: &Layout) -> CommandSpec {
    let command = CommandSpec::new(&self.cmake)
      .arg("--build")
      .arg_path(&layout.build_dir)
      .arg("--config")
      .arg(request.config().as_str());

    match request.target() {
      Some(target) => command.arg("--target").arg(target),
      None => command,
    }
  }

  pub fn test(&self, request: &BuildRequest, layout: &Layout) -> CommandSpec {
    CommandSpec::new(&self.ctest)
      .arg("--build-config")
      .arg(request.config().as_str())
      .arg("--verbose")
      .arg("--output-on-failure")
      .dir(&layout.build_dir)
  }

  /// Report the architecture of the packaged `library`.
  pub fn inspect(&self, os: Os, library: &Path) -> CommandSpec {
    let (program, flag) = inspector(os);
    CommandSpec::new(program).args(flag).arg_path(library)
  }
}
