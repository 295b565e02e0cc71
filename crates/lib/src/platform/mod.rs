//! Supported target platforms and their derived profiles.
//!
//! Every platform maps to exactly one `(os, arch)` row in [`PROFILES`]. The
//! table is indexed by the platform's position in [`Platform::ALL`], so the
//! lookup is total over the supported set without a fallible search.

pub mod arch;
pub mod os;

use std::fmt;

use serde::Serialize;

use arch::Arch;
use os::Os;

/// A target identifier accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
  LinuxX64,
  LinuxX86,
  Osx,
  Win32,
  Win64,
  Uwp,
}

/// One row of the platform table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRow {
  pub platform: Platform,
  pub os: Os,
  pub arch: Arch,
}

const fn entry(platform: Platform, os: Os, arch: Arch) -> ProfileRow {
  ProfileRow { platform, os, arch }
}

/// Platform table, in the same order as [`Platform::ALL`].
pub const PROFILES: [ProfileRow; Platform::COUNT] = [
  entry(Platform::LinuxX64, Os::Linux, Arch::X86_64),
  entry(Platform::LinuxX86, Os::Linux, Arch::X86),
  entry(Platform::Osx, Os::Macos, Arch::X86_64),
  entry(Platform::Win32, Os::Windows, Arch::X86),
  entry(Platform::Win64, Os::Windows, Arch::X86_64),
  entry(Platform::Uwp, Os::Windows, Arch::X86_64),
];

impl Platform {
  pub const COUNT: usize = 6;

  pub const ALL: [Platform; Platform::COUNT] = [
    Platform::LinuxX64,
    Platform::LinuxX86,
    Platform::Osx,
    Platform::Win32,
    Platform::Win64,
    Platform::Uwp,
  ];

  /// Parse a platform identifier such as `linux_x64`.
  ///
  /// Matching is exact after trimming surrounding whitespace.
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    Self::ALL.into_iter().find(|p| p.as_str() == value)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::LinuxX64 => "linux_x64",
      Self::LinuxX86 => "linux_x86",
      Self::Osx => "osx",
      Self::Win32 => "win32",
      Self::Win64 => "win64",
      Self::Uwp => "uwp",
    }
  }

  /// Comma separated list of every supported identifier, for error messages.
  pub fn supported_list() -> String {
    Self::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
  }

  fn row(&self) -> &'static ProfileRow {
    &PROFILES[*self as usize]
  }

  pub fn os(&self) -> Os {
    self.row().os
  }

  pub fn arch(&self) -> Arch {
    self.row().arch
  }

  /// Derive the full profile, with the artifact file name for `library_name`.
  pub fn profile(&self, library_name: &str) -> PlatformProfile {
    let row = self.row();
    PlatformProfile {
      platform: *self,
      os: row.os,
      arch: row.arch,
      library_file_name: row.os.library_file_name(library_name),
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Derived `(os, arch, artifact file name)` triple for a supported platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformProfile {
  pub platform: Platform,
  pub os: Os,
  pub arch: Arch,
  pub library_file_name: String,
}
