use std::fmt;

use serde::Serialize;

/// Operating system families a platform can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Os {
  Windows,
  Linux,
  Macos,
}

impl Os {
  /// Returns the identifier used in the packaging layout
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "Windows",
      Self::Linux => "Linux",
      Self::Macos => "Macos",
    }
  }

  /// File name of a static library called `name` on this OS.
  pub fn library_file_name(&self, name: &str) -> String {
    match self {
      Self::Windows => format!("{}.lib", name),
      Self::Linux | Self::Macos => format!("lib{}.a", name),
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
