//! External command execution.
//!
//! Commands are always structured argument vectors handed straight to the
//! OS process API. Nothing is ever joined into a shell string, so flag values
//! such as platform names or paths can't be reinterpreted by a shell.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use serde::Serialize;
use tracing::{debug, error, info};

/// Exit code reported when the program could not be started at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Outcome of one external step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
  Success,
  Failure { exit_code: i32 },
}

/// A program, its arguments and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn arg_path(mut self, path: &Path) -> Self {
    self.args.push(path.to_string_lossy().into_owned());
    self
  }

  pub fn dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }
}

impl fmt::Display for CommandSpec {
  /// Human readable rendering for logs only. Never executed.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " {:?}", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Runs one external command to completion.
///
/// Implementations block until the process has exited and must not retry.
pub trait CommandRunner {
  fn run(&mut self, command: &CommandSpec) -> StepOutcome;
}

/// [`CommandRunner`] backed by real OS processes.
///
/// Standard output and error are inherited so the toolchain's output streams
/// through unmodified. Standard input is closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner {
  stdout_to_stderr: bool,
}

impl ProcessRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Send the child's standard output to our standard error instead, leaving
  /// our standard output to machine-readable reports.
  pub fn with_stdout_to_stderr(mut self) -> Self {
    self.stdout_to_stderr = true;
    self
  }

  fn child_stdout(&self) -> Stdio {
    if self.stdout_to_stderr {
      Stdio::from(io::stderr())
    } else {
      Stdio::inherit()
    }
  }
}

impl CommandRunner for ProcessRunner {
  fn run(&mut self, command: &CommandSpec) -> StepOutcome {
    info!(program = %command.program, args = ?command.args, cwd = ?command.cwd, "running command");

    let mut process = Command::new(&command.program);
    process
      .args(&command.args)
      .stdin(Stdio::null())
      .stdout(self.child_stdout())
      .stderr(Stdio::inherit());

    if let Some(dir) = &command.cwd {
      process.current_dir(dir);
    }

    // `status` waits for exit and drops every handle before returning.
    let status = match process.status() {
      Ok(status) => status,
      Err(e) => {
        error!(program = %command.program, error = %e, "failed to start command");
        return StepOutcome::Failure {
          exit_code: EXIT_SPAWN_FAILED,
        };
      }
    };

    let outcome = outcome_from_status(status);
    debug!(program = %command.program, outcome = ?outcome, "command finished");
    outcome
  }
}

fn outcome_from_status(status: ExitStatus) -> StepOutcome {
  if status.success() {
    return StepOutcome::Success;
  }

  let exit_code = match status.code() {
    Some(code) if code != 0 => code,
    Some(_) => 1,
    None => signal_exit_code(status),
  };
  StepOutcome::Failure { exit_code }
}

/// Shell convention for a signal-terminated process: 128 + signal number.
#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> i32 {
  use std::os::unix::process::ExitStatusExt;
  status.signal().map(|sig| 128 + sig).unwrap_or(1)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> i32 {
  1
}
