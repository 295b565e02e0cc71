//! Shared helpers: a recording fake runner and request builders.

use std::fs;
use std::path::PathBuf;

use sdkpack_lib::request::{BuildRequest, RawRequest, resolve};
use sdkpack_lib::runner::{CommandRunner, CommandSpec, StepOutcome};

/// Classify a command by the step it implements.
pub fn step_of(command: &CommandSpec) -> &'static str {
  match (command.program.as_str(), command.args.first().map(String::as_str)) {
    ("cmake", Some("--build")) => "build",
    ("cmake", _) => "configure",
    ("ctest", _) => "test",
    ("file" | "lipo" | "dumpbin", _) => "inspect",
    _ => "other",
  }
}

/// Runner that records every command instead of spawning it.
///
/// Steps listed in `failures` report the given exit code. When `produces`
/// is set, the build step writes that file, standing in for the compiler.
#[derive(Default)]
pub struct FakeRunner {
  pub commands: Vec<CommandSpec>,
  pub failures: Vec<(&'static str, i32)>,
  pub produces: Option<PathBuf>,
}

impl FakeRunner {
  pub fn failing(step: &'static str, exit_code: i32) -> Self {
    Self {
      failures: vec![(step, exit_code)],
      ..Default::default()
    }
  }

  pub fn producing(path: PathBuf) -> Self {
    Self {
      produces: Some(path),
      ..Default::default()
    }
  }

  /// Step names in invocation order.
  pub fn steps(&self) -> Vec<&'static str> {
    self.commands.iter().map(step_of).collect()
  }
}

impl CommandRunner for FakeRunner {
  fn run(&mut self, command: &CommandSpec) -> StepOutcome {
    self.commands.push(command.clone());
    let step = step_of(command);

    if let Some((_, exit_code)) = self.failures.iter().find(|(s, _)| *s == step) {
      return StepOutcome::Failure { exit_code: *exit_code };
    }

    if step == "build" {
      if let Some(path) = &self.produces {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "compiled").unwrap();
      }
    }
    StepOutcome::Success
  }
}

pub fn raw(platform: &str) -> RawRequest {
  RawRequest {
    platform: Some(platform.to_string()),
    ..Default::default()
  }
}

pub fn request(platform: &str, edit: impl FnOnce(&mut RawRequest)) -> BuildRequest {
  let mut input = raw(platform);
  edit(&mut input);
  resolve(&input).unwrap()
}
