//! Implementation of the `sdkpack build` command.
//!
//! Resolves the request before touching anything, then runs the pipeline with
//! real processes.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use sdkpack_lib::layout::{Layout, LayoutOverrides};
use sdkpack_lib::pipeline::{Pipeline, PipelineReport, Toolchain};
use sdkpack_lib::request::{RawRequest, resolve};
use sdkpack_lib::runner::ProcessRunner;

use crate::output::{OutputFormat, format_duration, print_info, print_item, print_json, print_stat, print_success};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Target platform (linux_x64, linux_x86, osx, win32, win64, uwp)
  #[arg(short, long)]
  pub platform: Option<String>,

  /// Build configuration (Debug or Release)
  #[arg(short, long)]
  pub config: Option<String>,

  /// Run the build step
  #[arg(long)]
  pub build: bool,

  /// Run the test step (requires --build)
  #[arg(long)]
  pub test: bool,

  /// Configure with coverage instrumentation
  #[arg(long)]
  pub coverage: bool,

  /// Remove the build directory first
  #[arg(long)]
  pub clean: bool,

  /// Copy the built library into the packaging layout (requires --build)
  #[arg(long)]
  pub package: bool,

  /// Extra flags passed verbatim to the configure step, split on whitespace
  #[arg(long, allow_hyphen_values = true)]
  pub toolchain_flags: Option<String>,

  /// Build only this target
  #[arg(short, long)]
  pub target: Option<String>,

  /// Project root (default: current directory)
  #[arg(long)]
  pub source_dir: Option<PathBuf>,

  /// Build-output directory (default: <source>/build)
  #[arg(long)]
  pub build_dir: Option<PathBuf>,

  /// Packaging root (default: <build>/package)
  #[arg(long)]
  pub package_dir: Option<PathBuf>,

  /// Header directory to package (default: <source>/include)
  #[arg(long)]
  pub include_dir: Option<PathBuf>,

  /// Base name of the compiled library
  #[arg(long)]
  pub library_name: Option<String>,
}

impl BuildArgs {
  fn raw_request(&self) -> RawRequest {
    RawRequest {
      platform: self.platform.clone(),
      config: self.config.clone(),
      build: self.build,
      test: self.test,
      coverage: self.coverage,
      clean: self.clean,
      package: self.package,
      toolchain_flags: self.toolchain_flags.clone(),
      target: self.target.clone(),
    }
  }

  fn overrides(&self) -> LayoutOverrides {
    LayoutOverrides {
      source_dir: self.source_dir.clone(),
      build_dir: self.build_dir.clone(),
      package_dir: self.package_dir.clone(),
      include_dir: self.include_dir.clone(),
      library_name: self.library_name.clone(),
    }
  }
}

pub fn cmd_build(args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let request = resolve(&args.raw_request())?;
  let layout = Layout::resolve(&args.overrides())?;

  // Toolchain output shares our stdout, so keep it off stdout when the report is JSON.
  let runner = if output.is_json() {
    ProcessRunner::new().with_stdout_to_stderr()
  } else {
    ProcessRunner::new()
  };
  let mut pipeline = Pipeline::new(runner, layout).with_toolchain(Toolchain::from_env());
  let report = pipeline.run(&request)?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report, request.do_build());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}

fn print_report(report: &PipelineReport, built: bool) {
  println!();
  if !built {
    print_info("Configured only, no build requested");
  }
  print_success("Pipeline complete!");

  let steps: Vec<&str> = report.steps.iter().map(|s| s.as_str()).collect();
  print_stat("Steps", &steps.join(", "));

  if let Some(package) = &report.package {
    print_stat("Platform", package.profile.platform.as_str());
    print_stat("Packaged to", &package.destination.display().to_string());
    for file in &package.files {
      print_item(&file.display().to_string());
    }
  }
}
