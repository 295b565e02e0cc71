mod cmd;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, ReleaseArgs, cmd_build, cmd_platforms, cmd_release};
use output::{OutputFormat, print_error};

/// sdkpack - build and package a native SDK with CMake
#[derive(Parser)]
#[command(name = "sdkpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Configure, build, test and package for one platform
  Build(BuildArgs),

  /// Trigger the release workflow for a version tag
  Release(ReleaseArgs),

  /// List supported platforms and their packaging profile
  Platforms {
    /// Base name of the compiled library
    #[arg(long)]
    library_name: Option<String>,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match &cli.command {
    Commands::Build(args) => cmd_build(args, cli.output),
    Commands::Release(args) => cmd_release(args),
    Commands::Platforms { library_name } => cmd_platforms(library_name.as_deref(), cli.output),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(exit_code(&err));
  }
}

/// Exit code for a failed command: the failing step's own code where there is one.
fn exit_code(err: &anyhow::Error) -> i32 {
  err
    .downcast_ref::<sdkpack_lib::Error>()
    .map(sdkpack_lib::Error::exit_code)
    .unwrap_or(1)
}
