use anyhow::Result;
use clap::Args;

use sdkpack_lib::consts::ENV_RELEASE_REPO;
use sdkpack_lib::release::{ReleaseTag, ReleaseTrigger};
use sdkpack_lib::runner::ProcessRunner;

use crate::output::print_success;

#[derive(Debug, Args)]
pub struct ReleaseArgs {
  /// Version tag to release, e.g. v1.2.3
  pub tag: String,

  /// Repository hosting the release workflow (owner/name)
  #[arg(long, env = ENV_RELEASE_REPO)]
  pub repo: String,

  /// Git ref the workflow runs on
  #[arg(long = "ref", default_value = "main")]
  pub git_ref: String,

  /// Name of the release workflow
  #[arg(long, default_value = "Create Release")]
  pub workflow: String,
}

pub fn cmd_release(args: &ReleaseArgs) -> Result<()> {
  let tag = ReleaseTag::parse(&args.tag)?;

  let trigger = ReleaseTrigger {
    git_ref: args.git_ref.clone(),
    workflow: args.workflow.clone(),
    ..ReleaseTrigger::new(&args.repo)
  };
  trigger.trigger(&mut ProcessRunner::new(), &tag)?;

  print_success(&format!("Release workflow triggered for {}", tag));
  Ok(())
}
