use anyhow::Result;

use sdkpack_lib::consts::DEFAULT_LIBRARY_NAME;
use sdkpack_lib::platform::{Platform, PlatformProfile};

use crate::output::{OutputFormat, print_json};

pub fn cmd_platforms(library_name: Option<&str>, output: OutputFormat) -> Result<()> {
  let name = library_name.unwrap_or(DEFAULT_LIBRARY_NAME);
  let profiles: Vec<PlatformProfile> = Platform::ALL.iter().map(|p| p.profile(name)).collect();

  if output.is_json() {
    return print_json(&profiles);
  }

  println!("Supported platforms:");
  for profile in &profiles {
    println!(
      "  {:<10} {:<8} {:<7} {}",
      profile.platform.as_str(),
      profile.os.as_str(),
      profile.arch.as_str(),
      profile.library_file_name
    );
  }
  Ok(())
}
