mod build;
mod platforms;
mod release;

pub use build::{BuildArgs, cmd_build};
pub use platforms::cmd_platforms;
pub use release::{ReleaseArgs, cmd_release};
