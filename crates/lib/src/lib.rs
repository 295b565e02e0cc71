//! sdkpack-lib: build-and-package orchestration for a native SDK.
//!
//! This crate turns a declarative build request into CMake/CTest invocations
//! and relocates the compiled library into a canonical packaging layout:
//! - `request`: validates raw parameters into an immutable `BuildRequest`
//! - `runner`: runs one external command and reports its exit code
//! - `pipeline`: sequences clean, configure, build, test and package
//! - `artifact`: locates the built library and copies it into place
//! - `release`: validates version tags and dispatches the release workflow

pub mod artifact;
pub mod consts;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod platform;
pub mod release;
pub mod request;
pub mod runner;
pub mod util;

pub use error::{Error, Result};
