//! Integration tests for the build pipeline.

mod common;
mod pipeline_tests;
