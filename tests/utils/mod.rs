// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

pub mod actions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::TestResponse;
pub use setup::{TestApp, TestAppBuilder};
