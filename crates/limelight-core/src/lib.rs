#![cfg_attr(docsrs, feature(doc_cfg))]

//! # limelight-core
//!
//! Limelight core crate - Runtime abstraction and path helpers.
//!
//! This crate provides the file-access layer that the resolver and the CSS
//! transformer share. It has no dependencies on other limelight crates, so
//! every other crate in the workspace can build on it.

pub mod paths;
pub mod runtime;

pub mod native_runtime;
pub use native_runtime::NativeRuntime;

// Test utilities (available in test builds and when test-utils feature is enabled)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export runtime types
pub use runtime::{Runtime, RuntimeError, RuntimeResult};
