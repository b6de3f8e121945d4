//! Native Runtime Implementation
//!
//! This module provides a `Runtime` trait implementation for environments
//! where standard filesystem operations are available.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ NativeRuntime        │
//! │  .read_to_string()   │────▶ std::fs::read()
//! │  .exists()           │────▶ std::path::Path::exists()
//! │  .is_file()          │────▶ std::path::Path::is_file()
//! └──────────────────────┘
//! ```

// The one place std::fs is used directly.
#![allow(clippy::disallowed_methods)]

use std::path::Path;

use crate::runtime::{Runtime, RuntimeError, RuntimeResult};

/// Native filesystem Runtime implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new NativeRuntime instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime for NativeRuntime {
    fn read_to_string(&self, path: &Path) -> RuntimeResult<String> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::FileNotFound(path.to_path_buf())
            } else {
                RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;

        String::from_utf8(bytes).map_err(|_| RuntimeError::InvalidUtf8(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
