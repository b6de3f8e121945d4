//! Test utilities for limelight crates.
//!
//! - `TestRuntime`: an in-memory file table implementing `Runtime`, so
//!   resolver and transformer tests can describe a project as a list of
//!   `(path, contents)` pairs without touching the disk.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::runtime::{Runtime, RuntimeError, RuntimeResult};

/// In-memory runtime for tests.
///
/// ```rust
/// use limelight_core::test_utils::TestRuntime;
/// use limelight_core::Runtime;
/// use std::path::Path;
///
/// let runtime = TestRuntime::with_files([("/app/a.css", "body {}")]);
/// assert_eq!(runtime.read_to_string(Path::new("/app/a.css")).unwrap(), "body {}");
/// assert!(runtime.exists(Path::new("/app")));
/// ```
#[derive(Debug, Default)]
pub struct TestRuntime {
    files: RwLock<FxHashMap<PathBuf, String>>,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a runtime pre-populated with files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let runtime = Self::new();
        for (path, contents) in files {
            runtime.add_file(path, contents);
        }
        runtime
    }

    /// Add or replace a file.
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl Runtime for TestRuntime {
    fn read_to_string(&self, path: &Path) -> RuntimeResult<String> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        // Directories exist implicitly when any file lives beneath them.
        self.files
            .read()
            .keys()
            .any(|file| file == path || file.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_added_files() {
        let runtime = TestRuntime::new();
        assert!(runtime.is_empty());

        runtime.add_file("/root/x.css", ".x {}");
        assert_eq!(runtime.len(), 1);
        assert!(runtime.is_file(Path::new("/root/x.css")));
        assert!(!runtime.is_file(Path::new("/root")));
        assert!(runtime.exists(Path::new("/root")));
    }

    #[test]
    fn missing_files_are_not_found() {
        let runtime = TestRuntime::new();
        let err = runtime.read_to_string(Path::new("/nope")).unwrap_err();
        assert!(err.is_not_found());
    }
}
