//! Platform runtime abstraction for Limelight
//!
//! This module defines the `Runtime` trait that abstracts file access for the
//! resolver (import map loading) and the CSS transformer (mixin files loaded
//! through `@mixin ... from url(...)`). Hosts implement this trait to serve
//! virtual files, remote-fetch caches, or the plain filesystem.
//!
//! Both engines are synchronous call-and-return code, so the trait is
//! synchronous too. Implementations must be safe for concurrent reads: the
//! host may transform several CSS files on different worker threads.

use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exists but is not valid UTF-8
    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl RuntimeError {
    /// Whether this error means the file simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeError::FileNotFound(_))
    }
}

/// Platform runtime trait
///
/// # Example
///
/// ```rust
/// use limelight_core::{Runtime, RuntimeError, RuntimeResult};
/// use std::path::Path;
///
/// #[derive(Debug)]
/// struct EmptyRuntime;
///
/// impl Runtime for EmptyRuntime {
///     fn read_to_string(&self, path: &Path) -> RuntimeResult<String> {
///         Err(RuntimeError::FileNotFound(path.to_path_buf()))
///     }
///
///     fn exists(&self, _path: &Path) -> bool {
///         false
///     }
///
///     fn is_file(&self, _path: &Path) -> bool {
///         false
///     }
/// }
/// ```
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a UTF-8 text file
    fn read_to_string(&self, path: &Path) -> RuntimeResult<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path exists and is a regular file
    fn is_file(&self, path: &Path) -> bool;
}

impl<R: Runtime + ?Sized> Runtime for std::sync::Arc<R> {
    fn read_to_string(&self, path: &Path) -> RuntimeResult<String> {
        (**self).read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }
}
