//! File-based config discovery
//!
//! Handles finding Limelight configuration files on the filesystem.

use std::path::{Path, PathBuf};

use crate::config::LimelightConfig;
use crate::error::{ConfigError, Result};

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "limelight.toml";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use limelight_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find `limelight.toml` in the root directory
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    /// Load config, requiring a config file to exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<LimelightConfig> {
        self.find()
            .ok_or_else(|| ConfigError::NotFound(self.root.clone()))?;
        LimelightConfig::load(&self.root)
    }
}

/// Load configuration for the current directory, falling back to defaults
/// when no `limelight.toml` exists.
pub fn discover() -> Result<LimelightConfig> {
    let root = std::env::current_dir()?;
    LimelightConfig::load(root)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn find_discovers_toml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "environment = \"test\"\n").unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), config_path);
    }

    #[test]
    fn load_returns_not_found_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        let result = discovery.load();
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }
}
