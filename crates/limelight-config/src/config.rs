//! High-level configuration structure for Limelight.
//!
//! This module provides the main `LimelightConfig` struct and layered loading.
//! For file discovery, see the `discovery` module.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::css::CssOptions;
use crate::discovery::ConfigDiscovery;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::GlobalSettings;

/// Environment name used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Prefix for environment variable overrides (`LIMELIGHT_ENVIRONMENT=production`).
pub const ENV_PREFIX: &str = "LIMELIGHT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimelightConfig {
    /// Project root; project-absolute specifiers (`/lib/x.js`) join onto it.
    #[serde(default)]
    pub root: PathBuf,

    /// Environment name handed to script-authored import maps.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Explicit import map file. When absent the resolver probes
    /// `config/import_map.json` then `config/import_map.js`.
    #[serde(default)]
    pub import_map: Option<PathBuf>,

    /// Vendored Ruby gems: gem name → gem root directory.
    #[serde(default)]
    pub gems: IndexMap<String, PathBuf>,

    #[serde(default)]
    pub css: CssOptions,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Default for LimelightConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            environment: default_environment(),
            import_map: None,
            gems: IndexMap::new(),
            css: CssOptions::default(),
            settings: GlobalSettings::default(),
        }
    }
}

impl LimelightConfig {
    /// Defaults rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from multiple sources.
    ///
    /// Priority: environment variables > `limelight.toml` > defaults.
    /// Relative paths in the result are made absolute against `root`.
    pub fn load(root: impl AsRef<Path>) -> ConfigResult<Self> {
        let root = root.as_ref();
        let mut figment = Figment::new().merge(Serialized::defaults(Self::new(root)));

        if let Some(path) = ConfigDiscovery::new(root).find() {
            tracing::debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // Nested keys use a double underscore: LIMELIGHT_CSS__MAX_MIXIN_DEPTH
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        let config = config.rooted_at(root);
        crate::validation::validate(&config)?;
        Ok(config)
    }

    /// Create from serde_json::Value (for programmatic hosts)
    ///
    /// # Example
    ///
    /// ```
    /// use limelight_config::LimelightConfig;
    /// use serde_json::json;
    ///
    /// let config = LimelightConfig::from_value(json!({
    ///     "root": "/app",
    ///     "environment": "test",
    ///     "gems": { "ui": "/gems/ui" }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.environment, "test");
    /// assert_eq!(config.gems["ui"].to_str(), Some("/gems/ui"));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let config: Self = serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })?;
        let config = config.rooted_at(Path::new(""));
        crate::validation::validate(&config)?;
        Ok(config)
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    /// Make the root, import map path and gem roots absolute.
    fn rooted_at(mut self, base: &Path) -> Self {
        if self.root.is_relative() {
            self.root = base.join(&self.root);
        }

        if let Some(import_map) = self.import_map.take() {
            self.import_map = Some(if import_map.is_relative() {
                self.root.join(import_map)
            } else {
                import_map
            });
        }

        for path in self.gems.values_mut() {
            if path.is_relative() {
                *path = self.root.join(&*path);
            }
        }

        self
    }
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = LimelightConfig::new("/app");
        assert_eq!(config.environment, "development");
        assert!(config.import_map.is_none());
        assert!(config.gems.is_empty());
        assert!(config.css.is_module("a.module.css"));
    }

    #[test]
    fn from_value_roots_relative_paths() {
        let config = LimelightConfig::from_value(json!({
            "root": "/app",
            "import_map": "maps/imports.json",
            "gems": { "ui": "vendor/ui" }
        }))
        .unwrap();

        assert_eq!(config.import_map, Some(PathBuf::from("/app/maps/imports.json")));
        assert_eq!(config.gems["ui"], PathBuf::from("/app/vendor/ui"));
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let err = LimelightConfig::from_value(json!({ "gems": ["ui"] })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn value_roundtrip_preserves_gem_order() {
        let config = LimelightConfig::from_value(json!({
            "root": "/app",
            "gems": { "zeta": "/z", "alpha": "/a" }
        }))
        .unwrap();

        let names: Vec<_> = config.gems.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let value = config.to_value().unwrap();
        let again = LimelightConfig::from_value(value).unwrap();
        assert_eq!(again, config);
    }
}
