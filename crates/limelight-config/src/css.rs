//! CSS transformer options.

use serde::{Deserialize, Serialize};

/// Default filename suffix marking a CSS module.
pub const DEFAULT_MODULE_SUFFIX: &str = ".module.css";

/// Default bound on nested mixin insertions.
pub const DEFAULT_MAX_MIXIN_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssOptions {
    /// Filename suffixes whose class selectors are scoped per file.
    #[serde(default = "default_module_suffixes")]
    pub module_suffixes: Vec<String>,

    /// How deep mixin expansions may nest before they pass through untouched.
    #[serde(default = "default_max_mixin_depth")]
    pub max_mixin_depth: usize,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            module_suffixes: default_module_suffixes(),
            max_mixin_depth: default_max_mixin_depth(),
        }
    }
}

impl CssOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module suffix, e.g. `.scoped.css`.
    pub fn module_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.module_suffixes.push(suffix.into());
        self
    }

    pub fn with_max_mixin_depth(mut self, depth: usize) -> Self {
        self.max_mixin_depth = depth;
        self
    }

    /// Whether `path` names a CSS module file.
    pub fn is_module(&self, path: &str) -> bool {
        self.module_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
    }
}

fn default_module_suffixes() -> Vec<String> {
    vec![DEFAULT_MODULE_SUFFIX.to_string()]
}

fn default_max_mixin_depth() -> usize {
    DEFAULT_MAX_MIXIN_DEPTH
}
