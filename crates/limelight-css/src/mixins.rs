//! Mixin definitions collected while transforming.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

/// `file#name → body` table plus the set of files already harvested.
///
/// One registry normally lives for a single top-level transform, including
/// the files it pulls in through `@mixin ... from url(...)`. Hosts that want
/// to share one across files wrap it in a lock themselves (see
/// [`CssTransformer::with_registry`](crate::CssTransformer::with_registry)).
#[derive(Debug, Default)]
pub struct MixinRegistry {
    mixins: FxHashMap<String, String>,
    loaded: FxHashSet<PathBuf>,
}

fn key(file: &Path, name: &str) -> String {
    format!("{}#{name}", file.display())
}

impl MixinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mixin body. A later definition with the same name replaces
    /// the earlier one.
    pub fn define(&mut self, file: &Path, name: &str, body: impl Into<String>) {
        self.mixins.insert(key(file, name), body.into());
    }

    pub fn get(&self, file: &Path, name: &str) -> Option<&str> {
        self.mixins.get(&key(file, name)).map(String::as_str)
    }

    /// Record that `file` is being harvested. Returns `false` if it already
    /// was, in which case its definitions are already known.
    pub fn mark_loaded(&mut self, file: &Path) -> bool {
        self.loaded.insert(file.to_path_buf())
    }

    pub fn is_loaded(&self, file: &Path) -> bool {
        self.loaded.contains(file)
    }

    pub fn len(&self) -> usize {
        self.mixins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixins.is_empty()
    }

    pub fn clear(&mut self) {
        self.mixins.clear();
        self.loaded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_by_file_and_name() {
        let mut registry = MixinRegistry::new();
        registry.define(Path::new("/a.css"), "red", "color: red;");

        assert_eq!(registry.get(Path::new("/a.css"), "red"), Some("color: red;"));
        assert_eq!(registry.get(Path::new("/b.css"), "red"), None);
        assert_eq!(registry.get(Path::new("/a.css"), "blue"), None);
    }

    #[test]
    fn redefinition_replaces() {
        let mut registry = MixinRegistry::new();
        registry.define(Path::new("/a.css"), "m", "a: 1;");
        registry.define(Path::new("/a.css"), "m", "a: 2;");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Path::new("/a.css"), "m"), Some("a: 2;"));
    }

    #[test]
    fn loads_once() {
        let mut registry = MixinRegistry::new();
        assert!(registry.mark_loaded(Path::new("/m.css")));
        assert!(!registry.mark_loaded(Path::new("/m.css")));
        assert!(registry.is_loaded(Path::new("/m.css")));

        registry.clear();
        assert!(!registry.is_loaded(Path::new("/m.css")));
    }
}
