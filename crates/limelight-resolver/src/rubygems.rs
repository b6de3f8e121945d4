//! Vendored Ruby gems exposed as virtual `@rubygems/<gem>/...` packages.
//!
//! Both `@rubygems/<gem>/<rest>` and `node_modules/@rubygems/<gem>/<rest>`
//! name `<gem root>/<rest>`. Output references are rendered in the
//! `/node_modules/@rubygems/...` form.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use limelight_core::paths::{join_clean, to_slash};

use crate::error::ResolveError;

/// Scope prefix of virtual gem paths.
pub const GEM_SCOPE: &str = "@rubygems/";

/// A parsed virtual gem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualGemPath {
    pub name: String,
    /// Path inside the gem, without a leading `/`. May be empty.
    pub rest: String,
}

impl VirtualGemPath {
    pub fn new(name: impl Into<String>, rest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: rest.into(),
        }
    }

    /// Parse any of the accepted virtual forms.
    ///
    /// ```
    /// use limelight_resolver::VirtualGemPath;
    ///
    /// let path = VirtualGemPath::parse("node_modules/@rubygems/ui/lib/ui.js").unwrap();
    /// assert_eq!(path.name, "ui");
    /// assert_eq!(path.rest, "lib/ui.js");
    /// assert!(VirtualGemPath::parse("@hotwired/turbo").is_none());
    /// ```
    pub fn parse(specifier: &str) -> Option<Self> {
        let scoped = specifier
            .strip_prefix("/node_modules/")
            .or_else(|| specifier.strip_prefix("node_modules/"))
            .unwrap_or(specifier);

        let rest = scoped.strip_prefix(GEM_SCOPE)?;
        let (name, rest) = rest.split_once('/').unwrap_or((rest, ""));
        if name.is_empty() {
            return None;
        }

        Some(Self::new(name, rest))
    }
}

impl fmt::Display for VirtualGemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/node_modules/{GEM_SCOPE}{}", self.name)?;
        if !self.rest.is_empty() {
            write!(f, "/{}", self.rest)?;
        }
        Ok(())
    }
}

/// Gem name → absolute gem root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GemRegistry {
    gems: IndexMap<String, PathBuf>,
}

impl GemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<N, P>(entries: impl IntoIterator<Item = (N, P)>) -> Self
    where
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            gems: entries
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, root: impl Into<PathBuf>) {
        self.gems.insert(name.into(), root.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.gems.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    /// Filesystem path for a virtual gem path.
    pub fn resolve(&self, path: &VirtualGemPath) -> Result<PathBuf, ResolveError> {
        let root = self.get(&path.name).ok_or_else(|| ResolveError::UnresolvedGem {
            name: path.name.clone(),
            specifier: format!("{GEM_SCOPE}{}/{}", path.name, path.rest),
        })?;

        Ok(join_clean(root, &path.rest))
    }

    /// Inverse of [`GemRegistry::resolve`]: the virtual path for a file under
    /// a registered gem root. Nested roots pick the longest match.
    pub fn to_virtual(&self, path: &Path) -> Option<VirtualGemPath> {
        self.gems
            .iter()
            .filter_map(|(name, root)| {
                let rest = path.strip_prefix(root).ok()?;
                Some((root.as_os_str().len(), name, rest))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, name, rest)| VirtualGemPath::new(name.as_str(), to_slash(rest)))
    }
}
