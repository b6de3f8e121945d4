//! Import maps: `specifier → specifier` rewrites applied before resolution.
//!
//! Lookup order for a specifier imported from some directory:
//! 1. `scopes` whose prefix contains the importing directory, most specific
//!    first
//! 2. top-level `imports`
//!
//! Within one table an exact key wins; otherwise the longest trailing-slash
//! key that prefixes the specifier applies, with the remainder appended to
//! its (also trailing-slash) value.
//!
//! Values are returned as written. Joining them onto the project root or
//! the resolving directory is the resolver's job.

mod eval;
mod parse;
mod store;

pub use eval::{EvalError, ScriptEvaluator};
#[cfg(feature = "eval")]
pub use eval::BoaEvaluator;
pub use parse::{ImportMapFormat, ImportMapParser};
pub use store::{CANDIDATE_FILES, ImportMapStore};

use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

type Entries = IndexMap<String, String>;

/// An immutable, normalized import map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMap {
    imports: Entries,
    scopes: IndexMap<String, Entries>,
}

/// Wire shape of an import map, before empty entries are dropped.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawImportMap {
    #[serde(default)]
    imports: IndexMap<String, Option<String>>,
    #[serde(default)]
    scopes: IndexMap<String, IndexMap<String, Option<String>>>,
}

impl From<RawImportMap> for ImportMap {
    fn from(raw: RawImportMap) -> Self {
        let scopes = raw
            .scopes
            .into_iter()
            .filter(|(prefix, _)| !prefix.is_empty())
            .map(|(prefix, entries)| (prefix, drop_empty(entries)))
            .filter(|(_, entries)| !entries.is_empty())
            .collect();

        Self {
            imports: drop_empty(raw.imports),
            scopes,
        }
    }
}

fn drop_empty(entries: IndexMap<String, Option<String>>) -> Entries {
    entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(value) if !key.is_empty() && !value.is_empty() => Some((key, value)),
            _ => None,
        })
        .collect()
}

impl ImportMap {
    /// An empty map: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from top-level `imports` entries.
    ///
    /// ```
    /// use limelight_resolver::ImportMap;
    ///
    /// let map = ImportMap::from_imports([("react", "https://esm.sh/react"), ("", "/dropped.js")]);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.lookup("react", None).as_deref(), Some("https://esm.sh/react"));
    /// ```
    pub fn from_imports<K, V>(imports: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let raw = RawImportMap {
            imports: imports
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
            scopes: IndexMap::new(),
        };
        raw.into()
    }

    /// Add a scope table applying to importers under `prefix`.
    pub fn with_scope<K, V>(
        mut self,
        prefix: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = drop_empty(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        );
        let prefix = prefix.into();
        if !prefix.is_empty() && !entries.is_empty() {
            self.scopes.insert(prefix, entries);
        }
        self
    }

    pub fn imports(&self) -> &IndexMap<String, String> {
        &self.imports
    }

    pub fn scopes(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.scopes
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.scopes.is_empty()
    }

    /// Look up `specifier` for an importer located at `referrer`, a
    /// project-absolute directory path ending in `/` (e.g. `/app/admin/`).
    pub fn lookup(&self, specifier: &str, referrer: Option<&str>) -> Option<String> {
        if let Some(referrer) = referrer {
            let mut scopes: Vec<_> = self
                .scopes
                .iter()
                .filter(|(prefix, _)| referrer.starts_with(prefix.as_str()))
                .collect();
            scopes.sort_by_key(|(prefix, _)| Reverse(prefix.len()));

            for (_, entries) in scopes {
                if let Some(value) = match_entries(entries, specifier) {
                    return Some(value);
                }
            }
        }

        match_entries(&self.imports, specifier)
    }
}

fn match_entries(entries: &Entries, specifier: &str) -> Option<String> {
    if let Some(value) = entries.get(specifier) {
        return Some(value.clone());
    }

    entries
        .iter()
        .filter(|(key, value)| {
            key.ends_with('/') && value.ends_with('/') && specifier.starts_with(key.as_str())
        })
        .max_by_key(|(key, _)| key.len())
        .map(|(key, value)| format!("{value}{}", &specifier[key.len()..]))
}
