//! Turns one specifier into a resolved target.
//!
//! Order of rules:
//! 1. strip `unbundle:` and remember to force the result external
//! 2. import map lookup (scopes, then imports); values may carry
//!    `unbundle:` too
//! 3. virtual gem paths map onto registered gem roots
//! 4. URLs and bare values pass through verbatim as externals
//! 5. absolute paths join the project root, relative paths the resolving
//!    directory
//! 6. anything else is unmatched and left to the host's package lookup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use limelight_core::paths::{join_clean, join_root, to_logical};
use tracing::{debug, trace};

use crate::error::{ResolveError, Result};
use crate::hint::ResolutionHint;
use crate::import_map::ImportMap;
use crate::rubygems::{GemRegistry, VirtualGemPath};
use crate::specifier::{self, SpecifierKind};

/// How a target was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    Relative,
    Absolute,
    Bare,
    Url,
    RubyGem,
}

/// Where a specifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: String,
    pub kind: ResolutionKind,
    /// The host must keep this as an external reference and not inline it.
    pub external: bool,
}

/// Outcome of one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: ResolvedTarget,
    /// `false` when no rule applied and the host should run its own lookup.
    pub matched: bool,
}

impl Resolution {
    fn found(path: impl Into<String>, kind: ResolutionKind, external: bool) -> Self {
        Self {
            target: ResolvedTarget {
                path: path.into(),
                kind,
                external,
            },
            matched: true,
        }
    }

    fn file(path: PathBuf, kind: ResolutionKind, external: bool) -> Self {
        Self::found(path.to_string_lossy().into_owned(), kind, external)
    }

    fn unmatched(specifier: &str, external: bool) -> Self {
        Self {
            target: ResolvedTarget {
                path: specifier.to_string(),
                kind: ResolutionKind::Bare,
                external,
            },
            matched: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The target, or `NotFound` when nothing matched.
    ///
    /// For hosts that have no package lookup of their own to fall back on.
    pub fn require(self, importer: Option<&Path>) -> Result<ResolvedTarget> {
        if self.matched {
            Ok(self.target)
        } else {
            Err(ResolveError::NotFound {
                specifier: self.target.path,
                importer: importer.map(Path::to_path_buf),
            })
        }
    }
}

/// Resolves specifiers against an import map and a gem registry.
///
/// Immutable once built; share it across worker threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    root: PathBuf,
    import_map: Arc<ImportMap>,
    gems: Arc<GemRegistry>,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn with_import_map(mut self, import_map: Arc<ImportMap>) -> Self {
        self.import_map = import_map;
        self
    }

    pub fn with_gems(mut self, gems: impl Into<Arc<GemRegistry>>) -> Self {
        self.gems = gems.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn import_map(&self) -> &ImportMap {
        &self.import_map
    }

    pub fn gems(&self) -> &GemRegistry {
        &self.gems
    }

    /// Resolve a specifier imported from script code in `dir`.
    pub fn resolve(&self, specifier: &str, dir: &Path) -> Result<Resolution> {
        self.resolve_with_hint(specifier, dir, ResolutionHint::ImportedFromScript)
    }

    pub fn resolve_with_hint(
        &self,
        specifier: &str,
        dir: &Path,
        hint: ResolutionHint,
    ) -> Result<Resolution> {
        let (stripped, mut force_external) = specifier::strip_unbundle(specifier);

        if hint == ResolutionHint::ResolvingInProgress {
            trace!(specifier, "Resolution already in progress, deferring to host");
            return Ok(Resolution::unmatched(stripped, force_external));
        }

        let referrer = self.referrer(dir);
        let mapped = self.import_map.lookup(stripped, referrer.as_deref());
        let from_map = mapped.is_some();

        let path = match &mapped {
            Some(value) => {
                let (value, escaped) = specifier::strip_unbundle(value);
                force_external |= escaped;
                debug!(specifier, target = value, "Import map hit");
                value
            }
            None => stripped,
        };

        if let Some(gem) = self.virtual_gem(path) {
            let target = self.gems.resolve(&gem).map_err(|e| match e {
                ResolveError::UnresolvedGem { name, .. } => ResolveError::UnresolvedGem {
                    name,
                    specifier: specifier.to_string(),
                },
                other => other,
            })?;
            debug!(specifier, gem = %gem.name, target = %target.display(), "Resolved gem path");
            return Ok(Resolution::file(target, ResolutionKind::RubyGem, force_external));
        }

        let resolution = match specifier::classify(path) {
            SpecifierKind::Url => Resolution::found(path, ResolutionKind::Url, true),
            SpecifierKind::Absolute => Resolution::file(
                join_root(&self.root, path),
                ResolutionKind::Absolute,
                force_external,
            ),
            SpecifierKind::Relative => {
                Resolution::file(join_clean(dir, path), ResolutionKind::Relative, force_external)
            }
            // A nested escape inside an import map value.
            SpecifierKind::Unbundled => Resolution::found(path, ResolutionKind::Bare, true),
            SpecifierKind::Bare if from_map => Resolution::found(path, ResolutionKind::Bare, true),
            SpecifierKind::Bare => match hint {
                ResolutionHint::Entry => Resolution::file(
                    join_clean(&self.root, path),
                    ResolutionKind::Relative,
                    force_external,
                ),
                ResolutionHint::ImportedFromCss => {
                    Resolution::file(join_clean(dir, path), ResolutionKind::Relative, force_external)
                }
                _ => Resolution::unmatched(path, force_external),
            },
        };

        trace!(
            specifier,
            target = %resolution.target.path,
            kind = ?resolution.target.kind,
            matched = resolution.matched,
            "Resolved"
        );
        Ok(resolution)
    }

    /// Virtual gem path for a file under a registered gem root, in the
    /// `/node_modules/@rubygems/<gem>/<rest>` form used in output.
    pub fn to_virtual_path(&self, path: &Path) -> Option<String> {
        self.gems.to_virtual(path).map(|gem| gem.to_string())
    }

    fn virtual_gem(&self, path: &str) -> Option<VirtualGemPath> {
        VirtualGemPath::parse(path).or_else(|| {
            // `<root>/node_modules/@rubygems/...` as produced by an earlier join.
            let logical = to_logical(&self.root, Path::new(path))?;
            VirtualGemPath::parse(&logical)
        })
    }

    /// Project-absolute form of `dir` with a trailing slash, for scope lookup.
    fn referrer(&self, dir: &Path) -> Option<String> {
        let logical = to_logical(&self.root, dir)?;
        Some(if logical.ends_with('/') {
            logical
        } else {
            format!("{logical}/")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new("/app")
            .with_import_map(Arc::new(ImportMap::from_imports([
                ("react", "https://esm.sh/react"),
                ("app", "/lib/app.js"),
                ("local", "./local.js"),
                ("alias", "preact"),
                ("ext", "unbundle:/vendor/ext.js"),
                ("ui", "@rubygems/ui/index.js"),
            ])))
            .with_gems(GemRegistry::from_entries([("ui", "/gems/ui-1.0")]))
    }

    fn resolve(specifier: &str) -> Resolution {
        resolver().resolve(specifier, Path::new("/app/src")).unwrap()
    }

    #[test]
    fn import_map_url_is_external() {
        let resolution = resolve("react");
        assert!(resolution.matched);
        assert_eq!(resolution.target.path, "https://esm.sh/react");
        assert_eq!(resolution.target.kind, ResolutionKind::Url);
        assert!(resolution.target.external);
    }

    #[test]
    fn import_map_absolute_joins_root() {
        let resolution = resolve("app");
        assert_eq!(resolution.target.path, "/app/lib/app.js");
        assert_eq!(resolution.target.kind, ResolutionKind::Absolute);
        assert!(!resolution.target.external);
    }

    #[test]
    fn import_map_relative_joins_dir() {
        assert_eq!(resolve("local").target.path, "/app/src/local.js");
    }

    #[test]
    fn import_map_bare_value_is_verbatim() {
        let resolution = resolve("alias");
        assert!(resolution.matched);
        assert_eq!(resolution.target.path, "preact");
        assert!(resolution.target.external);
    }

    #[test]
    fn unbundle_in_value_forces_external() {
        let resolution = resolve("ext");
        assert_eq!(resolution.target.path, "/app/vendor/ext.js");
        assert!(resolution.target.external);
    }

    #[test]
    fn unbundle_in_specifier_forces_external() {
        let resolution = resolve("unbundle:./widget.js");
        assert_eq!(resolution.target.path, "/app/src/widget.js");
        assert!(resolution.target.external);
    }

    #[test]
    fn import_map_value_may_be_gem_path() {
        let resolution = resolve("ui");
        assert_eq!(resolution.target.kind, ResolutionKind::RubyGem);
        assert_eq!(resolution.target.path, "/gems/ui-1.0/index.js");
    }

    #[test]
    fn unknown_gem_reports_original_specifier() {
        let err = resolver()
            .resolve("@rubygems/missing/a.js", Path::new("/app"))
            .unwrap_err();
        match err {
            ResolveError::UnresolvedGem { name, specifier } => {
                assert_eq!(name, "missing");
                assert_eq!(specifier, "@rubygems/missing/a.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn root_joined_gem_path() {
        let resolution = resolve("/node_modules/@rubygems/ui/a.css");
        assert_eq!(resolution.target.path, "/gems/ui-1.0/a.css");

        let resolution = resolve("/app/node_modules/@rubygems/ui/a.css");
        assert_eq!(resolution.target.path, "/gems/ui-1.0/a.css");
    }

    #[test]
    fn plain_paths() {
        assert_eq!(resolve("./a.js").target.path, "/app/src/a.js");
        assert_eq!(resolve("../a.js").target.path, "/app/a.js");
        assert_eq!(resolve("/lib/a.js").target.path, "/app/lib/a.js");
        assert_eq!(resolve("/app/lib/a.js").target.path, "/app/lib/a.js");
    }

    #[test]
    fn urls_pass_through() {
        let resolution = resolve("https://cdn.dev/x.js");
        assert!(resolution.matched);
        assert!(resolution.target.external);
        assert_eq!(resolution.target.path, "https://cdn.dev/x.js");
    }

    #[test]
    fn unmapped_bare_is_unmatched() {
        let resolution = resolve("pkg");
        assert!(!resolution.matched);
        assert_eq!(resolution.target.path, "pkg");

        let err = resolution.require(Some(Path::new("/app/src/a.js"))).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn bare_entry_resolves_against_root() {
        let resolution = resolver()
            .resolve_with_hint("src/main.js", Path::new("/app/src"), ResolutionHint::Entry)
            .unwrap();
        assert!(resolution.matched);
        assert_eq!(resolution.target.path, "/app/src/main.js");
    }

    #[test]
    fn bare_css_reference_is_relative() {
        let resolution = resolver()
            .resolve_with_hint("mixins.css", Path::new("/app/styles"), ResolutionHint::ImportedFromCss)
            .unwrap();
        assert_eq!(resolution.target.path, "/app/styles/mixins.css");
    }

    #[test]
    fn in_progress_defers_to_host() {
        let resolution = resolver()
            .resolve_with_hint("app", Path::new("/app"), ResolutionHint::ResolvingInProgress)
            .unwrap();
        assert!(!resolution.matched);
        assert_eq!(resolution.target.path, "app");
    }

    #[test]
    fn scopes_follow_resolving_directory() {
        let map = ImportMap::from_imports([("dep", "/dep-v1.js")])
            .with_scope("/admin/", [("dep", "/dep-v2.js")]);
        let resolver = Resolver::new("/app").with_import_map(Arc::new(map));

        let outside = resolver.resolve("dep", Path::new("/app/shop")).unwrap();
        assert_eq!(outside.target.path, "/app/dep-v1.js");

        let inside = resolver.resolve("dep", Path::new("/app/admin/pages")).unwrap();
        assert_eq!(inside.target.path, "/app/dep-v2.js");
    }

    #[test]
    fn to_virtual_path_round_trip() {
        let resolver = resolver();
        assert_eq!(
            resolver.to_virtual_path(Path::new("/gems/ui-1.0/index.js")).as_deref(),
            Some("/node_modules/@rubygems/ui/index.js")
        );
        assert_eq!(resolver.to_virtual_path(Path::new("/app/index.js")), None);
    }
}
