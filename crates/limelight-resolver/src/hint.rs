//! Typed context handed from the host's resolve hook into the resolver.

use std::path::Path;

/// Why a specifier is being resolved.
///
/// Hosts derive this from their hook arguments instead of threading untyped
/// plugin data through the bundler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolutionHint {
    /// An entry point. Bare entries name files under the project root.
    Entry,
    /// A static or dynamic import in JavaScript/TypeScript.
    #[default]
    ImportedFromScript,
    /// A `url()`/`@import` reference in CSS, where bare paths are relative.
    ImportedFromCss,
    /// The host re-dispatched a resolution this resolver already started;
    /// answer "unmatched" so the host's own lookup runs.
    ResolvingInProgress,
}

impl ResolutionHint {
    /// Derive a hint from the importing module's path.
    pub fn from_importer(importer: Option<&str>) -> Self {
        match importer {
            None => ResolutionHint::Entry,
            Some(path) if is_css(path) => ResolutionHint::ImportedFromCss,
            Some(_) => ResolutionHint::ImportedFromScript,
        }
    }
}

fn is_css(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}
