//! Specifier classification.
//!
//! Pure predicates over a specifier string as written in source. Nothing in
//! here touches the filesystem or fails.

use std::path::Path;

/// Prefix forcing a specifier to stay an external reference.
pub const UNBUNDLE_PREFIX: &str = "unbundle:";

/// What a specifier looks like before any resolution happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecifierKind {
    /// `http://` or `https://`
    Url,
    /// `./x` or `../x`
    Relative,
    /// `/x` (project-absolute) or an OS absolute path
    Absolute,
    /// `react`, `@scope/pkg/file.js`
    Bare,
    /// `unbundle:...`
    Unbundled,
}

pub fn is_url(specifier: &str) -> bool {
    specifier.starts_with("http://") || specifier.starts_with("https://")
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

pub fn is_absolute(specifier: &str) -> bool {
    specifier.starts_with('/') || Path::new(specifier).is_absolute()
}

pub fn is_unbundled(specifier: &str) -> bool {
    specifier.starts_with(UNBUNDLE_PREFIX)
}

/// A bare module: not a URL, not absolute, not relative, not escaped.
pub fn is_bare_module(specifier: &str) -> bool {
    !is_url(specifier)
        && !is_absolute(specifier)
        && !is_relative(specifier)
        && !is_unbundled(specifier)
}

pub fn classify(specifier: &str) -> SpecifierKind {
    if is_unbundled(specifier) {
        SpecifierKind::Unbundled
    } else if is_url(specifier) {
        SpecifierKind::Url
    } else if is_relative(specifier) {
        SpecifierKind::Relative
    } else if is_absolute(specifier) {
        SpecifierKind::Absolute
    } else {
        SpecifierKind::Bare
    }
}

/// Remove the `unbundle:` escape, reporting whether it was present.
///
/// ```
/// use limelight_resolver::specifier::strip_unbundle;
///
/// assert_eq!(strip_unbundle("unbundle:react"), ("react", true));
/// assert_eq!(strip_unbundle("react"), ("react", false));
/// ```
pub fn strip_unbundle(specifier: &str) -> (&str, bool) {
    match specifier.strip_prefix(UNBUNDLE_PREFIX) {
        Some(rest) => (rest, true),
        None => (specifier, false),
    }
}

/// Leading package segment of a bare or gem-scoped path.
///
/// Scoped packages keep both segments (`@scope/name`). A leading
/// `node_modules/` is ignored so virtual gem paths report their gem.
///
/// ```
/// use limelight_resolver::specifier::extract_package_name;
///
/// assert_eq!(extract_package_name("lodash/fp/map"), Some("lodash"));
/// assert_eq!(extract_package_name("@hotwired/turbo/dist"), Some("@hotwired/turbo"));
/// assert_eq!(extract_package_name("node_modules/@rubygems/ui/x.js"), Some("@rubygems/ui"));
/// assert_eq!(extract_package_name("./local"), None);
/// ```
pub fn extract_package_name(specifier: &str) -> Option<&str> {
    let path = specifier
        .trim_start_matches('/')
        .strip_prefix("node_modules/")
        .unwrap_or(specifier);

    if !is_bare_module(path) || path.is_empty() {
        return None;
    }

    let mut segments = path.match_indices('/').map(|(idx, _)| idx);
    let end = if path.starts_with('@') {
        // Scoped package needs a name after the scope.
        let first = segments.next()?;
        if first + 1 >= path.len() {
            return None;
        }
        segments.next().unwrap_or(path.len())
    } else {
        segments.next().unwrap_or(path.len())
    };

    Some(&path[..end])
}
