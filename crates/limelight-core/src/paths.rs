//! Path helpers shared by the resolver and the CSS transformer.
//!
//! Specifiers and logical CSS paths are slash-separated strings; these
//! helpers join them onto filesystem roots and map them back.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Join `rest` onto `base` and normalize `.`/`..` components.
///
/// A leading `/` on `rest` is treated as "relative to `base`", not as a
/// filesystem root, so project-absolute paths can be joined onto the root.
pub fn join_clean(base: &Path, rest: &str) -> PathBuf {
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        return base.to_path_buf().clean();
    }
    base.join(rest).clean()
}

/// Join a project-absolute path (`/lib/x.css`) onto `root`.
///
/// Paths that already live under `root` are returned cleaned but otherwise
/// untouched, so hosts may pass either form.
pub fn join_root(root: &Path, path: &str) -> PathBuf {
    let as_path = Path::new(path);
    if !root.as_os_str().is_empty() && root != Path::new("/") && as_path.starts_with(root) {
        return as_path.to_path_buf().clean();
    }
    join_clean(root, path)
}

/// Express `path` relative to `root` as a project-absolute logical path
/// (`/lib/x.css`). Returns `None` when `path` is outside `root`.
pub fn to_logical(root: &Path, path: &Path) -> Option<String> {
    let rest = path.strip_prefix(root).ok()?;
    Some(format!("/{}", to_slash(rest)))
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
