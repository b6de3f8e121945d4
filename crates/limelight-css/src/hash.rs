//! Per-file class name suffix.

use sha1::{Digest, Sha1};

/// Length of the hex suffix appended to scoped class names.
pub const PATH_HASH_LEN: usize = 8;

/// First eight lowercase hex digits of the SHA-1 of `logical_path`.
///
/// ```
/// use limelight_css::path_hash;
///
/// assert_eq!(path_hash("/foo.module.css"), "43c30152");
/// ```
pub fn path_hash(logical_path: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(logical_path.as_bytes());

    let mut hash = format!("{:x}", hasher.finalize());
    hash.truncate(PATH_HASH_LEN);
    hash
}
