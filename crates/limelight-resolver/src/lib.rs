#![cfg_attr(docsrs, feature(doc_cfg))]

//! # limelight-resolver
//!
//! Specifier resolution for Limelight builds.
//!
//! Given an import specifier and the directory of the importing file, the
//! [`Resolver`] decides what the specifier points to:
//!
//! - import map entries (JSON or script-authored, with scopes and prefix
//!   keys)
//! - vendored Ruby gems addressed as `@rubygems/<gem>/...`
//! - project-absolute and relative paths
//! - URLs and `unbundle:` escapes, which always stay external
//!
//! Bare specifiers nothing claims come back unmatched so the host bundler can
//! run its own package lookup.
//!
//! ```
//! use std::path::Path;
//! use limelight_resolver::{GemRegistry, Resolver};
//!
//! let resolver = Resolver::new("/app").with_gems(GemRegistry::from_entries([("gem2", "/ext/gem2")]));
//!
//! let resolution = resolver.resolve("@rubygems/gem2/lib/gem2/gem2.js", Path::new("")).unwrap();
//! assert_eq!(resolution.target.path, "/ext/gem2/lib/gem2/gem2.js");
//! assert_eq!(
//!     resolver.to_virtual_path(Path::new(&resolution.target.path)).as_deref(),
//!     Some("/node_modules/@rubygems/gem2/lib/gem2/gem2.js")
//! );
//!
//! assert!(!resolver.resolve("pkg", Path::new("/app")).unwrap().matched);
//! ```

pub mod error;
pub mod hint;
pub mod import_map;
pub mod resolver;
pub mod rubygems;
pub mod specifier;

pub use error::{ImportMapErrorKind, ImportMapParseError, ResolveError, Result};
pub use hint::ResolutionHint;
#[cfg(feature = "eval")]
pub use import_map::BoaEvaluator;
pub use import_map::{
    EvalError, ImportMap, ImportMapFormat, ImportMapParser, ImportMapStore, ScriptEvaluator,
};
pub use resolver::{Resolution, ResolutionKind, ResolvedTarget, Resolver};
pub use rubygems::{GEM_SCOPE, GemRegistry, VirtualGemPath};
pub use specifier::{SpecifierKind, UNBUNDLE_PREFIX};
