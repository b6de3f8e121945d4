#![cfg_attr(docsrs, feature(doc_cfg))]

//! # limelight-css
//!
//! Stream-based CSS transformer: file-scoped class names for CSS modules,
//! `:global`/`:local` escapes and textual mixins.
//!
//! There is no stylesheet AST. `cssparser` lexes the source into raw
//! tokens, a [`Tokenizer`](tokenizer::Tokenizer) tracks brace nesting and lets mixin
//! bodies be spliced into the stream, and the [`CssTransformer`] rewrites
//! tokens as they go by. Malformed CSS passes through untouched.
//!
//! ```
//! use std::path::Path;
//! use limelight_css::transform_css;
//!
//! let css = transform_css(
//!     "@define-mixin red { color: red; } header { @mixin red; }",
//!     "/foo.css",
//!     Path::new("/app"),
//! )
//! .unwrap();
//! assert_eq!(css, "header { color: red; }");
//! ```

pub mod error;
pub mod hash;
pub mod token;
pub mod mixins;
pub mod scope;
pub mod tokenizer;
mod transform;

pub use error::{CssError, Result};
pub use hash::{PATH_HASH_LEN, path_hash};
pub use mixins::MixinRegistry;
pub use transform::{CssTransformer, transform_css};
