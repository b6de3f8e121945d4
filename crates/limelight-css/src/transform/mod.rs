//! The CSS transformer.
//!
//! One pass over the token stream, emitting text as it goes:
//!
//! - class selectors in module files get the file's path hash appended,
//!   except inside bare `:global { ... }` blocks
//! - `:global(...)`, `:local(...)` and their bare forms are rewritten away
//! - `@define-mixin` blocks at the top level are recorded and dropped
//! - `@mixin name;` and `@mixin name from url(...);` are replaced by the
//!   mixin body, spliced into the token stream so the rules above apply to
//!   it as well
//!
//! Anything unexpected passes through unchanged. The only fatal input is a
//! `:global(...)`/`:local(...)` without a class selector.

mod mixin;
mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use limelight_config::CssOptions;
use limelight_core::paths::join_root;
use limelight_core::{NativeRuntime, Runtime};
use limelight_resolver::Resolver;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::hash::path_hash;
use crate::mixins::MixinRegistry;
use session::{Mode, Session};

/// Transforms CSS files for one project.
///
/// Holds no per-file state: each call builds its own tokenizer and scope
/// frames, so one transformer can serve many worker threads.
#[derive(Debug, Clone)]
pub struct CssTransformer {
    root: PathBuf,
    runtime: Arc<dyn Runtime>,
    resolver: Arc<Resolver>,
    options: CssOptions,
    registry: Option<Arc<Mutex<MixinRegistry>>>,
}

impl CssTransformer {
    /// A transformer reading mixin files through `runtime`, resolving mixin
    /// URLs with a plain resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, runtime: Arc<dyn Runtime>) -> Self {
        let root = root.into();
        Self {
            resolver: Arc::new(Resolver::new(root.clone())),
            root,
            runtime,
            options: CssOptions::default(),
            registry: None,
        }
    }

    /// Resolve mixin URLs with `resolver` (import map, gems). It should be
    /// rooted at the same project root.
    pub fn with_resolver(mut self, resolver: Arc<Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_options(mut self, options: CssOptions) -> Self {
        self.options = options;
        self
    }

    /// Share one mixin registry across every file this transformer handles.
    ///
    /// Transforms then run one at a time while holding the lock.
    pub fn with_registry(mut self, registry: Arc<Mutex<MixinRegistry>>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &CssOptions {
        &self.options
    }

    pub fn is_module(&self, logical_path: &str) -> bool {
        self.options.is_module(logical_path)
    }

    /// Transform `source`, the contents of the file at `logical_path`
    /// (project-absolute, e.g. `/app/button.module.css`).
    pub fn transform(&self, source: &str, logical_path: &str) -> Result<String> {
        match &self.registry {
            Some(shared) => {
                let mut registry = shared.lock();
                self.transform_with(source, logical_path, &mut registry)
            }
            None => self.transform_with(source, logical_path, &mut MixinRegistry::new()),
        }
    }

    /// Transform with a caller-owned mixin registry.
    pub fn transform_with(
        &self,
        source: &str,
        logical_path: &str,
        registry: &mut MixinRegistry,
    ) -> Result<String> {
        let hash = self.is_module(logical_path).then(|| path_hash(logical_path));
        debug!(path = logical_path, module = hash.is_some(), "Transforming CSS");

        let file = join_root(&self.root, logical_path);
        Session::new(self, registry, source, file, logical_path.to_string(), Mode::Emit, hash).run()
    }
}

/// Transform one file with default options, reading mixin files from disk.
///
/// ```
/// use std::path::Path;
/// use limelight_css::transform_css;
///
/// let css = transform_css(".title { color: green; }", "/foo.module.css", Path::new("/app")).unwrap();
/// assert_eq!(css, ".title43c30152 { color: green; }");
/// ```
pub fn transform_css(source: &str, logical_path: &str, root: &Path) -> Result<String> {
    CssTransformer::new(root, Arc::new(NativeRuntime::new())).transform(source, logical_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CssError;
    use limelight_core::test_utils::TestRuntime;

    const MODULE: &str = "/app/a.module.css";

    fn transformer() -> CssTransformer {
        CssTransformer::new("/project", Arc::new(TestRuntime::new()))
    }

    fn module(source: &str) -> String {
        transformer().transform(source, MODULE).unwrap()
    }

    fn hashed(class: &str) -> String {
        format!("{class}{}", path_hash(MODULE))
    }

    #[test]
    fn hashes_every_class_in_module_files() {
        let out = module(".a, .b > .c {}");
        assert_eq!(out, format!("{}, {} > {} {{}}", hashed(".a"), hashed(".b"), hashed(".c")));
    }

    #[test]
    fn leaves_plain_files_alone() {
        let source = ".a :global(.b) { color: red; } :local .c {}";
        assert_eq!(transformer().transform(source, "/app/a.css").unwrap(), source);
    }

    #[test]
    fn custom_module_suffix() {
        let transformer = transformer().with_options(CssOptions::new().module_suffix(".scoped.css"));
        let out = transformer.transform(".a {}", "/x.scoped.css").unwrap();
        assert_eq!(out, format!(".a{} {{}}", path_hash("/x.scoped.css")));
    }

    #[test]
    fn pseudo_classes_and_numbers_pass_through() {
        let out = module("a:hover .b:not(.c) { margin: .5em; color: #fff; }");
        assert_eq!(
            out,
            format!("a:hover {}:not({}) {{ margin: .5em; color: #fff; }}", hashed(".b"), hashed(".c"))
        );
    }

    #[test]
    fn global_function_keeps_class_and_scopes_nothing_else() {
        let out = module(":global(.x) { .y {} }");
        assert_eq!(out, format!(".x {{ {} {{}} }}", hashed(".y")));
    }

    #[test]
    fn local_function_hashes_its_argument() {
        let out = module(":local(.x) { color: red }");
        assert_eq!(out, format!("{} {{ color: red }}", hashed(".x")));
    }

    #[test]
    fn global_function_inside_a_compound_selector() {
        let out = module(".a :global(.b) .c {}");
        assert_eq!(out, format!("{} .b {} {{}}", hashed(".a"), hashed(".c")));
    }

    #[test]
    fn global_block_unwraps_and_stops_hashing() {
        let out = module(":global { .x { .y {} } }");
        assert_eq!(out.trim(), ".x { .y {} }");
    }

    #[test]
    fn local_block_inside_global_block_hashes_again() {
        let out = module(":global { :local { .x {} } .y {} }");
        assert!(out.contains(&format!("{} {{}}", hashed(".x"))), "{out}");
        assert!(out.contains(".y {}"), "{out}");
        assert!(!out.contains(&hashed(".y")), "{out}");
        assert!(!out.contains(':'), "{out}");
    }

    #[test]
    fn global_block_ends_with_its_brace() {
        let out = module(":global { .x {} }\n.z {}");
        assert!(out.contains(".x {}"), "{out}");
        assert!(out.ends_with(&format!("{} {{}}", hashed(".z"))), "{out}");
    }

    #[test]
    fn bare_global_before_a_class_selector() {
        let out = module(":global .foo { .bar {} }");
        assert_eq!(out, format!(".foo {{ {} {{}} }}", hashed(".bar")));
    }

    #[test]
    fn bare_local_before_a_class_selector() {
        assert_eq!(module(":local .foo {}"), format!("{} {{}}", hashed(".foo")));
    }

    #[test]
    fn bare_global_before_an_element_selector_scopes_the_block() {
        assert_eq!(module(":global h1 { .x {} }"), "h1 { .x {} }");
    }

    #[test]
    fn global_function_inside_a_bare_local_selector() {
        assert_eq!(module(":local .a :global(.b) {}"), format!("{} .b {{}}", hashed(".a")));
    }

    #[test]
    fn local_function_inside_a_bare_global_selector() {
        assert_eq!(module(":global .a :local(.b) {}"), format!(".a {} {{}}", hashed(".b")));
    }

    #[test]
    fn nested_directive_without_a_class_is_an_error() {
        let err = transformer().transform(":local .a :global(h1) {}", MODULE).unwrap_err();
        assert!(
            matches!(&err, CssError::MalformedScopeDirective { directive, .. } if directive == ":global(h1)"),
            "{err}"
        );
    }

    #[test]
    fn global_function_without_a_class_is_an_error() {
        let err = transformer().transform(":global(h1) {}", MODULE).unwrap_err();
        match err {
            CssError::MalformedScopeDirective { directive, file } => {
                assert_eq!(directive, ":global(h1)");
                assert_eq!(file, MODULE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mixin_definitions_are_removed_and_expanded() {
        let out = transformer()
            .transform("@define-mixin red { color: red; } header { @mixin red; }", "/foo.css")
            .unwrap();
        assert_eq!(out, "header { color: red; }");
    }

    #[test]
    fn mixins_nest() {
        let source = "@define-mixin a { color: red; }\n@define-mixin b { @mixin a; margin: 0; }\np { @mixin b; }";
        assert_eq!(transformer().transform(source, "/m.css").unwrap(), "p { color: red; margin: 0; }");
    }

    #[test]
    fn mixin_bodies_are_scoped_like_inline_rules() {
        let out = module("@define-mixin btn { .icon { color: red; } }\n.b { @mixin btn; }");
        assert_eq!(out, format!("{} {{ {} {{ color: red; }} }}", hashed(".b"), hashed(".icon")));
    }

    #[test]
    fn unknown_mixin_is_left_in_place() {
        let source = "a { @mixin unknown; }";
        assert_eq!(transformer().transform(source, "/m.css").unwrap(), source);
    }

    #[test]
    fn definition_inside_a_block_is_dropped() {
        let source = "a { @define-mixin x { color: red; } color: blue; }\nb { @mixin x; }";
        assert_eq!(
            transformer().transform(source, "/m.css").unwrap(),
            "a {  color: blue; }\nb { @mixin x; }"
        );
    }

    #[test]
    fn recursive_mixin_stops_at_max_depth() {
        let transformer = transformer().with_options(CssOptions::new().with_max_mixin_depth(3));
        let source = "@define-mixin a { x: 1; @mixin a; }\np { @mixin a; }";
        assert_eq!(
            transformer.transform(source, "/m.css").unwrap(),
            "p { x: 1; x: 1; x: 1; @mixin a; }"
        );
    }

    #[test]
    fn sequential_uses_do_not_count_as_nesting() {
        let transformer = transformer().with_options(CssOptions::new().with_max_mixin_depth(1));
        let source = "@define-mixin a { x: 1; }\np { @mixin a; } q { @mixin a; }";
        assert_eq!(transformer.transform(source, "/m.css").unwrap(), "p { x: 1; } q { x: 1; }");
    }

    #[test]
    fn malformed_input_passes_through() {
        let source = ".a { color: red; ";
        assert_eq!(module(source), format!("{} {{ color: red; ", hashed(".a")));
        assert_eq!(module(". { }"), ". { }");
        assert_eq!(module("@mixin;"), "@mixin;");
    }

    #[test]
    fn registry_is_per_call_unless_shared() {
        let source = "@define-mixin a { x: 1; }";
        let transformer = transformer();
        transformer.transform(source, "/m.css").unwrap();
        assert_eq!(transformer.transform("p { @mixin a; }", "/m.css").unwrap(), "p { @mixin a; }");

        let shared = Arc::new(Mutex::new(MixinRegistry::new()));
        let transformer = transformer.with_registry(shared.clone());
        transformer.transform(source, "/m.css").unwrap();
        assert_eq!(transformer.transform("p { @mixin a; }", "/m.css").unwrap(), "p { x: 1; }");
        assert_eq!(shared.lock().len(), 1);
    }
}
