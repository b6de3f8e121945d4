//! The Rolldown plugin.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use limelight_config::LimelightConfig;
use limelight_core::paths::to_logical;
use limelight_core::{NativeRuntime, Runtime};
use limelight_css::{CssTransformer, MixinRegistry};
use limelight_resolver::{
    GemRegistry, ImportMapStore, ResolutionHint, ResolvedTarget, Resolver, ScriptEvaluator,
};
use parking_lot::Mutex;
use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, Plugin, PluginContext,
};
use tracing::{debug, trace};

/// Resolves specifiers through the import map and gem registry, and
/// transforms `.css` files on load.
///
/// Specifiers the resolver does not match fall through to Rolldown's own
/// resolution.
#[derive(Debug, Clone)]
pub struct LimelightPlugin {
    root: PathBuf,
    runtime: Arc<dyn Runtime>,
    resolver: Arc<Resolver>,
    css: Arc<CssTransformer>,
}

impl LimelightPlugin {
    /// Assemble a plugin from parts. `css` should share `resolver` (see
    /// [`CssTransformer::with_resolver`]) so mixin URLs see the same import
    /// map and gems.
    pub fn new(
        root: impl Into<PathBuf>,
        runtime: Arc<dyn Runtime>,
        resolver: Arc<Resolver>,
        css: CssTransformer,
    ) -> Self {
        Self {
            root: root.into(),
            runtime,
            resolver,
            css: Arc::new(css),
        }
    }

    /// Build from configuration, reading files from disk.
    pub fn from_config(config: &LimelightConfig) -> anyhow::Result<Self> {
        Self::from_config_with(config, Arc::new(NativeRuntime::new()), default_evaluator())
    }

    /// Build from configuration with an explicit runtime and script evaluator.
    ///
    /// The import map is loaded once here: from `config.import_map` when set,
    /// otherwise from the first of `config/import_map.json` and
    /// `config/import_map.js` that exists.
    pub fn from_config_with(
        config: &LimelightConfig,
        runtime: Arc<dyn Runtime>,
        evaluator: Option<Arc<dyn ScriptEvaluator>>,
    ) -> anyhow::Result<Self> {
        let mut store = ImportMapStore::new(&config.root, &config.environment, Arc::clone(&runtime));
        if let Some(evaluator) = evaluator {
            store = store.with_evaluator(evaluator);
        }
        let import_map = store
            .load(config.import_map.as_deref())
            .context("Failed to load import map")?;

        let gems = GemRegistry::from_entries(
            config.gems.iter().map(|(name, path)| (name.clone(), path.clone())),
        );
        debug!(
            root = %config.root.display(),
            imports = import_map.len(),
            gems = gems.len(),
            "Configured Limelight plugin"
        );

        let resolver = Arc::new(
            Resolver::new(&config.root)
                .with_import_map(import_map)
                .with_gems(gems),
        );
        let css = CssTransformer::new(&config.root, Arc::clone(&runtime))
            .with_resolver(Arc::clone(&resolver))
            .with_options(config.css.clone());

        Ok(Self::new(&config.root, runtime, resolver, css))
    }

    /// Share one mixin registry across every CSS file of the build, so mixin
    /// files are read once per build instead of once per importing file.
    pub fn with_shared_mixins(mut self) -> Self {
        let registry = Arc::new(Mutex::new(MixinRegistry::new()));
        self.css = Arc::new((*self.css).clone().with_registry(registry));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn transformer(&self) -> &CssTransformer {
        &self.css
    }

    /// Resolve `specifier` as imported from `importer` (a module id, `None`
    /// for entries). `Ok(None)` hands the specifier back to the bundler,
    /// unless it was escaped with `unbundle:` and must stay external.
    pub fn resolve(
        &self,
        specifier: &str,
        importer: Option<&str>,
    ) -> anyhow::Result<Option<ResolvedTarget>> {
        let hint = ResolutionHint::from_importer(importer);
        let dir = importer
            .and_then(|importer| Path::new(importer).parent())
            .unwrap_or(&self.root);

        let resolution = self
            .resolver
            .resolve_with_hint(specifier, dir, hint)
            .with_context(|| format!("Could not resolve '{specifier}'"))?;

        if !resolution.is_matched() && !resolution.target.external {
            trace!(specifier, "Unmatched, deferring to bundler");
            return Ok(None);
        }
        Ok(Some(resolution.target))
    }

    /// Transformed contents of a `.css` module, or `None` for other ids.
    pub fn load_css(&self, id: &str) -> anyhow::Result<Option<String>> {
        if !is_css(id) {
            return Ok(None);
        }

        let path = Path::new(id);
        let source = self
            .runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read CSS file: {id}"))?;

        // Files inside a gem hash by their virtual path so the result does
        // not depend on where the gem is installed.
        let logical = to_logical(&self.root, path)
            .or_else(|| self.resolver.to_virtual_path(path))
            .unwrap_or_else(|| id.to_string());

        let code = self
            .css
            .transform(&source, &logical)
            .with_context(|| format!("Failed to transform CSS file: {id}"))?;

        debug!(id, logical = %logical, module = self.css.is_module(&logical), "Transformed CSS");
        Ok(Some(code))
    }
}

impl Plugin for LimelightPlugin {
    fn name(&self) -> Cow<'static, str> {
        "limelight".into()
    }

    fn register_hook_usage(&self) -> rolldown_plugin::HookUsage {
        use rolldown_plugin::HookUsage;
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        // Resolution is synchronous; only the result crosses into the future.
        let resolved = self.resolve(args.specifier, args.importer);

        async move {
            let Some(target) = resolved? else {
                return Ok(None);
            };
            Ok(Some(HookResolveIdOutput {
                id: target.path.into(),
                external: Some(ResolvedExternal::Bool(target.external)),
                ..Default::default()
            }))
        }
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let loaded = self.load_css(args.id);

        async move {
            let Some(code) = loaded? else {
                return Ok(None);
            };
            Ok(Some(HookLoadOutput {
                code: code.into(),
                module_type: Some(ModuleType::Css),
                ..Default::default()
            }))
        }
    }
}

fn is_css(id: &str) -> bool {
    Path::new(id)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

#[cfg(feature = "eval")]
fn default_evaluator() -> Option<Arc<dyn ScriptEvaluator>> {
    Some(Arc::new(limelight_resolver::BoaEvaluator::new()))
}

#[cfg(not(feature = "eval"))]
fn default_evaluator() -> Option<Arc<dyn ScriptEvaluator>> {
    None
}
