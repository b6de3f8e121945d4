use std::path::{Path, PathBuf};
use std::sync::Arc;

use limelight_core::Runtime;
use parking_lot::RwLock;
use tracing::debug;

use super::eval::ScriptEvaluator;
use super::parse::{ImportMapFormat, ImportMapParser};
use super::ImportMap;
use crate::error::{ImportMapErrorKind, ImportMapParseError};

/// Files probed under the project root when no import map is configured.
pub const CANDIDATE_FILES: [&str; 2] = ["config/import_map.json", "config/import_map.js"];

#[derive(Debug, Default)]
struct StoreState {
    map: Arc<ImportMap>,
    file: Option<PathBuf>,
}

/// Holds the active import map for one project.
///
/// Readers get an `Arc` snapshot, so a build keeps the map it started with
/// even if the store is reloaded or reset afterwards. Reloads belong between
/// builds.
#[derive(Debug)]
pub struct ImportMapStore {
    root: PathBuf,
    environment: String,
    evaluator: Option<Arc<dyn ScriptEvaluator>>,
    runtime: Arc<dyn Runtime>,
    state: RwLock<StoreState>,
}

impl ImportMapStore {
    pub fn new(
        root: impl Into<PathBuf>,
        environment: impl Into<String>,
        runtime: Arc<dyn Runtime>,
    ) -> Self {
        Self {
            root: root.into(),
            environment: environment.into(),
            evaluator: None,
            runtime,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Inject the evaluator used for script import maps.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ScriptEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// First candidate file that exists under the root.
    pub fn discover(&self) -> Option<PathBuf> {
        CANDIDATE_FILES
            .iter()
            .map(|candidate| self.root.join(candidate))
            .find(|path| self.runtime.is_file(path))
    }

    /// Load `explicit`, or the discovered file when `None`.
    ///
    /// Finding no file is not an error: the store keeps an empty map.
    pub fn load(&self, explicit: Option<&Path>) -> Result<Arc<ImportMap>, ImportMapParseError> {
        let path = match explicit {
            Some(path) if path.is_relative() => Some(self.root.join(path)),
            Some(path) => Some(path.to_path_buf()),
            None => self.discover(),
        };

        let Some(path) = path else {
            debug!(root = %self.root.display(), "No import map found");
            let mut state = self.state.write();
            *state = StoreState::default();
            return Ok(Arc::clone(&state.map));
        };

        let map = Arc::new(self.parse_file(&path)?);
        debug!(
            path = %path.display(),
            entries = map.len(),
            scopes = map.scopes().len(),
            "Loaded import map"
        );

        let mut state = self.state.write();
        state.map = Arc::clone(&map);
        state.file = Some(path);
        Ok(map)
    }

    fn parse_file(&self, path: &Path) -> Result<ImportMap, ImportMapParseError> {
        let format = ImportMapFormat::from_path(path)
            .ok_or_else(|| ImportMapParseError::new(path, ImportMapErrorKind::UnsupportedFormat))?;

        let contents = self
            .runtime
            .read_to_string(path)
            .map_err(|e| ImportMapParseError::new(path, ImportMapErrorKind::Read(e)))?;

        ImportMapParser::new(path, self.environment.as_str())
            .with_evaluator(self.evaluator.clone())
            .parse(&contents, format)
    }

    /// Snapshot of the active map.
    pub fn current(&self) -> Arc<ImportMap> {
        Arc::clone(&self.state.read().map)
    }

    /// File the active map was loaded from, if any.
    pub fn file(&self) -> Option<PathBuf> {
        self.state.read().file.clone()
    }

    /// Clear to an empty map and forget the loaded file.
    pub fn reset(&self) {
        *self.state.write() = StoreState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_core::test_utils::TestRuntime;

    fn store(files: &[(&str, &str)]) -> ImportMapStore {
        let runtime = TestRuntime::with_files(files.iter().copied());
        ImportMapStore::new("/app", "development", Arc::new(runtime))
    }

    #[test]
    fn missing_file_is_empty_map() {
        let store = store(&[]);
        let map = store.load(None).unwrap();
        assert!(map.is_empty());
        assert_eq!(store.file(), None);
    }

    #[test]
    fn discovers_json_before_script() {
        let store = store(&[
            ("/app/config/import_map.json", r#"{ "imports": { "a": "/a.js" } }"#),
            ("/app/config/import_map.js", "env => ({})"),
        ]);
        assert_eq!(store.discover(), Some(PathBuf::from("/app/config/import_map.json")));
        store.load(None).unwrap();
        assert_eq!(store.current().lookup("a", None).as_deref(), Some("/a.js"));
    }

    #[test]
    fn explicit_relative_path_joins_root() {
        let store = store(&[("/app/maps/custom.json", r#"{ "imports": { "b": "./b.js" } }"#)]);
        store.load(Some(Path::new("maps/custom.json"))).unwrap();
        assert_eq!(store.file(), Some(PathBuf::from("/app/maps/custom.json")));
        assert_eq!(store.current().len(), 1);
    }

    #[test]
    fn explicit_missing_file_is_read_error() {
        let store = store(&[]);
        let err = store.load(Some(Path::new("/app/nope.json"))).unwrap_err();
        assert!(matches!(err.kind, ImportMapErrorKind::Read(_)));
        assert_eq!(err.path, PathBuf::from("/app/nope.json"));
    }

    #[test]
    fn unsupported_extension() {
        let store = store(&[("/app/map.yaml", "imports: {}")]);
        let err = store.load(Some(Path::new("map.yaml"))).unwrap_err();
        assert!(matches!(err.kind, ImportMapErrorKind::UnsupportedFormat));
    }

    #[test]
    fn reset_forgets_map_and_file() {
        let store = store(&[("/app/config/import_map.json", r#"{ "imports": { "a": "/a.js" } }"#)]);
        store.load(None).unwrap();
        let snapshot = store.current();

        store.reset();
        assert!(store.current().is_empty());
        assert_eq!(store.file(), None);
        // Earlier snapshots are unaffected.
        assert_eq!(snapshot.len(), 1);
    }
}
