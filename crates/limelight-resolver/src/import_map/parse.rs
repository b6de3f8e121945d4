use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use super::eval::{EvalError, ScriptEvaluator};
use super::{ImportMap, RawImportMap};
use crate::error::{ImportMapErrorKind, ImportMapParseError};

/// Source format of an import map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMapFormat {
    /// `{ "imports": { ... } }`
    Json,
    /// A script evaluating to `environment => ({ imports: { ... } })`.
    Script,
}

impl ImportMapFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::Json),
            Some("js" | "mjs" | "cjs") => Some(Self::Script),
            _ => None,
        }
    }
}

/// Parses import map source for one file.
///
/// The path is only used for diagnostics.
#[derive(Debug, Clone)]
pub struct ImportMapParser {
    path: PathBuf,
    environment: String,
    evaluator: Option<Arc<dyn ScriptEvaluator>>,
}

impl ImportMapParser {
    pub fn new(path: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            environment: environment.into(),
            evaluator: None,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Option<Arc<dyn ScriptEvaluator>>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn parse(&self, contents: &str, format: ImportMapFormat) -> Result<ImportMap, ImportMapParseError> {
        let value = match format {
            ImportMapFormat::Json => serde_json::from_str::<Value>(contents)
                .map_err(|e| self.error(ImportMapErrorKind::Json(e)))?,
            ImportMapFormat::Script => self.evaluate(contents)?,
        };

        self.decode(value)
    }

    fn evaluate(&self, script: &str) -> Result<Value, ImportMapParseError> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or_else(|| self.error(ImportMapErrorKind::NoEvaluator))?;

        evaluator
            .evaluate(script, &self.environment)
            .map_err(|e| match e {
                EvalError::NotAFunction => self.error(ImportMapErrorKind::NotAFunction),
                EvalError::Script(message) => self.error(ImportMapErrorKind::Evaluation(message)),
            })
    }

    fn decode(&self, value: Value) -> Result<ImportMap, ImportMapParseError> {
        let raw: RawImportMap =
            serde_json::from_value(value).map_err(|e| self.error(ImportMapErrorKind::Decode(e)))?;
        Ok(raw.into())
    }

    fn error(&self, kind: ImportMapErrorKind) -> ImportMapParseError {
        ImportMapParseError::new(&self.path, kind)
    }
}
