//! Error types for specifier resolution and import map loading.

use std::path::PathBuf;

use limelight_core::RuntimeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolution failures surfaced to the host.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A virtual `@rubygems/<name>/...` path names a gem with no registry entry.
    #[error(
        "could not resolve \"{specifier}\": gem '{name}' is not registered. \
         Check that it is declared as a dependency in your Gemfile"
    )]
    UnresolvedGem { name: String, specifier: String },

    /// The specifier could not be located, not even by the host's own lookup.
    #[error("could not resolve \"{specifier}\"{}", importer_suffix(.importer))]
    NotFound {
        specifier: String,
        importer: Option<PathBuf>,
    },

    #[error(transparent)]
    ImportMap(#[from] ImportMapParseError),
}

fn importer_suffix(importer: &Option<PathBuf>) -> String {
    importer
        .as_ref()
        .map(|path| format!(" from {}", path.display()))
        .unwrap_or_default()
}

/// Any failure to read, evaluate or decode an import map file.
#[derive(Debug, Error)]
#[error("failed to parse import map {}: {kind}", .path.display())]
pub struct ImportMapParseError {
    pub path: PathBuf,
    pub kind: ImportMapErrorKind,
}

impl ImportMapParseError {
    pub fn new(path: impl Into<PathBuf>, kind: ImportMapErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportMapErrorKind {
    #[error("could not read file: {0}")]
    Read(#[from] RuntimeError),

    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("unsupported import map format (expected .json or .js)")]
    UnsupportedFormat,

    #[error("script import maps need a script evaluator")]
    NoEvaluator,

    #[error("script must evaluate to a function of the environment name")]
    NotAFunction,

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("import map has an unexpected shape: {0}")]
    Decode(#[source] serde_json::Error),
}
