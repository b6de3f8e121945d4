//! Evaluation of script-authored import maps.
//!
//! A script import map (`config/import_map.js`) is a single function of the
//! environment name:
//!
//! ```javascript
//! env => ({
//!   imports: {
//!     react: env === "production" ? "https://esm.sh/react" : "/vendor/react.js"
//!   }
//! })
//! ```
//!
//! The store never owns an interpreter. Hosts inject a [`ScriptEvaluator`];
//! the `eval` feature ships one backed by Boa.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("script did not evaluate to a function")]
    NotAFunction,

    #[error("{0}")]
    Script(String),
}

/// Evaluates an import map script and returns the function's result as JSON.
pub trait ScriptEvaluator: Send + Sync + std::fmt::Debug {
    /// Evaluate `script`, call the resulting function with `environment` as
    /// its only argument, and convert the return value to JSON.
    fn evaluate(&self, script: &str, environment: &str) -> Result<Value, EvalError>;
}

/// Boa-backed evaluator.
///
/// Every call gets a fresh `Context` with no host bindings: the script sees
/// the ECMAScript globals and nothing else (no filesystem, network or
/// process access).
#[cfg(feature = "eval")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BoaEvaluator;

#[cfg(feature = "eval")]
impl BoaEvaluator {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "eval")]
impl ScriptEvaluator for BoaEvaluator {
    fn evaluate(&self, script: &str, environment: &str) -> Result<Value, EvalError> {
        use boa_engine::{Context, JsString, JsValue, Source};

        let mut context = Context::default();

        tracing::trace!(environment, "Evaluating import map script");

        let exported = context
            .eval(Source::from_bytes(script))
            .map_err(|e| EvalError::Script(e.to_string()))?;

        let function = exported.as_callable().ok_or(EvalError::NotAFunction)?;

        let result = function
            .call(
                &JsValue::undefined(),
                &[JsValue::from(JsString::from(environment))],
                &mut context,
            )
            .map_err(|e| EvalError::Script(e.to_string()))?;

        result
            .to_json(&mut context)
            .map_err(|e| EvalError::Script(e.to_string()))
    }
}
