//! Error types for the property store and loader.

use crate::types::ValueTag;
use samos_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use samos_sexp::{EvaluatorError, SexpType};
use thiserror::Error;

/// Result type alias for store and loader operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors from store primitives and structural load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("property `{0}` is already registered")]
    DuplicateKey(String),

    #[error("property `{0}` is not registered")]
    KeyNotRegistered(String),

    /// A value of a different kind than the registered one.
    #[error("property `{key}` holds {expected}, not {got}")]
    TypeMismatch {
        key: String,
        expected: ValueTag,
        got: ValueTag,
    },

    /// The scope was found but its body is not an association list.
    #[error("scope `{scope}` is not a configuration map (found {kind}: {value})")]
    NotAMap {
        scope: String,
        kind: SexpType,
        /// The scope body as written
        value: String,
    },

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

impl ConfigError {
    /// The catalog code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::DuplicateKey(_) => "S-3-1",
            ConfigError::KeyNotRegistered(_) => "S-3-2",
            ConfigError::TypeMismatch { .. } => "S-3-3",
            ConfigError::NotAMap { .. } => "S-4-1",
            ConfigError::Evaluator(err) => err.code(),
        }
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        if let ConfigError::Evaluator(err) = self {
            return err.to_diagnostic();
        }

        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.as_str())
            .unwrap_or("Configuration Error");
        let builder = DiagnosticMessageBuilder::error(title)
            .with_code(code)
            .problem(self.to_string());

        let builder = match self {
            ConfigError::DuplicateKey(_) => {
                builder.add_hint("Use `set` to replace the value of a registered property?")
            }
            ConfigError::KeyNotRegistered(_) => {
                builder.add_hint("Register the property in the default store first?")
            }
            ConfigError::NotAMap { scope, .. } => builder.add_hint(format!(
                "Write the scope as `({} . ((key . value) ...))`?",
                scope
            )),
            _ => builder,
        };
        builder.build()
    }
}
