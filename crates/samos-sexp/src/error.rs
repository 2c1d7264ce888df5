//! Errors raised while reading and decoding documents.

use crate::types::SexpType;
use samos_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use samos_source_map::SourceInfo;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for evaluator operations.
pub type EvaluatorResult<T> = std::result::Result<T, EvaluatorError>;

/// Everything that can go wrong between a file on disk and a decoded value.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The node has no configuration kind (empty list, character, vector).
    #[error("value has no configuration type")]
    TypeNotFound,

    /// A list was found where a single value was expected.
    #[error("lists cannot be decoded into a single value")]
    UnsupportedCompound,

    #[error("expected {expected}, found {got}")]
    TypeMismatch { expected: SexpType, got: SexpType },

    #[error("key `{0}` not found")]
    KeyNotFound(String),

    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at {location}: {message}")]
    Parse {
        message: String,
        location: SourceInfo,
    },

    /// The document ended inside a list, string or block comment.
    #[error("unexpected end of input at {location}: {message}")]
    UnexpectedEof {
        message: String,
        location: SourceInfo,
    },

    #[error("nesting deeper than {max_depth} levels at {location}")]
    NestingTooDeep {
        max_depth: usize,
        location: SourceInfo,
    },
}

impl EvaluatorError {
    /// The catalog code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EvaluatorError::Parse { .. } => "S-1-1",
            EvaluatorError::UnexpectedEof { .. } => "S-1-2",
            EvaluatorError::NestingTooDeep { .. } => "S-1-3",
            EvaluatorError::ReadFailed { .. } => "S-1-4",
            EvaluatorError::TypeNotFound => "S-2-1",
            EvaluatorError::UnsupportedCompound => "S-2-2",
            EvaluatorError::TypeMismatch { .. } => "S-2-3",
            EvaluatorError::KeyNotFound(_) => "S-2-4",
        }
    }

    /// Where in the document the error was detected, if known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            EvaluatorError::Parse { location, .. }
            | EvaluatorError::UnexpectedEof { location, .. }
            | EvaluatorError::NestingTooDeep { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Whether this error came from reading the document rather than from
    /// decoding a node.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            EvaluatorError::Parse { .. }
                | EvaluatorError::UnexpectedEof { .. }
                | EvaluatorError::NestingTooDeep { .. }
                | EvaluatorError::ReadFailed { .. }
        )
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.as_str())
            .unwrap_or("Evaluator Error");

        let builder = DiagnosticMessageBuilder::error(title)
            .with_code(code)
            .problem(self.to_string())
            .with_optional_location(self.location().cloned());

        let builder = match self {
            EvaluatorError::TypeNotFound => {
                builder.add_hint("Use a boolean, number, string or symbol?")
            }
            EvaluatorError::UnsupportedCompound => {
                builder.add_info("only one-level properties are read from a document")
            }
            EvaluatorError::ReadFailed { source, .. } => builder.add_detail(source.to_string()),
            EvaluatorError::NestingTooDeep { .. } => {
                builder.add_hint("Flatten the document or raise `ReaderOptions::max_depth`?")
            }
            _ => builder,
        };
        builder.build()
    }
}
