//! The decoding capability the configuration loader consumes.
//!
//! [`DocumentEvaluator`] is everything the loader needs from a document
//! reader: read a file into an opaque node tree, tell what kind a node is,
//! pull scalars out of nodes, and look keys up in association lists. Nodes
//! are never evaluated as code.

use crate::error::{EvaluatorError, EvaluatorResult};
use crate::node::{Sexp, SexpValue};
use crate::parser::{ReaderOptions, parse_with_options};
use crate::types::{ScalarValue, SexpType, Symbol};
use samos_source_map::SourceInfo;
use std::fmt;
use std::path::Path;

/// Read-only access to parsed documents.
pub trait DocumentEvaluator {
    /// The parsed node type. Rendering a node shows it as written, which
    /// diagnostics use to quote offending values.
    type Node: fmt::Display;

    fn read_document(&self, path: &Path) -> EvaluatorResult<Self::Node>;

    fn inspect_kind(&self, node: &Self::Node) -> SexpType;

    fn extract_bool(&self, node: &Self::Node) -> EvaluatorResult<bool>;

    fn extract_int(&self, node: &Self::Node) -> EvaluatorResult<i64>;

    fn extract_float(&self, node: &Self::Node) -> EvaluatorResult<f64>;

    fn extract_string(&self, node: &Self::Node) -> EvaluatorResult<String>;

    fn extract_symbol(&self, node: &Self::Node) -> EvaluatorResult<Symbol>;

    /// Find the value bound to `key` in an association list.
    ///
    /// Entries match by symbol identity, so a string head equal to `key`
    /// does not match. Elements that are not pairs are skipped. Fails with
    /// `TypeMismatch` if `list` is not a pair or its spine is improper
    /// before a match, and with `KeyNotFound` if no entry matches.
    fn assoc_lookup<'n>(&self, key: &str, list: &'n Self::Node) -> EvaluatorResult<&'n Self::Node>;

    /// Where a node came from, for evaluators that track it.
    fn source_info(&self, _node: &Self::Node) -> Option<SourceInfo> {
        None
    }

    /// Decode a node into a [`ScalarValue`] based on its kind.
    fn decode_scalar(&self, node: &Self::Node) -> EvaluatorResult<ScalarValue> {
        match self.inspect_kind(node) {
            SexpType::Unknown => Err(EvaluatorError::TypeNotFound),
            SexpType::Pair => Err(EvaluatorError::UnsupportedCompound),
            SexpType::Boolean => self.extract_bool(node).map(ScalarValue::Bool),
            SexpType::Integer => self.extract_int(node).map(ScalarValue::Int),
            SexpType::Float => self.extract_float(node).map(ScalarValue::Float),
            SexpType::String => self.extract_string(node).map(ScalarValue::String),
            SexpType::Symbol => self.extract_symbol(node).map(ScalarValue::Symbol),
        }
    }
}

/// Evaluator for s-expression documents.
///
/// # Example
///
/// ```rust
/// use samos_sexp::{DocumentEvaluator, ScalarValue, SexpReader};
///
/// let reader = SexpReader::new();
/// let doc = reader.read_str("((int-prop . 42))", None).unwrap();
/// let value = reader.assoc_lookup("int-prop", &doc).unwrap();
///
/// assert_eq!(reader.decode_scalar(value).unwrap(), ScalarValue::Int(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SexpReader {
    options: ReaderOptions,
}

impl SexpReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReaderOptions) -> Self {
        SexpReader { options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Parse a document held in memory.
    pub fn read_str(&self, content: &str, filename: Option<&str>) -> EvaluatorResult<Sexp> {
        parse_with_options(content, filename, &self.options)
    }
}

fn mismatch(expected: SexpType, node: &Sexp) -> EvaluatorError {
    EvaluatorError::TypeMismatch {
        expected,
        got: node.sexp_type(),
    }
}

impl DocumentEvaluator for SexpReader {
    type Node = Sexp;

    fn read_document(&self, path: &Path) -> EvaluatorResult<Sexp> {
        tracing::debug!(path = %path.display(), "reading configuration document");
        let content = std::fs::read_to_string(path).map_err(|source| EvaluatorError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.to_string_lossy();
        self.read_str(&content, Some(filename.as_ref()))
    }

    fn inspect_kind(&self, node: &Sexp) -> SexpType {
        node.sexp_type()
    }

    fn extract_bool(&self, node: &Sexp) -> EvaluatorResult<bool> {
        match node.value {
            SexpValue::Bool(b) => Ok(b),
            _ => Err(mismatch(SexpType::Boolean, node)),
        }
    }

    fn extract_int(&self, node: &Sexp) -> EvaluatorResult<i64> {
        match node.value {
            SexpValue::Int(i) => Ok(i),
            _ => Err(mismatch(SexpType::Integer, node)),
        }
    }

    fn extract_float(&self, node: &Sexp) -> EvaluatorResult<f64> {
        match node.value {
            SexpValue::Float(x) => Ok(x),
            _ => Err(mismatch(SexpType::Float, node)),
        }
    }

    fn extract_string(&self, node: &Sexp) -> EvaluatorResult<String> {
        match &node.value {
            SexpValue::Str(s) => Ok(s.clone()),
            _ => Err(mismatch(SexpType::String, node)),
        }
    }

    fn extract_symbol(&self, node: &Sexp) -> EvaluatorResult<Symbol> {
        match &node.value {
            SexpValue::Symbol(s) => Ok(s.clone()),
            _ => Err(mismatch(SexpType::Symbol, node)),
        }
    }

    fn assoc_lookup<'n>(&self, key: &str, list: &'n Sexp) -> EvaluatorResult<&'n Sexp> {
        if !list.is_pair() {
            return Err(mismatch(SexpType::Pair, list));
        }

        let mut entries = list.iter_list();
        for entry in entries.by_ref() {
            if let SexpValue::Pair(head, value) = &entry.value {
                if head.as_symbol().is_some_and(|symbol| symbol == key) {
                    return Ok(&**value);
                }
            }
        }

        let tail = entries.tail();
        if tail.is_nil() {
            Err(EvaluatorError::KeyNotFound(key.to_string()))
        } else {
            Err(mismatch(SexpType::Pair, tail))
        }
    }

    fn source_info(&self, node: &Sexp) -> Option<SourceInfo> {
        Some(node.source_info.clone())
    }
}
