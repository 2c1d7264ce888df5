//! # samos-sexp
//!
//! S-expression configuration documents with source location tracking.
//!
//! This crate reads declarative s-expression documents into [`Sexp`] trees
//! (every node carries a [`SourceInfo`]) and exposes the
//! [`DocumentEvaluator`] capability the configuration loader is written
//! against: kind inspection, scalar extraction, association-list lookup and
//! scalar decoding. Documents are data only; nothing is evaluated.
//!
//! ## Example
//!
//! ```rust
//! use samos_sexp::{DocumentEvaluator, ScalarValue, SexpReader, Symbol};
//!
//! let content = r#"
//! ;; configuration for the test scope
//! ((test-cfg . ((int-prop . 42)
//!               (symbol-prop . Odyssey))))
//! "#;
//!
//! let reader = SexpReader::new();
//! let doc = reader.read_str(content, Some("test.scm")).unwrap();
//! let scope = reader.assoc_lookup("test-cfg", &doc).unwrap();
//! let symbol = reader.assoc_lookup("symbol-prop", scope).unwrap();
//!
//! assert_eq!(
//!     reader.decode_scalar(symbol).unwrap(),
//!     ScalarValue::Symbol(Symbol::new("Odyssey"))
//! );
//! assert_eq!(symbol.source_info.to_string(), "test.scm:4:30");
//! ```

mod error;
mod evaluator;
mod lexer;
mod node;
mod parser;
mod types;

pub use error::{EvaluatorError, EvaluatorResult};
pub use evaluator::{DocumentEvaluator, SexpReader};
pub use node::{ListIter, Sexp, SexpValue};
pub use parser::{ReaderOptions, parse, parse_file, parse_with_options};
pub use samos_source_map::SourceInfo; // Re-export from samos-source-map
pub use types::{ScalarValue, SexpType, Symbol};
