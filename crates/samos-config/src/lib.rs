//! # samos-config
//!
//! Typed, hierarchical configuration stores merged from s-expression
//! documents.
//!
//! A [`PropertyStore`] maps keys to scalars or nested stores. A
//! [`ConfigNest`] pairs a scope name with a default store that acts as both
//! schema and fallback: loading a document looks the scope up, then
//! overwrites each default whose entry decodes to the same kind. Entries
//! that are missing, undecodable or of the wrong kind keep their defaults
//! and are reported to a [`DiagnosticSink`] instead of failing the load.
//!
//! ## Example
//!
//! ```rust
//! use samos_config::{ConfigManager, ConfigNest, MergeEvent, PropertyStore, Symbol};
//!
//! let mut defaults = PropertyStore::new();
//! defaults.register("int-prop", 1).unwrap();
//! defaults.register("symbol-prop", Symbol::new("Iliad")).unwrap();
//! defaults.register("string-prop", "unmodified").unwrap();
//!
//! let mut manager = ConfigManager::new(ConfigNest::new("test-cfg", defaults));
//! let mut events: Vec<MergeEvent> = Vec::new();
//! let loaded = manager
//!     .load_config_from_str_with_sink(
//!         "((test-cfg . ((int-prop . 42) (symbol-prop . Odyssey))))",
//!         Some("test.scm"),
//!         &mut events,
//!     )
//!     .unwrap();
//!
//! assert_eq!(loaded.get_int("int-prop").unwrap(), 42);
//! assert_eq!(loaded.get_symbol("symbol-prop").unwrap(), "Odyssey");
//! assert_eq!(loaded.get_str("string-prop").unwrap(), "unmodified");
//! assert_eq!(events.iter().filter(|e| e.is_skip()).count(), 1);
//! ```

mod error;
mod loader;
mod manager;
mod nest;
mod sink;
mod store;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::merge_from_document;
pub use manager::ConfigManager;
pub use nest::ConfigNest;
pub use sink::{DiagnosticSink, MergeEvent, MergeOutcome, TracingSink};
pub use store::PropertyStore;
pub use types::{PropertyValue, ValueTag};

pub use samos_sexp::{DocumentEvaluator, ScalarValue, SexpReader, Symbol};
