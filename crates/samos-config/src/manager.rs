//! Loading configuration documents from disk.

use crate::error::{ConfigError, ConfigResult};
use crate::nest::ConfigNest;
use crate::sink::{DiagnosticSink, TracingSink};
use crate::store::PropertyStore;
use samos_sexp::{DocumentEvaluator, SexpReader};
use std::path::Path;

/// Reads a document with its evaluator and hands the root to its nest.
///
/// The manager keeps no state between loads apart from the nest it wraps.
#[derive(Debug, Clone)]
pub struct ConfigManager<E = SexpReader> {
    nest: ConfigNest,
    evaluator: E,
}

impl ConfigManager<SexpReader> {
    pub fn new(nest: ConfigNest) -> Self {
        Self::with_evaluator(nest, SexpReader::new())
    }

    /// Load from document text instead of a file.
    pub fn load_config_from_str(
        &mut self,
        content: &str,
        filename: Option<&str>,
    ) -> ConfigResult<PropertyStore> {
        self.load_config_from_str_with_sink(content, filename, &mut TracingSink)
    }

    pub fn load_config_from_str_with_sink<S: DiagnosticSink + ?Sized>(
        &mut self,
        content: &str,
        filename: Option<&str>,
        sink: &mut S,
    ) -> ConfigResult<PropertyStore> {
        let root = self.evaluator.read_str(content, filename).inspect_err(|err| {
            tracing::error!(error = %err, "failed to read configuration document");
        })?;
        self.nest.load(&root, &self.evaluator, sink)
    }
}

/// An anonymous nest with no properties.
impl Default for ConfigManager<SexpReader> {
    fn default() -> Self {
        Self::new(ConfigNest::default())
    }
}

impl<E: DocumentEvaluator> ConfigManager<E> {
    pub fn with_evaluator(nest: ConfigNest, evaluator: E) -> Self {
        ConfigManager { nest, evaluator }
    }

    pub fn nest(&self) -> &ConfigNest {
        &self.nest
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Read the document at `path` and load the nest's scope from it.
    ///
    /// Per-key problems are logged through `tracing`. Read and parse
    /// failures are returned unchanged as [`ConfigError::Evaluator`].
    pub fn load_config_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> ConfigResult<PropertyStore> {
        self.load_config_from_file_with_sink(path, &mut TracingSink)
    }

    pub fn load_config_from_file_with_sink<S: DiagnosticSink + ?Sized>(
        &mut self,
        path: impl AsRef<Path>,
        sink: &mut S,
    ) -> ConfigResult<PropertyStore> {
        let path = path.as_ref();
        let root = self.evaluator.read_document(path).map_err(|err| {
            tracing::error!(
                path = %path.display(),
                error = %err,
                "failed to read configuration document"
            );
            ConfigError::from(err)
        })?;
        tracing::debug!(
            path = %path.display(),
            scope = %self.nest.name(),
            "read configuration document"
        );
        self.nest.load(&root, &self.evaluator, sink)
    }
}
