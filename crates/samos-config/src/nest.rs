//! A named scope bound to its default store.

use crate::error::{ConfigError, ConfigResult};
use crate::loader::merge_from_document;
use crate::sink::DiagnosticSink;
use crate::store::PropertyStore;
use samos_sexp::{DocumentEvaluator, SexpType};

/// A scope name plus the store that acts as its schema and fallback.
///
/// `default_store` lists every recognized key with its expected kind and
/// default value. It is never changed by a load; `loaded_store` holds the
/// result of the most recent one.
#[derive(Debug, Clone, Default)]
pub struct ConfigNest {
    name: String,
    default_store: PropertyStore,
    loaded_store: PropertyStore,
}

impl ConfigNest {
    pub fn new(name: impl Into<String>, default_store: PropertyStore) -> Self {
        let loaded_store = default_store.clone();
        ConfigNest {
            name: name.into(),
            default_store,
            loaded_store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_store(&self) -> &PropertyStore {
        &self.default_store
    }

    /// The store produced by the last successful load, or a copy of the
    /// defaults before any load.
    pub fn loaded_store(&self) -> &PropertyStore {
        &self.loaded_store
    }

    /// Locate this nest's scope in `root` and merge it over a fresh copy of
    /// the defaults.
    ///
    /// A missing scope or a scope body that is not a list aborts the load and
    /// leaves `loaded_store` untouched. Problems with individual keys go to
    /// `sink` and never fail the load.
    pub fn load<E, S>(
        &mut self,
        root: &E::Node,
        evaluator: &E,
        sink: &mut S,
    ) -> ConfigResult<PropertyStore>
    where
        E: DocumentEvaluator + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        let body = evaluator.assoc_lookup(&self.name, root).map_err(|err| {
            tracing::error!(scope = %self.name, error = %err, "scope not found in document");
            ConfigError::from(err)
        })?;

        let kind = evaluator.inspect_kind(body);
        if kind != SexpType::Pair {
            tracing::error!(scope = %self.name, kind = %kind, "scope is not a configuration map");
            return Err(ConfigError::NotAMap {
                scope: self.name.clone(),
                kind,
                value: body.to_string(),
            });
        }

        let location = evaluator
            .source_info(body)
            .map(|info| info.to_string())
            .unwrap_or_default();
        tracing::debug!(scope = %self.name, location = %location, "located scope");

        let mut merged = self.default_store.clone();
        let updated = merge_from_document(&mut merged, body, evaluator, sink);
        tracing::debug!(scope = %self.name, updated, "loaded scope");

        self.loaded_store = merged;
        Ok(self.loaded_store.clone())
    }
}
