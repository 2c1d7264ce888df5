//! Merging a document scope into a property store.

use crate::error::ConfigError;
use crate::sink::{DiagnosticSink, MergeEvent, MergeOutcome};
use crate::store::PropertyStore;
use samos_sexp::DocumentEvaluator;

/// Overwrite the store's scalar properties with the values the scope body
/// gives them.
///
/// `scope_body` is an association list of `(key . value)` entries. Only keys
/// already in `store` are looked up, in lexicographic order, and each key
/// produces exactly one event on `sink`. A key whose entry is missing,
/// undecodable or of the wrong kind keeps its current value and the merge
/// moves on. Nested stores are left as they are.
///
/// Returns the number of properties updated.
pub fn merge_from_document<E, S>(
    store: &mut PropertyStore,
    scope_body: &E::Node,
    evaluator: &E,
    sink: &mut S,
) -> usize
where
    E: DocumentEvaluator + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let keys: Vec<String> = store.keys().map(str::to_string).collect();
    let scope_location = evaluator.source_info(scope_body);
    let mut updated = 0;

    for key in keys {
        if store.is_nested(&key).unwrap_or(false) {
            sink.report(MergeEvent::new(key, MergeOutcome::NestedNotMerged));
            continue;
        }

        let node = match evaluator.assoc_lookup(&key, scope_body) {
            Ok(node) => node,
            Err(error) => {
                sink.report(
                    MergeEvent::new(key, MergeOutcome::KeyMissing(error))
                        .with_location(scope_location.clone()),
                );
                continue;
            }
        };
        let location = evaluator.source_info(node);

        let value = match evaluator.decode_scalar(node) {
            Ok(value) => value,
            Err(error) => {
                let outcome = MergeOutcome::Undecodable {
                    error,
                    value: node.to_string(),
                };
                sink.report(MergeEvent::new(key, outcome).with_location(location));
                continue;
            }
        };

        let outcome = match store.set(&key, value) {
            Ok(()) => {
                updated += 1;
                MergeOutcome::Updated
            }
            Err(ConfigError::TypeMismatch { expected, got, .. }) => {
                MergeOutcome::KindMismatch { expected, got }
            }
            Err(err) => {
                tracing::error!(key = %key, error = %err, "store rejected a registered key");
                continue;
            }
        };
        sink.report(MergeEvent::new(key, outcome).with_location(location));
    }

    tracing::debug!(updated, total = store.len(), "merged document into store");
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use samos_sexp::{EvaluatorError, SexpReader, Symbol};

    fn defaults() -> PropertyStore {
        let mut store = PropertyStore::new();
        store
            .register_many([
                ("bool-prop", crate::PropertyValue::from(false)),
                ("int-prop", 1.into()),
                ("float-prop", 17.0.into()),
                ("symbol-prop", Symbol::new("Iliad").into()),
            ])
            .unwrap();
        store
    }

    fn merge(source: &str, store: &mut PropertyStore) -> (usize, Vec<MergeEvent>) {
        let reader = SexpReader::new();
        let body = reader.read_str(source, None).unwrap();
        let mut events: Vec<MergeEvent> = Vec::new();
        let updated = merge_from_document(store, &body, &reader, &mut events);
        (updated, events)
    }

    #[test]
    fn test_merge_updates_present_keys() {
        let mut store = defaults();
        let (updated, events) = merge("((int-prop . 42) (symbol-prop . Odyssey))", &mut store);

        assert_eq!(updated, 2);
        assert_eq!(events.len(), 4);
        assert_eq!(store.get_int("int-prop").unwrap(), 42);
        assert_eq!(store.get_symbol("symbol-prop").unwrap(), "Odyssey");
        assert!(!store.get_bool("bool-prop").unwrap());
        assert_eq!(store.get_float("float-prop").unwrap(), 17.0);
    }

    #[test]
    fn test_events_follow_key_order() {
        let mut store = defaults();
        let (_, events) = merge("((int-prop . 42))", &mut store);

        let keys: Vec<_> = events.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["bool-prop", "float-prop", "int-prop", "symbol-prop"]);
        assert!(matches!(events[2].outcome, MergeOutcome::Updated));
        assert!(matches!(
            events[0].outcome,
            MergeOutcome::KeyMissing(EvaluatorError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_kind_mismatch_keeps_default() {
        let mut store = defaults();
        let (updated, events) = merge("((int-prop . \"42\") (bool-prop . false))", &mut store);

        assert_eq!(updated, 0);
        assert_eq!(store.get_int("int-prop").unwrap(), 1);
        assert!(!store.get_bool("bool-prop").unwrap());

        let bool_event = events.iter().find(|e| e.key == "bool-prop").unwrap();
        assert!(matches!(
            bool_event.outcome,
            MergeOutcome::KindMismatch {
                expected: crate::ValueTag::Bool,
                got: crate::ValueTag::Symbol
            }
        ));
        assert_eq!(bool_event.location.as_ref().unwrap().start_offset(), 32);
    }

    #[test]
    fn test_undecodable_entry_keeps_default() {
        let mut store = defaults();
        let (updated, events) = merge("((int-prop 1 2) (float-prop . ()))", &mut store);

        assert_eq!(updated, 0);
        let int_event = events.iter().find(|e| e.key == "int-prop").unwrap();
        match &int_event.outcome {
            MergeOutcome::Undecodable { error, value } => {
                assert!(matches!(error, EvaluatorError::UnsupportedCompound));
                assert_eq!(value, "(1 2)");
            }
            other => panic!("expected Undecodable, got {:?}", other),
        }
        let float_event = events.iter().find(|e| e.key == "float-prop").unwrap();
        assert!(matches!(
            float_event.outcome,
            MergeOutcome::Undecodable {
                error: EvaluatorError::TypeNotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_stores_are_not_merged() {
        let mut inner = PropertyStore::new();
        inner.register("int-prop", 1).unwrap();
        let mut store = PropertyStore::new();
        store.register("inner", inner.clone()).unwrap();

        let (updated, events) = merge("((inner . ((int-prop . 2))))", &mut store);

        assert_eq!(updated, 0);
        assert!(matches!(events[0].outcome, MergeOutcome::NestedNotMerged));
        assert_eq!(store.get_nested("inner").unwrap(), &inner);
    }

    #[test]
    fn test_malformed_scope_reports_every_key() {
        let mut store = defaults();
        let (updated, events) = merge("42", &mut store);

        assert_eq!(updated, 0);
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(MergeEvent::is_skip));
    }

    #[test]
    fn test_empty_store_merges_nothing() {
        let mut store = PropertyStore::new();
        let (updated, events) = merge("((int-prop . 42))", &mut store);
        assert_eq!(updated, 0);
        assert!(events.is_empty());
    }
}
