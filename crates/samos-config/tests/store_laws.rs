//! Property-based checks of the store's registration and copy laws.

use proptest::prelude::*;
use samos_config::{ConfigError, PropertyStore, PropertyValue, ScalarValue, Symbol};

fn scalar() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<bool>().prop_map(PropertyValue::from),
        any::<i64>().prop_map(PropertyValue::from),
        (-1.0e9f64..1.0e9).prop_map(PropertyValue::from),
        "[ -~]{0,12}".prop_map(PropertyValue::from),
        "[a-zA-Z][a-zA-Z0-9-]{0,8}".prop_map(|s| PropertyValue::from(Symbol::new(s))),
    ]
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{0,10}"
}

fn store() -> impl Strategy<Value = PropertyStore> {
    prop::collection::btree_map(key(), scalar(), 0..8).prop_map(|entries| {
        let mut store = PropertyStore::new();
        store.register_many(entries).unwrap();
        store
    })
}

proptest! {
    #[test]
    fn registered_keys_are_present(key in key(), value in scalar()) {
        let mut store = PropertyStore::new();
        store.register(key.clone(), value.clone()).unwrap();

        prop_assert!(store.has(&key));
        prop_assert_eq!(store.copy_value(&key).unwrap(), value);
    }

    #[test]
    fn duplicate_registration_leaves_value(key in key(), first in scalar(), second in scalar()) {
        let mut store = PropertyStore::new();
        store.register(key.clone(), first.clone()).unwrap();

        let result = store.register(key.clone(), second);
        prop_assert!(matches!(result, Err(ConfigError::DuplicateKey(_))));
        prop_assert_eq!(store.ref_value(&key).unwrap(), &first);
        prop_assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_succeeds_iff_tags_match(key in key(), first in scalar(), second in scalar()) {
        let mut store = PropertyStore::new();
        store.register(key.clone(), first.clone()).unwrap();

        let same_tag = first.tag() == second.tag();
        let result = store.set(&key, second.clone());

        prop_assert_eq!(result.is_ok(), same_tag);
        let expected = if same_tag { second } else { first };
        prop_assert_eq!(store.ref_value(&key).unwrap(), &expected);
    }

    #[test]
    fn copies_do_not_alias_nested_stores(inner in store(), key in key()) {
        let mut outer = PropertyStore::new();
        outer.register("inner", inner.clone()).unwrap();

        let mut copy = outer.clone();
        let copied_inner = copy.get_nested_mut("inner").unwrap();
        if copied_inner.has(&key) {
            copied_inner.pop(&key).unwrap();
        } else {
            copied_inner.register(key.clone(), ScalarValue::Int(0)).unwrap();
        }

        prop_assert_eq!(outer.get_nested("inner").unwrap(), &inner);
        prop_assert_ne!(copy.get_nested("inner").unwrap(), &inner);
    }

    #[test]
    fn keys_iterate_in_order(store in store()) {
        let keys: Vec<&str> = store.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);
    }
}
