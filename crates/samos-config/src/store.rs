//! The property store: a keyed tree of typed values.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{PropertyValue, ValueTag};
use samos_sexp::{ScalarValue, Symbol};
use std::collections::BTreeMap;

/// A keyed container of typed properties.
///
/// Keys are unique and iterate in lexicographic order. A key's
/// [`ValueTag`] is fixed at registration. Cloning is a deep copy.
///
/// ```
/// use samos_config::{PropertyStore, ValueTag};
///
/// let mut store = PropertyStore::new();
/// store.register("int-prop", 1).unwrap();
/// store.set("int-prop", 42).unwrap();
///
/// assert_eq!(store.get_int("int-prop").unwrap(), 42);
/// assert!(store.set("int-prop", false).is_err());
/// assert_eq!(store.tag_of("int-prop").unwrap(), ValueTag::Int);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    properties: BTreeMap<String, PropertyValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new property.
    ///
    /// Fails with `DuplicateKey` if the key exists; the stored value is
    /// left untouched.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> ConfigResult<()> {
        let key = key.into();
        if self.properties.contains_key(&key) {
            return Err(ConfigError::DuplicateKey(key));
        }
        self.properties.insert(key, value.into());
        Ok(())
    }

    /// Register properties in order, stopping at the first failure.
    ///
    /// Entries registered before the failure stay registered.
    pub fn register_many<K, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> ConfigResult<()>
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        for (key, value) in pairs {
            self.register(key, value)?;
        }
        Ok(())
    }

    /// Replace the value of a registered property with one of the same tag.
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) -> ConfigResult<()> {
        let value = value.into();
        let slot = self
            .properties
            .get_mut(key)
            .ok_or_else(|| ConfigError::KeyNotRegistered(key.to_string()))?;

        let expected = slot.tag();
        let got = value.tag();
        if expected != got {
            return Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected,
                got,
            });
        }
        *slot = value;
        Ok(())
    }

    /// Remove a property and return its value.
    pub fn pop(&mut self, key: &str) -> ConfigResult<PropertyValue> {
        self.properties
            .remove(key)
            .ok_or_else(|| ConfigError::KeyNotRegistered(key.to_string()))
    }

    /// A deep copy of a property's value.
    pub fn copy_value(&self, key: &str) -> ConfigResult<PropertyValue> {
        self.ref_value(key).cloned()
    }

    /// Borrow a property's value.
    pub fn ref_value(&self, key: &str) -> ConfigResult<&PropertyValue> {
        self.properties
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotRegistered(key.to_string()))
    }

    pub fn is_nested(&self, key: &str) -> ConfigResult<bool> {
        self.ref_value(key).map(PropertyValue::is_nested)
    }

    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn tag_of(&self, key: &str) -> ConfigResult<ValueTag> {
        self.ref_value(key).map(PropertyValue::tag)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn get_bool(&self, key: &str) -> ConfigResult<bool> {
        match self.ref_value(key)? {
            PropertyValue::Scalar(ScalarValue::Bool(b)) => Ok(*b),
            other => Err(mismatch(key, ValueTag::Bool, other)),
        }
    }

    pub fn get_int(&self, key: &str) -> ConfigResult<i64> {
        match self.ref_value(key)? {
            PropertyValue::Scalar(ScalarValue::Int(i)) => Ok(*i),
            other => Err(mismatch(key, ValueTag::Int, other)),
        }
    }

    pub fn get_float(&self, key: &str) -> ConfigResult<f64> {
        match self.ref_value(key)? {
            PropertyValue::Scalar(ScalarValue::Float(x)) => Ok(*x),
            other => Err(mismatch(key, ValueTag::Float, other)),
        }
    }

    pub fn get_str(&self, key: &str) -> ConfigResult<&str> {
        match self.ref_value(key)? {
            PropertyValue::Scalar(ScalarValue::String(s)) => Ok(s),
            other => Err(mismatch(key, ValueTag::String, other)),
        }
    }

    pub fn get_symbol(&self, key: &str) -> ConfigResult<&Symbol> {
        match self.ref_value(key)? {
            PropertyValue::Scalar(ScalarValue::Symbol(symbol)) => Ok(symbol),
            other => Err(mismatch(key, ValueTag::Symbol, other)),
        }
    }

    pub fn get_nested(&self, key: &str) -> ConfigResult<&PropertyStore> {
        match self.ref_value(key)? {
            PropertyValue::Nested(store) => Ok(store),
            other => Err(mismatch(key, ValueTag::Nested, other)),
        }
    }

    /// Mutable access to a nested store, which keeps its tag.
    pub fn get_nested_mut(&mut self, key: &str) -> ConfigResult<&mut PropertyStore> {
        let value = self
            .properties
            .get_mut(key)
            .ok_or_else(|| ConfigError::KeyNotRegistered(key.to_string()))?;
        match value {
            PropertyValue::Nested(store) => Ok(store),
            other => Err(mismatch(key, ValueTag::Nested, other)),
        }
    }
}

fn mismatch(key: &str, expected: ValueTag, found: &PropertyValue) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
        got: found.tag(),
    }
}

impl<'a> IntoIterator for &'a PropertyStore {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
