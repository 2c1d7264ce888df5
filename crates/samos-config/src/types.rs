//! Core type definitions for the property store.

use crate::store::PropertyStore;
use samos_sexp::{ScalarValue, Symbol};
use std::fmt;

/// The variant tag of a [`PropertyValue`].
///
/// Once a key is registered its tag is fixed: `set` only accepts values
/// with the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Bool,
    Int,
    Float,
    String,
    Symbol,
    Nested,
}

impl ValueTag {
    pub fn of_scalar(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(_) => ValueTag::Bool,
            ScalarValue::Int(_) => ValueTag::Int,
            ScalarValue::Float(_) => ValueTag::Float,
            ScalarValue::String(_) => ValueTag::String,
            ScalarValue::Symbol(_) => ValueTag::Symbol,
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueTag::Bool => "Bool",
            ValueTag::Int => "Int",
            ValueTag::Float => "Float",
            ValueTag::String => "String",
            ValueTag::Symbol => "Symbol",
            ValueTag::Nested => "Nested",
        };
        f.write_str(name)
    }
}

/// A value held by a [`PropertyStore`].
///
/// Nested stores are owned outright: cloning a value clones the whole
/// subtree and dropping it drops the subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    Nested(PropertyStore),
}

impl PropertyValue {
    pub fn tag(&self) -> ValueTag {
        match self {
            PropertyValue::Scalar(scalar) => ValueTag::of_scalar(scalar),
            PropertyValue::Nested(_) => ValueTag::Nested,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, PropertyValue::Nested(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            PropertyValue::Scalar(scalar) => Some(scalar),
            PropertyValue::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&PropertyStore> {
        match self {
            PropertyValue::Nested(store) => Some(store),
            PropertyValue::Scalar(_) => None,
        }
    }

    pub fn as_nested_mut(&mut self) -> Option<&mut PropertyStore> {
        match self {
            PropertyValue::Nested(store) => Some(store),
            PropertyValue::Scalar(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Scalar(scalar) => write!(f, "{}", scalar),
            PropertyValue::Nested(store) => write!(f, "<store with {} properties>", store.len()),
        }
    }
}

impl From<ScalarValue> for PropertyValue {
    fn from(value: ScalarValue) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<PropertyStore> for PropertyValue {
    fn from(store: PropertyStore) -> Self {
        PropertyValue::Nested(store)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<Symbol> for PropertyValue {
    fn from(value: Symbol) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(PropertyValue::from(true).tag(), ValueTag::Bool);
        assert_eq!(PropertyValue::from(1).tag(), ValueTag::Int);
        assert_eq!(PropertyValue::from(17.0).tag(), ValueTag::Float);
        assert_eq!(PropertyValue::from("s").tag(), ValueTag::String);
        assert_eq!(PropertyValue::from(Symbol::new("Iliad")).tag(), ValueTag::Symbol);
        assert_eq!(PropertyValue::from(PropertyStore::new()).tag(), ValueTag::Nested);
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyValue::from(Symbol::new("Iliad")).to_string(), "Iliad");
        assert_eq!(PropertyValue::from("Iliad").to_string(), "\"Iliad\"");

        let mut store = PropertyStore::new();
        store.register("a", 1).unwrap();
        assert_eq!(
            PropertyValue::from(store).to_string(),
            "<store with 1 properties>"
        );
    }

    #[test]
    fn test_nested_accessors() {
        let mut value = PropertyValue::from(PropertyStore::new());
        assert!(value.is_nested());
        assert!(value.as_scalar().is_none());

        value.as_nested_mut().unwrap().register("inner", 2).unwrap();
        assert!(value.as_nested().unwrap().has("inner"));
    }
}
