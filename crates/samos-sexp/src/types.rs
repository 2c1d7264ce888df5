//! Value kinds and decoded scalar values.

use std::fmt;

/// The kind of a document node, as reported by
/// [`DocumentEvaluator::inspect_kind`](crate::DocumentEvaluator::inspect_kind).
///
/// The empty list, characters and vectors have no configuration meaning and
/// are all reported as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SexpType {
    Unknown,
    Boolean,
    Integer,
    Float,
    String,
    Symbol,
    Pair,
}

impl fmt::Display for SexpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SexpType::Unknown => "Unknown",
            SexpType::Boolean => "Boolean",
            SexpType::Integer => "Integer",
            SexpType::Float => "Float",
            SexpType::String => "String",
            SexpType::Symbol => "Symbol",
            SexpType::Pair => "Pair",
        };
        f.write_str(name)
    }
}

/// An interned-by-value identifier.
///
/// Kept distinct from `String` even though both carry text: `Odyssey` and
/// `"Odyssey"` are different values in a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_string())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(name)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The closed set of atomic configuration values a node can decode to.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
}

impl ScalarValue {
    /// The node kind this value decodes from.
    pub fn kind(&self) -> SexpType {
        match self {
            ScalarValue::Bool(_) => SexpType::Boolean,
            ScalarValue::Int(_) => SexpType::Integer,
            ScalarValue::Float(_) => SexpType::Float,
            ScalarValue::String(_) => SexpType::String,
            ScalarValue::Symbol(_) => SexpType::Symbol,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            ScalarValue::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value the way it would be written in a document.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(true) => f.write_str("#t"),
            ScalarValue::Bool(false) => f.write_str("#f"),
            ScalarValue::Int(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write_float(f, *x),
            ScalarValue::String(s) => write_string(f, s),
            ScalarValue::Symbol(s) => write_symbol(f, s.as_str()),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<Symbol> for ScalarValue {
    fn from(value: Symbol) -> Self {
        ScalarValue::Symbol(value)
    }
}

pub(crate) fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("+nan.0")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "+inf.0" } else { "-inf.0" })
    } else {
        // Keep a decimal point so the value reads back as a float.
        let text = x.to_string();
        if text.contains(['.', 'e', 'E']) {
            f.write_str(&text)
        } else {
            write!(f, "{}.0", text)
        }
    }
}

pub(crate) fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

pub(crate) fn write_symbol(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let needs_bars = name.is_empty()
        || name == "."
        || name.starts_with('#')
        || crate::lexer::reads_as_number(name)
        || name.chars().any(|c| {
            c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';' | '|' | '\'' | '\\')
        });
    if needs_bars {
        f.write_str("|")?;
        for ch in name.chars() {
            match ch {
                '|' => f.write_str("\\|")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("|")
    } else {
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sexp_type_display() {
        assert_eq!(SexpType::Float.to_string(), "Float");
        assert_eq!(SexpType::Pair.to_string(), "Pair");
    }

    #[test]
    fn test_symbol_is_not_string() {
        let symbol = ScalarValue::from(Symbol::new("Odyssey"));
        let string = ScalarValue::from("Odyssey");

        assert_ne!(symbol, string);
        assert_eq!(symbol.kind(), SexpType::Symbol);
        assert_eq!(string.kind(), SexpType::String);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ScalarValue::from(true).as_bool(), Some(true));
        assert_eq!(ScalarValue::from(42).as_int(), Some(42));
        assert_eq!(ScalarValue::from(1.5).as_float(), Some(1.5));
        assert_eq!(ScalarValue::from("x").as_str(), Some("x"));
        assert_eq!(ScalarValue::from("x").as_int(), None);
        assert_eq!(
            ScalarValue::from(Symbol::from("Iliad")).as_symbol(),
            Some(&Symbol::from("Iliad"))
        );
    }

    #[test]
    fn test_display_written_form() {
        assert_eq!(ScalarValue::Bool(false).to_string(), "#f");
        assert_eq!(ScalarValue::Float(17.0).to_string(), "17.0");
        assert_eq!(ScalarValue::Float(3.1415).to_string(), "3.1415");
        assert_eq!(ScalarValue::Float(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(ScalarValue::Float(f64::NEG_INFINITY).to_string(), "-inf.0");
        assert_eq!(
            ScalarValue::from("say \"hi\"\n").to_string(),
            "\"say \\\"hi\\\"\\n\""
        );
        assert_eq!(ScalarValue::from(Symbol::new("a b")).to_string(), "|a b|");
        assert_eq!(ScalarValue::from(Symbol::new("int-prop")).to_string(), "int-prop");
        assert_eq!(ScalarValue::from(Symbol::new("42")).to_string(), "|42|");
        assert_eq!(ScalarValue::from(Symbol::new("#t")).to_string(), "|#t|");
    }
}
