//! Document nodes with source location tracking.

use crate::types::{SexpType, Symbol, write_float, write_string, write_symbol};
use samos_source_map::SourceInfo;
use std::fmt;

/// A parsed datum together with where it came from.
///
/// Lists are chains of pairs terminated by [`SexpValue::Nil`], exactly as
/// the reader sees them, so dotted tails survive parsing.
///
/// Equality compares values only; two nodes read from different places
/// are equal if they hold the same datum.
///
/// Dropping, cloning, comparing and formatting walk the cdr spine in a
/// loop, so a list's length never costs stack. Only nesting through cars
/// recurses, and the reader bounds that with [`crate::ReaderOptions`].
pub struct Sexp {
    pub value: SexpValue,
    pub source_info: SourceInfo,
}

impl Drop for Sexp {
    fn drop(&mut self) {
        let mut rest = match std::mem::replace(&mut self.value, SexpValue::Nil) {
            SexpValue::Pair(_, cdr) => cdr,
            _ => return,
        };
        // Each car is dropped here; the detached cdr carries on.
        while let SexpValue::Pair(_, cdr) = std::mem::replace(&mut rest.value, SexpValue::Nil) {
            rest = cdr;
        }
    }
}

impl Clone for Sexp {
    fn clone(&self) -> Self {
        let mut spine = Vec::new();
        let mut rest = self;
        while let SexpValue::Pair(car, cdr) = &rest.value {
            spine.push(((**car).clone(), rest.source_info.clone()));
            rest = &**cdr;
        }
        let tail = Sexp::new(rest.value.clone(), rest.source_info.clone());
        spine.into_iter().rev().fold(tail, |cdr, (car, source_info)| {
            Sexp::new(SexpValue::Pair(Box::new(car), Box::new(cdr)), source_info)
        })
    }
}

impl PartialEq for Sexp {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            match (&left.value, &right.value) {
                (SexpValue::Pair(left_car, left_cdr), SexpValue::Pair(right_car, right_cdr)) => {
                    if left_car != right_car {
                        return false;
                    }
                    left = &**left_cdr;
                    right = &**right_cdr;
                }
                (left, right) => return left == right,
            }
        }
    }
}

/// Pairs print as the list of their cars, with a dotted tail when the
/// list is improper.
impl fmt::Debug for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_pair() {
            return f
                .debug_struct("Sexp")
                .field("value", &self.value)
                .field("source_info", &self.source_info)
                .finish();
        }
        let mut items = self.iter_list();
        let mut list = f.debug_list();
        list.entries(items.by_ref());
        let tail = items.tail();
        if !tail.is_nil() {
            list.entry(&format_args!(". {:?}", tail));
        }
        list.finish()
    }
}

/// The datum itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SexpValue {
    /// The empty list
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(Symbol),
    Char(char),
    Vector(Vec<Sexp>),
    Pair(Box<Sexp>, Box<Sexp>),
}

impl Sexp {
    pub fn new(value: SexpValue, source_info: SourceInfo) -> Self {
        Sexp { value, source_info }
    }

    pub fn nil() -> Self {
        Sexp::new(SexpValue::Nil, SourceInfo::default())
    }

    pub fn bool(value: bool) -> Self {
        Sexp::new(SexpValue::Bool(value), SourceInfo::default())
    }

    pub fn int(value: i64) -> Self {
        Sexp::new(SexpValue::Int(value), SourceInfo::default())
    }

    pub fn float(value: f64) -> Self {
        Sexp::new(SexpValue::Float(value), SourceInfo::default())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Sexp::new(SexpValue::Str(value.into()), SourceInfo::default())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Sexp::new(SexpValue::Symbol(Symbol::new(name)), SourceInfo::default())
    }

    pub fn cons(car: Sexp, cdr: Sexp) -> Self {
        Sexp::new(
            SexpValue::Pair(Box::new(car), Box::new(cdr)),
            SourceInfo::default(),
        )
    }

    /// Build a proper list from its elements.
    pub fn list(items: impl IntoIterator<Item = Sexp>) -> Self {
        let items: Vec<Sexp> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Sexp::nil(), |tail, item| Sexp::cons(item, tail))
    }

    /// Build an association list of `(key . value)` entries.
    pub fn alist<K: Into<String>>(entries: impl IntoIterator<Item = (K, Sexp)>) -> Self {
        Sexp::list(
            entries
                .into_iter()
                .map(|(key, value)| Sexp::cons(Sexp::symbol(key), value)),
        )
    }

    pub fn with_source_info(mut self, source_info: SourceInfo) -> Self {
        self.source_info = source_info;
        self
    }

    pub fn sexp_type(&self) -> SexpType {
        match &self.value {
            SexpValue::Bool(_) => SexpType::Boolean,
            SexpValue::Int(_) => SexpType::Integer,
            SexpValue::Float(_) => SexpType::Float,
            SexpValue::Str(_) => SexpType::String,
            SexpValue::Symbol(_) => SexpType::Symbol,
            SexpValue::Pair(_, _) => SexpType::Pair,
            SexpValue::Nil | SexpValue::Char(_) | SexpValue::Vector(_) => SexpType::Unknown,
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self.value, SexpValue::Pair(_, _))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.value, SexpValue::Nil)
    }

    pub fn car(&self) -> Option<&Sexp> {
        match &self.value {
            SexpValue::Pair(car, _) => Some(&**car),
            _ => None,
        }
    }

    pub fn cdr(&self) -> Option<&Sexp> {
        match &self.value {
            SexpValue::Pair(_, cdr) => Some(&**cdr),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.value {
            SexpValue::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Walk the elements of a list.
    ///
    /// The iterator stops at the first cdr that is not a pair; check
    /// [`ListIter::tail`] afterwards to see whether the list was proper.
    pub fn iter_list(&self) -> ListIter<'_> {
        ListIter { rest: self }
    }
}

/// Iterator over the cars of a pair chain.
#[derive(Debug, Clone)]
pub struct ListIter<'a> {
    rest: &'a Sexp,
}

impl<'a> ListIter<'a> {
    /// What remains of the spine: `Nil` for a proper list, anything else
    /// for a dotted one.
    pub fn tail(&self) -> &'a Sexp {
        self.rest
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Sexp;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.rest.value {
            SexpValue::Pair(car, cdr) => {
                self.rest = &**cdr;
                Some(&**car)
            }
            _ => None,
        }
    }
}

/// Renders the node in written (re-readable) form.
impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            SexpValue::Nil => f.write_str("()"),
            SexpValue::Bool(true) => f.write_str("#t"),
            SexpValue::Bool(false) => f.write_str("#f"),
            SexpValue::Int(i) => write!(f, "{}", i),
            SexpValue::Float(x) => write_float(f, *x),
            SexpValue::Str(s) => write_string(f, s),
            SexpValue::Symbol(s) => write_symbol(f, s.as_str()),
            SexpValue::Char(c) => write_char(f, *c),
            SexpValue::Vector(items) => {
                f.write_str("#(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            SexpValue::Pair(_, _) => {
                f.write_str("(")?;
                let mut items = self.iter_list();
                let mut first = true;
                for item in items.by_ref() {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    write!(f, "{}", item)?;
                }
                let tail = items.tail();
                if !tail.is_nil() {
                    write!(f, " . {}", tail)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ' ' => f.write_str("#\\space"),
        '\n' => f.write_str("#\\newline"),
        '\t' => f.write_str("#\\tab"),
        '\r' => f.write_str("#\\return"),
        '\0' => f.write_str("#\\null"),
        c => write!(f, "#\\{}", c),
    }
}
