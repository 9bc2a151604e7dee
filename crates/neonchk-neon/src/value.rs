//! # Value Model
//!
//! The decoded form of a NEON document. [`Value`] has three structural cases
//! ([`Scalar`], sequence, [`Mapping`]) plus the opaque [`Object`] leaf used
//! for constructs that are neither: entities (`Foo(bar)`), entity chains and
//! date/time literals.
//!
//! ## Equality
//!
//! Scalars compare strictly by type and value: `Int(1)` is not equal to
//! `Float(1.0)`, and `Bool(true)` is not equal to `String("true")`. Mappings
//! compare by key set and per-key value; insertion order is kept for display
//! but ignored for equality.

use std::collections::HashMap;
use std::fmt;

use chrono::{FixedOffset, NaiveDateTime};

/// A decoded NEON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A primitive leaf.
    Scalar(Scalar),
    /// An ordered list (`[a, b]` or a block of `- item` lines).
    Sequence(Vec<Value>),
    /// A keyed collection (`{a: b}` or a block of `key: value` lines).
    Mapping(Mapping),
    /// A non-primitive leaf produced by an entity or date/time literal.
    Object(Object),
}

impl Value {
    /// The null scalar.
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// A string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    /// A mapping holding exactly one entry.
    pub fn single(key: impl Into<String>, value: Value) -> Self {
        let mut map = Mapping::new();
        map.insert(key, value);
        Self::Mapping(map)
    }

    /// True for primitive leaves (string, number, boolean, null).
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Borrow the mapping, if this value is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the sequence items, if this value is one.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the scalar, if this value is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Short human-readable name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.kind(),
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Object(Object::Entity(_)) | Self::Object(Object::Chain(_)) => "entity",
            Self::Object(Object::DateTime(_)) => "datetime",
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Float(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

/// A primitive NEON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `null`, `Null`, `NULL` or an empty value.
    Null,
    /// `true`/`yes`/`on` and `false`/`no`/`off` in any of their three casings.
    Bool(bool),
    /// Decimal, hexadecimal, octal or binary integer.
    Int(i64),
    /// Number with a fraction or exponent.
    Float(f64),
    /// Quoted string or unquoted literal that is nothing else.
    String(String),
}

impl Scalar {
    /// Short name of the scalar type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

/// Keyed collection preserving insertion order.
///
/// Keys are unique; [`Mapping::insert`] replaces the value of an existing key
/// in place. Lookups go through a key index, so building and querying large
/// mappings stays linear overall.
#[derive(Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// True when the key is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl FromIterator<(String, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Non-primitive leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// `Name(args)`.
    Entity(Entity),
    /// Several entities written back to back: `a(1)b(2)`.
    Chain(Vec<Entity>),
    /// A date or date-time literal.
    DateTime(DateTime),
}

/// A NEON entity: a value followed by a parenthesized argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// The entity name, usually a string literal.
    pub value: Box<Value>,
    /// Arguments as a sequence (positional) or mapping (named).
    pub attributes: Box<Value>,
}

impl Entity {
    /// Build an entity from its name value and argument collection.
    pub fn new(value: Value, attributes: Value) -> Self {
        Self {
            value: Box::new(value),
            attributes: Box::new(attributes),
        }
    }
}

/// A date/time literal with an optional fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl DateTime {
    /// Combine a local date-time with an optional offset.
    pub fn new(naive: NaiveDateTime, offset: Option<FixedOffset>) -> Self {
        Self { naive, offset }
    }

    /// The wall-clock date-time as written.
    pub fn naive(&self) -> &NaiveDateTime {
        &self.naive
    }

    /// The explicit offset, if the literal carried one.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive.format("%Y-%m-%d %H:%M:%S%.f"))?;
        if let Some(offset) = self.offset {
            write!(f, " {offset}")?;
        }
        Ok(())
    }
}
