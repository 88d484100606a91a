//! Dynamic values walked by the resolver and consumed by the renderer.
//!
//! Rust has no runtime reflection, so arguments are converted into a small
//! closed [`Value`] model before rendering. Any `T: Serialize` converts through
//! [`to_value`], which preserves record and newtype names so that custom
//! formatters can be keyed by type. Plain scalars also convert via `From`.
//!
//! The resolver only relies on four capabilities of a value:
//!
//! | Capability | Method |
//! |------------|--------|
//! | has named field | [`Value::field`] |
//! | has string-keyed lookup | [`Value::key`] |
//! | is indirection | [`Value::peel`] |
//! | is sequence | [`Value::element`] |
//!
//! # Example
//!
//! ```rust
//! use fstr::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User { name: String, email: Option<String> }
//!
//! let user = to_value(&User { name: "Ada".into(), email: None }).unwrap();
//! assert_eq!(user.field("name").and_then(Value::as_str), Some("Ada"));
//! assert!(user.field("email").unwrap().is_nil());
//! ```

mod number;
mod ser;

use std::borrow::Cow;
use std::fmt;

pub use number::Number;
pub use ser::{to_value, ValueError, ValueSerializer};

/// A dynamically typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`None`, unit).
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Ordered sequence (vectors, arrays, tuples, sets).
    Seq(Vec<Value>),
    /// Associative container, in insertion order.
    Map(Vec<(Value, Value)>),
    /// Named struct with ordered fields.
    Record(Record),
    /// Transparent named wrapper around another value (newtype structs and
    /// newtype enum variants). Lookups and rendering see through it.
    Named {
        /// Name of the wrapping type.
        type_name: String,
        /// The wrapped value.
        inner: Box<Value>,
    },
}

/// A struct-like value: a type name plus its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Type name, used as the record's display prefix and formatter key.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record with the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field, builder style.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Looks up a field by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// The shape of a [`Value`], used as a formatter key for built-in kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Seq,
    Map,
    Record,
    Named,
}

impl ValueKind {
    /// Returns the lowercase display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Seq => "sequence",
            ValueKind::Map => "map",
            ValueKind::Record => "record",
            ValueKind::Named => "named",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Builds a map value from key/value pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a sequence value.
    pub fn seq<T: Into<Value>, I: IntoIterator<Item = T>>(items: I) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Wraps a value in a named indirection.
    pub fn named(type_name: impl Into<String>, inner: impl Into<Value>) -> Self {
        Value::Named {
            type_name: type_name.into(),
            inner: Box::new(inner.into()),
        }
    }

    /// Returns the kind of this value, without looking through wrappers.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
            Value::Named { .. } => ValueKind::Named,
        }
    }

    /// Returns the user type name carried by records and named wrappers.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Record(record) => Some(&record.name),
            Value::Named { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    /// Follows named wrappers down to the underlying value.
    pub fn peel(&self) -> &Value {
        let mut current = self;
        while let Value::Named { inner, .. } = current {
            current = inner;
        }
        current
    }

    /// Returns `true` for [`Value::Nil`] (after dereferencing).
    pub fn is_nil(&self) -> bool {
        matches!(self.peel(), Value::Nil)
    }

    /// Looks up a record field by exact name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self.peel() {
            Value::Record(record) => record.get(name),
            _ => None,
        }
    }

    /// Looks up a map entry whose key's text equals `key`.
    ///
    /// Only string-like keys (strings, integers, booleans, chars) match.
    pub fn key(&self, key: &str) -> Option<&Value> {
        match self.peel() {
            Value::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.key_text().as_deref() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the element at `index` of a sequence.
    pub fn element(&self, index: usize) -> Option<&Value> {
        match self.peel() {
            Value::Seq(items) => items.get(index),
            _ => None,
        }
    }

    /// Text form of a scalar usable as a map key.
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        match self.peel() {
            Value::Str(s) => Some(Cow::Borrowed(s)),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Uint(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.peel() {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.peel() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts a numeric value, if this is an integer or float.
    pub fn as_number(&self) -> Option<Number> {
        match self.peel() {
            Value::Int(n) => Some(Number::I64(*n)),
            Value::Uint(n) => Some(Number::U64(*n)),
            Value::Float(n) => Some(Number::F64(*n)),
            _ => None,
        }
    }

    /// Emptiness as seen by the `empty` / `nonempty` predicates.
    ///
    /// Nil, empty strings, empty containers, records without fields and
    /// numeric zero are empty.
    pub fn is_empty(&self) -> bool {
        match self.peel() {
            Value::Nil => true,
            Value::Str(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Record(record) => record.fields.is_empty(),
            Value::Int(n) => *n == 0,
            Value::Uint(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::Bool(_) | Value::Named { .. } => false,
        }
    }

    /// Truthiness as seen by the `true` / `false` predicates.
    pub fn is_truthy(&self) -> bool {
        match self.peel() {
            Value::Bool(b) => *b,
            Value::Record(_) => true,
            other => !other.is_empty(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Uint(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(ser::widen_f32(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::seq(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::seq(items),
            serde_json::Value::Object(map) => Value::map(map),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Nil => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Uint(n) => serializer.serialize_u64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.fields.len()))?;
                for (k, v) in &record.fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Named { inner, .. } => inner.serialize(serializer),
        }
    }
}
