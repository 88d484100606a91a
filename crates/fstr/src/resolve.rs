//! Argument lookup: turns a placeholder's reference and field chain into a
//! value borrowed from the call arguments.
//!
//! Resolution never fails. Anything that cannot be found becomes one of the
//! two [`Unresolved`] outcomes, which the renderer prints as a sentinel.

use serde::Serialize;

use crate::parse::{Placeholder, Reference};
use crate::value::{to_value, Value};

/// Arguments supplied at a render call site.
///
/// Positional values are addressed by `{}` and `{N}`. Named values live in a
/// single container (a map, or a record passed with
/// [`Args::with_named_container`]) addressed by `{name}`. When no named
/// container is present, a record or map in the first positional slot serves
/// as one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: Option<Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Builder form of [`Args::push`].
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Appends any serializable value as a positional argument.
    ///
    /// A value that fails to serialize is pushed as nil, so later positions
    /// keep their indexes.
    pub fn push_serialize<T: Serialize + ?Sized>(&mut self, value: &T) {
        self.positional.push(convert(value));
    }

    /// Sets a named argument, replacing an earlier one with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = Value::Str(name.into());
        let value = value.into();
        let container = self.named.get_or_insert_with(|| Value::Map(Vec::new()));
        match container {
            Value::Map(entries) => match entries.iter_mut().find(|(k, _)| *k == name) {
                Some(entry) => entry.1 = value,
                None => entries.push((name, value)),
            },
            other => {
                tracing::debug!(
                    kind = %other.kind(),
                    "replacing non-map named container with named arguments"
                );
                *other = Value::Map(vec![(name, value)]);
            }
        }
    }

    /// Builder form of [`Args::set`].
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a named argument from any serializable value.
    pub fn set_serialize<T: Serialize + ?Sized>(&mut self, name: impl Into<String>, value: &T) {
        let value = convert(value);
        self.set(name, value);
    }

    /// Uses a record or map as the named-argument container.
    pub fn with_named_container(mut self, container: impl Into<Value>) -> Self {
        self.named = Some(container.into());
        self
    }

    /// Returns the positional argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Returns the named-argument container, if one was supplied.
    pub fn named_container(&self) -> Option<&Value> {
        self.named.as_ref()
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_none()
    }

    fn lookup_named(&self, name: &str) -> Resolved<'_> {
        if let Some(found) = self.named.as_ref().and_then(|c| lookup_in(c, name)) {
            return Resolved::Value(found);
        }
        match self.positional.first().map(Value::peel) {
            Some(container @ (Value::Record(_) | Value::Map(_))) => {
                match lookup_in(container, name) {
                    Some(found) => Resolved::Value(found),
                    None => Resolved::Unresolved(Unresolved::InvalidField),
                }
            }
            _ if self.named.is_some() => Resolved::Unresolved(Unresolved::InvalidField),
            _ => Resolved::Unresolved(Unresolved::NoValue),
        }
    }
}

fn convert<T: Serialize + ?Sized>(value: &T) -> Value {
    to_value(value).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "argument could not be converted, using nil");
        Value::Nil
    })
}

fn lookup_in<'a>(container: &'a Value, name: &str) -> Option<&'a Value> {
    container.field(name).or_else(|| container.key(name))
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            named: None,
        }
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Args {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Into<Value>> FromIterator<T> for Args {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

/// Why a placeholder produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// The referenced argument does not exist.
    NoValue,
    /// The argument exists but the field path does not lead anywhere.
    InvalidField,
}

impl Unresolved {
    /// The text rendered in place of the value.
    pub fn sentinel(self) -> &'static str {
        match self {
            Unresolved::NoValue => "<no value>",
            Unresolved::InvalidField => "<invalid field>",
        }
    }
}

/// Outcome of resolving one placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Value(&'a Value),
    Unresolved(Unresolved),
}

impl<'a> Resolved<'a> {
    /// The resolved value, if there is one.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Unresolved(_) => None,
        }
    }
}

/// Resolves a placeholder against the arguments.
///
/// `auto` is the per-render counter for `{}` references; it advances once per
/// auto placeholder whether or not the argument exists.
pub fn resolve<'a>(placeholder: &Placeholder, args: &'a Args, auto: &mut usize) -> Resolved<'a> {
    let base = match &placeholder.reference {
        Reference::Auto => {
            let index = *auto;
            *auto += 1;
            positional(args, index)
        }
        Reference::Index(index) => positional(args, *index),
        Reference::Named(name) => args.lookup_named(name),
    };
    match base {
        Resolved::Value(value) => walk(value, &placeholder.field_chain),
        unresolved => unresolved,
    }
}

fn positional(args: &Args, index: usize) -> Resolved<'_> {
    match args.get(index) {
        Some(value) => Resolved::Value(value),
        None => Resolved::Unresolved(Unresolved::NoValue),
    }
}

/// Applies a field chain to a value, left to right.
pub fn walk<'a, S: AsRef<str>>(value: &'a Value, chain: &[S]) -> Resolved<'a> {
    let mut current = value;
    for component in chain {
        let component = component.as_ref();
        let next = match current.peel() {
            record @ Value::Record(_) => record.field(component),
            map @ Value::Map(_) => map.key(component),
            seq @ Value::Seq(_) => component.parse().ok().and_then(|i| seq.element(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Resolved::Unresolved(Unresolved::InvalidField),
        }
    }
    Resolved::Value(current)
}
