//! Registries for custom formatters and verbs.
//!
//! A [`Formatter`] takes over rendering for every value of one type key; a
//! verb takes over rendering for one type tag (`{:json}`, `{:upper}`).
//! Formatters take priority over verbs, and both take priority over the
//! built-in rules. Width, color and conditionals still apply to their output.
//!
//! Registration is expected at startup. Lookups take a read lock and clone an
//! `Arc` out, so user code never runs while a lock is held.
//!
//! # Example
//!
//! ```rust
//! use fstr::{args, Engine, Registry, TypeKey, Value};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::new());
//! registry.register_formatter(TypeKey::named("Celsius"), |value: &Value, _: &fstr::FormatSpec| {
//!     format!("{}°C", value.peel().as_number().map(|n| n.to_f64()).unwrap_or_default())
//! });
//!
//! let engine = Engine::builder().registry(registry).build();
//!
//! #[derive(serde::Serialize)]
//! struct Celsius(f64);
//!
//! assert_eq!(engine.render("{}", &args!(Celsius(21.5))), "21.5°C");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::parse::FormatSpec;
use crate::render;
use crate::value::{Value, ValueKind};

/// Custom rendering for all values of one [`TypeKey`].
pub trait Formatter: Send + Sync {
    /// Renders the raw value. The returned text is still padded, colored
    /// and subject to conditionals by the caller.
    fn format(&self, value: &Value, spec: &FormatSpec) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&Value, &FormatSpec) -> String + Send + Sync,
{
    fn format(&self, value: &Value, spec: &FormatSpec) -> String {
        self(value, spec)
    }
}

type VerbFn = dyn Fn(&Value, &FormatSpec) -> String + Send + Sync;

/// A registered type-tag handler with its one-line documentation.
#[derive(Clone)]
pub struct Verb {
    handler: Arc<VerbFn>,
    docs: String,
}

impl Verb {
    /// Runs the verb on a value.
    pub fn apply(&self, value: &Value, spec: &FormatSpec) -> String {
        (self.handler)(value, spec)
    }

    pub fn docs(&self) -> &str {
        &self.docs
    }
}

impl fmt::Debug for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verb").field("docs", &self.docs).finish()
    }
}

/// Key under which a [`Formatter`] is registered.
///
/// Named keys match records and named wrappers by type name; kind keys match
/// every value of a built-in kind. A value's named key is checked first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A record or newtype name, e.g. `"Duration"`.
    Named(String),
    /// A built-in value kind.
    Kind(ValueKind),
}

impl TypeKey {
    pub fn named(name: impl Into<String>) -> Self {
        TypeKey::Named(name.into())
    }

    pub fn kind(kind: ValueKind) -> Self {
        TypeKey::Kind(kind)
    }
}

impl From<ValueKind> for TypeKey {
    fn from(kind: ValueKind) -> Self {
        TypeKey::Kind(kind)
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        TypeKey::Named(name.to_string())
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        TypeKey::Named(name)
    }
}

/// Concurrent store of formatters and verbs.
pub struct Registry {
    formatters: RwLock<HashMap<TypeKey, Arc<dyn Formatter>>>,
    verbs: RwLock<HashMap<String, Verb>>,
}

impl Registry {
    /// Creates a registry preloaded with the built-in verbs `upper`, `lower`
    /// and `json`. With the `time` feature it also carries the `date` and
    /// `time` verbs and the [`Timestamp`](crate::Timestamp) formatter.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_verb("upper", upper_verb, "uppercase the rendered value");
        registry.register_verb("lower", lower_verb, "lowercase the rendered value");
        registry.register_verb("json", json_verb, "render the value as JSON (`#` pretty-prints)");
        #[cfg(feature = "time")]
        {
            use crate::time;
            registry.register_formatter(
                TypeKey::named(time::Timestamp::TYPE_NAME),
                time::timestamp_formatter,
            );
            registry.register_verb("date", time::date_verb, "RFC 3339 or Unix seconds as a date");
            registry.register_verb("time", time::time_verb, "RFC 3339 or Unix seconds as a time");
        }
        registry
    }

    /// Creates a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            formatters: RwLock::new(HashMap::new()),
            verbs: RwLock::new(HashMap::new()),
        }
    }

    /// Installs a formatter; the last registration for a key wins.
    pub fn register_formatter<F>(&self, key: impl Into<TypeKey>, formatter: F)
    where
        F: Formatter + 'static,
    {
        let key = key.into();
        tracing::debug!(?key, "registering formatter");
        self.formatters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::new(formatter));
    }

    /// Removes a formatter. Returns `true` if one was registered.
    pub fn unregister_formatter(&self, key: impl Into<TypeKey>) -> bool {
        self.formatters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key.into())
            .is_some()
    }

    /// Installs a verb under a type-tag name; the last registration wins.
    pub fn register_verb<F>(&self, name: impl Into<String>, handler: F, docs: impl Into<String>)
    where
        F: Fn(&Value, &FormatSpec) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(verb = %name, "registering verb");
        self.verbs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                name,
                Verb {
                    handler: Arc::new(handler),
                    docs: docs.into(),
                },
            );
    }

    /// Finds the formatter for a value: by type name first, then by kind.
    pub fn formatter_for(&self, value: &Value) -> Option<Arc<dyn Formatter>> {
        let formatters = self
            .formatters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if formatters.is_empty() {
            return None;
        }
        value
            .type_name()
            .and_then(|name| formatters.get(&TypeKey::Named(name.to_string())))
            .or_else(|| formatters.get(&TypeKey::Kind(value.kind())))
            .cloned()
    }

    /// Looks up a verb by name.
    pub fn verb(&self, name: &str) -> Option<Verb> {
        self.verbs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Lists registered verbs with their documentation, sorted by name.
    pub fn verbs(&self) -> Vec<(String, String)> {
        let verbs = self.verbs.read().unwrap_or_else(PoisonError::into_inner);
        let mut listed: Vec<_> = verbs
            .iter()
            .map(|(name, verb)| (name.clone(), verb.docs.clone()))
            .collect();
        listed.sort();
        listed
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatters: Vec<TypeKey> = self
            .formatters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("Registry")
            .field("formatters", &formatters)
            .field("verbs", &self.verbs().into_iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

static GLOBAL_REGISTRY: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// The process-wide registry used by the free functions and by engines that
/// were not given their own.
pub fn global_registry() -> &'static Arc<Registry> {
    &GLOBAL_REGISTRY
}

fn upper_verb(value: &Value, spec: &FormatSpec) -> String {
    render::format_builtin(value, &untyped(spec)).to_uppercase()
}

fn lower_verb(value: &Value, spec: &FormatSpec) -> String {
    render::format_builtin(value, &untyped(spec)).to_lowercase()
}

fn json_verb(value: &Value, spec: &FormatSpec) -> String {
    let encoded = if spec.alternate {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "value is not representable as JSON");
        "<invalid json>".to_string()
    })
}

fn untyped(spec: &FormatSpec) -> FormatSpec {
    FormatSpec {
        ty: None,
        ..spec.clone()
    }
}
