//! # fstr - runtime brace-placeholder formatting
//!
//! `fstr` renders format strings that are only known at runtime: templates
//! from config files, user-supplied output formats, localized messages. It
//! follows the familiar `{}` placeholder style and adds field paths into
//! structured data, colors and conditionals.
//!
//! ## Quick Start
//!
//! ```rust
//! use fstr::fstr;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Detail { city: String }
//!
//! #[derive(Serialize)]
//! struct User { name: String, detail: Detail, unread: u32 }
//!
//! let user = User {
//!     name: "Ada".into(),
//!     detail: Detail { city: "London".into() },
//!     unread: 3,
//! };
//!
//! assert_eq!(fstr!("{name} from {detail.city}", user), "Ada from London");
//! assert_eq!(fstr!("{:>6.2f}|{:<4}|{:#x}", 3.14159, "ab", 255), "  3.14|ab  |0xff");
//! assert_eq!(
//!     fstr!("{n?>1?({n} messages):(one message)}", n = 3),
//!     "3 messages"
//! );
//! ```
//!
//! ## Placeholder grammar
//!
//! `{reference:spec|color?condition}`, every part optional:
//!
//! - reference: empty (next positional), an index, or a name, followed by a
//!   dotted field chain (`{0.detail.city}`, `{user.tags.1}`)
//! - spec: `[[fill]align][sign][#][0][width][.precision][type]`, see
//!   [`FormatSpec`](parse::FormatSpec)
//! - color: a color name, `bright_` color, palette index or attribute,
//!   `+`-joined (`{status|bold+red}`)
//! - condition: `predicate?(when true):(when false)`, see
//!   [`Predicate`](parse::Predicate)
//!
//! `{{` and `}}` produce literal braces.
//!
//! ## Failure model
//!
//! [`render`] never fails. A missing argument renders as `<no value>`, a bad
//! field path as `<invalid field>`, and malformed braces as literal text. Use
//! [`validate`] or [`try_render`] to reject malformed format strings, and
//! [`render_safe`] to contain panics from custom formatters.
//!
//! ## Extending
//!
//! - [`register_formatter`]: custom rendering for a type name or value kind
//! - [`register_verb`]: a new type tag usable as `{:name}`
//! - [`Engine`]: an isolated cache, registry and color policy
//! - the `time` feature (on by default): `Timestamp` values, rendered as
//!   RFC 3339 or with `{:date}`, `{:time}` or a strftime layout

pub mod cache;
pub mod engine;
pub mod env;
mod error;
pub mod parse;
pub mod prelude;
mod registry;
mod render;
mod resolve;
#[cfg(feature = "time")]
pub mod time;
mod validate;
pub mod value;

pub use cache::ParseCache;
pub use engine::{global_engine, ColorChoice, Engine, EngineBuilder, EngineConfig};
pub use env::{expand_env, expand_with};
pub use error::{FormatError, FormatErrorKind, RenderError};
pub use parse::{parse, FormatSpec, Template};
pub use registry::{global_registry, Formatter, Registry, TypeKey, Verb};
pub use render::{display_width, pad, paint, style_for, MAX_CONDITION_DEPTH};
pub use resolve::{resolve, walk, Args, Resolved, Unresolved};
#[cfg(feature = "time")]
pub use time::Timestamp;
pub use validate::validate;
pub use value::{to_value, Record, Value, ValueKind};

use std::io::{self, Write};
use std::sync::Arc;

/// Renders `format` with the global engine.
pub fn render(format: &str, args: &Args) -> String {
    global_engine().render(format, args)
}

/// Validates and renders `format`, catching formatter panics.
pub fn try_render(format: &str, args: &Args) -> Result<String, RenderError> {
    global_engine().try_render(format, args)
}

/// Renders `format`, turning a formatter panic into `<format error: ...>`.
pub fn render_safe(format: &str, args: &Args) -> String {
    global_engine().render_safe(format, args)
}

/// Renders into a writer with the global engine.
pub fn write_render<W>(writer: &mut W, format: &str, args: &Args) -> io::Result<()>
where
    W: Write + ?Sized,
{
    global_engine().write_render(writer, format, args)
}

pub fn writeln_render<W>(writer: &mut W, format: &str, args: &Args) -> io::Result<()>
where
    W: Write + ?Sized,
{
    global_engine().writeln_render(writer, format, args)
}

/// Renders to standard output.
pub fn print_render(format: &str, args: &Args) -> io::Result<()> {
    write_render(&mut io::stdout().lock(), format, args)
}

/// Renders to standard output followed by a newline.
pub fn println_render(format: &str, args: &Args) -> io::Result<()> {
    writeln_render(&mut io::stdout().lock(), format, args)
}

/// The global registry used by [`render`] and the macros.
pub fn registry() -> &'static Arc<Registry> {
    global_registry()
}

/// Registers a formatter on the global registry.
pub fn register_formatter<F>(key: impl Into<TypeKey>, formatter: F)
where
    F: Formatter + 'static,
{
    global_registry().register_formatter(key, formatter);
}

/// Registers a verb on the global registry.
pub fn register_verb<F>(name: impl Into<String>, handler: F, docs: impl Into<String>)
where
    F: Fn(&Value, &FormatSpec) -> String + Send + Sync + 'static,
{
    global_registry().register_verb(name, handler, docs);
}

/// Builds [`Args`] from positional values and `name = value` pairs.
///
/// Values are converted with [`to_value`], so anything `Serialize` works.
///
/// ```rust
/// use fstr::{args, Value};
///
/// let args = args!(1, "two", unit = "kg");
/// assert_eq!(args.get(1), Some(&Value::from("two")));
/// assert_eq!(args.named_container().and_then(|c| c.key("unit")), Some(&Value::from("kg")));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($rest:tt)+) => {{
        let mut args = $crate::Args::new();
        $crate::__push_args!(args; $($rest)+);
        args
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __push_args {
    ($args:ident;) => {};
    ($args:ident; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $args.set_serialize(stringify!($name), &$value);
        $($crate::__push_args!($args; $($rest)*);)?
    };
    ($args:ident; $value:expr $(, $($rest:tt)*)?) => {
        $args.push_serialize(&$value);
        $($crate::__push_args!($args; $($rest)*);)?
    };
}

/// Renders a format string with the global engine, `format!` style.
///
/// ```rust
/// use fstr::fstr;
///
/// assert_eq!(fstr!("{} + {} = {sum}", 1, 2, sum = 3), "1 + 2 = 3");
/// assert_eq!(fstr!("{missing}"), "<no value>");
/// ```
#[macro_export]
macro_rules! fstr {
    ($format:expr $(,)?) => {
        $crate::render($format, &$crate::Args::new())
    };
    ($format:expr, $($rest:tt)+) => {
        $crate::render($format, &$crate::args!($($rest)+))
    };
}

/// Renders into an `io::Write`, `write!` style.
#[macro_export]
macro_rules! write_fstr {
    ($writer:expr, $format:expr $(,)?) => {
        $crate::write_render(&mut $writer, $format, &$crate::Args::new())
    };
    ($writer:expr, $format:expr, $($rest:tt)+) => {
        $crate::write_render(&mut $writer, $format, &$crate::args!($($rest)+))
    };
}

/// Renders into an `io::Write` followed by a newline, `writeln!` style.
#[macro_export]
macro_rules! writeln_fstr {
    ($writer:expr, $format:expr $(,)?) => {
        $crate::writeln_render(&mut $writer, $format, &$crate::Args::new())
    };
    ($writer:expr, $format:expr, $($rest:tt)+) => {
        $crate::writeln_render(&mut $writer, $format, &$crate::args!($($rest)+))
    };
}
