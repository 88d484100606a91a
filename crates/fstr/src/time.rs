//! Built-in rendering of points in time.
//!
//! [`Timestamp`] values render through a formatter preloaded into every
//! [`Registry::new`](crate::Registry::new). The type tag picks the layout:
//!
//! | Tag | Output |
//! |-----|--------|
//! | none | RFC 3339, `2024-03-01T09:30:00Z` |
//! | `date` | `2024-03-01` |
//! | `time` | `09:30:00` |
//! | anything else | a strftime layout, `{:%d %b %Y}` |
//!
//! The `date` and `time` verbs apply the same layouts to RFC 3339 strings
//! and to integer Unix timestamps, so values serialized by other crates
//! render too.
//!
//! ```rust
//! use fstr::{fstr, Timestamp};
//!
//! let at = Timestamp::parse("2024-03-01T09:30:00Z").unwrap();
//! assert_eq!(fstr!("{}", at), "2024-03-01T09:30:00Z");
//! assert_eq!(fstr!("{:date} at {0:%H:%M}", at), "2024-03-01 at 09:30");
//! assert_eq!(fstr!("{:date}", 0), "1970-01-01");
//! ```

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde::{Serialize, Serializer};

use crate::parse::FormatSpec;
use crate::value::Value;

/// Output for values that do not hold a point in time, or layouts chrono
/// rejects.
pub const INVALID_TIME: &str = "<invalid time>";

/// A point in time with its UTC offset.
///
/// Serializes as a newtype named [`Timestamp::TYPE_NAME`] around its RFC 3339
/// text, which is what the built-in formatter is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub const TYPE_NAME: &'static str = "Timestamp";

    /// Parses RFC 3339 text.
    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text.trim()).map(Timestamp)
    }

    /// The instant `seconds` after the Unix epoch, in UTC.
    pub fn from_unix(seconds: i64) -> Option<Self> {
        DateTime::from_timestamp(seconds, 0).map(Self::from)
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(at: DateTime<Tz>) -> Self {
        Timestamp(at.fixed_offset())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(Self::TYPE_NAME, &self.to_rfc3339())
    }
}

impl From<Timestamp> for Value {
    fn from(at: Timestamp) -> Self {
        Value::named(Timestamp::TYPE_NAME, at.to_rfc3339())
    }
}

/// Reads a point in time out of a value: RFC 3339 text or whole seconds
/// since the Unix epoch.
pub fn timestamp_of(value: &Value) -> Option<Timestamp> {
    match value.peel() {
        Value::Str(text) => Timestamp::parse(text).ok(),
        Value::Int(seconds) => Timestamp::from_unix(*seconds),
        Value::Uint(seconds) => i64::try_from(*seconds).ok().and_then(Timestamp::from_unix),
        _ => None,
    }
}

/// Renders `at` with the layout named by the type tag.
pub fn format_timestamp(at: &Timestamp, tag: Option<&str>) -> String {
    let layout = match tag {
        None => return at.to_rfc3339(),
        Some("date") => "%Y-%m-%d",
        Some("time") => "%H:%M:%S",
        Some(layout) => layout,
    };
    let mut out = String::new();
    match write!(out, "{}", at.0.format(layout)) {
        Ok(()) => out,
        Err(_) => {
            tracing::debug!(layout, "unusable time layout");
            INVALID_TIME.to_string()
        }
    }
}

/// The formatter registered for [`Timestamp`] values.
pub(crate) fn timestamp_formatter(value: &Value, spec: &FormatSpec) -> String {
    match timestamp_of(value) {
        Some(at) => format_timestamp(&at, spec.ty()),
        None => INVALID_TIME.to_string(),
    }
}

pub(crate) fn date_verb(value: &Value, _: &FormatSpec) -> String {
    format_as(value, "date")
}

pub(crate) fn time_verb(value: &Value, _: &FormatSpec) -> String {
    format_as(value, "time")
}

fn format_as(value: &Value, layout: &str) -> String {
    match timestamp_of(value) {
        Some(at) => format_timestamp(&at, Some(layout)),
        None => INVALID_TIME.to_string(),
    }
}
