//! Rendering of resolved values into text.
//!
//! Per placeholder, in order:
//!
//! 1. A condition, if present, replaces the value with one of its literals,
//!    which is rendered as a format string of its own.
//! 2. Unresolved references become `<no value>` or `<invalid field>`.
//! 3. A custom formatter for the value's type key, else a verb for the type
//!    tag, else the built-in rules produce the text.
//! 4. Width, fill and alignment are applied to the text.
//! 5. The color tag wraps the result.

mod color;
mod number;

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cache::ParseCache;
use crate::parse::{Align, FormatSpec, Placeholder, Sign, Template};
use crate::registry::Registry;
use crate::resolve::{resolve, Args, Resolved};
use crate::value::{Record, Value};

pub use color::{paint, style_for};

static DEFAULT_SPEC: FormatSpec = FormatSpec {
    fill: None,
    align: None,
    sign: Sign::Default,
    zero_pad: false,
    alternate: false,
    width: None,
    precision: None,
    ty: None,
};

/// Deepest nesting of conditions whose literals are still rendered. Below
/// that, the chosen literal is emitted as written.
pub const MAX_CONDITION_DEPTH: usize = 64;

/// Everything a render pass reads besides the arguments.
pub(crate) struct Renderer<'e> {
    registry: &'e Registry,
    cache: &'e ParseCache,
    colors: bool,
    /// Number of condition literals being rendered around this pass.
    depth: usize,
}

impl<'e> Renderer<'e> {
    pub(crate) fn new(registry: &'e Registry, cache: &'e ParseCache, colors: bool) -> Self {
        Self {
            registry,
            cache,
            colors,
            depth: 0,
        }
    }

    /// Renders a format string, going through the parse cache.
    pub(crate) fn render(&self, format: &str, args: &Args) -> String {
        if !format.contains(&['{', '}'][..]) {
            return format.to_string();
        }
        let template = self.cache.get_or_parse(format);
        self.render_template(&template, args)
    }

    /// Renders a parsed template with a fresh auto-index counter.
    pub(crate) fn render_template(&self, template: &Template, args: &Args) -> String {
        let segments = template.segments();
        let placeholders = template.placeholders();
        let mut out = String::with_capacity(template.literal_len() + placeholders.len() * 8);
        let mut auto = 0;

        for (segment, placeholder) in segments.iter().zip(placeholders) {
            out.push_str(segment);
            let resolved = resolve(placeholder, args, &mut auto);
            out.push_str(&self.render_placeholder(placeholder, resolved, args));
        }
        if let Some(trailing) = segments.last() {
            out.push_str(trailing);
        }
        out
    }

    fn render_placeholder(
        &self,
        placeholder: &Placeholder,
        resolved: Resolved<'_>,
        args: &Args,
    ) -> String {
        let text = match &placeholder.condition {
            Some(condition) => self.render_literal(condition.select(resolved.value()), args),
            None => {
                let spec = placeholder.spec.as_ref().unwrap_or(&DEFAULT_SPEC);
                let text = match resolved {
                    Resolved::Value(value) => format_value(Some(self.registry), value, spec),
                    Resolved::Unresolved(unresolved) => unresolved.sentinel().to_string(),
                };
                pad(text, spec)
            }
        };

        match &placeholder.color {
            Some(tag) if self.colors => paint(text, tag),
            _ => text,
        }
    }

    fn render_literal(&self, literal: &str, args: &Args) -> String {
        if self.depth >= MAX_CONDITION_DEPTH {
            tracing::debug!(depth = self.depth, "conditions nested too deeply, literal kept as is");
            return literal.to_string();
        }
        let nested = Renderer {
            depth: self.depth + 1,
            ..*self
        };
        nested.render(literal, args)
    }
}

/// Renders a value without padding: custom formatter, then verb, then the
/// built-in rules. With no registry only the built-in rules apply.
pub(crate) fn format_value(
    registry: Option<&Registry>,
    value: &Value,
    spec: &FormatSpec,
) -> String {
    if let Some(registry) = registry {
        if let Some(formatter) = registry.formatter_for(value) {
            return formatter.format(value, spec);
        }
        if let Some(verb) = spec.ty().and_then(|tag| registry.verb(tag)) {
            return verb.apply(value, spec);
        }
    }

    match value {
        Value::Nil => "<nil>".to_string(),
        Value::Bool(b) => format_bool(*b, spec).to_string(),
        Value::Int(n) => number::format_int(*n < 0, n.unsigned_abs(), spec),
        Value::Uint(n) => number::format_int(false, *n, spec),
        Value::Float(n) => number::format_float(*n, spec),
        Value::Str(s) => format_str(s, spec),
        Value::Seq(items) => format_seq(registry, items, spec),
        Value::Map(entries) => format_map(registry, entries, spec),
        Value::Record(record) => format_record(registry, record, spec),
        Value::Named { inner, .. } => format_value(registry, inner, spec),
    }
}

/// Renders a value with the built-in rules only.
pub(crate) fn format_builtin(value: &Value, spec: &FormatSpec) -> String {
    format_value(None, value, spec)
}

fn format_bool(b: bool, spec: &FormatSpec) -> &'static str {
    match (spec.ty(), b) {
        (Some("y"), true) => "yes",
        (Some("y"), false) => "no",
        (Some("Y"), true) => "YES",
        (Some("Y"), false) => "NO",
        (Some("T"), true) => "TRUE",
        (Some("T"), false) => "FALSE",
        (_, true) => "true",
        (_, false) => "false",
    }
}

fn format_str(s: &str, spec: &FormatSpec) -> String {
    let truncated = match spec.effective_precision() {
        Some(max) => match s.char_indices().nth(max) {
            Some((end, _)) => &s[..end],
            None => s,
        },
        None => s,
    };
    match spec.ty() {
        Some("?") => format!("{:?}", truncated),
        _ => truncated.to_string(),
    }
}

fn format_seq(registry: Option<&Registry>, items: &[Value], spec: &FormatSpec) -> String {
    let inner = spec.without_layout();
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_value(registry, item, &inner));
    }
    out.push(']');
    out
}

fn format_map(
    registry: Option<&Registry>,
    entries: &[(Value, Value)],
    spec: &FormatSpec,
) -> String {
    let inner = spec.without_layout();
    let mut out = String::from("{");
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_value(registry, key, &DEFAULT_SPEC));
        out.push_str(": ");
        out.push_str(&format_value(registry, value, &inner));
    }
    out.push('}');
    out
}

fn format_record(registry: Option<&Registry>, record: &Record, spec: &FormatSpec) -> String {
    let inner = spec.without_layout();
    let mut out = String::with_capacity(record.name.len() + 2);
    out.push_str(&record.name);
    out.push('{');
    for (i, (name, value)) in record.fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&format_value(registry, value, &inner));
    }
    out.push('}');
    out
}

/// Terminal display width of `text`, ignoring ANSI escape sequences.
pub fn display_width(text: &str) -> usize {
    console::strip_ansi_codes(text).width()
}

/// Pads `text` to the spec's width with its fill and alignment. Text already
/// at least as wide is returned unchanged.
///
/// A double-width fill covers two columns; a column it cannot cover is
/// padded with a space.
pub fn pad(text: String, spec: &FormatSpec) -> String {
    let width = match spec.effective_width() {
        Some(width) => width,
        None => return text,
    };
    let len = display_width(&text);
    if len >= width {
        return text;
    }

    let fill = spec.effective_fill();
    let fill_width = fill.width().unwrap_or(1).max(1);
    let total = width - len;
    let (left, right) = match spec.effective_align() {
        Align::Left => (0, total),
        Align::Right => (total, 0),
        Align::Center => (total / 2, total - total / 2),
    };

    let mut out = String::with_capacity(text.len() + total * fill.len_utf8());
    push_fill(&mut out, fill, fill_width, left);
    out.push_str(&text);
    push_fill(&mut out, fill, fill_width, right);
    out
}

fn push_fill(out: &mut String, fill: char, fill_width: usize, columns: usize) {
    out.extend(std::iter::repeat(fill).take(columns / fill_width));
    out.extend(std::iter::repeat(' ').take(columns % fill_width));
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_builtin(self, &DEFAULT_SPEC))
    }
}
