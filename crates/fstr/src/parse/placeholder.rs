//! Placeholder descriptors: `{reference:spec|color?condition}`.

use super::condition::Condition;
use super::match_parens;
use super::spec::FormatSpec;

/// Which argument a placeholder draws its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `{}`: the next unclaimed positional argument.
    Auto,
    /// `{2}`: a positional argument by index.
    Index(usize),
    /// `{name}`: a named argument.
    Named(String),
}

/// One parsed `{...}` occurrence.
///
/// Computed purely from the format text; nothing here knows about the
/// arguments a template is later rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Where the initial value comes from.
    pub reference: Reference,
    /// Path components applied to the referenced value, left to right.
    pub field_chain: Vec<String>,
    /// Format directives, if a spec part was present.
    pub spec: Option<FormatSpec>,
    /// Color tag name.
    pub color: Option<String>,
    /// Conditional branch selection.
    pub condition: Option<Condition>,
    /// The placeholder as written, braces included.
    pub raw: String,
}

impl Placeholder {
    /// Parses the content between the braces. `raw` is kept for diagnostics.
    ///
    /// Parts are recognised in fixed order: reference, then `:` spec, then
    /// `|` color, then `?` condition. The condition starts at the first `?`
    /// whose remainder is a well-formed condition, so `{:?}` keeps `?` as the
    /// debug type tag.
    pub fn parse(inner: &str, raw: &str) -> Self {
        let reference_end = inner.find(&[':', '|', '?'][..]).unwrap_or(inner.len());
        let (reference, field_chain) = parse_reference(&inner[..reference_end]);
        let mut rest = &inner[reference_end..];

        let mut condition = None;
        let mut search_from = 0;
        let matching = if rest.contains('?') {
            match_parens(rest)
        } else {
            Vec::new()
        };
        while let Some(offset) = rest[search_from..].find('?') {
            let at = search_from + offset;
            if let Some(parsed) = Condition::parse_at(rest, at + 1, &matching) {
                condition = Some(parsed);
                rest = &rest[..at];
                break;
            }
            search_from = at + 1;
        }

        let rest = rest.strip_prefix(':').unwrap_or(rest);
        let (spec_text, color_text) = match rest.split_once('|') {
            Some((spec, color)) => (spec, Some(color)),
            None => (rest, None),
        };

        let spec = (!spec_text.is_empty()).then(|| FormatSpec::parse(spec_text));
        let color = color_text
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            reference,
            field_chain,
            spec,
            color,
            condition,
            raw: raw.to_string(),
        }
    }

    /// Returns the spec, or the all-defaults spec when none was written.
    pub fn spec_or_default(&self) -> FormatSpec {
        self.spec.clone().unwrap_or_default()
    }
}

/// Splits the reference part into the argument reference and field chain.
fn parse_reference(text: &str) -> (Reference, Vec<String>) {
    let text = text.trim();
    if text.is_empty() {
        return (Reference::Auto, Vec::new());
    }

    let (head, chain) = match text.split_once('.') {
        Some((head, tail)) => (head, tail.split('.').map(str::to_string).collect()),
        None => (text, Vec::new()),
    };

    let reference = if head.is_empty() {
        Reference::Auto
    } else if head.bytes().all(|b| b.is_ascii_digit()) {
        // Indexes too large for usize can never be in range anyway.
        Reference::Index(head.parse().unwrap_or(usize::MAX))
    } else {
        Reference::Named(head.to_string())
    };

    (reference, chain)
}
