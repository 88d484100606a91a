//! Format string parsing.
//!
//! A format string is scanned once, left to right, into a [`Template`]: literal
//! segments interleaved with parsed [`Placeholder`]s.
//!
//! # Syntax
//!
//! - `{}` - next positional argument
//! - `{1}` - positional argument by index
//! - `{name}` / `{user.email}` - named argument, then a field chain
//! - `{0.Detail.City}` - positional argument, then a field chain
//! - `{:>10.2f}` - format spec after `:`
//! - `{name|red}` - color tag after `|`
//! - `{count?nonzero?(some):(none)}` - conditional after `?`
//! - `{{` and `}}` - escaped braces
//!
//! Malformed input never fails: an unclosed `{` is kept as literal text and a
//! stray `}` is a literal character.
//!
//! ```rust
//! use fstr::parse::{parse, Reference};
//!
//! let template = parse("Hi {name:>8|green}, {{ok}}");
//! assert_eq!(template.segments(), ["Hi ", ", {ok}"]);
//! assert_eq!(template.placeholders()[0].reference, Reference::Named("name".into()));
//! ```

mod condition;
mod placeholder;
mod spec;

pub use condition::{CompareOp, Condition, Predicate};
pub use placeholder::{Placeholder, Reference};
pub use spec::{Align, FormatSpec, Sign, MAX_PRECISION, MAX_WIDTH};

/// A parsed format string.
///
/// Always holds exactly one more segment than placeholders: `segments[i]`
/// precedes `placeholders[i]` and the last segment trails the final
/// placeholder (possibly empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<String>,
    placeholders: Vec<Placeholder>,
}

impl Template {
    /// Parses a format string. Equivalent to [`parse`].
    pub fn parse(format: &str) -> Self {
        parse(format)
    }

    /// Literal text segments with escapes resolved.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Parsed placeholders, in order of appearance.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns `true` when the template contains no placeholders.
    pub fn is_literal(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Sum of the literal segment lengths, used as an output size hint.
    pub fn literal_len(&self) -> usize {
        self.segments.iter().map(String::len).sum()
    }
}

/// Scans `format` into segments and placeholders.
pub fn parse(format: &str) -> Template {
    let bytes = format.as_bytes();
    let closers = Closers::new(format);
    let mut segments = Vec::new();
    let mut placeholders = Vec::new();
    let mut current = String::with_capacity(format.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                current.push_str(&format[run_start..i]);
                current.push('{');
                i += 2;
                run_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                current.push_str(&format[run_start..i]);
                current.push('}');
                i += 2;
                run_start = i;
            }
            b'{' => match closers.closing(i) {
                Some(close) => {
                    current.push_str(&format[run_start..i]);
                    segments.push(std::mem::take(&mut current));
                    let inner = &format[i + 1..close];
                    placeholders.push(Placeholder::parse(inner, &format[i..=close]));
                    i = close + 1;
                    run_start = i;
                }
                // Unclosed: the brace stays part of the literal run.
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    current.push_str(&format[run_start..]);
    segments.push(current);

    Template {
        segments,
        placeholders,
    }
}

/// Closing-brace lookups for one format string.
///
/// A placeholder closes at its first `}`, except that once a `?` has been
/// seen, braces inside parenthesised condition literals belong to the
/// literal. If those parentheses never balance, the first `}` wins.
///
/// Every answer comes from tables built in one backward pass, so scanning a
/// whole format string stays linear however many braces go unclosed.
pub(crate) struct Closers<'a> {
    bytes: &'a [u8],
    /// `next_close[i]`: first `}` at or after `i`.
    next_close: Vec<Option<usize>>,
    /// `next_stop[i]`: first `?` or `}` at or after `i`.
    next_stop: Vec<Option<usize>>,
    /// `condition_close[i]`: first `}` at or after `i` outside any balanced
    /// parentheses, or `None` when an unbalanced `(` comes first.
    condition_close: Vec<Option<usize>>,
}

impl<'a> Closers<'a> {
    pub(crate) fn new(format: &'a str) -> Self {
        let bytes = format.as_bytes();
        let n = bytes.len();
        let matching = match_parens(format);

        let mut next_close = vec![None; n + 1];
        let mut next_stop = vec![None; n + 1];
        let mut condition_close = vec![None; n + 1];
        for i in (0..n).rev() {
            next_close[i] = if bytes[i] == b'}' { Some(i) } else { next_close[i + 1] };
            next_stop[i] = match bytes[i] {
                b'}' | b'?' => Some(i),
                _ => next_stop[i + 1],
            };
            condition_close[i] = match bytes[i] {
                b'}' => Some(i),
                b'(' => matching[i].and_then(|end| condition_close[end + 1]),
                _ => condition_close[i + 1],
            };
        }

        Self {
            bytes,
            next_close,
            next_stop,
            condition_close,
        }
    }

    /// Byte offset of the `}` closing the placeholder opened at `open`.
    pub(crate) fn closing(&self, open: usize) -> Option<usize> {
        let start = open + 1;
        let stop = (*self.next_stop.get(start)?)?;
        if self.bytes[stop] == b'}' {
            return Some(stop);
        }
        self.condition_close[stop + 1].or(self.next_close[start])
    }
}

/// Pairs up parentheses: `matching[i]` is the offset of the `)` closing the
/// `(` at byte offset `i`, or `None` when that `(` is unbalanced.
pub(crate) fn match_parens(text: &str) -> Vec<Option<usize>> {
    let mut matching = vec![None; text.len()];
    let mut open = Vec::new();
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => open.push(i),
            b')' => {
                if let Some(start) = open.pop() {
                    matching[start] = Some(i);
                }
            }
            _ => {}
        }
    }
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(format: &str) -> Vec<String> {
        parse(format).segments().to_vec()
    }

    #[test]
    fn test_plain_text_is_single_segment() {
        let template = parse("no placeholders here");
        assert_eq!(template.segments(), ["no placeholders here"]);
        assert!(template.is_literal());
    }

    #[test]
    fn test_empty_format() {
        let template = parse("");
        assert_eq!(template.segments(), [""]);
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(segments("{{}}"), ["{}"]);
        assert_eq!(segments("a{{b}}c"), ["a{b}c"]);
        assert_eq!(segments("{{:10}} vs {:10}"), ["{:10} vs ", ""]);
    }

    #[test]
    fn test_segment_count_invariant() {
        for format in ["{}", "{}{}", "a{}b{}c", "{0} and {1}", "x", "{{}}{}"] {
            let template = parse(format);
            assert_eq!(
                template.segments().len(),
                template.placeholders().len() + 1,
                "format {:?}",
                format
            );
        }
    }

    #[test]
    fn test_trailing_segment_may_be_empty() {
        assert_eq!(segments("Hello {}"), ["Hello ", ""]);
        assert_eq!(segments("{}"), ["", ""]);
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        let template = parse("Hello {");
        assert_eq!(template.segments(), ["Hello {"]);
        assert!(template.is_literal());

        let template = parse("{ unclosed {{ here");
        assert_eq!(template.segments(), ["{ unclosed { here"]);
    }

    #[test]
    fn test_stray_closing_brace_is_literal() {
        assert_eq!(segments("Hello }"), ["Hello }"]);
        assert_eq!(segments("a } b {}"), ["a } b ", ""]);
    }

    #[test]
    fn test_first_closing_brace_wins() {
        let template = parse("{a}b}");
        assert_eq!(template.segments(), ["", "b}"]);
        assert_eq!(template.placeholders()[0].raw, "{a}");
    }

    #[test]
    fn test_condition_literals_may_hold_braces() {
        let template = parse("{0?nonempty?(Hi {name}):(nobody)}!");
        assert_eq!(template.placeholders().len(), 1);
        assert_eq!(template.segments(), ["", "!"]);
        let condition = template.placeholders()[0].condition.as_ref().unwrap();
        assert_eq!(condition.when_true, "Hi {name}");
        assert_eq!(condition.when_false, "nobody");
    }

    #[test]
    fn test_unbalanced_condition_falls_back_to_first_brace() {
        let template = parse("{x?(oops} tail");
        assert_eq!(template.placeholders()[0].raw, "{x?(oops}");
        assert_eq!(template.segments(), ["", " tail"]);
    }

    #[test]
    fn test_condition_close_skips_nested_parentheses() {
        let template = parse("{x?((a}) b):(c)} tail");
        assert_eq!(template.placeholders()[0].raw, "{x?((a}) b):(c)}");
        assert_eq!(template.segments(), ["", " tail"]);
    }

    #[test]
    fn test_parentheses_before_condition_are_plain() {
        let template = parse("{(a}?(b})");
        assert_eq!(template.placeholders()[0].raw, "{(a}");
    }

    #[test]
    fn test_stray_close_paren_in_condition_is_ignored() {
        let template = parse("{x?)(a}b)} c");
        assert_eq!(template.placeholders()[0].raw, "{x?)(a}b)}");
    }

    #[test]
    fn test_many_unclosed_braces_parse_quickly() {
        let started = std::time::Instant::now();
        let format = "{a".repeat(50_000);
        let template = parse(&format);
        assert!(template.is_literal());
        assert_eq!(template.segments(), [format.as_str()]);

        let template = parse(&"{x?(}".repeat(20_000));
        assert_eq!(template.placeholders().len(), 20_000);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_match_parens() {
        assert_eq!(match_parens("(a(b))("), [Some(5), None, Some(4), None, None, None, None]);
        assert_eq!(match_parens(")("), [None, None]);
    }

    #[test]
    fn test_many_failed_conditions_parse_quickly() {
        let started = std::time::Instant::now();
        let inner = "?empty(".repeat(30_000);
        let template = parse(&format!("{{x{}}}", inner));
        let placeholder = &template.placeholders()[0];
        assert!(placeholder.condition.is_none());
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_multibyte_literals() {
        let template = parse("héllo {} wörld 🦀");
        assert_eq!(template.segments(), ["héllo ", " wörld 🦀"]);
    }

    #[test]
    fn test_literal_len() {
        assert_eq!(parse("ab{}cd").literal_len(), 4);
    }
}
