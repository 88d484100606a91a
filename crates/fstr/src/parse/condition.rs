//! Conditional placeholders: `predicate?(when true):(when false)`.
//!
//! The predicate is evaluated against the raw resolved value, and exactly one
//! of the two literals is rendered in place of the value. The `?` between the
//! predicate and the first literal is optional, so `{n?>5(many):(few)}` and
//! `{n?>5?(many):(few)}` are the same.
//!
//! | Predicate | True when |
//! |-----------|-----------|
//! | `empty` / `nonempty` (`!empty`) | [`Value::is_empty`] |
//! | `zero` / `nonzero` (`!zero`) | value is numeric zero |
//! | `true` / `false` | [`Value::is_truthy`] |
//! | `== != > >= < <=` + literal | comparison against the literal |

use std::cmp::Ordering;

use super::match_parens;
use crate::value::{Number, Value};

static NIL: Value = Value::Nil;

/// Comparison operator of a [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Operators by their textual form; two-character forms first so that
    /// `>=` is not read as `>` followed by `=`.
    const TOKENS: [(&'static str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">=", CompareOp::Gte),
        ("<=", CompareOp::Lte),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    /// Evaluates the operator given an ordering of value against literal.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// Returns `true` for `==` and `!=`, the only operators valid on booleans.
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named test on a resolved value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Empty,
    NonEmpty,
    Zero,
    NonZero,
    Truthy,
    Falsy,
    /// Comparison against a literal operand.
    Compare(CompareOp, String),
}

impl Predicate {
    /// Parses a predicate name or comparison.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let predicate = match text {
            "empty" => Predicate::Empty,
            "nonempty" | "!empty" => Predicate::NonEmpty,
            "zero" => Predicate::Zero,
            "nonzero" | "!zero" => Predicate::NonZero,
            "true" => Predicate::Truthy,
            "false" => Predicate::Falsy,
            _ => {
                let (op, operand) = CompareOp::TOKENS.iter().find_map(|(token, op)| {
                    text.strip_prefix(token).map(|operand| (*op, operand))
                })?;
                Predicate::Compare(op, operand.trim().to_string())
            }
        };
        Some(predicate)
    }

    /// Evaluates the predicate. `None` stands for a value that could not be
    /// resolved and behaves like nil.
    pub fn eval(&self, value: Option<&Value>) -> bool {
        let value = value.map_or(&NIL, Value::peel);
        match self {
            Predicate::Empty => value.is_empty(),
            Predicate::NonEmpty => !value.is_empty(),
            Predicate::Zero => is_zero(value),
            Predicate::NonZero => !is_zero(value),
            Predicate::Truthy => value.is_truthy(),
            Predicate::Falsy => !value.is_truthy(),
            Predicate::Compare(op, operand) => compare(value, *op, operand),
        }
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_number().is_some_and(Number::is_zero)
}

/// Compares a value against a literal operand. Values with no meaningful
/// comparison against the operand never match.
fn compare(value: &Value, op: CompareOp, operand: &str) -> bool {
    match value {
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => {
            let ordering = value
                .as_number()
                .zip(Number::parse(operand))
                .and_then(|(lhs, rhs)| lhs.compare(rhs));
            ordering.is_some_and(|ordering| op.eval_ordering(ordering))
        }
        Value::Str(s) => op.eval_ordering(s.as_str().cmp(operand)),
        Value::Bool(b) if op.is_equality() => operand
            .parse::<bool>()
            .is_ok_and(|rhs| op.eval_ordering(b.cmp(&rhs))),
        _ => false,
    }
}

/// A parsed conditional: the predicate plus both branch literals.
///
/// Branch literals are kept verbatim (with the delimiting parentheses
/// removed) and are themselves format strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub predicate: Predicate,
    pub when_true: String,
    pub when_false: String,
}

impl Condition {
    /// Parses the text following the `?` that introduces a condition.
    ///
    /// Returns `None` unless the whole text is a well-formed
    /// `predicate[?](true):(false)`.
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_at(text, 0, &match_parens(text))
    }

    /// Parses `source[start..]` as a condition, with the parentheses of
    /// `source` already matched by [`match_parens`].
    pub(crate) fn parse_at(source: &str, start: usize, matching: &[Option<usize>]) -> Option<Self> {
        let predicate_end = start + source[start..].find(&['?', '('][..])?;
        let predicate = Predicate::parse(&source[start..predicate_end])?;

        let mut pos = predicate_end;
        if source.as_bytes()[pos] == b'?' {
            pos += 1;
        }
        let (when_true, after) = parenthesized(source, skip_whitespace(source, pos), matching)?;
        let pos = skip_whitespace(source, after);
        if source.as_bytes().get(pos) != Some(&b':') {
            return None;
        }
        let pos = skip_whitespace(source, pos + 1);
        let (when_false, after) = parenthesized(source, pos, matching)?;
        if !source[after..].trim().is_empty() {
            return None;
        }

        Some(Self {
            predicate,
            when_true: when_true.to_string(),
            when_false: when_false.to_string(),
        })
    }

    /// Picks the branch literal for a value.
    pub fn select(&self, value: Option<&Value>) -> &str {
        if self.predicate.eval(value) {
            &self.when_true
        } else {
            &self.when_false
        }
    }
}

/// The content of the parenthesised group opening at `pos`, and the offset
/// just past its closing `)`.
fn parenthesized<'s>(
    source: &'s str,
    pos: usize,
    matching: &[Option<usize>],
) -> Option<(&'s str, usize)> {
    if source.as_bytes().get(pos) != Some(&b'(') {
        return None;
    }
    let close = matching[pos]?;
    Some((&source[pos + 1..close], close + 1))
}

fn skip_whitespace(source: &str, pos: usize) -> usize {
    let rest = &source[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    #[test]
    fn test_parse_named_predicates() {
        assert_eq!(Predicate::parse("empty"), Some(Predicate::Empty));
        assert_eq!(Predicate::parse("!empty"), Some(Predicate::NonEmpty));
        assert_eq!(Predicate::parse("nonzero"), Some(Predicate::NonZero));
        assert_eq!(Predicate::parse(" true "), Some(Predicate::Truthy));
        assert_eq!(Predicate::parse("bogus"), None);
        assert_eq!(Predicate::parse(""), None);
    }

    #[test]
    fn test_parse_comparisons() {
        assert_eq!(
            Predicate::parse(">=10"),
            Some(Predicate::Compare(CompareOp::Gte, "10".into()))
        );
        assert_eq!(
            Predicate::parse("== admin"),
            Some(Predicate::Compare(CompareOp::Eq, "admin".into()))
        );
        assert_eq!(
            Predicate::parse("<0"),
            Some(Predicate::Compare(CompareOp::Lt, "0".into()))
        );
    }

    #[test]
    fn test_parse_condition() {
        let condition = Condition::parse("empty?(none):(some)").unwrap();
        assert_eq!(condition.predicate, Predicate::Empty);
        assert_eq!(condition.when_true, "none");
        assert_eq!(condition.when_false, "some");

        let condition = Condition::parse(">5(many):(few)").unwrap();
        assert_eq!(
            condition.predicate,
            Predicate::Compare(CompareOp::Gt, "5".into())
        );
    }

    #[test]
    fn test_parse_condition_nested_parentheses() {
        let condition = Condition::parse("nonempty?(f(x)):((none))").unwrap();
        assert_eq!(condition.when_true, "f(x)");
        assert_eq!(condition.when_false, "(none)");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Condition::parse("").is_none());
        assert!(Condition::parse("empty").is_none());
        assert!(Condition::parse("empty?(a)").is_none());
        assert!(Condition::parse("empty?(a):b").is_none());
        assert!(Condition::parse("empty?(a):(b) trailing").is_none());
        assert!(Condition::parse("unknown?(a):(b)").is_none());
    }

    #[test]
    fn test_empty_predicates() {
        assert!(Predicate::Empty.eval(Some(&Value::Seq(vec![]))));
        assert!(Predicate::Empty.eval(Some(&Value::from(""))));
        assert!(Predicate::Empty.eval(None));
        assert!(!Predicate::Empty.eval(Some(&Value::from("x"))));
        assert!(Predicate::NonEmpty.eval(Some(&Value::seq([1]))));
    }

    #[test]
    fn test_zero_predicates() {
        assert!(Predicate::Zero.eval(Some(&Value::Int(0))));
        assert!(Predicate::Zero.eval(Some(&Value::Float(0.0))));
        assert!(!Predicate::Zero.eval(Some(&Value::from(""))));
        assert!(Predicate::NonZero.eval(Some(&Value::Uint(3))));
    }

    #[test]
    fn test_truthiness_predicates() {
        assert!(Predicate::Truthy.eval(Some(&Value::Bool(true))));
        assert!(Predicate::Falsy.eval(Some(&Value::Bool(false))));
        assert!(Predicate::Truthy.eval(Some(&Value::from(Record::new("R")))));
        assert!(Predicate::Falsy.eval(None));
    }

    #[test]
    fn test_numeric_comparisons() {
        let gt = Predicate::parse(">5").unwrap();
        assert!(gt.eval(Some(&Value::Int(6))));
        assert!(!gt.eval(Some(&Value::Int(5))));
        assert!(gt.eval(Some(&Value::Float(5.5))));
        assert!(gt.eval(Some(&Value::from("6"))));

        let eq = Predicate::parse("==2.5").unwrap();
        assert!(eq.eval(Some(&Value::Float(2.5))));
        assert!(!Predicate::parse(">x").unwrap().eval(Some(&Value::Int(1))));
    }

    #[test]
    fn test_string_and_bool_comparisons() {
        let eq = Predicate::parse("==admin").unwrap();
        assert!(eq.eval(Some(&Value::from("admin"))));
        assert!(!eq.eval(Some(&Value::from("guest"))));
        assert!(Predicate::parse("<b").unwrap().eval(Some(&Value::from("a"))));

        assert!(Predicate::parse("==true")
            .unwrap()
            .eval(Some(&Value::Bool(true))));
        assert!(Predicate::parse("!=true")
            .unwrap()
            .eval(Some(&Value::Bool(false))));
        assert!(!Predicate::parse(">false")
            .unwrap()
            .eval(Some(&Value::Bool(true))));
    }

    #[test]
    fn test_select_branch() {
        let condition = Condition::parse("empty?(yes):(no)").unwrap();
        assert_eq!(condition.select(Some(&Value::from(""))), "yes");
        assert_eq!(condition.select(Some(&Value::from("x"))), "no");
    }

    #[test]
    fn test_compare_looks_through_named_wrappers() {
        let value = Value::named("Score", 10);
        assert!(Predicate::parse(">=10").unwrap().eval(Some(&value)));
    }
}
