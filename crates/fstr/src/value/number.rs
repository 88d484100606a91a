//! Numeric values with mixed-type comparison.

use std::cmp::Ordering;

/// Numeric value supporting all common numeric types.
///
/// Numbers keep their original representation to preserve precision.
/// Comparisons between different variants are exact for integers and fall
/// back to `f64` when a float is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` if the number equals zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::I64(n) => n == 0,
            Number::U64(n) => n == 0,
            Number::F64(n) => n == 0.0,
        }
    }

    /// Parses a literal, preferring integer representations.
    pub fn parse(literal: &str) -> Option<Number> {
        let literal = literal.trim();
        if let Ok(n) = literal.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = literal.parse::<u64>() {
            return Some(Number::U64(n));
        }
        literal.parse::<f64>().ok().map(Number::F64)
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    match u64::try_from(signed) {
        Ok(signed) => signed.cmp(&unsigned),
        Err(_) => Ordering::Less,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_integers() {
        assert_eq!(Number::parse("42"), Some(Number::I64(42)));
        assert_eq!(Number::parse(" -3 "), Some(Number::I64(-3)));
        assert_eq!(
            Number::parse("18446744073709551615"),
            Some(Number::U64(u64::MAX))
        );
        assert_eq!(Number::parse("2.5"), Some(Number::F64(2.5)));
        assert_eq!(Number::parse("abc"), None);
    }

    #[test]
    fn test_mixed_comparisons() {
        assert_eq!(
            Number::I64(-1).compare(Number::U64(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::I64(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::I64(3).compare(Number::F64(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Number::F64(f64::NAN).compare(Number::I64(1)), None);
    }

    #[test]
    fn test_is_zero() {
        assert!(Number::I64(0).is_zero());
        assert!(Number::F64(0.0).is_zero());
        assert!(!Number::U64(1).is_zero());
    }
}
