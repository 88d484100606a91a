//! Numeric rendering: bases, signs, fixed, scientific and general notation.

use crate::parse::{FormatSpec, Sign};
#[cfg(test)]
use crate::parse::MAX_PRECISION;

/// Type tags that render a number as a float.
const FLOAT_TAGS: [&str; 7] = ["e", "E", "f", "F", "g", "G", "%"];

const DEFAULT_PRECISION: usize = 6;

/// Renders an integer given as sign and magnitude.
pub(crate) fn format_int(negative: bool, magnitude: u64, spec: &FormatSpec) -> String {
    if let Some(tag) = spec.ty().filter(|tag| FLOAT_TAGS.contains(tag)) {
        let value = magnitude as f64;
        let value = if negative { -value } else { value };
        return format_float_tagged(value, Some(tag), spec);
    }

    let (digits, prefix) = match spec.ty() {
        Some("b") => (format!("{:b}", magnitude), "0b"),
        Some("o") => (format!("{:o}", magnitude), "0o"),
        Some("x") => (format!("{:x}", magnitude), "0x"),
        Some("X") => (format!("{:X}", magnitude), "0X"),
        _ => (magnitude.to_string(), ""),
    };
    let prefix = if spec.alternate { prefix } else { "" };
    assemble(sign_text(negative, spec.sign), prefix, &digits, spec)
}

/// Renders a float. Integer type tags are ignored.
pub(crate) fn format_float(value: f64, spec: &FormatSpec) -> String {
    let tag = spec.ty().filter(|tag| FLOAT_TAGS.contains(tag));
    format_float_tagged(value, tag, spec)
}

fn format_float_tagged(value: f64, tag: Option<&str>, spec: &FormatSpec) -> String {
    let upper = tag.is_some_and(|t| t == "F" || t == "E" || t == "G");

    if value.is_nan() {
        return non_finite(if upper { "NAN" } else { "NaN" }, "", spec);
    }
    let negative = value.is_sign_negative();
    let sign = sign_text(negative, spec.sign);
    if value.is_infinite() {
        return non_finite(if upper { "INF" } else { "inf" }, sign, spec);
    }

    let magnitude = value.abs();
    let given = spec.effective_precision();
    let precision = given.unwrap_or(DEFAULT_PRECISION);
    let body = match tag {
        Some("f" | "F") => format!("{:.*}", precision, magnitude),
        Some("e" | "E") => scientific(magnitude, precision, upper),
        Some("g" | "G") => general(magnitude, given, spec.alternate, upper),
        Some("%") => format!("{:.*}%", precision, magnitude * 100.0),
        _ => match given {
            Some(precision) => format!("{:.*}", precision, magnitude),
            None => magnitude.to_string(),
        },
    };
    assemble(sign, "", &body, spec)
}

/// `inf` and `NaN` never take zero padding; they are space-filled instead.
fn non_finite(text: &str, sign: &str, spec: &FormatSpec) -> String {
    let mut out = String::with_capacity(sign.len() + text.len());
    out.push_str(sign);
    out.push_str(text);
    if spec.sign_aware_zero_pad() {
        if let Some(width) = spec.effective_width() {
            let len = out.chars().count();
            if len < width {
                let mut padded = " ".repeat(width - len);
                padded.push_str(&out);
                return padded;
            }
        }
    }
    out
}

/// `1.234560e+03`: mantissa with `precision` digits, exponent of at least two
/// digits with an explicit sign.
fn scientific(magnitude: f64, precision: usize, upper: bool) -> String {
    let formatted = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = split_exponent(&formatted);
    join_exponent(mantissa, exponent, upper)
}

/// C-style `%g`: scientific when the exponent is below -4 or at least the
/// precision, fixed otherwise, with trailing zeros removed unless `#` is set.
fn general(magnitude: f64, precision: Option<usize>, alternate: bool, upper: bool) -> String {
    let significant = match precision.unwrap_or(DEFAULT_PRECISION) {
        0 => 1,
        p => p,
    };
    if magnitude == 0.0 {
        return if alternate {
            format!("{:.*}", significant - 1, 0.0)
        } else {
            "0".to_string()
        };
    }

    let estimate = format!("{:.*e}", significant - 1, magnitude);
    let (mantissa, exponent) = split_exponent(&estimate);

    if exponent < -4 || exponent >= significant as i32 {
        let mantissa = if alternate {
            mantissa
        } else {
            trim_fraction(mantissa)
        };
        join_exponent(mantissa, exponent, upper)
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, magnitude);
        if alternate {
            fixed
        } else {
            trim_fraction(&fixed).to_string()
        }
    }
}

fn split_exponent(formatted: &str) -> (&str, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

fn join_exponent(mantissa: &str, exponent: i32, upper: bool) -> String {
    format!(
        "{}{}{}{:02}",
        mantissa,
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

/// Drops trailing fractional zeros, and the point if nothing is left after it.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn sign_text(negative: bool, sign: Sign) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, Sign::Always) => "+",
        (false, Sign::Space) => " ",
        (false, Sign::Default) => "",
    }
}

/// Joins sign, base prefix and digits, inserting zeros between the prefix and
/// the digits when the spec asks for sign-aware zero padding.
fn assemble(sign: &str, prefix: &str, digits: &str, spec: &FormatSpec) -> String {
    let mut out = String::with_capacity(sign.len() + prefix.len() + digits.len());
    out.push_str(sign);
    out.push_str(prefix);
    if spec.sign_aware_zero_pad() {
        if let Some(width) = spec.effective_width() {
            let len = sign.len() + prefix.len() + digits.chars().count();
            for _ in len..width {
                out.push('0');
            }
        }
    }
    out.push_str(digits);
    out
}
