//! Structural checks for format strings.
//!
//! The parser is lenient: an unclosed `{` or a stray `}` renders literally.
//! [`validate`] reports those same spots as errors so callers can reject
//! suspicious format strings up front.

use crate::error::{FormatError, FormatErrorKind};
use crate::parse::Closers;

/// Checks brace balance, honouring `{{`/`}}` escapes and braces inside
/// condition literals. Reports the first problem found.
///
/// ```rust
/// use fstr::{validate, FormatErrorKind};
///
/// assert!(validate("{{literal}} and {name:>5}").is_ok());
/// assert_eq!(validate("oops {").unwrap_err().kind, FormatErrorKind::UnclosedBrace);
/// assert_eq!(validate("a } b").unwrap_err().position, 2);
/// ```
pub fn validate(format: &str) -> Result<(), FormatError> {
    let bytes = format.as_bytes();
    let closers = Closers::new(format);
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'}' if bytes.get(i + 1) == Some(&b'}') => i += 2,
            b'{' => match closers.closing(i) {
                Some(close) => i = close + 1,
                None => return Err(FormatError::new(FormatErrorKind::UnclosedBrace, i)),
            },
            b'}' => {
                return Err(FormatError::new(
                    FormatErrorKind::UnexpectedClosingBrace,
                    i,
                ))
            }
            _ => i += 1,
        }
    }
    Ok(())
}
