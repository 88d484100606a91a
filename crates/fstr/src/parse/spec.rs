//! The format-spec mini-language: `[[fill]align][sign][#][0][width][.precision][type]`.

/// Text alignment within the padded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `<`: pad on the right.
    Left,
    /// `>`: pad on the left.
    Right,
    /// `^`: pad both sides, extra fill on the right.
    Center,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        }
    }
}

/// Sign handling for non-negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    /// Only negative numbers carry a sign (also what `-` selects).
    #[default]
    Default,
    /// `+`: non-negative numbers get a leading `+`.
    Always,
    /// ` `: non-negative numbers get a leading space.
    Space,
}

/// Parsed formatting directives for one placeholder.
///
/// Fields record exactly what was written; the `effective_*` accessors
/// apply the defaults (space fill, right alignment) and the zero-pad
/// shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatSpec {
    /// Explicit fill character.
    pub fill: Option<char>,
    /// Explicit alignment.
    pub align: Option<Align>,
    pub sign: Sign,
    /// `0` flag.
    pub zero_pad: bool,
    /// `#` flag: base prefixes, debug pretty-printing.
    pub alternate: bool,
    /// Minimum display width.
    pub width: Option<usize>,
    /// Digits after the point for floats, maximum characters for strings.
    pub precision: Option<usize>,
    /// Type tag: a built-in letter or a verb name.
    pub ty: Option<String>,
}

impl FormatSpec {
    /// Parses a spec string. Never fails: unrecognised or malformed parts
    /// leave their fields unset, and whatever is left over is the type tag.
    ///
    /// ```rust
    /// use fstr::parse::{Align, FormatSpec, Sign};
    ///
    /// let spec = FormatSpec::parse("*^+#012.3x");
    /// assert_eq!(spec.fill, Some('*'));
    /// assert_eq!(spec.align, Some(Align::Center));
    /// assert_eq!(spec.sign, Sign::Always);
    /// assert!(spec.alternate && spec.zero_pad);
    /// assert_eq!((spec.width, spec.precision), (Some(12), Some(3)));
    /// assert_eq!(spec.ty.as_deref(), Some("x"));
    /// ```
    pub fn parse(spec: &str) -> Self {
        let mut fs = FormatSpec::default();
        let mut rest = spec;

        let mut chars = rest.chars();
        let first = chars.next();
        let second = chars.next();
        if let (Some(fill), Some(align)) = (first, second.and_then(Align::from_char)) {
            fs.fill = Some(fill);
            fs.align = Some(align);
            rest = &rest[fill.len_utf8() + 1..];
        } else if let Some(align) = first.and_then(Align::from_char) {
            fs.align = Some(align);
            rest = &rest[1..];
        }

        if let Some(sign) = rest.chars().next().and_then(|c| match c {
            '+' => Some(Sign::Always),
            ' ' => Some(Sign::Space),
            '-' => Some(Sign::Default),
            _ => None,
        }) {
            fs.sign = sign;
            rest = &rest[1..];
        }

        if let Some(after) = rest.strip_prefix('#') {
            fs.alternate = true;
            rest = after;
        }

        if let Some(after) = rest.strip_prefix('0') {
            fs.zero_pad = true;
            rest = after;
        }

        let (width, after) = take_number(rest, MAX_WIDTH);
        fs.width = width;
        rest = after;

        if let Some(after) = rest.strip_prefix('.') {
            let (precision, after) = take_number(after, MAX_PRECISION);
            fs.precision = precision;
            rest = after;
        }

        if !rest.is_empty() {
            fs.ty = Some(rest.to_string());
        }

        fs
    }

    /// The fill character in effect: explicit fill, else `0` when zero-padding,
    /// else a space.
    pub fn effective_fill(&self) -> char {
        match self.fill {
            Some(fill) => fill,
            None if self.zero_pad => '0',
            None => ' ',
        }
    }

    /// The alignment in effect. Right is the default for every value kind.
    pub fn effective_align(&self) -> Align {
        self.align.unwrap_or(Align::Right)
    }

    /// Returns `true` when zero padding should go between a number's sign or
    /// base prefix and its digits, i.e. `0` was given without an explicit
    /// fill or alignment.
    pub fn sign_aware_zero_pad(&self) -> bool {
        self.zero_pad && self.fill.is_none() && self.align.is_none()
    }

    /// The width, capped at [`MAX_WIDTH`] for specs built by hand.
    pub fn effective_width(&self) -> Option<usize> {
        self.width.map(|width| width.min(MAX_WIDTH))
    }

    /// The precision, capped at [`MAX_PRECISION`] for specs built by hand.
    pub fn effective_precision(&self) -> Option<usize> {
        self.precision.map(|precision| precision.min(MAX_PRECISION))
    }

    /// The type tag, if any.
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Copy of this spec without width, fill, alignment and zero padding;
    /// used for the elements of composite values.
    pub fn without_layout(&self) -> Self {
        Self {
            fill: None,
            align: None,
            zero_pad: false,
            width: None,
            ..self.clone()
        }
    }
}

/// Largest width honoured; larger widths are ignored.
pub const MAX_WIDTH: usize = 1_000_000;

/// Largest precision honoured; larger precisions are ignored.
pub const MAX_PRECISION: usize = u16::MAX as usize;

/// Consumes leading ASCII digits. Returns `None` for no digits or a number
/// above `max`, consuming the digits either way.
fn take_number(s: &str, max: usize) -> (Option<usize>, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return (None, s);
    }
    let number = s[..len].parse().ok().filter(|n| *n <= max);
    (number, &s[len..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_is_default() {
        assert_eq!(FormatSpec::parse(""), FormatSpec::default());
    }

    #[test]
    fn test_alignment_only() {
        let spec = FormatSpec::parse("<10");
        assert_eq!(spec.align, Some(Align::Left));
        assert_eq!(spec.fill, None);
        assert_eq!(spec.width, Some(10));
    }

    #[test]
    fn test_fill_and_alignment() {
        let spec = FormatSpec::parse("0>5");
        assert_eq!(spec.fill, Some('0'));
        assert_eq!(spec.align, Some(Align::Right));
        assert!(!spec.zero_pad);
        assert_eq!(spec.width, Some(5));
    }

    #[test]
    fn test_multibyte_fill() {
        let spec = FormatSpec::parse("🦀>5");
        assert_eq!(spec.fill, Some('🦀'));
        assert_eq!(spec.width, Some(5));
    }

    #[test]
    fn test_alignment_char_as_fill() {
        let spec = FormatSpec::parse("<<4");
        assert_eq!(spec.fill, Some('<'));
        assert_eq!(spec.align, Some(Align::Left));
        assert_eq!(spec.width, Some(4));
    }

    #[test]
    fn test_sign_modes() {
        assert_eq!(FormatSpec::parse("+").sign, Sign::Always);
        assert_eq!(FormatSpec::parse(" 5").sign, Sign::Space);
        assert_eq!(FormatSpec::parse("-5").sign, Sign::Default);
        assert_eq!(FormatSpec::parse("5").sign, Sign::Default);
    }

    #[test]
    fn test_zero_pad_shorthand() {
        let spec = FormatSpec::parse("+05");
        assert!(spec.zero_pad);
        assert_eq!(spec.width, Some(5));
        assert_eq!(spec.effective_fill(), '0');
        assert_eq!(spec.effective_align(), Align::Right);
        assert!(spec.sign_aware_zero_pad());

        let spec = FormatSpec::parse("<05");
        assert_eq!(spec.effective_fill(), '0');
        assert_eq!(spec.effective_align(), Align::Left);
        assert!(!spec.sign_aware_zero_pad());
    }

    #[test]
    fn test_precision() {
        let spec = FormatSpec::parse(".2");
        assert_eq!(spec.width, None);
        assert_eq!(spec.precision, Some(2));
        assert_eq!(spec.ty, None);

        let spec = FormatSpec::parse("8.3f");
        assert_eq!(spec.width, Some(8));
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.ty(), Some("f"));
    }

    #[test]
    fn test_malformed_numbers_are_ignored() {
        let spec = FormatSpec::parse(".abc");
        assert_eq!(spec.precision, None);
        assert_eq!(spec.ty(), Some("abc"));

        let spec = FormatSpec::parse("99999999999999999999999");
        assert_eq!(spec.width, None);
        assert_eq!(spec.ty, None);
    }

    #[test]
    fn test_out_of_range_width_and_precision_are_ignored() {
        let spec = FormatSpec::parse("18446744073709551615.18446744073709551615f");
        assert_eq!((spec.width, spec.precision), (None, None));
        assert_eq!(spec.ty(), Some("f"));

        let spec = FormatSpec::parse("1000001.65536");
        assert_eq!((spec.width, spec.precision), (None, None));

        let spec = FormatSpec::parse("1000000.65535");
        assert_eq!(spec.width, Some(MAX_WIDTH));
        assert_eq!(spec.precision, Some(MAX_PRECISION));
    }

    #[test]
    fn test_unknown_leading_char_becomes_type() {
        let spec = FormatSpec::parse("@10");
        assert_eq!(spec.align, None);
        assert_eq!(spec.width, None);
        assert_eq!(spec.ty(), Some("@10"));
    }

    #[test]
    fn test_verb_names() {
        assert_eq!(FormatSpec::parse("upper").ty(), Some("upper"));
        assert_eq!(FormatSpec::parse(">12json").ty(), Some("json"));
    }

    #[test]
    fn test_without_layout_keeps_type_and_precision() {
        let spec = FormatSpec::parse("*^+#012.3x").without_layout();
        assert_eq!(spec.width, None);
        assert_eq!(spec.fill, None);
        assert_eq!(spec.align, None);
        assert!(!spec.zero_pad);
        assert_eq!(spec.sign, Sign::Always);
        assert!(spec.alternate);
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.ty(), Some("x"));
    }
}
