//! Color tags: `{name|red}`, `{n|bright_green}`, `{n|208}`, `{n|bold+red}`.
//!
//! A tag is one or more `+`-joined parts, each a color name, a `bright_`
//! color, a 0-255 palette index, or a text attribute. Names are
//! case-insensitive. A tag with any unknown part is ignored and the text
//! passes through unstyled.

use console::{Color, Style};

/// Builds the style for a color tag, or `None` if any part is unknown.
pub fn style_for(tag: &str) -> Option<Style> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }
    tag.split('+')
        .try_fold(Style::new().force_styling(true), |style, part| {
            apply_part(style, part.trim())
        })
}

fn apply_part(style: Style, part: &str) -> Option<Style> {
    if let Ok(index) = part.parse::<u8>() {
        return Some(style.fg(Color::Color256(index)));
    }
    if let Some(base) = part.strip_prefix("bright_") {
        return bright_index(base).map(|index| style.fg(Color::Color256(index)));
    }
    let style = match part {
        "bold" => style.bold(),
        "dim" => style.dim(),
        "italic" => style.italic(),
        "underline" => style.underlined(),
        _ => style.fg(named_color(part)?),
    };
    Some(style)
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

/// Bright variants map onto palette indexes 8-15.
fn bright_index(base: &str) -> Option<u8> {
    let index = match base {
        "black" => 8,
        "red" => 9,
        "green" => 10,
        "yellow" => 11,
        "blue" => 12,
        "magenta" => 13,
        "cyan" => 14,
        "white" => 15,
        _ => return None,
    };
    Some(index)
}

/// Wraps `text` in the escape codes for `tag`. Unknown tags return the text
/// unchanged.
pub fn paint(text: String, tag: &str) -> String {
    match style_for(tag) {
        Some(style) => style.apply_to(text).to_string(),
        None => {
            tracing::trace!(tag, "unknown color tag");
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_color() {
        assert_eq!(paint("hi".into(), "red"), "\x1b[31mhi\x1b[0m");
        assert_eq!(paint("hi".into(), "GREEN"), "\x1b[32mhi\x1b[0m");
    }

    #[test]
    fn test_attribute() {
        assert_eq!(paint("hi".into(), "bold"), "\x1b[1mhi\x1b[0m");
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        assert_eq!(paint("hi".into(), "nonexistent"), "hi");
        assert_eq!(paint("hi".into(), "bright_purple"), "hi");
        assert_eq!(paint("hi".into(), "red+sparkly"), "hi");
        assert_eq!(paint("hi".into(), "256"), "hi");
    }

    #[test]
    fn test_palette_and_bright() {
        let painted = paint("hi".into(), "208");
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("208"));
        assert!(painted.ends_with("hi\x1b[0m"));

        let painted = paint("hi".into(), "bright_red");
        assert!(painted.contains('9'));
        assert!(painted.ends_with("hi\x1b[0m"));
    }

    #[test]
    fn test_combined_parts() {
        let painted = paint("hi".into(), "bold+red");
        assert!(painted.contains("\x1b[1m"));
        assert!(painted.contains("\x1b[31m"));
        assert_eq!(console::strip_ansi_codes(&painted), "hi");
    }

    #[test]
    fn test_style_for() {
        assert!(style_for("cyan").is_some());
        assert!(style_for(" Underline ").is_some());
        assert!(style_for("").is_none());
        assert!(style_for("+").is_none());
    }
}
