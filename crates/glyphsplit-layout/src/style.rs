//! Inline style values understood by the reference layout.
//!
//! Only the properties the split engine writes are interpreted: `display` and
//! `margin-left`. Anything unparsable falls back to the initial value.

use cssparser::{Parser, ParserInput, Token};
use glyphsplit_core::Element;

/// Elements that are block-level without an explicit `display`.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "figure", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "li", "main", "nav", "ol", "p", "section", "ul",
];

/// Outer display type of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// Flows its children into the surrounding line.
    Inline,
    /// Atomic box on the line; contents never wrap inside it.
    InlineBlock,
    /// Starts and ends its own lines.
    Block,
    /// Not laid out at all.
    None,
}

/// Resolve the display type of an element.
pub fn display(el: &Element) -> Display {
    if let Some(display) = el.style_property("display").and_then(parse_display) {
        return display;
    }
    if BLOCK_TAGS.contains(&el.tag()) {
        Display::Block
    } else {
        Display::Inline
    }
}

fn parse_display(value: &str) -> Option<Display> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    match parser.next().ok()? {
        Token::Ident(ident) => match ident.as_ref() {
            "inline" => Some(Display::Inline),
            "inline-block" => Some(Display::InlineBlock),
            "block" => Some(Display::Block),
            "none" => Some(Display::None),
            _ => None,
        },
        _ => None,
    }
}

/// Resolve `margin-left` in device-independent units.
pub fn margin_left(el: &Element, font_size: f32) -> f32 {
    el.style_property("margin-left")
        .and_then(|value| parse_length(value, font_size))
        .unwrap_or(0.0)
}

/// Parse a CSS length into device-independent units.
///
/// Supports `px`, `em`, `rem` (relative to `font_size`) and unitless zero.
pub fn parse_length(value: &str, font_size: f32) -> Option<f32> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let token = parser.next().ok()?.clone();

    #[allow(clippy::redundant_guards)] // CSS `0` is a length regardless of unit
    match token {
        Token::Number { value, .. } if value == 0.0 => Some(0.0),
        Token::Dimension { value, unit, .. } => {
            if unit.eq_ignore_ascii_case("px") {
                Some(value)
            } else if unit.eq_ignore_ascii_case("em") || unit.eq_ignore_ascii_case("rem") {
                Some(value * font_size)
            } else {
                None
            }
        }
        _ => None,
    }
}
