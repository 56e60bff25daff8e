//! Font references and text metrics.
//!
//! Fonts are `&'static MonoFont` so layout tables can name them in `const`
//! context. All width math goes through [`char_width`] so that letter spacing
//! is accounted for the same way everywhere.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use profont::{PROFONT_12_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use crate::layout::Coord;

pub type Font = &'static MonoFont<'static>;

// =============================================================================
// Font References
// =============================================================================

/// Small text: editable labels, units, graph axis values.
pub const SMALL_FONT: Font = &FONT_6X10;

/// Regular text: menu rows and most values.
pub const REGULAR_FONT: Font = &PROFONT_12_POINT;

/// Menu headings.
pub const HEADING_FONT: Font = &PROFONT_18_POINT;

/// Big readouts (speed).
pub const BIG_FONT: Font = &PROFONT_24_POINT;

/// Rows inside an expanded menu.
pub const SCROLLABLE_FONT: Font = REGULAR_FONT;

/// Graph title row.
pub const GRAPH_LABEL_FONT: Font = SMALL_FONT;

/// Max/min values next to the graph axis.
pub const GRAPH_MAXVAL_FONT: Font = SMALL_FONT;

/// The fonts editables use when their layout does not name one.
#[derive(Clone, Copy)]
pub struct EditableFonts {
    pub label: Font,
    pub value: Font,
    pub units: Font,
}

impl EditableFonts {
    pub const DEFAULT: Self = Self {
        label: SMALL_FONT,
        value: REGULAR_FONT,
        units: SMALL_FONT,
    };

    /// Same font for label, value and units (menu screens).
    pub const fn uniform(font: Font) -> Self {
        Self {
            label: font,
            value: font,
            units: font,
        }
    }
}

impl Default for EditableFonts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Horizontal advance of one glyph, including letter spacing.
pub const fn char_width(font: Font) -> Coord {
    (font.character_size.width + font.character_spacing) as Coord
}

pub const fn char_height(font: Font) -> Coord {
    font.character_size.height as Coord
}

/// Rendered width of `text` in pixels.
pub fn text_width(
    font: Font,
    text: &str,
) -> Coord {
    text.chars().count() as Coord * char_width(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_font_metrics() {
        assert_eq!(char_width(SMALL_FONT), 6);
        assert_eq!(char_height(SMALL_FONT), 10);
    }

    #[test]
    fn test_text_width_counts_chars() {
        assert_eq!(text_width(SMALL_FONT, ""), 0);
        assert_eq!(text_width(SMALL_FONT, "12.5"), 24);
    }
}
