//! Layout records: where and how a field appears on screen.
//!
//! A [`Layout`] is a declarative, `const`-constructible placement. Some of its
//! geometry is deferred and resolved every render pass into an [`Area`]:
//!
//! - width/height [`FILL`] (0): extend to the screen edge
//! - negative width: a count of character cells in the layout font
//! - height [`AUTO_HEIGHT`] (-1): derived from the font (and the field kind)
//! - height below -1: a count of text lines
//! - negative y: stack below the lowest record so far, `-1` touching it,
//!   `-2` leaving one blank pixel row, and so on

use core::cell::Cell;

use bitflags::bitflags;
use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::{BLACK, HEADING_BACKGROUND, RED, WHITE, YELLOW};
use crate::field::Field;
use crate::fonts::Font;

/// Pixel coordinate.
pub type Coord = i32;

/// Width/height value meaning "to the screen edge".
pub const FILL: Coord = 0;

/// Height value meaning "derive from the font".
pub const AUTO_HEIGHT: Coord = -1;

// =============================================================================
// Styling
// =============================================================================

/// Color scheme of a layout record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    #[default]
    Normal,
    Inverted,
    Heading,
    /// Yellow text on black.
    Warning,
    /// Red text on black.
    Error,
}

impl ColorMode {
    pub const fn background(self) -> Rgb565 {
        match self {
            Self::Inverted => WHITE,
            Self::Heading => HEADING_BACKGROUND,
            Self::Normal | Self::Warning | Self::Error => BLACK,
        }
    }

    pub const fn foreground(self) -> Rgb565 {
        match self {
            Self::Inverted => BLACK,
            Self::Warning => YELLOW,
            Self::Error => RED,
            Self::Normal | Self::Heading => WHITE,
        }
    }
}

bitflags! {
    /// Border lines drawn around a record after its content.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Border: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        /// Makes the bottom border a few pixels thick.
        const FAT = 1 << 4;
        const BOX = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Border {
    fn format(
        &self,
        f: defmt::Formatter,
    ) {
        defmt::write!(f, "Border({=u8:#x})", self.bits());
    }
}

/// How an editable places its label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modifier {
    /// Label top-left, value right-aligned.
    #[default]
    None,
    /// Value only, centered, with units in the bottom-right corner.
    NoLabel,
    /// Label centered above the value.
    LabelOnTop,
}

// =============================================================================
// Layout Record
// =============================================================================

/// Placement of one field on screen.
pub struct Layout<'a> {
    pub(crate) x: Coord,
    pub(crate) y: Coord,
    pub(crate) width: Coord,
    pub(crate) height: Coord,
    pub(crate) font: Option<Font>,
    pub(crate) color: ColorMode,
    pub(crate) border: Border,
    pub(crate) modifier: Modifier,
    pub(crate) field: &'a Field<'a>,
    /// Last numeric value drawn (editables only).
    pub(crate) prev_value: Cell<i64>,
    /// Whether labels were forced over the value on the last draw.
    pub(crate) prev_force_labels: Cell<bool>,
}

impl<'a> Layout<'a> {
    /// Full-screen record at the origin.
    pub const fn new(field: &'a Field<'a>) -> Self {
        Self {
            x: 0,
            y: 0,
            width: FILL,
            height: FILL,
            font: None,
            color: ColorMode::Normal,
            border: Border::empty(),
            modifier: Modifier::None,
            field,
            prev_value: Cell::new(0),
            prev_force_labels: Cell::new(false),
        }
    }

    pub const fn at(
        mut self,
        x: Coord,
        y: Coord,
    ) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub const fn size(
        mut self,
        width: Coord,
        height: Coord,
    ) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub const fn font(
        mut self,
        font: Font,
    ) -> Self {
        self.font = Some(font);
        self
    }

    pub const fn color(
        mut self,
        color: ColorMode,
    ) -> Self {
        self.color = color;
        self
    }

    pub const fn border(
        mut self,
        border: Border,
    ) -> Self {
        self.border = border;
        self
    }

    pub const fn modifier(
        mut self,
        modifier: Modifier,
    ) -> Self {
        self.modifier = modifier;
        self
    }

    pub const fn field(&self) -> &'a Field<'a> {
        self.field
    }
}

// =============================================================================
// Resolved Area
// =============================================================================

/// A layout record with all deferred geometry resolved to pixels.
#[derive(Clone, Copy)]
pub struct Area {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub font: Option<Font>,
    pub color: ColorMode,
    pub border: Border,
    pub modifier: Modifier,
}

impl Area {
    /// One past the bottom row.
    pub const fn bottom(&self) -> Coord {
        self.y + self.height
    }

    /// One past the rightmost column.
    pub const fn right(&self) -> Coord {
        self.x + self.width
    }

    pub const fn with_color(
        mut self,
        color: ColorMode,
    ) -> Self {
        self.color = color;
        self
    }

    /// The layout font, which the caller requires to be set.
    pub fn require_font(&self) -> Font {
        match self.font {
            Some(font) => font,
            None => panic!("layout needs a font for text or character-sized geometry"),
        }
    }
}
