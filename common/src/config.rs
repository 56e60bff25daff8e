//! Display geometry, timing and capacity configuration.
//!
//! Compile-time constants carry `const` assertions so an inconsistent
//! configuration fails the build instead of misbehaving at runtime.
//! [`EngineConfig`] holds the values a product variant may pick at startup.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::WHITE;
use crate::fonts::{EditableFonts, HEADING_FONT, SCROLLABLE_FONT, char_height};
use crate::input::ButtonMap;
use crate::layout::Coord;

// =============================================================================
// Display
// =============================================================================

/// Display width in pixels (portrait panel).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Extra pixels between text lines.
pub const CHAR_V_SPACE: Coord = 1;

/// Padding added to every menu row.
pub const SCROLLABLE_VPAD: Coord = 4;

/// Width of the selection marker drawn at the right edge of a selected row.
pub const MARKER_WIDTH: Coord = 4;

// =============================================================================
// Timing (all intervals in milliseconds)
// =============================================================================

/// Period of the external tick driving [`crate::Engine::update_screen`].
pub const UPDATE_INTERVAL_MS: u32 = 100;

/// Half period of every blink animation.
pub const BLINK_INTERVAL_MS: u32 = 200;

/// Interval between graph samples.
pub const GRAPH_INTERVAL_MS: u32 = 1000;

const _: () = assert!(BLINK_INTERVAL_MS >= UPDATE_INTERVAL_MS);
const _: () = assert!(BLINK_INTERVAL_MS % UPDATE_INTERVAL_MS == 0);
// Graphs are revisited on blink ticks, so sampling must land on one
const _: () = assert!(GRAPH_INTERVAL_MS % BLINK_INTERVAL_MS == 0);

// =============================================================================
// Capacities
// =============================================================================

/// Maximum nesting of expanded menus.
pub const MAX_SCROLLABLE_DEPTH: usize = 3;

/// Upper bound on rows (heading included) an expanded menu lays out.
pub const MAX_SCROLLABLE_ROWS: usize = 16;

/// Maximum text length of a field (text buffers, formatted values).
pub const MAX_FIELD_LEN: usize = 32;

/// Samples kept per graph.
pub const GRAPH_MAX_POINTS: usize = 160;

const _: () = assert!(MAX_SCROLLABLE_DEPTH > 0);
const _: () = assert!(MAX_SCROLLABLE_ROWS >= 2);

// =============================================================================
// Runtime configuration
// =============================================================================

/// How many text rows an editable occupies inside a menu.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditableRows {
    /// Label and value share one row (wide screens).
    One,
    /// Value on a second row below the label.
    #[default]
    Two,
}

impl EditableRows {
    pub const fn count(self) -> Coord {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Engine configuration chosen by the product variant.
#[derive(Clone, Copy)]
pub struct EngineConfig {
    pub screen_width: Coord,
    pub screen_height: Coord,
    pub editable_rows: EditableRows,
    /// Clear an editable's whole cell before every redraw. Needed on tiny
    /// screens where text overlaps; flickers on panels without a framebuffer.
    pub blank_editables: bool,
    pub cursor_color: Rgb565,
    pub buttons: ButtonMap,
    /// Editable fonts for screens that do not declare their own.
    pub editable_fonts: EditableFonts,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        screen_width: SCREEN_WIDTH as Coord,
        screen_height: SCREEN_HEIGHT as Coord,
        editable_rows: EditableRows::Two,
        blank_editables: false,
        cursor_color: WHITE,
        buttons: ButtonMap::DEFAULT,
        editable_fonts: EditableFonts::DEFAULT,
    };

    /// Height of one data row in an expanded menu.
    pub const fn row_height(&self) -> Coord {
        self.editable_rows.count() * (char_height(SCROLLABLE_FONT) + CHAR_V_SPACE) + SCROLLABLE_VPAD
    }

    /// Height of the heading row of an expanded menu.
    pub const fn heading_height(&self) -> Coord {
        char_height(HEADING_FONT) + CHAR_V_SPACE + SCROLLABLE_VPAD
    }

    /// Rows (heading included) that fit on the screen.
    pub const fn rows_per_screen(&self) -> usize {
        let rows = (self.screen_height / self.row_height()) as usize;
        if rows > MAX_SCROLLABLE_ROWS {
            MAX_SCROLLABLE_ROWS
        } else if rows < 2 {
            2
        } else {
            rows
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_screen_within_capacity() {
        let config = EngineConfig::DEFAULT;
        let rows = config.rows_per_screen();
        assert!(rows >= 2);
        assert!(rows <= MAX_SCROLLABLE_ROWS);
        assert!(rows as Coord * config.row_height() <= config.screen_height);
    }

    #[test]
    fn test_single_row_editables_fit_more_rows() {
        let two = EngineConfig::DEFAULT;
        let one = EngineConfig {
            editable_rows: EditableRows::One,
            ..EngineConfig::DEFAULT
        };
        assert!(one.row_height() < two.row_height());
        assert!(one.rows_per_screen() >= two.rows_per_screen());
    }
}
