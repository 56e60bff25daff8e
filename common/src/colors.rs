//! Color constants for the cluster display.
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Default background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Default foreground and cursor color.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Error text and graph segments above the error threshold.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure yellow. Warning text.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Orange used for graph segments between the warn and error thresholds.
/// RGB565: (31, 32, 0) - slightly darker than yellow.
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Dark gray for axis lines and separators.
/// RGB565: (8, 16, 8) - roughly 25% brightness.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Menu heading background.
/// RGB565: (4, 12, 14) - dark slate blue.
pub const HEADING_BACKGROUND: Rgb565 = Rgb565::new(4, 12, 14);

/// Muted teal for the normal part of graph columns.
pub const DARK_TEAL: Rgb565 = Rgb565::new(0, 40, 20);

// =============================================================================
// Graph Palette
// =============================================================================

pub const GRAPH_BACKGROUND: Rgb565 = BLACK;
pub const GRAPH_AXIS: Rgb565 = GRAY;
pub const GRAPH_ACCENT: Rgb565 = WHITE;
pub const GRAPH_NORMAL: Rgb565 = DARK_TEAL;
pub const GRAPH_WARN: Rgb565 = ORANGE;
pub const GRAPH_ERROR: Rgb565 = RED;
