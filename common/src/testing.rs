//! Test doubles shared by the unit tests.

use embedded_graphics::pixelcolor::Rgb565;

use crate::draw::DrawingPort;
use crate::fonts::{Font, SMALL_FONT};
use crate::layout::Coord;

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Fill {
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        color: Rgb565,
    },
    Line {
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Rgb565,
    },
    Text {
        x: Coord,
        y: Coord,
        text: String,
        /// Glyph height of the selected font.
        font_height: u32,
        color: Rgb565,
    },
}

/// Drawing port that records operations instead of drawing.
pub struct RecordingPort {
    pub ops: Vec<Op>,
    pub flushes: usize,
    font: Font,
    foreground: Rgb565,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            flushes: 0,
            font: SMALL_FONT,
            foreground: Rgb565::new(0, 0, 0),
        }
    }

    /// Operations that touch pixels.
    pub fn draw_count(&self) -> usize {
        self.ops.len()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.flushes = 0;
    }

    pub fn texts(&self) -> Vec<(Coord, Coord, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(
        &self,
        needle: &str,
    ) -> bool {
        self.texts().iter().any(|(_, _, text)| *text == needle)
    }
}

impl DrawingPort for RecordingPort {
    fn fill_rect(
        &mut self,
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
        color: Rgb565,
    ) {
        if width > 0 && height > 0 {
            self.ops.push(Op::Fill {
                x,
                y,
                w: width,
                h: height,
                color,
            });
        }
    }

    fn draw_line(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Rgb565,
    ) {
        self.ops.push(Op::Line { x0, y0, x1, y1, color });
    }

    fn select_font(
        &mut self,
        font: Font,
    ) {
        self.font = font;
    }

    fn set_foreground(
        &mut self,
        color: Rgb565,
    ) {
        self.foreground = color;
    }

    fn set_background(
        &mut self,
        _color: Option<Rgb565>,
    ) {
    }

    fn put_string(
        &mut self,
        x: Coord,
        y: Coord,
        text: &str,
    ) {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.into(),
            font_height: self.font.character_size.height,
            color: self.foreground,
        });
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
