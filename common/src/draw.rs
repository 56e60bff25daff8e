//! Primitive drawing port.
//!
//! The engine draws through [`DrawingPort`] only: rectangles, lines and
//! strings with a selected font and colors. [`Canvas`] adapts any
//! embedded-graphics `DrawTarget<Color = Rgb565>` (panel driver, simulator
//! framebuffer) to it.

use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::colors::{BLACK, WHITE};
use crate::fonts::{Font, SMALL_FONT};
use crate::layout::Coord;

/// Primitive operations the engine needs from a display.
pub trait DrawingPort {
    /// Fill a rectangle. Empty or negative sizes draw nothing.
    fn fill_rect(
        &mut self,
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
        color: Rgb565,
    );

    /// Draw a one pixel line between two inclusive end points.
    fn draw_line(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Rgb565,
    );

    fn select_font(
        &mut self,
        font: Font,
    );

    fn set_foreground(
        &mut self,
        color: Rgb565,
    );

    /// `None` draws glyphs with a transparent background.
    fn set_background(
        &mut self,
        color: Option<Rgb565>,
    );

    /// Draw `text` with its top-left corner at (x, y).
    fn put_string(
        &mut self,
        x: Coord,
        y: Coord,
        text: &str,
    );

    /// Push the frame to hardware. Called only when something was drawn.
    fn flush(&mut self);
}

/// [`DrawingPort`] over an embedded-graphics draw target.
///
/// Targets that need an explicit present step (SPI framebuffers, the
/// simulator window) check [`Canvas::take_flush`] after the tick.
pub struct Canvas<'d, D> {
    target: &'d mut D,
    font: Font,
    foreground: Rgb565,
    background: Option<Rgb565>,
    flush_pending: bool,
}

impl<'d, D> Canvas<'d, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'d mut D) -> Self {
        Self {
            target,
            font: SMALL_FONT,
            foreground: WHITE,
            background: Some(BLACK),
            flush_pending: false,
        }
    }

    /// Returns true once after every [`DrawingPort::flush`] request.
    pub fn take_flush(&mut self) -> bool {
        core::mem::replace(&mut self.flush_pending, false)
    }
}

impl<D> DrawingPort for Canvas<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_rect(
        &mut self,
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
        color: Rgb565,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        Rectangle::new(Point::new(x, y), Size::new(width as u32, height as u32))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut *self.target)
            .ok();
    }

    fn draw_line(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Rgb565,
    ) {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut *self.target)
            .ok();
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
        color: Option<Rgb565>,
    ) {
        self.background = color;
    }

    fn put_string(
        &mut self,
        x: Coord,
        y: Coord,
        text: &str,
    ) {
        let mut style = MonoTextStyleBuilder::new().font(self.font).text_color(self.foreground);
        if let Some(background) = self.background {
            style = style.background_color(background);
        }
        Text::with_baseline(text, Point::new(x, y), style.build(), Baseline::Top)
            .draw(&mut *self.target)
            .ok();
    }

    fn flush(&mut self) {
        self.flush_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::colors::RED;

    #[test]
    fn test_fill_rect_paints_pixels() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        let mut canvas = Canvas::new(&mut display);
        canvas.fill_rect(1, 1, 2, 2, RED);
        drop(canvas);
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(2, 2)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(0, 0)), None);
    }

    #[test]
    fn test_empty_fill_draws_nothing() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        let mut canvas = Canvas::new(&mut display);
        canvas.fill_rect(1, 1, 0, 5, RED);
        canvas.fill_rect(1, 1, 5, -1, RED);
        drop(canvas);
        assert_eq!(display.get_pixel(Point::new(1, 1)), None);
    }

    #[test]
    fn test_flush_is_reported_once() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        let mut canvas = Canvas::new(&mut display);
        assert!(!canvas.take_flush());
        canvas.flush();
        assert!(canvas.take_flush());
        assert!(!canvas.take_flush());
    }
}
