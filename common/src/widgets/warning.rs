//! Status line showing the highest priority warning.

use core::cell::{Cell, RefCell};
use core::fmt::Write;

use crate::draw::DrawingPort;
use crate::field::{CustomRender, Field, FieldText};
use crate::layout::{Area, ColorMode};
use crate::widgets::draw_text_box;

/// Custom renderer for a one-line status message.
///
/// The owning field blinks while the severity is [`ColorMode::Error`].
pub struct WarningText {
    text: RefCell<FieldText>,
    color: Cell<ColorMode>,
}

impl WarningText {
    pub const fn new() -> Self {
        Self {
            text: RefCell::new(FieldText::new()),
            color: Cell::new(ColorMode::Normal),
        }
    }

    /// Show `text` with the given severity. `field` is the custom field this
    /// renderer backs; it is marked dirty only when something changed.
    pub fn show(
        &self,
        field: &Field<'_>,
        color: ColorMode,
        text: &str,
    ) {
        let mut next = FieldText::new();
        for c in text.chars() {
            if next.push(c).is_err() {
                break;
            }
        }
        self.update(field, color, next);
    }

    /// Show a drivetrain fault code.
    pub fn show_fault(
        &self,
        field: &Field<'_>,
        code: u8,
    ) {
        let mut next = FieldText::new();
        write!(next, "Error {code}").ok();
        self.update(field, ColorMode::Error, next);
    }

    pub fn clear(
        &self,
        field: &Field<'_>,
    ) {
        self.update(field, ColorMode::Normal, FieldText::new());
    }

    fn update(
        &self,
        field: &Field<'_>,
        color: ColorMode,
        next: FieldText,
    ) {
        field.set_blink(color == ColorMode::Error);
        if self.color.get() == color && *self.text.borrow() == next {
            return;
        }
        self.color.set(color);
        *self.text.borrow_mut() = next;
        field.mark_dirty();
    }
}

impl Default for WarningText {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomRender for WarningText {
    fn render(
        &self,
        port: &mut dyn DrawingPort,
        area: &Area,
        blink_on: bool,
    ) -> bool {
        let color = match self.color.get() {
            ColorMode::Error if !blink_on => ColorMode::Normal,
            color => color,
        };
        draw_text_box(port, &area.with_color(color), &self.text.borrow());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::SMALL_FONT;
    use crate::layout::{Border, Modifier};
    use crate::testing::RecordingPort;

    #[test]
    fn test_same_text_does_not_dirty() {
        let warning = WarningText::new();
        let field = Field::custom(&warning);
        warning.show(&field, ColorMode::Warning, "BRAKE");
        field.clear_dirty();

        warning.show(&field, ColorMode::Warning, "BRAKE");
        assert!(!field.is_dirty());

        warning.show(&field, ColorMode::Error, "BRAKE");
        assert!(field.is_dirty());
        assert!(field.is_blinking());
    }

    #[test]
    fn test_fault_code_is_formatted() {
        let warning = WarningText::new();
        let field = Field::custom(&warning);
        warning.show_fault(&field, 7);

        let area = Area {
            x: 0,
            y: 0,
            width: 100,
            height: 12,
            font: Some(SMALL_FONT),
            color: ColorMode::Normal,
            border: Border::empty(),
            modifier: Modifier::None,
        };
        let mut port = RecordingPort::new();
        assert!(warning.render(&mut port, &area, true));
        assert!(port.has_text("Error 7"));

        warning.clear(&field);
        assert!(!field.is_blinking());
    }
}
