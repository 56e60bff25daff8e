//! Dirty-tracked rendering of layout records.
//!
//! A record is drawn when its field is dirty, when it blinks and the blink
//! phase just flipped, or when it is an editable (editables compare the live
//! value with what they drew last and skip the draw if nothing changed).
//! Dirty flags are cleared in a second pass so a field shown by several
//! records is drawn by all of them.

use crate::config::{CHAR_V_SPACE, EditableRows, MARKER_WIDTH};
use crate::draw::DrawingPort;
use crate::engine::Engine;
use crate::field::{Field, FieldKind};
use crate::fonts::{char_height, char_width, text_width};
use crate::layout::{AUTO_HEIGHT, Area, Coord, FILL, Layout, Modifier};
use crate::widgets::{
    draw_border,
    draw_mesh,
    draw_selection_marker,
    draw_text_box,
    put_string_centered,
    put_string_right,
};

impl<'a> Engine<'a> {
    /// Render the records up to the first end field. Returns whether
    /// anything was drawn.
    pub(crate) fn render_layouts(
        &mut self,
        port: &mut dyn DrawingPort,
        layouts: &[Layout<'a>],
        force: bool,
    ) -> bool {
        let records = || layouts.iter().take_while(|layout| !layout.field.is_end());
        if force {
            for layout in records() {
                layout.field.mark_dirty();
            }
        }

        let mut drew = false;
        let mut max_y: Coord = 0;
        for layout in records() {
            let area = self.resolve(layout, max_y);
            if self.needs_render(layout.field) {
                drew |= self.render_record(port, layout, &area, force);
            }
            max_y = max_y.max(area.bottom());
        }

        for layout in records() {
            layout.field.clear_dirty();
        }
        drew
    }

    fn needs_render(
        &self,
        field: &Field<'_>,
    ) -> bool {
        field.is_dirty() || (field.is_blinking() && self.clock.blink_changed()) || field.is_editable()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Resolve deferred geometry. `max_y` is the lowest bottom edge seen so
    /// far in this pass.
    fn resolve(
        &self,
        layout: &Layout<'_>,
        max_y: Coord,
    ) -> Area {
        let x = layout.x;
        let y = if layout.y < 0 { max_y - layout.y - 1 } else { layout.y };

        let width = match layout.width {
            FILL => self.config.screen_width - x,
            cells if cells < 0 => -cells * char_width(area_font(layout)),
            width => width,
        };
        let height = match layout.height {
            FILL => self.config.screen_height - y,
            AUTO_HEIGHT => self.auto_height(layout),
            lines if lines < AUTO_HEIGHT => -lines * (char_height(area_font(layout)) + CHAR_V_SPACE),
            height => height,
        };

        Area {
            x,
            y,
            width,
            height,
            font: layout.font,
            color: layout.color,
            border: layout.border,
            modifier: layout.modifier,
        }
    }

    fn auto_height(
        &self,
        layout: &Layout<'_>,
    ) -> Coord {
        if !layout.field.is_editable() {
            return char_height(area_font(layout));
        }
        let value = char_height(layout.font.unwrap_or(self.fonts.value));
        if self.label_on_own_row(layout.modifier) {
            value + char_height(self.fonts.label) + CHAR_V_SPACE
        } else {
            value
        }
    }

    fn label_on_own_row(
        &self,
        modifier: Modifier,
    ) -> bool {
        match modifier {
            Modifier::LabelOnTop => true,
            Modifier::NoLabel => false,
            Modifier::None => self.config.editable_rows == EditableRows::Two,
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn render_record(
        &mut self,
        port: &mut dyn DrawingPort,
        layout: &Layout<'a>,
        area: &Area,
        force: bool,
    ) -> bool {
        let drew = self.dispatch(port, layout, area, force);

        let marked = layout.field.is_selected() && (drew || self.clock.blink_changed());
        if marked {
            let color = if self.clock.blink_on() { self.config.cursor_color } else { area.color.background() };
            draw_selection_marker(port, area, MARKER_WIDTH, color);
        }
        if drew {
            draw_border(port, area);
        }
        drew || marked
    }

    fn dispatch(
        &mut self,
        port: &mut dyn DrawingPort,
        layout: &Layout<'a>,
        area: &Area,
        force: bool,
    ) -> bool {
        let field = layout.field;
        match field.kind() {
            FieldKind::DrawText(text) => {
                draw_text_box(port, area, &text.borrow());
                true
            }
            FieldKind::DrawTextRef(text) => {
                draw_text_box(port, area, text);
                true
            }
            FieldKind::Fill => {
                port.fill_rect(area.x, area.y, area.width, area.height, area.color.foreground());
                true
            }
            FieldKind::Mesh => {
                draw_mesh(port, area);
                true
            }
            FieldKind::Scrollable(_) => self.render_scrollable(port, field, area, force),
            FieldKind::Editable(_) => self.render_editable(port, layout, area),
            FieldKind::Custom(renderer) => renderer.render(port, area, self.clock.blink_on()),
            FieldKind::Graph(graph) => graph.render(port, field, area, self.clock.graph_sample_due()),
            FieldKind::End => panic!("render dispatched on the end field"),
        }
    }

    // =========================================================================
    // Menus
    // =========================================================================

    /// The root menu slot shows the deepest expanded menu; any other
    /// scrollable is a collapsed row showing its label.
    fn render_scrollable(
        &mut self,
        port: &mut dyn DrawingPort,
        field: &'a Field<'a>,
        area: &Area,
        force: bool,
    ) -> bool {
        if !self.navigator.is_active() {
            self.navigator.enter(field);
        }
        if !self.navigator.is_root(field) {
            let font = area.require_font();
            port.fill_rect(area.x, area.y, area.width, area.height, area.color.background());
            port.select_font(font);
            port.set_foreground(area.color.foreground());
            port.set_background(Some(area.color.background()));
            let y = area.y + (area.height - char_height(font)).max(0) / 2;
            port.put_string(area.x + 2, y, field.expect_scrollable().label);
            return true;
        }

        let rebuild = self.navigator.take_relayout() || force;
        let mut drew = false;
        if rebuild {
            let frame = self.navigator.rebuild_rows(area, &self.config);
            let label = self.navigator.current().map_or("", |menu| menu.expect_scrollable().label);
            draw_text_box(port, &frame.heading, label);
            draw_border(port, &frame.heading);
            port.fill_rect(
                frame.blank.x,
                frame.blank.y,
                frame.blank.width,
                frame.blank.height,
                frame.blank.color.foreground(),
            );
            drew = true;
        }

        let rows = core::mem::take(&mut self.navigator.rows);
        drew |= self.render_layouts(port, &rows, rebuild);
        self.navigator.rows = rows;
        drew
    }

    // =========================================================================
    // Editables
    // =========================================================================

    fn render_editable(
        &mut self,
        port: &mut dyn DrawingPort,
        layout: &Layout<'a>,
        area: &Area,
    ) -> bool {
        let field = layout.field;
        let editable = field.expect_editable();
        let editing = self.editor.is_editing_field(field);
        let force_labels = self.levels.onoff && !self.editor.is_editing() && area.modifier == Modifier::NoLabel;

        let value = editable.value();
        let previous = layout.prev_value.get();
        let labels_changed = layout.prev_force_labels.get() != force_labels;
        let cursor_tick = editing && self.clock.blink_changed();
        if !field.is_dirty() && !labels_changed && value == previous && !cursor_tick {
            return false;
        }

        let text = editable.display();
        let blank_all = self.config.blank_editables
            || field.is_dirty()
            || labels_changed
            || text.len() != editable.format(previous).len();

        let fonts = self.fonts;
        let value_font = area.font.unwrap_or(fonts.value);
        let background = area.color.background();
        if blank_all {
            port.fill_rect(area.x, area.y, area.width, area.height, background);
        }
        port.set_foreground(area.color.foreground());
        port.set_background(Some(background));

        let right = area.right() - MARKER_WIDTH - 1;
        let units = editable.units();
        let units_width = if units.is_empty() { 0 } else { text_width(fonts.units, units) + 2 };
        let value_width = text_width(value_font, &text);
        let label_height = char_height(fonts.label) + CHAR_V_SPACE;

        let (value_x, value_y) = match area.modifier {
            Modifier::NoLabel => {
                let y = area.y + (area.height - char_height(value_font)).max(0) / 2;
                if force_labels {
                    let label_y = area.y + (area.height - char_height(fonts.label)).max(0) / 2;
                    put_string_centered(port, area.x, area.width, label_y, fonts.label, editable.label);
                } else {
                    put_string_centered(port, area.x, area.width, y, value_font, &text);
                }
                if blank_all && !units.is_empty() {
                    put_string_right(port, right, area.bottom() - char_height(fonts.units), fonts.units, units);
                }
                (area.x + (area.width - value_width).max(0) / 2, y)
            }
            Modifier::LabelOnTop => {
                if blank_all {
                    put_string_centered(port, area.x, area.width, area.y, fonts.label, editable.label);
                }
                let y = area.y + label_height;
                put_string_centered(port, area.x, area.width - units_width, y, value_font, &text);
                if blank_all && !units.is_empty() {
                    put_string_right(port, right, y, fonts.units, units);
                }
                (area.x + (area.width - units_width - value_width).max(0) / 2, y)
            }
            Modifier::None => {
                if blank_all {
                    port.select_font(fonts.label);
                    port.put_string(area.x + 1, area.y, editable.label);
                }
                let y = if self.label_on_own_row(Modifier::None) { area.y + label_height } else { area.y };
                let x = right - units_width - value_width;
                port.select_font(value_font);
                port.put_string(x, y, &text);
                if blank_all && !units.is_empty() {
                    put_string_right(port, right, y, fonts.units, units);
                }
                (x, y)
            }
        };

        if editing && !(force_labels && area.modifier == Modifier::NoLabel) {
            let color = if self.clock.blink_on() { self.config.cursor_color } else { background };
            let underline = value_y + char_height(value_font) - 1;
            port.fill_rect(value_x, underline, value_width, 1, color);
        }

        layout.prev_value.set(value);
        layout.prev_force_labels.set(force_labels);
        true
    }
}

/// Font of a record whose geometry or content is measured in characters.
fn area_font(layout: &Layout<'_>) -> crate::fonts::Font {
    match layout.font {
        Some(font) => font,
        None => panic!("layout needs a font for text or character-sized geometry"),
    }
}
