//! Nested menu navigation.
//!
//! The navigator keeps the chain of expanded [`Scrollable`] fields from the
//! root menu on screen down to the menu currently shown. Only the deepest one
//! is drawn expanded; it replaces the root in the root's layout slot.
//!
//! ```text
//! +----------------------+
//! | Heading              |  heading row
//! +----------------------+
//! | Wheel size           |  data rows (scroll window)
//! |              28.0 in▐|  <- selected
//! | Battery            > |
//! |######################|  blank rows past the last entry
//! +----------------------+
//! ```
//!
//! [`Scrollable`]: crate::field::Scrollable

use heapless::Vec;

use crate::config::{EngineConfig, MAX_SCROLLABLE_DEPTH, MAX_SCROLLABLE_ROWS};
use crate::editable::Editor;
use crate::field::{Field, FieldKind};
use crate::fonts::{HEADING_FONT, SCROLLABLE_FONT};
use crate::input::{ButtonEvents, ButtonMap};
use crate::layout::{Area, Border, ColorMode, Coord, Layout, Modifier};

/// Fixed parts of an expanded menu, drawn when its rows are rebuilt.
pub(crate) struct MenuFrame {
    pub heading: Area,
    /// Region below the last entry; empty when every row is used.
    pub blank: Area,
}

/// Stack of expanded menus plus the rows laid out for the deepest one.
pub struct Navigator<'a> {
    stack: Vec<&'a Field<'a>, MAX_SCROLLABLE_DEPTH>,
    relayout: bool,
    data_rows: usize,
    pub(crate) rows: Vec<Layout<'a>, MAX_SCROLLABLE_ROWS>,
}

impl<'a> Navigator<'a> {
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            stack: Vec::new(),
            relayout: false,
            data_rows: config.rows_per_screen() - 1,
            rows: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The menu laid out on screen.
    pub fn root(&self) -> Option<&'a Field<'a>> {
        self.stack.first().copied()
    }

    /// The menu the rider is browsing.
    pub fn current(&self) -> Option<&'a Field<'a>> {
        self.stack.last().copied()
    }

    pub fn is_root(
        &self,
        field: &Field<'_>,
    ) -> bool {
        self.root().is_some_and(|root| core::ptr::addr_eq(root, field))
    }

    /// Visible data rows below the heading.
    pub const fn data_rows(&self) -> usize {
        self.data_rows
    }

    /// Expand `field` below the current menu.
    pub fn enter(
        &mut self,
        field: &'a Field<'a>,
    ) {
        let scrollable = field.expect_scrollable();
        assert!(!self.stack.is_full(), "menu nesting deeper than {} levels", MAX_SCROLLABLE_DEPTH);
        self.stack.push(field).ok();

        field.set_blink(true);
        self.mark_root_dirty();
        self.relayout = true;
        log_info!("menu enter: {} (depth {})", scrollable.label, self.stack.len());
    }

    /// Collapse the current menu. Returns false when no menu is left, so
    /// the caller may leave the screen.
    pub fn exit(&mut self) -> bool {
        let Some(field) = self.stack.pop() else {
            panic!("menu exit with no menu entered");
        };
        for entry in field.expect_scrollable().entries() {
            entry.set_selected(false);
        }
        field.set_blink(false);
        log_info!("menu exit: {} (depth {})", field.expect_scrollable().label, self.stack.len());

        match self.current() {
            Some(parent) => {
                parent.mark_dirty();
                self.mark_root_dirty();
                self.relayout = true;
                true
            }
            None => {
                field.mark_dirty();
                false
            }
        }
    }

    /// Drop every menu without hooks (screen switch).
    pub fn reset(&mut self) {
        while let Some(field) = self.stack.pop() {
            for entry in field.expect_scrollable().entries() {
                entry.set_selected(false);
            }
        }
        self.rows.clear();
        self.relayout = false;
    }

    /// Ask for the rows to be rebuilt on the next render pass.
    pub fn request_relayout(&mut self) {
        self.relayout = true;
        self.mark_root_dirty();
    }

    pub(crate) fn take_relayout(&mut self) -> bool {
        core::mem::replace(&mut self.relayout, false)
    }

    pub(crate) fn mark_root_dirty(&self) {
        if let Some(root) = self.root() {
            root.mark_dirty();
        }
    }

    /// Browse the current menu. Up/down are always claimed while a menu is
    /// open; start-edit opens the selected entry unless an edit is running;
    /// stop-edit leaves the menu.
    pub fn on_press(
        &mut self,
        events: ButtonEvents,
        map: &ButtonMap,
        editor: &mut Editor<'a>,
    ) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        let scrollable = current.expect_scrollable();

        let mut handled = false;
        if events.contains(ButtonEvents::UP_CLICK) {
            scrollable.select_previous();
            handled = true;
        }
        if events.contains(ButtonEvents::DOWN_CLICK) {
            scrollable.select_next(self.data_rows);
            handled = true;
        }
        if handled {
            self.request_relayout();
        }

        if events.intersects(map.start_edit) && !editor.is_editing() {
            match scrollable.selected_entry().map(|entry| (entry, entry.kind())) {
                Some((entry, FieldKind::Editable(editable))) if !editable.read_only => {
                    editor.start(entry);
                    self.mark_root_dirty();
                    handled = true;
                }
                Some((entry, FieldKind::Scrollable(_))) => {
                    self.enter(entry);
                    handled = true;
                }
                _ => {}
            }
        }

        if !handled && events.intersects(map.stop_edit) {
            return self.exit();
        }
        handled
    }

    /// Lay out the heading and the visible entries of the current menu in
    /// `area`.
    pub(crate) fn rebuild_rows(
        &mut self,
        area: &Area,
        config: &EngineConfig,
    ) -> MenuFrame {
        let heading_height = config.heading_height();
        let row_height = config.row_height();
        let heading = Area {
            x: area.x,
            y: area.y,
            width: area.width,
            height: heading_height,
            font: Some(HEADING_FONT),
            color: ColorMode::Heading,
            border: Border::BOTTOM,
            modifier: Modifier::None,
        };

        let fit = ((area.height - heading_height) / row_height).max(1) as usize;
        self.data_rows = fit.min(MAX_SCROLLABLE_ROWS - 1);
        self.rows.clear();

        let Some(current) = self.current() else {
            return MenuFrame {
                heading,
                blank: Area { height: 0, ..heading },
            };
        };
        let scrollable = current.expect_scrollable();
        scrollable.keep_visible(self.data_rows);
        for (index, entry) in scrollable.entries().enumerate() {
            entry.set_selected(index == scrollable.selected());
        }

        let first = scrollable.first();
        let mut y = heading.bottom();
        for entry in scrollable.entries().skip(first).take(self.data_rows) {
            let row = Layout::new(entry).at(area.x, y).size(area.width, row_height).font(SCROLLABLE_FONT);
            if self.rows.push(row).is_err() {
                break;
            }
            y += row_height;
        }

        let rows_bottom = heading.bottom() + self.data_rows as Coord * row_height;
        let blank = Area {
            x: area.x,
            y,
            width: area.width,
            height: (rows_bottom.min(area.bottom()) - y).max(0),
            font: None,
            color: ColorMode::Inverted,
            border: Border::empty(),
            modifier: Modifier::None,
        };
        MenuFrame { heading, blank }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::editable::{Editable, NumberCell, NumberSpec};
    use crate::layout::FILL;

    fn config() -> EngineConfig {
        EngineConfig::DEFAULT
    }

    #[test]
    fn test_enter_exit_pairs() {
        let leaf_entries = [Field::fill(), Field::end()];
        let inner = [Field::scrollable("leaf", &leaf_entries), Field::end()];
        let root = Field::scrollable("root", &inner);
        let mut navigator = Navigator::new(&config());

        navigator.enter(&root);
        navigator.enter(&inner[0]);
        assert_eq!(navigator.depth(), 2);
        assert!(navigator.is_root(&root));
        assert!(root.is_blinking());

        root.clear_dirty();
        assert!(navigator.exit());
        assert!(root.is_dirty());
        assert!(navigator.take_relayout());
        assert!(!navigator.exit());
        assert!(!navigator.is_active());
    }

    #[test]
    #[should_panic(expected = "menu nesting deeper")]
    fn test_enter_past_depth_panics() {
        let entries = [Field::end()];
        let menus: [Field<'_>; MAX_SCROLLABLE_DEPTH + 1] = core::array::from_fn(|_| Field::scrollable("m", &entries));
        let mut navigator = Navigator::new(&config());
        for menu in &menus {
            navigator.enter(menu);
        }
    }

    #[test]
    #[should_panic(expected = "no menu entered")]
    fn test_exit_on_empty_panics() {
        Navigator::new(&config()).exit();
    }

    #[test]
    fn test_press_moves_selection_and_claims_ends() {
        let entries = [Field::fill(), Field::fill(), Field::end()];
        let root = Field::scrollable("root", &entries);
        let map = ButtonMap::DEFAULT;
        let mut editor = Editor::new();
        let mut navigator = Navigator::new(&config());
        navigator.enter(&root);

        assert!(navigator.on_press(ButtonEvents::UP_CLICK, &map, &mut editor));
        assert!(navigator.on_press(ButtonEvents::DOWN_CLICK, &map, &mut editor));
        assert!(navigator.on_press(ButtonEvents::DOWN_CLICK, &map, &mut editor));
        assert_eq!(root.expect_scrollable().selected(), 1);

        // Fill rows cannot be opened
        assert!(!navigator.on_press(map.start_edit, &map, &mut editor));
        assert!(!navigator.on_press(map.stop_edit, &map, &mut editor));
        assert!(!navigator.is_active());
    }

    #[test]
    fn test_start_edit_opens_editable_or_submenu() {
        let value = Cell::new(3u8);
        let locked = Cell::new(1u8);
        let sub_entries = [Field::fill(), Field::end()];
        let entries = [
            Field::editable(Editable::number("A", NumberCell::U8(&value), NumberSpec::new(0, 9))),
            Field::editable(Editable::number("B", NumberCell::U8(&locked), NumberSpec::new(0, 9)).read_only()),
            Field::scrollable("Sub", &sub_entries),
            Field::end(),
        ];
        let root = Field::scrollable("root", &entries);
        let map = ButtonMap::DEFAULT;
        let mut editor = Editor::new();
        let mut navigator = Navigator::new(&config());
        navigator.enter(&root);

        assert!(navigator.on_press(map.start_edit, &map, &mut editor));
        assert!(editor.is_editing_field(&entries[0]));
        editor.stop();

        navigator.on_press(ButtonEvents::DOWN_CLICK, &map, &mut editor);
        assert!(!navigator.on_press(map.start_edit, &map, &mut editor));
        assert!(!editor.is_editing());

        navigator.on_press(ButtonEvents::DOWN_CLICK, &map, &mut editor);
        assert!(navigator.on_press(map.start_edit, &map, &mut editor));
        assert_eq!(navigator.depth(), 2);
    }

    #[test]
    fn test_rows_fill_window_then_blank() {
        let entries = [Field::fill(), Field::fill(), Field::end()];
        let root = Field::scrollable("root", &entries);
        let config = config();
        let mut navigator = Navigator::new(&config);
        navigator.enter(&root);

        let area = Area {
            x: 0,
            y: 0,
            width: config.screen_width,
            height: config.screen_height,
            font: None,
            color: ColorMode::Normal,
            border: Border::empty(),
            modifier: Modifier::None,
        };
        let frame = navigator.rebuild_rows(&area, &config);
        assert_eq!(navigator.rows.len(), 2);
        assert_eq!(navigator.rows[1].y, config.heading_height() + config.row_height());
        assert_eq!(navigator.rows[0].width, config.screen_width);
        assert_ne!(navigator.rows[0].height, FILL);
        assert_eq!(frame.blank.y, config.heading_height() + 2 * config.row_height());
        assert_eq!(frame.blank.height, (navigator.data_rows() as Coord - 2) * config.row_height());
        assert!(entries[0].is_selected());
        assert!(!entries[1].is_selected());
    }
}
