//! Fields: the displayable and interactive units of a screen.
//!
//! Fields live in the menu/screen tables and are referenced (never owned) by
//! layout records, so one field can back several on-screen slots. Runtime
//! state uses `Cell`/`RefCell` because everything runs on one cooperative
//! tick and tables are shared by reference.

use core::cell::{Cell, Ref, RefCell};
use core::fmt::{self, Write};

use heapless::String;

use crate::config::MAX_FIELD_LEN;
use crate::draw::DrawingPort;
use crate::editable::Editable;
use crate::graph::Graph;
use crate::layout::Area;

/// Bounded text owned by a field.
pub type FieldText = String<MAX_FIELD_LEN>;

/// Render hook of a [`FieldKind::Custom`] field.
pub trait CustomRender {
    /// Draw into `area`; return whether anything was drawn. `blink_on` is
    /// the current blink phase for renderers that flash.
    fn render(
        &self,
        port: &mut dyn DrawingPort,
        area: &Area,
        blink_on: bool,
    ) -> bool;
}

/// Payload of a field, one case per kind.
pub enum FieldKind<'a> {
    /// Text owned by the field, updated with [`Field::print`].
    DrawText(RefCell<FieldText>),
    /// Text owned elsewhere.
    DrawTextRef(&'a str),
    /// Solid fill in the foreground color.
    Fill,
    /// Every other pixel in the foreground color.
    Mesh,
    Scrollable(Scrollable<'a>),
    Editable(Editable<'a>),
    Custom(&'a dyn CustomRender),
    Graph(Graph<'a>),
    /// Terminates field and layout sequences.
    End,
}

/// A field plus its redraw state.
pub struct Field<'a> {
    dirty: Cell<bool>,
    blink: Cell<bool>,
    selected: Cell<bool>,
    kind: FieldKind<'a>,
}

impl<'a> Field<'a> {
    const fn with_kind(kind: FieldKind<'a>) -> Self {
        Self {
            dirty: Cell::new(true),
            blink: Cell::new(false),
            selected: Cell::new(false),
            kind,
        }
    }

    const fn blinking(mut self) -> Self {
        self.blink = Cell::new(true);
        self
    }

    /// Empty owned text.
    pub const fn draw_text() -> Self {
        Self::with_kind(FieldKind::DrawText(RefCell::new(String::new())))
    }

    /// Borrowed text, typically a static label.
    pub const fn draw_text_ref(text: &'a str) -> Self {
        Self::with_kind(FieldKind::DrawTextRef(text))
    }

    pub const fn fill() -> Self {
        Self::with_kind(FieldKind::Fill)
    }

    pub const fn mesh() -> Self {
        Self::with_kind(FieldKind::Mesh)
    }

    /// A menu listing `entries` (up to the first [`Field::end`] if present).
    pub const fn scrollable(
        label: &'a str,
        entries: &'a [Field<'a>],
    ) -> Self {
        Self::with_kind(FieldKind::Scrollable(Scrollable::new(label, entries)))
    }

    pub const fn editable(editable: Editable<'a>) -> Self {
        Self::with_kind(FieldKind::Editable(editable))
    }

    pub const fn custom(render: &'a dyn CustomRender) -> Self {
        Self::with_kind(FieldKind::Custom(render))
    }

    /// Graphs take part in blinking so they are revisited on every blink tick.
    pub const fn graph(graph: Graph<'a>) -> Self {
        Self::with_kind(FieldKind::Graph(graph)).blinking()
    }

    pub const fn end() -> Self {
        Self::with_kind(FieldKind::End)
    }

    pub const fn kind(&self) -> &FieldKind<'a> {
        &self.kind
    }

    pub const fn is_end(&self) -> bool {
        matches!(self.kind, FieldKind::End)
    }

    pub const fn is_editable(&self) -> bool {
        matches!(self.kind, FieldKind::Editable(_))
    }

    // =========================================================================
    // Redraw state
    // =========================================================================

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub(crate) fn clear_dirty(&self) {
        self.dirty.set(false);
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.get()
    }

    pub fn set_blink(
        &self,
        blink: bool,
    ) {
        self.blink.set(blink);
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub(crate) fn set_selected(
        &self,
        selected: bool,
    ) {
        self.selected.set(selected);
    }

    // =========================================================================
    // Payload access
    // =========================================================================

    pub fn as_editable(&self) -> Option<&Editable<'a>> {
        match &self.kind {
            FieldKind::Editable(editable) => Some(editable),
            _ => None,
        }
    }

    pub fn as_scrollable(&self) -> Option<&Scrollable<'a>> {
        match &self.kind {
            FieldKind::Scrollable(scrollable) => Some(scrollable),
            _ => None,
        }
    }

    pub(crate) fn expect_editable(&self) -> &Editable<'a> {
        match &self.kind {
            FieldKind::Editable(editable) => editable,
            _ => panic!("field is not an editable"),
        }
    }

    pub(crate) fn expect_scrollable(&self) -> &Scrollable<'a> {
        match &self.kind {
            FieldKind::Scrollable(scrollable) => scrollable,
            _ => panic!("field is not a scrollable"),
        }
    }

    fn expect_text(&self) -> &RefCell<FieldText> {
        match &self.kind {
            FieldKind::DrawText(text) => text,
            _ => panic!("field does not own a text buffer"),
        }
    }

    // =========================================================================
    // Owned text
    // =========================================================================

    /// Current text of a [`FieldKind::DrawText`] field.
    pub fn text(&self) -> Ref<'_, FieldText> {
        self.expect_text().borrow()
    }

    /// Replace the text, marking the field dirty only if it changed.
    /// Text beyond the buffer capacity is dropped.
    pub fn set_text(
        &self,
        text: &str,
    ) {
        self.print(format_args!("{text}"));
    }

    /// Format into the text buffer, marking the field dirty only if the
    /// result differs from what is shown.
    pub fn print(
        &self,
        args: fmt::Arguments<'_>,
    ) {
        let mut next = FieldText::new();
        let mut writer = Truncating(&mut next);
        writer.write_fmt(args).ok();

        let buffer = self.expect_text();
        if *buffer.borrow() != next {
            *buffer.borrow_mut() = next;
            self.mark_dirty();
        }
    }
}

/// Writes as much as fits, silently dropping the rest.
struct Truncating<'b>(&'b mut FieldText);

impl Write for Truncating<'_> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Scrollable payload
// =============================================================================

/// A navigable list of child fields.
pub struct Scrollable<'a> {
    pub label: &'a str,
    entries: &'a [Field<'a>],
    selected: Cell<usize>,
    first: Cell<usize>,
}

impl<'a> Scrollable<'a> {
    pub const fn new(
        label: &'a str,
        entries: &'a [Field<'a>],
    ) -> Self {
        Self {
            label,
            entries,
            selected: Cell::new(0),
            first: Cell::new(0),
        }
    }

    /// Number of entries before the end marker.
    pub fn len(&self) -> usize {
        self.entries.iter().take_while(|entry| !entry.is_end()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry(
        &self,
        index: usize,
    ) -> Option<&'a Field<'a>> {
        self.entries().nth(index)
    }

    /// Index of the highlighted entry.
    pub fn selected(&self) -> usize {
        self.selected.get()
    }

    /// Index of the first visible entry.
    pub fn first(&self) -> usize {
        self.first.get()
    }

    pub fn selected_entry(&self) -> Option<&'a Field<'a>> {
        self.entry(self.selected())
    }

    /// Move the selection up, scrolling the window if it leaves the top.
    pub fn select_previous(&self) {
        let selected = self.selected.get().saturating_sub(1);
        self.selected.set(selected);
        if selected < self.first.get() {
            self.first.set(selected);
        }
    }

    /// Move the selection down, scrolling so it stays within `visible_rows`.
    pub fn select_next(
        &self,
        visible_rows: usize,
    ) {
        let mut selected = self.selected.get();
        if selected + 1 < self.len() {
            selected += 1;
        }
        self.selected.set(selected);
        self.keep_visible(visible_rows);
    }

    /// Scroll down just enough for the selection to sit in the window.
    pub(crate) fn keep_visible(
        &self,
        visible_rows: usize,
    ) {
        let visible_rows = visible_rows.max(1);
        let selected = self.selected.get();
        if selected >= self.first.get() + visible_rows {
            self.first.set(selected + 1 - visible_rows);
        }
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &'a Field<'a>> {
        self.entries.iter().take_while(|entry| !entry.is_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_marks_dirty_only_on_change() {
        let field = Field::draw_text();
        field.clear_dirty();

        field.print(format_args!("{}:{:02}", 12, 5));
        assert!(field.is_dirty());
        assert_eq!(field.text().as_str(), "12:05");

        field.clear_dirty();
        field.print(format_args!("{}:{:02}", 12, 5));
        assert!(!field.is_dirty());

        field.set_text("12:06");
        assert!(field.is_dirty());
    }

    #[test]
    fn test_print_truncates_long_text() {
        let field = Field::draw_text();
        field.set_text("0123456789012345678901234567890123456789");
        assert_eq!(field.text().len(), MAX_FIELD_LEN);
    }

    #[test]
    #[should_panic(expected = "does not own a text buffer")]
    fn test_print_on_label_panics() {
        let field = Field::draw_text_ref("fixed");
        field.set_text("nope");
    }

    #[test]
    fn test_scrollable_stops_at_end_marker() {
        let entries = [Field::fill(), Field::fill(), Field::end(), Field::fill()];
        let menu = Scrollable::new("menu", &entries);
        assert_eq!(menu.len(), 2);
        assert!(menu.entry(1).is_some());
        assert!(menu.entry(2).is_none());
        assert!(menu.entry(3).is_none());
    }

    #[test]
    fn test_scroll_window_follows_selection() {
        let entries: [Field<'_>; 20] = core::array::from_fn(|_| Field::fill());
        let menu = Scrollable::new("menu", &entries);

        for _ in 0..6 {
            menu.select_next(5);
        }
        assert_eq!(menu.selected(), 6);
        assert_eq!(menu.first(), 2);

        for _ in 0..4 {
            menu.select_previous();
        }
        assert_eq!(menu.selected(), 2);
        assert_eq!(menu.first(), 2);

        menu.select_previous();
        assert_eq!(menu.selected(), 1);
        assert_eq!(menu.first(), 1);
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let entries = [Field::fill(), Field::fill(), Field::fill()];
        let menu = Scrollable::new("menu", &entries);

        menu.select_previous();
        assert_eq!(menu.selected(), 0);

        for _ in 0..10 {
            menu.select_next(5);
        }
        assert_eq!(menu.selected(), 2);
        assert_eq!(menu.first(), 0);
    }

    #[test]
    fn test_new_fields_start_dirty() {
        let field = Field::fill();
        assert!(field.is_dirty());
        assert!(!field.is_blinking());
        assert!(!field.is_selected());
    }
}
