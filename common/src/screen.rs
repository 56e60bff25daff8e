//! Screens and their lifecycle hooks.

use crate::draw::DrawingPort;
use crate::fonts::EditableFonts;
use crate::input::ButtonEvents;
use crate::layout::Layout;

/// Outcome of a press handler.
#[derive(Clone, Copy)]
pub enum Response<'a> {
    /// Not claimed; the next handler in line gets the events.
    Ignored,
    Handled,
    /// Claimed, and the engine should switch to this screen.
    ShowScreen(&'a Screen<'a>),
}

impl Response<'_> {
    pub const fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Optional per-screen behavior. Every hook has a no-op default.
pub trait ScreenHooks<'a> {
    /// Runs after the screen became current, before its first render.
    fn on_enter(&self) {}

    /// Runs before another screen replaces this one.
    fn on_exit(&self) {}

    /// Runs at the start of every update; may hand over to another screen.
    fn on_pre_update(&self) -> Option<&'a Screen<'a>> {
        None
    }

    fn on_press(
        &self,
        _events: ButtonEvents,
    ) -> Response<'a> {
        Response::Ignored
    }

    /// Runs after the layout pass; returns whether it drew anything.
    fn on_update(
        &self,
        _port: &mut dyn DrawingPort,
    ) -> bool {
        false
    }
}

/// App-wide press handler, consulted after the screen's own hook.
pub trait PressHandler<'a> {
    fn on_press(
        &self,
        events: ButtonEvents,
    ) -> Response<'a>;
}

impl<'a> PressHandler<'a> for () {
    fn on_press(
        &self,
        _events: ButtonEvents,
    ) -> Response<'a> {
        Response::Ignored
    }
}

/// A named set of root layout records.
pub struct Screen<'a> {
    pub name: &'a str,
    /// Root records, optionally terminated by an end field.
    pub layouts: &'a [Layout<'a>],
    hooks: Option<&'a dyn ScreenHooks<'a>>,
    editable_fonts: Option<EditableFonts>,
}

impl<'a> Screen<'a> {
    pub const fn new(
        name: &'a str,
        layouts: &'a [Layout<'a>],
    ) -> Self {
        Self {
            name,
            layouts,
            hooks: None,
            editable_fonts: None,
        }
    }

    pub const fn with_hooks(
        mut self,
        hooks: &'a dyn ScreenHooks<'a>,
    ) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Fonts editables on this screen use instead of the engine default.
    pub const fn with_editable_fonts(
        mut self,
        fonts: EditableFonts,
    ) -> Self {
        self.editable_fonts = Some(fonts);
        self
    }

    pub const fn hooks(&self) -> Option<&'a dyn ScreenHooks<'a>> {
        self.hooks
    }

    pub const fn editable_fonts(&self) -> Option<EditableFonts> {
        self.editable_fonts
    }
}
