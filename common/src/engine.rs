//! The per-tick driver tying screens, navigation, editing and rendering
//! together.
//!
//! All mutable engine state lives in [`Engine`], owned by the main loop and
//! touched from that single context only. Input handlers that run elsewhere
//! (interrupts, other tasks) should only record events and hand them to
//! [`Engine::tick`].
//!
//! # Per-tick order
//!
//! 1. Press dispatch: active editable, active menu, screen hook, app handler
//! 2. Pre-update hook (may switch screens)
//! 3. Clock tick, press-and-hold polling
//! 4. Dirty-tracked render pass over the root layout records
//! 5. Custom-update hook, then flush if anything was drawn

use crate::colors::BLACK;
use crate::config::EngineConfig;
use crate::draw::DrawingPort;
use crate::editable::Editor;
use crate::fonts::EditableFonts;
use crate::input::{ButtonEvents, ButtonLevels};
use crate::navigator::Navigator;
use crate::screen::{PressHandler, Response, Screen};
use crate::timing::BlinkClock;

pub struct Engine<'a> {
    pub(crate) config: EngineConfig,
    screen: Option<&'a Screen<'a>>,
    screen_dirty: bool,
    pub(crate) clock: BlinkClock,
    pub(crate) editor: Editor<'a>,
    pub(crate) navigator: Navigator<'a>,
    pub(crate) fonts: EditableFonts,
    pub(crate) levels: ButtonLevels,
}

impl<'a> Engine<'a> {
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            screen: None,
            screen_dirty: false,
            clock: BlinkClock::new(),
            editor: Editor::new(),
            navigator: Navigator::new(&config),
            fonts: config.editable_fonts,
            levels: ButtonLevels {
                up: false,
                down: false,
                onoff: false,
            },
            config,
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn current_screen(&self) -> Option<&'a Screen<'a>> {
        self.screen
    }

    pub const fn clock(&self) -> &BlinkClock {
        &self.clock
    }

    pub const fn editor(&self) -> &Editor<'a> {
        &self.editor
    }

    pub const fn navigator(&self) -> &Navigator<'a> {
        &self.navigator
    }

    /// Update the held button levels used for press-and-hold.
    pub fn set_levels(
        &mut self,
        levels: ButtonLevels,
    ) {
        self.levels = levels;
    }

    // =========================================================================
    // Screen switching
    // =========================================================================

    /// Leave the current screen (running its exit hook) and show `screen`
    /// with a full redraw. Returns whether anything was drawn.
    pub fn show_screen(
        &mut self,
        port: &mut dyn DrawingPort,
        screen: &'a Screen<'a>,
    ) -> bool {
        self.switch_to(screen);
        self.redraw(port)
    }

    /// Show `screen` without running the exit hook of the current one.
    /// Used for fault screens where the current screen may be broken.
    pub fn panic_show(
        &mut self,
        port: &mut dyn DrawingPort,
        screen: &'a Screen<'a>,
    ) -> bool {
        self.activate(screen);
        self.redraw(port)
    }

    fn switch_to(
        &mut self,
        screen: &'a Screen<'a>,
    ) {
        if let Some(hooks) = self.screen.and_then(Screen::hooks) {
            hooks.on_exit();
        }
        self.activate(screen);
    }

    fn activate(
        &mut self,
        screen: &'a Screen<'a>,
    ) {
        log_info!("show screen: {}", screen.name);
        self.editor.stop();
        self.navigator.reset();
        self.screen = Some(screen);
        self.screen_dirty = true;
        self.fonts = screen.editable_fonts().unwrap_or(self.config.editable_fonts);
        if let Some(hooks) = screen.hooks() {
            hooks.on_enter();
        }
    }

    // =========================================================================
    // Per-tick entry points
    // =========================================================================

    /// Advance the clock and redraw what changed. Returns whether anything
    /// was drawn (and therefore flushed).
    pub fn update_screen(
        &mut self,
        port: &mut dyn DrawingPort,
    ) -> bool {
        let Some(screen) = self.screen else {
            return false;
        };
        if let Some(next) = screen.hooks().and_then(|hooks| hooks.on_pre_update()) {
            self.switch_to(next);
        }

        self.clock.tick();
        self.editor.poll_held(self.levels, self.clock.blink_changed());
        self.redraw(port)
    }

    /// Dispatch button events. Handlers are tried in order (active editable,
    /// active menu, screen hook, `app`) until one claims them. A requested
    /// screen switch is drawn by the next [`Engine::update_screen`].
    pub fn handle_press(
        &mut self,
        events: ButtonEvents,
        app: &dyn PressHandler<'a>,
    ) -> bool {
        if events.is_empty() {
            return false;
        }
        let map = self.config.buttons;

        if self.editor.on_press(events, &map) {
            self.navigator.mark_root_dirty();
            return true;
        }
        if self.navigator.on_press(events, &map, &mut self.editor) {
            return true;
        }

        let screen_response = self
            .screen
            .and_then(Screen::hooks)
            .map_or(Response::Ignored, |hooks| hooks.on_press(events));
        let response = match screen_response {
            Response::Ignored => app.on_press(events),
            claimed => claimed,
        };
        if let Response::ShowScreen(next) = response {
            self.switch_to(next);
        }
        response.is_handled()
    }

    /// One main-loop iteration: presses first, then the screen update.
    pub fn tick(
        &mut self,
        port: &mut dyn DrawingPort,
        events: ButtonEvents,
        levels: ButtonLevels,
        app: &dyn PressHandler<'a>,
    ) -> bool {
        self.set_levels(levels);
        self.handle_press(events, app);
        self.update_screen(port)
    }

    fn redraw(
        &mut self,
        port: &mut dyn DrawingPort,
    ) -> bool {
        let Some(screen) = self.screen else {
            return false;
        };
        let force = core::mem::take(&mut self.screen_dirty);

        let mut drew = false;
        if force {
            port.fill_rect(0, 0, self.config.screen_width, self.config.screen_height, BLACK);
            drew = true;
        }
        drew |= self.render_layouts(port, screen.layouts, force);
        if let Some(hooks) = screen.hooks() {
            drew |= hooks.on_update(port);
        }

        if drew {
            port.flush();
        }
        drew
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::editable::{Editable, NumberCell, NumberSpec};
    use crate::field::Field;
    use crate::fonts::REGULAR_FONT;
    use crate::layout::{AUTO_HEIGHT, Layout};
    use crate::screen::ScreenHooks;
    use crate::testing::RecordingPort;

    /// Records hook calls into a shared log.
    struct Hooks<'l> {
        name: &'static str,
        log: &'l RefCell<Vec<String>>,
    }

    impl<'a> ScreenHooks<'a> for Hooks<'_> {
        fn on_enter(&self) {
            self.log.borrow_mut().push(format!("{} enter", self.name));
        }

        fn on_exit(&self) {
            self.log.borrow_mut().push(format!("{} exit", self.name));
        }
    }

    #[test]
    fn test_show_screen_runs_hooks_and_redraws() {
        let log = RefCell::new(Vec::new());
        let hooks_a = Hooks { name: "A", log: &log };
        let hooks_b = Hooks { name: "B", log: &log };
        let label = Field::draw_text_ref("hello");
        let layouts = [Layout::new(&label).size(0, AUTO_HEIGHT).font(REGULAR_FONT)];
        let screen_a = Screen::new("A", &layouts).with_hooks(&hooks_a);
        let screen_b = Screen::new("B", &layouts).with_hooks(&hooks_b);

        let mut engine = Engine::new(EngineConfig::DEFAULT);
        let mut port = RecordingPort::new();
        engine.show_screen(&mut port, &screen_a);
        engine.update_screen(&mut port);
        log.borrow_mut().clear();
        port.clear();

        assert!(engine.show_screen(&mut port, &screen_b));
        assert_eq!(*log.borrow(), ["A exit", "B enter"]);
        assert!(port.has_text("hello"));
        assert_eq!(port.flushes, 1);
        assert_eq!(engine.current_screen().map(|s| s.name), Some("B"));
    }

    #[test]
    fn test_second_update_draws_nothing() {
        let speed = Cell::new(25u16);
        let text = Field::draw_text();
        let end = Field::end();
        let value = Field::editable(Editable::number("Speed", NumberCell::U16(&speed), NumberSpec::new(0, 999)));
        let layouts = [
            Layout::new(&text).size(0, AUTO_HEIGHT).font(REGULAR_FONT),
            Layout::new(&value).at(0, -1).size(0, AUTO_HEIGHT),
            Layout::new(&end),
        ];
        let screen = Screen::new("main", &layouts);

        let mut engine = Engine::new(EngineConfig::DEFAULT);
        let mut port = RecordingPort::new();
        assert!(engine.show_screen(&mut port, &screen));

        port.clear();
        assert!(!engine.update_screen(&mut port));
        assert_eq!(port.draw_count(), 0);
        assert_eq!(port.flushes, 0);

        text.set_text("ride on");
        assert!(engine.update_screen(&mut port));
        assert!(port.has_text("ride on"));

        port.clear();
        speed.set(26);
        assert!(engine.update_screen(&mut port));
        assert!(port.has_text("26"));
    }

    #[test]
    fn test_press_precedence() {
        struct App;
        impl<'a> PressHandler<'a> for App {
            fn on_press(
                &self,
                events: ButtonEvents,
            ) -> Response<'a> {
                if events.contains(ButtonEvents::M_LONG_CLICK) { Response::Handled } else { Response::Ignored }
            }
        }

        let level = Cell::new(2u8);
        let entries = [
            Field::editable(Editable::number("Assist", NumberCell::U8(&level), NumberSpec::new(0, 5))),
            Field::end(),
        ];
        let menu = Field::scrollable("Setup", &entries);
        let layouts = [Layout::new(&menu)];
        let screen = Screen::new("config", &layouts);
        let map = EngineConfig::DEFAULT.buttons;

        let mut engine = Engine::new(EngineConfig::DEFAULT);
        let mut port = RecordingPort::new();
        engine.show_screen(&mut port, &screen);
        assert!(engine.navigator().is_active());

        // Menu opens the editable, editor then owns up/down
        assert!(engine.handle_press(map.start_edit, &App));
        assert!(engine.editor().is_editing());
        assert!(engine.handle_press(ButtonEvents::UP_CLICK, &App));
        assert_eq!(level.get(), 3);

        // Nobody but the app claims a long M click
        assert!(engine.handle_press(ButtonEvents::M_LONG_CLICK, &App));
        assert!(!engine.handle_press(ButtonEvents::DOWN_LONG_CLICK, &App));

        assert!(engine.handle_press(map.stop_edit, &App));
        assert!(!engine.editor().is_editing());
        assert!(!engine.handle_press(map.stop_edit, &App));
        assert!(!engine.navigator().is_active());
    }

    #[test]
    fn test_start_edit_while_editing_keeps_editing() {
        let level = Cell::new(2u8);
        let entries = [
            Field::editable(Editable::number("Assist", NumberCell::U8(&level), NumberSpec::new(0, 5))),
            Field::end(),
        ];
        let menu = Field::scrollable("Setup", &entries);
        let layouts = [Layout::new(&menu)];
        let screen = Screen::new("config", &layouts);
        let map = EngineConfig::DEFAULT.buttons;

        let mut engine = Engine::new(EngineConfig::DEFAULT);
        let mut port = RecordingPort::new();
        engine.show_screen(&mut port, &screen);

        assert!(engine.handle_press(map.start_edit, &()));
        assert!(engine.handle_press(map.start_edit, &()));
        assert!(engine.handle_press(map.start_edit | ButtonEvents::UP_CLICK, &()));
        assert!(engine.editor().is_editing_field(&entries[0]));
        assert_eq!(level.get(), 3);
        assert_eq!(engine.navigator().depth(), 1);

        engine.update_screen(&mut port);
        assert!(engine.handle_press(map.stop_edit, &()));
        assert!(!engine.editor().is_editing());
        assert!(engine.navigator().is_active());
    }

    #[test]
    fn test_pre_update_switches_screen() {
        struct Boot<'s> {
            next: &'s Screen<'s>,
        }
        impl<'s> ScreenHooks<'s> for Boot<'s> {
            fn on_pre_update(&self) -> Option<&'s Screen<'s>> {
                Some(self.next)
            }
        }

        let label = Field::draw_text_ref("main");
        let main_layouts = [Layout::new(&label).font(REGULAR_FONT)];
        let main = Screen::new("main", &main_layouts);
        let boot_hooks = Boot { next: &main };
        let boot = Screen::new("boot", &[]).with_hooks(&boot_hooks);

        let mut engine = Engine::new(EngineConfig::DEFAULT);
        let mut port = RecordingPort::new();
        engine.show_screen(&mut port, &boot);
        assert!(engine.update_screen(&mut port));
        assert_eq!(engine.current_screen().map(|s| s.name), Some("main"));
        assert!(port.has_text("main"));
    }
}
