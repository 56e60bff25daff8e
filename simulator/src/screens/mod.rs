//! Simulator screens and the app-wide press handler.
//!
//! Screens, their fields and layouts live for the whole run, so they are
//! built once at startup and leaked to get `'static` references the engine
//! can hold.

mod boot;
mod config;
mod dashboard;

use std::cell::Cell;

use cluster_common::{ButtonEvents, ButtonMap, PressHandler, Response, Screen};

pub use boot::build as build_boot;
pub use config::build as build_config;
pub use dashboard::Dashboard;

pub(crate) fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Cycles through the screens on next-screen and records power-off.
pub struct AppHandler {
    map: ButtonMap,
    cycle: [&'static Screen<'static>; 2],
    current: Cell<usize>,
    quit: Cell<bool>,
}

impl AppHandler {
    /// `cycle[0]` is the screen the boot screen hands over to.
    pub fn new(
        map: ButtonMap,
        cycle: [&'static Screen<'static>; 2],
    ) -> Self {
        Self {
            map,
            cycle,
            current: Cell::new(0),
            quit: Cell::new(false),
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.get()
    }
}

impl PressHandler<'static> for AppHandler {
    fn on_press(
        &self,
        events: ButtonEvents,
    ) -> Response<'static> {
        if events.intersects(self.map.power_off) {
            log::info!("power off requested");
            self.quit.set(true);
            return Response::Handled;
        }
        if events.intersects(self.map.next_screen) {
            let next = (self.current.get() + 1) % self.cycle.len();
            self.current.set(next);
            return Response::ShowScreen(self.cycle[next]);
        }
        Response::Ignored
    }
}
