//! Boot screen: product name and settings status, then hands over to the
//! main screen.

use std::cell::Cell;
use std::time::Instant;

use cluster_common::fonts::{HEADING_FONT, SMALL_FONT};
use cluster_common::layout::{AUTO_HEIGHT, FILL};
use cluster_common::{ColorMode, Field, Layout, Screen, ScreenHooks};

use crate::screens::leak;
use crate::timing::BOOT_TIME;

struct BootHooks {
    next: &'static Screen<'static>,
    entered: Cell<Option<Instant>>,
}

impl ScreenHooks<'static> for BootHooks {
    fn on_enter(&self) {
        self.entered.set(Some(Instant::now()));
    }

    fn on_pre_update(&self) -> Option<&'static Screen<'static>> {
        let entered = self.entered.get()?;
        (entered.elapsed() >= BOOT_TIME).then_some(self.next)
    }
}

/// `status` is shown under the title, e.g. whether settings were loaded.
pub fn build(
    next: &'static Screen<'static>,
    status: &str,
) -> &'static Screen<'static> {
    let title = leak(Field::draw_text_ref("E-BIKE"));
    let status_field = leak(Field::draw_text());
    status_field.set_text(status);

    let layouts = leak([
        Layout::new(title)
            .at(0, 120)
            .size(FILL, AUTO_HEIGHT)
            .font(HEADING_FONT)
            .color(ColorMode::Heading),
        Layout::new(status_field).at(0, -9).size(FILL, AUTO_HEIGHT).font(SMALL_FONT),
    ]);
    let hooks = leak(BootHooks {
        next,
        entered: Cell::new(None),
    });
    leak(Screen::new("boot", layouts).with_hooks(hooks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_before_handing_over() {
        let main = leak(Screen::new("main", &[]));
        let boot = build(main, "Settings loaded");
        let hooks = boot.hooks().unwrap();

        assert!(hooks.on_pre_update().is_none());
        hooks.on_enter();
        assert!(hooks.on_pre_update().is_none());

        std::thread::sleep(BOOT_TIME);
        assert_eq!(hooks.on_pre_update().map(|screen| screen.name), Some("main"));
    }

    #[test]
    fn test_status_text_is_shown() {
        let main = leak(Screen::new("main", &[]));
        let boot = build(main, "Default settings");
        assert_eq!(boot.layouts[1].field().text().as_str(), "Default settings");
    }
}
