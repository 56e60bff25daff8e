//! Configuration screen: one nested menu over every user setting.

use cluster_common::fonts::{EditableFonts, REGULAR_FONT};
use cluster_common::thresholds::THRESHOLD_MODE_OPTIONS;
use cluster_common::{Editable, Field, Layout, NumberCell, NumberSpec, Screen, ScreenHooks};

use crate::screens::{Dashboard, leak};
use crate::settings::{BATTERY_OPTIONS, MAX_ASSIST_LEVEL, OFF_ON_OPTIONS, Settings, circumference_mm};
use crate::store::SettingsStore;

struct ConfigHooks {
    settings: &'static Settings,
    store: &'static SettingsStore,
    dashboard: &'static Dashboard,
}

impl ScreenHooks<'static> for ConfigHooks {
    /// Leaving the menu applies and persists the settings.
    fn on_exit(&self) {
        self.dashboard.resolve_thresholds();
        if let Err(e) = self.store.save(self.settings) {
            log::warn!("could not save settings: {e}");
        }
    }
}

pub fn build(
    settings: &'static Settings,
    store: &'static SettingsStore,
    dashboard: &'static Dashboard,
) -> &'static Screen<'static> {
    let root = leak(Field::scrollable("Configuration", menu_entries(settings)));
    let layouts = leak([Layout::new(root)]);
    let hooks = leak(ConfigHooks {
        settings,
        store,
        dashboard,
    });
    leak(
        Screen::new("config", layouts)
            .with_hooks(hooks)
            .with_editable_fonts(EditableFonts::uniform(REGULAR_FONT)),
    )
}

fn menu_entries(settings: &'static Settings) -> &'static [Field<'static>] {
    let update_circumference: &'static dyn Fn(i64) = leak(move |diameter: i64| {
        let diameter = u16::try_from(diameter).unwrap_or(0);
        settings.wheel_circumference.set(circumference_mm(diameter));
    });
    let wheel = leak([
        Field::editable(Editable::number(
            "Diameter",
            NumberCell::U16(&settings.wheel_diameter),
            NumberSpec::new(100, 320)
                .step(5)
                .decimals(1)
                .units("in")
                .on_pre_set(update_circumference),
        )),
        Field::editable(
            Editable::number(
                "Circumference",
                NumberCell::U16(&settings.wheel_circumference),
                NumberSpec::new(0, 3000).units("mm"),
            )
            .read_only(),
        ),
        Field::end(),
    ]);

    let battery = leak([
        Field::editable(Editable::options("Voltage", NumberCell::U8(&settings.battery_type), &BATTERY_OPTIONS)),
        Field::editable(Editable::number(
            "Max current",
            NumberCell::U8(&settings.battery_max_current),
            NumberSpec::new(1, 40).units("A"),
        )),
        Field::editable(Editable::number(
            "Low cut-off",
            NumberCell::U16(&settings.battery_cut_off),
            NumberSpec::new(200, 600).decimals(1).units("V"),
        )),
        Field::end(),
    ]);

    let assist = leak([
        Field::editable(Editable::number(
            "Level",
            NumberCell::U8(&settings.assist_level),
            NumberSpec::new(0, i64::from(MAX_ASSIST_LEVEL)),
        )),
        Field::editable(Editable::options("Walk assist", NumberCell::U8(&settings.walk_assist), &OFF_ON_OPTIONS)),
        Field::end(),
    ]);

    let motor_temp = leak([
        Field::editable(Editable::options("Warnings", NumberCell::U8(&settings.temp_mode), &THRESHOLD_MODE_OPTIONS)),
        Field::editable(Editable::number(
            "Warn at",
            NumberCell::U8(&settings.temp_warn),
            NumberSpec::new(30, 150).units("C"),
        )),
        Field::editable(Editable::number(
            "Error at",
            NumberCell::U8(&settings.temp_error),
            NumberSpec::new(30, 150).units("C"),
        )),
        Field::end(),
    ]);

    let power_limits = leak([
        Field::editable(Editable::options("Warnings", NumberCell::U8(&settings.power_mode), &THRESHOLD_MODE_OPTIONS)),
        Field::editable(Editable::number(
            "Warn at",
            NumberCell::U16(&settings.power_warn),
            NumberSpec::new(0, 3000).step(50).units("W"),
        )),
        Field::editable(Editable::number(
            "Error at",
            NumberCell::U16(&settings.power_error),
            NumberSpec::new(0, 3000).step(50).units("W"),
        )),
        Field::end(),
    ]);

    let display = leak([
        Field::editable(Editable::number(
            "Speed limit",
            NumberCell::U8(&settings.speed_limit),
            NumberSpec::new(10, 99).units("km/h"),
        )),
        Field::scrollable("Power graph", power_limits),
        Field::end(),
    ]);

    leak([
        Field::scrollable("Wheel", wheel),
        Field::scrollable("Battery", battery),
        Field::scrollable("Assist", assist),
        Field::scrollable("Motor temperature", motor_temp),
        Field::scrollable("Display", display),
        Field::end(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_every_group() {
        let settings = leak(Settings::default());
        let entries = menu_entries(settings);
        let labels: Vec<&str> = entries
            .iter()
            .filter_map(Field::as_scrollable)
            .map(|menu| menu.label)
            .collect();
        assert_eq!(labels, ["Wheel", "Battery", "Assist", "Motor temperature", "Display"]);
    }

    #[test]
    fn test_diameter_updates_circumference() {
        let settings = leak(Settings::default());
        let entries = menu_entries(settings);
        let wheel = entries[0].as_scrollable().unwrap();
        let diameter = wheel.entry(0).and_then(Field::as_editable).unwrap();

        settings.wheel_diameter.set(255);
        diameter.step(true);
        assert_eq!(settings.wheel_diameter.get(), 260);
        assert_eq!(settings.wheel_circumference.get(), circumference_mm(260));
        assert!(wheel.entry(1).and_then(Field::as_editable).unwrap().read_only);
    }

    #[test]
    fn test_leaving_saves_settings() {
        let path = std::env::temp_dir().join(format!("cluster-{}-config-exit.bin", std::process::id()));
        let settings = leak(Settings::default());
        let store = leak(SettingsStore::new(&path));
        let (dashboard, _) = Dashboard::build(settings);
        let screen = build(settings, store, dashboard);

        settings.speed_limit.set(32);
        screen.hooks().unwrap().on_exit();
        let saved = store.load().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(saved.speed_limit.get(), 32);
    }
}
