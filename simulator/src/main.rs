//! Instrument cluster simulator for desktop.
//!
//! Runs the cluster engine in an SDL2 window through the
//! embedded-graphics-simulator crate, fed with synthetic telemetry.
//!
//! Keys: Up/Down arrows, `M`, `P` (on/off). `Q` quits. Set
//! `CLUSTER_SETTINGS` to choose where settings are stored.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod buttons;
mod screens;
mod settings;
mod store;
mod telemetry;
mod timing;

use std::path::PathBuf;
use std::time::Instant;
use std::{env, thread};

use cluster_common::colors::BLACK;
use cluster_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use cluster_common::{Canvas, Engine, EngineConfig};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::buttons::{Button, Buttons};
use crate::screens::{AppHandler, Dashboard, build_boot, build_config, leak};
use crate::store::SettingsStore;
use crate::telemetry::Telemetry;
use crate::timing::FRAME_TIME;

const SETTINGS_FILE: &str = "cluster-settings.bin";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = leak(SettingsStore::new(settings_path()));
    let (settings, status) = store.load_or_default();
    let settings = leak(settings);

    let (dashboard, main_screen) = Dashboard::build(settings);
    let config_screen = build_config(settings, store, dashboard);
    let boot_screen = build_boot(main_screen, status);

    let config = EngineConfig::DEFAULT;
    let app = AppHandler::new(config.buttons, [main_screen, config_screen]);

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Cluster Sim", &output_settings);

    display.clear(BLACK).ok();
    let mut engine = Engine::new(config);
    engine.show_screen(&mut Canvas::new(&mut display), boot_screen);
    window.update(&display);

    let mut buttons = Buttons::new();
    let mut telemetry = Telemetry::new();

    'run: loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit
                | SimulatorEvent::KeyDown {
                    keycode: Keycode::Q, ..
                } => break 'run,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if let Some(button) = Button::from_keycode(keycode) {
                        buttons.press(button, frame_start);
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(button) = Button::from_keycode(keycode) {
                        buttons.release(button);
                    }
                }
                _ => {}
            }
        }

        let readings = telemetry.sample(settings.assist_level.get(), settings.nominal_volts());
        dashboard.apply(&readings);

        let events = buttons.poll(frame_start);
        let mut canvas = Canvas::new(&mut display);
        engine.tick(&mut canvas, events, buttons.levels(), &app);
        if canvas.take_flush() {
            window.update(&display);
        }
        if app.quit_requested() {
            break;
        }

        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    if let Err(e) = store.save(settings) {
        log::warn!("could not save settings: {e}");
    }
}

fn settings_path() -> PathBuf {
    env::var_os("CLUSTER_SETTINGS").map_or_else(|| PathBuf::from(SETTINGS_FILE), PathBuf::from)
}
