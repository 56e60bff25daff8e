//! Keyboard stand-in for the handlebar buttons.
//!
//! A key press followed by a release becomes a click. Holding a key past
//! [`LONG_CLICK_TIME`] emits the long click once and swallows the release.
//! Held levels are exported for the engine's press-and-hold polling.

use std::time::Instant;

use cluster_common::{ButtonEvents, ButtonLevels};
use embedded_graphics_simulator::sdl2::Keycode;

use crate::timing::LONG_CLICK_TIME;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    OnOff,
    M,
}

impl Button {
    const ALL: [Self; 4] = [Self::Up, Self::Down, Self::OnOff, Self::M];

    /// Keyboard binding: arrows for up/down, `P` for on/off, `M` for M.
    pub fn from_keycode(keycode: Keycode) -> Option<Self> {
        match keycode {
            Keycode::Up => Some(Self::Up),
            Keycode::Down => Some(Self::Down),
            Keycode::P => Some(Self::OnOff),
            Keycode::M => Some(Self::M),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::OnOff => 2,
            Self::M => 3,
        }
    }

    const fn click(self) -> ButtonEvents {
        match self {
            Self::Up => ButtonEvents::UP_CLICK,
            Self::Down => ButtonEvents::DOWN_CLICK,
            Self::OnOff => ButtonEvents::ONOFF_CLICK,
            Self::M => ButtonEvents::M_CLICK,
        }
    }

    const fn long_click(self) -> ButtonEvents {
        match self {
            Self::Up => ButtonEvents::UP_LONG_CLICK,
            Self::Down => ButtonEvents::DOWN_LONG_CLICK,
            Self::OnOff => ButtonEvents::ONOFF_LONG_CLICK,
            Self::M => ButtonEvents::M_LONG_CLICK,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct KeyState {
    pressed_at: Option<Instant>,
    long_sent: bool,
}

/// Click detection for all four buttons.
#[derive(Default)]
pub struct Buttons {
    keys: [KeyState; 4],
    pending: ButtonEvents,
}

impl Buttons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(
        &mut self,
        button: Button,
        now: Instant,
    ) {
        let key = &mut self.keys[button.index()];
        if key.pressed_at.is_none() {
            key.pressed_at = Some(now);
            key.long_sent = false;
        }
    }

    pub fn release(
        &mut self,
        button: Button,
    ) {
        let key = &mut self.keys[button.index()];
        if key.pressed_at.take().is_some() && !key.long_sent {
            self.pending |= button.click();
        }
    }

    /// Events collected since the last poll, plus any long click that
    /// became due by `now`.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> ButtonEvents {
        for button in Button::ALL {
            let key = &mut self.keys[button.index()];
            if let Some(pressed_at) = key.pressed_at
                && !key.long_sent
                && now.duration_since(pressed_at) >= LONG_CLICK_TIME
            {
                key.long_sent = true;
                self.pending |= button.long_click();
            }
        }
        core::mem::take(&mut self.pending)
    }

    pub fn levels(&self) -> ButtonLevels {
        let held = |button: Button| self.keys[button.index()].pressed_at.is_some();
        ButtonLevels {
            up: held(Button::Up),
            down: held(Button::Down),
            onoff: held(Button::OnOff),
        }
    }
}
