//! Button events and levels consumed by the engine.
//!
//! The input layer debounces the physical buttons and reports, once per tick,
//! a mask of discrete click/long-click events plus the current held levels.
//! Semantic actions (start editing, stop editing, next screen) are mapped onto
//! physical events by a [`ButtonMap`] so each product can pick its own buttons.

use bitflags::bitflags;

bitflags! {
    /// Discrete button events seen during one tick.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ButtonEvents: u16 {
        const UP_CLICK = 1 << 0;
        const DOWN_CLICK = 1 << 1;
        const ONOFF_CLICK = 1 << 2;
        const M_CLICK = 1 << 3;
        const UP_LONG_CLICK = 1 << 4;
        const DOWN_LONG_CLICK = 1 << 5;
        const ONOFF_LONG_CLICK = 1 << 6;
        const M_LONG_CLICK = 1 << 7;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ButtonEvents {
    fn format(
        &self,
        f: defmt::Formatter,
    ) {
        defmt::write!(f, "ButtonEvents({=u16:#x})", self.bits());
    }
}

/// Which buttons are physically held right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub up: bool,
    pub down: bool,
    pub onoff: bool,
}

/// Physical events that trigger the engine's semantic actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonMap {
    /// Start editing the selected value, or open the selected submenu.
    pub start_edit: ButtonEvents,
    /// Stop editing, or leave the current submenu.
    pub stop_edit: ButtonEvents,
    /// Cycle to the next screen (app-wide).
    pub next_screen: ButtonEvents,
    /// Power off (app-wide).
    pub power_off: ButtonEvents,
}

impl ButtonMap {
    pub const DEFAULT: Self = Self {
        start_edit: ButtonEvents::M_CLICK,
        stop_edit: ButtonEvents::ONOFF_CLICK,
        next_screen: ButtonEvents::ONOFF_CLICK,
        power_off: ButtonEvents::ONOFF_LONG_CLICK,
    };
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_stop_and_next_share_button() {
        // Leaving the top menu falls through to the app-wide screen switch
        let map = ButtonMap::DEFAULT;
        assert!(map.stop_edit.intersects(map.next_screen));
        assert!(!map.start_edit.intersects(map.stop_edit));
    }

    #[test]
    fn test_events_combine() {
        let events = ButtonEvents::UP_CLICK | ButtonEvents::M_CLICK;
        assert!(events.contains(ButtonEvents::UP_CLICK));
        assert!(!events.contains(ButtonEvents::DOWN_CLICK));
        assert!(ButtonEvents::default().is_empty());
    }
}
