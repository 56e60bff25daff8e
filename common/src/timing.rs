//! Blink and sampling clock derived from the base update tick.

use crate::config::{BLINK_INTERVAL_MS, GRAPH_INTERVAL_MS, UPDATE_INTERVAL_MS};

/// Base ticks per blink phase.
pub const BLINK_TICKS: u32 = BLINK_INTERVAL_MS / UPDATE_INTERVAL_MS;

/// Base ticks between graph samples.
pub const GRAPH_TICKS: u32 = GRAPH_INTERVAL_MS / UPDATE_INTERVAL_MS;

const _: () = assert!(BLINK_TICKS > 0);
const _: () = assert!(GRAPH_TICKS % BLINK_TICKS == 0);

/// Tick counter plus the blink phase it drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkClock {
    counter: u32,
    blink_changed: bool,
    blink_on: bool,
}

impl BlinkClock {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            blink_changed: false,
            blink_on: false,
        }
    }

    /// Advance one base tick.
    pub fn tick(&mut self) {
        self.counter = self.counter.wrapping_add(1);
        self.blink_changed = self.counter % BLINK_TICKS == 0;
        if self.blink_changed {
            self.blink_on = !self.blink_on;
        }
    }

    /// True on the tick where the blink phase toggled.
    pub const fn blink_changed(&self) -> bool {
        self.blink_changed
    }

    pub const fn blink_on(&self) -> bool {
        self.blink_on
    }

    /// True on ticks where graphs take a new sample. Always a blink tick.
    pub const fn graph_sample_due(&self) -> bool {
        self.blink_changed && self.counter % GRAPH_TICKS == 0
    }

    pub const fn ticks(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_toggles_every_blink_interval() {
        let mut clock = BlinkClock::new();
        let mut toggles = 0;
        for _ in 0..BLINK_TICKS * 4 {
            let before = clock.blink_on();
            clock.tick();
            assert_eq!(clock.blink_changed(), before != clock.blink_on());
            if clock.blink_changed() {
                toggles += 1;
            }
        }
        assert_eq!(toggles, 4);
    }

    #[test]
    fn test_graph_sample_lands_on_blink_tick() {
        let mut clock = BlinkClock::new();
        assert!(!clock.graph_sample_due());
        let mut samples = 0;
        for _ in 0..GRAPH_TICKS * 3 {
            clock.tick();
            if clock.graph_sample_due() {
                assert!(clock.blink_changed());
                samples += 1;
            }
        }
        assert_eq!(samples, 3);
    }
}
