//! User settings edited on the configuration screen.
//!
//! Every value is a `Cell` so the engine's editables can point straight at
//! it. The whole struct is what the settings store persists.

use std::cell::Cell;

use cluster_common::thresholds::ThresholdMode;
use serde::{Deserialize, Serialize};

/// Battery pack options, shown by the voltage enum editable.
pub const BATTERY_OPTIONS: [&str; 3] = ["36V", "48V", "52V"];
const BATTERY_NOMINAL_VOLTS: [f32; 3] = [36.0, 48.0, 52.0];

pub const OFF_ON_OPTIONS: [&str; 2] = ["off", "on"];

/// Highest assist level the controller supports.
pub const MAX_ASSIST_LEVEL: u8 = 5;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Wheel
    /// Tenths of an inch.
    pub wheel_diameter: Cell<u16>,
    /// Millimetres, derived from the diameter.
    pub wheel_circumference: Cell<u16>,

    // Battery
    /// Index into [`BATTERY_OPTIONS`].
    pub battery_type: Cell<u8>,
    /// Amps.
    pub battery_max_current: Cell<u8>,
    /// Tenths of a volt.
    pub battery_cut_off: Cell<u16>,

    // Assist
    pub assist_level: Cell<u8>,
    pub walk_assist: Cell<u8>,

    // Motor temperature, degrees Celsius
    pub temp_mode: Cell<u8>,
    pub temp_warn: Cell<u8>,
    pub temp_error: Cell<u8>,

    // Display
    /// km/h; faster riding raises a warning.
    pub speed_limit: Cell<u8>,
    pub power_mode: Cell<u8>,
    /// Watts.
    pub power_warn: Cell<u16>,
    pub power_error: Cell<u16>,
}

impl Settings {
    pub fn nominal_volts(&self) -> f32 {
        BATTERY_NOMINAL_VOLTS
            .get(usize::from(self.battery_type.get()))
            .copied()
            .unwrap_or(BATTERY_NOMINAL_VOLTS[0])
    }

    /// Motor power at the battery current limit, in watts.
    pub fn peak_power(&self) -> i32 {
        (self.nominal_volts() * f32::from(self.battery_max_current.get())) as i32
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wheel_diameter: Cell::new(275),
            wheel_circumference: Cell::new(circumference_mm(275)),
            battery_type: Cell::new(1),
            battery_max_current: Cell::new(18),
            battery_cut_off: Cell::new(390),
            assist_level: Cell::new(2),
            walk_assist: Cell::new(0),
            temp_mode: Cell::new(ThresholdMode::Auto.index()),
            temp_warn: Cell::new(75),
            temp_error: Cell::new(85),
            speed_limit: Cell::new(25),
            power_mode: Cell::new(ThresholdMode::Auto.index()),
            power_warn: Cell::new(600),
            power_error: Cell::new(750),
        }
    }
}

/// Wheel circumference in millimetres for a diameter in tenths of an inch.
pub fn circumference_mm(diameter: u16) -> u16 {
    (f32::from(diameter) * 2.54 * std::f32::consts::PI).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circumference_of_common_wheels() {
        assert_eq!(circumference_mm(260), 2075);
        assert_eq!(circumference_mm(290), 2314);
    }

    #[test]
    fn test_peak_power_follows_battery() {
        let settings = Settings::default();
        assert_eq!(settings.peak_power(), 48 * 18);
        settings.battery_type.set(9);
        assert_eq!(settings.peak_power(), 36 * 18);
    }
}
