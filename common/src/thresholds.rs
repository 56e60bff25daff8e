//! Warn/error threshold configuration for telemetry values.
//!
//! A numeric editable may carry a [`Thresholds`] block: a mode cell the rider
//! edits through an enum editable, two configured level cells, and the
//! resolved [`ThresholdLevels`] that graphs plotting the same value read.
//!
//! # Modes
//!
//! - `Disabled`: no levels, graphs draw every column in the normal color
//! - `Auto`: levels computed by the application (e.g. from motor limits)
//! - `Manual`: levels copied from the configured cells

use core::cell::Cell;

use crate::editable::NumberCell;

/// Sentinel stored in a level cell that has no threshold.
pub const THRESHOLD_UNSET: i32 = -1;

/// Labels for the enum editable that selects a [`ThresholdMode`].
pub const THRESHOLD_MODE_OPTIONS: [&str; 3] = ["disabled", "auto", "manual"];

/// How the resolved levels are obtained.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdMode {
    #[default]
    Disabled,
    Auto,
    Manual,
}

impl ThresholdMode {
    /// Decode an enum editable index. Unknown indices disable thresholds.
    pub const fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Auto,
            2 => Self::Manual,
            _ => Self::Disabled,
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::Auto => 1,
            Self::Manual => 2,
        }
    }
}

const _: () = assert!(THRESHOLD_MODE_OPTIONS.len() == 3);

// =============================================================================
// Resolved Levels
// =============================================================================

/// Warn and error levels in the units of the plotted value.
pub struct ThresholdLevels {
    warn: Cell<i32>,
    error: Cell<i32>,
}

impl ThresholdLevels {
    pub const fn new() -> Self {
        Self {
            warn: Cell::new(THRESHOLD_UNSET),
            error: Cell::new(THRESHOLD_UNSET),
        }
    }

    pub fn warn(&self) -> Option<i32> {
        level(self.warn.get())
    }

    pub fn error(&self) -> Option<i32> {
        level(self.error.get())
    }

    pub fn set(
        &self,
        warn: Option<i32>,
        error: Option<i32>,
    ) {
        self.warn.set(warn.unwrap_or(THRESHOLD_UNSET));
        self.error.set(error.unwrap_or(THRESHOLD_UNSET));
    }

    pub fn clear(&self) {
        self.set(None, None);
    }
}

impl Default for ThresholdLevels {
    fn default() -> Self {
        Self::new()
    }
}

fn level(raw: i32) -> Option<i32> {
    (raw != THRESHOLD_UNSET).then_some(raw)
}

// =============================================================================
// Threshold Configuration
// =============================================================================

/// Threshold block attached to a numeric editable.
pub struct Thresholds<'a> {
    /// Index into [`THRESHOLD_MODE_OPTIONS`].
    pub mode: &'a Cell<u8>,
    pub config_warn: NumberCell<'a>,
    pub config_error: NumberCell<'a>,
    pub levels: &'a ThresholdLevels,
}

impl Thresholds<'_> {
    pub fn mode(&self) -> ThresholdMode {
        ThresholdMode::from_index(self.mode.get())
    }

    /// Recompute the resolved levels. `auto` supplies (warn, error) for
    /// [`ThresholdMode::Auto`].
    pub fn resolve(
        &self,
        auto: (Option<i32>, Option<i32>),
    ) {
        match self.mode() {
            ThresholdMode::Disabled => self.levels.clear(),
            ThresholdMode::Auto => self.levels.set(auto.0, auto.1),
            ThresholdMode::Manual => self.levels.set(
                level(narrow(self.config_warn.get())),
                level(narrow(self.config_error.get())),
            ),
        }
        if let (Some(warn), Some(error)) = (self.levels.warn(), self.levels.error())
            && warn > error
        {
            log_warn!("warn level {} is above error level {}", warn, error);
        }
        log_debug!("thresholds resolved: warn={} error={}", self.levels.warn.get(), self.levels.error.get());
    }
}

fn narrow(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
