//! Editable settings and the single-slot edit state machine.
//!
//! An [`Editable`] points at a setting cell owned by the application (usually
//! part of the persisted settings block) and knows how to step, wrap and
//! format it. The [`Editor`] holds at most one field being edited at a time.

use core::cell::Cell;
use core::fmt::Write;

use crate::field::{Field, FieldText};
use crate::input::{ButtonEvents, ButtonLevels, ButtonMap};
use crate::thresholds::Thresholds;

/// Blink ticks a direction button must stay down before it auto-repeats.
const HOLD_REPEAT_TICKS: u8 = 2;

// =============================================================================
// Setting Cells
// =============================================================================

/// Typed handle to an application-owned numeric setting.
#[derive(Clone, Copy)]
pub enum NumberCell<'a> {
    U8(&'a Cell<u8>),
    I8(&'a Cell<i8>),
    U16(&'a Cell<u16>),
    I16(&'a Cell<i16>),
    U32(&'a Cell<u32>),
    I32(&'a Cell<i32>),
}

impl NumberCell<'_> {
    pub fn get(&self) -> i64 {
        match self {
            Self::U8(cell) => i64::from(cell.get()),
            Self::I8(cell) => i64::from(cell.get()),
            Self::U16(cell) => i64::from(cell.get()),
            Self::I16(cell) => i64::from(cell.get()),
            Self::U32(cell) => i64::from(cell.get()),
            Self::I32(cell) => i64::from(cell.get()),
        }
    }

    /// Store `value`, saturating at the bounds of the cell width.
    pub fn set(
        &self,
        value: i64,
    ) {
        match self {
            Self::U8(cell) => cell.set(value.clamp(0, i64::from(u8::MAX)) as u8),
            Self::I8(cell) => cell.set(value.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8),
            Self::U16(cell) => cell.set(value.clamp(0, i64::from(u16::MAX)) as u16),
            Self::I16(cell) => cell.set(value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16),
            Self::U32(cell) => cell.set(value.clamp(0, i64::from(u32::MAX)) as u32),
            Self::I32(cell) => cell.set(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32),
        }
    }
}

// =============================================================================
// Editable Payload
// =============================================================================

/// Numeric editable parameters.
pub struct NumberSpec<'a> {
    pub units: &'a str,
    pub min: i64,
    pub max: i64,
    /// Increment per step; 0 means 1.
    pub step: i64,
    /// Display scale: the stored value is divided by 10^decimals.
    pub decimals: u8,
    /// Show only the integer part of a scaled value.
    pub hide_fraction: bool,
    /// Called with the new value just before it is stored.
    pub on_pre_set: Option<&'a dyn Fn(i64)>,
    pub thresholds: Option<&'a Thresholds<'a>>,
}

impl<'a> NumberSpec<'a> {
    pub const fn new(
        min: i64,
        max: i64,
    ) -> Self {
        assert!(min <= max, "editable range is empty");
        Self {
            units: "",
            min,
            max,
            step: 1,
            decimals: 0,
            hide_fraction: false,
            on_pre_set: None,
            thresholds: None,
        }
    }

    pub const fn units(
        mut self,
        units: &'a str,
    ) -> Self {
        self.units = units;
        self
    }

    pub const fn step(
        mut self,
        step: i64,
    ) -> Self {
        self.step = step;
        self
    }

    pub const fn decimals(
        mut self,
        decimals: u8,
    ) -> Self {
        assert!(decimals <= 9, "display scale too large");
        self.decimals = decimals;
        self
    }

    pub const fn hide_fraction(mut self) -> Self {
        self.hide_fraction = true;
        self
    }

    pub const fn on_pre_set(
        mut self,
        callback: &'a dyn Fn(i64),
    ) -> Self {
        self.on_pre_set = Some(callback);
        self
    }

    pub const fn thresholds(
        mut self,
        thresholds: &'a Thresholds<'a>,
    ) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    const fn effective_step(&self) -> i64 {
        if self.step == 0 { 1 } else { self.step }
    }

    fn next(
        &self,
        value: i64,
        increment: bool,
    ) -> i64 {
        let next = if increment {
            let next = value.saturating_add(self.effective_step());
            if next > self.max { self.min } else { next }
        } else {
            let next = value.saturating_sub(self.effective_step());
            if next < self.min { self.max } else { next }
        };
        next.clamp(self.min, self.max)
    }

    fn format(
        &self,
        value: i64,
        out: &mut FieldText,
    ) {
        if self.decimals == 0 {
            write!(out, "{value}").ok();
            return;
        }

        let divisor = 10i64.pow(u32::from(self.decimals));
        if self.hide_fraction {
            write!(out, "{}", value / divisor).ok();
        } else {
            let sign = if value < 0 { "-" } else { "" };
            let magnitude = value.unsigned_abs();
            let divisor = divisor.unsigned_abs();
            write!(
                out,
                "{sign}{}.{:0width$}",
                magnitude / divisor,
                magnitude % divisor,
                width = usize::from(self.decimals)
            )
            .ok();
        }
    }
}

/// Interpretation of the setting cell.
pub enum EditKind<'a> {
    Number(NumberSpec<'a>),
    /// Index into a list of option labels.
    Enum(&'a [&'a str]),
}

/// A setting the rider can change in place.
pub struct Editable<'a> {
    pub label: &'a str,
    pub target: NumberCell<'a>,
    pub read_only: bool,
    pub kind: EditKind<'a>,
}

impl<'a> Editable<'a> {
    pub const fn number(
        label: &'a str,
        target: NumberCell<'a>,
        spec: NumberSpec<'a>,
    ) -> Self {
        Self {
            label,
            target,
            read_only: false,
            kind: EditKind::Number(spec),
        }
    }

    pub const fn options(
        label: &'a str,
        target: NumberCell<'a>,
        options: &'a [&'a str],
    ) -> Self {
        assert!(!options.is_empty(), "enum editable needs at least one option");
        Self {
            label,
            target,
            read_only: false,
            kind: EditKind::Enum(options),
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn value(&self) -> i64 {
        self.target.get()
    }

    pub fn units(&self) -> &'a str {
        match &self.kind {
            EditKind::Number(spec) => spec.units,
            EditKind::Enum(_) => "",
        }
    }

    pub fn thresholds(&self) -> Option<&'a Thresholds<'a>> {
        match &self.kind {
            EditKind::Number(spec) => spec.thresholds,
            EditKind::Enum(_) => None,
        }
    }

    /// Apply one step up or down with wraparound and store the result.
    pub fn step(
        &self,
        increment: bool,
    ) {
        let value = self.target.get();
        let next = match &self.kind {
            EditKind::Number(spec) => {
                let next = spec.next(value, increment);
                if let Some(callback) = spec.on_pre_set {
                    callback(next);
                }
                next
            }
            EditKind::Enum(options) => {
                let count = options.len() as i64;
                let index = value.rem_euclid(count);
                if increment { (index + 1) % count } else { (index + count - 1) % count }
            }
        };
        self.target.set(next);
        log_debug!("{} = {}", self.label, next);
    }

    /// Text shown for `value`, using the same scaling as the live display.
    pub fn format(
        &self,
        value: i64,
    ) -> FieldText {
        let mut out = FieldText::new();
        match &self.kind {
            EditKind::Number(spec) => spec.format(value, &mut out),
            EditKind::Enum(options) => {
                let label = usize::try_from(value).ok().and_then(|index| options.get(index));
                out.push_str(label.copied().unwrap_or("?")).ok();
            }
        }
        out
    }

    /// Text for the current value.
    pub fn display(&self) -> FieldText {
        self.format(self.value())
    }
}

// =============================================================================
// Edit State Machine
// =============================================================================

/// The one field currently being edited, plus press-and-hold bookkeeping.
#[derive(Default)]
pub struct Editor<'a> {
    active: Option<&'a Field<'a>>,
    held_up: u8,
    held_down: u8,
}

impl<'a> Editor<'a> {
    pub const fn new() -> Self {
        Self {
            active: None,
            held_up: 0,
            held_down: 0,
        }
    }

    pub const fn active(&self) -> Option<&'a Field<'a>> {
        self.active
    }

    pub fn is_editing(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_editing_field(
        &self,
        field: &Field<'_>,
    ) -> bool {
        self.active.is_some_and(|active| core::ptr::addr_eq(active, field))
    }

    /// Begin editing `field`. Only valid while idle and for writable editables.
    pub fn start(
        &mut self,
        field: &'a Field<'a>,
    ) {
        assert!(self.active.is_none(), "already editing a field");
        let editable = field.expect_editable();
        assert!(!editable.read_only, "read-only editable cannot be edited");

        self.active = Some(field);
        self.held_up = 0;
        self.held_down = 0;
        field.set_blink(true);
        field.mark_dirty();
        log_info!("edit start: {}", editable.label);
    }

    /// Return to idle. Returns the field that was being edited.
    pub fn stop(&mut self) -> Option<&'a Field<'a>> {
        let field = self.active.take()?;
        field.set_blink(false);
        field.mark_dirty();
        log_info!("edit stop: {}", field.expect_editable().label);
        Some(field)
    }

    /// Handle discrete events while editing. Returns whether they were claimed.
    pub fn on_press(
        &mut self,
        events: ButtonEvents,
        map: &ButtonMap,
    ) -> bool {
        let Some(field) = self.active else {
            return false;
        };
        let editable = field.expect_editable();

        let mut handled = false;
        if events.contains(ButtonEvents::UP_CLICK) {
            editable.step(true);
            handled = true;
        }
        if events.contains(ButtonEvents::DOWN_CLICK) {
            editable.step(false);
            handled = true;
        }
        if events.intersects(map.stop_edit) {
            self.stop();
            return true;
        }

        if handled {
            field.mark_dirty();
        }
        // A second start-edit while editing is swallowed
        handled || events.intersects(map.start_edit)
    }

    /// Repeat steps while a direction button is held, once per blink tick.
    pub fn poll_held(
        &mut self,
        levels: ButtonLevels,
        blink_changed: bool,
    ) {
        let Some(field) = self.active else {
            self.held_up = 0;
            self.held_down = 0;
            return;
        };
        if !blink_changed {
            return;
        }

        let editable = field.expect_editable();
        if repeat(&mut self.held_up, levels.up) {
            editable.step(true);
            field.mark_dirty();
        }
        if repeat(&mut self.held_down, levels.down) {
            editable.step(false);
            field.mark_dirty();
        }
    }
}

fn repeat(
    held_ticks: &mut u8,
    held: bool,
) -> bool {
    if !held {
        *held_ticks = 0;
        return false;
    }
    *held_ticks = held_ticks.saturating_add(1);
    *held_ticks >= HOLD_REPEAT_TICKS
}
