//! Main riding screen: speed, assist level, motor power and temperature, a
//! warning line and the motor power graph.

use std::cell::{Cell, RefCell};

use cluster_common::fonts::{BIG_FONT, EditableFonts, HEADING_FONT, REGULAR_FONT, SMALL_FONT};
use cluster_common::layout::{AUTO_HEIGHT, FILL};
use cluster_common::{
    Border,
    ButtonEvents,
    ColorMode,
    Editable,
    Field,
    Graph,
    GraphCache,
    Layout,
    Modifier,
    NumberCell,
    NumberSpec,
    Response,
    Screen,
    ScreenHooks,
    ThresholdLevels,
    Thresholds,
    WarningText,
};

use crate::screens::leak;
use crate::settings::{MAX_ASSIST_LEVEL, Settings};
use crate::telemetry::Readings;

const TOP_ROW_HEIGHT: i32 = 64;
const CELL_WIDTH: i32 = 80;

/// Temperature levels used while the mode is `auto`.
const AUTO_TEMP_LEVELS: (Option<i32>, Option<i32>) = (Some(70), Some(90));

/// Values the dashboard fields point at.
struct Live {
    /// Tenths of km/h.
    speed: Cell<u16>,
    power: Cell<u16>,
    motor_temp: Cell<i16>,
    warning: WarningText,
    power_cache: RefCell<GraphCache>,
    power_levels: ThresholdLevels,
    temp_levels: ThresholdLevels,
}

pub struct Dashboard {
    settings: &'static Settings,
    live: &'static Live,
    warning: &'static Field<'static>,
    power_thresholds: &'static Thresholds<'static>,
    temp_thresholds: &'static Thresholds<'static>,
}

impl Dashboard {
    pub fn build(settings: &'static Settings) -> (&'static Self, &'static Screen<'static>) {
        let live = leak(Live {
            speed: Cell::new(0),
            power: Cell::new(0),
            motor_temp: Cell::new(0),
            warning: WarningText::new(),
            power_cache: RefCell::new(GraphCache::new()),
            power_levels: ThresholdLevels::new(),
            temp_levels: ThresholdLevels::new(),
        });
        let power_thresholds = leak(Thresholds {
            mode: &settings.power_mode,
            config_warn: NumberCell::U16(&settings.power_warn),
            config_error: NumberCell::U16(&settings.power_error),
            levels: &live.power_levels,
        });
        let temp_thresholds = leak(Thresholds {
            mode: &settings.temp_mode,
            config_warn: NumberCell::U8(&settings.temp_warn),
            config_error: NumberCell::U8(&settings.temp_error),
            levels: &live.temp_levels,
        });

        let speed = leak(Field::editable(
            Editable::number("Speed", NumberCell::U16(&live.speed), NumberSpec::new(0, 999).decimals(1).units("km/h"))
                .read_only(),
        ));
        let assist = leak(Field::editable(Editable::number(
            "Assist",
            NumberCell::U8(&settings.assist_level),
            NumberSpec::new(0, i64::from(MAX_ASSIST_LEVEL)),
        )));
        let power = leak(Field::editable(
            Editable::number(
                "Power",
                NumberCell::U16(&live.power),
                NumberSpec::new(0, 9999).units("W").thresholds(power_thresholds),
            )
            .read_only(),
        ));
        let motor_temp = leak(Field::editable(
            Editable::number(
                "Motor",
                NumberCell::I16(&live.motor_temp),
                NumberSpec::new(-40, 200).units("C").thresholds(temp_thresholds),
            )
            .read_only(),
        ));
        let warning = leak(Field::custom(&live.warning));
        let graph = leak(Field::graph(
            Graph::new(power, &live.power_cache).min_floor(0).levels(&live.power_levels),
        ));
        let end = leak(Field::end());

        let layouts = leak([
            Layout::new(speed)
                .size(FILL, TOP_ROW_HEIGHT)
                .font(BIG_FONT)
                .modifier(Modifier::NoLabel)
                .border(Border::BOTTOM),
            Layout::new(assist)
                .at(0, TOP_ROW_HEIGHT + 2)
                .size(CELL_WIDTH, AUTO_HEIGHT)
                .modifier(Modifier::LabelOnTop),
            Layout::new(power)
                .at(CELL_WIDTH, TOP_ROW_HEIGHT + 2)
                .size(CELL_WIDTH, AUTO_HEIGHT)
                .modifier(Modifier::LabelOnTop)
                .border(Border::LEFT),
            Layout::new(motor_temp)
                .at(CELL_WIDTH * 2, TOP_ROW_HEIGHT + 2)
                .size(FILL, AUTO_HEIGHT)
                .modifier(Modifier::LabelOnTop)
                .border(Border::LEFT),
            Layout::new(warning)
                .at(0, -3)
                .size(FILL, AUTO_HEIGHT)
                .font(REGULAR_FONT)
                .border(Border::TOP.union(Border::BOTTOM)),
            Layout::new(graph).at(0, -5).size(FILL, FILL),
            Layout::new(end),
        ]);

        let dashboard = leak(Self {
            settings,
            live,
            warning,
            power_thresholds,
            temp_thresholds,
        });
        dashboard.resolve_thresholds();

        let screen = leak(
            Screen::new("main", layouts)
                .with_hooks(dashboard)
                .with_editable_fonts(EditableFonts {
                    label: SMALL_FONT,
                    value: HEADING_FONT,
                    units: SMALL_FONT,
                }),
        );
        (dashboard, screen)
    }

    /// Recompute warn/error levels from the configured threshold modes.
    pub fn resolve_thresholds(&self) {
        let peak = self.settings.peak_power();
        self.power_thresholds.resolve((Some(peak * 4 / 5), Some(peak)));
        self.temp_thresholds.resolve(AUTO_TEMP_LEVELS);
    }

    /// Push one frame of readings into the dashboard fields.
    pub fn apply(
        &self,
        readings: &Readings,
    ) {
        let live = self.live;
        live.speed.set(readings.display_speed());
        live.power.set(readings.power_w.clamp(0.0, 9999.0) as u16);
        live.motor_temp.set(readings.motor_temp_c.round() as i16);

        let temp = i32::from(live.motor_temp.get());
        let over = |level: Option<i32>| level.is_some_and(|level| temp >= level);
        let speed_limit = u16::from(self.settings.speed_limit.get()) * 10;

        if let Some(code) = readings.fault {
            live.warning.show_fault(self.warning, code);
        } else if over(live.temp_levels.error()) {
            live.warning.show(self.warning, ColorMode::Error, "Motor overheating");
        } else if over(live.temp_levels.warn()) {
            live.warning.show(self.warning, ColorMode::Warning, "Motor hot");
        } else if live.speed.get() > speed_limit {
            live.warning.show(self.warning, ColorMode::Warning, "Speed limit");
        } else {
            live.warning.clear(self.warning);
        }
    }
}

impl ScreenHooks<'static> for Dashboard {
    fn on_enter(&self) {
        self.resolve_thresholds();
    }

    /// Up/down change the assist level without entering an editor.
    fn on_press(
        &self,
        events: ButtonEvents,
    ) -> Response<'static> {
        let level = &self.settings.assist_level;
        if events.contains(ButtonEvents::UP_CLICK) {
            level.set(level.get().saturating_add(1).min(MAX_ASSIST_LEVEL));
        } else if events.contains(ButtonEvents::DOWN_CLICK) {
            level.set(level.get().saturating_sub(1));
        } else {
            return Response::Ignored;
        }
        log::debug!("assist level {}", level.get());
        Response::Handled
    }
}
