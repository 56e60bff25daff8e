//! Rolling telemetry graph.
//!
//! Each graph owns a [`GraphCache`]: a fixed-size sliding window of samples
//! with running max/min. The plot is drawn one column per sample with a
//! stacked severity fill: error color above the error level, warn color
//! above the warn level, normal color down to the baseline.
//!
//! ```text
//!        label
//!  max |   ▄█
//!      |  ███▄ ▄
//!  min | ███████
//!      +--------
//! ```

use core::cell::RefCell;

use heapless::Deque;

use crate::colors::{GRAPH_ACCENT, GRAPH_AXIS, GRAPH_BACKGROUND, GRAPH_ERROR, GRAPH_NORMAL, GRAPH_WARN};
use crate::config::GRAPH_MAX_POINTS;
use crate::draw::DrawingPort;
use crate::field::Field;
use crate::fonts::{GRAPH_LABEL_FONT, GRAPH_MAXVAL_FONT, char_height, char_width};
use crate::layout::{Area, Coord};
use crate::thresholds::ThresholdLevels;
use crate::widgets::{put_string_centered, put_string_right};

/// Digits reserved for the max/min values left of the plot.
const AXIS_DIGITS: Coord = 5;

// =============================================================================
// Sample Cache
// =============================================================================

/// Sliding window of the last `N` samples plus running extremes.
pub struct GraphCache<const N: usize = GRAPH_MAX_POINTS> {
    points: Deque<i32, N>,
    max: i32,
    min: i32,
}

impl<const N: usize> GraphCache<N> {
    pub const fn new() -> Self {
        Self {
            points: Deque::new(),
            max: i32::MIN,
            min: i32::MAX,
        }
    }

    /// Append a sample, evicting the oldest one when full. Samples below
    /// `floor` still plot but do not lower the running min.
    pub fn add_point(
        &mut self,
        value: i32,
        floor: i32,
    ) {
        if self.points.is_full() {
            self.points.pop_front();
        }
        self.points.push_back(value).ok();

        self.max = self.max.max(value);
        if value >= floor {
            self.min = self.min.min(value);
        }
    }

    /// Drop all samples and reseed the extremes.
    pub fn reset(&mut self) {
        self.points.clear();
        self.max = i32::MIN;
        self.min = i32::MAX;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn max(&self) -> Option<i32> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Running min; `None` until a sample at or above the floor arrived.
    pub fn min(&self) -> Option<i32> {
        (self.min != i32::MAX).then_some(self.min)
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().copied()
    }

    /// Map `value` to a pixel row between `baseline` (min) and `top` (max).
    /// Without any spread every value maps to the baseline.
    pub fn scale(
        &self,
        value: i32,
        baseline: Coord,
        top: Coord,
    ) -> Coord {
        let (Some(max), Some(min)) = (self.max(), self.min()) else {
            return baseline;
        };
        if max <= min {
            return baseline;
        }
        let (max, min, value) = (i64::from(max), i64::from(min), i64::from(value));
        let row = (i64::from(baseline) * (max - value) + i64::from(top) * (value - min)) / (max - min);
        row as Coord
    }
}

impl<const N: usize> Default for GraphCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Graph Payload
// =============================================================================

/// Graph field payload: which value to sample and where to keep samples.
pub struct Graph<'a> {
    /// Editable whose value and label the graph shows.
    pub source: &'a Field<'a>,
    pub cache: &'a RefCell<GraphCache>,
    /// Samples below this do not lower the running min.
    pub min_floor: i32,
    pub levels: Option<&'a ThresholdLevels>,
}

impl<'a> Graph<'a> {
    pub const fn new(
        source: &'a Field<'a>,
        cache: &'a RefCell<GraphCache>,
    ) -> Self {
        Self {
            source,
            cache,
            min_floor: i32::MIN,
            levels: None,
        }
    }

    pub const fn min_floor(
        mut self,
        floor: i32,
    ) -> Self {
        self.min_floor = floor;
        self
    }

    pub const fn levels(
        mut self,
        levels: &'a ThresholdLevels,
    ) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Sample when due and redraw. Returns whether anything was drawn.
    pub(crate) fn render(
        &self,
        port: &mut dyn DrawingPort,
        field: &Field<'_>,
        area: &Area,
        sample_due: bool,
    ) -> bool {
        let dirty = field.is_dirty();
        if !sample_due && !dirty {
            return false;
        }

        let source = self.source.expect_editable();
        let mut cache = self.cache.borrow_mut();
        if sample_due {
            let value = source.value().clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
            cache.add_point(value, self.min_floor);
        }

        let label_height = char_height(GRAPH_LABEL_FONT);
        let value_height = char_height(GRAPH_MAXVAL_FONT);
        let x_axis = area.x + AXIS_DIGITS * char_width(GRAPH_MAXVAL_FONT);
        let x_min = x_axis + 1;
        let x_max = area.right().min(x_min + cache.capacity() as Coord);
        let y_max = area.y + label_height + 1;
        let y_min = area.bottom() - 1;
        if x_max <= x_min || y_min <= y_max {
            return false;
        }

        if dirty {
            port.fill_rect(area.x, area.y, area.width, area.height, GRAPH_BACKGROUND);
            port.set_foreground(GRAPH_ACCENT);
            port.set_background(Some(GRAPH_BACKGROUND));
            put_string_centered(port, area.x, area.width, area.y, GRAPH_LABEL_FONT, source.label);
            port.draw_line(x_axis, y_max, x_axis, y_min, GRAPH_AXIS);
            port.draw_line(x_axis, y_min, x_max - 1, y_min, GRAPH_AXIS);
        }

        // Axis values
        port.fill_rect(area.x, y_max, x_axis - area.x, y_min - y_max, GRAPH_BACKGROUND);
        port.set_foreground(GRAPH_ACCENT);
        port.set_background(Some(GRAPH_BACKGROUND));
        if let Some(max) = cache.max() {
            put_string_right(port, x_axis - 1, y_max, GRAPH_MAXVAL_FONT, &source.format(i64::from(max)));
        }
        if let Some(min) = cache.min() {
            put_string_right(port, x_axis - 1, y_min - value_height, GRAPH_MAXVAL_FONT, &source.format(i64::from(min)));
        }

        // Columns
        let last_row = y_min - 1;
        let clamp_row = |value: i32| cache.scale(value, last_row, y_max).clamp(y_max, last_row);
        let error_row = self.levels.and_then(ThresholdLevels::error).map(clamp_row);
        let warn_row = self.levels.and_then(ThresholdLevels::warn).map(clamp_row);

        for (x, value) in (x_min..x_max).zip(cache.iter()) {
            let mut row = clamp_row(value);
            if row > y_max {
                port.draw_line(x, y_max, x, row - 1, GRAPH_BACKGROUND);
            }
            for (level_row, color) in [(error_row, GRAPH_ERROR), (warn_row, GRAPH_WARN)] {
                match level_row {
                    Some(level_row) if row <= level_row => {
                        port.draw_line(x, row, x, level_row, color);
                        row = level_row + 1;
                    }
                    _ => {}
                }
            }
            if row <= last_row {
                port.draw_line(x, row, x, last_row, GRAPH_NORMAL);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::editable::{Editable, NumberCell, NumberSpec};
    use crate::fonts::SMALL_FONT;
    use crate::layout::{Border, ColorMode, Modifier};
    use crate::testing::{Op, RecordingPort};

    #[test]
    fn test_capacity_two_evicts_oldest() {
        let mut cache: GraphCache<2> = GraphCache::new();
        for value in [5, 3, 8] {
            cache.add_point(value, 0);
        }
        assert_eq!(cache.iter().collect::<Vec<_>>(), [3, 8]);
        assert_eq!(cache.max(), Some(8));
        assert_eq!(cache.min(), Some(3));
    }

    #[test]
    fn test_floor_filters_min_only() {
        let mut cache: GraphCache<4> = GraphCache::new();
        cache.add_point(-50, 0);
        assert_eq!(cache.min(), None);
        assert_eq!(cache.max(), Some(-50));
        cache.add_point(12, 0);
        assert_eq!(cache.min(), Some(12));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reset_empties_cache() {
        let mut cache: GraphCache<4> = GraphCache::new();
        cache.add_point(1, 0);
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.max(), None);
        assert_eq!(cache.min(), None);
    }

    #[test]
    fn test_scale_maps_extremes() {
        let mut cache: GraphCache<4> = GraphCache::new();
        assert_eq!(cache.scale(10, 100, 20), 100);

        cache.add_point(10, 0);
        assert_eq!(cache.scale(10, 100, 20), 100);

        cache.add_point(50, 0);
        assert_eq!(cache.scale(10, 100, 20), 100);
        assert_eq!(cache.scale(50, 100, 20), 20);
        assert_eq!(cache.scale(30, 100, 20), 60);
    }

    fn graph_area() -> Area {
        Area {
            x: 0,
            y: 0,
            width: 200,
            height: 80,
            font: Some(SMALL_FONT),
            color: ColorMode::Normal,
            border: Border::empty(),
            modifier: Modifier::None,
        }
    }

    #[test]
    fn test_render_samples_only_when_due() {
        let power = Cell::new(120u16);
        let source = Field::editable(Editable::number("Power", NumberCell::U16(&power), NumberSpec::new(0, 2000)));
        let cache = RefCell::new(GraphCache::new());
        let graph = Graph::new(&source, &cache).min_floor(0);
        let field = Field::graph(Graph::new(&source, &cache));
        let mut port = RecordingPort::new();

        assert!(graph.render(&mut port, &field, &graph_area(), false));
        assert!(cache.borrow().is_empty());
        assert!(port.has_text("Power"));

        field.clear_dirty();
        port.clear();
        assert!(!graph.render(&mut port, &field, &graph_area(), false));
        assert_eq!(port.draw_count(), 0);

        assert!(graph.render(&mut port, &field, &graph_area(), true));
        assert_eq!(cache.borrow().len(), 1);
    }

    #[test]
    fn test_threshold_segments_stack() {
        let power = Cell::new(0u16);
        let source = Field::editable(Editable::number("P", NumberCell::U16(&power), NumberSpec::new(0, 1000)));
        let cache = RefCell::new(GraphCache::new());
        let levels = ThresholdLevels::new();
        levels.set(Some(50), Some(80));
        let graph = Graph::new(&source, &cache).min_floor(0).levels(&levels);
        let field = Field::graph(Graph::new(&source, &cache));
        field.clear_dirty();

        power.set(0);
        graph.render(&mut RecordingPort::new(), &field, &graph_area(), true);
        power.set(100);
        let mut port = RecordingPort::new();
        graph.render(&mut port, &field, &graph_area(), true);

        let colors_in_last_column: Vec<_> = port
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Line { x0, color, .. } if *x0 == 32 => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors_in_last_column, [GRAPH_ERROR, GRAPH_WARN, GRAPH_NORMAL]);
    }
}
