//! Backend-independent chart descriptions.
//!
//! A [`ChartPlan`] holds everything a sink needs to draw one image: tick
//! labels, one value sequence per series, the y-axis scale and range, and
//! the grouped-bar geometry. Plans are built from canonical rows, so every
//! series has exactly one value per tick.

use std::ops::Range;

use perfplot_core::{DisplayLabels, RecordShape, Row};
use tracing::warn;

use crate::canonical::validate;
use crate::error::RenderError;
use crate::format::format_value;

/// Total width of one bar group in tick units.
pub const GROUP_WIDTH: f64 = 0.8;

/// Keys must span this ratio before line charts switch to a log axis.
pub const LOG_SPAN_RATIO: f64 = 100.0;

const LINEAR_HEADROOM: f64 = 1.15;
const LOG_HEADROOM: f64 = 2.0;

/// Plotted value dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Metric,
    Time,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Metric, Family::Time];

    /// File name component.
    pub fn suffix(self) -> &'static str {
        match self {
            Family::Metric => "perf",
            Family::Time => "times",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Family::Metric => "Metric comparison",
            Family::Time => "Time comparison",
        }
    }

    pub fn y_desc(self) -> &'static str {
        match self {
            Family::Metric => "Cells per second",
            Family::Time => "Time (s)",
        }
    }

    /// Value indices within one variant tuple that belong to this family.
    pub fn value_indices(self, shape: RecordShape) -> Vec<usize> {
        match self {
            Family::Metric => shape.metric_indices().collect(),
            Family::Time => vec![shape.time_index()],
        }
    }
}

/// Chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartMode {
    Bar,
    Line,
}

impl ChartMode {
    pub const ALL: [ChartMode; 2] = [ChartMode::Bar, ChartMode::Line];

    /// File name component.
    pub fn suffix(self) -> &'static str {
        match self {
            ChartMode::Bar => "bar",
            ChartMode::Line => "line",
        }
    }
}

/// Y-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    /// Map a data value onto the drawing axis.
    pub fn project(self, value: f64) -> f64 {
        match self {
            AxisScale::Linear => value,
            AxisScale::Log => value.log10(),
        }
    }

    /// Inverse of [`AxisScale::project`].
    pub fn unproject(self, position: f64) -> f64 {
        match self {
            AxisScale::Linear => position,
            AxisScale::Log => 10f64.powf(position),
        }
    }
}

/// One plotted sequence: a (variant, field) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// One value per tick.
    pub values: Vec<f64>,
}

/// A single bar with its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub series: usize,
    pub tick: usize,
    pub left: f64,
    pub right: f64,
    pub value: f64,
    pub label: String,
}

impl Bar {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub family: Family,
    pub mode: ChartMode,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub keys: Vec<u64>,
    pub tick_labels: Vec<String>,
    pub series: Vec<Series>,
    pub y_scale: AxisScale,
    /// Y range in data units.
    pub y_range: Range<f64>,
}

impl ChartPlan {
    pub fn bar_width(&self) -> f64 {
        GROUP_WIDTH / self.series.len().max(1) as f64
    }

    /// Offset of a series' bar center from its tick.
    pub fn bar_offset(&self, series: usize) -> f64 {
        let count = self.series.len() as f64;
        (series as f64 - (count - 1.0) / 2.0) * self.bar_width()
    }

    /// Baseline bars grow from, in data units.
    pub fn bar_base(&self) -> f64 {
        match self.y_scale {
            AxisScale::Linear => 0.0,
            AxisScale::Log => self.y_range.start,
        }
    }

    /// Every drawable bar, grouped by tick and ordered by series.
    ///
    /// Non-finite values are skipped, as are non-positive ones on a log axis.
    pub fn bars(&self) -> Vec<Bar> {
        let width = self.bar_width();
        let mut bars = Vec::with_capacity(self.keys.len() * self.series.len());
        for tick in 0..self.keys.len() {
            for (idx, series) in self.series.iter().enumerate() {
                let value = series.values[tick];
                if !self.drawable(value) {
                    continue;
                }
                let center = tick as f64 + self.bar_offset(idx);
                bars.push(Bar {
                    series: idx,
                    tick,
                    left: center - width / 2.0,
                    right: center + width / 2.0,
                    value,
                    label: format_value(value),
                });
            }
        }
        bars
    }

    /// `(tick, value)` points of one series for line charts.
    pub fn points(&self, series: usize) -> Vec<(f64, f64)> {
        self.series[series]
            .values
            .iter()
            .enumerate()
            .filter(|(_, value)| self.drawable(**value))
            .map(|(tick, value)| (tick as f64, *value))
            .collect()
    }

    /// X range covering every tick with half a unit of padding.
    pub fn x_range(&self) -> Range<f64> {
        -0.5..(self.keys.len() as f64 - 0.5)
    }

    /// Y range on the drawing axis.
    pub fn projected_y_range(&self) -> Range<f64> {
        self.y_scale.project(self.y_range.start)..self.y_scale.project(self.y_range.end)
    }

    /// Tick label nearest to the x position `x`, or empty between ticks.
    pub fn tick_label(&self, x: f64) -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 0.3 {
            return String::new();
        }
        self.tick_labels
            .get(idx as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn drawable(&self, value: f64) -> bool {
        value.is_finite() && (self.y_scale == AxisScale::Linear || value > 0.0)
    }
}

/// Build the metric and time plans for one chart mode.
///
/// `rows` should be canonical; see [`canonicalize`](crate::canonicalize).
///
/// # Errors
///
/// Returns `InconsistentArity` unless every row holds
/// `variants.len() * shape.value_count()` values, and `ConflictingRows` if
/// adjacent rows share a key.
pub fn build_plans(
    rows: &[Row],
    shape: RecordShape,
    variants: &[String],
    labels: &DisplayLabels,
    mode: ChartMode,
) -> Result<Vec<ChartPlan>, RenderError> {
    validate(rows, variants.len() * shape.value_count())?;

    let keys: Vec<u64> = rows.iter().map(|row| row.key).collect();
    let tick_labels: Vec<String> = keys.iter().map(|key| labels.label(*key)).collect();

    let plans = Family::ALL
        .iter()
        .map(|family| {
            let series = family_series(rows, shape, variants, *family);
            let y_scale = choose_scale(*family, mode, &keys, &series);
            let y_range = value_range(&series, y_scale);
            ChartPlan {
                family: *family,
                mode,
                title: family.title().to_string(),
                x_desc: "Datasets".to_string(),
                y_desc: family.y_desc().to_string(),
                keys: keys.clone(),
                tick_labels: tick_labels.clone(),
                series,
                y_scale,
                y_range,
            }
        })
        .collect();
    Ok(plans)
}

fn family_series(
    rows: &[Row],
    shape: RecordShape,
    variants: &[String],
    family: Family,
) -> Vec<Series> {
    let width = shape.value_count();
    let fields = shape.field_names();
    let mut series = Vec::new();
    for (variant_idx, variant) in variants.iter().enumerate() {
        for field in family.value_indices(shape) {
            let column = variant_idx * width + field;
            series.push(Series {
                name: format!("{} {}", variant, fields[field]),
                values: rows.iter().map(|row| row.values[column]).collect(),
            });
        }
    }
    series
}

fn all_positive(series: &[Series]) -> bool {
    series
        .iter()
        .flat_map(|s| &s.values)
        .all(|value| value.is_finite() && *value > 0.0)
}

/// True when the largest key is at least [`LOG_SPAN_RATIO`] times the smallest.
pub fn spans_orders_of_magnitude(keys: &[u64]) -> bool {
    match (keys.iter().min(), keys.iter().max()) {
        (Some(&min), Some(&max)) if min > 0 => max as f64 / min as f64 >= LOG_SPAN_RATIO,
        _ => false,
    }
}

fn choose_scale(family: Family, mode: ChartMode, keys: &[u64], series: &[Series]) -> AxisScale {
    let wants_log = match mode {
        ChartMode::Bar => family == Family::Time,
        ChartMode::Line => spans_orders_of_magnitude(keys),
    };
    if !wants_log {
        return AxisScale::Linear;
    }
    if all_positive(series) {
        AxisScale::Log
    } else {
        warn!(
            family = family.suffix(),
            mode = mode.suffix(),
            "non-positive values present, using a linear axis"
        );
        AxisScale::Linear
    }
}

fn value_range(series: &[Series], scale: AxisScale) -> Range<f64> {
    let finite = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|value| value.is_finite());

    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    });
    if min > max {
        return match scale {
            AxisScale::Linear => 0.0..1.0,
            AxisScale::Log => 0.1..10.0,
        };
    }

    match scale {
        AxisScale::Linear => {
            let low = (min * LINEAR_HEADROOM).min(0.0);
            let high = (max * LINEAR_HEADROOM).max(0.0);
            if high > low { low..high } else { 0.0..1.0 }
        }
        AxisScale::Log => (min / LOG_HEADROOM)..(max * LOG_HEADROOM),
    }
}
