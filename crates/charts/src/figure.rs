use crate::axis::{AxisPlan, DateLabelFormat};
use chrono::NaiveDate;
use core_types::{DatedSeries, Instrument};
use serde::Serialize;

/// Which of the two charts a figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Price,
    Drawdown,
}

impl ChartKind {
    /// Used in chart file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Price => "price",
            ChartKind::Drawdown => "drawdown",
        }
    }
}

/// How values on the y-axis are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueStyle {
    /// Whole currency units with thousands separators: `4,742`.
    Thousands,
    /// Whole percentage points: `-15`.
    Percent,
}

impl ValueStyle {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueStyle::Thousands => format_thousands(value),
            ValueStyle::Percent => format!("{:.0}", value),
        }
    }
}

/// A chart ready to be drawn by any backend.
///
/// Drawdown figures carry values already scaled to percentage points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub series_label: String,
    pub y_axis_label: String,
    pub points: Vec<(NaiveDate, f64)>,
    /// Exactly the first and last date of the series, without padding.
    pub x_range: (NaiveDate, NaiveDate),
    pub x_ticks: Vec<NaiveDate>,
    pub date_format: DateLabelFormat,
    pub y_range: (f64, f64),
    pub y_ticks: Option<Vec<f64>>,
    pub value_style: ValueStyle,
}

impl Figure {
    pub fn x_tick_labels(&self) -> Vec<String> {
        self.x_ticks
            .iter()
            .map(|date| self.date_format.format(*date))
            .collect()
    }

    /// Drawdown charts are filled from the curve up to zero.
    pub fn fills_to_zero(&self) -> bool {
        self.kind == ChartKind::Drawdown
    }
}

/// Fraction of the value span added above and below a price curve.
const PRICE_MARGIN: f64 = 0.05;

/// Spacing of the drawdown y-axis ticks, in percentage points.
const DRAWDOWN_TICK_STEP: f64 = 5.0;

/// Builds figures for one instrument.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    instrument: Instrument,
}

impl ChartRenderer {
    pub fn new(instrument: Instrument) -> Self {
        Self { instrument }
    }

    /// Lays out `series` as a `kind` chart using the shared axis plan.
    ///
    /// Returns `None` for an empty series: no data is not a failure.
    pub fn render<S: DatedSeries>(
        &self,
        series: &S,
        kind: ChartKind,
        plan: &AxisPlan,
    ) -> Option<Figure> {
        let (first, last) = series.date_range()?;
        let name = self.instrument.display_name();

        let mut x_ticks = plan.tick_dates(first, last);
        if x_ticks.is_empty() {
            // Too short to contain a tick month; label the ends instead.
            x_ticks = if first == last { vec![first] } else { vec![first, last] };
        }

        let figure = match kind {
            ChartKind::Price => {
                let points: Vec<_> = series.points().iter().map(|p| (p.date, p.value)).collect();
                Figure {
                    kind,
                    title: format!("{} Price", name),
                    series_label: name.to_string(),
                    y_axis_label: "Price ($)".to_string(),
                    y_range: padded_range(&points),
                    points,
                    x_range: (first, last),
                    x_ticks,
                    date_format: plan.label_format,
                    y_ticks: None,
                    value_style: ValueStyle::Thousands,
                }
            }
            ChartKind::Drawdown => {
                let points: Vec<_> = series
                    .points()
                    .iter()
                    .map(|p| (p.date, p.value * 100.0))
                    .collect();
                let deepest = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::min);
                Figure {
                    kind,
                    title: format!("{} Drawdown", name),
                    series_label: "Drawdown".to_string(),
                    y_axis_label: "Drawdown (%)".to_string(),
                    points,
                    x_range: (first, last),
                    x_ticks,
                    date_format: plan.label_format,
                    y_range: (deepest, 0.0),
                    y_ticks: Some(drawdown_ticks(deepest)),
                    value_style: ValueStyle::Percent,
                }
            }
        };
        Some(figure)
    }
}

/// Ticks every five points from 0 down to the first multiple of five at or
/// below `deepest_pct`.
pub fn drawdown_ticks(deepest_pct: f64) -> Vec<f64> {
    let steps = (-deepest_pct / DRAWDOWN_TICK_STEP).ceil().max(0.0) as u32;
    (0..=steps)
        .map(|i| -(f64::from(i) * DRAWDOWN_TICK_STEP))
        .collect()
}

fn padded_range(points: &[(NaiveDate, f64)]) -> (f64, f64) {
    let (low, high) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
    let span = high - low;
    let margin = if span > 0.0 {
        span * PRICE_MARGIN
    } else {
        (low.abs() * PRICE_MARGIN).max(1.0)
    };
    (low - margin, high + margin)
}

/// Truncates toward zero and groups digits in threes: `12345.9` -> `12,345`.
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
