use crate::error::ChartError;
use crate::figure::{ChartKind, Figure};
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const PRICE_COLOR: RGBColor = RGBColor(31, 119, 180);
const DRAWDOWN_COLOR: RGBColor = RGBColor(214, 39, 40);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);

/// Pixels between an axis and its tick labels.
const TICK_LABEL_GAP: i32 = 6;

/// Draws `figure` into a PNG file at `path`.
pub fn render_png(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
    if figure.points.is_empty() {
        return Err(ChartError::EmptyFigure);
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw(figure, &root).map_err(|e| ChartError::Render(e.to_string()))?;
    root.present().map_err(|e| ChartError::Render(e.to_string()))?;
    Ok(())
}

// Dates are plotted as f64 day numbers so ticks can sit on any date.
fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn x_bounds(figure: &Figure) -> (f64, f64) {
    let (first, last) = figure.x_range;
    if first == last {
        // A single trading day still needs a non-empty axis.
        (day_number(first) - 1.0, day_number(last) + 1.0)
    } else {
        (day_number(first), day_number(last))
    }
}

fn y_bounds(figure: &Figure) -> (f64, f64) {
    let (low, high) = figure.y_range;
    if low < high {
        return (low, high);
    }
    match figure.kind {
        ChartKind::Drawdown => (-5.0, 0.0),
        ChartKind::Price => (low - 1.0, high + 1.0),
    }
}

/// Roughly `target` evenly spaced ticks on 1/2/5 x 10^k boundaries.
fn auto_ticks(low: f64, high: f64, target: usize) -> Vec<f64> {
    let span = high - low;
    if span <= 0.0 || target == 0 {
        return vec![low];
    }

    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude);

    let mut ticks = Vec::new();
    let mut tick = (low / step).ceil() * step;
    while tick <= high {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

fn draw<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (x_low, x_high) = x_bounds(figure);
    let (y_low, y_high) = y_bounds(figure);

    let x_keys: Vec<f64> = figure.x_ticks.iter().map(|d| day_number(*d)).collect();
    let y_keys: Vec<f64> = match &figure.y_ticks {
        Some(ticks) => ticks
            .iter()
            .copied()
            .filter(|t| *t >= y_low && *t <= y_high)
            .collect(),
        None => auto_ticks(y_low, y_high, 6),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_low..x_high, y_low..y_high)?;

    // Ticks come from the figure, so the mesh only draws the axes.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(0)
        .y_desc(figure.y_axis_label.as_str())
        .draw()?;

    chart.draw_series(
        x_keys
            .iter()
            .map(|x| PathElement::new(vec![(*x, y_low), (*x, y_high)], GRID_COLOR.stroke_width(1))),
    )?;
    chart.draw_series(
        y_keys
            .iter()
            .map(|y| PathElement::new(vec![(x_low, *y), (x_high, *y)], GRID_COLOR.stroke_width(1))),
    )?;

    let data: Vec<(f64, f64)> = figure
        .points
        .iter()
        .map(|(date, value)| (day_number(*date), *value))
        .collect();

    let color = match figure.kind {
        ChartKind::Price => PRICE_COLOR,
        ChartKind::Drawdown => DRAWDOWN_COLOR,
    };

    if figure.fills_to_zero() {
        chart.draw_series(AreaSeries::new(data.iter().copied(), 0.0, color.mix(0.3)))?;
    }

    chart
        .draw_series(LineSeries::new(data, color.stroke_width(2)))?
        .label(figure.series_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    // Tick labels sit in the label areas, outside the plotting area.
    let x_label_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (x, date) in x_keys.iter().zip(&figure.x_ticks) {
        let (px, py) = chart.backend_coord(&(*x, y_low));
        root.draw(&Text::new(
            figure.date_format.format(*date),
            (px, py + TICK_LABEL_GAP),
            x_label_style.clone(),
        ))?;
    }

    let y_label_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));
    for y in &y_keys {
        let (px, py) = chart.backend_coord(&(x_low, *y));
        root.draw(&Text::new(
            figure.value_style.format(*y),
            (px - TICK_LABEL_GAP, py),
            y_label_style.clone(),
        ))?;
    }

    Ok(())
}
