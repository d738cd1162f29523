//! # Drawdown Engine
//!
//! Wires one request through the system: resolve the instrument, fetch the
//! prices once, derive the drawdown from those same prices, plan the shared
//! date axis and lay out both figures.
//!
//! The engine does not touch the file system; callers decide where figures go.

use analytics::DrawdownEngine;
use api_client::PriceSource;
use charts::{AxisPlanner, ChartKind, ChartRenderer, Figure};
use chrono::NaiveDate;
use core_types::{parse_date, DatedSeries, DrawdownSeries, Instrument, PriceSeries};
use serde::Serialize;
use std::sync::Arc;

pub mod error;

pub use error::EngineError;

/// Everything one pipeline run produced.
///
/// When the provider had no data both series are empty and both figures are
/// `None`; that is a valid outcome, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSet {
    pub instrument: Instrument,
    pub start_date: NaiveDate,
    pub prices: PriceSeries,
    pub drawdown: DrawdownSeries,
    pub price_figure: Option<Figure>,
    pub drawdown_figure: Option<Figure>,
}

impl ChartSet {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// The figures that were produced, price first.
    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.price_figure.iter().chain(self.drawdown_figure.iter())
    }
}

/// The fetch → transform → render pipeline.
#[derive(Clone)]
pub struct DrawdownPipeline {
    source: Arc<dyn PriceSource>,
    calculator: DrawdownEngine,
    planner: AxisPlanner,
}

impl DrawdownPipeline {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            calculator: DrawdownEngine::new(),
            planner: AxisPlanner::new(),
        }
    }

    /// Runs the pipeline for raw request inputs.
    ///
    /// Both inputs are validated before anything is fetched: an unknown key or
    /// a date outside `YYYY-MM-DD` is an `EngineError::Validation`.
    pub async fn run_request(&self, key: &str, start_date: &str) -> Result<ChartSet, EngineError> {
        let instrument: Instrument = key.trim().parse()?;
        let start_date = parse_date(start_date.trim())?;
        self.run(instrument, start_date).await
    }

    pub async fn run(
        &self,
        instrument: Instrument,
        start_date: NaiveDate,
    ) -> Result<ChartSet, EngineError> {
        tracing::info!(instrument = %instrument, %start_date, "Running drawdown pipeline.");

        let prices = self
            .source
            .fetch_closes(instrument.ticker(), start_date)
            .await?;
        let drawdown = self.calculator.calculate(&prices)?;

        let Some((first, last)) = prices.date_range() else {
            tracing::info!(instrument = %instrument, %start_date, "No prices in range; no charts produced.");
            return Ok(ChartSet {
                instrument,
                start_date,
                prices,
                drawdown,
                price_figure: None,
                drawdown_figure: None,
            });
        };

        // Both charts use the plan of the price dates so they line up.
        let plan = self.planner.plan(first, last)?;
        let renderer = ChartRenderer::new(instrument);
        let price_figure = renderer.render(&prices, ChartKind::Price, &plan);
        let drawdown_figure = renderer.render(&drawdown, ChartKind::Drawdown, &plan);

        tracing::debug!(
            points = prices.len(),
            interval_months = plan.tick_interval_months,
            "Laid out price and drawdown figures."
        );

        Ok(ChartSet {
            instrument,
            start_date,
            prices,
            drawdown,
            price_figure,
            drawdown_figure,
        })
    }
}
