use crate::{error::AppError, AppState};
use axum::{extract::State, Form, Json};
use charts::{ChartArtifacts, ChartKind};
use chrono::{Local, NaiveDate};
use core_types::Instrument;
use engine::ChartSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One row of the instrument table as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub key: String,
    pub ticker: String,
    pub name: String,
}

impl From<Instrument> for InstrumentInfo {
    fn from(instrument: Instrument) -> Self {
        Self {
            key: instrument.key().to_string(),
            ticker: instrument.ticker().to_string(),
            name: instrument.display_name().to_string(),
        }
    }
}

/// The urlencoded body of a chart request.
#[derive(Debug, Deserialize)]
pub struct ChartForm {
    #[serde(default)]
    pub start_date: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
}
fn default_symbol() -> String {
    Instrument::default().key().to_string()
}

/// Chart URLs are `null` when the provider had no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    pub instrument: InstrumentInfo,
    pub start_date: NaiveDate,
    pub price_chart: Option<String>,
    pub drawdown_chart: Option<String>,
    pub message: Option<String>,
}

/// # GET /api/instruments
pub async fn list_instruments() -> Json<Vec<InstrumentInfo>> {
    Json(Instrument::ALL.into_iter().map(InstrumentInfo::from).collect())
}

/// # POST /api/charts
/// Fetches the instrument from `start_date`, writes fresh price and drawdown
/// charts and returns their URLs.
pub async fn create_charts(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ChartForm>,
) -> Result<Json<ChartResponse>, AppError> {
    let chart_set = state
        .pipeline
        .run_request(&form.symbol, &form.start_date)
        .await?;

    let instrument = chart_set.instrument;
    let start_date = chart_set.start_date;

    if chart_set.is_empty() {
        return Ok(Json(ChartResponse {
            instrument: instrument.into(),
            start_date,
            price_chart: None,
            drawdown_chart: None,
            message: Some(format!(
                "No data available for {} from {}.",
                instrument.display_name(),
                start_date
            )),
        }));
    }

    // Rasterising is CPU bound and the artifact I/O is synchronous.
    let artifacts = state.artifacts.clone();
    let (price_chart, drawdown_chart) =
        tokio::task::spawn_blocking(move || write_charts(&artifacts, &chart_set))
            .await
            .map_err(|e| AppError::Task(e.to_string()))??;

    Ok(Json(ChartResponse {
        instrument: instrument.into(),
        start_date,
        price_chart,
        drawdown_chart,
        message: None,
    }))
}

/// Replaces any previous charts with timestamped files and returns their
/// `/static` URLs.
fn write_charts(
    artifacts: &ChartArtifacts,
    chart_set: &ChartSet,
) -> Result<(Option<String>, Option<String>), AppError> {
    artifacts.purge_stale()?;

    let now = Local::now().naive_local();
    let mut price_chart = None;
    let mut drawdown_chart = None;

    for figure in chart_set.figures() {
        let file_name = ChartArtifacts::timestamped_name(chart_set.instrument, figure.kind, now);
        artifacts.write(figure, &file_name)?;
        let url = Some(format!("/static/{}", file_name));
        match figure.kind {
            ChartKind::Price => price_chart = url,
            ChartKind::Drawdown => drawdown_chart = url,
        }
    }

    Ok((price_chart, drawdown_chart))
}
