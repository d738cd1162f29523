use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{DatedValue, PriceSeries};
use serde::Deserialize;
use std::collections::BTreeMap;

// Only the fields needed for daily closes are declared; serde skips the rest
// (open/high/low/volume, adjclose, trading periods, ...).

/// The top-level body of `GET /v8/finance/chart/{ticker}`.
#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ChartError>,
}

/// The error object the provider returns instead of a result.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

impl ChartError {
    /// The provider signals an unknown or delisted ticker with this code.
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub meta: ChartMeta,
    /// Absent when the range contains no trading days.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    /// Seconds east of UTC for the exchange; daily bars are stamped at the
    /// local session open, so the calendar date is taken after this shift.
    pub gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    pub close: Option<Vec<Option<f64>>>,
}

impl ChartData {
    /// Extracts the daily closes on or after `start_date`.
    ///
    /// Only the first quote block is read, so the result is one-dimensional
    /// even if the provider attaches further blocks. Missing closes are
    /// skipped and a repeated date keeps its last value.
    pub fn into_closes(self, start_date: NaiveDate) -> Result<PriceSeries, ApiError> {
        let timestamps = self.timestamp.unwrap_or_default();
        if timestamps.is_empty() {
            return Ok(PriceSeries::empty());
        }

        let closes = self
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|block| block.close)
            .ok_or_else(|| ApiError::InvalidData("response has timestamps but no closes".to_string()))?;

        if closes.len() != timestamps.len() {
            return Err(ApiError::InvalidData(format!(
                "{} timestamps but {} closes",
                timestamps.len(),
                closes.len()
            )));
        }

        let offset = self.meta.gmtoffset.unwrap_or(0);
        let mut by_date = BTreeMap::new();
        for (timestamp, close) in timestamps.into_iter().zip(closes) {
            let Some(close) = close else { continue };
            let date = DateTime::from_timestamp(timestamp + offset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", timestamp)))?
                .date_naive();
            if date >= start_date {
                by_date.insert(date, close);
            }
        }

        let points = by_date
            .into_iter()
            .map(|(date, close)| DatedValue::new(date, close))
            .collect();
        PriceSeries::new(points).map_err(|e| ApiError::InvalidData(e.to_string()))
    }
}
