use crate::error::ApiError;
use crate::responses::ChartEnvelope;
use crate::PriceSource;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use configuration::ProviderConfig;
use core_types::{DatedSeries, PriceSeries};

/// A `PriceSource` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(ticker))
    }
}

/// Turns a raw chart response into closes.
///
/// The provider answers an unknown ticker with a "Not Found" error object,
/// which is reported as an empty series. Any other error object, or a body
/// that cannot be read, is a failure.
pub(crate) fn parse_chart(
    status: reqwest::StatusCode,
    body: &str,
    start_date: NaiveDate,
) -> Result<PriceSeries, ApiError> {
    let envelope = match serde_json::from_str::<ChartEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Err(e) => return Err(ApiError::Deserialization(e.to_string())),
    };

    if let Some(error) = envelope.chart.error {
        if error.is_not_found() {
            return Ok(PriceSeries::empty());
        }
        return Err(ApiError::Provider {
            code: error.code,
            description: error.description,
        });
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    match envelope.chart.result.and_then(|results| results.into_iter().next()) {
        Some(data) => data.into_closes(start_date),
        None => Ok(PriceSeries::empty()),
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let period1 = start_date.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = Utc::now().timestamp();

        tracing::debug!(ticker, %start_date, "Requesting daily closes.");

        let response = self
            .client
            .get(self.chart_url(ticker))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let series = parse_chart(status, &body, start_date)?;
        if series.is_empty() {
            tracing::info!(ticker, %start_date, "Provider returned no data.");
        } else {
            tracing::debug!(ticker, points = series.len(), "Received daily closes.");
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DatedValue;
    use reqwest::StatusCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const THREE_DAYS: &str = r#"{"chart":{"result":[{
        "meta":{"symbol":"^GSPC","gmtoffset":-18000},
        "timestamp":[1704205800,1704292200,1704378600],
        "indicators":{"quote":[{"open":[4745.2,4725.1,4697.4],"close":[4742.83,4704.81,4688.68],"volume":[3743050000,3950760000,3715480000]}],
                      "adjclose":[{"adjclose":[4742.83,4704.81,4688.68]}]}}],"error":null}}"#;

    #[test]
    fn extracts_closes_on_exchange_dates() {
        let series = parse_chart(StatusCode::OK, THREE_DAYS, date(2024, 1, 1)).unwrap();

        assert_eq!(
            series.points(),
            &[
                DatedValue::new(date(2024, 1, 2), 4742.83),
                DatedValue::new(date(2024, 1, 3), 4704.81),
                DatedValue::new(date(2024, 1, 4), 4688.68),
            ]
        );
    }

    #[test]
    fn drops_points_before_the_start_date() {
        let series = parse_chart(StatusCode::OK, THREE_DAYS, date(2024, 1, 3)).unwrap();
        assert_eq!(series.date_range(), Some((date(2024, 1, 3), date(2024, 1, 4))));
    }

    #[test]
    fn skips_null_closes_and_keeps_the_last_duplicate() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704240000,1704326400,1704330000],
            "indicators":{"quote":[{"close":[100.0,null,101.5]}]}}],"error":null}}"#;
        let with_repeat = body.replace("null,101.5", "99.0,101.5");

        let skipped = parse_chart(StatusCode::OK, body, date(2024, 1, 1)).unwrap();
        assert_eq!(
            skipped.points(),
            &[
                DatedValue::new(date(2024, 1, 3), 100.0),
                DatedValue::new(date(2024, 1, 4), 101.5),
            ]
        );

        let repeated = parse_chart(StatusCode::OK, &with_repeat, date(2024, 1, 1)).unwrap();
        assert_eq!(repeated.len(), 2);
        assert_eq!(repeated.last(), Some(DatedValue::new(date(2024, 1, 4), 101.5)));
    }

    #[test]
    fn only_the_first_quote_block_is_used() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704240000],
            "indicators":{"quote":[{"close":[10.0]},{"close":[999.0]}]}}],"error":null}}"#;

        let series = parse_chart(StatusCode::OK, body, date(2024, 1, 1)).unwrap();
        assert_eq!(series.points(), &[DatedValue::new(date(2024, 1, 3), 10.0)]);
    }

    #[test]
    fn range_without_trading_days_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"EEM"},
            "indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart(StatusCode::OK, body, date(2024, 1, 6)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn unknown_ticker_is_empty_not_an_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let series = parse_chart(StatusCode::NOT_FOUND, body, date(2024, 1, 1)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn other_provider_errors_fail() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval"}}}"#;
        let err = parse_chart(StatusCode::BAD_REQUEST, body, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ApiError::Provider { ref code, .. } if code == "Bad Request"));
    }

    #[test]
    fn unreadable_bodies_fail() {
        assert!(matches!(
            parse_chart(StatusCode::OK, "not json", date(2024, 1, 1)),
            Err(ApiError::Deserialization(_))
        ));
        assert!(matches!(
            parse_chart(StatusCode::BAD_GATEWAY, "<html>oops</html>", date(2024, 1, 1)),
            Err(ApiError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704240000,1704326400],
            "indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#;
        assert!(matches!(
            parse_chart(StatusCode::OK, body, date(2024, 1, 1)),
            Err(ApiError::InvalidData(_))
        ));
    }

    #[test]
    fn tickers_are_escaped_in_the_path() {
        let client = YahooClient::new(&ProviderConfig {
            base_url: "http://localhost:1234/chart/".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap();
        assert_eq!(client.chart_url("^GSPC"), "http://localhost:1234/chart/%5EGSPC");
        assert_eq!(client.chart_url("EEM"), "http://localhost:1234/chart/EEM");
    }
}
