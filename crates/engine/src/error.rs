use thiserror::Error;

/// The hard failures of one pipeline run.
///
/// An empty price series is not listed here: it comes back as a `ChartSet`
/// without figures.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] core_types::CoreError),

    #[error("Failed to fetch prices: {0}")]
    Transport(#[from] api_client::error::ApiError),

    #[error("Drawdown calculation failed: {0}")]
    Arithmetic(#[from] analytics::AnalyticsError),

    #[error("Chart error: {0}")]
    Chart(#[from] charts::ChartError),
}
