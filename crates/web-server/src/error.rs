use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engine::EngineError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Chart file error: {0}")]
    Chart(#[from] charts::ChartError),
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Engine(EngineError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Engine(EngineError::Transport(api_err)) => {
                tracing::error!(error = ?api_err, "Price fetch failed.");
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to fetch price data from the provider".to_string(),
                )
            }
            AppError::Engine(EngineError::Arithmetic(calc_err)) => {
                tracing::error!(error = ?calc_err, "Drawdown calculation failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Could not calculate the drawdown: {}", calc_err),
                )
            }
            AppError::Engine(EngineError::Chart(chart_err)) | AppError::Chart(chart_err) => {
                tracing::error!(error = ?chart_err, "Chart error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while drawing the charts".to_string(),
                )
            }
            AppError::Task(message) => {
                tracing::error!(error = %message, "Background task failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
