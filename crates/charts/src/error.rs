use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Cannot draw a figure without points")]
    EmptyFigure,

    #[error("Failed to draw chart: {0}")]
    Render(String),

    #[error("Chart file error: {0}")]
    Io(#[from] std::io::Error),
}
