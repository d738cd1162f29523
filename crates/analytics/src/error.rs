use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Drawdown is undefined for non-positive price {price} on {date} (index {index})")]
    NonPositivePrice {
        index: usize,
        date: NaiveDate,
        price: f64,
    },

    #[error("Drawdown is undefined for non-finite price on {date} (index {index})")]
    NonFinitePrice { index: usize, date: NaiveDate },

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
