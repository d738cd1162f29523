use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PriceSeries;

pub mod error;
pub mod responses;
pub mod yahoo;
// --- Public API ---
pub use yahoo::YahooClient;

/// The narrow interface through which the rest of the system obtains prices.
/// Anything that can produce daily closes (the live provider, a fixture, a
/// cache) can stand behind it, and the provider's own error vocabulary never
/// leaks past this boundary.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches daily closing prices for `ticker` from `start_date` through the
    /// most recent trading day.
    ///
    /// An empty series means the provider has no data for the ticker or range;
    /// an `Err` means the request itself failed. One attempt per call.
    async fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<PriceSeries, ApiError>;
}
