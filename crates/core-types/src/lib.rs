//! # Drawdown Core Types
//!
//! The shared vocabulary of the workspace: the fixed instrument table, the
//! date-indexed price and drawdown series, and strict date parsing.
//!
//! Every other crate depends on this one and it depends on nothing of ours.

pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::parse_date;
pub use enums::Instrument;
pub use error::CoreError;
pub use structs::{DatedSeries, DatedValue, DrawdownSeries, PriceSeries};
