//! # Drawdown Analytics
//!
//! Turns a daily price series into its drawdown series: the fractional decline
//! of each close from the highest close seen so far.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of providers, charts or files.
//!   It depends only on `core-types`.
//! - **Stateless Calculation:** The `DrawdownEngine` holds no state between calls,
//!   so it can be shared freely across requests.
//!
//! ## Public API
//!
//! - `DrawdownEngine`: The struct that contains the calculation logic.
//! - `AnalyticsError`: The arithmetic failures that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use engine::DrawdownEngine;
pub use error::AnalyticsError;
