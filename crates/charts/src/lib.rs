//! # Drawdown Charts
//!
//! Everything between a finished series and a PNG on disk.
//!
//! - `axis`: chooses month-tick spacing and the date label format from the
//!   span of the plotted dates. Price and drawdown charts share it so the
//!   two images line up.
//! - `figure`: `ChartRenderer` turns a series into a backend-independent
//!   `Figure` (points, exact axis ranges, ticks, labels). An empty series
//!   produces no figure.
//! - `raster`: draws a `Figure` with `plotters`.
//! - `artifacts`: names, writes and cleans up chart files in an output directory.

pub mod artifacts;
pub mod axis;
pub mod error;
pub mod figure;
pub mod raster;

pub use artifacts::ChartArtifacts;
pub use axis::{AxisPlan, AxisPlanner, DateLabelFormat};
pub use error::ChartError;
pub use figure::{ChartKind, ChartRenderer, Figure, ValueStyle};
pub use raster::render_png;
