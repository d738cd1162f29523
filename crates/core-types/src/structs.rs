use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observation of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatedValue {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Read access shared by price and drawdown series.
///
/// Implementors guarantee that `points()` is ordered by strictly increasing date.
pub trait DatedSeries {
    fn points(&self) -> &[DatedValue];

    fn len(&self) -> usize {
        self.points().len()
    }

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// The first and last date of the series, or `None` when it is empty.
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let points = self.points();
        Some((points.first()?.date, points.last()?.date))
    }

    /// The lowest point, earliest date winning ties.
    fn min_point(&self) -> Option<DatedValue> {
        self.points()
            .iter()
            .copied()
            .fold(None, |lowest: Option<DatedValue>, point| match lowest {
                Some(current) if current.value <= point.value => Some(current),
                _ => Some(point),
            })
    }

    /// The highest point, earliest date winning ties.
    fn max_point(&self) -> Option<DatedValue> {
        self.points()
            .iter()
            .copied()
            .fold(None, |highest: Option<DatedValue>, point| match highest {
                Some(current) if current.value >= point.value => Some(current),
                _ => Some(point),
            })
    }
}

fn check_ordering(points: &[DatedValue]) -> Result<(), CoreError> {
    match points.windows(2).find(|pair| pair[1].date <= pair[0].date) {
        Some(pair) => Err(CoreError::UnorderedDates {
            previous: pair[0].date,
            next: pair[1].date,
        }),
        None => Ok(()),
    }
}

/// Daily closing prices of one instrument.
///
/// An empty series is valid and means the provider had no data for the
/// requested range. Prices are taken as supplied; positivity is only
/// enforced when a drawdown is derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<DatedValue>,
}

impl PriceSeries {
    pub fn new(points: Vec<DatedValue>) -> Result<Self, CoreError> {
        check_ordering(&points)?;
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The most recent close.
    pub fn last(&self) -> Option<DatedValue> {
        self.points.last().copied()
    }
}

impl DatedSeries for PriceSeries {
    fn points(&self) -> &[DatedValue] {
        &self.points
    }
}

/// Running peak-to-trough decline of a price series, as a fraction.
///
/// Shares its dates, one for one, with the `PriceSeries` it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawdownSeries {
    points: Vec<DatedValue>,
}

impl DrawdownSeries {
    pub fn new(points: Vec<DatedValue>) -> Result<Self, CoreError> {
        check_ordering(&points)?;
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The deepest drawdown and the date it occurred.
    pub fn trough(&self) -> Option<DatedValue> {
        self.min_point()
    }

    /// The drawdown at the latest date.
    pub fn current(&self) -> Option<DatedValue> {
        self.points.last().copied()
    }
}

impl DatedSeries for DrawdownSeries {
    fn points(&self) -> &[DatedValue] {
        &self.points
    }
}
