use crate::error::AnalyticsError;
use core_types::{DatedSeries, DatedValue, DrawdownSeries, PriceSeries};

/// A stateless calculator for the running drawdown of a price series.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrawdownEngine {}

impl DrawdownEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the drawdown series from a price series.
    ///
    /// A single forward pass keeps the running peak and emits
    /// `(price - peak) / peak` at every date, so the first value is always 0
    /// and every value lies in (-1, 0].
    ///
    /// # Returns
    ///
    /// An empty `DrawdownSeries` for an empty input, or an `AnalyticsError` at
    /// the first price for which the ratio is undefined (zero, negative or
    /// non-finite).
    pub fn calculate(&self, prices: &PriceSeries) -> Result<DrawdownSeries, AnalyticsError> {
        let points = prices.points();
        let Some(first) = points.first() else {
            return Ok(DrawdownSeries::empty());
        };

        let mut peak = first.value;
        let mut drawdowns = Vec::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            let price = checked_price(index, point)?;
            if price > peak {
                peak = price;
            }
            drawdowns.push(DatedValue::new(point.date, (price - peak) / peak));
        }

        DrawdownSeries::new(drawdowns).map_err(|e| AnalyticsError::Calculation(e.to_string()))
    }
}

fn checked_price(index: usize, point: &DatedValue) -> Result<f64, AnalyticsError> {
    if !point.value.is_finite() {
        return Err(AnalyticsError::NonFinitePrice {
            index,
            date: point.date,
        });
    }
    if point.value <= 0.0 {
        return Err(AnalyticsError::NonPositivePrice {
            index,
            date: point.date,
            price: point.value,
        });
    }
    Ok(point.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| DatedValue::new(start + Days::new(i as u64), p))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    fn values(drawdown: &DrawdownSeries) -> Vec<f64> {
        drawdown.points().iter().map(|p| p.value).collect()
    }

    #[test]
    fn worked_example() {
        let prices = series(&[100.0, 90.0, 95.0, 80.0, 120.0]);
        let drawdown = DrawdownEngine::new().calculate(&prices).unwrap();

        let expected = [0.0, -0.10, -0.05, -0.20, 0.0];
        for (actual, expected) in values(&drawdown).iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
        }
    }

    #[test]
    fn keeps_the_price_dates() {
        let prices = series(&[5.0, 4.0, 6.0]);
        let drawdown = DrawdownEngine::new().calculate(&prices).unwrap();

        let price_dates: Vec<_> = prices.points().iter().map(|p| p.date).collect();
        let drawdown_dates: Vec<_> = drawdown.points().iter().map(|p| p.date).collect();
        assert_eq!(price_dates, drawdown_dates);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let drawdown = DrawdownEngine::new().calculate(&PriceSeries::empty()).unwrap();
        assert!(drawdown.is_empty());
    }

    #[test]
    fn single_point_is_zero() {
        let drawdown = DrawdownEngine::new().calculate(&series(&[42.0])).unwrap();
        assert_eq!(values(&drawdown), vec![0.0]);
    }

    #[test]
    fn flat_and_rising_series_never_draw_down() {
        let engine = DrawdownEngine::new();
        assert_eq!(values(&engine.calculate(&series(&[7.0; 4])).unwrap()), vec![0.0; 4]);
        assert_eq!(
            values(&engine.calculate(&series(&[1.0, 2.0, 3.0, 4.0])).unwrap()),
            vec![0.0; 4]
        );
    }

    #[test]
    fn zero_price_is_an_arithmetic_failure() {
        let err = DrawdownEngine::new()
            .calculate(&series(&[10.0, 0.0, 12.0]))
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NonPositivePrice {
                index: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                price: 0.0,
            }
        );
    }

    #[test]
    fn leading_zero_price_fails_before_dividing() {
        let err = DrawdownEngine::new().calculate(&series(&[0.0, 1.0])).unwrap_err();
        assert!(matches!(err, AnalyticsError::NonPositivePrice { index: 0, .. }));
    }

    #[test]
    fn negative_and_nan_prices_fail() {
        let engine = DrawdownEngine::new();
        assert!(matches!(
            engine.calculate(&series(&[10.0, -1.0])),
            Err(AnalyticsError::NonPositivePrice { index: 1, .. })
        ));
        assert!(matches!(
            engine.calculate(&series(&[10.0, f64::NAN])),
            Err(AnalyticsError::NonFinitePrice { index: 1, .. })
        ));
    }
}
