use crate::error::ChartError;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// How dates under the x-axis ticks are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateLabelFormat {
    /// `2024/03/01`
    FullDate,
    /// `2024/03`
    YearMonth,
}

impl DateLabelFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateLabelFormat::FullDate => "%Y/%m/%d",
            DateLabelFormat::YearMonth => "%Y/%m",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Tick spacing and label format for the date axis of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisPlan {
    pub tick_interval_months: u32,
    pub label_format: DateLabelFormat,
}

impl AxisPlan {
    /// First-of-month tick dates inside `[start, end]`.
    ///
    /// Ticks sit on months whose zero-based index within the year is a
    /// multiple of the interval (every January for a 12-month interval,
    /// January/April/July/October for 3), so charts of different ranges share
    /// the same tick calendar.
    pub fn tick_dates(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let interval = self.tick_interval_months.max(1);
        let mut ticks = Vec::new();

        let Some(mut month) = first_month_start_on_or_after(start) else {
            return ticks;
        };
        while month <= end {
            if month.month0() % interval == 0 {
                ticks.push(month);
            }
            match month.checked_add_months(Months::new(1)) {
                Some(next) => month = next,
                None => break,
            }
        }
        ticks
    }
}

/// One rung of the tick-density ladder: spans of up to `max_months` month
/// ends use this interval and format.
struct Rung {
    max_months: u32,
    plan: AxisPlan,
}

/// Sorted by `max_months`; the first rung that fits wins.
const LADDER: [Rung; 3] = [
    Rung {
        max_months: 6,
        plan: AxisPlan {
            tick_interval_months: 1,
            label_format: DateLabelFormat::FullDate,
        },
    },
    Rung {
        max_months: 12,
        plan: AxisPlan {
            tick_interval_months: 2,
            label_format: DateLabelFormat::FullDate,
        },
    },
    Rung {
        max_months: 24,
        plan: AxisPlan {
            tick_interval_months: 3,
            label_format: DateLabelFormat::YearMonth,
        },
    },
];

/// Used for anything longer than the last rung.
const WIDEST: AxisPlan = AxisPlan {
    tick_interval_months: 12,
    label_format: DateLabelFormat::YearMonth,
};

/// Chooses an `AxisPlan` from the span of a date range.
#[derive(Debug, Default, Clone, Copy)]
pub struct AxisPlanner {}

impl AxisPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the date axis for `[start, end]`; a reversed range is an error.
    pub fn plan(&self, start: NaiveDate, end: NaiveDate) -> Result<AxisPlan, ChartError> {
        if start > end {
            return Err(ChartError::InvalidRange { start, end });
        }
        Ok(self.plan_for_months(month_ends_spanned(start, end)))
    }

    pub fn plan_for_months(&self, num_months: u32) -> AxisPlan {
        LADDER
            .iter()
            .find(|rung| num_months <= rung.max_months)
            .map(|rung| rung.plan)
            .unwrap_or(WIDEST)
    }
}

/// Number of calendar month-end dates falling inside `[start, end]`.
///
/// Every month from `start`'s up to the one before `end`'s contributes its
/// last day; `end`'s own month counts only when `end` is its last day.
pub fn month_ends_spanned(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    let whole = (month_index(end) - month_index(start)) as u32;
    whole + u32::from(is_month_end(end))
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

fn first_month_start_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    let month_start = date.with_day(1)?;
    if month_start == date {
        Some(date)
    } else {
        month_start.checked_add_months(Months::new(1))
    }
}
