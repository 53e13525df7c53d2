use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite (year, week-of-year) key used to group daily records.
///
/// Ordering is by year first, then week, which is the order weekly tables are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearWeek {
    pub year: i32,
    pub week: u32,
}

impl YearWeek {
    pub fn new(year: i32, week: u32) -> Result<Self, CoreError> {
        if week > 53 {
            return Err(CoreError::InvalidWeek(week));
        }
        Ok(Self { year, week })
    }

    /// Sunday-based week of the year (`%U`): days before the first Sunday are week 0.
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_year = date.ordinal0();
        let weekday = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            week: (day_of_year + 7 - weekday) / 7,
        }
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

/// A single trading day for one ticker.
///
/// Records are value types: the engine reads them and derives new ones, it never edits
/// a caller's record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: u64,
    /// Fractional day-over-day return of the adjusted close (0.003 is 0.3%).
    pub daily_return: f64,
    pub year: i32,
    pub week_number: u32,
}

impl DailyRecord {
    /// Builds a record whose year and week number are derived from `date`.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        close: Decimal,
        adj_close: Decimal,
        volume: u64,
        daily_return: f64,
    ) -> Self {
        let key = YearWeek::from_date(date);
        Self {
            date,
            open,
            close,
            adj_close,
            volume,
            daily_return,
            year: key.year,
            week_number: key.week,
        }
    }

    /// Replaces the derived calendar fields with the ones supplied by the data source.
    pub fn with_calendar(mut self, year: i32, week_number: u32) -> Result<Self, CoreError> {
        let key = YearWeek::new(year, week_number)?;
        self.year = key.year;
        self.week_number = key.week;
        Ok(self)
    }

    /// Returns a copy of this record carrying a different daily return.
    pub fn with_return(&self, daily_return: f64) -> Self {
        Self {
            daily_return,
            ..self.clone()
        }
    }

    pub fn year_week(&self) -> YearWeek {
        YearWeek {
            year: self.year,
            week: self.week_number,
        }
    }

    /// The daily return scaled to percent form (0.003 -> 0.3).
    pub fn percent_return(&self) -> f64 {
        self.daily_return * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_zero_runs_until_first_sunday() {
        // 2018-01-01 is a Monday, 2018-01-07 the first Sunday.
        assert_eq!(YearWeek::from_date(date(2018, 1, 1)).week, 0);
        assert_eq!(YearWeek::from_date(date(2018, 1, 6)).week, 0);
        assert_eq!(YearWeek::from_date(date(2018, 1, 7)).week, 1);
        assert_eq!(YearWeek::from_date(date(2018, 12, 31)).week, 52);
    }

    #[test]
    fn year_starting_on_sunday_has_no_week_zero() {
        // 2017-01-01 is a Sunday.
        assert_eq!(YearWeek::from_date(date(2017, 1, 1)).week, 1);
    }

    #[test]
    fn year_week_orders_by_year_then_week() {
        let a = YearWeek::new(2017, 52).unwrap();
        let b = YearWeek::new(2018, 0).unwrap();
        let c = YearWeek::new(2018, 3).unwrap();
        assert!(a < b && b < c);
        assert_eq!(c.to_string(), "2018-03");
    }

    #[test]
    fn rejects_out_of_range_week() {
        assert_eq!(YearWeek::new(2018, 54), Err(CoreError::InvalidWeek(54)));
    }

    #[test]
    fn with_return_leaves_original_untouched() {
        let record = DailyRecord::new(date(2018, 1, 2), dec!(10.01), dec!(10.5), dec!(10.4), 100, 0.0);
        let updated = record.with_return(0.015);
        assert_eq!(record.daily_return, 0.0);
        assert_eq!(updated.daily_return, 0.015);
        assert_eq!(updated.date, record.date);
        assert!((updated.percent_return() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn caller_calendar_overrides_derived_one() {
        let record = DailyRecord::new(date(2018, 1, 2), dec!(1), dec!(1), dec!(1), 0, 0.0)
            .with_calendar(2018, 1)
            .unwrap();
        assert_eq!(record.year_week(), YearWeek { year: 2018, week: 1 });
    }
}
