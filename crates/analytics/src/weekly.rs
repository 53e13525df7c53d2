use crate::report::WeeklyAggregate;
use crate::stats::{mean, round_to, sample_std_dev};
use core_types::{DailyRecord, YearWeek};
use std::collections::BTreeMap;

/// Decimals kept on each percent return before it is grouped.
const RETURN_DECIMALS: i32 = 3;

/// Mean and sample standard deviation of percent returns per (year, week), in key order.
///
/// Each return is rounded before aggregation, so results differ slightly from aggregating
/// the raw values. Groups of one day report a volatility of 0.
pub fn weekly_aggregate(records: &[DailyRecord]) -> Vec<WeeklyAggregate> {
    let mut groups: BTreeMap<YearWeek, Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.year_week())
            .or_default()
            .push(round_to(record.percent_return(), RETURN_DECIMALS));
    }

    groups
        .into_iter()
        .map(|(key, returns)| WeeklyAggregate {
            year: key.year,
            week_number: key.week,
            mean_return: mean(&returns).unwrap_or(0.0),
            volatility: sample_std_dev(&returns).unwrap_or(0.0),
            observations: returns.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(year: i32, week: u32, day: u32, percent: f64) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(year, 1, day).unwrap();
        DailyRecord::new(date, dec!(1), dec!(1), dec!(1), 0, percent / 100.0)
            .with_calendar(year, week)
            .unwrap()
    }

    #[test]
    fn aggregates_single_week() {
        let records = vec![record(2018, 1, 8, 1.0), record(2018, 1, 9, 2.0), record(2018, 1, 10, 3.0)];
        let weeks = weekly_aggregate(&records);
        assert_eq!(weeks.len(), 1);
        assert_eq!((weeks[0].year, weeks[0].week_number), (2018, 1));
        assert_eq!(weeks[0].observations, 3);
        assert!((weeks[0].mean_return - 2.0).abs() < 1e-9);
        assert!((weeks[0].volatility - 1.0).abs() < 1e-9);
    }

    #[test]
    fn groups_come_out_in_key_order() {
        let records = vec![
            record(2018, 2, 15, 0.5),
            record(2017, 52, 28, -0.5),
            record(2018, 0, 2, 1.0),
            record(2018, 2, 16, 1.5),
        ];
        let keys: Vec<_> = weekly_aggregate(&records)
            .iter()
            .map(|w| (w.year, w.week_number))
            .collect();
        assert_eq!(keys, vec![(2017, 52), (2018, 0), (2018, 2)]);
    }

    #[test]
    fn lone_day_has_zero_volatility() {
        let weeks = weekly_aggregate(&[record(2018, 0, 2, 1.25)]);
        assert_eq!(weeks[0].volatility, 0.0);
        assert!((weeks[0].mean_return - 1.25).abs() < 1e-9);
    }

    #[test]
    fn returns_are_rounded_before_averaging() {
        // 0.0004 rounds to 0.000 and 0.0014 to 0.001; the raw mean would be 0.0009.
        let weeks = weekly_aggregate(&[record(2018, 4, 22, 0.0004), record(2018, 4, 23, 0.0014)]);
        assert!((weeks[0].mean_return - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn empty_series_has_no_weeks() {
        assert!(weekly_aggregate(&[]).is_empty());
    }
}
