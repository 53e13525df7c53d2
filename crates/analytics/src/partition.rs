use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::DailyRecord;

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// A borrowed view of the records of a single calendar year.
#[derive(Debug, Clone)]
pub struct YearPartition<'a> {
    pub year: i32,
    records: Vec<&'a DailyRecord>,
}

impl<'a> YearPartition<'a> {
    pub fn records(&self) -> &[&'a DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The daily returns of the partition in percent form.
    pub fn percent_returns(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.percent_return()).collect()
    }
}

fn check_year(year: i32) -> Result<(), AnalyticsError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AnalyticsError::InvalidYear(year));
    }
    Ok(())
}

/// January 1st of `start_year` through December 31st of `end_year`, inclusive.
fn bounds(start_year: i32, end_year: i32) -> Result<(NaiveDate, NaiveDate), AnalyticsError> {
    check_year(start_year)?;
    check_year(end_year)?;
    if start_year > end_year {
        return Err(AnalyticsError::InvalidRange {
            start: start_year,
            end: end_year,
        });
    }
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1)
        .ok_or(AnalyticsError::InvalidYear(start_year))?;
    let end =
        NaiveDate::from_ymd_opt(end_year, 12, 31).ok_or(AnalyticsError::InvalidYear(end_year))?;
    Ok((start, end))
}

/// Selects the records dated within `year`. An empty result is not an error.
pub fn partition_by_year(
    records: &[DailyRecord],
    year: i32,
) -> Result<YearPartition<'_>, AnalyticsError> {
    Ok(YearPartition {
        year,
        records: partition_by_range(records, year, year)?,
    })
}

/// Selects the records dated from `start_year` through `end_year`.
pub fn partition_by_range(
    records: &[DailyRecord],
    start_year: i32,
    end_year: i32,
) -> Result<Vec<&DailyRecord>, AnalyticsError> {
    let (start, end) = bounds(start_year, end_year)?;
    Ok(records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(y: i32, m: u32, d: u32) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DailyRecord::new(date, dec!(10), dec!(10), dec!(10), 1_000, 0.01)
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let records = vec![
            record(2017, 12, 31),
            record(2018, 1, 1),
            record(2018, 6, 15),
            record(2018, 12, 31),
            record(2019, 1, 1),
        ];
        let partition = partition_by_year(&records, 2018).unwrap();
        assert_eq!(partition.year, 2018);
        assert_eq!(partition.len(), 3);
        assert!(partition.records().iter().all(|r| r.year == 2018));
    }

    #[test]
    fn missing_year_gives_empty_partition() {
        let records = vec![record(2018, 1, 2)];
        let partition = partition_by_year(&records, 2015).unwrap();
        assert!(partition.is_empty());
        assert!(partition.percent_returns().is_empty());
    }

    #[test]
    fn rejects_non_four_digit_years() {
        assert_eq!(
            partition_by_year(&[], 18).unwrap_err(),
            AnalyticsError::InvalidYear(18)
        );
        assert_eq!(
            partition_by_range(&[], 2019, 2018).unwrap_err(),
            AnalyticsError::InvalidRange {
                start: 2019,
                end: 2018
            }
        );
    }

    #[test]
    fn range_spans_several_years() {
        let records = vec![record(2013, 12, 31), record(2014, 1, 2), record(2016, 5, 5), record(2019, 1, 2)];
        assert_eq!(partition_by_range(&records, 2014, 2018).unwrap().len(), 2);
    }
}
