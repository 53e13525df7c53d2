use crate::digits::{DigitFrequency, uniform_prior};
use crate::distribution;
use crate::error::AnalyticsError;
use crate::metrics::error_metrics;
use crate::partition::{YearPartition, partition_by_range, partition_by_year};
use crate::report::{
    BandSummary, ErrorMetrics, ErrorMetricsTable, MeanRelativeRow, SignCounts, TailRow,
    WeeklyAggregate, YearlyReport,
};
use crate::returns;
use crate::weekly;
use core_types::DailyRecord;

/// A stateless calculator for deriving return and price statistics from a daily series.
///
/// Every method is a pure function of its arguments; the engine holds no data between calls
/// and never modifies the records it is given.
#[derive(Debug, Default)]
pub struct StatsEngine {}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the records dated within `year`.
    pub fn partition_by_year<'a>(
        &self,
        records: &'a [DailyRecord],
        year: i32,
    ) -> Result<YearPartition<'a>, AnalyticsError> {
        let partition = partition_by_year(records, year)?;
        tracing::debug!(year, days = partition.len(), "Partitioned records by year");
        Ok(partition)
    }

    pub fn count_signed_returns(&self, partition: &YearPartition<'_>) -> SignCounts {
        distribution::count_signed(&partition.percent_returns())
    }

    /// Trading days, mean percent return, and the share of days on each side of the mean.
    pub fn mean_relative_table(
        &self,
        partition: &YearPartition<'_>,
    ) -> Result<MeanRelativeRow, AnalyticsError> {
        distribution::mean_relative(partition.year, &partition.percent_returns())
    }

    /// Extends the mean-relative table with sigma and the share of days beyond `mu ± 2 sigma`.
    pub fn tail_table(&self, partition: &YearPartition<'_>) -> Result<TailRow, AnalyticsError> {
        let row = distribution::tail(partition.year, &partition.percent_returns())?;
        if row.degenerate_variance {
            tracing::debug!(
                year = row.year,
                days = row.trading_days,
                "Too few days to estimate sigma, using 0"
            );
        }
        Ok(row)
    }

    /// Summarises the percent returns of a year that lie strictly between `low` and `high`.
    pub fn band_summary(
        &self,
        partition: &YearPartition<'_>,
        low: f64,
        high: f64,
    ) -> Result<BandSummary, AnalyticsError> {
        distribution::band(partition.year, &partition.percent_returns(), low, high)
    }

    /// Sign counts and both yearly tables for every year of `start_year..=end_year`.
    ///
    /// Years without records are kept in the output with empty tables so callers can
    /// report them.
    pub fn yearly_report(
        &self,
        records: &[DailyRecord],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<YearlyReport>, AnalyticsError> {
        // Validates the range before any per-year work.
        partition_by_range(records, start_year, end_year)?;

        let mut reports = Vec::new();
        for year in start_year..=end_year {
            let partition = self.partition_by_year(records, year)?;
            let signs = self.count_signed_returns(&partition);
            let (mean_relative, tail) = if partition.is_empty() {
                (None, None)
            } else {
                (
                    Some(self.mean_relative_table(&partition)?),
                    Some(self.tail_table(&partition)?),
                )
            };
            reports.push(YearlyReport {
                year,
                signs,
                mean_relative,
                tail,
            });
        }
        Ok(reports)
    }

    pub fn digit_frequencies<'a, I>(&self, records: I) -> DigitFrequency
    where
        I: IntoIterator<Item = &'a DailyRecord>,
    {
        DigitFrequency::from_records(records)
    }

    /// Cent-digit frequencies of the opening prices from `start_year` through `end_year`.
    pub fn digit_frequencies_between(
        &self,
        records: &[DailyRecord],
        start_year: i32,
        end_year: i32,
    ) -> Result<DigitFrequency, AnalyticsError> {
        let window = partition_by_range(records, start_year, end_year)?;
        Ok(self.digit_frequencies(window))
    }

    /// Compares the cent-digit distribution of a window against the uniform prior.
    pub fn aggregate_error_metrics(
        &self,
        records: &[DailyRecord],
        start_year: i32,
        end_year: i32,
    ) -> Result<ErrorMetrics, AnalyticsError> {
        let frequencies = self.digit_frequencies_between(records, start_year, end_year)?;
        self.metrics_against_uniform(&frequencies, start_year)
    }

    /// The uniform-prior comparison computed separately for each year, metrics as rows.
    pub fn per_year_error_table(
        &self,
        records: &[DailyRecord],
        start_year: i32,
        end_year: i32,
    ) -> Result<ErrorMetricsTable, AnalyticsError> {
        partition_by_range(records, start_year, end_year)?;

        let mut table = ErrorMetricsTable::new();
        for year in start_year..=end_year {
            let partition = self.partition_by_year(records, year)?;
            let frequencies = self.digit_frequencies(partition.records().iter().copied());
            table.push(year, self.metrics_against_uniform(&frequencies, year)?);
        }
        Ok(table)
    }

    fn metrics_against_uniform(
        &self,
        frequencies: &DigitFrequency,
        year: i32,
    ) -> Result<ErrorMetrics, AnalyticsError> {
        if frequencies.is_empty() {
            return Err(AnalyticsError::EmptyPartition { year });
        }
        let actual = frequencies.dense_proportions()?;
        let metrics = error_metrics(&actual, &uniform_prior())?;
        tracing::debug!(year, ?metrics, "Computed cent digit error metrics");
        Ok(metrics)
    }

    /// Mean return and volatility per (year, week), in ascending key order.
    pub fn weekly_aggregate(&self, records: &[DailyRecord]) -> Vec<WeeklyAggregate> {
        let weeks = weekly::weekly_aggregate(records);
        tracing::debug!(days = records.len(), weeks = weeks.len(), "Aggregated weekly returns");
        weeks
    }

    /// Copies of `records` whose returns are recomputed from the adjusted close.
    pub fn derive_returns(&self, records: &[DailyRecord]) -> Vec<DailyRecord> {
        returns::derive_returns(records)
    }
}
