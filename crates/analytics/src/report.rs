use serde::{Deserialize, Serialize};

/// Days with a strictly positive, strictly negative and exactly zero return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignCounts {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

impl SignCounts {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.zero
    }
}

/// How a year's daily returns spread around their mean.
///
/// All return figures are in percent form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanRelativeRow {
    pub year: i32,
    pub trading_days: usize,
    pub mu: f64,
    pub pct_below_mu: f64,
    pub pct_above_mu: f64,
}

/// Share of a year's daily returns lying beyond `mu ± 2 sigma`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailRow {
    pub year: i32,
    pub trading_days: usize,
    pub mu: f64,
    /// Sample standard deviation. Zero when fewer than two days were observed.
    pub sigma: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub pct_below_lower: f64,
    pub pct_above_upper: f64,
    /// Set when `sigma` could not be estimated and was taken as zero.
    pub degenerate_variance: bool,
}

/// Everything the yearly return questions need for one calendar year.
///
/// The tables are `None` when the year has no trading days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: i32,
    pub signs: SignCounts,
    pub mean_relative: Option<MeanRelativeRow>,
    pub tail: Option<TailRow>,
}

impl YearlyReport {
    pub fn is_empty(&self) -> bool {
        self.mean_relative.is_none()
    }
}

/// Mean and volatility of the daily returns within one (year, week) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    pub year: i32,
    pub week_number: u32,
    pub mean_return: f64,
    pub volatility: f64,
    pub observations: usize,
}

/// Summary of the returns of a year that lie strictly inside a `(low, high)` band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub year: i32,
    pub low: f64,
    pub high: f64,
    pub observations: usize,
    pub positive_days: usize,
    pub negative_days: usize,
    pub mu: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorMetric {
    MaxAbsolute,
    MedianAbsolute,
    MeanAbsolute,
    RootMeanSquared,
}

impl ErrorMetric {
    pub const ALL: [ErrorMetric; 4] = [
        ErrorMetric::MaxAbsolute,
        ErrorMetric::MedianAbsolute,
        ErrorMetric::MeanAbsolute,
        ErrorMetric::RootMeanSquared,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ErrorMetric::MaxAbsolute => "Max Absolute Error",
            ErrorMetric::MedianAbsolute => "Median Absolute Error",
            ErrorMetric::MeanAbsolute => "Mean Absolute Error",
            ErrorMetric::RootMeanSquared => "Root Mean Squared Error",
        }
    }
}

/// The four error measures between an observed and a predicted distribution,
/// each rounded to 5 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub max_absolute: f64,
    pub median_absolute: f64,
    pub mean_absolute: f64,
    pub root_mean_squared: f64,
}

impl ErrorMetrics {
    pub fn value(&self, metric: ErrorMetric) -> f64 {
        match metric {
            ErrorMetric::MaxAbsolute => self.max_absolute,
            ErrorMetric::MedianAbsolute => self.median_absolute,
            ErrorMetric::MeanAbsolute => self.mean_absolute,
            ErrorMetric::RootMeanSquared => self.root_mean_squared,
        }
    }
}

/// Error metrics per year, laid out with metrics as rows and years as columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetricsTable {
    columns: Vec<(i32, ErrorMetrics)>,
}

impl ErrorMetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the column for `year`. Columns keep insertion order.
    pub fn push(&mut self, year: i32, metrics: ErrorMetrics) {
        self.columns.push((year, metrics));
    }

    pub fn years(&self) -> Vec<i32> {
        self.columns.iter().map(|(year, _)| *year).collect()
    }

    pub fn get(&self, year: i32) -> Option<&ErrorMetrics> {
        self.columns
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, metrics)| metrics)
    }

    /// One metric across every year, in column order.
    pub fn row(&self, metric: ErrorMetric) -> Vec<f64> {
        self.columns
            .iter()
            .map(|(_, metrics)| metrics.value(metric))
            .collect()
    }

    pub fn rows(&self) -> Vec<(ErrorMetric, Vec<f64>)> {
        ErrorMetric::ALL
            .iter()
            .map(|metric| (*metric, self.row(*metric)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_transposed_metrics_by_year() {
        let mut table = ErrorMetricsTable::new();
        table.push(
            2014,
            ErrorMetrics {
                max_absolute: 0.05,
                median_absolute: 0.02,
                mean_absolute: 0.025,
                root_mean_squared: 0.03,
            },
        );
        table.push(
            2015,
            ErrorMetrics {
                max_absolute: 0.04,
                median_absolute: 0.01,
                mean_absolute: 0.015,
                root_mean_squared: 0.02,
            },
        );

        assert_eq!(table.years(), vec![2014, 2015]);
        assert_eq!(table.row(ErrorMetric::MaxAbsolute), vec![0.05, 0.04]);
        let rows = table.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].0, ErrorMetric::RootMeanSquared);
        assert_eq!(rows[3].1, vec![0.03, 0.02]);
        assert_eq!(table.get(2015).map(|m| m.median_absolute), Some(0.01));
        assert!(table.get(2016).is_none());
    }
}
