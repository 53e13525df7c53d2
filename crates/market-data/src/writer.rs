//! Delimited-text output of the engine's tables.
//!
//! Column headers follow the layout of the course reports the tables were first produced for.

use crate::error::Result;
use analytics::{ErrorMetricsTable, MeanRelativeRow, TailRow, WeeklyAggregate};
use csv::Writer;
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::Path;

#[derive(Serialize)]
struct WeeklyCsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Week_Number")]
    week_number: u32,
    mean_return: f64,
    volatility: f64,
}

#[derive(Serialize)]
struct MeanRelativeCsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Trading Days")]
    trading_days: usize,
    mu: f64,
    #[serde(rename = "% days < mu")]
    below: f64,
    #[serde(rename = "% days > mu")]
    above: f64,
}

#[derive(Serialize)]
struct TailCsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Trading Days")]
    trading_days: usize,
    mu: f64,
    sigma: f64,
    #[serde(rename = "% days < mu - 2 * sigma")]
    below: f64,
    #[serde(rename = "% days > mu + 2 * sigma")]
    above: f64,
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn write_rows<W, S, I>(writer: W, rows: I) -> Result<()>
where
    W: io::Write,
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `Year,Week_Number,mean_return,volatility`, one line per week.
pub fn write_weekly<W: io::Write>(writer: W, weeks: &[WeeklyAggregate]) -> Result<()> {
    write_rows(
        writer,
        weeks.iter().map(|w| WeeklyCsvRow {
            year: w.year,
            week_number: w.week_number,
            mean_return: w.mean_return,
            volatility: w.volatility,
        }),
    )
}

pub fn write_mean_relative<W: io::Write>(writer: W, rows: &[MeanRelativeRow]) -> Result<()> {
    write_rows(
        writer,
        rows.iter().map(|r| MeanRelativeCsvRow {
            year: r.year,
            trading_days: r.trading_days,
            mu: r.mu,
            below: r.pct_below_mu,
            above: r.pct_above_mu,
        }),
    )
}

pub fn write_tail<W: io::Write>(writer: W, rows: &[TailRow]) -> Result<()> {
    write_rows(
        writer,
        rows.iter().map(|r| TailCsvRow {
            year: r.year,
            trading_days: r.trading_days,
            mu: r.mu,
            sigma: r.sigma,
            below: r.pct_below_lower,
            above: r.pct_above_upper,
        }),
    )
}

/// Writes the metrics-by-year table: a `Metric` column followed by one column per year.
pub fn write_error_table<W: io::Write>(writer: W, table: &ErrorMetricsTable) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    let mut header = vec!["Metric".to_string()];
    header.extend(table.years().iter().map(|year| year.to_string()));
    wtr.write_record(&header)?;
    for (metric, values) in table.rows() {
        let mut record = vec![metric.label().to_string()];
        record.extend(values.iter().map(|v| format!("{v:.5}")));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates `path` (and its parent directories) and hands the file to `write`.
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    write(create(path)?)?;
    tracing::info!(path = %path.display(), "Wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::ErrorMetrics;

    fn to_string<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn weekly_file_has_source_headers() {
        let weeks = vec![WeeklyAggregate {
            year: 2018,
            week_number: 1,
            mean_return: 2.0,
            volatility: 1.0,
            observations: 3,
        }];
        let text = to_string(|buf| write_weekly(buf, &weeks));
        assert_eq!(text, "Year,Week_Number,mean_return,volatility\n2018,1,2.0,1.0\n");
    }

    #[test]
    fn error_table_has_years_as_columns() {
        let mut table = ErrorMetricsTable::new();
        table.push(2014, ErrorMetrics { max_absolute: 0.05, ..Default::default() });
        table.push(2015, ErrorMetrics::default());
        let text = to_string(|buf| write_error_table(buf, &table));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Metric,2014,2015");
        assert_eq!(lines[1], "Max Absolute Error,0.05000,0.00000");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn tail_rows_use_report_headers() {
        let rows = vec![TailRow {
            year: 2016,
            trading_days: 252,
            mu: 0.05,
            sigma: 1.1,
            lower_threshold: -2.15,
            upper_threshold: 2.25,
            pct_below_lower: 3.57,
            pct_above_upper: 0.79,
            degenerate_variance: false,
        }];
        let text = to_string(|buf| write_tail(buf, &rows));
        assert!(text.starts_with("Year,Trading Days,mu,sigma,% days < mu - 2 * sigma,% days > mu + 2 * sigma\n"));
        assert!(text.ends_with("2016,252,0.05,1.1,3.57,0.79\n"));
    }
}
