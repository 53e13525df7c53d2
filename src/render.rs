//! Terminal tables for each report.

use analytics::{
    BandSummary, DigitFrequency, ErrorMetric, ErrorMetrics, ErrorMetricsTable, WeeklyAggregate,
    YearlyReport,
};
use comfy_table::{Cell, ContentArrangement, Table};

fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn sign_counts(reports: &[YearlyReport]) -> Table {
    let mut table = new_table(["Year", "Positive days", "Negative days", "Flat days"]);
    for report in reports {
        table.add_row(vec![
            report.year.to_string(),
            report.signs.positive.to_string(),
            report.signs.negative.to_string(),
            report.signs.zero.to_string(),
        ]);
    }
    table
}

pub fn mean_relative(reports: &[YearlyReport]) -> Table {
    let mut table = new_table(["Year", "Trading Days", "mu", "% days < mu", "% days > mu"]);
    for row in reports.iter().filter_map(|r| r.mean_relative.as_ref()) {
        table.add_row(vec![
            row.year.to_string(),
            row.trading_days.to_string(),
            format!("{:.6}", row.mu),
            format!("{:.2}", row.pct_below_mu),
            format!("{:.2}", row.pct_above_mu),
        ]);
    }
    table
}

pub fn tails(reports: &[YearlyReport]) -> Table {
    let mut table = new_table([
        "Year",
        "Trading Days",
        "mu",
        "sigma",
        "% days < mu - 2 * sigma",
        "% days > mu + 2 * sigma",
    ]);
    for row in reports.iter().filter_map(|r| r.tail.as_ref()) {
        // A sigma of 0 from too few days is marked rather than shown as a real estimate.
        let sigma = if row.degenerate_variance {
            "0 (n < 2)".to_string()
        } else {
            format!("{:.6}", row.sigma)
        };
        table.add_row(vec![
            row.year.to_string(),
            row.trading_days.to_string(),
            format!("{:.6}", row.mu),
            sigma,
            format!("{:.2}", row.pct_below_lower),
            format!("{:.2}", row.pct_above_upper),
        ]);
    }
    table
}

/// Digit counts for the whole window followed by one column per year.
/// Digits a column never saw are left blank.
pub fn digit_frequencies(
    window_label: &str,
    window: &DigitFrequency,
    by_year: &[(i32, DigitFrequency)],
) -> Table {
    let mut header = vec!["Digit".to_string(), window_label.to_string()];
    header.extend(by_year.iter().map(|(year, _)| year.to_string()));
    let mut table = new_table(header);

    let count = |frequency: &DigitFrequency, digit: u8| {
        frequency
            .get(digit)
            .map(|c| c.to_string())
            .unwrap_or_default()
    };
    for digit in 0..analytics::digits::DIGITS as u8 {
        let mut row = vec![digit.to_string(), count(window, digit)];
        row.extend(by_year.iter().map(|(_, frequency)| count(frequency, digit)));
        table.add_row(row);
    }

    let mut totals = vec!["Total".to_string(), window.total().to_string()];
    totals.extend(by_year.iter().map(|(_, frequency)| frequency.total().to_string()));
    table.add_row(totals);
    table
}

pub fn error_metrics(metrics: &ErrorMetrics) -> Table {
    let mut table = new_table(["Metric", "Value"]);
    for metric in ErrorMetric::ALL {
        table.add_row(vec![
            metric.label().to_string(),
            format!("{:.5}", metrics.value(metric)),
        ]);
    }
    table
}

pub fn error_table(error_table: &ErrorMetricsTable) -> Table {
    let mut header = vec!["Metric".to_string()];
    header.extend(error_table.years().iter().map(|year| year.to_string()));
    let mut table = new_table(header);
    for (metric, values) in error_table.rows() {
        let mut row = vec![metric.label().to_string()];
        row.extend(values.iter().map(|v| format!("{v:.5}")));
        table.add_row(row);
    }
    table
}

pub fn weekly(weeks: &[WeeklyAggregate]) -> Table {
    let mut table = new_table(["Year", "Week_Number", "mean_return", "volatility", "Days"]);
    for week in weeks {
        table.add_row(vec![
            week.year.to_string(),
            week.week_number.to_string(),
            format!("{:.4}", week.mean_return),
            format!("{:.4}", week.volatility),
            week.observations.to_string(),
        ]);
    }
    table
}

pub fn band(summary: &BandSummary) -> Table {
    let mut table = new_table(["Year", "Band", "Days", "Positive", "Negative", "mu", "sigma"]);
    table.add_row(vec![
        summary.year.to_string(),
        format!("({}, {})", summary.low, summary.high),
        summary.observations.to_string(),
        summary.positive_days.to_string(),
        summary.negative_days.to_string(),
        format!("{:.2}", summary.mu),
        format!("{:.2}", summary.sigma),
    ]);
    table
}
