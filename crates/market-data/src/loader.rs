use crate::error::{DataError, Result};
use analytics::returns::derive_returns;
use chrono::NaiveDate;
use core_types::{DailyRecord, ReturnSource};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const REQUIRED_COLUMNS: [&str; 3] = ["date", "open", "close"];

/// Raw CSV row. Numbers stay as text until they are parsed with line context.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: String,
    #[serde(alias = "Close")]
    close: String,
    #[serde(rename = "adj close", alias = "Adj Close", default)]
    adj_close: Option<String>,
    #[serde(alias = "Volume", default)]
    volume: Option<String>,
    #[serde(rename = "return", alias = "Return", default)]
    daily_return: Option<String>,
    #[serde(alias = "Year", default)]
    year: Option<i32>,
    #[serde(rename = "week_number", alias = "Week_Number", default)]
    week_number: Option<u32>,
}

struct ParsedRow {
    line: u64,
    record: DailyRecord,
    daily_return: Option<f64>,
}

/// Loads one ticker's daily history from a headered CSV file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceLoader {
    return_source: ReturnSource,
}

impl PriceLoader {
    pub fn new(return_source: ReturnSource) -> Self {
        Self { return_source }
    }

    /// Reads every row of the file at `path`, sorted by date ascending.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DailyRecord>> {
        let path = path.as_ref();
        let records = self.from_reader(File::open(path)?)?;
        match (records.first(), records.last()) {
            (Some(first), Some(last)) => tracing::info!(
                path = %path.display(),
                days = records.len(),
                "Loaded daily prices from {} to {}",
                first.date,
                last.date
            ),
            _ => tracing::warn!(path = %path.display(), "Price file has no rows"),
        }
        Ok(records)
    }

    pub fn from_reader<R: io::Read>(&self, reader: R) -> Result<Vec<DailyRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect();
        verify_required_columns(&headers)?;
        if self.return_source == ReturnSource::Column && !headers.iter().any(|h| h == "return") {
            return Err(DataError::MissingColumn("Return".to_string()));
        }

        let mut rows = Vec::new();
        for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
            // Line 1 is the header.
            let line = index as u64 + 2;
            rows.push(parse_row(result?, line)?);
        }
        rows.sort_by_key(|row| row.record.date);

        match self.return_source {
            ReturnSource::Column => column_returns(rows),
            ReturnSource::Derive => {
                let records: Vec<DailyRecord> = rows.into_iter().map(|row| row.record).collect();
                Ok(derive_returns(&records))
            }
        }
    }
}

fn verify_required_columns(headers: &[String]) -> Result<()> {
    let present: HashSet<&str> = headers.iter().map(String::as_str).collect();
    for column in REQUIRED_COLUMNS {
        if !present.contains(column) {
            return Err(DataError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Uses the file's own `Return` values. Only the first day may lack one; it becomes 0.
fn column_returns(rows: Vec<ParsedRow>) -> Result<Vec<DailyRecord>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row.daily_return {
            Some(value) => Ok(row.record.with_return(value)),
            None if index == 0 => Ok(row.record.with_return(0.0)),
            None => Err(invalid(row.line, "Return", "")),
        })
        .collect()
}

fn invalid(line: u64, field: &'static str, value: &str) -> DataError {
    DataError::InvalidField {
        line,
        field,
        value: value.to_string(),
    }
}

fn parse_date(value: &str, line: u64) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| invalid(line, "Date", value))
}

fn parse_price(value: &str, line: u64, field: &'static str) -> Result<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid(line, field, value))
}

fn parse_volume(value: &str, line: u64) -> Result<u64> {
    if let Ok(volume) = value.parse::<u64>() {
        return Ok(volume);
    }
    // Some exports write volumes as floats ("1234.0").
    match value.parse::<f64>() {
        Ok(volume) if volume.is_finite() && volume >= 0.0 => Ok(volume.round() as u64),
        _ => Err(invalid(line, "Volume", value)),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_row(row: CsvRow, line: u64) -> Result<ParsedRow> {
    let date = parse_date(&row.date, line)?;
    let open = parse_price(&row.open, line, "Open")?;
    let close = parse_price(&row.close, line, "Close")?;
    let adj_close = match non_empty(&row.adj_close) {
        Some(value) => parse_price(value, line, "Adj Close")?,
        None => close,
    };
    let volume = match non_empty(&row.volume) {
        Some(value) => parse_volume(value, line)?,
        None => 0,
    };
    let daily_return = match non_empty(&row.daily_return) {
        Some(value) => {
            let parsed = value
                .parse::<f64>()
                .map_err(|_| invalid(line, "Return", value))?;
            // Dataframe exports write the missing first-day change as NaN.
            parsed.is_finite().then_some(parsed)
        }
        None => None,
    };

    let mut record = DailyRecord::new(date, open, close, adj_close, volume, 0.0);
    if row.year.is_some() || row.week_number.is_some() {
        let year = row.year.unwrap_or(record.year);
        let week = row.week_number.unwrap_or(record.week_number);
        record = record.with_calendar(year, week)?;
    }

    Ok(ParsedRow {
        line,
        record,
        daily_return,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_float_volumes() {
        assert_eq!(parse_volume("1200", 2).unwrap(), 1200);
        assert_eq!(parse_volume("1200.0", 2).unwrap(), 1200);
        assert!(parse_volume("-3", 2).is_err());
    }

    #[test]
    fn parses_both_date_styles() {
        let expected = NaiveDate::from_ymd_opt(2018, 3, 9).unwrap();
        assert_eq!(parse_date("2018-03-09", 2).unwrap(), expected);
        assert_eq!(parse_date("2018/03/09", 2).unwrap(), expected);
        assert!(matches!(
            parse_date("09.03.2018", 7),
            Err(DataError::InvalidField { line: 7, field: "Date", .. })
        ));
    }

    #[test]
    fn parses_prices_exactly() {
        assert_eq!(parse_price("68.889999", 2, "Open").unwrap(), dec!(68.889999));
        assert_eq!(parse_price("1.5e1", 2, "Open").unwrap(), dec!(15));
    }
}
