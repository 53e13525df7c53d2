use crate::error::ConfigError;
use core_types::ReturnSource;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: Dataset,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub band: Band,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which price history to read.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    /// The ticker symbol (e.g., "WMT"). Also names the default input and output files.
    pub ticker: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Input file relative to `data_dir`. Defaults to `{ticker}.csv`.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub return_source: ReturnSource,
}

impl Dataset {
    pub fn input_path(&self) -> PathBuf {
        match &self.file {
            Some(file) => self.data_dir.join(file),
            None => self.data_dir.join(format!("{}.csv", self.ticker)),
        }
    }
}

/// The years covered by the yearly and digit reports.
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub start_year: i32,
    pub end_year: i32,
}

/// The return band used when summarising one year's distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct Band {
    pub year: i32,
    /// Lower bound in percent, exclusive.
    pub low_return: f64,
    /// Upper bound in percent, exclusive.
    pub high_return: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub dir: PathBuf,
}

impl Output {
    pub fn weekly_file(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}_weekly_return_volatility.csv"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

// --- Default Implementations ---
// This allows a user to omit every section except `[dataset]`.

impl Default for Analysis {
    fn default() -> Self {
        Self {
            start_year: 2014,
            end_year: 2018,
        }
    }
}

impl Default for Band {
    fn default() -> Self {
        Self {
            year: 2018,
            low_return: -5.0,
            high_return: 5.0,
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

fn is_four_digit(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

impl Config {
    /// Checks the cross-field rules that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.ticker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.ticker must not be empty".to_string(),
            ));
        }
        for year in [self.analysis.start_year, self.analysis.end_year, self.band.year] {
            if !is_four_digit(year) {
                return Err(ConfigError::ValidationError(format!(
                    "{year} is not a four-digit year"
                )));
            }
        }
        if self.analysis.start_year > self.analysis.end_year {
            return Err(ConfigError::ValidationError(format!(
                "analysis.start_year ({}) is after analysis.end_year ({})",
                self.analysis.start_year, self.analysis.end_year
            )));
        }
        if self.band.low_return >= self.band.high_return {
            return Err(ConfigError::ValidationError(format!(
                "band.low_return ({}) must be below band.high_return ({})",
                self.band.low_return, self.band.high_return
            )));
        }
        Ok(())
    }
}
